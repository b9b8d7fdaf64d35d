// Integration tests: HTTP endpoints over a temp SQLite store

use axum_test::TestServer;
use chrono::Utc;
use statuswatch::config::AppConfig;
use statuswatch::event_repo::EventRepo;
use statuswatch::models::{ServiceStatus, StatusChangeEvent};
use statuswatch::routes;
use statuswatch::seed;
use statuswatch::uptime::{UptimeCalculator, WindowLabel};
use std::sync::Arc;
use tempfile::TempDir;

const HOUR_MS: i64 = 3_600_000;

const TEST_CONFIG: &str = r#"
[server]
port = 8081
host = "0.0.0.0"

[database]
path = "data/test.db"

[aggregation]
max_concurrent_queries = 4
query_timeout_secs = 5

[[services]]
name = "api"
url = "https://api.example.com/health"
region = "eu"
location = "fra"
check = { type = "http_status", expected = 200 }

[[services]]
name = "web"
url = "https://web.example.com/"
region = "us"
location = "nyc"
check = { type = "text", contains = "ok" }
"#;

async fn test_server(dir: &TempDir) -> (TestServer, Arc<EventRepo>) {
    let config = AppConfig::load_from_str(TEST_CONFIG).unwrap();
    let path = dir.path().join("events.db");
    let repo = Arc::new(EventRepo::connect(path.to_str().unwrap()).await.unwrap());
    repo.init().await.unwrap();
    let calculator = Arc::new(UptimeCalculator::new(repo.clone(), &config.aggregation));
    let app = routes::app(repo.clone(), calculator, Arc::new(config.services));
    (TestServer::new(app), repo)
}

#[tokio::test]
async fn root_endpoint() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;
    let response = server.get("/").await;
    response.assert_status_ok();
    response.assert_text("statuswatch: service uptime monitor");
}

#[tokio::test]
async fn version_endpoint() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(
        json.get("name").and_then(|v| v.as_str()),
        Some("statuswatch")
    );
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn services_endpoint_reports_latest_status() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let now_ms = Utc::now().timestamp_millis();
    repo.record_status_change(
        &StatusChangeEvent {
            service_name: "api".into(),
            status: ServiceStatus::Down,
            timestamp: now_ms - HOUR_MS,
            response_time_millis: 900,
            location: "fra".into(),
            region: "eu".into(),
        },
        false,
    )
    .await
    .unwrap();

    let response = server.get("/api/services").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let services = json["services"].as_array().unwrap();
    assert_eq!(services.len(), 2);

    let api = services.iter().find(|s| s["name"] == "api").unwrap();
    assert_eq!(api["status"], "down");
    assert_eq!(api["lastChange"], now_ms - HOUR_MS);
    // No events yet for web: status is null.
    let web = services.iter().find(|s| s["name"] == "web").unwrap();
    assert!(web["status"].is_null());

    // Region filter narrows the list.
    let response = server.get("/api/services").add_query_param("region", "EU").await;
    let json: serde_json::Value = response.json();
    assert_eq!(json["services"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn service_history_no_events_is_all_100() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let response = server.get("/api/service-history").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    for svc in ["api", "web"] {
        for window in ["threeMonth", "sixMonth", "twelveMonth"] {
            assert_eq!(json["uptimeStats"][svc][window], 100.0);
        }
    }
    assert_eq!(json["overallUptime"]["twelveMonth"], 100.0);
    assert!(json["failures"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn service_history_empty_region_reports_nulls() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let response = server
        .get("/api/service-history")
        .add_query_param("region", "apac")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json["uptimeStats"].as_object().unwrap().is_empty());
    for window in ["threeMonth", "sixMonth", "twelveMonth"] {
        assert!(json["overallUptime"][window].is_null());
    }
}

#[tokio::test]
async fn test_data_lifecycle_and_seeded_history() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;

    let check: serde_json::Value = server
        .get("/api/test-data")
        .add_query_param("mode", "check")
        .await
        .json();
    assert_eq!(check["testMode"], false);

    server
        .get("/api/test-data")
        .add_query_param("mode", "inject")
        .await
        .assert_status_ok();

    let check: serde_json::Value = server
        .get("/api/test-data")
        .add_query_param("mode", "check")
        .await
        .json();
    assert_eq!(check["testMode"], true);

    // Seeded history must land within tolerance of the expected percentages.
    let now = Utc::now();
    let json: serde_json::Value = server.get("/api/service-history").await.json();
    for svc in ["api", "web"] {
        for (window, label) in [
            ("threeMonth", WindowLabel::ThreeMonth),
            ("sixMonth", WindowLabel::SixMonth),
            ("twelveMonth", WindowLabel::TwelveMonth),
        ] {
            let actual = json["uptimeStats"][svc][window].as_f64().unwrap();
            let expected = seed::expected_uptime(label, now);
            assert!(
                (actual - expected).abs() < 0.01,
                "{} {}: {} vs {}",
                svc,
                window,
                actual,
                expected
            );
        }
    }

    let deleted: serde_json::Value = server
        .get("/api/test-data")
        .add_query_param("mode", "delete")
        .await
        .json();
    assert_eq!(deleted["deleted"], 12);

    let check: serde_json::Value = server
        .get("/api/test-data")
        .add_query_param("mode", "check")
        .await
        .json();
    assert_eq!(check["testMode"], false);
}

#[tokio::test]
async fn test_data_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;
    let response = server
        .get("/api/test-data")
        .add_query_param("mode", "bogus")
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn downtime_endpoint_merges_across_services() {
    let dir = TempDir::new().unwrap();
    let (server, repo) = test_server(&dir).await;

    let now_ms = Utc::now().timestamp_millis();
    let t = |hours_ago: i64| now_ms - hours_ago * HOUR_MS;
    let ev = |name: &str, status, timestamp| StatusChangeEvent {
        service_name: name.into(),
        status,
        timestamp,
        response_time_millis: 300,
        location: "fra".into(),
        region: "eu".into(),
    };

    // api down 10h..6h ago, web down 8h..4h ago: overlap merges to 10h..4h.
    repo.insert_events(
        &[
            ev("api", ServiceStatus::Down, t(10)),
            ev("web", ServiceStatus::Down, t(8)),
            ev("api", ServiceStatus::Up, t(6)),
            ev("web", ServiceStatus::Up, t(4)),
        ],
        false,
    )
    .await
    .unwrap();

    let response = server
        .get("/api/downtime")
        .add_query_param("location", "fra")
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    let history = json["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["start"], t(10));
    assert_eq!(history[0]["end"], t(4));

    let response = server
        .get("/api/downtime")
        .add_query_param("location", "nyc")
        .await;
    let json: serde_json::Value = response.json();
    assert!(json["history"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn downtime_endpoint_rejects_bad_dates() {
    let dir = TempDir::new().unwrap();
    let (server, _repo) = test_server(&dir).await;
    let response = server
        .get("/api/downtime")
        .add_query_param("location", "fra")
        .add_query_param("startDate", "not-a-date")
        .await;
    response.assert_status_bad_request();
}
