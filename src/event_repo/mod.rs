// SQLite event log: append-only status_changes table, queryable by service
// and timestamp range. Scalar columns only. Transition pairing for the
// history view lives in event_repo::downtime.

mod downtime;

pub use downtime::pair_transitions;

use std::path::Path;
use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::instrument;

use crate::models::{DowntimeInterval, StatusChangeEvent};

pub struct EventRepo {
    pool: SqlitePool,
}

impl EventRepo {
    pub async fn connect(path: &str) -> anyhow::Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .busy_timeout(std::time::Duration::from_secs(5))
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        Ok(Self { pool })
    }

    pub async fn init(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS status_changes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                status TEXT NOT NULL,
                timestamp INTEGER NOT NULL,
                response_time_ms INTEGER NOT NULL,
                location TEXT NOT NULL,
                region TEXT NOT NULL,
                is_seed INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_status_changes_name_ts ON status_changes(name, timestamp)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_status_changes_location_ts ON status_changes(location, timestamp)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Closes the pool; queries issued afterwards fail. Used on shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    #[instrument(skip(self, event), fields(repo = "events", operation = "record_status_change", service = %event.service_name))]
    pub async fn record_status_change(
        &self,
        event: &StatusChangeEvent,
        seeded: bool,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO status_changes (name, status, timestamp, response_time_ms, location, region, is_seed)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&event.service_name)
        .bind(event.status.as_str())
        .bind(event.timestamp)
        .bind(event.response_time_millis)
        .bind(&event.location)
        .bind(&event.region)
        .bind(seeded as i32)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Records the transition only when it differs from the most recent
    /// stored status for this service (the producer's dedup rule). Returns
    /// whether a row was written.
    pub async fn record_if_changed(&self, event: &StatusChangeEvent) -> anyhow::Result<bool> {
        let latest = self.latest_event(&event.service_name).await?;
        if latest.map(|e| e.status) == Some(event.status) {
            return Ok(false);
        }
        self.record_status_change(event, false).await?;
        Ok(true)
    }

    #[instrument(skip(self, events), fields(repo = "events", operation = "insert_events", events_count = events.len()))]
    pub async fn insert_events(
        &self,
        events: &[StatusChangeEvent],
        seeded: bool,
    ) -> anyhow::Result<()> {
        if events.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for event in events {
            sqlx::query(
                "INSERT INTO status_changes (name, status, timestamp, response_time_ms, location, region, is_seed)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(&event.service_name)
            .bind(event.status.as_str())
            .bind(event.timestamp)
            .bind(event.response_time_millis)
            .bind(&event.location)
            .bind(&event.region)
            .bind(seeded as i32)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Most recent event strictly before `ts` for this service, if any.
    pub async fn most_recent_event_before(
        &self,
        service: &str,
        ts: i64,
    ) -> anyhow::Result<Option<StatusChangeEvent>> {
        let row = sqlx::query(
            "SELECT name, status, timestamp, response_time_ms, location, region
             FROM status_changes WHERE name = $1 AND timestamp < $2
             ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .bind(service)
        .bind(ts)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_event_row).transpose()
    }

    /// Events with timestamp >= `ts` for this service, ascending. Same-millis
    /// events come back in insertion order.
    #[instrument(skip(self), fields(repo = "events", operation = "events_from"))]
    pub async fn events_from(
        &self,
        service: &str,
        ts: i64,
    ) -> anyhow::Result<Vec<StatusChangeEvent>> {
        let rows = sqlx::query(
            "SELECT name, status, timestamp, response_time_ms, location, region
             FROM status_changes WHERE name = $1 AND timestamp >= $2
             ORDER BY timestamp ASC, id ASC",
        )
        .bind(service)
        .bind(ts)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(parse_event_row).collect()
    }

    /// Latest event for this service, if any (current status view).
    pub async fn latest_event(&self, service: &str) -> anyhow::Result<Option<StatusChangeEvent>> {
        let row = sqlx::query(
            "SELECT name, status, timestamp, response_time_ms, location, region
             FROM status_changes WHERE name = $1
             ORDER BY timestamp DESC, id DESC LIMIT 1",
        )
        .bind(service)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(parse_event_row).transpose()
    }

    /// Raw (unmerged) downtime intervals for one location in `[from, to]`,
    /// reconstructed by pairing down->up transitions per service. Callers
    /// merge with `uptime::merge_intervals` for display.
    #[instrument(skip(self), fields(repo = "events", operation = "downtime_intervals"))]
    pub async fn downtime_intervals(
        &self,
        location: &str,
        from: i64,
        to: i64,
    ) -> anyhow::Result<Vec<DowntimeInterval>> {
        let rows = sqlx::query(
            "SELECT name, status, timestamp, response_time_ms, location, region
             FROM status_changes WHERE location = $1 AND timestamp >= $2 AND timestamp <= $3
             ORDER BY name ASC, timestamp ASC, id ASC",
        )
        .bind(location)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        let events: Vec<StatusChangeEvent> =
            rows.iter().map(parse_event_row).collect::<Result<_, _>>()?;
        Ok(pair_transitions(&events, to))
    }

    /// Whether any seed events exist (test-mode indicator).
    pub async fn has_seeded(&self) -> anyhow::Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM status_changes WHERE is_seed = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self), fields(repo = "events", operation = "delete_seeded"))]
    pub async fn delete_seeded(&self) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM status_changes WHERE is_seed = 1")
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    #[instrument(skip(self), fields(repo = "events", operation = "clear_all"))]
    pub async fn clear_all(&self) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM status_changes")
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Delete events older than `cutoff` (retention maintenance).
    #[instrument(skip(self), fields(repo = "events", operation = "prune_old_events"))]
    pub async fn prune_old_events(&self, cutoff: i64) -> anyhow::Result<u64> {
        let r = sqlx::query("DELETE FROM status_changes WHERE timestamp < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(r.rows_affected())
    }

    /// Reclaim space after deletes (run on the vacuum schedule).
    #[instrument(skip(self), fields(repo = "events", operation = "vacuum"))]
    pub async fn vacuum(&self) -> anyhow::Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await?;
        Ok(())
    }
}

fn parse_event_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<StatusChangeEvent> {
    let status: String = row.try_get("status")?;
    Ok(StatusChangeEvent {
        service_name: row.try_get("name")?,
        status: status.parse()?,
        timestamp: row.try_get("timestamp")?,
        response_time_millis: row.try_get("response_time_ms")?,
        location: row.try_get("location")?,
        region: row.try_get("region")?,
    })
}
