// Background maintenance: prune events past retention, then VACUUM on a
// configurable schedule (cron expression or fixed interval).

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Months, Utc};
use tracing::{info, instrument, warn};

use crate::event_repo::EventRepo;

/// Config for the maintenance worker.
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    pub retention_months: u32,
    pub prune_interval_secs: u64,
    /// Optional cron expression for VACUUM (e.g. "0 3 * * *" = 03:00 daily). Uses local time.
    pub vacuum_schedule: Option<String>,
    /// Run VACUUM every N seconds when vacuum_schedule is not set.
    pub vacuum_interval_secs: u64,
}

/// Spawns the maintenance worker. Returns a join handle; send on the oneshot
/// to stop it.
pub fn spawn(
    repo: Arc<EventRepo>,
    config: MaintenanceConfig,
    shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(repo, config, shutdown_rx).await;
    })
}

#[instrument(skip(repo, shutdown_rx), fields(retention_months = config.retention_months))]
async fn run(
    repo: Arc<EventRepo>,
    config: MaintenanceConfig,
    mut shutdown_rx: tokio::sync::oneshot::Receiver<()>,
) {
    let mut prune_tick = tokio::time::interval(Duration::from_secs(config.prune_interval_secs));
    prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let (vacuum_tx, mut vacuum_rx) = tokio::sync::mpsc::channel::<()>(1);
    tokio::spawn(vacuum_scheduler(config.clone(), vacuum_tx));

    loop {
        tokio::select! {
            _ = prune_tick.tick() => {
                match prune_once(&repo, config.retention_months).await {
                    Ok(0) => {}
                    Ok(pruned) => info!(pruned_events = pruned, "pruned events past retention"),
                    Err(e) => warn!(error = %e, "prune failed"),
                }
            }
            _ = vacuum_rx.recv() => {
                if let Err(e) = repo.vacuum().await {
                    warn!(error = %e, "vacuum failed");
                } else {
                    info!("vacuum complete");
                }
            }
            _ = &mut shutdown_rx => {
                tracing::debug!("Maintenance worker shutting down");
                break;
            }
        }
    }
}

/// Deletes events older than `retention_months` calendar months before now.
pub async fn prune_once(repo: &EventRepo, retention_months: u32) -> anyhow::Result<u64> {
    let now = Utc::now();
    let cutoff = now
        .checked_sub_months(Months::new(retention_months))
        .unwrap_or(now)
        .timestamp_millis();
    repo.prune_old_events(cutoff).await
}

/// Sends a message on `tx` at each VACUUM time (cron or fixed interval). Uses local time for cron.
async fn vacuum_scheduler(config: MaintenanceConfig, tx: tokio::sync::mpsc::Sender<()>) {
    if let Some(ref cron_str) = config.vacuum_schedule {
        let Ok(schedule) = cron::Schedule::from_str(cron_str) else {
            warn!(cron = %cron_str, "invalid vacuum_schedule; VACUUM will not run");
            return;
        };
        loop {
            let now = chrono::Local::now();
            let next = schedule.after(&now).next();
            if let Some(next) = next {
                let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
                tokio::time::sleep(delay).await;
                if tx.send(()).await.is_err() {
                    break;
                }
            } else {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        }
    } else {
        let interval = Duration::from_secs(config.vacuum_interval_secs);
        loop {
            tokio::time::sleep(interval).await;
            if tx.send(()).await.is_err() {
                break;
            }
        }
    }
}
