// Domain models (services, status-change events, uptime reports)

mod event;
mod report;
mod service;

pub use event::{DowntimeInterval, StatusChangeEvent};
pub use report::UptimeReport;
pub use service::{CheckConfig, Service, ServiceStatus};
