// Service reference data and up/down status

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Observed service state. Stored as lowercase text in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Up,
    Down,
}

impl ServiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceStatus::Up => "up",
            ServiceStatus::Down => "down",
        }
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(ServiceStatus::Up),
            "down" => Ok(ServiceStatus::Down),
            other => anyhow::bail!("unknown service status: {}", other),
        }
    }
}

/// One monitored service. Loaded from config at startup; read-only reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub name: String,
    pub url: String,
    pub region: String,
    pub location: String,
    pub check: CheckConfig,
}

/// How the upstream prober decides a service is up. Carried as reference data;
/// the probing itself runs outside this process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckConfig {
    /// Response body must equal this JSON document.
    Json { expected: serde_json::Value },
    /// HTTP status code must match.
    HttpStatus { expected: u16 },
    /// A single key in the JSON response must hold this value.
    JsonKey { key: String, value: serde_json::Value },
    /// Response text must contain this substring.
    Text { contains: String },
}
