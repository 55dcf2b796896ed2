//! Health reporting for the connection pool
//!
//! A probe either succeeds within its timeout, giving an `up` report with
//! pool statistics and an advisory message, or it fails and gives a `down`
//! report carrying the cause.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

pub const HEALTHY_MESSAGE: &str = "It's healthy";
pub const HEAVY_LOAD_MESSAGE: &str = "The database is experiencing heavy load.";
pub const HIGH_WAIT_MESSAGE: &str =
    "The database has a high number of wait events, indicating potential bottlenecks.";
pub const IDLE_CLOSED_MESSAGE: &str =
    "Many idle connections are being closed, consider revising the connection pool settings.";
pub const LIFETIME_CLOSED_MESSAGE: &str = "Many connections are being closed due to max lifetime, consider increasing max lifetime or revising the connection usage pattern.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Up => "up",
            HealthStatus::Down => "down",
        }
    }
}

/// Limits above which an `up` report carries a warning message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    #[serde(default = "default_heavy_load_connections")]
    pub heavy_load_connections: u32,
    #[serde(default = "default_high_wait_count")]
    pub high_wait_count: u64,
}

fn default_heavy_load_connections() -> u32 {
    40
}

fn default_high_wait_count() -> u64 {
    1000
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            heavy_load_connections: default_heavy_load_connections(),
            high_wait_count: default_high_wait_count(),
        }
    }
}

/// Point-in-time pool statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PoolStats {
    pub open_connections: u32,
    pub in_use: u32,
    pub idle: u32,
    pub wait_count: u64,
    #[serde(serialize_with = "serialize_duration")]
    pub wait_duration: Duration,
    pub max_idle_closed: u64,
    pub max_lifetime_closed: u64,
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

/// Human-readable duration, e.g. "0ns", "1.5ms", "2s"
pub fn format_duration(duration: Duration) -> String {
    format!("{:?}", duration)
}

impl PoolStats {
    /// Pick the advisory message for these statistics.
    ///
    /// Rules are checked in order and the last one that matches wins.
    pub fn advisory_message(&self, thresholds: &HealthThresholds) -> &'static str {
        let mut message = HEALTHY_MESSAGE;
        let half_open = u64::from(self.open_connections) / 2;

        if self.open_connections > thresholds.heavy_load_connections {
            message = HEAVY_LOAD_MESSAGE;
        }
        if self.wait_count > thresholds.high_wait_count {
            message = HIGH_WAIT_MESSAGE;
        }
        if self.max_idle_closed > half_open {
            message = IDLE_CLOSED_MESSAGE;
        }
        if self.max_lifetime_closed > half_open {
            message = LIFETIME_CLOSED_MESSAGE;
        }
        message
    }
}

/// Result of a health probe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PoolStats>,
}

impl HealthReport {
    pub fn up(stats: PoolStats, thresholds: &HealthThresholds) -> Self {
        Self {
            status: HealthStatus::Up,
            message: Some(stats.advisory_message(thresholds).to_string()),
            error: None,
            stats: Some(stats),
        }
    }

    pub fn down(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Down,
            message: None,
            error: Some(error.into()),
            stats: None,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == HealthStatus::Up
    }

    /// Flatten into string key/value pairs
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("status".to_string(), self.status.as_str().to_string());
        if let Some(message) = &self.message {
            map.insert("message".to_string(), message.clone());
        }
        if let Some(error) = &self.error {
            map.insert("error".to_string(), error.clone());
        }
        if let Some(stats) = &self.stats {
            map.insert("open_connections".to_string(), stats.open_connections.to_string());
            map.insert("in_use".to_string(), stats.in_use.to_string());
            map.insert("idle".to_string(), stats.idle.to_string());
            map.insert("wait_count".to_string(), stats.wait_count.to_string());
            map.insert("wait_duration".to_string(), format_duration(stats.wait_duration));
            map.insert("max_idle_closed".to_string(), stats.max_idle_closed.to_string());
            map.insert(
                "max_lifetime_closed".to_string(),
                stats.max_lifetime_closed.to_string(),
            );
        }
        map
    }
}

/// Run a connectivity probe under `timeout`.
///
/// Returns the "db down: ..." description on failure or timeout.
pub async fn run_probe<F, T>(probe: F, timeout: Duration) -> Result<T, String>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, probe).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(format!("db down: {}", e)),
        Err(_) => Err(format!(
            "db down: health probe timed out after {}",
            format_duration(timeout)
        )),
    }
}
