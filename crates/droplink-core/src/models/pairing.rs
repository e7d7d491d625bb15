use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A device that registered interest in a pairing code. Joins are counted,
/// nothing more; the id grants no capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceJoin {
    pub id: Uuid,
    pub joined_at: DateTime<Utc>,
}

/// An active pairing code and its append-only join history.
#[derive(Debug, Clone)]
pub struct PairingCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub joins: Vec<DeviceJoin>,
}

impl PairingCode {
    pub fn new(code: String, created_at: DateTime<Utc>) -> Self {
        Self {
            code,
            created_at,
            joins: Vec::new(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at > ttl
    }
}

/// Response payload for a freshly generated pairing code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CodeIssued {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Join-count summary for an active pairing code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub code: String,
    pub device_count: usize,
    pub created_at: DateTime<Utc>,
}
