//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::controller::StatusSnapshot;

/// Response for action endpoints: what was applied plus the post-action view.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub view: StatusSnapshot,
}

impl ActionResponse {
    /// Create a new action response
    pub fn applied(message: String, view: StatusSnapshot) -> Self {
        Self {
            status: "applied".to_string(),
            message,
            timestamp: Utc::now(),
            view,
        }
    }
}

/// Full status response with countdown and server metadata
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub view: StatusSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Body of `PUT /settings/draft`. Values beyond the field bounds are clamped,
/// never rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Body of `POST /settings/preset`.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetRequest {
    pub label: String,
}
