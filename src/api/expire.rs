use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorKind, ExpireError},
    models::{iso_timestamp, ExpiredEvent},
};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpireSummary {
    pub success: bool,
    pub message: String,
    pub expired_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expired_events: Option<Vec<ExpiredEvent>>,
    pub timestamp: String,
}

impl ExpireSummary {
    pub fn nothing_to_expire(now: DateTime<Utc>) -> Self {
        ExpireSummary {
            success: true,
            message: "No events to expire".to_string(),
            expired_count: 0,
            expired_events: None,
            timestamp: iso_timestamp(now),
        }
    }

    pub fn expired(expired_events: Vec<ExpiredEvent>, now: DateTime<Utc>) -> Self {
        ExpireSummary {
            success: true,
            message: format!("Successfully expired {} events", expired_events.len()),
            expired_count: expired_events.len(),
            expired_events: Some(expired_events),
            timestamp: iso_timestamp(now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpireFailure {
    pub success: bool,
    pub error: String,
    pub error_kind: ErrorKind,
    pub timestamp: String,
}

impl ExpireFailure {
    pub fn new(error: &ExpireError, at: DateTime<Utc>) -> Self {
        ExpireFailure {
            success: false,
            error: error.to_string(),
            error_kind: error.kind(),
            timestamp: iso_timestamp(at),
        }
    }
}
