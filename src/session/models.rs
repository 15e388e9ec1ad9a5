//! Data models for session tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overview of one named session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub name: String,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_recorded: Option<DateTime<Utc>>,
}
