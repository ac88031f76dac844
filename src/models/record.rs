use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finalized stopwatch run: the formatted duration plus whatever note the
/// user attached when stopping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub duration: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(duration: String, note: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            duration,
            note,
            created_at: Utc::now(),
        }
    }
}
