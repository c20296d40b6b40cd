//! Closed-session visit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable record of one chair-occupancy session, created when the chair
/// is released and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Unique id, `visit-<uuid>`
    pub id: String,
    pub patient_id: String,
    pub chair_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Whole minutes, floor((ended_at - started_at) / 60s)
    pub duration_minutes: i64,
}

impl VisitRecord {
    /// Close a session over the given interval. Duration is floored to whole
    /// minutes.
    pub fn close(
        patient_id: String,
        chair_id: String,
        started_at: DateTime<Utc>,
        ended_at: DateTime<Utc>,
    ) -> Self {
        let duration_minutes = (ended_at - started_at).num_minutes();
        Self {
            id: format!("visit-{}", uuid::Uuid::new_v4()),
            patient_id,
            chair_id,
            started_at,
            ended_at,
            duration_minutes,
        }
    }
}
