//! Treatment chair models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chair ids are `silla-<n>` with an unpadded positive suffix.
pub const CHAIR_ID_PREFIX: &str = "silla-";

/// Occupancy state of a chair. An occupied chair always carries its occupant
/// and session start; a free chair carries neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChairState {
    Free,
    Occupied {
        patient_id: String,
        started_at: DateTime<Utc>,
    },
}

/// A treatment chair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chair {
    /// Stable id, `silla-<n>`
    pub id: String,
    #[serde(flatten)]
    pub state: ChairState,
}

impl Chair {
    /// Create a free chair with the given number.
    pub fn new(number: u32) -> Self {
        Self {
            id: format!("{CHAIR_ID_PREFIX}{number}"),
            state: ChairState::Free,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self.state, ChairState::Occupied { .. })
    }

    /// Numeric suffix of the chair id, if the id follows the `silla-<n>` form.
    pub fn number(&self) -> Option<u32> {
        self.id.strip_prefix(CHAIR_ID_PREFIX)?.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_chair_is_free() {
        let chair = Chair::new(3);
        assert_eq!(chair.id, "silla-3");
        assert!(!chair.is_occupied());
        assert_eq!(chair.number(), Some(3));
    }

    #[test]
    fn test_number_rejects_foreign_ids() {
        let chair = Chair {
            id: "seat-9".into(),
            state: ChairState::Free,
        };
        assert_eq!(chair.number(), None);
    }

    #[test]
    fn test_serde_shape() {
        let free = Chair::new(1);
        let json = serde_json::to_value(&free).unwrap();
        assert_eq!(json["state"], "free");
        assert!(json.get("patient_id").is_none());

        let occupied = Chair {
            id: "silla-2".into(),
            state: ChairState::Occupied {
                patient_id: "patient-x".into(),
                started_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
            },
        };
        let json = serde_json::to_value(&occupied).unwrap();
        assert_eq!(json["state"], "occupied");
        assert_eq!(json["patient_id"], "patient-x");

        let back: Chair = serde_json::from_value(json).unwrap();
        assert_eq!(back, occupied);
    }
}
