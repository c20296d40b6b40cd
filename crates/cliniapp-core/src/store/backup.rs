//! Full-dataset backup: export, import, and reset.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{ClinicStore, StoreError, StoreResult};
use crate::models::{Chair, Patient, VisitRecord};
use crate::storage::KvStore;

/// Version string stamped into export payloads.
pub const BACKUP_VERSION: &str = "1.0";

/// The exported dataset. Field names match the original app's backup files,
/// so exports remain interchangeable with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupPayload {
    pub patients: Vec<Patient>,
    pub chairs: Vec<Chair>,
    pub visit_history: Vec<VisitRecord>,
    pub export_date: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub metadata: BackupMetadata,
}

/// Collection counts at export time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupMetadata {
    pub total_patients: usize,
    pub total_chairs: usize,
    pub total_visits: usize,
}

impl<S: KvStore> ClinicStore<S> {
    /// Serialize the whole dataset as pretty-printed JSON.
    pub fn export_data(&self) -> StoreResult<String> {
        let payload = BackupPayload {
            patients: self.patients.clone(),
            chairs: self.chairs.clone(),
            visit_history: self.visit_history.clone(),
            export_date: self.now(),
            version: BACKUP_VERSION.to_string(),
            metadata: BackupMetadata {
                total_patients: self.patients.len(),
                total_chairs: self.chairs.len(),
                total_visits: self.visit_history.len(),
            },
        };
        Ok(serde_json::to_string_pretty(&payload)?)
    }

    /// Replace all collections with the contents of an exported payload and
    /// persist them. The payload must carry array-typed `patients`, `chairs`,
    /// and `visitHistory` fields; anything else fails with
    /// [`StoreError::ImportFormat`].
    pub fn import_data(&mut self, json: &str) -> StoreResult<()> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| StoreError::ImportFormat(format!("not valid JSON: {e}")))?;

        for field in ["patients", "chairs", "visitHistory"] {
            match value.get(field) {
                Some(v) if v.is_array() => {}
                Some(_) => {
                    return Err(StoreError::ImportFormat(format!(
                        "field `{field}` is not an array"
                    )))
                }
                None => {
                    return Err(StoreError::ImportFormat(format!(
                        "missing field `{field}`"
                    )))
                }
            }
        }

        let patients: Vec<Patient> = decode(value["patients"].clone(), "patient")?;
        let chairs: Vec<Chair> = decode(value["chairs"].clone(), "chair")?;
        let visit_history: Vec<VisitRecord> = decode(value["visitHistory"].clone(), "visit")?;

        self.patients = patients;
        self.chairs = chairs;
        self.visit_history = visit_history;

        self.persist_patients()?;
        self.persist_chairs()?;
        self.persist_history()?;

        debug!(
            patients = self.patients.len(),
            chairs = self.chairs.len(),
            visits = self.visit_history.len(),
            "imported dataset"
        );
        Ok(())
    }

    /// Reset to the initial state: no patients, no history, the six-chair
    /// seed, and a zeroed visit counter. All persisted.
    pub fn clear_all(&mut self) -> StoreResult<()> {
        self.patients.clear();
        self.chairs = super::seed_chairs();
        self.visit_history.clear();
        self.visit_counter = 0;

        self.persist_patients()?;
        self.persist_chairs()?;
        self.persist_history()?;
        self.persist_counter()?;

        debug!("cleared all clinic data");
        Ok(())
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value, what: &str) -> StoreResult<Vec<T>> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::ImportFormat(format!("bad {what} entry: {e}")))
}
