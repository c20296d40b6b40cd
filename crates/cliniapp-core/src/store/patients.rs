//! Patient operations on the domain store.

use tracing::debug;

use super::{ClinicStore, StoreError, StoreResult};
use crate::models::{NewPatient, Patient, PatientPatch};
use crate::storage::KvStore;

impl<S: KvStore> ClinicStore<S> {
    /// Register a new patient. Assigns a fresh id, the next clinic-wide visit
    /// number (persisted, never reused), and equal creation/update
    /// timestamps. Returns the created record.
    pub fn add_patient(&mut self, data: NewPatient) -> StoreResult<Patient> {
        let now = self.now();

        self.visit_counter += 1;
        self.persist_counter()?;

        let patient = Patient::new(data, self.visit_counter, now);
        self.patients.push(patient.clone());
        self.persist_patients()?;

        debug!(id = %patient.id, visit_number = patient.visit_number, "added patient");
        Ok(patient)
    }

    /// Apply a partial update to an existing patient and refresh its update
    /// timestamp. Fails with [`StoreError::PatientNotFound`] for an unknown
    /// id. Returns the updated record.
    pub fn update_patient(&mut self, patient_id: &str, patch: PatientPatch) -> StoreResult<Patient> {
        let now = self.now();
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))?;

        patient.apply(patch, now);
        let updated = patient.clone();
        self.persist_patients()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;
    use crate::models::IdDocumentKind;
    use crate::storage::MemoryStore;

    fn new_patient(name: &str) -> NewPatient {
        NewPatient {
            name: name.into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 5, 12).unwrap(),
            id_kind: IdDocumentKind::NationalId,
            id_value: "12.345.678-5".into(),
            phone: None,
            email: None,
            medical_notes: None,
        }
    }

    fn fixed_store() -> ClinicStore<MemoryStore> {
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());
        let mut store = ClinicStore::with_clock(MemoryStore::new(), clock);
        store.load().unwrap();
        store
    }

    #[test]
    fn test_add_patient_assigns_sequential_visit_numbers() {
        let mut store = fixed_store();
        let a = store.add_patient(new_patient("Ana")).unwrap();
        let b = store.add_patient(new_patient("Beto")).unwrap();
        assert_eq!(a.visit_number, 1);
        assert_eq!(b.visit_number, 2);
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn test_visit_counter_survives_reload() {
        let mut store = fixed_store();
        store.add_patient(new_patient("Ana")).unwrap();
        store.add_patient(new_patient("Beto")).unwrap();

        store.load().unwrap();
        let c = store.add_patient(new_patient("Carla")).unwrap();
        assert_eq!(c.visit_number, 3);
    }

    #[test]
    fn test_update_patient_merges_and_stamps() {
        let mut store = fixed_store();
        let ana = store.add_patient(new_patient("Ana")).unwrap();

        let updated = store
            .update_patient(
                &ana.id,
                PatientPatch {
                    phone: Some(Some("912345678".into())),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.phone, Some("912345678".into()));
        assert_eq!(updated.name, "Ana");
        assert_eq!(updated.visit_number, ana.visit_number);
    }

    #[test]
    fn test_update_missing_patient_fails() {
        let mut store = fixed_store();
        let err = store
            .update_patient("patient-nope", PatientPatch::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::PatientNotFound(_)));
    }
}
