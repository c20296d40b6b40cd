//! Chair operations on the domain store.
//!
//! Assign and release are the only paths that touch both a chair's occupancy
//! and the matching patient's `assigned_chair`, which keeps the two
//! collections mutually consistent.

use tracing::debug;

use super::{ClinicStore, Release, StoreError, StoreResult};
use crate::models::{Chair, ChairState, VisitRecord};
use crate::storage::KvStore;

impl<S: KvStore> ClinicStore<S> {
    /// Seat a patient in a chair, starting a session at the current instant.
    /// The chair must exist and be free; the patient must exist and not
    /// already occupy a chair.
    pub fn assign_patient_to_chair(&mut self, patient_id: &str, chair_id: &str) -> StoreResult<()> {
        let patient_idx = self
            .patients
            .iter()
            .position(|p| p.id == patient_id)
            .ok_or_else(|| StoreError::PatientNotFound(patient_id.to_string()))?;
        if let Some(held) = &self.patients[patient_idx].assigned_chair {
            return Err(StoreError::PatientAlreadySeated {
                patient_id: patient_id.to_string(),
                chair_id: held.clone(),
            });
        }

        let chair_idx = self
            .chairs
            .iter()
            .position(|c| c.id == chair_id)
            .ok_or_else(|| StoreError::ChairNotFound(chair_id.to_string()))?;
        if self.chairs[chair_idx].is_occupied() {
            return Err(StoreError::ChairOccupied(chair_id.to_string()));
        }

        let now = self.now();
        self.chairs[chair_idx].state = ChairState::Occupied {
            patient_id: patient_id.to_string(),
            started_at: now,
        };
        let patient = &mut self.patients[patient_idx];
        patient.assigned_chair = Some(chair_id.to_string());
        patient.updated_at = now;

        self.persist_chairs()?;
        self.persist_patients()?;

        debug!(%patient_id, %chair_id, "assigned patient to chair");
        Ok(())
    }

    /// End the session on a chair. Closes a visit record with the floored
    /// whole-minute duration, frees the chair, and clears the patient's chair
    /// reference. Releasing a free chair is a no-op result; an unknown chair
    /// id fails with [`StoreError::ChairNotFound`].
    pub fn release_chair(&mut self, chair_id: &str) -> StoreResult<Release> {
        let chair_idx = self
            .chairs
            .iter()
            .position(|c| c.id == chair_id)
            .ok_or_else(|| StoreError::ChairNotFound(chair_id.to_string()))?;

        let (patient_id, started_at) = match &self.chairs[chair_idx].state {
            ChairState::Free => {
                return Ok(Release {
                    patient: None,
                    duration_minutes: 0,
                })
            }
            ChairState::Occupied {
                patient_id,
                started_at,
            } => (patient_id.clone(), *started_at),
        };

        let now = self.now();
        let visit = VisitRecord::close(patient_id.clone(), chair_id.to_string(), started_at, now);
        let duration_minutes = visit.duration_minutes;
        self.visit_history.push(visit);

        self.chairs[chair_idx].state = ChairState::Free;
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .map(|p| {
                p.assigned_chair = None;
                p.updated_at = now;
                p.clone()
            });

        self.persist_chairs()?;
        self.persist_patients()?;
        self.persist_history()?;

        debug!(%chair_id, duration_minutes, "released chair");
        Ok(Release {
            patient,
            duration_minutes,
        })
    }

    /// Add a new free chair numbered one past the highest existing numeric
    /// suffix. Gaps left by deletions are never reused.
    pub fn add_chair(&mut self) -> StoreResult<Chair> {
        let next = self
            .chairs
            .iter()
            .filter_map(Chair::number)
            .max()
            .map_or(1, |max| max + 1);

        let chair = Chair::new(next);
        self.chairs.push(chair.clone());
        self.persist_chairs()?;

        debug!(id = %chair.id, "added chair");
        Ok(chair)
    }

    /// Remove a chair. Fails for an unknown id or an occupied chair.
    pub fn delete_chair(&mut self, chair_id: &str) -> StoreResult<()> {
        let idx = self
            .chairs
            .iter()
            .position(|c| c.id == chair_id)
            .ok_or_else(|| StoreError::ChairNotFound(chair_id.to_string()))?;
        if self.chairs[idx].is_occupied() {
            return Err(StoreError::ChairOccupied(chair_id.to_string()));
        }

        self.chairs.remove(idx);
        self.persist_chairs()
    }

    /// Replace a chair's occupancy state wholesale. The state enum makes an
    /// occupied-without-start update unrepresentable; consistency with the
    /// patient collection is the caller's responsibility here.
    pub fn update_chair(&mut self, chair_id: &str, state: ChairState) -> StoreResult<()> {
        let chair = self
            .chairs
            .iter_mut()
            .find(|c| c.id == chair_id)
            .ok_or_else(|| StoreError::ChairNotFound(chair_id.to_string()))?;

        chair.state = state;
        self.persist_chairs()
    }
}
