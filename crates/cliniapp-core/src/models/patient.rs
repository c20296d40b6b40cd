//! Patient models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Kind of identity document a patient registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdDocumentKind {
    /// Chilean RUT (carries a check digit).
    #[default]
    NationalId,
    /// Foreign passport (free-form value).
    Passport,
}

/// A patient on the clinic roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Unique id, `patient-<uuid>`, generated at creation
    pub id: String,
    /// Full name
    pub name: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Identity document kind
    pub id_kind: IdDocumentKind,
    /// Identity document value (RUT or passport number)
    pub id_value: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Free-text medical notes
    pub medical_notes: Option<String>,
    /// Clinic-wide visit sequence number, assigned once at creation
    pub visit_number: u64,
    /// Id of the chair this patient currently occupies, if any
    pub assigned_chair: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Build a patient from form data, a visit number, and a creation instant.
    pub fn new(data: NewPatient, visit_number: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: format!("patient-{}", uuid::Uuid::new_v4()),
            name: data.name,
            birth_date: data.birth_date,
            id_kind: data.id_kind,
            id_value: data.id_value,
            phone: data.phone,
            email: data.email,
            medical_notes: data.medical_notes,
            visit_number,
            assigned_chair: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check whether this patient currently occupies a chair.
    pub fn is_seated(&self) -> bool {
        self.assigned_chair.is_some()
    }

    /// Apply a patch, leaving unset fields untouched.
    pub fn apply(&mut self, patch: PatientPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(birth_date) = patch.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(id_kind) = patch.id_kind {
            self.id_kind = id_kind;
        }
        if let Some(id_value) = patch.id_value {
            self.id_value = id_value;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(medical_notes) = patch.medical_notes {
            self.medical_notes = medical_notes;
        }
        self.updated_at = now;
    }
}

/// Input data for creating a patient. Id, visit number, and timestamps are
/// assigned by the store.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: String,
    pub birth_date: NaiveDate,
    pub id_kind: IdDocumentKind,
    pub id_value: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub medical_notes: Option<String>,
}

/// Partial update for a patient. Only mutable fields appear here; the visit
/// number, chair reference, and timestamps cannot be patched directly.
///
/// Optional patient fields take a nested `Option`: `Some(None)` clears,
/// `None` leaves untouched.
#[derive(Debug, Clone, Default)]
pub struct PatientPatch {
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub id_kind: Option<IdDocumentKind>,
    pub id_value: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub medical_notes: Option<Option<String>>,
}
