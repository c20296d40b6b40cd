//! Domain types for the clinic tracker.

mod chair;
mod patient;
mod visit;

pub use chair::{Chair, ChairState, CHAIR_ID_PREFIX};
pub use patient::{IdDocumentKind, NewPatient, Patient, PatientPatch};
pub use visit::VisitRecord;
