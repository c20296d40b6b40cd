//! Input validation and formatting.
//!
//! Handles:
//! - RUT check-digit verification and `12.345.678-5` formatting
//! - Chilean phone validation and `+56 9 XXXX XXXX` formatting
//! - Patient form validation with field-keyed errors
//!
//! Everything here is a pure function over its inputs: validators return
//! booleans or error maps, formatters return strings, nothing fails.

mod form;
mod identity;
mod phone;

pub use form::{calculate_age, validate_email, validate_patient_form, FormErrors, PatientForm};
pub use identity::{format_national_id, validate_national_id};
pub use phone::{format_phone, validate_phone};
