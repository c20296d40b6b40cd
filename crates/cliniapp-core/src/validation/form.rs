//! Patient form validation.
//!
//! Form-level checks return a [`FormErrors`] map keyed by field name so the
//! UI can surface each problem next to its input. Validation never fails as
//! an `Err`; an empty map means the form is acceptable.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use super::{validate_national_id, validate_phone};
use crate::models::IdDocumentKind;

/// Raw patient form input, as typed. Parsing and normalization happen during
/// validation; optional fields are empty strings when left blank.
#[derive(Debug, Clone, Default)]
pub struct PatientForm {
    pub name: String,
    /// ISO date, `YYYY-MM-DD`
    pub birth_date: String,
    pub id_kind: IdDocumentKind,
    pub id_value: String,
    pub phone: String,
    pub email: String,
    pub medical_notes: String,
}

/// Field-keyed validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FormErrors {
    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Error message for a field, if any.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Age in whole years at the date `on`, calendar-aware: one year is
/// subtracted when the month/day of `on` precedes the birthday.
pub fn calculate_age(birth: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth.year();
    if (on.month(), on.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

/// Minimal email shape check: local and domain parts around a single `@`,
/// a dot inside the domain, no whitespace anywhere.
pub fn validate_email(raw: &str) -> bool {
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = raw.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let chars: Vec<char> = domain.chars().collect();
    chars.len() >= 3 && chars[1..chars.len() - 1].contains(&'.')
}

/// Validate a patient form against `today` (from the caller's clock).
pub fn validate_patient_form(form: &PatientForm, today: NaiveDate) -> FormErrors {
    let mut errors = FormErrors::default();

    let name = form.name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required");
    } else if name.chars().count() < 2 {
        errors.insert("name", "Name must be at least 2 characters");
    }

    if form.birth_date.trim().is_empty() {
        errors.insert("birth_date", "Birth date is required");
    } else {
        match NaiveDate::parse_from_str(form.birth_date.trim(), "%Y-%m-%d") {
            Ok(birth) => {
                if birth > today {
                    errors.insert("birth_date", "Birth date cannot be in the future");
                } else if calculate_age(birth, today) < 1 {
                    errors.insert("birth_date", "Birth date is not valid");
                }
            }
            Err(_) => {
                errors.insert("birth_date", "Birth date must be YYYY-MM-DD");
            }
        }
    }

    let id_value = form.id_value.trim();
    match form.id_kind {
        IdDocumentKind::NationalId => {
            if id_value.is_empty() {
                errors.insert("id_value", "RUT is required");
            } else if !has_rut_shape(id_value) {
                errors.insert(
                    "id_value",
                    "RUT format is not valid (e.g. 12.345.678-9 or 12.345.678-K)",
                );
            } else if !validate_national_id(id_value) {
                errors.insert("id_value", "RUT is not valid");
            }
        }
        IdDocumentKind::Passport => {
            if id_value.is_empty() {
                errors.insert("id_value", "Passport number is required");
            } else if id_value.chars().count() < 3 {
                errors.insert("id_value", "Passport number must be at least 3 characters");
            }
        }
    }

    if !form.phone.trim().is_empty() && !validate_phone(&form.phone) {
        errors.insert("phone", "Phone format is not valid (e.g. +56 9 1234 5678)");
    }

    if !form.email.trim().is_empty() && !validate_email(form.email.trim()) {
        errors.insert("email", "Email format is not valid");
    }

    errors
}

/// Basic RUT shape: 7-8 digit body plus one check character, ignoring
/// separators. Distinguishes "badly formed" from "wrong check digit" in the
/// error messages.
fn has_rut_shape(raw: &str) -> bool {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !cleaned.is_ascii() || !(8..=9).contains(&cleaned.len()) {
        return false;
    }
    let body = &cleaned[..cleaned.len() - 1];
    let dv = cleaned.as_bytes()[cleaned.len() - 1] as char;
    body.chars().all(|c| c.is_ascii_digit()) && (dv.is_ascii_digit() || dv == 'K')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PatientForm {
        PatientForm {
            name: "Ana Rojas".into(),
            birth_date: "1990-05-12".into(),
            id_kind: IdDocumentKind::NationalId,
            id_value: "12.345.678-5".into(),
            phone: "912345678".into(),
            email: "ana@example.com".into(),
            medical_notes: String::new(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let errors = validate_patient_form(&valid_form(), today());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }

    #[test]
    fn test_name_errors() {
        let mut form = valid_form();
        form.name = "  ".into();
        let errors = validate_patient_form(&form, today());
        assert_eq!(errors.get("name"), Some("Name is required"));

        form.name = "A".into();
        let errors = validate_patient_form(&form, today());
        assert_eq!(errors.get("name"), Some("Name must be at least 2 characters"));
    }

    #[test]
    fn test_birth_date_errors() {
        let mut form = valid_form();
        form.birth_date = "12/05/1990".into();
        let errors = validate_patient_form(&form, today());
        assert_eq!(errors.get("birth_date"), Some("Birth date must be YYYY-MM-DD"));

        form.birth_date = "2030-01-01".into();
        let errors = validate_patient_form(&form, today());
        assert_eq!(
            errors.get("birth_date"),
            Some("Birth date cannot be in the future")
        );

        // under a year old
        form.birth_date = "2023-09-01".into();
        let errors = validate_patient_form(&form, today());
        assert_eq!(errors.get("birth_date"), Some("Birth date is not valid"));
    }

    #[test]
    fn test_rut_shape_vs_check_digit() {
        let mut form = valid_form();
        form.id_value = "12.345.678-6".into(); // right shape, wrong dv
        let errors = validate_patient_form(&form, today());
        assert_eq!(errors.get("id_value"), Some("RUT is not valid"));

        form.id_value = "12-34".into();
        let errors = validate_patient_form(&form, today());
        assert!(errors.get("id_value").unwrap().contains("format"));
    }

    #[test]
    fn test_passport_minimum_length() {
        let mut form = valid_form();
        form.id_kind = IdDocumentKind::Passport;
        form.id_value = "AB".into();
        let errors = validate_patient_form(&form, today());
        assert!(errors.get("id_value").is_some());

        form.id_value = "AB123456".into();
        let errors = validate_patient_form(&form, today());
        assert!(errors.get("id_value").is_none());
    }

    #[test]
    fn test_optional_fields_only_checked_when_present() {
        let mut form = valid_form();
        form.phone = String::new();
        form.email = String::new();
        let errors = validate_patient_form(&form, today());
        assert!(errors.is_empty());

        form.phone = "123".into();
        form.email = "not-an-email".into();
        let errors = validate_patient_form(&form, today());
        assert!(errors.get("phone").is_some());
        assert!(errors.get("email").is_some());
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_calculate_age() {
        let birth = NaiveDate::from_ymd_opt(1990, 5, 12).unwrap();
        assert_eq!(calculate_age(birth, NaiveDate::from_ymd_opt(2024, 5, 11).unwrap()), 33);
        assert_eq!(calculate_age(birth, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap()), 34);
        assert_eq!(calculate_age(birth, NaiveDate::from_ymd_opt(2024, 5, 13).unwrap()), 34);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana@example.com"));
        assert!(validate_email("a.b@sub.example.com"));
        assert!(!validate_email("ana@example"));
        assert!(!validate_email("ana example@x.cl"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("ana@"));
        assert!(!validate_email("ana@@example.com"));
    }
}
