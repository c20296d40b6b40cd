//! Daily chair-usage reports.
//!
//! Reports cover only the visits whose session started on the reporter's
//! date (taken from the store's clock). Empty days produce well-formed
//! "no data" output rather than errors.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{Patient, VisitRecord, CHAIR_ID_PREFIX};
use crate::storage::KvStore;
use crate::store::ClinicStore;

/// Render a whole-minute duration as `{h}h {m}m`, or `{m}m` under an hour.
pub fn format_duration(minutes: i64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// Chair-usage reporter over a snapshot of patients and history.
pub struct UsageReporter<'a> {
    patients: &'a [Patient],
    visits: &'a [VisitRecord],
    date: NaiveDate,
}

impl<'a> UsageReporter<'a> {
    /// Report on the store's current snapshot for its current date.
    pub fn for_store<S: KvStore>(store: &'a ClinicStore<S>) -> Self {
        Self::new(store.patients(), store.visit_history(), store.today())
    }

    pub fn new(patients: &'a [Patient], visits: &'a [VisitRecord], date: NaiveDate) -> Self {
        Self {
            patients,
            visits,
            date,
        }
    }

    /// Visits whose session started on the report date.
    fn day_visits(&self) -> Vec<&'a VisitRecord> {
        self.visits
            .iter()
            .filter(|v| v.started_at.date_naive() == self.date)
            .collect()
    }

    fn patient_name(&self, patient_id: &str) -> &str {
        self.patients
            .iter()
            .find(|p| p.id == patient_id)
            .map_or("Unknown patient", |p| p.name.as_str())
    }

    fn patient_id_value(&self, patient_id: &str) -> &str {
        self.patients
            .iter()
            .find(|p| p.id == patient_id)
            .map_or("N/A", |p| p.id_value.as_str())
    }

    /// Plain-text report: generation date, summary, then a per-chair
    /// breakdown. Chairs sort lexicographically by id (suffixes are not
    /// zero-padded, so "silla-10" sorts before "silla-2").
    pub fn to_text(&self) -> String {
        let date = self.date.format("%d-%m-%Y");
        let visits = self.day_visits();

        if visits.is_empty() {
            return format!(
                "CHAIR USAGE REPORT\nGenerated on: {date}\n\nNo usage recorded for today."
            );
        }

        let mut by_chair: BTreeMap<&str, Vec<&VisitRecord>> = BTreeMap::new();
        for visit in &visits {
            by_chair.entry(visit.chair_id.as_str()).or_default().push(visit);
        }

        let total_minutes: i64 = visits.iter().map(|v| v.duration_minutes).sum();
        let mut patient_ids: Vec<&str> = visits.iter().map(|v| v.patient_id.as_str()).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let mut report = String::new();
        report.push_str("CHAIR USAGE REPORT\n");
        report.push_str(&format!("Generated on: {date}\n"));
        report.push_str("Period: current day\n\n");

        report.push_str("SUMMARY:\n");
        report.push_str(&format!("- Chairs used: {}\n", by_chair.len()));
        report.push_str(&format!(
            "- Total usage time: {}\n",
            format_duration(total_minutes)
        ));
        report.push_str(&format!("- Patients seen: {}\n\n", patient_ids.len()));

        report.push_str("PER-CHAIR DETAIL:\n\n");
        for (chair_id, chair_visits) in &by_chair {
            let number = chair_id.strip_prefix(CHAIR_ID_PREFIX).unwrap_or(chair_id);
            let chair_minutes: i64 = chair_visits.iter().map(|v| v.duration_minutes).sum();

            report.push_str(&format!("CHAIR {number}:\n"));
            report.push_str(&format!(
                "  - Total usage time: {}\n",
                format_duration(chair_minutes)
            ));
            report.push_str(&format!("  - Sessions: {}\n", chair_visits.len()));
            for visit in chair_visits {
                report.push_str(&format!(
                    "  - {} ({}) - {}\n",
                    self.patient_name(&visit.patient_id),
                    self.patient_id_value(&visit.patient_id),
                    format_duration(visit.duration_minutes)
                ));
            }
            report.push('\n');
        }

        report
    }

    /// CSV report: fixed seven-column header, one quoted row per visit.
    /// Header-only output (with trailing newline) when the day is empty.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(
            "Chair,Patient,ID,Minutes,Formatted Duration,Start Time,End Time\n",
        );

        for visit in self.day_visits() {
            let number = visit
                .chair_id
                .strip_prefix(CHAIR_ID_PREFIX)
                .unwrap_or(&visit.chair_id);
            csv.push_str(&format!(
                "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\"\n",
                number,
                escape_csv(self.patient_name(&visit.patient_id)),
                escape_csv(self.patient_id_value(&visit.patient_id)),
                visit.duration_minutes,
                format_duration(visit.duration_minutes),
                visit.started_at.format("%H:%M:%S"),
                visit.ended_at.format("%H:%M:%S"),
            ));
        }

        csv
    }

    /// Spreadsheet-style report: a title line, then the same columns
    /// tab-separated without quoting.
    pub fn to_table(&self) -> String {
        let date = self.date.format("%d-%m-%Y");
        let visits = self.day_visits();

        if visits.is_empty() {
            return format!("CHAIR USAGE REPORT - {date}\n\nNo usage recorded for today.");
        }

        let mut table = format!("CHAIR USAGE REPORT - {date}\n\n");
        table.push_str("Chair\tPatient\tID\tMinutes\tFormatted Duration\tStart Time\tEnd Time\n");

        for visit in visits {
            let number = visit
                .chair_id
                .strip_prefix(CHAIR_ID_PREFIX)
                .unwrap_or(&visit.chair_id);
            table.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                number,
                self.patient_name(&visit.patient_id),
                self.patient_id_value(&visit.patient_id),
                visit.duration_minutes,
                format_duration(visit.duration_minutes),
                visit.started_at.format("%H:%M:%S"),
                visit.ended_at.format("%H:%M:%S"),
            ));
        }

        table
    }
}

/// Escape embedded quotes for a CSV field (fields are always quoted).
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0m");
        assert_eq!(format_duration(45), "45m");
        assert_eq!(format_duration(60), "1h 0m");
        assert_eq!(format_duration(125), "2h 5m");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("say \"hi\""), "say \"\"hi\"\"");
    }

    #[test]
    fn test_empty_csv_is_header_only() {
        let reporter = UsageReporter::new(&[], &[], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(
            reporter.to_csv(),
            "Chair,Patient,ID,Minutes,Formatted Duration,Start Time,End Time\n"
        );
    }

    #[test]
    fn test_empty_text_report() {
        let reporter = UsageReporter::new(&[], &[], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let text = reporter.to_text();
        assert!(text.starts_with("CHAIR USAGE REPORT\n"));
        assert!(text.contains("No usage recorded for today."));
    }
}
