use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::attendance::AttendanceRecord;

/// Placeholder rendered for a missing entrada or salida.
pub const ABSENT: &str = "-";

/// All records of one user, as returned to admins and supervisors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserAttendance {
    pub username: String,
    #[serde(rename = "nombre_completo")]
    pub display_name: String,
    pub fichajes: Vec<AttendanceRecord>,
}

/// One summarized row per (date, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "date": "2024-01-01",
        "user": "admin",
        "entrada": "08:00",
        "salida": "17:00"
    })
)]
pub struct ReportEntry {
    pub date: String,
    pub user: String,
    pub entrada: Option<String>,
    pub salida: Option<String>,
}

impl ReportEntry {
    pub fn entrada_or_absent(&self) -> &str {
        self.entrada.as_deref().unwrap_or(ABSENT)
    }

    pub fn salida_or_absent(&self) -> &str {
        self.salida.as_deref().unwrap_or(ABSENT)
    }
}

/// Monthly snapshot kept under `savedReports`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedReport {
    #[schema(example = "2024-01")]
    pub month: String,
    #[serde(rename = "generateDate")]
    #[schema(value_type = String, format = "date-time")]
    pub generate_date: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
}

/// Inclusive range compared as `YYYY-MM-DD` strings, so bounds such as
/// `2024-02-31` are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    #[schema(example = "2024-01-01")]
    pub start: String,
    #[schema(example = "2024-01-07")]
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        date >= self.start.as_str() && date <= self.end.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_compares_as_strings() {
        let feb = DateRange::new("2024-02-01", "2024-02-31");
        assert!(feb.contains("2024-02-29"));
        assert!(feb.contains("2024-02-01"));
        assert!(!feb.contains("2024-03-01"));
        assert!(!feb.contains("2024-01-31"));
    }

    #[test]
    fn absent_slots_render_as_dash() {
        let entry = ReportEntry {
            date: "2024-01-01".into(),
            user: "admin".into(),
            entrada: Some("08:00".into()),
            salida: None,
        };
        assert_eq!(entry.entrada_or_absent(), "08:00");
        assert_eq!(entry.salida_or_absent(), "-");
    }
}
