//! Session header metadata.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted input layouts for `exam_date`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];

/// Header fields printed above every report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
    pub institution: String,
    pub department: String,
    pub semester: String,
    pub term: String,
    pub shift: String,
    pub exam_date: String,
    pub exam_time: String,
    pub exam_day: String,
}

impl SessionInfo {
    /// Parsed exam date, if `exam_date` is in a recognised layout.
    pub fn date(&self) -> Option<NaiveDate> {
        let raw = self.exam_date.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }

    /// Exam date as `dd-mm-yyyy`, or the raw string when it does not parse.
    pub fn formatted_date(&self) -> String {
        match self.date() {
            Some(date) => date.format("%d-%m-%Y").to_string(),
            None => self.exam_date.trim().to_string(),
        }
    }

    /// One-line title, e.g. `Seat Plan (Fall 2024)_Evening`.
    pub fn title(&self) -> String {
        format!("Seat Plan ({})_{}", self.semester, self.shift)
    }

    /// Returns true if no header field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn with_date(raw: &str) -> SessionInfo {
        SessionInfo {
            exam_date: raw.to_string(),
            ..Default::default()
        }
    }

    #[rstest]
    #[case("2024-12-14", "14-12-2024")]
    #[case("14-12-2024", "14-12-2024")]
    #[case("14/12/2024", "14-12-2024")]
    #[case(" 4.1.2025 ", "04-01-2025")]
    #[case("next Saturday", "next Saturday")]
    #[case("", "")]
    fn test_formatted_date(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(with_date(raw).formatted_date(), expected);
    }

    #[test]
    fn test_deserialize_partial() {
        let info: SessionInfo =
            serde_json::from_str(r#"{"semester": "Fall 2024", "shift": "Evening"}"#).unwrap();
        assert_eq!(info.title(), "Seat Plan (Fall 2024)_Evening");
        assert!(info.exam_date.is_empty());
        assert!(!info.is_empty());
        assert!(SessionInfo::default().is_empty());
    }
}
