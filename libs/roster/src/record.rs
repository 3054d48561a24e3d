//! Raw and normalized student records.

use seatplan_id::{BatchKey, StudentId};
use serde::{Deserialize, Serialize};

use crate::de::lenient_string;
use crate::RosterError;

/// A student row as it arrives from the upstream export.
///
/// Only `id` and `batch` are required. Numeric cells are accepted and
/// turned into strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(deserialize_with = "lenient_string")]
    pub batch: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub m_batch: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub section: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub course_code: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub course_title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub faculty_id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub faculty_name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub credits: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub program: String,
}

/// A normalized, immutable student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub batch: BatchKey,
    /// Home cohort; `None` when the record left it blank.
    pub m_batch: Option<BatchKey>,
    pub section: String,
    pub course_code: String,
    pub course_title: String,
    pub faculty_id: String,
    pub faculty_name: String,
    pub credits: String,
    pub program: String,
}

impl Student {
    /// Normalize a raw record. `index` is the record's input position.
    pub fn from_record(index: usize, record: StudentRecord) -> Result<Self, RosterError> {
        let id = StudentId::parse(&record.id)
            .map_err(|source| RosterError::InvalidId { index, source })?;
        let batch = BatchKey::canonical(&record.batch).map_err(|source| {
            RosterError::InvalidBatch {
                index,
                student: id.clone(),
                source,
            }
        })?;
        // A blank or malformed M-batch is treated as absent.
        let m_batch = BatchKey::canonical(&record.m_batch).ok();

        Ok(Self {
            id,
            name: record.name.trim().to_string(),
            batch,
            m_batch,
            section: record.section.trim().to_string(),
            course_code: record.course_code.trim().to_string(),
            course_title: record.course_title.trim().to_string(),
            faculty_id: record.faculty_id.trim().to_string(),
            faculty_name: record.faculty_name.trim().to_string(),
            credits: record.credits.trim().to_string(),
            program: record.program.trim().to_string(),
        })
    }

    /// True when the student sits with a batch other than their home cohort.
    pub fn is_cross_batch(&self) -> bool {
        self.m_batch.as_ref().is_some_and(|m| m != &self.batch)
    }

    /// M-batch as written, or an empty string.
    pub fn m_batch_label(&self) -> &str {
        self.m_batch.as_ref().map_or("", BatchKey::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_numeric_cells() {
        let json = r#"{"id": 2231381001, "batch": 56.0, "m_batch": 55, "section": "A"}"#;
        let record: StudentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "2231381001");
        assert_eq!(record.batch, "56");
        assert_eq!(record.m_batch, "55");
        assert_eq!(record.name, "");
    }

    #[test]
    fn test_record_from_toml() {
        let toml_src = r#"
id = "2231381001"
name = " A. Rahman "
batch = 56
section = "B"
"#;
        let record: StudentRecord = toml::from_str(toml_src).unwrap();
        let student = Student::from_record(0, record).unwrap();
        assert_eq!(student.name, "A. Rahman");
        assert_eq!(student.batch.as_str(), "56");
        assert!(student.m_batch.is_none());
        assert!(!student.is_cross_batch());
    }

    #[test]
    fn test_cross_batch() {
        let record = StudentRecord {
            id: "s1".into(),
            batch: "56".into(),
            m_batch: "55.0".into(),
            ..Default::default()
        };
        let student = Student::from_record(0, record).unwrap();
        assert!(student.is_cross_batch());
        assert_eq!(student.m_batch_label(), "55");
    }

    #[test]
    fn test_missing_batch_rejected() {
        let record = StudentRecord {
            id: "s1".into(),
            batch: "  ".into(),
            ..Default::default()
        };
        let err = Student::from_record(3, record).unwrap_err();
        assert!(matches!(err, RosterError::InvalidBatch { index: 3, .. }));
    }

    #[test]
    fn test_missing_id_rejected() {
        let err = Student::from_record(1, StudentRecord::default()).unwrap_err();
        assert!(matches!(err, RosterError::InvalidId { index: 1, .. }));
    }
}
