//! The normalized roster.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use seatplan_allocator::BatchQueues;
use seatplan_id::{BatchKey, StudentId};
use serde::Serialize;
use tracing::{info, warn};

use crate::{RosterError, Student, StudentRecord};

/// What normalization kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    /// Records that became students.
    pub accepted: usize,
    /// Records dropped for a missing id or batch.
    pub dropped: usize,
    /// Records dropped because their id was already taken.
    pub duplicates: usize,
    /// One entry per dropped record, in input order.
    #[serde(skip)]
    pub errors: Vec<RosterError>,
}

impl NormalizationReport {
    /// True when every input record was accepted.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Students in seating order, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    students: Vec<Student>,
    index: HashMap<StudentId, usize>,
    report: NormalizationReport,
}

impl Roster {
    /// Normalize, de-duplicate and order raw records.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = StudentRecord>,
    {
        let mut report = NormalizationReport::default();
        let mut seen = HashSet::new();
        let mut students = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            let student = match Student::from_record(index, record) {
                Ok(student) => student,
                Err(err) => {
                    warn!(error = %err, "dropping roster record");
                    report.dropped += 1;
                    report.errors.push(err);
                    continue;
                }
            };
            if !seen.insert(student.id.clone()) {
                let err = RosterError::Duplicate {
                    index,
                    student: student.id.clone(),
                };
                warn!(error = %err, "dropping duplicate roster record");
                report.duplicates += 1;
                report.errors.push(err);
                continue;
            }
            students.push(student);
        }

        students.sort_by(seating_order);
        report.accepted = students.len();

        let index = students
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();

        info!(
            accepted = report.accepted,
            dropped = report.dropped,
            duplicates = report.duplicates,
            "roster normalized"
        );

        Self {
            students,
            index,
            report,
        }
    }

    /// Look a student up by id.
    pub fn get(&self, id: &StudentId) -> Option<&Student> {
        self.index.get(id).map(|&i| &self.students[i])
    }

    /// Position of a student in seating order.
    pub fn position(&self, id: &StudentId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Students in seating order.
    pub fn iter(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Distinct batch keys in key order.
    pub fn batches(&self) -> BTreeSet<BatchKey> {
        self.students.iter().map(|s| s.batch.clone()).collect()
    }

    pub fn report(&self) -> &NormalizationReport {
        &self.report
    }

    /// Build the allocator's per-batch queues in seating order.
    pub fn batch_queues(&self) -> BatchQueues {
        let mut queues = BatchQueues::new();
        for student in &self.students {
            // Ids are unique after normalization.
            if let Err(err) = queues.push(student.batch.clone(), student.id.clone()) {
                warn!(error = %err, "skipping student while building queues");
            }
        }
        queues
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Student;
    type IntoIter = std::slice::Iter<'a, Student>;

    fn into_iter(self) -> Self::IntoIter {
        self.students.iter()
    }
}

/// Batch ascending, then M-batch descending, then sub-identifier descending.
/// Values that do not parse as numbers sort last within their level.
fn seating_order(a: &Student, b: &Student) -> Ordering {
    a.batch
        .cmp(&b.batch)
        .then_with(|| descending_numeric(m_batch_number(a), m_batch_number(b)))
        .then_with(|| descending_numeric(a.id.sub_identifier(), b.id.sub_identifier()))
}

fn m_batch_number(student: &Student) -> Option<u64> {
    student.m_batch.as_ref().and_then(BatchKey::numeric)
}

fn descending_numeric<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, batch: &str, m_batch: &str) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            batch: batch.to_string(),
            m_batch: m_batch.to_string(),
            ..Default::default()
        }
    }

    fn ids(roster: &Roster) -> Vec<&str> {
        roster.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_sort_batch_ascending_numeric() {
        let roster = Roster::from_records(vec![
            record("a", "10", ""),
            record("b", "9", ""),
            record("c", "X", ""),
        ]);
        assert_eq!(ids(&roster), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_sort_m_batch_descending_missing_last() {
        let roster = Roster::from_records(vec![
            record("a", "56", ""),
            record("b", "56", "54"),
            record("c", "56", "56"),
        ]);
        assert_eq!(ids(&roster), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_sub_identifier_descending() {
        let roster = Roster::from_records(vec![
            record("2231381001", "56", "56"),
            record("2231421002", "56", "56"),
            record("short", "56", "56"),
            record("2231381003", "56", "56"),
        ]);
        // 42 before 38; equal sub-identifiers keep input order; unparsable last
        assert_eq!(
            ids(&roster),
            vec!["2231421002", "2231381001", "2231381003", "short"]
        );
    }

    #[test]
    fn test_drops_and_duplicates_are_reported() {
        let roster = Roster::from_records(vec![
            record("s1", "56", ""),
            record("", "56", ""),
            record("s2", " ", ""),
            record(" s1 ", "57", ""),
        ]);
        assert_eq!(roster.len(), 1);
        let report = roster.report();
        assert_eq!(report.accepted, 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(report.duplicates, 1);
        assert!(!report.is_clean());
        assert_eq!(report.errors[2].index(), 3);
        // first occurrence wins
        let s1 = roster.get(&StudentId::parse("s1").unwrap()).unwrap();
        assert_eq!(s1.batch.as_str(), "56");
    }

    #[test]
    fn test_batch_keys_folded() {
        let roster = Roster::from_records(vec![record("s1", "56.0", ""), record("s2", "56", "")]);
        assert_eq!(roster.batches().len(), 1);
    }

    #[test]
    fn test_batch_queues_follow_seating_order() {
        let roster = Roster::from_records(vec![
            record("2231381001", "56", "55"),
            record("2231381002", "56", "56"),
            record("2231381003", "57", ""),
        ]);
        let queues = roster.batch_queues();
        let key56 = BatchKey::canonical("56").unwrap();
        let front: Vec<&str> = queues
            .queue(&key56)
            .unwrap()
            .iter()
            .map(StudentId::as_str)
            .collect();
        assert_eq!(front, vec!["2231381002", "2231381001"]);
        assert_eq!(queues.total_remaining(), 3);
        assert_eq!(queues.batch_count(), 2);
    }

    #[test]
    fn test_position_lookup() {
        let roster = Roster::from_records(vec![record("b", "2", ""), record("a", "1", "")]);
        assert_eq!(roster.position(&StudentId::parse("a").unwrap()), Some(0));
        assert_eq!(roster.position(&StudentId::parse("zz").unwrap()), None);
    }
}
