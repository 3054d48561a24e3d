//! Per-batch student queues.

use std::collections::{BTreeMap, HashMap, VecDeque};

use seatplan_id::{BatchKey, StudentId};
use serde::{Deserialize, Serialize};

use crate::QueueError;

/// Ordered queues of students, one per batch.
///
/// The front of each queue is the next student to be seated. Queue order is
/// set upstream and never changed here; the allocator only removes students
/// from the front. A student may appear in at most one queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<BatchKey, Vec<StudentId>>",
    try_from = "BTreeMap<BatchKey, Vec<StudentId>>"
)]
pub struct BatchQueues {
    queues: BTreeMap<BatchKey, VecDeque<StudentId>>,
    members: HashMap<StudentId, BatchKey>,
}

impl BatchQueues {
    /// Create empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a student to the back of a batch queue.
    pub fn push(&mut self, batch: BatchKey, student: StudentId) -> Result<(), QueueError> {
        if let Some(existing) = self.members.get(&student) {
            return Err(QueueError::DuplicateStudent {
                student,
                batch,
                existing: existing.clone(),
            });
        }
        self.members.insert(student.clone(), batch.clone());
        self.queues.entry(batch).or_default().push_back(student);
        Ok(())
    }

    /// Append every student in order to a batch queue.
    pub fn extend<I>(&mut self, batch: &BatchKey, students: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = StudentId>,
    {
        for student in students {
            self.push(batch.clone(), student)?;
        }
        Ok(())
    }

    /// Students left in a batch.
    pub fn remaining(&self, batch: &BatchKey) -> usize {
        self.queues.get(batch).map_or(0, VecDeque::len)
    }

    /// Students left across all batches.
    pub fn total_remaining(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// Returns true once every queue is empty.
    pub fn is_exhausted(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }

    /// Number of batches, including exhausted ones.
    pub fn batch_count(&self) -> usize {
        self.queues.len()
    }

    /// Non-empty batches, largest first.
    ///
    /// Ties keep ascending [`BatchKey`] order: the map iterates keys in
    /// order and the sort is stable.
    pub fn ranked(&self) -> Vec<BatchKey> {
        let mut keys: Vec<(&BatchKey, usize)> = self
            .queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(k, q)| (k, q.len()))
            .collect();
        keys.sort_by(|a, b| b.1.cmp(&a.1));
        keys.into_iter().map(|(k, _)| k.clone()).collect()
    }

    /// Remove the next student from a batch.
    pub fn pop_front(&mut self, batch: &BatchKey) -> Option<StudentId> {
        let student = self.queues.get_mut(batch)?.pop_front()?;
        self.members.remove(&student);
        Some(student)
    }

    /// Remove up to `count` students from the front of a batch.
    pub fn take_front(&mut self, batch: &BatchKey, count: usize) -> Vec<StudentId> {
        let Some(queue) = self.queues.get_mut(batch) else {
            return Vec::new();
        };
        let count = count.min(queue.len());
        let taken: Vec<StudentId> = queue.drain(..count).collect();
        for student in &taken {
            self.members.remove(student);
        }
        taken
    }

    /// Peek at a batch queue without removing anything.
    pub fn queue(&self, batch: &BatchKey) -> Option<&VecDeque<StudentId>> {
        self.queues.get(batch)
    }

    /// Iterate batches in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BatchKey, &VecDeque<StudentId>)> {
        self.queues.iter()
    }

    /// Students still waiting, for non-empty batches only.
    pub fn residual(&self) -> BTreeMap<BatchKey, Vec<StudentId>> {
        self.queues
            .iter()
            .filter(|(_, q)| !q.is_empty())
            .map(|(k, q)| (k.clone(), q.iter().cloned().collect()))
            .collect()
    }
}

impl From<BatchQueues> for BTreeMap<BatchKey, Vec<StudentId>> {
    fn from(queues: BatchQueues) -> Self {
        queues
            .queues
            .into_iter()
            .map(|(k, q)| (k, q.into_iter().collect()))
            .collect()
    }
}

impl TryFrom<BTreeMap<BatchKey, Vec<StudentId>>> for BatchQueues {
    type Error = QueueError;

    fn try_from(map: BTreeMap<BatchKey, Vec<StudentId>>) -> Result<Self, Self::Error> {
        let mut queues = Self::new();
        for (batch, students) in map {
            queues.queues.entry(batch.clone()).or_default();
            queues.extend(&batch, students)?;
        }
        Ok(queues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> BatchKey {
        BatchKey::canonical(s).unwrap()
    }

    fn sid(s: &str) -> StudentId {
        StudentId::parse(s).unwrap()
    }

    #[test]
    fn test_push_and_pop_fifo() {
        let mut q = BatchQueues::new();
        q.push(key("A"), sid("s1")).unwrap();
        q.push(key("A"), sid("s2")).unwrap();
        assert_eq!(q.remaining(&key("A")), 2);
        assert_eq!(q.pop_front(&key("A")), Some(sid("s1")));
        assert_eq!(q.pop_front(&key("A")), Some(sid("s2")));
        assert_eq!(q.pop_front(&key("A")), None);
        assert!(q.is_exhausted());
    }

    #[test]
    fn test_duplicate_student_rejected() {
        let mut q = BatchQueues::new();
        q.push(key("A"), sid("s1")).unwrap();
        let err = q.push(key("B"), sid("s1")).unwrap_err();
        assert!(matches!(err, QueueError::DuplicateStudent { .. }));
    }

    #[test]
    fn test_popped_student_can_be_requeued() {
        let mut q = BatchQueues::new();
        q.push(key("A"), sid("s1")).unwrap();
        q.pop_front(&key("A"));
        assert!(q.push(key("B"), sid("s1")).is_ok());
    }

    #[test]
    fn test_ranked_largest_first_ties_by_key() {
        let mut q = BatchQueues::new();
        q.extend(&key("10"), [sid("a1"), sid("a2")]).unwrap();
        q.extend(&key("9"), [sid("b1"), sid("b2")]).unwrap();
        q.extend(&key("C"), [sid("c1"), sid("c2"), sid("c3")]).unwrap();
        q.extend(&key("D"), Vec::new()).unwrap();
        let ranked: Vec<String> = q.ranked().iter().map(|k| k.to_string()).collect();
        assert_eq!(ranked, vec!["C", "9", "10"]);
    }

    #[test]
    fn test_take_front_caps_at_len() {
        let mut q = BatchQueues::new();
        q.extend(&key("A"), [sid("s1"), sid("s2")]).unwrap();
        let taken = q.take_front(&key("A"), 5);
        assert_eq!(taken, vec![sid("s1"), sid("s2")]);
        assert_eq!(q.total_remaining(), 0);
        assert!(q.take_front(&key("Z"), 1).is_empty());
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let json = r#"{"56": ["s3", "s1"], "57.0": ["s2"]}"#;
        let q: BatchQueues = serde_json::from_str(json).unwrap();
        assert_eq!(q.queue(&key("57")).unwrap().len(), 1);
        let front: Vec<&str> = q.queue(&key("56")).unwrap().iter().map(StudentId::as_str).collect();
        assert_eq!(front, vec!["s3", "s1"]);
        let back = serde_json::to_value(&q).unwrap();
        assert_eq!(back, serde_json::json!({"56": ["s3", "s1"], "57": ["s2"]}));
    }

    #[test]
    fn test_json_duplicate_rejected() {
        let json = r#"{"A": ["s1"], "B": ["s1"]}"#;
        assert!(serde_json::from_str::<BatchQueues>(json).is_err());
    }

    #[test]
    fn test_residual_skips_empty() {
        let mut q = BatchQueues::new();
        q.extend(&key("A"), [sid("s1")]).unwrap();
        q.extend(&key("B"), [sid("s2")]).unwrap();
        q.pop_front(&key("A"));
        let residual = q.residual();
        assert_eq!(residual.len(), 1);
        assert_eq!(residual[&key("B")], vec![sid("s2")]);
    }
}
