//! Attendance sheet groups.

use std::collections::BTreeMap;

use seatplan_id::{BatchKey, RoomId, StudentId};
use seatplan_ledger::AssignmentLedger;
use seatplan_roster::{Roster, Student};
use serde::Serialize;

/// One line on an attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEntry {
    pub student_id: StudentId,
    pub name: String,
    pub m_batch: String,
}

/// The group's students seated in one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRoom {
    pub room_id: RoomId,
    pub students: Vec<AttendanceEntry>,
}

/// Students sharing a faculty, batch and section.
///
/// Course and program details come from the first roster student in the
/// group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceGroup {
    pub faculty_name: String,
    pub batch: BatchKey,
    pub section: String,
    pub faculty_id: String,
    pub program: String,
    pub course_code: String,
    pub course_title: String,
    pub credits: String,
    pub rooms: Vec<AttendanceRoom>,
}

impl AttendanceGroup {
    /// Seated students across all rooms.
    pub fn seated(&self) -> usize {
        self.rooms.iter().map(|r| r.students.len()).sum()
    }
}

/// Group seated students by (faculty name, batch, section).
///
/// Groups are ordered by that key. Rooms appear in the order the ledger
/// first seated a group member there; students within a room follow roster
/// order. Groups with nobody seated are left out.
pub fn attendance_groups(roster: &Roster, ledger: &AssignmentLedger) -> Vec<AttendanceGroup> {
    let mut members: BTreeMap<(String, BatchKey, String), Vec<&Student>> = BTreeMap::new();
    for student in roster {
        members
            .entry((
                student.faculty_name.clone(),
                student.batch.clone(),
                student.section.clone(),
            ))
            .or_default()
            .push(student);
    }

    members
        .into_iter()
        .filter_map(|((faculty_name, batch, section), students)| {
            let head = *students.first()?;
            let rooms = group_rooms(&students, roster, ledger);
            if rooms.is_empty() {
                return None;
            }
            Some(AttendanceGroup {
                faculty_id: head.faculty_id.clone(),
                program: head.program.clone(),
                course_code: head.course_code.clone(),
                course_title: head.course_title.clone(),
                credits: head.credits.clone(),
                faculty_name,
                batch,
                section,
                rooms,
            })
        })
        .collect()
}

fn group_rooms(students: &[&Student], roster: &Roster, ledger: &AssignmentLedger) -> Vec<AttendanceRoom> {
    let mut seated: Vec<(&RoomId, usize, &Student)> = students
        .iter()
        .filter_map(|&student| {
            let assignment = ledger.by_student(&student.id)?;
            let position = ledger
                .iter()
                .position(|a| a.student_id == student.id)
                .unwrap_or(usize::MAX);
            Some((&assignment.room_id, position, student))
        })
        .collect();
    if seated.is_empty() {
        return Vec::new();
    }

    // First-seat order decides room order.
    seated.sort_by_key(|&(_, position, _)| position);
    let mut rooms: Vec<AttendanceRoom> = Vec::new();
    for &(room_id, _, _) in &seated {
        if !rooms.iter().any(|r| &r.room_id == room_id) {
            rooms.push(AttendanceRoom {
                room_id: room_id.clone(),
                students: Vec::new(),
            });
        }
    }

    seated.sort_by_key(|&(_, _, student)| roster.position(&student.id));
    for (room_id, _, student) in seated {
        if let Some(room) = rooms.iter_mut().find(|r| &r.room_id == room_id) {
            room.students.push(AttendanceEntry {
                student_id: student.id.clone(),
                name: student.name.clone(),
                m_batch: student.m_batch_label().to_string(),
            });
        }
    }
    rooms
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatplan_id::Seat;
    use seatplan_ledger::SeatAssignment;
    use seatplan_roster::StudentRecord;
    use seatplan_testing::{batch, room_id, student};

    fn record(id: &str, batch: &str, faculty: &str, section: &str) -> StudentRecord {
        StudentRecord {
            id: id.to_string(),
            name: format!("Name {id}"),
            batch: batch.to_string(),
            section: section.to_string(),
            faculty_name: faculty.to_string(),
            course_code: format!("CE {batch}"),
            ..Default::default()
        }
    }

    fn seat(room: &str, r: u32, c: u32, id: &str, key: &str) -> SeatAssignment {
        SeatAssignment::new(room_id(room), Seat::new(r, c).unwrap(), student(id), batch(key))
    }

    #[test]
    fn test_groups_split_by_faculty_batch_section() {
        let roster = Roster::from_records(vec![
            record("s1", "56", "Dr. X", "A"),
            record("s2", "56", "Dr. X", "A"),
            record("s3", "56", "Dr. X", "B"),
            record("s4", "57", "Dr. Y", "A"),
            record("s5", "57", "Dr. Y", "A"),
        ]);
        let (ledger, _) = AssignmentLedger::from_assignments(vec![
            seat("102", 1, 1, "s2", "56"),
            seat("101", 1, 1, "s1", "56"),
            seat("101", 2, 1, "s3", "56"),
            seat("101", 1, 2, "s4", "57"),
        ]);

        let groups = attendance_groups(&roster, &ledger);
        assert_eq!(groups.len(), 3);

        let first = &groups[0];
        assert_eq!(first.faculty_name, "Dr. X");
        assert_eq!(first.section, "A");
        assert_eq!(first.course_code, "CE 56");
        let rooms: Vec<&str> = first.rooms.iter().map(|r| r.room_id.as_str()).collect();
        assert_eq!(rooms, vec!["102", "101"]);
        assert_eq!(first.seated(), 2);

        // s5 was never seated
        let last = &groups[2];
        assert_eq!(last.faculty_name, "Dr. Y");
        assert_eq!(last.seated(), 1);
        assert_eq!(last.rooms[0].students[0].name, "Name s4");
    }

    #[test]
    fn test_unseated_group_is_omitted() {
        let roster = Roster::from_records(vec![record("s1", "56", "Dr. X", "A")]);
        let groups = attendance_groups(&roster, &AssignmentLedger::new());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_room_students_follow_roster_order() {
        let roster = Roster::from_records(vec![
            record("s1", "56", "F", "A"),
            record("s2", "56", "F", "A"),
        ]);
        let (ledger, _) = AssignmentLedger::from_assignments(vec![
            seat("101", 1, 1, "s2", "56"),
            seat("101", 2, 1, "s1", "56"),
        ]);
        let groups = attendance_groups(&roster, &ledger);
        let ids: Vec<&str> = groups[0].rooms[0]
            .students
            .iter()
            .map(|e| e.student_id.as_str())
            .collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }
}
