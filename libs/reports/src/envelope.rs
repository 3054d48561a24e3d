//! Question-paper envelope list.

use std::collections::BTreeSet;

use seatplan_roster::Roster;
use serde::Serialize;

/// One envelope per faculty and course.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Envelope {
    pub faculty_name: String,
    pub course_code: String,
    pub course_title: String,
}

/// Unique (faculty name, course code, course title) triples in sorted order.
///
/// Students with no course details at all do not produce an envelope.
pub fn envelope_list(roster: &Roster) -> Vec<Envelope> {
    roster
        .iter()
        .filter(|s| !(s.faculty_name.is_empty() && s.course_code.is_empty() && s.course_title.is_empty()))
        .map(|s| Envelope {
            faculty_name: s.faculty_name.clone(),
            course_code: s.course_code.clone(),
            course_title: s.course_title.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
