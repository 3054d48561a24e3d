//! Typed label definitions.
//!
//! Rooms and students are identified by free-form labels taken from the
//! upstream documents. Batch keys get their own type because they carry a
//! canonical form and a numeric-aware ordering.

use std::cmp::Ordering;

use crate::define_label;
use crate::IdError;

// =============================================================================
// Rooms and Students
// =============================================================================

define_label!(RoomId, "room id");
define_label!(StudentId, "student id");

impl StudentId {
    /// Parses the two-character sub-identifier at character offsets `[4..6]`.
    ///
    /// Registration numbers embed a program code there (e.g. `2231381001`
    /// carries `38`). Returns `None` when the id is too short or the slice is
    /// not numeric.
    #[must_use]
    pub fn sub_identifier(&self) -> Option<u32> {
        let slice = self.sub_identifier_str()?;
        slice.parse().ok()
    }

    /// Returns the raw `[4..6]` character slice when it is all digits.
    #[must_use]
    pub fn sub_identifier_str(&self) -> Option<String> {
        let slice: String = self.0.chars().skip(4).take(2).collect();
        if slice.is_empty() || !slice.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(slice)
    }
}

// =============================================================================
// Batch Keys
// =============================================================================

/// Canonical batch key.
///
/// Two keys are equal iff their canonical strings are equal. Ordering is
/// numeric-aware: keys that are plain unsigned integers compare by value and
/// sort before any non-numeric key; everything else compares lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BatchKey(String);

impl BatchKey {
    /// Human-readable kind used in error messages.
    pub const KIND: &'static str = "batch key";

    /// Normalizes a raw batch label into its canonical form.
    ///
    /// Surrounding whitespace is trimmed and a float artifact such as `56.0`
    /// collapses to `56`.
    pub fn canonical(raw: &str) -> Result<Self, IdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty { kind: Self::KIND });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(IdError::ControlCharacter {
                kind: Self::KIND,
                value: trimmed.to_string(),
            });
        }
        Ok(Self(strip_float_suffix(trimmed).to_string()))
    }

    /// Returns the canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value when the key is a plain unsigned integer.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        if self.0.chars().all(|c| c.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

fn strip_float_suffix(s: &str) -> &str {
    let Some((int_part, frac)) = s.split_once('.') else {
        return s;
    };
    let is_integral = !int_part.is_empty()
        && int_part.chars().all(|c| c.is_ascii_digit())
        && !frac.is_empty()
        && frac.chars().all(|c| c == '0');
    if is_integral {
        int_part
    } else {
        s
    }
}

impl Ord for BatchKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for BatchKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for BatchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for BatchKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::canonical(s)
    }
}

impl AsRef<str> for BatchKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for BatchKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for BatchKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(BatchKeyVisitor)
    }
}

/// Accepts batch keys written as strings, integers or integral floats.
struct BatchKeyVisitor;

impl serde::de::Visitor<'_> for BatchKeyVisitor {
    type Value = BatchKey;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a batch key as a string or an integer")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        BatchKey::canonical(v).map_err(E::custom)
    }

    fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(BatchKey(v.to_string()))
    }

    fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
        BatchKey::canonical(&v.to_string()).map_err(E::custom)
    }

    fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() && v.fract() == 0.0 && v >= 0.0 {
            Ok(BatchKey(format!("{}", v as u64)))
        } else {
            BatchKey::canonical(&v.to_string()).map_err(E::custom)
        }
    }
}

// =============================================================================
// Seats
// =============================================================================

/// A 1-based (row, column) coordinate inside a room grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Seat {
    row: u32,
    column: u32,
}

impl Seat {
    /// Creates a seat, rejecting zero rows or columns.
    pub fn new(row: u32, column: u32) -> Result<Self, IdError> {
        if row == 0 || column == 0 {
            return Err(IdError::InvalidSeat { row, column });
        }
        Ok(Self { row, column })
    }

    /// Returns the 1-based row.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the 1-based column.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl serde::Serialize for Seat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (self.row, self.column).serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Seat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (row, column) = <(u32, u32)>::deserialize(deserializer)?;
        Self::new(row, column).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
