//! Deterministic fingerprint of an assignment sequence.

use sha2::{Digest, Sha256};

use crate::SeatAssignment;

/// A digest for comparing allocation runs.
///
/// Two runs over identical inputs must produce the same digest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunDigest(String);

impl RunDigest {
    /// Compute the digest of an ordered assignment sequence.
    pub fn of<'a, I>(assignments: I) -> Self
    where
        I: IntoIterator<Item = &'a SeatAssignment>,
    {
        let mut hasher = Sha256::new();
        for assignment in assignments {
            // Struct fields serialize in declaration order, so this is canonical.
            let line = serde_json::to_vec(assignment).unwrap_or_default();
            hasher.update(&line);
            hasher.update(b"\n");
        }
        Self(format!("sha256:{}", hex::encode(hasher.finalize())))
    }

    /// Get the digest string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
