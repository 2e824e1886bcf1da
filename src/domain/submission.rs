use crate::domain::payload::CanonicalPayload;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::{Date, OffsetDateTime};

const ID_PREFIX: &str = "INC-";

/// Receiver-assigned identifier, `INC-YYYYMMDD-NNNN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Builds the id for the `sequence`-th submission received on `date`.
    #[must_use]
    pub fn new(date: Date, sequence: u64) -> Self {
        Self(format!(
            "{ID_PREFIX}{:04}{:02}{:02}-{sequence:04}",
            date.year(),
            u8::from(date.month()),
            date.day()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks that `candidate` has the shape of a receiver-assigned id.
    #[must_use]
    pub fn is_well_formed(candidate: &str) -> bool {
        let Some(rest) = candidate.strip_prefix(ID_PREFIX) else {
            return false;
        };
        let Some((date, sequence)) = rest.split_once('-') else {
            return false;
        };
        date.len() == 8
            && date.bytes().all(|b| b.is_ascii_digit())
            && sequence.len() >= 4
            && sequence.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<SubmissionId> for String {
    fn from(id: SubmissionId) -> Self {
        id.0
    }
}

/// A payload the receiver accepted, as it was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSubmission {
    pub id: SubmissionId,
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
    pub payload: CanonicalPayload,
}
