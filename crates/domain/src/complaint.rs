// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The complaint record and its feedback sub-record.

use crate::error::DomainError;
use crate::status::{ComplaintStatus, StatusTimestamps};
use crate::types::{Category, ComplaintId, UserId};
use serde::{Deserialize, Serialize};

/// A feedback rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest permitted rating.
    pub const MIN: u8 = 1;
    /// Highest permitted rating.
    pub const MAX: u8 = 5;

    /// Validates and wraps a rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if `value` is outside 1..=5.
    pub fn new(value: i64) -> Result<Self, DomainError> {
        u8::try_from(value)
            .ok()
            .filter(|v| (Self::MIN..=Self::MAX).contains(v))
            .map(Self)
            .ok_or(DomainError::InvalidRating { rating: value })
    }

    /// Returns the rating value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Feedback left by the submitter on a closed complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// The rating, 1 to 5.
    pub rating: Rating,
    /// Free-text comment. May be empty.
    pub text: String,
}

/// The fields a submitter provides when filing a complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
    /// Short summary.
    pub title: String,
    /// The category, which selects the handling department.
    pub category: String,
    /// Full description.
    pub description: String,
    /// Where on campus the problem is.
    pub location: Option<String>,
}

/// A complaint that has been filed but not yet stored.
///
/// Storage assigns the identifier and the initial version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    /// Who filed it.
    pub submitter: UserId,
    /// Category / handling department.
    pub category: Category,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Optional location.
    pub location: Option<String>,
    /// Always `Received` for a fresh filing.
    pub status: ComplaintStatus,
    /// Holds only the received instant.
    pub status_timestamps: StatusTimestamps,
    /// Always false for a fresh filing.
    pub completed: bool,
}

/// A stored complaint record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    /// The complaint identifier.
    pub id: ComplaintId,
    /// Who filed it.
    pub submitter: UserId,
    /// Category / handling department.
    pub category: Category,
    /// Short summary.
    pub title: String,
    /// Full description.
    pub description: String,
    /// Optional location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Current lifecycle status.
    pub status: ComplaintStatus,
    /// When each status was first entered.
    pub status_timestamps: StatusTimestamps,
    /// True iff `status` is `Closed`.
    pub completed: bool,
    /// Submitter feedback, only ever present on a closed complaint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    /// Optimistic concurrency counter, bumped by every successful save.
    pub version: i64,
}

impl Complaint {
    /// Returns true if the record belongs to `user`.
    #[must_use]
    pub fn is_submitted_by(&self, user: UserId) -> bool {
        self.submitter == user
    }
}
