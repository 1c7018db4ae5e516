// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::ComplaintStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The requested status change is not an edge of the lifecycle graph.
    InvalidTransition {
        /// The status the complaint currently holds.
        from: ComplaintStatus,
        /// The status that was requested.
        to: ComplaintStatus,
    },
    /// A status string is not part of the wire vocabulary.
    InvalidStatus {
        /// The rejected value.
        status: String,
    },
    /// A role string is not part of the account vocabulary.
    InvalidRole {
        /// The rejected value.
        role: String,
    },
    /// A required free-text field is empty.
    EmptyField {
        /// The name of the offending field.
        field: &'static str,
    },
    /// A free-text field exceeds its maximum length.
    FieldTooLong {
        /// The name of the offending field.
        field: &'static str,
        /// The maximum permitted length in characters.
        max: usize,
    },
    /// Feedback rating outside 1..=5.
    InvalidRating {
        /// The rejected rating.
        rating: i64,
    },
    /// Feedback may only be attached once the complaint is closed.
    FeedbackNotAllowed {
        /// The complaint's current status.
        status: ComplaintStatus,
    },
    /// The complaint has no feedback to remove.
    NoFeedback,
    /// Email address is malformed.
    InvalidEmail(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot transition complaint from '{from}' to '{to}'")
            }
            Self::InvalidStatus { status } => {
                write!(
                    f,
                    "Invalid status '{status}'. Must be one of: received, resolving, closed"
                )
            }
            Self::InvalidRole { role } => {
                write!(f, "Invalid role '{role}'. Must be one of: Student, Staff, Admin")
            }
            Self::EmptyField { field } => write!(f, "Field '{field}' must not be empty"),
            Self::FieldTooLong { field, max } => {
                write!(f, "Field '{field}' must be at most {max} characters")
            }
            Self::InvalidRating { rating } => {
                write!(
                    f,
                    "Invalid rating {rating}. Rating must be an integer between 1 and 5"
                )
            }
            Self::FeedbackNotAllowed { status } => {
                write!(
                    f,
                    "Feedback can only be submitted for closed complaints (current status: '{status}')"
                )
            }
            Self::NoFeedback => write!(f, "Complaint has no feedback"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{email}'"),
        }
    }
}

impl std::error::Error for DomainError {}
