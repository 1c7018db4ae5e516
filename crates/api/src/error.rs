// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use campus_complaints::CoreError;
use campus_complaints_domain::{ComplaintStatus, DomainError};
use campus_complaints_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor is known but may not perform the action.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}' refused, {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The acting account could not be resolved.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor may not perform the action on this record.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// Why it was refused.
        reason: String,
    },
    /// The requested status is not reachable from the current one.
    InvalidTransition {
        /// The complaint's current status.
        from: ComplaintStatus,
        /// The requested status.
        to: ComplaintStatus,
        /// The statuses that are reachable from `from`.
        allowed: Vec<ComplaintStatus>,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The record kept changing underneath the request.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

fn join_statuses(statuses: &[ComplaintStatus]) -> String {
    if statuses.is_empty() {
        return String::from("none");
    }
    statuses
        .iter()
        .map(ComplaintStatus::as_str)
        .collect::<Vec<&str>>()
        .join(", ")
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action, reason } => {
                write!(f, "Forbidden: '{action}' refused, {reason}")
            }
            Self::InvalidTransition { from, to, allowed } => write!(
                f,
                "Invalid transition: cannot move complaint from '{from}' to '{to}' (allowed: {})",
                join_statuses(allowed)
            ),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Forbidden { action, reason } => Self::Forbidden { action, reason },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidTransition { from, to } => ApiError::InvalidTransition {
            from,
            to,
            allowed: from.allowed_targets(),
        },
        DomainError::InvalidStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidRole { .. } => ApiError::InvalidInput {
            field: String::from("role"),
            message,
        },
        DomainError::EmptyField { field } | DomainError::FieldTooLong { field, .. } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message,
            }
        }
        DomainError::InvalidRating { .. } => ApiError::InvalidInput {
            field: String::from("rating"),
            message,
        },
        DomainError::FeedbackNotAllowed { .. } => ApiError::InvalidInput {
            field: String::from("feedback"),
            message,
        },
        DomainError::NoFeedback => ApiError::ResourceNotFound {
            resource_type: String::from("Feedback"),
            message,
        },
        DomainError::InvalidEmail(_) => ApiError::InvalidInput {
            field: String::from("email"),
            message,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Storage failures other than conflicts and missing rows are reported as
/// internal errors and logged.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::VersionConflict { .. } | PersistenceError::DuplicateEmail(_) => {
            ApiError::Conflict {
                message: err.to_string(),
            }
        }
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled => {
            tracing::error!(error = %err, "Persistence failure");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}
