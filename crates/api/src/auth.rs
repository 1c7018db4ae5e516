// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! The acting user is identified by account id. Credentials and sessions
//! are handled outside this crate; authentication here only resolves the
//! id to an account and its role.

use campus_complaints_domain::{Account, AccountRole, Category, Complaint, UserId};
use campus_complaints_notify::NotificationRecord;
use campus_complaints_persistence::{ComplaintFilter, Persistence};

use crate::error::{ApiError, AuthError, translate_persistence_error};

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Administrator: may move any complaint through its lifecycle,
    /// remove feedback, create privileged accounts and retry queued
    /// notifications.
    Administrator,
    /// Handler: staff member who works the complaints filed in their
    /// department.
    Handler,
    /// Submitter: files complaints and leaves feedback on their own
    /// closed complaints.
    Submitter,
}

impl Role {
    /// Maps a stored account role onto its authorization role.
    #[must_use]
    pub const fn from_account_role(role: AccountRole) -> Self {
        match role {
            AccountRole::Admin => Self::Administrator,
            AccountRole::Staff => Self::Handler,
            AccountRole::Student => Self::Submitter,
        }
    }

    /// Human-readable role name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::Handler => "Handler",
            Self::Submitter => "Submitter",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account the actor acts as.
    pub id: UserId,
    /// Display name, used in notification messages.
    pub name: String,
    /// The role assigned to this actor.
    pub role: Role,
    /// The department a handler works for.
    pub department: Option<Category>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: UserId, name: String, role: Role, department: Option<Category>) -> Self {
        Self {
            id,
            name,
            role,
            department,
        }
    }

    /// Builds the actor for a stored account.
    #[must_use]
    pub fn from_account(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            role: Role::from_account_role(account.role),
            department: account.department,
        }
    }

    /// Returns true if this actor handles complaints in `category`.
    #[must_use]
    pub fn handles(&self, category: &Category) -> bool {
        self.role == Role::Handler && self.department.as_ref() == Some(category)
    }
}

/// Authentication service.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Resolves an account id to an authenticated actor.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::AuthenticationFailed` if the account does not
    /// exist, or `ApiError::Internal` if it cannot be read.
    pub fn authenticate(
        persistence: &mut Persistence,
        actor_id: i64,
    ) -> Result<AuthenticatedActor, ApiError> {
        let account: Option<Account> = persistence
            .get_account(UserId::new(actor_id))
            .map_err(translate_persistence_error)?;

        account
            .map(AuthenticatedActor::from_account)
            .ok_or_else(|| ApiError::AuthenticationFailed {
                reason: format!("Unknown account {actor_id}"),
            })
    }
}

fn forbidden(action: &str, reason: impl Into<String>) -> AuthError {
    AuthError::Forbidden {
        action: action.to_string(),
        reason: reason.into(),
    }
}

/// Authorization service.
///
/// Every check is a pure function of the actor and the record it wants
/// to touch.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may change the status of `complaint`.
    ///
    /// Administrators may act on any complaint. Handlers may act only on
    /// complaints whose category is their department. Submitters have no
    /// transition rights.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the actor may not transition the
    /// complaint, whatever the target status.
    pub fn authorize_transition(
        actor: &AuthenticatedActor,
        complaint: &Complaint,
    ) -> Result<(), AuthError> {
        const ACTION: &str = "update_complaint_status";
        match actor.role {
            Role::Administrator => Ok(()),
            Role::Handler => match &actor.department {
                Some(department) if *department == complaint.category => Ok(()),
                Some(department) => Err(forbidden(
                    ACTION,
                    format!(
                        "handler of department '{department}' may not act on complaints in '{}'",
                        complaint.category
                    ),
                )),
                None => Err(forbidden(ACTION, "handler has no department")),
            },
            Role::Submitter => Err(forbidden(
                ACTION,
                "submitters may not change complaint status",
            )),
        }
    }

    /// Checks if an actor may file a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a submitter.
    pub fn authorize_file_complaint(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Submitter => Ok(()),
            Role::Administrator | Role::Handler => Err(forbidden(
                "file_complaint",
                "only submitters may file complaints",
            )),
        }
    }

    /// Checks if an actor may attach feedback to `complaint`.
    ///
    /// Only the submitter who filed it may. Whether the complaint is closed
    /// is a lifecycle rule checked separately.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor did not file the complaint.
    pub fn authorize_submit_feedback(
        actor: &AuthenticatedActor,
        complaint: &Complaint,
    ) -> Result<(), AuthError> {
        if actor.role == Role::Submitter && complaint.is_submitted_by(actor.id) {
            Ok(())
        } else {
            Err(forbidden(
                "submit_feedback",
                "only the submitter of a complaint may leave feedback on it",
            ))
        }
    }

    /// Checks if an actor may remove feedback.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an administrator.
    pub fn authorize_remove_feedback(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrator => Ok(()),
            Role::Handler | Role::Submitter => Err(forbidden(
                "remove_feedback",
                "only administrators may remove feedback",
            )),
        }
    }

    /// Returns the slice of complaints an actor may list.
    ///
    /// Administrators see every complaint, handlers the complaints of their
    /// department and submitters their own.
    ///
    /// # Errors
    ///
    /// Returns an error for a handler without a department.
    pub fn complaint_listing_scope(actor: &AuthenticatedActor) -> Result<ComplaintFilter, AuthError> {
        match actor.role {
            Role::Administrator => Ok(ComplaintFilter::default()),
            Role::Handler => match &actor.department {
                Some(department) => Ok(ComplaintFilter {
                    category: Some(department.clone()),
                    ..ComplaintFilter::default()
                }),
                None => Err(forbidden("list_complaints", "handler has no department")),
            },
            Role::Submitter => Ok(ComplaintFilter {
                submitter: Some(actor.id),
                ..ComplaintFilter::default()
            }),
        }
    }

    /// Checks if an actor may delete a complaint.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an administrator.
    pub fn authorize_delete_complaint(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrator => Ok(()),
            Role::Handler | Role::Submitter => Err(forbidden(
                "delete_complaint",
                "only administrators may delete complaints",
            )),
        }
    }

    /// Checks if an actor may view `complaint`.
    ///
    /// Submitters may view their own complaints in any status.
    ///
    /// # Errors
    ///
    /// Returns an error if the complaint is outside the actor's scope.
    pub fn authorize_view_complaint(
        actor: &AuthenticatedActor,
        complaint: &Complaint,
    ) -> Result<(), AuthError> {
        let permitted: bool = match actor.role {
            Role::Administrator => true,
            Role::Handler => actor.handles(&complaint.category),
            Role::Submitter => complaint.is_submitted_by(actor.id),
        };
        if permitted {
            Ok(())
        } else {
            Err(forbidden(
                "view_complaint",
                format!("complaint {} is outside the actor's scope", complaint.id),
            ))
        }
    }

    /// Checks if an actor may read, mark or delete `record`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is the record's recipient.
    pub fn authorize_notification_access(
        actor: &AuthenticatedActor,
        record: &NotificationRecord,
    ) -> Result<(), AuthError> {
        if record.recipient_id == actor.id {
            Ok(())
        } else {
            Err(forbidden(
                "access_notification",
                "notifications are only accessible to their recipient",
            ))
        }
    }

    /// Checks if an actor may re-attempt queued notification deliveries.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is an administrator.
    pub fn authorize_retry_notifications(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Administrator => Ok(()),
            Role::Handler | Role::Submitter => Err(forbidden(
                "retry_notifications",
                "only administrators may retry queued notifications",
            )),
        }
    }

    /// Checks if an account with `role` may be registered by `requester`.
    ///
    /// Anyone may register a student account. Staff and administrator
    /// accounts require an administrator.
    ///
    /// # Errors
    ///
    /// Returns an error if a privileged role is requested without an
    /// administrator.
    pub fn authorize_register_account(
        requester: Option<&AuthenticatedActor>,
        role: AccountRole,
    ) -> Result<(), AuthError> {
        match (role, requester.map(|actor| actor.role)) {
            (AccountRole::Student, _)
            | (AccountRole::Staff | AccountRole::Admin, Some(Role::Administrator)) => Ok(()),
            (AccountRole::Staff | AccountRole::Admin, _) => Err(forbidden(
                "register_account",
                format!("only administrators may create {role} accounts"),
            )),
        }
    }
}
