// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{Account, ComplaintId, ComplaintStatus, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The kind of a notification.
///
/// Serializes to the wire names (`COMPLAINT_CREATED`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// A complaint was filed.
    ComplaintCreated,
    /// A complaint was routed to a handler's department.
    ComplaintAssigned,
    /// A complaint moved to a new status.
    ComplaintStatusUpdated,
    /// The submitter left feedback on a closed complaint.
    FeedbackSubmitted,
    /// A new account was created.
    UserRegistered,
}

impl NotificationKind {
    /// Returns the wire representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ComplaintCreated => "COMPLAINT_CREATED",
            Self::ComplaintAssigned => "COMPLAINT_ASSIGNED",
            Self::ComplaintStatusUpdated => "COMPLAINT_STATUS_UPDATED",
            Self::FeedbackSubmitted => "FEEDBACK_SUBMITTED",
            Self::UserRegistered => "USER_REGISTERED",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COMPLAINT_CREATED" => Ok(Self::ComplaintCreated),
            "COMPLAINT_ASSIGNED" => Ok(Self::ComplaintAssigned),
            "COMPLAINT_STATUS_UPDATED" => Ok(Self::ComplaintStatusUpdated),
            "FEEDBACK_SUBMITTED" => Ok(Self::FeedbackSubmitted),
            "USER_REGISTERED" => Ok(Self::UserRegistered),
            _ => Err(format!("Unknown notification kind: {s}")),
        }
    }
}

/// Who an event is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    /// A specific account.
    User(UserId),
    /// Whoever holds the administrator role.
    Administrator,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Administrator => f.write_str("administrator"),
        }
    }
}

impl FromStr for Recipient {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "administrator" {
            return Ok(Self::Administrator);
        }
        s.strip_prefix("user:")
            .and_then(|raw| raw.parse::<i64>().ok())
            .map(|id| Self::User(UserId::new(id)))
            .ok_or_else(|| format!("Unknown recipient: {s}"))
    }
}

/// A single notification emitted by the lifecycle.
///
/// Each constructor fixes the recipient and the message template, and
/// captures the emission instant when called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// The kind of event.
    pub kind: NotificationKind,
    /// Who should receive it.
    pub recipient: Recipient,
    /// Human-readable message.
    pub message: String,
    /// When the event was emitted.
    #[serde(with = "time::serde::rfc3339")]
    pub emitted_at: OffsetDateTime,
    /// The complaint the event is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complaint: Option<ComplaintId>,
    /// The account whose action produced the event, if it is not the
    /// recipient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub originator: Option<UserId>,
}

impl NotificationEvent {
    fn now(kind: NotificationKind, recipient: Recipient, message: String) -> Self {
        Self {
            kind,
            recipient,
            message,
            emitted_at: OffsetDateTime::now_utc(),
            complaint: None,
            originator: None,
        }
    }

    const fn about(mut self, complaint: ComplaintId) -> Self {
        self.complaint = Some(complaint);
        self
    }

    const fn from_originator(mut self, originator: UserId) -> Self {
        self.originator = Some(originator);
        self
    }

    /// A complaint was filed. Addressed to the administrator.
    #[must_use]
    pub fn created(submitter: UserId, submitter_name: &str, complaint: ComplaintId) -> Self {
        Self::now(
            NotificationKind::ComplaintCreated,
            Recipient::Administrator,
            format!("A new complaint has been created by {submitter_name}."),
        )
        .about(complaint)
        .from_originator(submitter)
    }

    /// A complaint was routed to `handler`'s department.
    #[must_use]
    pub fn assigned(handler: UserId, complaint: ComplaintId) -> Self {
        Self::now(
            NotificationKind::ComplaintAssigned,
            Recipient::User(handler),
            format!("Complaint {complaint} has been assigned to your department."),
        )
        .about(complaint)
    }

    /// The submitter's complaint entered `status`.
    #[must_use]
    pub fn status_changed(
        submitter: UserId,
        complaint: ComplaintId,
        status: ComplaintStatus,
    ) -> Self {
        Self::now(
            NotificationKind::ComplaintStatusUpdated,
            Recipient::User(submitter),
            format!("Your complaint {complaint} is now {status}."),
        )
        .about(complaint)
    }

    /// Feedback was left on a complaint `handler` is responsible for.
    ///
    /// Feedback is stored on its complaint, so the complaint id identifies it.
    #[must_use]
    pub fn feedback_submitted(handler: UserId, feedback: ComplaintId) -> Self {
        Self::now(
            NotificationKind::FeedbackSubmitted,
            Recipient::User(handler),
            format!("New feedback received (ID: {feedback})."),
        )
        .about(feedback)
    }

    /// A new account was created. Addressed to the administrator.
    #[must_use]
    pub fn user_registered(account: &Account) -> Self {
        Self::now(
            NotificationKind::UserRegistered,
            Recipient::Administrator,
            format!(
                "New {} registered: {} ({}).",
                account.role, account.name, account.email
            ),
        )
        .from_originator(account.id)
    }

    /// Rebuilds an event from its stored parts.
    ///
    /// # Errors
    ///
    /// Returns an error string if the kind or recipient is not recognized.
    pub fn from_stored(
        kind: &str,
        recipient: &str,
        message: String,
        emitted_at: OffsetDateTime,
        complaint: Option<ComplaintId>,
        originator: Option<UserId>,
    ) -> Result<Self, String> {
        Ok(Self {
            kind: kind.parse()?,
            recipient: recipient.parse()?,
            message,
            emitted_at,
            complaint,
            originator,
        })
    }
}
