// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel row types and their conversion into domain types.

use campus_complaints_domain::{
    Account, AccountRole, Category, Complaint, ComplaintId, ComplaintStatus, Feedback, Rating,
    StatusTimestamps, UserId,
};
use campus_complaints_notify::{
    Listener, NotificationEvent, NotificationId, NotificationKind, NotificationRecord,
};
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::diesel_schema::{accounts, complaints, notifications, pending_notifications};
use crate::error::PersistenceError;

/// Formats an instant for storage.
///
/// # Errors
///
/// Returns an error if the instant cannot be represented as RFC 3339.
pub fn format_timestamp(at: OffsetDateTime) -> Result<String, PersistenceError> {
    at.format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp: {e}")))
}

/// Parses a stored instant.
///
/// # Errors
///
/// Returns an error if the value is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp '{value}': {e}")))
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = accounts)]
pub struct AccountRow {
    pub account_id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: Option<String>,
}

impl AccountRow {
    pub fn into_account(self) -> Result<Account, PersistenceError> {
        let role: AccountRole = self
            .role
            .parse()
            .map_err(|e| PersistenceError::SerializationError(format!("{e}")))?;
        Ok(Account {
            id: UserId::new(self.account_id),
            name: self.name,
            email: self.email,
            role,
            department: self.department.as_deref().map(Category::new),
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = complaints)]
pub struct ComplaintRow {
    pub complaint_id: i64,
    pub submitter_id: i64,
    pub category: String,
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub status: Option<String>,
    pub received_at: Option<String>,
    pub resolving_at: Option<String>,
    pub closed_at: Option<String>,
    pub completed: i32,
    pub feedback_rating: Option<i32>,
    pub feedback_text: Option<String>,
    pub version: i64,
}

impl ComplaintRow {
    pub fn into_complaint(self) -> Result<Complaint, PersistenceError> {
        let status: ComplaintStatus = ComplaintStatus::from_stored(self.status.as_deref());
        let status_timestamps: StatusTimestamps = StatusTimestamps::from_parts(
            parse_optional_timestamp(self.received_at.as_deref())?,
            parse_optional_timestamp(self.resolving_at.as_deref())?,
            parse_optional_timestamp(self.closed_at.as_deref())?,
        );
        let feedback: Option<Feedback> = match self.feedback_rating {
            Some(rating) => Some(Feedback {
                rating: Rating::new(i64::from(rating))
                    .map_err(|e| PersistenceError::SerializationError(e.to_string()))?,
                text: self.feedback_text.unwrap_or_default(),
            }),
            None => None,
        };

        Ok(Complaint {
            id: ComplaintId::new(self.complaint_id),
            submitter: UserId::new(self.submitter_id),
            category: Category::new(&self.category),
            title: self.title,
            description: self.description,
            location: self.location,
            status,
            status_timestamps,
            completed: self.completed != 0,
            feedback,
            version: self.version,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = notifications)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub recipient_id: i64,
    pub kind: String,
    pub message: String,
    pub created_at: String,
    pub is_read: i32,
}

impl NotificationRow {
    pub fn into_record(self) -> Result<NotificationRecord, PersistenceError> {
        let kind: NotificationKind = self
            .kind
            .parse()
            .map_err(PersistenceError::SerializationError)?;
        Ok(NotificationRecord {
            id: NotificationId::new(self.notification_id),
            recipient_id: UserId::new(self.recipient_id),
            kind,
            message: self.message,
            timestamp: parse_timestamp(&self.created_at)?,
            read: self.is_read != 0,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = pending_notifications)]
pub struct PendingRow {
    pub pending_id: i64,
    pub listener: String,
    pub kind: String,
    pub recipient: String,
    pub message: String,
    pub emitted_at: String,
    pub complaint_id: Option<i64>,
    pub originator_id: Option<i64>,
    pub attempts: i32,
    pub last_error: String,
}

/// A queued delivery awaiting retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    /// Outbox entry identifier.
    pub id: i64,
    /// The listener the event was addressed to.
    pub listener: Listener,
    /// The undelivered event.
    pub event: NotificationEvent,
    /// How many delivery attempts have failed so far.
    pub attempts: i32,
    /// The most recent failure.
    pub last_error: String,
}

impl PendingRow {
    pub fn into_pending(self) -> Result<PendingDelivery, PersistenceError> {
        let listener: Listener = self
            .listener
            .parse()
            .map_err(PersistenceError::SerializationError)?;
        let event: NotificationEvent = NotificationEvent::from_stored(
            &self.kind,
            &self.recipient,
            self.message,
            parse_timestamp(&self.emitted_at)?,
            self.complaint_id.map(ComplaintId::new),
            self.originator_id.map(UserId::new),
        )
        .map_err(PersistenceError::SerializationError)?;
        Ok(PendingDelivery {
            id: self.pending_id,
            listener,
            event,
            attempts: self.attempts,
            last_error: self.last_error,
        })
    }
}
