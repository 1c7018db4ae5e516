// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::event::NotificationKind;
use campus_complaints_domain::UserId;
use serde::{Deserialize, Serialize};
use std::future::Future;
use time::OffsetDateTime;

/// Identifier of a stored notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(i64);

impl NotificationId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A notification record about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// The account the record belongs to.
    pub recipient_id: UserId,
    /// The kind of the originating event.
    pub kind: NotificationKind,
    /// The message shown to the recipient.
    pub message: String,
    /// The emission instant of the originating event.
    pub timestamp: OffsetDateTime,
}

/// A delivered notification, as its recipient sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    /// The record identifier.
    pub id: NotificationId,
    /// The account the record belongs to.
    pub recipient_id: UserId,
    /// The kind of the originating event.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// The message shown to the recipient.
    pub message: String,
    /// The emission instant of the originating event.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Whether the recipient has read it.
    pub read: bool,
}

/// The storage listeners write through.
///
/// Implementations must return `Send` futures so emission can run inside a
/// request handler. The hub's delivery timeout can only interrupt a store
/// at an `.await`; a store that does its work synchronously inside the
/// future always runs that work to completion.
pub trait NotificationStore {
    /// Error reported by the backing store.
    type Error: std::fmt::Display;

    /// Looks up the administrator account, if one exists.
    fn find_administrator(
        &mut self,
    ) -> impl Future<Output = Result<Option<UserId>, Self::Error>> + Send;

    /// Stores a notification record and returns it with its identifier.
    fn insert_notification(
        &mut self,
        notification: NewNotification,
    ) -> impl Future<Output = Result<NotificationRecord, Self::Error>> + Send;
}
