// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::UserId;
use campus_complaints_notify::{NotificationId, NotificationRecord};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::NotificationRow;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Lists the notification records addressed to `recipient`, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_notifications(
    conn: &mut SqliteConnection,
    recipient: UserId,
) -> Result<Vec<NotificationRecord>, PersistenceError> {
    notifications::table
        .filter(notifications::recipient_id.eq(recipient.value()))
        .order((
            notifications::created_at.desc(),
            notifications::notification_id.desc(),
        ))
        .select(NotificationRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_notifications: {e}")))?
        .into_iter()
        .map(NotificationRow::into_record)
        .collect()
}

/// Retrieves one notification record.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_notification(
    conn: &mut SqliteConnection,
    notification_id: NotificationId,
) -> Result<Option<NotificationRecord>, PersistenceError> {
    notifications::table
        .filter(notifications::notification_id.eq(notification_id.value()))
        .select(NotificationRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_notification: {e}")))?
        .map(NotificationRow::into_record)
        .transpose()
}
