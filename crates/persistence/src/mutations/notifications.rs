// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::UserId;
use campus_complaints_notify::{NewNotification, NotificationId, NotificationRecord};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::notifications;
use crate::error::PersistenceError;

/// Stores a notification record, unread.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the recipient
/// account does not exist.
pub fn insert_notification(
    conn: &mut SqliteConnection,
    notification: NewNotification,
) -> Result<NotificationRecord, PersistenceError> {
    diesel::insert_into(notifications::table)
        .values((
            notifications::recipient_id.eq(notification.recipient_id.value()),
            notifications::kind.eq(notification.kind.as_str()),
            notifications::message.eq(&notification.message),
            notifications::created_at.eq(format_timestamp(notification.timestamp)?),
            notifications::is_read.eq(0),
        ))
        .execute(conn)?;

    let notification_id: i64 = conn.get_last_insert_rowid()?;

    Ok(NotificationRecord {
        id: NotificationId::new(notification_id),
        recipient_id: notification.recipient_id,
        kind: notification.kind,
        message: notification.message,
        timestamp: notification.timestamp,
        read: false,
    })
}

/// Marks every record addressed to `recipient` as read.
///
/// Returns the number of records that changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn mark_all_read(
    conn: &mut SqliteConnection,
    recipient: UserId,
) -> Result<usize, PersistenceError> {
    Ok(diesel::update(
        notifications::table
            .filter(notifications::recipient_id.eq(recipient.value()))
            .filter(notifications::is_read.eq(0)),
    )
    .set(notifications::is_read.eq(1))
    .execute(conn)?)
}

/// Deletes one notification record.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such record exists.
pub fn delete_notification(
    conn: &mut SqliteConnection,
    notification_id: NotificationId,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        notifications::table.filter(notifications::notification_id.eq(notification_id.value())),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Notification {notification_id}"
        )));
    }
    Ok(())
}
