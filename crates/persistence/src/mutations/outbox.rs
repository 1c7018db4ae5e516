// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The retry outbox for failed notification deliveries.

use campus_complaints_notify::DeliveryFailure;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::pending_notifications;
use crate::error::PersistenceError;

/// Queues a failed delivery and returns the outbox entry ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn enqueue_pending(
    conn: &mut SqliteConnection,
    failure: &DeliveryFailure,
    queued_at: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(pending_notifications::table)
        .values((
            pending_notifications::listener.eq(failure.listener.to_string()),
            pending_notifications::kind.eq(failure.event.kind.as_str()),
            pending_notifications::recipient.eq(failure.event.recipient.to_string()),
            pending_notifications::message.eq(&failure.event.message),
            pending_notifications::emitted_at.eq(format_timestamp(failure.event.emitted_at)?),
            pending_notifications::complaint_id.eq(failure.event.complaint.map(|c| c.value())),
            pending_notifications::originator_id.eq(failure.event.originator.map(|u| u.value())),
            pending_notifications::attempts.eq(1),
            pending_notifications::last_error.eq(failure.error.to_string()),
            pending_notifications::queued_at.eq(format_timestamp(queued_at)?),
        ))
        .execute(conn)?;

    let pending_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        pending_id,
        listener = %failure.listener,
        kind = %failure.event.kind,
        "Queued failed notification delivery"
    );
    Ok(pending_id)
}

/// Removes a delivered entry from the outbox.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn remove_pending(conn: &mut SqliteConnection, pending_id: i64) -> Result<(), PersistenceError> {
    diesel::delete(
        pending_notifications::table.filter(pending_notifications::pending_id.eq(pending_id)),
    )
    .execute(conn)?;
    Ok(())
}

/// Records another failed attempt for an outbox entry.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn record_retry_failure(
    conn: &mut SqliteConnection,
    pending_id: i64,
    error: &str,
) -> Result<(), PersistenceError> {
    diesel::update(
        pending_notifications::table.filter(pending_notifications::pending_id.eq(pending_id)),
    )
    .set((
        pending_notifications::attempts.eq(pending_notifications::attempts + 1),
        pending_notifications::last_error.eq(error),
    ))
    .execute(conn)?;
    Ok(())
}
