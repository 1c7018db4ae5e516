// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Complaint mutations.
//!
//! Saves are guarded by the record's version counter: an update only
//! applies if the stored version still equals the version the caller
//! loaded, and every applied update increments it.

use campus_complaints_domain::{Complaint, ComplaintId, ComplaintStatus, NewComplaint};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;
use crate::queries::complaints::get_complaint_version;

fn format_slot(
    at: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    at.map(format_timestamp).transpose()
}

/// Inserts a newly filed complaint and returns it with its identifier and
/// initial version.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the submitter
/// account does not exist.
pub fn insert_complaint(
    conn: &mut SqliteConnection,
    new: &NewComplaint,
) -> Result<Complaint, PersistenceError> {
    let stamps = &new.status_timestamps;
    let created_at: OffsetDateTime = stamps
        .get(ComplaintStatus::Received)
        .or_else(|| stamps.latest())
        .unwrap_or_else(OffsetDateTime::now_utc);

    diesel::insert_into(complaints::table)
        .values((
            complaints::submitter_id.eq(new.submitter.value()),
            complaints::category.eq(new.category.label()),
            complaints::title.eq(&new.title),
            complaints::description.eq(&new.description),
            complaints::location.eq(new.location.as_deref()),
            complaints::status.eq(new.status.as_str()),
            complaints::received_at.eq(format_slot(stamps.get(ComplaintStatus::Received))?),
            complaints::resolving_at.eq(format_slot(stamps.get(ComplaintStatus::Resolving))?),
            complaints::closed_at.eq(format_slot(stamps.get(ComplaintStatus::Closed))?),
            complaints::completed.eq(i32::from(new.completed)),
            complaints::version.eq(1_i64),
            complaints::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn)?;

    let complaint_id: i64 = conn.get_last_insert_rowid()?;
    debug!(complaint_id, category = %new.category, "Complaint inserted");

    Ok(Complaint {
        id: ComplaintId::new(complaint_id),
        submitter: new.submitter,
        category: new.category.clone(),
        title: new.title.clone(),
        description: new.description.clone(),
        location: new.location.clone(),
        status: new.status,
        status_timestamps: new.status_timestamps,
        completed: new.completed,
        feedback: None,
        version: 1,
    })
}

/// Writes the mutable fields of `complaint` if its version is current.
///
/// Returns the new version.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the stored version moved
/// on since `complaint` was loaded, `PersistenceError::NotFound` if the
/// complaint no longer exists, or another error if the update fails.
pub fn save_complaint(
    conn: &mut SqliteConnection,
    complaint: &Complaint,
) -> Result<i64, PersistenceError> {
    let stamps = &complaint.status_timestamps;
    let next_version: i64 = complaint.version + 1;

    let updated: usize = diesel::update(
        complaints::table
            .filter(complaints::complaint_id.eq(complaint.id.value()))
            .filter(complaints::version.eq(complaint.version)),
    )
    .set((
        complaints::status.eq(complaint.status.as_str()),
        complaints::received_at.eq(format_slot(stamps.get(ComplaintStatus::Received))?),
        complaints::resolving_at.eq(format_slot(stamps.get(ComplaintStatus::Resolving))?),
        complaints::closed_at.eq(format_slot(stamps.get(ComplaintStatus::Closed))?),
        complaints::completed.eq(i32::from(complaint.completed)),
        complaints::feedback_rating.eq(complaint
            .feedback
            .as_ref()
            .map(|f| i32::from(f.rating.value()))),
        complaints::feedback_text.eq(complaint.feedback.as_ref().map(|f| f.text.as_str())),
        complaints::version.eq(next_version),
    ))
    .execute(conn)?;

    if updated == 1 {
        debug!(
            complaint_id = complaint.id.value(),
            version = next_version,
            "Complaint saved"
        );
        return Ok(next_version);
    }

    match get_complaint_version(conn, complaint.id)? {
        Some(_) => Err(PersistenceError::VersionConflict {
            complaint_id: complaint.id.value(),
            expected_version: complaint.version,
        }),
        None => Err(PersistenceError::NotFound(format!(
            "Complaint {}",
            complaint.id
        ))),
    }
}

/// Deletes a complaint.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the complaint does not exist,
/// or another error if the delete fails.
pub fn delete_complaint(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(
        complaints::table.filter(complaints::complaint_id.eq(complaint_id.value())),
    )
    .execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::NotFound(format!("Complaint {complaint_id}")));
    }
    debug!(complaint_id = complaint_id.value(), "Complaint deleted");
    Ok(())
}
