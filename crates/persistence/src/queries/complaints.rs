// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{Category, Complaint, ComplaintId, ComplaintStatus, UserId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::ComplaintRow;
use crate::diesel_schema::complaints;
use crate::error::PersistenceError;

/// Retrieves a complaint by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
/// Returns `Ok(None)` if there is no such complaint.
pub fn get_complaint(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<Option<Complaint>, PersistenceError> {
    complaints::table
        .filter(complaints::complaint_id.eq(complaint_id.value()))
        .select(ComplaintRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_complaint: {e}")))?
        .map(ComplaintRow::into_complaint)
        .transpose()
}

/// Narrows a complaint listing. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    /// Only complaints filed by this account.
    pub submitter: Option<UserId>,
    /// Only complaints in this category.
    pub category: Option<Category>,
    /// Only complaints currently in this status.
    pub status: Option<ComplaintStatus>,
}

/// Lists the complaints matching `filter`, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn list_complaints(
    conn: &mut SqliteConnection,
    filter: &ComplaintFilter,
) -> Result<Vec<Complaint>, PersistenceError> {
    let mut query = complaints::table
        .select(ComplaintRow::as_select())
        .order(complaints::complaint_id.desc())
        .into_boxed();
    if let Some(submitter) = filter.submitter {
        query = query.filter(complaints::submitter_id.eq(submitter.value()));
    }
    if let Some(category) = &filter.category {
        query = query.filter(complaints::category.eq(category.label().to_string()));
    }

    let rows: Vec<ComplaintRow> = query
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_complaints: {e}")))?;

    // Status is matched after conversion so unreadable stored statuses
    // match as received, the same way they load.
    let mut matching: Vec<Complaint> = Vec::with_capacity(rows.len());
    for row in rows {
        let complaint: Complaint = row.into_complaint()?;
        if filter.status.is_none_or(|status| complaint.status == status) {
            matching.push(complaint);
        }
    }
    Ok(matching)
}

/// Returns the stored version of a complaint, if it exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_complaint_version(
    conn: &mut SqliteConnection,
    complaint_id: ComplaintId,
) -> Result<Option<i64>, PersistenceError> {
    complaints::table
        .filter(complaints::complaint_id.eq(complaint_id.value()))
        .select(complaints::version)
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_complaint_version: {e}")))
}
