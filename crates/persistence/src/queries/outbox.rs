// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{PendingDelivery, PendingRow};
use crate::diesel_schema::pending_notifications;
use crate::error::PersistenceError;

/// Lists queued deliveries, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or an entry is malformed.
pub fn list_pending(conn: &mut SqliteConnection) -> Result<Vec<PendingDelivery>, PersistenceError> {
    pending_notifications::table
        .order(pending_notifications::pending_id.asc())
        .select(PendingRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_pending: {e}")))?
        .into_iter()
        .map(PendingRow::into_pending)
        .collect()
}
