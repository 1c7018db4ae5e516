// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{Account, AccountRole, Category, UserId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::AccountRow;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;

/// Retrieves an account by ID.
///
/// # Errors
///
/// Returns an error if the query fails. Returns `Ok(None)` if there is no
/// such account.
pub fn get_account(
    conn: &mut SqliteConnection,
    account_id: UserId,
) -> Result<Option<Account>, PersistenceError> {
    debug!(%account_id, "Looking up account");
    accounts::table
        .filter(accounts::account_id.eq(account_id.value()))
        .select(AccountRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("get_account: {e}")))?
        .map(AccountRow::into_account)
        .transpose()
}

/// Lists the staff accounts whose department equals `category`, in
/// ascending ID order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_handlers(
    conn: &mut SqliteConnection,
    category: &Category,
) -> Result<Vec<UserId>, PersistenceError> {
    let ids: Vec<i64> = accounts::table
        .filter(accounts::role.eq(AccountRole::Staff.as_str()))
        .filter(accounts::department.eq(category.label()))
        .order(accounts::account_id.asc())
        .select(accounts::account_id)
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("list_handlers: {e}")))?;
    Ok(ids.into_iter().map(UserId::new).collect())
}

/// Finds the administrator account. If several exist, the oldest wins.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_administrator(
    conn: &mut SqliteConnection,
) -> Result<Option<UserId>, PersistenceError> {
    let id: Option<i64> = accounts::table
        .filter(accounts::role.eq(AccountRole::Admin.as_str()))
        .order(accounts::account_id.asc())
        .select(accounts::account_id)
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(format!("find_administrator: {e}")))?;
    Ok(id.map(UserId::new))
}
