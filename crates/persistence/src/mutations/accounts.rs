// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{Account, AccountRole, Category, UserId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::accounts;
use crate::error::PersistenceError;

/// Creates an account.
///
/// The email is stored trimmed and lowercased and must be unique.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateEmail` if the email is taken, or
/// another error if the insert fails.
pub fn create_account(
    conn: &mut SqliteConnection,
    name: &str,
    email: &str,
    role: AccountRole,
    department: Option<&Category>,
    created_at: OffsetDateTime,
) -> Result<Account, PersistenceError> {
    let normalized_email: String = email.trim().to_lowercase();
    let name: &str = name.trim();

    let inserted = diesel::insert_into(accounts::table)
        .values((
            accounts::name.eq(name),
            accounts::email.eq(&normalized_email),
            accounts::role.eq(role.as_str()),
            accounts::department.eq(department.map(Category::label)),
            accounts::created_at.eq(format_timestamp(created_at)?),
        ))
        .execute(conn);

    match inserted {
        Ok(_) => {}
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(PersistenceError::DuplicateEmail(normalized_email));
        }
        Err(e) => return Err(e.into()),
    }

    let account_id: i64 = conn.get_last_insert_rowid()?;
    info!(account_id, %role, "Account created");

    Ok(Account {
        id: UserId::new(account_id),
        name: name.to_string(),
        email: normalized_email,
        role,
        department: department.cloned(),
    })
}
