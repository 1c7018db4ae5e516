// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Campus Complaints system.
//!
//! Stores accounts, complaints, delivered notification records and the
//! retry outbox in `SQLite` through Diesel. Migrations are embedded and run
//! when a database is opened.
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] gets its own shared
//! in-memory database, so tests never observe each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use campus_complaints_domain::{
    Account, AccountRole, Category, Complaint, ComplaintId, NewComplaint, UserId,
};
use campus_complaints_notify::{
    DeliveryFailure, NewNotification, NotificationId, NotificationRecord,
};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod store;

#[cfg(test)]
mod tests;

pub use data_models::PendingDelivery;
pub use queries::complaints::ComplaintFilter;
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateEmail` if the email is taken.
    pub fn create_account(
        &mut self,
        name: &str,
        email: &str,
        role: AccountRole,
        department: Option<&Category>,
    ) -> Result<Account, PersistenceError> {
        mutations::accounts::create_account(
            &mut self.conn,
            name,
            email,
            role,
            department,
            OffsetDateTime::now_utc(),
        )
    }

    /// Retrieves an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_account(&mut self, account_id: UserId) -> Result<Option<Account>, PersistenceError> {
        queries::accounts::get_account(&mut self.conn, account_id)
    }

    /// Lists the handlers of a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_handlers(&mut self, category: &Category) -> Result<Vec<UserId>, PersistenceError> {
        queries::accounts::list_handlers(&mut self.conn, category)
    }

    /// Finds the administrator account.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_administrator_id(&mut self) -> Result<Option<UserId>, PersistenceError> {
        queries::accounts::find_administrator(&mut self.conn)
    }

    // ========================================================================
    // Complaints
    // ========================================================================

    /// Stores a newly filed complaint.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_complaint(&mut self, new: &NewComplaint) -> Result<Complaint, PersistenceError> {
        mutations::complaints::insert_complaint(&mut self.conn, new)
    }

    /// Retrieves a complaint by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_complaint(
        &mut self,
        complaint_id: ComplaintId,
    ) -> Result<Option<Complaint>, PersistenceError> {
        queries::complaints::get_complaint(&mut self.conn, complaint_id)
    }

    /// Lists the complaints matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_complaints(
        &mut self,
        filter: &ComplaintFilter,
    ) -> Result<Vec<Complaint>, PersistenceError> {
        queries::complaints::list_complaints(&mut self.conn, filter)
    }

    /// Deletes a complaint.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if there is no such complaint.
    pub fn delete_complaint(&mut self, complaint_id: ComplaintId) -> Result<(), PersistenceError> {
        mutations::complaints::delete_complaint(&mut self.conn, complaint_id)
    }

    /// Saves a complaint under the optimistic version check and bumps
    /// `complaint.version` on success.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::VersionConflict` if the record was saved
    /// by someone else since it was loaded.
    pub fn save_complaint(&mut self, complaint: &mut Complaint) -> Result<(), PersistenceError> {
        complaint.version = mutations::complaints::save_complaint(&mut self.conn, complaint)?;
        Ok(())
    }

    // ========================================================================
    // Notification records
    // ========================================================================

    /// Stores a notification record.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_notification(
        &mut self,
        notification: NewNotification,
    ) -> Result<NotificationRecord, PersistenceError> {
        mutations::notifications::insert_notification(&mut self.conn, notification)
    }

    /// Lists the records addressed to `recipient`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_notifications(
        &mut self,
        recipient: UserId,
    ) -> Result<Vec<NotificationRecord>, PersistenceError> {
        queries::notifications::list_notifications(&mut self.conn, recipient)
    }

    /// Retrieves one notification record.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_notification(
        &mut self,
        notification_id: NotificationId,
    ) -> Result<Option<NotificationRecord>, PersistenceError> {
        queries::notifications::get_notification(&mut self.conn, notification_id)
    }

    /// Marks all of `recipient`'s records read.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_notifications_read(&mut self, recipient: UserId) -> Result<usize, PersistenceError> {
        mutations::notifications::mark_all_read(&mut self.conn, recipient)
    }

    /// Deletes one notification record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if it does not exist.
    pub fn delete_notification(
        &mut self,
        notification_id: NotificationId,
    ) -> Result<(), PersistenceError> {
        mutations::notifications::delete_notification(&mut self.conn, notification_id)
    }

    // ========================================================================
    // Outbox
    // ========================================================================

    /// Queues a failed delivery for retry.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn enqueue_pending(&mut self, failure: &DeliveryFailure) -> Result<i64, PersistenceError> {
        mutations::outbox::enqueue_pending(&mut self.conn, failure, OffsetDateTime::now_utc())
    }

    /// Lists queued deliveries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pending(&mut self) -> Result<Vec<PendingDelivery>, PersistenceError> {
        queries::outbox::list_pending(&mut self.conn)
    }

    /// Removes a delivered outbox entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn remove_pending(&mut self, pending_id: i64) -> Result<(), PersistenceError> {
        mutations::outbox::remove_pending(&mut self.conn, pending_id)
    }

    /// Records another failed attempt for an outbox entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn record_retry_failure(
        &mut self,
        pending_id: i64,
        error: &str,
    ) -> Result<(), PersistenceError> {
        mutations::outbox::record_retry_failure(&mut self.conn, pending_id, error)
    }
}
