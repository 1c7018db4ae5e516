// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use campus_complaints_domain::{
    Account, AccountRole, Category, Complaint, ComplaintStatus, NewComplaint, StatusTimestamps,
    UserId,
};
use campus_complaints_notify::{HubConfig, NotificationHub, NotificationRecord};
use campus_complaints_persistence::Persistence;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use tempfile::TempDir;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{AuthenticatedActor, FileComplaintRequest, Role};

/// A database with one account per role and a hub.
pub struct Campus {
    pub persistence: Persistence,
    pub hub: NotificationHub,
    pub admin: AuthenticatedActor,
    pub student: AuthenticatedActor,
    pub it_handler: AuthenticatedActor,
    pub hr_handler: AuthenticatedActor,
}

impl Campus {
    pub fn notifications_for(&mut self, user: UserId) -> Vec<NotificationRecord> {
        self.persistence.list_notifications(user).unwrap()
    }
}

fn create_actor(
    persistence: &mut Persistence,
    name: &str,
    email: &str,
    role: AccountRole,
    department: Option<&str>,
) -> AuthenticatedActor {
    let department: Option<Category> = department.map(Category::new);
    let account: Account = persistence
        .create_account(name, email, role, department.as_ref())
        .unwrap();
    AuthenticatedActor::from_account(account)
}

pub fn setup_campus() -> Campus {
    populate(Persistence::new_in_memory().expect("Failed to create in-memory persistence"))
}

fn populate(mut persistence: Persistence) -> Campus {
    let admin = create_actor(
        &mut persistence,
        "Ada Admin",
        "admin@campus.edu",
        AccountRole::Admin,
        None,
    );
    let student = create_actor(
        &mut persistence,
        "Sam Student",
        "sam@campus.edu",
        AccountRole::Student,
        None,
    );
    let it_handler = create_actor(
        &mut persistence,
        "Ivy IT",
        "ivy@campus.edu",
        AccountRole::Staff,
        Some("IT"),
    );
    let hr_handler = create_actor(
        &mut persistence,
        "Hal HR",
        "hal@campus.edu",
        AccountRole::Staff,
        Some("HR"),
    );
    Campus {
        persistence,
        hub: NotificationHub::new(HubConfig::default()),
        admin,
        student,
        it_handler,
        hr_handler,
    }
}

/// A campus stored in a database file, with a second connection to the
/// same file for changing the schema underneath the adapter.
pub struct FileCampus {
    pub campus: Campus,
    raw: SqliteConnection,
    _dir: TempDir,
}

impl FileCampus {
    fn execute(&mut self, sql: &str) {
        diesel::sql_query(sql).execute(&mut self.raw).unwrap();
    }

    /// Renames a column every account query selects, so account reads fail
    /// while complaint and notification tables stay usable.
    pub fn break_account_reads(&mut self) {
        self.execute("ALTER TABLE accounts RENAME COLUMN department TO dept");
    }

    /// Makes every delete from the outbox fail.
    pub fn lock_outbox(&mut self) {
        self.execute(
            "CREATE TRIGGER keep_pending BEFORE DELETE ON pending_notifications \
             BEGIN SELECT RAISE(ABORT, 'outbox locked'); END",
        );
    }
}

pub fn setup_file_campus() -> FileCampus {
    let dir: TempDir = tempfile::tempdir().unwrap();
    let path = dir.path().join("campus.db");
    let campus: Campus = populate(Persistence::new_with_file(&path).unwrap());
    let raw: SqliteConnection = SqliteConnection::establish(path.to_str().unwrap()).unwrap();
    FileCampus {
        campus,
        raw,
        _dir: dir,
    }
}

pub fn create_second_student(campus: &mut Campus) -> AuthenticatedActor {
    create_actor(
        &mut campus.persistence,
        "Sid Student",
        "sid@campus.edu",
        AccountRole::Student,
        None,
    )
}

pub fn create_test_admin_actor(id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(UserId::new(id), String::from("Admin"), Role::Administrator, None)
}

pub fn filed_at() -> OffsetDateTime {
    datetime!(2026-04-02 14:00 UTC)
}

pub fn it_request() -> FileComplaintRequest {
    FileComplaintRequest {
        title: String::from("Wi-Fi down"),
        category: String::from("IT"),
        description: String::from("No connectivity in the east wing"),
        location: Some(String::from("East wing, floor 2")),
    }
}

/// Stores a complaint in `status` directly, without notifications.
pub fn store_complaint(campus: &mut Campus, status: ComplaintStatus) -> Complaint {
    let mut stamps: StatusTimestamps = StatusTimestamps::default();
    stamps.stamp(ComplaintStatus::Received, filed_at());
    if status != ComplaintStatus::Received {
        stamps.stamp(status, filed_at());
    }
    let new: NewComplaint = NewComplaint {
        submitter: campus.student.id,
        category: Category::new("IT"),
        title: String::from("Projector broken"),
        description: String::from("Room 101 projector shows no image"),
        location: None,
        status,
        status_timestamps: stamps,
        completed: status == ComplaintStatus::Closed,
    };
    campus.persistence.insert_complaint(&new).unwrap()
}
