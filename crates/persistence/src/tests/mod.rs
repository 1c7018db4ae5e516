// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]


use crate::Persistence;
use campus_complaints_domain::{
    Account, AccountRole, Category, Complaint, ComplaintStatus, NewComplaint, StatusTimestamps,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn filed_at() -> OffsetDateTime {
    datetime!(2026-04-02 14:00 UTC)
}

pub fn create_student(persistence: &mut Persistence, email: &str) -> Account {
    persistence
        .create_account("Test Student", email, AccountRole::Student, None)
        .unwrap()
}

pub fn create_staff(persistence: &mut Persistence, email: &str, department: &str) -> Account {
    persistence
        .create_account(
            "Test Staff",
            email,
            AccountRole::Staff,
            Some(&Category::new(department)),
        )
        .unwrap()
}

pub fn create_test_complaint(persistence: &mut Persistence, submitter: &Account) -> Complaint {
    let mut stamps: StatusTimestamps = StatusTimestamps::default();
    stamps.stamp(ComplaintStatus::Received, filed_at());
    let new: NewComplaint = NewComplaint {
        submitter: submitter.id,
        category: Category::new("IT"),
        title: String::from("Printer jam"),
        description: String::from("Library printer jams on every page"),
        location: None,
        status: ComplaintStatus::Received,
        status_timestamps: stamps,
        completed: false,
    };
    persistence.insert_complaint(&new).unwrap()
}
