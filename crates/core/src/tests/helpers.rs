// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{
    Category, Complaint, ComplaintId, ComplaintStatus, StatusTimestamps, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const SUBMITTER: i64 = 3;

pub fn filed_at() -> OffsetDateTime {
    datetime!(2026-02-10 08:30 UTC)
}

pub fn create_test_complaint(status: ComplaintStatus) -> Complaint {
    let mut stamps: StatusTimestamps = StatusTimestamps::default();
    stamps.stamp(ComplaintStatus::Received, filed_at());
    if status != ComplaintStatus::Received {
        stamps.stamp(status, filed_at() + time::Duration::hours(1));
    }
    Complaint {
        id: ComplaintId::new(17),
        submitter: UserId::new(SUBMITTER),
        category: Category::new("IT"),
        title: String::from("Projector broken"),
        description: String::from("Lecture hall 2 projector shows no image"),
        location: Some(String::from("LH2")),
        status,
        status_timestamps: stamps,
        completed: status == ComplaintStatus::Closed,
        feedback: None,
        version: 1,
    }
}
