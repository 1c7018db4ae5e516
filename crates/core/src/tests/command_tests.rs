// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{SUBMITTER, create_test_complaint, filed_at};
use crate::{
    CoreError, PendingNotification, announce_complaint, attach_feedback, file_complaint,
    remove_feedback,
};
use campus_complaints_domain::{
    Complaint, ComplaintDraft, ComplaintStatus, DomainError, NewComplaint, UserId,
};
use campus_complaints_notify::{Listener, NotificationKind, Recipient};

fn draft() -> ComplaintDraft {
    ComplaintDraft {
        title: String::from("  Wifi outage "),
        category: String::from("IT"),
        description: String::from("No wifi on floor 3"),
        location: Some(String::from("   ")),
    }
}

#[test]
fn test_file_complaint_starts_received() {
    let filed: NewComplaint = file_complaint(UserId::new(SUBMITTER), draft(), filed_at()).unwrap();

    assert_eq!(filed.status, ComplaintStatus::Received);
    assert!(!filed.completed);
    assert_eq!(filed.title, "Wifi outage");
    assert_eq!(filed.location, None);
    assert_eq!(
        filed.status_timestamps.get(ComplaintStatus::Received),
        Some(filed_at())
    );
    assert_eq!(filed.status_timestamps.get(ComplaintStatus::Resolving), None);
}

#[test]
fn test_file_complaint_rejects_invalid_draft() {
    let mut bad: ComplaintDraft = draft();
    bad.description = String::new();
    assert_eq!(
        file_complaint(UserId::new(SUBMITTER), bad, filed_at()),
        Err(CoreError::DomainViolation(DomainError::EmptyField {
            field: "description"
        }))
    );
}

#[test]
fn test_announce_with_two_handlers() {
    let complaint: Complaint = create_test_complaint(ComplaintStatus::Received);
    let mut sink: Vec<PendingNotification> = Vec::new();

    announce_complaint(
        &complaint,
        "Priya",
        &[UserId::new(20), UserId::new(21)],
        &mut sink,
    );

    assert_eq!(sink.len(), 3);
    assert_eq!(sink[0].event.kind, NotificationKind::ComplaintCreated);
    assert_eq!(sink[0].event.recipient, Recipient::Administrator);
    assert_eq!(sink[0].audience, vec![Listener::Administrator]);
    let assigned: Vec<&PendingNotification> = sink
        .iter()
        .filter(|p| p.event.kind == NotificationKind::ComplaintAssigned)
        .collect();
    assert_eq!(assigned.len(), 2);
    assert_eq!(assigned[1].audience, vec![Listener::Handler(UserId::new(21))]);
}

#[test]
fn test_feedback_requires_closed() {
    let mut complaint: Complaint = create_test_complaint(ComplaintStatus::Resolving);
    let mut sink: Vec<PendingNotification> = Vec::new();

    let result = attach_feedback(&mut complaint, 5, "Great", &[UserId::new(20)], &mut sink);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::FeedbackNotAllowed {
            status: ComplaintStatus::Resolving
        }))
    );
    assert!(complaint.feedback.is_none());
    assert!(sink.is_empty());
}

#[test]
fn test_feedback_rating_out_of_range() {
    let mut complaint: Complaint = create_test_complaint(ComplaintStatus::Closed);
    let mut sink: Vec<PendingNotification> = Vec::new();

    let result = attach_feedback(&mut complaint, 6, "", &[], &mut sink);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidRating {
            rating: 6
        }))
    );
    assert!(complaint.feedback.is_none());
}

#[test]
fn test_feedback_notifies_every_handler() {
    let mut complaint: Complaint = create_test_complaint(ComplaintStatus::Closed);
    let mut sink: Vec<PendingNotification> = Vec::new();

    attach_feedback(
        &mut complaint,
        4,
        " Sorted ",
        &[UserId::new(20), UserId::new(21)],
        &mut sink,
    )
    .unwrap();

    let feedback = complaint.feedback.as_ref().unwrap();
    assert_eq!(feedback.rating.value(), 4);
    assert_eq!(feedback.text, "Sorted");
    assert_eq!(sink.len(), 2);
    assert!(
        sink.iter()
            .all(|p| p.event.kind == NotificationKind::FeedbackSubmitted)
    );
}

#[test]
fn test_remove_feedback() {
    let mut complaint: Complaint = create_test_complaint(ComplaintStatus::Closed);
    let mut sink: Vec<PendingNotification> = Vec::new();
    attach_feedback(&mut complaint, 2, "Slow", &[], &mut sink).unwrap();

    let removed = remove_feedback(&mut complaint).unwrap();
    assert_eq!(removed.rating.value(), 2);
    assert!(complaint.feedback.is_none());
    assert_eq!(
        remove_feedback(&mut complaint),
        Err(CoreError::DomainViolation(DomainError::NoFeedback))
    );
}
