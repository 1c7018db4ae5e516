// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::sink::EventSink;
use campus_complaints_domain::{
    Category, Complaint, ComplaintDraft, ComplaintStatus, DomainError, Feedback, NewComplaint,
    Rating, StatusTimestamps, UserId, validate_complaint_draft, validate_feedback_text,
};
use campus_complaints_notify::{Listener, NotificationEvent};
use time::OffsetDateTime;

/// Builds a new complaint in the received state from a submitter's draft.
///
/// The received timestamp is set to `at`.
///
/// # Errors
///
/// Returns an error if the draft fails validation.
pub fn file_complaint(
    submitter: UserId,
    draft: ComplaintDraft,
    at: OffsetDateTime,
) -> Result<NewComplaint, CoreError> {
    validate_complaint_draft(&draft)?;

    let mut status_timestamps: StatusTimestamps = StatusTimestamps::default();
    status_timestamps.stamp(ComplaintStatus::Received, at);

    Ok(NewComplaint {
        submitter,
        category: Category::new(&draft.category),
        title: draft.title.trim().to_string(),
        description: draft.description,
        location: draft
            .location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
        status: ComplaintStatus::Received,
        status_timestamps,
        completed: false,
    })
}

/// Records the notifications for a freshly stored complaint: one `created`
/// for the administrator and one `assigned` per handler of its category.
pub fn announce_complaint<E: EventSink>(
    complaint: &Complaint,
    submitter_name: &str,
    handlers: &[UserId],
    sink: &mut E,
) {
    sink.record(
        NotificationEvent::created(complaint.submitter, submitter_name, complaint.id),
        vec![Listener::Administrator],
    );
    for handler in handlers {
        sink.record(
            NotificationEvent::assigned(*handler, complaint.id),
            vec![Listener::Handler(*handler)],
        );
    }
}

/// Attaches the submitter's feedback to a closed complaint and records a
/// `feedback_submitted` notification for each handler of its category.
///
/// Existing feedback is replaced.
///
/// # Errors
///
/// Returns an error if the complaint is not closed, the rating is outside
/// 1..=5, or the text is too long. The record is untouched on error.
pub fn attach_feedback<E: EventSink>(
    complaint: &mut Complaint,
    rating: i64,
    text: &str,
    handlers: &[UserId],
    sink: &mut E,
) -> Result<(), CoreError> {
    if complaint.status != ComplaintStatus::Closed {
        return Err(DomainError::FeedbackNotAllowed {
            status: complaint.status,
        }
        .into());
    }
    let rating: Rating = Rating::new(rating)?;
    validate_feedback_text(text)?;

    complaint.feedback = Some(Feedback {
        rating,
        text: text.trim().to_string(),
    });
    for handler in handlers {
        sink.record(
            NotificationEvent::feedback_submitted(*handler, complaint.id),
            vec![Listener::Handler(*handler)],
        );
    }
    Ok(())
}

/// Removes the feedback from a complaint.
///
/// # Errors
///
/// Returns `DomainError::NoFeedback` if there is nothing to remove.
pub fn remove_feedback(complaint: &mut Complaint) -> Result<Feedback, CoreError> {
    complaint
        .feedback
        .take()
        .ok_or_else(|| DomainError::NoFeedback.into())
}
