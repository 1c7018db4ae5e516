// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use campus_complaints_domain::{Account, Complaint, ComplaintId, ComplaintStatus, Feedback};
use campus_complaints_notify::{NotificationId, NotificationRecord};
use serde::{Deserialize, Serialize};

/// API request to file a new complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileComplaintRequest {
    /// Short summary.
    pub title: String,
    /// Category, which selects the handling department.
    pub category: String,
    /// Full description.
    pub description: String,
    /// Where on campus the problem is.
    pub location: Option<String>,
}

/// API request to move a complaint to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    /// The wire name of the requested status.
    pub status: String,
}

/// API request to list complaints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListComplaintsRequest {
    /// Wire name of a status to narrow the listing to, e.g. `closed`.
    pub status: Option<String>,
}

/// API request to leave feedback on a closed complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFeedbackRequest {
    /// Rating from 1 to 5.
    pub rating: i64,
    /// Free-text comment. May be empty.
    pub text: String,
}

/// API request to create an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterAccountRequest {
    /// Display name.
    pub name: String,
    /// Contact email, unique across accounts.
    pub email: String,
    /// `Student`, `Staff` or `Admin`. Defaults to `Student`.
    pub role: Option<String>,
    /// Department; required for staff, rejected for everyone else.
    pub department: Option<String>,
}

/// How the notifications produced by a request fared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySummary {
    /// Notification records written.
    pub delivered: usize,
    /// Deliveries that failed and were queued for retry.
    pub queued: usize,
}

/// API response for a filed complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileComplaintResponse {
    /// The stored complaint.
    pub complaint: Complaint,
    /// Notification outcome.
    pub notifications: DeliverySummary,
    /// A success message.
    pub message: String,
}

/// API response for a status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    /// The updated complaint.
    pub complaint: Complaint,
    /// The status the complaint left.
    pub previous_status: ComplaintStatus,
    /// Notification outcome.
    pub notifications: DeliverySummary,
    /// A success message.
    pub message: String,
}

/// API response for submitted feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitFeedbackResponse {
    /// The complaint with its feedback attached.
    pub complaint: Complaint,
    /// Notification outcome.
    pub notifications: DeliverySummary,
    /// A success message.
    pub message: String,
}

/// API response for removed feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveFeedbackResponse {
    /// The complaint without feedback.
    pub complaint: Complaint,
    /// The feedback that was removed.
    pub removed: Feedback,
    /// A success message.
    pub message: String,
}

/// API response for viewing a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetComplaintResponse {
    /// The complaint.
    pub complaint: Complaint,
    /// Statuses the complaint may move to next.
    pub allowed_transitions: Vec<ComplaintStatus>,
}

/// API response listing the complaints in an actor's scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListComplaintsResponse {
    /// Complaints, newest first.
    pub complaints: Vec<Complaint>,
}

/// API response for a deleted complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteComplaintResponse {
    /// The complaint that was removed.
    pub deleted: ComplaintId,
    /// A success message.
    pub message: String,
}

/// API response for a created account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterAccountResponse {
    /// The stored account.
    pub account: Account,
    /// Notification outcome.
    pub notifications: DeliverySummary,
    /// A success message.
    pub message: String,
}

/// API response listing an actor's notification records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNotificationsResponse {
    /// Records, newest first.
    pub notifications: Vec<NotificationRecord>,
    /// How many of them are unread.
    pub unread: usize,
}

/// API response for marking notifications read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkNotificationsReadResponse {
    /// Records that changed from unread to read.
    pub updated: usize,
}

/// API response for a deleted notification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteNotificationResponse {
    /// The record that was removed.
    pub deleted: NotificationId,
}

/// API response for a retry pass over the outbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryNotificationsResponse {
    /// Outbox entries attempted.
    pub attempted: usize,
    /// Entries delivered and cleared.
    pub delivered: usize,
    /// Entries still queued after this pass.
    pub remaining: usize,
}
