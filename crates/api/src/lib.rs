// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Campus Complaints system.
//!
//! Requests are authenticated to an account, checked by the authorization
//! gateway, and only then handed to the lifecycle. Lower-layer errors are
//! translated into [`ApiError`] here and never leak past this crate.

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

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    MAX_SAVE_ATTEMPTS, delete_complaint, delete_notification, file_complaint, get_complaint,
    list_complaints, list_notifications, mark_notifications_read, register_account,
    remove_feedback, retry_pending_notifications, submit_feedback, update_complaint_status,
};
pub use request_response::{
    DeleteComplaintResponse, DeleteNotificationResponse, DeliverySummary, FileComplaintRequest,
    FileComplaintResponse, GetComplaintResponse, ListComplaintsRequest, ListComplaintsResponse,
    ListNotificationsResponse, MarkNotificationsReadResponse,
    RegisterAccountRequest, RegisterAccountResponse, RemoveFeedbackResponse,
    RetryNotificationsResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
    UpdateStatusRequest, UpdateStatusResponse,
};
