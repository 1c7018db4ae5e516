// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Every mutating handler follows the same order: authorize, mutate the
//! record through the lifecycle, persist it under the version check, and
//! only then emit the notifications the mutation produced. Deliveries that
//! fail are queued in the outbox; they never undo the stored mutation.

use campus_complaints::{
    EventSink, LifecycleController, PendingNotification, Transition, announce_complaint,
    attach_feedback, file_complaint as build_complaint, remove_feedback as take_feedback,
};
use campus_complaints_domain::{
    Account, AccountRole, Category, Complaint, ComplaintDraft, ComplaintId, ComplaintStatus,
    Feedback, NewComplaint, UserId, validate_account_fields,
};
use campus_complaints_notify::{
    DeliveryReport, Listener, NotificationEvent, NotificationHub, NotificationId,
    NotificationRecord,
};
use campus_complaints_persistence::{
    ComplaintFilter, PendingDelivery, Persistence, PersistenceError,
};
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    DeleteComplaintResponse, DeleteNotificationResponse, DeliverySummary, FileComplaintRequest,
    FileComplaintResponse, GetComplaintResponse, ListComplaintsRequest, ListComplaintsResponse,
    ListNotificationsResponse, MarkNotificationsReadResponse,
    RegisterAccountRequest, RegisterAccountResponse, RemoveFeedbackResponse,
    RetryNotificationsResponse, SubmitFeedbackRequest, SubmitFeedbackResponse,
    UpdateStatusRequest, UpdateStatusResponse,
};

/// How many times a save is attempted before a version conflict is
/// reported to the caller.
pub const MAX_SAVE_ATTEMPTS: u32 = 3;

fn load_complaint(
    persistence: &mut Persistence,
    complaint_id: ComplaintId,
) -> Result<Complaint, ApiError> {
    persistence
        .get_complaint(complaint_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Complaint"),
            message: format!("Complaint {complaint_id} does not exist"),
        })
}

/// Loads a complaint, applies `apply` to it and saves it under the version
/// check, reloading and re-applying when another writer got there first.
///
/// `apply` runs against the freshly loaded record on every attempt, so
/// authorization and lifecycle validation always see the latest state.
/// Notifications recorded by a losing attempt are discarded.
///
/// # Errors
///
/// Returns whatever `apply` returns, `ApiError::ResourceNotFound` if the
/// complaint does not exist, or `ApiError::Conflict` once the attempts are
/// exhausted.
pub fn apply_with_retry<T, F>(
    persistence: &mut Persistence,
    complaint_id: ComplaintId,
    mut apply: F,
) -> Result<(Complaint, T, Vec<PendingNotification>), ApiError>
where
    F: FnMut(
        &mut Persistence,
        &mut Complaint,
        &mut Vec<PendingNotification>,
    ) -> Result<T, ApiError>,
{
    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let mut complaint: Complaint = load_complaint(persistence, complaint_id)?;
        let mut pending: Vec<PendingNotification> = Vec::new();
        let outcome: T = apply(persistence, &mut complaint, &mut pending)?;

        match persistence.save_complaint(&mut complaint) {
            Ok(()) => return Ok((complaint, outcome, pending)),
            Err(PersistenceError::VersionConflict {
                expected_version, ..
            }) => {
                warn!(
                    complaint = %complaint_id,
                    attempt,
                    expected_version,
                    "Complaint changed concurrently, reloading"
                );
            }
            Err(e) => return Err(translate_persistence_error(e)),
        }
    }

    Err(ApiError::Conflict {
        message: format!(
            "Complaint {complaint_id} kept changing; gave up after {MAX_SAVE_ATTEMPTS} attempts"
        ),
    })
}

/// Emits `pending` through the hub and queues every failed delivery.
pub async fn dispatch(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    pending: Vec<PendingNotification>,
) -> DeliverySummary {
    let mut report: DeliveryReport = DeliveryReport::default();
    for notification in pending {
        report.merge(
            hub.emit(notification.event, &notification.audience, persistence)
                .await,
        );
    }

    let mut queued: usize = 0;
    for failure in &report.failures {
        match persistence.enqueue_pending(failure) {
            Ok(pending_id) => {
                queued += 1;
                info!(
                    pending_id,
                    listener = %failure.listener,
                    error = %failure.error,
                    "Notification queued for retry"
                );
            }
            Err(e) => error!(
                listener = %failure.listener,
                kind = %failure.event.kind,
                error = %e,
                "Failed to queue undelivered notification; it is lost"
            ),
        }
    }

    DeliverySummary {
        delivered: report.delivered.len(),
        queued,
    }
}

fn handlers_of(
    persistence: &mut Persistence,
    category: &Category,
) -> Result<Vec<UserId>, ApiError> {
    persistence
        .list_handlers(category)
        .map_err(translate_persistence_error)
}

/// Files a new complaint for `actor`.
///
/// The administrator is told about it and every handler of its category
/// gets an assignment notice.
///
/// # Errors
///
/// Returns an error if the actor is not a submitter, the fields are
/// invalid, or the complaint cannot be stored.
pub async fn file_complaint(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    actor: &AuthenticatedActor,
    request: FileComplaintRequest,
) -> Result<FileComplaintResponse, ApiError> {
    AuthorizationService::authorize_file_complaint(actor)?;

    let draft: ComplaintDraft = ComplaintDraft {
        title: request.title,
        category: request.category,
        description: request.description,
        location: request.location,
    };
    let new_complaint: NewComplaint =
        build_complaint(actor.id, draft, OffsetDateTime::now_utc()).map_err(translate_core_error)?;

    // Handlers are resolved first so a failed lookup leaves nothing stored.
    let handlers: Vec<UserId> = handlers_of(persistence, &new_complaint.category)?;
    let complaint: Complaint = persistence
        .insert_complaint(&new_complaint)
        .map_err(translate_persistence_error)?;

    info!(
        complaint = %complaint.id,
        submitter = %actor.id,
        category = %complaint.category,
        handlers = handlers.len(),
        "Complaint filed"
    );

    let mut pending: Vec<PendingNotification> = Vec::new();
    announce_complaint(&complaint, &actor.name, &handlers, &mut pending);
    let notifications: DeliverySummary = dispatch(persistence, hub, pending).await;

    Ok(FileComplaintResponse {
        message: format!("Complaint {} filed", complaint.id),
        complaint,
        notifications,
    })
}

/// Moves a complaint to the requested status.
///
/// # Errors
///
/// Returns `ApiError::Forbidden` if the actor may not act on the complaint,
/// `ApiError::InvalidTransition` if the target is not reachable,
/// `ApiError::ResourceNotFound` if the complaint does not exist, or
/// `ApiError::Conflict` if it kept changing underneath the request.
pub async fn update_complaint_status(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    actor: &AuthenticatedActor,
    complaint_id: ComplaintId,
    request: &UpdateStatusRequest,
) -> Result<UpdateStatusResponse, ApiError> {
    let target: ComplaintStatus = request
        .status
        .parse::<ComplaintStatus>()
        .map_err(translate_domain_error)?;

    let (complaint, transition, pending): (Complaint, Transition, Vec<PendingNotification>) =
        apply_with_retry(persistence, complaint_id, |_, complaint, sink| {
            AuthorizationService::authorize_transition(actor, complaint)?;
            LifecycleController::initialize(complaint)
                .request_transition(target, OffsetDateTime::now_utc(), sink)
                .map_err(translate_core_error)
        })?;

    info!(
        complaint = %complaint.id,
        actor = %actor.id,
        from = %transition.from,
        to = %transition.to,
        version = complaint.version,
        "Complaint status updated"
    );

    let notifications: DeliverySummary = dispatch(persistence, hub, pending).await;

    Ok(UpdateStatusResponse {
        message: format!("Complaint {} is now {}", complaint.id, transition.to),
        previous_status: transition.from,
        complaint,
        notifications,
    })
}

/// Attaches the submitter's feedback to their closed complaint.
///
/// # Errors
///
/// Returns an error if the actor did not file the complaint, the complaint
/// is not closed, or the rating or text is invalid.
pub async fn submit_feedback(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    actor: &AuthenticatedActor,
    complaint_id: ComplaintId,
    request: &SubmitFeedbackRequest,
) -> Result<SubmitFeedbackResponse, ApiError> {
    let (complaint, (), pending): (Complaint, (), Vec<PendingNotification>) =
        apply_with_retry(persistence, complaint_id, |persistence, complaint, sink| {
            AuthorizationService::authorize_submit_feedback(actor, complaint)?;
            let handlers: Vec<UserId> = handlers_of(persistence, &complaint.category)?;
            attach_feedback(complaint, request.rating, &request.text, &handlers, sink)
                .map_err(translate_core_error)
        })?;

    info!(
        complaint = %complaint.id,
        submitter = %actor.id,
        rating = request.rating,
        "Feedback submitted"
    );

    let notifications: DeliverySummary = dispatch(persistence, hub, pending).await;

    Ok(SubmitFeedbackResponse {
        message: format!("Feedback recorded for complaint {}", complaint.id),
        complaint,
        notifications,
    })
}

/// Removes the feedback from a complaint.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the complaint
/// has no feedback.
pub fn remove_feedback(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    complaint_id: ComplaintId,
) -> Result<RemoveFeedbackResponse, ApiError> {
    AuthorizationService::authorize_remove_feedback(actor)?;

    let (complaint, removed, _): (Complaint, Feedback, Vec<PendingNotification>) =
        apply_with_retry(persistence, complaint_id, |_, complaint, _| {
            take_feedback(complaint).map_err(translate_core_error)
        })?;

    info!(complaint = %complaint.id, actor = %actor.id, "Feedback removed");

    Ok(RemoveFeedbackResponse {
        message: format!("Feedback removed from complaint {}", complaint.id),
        complaint,
        removed,
    })
}

/// Returns a complaint the actor is allowed to see.
///
/// # Errors
///
/// Returns an error if the complaint does not exist or is outside the
/// actor's scope.
pub fn get_complaint(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    complaint_id: ComplaintId,
) -> Result<GetComplaintResponse, ApiError> {
    let complaint: Complaint = load_complaint(persistence, complaint_id)?;
    AuthorizationService::authorize_view_complaint(actor, &complaint)?;

    Ok(GetComplaintResponse {
        allowed_transitions: complaint.status.allowed_targets(),
        complaint,
    })
}

/// Lists the complaints in the actor's scope, newest first, optionally
/// narrowed to one status.
///
/// # Errors
///
/// Returns an error if the status is not recognized, the actor is a
/// handler without a department, or the complaints cannot be read.
pub fn list_complaints(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &ListComplaintsRequest,
) -> Result<ListComplaintsResponse, ApiError> {
    let mut filter: ComplaintFilter = AuthorizationService::complaint_listing_scope(actor)?;
    filter.status = request
        .status
        .as_deref()
        .map(str::parse::<ComplaintStatus>)
        .transpose()
        .map_err(translate_domain_error)?;

    let complaints: Vec<Complaint> = persistence
        .list_complaints(&filter)
        .map_err(translate_persistence_error)?;
    debug!(actor = %actor.id, count = complaints.len(), "Complaints listed");

    Ok(ListComplaintsResponse { complaints })
}

/// Deletes a complaint.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the complaint
/// does not exist.
pub fn delete_complaint(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    complaint_id: ComplaintId,
) -> Result<DeleteComplaintResponse, ApiError> {
    AuthorizationService::authorize_delete_complaint(actor)?;
    let complaint: Complaint = load_complaint(persistence, complaint_id)?;

    persistence
        .delete_complaint(complaint.id)
        .map_err(translate_persistence_error)?;
    info!(complaint = %complaint.id, actor = %actor.id, "Complaint deleted");

    Ok(DeleteComplaintResponse {
        deleted: complaint.id,
        message: format!("Complaint {} deleted", complaint.id),
    })
}

fn parse_department(
    role: AccountRole,
    department: Option<&str>,
) -> Result<Option<Category>, ApiError> {
    let department: Option<&str> = department.map(str::trim).filter(|d| !d.is_empty());
    match (role, department) {
        (AccountRole::Staff, Some(label)) => Ok(Some(Category::new(label))),
        (AccountRole::Staff, None) => Err(ApiError::InvalidInput {
            field: String::from("department"),
            message: String::from("Staff accounts require a department"),
        }),
        (AccountRole::Student | AccountRole::Admin, Some(_)) => Err(ApiError::InvalidInput {
            field: String::from("department"),
            message: format!("{role} accounts do not belong to a department"),
        }),
        (AccountRole::Student | AccountRole::Admin, None) => Ok(None),
    }
}

/// Creates an account and tells the administrator about it.
///
/// `requester` is the actor creating the account, if any. Student
/// accounts may be created by anyone; other roles need an administrator.
///
/// # Errors
///
/// Returns an error if the fields are invalid, a privileged role is
/// requested without an administrator, or the email is already taken.
pub async fn register_account(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    requester: Option<&AuthenticatedActor>,
    request: &RegisterAccountRequest,
) -> Result<RegisterAccountResponse, ApiError> {
    let role: AccountRole = match request.role.as_deref() {
        Some(role) => role.parse::<AccountRole>().map_err(translate_domain_error)?,
        None => AccountRole::Student,
    };
    AuthorizationService::authorize_register_account(requester, role)?;
    validate_account_fields(&request.name, &request.email).map_err(translate_domain_error)?;
    let department: Option<Category> = parse_department(role, request.department.as_deref())?;

    let account: Account = persistence
        .create_account(&request.name, &request.email, role, department.as_ref())
        .map_err(translate_persistence_error)?;

    let mut pending: Vec<PendingNotification> = Vec::new();
    pending.record(
        NotificationEvent::user_registered(&account),
        vec![Listener::Administrator],
    );
    let notifications: DeliverySummary = dispatch(persistence, hub, pending).await;

    Ok(RegisterAccountResponse {
        message: format!("{} account created for {}", account.role, account.name),
        account,
        notifications,
    })
}

/// Lists the actor's notification records, newest first.
///
/// # Errors
///
/// Returns an error if the records cannot be read.
pub fn list_notifications(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListNotificationsResponse, ApiError> {
    let notifications: Vec<NotificationRecord> = persistence
        .list_notifications(actor.id)
        .map_err(translate_persistence_error)?;
    let unread: usize = notifications.iter().filter(|n| !n.read).count();

    Ok(ListNotificationsResponse {
        notifications,
        unread,
    })
}

/// Marks all of the actor's notification records read.
///
/// # Errors
///
/// Returns an error if the records cannot be updated.
pub fn mark_notifications_read(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<MarkNotificationsReadResponse, ApiError> {
    let updated: usize = persistence
        .mark_notifications_read(actor.id)
        .map_err(translate_persistence_error)?;
    debug!(actor = %actor.id, updated, "Notifications marked read");
    Ok(MarkNotificationsReadResponse { updated })
}

/// Deletes one of the actor's notification records.
///
/// # Errors
///
/// Returns an error if the record does not exist or belongs to someone
/// else.
pub fn delete_notification(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    notification_id: NotificationId,
) -> Result<DeleteNotificationResponse, ApiError> {
    let record: NotificationRecord = persistence
        .get_notification(notification_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Notification"),
            message: format!("Notification {notification_id} does not exist"),
        })?;
    AuthorizationService::authorize_notification_access(actor, &record)?;

    persistence
        .delete_notification(notification_id)
        .map_err(translate_persistence_error)?;
    debug!(actor = %actor.id, notification = %notification_id, "Notification deleted");

    Ok(DeleteNotificationResponse {
        deleted: notification_id,
    })
}

/// Re-attempts every queued delivery once.
///
/// Delivered entries leave the outbox; entries that fail again stay queued
/// with their attempt count bumped. Delivery is at least once: an entry
/// that was delivered but could not be removed stays queued, is counted in
/// both `delivered` and `remaining`, and is delivered again next pass.
///
/// # Errors
///
/// Returns an error if the actor is not an administrator or the outbox
/// cannot be read or updated.
pub async fn retry_pending_notifications(
    persistence: &mut Persistence,
    hub: &NotificationHub,
    actor: &AuthenticatedActor,
) -> Result<RetryNotificationsResponse, ApiError> {
    AuthorizationService::authorize_retry_notifications(actor)?;

    let queued: Vec<PendingDelivery> = persistence
        .list_pending()
        .map_err(translate_persistence_error)?;
    let mut response: RetryNotificationsResponse = RetryNotificationsResponse {
        attempted: queued.len(),
        ..RetryNotificationsResponse::default()
    };

    for entry in queued {
        match hub
            .redeliver(entry.listener, &entry.event, persistence)
            .await
        {
            Ok(_) => {
                response.delivered += 1;
                if let Err(e) = persistence.remove_pending(entry.id) {
                    error!(
                        pending_id = entry.id,
                        error = %e,
                        "Delivered notification could not be removed from the outbox; it will be delivered again"
                    );
                    response.remaining += 1;
                }
            }
            Err(e) => {
                warn!(
                    pending_id = entry.id,
                    attempts = entry.attempts + 1,
                    error = %e,
                    "Queued notification failed again"
                );
                persistence
                    .record_retry_failure(entry.id, &e.to_string())
                    .map_err(translate_persistence_error)?;
                response.remaining += 1;
            }
        }
    }

    info!(
        attempted = response.attempted,
        delivered = response.delivered,
        remaining = response.remaining,
        "Outbox retry pass finished"
    );
    Ok(response)
}
