// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_complaints_domain::{
    AccountRole, Category, Complaint, ComplaintId, ComplaintStatus, StatusTimestamps, UserId,
};
use campus_complaints_notify::{NotificationId, NotificationKind, NotificationRecord};
use campus_complaints_persistence::ComplaintFilter;

use super::helpers::{create_test_admin_actor, filed_at};
use crate::{AuthError, AuthenticatedActor, AuthorizationService, Role};

const SUBMITTER: i64 = 7;

fn complaint_in(category: &str) -> Complaint {
    let mut stamps: StatusTimestamps = StatusTimestamps::default();
    stamps.stamp(ComplaintStatus::Received, filed_at());
    Complaint {
        id: ComplaintId::new(1),
        submitter: UserId::new(SUBMITTER),
        category: Category::new(category),
        title: String::from("Heating"),
        description: String::from("Radiators cold"),
        location: None,
        status: ComplaintStatus::Received,
        status_timestamps: stamps,
        completed: false,
        feedback: None,
        version: 1,
    }
}

fn handler(department: Option<&str>) -> AuthenticatedActor {
    AuthenticatedActor::new(
        UserId::new(20),
        String::from("Handler"),
        Role::Handler,
        department.map(Category::new),
    )
}

fn submitter(id: i64) -> AuthenticatedActor {
    AuthenticatedActor::new(UserId::new(id), String::from("Student"), Role::Submitter, None)
}

fn is_forbidden<T>(result: &Result<T, AuthError>) -> bool {
    matches!(result, Err(AuthError::Forbidden { .. }))
}

#[test]
fn test_role_mapping() {
    assert_eq!(Role::from_account_role(AccountRole::Admin), Role::Administrator);
    assert_eq!(Role::from_account_role(AccountRole::Staff), Role::Handler);
    assert_eq!(Role::from_account_role(AccountRole::Student), Role::Submitter);
}

#[test]
fn test_administrator_may_transition_any_complaint() {
    let admin = create_test_admin_actor(1);
    assert!(AuthorizationService::authorize_transition(&admin, &complaint_in("IT")).is_ok());
    assert!(AuthorizationService::authorize_transition(&admin, &complaint_in("HR")).is_ok());
}

#[test]
fn test_handler_limited_to_own_department() {
    let it = handler(Some("IT"));
    assert!(AuthorizationService::authorize_transition(&it, &complaint_in("IT")).is_ok());

    let result = AuthorizationService::authorize_transition(&it, &complaint_in("HR"));
    assert!(is_forbidden(&result));
    assert!(result.unwrap_err().to_string().contains("'IT'"));
}

#[test]
fn test_department_match_is_exact() {
    let it = handler(Some("IT"));
    assert!(is_forbidden(&AuthorizationService::authorize_transition(
        &it,
        &complaint_in("it")
    )));
}

#[test]
fn test_handler_without_department_is_forbidden() {
    let result = AuthorizationService::authorize_transition(&handler(None), &complaint_in("IT"));
    assert_eq!(
        result,
        Err(AuthError::Forbidden {
            action: String::from("update_complaint_status"),
            reason: String::from("handler has no department"),
        })
    );
}

#[test]
fn test_submitter_has_no_transition_rights() {
    let owner = submitter(SUBMITTER);
    assert!(is_forbidden(&AuthorizationService::authorize_transition(
        &owner,
        &complaint_in("IT")
    )));
}

#[test]
fn test_only_submitters_file_complaints() {
    assert!(AuthorizationService::authorize_file_complaint(&submitter(3)).is_ok());
    assert!(is_forbidden(
        &AuthorizationService::authorize_file_complaint(&create_test_admin_actor(1))
    ));
    assert!(is_forbidden(
        &AuthorizationService::authorize_file_complaint(&handler(Some("IT")))
    ));
}

#[test]
fn test_feedback_only_by_owning_submitter() {
    let complaint = complaint_in("IT");
    assert!(AuthorizationService::authorize_submit_feedback(&submitter(SUBMITTER), &complaint).is_ok());
    assert!(is_forbidden(&AuthorizationService::authorize_submit_feedback(
        &submitter(SUBMITTER + 1),
        &complaint
    )));
    assert!(is_forbidden(&AuthorizationService::authorize_submit_feedback(
        &create_test_admin_actor(1),
        &complaint
    )));
}

#[test]
fn test_only_administrators_remove_feedback() {
    assert!(AuthorizationService::authorize_remove_feedback(&create_test_admin_actor(1)).is_ok());
    assert!(is_forbidden(&AuthorizationService::authorize_remove_feedback(
        &submitter(SUBMITTER)
    )));
    assert!(is_forbidden(&AuthorizationService::authorize_remove_feedback(
        &handler(Some("IT"))
    )));
}

#[test]
fn test_view_scope() {
    let mut complaint = complaint_in("IT");
    assert!(AuthorizationService::authorize_view_complaint(&create_test_admin_actor(1), &complaint).is_ok());
    assert!(AuthorizationService::authorize_view_complaint(&handler(Some("IT")), &complaint).is_ok());
    assert!(is_forbidden(&AuthorizationService::authorize_view_complaint(
        &handler(Some("HR")),
        &complaint
    )));
    assert!(is_forbidden(&AuthorizationService::authorize_view_complaint(
        &submitter(SUBMITTER + 1),
        &complaint
    )));

    complaint.status = ComplaintStatus::Closed;
    complaint.completed = true;
    assert!(AuthorizationService::authorize_view_complaint(&submitter(SUBMITTER), &complaint).is_ok());
}

#[test]
fn test_notification_access_limited_to_recipient() {
    let record = NotificationRecord {
        id: NotificationId::new(1),
        recipient_id: UserId::new(SUBMITTER),
        kind: NotificationKind::ComplaintStatusUpdated,
        message: String::from("Your complaint 1 is now closed."),
        timestamp: filed_at(),
        read: false,
    };
    assert!(AuthorizationService::authorize_notification_access(&submitter(SUBMITTER), &record).is_ok());
    assert!(is_forbidden(
        &AuthorizationService::authorize_notification_access(&create_test_admin_actor(1), &record)
    ));
}

#[test]
fn test_privileged_accounts_need_an_administrator() {
    let admin = create_test_admin_actor(1);
    assert!(AuthorizationService::authorize_register_account(None, AccountRole::Student).is_ok());
    assert!(AuthorizationService::authorize_register_account(Some(&admin), AccountRole::Staff).is_ok());
    assert!(is_forbidden(&AuthorizationService::authorize_register_account(
        None,
        AccountRole::Admin
    )));
    assert!(is_forbidden(&AuthorizationService::authorize_register_account(
        Some(&submitter(3)),
        AccountRole::Staff
    )));
}

#[test]
fn test_only_administrators_retry_notifications() {
    assert!(AuthorizationService::authorize_retry_notifications(&create_test_admin_actor(1)).is_ok());
    assert!(is_forbidden(
        &AuthorizationService::authorize_retry_notifications(&handler(Some("IT")))
    ));
}

#[test]
fn test_listing_scope_follows_role() {
    assert_eq!(
        AuthorizationService::complaint_listing_scope(&create_test_admin_actor(1)).unwrap(),
        ComplaintFilter::default()
    );

    let department = AuthorizationService::complaint_listing_scope(&handler(Some("IT"))).unwrap();
    assert_eq!(department.category, Some(Category::new("IT")));
    assert_eq!(department.submitter, None);

    let own = AuthorizationService::complaint_listing_scope(&submitter(SUBMITTER)).unwrap();
    assert_eq!(own.submitter, Some(UserId::new(SUBMITTER)));
    assert_eq!(own.category, None);

    assert!(is_forbidden(&AuthorizationService::complaint_listing_scope(
        &handler(None)
    )));
}

#[test]
fn test_only_administrators_delete_complaints() {
    assert!(AuthorizationService::authorize_delete_complaint(&create_test_admin_actor(1)).is_ok());
    assert!(is_forbidden(
        &AuthorizationService::authorize_delete_complaint(&handler(Some("IT")))
    ));
    assert!(is_forbidden(
        &AuthorizationService::authorize_delete_complaint(&submitter(SUBMITTER))
    ));
}
