// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use campus_complaints_api::{
    ApiError, AuthenticatedActor, AuthenticationService, DeleteComplaintResponse,
    DeleteNotificationResponse, FileComplaintRequest, FileComplaintResponse,
    GetComplaintResponse, ListComplaintsRequest, ListComplaintsResponse,
    ListNotificationsResponse, MarkNotificationsReadResponse, RegisterAccountRequest,
    RegisterAccountResponse, RemoveFeedbackResponse, RetryNotificationsResponse,
    SubmitFeedbackRequest, SubmitFeedbackResponse, UpdateStatusRequest, UpdateStatusResponse,
    delete_complaint, delete_notification, file_complaint, get_complaint, list_complaints,
    list_notifications, mark_notifications_read, register_account, remove_feedback,
    retry_pending_notifications, submit_feedback, update_complaint_status,
};
use campus_complaints_domain::{AccountRole, ComplaintId};
use campus_complaints_notify::{HubConfig, NotificationHub, NotificationId};
use campus_complaints_persistence::{Persistence, PersistenceError};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Campus Complaints Server - HTTP server for the Campus Complaints system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How long a single notification delivery may take, in milliseconds
    #[arg(long, default_value_t = 5000)]
    notification_timeout_ms: u64,

    /// How many emitted events the notification hub remembers
    #[arg(long, default_value_t = 1024)]
    history_capacity: usize,

    /// Create an administrator account with this email at startup if none exists
    #[arg(long)]
    seed_admin_email: Option<String>,
}

/// Application state shared across handlers.
///
/// The persistence adapter is serialized behind an async mutex; the hub is
/// shared as-is.
#[derive(Clone)]
struct AppState {
    /// Storage for accounts, complaints, notifications and the outbox.
    persistence: Arc<Mutex<Persistence>>,
    /// The process-wide notification hub.
    hub: Arc<NotificationHub>,
}

/// Query string naming the acting account.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorQuery {
    /// The account performing the request.
    actor_id: i64,
}

/// Query string for listing complaints.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ListComplaintsQuery {
    /// The account performing the request.
    actor_id: i64,
    /// Optional status to narrow the listing to, e.g. `closed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

/// Body naming only the acting account.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorRequest {
    /// The account performing the request.
    actor_id: i64,
}

/// API request for creating an account.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RegisterAccountApiRequest {
    /// The administrator creating the account; absent for self-registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actor_id: Option<i64>,
    /// Display name.
    name: String,
    /// Contact email.
    email: String,
    /// `Student`, `Staff` or `Admin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    /// Department for staff accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
}

/// API request for filing a complaint.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct FileComplaintApiRequest {
    /// The submitter filing the complaint.
    actor_id: i64,
    /// Short summary.
    title: String,
    /// Category / handling department.
    category: String,
    /// Full description.
    description: String,
    /// Optional location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
}

/// API request for changing a complaint's status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateStatusApiRequest {
    /// The account requesting the change.
    actor_id: i64,
    /// `received`, `resolving` or `closed`.
    status: String,
}

/// API request for leaving feedback.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SubmitFeedbackApiRequest {
    /// The submitter leaving feedback.
    actor_id: i64,
    /// Rating from 1 to 5.
    rating: i64,
    /// Free-text comment.
    #[serde(default)]
    text: String,
}

/// Liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Always `ok`.
    status: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidTransition { .. } | ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn authenticate(
    persistence: &mut Persistence,
    actor_id: i64,
) -> Result<AuthenticatedActor, HttpError> {
    AuthenticationService::authenticate(persistence, actor_id).map_err(HttpError::from)
}

/// Handler for GET `/health` endpoint.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/accounts` endpoint.
///
/// Creates an account and notifies the administrator.
async fn handle_register_account(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterAccountApiRequest>,
) -> Result<(StatusCode, Json<RegisterAccountResponse>), HttpError> {
    info!(
        actor_id = ?req.actor_id,
        role = ?req.role,
        "Handling register_account request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let requester: Option<AuthenticatedActor> = match req.actor_id {
        Some(actor_id) => Some(authenticate(&mut persistence, actor_id)?),
        None => None,
    };
    let request: RegisterAccountRequest = RegisterAccountRequest {
        name: req.name,
        email: req.email,
        role: req.role,
        department: req.department,
    };

    let response: RegisterAccountResponse = register_account(
        &mut persistence,
        &app_state.hub,
        requester.as_ref(),
        &request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/complaints` endpoint.
///
/// Files a complaint and notifies the administrator and the department.
async fn handle_file_complaint(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<FileComplaintApiRequest>,
) -> Result<(StatusCode, Json<FileComplaintResponse>), HttpError> {
    info!(
        actor_id = req.actor_id,
        category = %req.category,
        "Handling file_complaint request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, req.actor_id)?;
    let request: FileComplaintRequest = FileComplaintRequest {
        title: req.title,
        category: req.category,
        description: req.description,
        location: req.location,
    };

    let response: FileComplaintResponse =
        file_complaint(&mut persistence, &app_state.hub, &actor, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/complaints` endpoint.
///
/// Lists the complaints in the actor's scope.
async fn handle_list_complaints(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListComplaintsQuery>,
) -> Result<Json<ListComplaintsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let request: ListComplaintsRequest = ListComplaintsRequest {
        status: query.status,
    };
    let response: ListComplaintsResponse = list_complaints(&mut persistence, &actor, &request)?;
    Ok(Json(response))
}

/// Handler for DELETE `/complaints/{id}` endpoint.
async fn handle_delete_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<DeleteComplaintResponse>, HttpError> {
    info!(actor_id = query.actor_id, complaint_id, "Handling delete_complaint request");

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let response: DeleteComplaintResponse =
        delete_complaint(&mut persistence, &actor, ComplaintId::new(complaint_id))?;
    Ok(Json(response))
}

/// Handler for GET `/complaints/{id}` endpoint.
async fn handle_get_complaint(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<GetComplaintResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let response: GetComplaintResponse =
        get_complaint(&mut persistence, &actor, ComplaintId::new(complaint_id))?;
    Ok(Json(response))
}

/// Handler for PUT `/complaints/{id}/status` endpoint.
///
/// Moves a complaint through its lifecycle.
async fn handle_update_status(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Json(req): Json<UpdateStatusApiRequest>,
) -> Result<Json<UpdateStatusResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        complaint_id,
        status = %req.status,
        "Handling update_complaint_status request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, req.actor_id)?;
    let request: UpdateStatusRequest = UpdateStatusRequest { status: req.status };

    let response: UpdateStatusResponse = update_complaint_status(
        &mut persistence,
        &app_state.hub,
        &actor,
        ComplaintId::new(complaint_id),
        &request,
    )
    .await?;
    Ok(Json(response))
}

/// Handler for POST `/complaints/{id}/feedback` endpoint.
async fn handle_submit_feedback(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Json(req): Json<SubmitFeedbackApiRequest>,
) -> Result<Json<SubmitFeedbackResponse>, HttpError> {
    info!(
        actor_id = req.actor_id,
        complaint_id,
        rating = req.rating,
        "Handling submit_feedback request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, req.actor_id)?;
    let request: SubmitFeedbackRequest = SubmitFeedbackRequest {
        rating: req.rating,
        text: req.text,
    };

    let response: SubmitFeedbackResponse = submit_feedback(
        &mut persistence,
        &app_state.hub,
        &actor,
        ComplaintId::new(complaint_id),
        &request,
    )
    .await?;
    Ok(Json(response))
}

/// Handler for DELETE `/complaints/{id}/feedback` endpoint.
async fn handle_remove_feedback(
    AxumState(app_state): AxumState<AppState>,
    Path(complaint_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<RemoveFeedbackResponse>, HttpError> {
    info!(
        actor_id = query.actor_id,
        complaint_id, "Handling remove_feedback request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let response: RemoveFeedbackResponse =
        remove_feedback(&mut persistence, &actor, ComplaintId::new(complaint_id))?;
    Ok(Json(response))
}

/// Handler for GET `/notifications` endpoint.
async fn handle_list_notifications(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<ListNotificationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let response: ListNotificationsResponse = list_notifications(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for POST `/notifications/mark-read` endpoint.
async fn handle_mark_notifications_read(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<MarkNotificationsReadResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, req.actor_id)?;
    let response: MarkNotificationsReadResponse =
        mark_notifications_read(&mut persistence, &actor)?;
    Ok(Json(response))
}

/// Handler for DELETE `/notifications/{id}` endpoint.
async fn handle_delete_notification(
    AxumState(app_state): AxumState<AppState>,
    Path(notification_id): Path<i64>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<DeleteNotificationResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, query.actor_id)?;
    let response: DeleteNotificationResponse = delete_notification(
        &mut persistence,
        &actor,
        NotificationId::new(notification_id),
    )?;
    Ok(Json(response))
}

/// Handler for POST `/notifications/retry` endpoint.
///
/// Re-attempts every queued delivery once.
async fn handle_retry_notifications(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<RetryNotificationsResponse>, HttpError> {
    info!(actor_id = req.actor_id, "Handling retry_notifications request");

    let mut persistence = app_state.persistence.lock().await;
    let actor: AuthenticatedActor = authenticate(&mut persistence, req.actor_id)?;
    let response: RetryNotificationsResponse =
        retry_pending_notifications(&mut persistence, &app_state.hub, &actor).await?;
    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/accounts", post(handle_register_account))
        .route(
            "/complaints",
            get(handle_list_complaints).post(handle_file_complaint),
        )
        .route(
            "/complaints/{id}",
            get(handle_get_complaint).delete(handle_delete_complaint),
        )
        .route("/complaints/{id}/status", put(handle_update_status))
        .route(
            "/complaints/{id}/feedback",
            post(handle_submit_feedback).delete(handle_remove_feedback),
        )
        .route("/notifications", get(handle_list_notifications))
        .route(
            "/notifications/mark-read",
            post(handle_mark_notifications_read),
        )
        .route("/notifications/retry", post(handle_retry_notifications))
        .route("/notifications/{id}", delete(handle_delete_notification))
        .with_state(app_state)
}

/// Creates the administrator account if the database has none.
fn seed_administrator(persistence: &mut Persistence, email: &str) -> Result<(), PersistenceError> {
    if let Some(existing) = persistence.find_administrator_id()? {
        info!(account_id = %existing, "Administrator already present, not seeding");
        return Ok(());
    }
    let account = persistence.create_account("Administrator", email, AccountRole::Admin, None)?;
    info!(account_id = %account.id, email = %account.email, "Seeded administrator account");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Campus Complaints Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(email) = &args.seed_admin_email {
        seed_administrator(&mut persistence, email)?;
    }

    let hub_config: HubConfig = HubConfig {
        delivery_timeout: Duration::from_millis(args.notification_timeout_ms),
        history_capacity: args.history_capacity,
    };
    info!(
        timeout_ms = args.notification_timeout_ms,
        history_capacity = args.history_capacity,
        "Notification hub configured"
    );

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        hub: Arc::new(NotificationHub::new(hub_config)),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use campus_complaints_domain::{Account, Category, ComplaintStatus};
    use tower::ServiceExt;

    struct TestAccounts {
        admin: Account,
        student: Account,
        it_handler: Account,
        hr_handler: Account,
    }

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> (AppState, TestAccounts) {
        let mut persistence: Persistence =
            Persistence::new_in_memory().expect("Failed to create in-memory persistence");
        let accounts: TestAccounts = TestAccounts {
            admin: persistence
                .create_account("Ada Admin", "admin@campus.edu", AccountRole::Admin, None)
                .unwrap(),
            student: persistence
                .create_account("Sam Student", "sam@campus.edu", AccountRole::Student, None)
                .unwrap(),
            it_handler: persistence
                .create_account(
                    "Ivy IT",
                    "ivy@campus.edu",
                    AccountRole::Staff,
                    Some(&Category::new("IT")),
                )
                .unwrap(),
            hr_handler: persistence
                .create_account(
                    "Hal HR",
                    "hal@campus.edu",
                    AccountRole::Staff,
                    Some(&Category::new("HR")),
                )
                .unwrap(),
        };
        let state: AppState = AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            hub: Arc::new(NotificationHub::new(HubConfig::default())),
        };
        (state, accounts)
    }

    fn json_request<T: Serialize>(method: &str, uri: &str, body: &T) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    async fn file_it_complaint(app: &Router, student: &Account) -> FileComplaintResponse {
        let request: FileComplaintApiRequest = FileComplaintApiRequest {
            actor_id: student.id.value(),
            title: String::from("Wi-Fi down"),
            category: String::from("IT"),
            description: String::from("No connectivity in the east wing"),
            location: None,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/complaints", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _) = create_test_app_state();
        let app: Router = build_router(state);
        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: HealthResponse = read_json(response).await;
        assert_eq!(body.status, "ok");
    }

    #[tokio::test]
    async fn test_file_and_resolve_complaint() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);

        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;
        assert_eq!(filed.notifications.delivered, 2);

        let update: UpdateStatusApiRequest = UpdateStatusApiRequest {
            actor_id: accounts.admin.id.value(),
            status: String::from("resolving"),
        };
        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/complaints/{}/status", filed.complaint.id),
                &update,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: UpdateStatusResponse = read_json(response).await;
        assert_eq!(body.complaint.status, ComplaintStatus::Resolving);

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/notifications?actor_id={}", accounts.student.id),
            ))
            .await
            .unwrap();
        let listed: ListNotificationsResponse = read_json(response).await;
        assert_eq!(listed.notifications.len(), 1);
        assert!(listed.notifications[0].message.contains("resolving"));
    }

    #[tokio::test]
    async fn test_wrong_department_is_forbidden() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;

        let update: UpdateStatusApiRequest = UpdateStatusApiRequest {
            actor_id: accounts.hr_handler.id.value(),
            status: String::from("closed"),
        };
        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/complaints/{}/status", filed.complaint.id),
                &update,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
        let error_response: ErrorResponse = read_json(response).await;
        assert!(error_response.error);
    }

    #[tokio::test]
    async fn test_reopening_closed_complaint_is_conflict() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;
        let uri: String = format!("/complaints/{}/status", filed.complaint.id);

        for (target, expected) in [
            ("closed", HttpStatusCode::OK),
            ("resolving", HttpStatusCode::CONFLICT),
        ] {
            let update: UpdateStatusApiRequest = UpdateStatusApiRequest {
                actor_id: accounts.it_handler.id.value(),
                status: String::from(target),
            };
            let response = app
                .clone()
                .oneshot(json_request("PUT", &uri, &update))
                .await
                .unwrap();
            assert_eq!(response.status(), expected);
        }
    }

    #[tokio::test]
    async fn test_unknown_actor_is_unauthorized() {
        let (state, _) = create_test_app_state();
        let app: Router = build_router(state);
        let response = app
            .oneshot(empty_request("GET", "/notifications?actor_id=4242"))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_feedback_round_trip() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;
        let complaint_id = filed.complaint.id;

        let early: SubmitFeedbackApiRequest = SubmitFeedbackApiRequest {
            actor_id: accounts.student.id.value(),
            rating: 5,
            text: String::from("Great"),
        };
        let feedback_uri: String = format!("/complaints/{complaint_id}/feedback");
        let response = app
            .clone()
            .oneshot(json_request("POST", &feedback_uri, &early))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);

        let close: UpdateStatusApiRequest = UpdateStatusApiRequest {
            actor_id: accounts.admin.id.value(),
            status: String::from("closed"),
        };
        app.clone()
            .oneshot(json_request(
                "PUT",
                &format!("/complaints/{complaint_id}/status"),
                &close,
            ))
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request("POST", &feedback_uri, &early))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .clone()
            .oneshot(empty_request(
                "DELETE",
                &format!("{feedback_uri}?actor_id={}", accounts.admin.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/complaints/{complaint_id}?actor_id={}", accounts.student.id),
            ))
            .await
            .unwrap();
        let viewed: GetComplaintResponse = read_json(response).await;
        assert_eq!(viewed.complaint.feedback, None);
        assert!(viewed.allowed_transitions.is_empty());
    }

    #[tokio::test]
    async fn test_register_account_notifies_administrator() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);

        let request: RegisterAccountApiRequest = RegisterAccountApiRequest {
            actor_id: None,
            name: String::from("Nia New"),
            email: String::from("nia@campus.edu"),
            role: None,
            department: None,
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/accounts", &request))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::CREATED);

        let duplicate = app
            .clone()
            .oneshot(json_request("POST", "/accounts", &request))
            .await
            .unwrap();
        assert_eq!(duplicate.status(), HttpStatusCode::CONFLICT);

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/notifications?actor_id={}", accounts.admin.id),
            ))
            .await
            .unwrap();
        let listed: ListNotificationsResponse = read_json(response).await;
        assert_eq!(listed.unread, 1);
    }

    #[tokio::test]
    async fn test_mark_read_and_delete_notifications() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        file_it_complaint(&app, &accounts.student).await;

        let mark: ActorRequest = ActorRequest {
            actor_id: accounts.it_handler.id.value(),
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/notifications/mark-read", &mark))
            .await
            .unwrap();
        let marked: MarkNotificationsReadResponse = read_json(response).await;
        assert_eq!(marked.updated, 1);

        let response = app
            .clone()
            .oneshot(empty_request(
                "GET",
                &format!("/notifications?actor_id={}", accounts.it_handler.id),
            ))
            .await
            .unwrap();
        let listed: ListNotificationsResponse = read_json(response).await;
        let notification_id = listed.notifications[0].id;

        let response = app
            .clone()
            .oneshot(empty_request(
                "DELETE",
                &format!(
                    "/notifications/{notification_id}?actor_id={}",
                    accounts.student.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let response = app
            .oneshot(empty_request(
                "DELETE",
                &format!(
                    "/notifications/{notification_id}?actor_id={}",
                    accounts.it_handler.id
                ),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
    }

    #[tokio::test]
    async fn test_retry_requires_administrator() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);

        let as_student: ActorRequest = ActorRequest {
            actor_id: accounts.student.id.value(),
        };
        let response = app
            .clone()
            .oneshot(json_request("POST", "/notifications/retry", &as_student))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let as_admin: ActorRequest = ActorRequest {
            actor_id: accounts.admin.id.value(),
        };
        let response = app
            .oneshot(json_request("POST", "/notifications/retry", &as_admin))
            .await
            .unwrap();
        let body: RetryNotificationsResponse = read_json(response).await;
        assert_eq!(body.attempted, 0);
    }

    #[test]
    fn test_seed_administrator_is_idempotent() {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
        seed_administrator(&mut persistence, "root@campus.edu").unwrap();
        let first = persistence.find_administrator_id().unwrap();
        assert!(first.is_some());

        seed_administrator(&mut persistence, "other@campus.edu").unwrap();
        assert_eq!(persistence.find_administrator_id().unwrap(), first);
    }

    #[test]
    fn test_api_error_status_mapping() {
        let cases: Vec<(ApiError, HttpStatusCode)> = vec![
            (
                ApiError::Forbidden {
                    action: String::from("x"),
                    reason: String::from("y"),
                },
                HttpStatusCode::FORBIDDEN,
            ),
            (
                ApiError::InvalidTransition {
                    from: ComplaintStatus::Closed,
                    to: ComplaintStatus::Received,
                    allowed: Vec::new(),
                },
                HttpStatusCode::CONFLICT,
            ),
            (
                ApiError::ResourceNotFound {
                    resource_type: String::from("Complaint"),
                    message: String::from("9"),
                },
                HttpStatusCode::NOT_FOUND,
            ),
            (
                ApiError::Internal {
                    message: String::from("boom"),
                },
                HttpStatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(HttpError::from(err).status, expected);
        }
    }

    #[tokio::test]
    async fn test_list_complaints_is_scoped_by_role() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;

        for (actor, expected) in [
            (&accounts.admin, 1),
            (&accounts.it_handler, 1),
            (&accounts.hr_handler, 0),
            (&accounts.student, 1),
        ] {
            let response = app
                .clone()
                .oneshot(empty_request(
                    "GET",
                    &format!("/complaints?actor_id={}", actor.id),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), HttpStatusCode::OK);
            let listed: ListComplaintsResponse = read_json(response).await;
            assert_eq!(listed.complaints.len(), expected, "{}", actor.name);
        }

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/complaints?actor_id={}&status=closed", accounts.admin.id),
            ))
            .await
            .unwrap();
        let listed: ListComplaintsResponse = read_json(response).await;
        assert!(listed.complaints.is_empty());
        assert_eq!(filed.complaint.status, ComplaintStatus::Received);
    }

    #[tokio::test]
    async fn test_delete_complaint_requires_admin() {
        let (state, accounts) = create_test_app_state();
        let app: Router = build_router(state);
        let filed: FileComplaintResponse = file_it_complaint(&app, &accounts.student).await;
        let uri = |actor: &Account| {
            format!("/complaints/{}?actor_id={}", filed.complaint.id, actor.id)
        };

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri(&accounts.student)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri(&accounts.admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: DeleteComplaintResponse = read_json(response).await;
        assert_eq!(body.deleted, filed.complaint.id);

        let response = app
            .oneshot(empty_request("DELETE", &uri(&accounts.admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }
}
