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
    extract::{Path, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use lotkeeper_api::{
    ApiError, BookingListResponse, CheckOutResponse, CreateBookingRequest, CreateBookingResponse,
    CreateSlotRequest, CreateSlotResponse, CredentialService, DashboardResponse, LoginRequest,
    MessageResponse, RegisterRequest, RegisterResponse, RevenueResponse, SlotListResponse,
    TokenService, UpdateUserRequest, UserInfo, UserListResponse, bookings, reports, slots, users,
};
use lotkeeper_persistence::{PersistenceError, SqlitePersistence};

mod session;

use session::{OptionalSession, SessionUser};

/// Lotkeeper Server - HTTP server for the parking-management system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Secret used to sign session tokens. Falls back to the
    /// `LOTKEEPER_JWT_SECRET` environment variable.
    #[arg(long)]
    jwt_secret: Option<String>,

    /// Mark the session cookie `Secure` (HTTPS deployments)
    #[arg(long, default_value_t = false)]
    secure_cookies: bool,
}

/// Session cookie lifetime in seconds (seven days, matching token expiry).
const SESSION_COOKIE_MAX_AGE: u32 = 604_800;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a mutex.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Session token service.
    tokens: Arc<TokenService>,
    /// Whether session cookies carry the `Secure` attribute.
    secure_cookies: bool,
}

/// Uniform error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, Serialize)]
struct LoginResponse {
    message: String,
    user: UserInfo,
}

/// API response for `/auth/session`.
#[derive(Debug, Clone, Serialize)]
struct SessionResponse {
    user: Option<UserInfo>,
}

/// API response for `/auth/verify`.
#[derive(Debug, Clone, Serialize)]
struct VerifyResponse {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<UserInfo>,
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
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::InvalidState { .. } | ApiError::InvalidInput { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        error!(error = %err, "Persistence error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Persistence error: {err}"),
        }
    }
}

/// Builds the `Set-Cookie` value carrying the session token.
fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie: String = format!(
        "{}={token}; HttpOnly; Path=/; Max-Age={SESSION_COOKIE_MAX_AGE}; SameSite=Lax",
        session::SESSION_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Handler for POST `/auth/register`.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), HttpError> {
    info!(email = %req.email, "Handling registration request");

    let persistence = app_state.persistence.lock().await;
    let response: RegisterResponse =
        CredentialService::register(&persistence, &req, OffsetDateTime::now_utc())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/auth/login`.
///
/// On success the session token is set as an `HttpOnly` cookie.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, HttpError> {
    info!(email = %req.email, "Handling login request");

    let persistence = app_state.persistence.lock().await;
    let (token, user) = CredentialService::login(
        &persistence,
        &app_state.tokens,
        &req,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    let cookie: String = session_cookie(&token, app_state.secure_cookies);
    let body: Json<LoginResponse> = Json(LoginResponse {
        message: String::from("Login successful"),
        user,
    });

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// Handler for GET `/auth/session`.
///
/// Never errors: a missing, invalid, or stale session yields `user: null`.
async fn handle_session(
    AxumState(app_state): AxumState<AppState>,
    OptionalSession(claims): OptionalSession,
) -> Json<SessionResponse> {
    let user: Option<UserInfo> = match claims {
        Some(claims) => {
            let persistence = app_state.persistence.lock().await;
            persistence
                .get_user_by_id(claims.sub)
                .ok()
                .flatten()
                .map(|user| UserInfo::from(&user))
        }
        None => None,
    };

    Json(SessionResponse { user })
}

/// Handler for GET `/auth/verify`.
///
/// Never errors: an unverifiable token yields `valid: false`.
async fn handle_verify(
    AxumState(app_state): AxumState<AppState>,
    OptionalSession(claims): OptionalSession,
) -> Json<VerifyResponse> {
    let Some(claims) = claims else {
        return Json(VerifyResponse {
            valid: false,
            user: None,
        });
    };

    let persistence = app_state.persistence.lock().await;
    let user: Option<UserInfo> = persistence
        .get_user_by_id(claims.sub)
        .ok()
        .flatten()
        .map(|user| UserInfo::from(&user));

    Json(VerifyResponse {
        valid: user.is_some(),
        user,
    })
}

/// Handler for POST `/slots`. Admin only.
async fn handle_create_slot(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Json(req): Json<CreateSlotRequest>,
) -> Result<(StatusCode, Json<CreateSlotResponse>), HttpError> {
    info!(user_id = claims.sub, slot_number = %req.slot_number, "Handling create_slot request");

    let persistence = app_state.persistence.lock().await;
    let response: CreateSlotResponse =
        slots::create_slot(&persistence, &claims, &req, OffsetDateTime::now_utc())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/slots/available`. Open to unauthenticated callers.
async fn handle_list_available_slots(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<SlotListResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let available = slots::list_available(&persistence)?;

    Ok(Json(SlotListResponse { slots: available }))
}

/// Handler for GET `/slots`. Any authenticated caller.
async fn handle_list_slots(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(_claims): SessionUser,
) -> Result<Json<SlotListResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let all = slots::list_all(&persistence)?;

    Ok(Json(SlotListResponse { slots: all }))
}

/// Handler for POST `/bookings`.
async fn handle_create_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), HttpError> {
    info!(user_id = claims.sub, slot_id = req.slot_id, "Handling create_booking request");

    let persistence = app_state.persistence.lock().await;
    let response: CreateBookingResponse =
        bookings::create_booking(&persistence, &claims, &req, OffsetDateTime::now_utc())?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/bookings`.
async fn handle_list_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Json<BookingListResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let visible = bookings::list_bookings(&persistence, &claims)?;

    Ok(Json(BookingListResponse { bookings: visible }))
}

/// Handler for PUT `/bookings/{id}/check-in`.
async fn handle_check_in(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(user_id = claims.sub, booking_id, "Handling check_in request");

    let persistence = app_state.persistence.lock().await;
    bookings::check_in(&persistence, &claims, booking_id, OffsetDateTime::now_utc())?;

    Ok(Json(MessageResponse {
        message: String::from("Checked in"),
    }))
}

/// Handler for PUT `/bookings/{id}/check-out`.
async fn handle_check_out(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<CheckOutResponse>, HttpError> {
    info!(user_id = claims.sub, booking_id, "Handling check_out request");

    let persistence = app_state.persistence.lock().await;
    let response: CheckOutResponse =
        bookings::check_out(&persistence, &claims, booking_id, OffsetDateTime::now_utc())?;

    Ok(Json(response))
}

/// Handler for PUT `/bookings/{id}/cancel`.
async fn handle_cancel_booking(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Path(booking_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(user_id = claims.sub, booking_id, "Handling cancel_booking request");

    let persistence = app_state.persistence.lock().await;
    bookings::cancel_booking(&persistence, &claims, booking_id, OffsetDateTime::now_utc())?;

    Ok(Json(MessageResponse {
        message: String::from("Booking cancelled"),
    }))
}

/// Handler for PUT `/users/{id}`. Self or admin.
async fn handle_update_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Path(user_id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(caller = claims.sub, user_id, "Handling update_user request");

    let persistence = app_state.persistence.lock().await;
    let updated: UserInfo = users::update_user(&persistence, &claims, user_id, &req)?;

    Ok(Json(updated))
}

/// Handler for DELETE `/users/{id}`. Admin only.
async fn handle_delete_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    info!(caller = claims.sub, user_id, "Handling delete_user request");

    let persistence = app_state.persistence.lock().await;
    users::delete_user(&persistence, &claims, user_id)?;

    Ok(Json(MessageResponse {
        message: String::from("User deleted"),
    }))
}

/// Handler for GET `/users`. Admin only.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Json<UserListResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let listed = users::list_users(&persistence, &claims)?;

    Ok(Json(UserListResponse { users: listed }))
}

/// Handler for GET `/reports/dashboard`.
async fn handle_dashboard(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Json<DashboardResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response: DashboardResponse =
        reports::dashboard(&persistence, &claims, OffsetDateTime::now_utc())?;

    Ok(Json(response))
}

/// Handler for GET `/reports/revenue`. Admin only.
async fn handle_revenue(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(claims): SessionUser,
) -> Result<Json<RevenueResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let response: RevenueResponse =
        reports::revenue(&persistence, &claims, OffsetDateTime::now_utc())?;

    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/auth/session", get(handle_session))
        .route("/auth/verify", get(handle_verify))
        .route("/slots", post(handle_create_slot))
        .route("/slots", get(handle_list_slots))
        .route("/slots/available", get(handle_list_available_slots))
        .route("/bookings", post(handle_create_booking))
        .route("/bookings", get(handle_list_bookings))
        .route("/bookings/{id}/check-in", put(handle_check_in))
        .route("/bookings/{id}/check-out", put(handle_check_out))
        .route("/bookings/{id}/cancel", put(handle_cancel_booking))
        .route("/users", get(handle_list_users))
        .route("/users/{id}", put(handle_update_user))
        .route("/users/{id}", delete(handle_delete_user))
        .route("/reports/dashboard", get(handle_dashboard))
        .route("/reports/revenue", get(handle_revenue))
        .with_state(app_state)
}

/// Resolves the token-signing secret from the CLI or environment.
fn resolve_jwt_secret(args: &Args) -> String {
    if let Some(secret) = &args.jwt_secret {
        return secret.clone();
    }
    if let Ok(secret) = std::env::var("LOTKEEPER_JWT_SECRET") {
        return secret;
    }

    warn!("No JWT secret configured; using an insecure development default");
    String::from("lotkeeper-dev-secret")
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

    info!("Initializing Lotkeeper Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        tokens: Arc::new(TokenService::new(&resolve_jwt_secret(&args))),
        secure_cookies: args.secure_cookies,
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
    use axum::body::Body;
    use axum::http::Request;
    use lotkeeper_domain::{Role, User, format_timestamp};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const TEST_SECRET: &str = "test-secret";

    /// Helper to create test app state with in-memory persistence.
    fn create_test_app_state() -> AppState {
        let persistence: SqlitePersistence =
            SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence");
        AppState {
            persistence: Arc::new(Mutex::new(persistence)),
            tokens: Arc::new(TokenService::new(TEST_SECRET)),
            secure_cookies: false,
        }
    }

    /// Seeds an account and returns a bearer token for it.
    async fn seed_account(app_state: &AppState, email: &str, role: Role) -> (i64, String) {
        let created_at: String =
            format_timestamp(OffsetDateTime::now_utc()).expect("Timestamp should format");
        let persistence = app_state.persistence.lock().await;
        let user_id: i64 = persistence
            .create_user("Test Account", email, "test-password", role, &created_at)
            .expect("Account should be created");
        let user: User = persistence
            .get_user_by_id(user_id)
            .expect("Query should succeed")
            .expect("Account should exist");
        drop(persistence);

        let token: String = app_state
            .tokens
            .issue(&user, OffsetDateTime::now_utc())
            .expect("Token should be issued");
        (user_id, token)
    }

    fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        match body {
            Some(value) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(value.to_string()))
                .expect("Request should build"),
            None => builder.body(Body::empty()).expect("Request should build"),
        }
    }

    async fn response_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Body should be readable");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    async fn create_slot_via_api(app_state: &AppState, admin_token: &str, slot_number: &str) -> i64 {
        let response = build_router(app_state.clone())
            .oneshot(request(
                "POST",
                "/slots",
                Some(admin_token),
                Some(json!({
                    "slot_number": slot_number,
                    "slot_type": "standard",
                    "floor": "1",
                    "section": "A",
                    "hourly_rate": 5.0
                })),
            ))
            .await
            .expect("Request should complete");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["slot_id"].as_i64().expect("slot_id should be a number")
    }

    async fn create_booking_via_api(app_state: &AppState, token: &str, slot_id: i64) -> i64 {
        let start_time: String =
            format_timestamp(OffsetDateTime::now_utc()).expect("Timestamp should format");
        let response = build_router(app_state.clone())
            .oneshot(request(
                "POST",
                "/bookings",
                Some(token),
                Some(json!({
                    "slot_id": slot_id,
                    "start_time": start_time,
                    "duration_hours": 3
                })),
            ))
            .await
            .expect("Request should complete");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        body["booking_id"]
            .as_i64()
            .expect("booking_id should be a number")
    }

    #[tokio::test]
    async fn test_register_creates_account() {
        let app_state = create_test_app_state();

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "name": "Alice",
                    "email": "alice@example.com",
                    "password": "correct horse battery"
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response_json(response).await;
        assert!(body["user_id"].as_i64().is_some());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_409() {
        let app_state = create_test_app_state();
        let payload = json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "correct horse battery"
        });

        let first = build_router(app_state.clone())
            .oneshot(request("POST", "/auth/register", None, Some(payload.clone())))
            .await
            .expect("Request should complete");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = build_router(app_state)
            .oneshot(request("POST", "/auth/register", None, Some(payload)))
            .await
            .expect("Request should complete");
        assert_eq!(second.status(), StatusCode::CONFLICT);
        let body = response_json(second).await;
        assert_eq!(body["error"], json!(true));
    }

    #[tokio::test]
    async fn test_login_sets_session_cookie() {
        let app_state = create_test_app_state();
        build_router(app_state.clone())
            .oneshot(request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "name": "Alice",
                    "email": "alice@example.com",
                    "password": "correct horse battery"
                })),
            ))
            .await
            .expect("Request should complete");

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/auth/login",
                None,
                Some(json!({
                    "email": "alice@example.com",
                    "password": "correct horse battery"
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("Login should set a cookie")
            .to_str()
            .expect("Cookie should be ASCII")
            .to_string();
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Max-Age=604800"));

        let body = response_json(response).await;
        assert_eq!(body["user"]["email"], json!("alice@example.com"));
        assert!(body["user"]["password_hash"].is_null());
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_401() {
        let app_state = create_test_app_state();
        seed_account(&app_state, "alice@example.com", Role::User).await;

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/auth/login",
                None,
                Some(json!({
                    "email": "alice@example.com",
                    "password": "wrong password"
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_without_token_degrades_to_null() {
        let app_state = create_test_app_state();

        let response = build_router(app_state)
            .oneshot(request("GET", "/auth/session", None, None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert!(body["user"].is_null());
    }

    #[tokio::test]
    async fn test_session_with_bearer_token_returns_user() {
        let app_state = create_test_app_state();
        let (user_id, token) = seed_account(&app_state, "alice@example.com", Role::User).await;

        let response = build_router(app_state)
            .oneshot(request("GET", "/auth/session", Some(&token), None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["user"]["user_id"], json!(user_id));
    }

    #[tokio::test]
    async fn test_session_with_cookie_returns_user() {
        let app_state = create_test_app_state();
        let (user_id, token) = seed_account(&app_state, "alice@example.com", Role::User).await;

        let req = Request::builder()
            .method("GET")
            .uri("/auth/session")
            .header("Cookie", format!("session={token}"))
            .body(Body::empty())
            .expect("Request should build");
        let response = build_router(app_state)
            .oneshot(req)
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["user"]["user_id"], json!(user_id));
    }

    #[tokio::test]
    async fn test_verify_with_garbage_token_degrades() {
        let app_state = create_test_app_state();

        let response = build_router(app_state)
            .oneshot(request("GET", "/auth/verify", Some("not-a-jwt"), None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["valid"], json!(false));
    }

    #[tokio::test]
    async fn test_slot_creation_requires_admin_role() {
        let app_state = create_test_app_state();
        let (_, user_token) = seed_account(&app_state, "driver@example.com", Role::User).await;

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/slots",
                Some(&user_token),
                Some(json!({
                    "slot_number": "A-101",
                    "slot_type": "standard",
                    "floor": "1",
                    "section": "A",
                    "hourly_rate": 5.0
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_duplicate_slot_number_is_409() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        create_slot_via_api(&app_state, &admin_token, "A-101").await;

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/slots",
                Some(&admin_token),
                Some(json!({
                    "slot_number": "A-101",
                    "slot_type": "compact",
                    "floor": "2",
                    "section": "B",
                    "hourly_rate": 3.0
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_available_slots_are_public() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        create_slot_via_api(&app_state, &admin_token, "A-101").await;

        let response = build_router(app_state)
            .oneshot(request("GET", "/slots/available", None, None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body["slots"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_booking_requires_authentication() {
        let app_state = create_test_app_state();

        let response = build_router(app_state)
            .oneshot(request(
                "POST",
                "/bookings",
                None,
                Some(json!({
                    "slot_id": 1,
                    "start_time": "2026-03-01T10:00:00.000000000Z",
                    "duration_hours": 2
                })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_booking_lifecycle_over_http() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        let (_, user_token) = seed_account(&app_state, "driver@example.com", Role::User).await;
        let slot_id = create_slot_via_api(&app_state, &admin_token, "A-101").await;
        let booking_id = create_booking_via_api(&app_state, &user_token, slot_id).await;

        let check_in = build_router(app_state.clone())
            .oneshot(request(
                "PUT",
                &format!("/bookings/{booking_id}/check-in"),
                Some(&user_token),
                None,
            ))
            .await
            .expect("Request should complete");
        assert_eq!(check_in.status(), StatusCode::OK);

        let check_out = build_router(app_state.clone())
            .oneshot(request(
                "PUT",
                &format!("/bookings/{booking_id}/check-out"),
                Some(&user_token),
                None,
            ))
            .await
            .expect("Request should complete");
        assert_eq!(check_out.status(), StatusCode::OK);
        let body = response_json(check_out).await;
        assert!(body["actual_fee"].as_f64().is_some());

        // The slot is released and bookable again
        let available = build_router(app_state)
            .oneshot(request("GET", "/slots/available", None, None))
            .await
            .expect("Request should complete");
        let body = response_json(available).await;
        assert_eq!(body["slots"].as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_cancel_completed_booking_is_400() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        let (_, user_token) = seed_account(&app_state, "driver@example.com", Role::User).await;
        let slot_id = create_slot_via_api(&app_state, &admin_token, "A-101").await;
        let booking_id = create_booking_via_api(&app_state, &user_token, slot_id).await;

        for step in ["check-in", "check-out"] {
            let response = build_router(app_state.clone())
                .oneshot(request(
                    "PUT",
                    &format!("/bookings/{booking_id}/{step}"),
                    Some(&user_token),
                    None,
                ))
                .await
                .expect("Request should complete");
            assert_eq!(response.status(), StatusCode::OK);
        }

        let cancel = build_router(app_state)
            .oneshot(request(
                "PUT",
                &format!("/bookings/{booking_id}/cancel"),
                Some(&user_token),
                None,
            ))
            .await
            .expect("Request should complete");
        assert_eq!(cancel.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stranger_cannot_check_in_booking() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        let (_, owner_token) = seed_account(&app_state, "owner@example.com", Role::User).await;
        let (_, stranger_token) =
            seed_account(&app_state, "stranger@example.com", Role::User).await;
        let slot_id = create_slot_via_api(&app_state, &admin_token, "A-101").await;
        let booking_id = create_booking_via_api(&app_state, &owner_token, slot_id).await;

        let response = build_router(app_state)
            .oneshot(request(
                "PUT",
                &format!("/bookings/{booking_id}/check-in"),
                Some(&stranger_token),
                None,
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_profile_update_by_stranger_is_403() {
        let app_state = create_test_app_state();
        let (alice_id, _) = seed_account(&app_state, "alice@example.com", Role::User).await;
        let (_, bob_token) = seed_account(&app_state, "bob@example.com", Role::User).await;

        let response = build_router(app_state)
            .oneshot(request(
                "PUT",
                &format!("/users/{alice_id}"),
                Some(&bob_token),
                Some(json!({ "name": "Hijacked" })),
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_self_delete_is_400() {
        let app_state = create_test_app_state();
        let (admin_id, admin_token) =
            seed_account(&app_state, "admin@example.com", Role::Admin).await;

        let response = build_router(app_state.clone())
            .oneshot(request(
                "DELETE",
                &format!("/users/{admin_id}"),
                Some(&admin_token),
                None,
            ))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let persistence = app_state.persistence.lock().await;
        assert_eq!(persistence.count_users().expect("Count should succeed"), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_user_is_404() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;

        let response = build_router(app_state)
            .oneshot(request("DELETE", "/users/9999", Some(&admin_token), None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dashboard_shape_follows_role() {
        let app_state = create_test_app_state();
        let (_, admin_token) = seed_account(&app_state, "admin@example.com", Role::Admin).await;
        let (_, user_token) = seed_account(&app_state, "driver@example.com", Role::User).await;

        let admin_view = build_router(app_state.clone())
            .oneshot(request("GET", "/reports/dashboard", Some(&admin_token), None))
            .await
            .expect("Request should complete");
        assert_eq!(admin_view.status(), StatusCode::OK);
        let body = response_json(admin_view).await;
        assert_eq!(body["bookings_last_7_days"].as_array().map(Vec::len), Some(7));

        let user_view = build_router(app_state)
            .oneshot(request("GET", "/reports/dashboard", Some(&user_token), None))
            .await
            .expect("Request should complete");
        assert_eq!(user_view.status(), StatusCode::OK);
        let body = response_json(user_view).await;
        assert_eq!(body["my_bookings"], json!(0));
    }

    #[tokio::test]
    async fn test_revenue_report_is_admin_only() {
        let app_state = create_test_app_state();
        let (_, user_token) = seed_account(&app_state, "driver@example.com", Role::User).await;

        let response = build_router(app_state)
            .oneshot(request("GET", "/reports/revenue", Some(&user_token), None))
            .await
            .expect("Request should complete");

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
