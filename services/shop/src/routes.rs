//! Shop service routes

use std::time::Duration;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use common::error::DatabaseError;
use serde_json::json;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{
    config::ServerConfig,
    error::{ApiError, ApiResult},
    extract::JsonBody,
    models::{
        CreateUserRequest, IdQuery, InsertAck, LoginRequest, MessageResponse, NewUser, Order,
        OrderAck, RegisterRequest, RegisterResponse, UpdateUserRequest,
    },
    password,
    state::AppState,
};

/// Create the router for the shop API
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/getFurniture", get(get_furniture))
        .route("/submitOrder", post(submit_order))
        .route("/createUser", post(create_user))
        .route("/getUser", get(get_user))
        .route("/updateUser", post(update_user))
        .route("/deleteUser", post(delete_user))
        .route("/getAllUsers", get(get_all_users))
        .with_state(state)
}

/// API routes plus static files, CORS, tracing and the per-request timeout
pub fn create_app(state: AppState, server: &ServerConfig) -> Result<Router> {
    let origins = server
        .cors_origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state)
        .fallback_service(ServeDir::new(&server.static_dir))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "furniture-shop"
    }))
}

/// Register a user with a hashed password
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Registering user: {}", payload.email);

    let password_hash = password::hash(payload.password).await.map_err(|e| {
        error!("Failed to hash password: {}", e);
        ApiError::Internal("Error hashing password")
    })?;

    let now = Utc::now();
    let user_id = state
        .users
        .insert(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash: Some(password_hash),
            age: 0,
            created_at: now,
            updated_at: now,
        })
        .await
        .map_err(|e| match e {
            DatabaseError::Conflict(msg) => {
                warn!("Registration rejected: {}", msg);
                ApiError::Conflict("User already exists")
            }
            e => {
                error!("Failed to create user: {}", e);
                ApiError::Internal("Error creating user")
            }
        })?;

    Ok(Json(RegisterResponse {
        message: "User registered successfully",
        user_id,
    }))
}

/// Check an email/password pair.
///
/// An unknown email and a wrong password produce the same response.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.email);

    let user = state.users.find_by_email(&payload.email).await?;

    // Unknown emails still pay for one verification.
    let verification = match user.and_then(|user| user.password_hash) {
        Some(password_hash) => password::verify(password_hash, payload.password).await,
        None => password::verify_unknown(payload.password).await,
    };
    let matched = verification.map_err(|e| {
        error!("Failed to verify password: {}", e);
        ApiError::Internal("Error verifying password")
    })?;

    if !matched {
        return Err(ApiError::InvalidCredentials);
    }

    Ok(Json(MessageResponse {
        message: "Login successful",
    }))
}

/// The whole furniture catalog, in definition order
pub async fn get_furniture(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.catalog.items().to_vec())
}

/// Acknowledge an order. Contents are logged, not validated or stored.
pub async fn submit_order(order: Order) -> impl IntoResponse {
    info!(fields = order.fields().len(), %order, "Received order data");

    Json(OrderAck::received())
}

/// Create a user, hashing the password when one is given
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let password_hash = match payload.password {
        Some(password) => Some(password::hash(password).await.map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::Internal("Error hashing password")
        })?),
        None => None,
    };

    let now = Utc::now();
    let inserted_id = state
        .users
        .insert(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            age: payload.age.unwrap_or(0),
            created_at: now,
            updated_at: now,
        })
        .await?;

    Ok(Json(InsertAck { inserted_id }))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    query: IdQuery,
) -> ApiResult<impl IntoResponse> {
    let Some(id) = query.user_id() else {
        return Err(ApiError::NotFound("User not found"));
    };

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(user))
}

/// Rename a user; 404 when no document matched
pub async fn update_user(
    State(state): State<AppState>,
    query: IdQuery,
    JsonBody(payload): JsonBody<UpdateUserRequest>,
) -> ApiResult<StatusCode> {
    let Some(id) = query.user_id() else {
        return Err(ApiError::NotFound("User not found"));
    };

    let matched = state
        .users
        .update_name(id, &payload.name, Utc::now())
        .await?;

    if matched == 0 {
        return Err(ApiError::NotFound("User not found"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user. Idempotent: answers 204 whether or not anything matched.
pub async fn delete_user(
    State(state): State<AppState>,
    query: IdQuery,
) -> ApiResult<StatusCode> {
    if let Some(id) = query.user_id() {
        let deleted = state.users.delete(id).await?;
        info!("Deleted {} user(s) with id {}", deleted, id);
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Every stored user
pub async fn get_all_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.users.list().await?;

    Ok(Json(users))
}
