//! HTTP API for accounts and saved progress
//!
//! Endpoints:
//! - GET /health - Health check
//! - POST /signup - Create account {email, password, name?}
//! - POST /signin - Sign in {email, password}
//! - GET /progress/:user_id - Saved progress
//! - PUT /progress/:user_id - Save progress {vault_progress?, unlocked_modules?}
//!
//! Errors map to 400 / 401 / 404 / 409 / 500 with a JSON `{"error": ...}`
//! body. Messages are fixed strings; internal detail never leaves the server.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::{GameProgress, PublicUser, User};
use crate::MIN_PASSWORD_LEN;

lazy_static! {
    static ref RE_EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Failure surfaced to HTTP clients
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    BadRequest(&'static str),
    Unauthorized,
    NotFound,
    Conflict,
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(msg) => *msg,
            ApiError::Unauthorized => "Invalid email or password",
            ApiError::NotFound => "Not found",
            ApiError::Conflict => "An account with this email already exists",
            ApiError::Internal => "Internal server error",
        }
    }
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Sign-up request
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Sign-in / sign-up response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
}

/// Progress update; absent fields keep their stored value
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    pub vault_progress: Option<String>,
    pub unlocked_modules: Option<String>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub users: usize,
}

/// In-memory user and progress tables
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<u64, User>,
    by_email: HashMap<String, u64>,
    progress: HashMap<u64, GameProgress>,
    next_id: u64,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn create_user(
        &mut self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<&User, ApiError> {
        let email = normalize_email(email);
        if self.by_email.contains_key(&email) {
            return Err(ApiError::Conflict);
        }
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(ApiError::Internal)?;

        let now = Utc::now();
        let salt = hex(&sha256(format!("{}:{}:{}", id, email, now.timestamp_nanos_opt().unwrap_or_default()).as_bytes()));
        let user = User {
            id,
            password_hash: hash_password(&salt, password),
            salt,
            email: email.clone(),
            name: name.filter(|n| !n.trim().is_empty()),
            email_verified: false,
            created_at: now,
            updated_at: now,
        };
        self.by_email.insert(email, id);
        Ok(self.users.entry(id).or_insert(user))
    }

    /// Look up by email and check the password
    pub fn verify(&self, email: &str, password: &str) -> Result<&User, ApiError> {
        let user = self
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| self.users.get(id))
            .ok_or(ApiError::Unauthorized)?;
        if hash_password(&user.salt, password) == user.password_hash {
            Ok(user)
        } else {
            Err(ApiError::Unauthorized)
        }
    }

    pub fn progress(&self, user_id: u64) -> Result<GameProgress, ApiError> {
        if !self.users.contains_key(&user_id) {
            return Err(ApiError::NotFound);
        }
        Ok(self
            .progress
            .get(&user_id)
            .cloned()
            .unwrap_or_else(|| GameProgress::empty(user_id)))
    }

    pub fn save_progress(&mut self, user_id: u64, update: ProgressUpdate) -> Result<GameProgress, ApiError> {
        let mut progress = self.progress(user_id)?;
        if let Some(vault) = update.vault_progress {
            progress.vault_progress = vault;
        }
        if let Some(modules) = update.unlocked_modules {
            progress.unlocked_modules = modules;
        }
        progress.last_played = Utc::now();
        if let Some(user) = self.users.get_mut(&user_id) {
            user.updated_at = progress.last_played;
        }
        self.progress.insert(user_id, progress.clone());
        Ok(progress)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// App state
pub struct AppState {
    pub store: RwLock<UserStore>,
}

/// Create the API router
pub fn create_router() -> Router {
    let state = Arc::new(AppState {
        store: RwLock::new(UserStore::new()),
    });

    Router::new()
        .route("/health", get(health))
        .route("/signup", post(sign_up))
        .route("/signin", post(sign_in))
        .route("/progress/:user_id", get(get_progress).put(put_progress))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let store = state.store.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        users: store.len(),
    })
}

/// Create account
async fn sign_up(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let req: SignUpRequest = parse_body(&body)?;
    validate_email(&req.email)?;
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest("Password must be at least 6 characters"));
    }

    let mut store = state.store.write().await;
    let user = store.create_user(&req.email, &req.password, req.name).map_err(|e| {
        if e == ApiError::Conflict {
            log::warn!("signup rejected: duplicate email");
        }
        e
    })?;
    log::info!("user {} signed up", user.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(user),
        }),
    ))
}

/// Sign in
async fn sign_in(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: SignInRequest = parse_body(&body)?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("Email and password are required"));
    }

    let store = state.store.read().await;
    let user = store.verify(&req.email, &req.password).map_err(|e| {
        log::warn!("signin rejected");
        e
    })?;
    log::info!("user {} signed in", user.id);

    Ok(Json(AuthResponse {
        user: PublicUser::from(user),
    }))
}

/// Get saved progress
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Result<Json<GameProgress>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.progress(user_id)?))
}

/// Save progress
async fn put_progress(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
    body: Bytes,
) -> Result<Json<GameProgress>, ApiError> {
    let update: ProgressUpdate = parse_body(&body)?;
    let mut store = state.store.write().await;
    Ok(Json(store.save_progress(user_id, update)?))
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::BadRequest("Malformed request body"))
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if RE_EMAIL.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email address"))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hash_password(salt: &str, password: &str) -> String {
    hex(&sha256(format!("{}:{}", salt, password).as_bytes()))
}

fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Run the API server
pub async fn run_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("glitchlock API listening on {}", addr);
    println!("⚠ Glitchlock API running on {}", addr);
    println!("  GET  /health             - Health check");
    println!("  POST /signup             - Create account");
    println!("  POST /signin             - Sign in");
    println!("  GET  /progress/:user_id  - Load progress");
    println!("  PUT  /progress/:user_id  - Save progress");
    axum::serve(listener, router).await?;
    Ok(())
}
