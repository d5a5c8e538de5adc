use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

/// Basic credentials accepted by `/protected`.
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_SECRET: &str = "admin";

/// A user that authenticates but may not read `/protected`.
pub const GUEST_USER: &str = "guest";
pub const GUEST_SECRET: &str = "guest";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub name: String,
    pub description: String,
    pub owner: String,
    pub last_change: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub frozen: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub display_name: Option<String>,
    pub can_admin: bool,
    pub repositories: Vec<String>,
}

/// Request headers as the server saw them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeenHeaders {
    pub authorization: Option<String>,
    pub accept_charset: Option<String>,
    pub cache_control: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<String>,
}

/// A body received on `/upload`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Upload {
    pub headers: SeenHeaders,
    pub body: String,
}

pub type Uploads = Arc<RwLock<Vec<Upload>>>;

pub fn app() -> Router {
    let uploads: Uploads = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/repositories", get(list_repositories))
        .route("/users", get(list_users))
        .route("/empty", get(empty))
        .route("/malformed", get(malformed))
        .route("/headers", get(echo_headers))
        .route("/protected", get(protected))
        .route("/status/{code}", any(status))
        .route("/upload", post(upload).get(last_upload))
        .with_state(uploads)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

pub fn sample_repositories() -> Vec<(String, Repository)> {
    vec![
        (
            "https://localhost/git/tools.git".to_string(),
            Repository {
                name: "tools.git".to_string(),
                description: "build tooling".to_string(),
                owner: ADMIN_USER.to_string(),
                last_change: "2011-06-15T10:30:00Z".to_string(),
                created_at: Some("2010-01-02T03:04:05Z".to_string()),
                frozen: false,
            },
        ),
        (
            "https://localhost/git/docs.git".to_string(),
            Repository {
                name: "docs.git".to_string(),
                description: String::new(),
                owner: GUEST_USER.to_string(),
                last_change: "2011-07-01T00:00:00Z".to_string(),
                created_at: None,
                frozen: true,
            },
        ),
    ]
}

pub fn sample_users() -> Vec<User> {
    vec![
        User {
            username: ADMIN_USER.to_string(),
            display_name: Some("Administrator".to_string()),
            can_admin: true,
            repositories: Vec::new(),
        },
        User {
            username: GUEST_USER.to_string(),
            display_name: None,
            can_admin: false,
            repositories: vec!["docs.git".to_string()],
        },
    ]
}

async fn list_repositories() -> Json<serde_json::Map<String, serde_json::Value>> {
    let map = sample_repositories()
        .into_iter()
        .map(|(url, repo)| (url, serde_json::to_value(repo).unwrap_or_default()))
        .collect();
    Json(map)
}

async fn list_users() -> Json<Vec<User>> {
    Json(sample_users())
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn malformed() -> &'static str {
    r#"{"name": "tools.git", "lastChange": "#
}

async fn echo_headers(headers: HeaderMap) -> Json<SeenHeaders> {
    Json(seen_headers(&headers))
}

async fn protected(headers: HeaderMap) -> Result<Json<Vec<User>>, StatusCode> {
    match basic_user(&headers).as_deref() {
        Some(ADMIN_USER) => Ok(Json(sample_users())),
        Some(_) => Err(StatusCode::FORBIDDEN),
        None => Err(StatusCode::UNAUTHORIZED),
    }
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {}", status.as_u16()))
}

async fn upload(State(uploads): State<Uploads>, headers: HeaderMap, body: String) -> StatusCode {
    uploads.write().await.push(Upload {
        headers: seen_headers(&headers),
        body,
    });
    StatusCode::CREATED
}

async fn last_upload(State(uploads): State<Uploads>) -> Result<Json<Upload>, StatusCode> {
    uploads.read().await.last().cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string)
}

fn seen_headers(headers: &HeaderMap) -> SeenHeaders {
    SeenHeaders {
        authorization: header_string(headers, header::AUTHORIZATION),
        accept_charset: header_string(headers, header::ACCEPT_CHARSET),
        cache_control: header_string(headers, header::CACHE_CONTROL),
        content_type: header_string(headers, header::CONTENT_TYPE),
        content_length: header_string(headers, header::CONTENT_LENGTH),
    }
}

/// Username from a Basic header whose credentials match a known account.
fn basic_user(headers: &HeaderMap) -> Option<String> {
    let value = header_string(headers, header::AUTHORIZATION)?;
    let token = value.strip_prefix("Basic ")?;
    [(ADMIN_USER, ADMIN_SECRET), (GUEST_USER, GUEST_SECRET)]
        .into_iter()
        .find(|(user, secret)| basic_token(user, secret) == token)
        .map(|(user, _)| user.to_string())
}

/// Base64 of `user:secret`, as carried in a Basic header.
pub fn basic_token(user: &str, secret: &str) -> String {
    STANDARD.encode(format!("{user}:{secret}"))
}
