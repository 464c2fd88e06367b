//! HTTP server for the public dashboard and the admin panel.
//!
//! Server-rendered HTML throughout: the public pages read the store and
//! render, the admin pages add a password gate, and every mutation is a
//! plain HTML form POST answered with a redirect back to the page it came
//! from. No JSON API is exposed apart from the health check.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Public dashboard (counts one visit) |
//! | `GET`  | `/admin` | Admin panel, or the login form when signed out |
//! | `GET`  | `/details` | Income/expense ledger (gated like `/admin`) |
//! | `GET`  | `/health` | Health check (returns version) |
//! | `POST` | `/admin/login` | Open an admin session |
//! | `POST` | `/admin/logout` | Close the session |
//! | `POST` | `/admin/save` | Save settings and story edits |
//! | `POST` | `/admin/story/add` | Append a placeholder story |
//! | `POST` | `/admin/story/delete` | Delete one story |
//! | `POST` | `/admin/detail/save` | Save ledger edits |
//! | `POST` | `/admin/detail/add` | Append a placeholder ledger entry |
//! | `POST` | `/admin/detail/delete` | Delete one ledger entry |
//!
//! Unmatched paths fall through to a static file server over
//! `[server].public_dir`, which is where story images live.
//!
//! # Error Contract
//!
//! A store that cannot be loaded is the only server error. It renders as:
//!
//! ```json
//! { "error": { "code": "internal", "message": "..." } }
//! ```
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted; every read on this
//! site is public anyway and mutations are gated by the session cookie.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use charty_core::dashboard::get_dashboard_data;
use charty_core::store::StoreBackend;

use crate::actions;
use crate::config::Config;
use crate::pages::{self, AdminFlash};
use crate::session;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    pub config: Arc<Config>,
    /// Storage backend chosen by `[store].backend`.
    pub store: Arc<dyn StoreBackend>,
    /// Expected session cookie value, derived from the admin password.
    pub session_token: String,
}

/// Starts the HTTP server.
///
/// Binds to the address configured in `[server].bind` and registers all
/// route handlers. The server runs indefinitely until the process is
/// terminated.
pub async fn run_server(config: &Config, store: Arc<dyn StoreBackend>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let public_dir = config.server.public_dir.clone();
    let config = Arc::new(config.clone());

    let state = AppState {
        session_token: session::session_token(&config.admin.password),
        config,
        store,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(handle_home))
        .route("/admin", get(handle_admin))
        .route("/details", get(handle_details))
        .route("/health", get(handle_health))
        .route("/admin/login", post(actions::handle_login))
        .route("/admin/logout", post(actions::handle_logout))
        .route("/admin/save", post(actions::handle_save))
        .route("/admin/story/add", post(actions::handle_story_add))
        .route("/admin/story/delete", post(actions::handle_story_delete))
        .route("/admin/detail/save", post(actions::handle_detail_save))
        .route("/admin/detail/add", post(actions::handle_detail_add))
        .route("/admin/detail/delete", post(actions::handle_detail_delete))
        .fallback_service(ServeDir::new(&public_dir))
        .layer(cors)
        .with_state(state);

    println!("Charty listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 500 error from a failed store operation.
pub fn internal(err: anyhow::Error) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: format!("{:#}", err),
    }
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET / ============

/// Handler for `GET /`.
///
/// Every render counts as one visit; the counter bump happens inside the
/// dashboard query so a failed save never blocks the page.
async fn handle_home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let data = get_dashboard_data(state.store.as_ref(), true)
        .await
        .map_err(internal)?;
    Ok(Html(pages::render_home(&data)))
}

// ============ GET /admin ============

/// Flash and error flags carried back to `/admin` via the query string.
#[derive(Deserialize, Default)]
struct AdminQuery {
    auth: Option<String>,
    saved: Option<String>,
    added: Option<String>,
    deleted: Option<String>,
}

impl AdminQuery {
    fn flash(&self) -> AdminFlash {
        AdminFlash {
            bad_password: self.auth.as_deref() == Some("0"),
            saved: self.saved.as_deref() == Some("1"),
            added: self.added.as_deref() == Some("1"),
            deleted: self.deleted.as_deref() == Some("1"),
        }
    }
}

/// Handler for `GET /admin`.
///
/// Without a valid session cookie this renders the login form; the admin
/// panel itself is only ever rendered to a signed-in session.
async fn handle_admin(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let flash = query.flash();

    if !actions::is_authenticated(&headers, &state) {
        return Ok(Html(pages::render_login(&flash, None)));
    }

    let data = get_dashboard_data(state.store.as_ref(), false)
        .await
        .map_err(internal)?;
    Ok(Html(pages::render_admin(&data, &flash)))
}

// ============ GET /details ============

/// Handler for `GET /details`.
///
/// Gated like the admin panel: visitors get the login form (posting back
/// here after success), a signed-in session gets the ledger with its edit
/// controls.
async fn handle_details(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let flash = query.flash();

    if !actions::is_authenticated(&headers, &state) {
        return Ok(Html(pages::render_login(&flash, Some("/details"))));
    }

    let details = state.store.load_details().await.map_err(internal)?;
    Ok(Html(pages::render_details(&details, &flash)))
}
