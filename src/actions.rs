//! Admin form actions.
//!
//! Every mutating route runs the same fail-closed sequence: check the
//! session cookie, and bounce unauthenticated requests back to the login
//! page before the form is read or the store is touched. Past the gate, a
//! mutation is one load, one in-memory transform from
//! [`charty_core::admin`], one save, then a redirect carrying a flash
//! flag back to the page the form came from.
//!
//! Save failures are logged rather than surfaced; the admin keeps a
//! working panel even when the backing medium is briefly unwritable.

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use tracing::error;

use charty_core::admin;
use charty_core::form::FormFields;
use charty_core::models::{now_stamp, DetailEntry, StoreData};

use crate::server::{internal, AppError, AppState};
use crate::session;

/// Check the request's session cookie against the expected token.
pub fn is_authenticated(headers: &HeaderMap, state: &AppState) -> bool {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok());
    session::cookie_token(cookie_header) == Some(state.session_token.as_str())
}

/// Only same-site paths are allowed as login redirect targets.
fn sanitize_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/admin",
    }
}

async fn save_store_logged(state: &AppState, data: &StoreData) {
    if let Err(err) = state.store.save_store(data).await {
        error!("Failed to save record: {:#}", err);
    }
}

async fn save_details_logged(state: &AppState, details: &[DetailEntry]) {
    if let Err(err) = state.store.save_details(details).await {
        error!("Failed to save ledger: {:#}", err);
    }
}

// ============ POST /admin/login ============

/// Handler for `POST /admin/login`.
///
/// The submitted password is hashed and compared against the expected
/// session token, so the comparison never sees the configured plaintext.
/// Success sets the cookie and follows `redirect_to` when it names a
/// same-site path; failure goes back to the login form.
pub async fn handle_login(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Response {
    let form = FormFields::from(pairs);
    let submitted = form.first("password").unwrap_or("");

    if session::session_token(submitted) != state.session_token {
        return Redirect::to("/admin?auth=0").into_response();
    }

    let target = sanitize_redirect(form.first("redirect_to"));
    let cookie = session::login_cookie(&state.session_token, state.config.admin.secure_cookies);
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to(target),
    )
        .into_response()
}

/// Handler for `POST /admin/logout`. Expires the cookie unconditionally.
pub async fn handle_logout(State(state): State<AppState>) -> Response {
    let cookie = session::logout_cookie(state.config.admin.secure_cookies);
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Redirect::to("/admin"),
    )
        .into_response()
}

// ============ POST /admin/save ============

/// Handler for `POST /admin/save`.
pub async fn handle_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/admin?auth=0").into_response());
    }

    let form = FormFields::from(pairs);
    let mut data = state.store.load_store().await.map_err(internal)?;
    admin::apply_update(&mut data, &form, &now_stamp());
    save_store_logged(&state, &data).await;

    Ok(Redirect::to("/admin?saved=1").into_response())
}

// ============ POST /admin/story/add ============

/// Handler for `POST /admin/story/add`.
pub async fn handle_story_add(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/admin?auth=0").into_response());
    }

    let mut data = state.store.load_store().await.map_err(internal)?;
    admin::add_story(&mut data);
    save_store_logged(&state, &data).await;

    Ok(Redirect::to("/admin?added=1").into_response())
}

// ============ POST /admin/story/delete ============

/// Handler for `POST /admin/story/delete`.
///
/// A missing or non-numeric `story_id` is not an error worth a page; the
/// request just lands back on the panel without a flash.
pub async fn handle_story_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/admin?auth=0").into_response());
    }

    let form = FormFields::from(pairs);
    let id = match form.first("story_id").and_then(|raw| raw.trim().parse::<u64>().ok()) {
        Some(id) => id,
        None => return Ok(Redirect::to("/admin").into_response()),
    };

    let mut data = state.store.load_store().await.map_err(internal)?;
    admin::delete_story(&mut data, id);
    save_store_logged(&state, &data).await;

    Ok(Redirect::to("/admin?deleted=1").into_response())
}

// ============ POST /admin/detail/save ============

/// Handler for `POST /admin/detail/save`.
pub async fn handle_detail_save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/details?auth=0").into_response());
    }

    let form = FormFields::from(pairs);
    let mut details = state.store.load_details().await.map_err(internal)?;
    admin::apply_details_update(&mut details, &form);
    save_details_logged(&state, &details).await;

    Ok(Redirect::to("/details?saved=1").into_response())
}

// ============ POST /admin/detail/add ============

/// Handler for `POST /admin/detail/add`.
pub async fn handle_detail_add(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/details?auth=0").into_response());
    }

    let mut details = state.store.load_details().await.map_err(internal)?;
    admin::add_detail(&mut details, &now_stamp());
    save_details_logged(&state, &details).await;

    Ok(Redirect::to("/details?added=1").into_response())
}

// ============ POST /admin/detail/delete ============

/// Handler for `POST /admin/detail/delete`.
pub async fn handle_detail_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    if !is_authenticated(&headers, &state) {
        return Ok(Redirect::to("/details?auth=0").into_response());
    }

    let form = FormFields::from(pairs);
    let id = match form.first("detail_id").and_then(|raw| raw.trim().parse::<u64>().ok()) {
        Some(id) => id,
        None => return Ok(Redirect::to("/details").into_response()),
    };

    let mut details = state.store.load_details().await.map_err(internal)?;
    admin::delete_detail(&mut details, id);
    save_details_logged(&state, &details).await;

    Ok(Redirect::to("/details?deleted=1").into_response())
}
