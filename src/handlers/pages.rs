//! Guarded page routes. The portal serves no markup (the client renders
//! itself); these endpoints only encode the navigation rules: where `/`
//! lands, and who may sit on `/admin` and `/student`.

use crate::middleware::auth::bearer_token;
use crate::middleware::guard::{self, GuardOutcome};
use crate::router::PortalState;
use crate::types::api::UserInfo;
use crate::types::role::Role;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Uri},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

/// GET / -> role home for a live session, /login otherwise.
pub async fn root_page(State(state): State<PortalState>, headers: HeaderMap, uri: Uri) -> Redirect {
    let session = resolve_session(&state, &headers, &uri).await;
    Redirect::temporary(guard::landing(session.as_ref()))
}

/// GET /admin -> admin dashboard shell, admin role required.
pub async fn admin_page(State(state): State<PortalState>, headers: HeaderMap, uri: Uri) -> Response {
    dashboard(Role::Admin, &state, &headers, &uri).await
}

/// GET /student -> student dashboard shell, student role required.
pub async fn student_page(
    State(state): State<PortalState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    dashboard(Role::Student, &state, &headers, &uri).await
}

/// GET /login and GET /signup -> already-authenticated visitors are sent
/// straight to their dashboard.
pub async fn login_page(State(state): State<PortalState>, headers: HeaderMap, uri: Uri) -> Response {
    entry_page("login", &state, &headers, &uri).await
}

pub async fn signup_page(
    State(state): State<PortalState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    entry_page("signup", &state, &headers, &uri).await
}

async fn dashboard(required: Role, state: &PortalState, headers: &HeaderMap, uri: &Uri) -> Response {
    let session = resolve_session(state, headers, uri).await;
    match guard::decide(required, session) {
        GuardOutcome::Allow(user) => {
            Json(json!({"page": required.home_path(), "user": user})).into_response()
        }
        GuardOutcome::Redirect(to) => Redirect::temporary(to).into_response(),
    }
}

async fn entry_page(page: &str, state: &PortalState, headers: &HeaderMap, uri: &Uri) -> Response {
    match resolve_session(state, headers, uri).await {
        Some(user) => Redirect::temporary(user.role.home_path()).into_response(),
        None => Json(json!({"page": page})).into_response(),
    }
}

async fn resolve_session(state: &PortalState, headers: &HeaderMap, uri: &Uri) -> Option<UserInfo> {
    let token = bearer_token(headers, uri.query())?;
    state.sessions().verify(token).await.ok()
}
