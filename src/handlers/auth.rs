use crate::error::PortalError;
use crate::middleware::auth::CurrentUser;
use crate::router::PortalState;
use crate::types::api::{AuthResponse, LoginRequest, SignupRequest, UserInfo};
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

/// POST /login -> issue a session for valid credentials.
pub async fn login(
    State(state): State<PortalState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, PortalError> {
    let grant = state.sessions().login(req).await?;
    Ok(Json(AuthResponse {
        token: grant.token,
        user: grant.user,
    }))
}

/// POST /signup -> create an account and issue its first session.
pub async fn signup(
    State(state): State<PortalState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, PortalError> {
    let grant = state.sessions().signup(req).await?;
    Ok(Json(AuthResponse {
        token: grant.token,
        user: grant.user,
    }))
}

/// GET /verify -> the user the presented token was issued to.
pub async fn verify(CurrentUser(user): CurrentUser) -> Json<UserInfo> {
    Json(user)
}

/// POST /logout -> destroy the session; always succeeds, token or not.
pub async fn logout(
    State(state): State<PortalState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> StatusCode {
    if let Some(TypedHeader(auth)) = bearer {
        state.sessions().logout(auth.token());
    }
    StatusCode::NO_CONTENT
}
