use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde_json::json;

use crate::error::PortalError;
use crate::router::PortalState;
use crate::types::api::UserInfo;
use crate::types::role::Role;

/// Pull the bearer token off a request.
/// Accepts either:
/// - Header: `Authorization: Bearer <token>`
/// - Query string: `?token=...` (page navigations cannot set headers)
pub fn bearer_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(auth) = headers.typed_get::<Authorization<Bearer>>() {
        return Some(auth.token().to_string());
    }

    if let Some(qs) = query {
        for (k, v) in url::form_urlencoded::parse(qs.as_bytes()) {
            if k == "token" && !v.is_empty() {
                return Some(v.into_owned());
            }
        }
    }

    None
}

/// Extractor: the authenticated user behind the request's bearer token.
/// Rejects with 401 when the token is missing or no longer maps to a session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserInfo);

impl FromRequestParts<PortalState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PortalState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers, parts.uri.query()) else {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": "UNAUTHORIZED", "message": "Missing bearer token."}})),
            )
                .into_response());
        };

        let user = state
            .sessions()
            .verify(token)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(user))
    }
}

/// Extractor: like [`CurrentUser`] but additionally requires the admin role.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub UserInfo);

impl FromRequestParts<PortalState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &PortalState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        match user.role {
            Role::Admin => Ok(Self(user)),
            Role::Student => Err(PortalError::Forbidden.into_response()),
        }
    }
}
