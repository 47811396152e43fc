//! Authentication middleware
//!
//! Bearer-token validation and role checks for protected routes

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::types::AccountRole;

use crate::error::AppError;
use crate::services::AuthService;
use crate::AppState;

/// Account information extracted from a validated access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub account_id: i64,
    pub role: AccountRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}

/// Let only admin tokens through
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = match authenticate(&state, &request) {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    if !auth_user.is_admin() {
        tracing::debug!(account_id = auth_user.account_id, role = ?auth_user.role, "Admin route refused");
        return AppError::InsufficientPermissions.into_response();
    }

    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

fn authenticate(state: &AppState, request: &Request) -> Result<AuthUser, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::Unauthorized("Missing or invalid Authorization header".to_string())
        })?;

    let claims = AuthService::new(&state.config).validate_token(token)?;

    Ok(AuthUser {
        account_id: claims.account_id()?,
        role: claims.role,
    })
}

/// Extractor for the authenticated account
/// Use this in handlers behind [`require_admin`]
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
