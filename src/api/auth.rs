use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::ApiJson;
use super::validation::validate_credentials;
use crate::auth::{self, Claims, TokenError};
use crate::db::{CredentialsRequest, LoginResponse, ProfileResponse, SignupResponse, UserResponse};
use crate::AppState;

/// Extract the token from the Authorization header.
///
/// Both `Bearer <token>` (scheme matched case-insensitively) and a bare token
/// are accepted.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = match header.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest,
        _ => header,
    }
    .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Auth middleware for protected routes.
///
/// Rejects the request before any handler runs when the token is missing,
/// invalid or expired; otherwise stores the decoded [`Claims`] in the request
/// extensions.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers()).ok_or(TokenError::Missing)?;

    let claims = state.tokens.validate(token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        e
    })?;
    tracing::debug!(
        user_id = claims.user_id,
        expires_at = ?claims.expires_at(),
        "Authenticated request"
    );

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Claims of the authenticated caller, as stored by [`auth_middleware`].
#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| TokenError::Missing.into())
    }
}

/// Register a regular user
///
/// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    validate_credentials(&req)?;

    let user = auth::register(&state.db, &req.username, &req.password, false).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// Register an admin user. This route requires no authentication.
///
/// POST /admin
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    validate_credentials(&req)?;

    let user = auth::register(&state.db, &req.username, &req.password, true).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user: UserResponse::from(user),
        }),
    ))
}

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = auth::authenticate(&state.db, &req.username, &req.password).await?;
    let token = state.tokens.issue(user.id, user.is_admin)?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse { token }))
}

/// GET /profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    claims: Claims,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = auth::find_user(&state.db, claims.user_id).await?;

    Ok(Json(ProfileResponse {
        username: user.username,
        user_id: user.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_token(&headers("Bearer abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_extract_bare_token() {
        assert_eq!(extract_token(&headers("abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_extract_bearer_scheme_ignores_case() {
        assert_eq!(extract_token(&headers("bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_token(&headers("BEARER abc.def")), Some("abc.def"));
    }

    #[test]
    fn test_extract_missing_or_empty_token() {
        assert_eq!(extract_token(&HeaderMap::new()), None);
        assert_eq!(extract_token(&headers("Bearer ")), None);
        assert_eq!(extract_token(&headers("")), None);
    }
}
