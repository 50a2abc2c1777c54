use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::backend::IdentityBackend;
use crate::errors::AppError;
use crate::models::classification::{UserClassification, UserType};
use crate::resolver::{resolve, ResolveError, Route};
use crate::session::{company_id_key, profile_id_key};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ResolveRedirectRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct ResolveRedirectResponse {
    pub redirect_to: Route,
    pub user_type: Option<UserType>,
    pub is_first_login: bool,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

/// POST /api/v1/auth/resolve-redirect
pub async fn handle_resolve_redirect(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ResolveRedirectRequest>,
) -> Result<Json<ResolveRedirectResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    validate_user_id(&req.user_id)?;

    let backend = state.backend.with_token(token);
    match resolve(&backend, state.session.as_ref(), &req.user_id).await {
        Ok(resolution) => Ok(Json(ResolveRedirectResponse {
            redirect_to: resolution.route,
            user_type: resolution.classification.user_type,
            is_first_login: resolution.classification.is_first_login,
        })),
        Err(ResolveError::Unauthorized) => {
            // A rejected session must not leave advisory ids behind.
            state.session.remove(&company_id_key(&req.user_id));
            state.session.remove(&profile_id_key(&req.user_id));
            Err(AppError::Unauthorized)
        }
    }
}

/// GET /api/v1/auth/classification
///
/// Raw identity-check passthrough for callers that want the classification
/// without a route decision.
pub async fn handle_classification(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<UserClassification>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    validate_user_id(&params.user_id)?;

    let backend = state.backend.with_token(token);
    let is_first_login = backend.check_first_login(&params.user_id).await?;
    let user_type = backend.check_user_type(&params.user_id).await?;

    Ok(Json(UserClassification {
        is_first_login,
        user_type,
    }))
}

fn validate_user_id(user_id: &str) -> Result<(), AppError> {
    if user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id must be non-empty".to_string()));
    }
    Ok(())
}

/// Extracts the bearer token from the Authorization header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn test_missing_or_malformed_authorization_is_rejected() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with_auth("Basic abc")), None);
        assert_eq!(bearer_token(&headers_with_auth("Bearer ")), None);
    }

    #[test]
    fn test_empty_user_id_fails_validation() {
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("   ").is_err());
        assert!(validate_user_id("u1").is_ok());
    }
}
