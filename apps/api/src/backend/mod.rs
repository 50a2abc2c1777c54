/// Backend gateway — the single point of entry for all platform backend
/// calls in Onramp.
///
/// ARCHITECTURAL RULE: No other module may call the platform REST API
/// directly. All backend interactions MUST go through this module, which
/// also normalizes the backend's response envelope into one canonical
/// shape before any decision logic sees it.
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::models::classification::{normalize_user_type, UserType};
use crate::models::company::{CompanyOnboarding, CompanyRecord};
use crate::models::profile::RepProfile;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend rejected the caller's credentials")]
    Unauthorized,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Gateway to the platform backend's identity and entity endpoints.
///
/// The resolver depends on this trait so it can be tested against an
/// in-memory fake; `BackendClient::with_token` produces the production
/// implementation. Every method maps 404s to a soft default instead of an
/// error — absence is a valid branch of the decision tree.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// `POST /auth/check-first-login`. A 404 means the backend has never
    /// seen this user, which counts as a first login.
    async fn check_first_login(&self, user_id: &str) -> Result<bool, BackendError>;

    /// `POST /auth/check-user-type`. A 404 or an unrecognized type value
    /// yields `None` (unclassified).
    async fn check_user_type(&self, user_id: &str) -> Result<Option<UserType>, BackendError>;

    /// `GET /companies/user/:userId`. `None` when the user has no company.
    async fn company_for_user(&self, user_id: &str)
        -> Result<Option<CompanyRecord>, BackendError>;

    /// `GET /companies/:companyId/onboarding`. `None` when no onboarding
    /// record exists, including a stale or unknown company id.
    async fn company_onboarding(
        &self,
        company_id: &str,
    ) -> Result<Option<CompanyOnboarding>, BackendError>;

    /// `GET /profiles/:userId`. `None` when the user has no rep profile.
    async fn rep_profile(&self, user_id: &str) -> Result<Option<RepProfile>, BackendError>;
}

/// Shared HTTP client plus the backend base URL. Cheap to clone into
/// handlers via `AppState`.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Binds a caller's bearer token to this client for one request cycle.
    /// The token is assumed valid for the duration of the resolution; there
    /// is no refresh logic here.
    pub fn with_token(&self, token: &str) -> AuthorizedBackend {
        AuthorizedBackend {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: token.to_string(),
        }
    }
}

/// A `BackendClient` carrying the bearer token of the user being resolved.
pub struct AuthorizedBackend {
    client: Client,
    base_url: String,
    token: String,
}

impl AuthorizedBackend {
    async fn get(&self, path: &str) -> Result<Option<Value>, BackendError> {
        self.send(self.client.get(format!("{}{path}", self.base_url)))
            .await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Option<Value>, BackendError> {
        self.send(
            self.client
                .post(format!("{}{path}", self.base_url))
                .json(&body),
        )
        .await
    }

    /// Sends a request and maps the status line onto the gateway error
    /// taxonomy. `Ok(None)` is a 404; the endpoint methods decide what
    /// absence means for their branch.
    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Option<Value>, BackendError> {
        let response = req.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Some(response.json::<Value>().await?))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirstLoginPayload {
    is_first_login: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserTypePayload {
    user_type: Option<String>,
}

#[async_trait]
impl IdentityBackend for AuthorizedBackend {
    async fn check_first_login(&self, user_id: &str) -> Result<bool, BackendError> {
        let Some(body) = self
            .post("/auth/check-first-login", json!({ "userId": user_id }))
            .await?
        else {
            return Ok(true);
        };
        let payload: Option<FirstLoginPayload> = unwrap_envelope(body)?;
        Ok(payload.map(|p| p.is_first_login).unwrap_or(true))
    }

    async fn check_user_type(&self, user_id: &str) -> Result<Option<UserType>, BackendError> {
        let Some(body) = self
            .post("/auth/check-user-type", json!({ "userId": user_id }))
            .await?
        else {
            return Ok(None);
        };
        let payload: Option<UserTypePayload> = unwrap_envelope(body)?;
        Ok(payload.and_then(|p| normalize_user_type(p.user_type.as_deref())))
    }

    async fn company_for_user(
        &self,
        user_id: &str,
    ) -> Result<Option<CompanyRecord>, BackendError> {
        match self.get(&format!("/companies/user/{user_id}")).await? {
            Some(body) => unwrap_envelope(body),
            None => Ok(None),
        }
    }

    async fn company_onboarding(
        &self,
        company_id: &str,
    ) -> Result<Option<CompanyOnboarding>, BackendError> {
        match self
            .get(&format!("/companies/{company_id}/onboarding"))
            .await?
        {
            Some(body) => unwrap_envelope(body),
            None => Ok(None),
        }
    }

    async fn rep_profile(&self, user_id: &str) -> Result<Option<RepProfile>, BackendError> {
        match self.get(&format!("/profiles/{user_id}")).await? {
            Some(body) => unwrap_envelope(body),
            None => Ok(None),
        }
    }
}

/// Normalizes the backend's response envelope.
///
/// Payloads arrive either nested as `{ "success": bool, "data": T }` or as
/// a flat `T`. A `success: false` or a null `data` signals absence, same as
/// an HTTP 404.
fn unwrap_envelope<T: DeserializeOwned>(mut body: Value) -> Result<Option<T>, BackendError> {
    if let Value::Object(map) = &mut body {
        if map.contains_key("data") {
            if map.get("success").and_then(Value::as_bool) == Some(false) {
                return Ok(None);
            }
            return match map.remove("data") {
                None | Some(Value::Null) => Ok(None),
                Some(data) => Ok(Some(serde_json::from_value(data)?)),
            };
        }
    }
    Ok(Some(serde_json::from_value(body)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn test_unwrap_nested_envelope() {
        let body = json!({ "success": true, "data": { "value": 7 } });
        let payload: Option<Payload> = unwrap_envelope(body).unwrap();
        assert_eq!(payload, Some(Payload { value: 7 }));
    }

    #[test]
    fn test_unwrap_flat_payload() {
        let body = json!({ "value": 7 });
        let payload: Option<Payload> = unwrap_envelope(body).unwrap();
        assert_eq!(payload, Some(Payload { value: 7 }));
    }

    #[test]
    fn test_success_false_means_absent() {
        let body = json!({ "success": false, "data": { "value": 7 } });
        let payload: Option<Payload> = unwrap_envelope(body).unwrap();
        assert_eq!(payload, None);
    }

    #[test]
    fn test_null_data_means_absent() {
        let body = json!({ "success": true, "data": null });
        let payload: Option<Payload> = unwrap_envelope(body).unwrap();
        assert_eq!(payload, None);
    }

    #[test]
    fn test_malformed_payload_is_a_parse_error() {
        let body = json!({ "data": { "value": "not-a-number" } });
        let result: Result<Option<Payload>, _> = unwrap_envelope(body);
        assert!(matches!(result, Err(BackendError::Parse(_))));
    }
}
