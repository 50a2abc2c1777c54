//! Redirect resolution — decides where an authenticated user lands.
//!
//! One ordered decision procedure over the user's classification and
//! entity existence: first match wins, terminal leaves are routes. Only an
//! explicit authorization failure escapes as an error; every other failure
//! degrades to the safest fallback route for its branch, so a failed
//! resolution never strands the user on a broken page.

pub mod completion;
pub mod handlers;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::{BackendError, IdentityBackend};
use crate::models::classification::{UserClassification, UserType};
use crate::models::company::CompanyRecord;
use crate::models::profile::RepProfile;
use crate::session::{company_id_key, profile_id_key, SessionStore};

use self::completion::{company_onboarding_complete, rep_onboarding_complete};

/// Destination routes the front end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    #[serde(rename = "onboarding/choice")]
    OnboardingChoice,
    #[serde(rename = "rep/profile-creation")]
    RepProfileCreation,
    #[serde(rename = "rep/dashboard")]
    RepDashboard,
    #[serde(rename = "rep/orchestrator")]
    RepOrchestrator,
    #[serde(rename = "company/onboarding-creation")]
    CompanyOnboardingCreation,
    #[serde(rename = "company/dashboard/overview")]
    CompanyDashboardOverview,
    #[serde(rename = "company/orchestrator")]
    CompanyOrchestrator,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::OnboardingChoice => "onboarding/choice",
            Route::RepProfileCreation => "rep/profile-creation",
            Route::RepDashboard => "rep/dashboard",
            Route::RepOrchestrator => "rep/orchestrator",
            Route::CompanyOnboardingCreation => "company/onboarding-creation",
            Route::CompanyDashboardOverview => "company/dashboard/overview",
            Route::CompanyOrchestrator => "company/orchestrator",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only error that crosses the resolver boundary. The caller must
/// purge stored credentials and show the sign-in flow.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("identity check rejected the user's credentials")]
    Unauthorized,
}

/// Outcome of a resolution: the landing route plus what the identity
/// checks observed along the way.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub route: Route,
    pub classification: UserClassification,
}

/// Resolves the landing route for `user_id`.
///
/// Stateless across calls: given unchanged backend state, two resolutions
/// yield the same route. The resolver never mutates backend entities; its
/// only side effect is caching discovered ids in the advisory session
/// store.
pub async fn resolve(
    backend: &dyn IdentityBackend,
    session: &dyn SessionStore,
    user_id: &str,
) -> Result<Resolution, ResolveError> {
    let is_first_login = match backend.check_first_login(user_id).await {
        Ok(v) => v,
        Err(BackendError::Unauthorized) => return Err(ResolveError::Unauthorized),
        Err(e) => {
            warn!("first-login check failed for {user_id}: {e}");
            UserClassification::unknown().is_first_login
        }
    };

    let declared = match backend.check_user_type(user_id).await {
        Ok(t) => t,
        Err(BackendError::Unauthorized) => return Err(ResolveError::Unauthorized),
        Err(e) => {
            warn!("user-type check failed for {user_id}: {e}");
            None
        }
    };

    // With no declared type, fall back to existence probes. The probes also
    // hand back the fetched entity so the branch below does not refetch it.
    let (user_type, company_hint, profile_hint) = match declared {
        Some(t) => (Some(t), None, None),
        None => infer_user_type(backend, user_id).await,
    };

    let route = match user_type {
        Some(UserType::Rep) => resolve_rep(backend, session, user_id, profile_hint).await,
        Some(UserType::Company) => resolve_company(backend, session, user_id, company_hint).await,
        None => Route::OnboardingChoice,
    };

    debug!("resolved {user_id} -> {route}");
    Ok(Resolution {
        route,
        classification: UserClassification {
            is_first_login,
            user_type,
        },
    })
}

/// Probes both entity kinds concurrently when the backend has no declared
/// type. Company existence takes precedence over rep when both are found.
/// A probe failure counts as absence; inference never errors.
async fn infer_user_type(
    backend: &dyn IdentityBackend,
    user_id: &str,
) -> (Option<UserType>, Option<CompanyRecord>, Option<RepProfile>) {
    let (company, profile) = tokio::join!(
        backend.company_for_user(user_id),
        backend.rep_profile(user_id),
    );

    let company = company.unwrap_or_else(|e| {
        warn!("company probe failed for {user_id}: {e}");
        None
    });
    let profile = profile.unwrap_or_else(|e| {
        warn!("profile probe failed for {user_id}: {e}");
        None
    });

    if let Some(company) = company {
        (Some(UserType::Company), Some(company), None)
    } else if let Some(profile) = profile {
        (Some(UserType::Rep), None, Some(profile))
    } else {
        (None, None, None)
    }
}

async fn resolve_rep(
    backend: &dyn IdentityBackend,
    session: &dyn SessionStore,
    user_id: &str,
    hint: Option<RepProfile>,
) -> Route {
    let profile = match hint {
        Some(p) => Some(p),
        None => match backend.rep_profile(user_id).await {
            Ok(p) => p,
            Err(e) => {
                warn!("profile fetch failed for {user_id}: {e}");
                return Route::RepOrchestrator;
            }
        },
    };

    let Some(profile) = profile else {
        return Route::RepProfileCreation;
    };

    session.set(&profile_id_key(user_id), &profile.id);

    if rep_onboarding_complete(&profile.onboarding_progress) {
        Route::RepDashboard
    } else {
        Route::RepOrchestrator
    }
}

async fn resolve_company(
    backend: &dyn IdentityBackend,
    session: &dyn SessionStore,
    user_id: &str,
    hint: Option<CompanyRecord>,
) -> Route {
    // A cached company id skips the record probe on repeat resolutions.
    // The cache is advisory: a stale or unknown id falls through to a
    // fresh probe.
    if hint.is_none() {
        if let Some(cached_id) = session.get(&company_id_key(user_id)) {
            match backend.company_onboarding(&cached_id).await {
                Ok(Some(onboarding)) => {
                    return if company_onboarding_complete(&onboarding) {
                        Route::CompanyDashboardOverview
                    } else {
                        Route::CompanyOrchestrator
                    };
                }
                Ok(None) => session.remove(&company_id_key(user_id)),
                Err(e) => warn!("cached-id onboarding fetch failed for {user_id}: {e}"),
            }
        }
    }

    let company = match hint {
        Some(c) => Some(c),
        None => match backend.company_for_user(user_id).await {
            Ok(c) => c,
            Err(e) => {
                warn!("company fetch failed for {user_id}: {e}");
                return Route::CompanyOrchestrator;
            }
        },
    };

    let Some(company) = company else {
        return Route::CompanyOnboardingCreation;
    };

    session.set(&company_id_key(user_id), &company.id);

    match backend.company_onboarding(&company.id).await {
        Ok(Some(onboarding)) => {
            if company_onboarding_complete(&onboarding) {
                Route::CompanyDashboardOverview
            } else {
                Route::CompanyOrchestrator
            }
        }
        // Record exists but onboarding has not started server-side yet.
        Ok(None) => Route::CompanyOrchestrator,
        Err(e) => {
            warn!("onboarding fetch failed for {user_id}: {e}");
            Route::CompanyOrchestrator
        }
    }
}
