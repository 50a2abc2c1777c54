use serde::{Deserialize, Serialize};

/// How the platform backend classifies an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Company,
    Rep,
}

/// Identity-check results for a user, assembled from the two
/// `/auth/check-*` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserClassification {
    pub is_first_login: bool,
    pub user_type: Option<UserType>,
}

impl UserClassification {
    /// Defaults used when the backend has no record of the user yet.
    pub fn unknown() -> Self {
        Self {
            is_first_login: true,
            user_type: None,
        }
    }
}

/// Maps a raw `userType` wire value onto a known classification.
/// Unrecognized values mean "unclassified", never an error.
pub fn normalize_user_type(raw: Option<&str>) -> Option<UserType> {
    match raw {
        Some("company") => Some(UserType::Company),
        Some("rep") => Some(UserType::Rep),
        _ => None,
    }
}
