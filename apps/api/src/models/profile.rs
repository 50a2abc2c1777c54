use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Backend-reported status of a single onboarding phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseStatus {
    Completed,
    InProgress,
    Pending,
    /// Any status value this service does not know about.
    #[serde(other)]
    Unknown,
}

/// State of one onboarding phase: the backend's status plus the named
/// sub-tasks (required actions) within it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseState {
    pub status: PhaseStatus,
    #[serde(default)]
    pub required_actions: BTreeMap<String, bool>,
}

/// The four sequential onboarding milestones a rep works through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phases {
    pub phase1: Option<PhaseState>,
    pub phase2: Option<PhaseState>,
    pub phase3: Option<PhaseState>,
    pub phase4: Option<PhaseState>,
}

impl Phases {
    /// Phases 1-4 in order.
    pub fn all(&self) -> [Option<&PhaseState>; 4] {
        [
            self.phase1.as_ref(),
            self.phase2.as_ref(),
            self.phase3.as_ref(),
            self.phase4.as_ref(),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingProgress {
    #[serde(default)]
    pub phases: Phases,
}

/// A rep profile as returned by `GET /profiles/:userId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepProfile {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub onboarding_progress: OnboardingProgress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_parses_camel_case_wire_format() {
        let profile: RepProfile = serde_json::from_value(json!({
            "_id": "p1",
            "onboardingProgress": {
                "phases": {
                    "phase1": {
                        "status": "completed",
                        "requiredActions": { "upload_resume": true }
                    }
                }
            }
        }))
        .unwrap();
        assert_eq!(profile.id, "p1");
        let phase1 = profile.onboarding_progress.phases.phase1.unwrap();
        assert_eq!(phase1.status, PhaseStatus::Completed);
        assert_eq!(phase1.required_actions.get("upload_resume"), Some(&true));
    }

    #[test]
    fn test_unknown_phase_status_does_not_fail_parsing() {
        let phase: PhaseState =
            serde_json::from_value(json!({ "status": "archived" })).unwrap();
        assert_eq!(phase.status, PhaseStatus::Unknown);
        assert!(phase.required_actions.is_empty());
    }

    #[test]
    fn test_profile_with_no_progress_has_empty_phases() {
        let profile: RepProfile = serde_json::from_value(json!({ "id": "p2" })).unwrap();
        assert!(profile.onboarding_progress.phases.all().iter().all(Option::is_none));
    }
}
