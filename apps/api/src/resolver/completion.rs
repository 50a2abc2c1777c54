//! Onboarding completion rules.
//!
//! Pure functions over already-fetched backend entities. The routes in
//! `resolver` branch on these, nothing else does.

use crate::models::company::CompanyOnboarding;
use crate::models::profile::{OnboardingProgress, PhaseState, PhaseStatus};

/// Steps a company must finish before the full dashboard unlocks.
pub const COMPANY_REQUIRED_STEPS: std::ops::RangeInclusive<u32> = 1..=13;

/// The final company onboarding phase.
pub const COMPANY_FINAL_PHASE: u32 = 4;

/// A phase counts as complete when the backend says so outright, or when
/// every required action within it is satisfied. A phase with no data is
/// never complete, and partially satisfied actions never count.
pub fn phase_complete(phase: Option<&PhaseState>) -> bool {
    let Some(phase) = phase else {
        return false;
    };
    if phase.status == PhaseStatus::Completed {
        return true;
    }
    !phase.required_actions.is_empty() && phase.required_actions.values().all(|done| *done)
}

/// Reps reach the dashboard once phases 1-4 are all complete.
pub fn rep_onboarding_complete(progress: &OnboardingProgress) -> bool {
    progress.phases.all().into_iter().all(phase_complete)
}

/// Companies reach the dashboard once steps 1-13 are all completed, or
/// once the backend reports the final phase with at least that many steps
/// done.
pub fn company_onboarding_complete(onboarding: &CompanyOnboarding) -> bool {
    let steps = &onboarding.completed_steps;
    COMPANY_REQUIRED_STEPS.all(|step| steps.contains(&step))
        || (onboarding.current_phase == COMPANY_FINAL_PHASE
            && steps.len() >= COMPANY_REQUIRED_STEPS.count())
}
