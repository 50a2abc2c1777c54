use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A company record as returned by `GET /companies/user/:userId`.
/// Owned by the platform backend; this service only ever reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Onboarding progress for a company, from
/// `GET /companies/:companyId/onboarding`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyOnboarding {
    #[serde(default)]
    pub current_phase: u32,
    #[serde(default)]
    pub completed_steps: BTreeSet<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_company_record_accepts_mongo_style_id() {
        let record: CompanyRecord =
            serde_json::from_value(json!({ "_id": "c1", "name": "Acme" })).unwrap();
        assert_eq!(record.id, "c1");
        assert_eq!(record.name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_onboarding_defaults_when_fields_missing() {
        let ob: CompanyOnboarding = serde_json::from_value(json!({})).unwrap();
        assert_eq!(ob.current_phase, 0);
        assert!(ob.completed_steps.is_empty());
    }
}
