//! Subscription Model

use super::plan::PlanSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Trial,
    Canceled,
    Expired,
    Suspended,
}

impl SubscriptionStatus {
    /// Whether the tenant may currently use plan features
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Active | Self::Trial)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
    pub id: String,
    pub plan_id: String,
    pub tenant_id: String,
    pub user_id: String,
    pub status: SubscriptionStatus,
    pub start_date: String,
    pub end_date: Option<String>,
    pub trial_ends_at: Option<String>,
    #[serde(default)]
    pub canceled_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub plan: PlanSummary,
}

/// `POST /subscriptions` and `PATCH /subscriptions/{id}/upgrade`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionChange {
    pub plan_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_format() {
        let s: SubscriptionStatus = serde_json::from_str("\"TRIAL\"").unwrap();
        assert_eq!(s, SubscriptionStatus::Trial);
        assert!(s.is_usable());
        assert!(!SubscriptionStatus::Suspended.is_usable());
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Canceled).unwrap(),
            "\"CANCELED\""
        );
    }
}
