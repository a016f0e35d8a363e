//! Plan Model

use super::loose::LooseNumber;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanFrequency {
    #[default]
    Monthly,
    Yearly,
}

/// Feature entitlement attached to a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub feature: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTemplateRef {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTemplateAccess {
    pub template_id: i64,
    #[serde(default)]
    pub template: Option<PlanTemplateRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanCurrency {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanCounts {
    #[serde(default)]
    pub subscriptions: u32,
}

/// Subscription plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub id: String,
    pub name: String,
    /// Decimal column, serialized as a string by some backends
    pub price: LooseNumber,
    pub currency_id: String,
    pub frequency: PlanFrequency,
    pub no_of_vcards: u32,
    pub storage_limit: u64,
    pub trial_days: u32,
    pub is_default: bool,
    pub status: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub currency: Option<PlanCurrency>,
    #[serde(default)]
    pub features: Vec<PlanFeature>,
    #[serde(default)]
    pub plan_templates: Vec<PlanTemplateAccess>,
    #[serde(rename = "_count", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<PlanCounts>,
}

impl PlanSummary {
    pub fn price_value(&self) -> f64 {
        self.price.or(0.0)
    }
}

/// Feature catalog entry from `GET /plans/features`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFeatureDefinition {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub supports_limit: bool,
    #[serde(default)]
    pub default_limit: Option<i64>,
}

/// Query parameters for `GET /plans`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFormFeature {
    pub feature: String,
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
}

/// Create / update plan payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFormValues {
    pub name: String,
    pub price: f64,
    pub currency_id: String,
    pub frequency: PlanFrequency,
    pub no_of_vcards: f64,
    pub storage_limit: f64,
    pub trial_days: f64,
    pub is_default: bool,
    pub status: bool,
    #[serde(default)]
    pub features: Vec<PlanFormFeature>,
    #[serde(default)]
    pub template_ids: Vec<i64>,
}

impl Default for PlanFormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: 0.0,
            currency_id: String::new(),
            frequency: PlanFrequency::Monthly,
            no_of_vcards: 1.0,
            storage_limit: 1024.0,
            trial_days: 0.0,
            is_default: false,
            status: true,
            features: Vec::new(),
            template_ids: Vec::new(),
        }
    }
}

impl PlanFormValues {
    /// Blank form: every catalog feature disabled, default limits preset
    pub fn blank(catalog: &[PlanFeatureDefinition], default_currency: Option<&str>) -> Self {
        Self {
            currency_id: default_currency.unwrap_or_default().to_string(),
            features: catalog.iter().map(base_feature).collect(),
            ..Self::default()
        }
    }

    /// Edit form: catalog features merged with the plan's stored
    /// entitlements, followed by any custom features not in the catalog
    pub fn from_summary(plan: &PlanSummary, catalog: &[PlanFeatureDefinition]) -> Self {
        let existing: HashMap<&str, &PlanFeature> = plan
            .features
            .iter()
            .map(|f| (f.feature.as_str(), f))
            .collect();

        let mut features: Vec<PlanFormFeature> = catalog
            .iter()
            .map(|definition| {
                let base = base_feature(definition);
                let Some(stored) = existing.get(definition.key.as_str()) else {
                    return base;
                };
                let limit = match (base.limit, stored.enabled) {
                    (Some(default), true) => stored.limit.map(|l| l as f64).or(Some(default)),
                    (None, true) => stored.limit.map(|l| l as f64),
                    _ => None,
                };
                PlanFormFeature {
                    feature: base.feature,
                    enabled: stored.enabled,
                    limit,
                }
            })
            .collect();

        features.extend(
            plan.features
                .iter()
                .filter(|f| !catalog.iter().any(|d| d.key == f.feature))
                .map(|f| PlanFormFeature {
                    feature: f.feature.clone(),
                    enabled: f.enabled,
                    limit: f.limit.map(|l| l as f64),
                }),
        );

        Self {
            name: plan.name.clone(),
            price: plan.price_value(),
            currency_id: plan.currency_id.clone(),
            frequency: plan.frequency,
            no_of_vcards: plan.no_of_vcards as f64,
            storage_limit: plan.storage_limit as f64,
            trial_days: plan.trial_days as f64,
            is_default: plan.is_default,
            status: plan.status,
            features,
            template_ids: plan.plan_templates.iter().map(|t| t.template_id).collect(),
        }
    }

    /// Submission form of the feature list
    ///
    /// Blank keys are dropped, later duplicates replace earlier ones, limits
    /// are floored and kept only for enabled features whose catalog entry
    /// supports a limit (custom features keep theirs).
    pub fn sanitized(mut self, catalog: &[PlanFeatureDefinition]) -> Self {
        let mut order: Vec<String> = Vec::new();
        let mut by_key: HashMap<String, PlanFormFeature> = HashMap::new();

        for feature in self.features.drain(..) {
            let key = feature.feature.trim().to_string();
            if key.is_empty() {
                continue;
            }
            let definition = catalog.iter().find(|d| d.key == key);
            let mut limit = feature
                .limit
                .filter(|l| l.is_finite() && *l >= 0.0)
                .map(f64::floor);
            if !feature.enabled || definition.is_some_and(|d| !d.supports_limit) {
                limit = None;
            }
            if !by_key.contains_key(&key) {
                order.push(key.clone());
            }
            by_key.insert(
                key.clone(),
                PlanFormFeature {
                    feature: key,
                    enabled: feature.enabled,
                    limit,
                },
            );
        }

        self.features = order
            .into_iter()
            .filter_map(|key| by_key.remove(&key))
            .collect();
        self
    }
}

fn base_feature(definition: &PlanFeatureDefinition) -> PlanFormFeature {
    PlanFormFeature {
        feature: definition.key.clone(),
        enabled: false,
        limit: definition
            .default_limit
            .filter(|_| definition.supports_limit)
            .map(|l| l as f64),
    }
}
