//! Currency Model

use serde::{Deserialize, Serialize};

/// Currency row in the super-admin listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySummary {
    pub id: String,
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub is_active: bool,
    pub created_at: String,
}

/// Minimal currency reference embedded in products and plans
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl CurrencyInfo {
    /// Currencies offered when the active list cannot be loaded
    pub fn fallback_set() -> Vec<CurrencyInfo> {
        vec![
            CurrencyInfo {
                id: "USD".into(),
                code: "USD".into(),
                name: "US Dollar".into(),
                symbol: Some("$".into()),
            },
            CurrencyInfo {
                id: "INR".into(),
                code: "INR".into(),
                name: "Indian Rupee".into(),
                symbol: Some("₹".into()),
            },
        ]
    }
}

/// Create / update currency payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormValues {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub is_active: bool,
}

impl Default for CurrencyFormValues {
    fn default() -> Self {
        Self {
            code: String::new(),
            name: String::new(),
            symbol: String::new(),
            is_active: true,
        }
    }
}

impl From<&CurrencySummary> for CurrencyFormValues {
    fn from(currency: &CurrencySummary) -> Self {
        Self {
            code: currency.code.clone(),
            name: currency.name.clone(),
            symbol: currency.symbol.clone(),
            is_active: currency.is_active,
        }
    }
}
