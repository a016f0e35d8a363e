//! Currency administration

use crate::{ClientResult, HttpClient};
use serde::de::IgnoredAny;
use serde_json::json;
use shared::forms::CurrencyForm;
use shared::models::{CurrencyFormValues, CurrencySummary};
use validator::Validate;

pub struct CurrenciesApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> CurrenciesApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// All currencies, inactive included
    pub async fn list(&self) -> ClientResult<Vec<CurrencySummary>> {
        self.http
            .get_query("currencies", &json!({ "includeInactive": true }))
            .await
    }

    pub async fn create(&self, form: CurrencyForm) -> ClientResult<CurrencySummary> {
        form.validate()?;
        self.http
            .post("currencies", &CurrencyFormValues::from(form))
            .await
    }

    pub async fn update(&self, id: &str, form: CurrencyForm) -> ClientResult<CurrencySummary> {
        form.validate()?;
        self.http
            .patch(&format!("currencies/{id}"), &CurrencyFormValues::from(form))
            .await
    }

    pub async fn toggle(&self, currency: &CurrencySummary) -> ClientResult<CurrencySummary> {
        self.http
            .patch(
                &format!("currencies/{}", currency.id),
                &json!({ "isActive": !currency.is_active }),
            )
            .await
    }

    /// Deactivates the currency; plans that reference it keep it
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("currencies/{id}")).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use crate::api::Resources;
    use crate::api::mock::MockHttp;

    fn currency_reply(active: bool) -> serde_json::Value {
        json!({"id": "c1", "code": "EUR", "name": "Euro", "symbol": "€",
               "isActive": active, "createdAt": "t"})
    }

    #[tokio::test]
    async fn lowercase_code_is_rejected_locally() {
        let http = MockHttp::new();
        let err = http
            .currencies()
            .create(CurrencyForm {
                code: "eur".into(),
                name: "Euro".into(),
                symbol: "€".into(),
                is_active: true,
            })
            .await
            .unwrap_err();
        let ClientError::Validation { fields } = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("code"));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn list_includes_inactive() {
        let http = MockHttp::new().reply(json!([currency_reply(false)]));
        let list = http.currencies().list().await.unwrap();
        assert!(!list[0].is_active);
        assert_eq!(http.calls()[0].body, json!({"includeInactive": true}));
    }

    #[tokio::test]
    async fn toggle_flips_active_flag() {
        let http = MockHttp::new().reply(currency_reply(false));
        let currency: CurrencySummary = serde_json::from_value(currency_reply(true)).unwrap();
        http.currencies().toggle(&currency).await.unwrap();
        assert_eq!(http.calls()[0].body, json!({"isActive": false}));
    }
}
