//! Subscription plans and the currency/feature catalogs plans refer to

use crate::{ClientResult, HttpClient};
use serde::de::IgnoredAny;
use serde_json::json;
use shared::forms::PlanForm;
use shared::models::{
    CurrencyInfo, CurrencySummary, PlanFeatureDefinition, PlanFormValues, PlanListQuery,
    PlanSummary,
};
use validator::Validate;

pub struct PlansApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> PlansApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &PlanListQuery) -> ClientResult<Vec<PlanSummary>> {
        self.http.get_query("plans", query).await
    }

    pub async fn create(&self, form: PlanForm) -> ClientResult<PlanSummary> {
        form.validate()?;
        self.http.post("plans", &PlanFormValues::from(form)).await
    }

    pub async fn update(&self, id: &str, form: PlanForm) -> ClientResult<PlanSummary> {
        form.validate()?;
        self.http
            .patch(&format!("plans/{id}"), &PlanFormValues::from(form))
            .await
    }

    /// Flip the plan's active status
    pub async fn toggle(&self, plan: &PlanSummary) -> ClientResult<PlanSummary> {
        self.http
            .patch(&format!("plans/{}", plan.id), &json!({ "status": !plan.status }))
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        let _: IgnoredAny = self.http.delete(&format!("plans/{id}")).await?;
        Ok(())
    }

    /// Feature catalog for the plan form
    pub async fn features(&self) -> ClientResult<Vec<PlanFeatureDefinition>> {
        self.http.get("plans/features").await
    }

    /// Every currency a plan may be priced in
    pub async fn currencies(&self) -> ClientResult<Vec<CurrencySummary>> {
        self.http.get("plans/currencies").await
    }

    /// Active currencies offered for product prices
    pub async fn active_currencies(&self) -> ClientResult<Vec<CurrencyInfo>> {
        self.http.get("plans/currencies/active").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use crate::api::Resources;
    use crate::api::mock::MockHttp;
    use shared::forms::PlanFeatureForm;
    use shared::models::PlanFrequency;

    fn plan_form(name: &str) -> PlanForm {
        PlanForm {
            name: name.into(),
            price: 9.0,
            currency_id: "USD".into(),
            frequency: PlanFrequency::Monthly,
            no_of_vcards: 1.0,
            storage_limit: 1024.0,
            trial_days: 0.0,
            is_default: false,
            status: true,
            features: vec![PlanFeatureForm {
                feature: "services".into(),
                enabled: true,
                limit: Some(f64::NAN),
            }],
            template_ids: vec![1],
        }
    }

    fn plan_reply(status: bool) -> serde_json::Value {
        json!({"id": "p1", "name": "Pro", "price": "9.00", "currencyId": "USD",
               "frequency": "MONTHLY", "noOfVcards": 1, "storageLimit": 1024, "trialDays": 0,
               "isDefault": false, "status": status, "createdAt": "t", "updatedAt": "t"})
    }

    #[tokio::test]
    async fn blank_name_blocks_create() {
        let http = MockHttp::new();
        let err = http.plans().create(plan_form("")).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn create_drops_blank_limits() {
        let http = MockHttp::new().reply(plan_reply(true));
        http.plans().create(plan_form(" Pro ")).await.unwrap();

        let body = &http.calls()[0].body;
        assert_eq!(body["name"], "Pro");
        assert!(body["features"][0].get("limit").is_none());
    }

    #[tokio::test]
    async fn toggle_sends_inverted_status() {
        let http = MockHttp::new().reply(plan_reply(false)).reply(plan_reply(false));
        let plan: PlanSummary = serde_json::from_value(plan_reply(true)).unwrap();
        http.plans().toggle(&plan).await.unwrap();

        let call = &http.calls()[0];
        assert_eq!(call.path, "plans/p1");
        assert_eq!(call.body, json!({"status": false}));
    }

    #[tokio::test]
    async fn delete_accepts_any_body() {
        let http = MockHttp::new().reply(json!({"deleted": true}));
        http.plans().delete("p1").await.unwrap();
        assert_eq!(http.calls()[0].method, "DELETE");
    }

    #[tokio::test]
    async fn catalog_endpoints() {
        let http = MockHttp::new()
            .reply(json!([{"id": "USD", "code": "USD", "name": "US Dollar", "symbol": "$"}]))
            .reply(json!([]));
        let active = http.plans().active_currencies().await.unwrap();
        assert_eq!(active[0].symbol.as_deref(), Some("$"));
        http.plans().features().await.unwrap();

        let paths: Vec<_> = http.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(paths, ["plans/currencies/active", "plans/features"]);
    }
}
