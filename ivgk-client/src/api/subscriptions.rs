//! Tenant subscription

use crate::{ClientResult, HttpClient};
use shared::models::{SubscriptionChange, SubscriptionSummary};

pub struct SubscriptionsApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> SubscriptionsApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// `None` when the tenant has no subscription yet
    pub async fn active(&self) -> ClientResult<Option<SubscriptionSummary>> {
        self.http.get("subscriptions/active").await
    }

    pub async fn create(&self, plan_id: &str) -> ClientResult<SubscriptionSummary> {
        self.http
            .post(
                "subscriptions",
                &SubscriptionChange {
                    plan_id: plan_id.to_string(),
                },
            )
            .await
    }

    pub async fn upgrade(
        &self,
        subscription_id: &str,
        plan_id: &str,
    ) -> ClientResult<SubscriptionSummary> {
        self.http
            .patch(
                &format!("subscriptions/{subscription_id}/upgrade"),
                &SubscriptionChange {
                    plan_id: plan_id.to_string(),
                },
            )
            .await
    }

    /// Upgrade the current subscription, or subscribe when there is none
    pub async fn change_plan(
        &self,
        current: Option<&SubscriptionSummary>,
        plan_id: &str,
    ) -> ClientResult<SubscriptionSummary> {
        match current {
            Some(subscription) => self.upgrade(&subscription.id, plan_id).await,
            None => self.create(plan_id).await,
        }
    }
}
