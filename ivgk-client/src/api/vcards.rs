//! Digital cards

use crate::api::{Resources, UploadCategory};
use crate::{ApiClient, ClientResult, HttpClient};
use async_trait::async_trait;
use ivgk_editor::{AssetUpload, CardStore, SectionPayload, StoreError};
use serde_json::json;
use shared::models::{CurrencyInfo, VcardCreate, VcardDetail, VcardSummary};

pub struct VcardsApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> VcardsApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self) -> ClientResult<Vec<VcardSummary>> {
        self.http.get("vcards").await
    }

    pub async fn get(&self, id: &str) -> ClientResult<VcardDetail> {
        self.http.get(&format!("vcards/{id}")).await
    }

    pub async fn create(&self, card: &VcardCreate) -> ClientResult<VcardDetail> {
        self.http.post("vcards", card).await
    }

    /// `PATCH` a single section; the response is the whole updated card
    pub async fn update_section(
        &self,
        id: &str,
        payload: &SectionPayload,
    ) -> ClientResult<VcardDetail> {
        tracing::debug!(card_id = id, section = ?payload.section(), "Saving card section");
        self.http.patch(&format!("vcards/{id}"), payload).await
    }

    pub async fn apply_template(&self, id: &str, template_id: i64) -> ClientResult<VcardDetail> {
        self.http
            .patch(&format!("vcards/{id}"), &json!({ "templateId": template_id }))
            .await
    }
}

#[async_trait]
impl CardStore for ApiClient {
    async fn patch_section(
        &self,
        card_id: &str,
        payload: &SectionPayload,
    ) -> Result<VcardDetail, StoreError> {
        Ok(self.vcards().update_section(card_id, payload).await?)
    }

    async fn upload_asset(
        &self,
        card_id: &str,
        sub_category: &str,
        upload: AssetUpload,
    ) -> Result<String, StoreError> {
        Ok(self
            .storage()
            .upload(UploadCategory::Vcard, sub_category, card_id, upload)
            .await?)
    }

    async fn active_currencies(&self) -> Result<Vec<CurrencyInfo>, StoreError> {
        Ok(self.plans().active_currencies().await?)
    }
}
