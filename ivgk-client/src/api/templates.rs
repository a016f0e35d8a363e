//! Card templates

use crate::{ClientResult, HttpClient};
use serde_json::json;
use shared::models::TemplateSummary;

pub struct TemplatesApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> TemplatesApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Templates the signed-in tenant's plan grants
    pub async fn accessible(&self) -> ClientResult<Vec<TemplateSummary>> {
        self.http.get("templates/accessible").await
    }

    /// Full catalog for plan administration
    pub async fn list(&self, include_inactive: bool) -> ClientResult<Vec<TemplateSummary>> {
        self.http
            .get_query("templates", &json!({ "includeInactive": include_inactive }))
            .await
    }
}
