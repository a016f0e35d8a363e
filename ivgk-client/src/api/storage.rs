//! Hosted file storage

use crate::http::MultipartBody;
use crate::{ClientResult, HttpClient};
use ivgk_editor::AssetUpload;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadCategory {
    Vcard,
}

impl UploadCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vcard => "VCARD",
        }
    }
}

#[derive(Debug, Deserialize)]
struct StoredFile {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: StoredFile,
}

pub struct StorageApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> StorageApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Upload a file and return its public URL
    pub async fn upload(
        &self,
        category: UploadCategory,
        sub_category: &str,
        related_entity_id: &str,
        file: AssetUpload,
    ) -> ClientResult<String> {
        let size = file.bytes.len();
        let body = MultipartBody::new(file)
            .field("category", category.as_str())
            .field("subCategory", sub_category)
            .field("relatedEntityId", related_entity_id);
        let response: UploadResponse = self.http.post_multipart("storage/upload", &body).await?;
        tracing::debug!(sub_category, size, url = %response.file.url, "Uploaded file");
        Ok(response.file.url)
    }
}
