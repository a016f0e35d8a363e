//! Save orchestration
//!
//! [`SaveController`] owns the editor state and a [`CardStore`]. Saving a
//! section builds its sanitized payload, sends it, and re-hydrates all
//! editing state from the card the backend returns.

use crate::payload::SectionPayload;
use crate::state::{AssetTarget, EditorAction, EditorState};
use async_trait::async_trait;
use shared::models::{CurrencyInfo, SectionKey, VcardDetail};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend answered with an error status
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },

    #[error("transport error: {0}")]
    Transport(String),
}

impl StoreError {
    /// Message from the backend body, if it sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            Self::Transport(_) => None,
        }
    }
}

/// Image file selected for upload
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Backend operations the editor needs
#[async_trait]
pub trait CardStore: Send + Sync {
    /// `PATCH /vcards/{card_id}`; returns the updated card
    async fn patch_section(
        &self,
        card_id: &str,
        payload: &SectionPayload,
    ) -> Result<VcardDetail, StoreError>;

    /// Upload an image and return its public URL
    async fn upload_asset(
        &self,
        card_id: &str,
        sub_category: &str,
        upload: AssetUpload,
    ) -> Result<String, StoreError>;

    async fn active_currencies(&self) -> Result<Vec<CurrencyInfo>, StoreError>;
}

/// Section saves take `&self`, so saves of different sections can be in
/// flight together; a second save of the same section is ignored.
pub struct SaveController<S: CardStore> {
    store: S,
    state: Mutex<EditorState>,
}

impl<S: CardStore> SaveController<S> {
    pub fn new(store: S, card: &VcardDetail) -> Self {
        Self {
            store,
            state: Mutex::new(EditorState::new(card)),
        }
    }

    /// Snapshot of the current editing state
    pub fn state(&self) -> EditorState {
        self.lock().clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dispatch(&self, action: EditorAction) {
        self.lock().apply(action);
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn load_currencies(&self) {
        match self.store.active_currencies().await {
            Ok(list) => self.dispatch(EditorAction::CurrenciesLoaded(list)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load currencies, using fallback set");
                self.dispatch(EditorAction::CurrenciesFailed);
            }
        }
    }

    /// Save one section. Returns false when the save failed or the section
    /// already has a save in flight.
    pub async fn save(&self, section: SectionKey) -> bool {
        let (card_id, payload) = {
            let mut state = self.lock();
            if state.is_saving(section) {
                tracing::debug!(?section, "Save already in progress");
                return false;
            }
            let payload = SectionPayload::build(section, &state.model);
            state.apply(EditorAction::SaveStarted(section));
            (state.card_id.clone(), payload)
        };

        match self.store.patch_section(&card_id, &payload).await {
            Ok(card) => {
                tracing::info!(card_id = %card_id, ?section, "Section saved");
                self.dispatch(EditorAction::SaveSucceeded {
                    section,
                    card: Box::new(card),
                });
                true
            }
            Err(e) => {
                tracing::warn!(card_id = %card_id, ?section, error = %e, "Section save failed");
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| section.failure_message().to_string());
                self.dispatch(EditorAction::SaveFailed { section, message });
                false
            }
        }
    }

    /// Upload an image into `target`; the card itself is not saved
    pub async fn upload(&self, target: AssetTarget, upload: AssetUpload) -> bool {
        let card_id = {
            let mut state = self.lock();
            state.apply(EditorAction::UploadStarted(target));
            state.card_id.clone()
        };

        match self
            .store
            .upload_asset(&card_id, target.sub_category(), upload)
            .await
        {
            Ok(url) => {
                self.dispatch(EditorAction::UploadSucceeded { target, url });
                true
            }
            Err(e) => {
                tracing::warn!(card_id = %card_id, ?target, error = %e, "Image upload failed");
                let message = e.server_message().map(str::to_string);
                self.dispatch(EditorAction::UploadFailed { target, message });
                false
            }
        }
    }
}
