//! ivgk-editor - card editing core
//!
//! Normalizes backend card data into complete editing state, applies edits
//! through a pure reducer, and saves sections independently through a
//! [`CardStore`].
//!
//! # Modules
//!
//! - [`normalize`] - loose card data to [`EditorModel`]
//! - [`payload`] - sanitized per-section `PATCH` bodies
//! - [`state`] - [`EditorState`], [`EditorAction`] and [`reduce`]
//! - [`controller`] - [`SaveController`] and the [`CardStore`] seam

pub mod controller;
pub mod normalize;
pub mod payload;
pub mod state;

pub use controller::{AssetUpload, CardStore, SaveController, StoreError};
pub use normalize::{BusinessHourSlot, EditorModel, GeneralState};
pub use payload::SectionPayload;
pub use state::{
    AssetTarget, EditorAction, EditorState, FieldInput, GeneralAsset, GeneralField, HourEdit,
    ItemField, ListKind, SectionStatus, reduce,
};
