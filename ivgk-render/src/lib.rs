//! # ivgk-render
//!
//! Card preview rendering.
//!
//! ## Scope
//!
//! - Assembling template HTML/CSS/JS and card data into one document
//! - Synthesizing fallback sections for templates that do not render them
//! - The preview sandbox allow-list (iframe attribute and CSP header)
//! - Decoding embedded QR images for download
//!
//! Fetching templates and card data stays in application code.
//!
//! ## Example
//!
//! ```ignore
//! use ivgk_render::{DocumentAssembler, iframe_embed};
//!
//! let html = DocumentAssembler::new(&template)
//!     .meta(Some(&meta))
//!     .fallback(true)
//!     .assemble(&card_data)?;
//! let embed = iframe_embed(&html);
//! ```

pub mod assembler;
pub mod bootstrap;
pub mod dom;
mod error;
pub mod html;
pub mod qr;
pub mod sandbox;
pub mod synth;

// Re-exports
pub use assembler::{DocumentAssembler, assemble, script_json, strip_asset_references};
pub use dom::{Document, DocumentSurface, NodeId, Selector};
pub use error::{RenderError, RenderResult};
pub use html::{Element, Fragment};
pub use qr::{DecodedImage, decode_data_url, download_file_name};
pub use sandbox::{SANDBOX_TOKENS, csp_header_value, iframe_embed, sandbox_attribute};
pub use synth::{SynthOutcome, SynthState, synthesize};
