//! Data models
//!
//! Wire types of the IVGK REST API (camelCase JSON) plus the rendered card
//! projection consumed by templates.

pub mod auth;
pub mod currency;
pub mod loose;
pub mod plan;
pub mod rendered;
pub mod subscription;
pub mod template;
pub mod user;
pub mod vcard;

// Re-exports
pub use auth::*;
pub use currency::*;
pub use loose::{LooseNumber, coerce};
pub use plan::*;
pub use rendered::*;
pub use subscription::*;
pub use template::*;
pub use user::*;
pub use vcard::*;
