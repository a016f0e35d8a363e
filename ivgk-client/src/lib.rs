//! ivgk-client - REST client for the IVGK backend
//!
//! Bearer-token HTTP client with a pluggable session store, typed surfaces
//! per backend resource, and the dashboard route guard.
//!
//! ```ignore
//! use ivgk_client::{ApiClient, ClientConfig, FileSessionStore, Resources};
//!
//! let session = Arc::new(FileSessionStore::new("session.json"));
//! let client = ApiClient::new(&ClientConfig::from_env(), session)?;
//! let cards = client.vcards().list().await?;
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod routing;
pub mod session;

pub use api::Resources;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiClient, HttpClient, MultipartBody};
pub use routing::{Decision, Route, dashboard_route, guard, guard_path};
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
