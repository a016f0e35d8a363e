//! Per-resource API surfaces
//!
//! Each surface borrows an [`HttpClient`] and maps one backend resource to
//! typed calls. Forms are validated before anything is sent.

pub mod auth;
pub mod currencies;
pub mod plans;
pub mod storage;
pub mod subscriptions;
pub mod templates;
pub mod users;
pub mod vcards;

#[cfg(test)]
pub(crate) mod mock;

pub use auth::AuthApi;
pub use currencies::CurrenciesApi;
pub use plans::PlansApi;
pub use storage::{StorageApi, UploadCategory};
pub use subscriptions::SubscriptionsApi;
pub use templates::TemplatesApi;
pub use users::UsersApi;
pub use vcards::VcardsApi;

use crate::HttpClient;

/// Entry points for every resource surface
pub trait Resources: HttpClient + Sized {
    fn auth(&self) -> AuthApi<'_, Self> {
        AuthApi::new(self)
    }

    fn users(&self) -> UsersApi<'_, Self> {
        UsersApi::new(self)
    }

    fn plans(&self) -> PlansApi<'_, Self> {
        PlansApi::new(self)
    }

    fn currencies(&self) -> CurrenciesApi<'_, Self> {
        CurrenciesApi::new(self)
    }

    fn templates(&self) -> TemplatesApi<'_, Self> {
        TemplatesApi::new(self)
    }

    fn vcards(&self) -> VcardsApi<'_, Self> {
        VcardsApi::new(self)
    }

    fn subscriptions(&self) -> SubscriptionsApi<'_, Self> {
        SubscriptionsApi::new(self)
    }

    fn storage(&self) -> StorageApi<'_, Self> {
        StorageApi::new(self)
    }
}

impl<C: HttpClient> Resources for C {}
