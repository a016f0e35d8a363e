//! Super-admin user management

use crate::{ClientError, ClientResult, HttpClient};
use shared::forms::{FormMode, UserForm};
use shared::models::{UserListQuery, UserStatsResponse, UserSummary, UsersListResponse};
use std::collections::BTreeMap;

pub struct UsersApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> UsersApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    pub async fn list(&self, query: &UserListQuery) -> ClientResult<UsersListResponse> {
        self.http.get_query("users", query).await
    }

    /// Dashboard totals plus recent users and card edits
    pub async fn stats(&self) -> ClientResult<UserStatsResponse> {
        self.http.get("users/stats/summary").await
    }

    pub async fn create(&self, form: UserForm) -> ClientResult<UserSummary> {
        form.validate_for(FormMode::Create)?;
        let payload = form.into_create().ok_or_else(|| ClientError::Validation {
            fields: BTreeMap::from([(
                "password".to_string(),
                "Password is required when creating a user".to_string(),
            )]),
        })?;
        self.http.post("users", &payload).await
    }

    /// A blank password leaves the current one unchanged
    pub async fn update(&self, id: &str, form: UserForm) -> ClientResult<UserSummary> {
        form.validate_for(FormMode::Edit)?;
        self.http
            .patch(&format!("users/{id}"), &form.into_update())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resources;
    use crate::api::mock::MockHttp;
    use serde_json::json;
    use shared::models::UserRole;

    fn user_reply() -> serde_json::Value {
        json!({"id": "u2", "email": "sam@example.com", "firstName": "Sam", "lastName": "Lee",
               "role": "USER", "isEmailVerified": false, "createdAt": "t", "updatedAt": "t"})
    }

    fn form(password: Option<&str>) -> UserForm {
        UserForm {
            first_name: "Sam".into(),
            last_name: "Lee".into(),
            email: "sam@example.com".into(),
            role: UserRole::User,
            password: password.map(str::to_string),
            is_email_verified: false,
        }
    }

    #[tokio::test]
    async fn list_sends_paging_and_search() {
        let http = MockHttp::new().reply(json!({"items": [], "total": 0, "skip": 10, "take": 10}));
        let query = UserListQuery::new(2, 10).with_search("sam");
        let list = http.users().list(&query).await.unwrap();

        assert_eq!(list.page(), 2);
        assert_eq!(
            http.calls()[0].body,
            json!({"page": 2, "pageSize": 10, "search": "sam"})
        );
    }

    #[tokio::test]
    async fn create_requires_password() {
        let http = MockHttp::new();
        let err = http.users().create(form(Some(""))).await.unwrap_err();
        let ClientError::Validation { fields } = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("password"));
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn update_omits_blank_password() {
        let http = MockHttp::new().reply(user_reply());
        http.users().update("u2", form(Some(""))).await.unwrap();

        let call = &http.calls()[0];
        assert_eq!(call.method, "PATCH");
        assert_eq!(call.path, "users/u2");
        assert!(call.body.get("password").is_none());
        assert_eq!(call.body["role"], "USER");
    }

    #[tokio::test]
    async fn stats_hits_summary_endpoint() {
        let http = MockHttp::new().reply(json!({
            "totals": {"users": 3, "activeUsers": 2, "superAdmins": 1}
        }));
        let stats = http.users().stats().await.unwrap();
        assert_eq!(stats.totals.users, 3);
        assert_eq!(http.calls()[0].path, "users/stats/summary");
    }
}
