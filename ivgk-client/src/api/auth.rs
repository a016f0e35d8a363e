//! Authentication: login, registration, token refresh and logout

use crate::session::Session;
use crate::{ClientError, ClientResult, HttpClient};
use serde::de::IgnoredAny;
use shared::forms::{LoginForm, RegisterForm};
use shared::models::{
    AuthUser, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
};
use validator::Validate;

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";
pub const REGISTER_FAILED_MESSAGE: &str = "Unable to create your account. Please try again.";

pub struct AuthApi<'a, C: HttpClient> {
    http: &'a C,
}

impl<'a, C: HttpClient> AuthApi<'a, C> {
    pub fn new(http: &'a C) -> Self {
        Self { http }
    }

    /// Sign in and persist the session
    pub async fn login(&self, form: LoginForm) -> ClientResult<LoginResponse> {
        form.validate()?;
        let request = LoginRequest::from(form);
        let response: LoginResponse = self.http.post("auth/login", &request).await?;
        self.store(&response)?;
        tracing::info!(user_id = %response.user.id, role = response.user.role.as_str(), "Signed in");
        Ok(response)
    }

    /// Create an account and persist the session
    pub async fn register(&self, form: RegisterForm) -> ClientResult<LoginResponse> {
        form.validate()?;
        let request = RegisterRequest::from(form);
        let response: LoginResponse = self.http.post("auth/register", &request).await?;
        self.store(&response)?;
        tracing::info!(user_id = %response.user.id, "Registered");
        Ok(response)
    }

    /// Exchange the stored refresh token for a new access token
    pub async fn refresh(&self) -> ClientResult<String> {
        let refresh_token = self
            .http
            .session()
            .load()
            .refresh_token
            .ok_or_else(|| ClientError::Session("no refresh token stored".into()))?;
        let response: RefreshResponse = self
            .http
            .post("auth/refresh", &RefreshRequest { refresh_token })
            .await?;
        self.http.session().update_access_token(&response.access_token)?;
        Ok(response.access_token)
    }

    /// Revoke the refresh token; the local session is cleared even when the
    /// backend call fails
    pub async fn logout(&self) {
        let session = self.http.session();
        if let Some(refresh_token) = session.load().refresh_token {
            let result: ClientResult<IgnoredAny> = self
                .http
                .post("auth/logout", &RefreshRequest { refresh_token })
                .await;
            if let Err(e) = result {
                tracing::warn!(error = %e, "Logout request failed");
            }
        }
        session.clear();
        tracing::info!("Signed out");
    }

    /// Signed-in user, when the session holds one
    pub fn current_user(&self) -> Option<AuthUser> {
        self.http.session().load().user
    }

    fn store(&self, response: &LoginResponse) -> ClientResult<()> {
        self.http.session().save(&Session::new(
            response.tokens.clone(),
            Some(response.user.clone()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resources;
    use crate::api::mock::MockHttp;
    use crate::session::SessionStore;
    use serde_json::json;
    use shared::models::{AuthTokens, UserRole};

    fn login_reply() -> serde_json::Value {
        json!({
            "accessToken": "a1",
            "refreshToken": "r1",
            "user": {"id": "u1", "email": "jane@example.com", "firstName": "Jane",
                     "lastName": "Doe", "role": "ADMIN", "isEmailVerified": true}
        })
    }

    #[tokio::test]
    async fn login_saves_session() {
        let http = MockHttp::new().reply(login_reply());
        let response = http
            .auth()
            .login(LoginForm {
                email: "jane@example.com".into(),
                password: "password1".into(),
            })
            .await
            .unwrap();

        assert_eq!(response.user.role, UserRole::Admin);
        let calls = http.calls();
        assert_eq!(calls[0].path, "auth/login");
        assert_eq!(calls[0].body["email"], "jane@example.com");

        let session = http.session.load();
        assert!(session.is_authenticated());
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn invalid_login_form_is_not_sent() {
        let http = MockHttp::new();
        let err = http
            .auth()
            .login(LoginForm {
                email: "not-an-email".into(),
                password: "short".into(),
            })
            .await
            .unwrap_err();

        match err {
            ClientError::Validation { fields } => {
                assert!(fields.contains_key("email"));
                assert!(fields.contains_key("password"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn register_mismatch_blocks_submission() {
        let http = MockHttp::new();
        let err = http
            .auth()
            .register(RegisterForm {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                email: "jane@example.com".into(),
                password: "Secret123".into(),
                confirm_password: "Secret124".into(),
            })
            .await
            .unwrap_err();

        let ClientError::Validation { fields } = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["confirm_password"], "Passwords must match");
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_login_keeps_server_message() {
        let http = MockHttp::new().fail(401, None);
        let err = http
            .auth()
            .login(LoginForm {
                email: "jane@example.com".into(),
                password: "password1".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message_or(LOGIN_FAILED_MESSAGE), LOGIN_FAILED_MESSAGE);
        assert!(!http.session.load().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_even_when_request_fails() {
        let http = MockHttp::new().fail(500, None);
        http.session
            .save(&Session::new(
                AuthTokens {
                    access_token: "a".into(),
                    refresh_token: "r".into(),
                },
                None,
            ))
            .unwrap();

        http.auth().logout().await;

        let calls = http.calls();
        assert_eq!(calls[0].path, "auth/logout");
        assert_eq!(calls[0].body, json!({"refreshToken": "r"}));
        assert_eq!(http.session.load(), Session::default());
    }

    #[tokio::test]
    async fn logout_without_refresh_token_skips_request() {
        let http = MockHttp::new();
        http.auth().logout().await;
        assert!(http.calls().is_empty());
    }

    #[tokio::test]
    async fn refresh_updates_access_token() {
        let http = MockHttp::new().reply(json!({"accessToken": "a2"}));
        http.session
            .save(&Session::new(
                AuthTokens {
                    access_token: "a1".into(),
                    refresh_token: "r1".into(),
                },
                None,
            ))
            .unwrap();

        assert_eq!(http.auth().refresh().await.unwrap(), "a2");
        assert_eq!(http.session.load().access_token.as_deref(), Some("a2"));
        assert_eq!(http.calls()[0].body, json!({"refreshToken": "r1"}));
    }
}
