//! Client-side session restore.
//!
//! On start-up a client holding an access token and a refresh token first
//! verifies the access token; when that fails it exchanges the refresh token
//! for a new access token and verifies that one. If both paths fail every
//! stored credential is dropped.
//!
//! [`guard`] then decides whether the restored user may open a page.

use derive_more::Display;
use log::{error, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

#[derive(Debug, Display)]
pub enum SessionError {
    #[display(fmt = "request failed: {}", _0)]
    Transport(reqwest::Error),

    #[display(fmt = "server answered with status {}", _0)]
    Status(u16),
}

impl std::error::Error for SessionError {}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::Transport(err)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The stored access token was accepted.
    Verified,
    /// A new access token was obtained and accepted.
    Refreshed,
    /// Both checks failed; credentials were removed.
    Cleared,
    /// Nothing was stored, nothing was done.
    Anonymous,
}

/// Where the client keeps its tokens and the signed-in user.
pub trait CredentialStore {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    fn set_access_token(&mut self, token: String);
    fn set_user(&mut self, user: SessionUser);
    fn clear(&mut self);
}

#[allow(async_fn_in_trait)]
pub trait AuthApi {
    /// `Ok(None)` when the server rejects the token.
    async fn verify(&self, token: &str) -> Result<Option<SessionUser>, SessionError>;
    /// `Ok(None)` when the server gives no new token.
    async fn refresh(&self, refresh_token: &str) -> Result<Option<String>, SessionError>;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryCredentialStore {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<SessionUser>,
}

impl MemoryCredentialStore {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token,
            user: None,
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn access_token(&self) -> Option<String> {
        self.access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.refresh_token.clone()
    }

    fn set_access_token(&mut self, token: String) {
        self.access_token = Some(token);
    }

    fn set_user(&mut self, user: SessionUser) {
        self.user = Some(user);
    }

    fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
        self.user = None;
    }
}

async fn verify_user<A: AuthApi, S: CredentialStore>(api: &A, store: &mut S, token: &str) -> bool {
    match api.verify(token).await {
        Ok(Some(user)) => {
            store.set_user(user);
            true
        }
        Ok(None) => false,
        Err(err) => {
            warn!("token verification failed: {}", err);
            false
        }
    }
}

async fn try_refresh<A: AuthApi, S: CredentialStore>(api: &A, store: &mut S, refresh_token: &str) -> bool {
    match api.refresh(refresh_token).await {
        Ok(Some(new_token)) => {
            store.set_access_token(new_token.clone());
            verify_user(api, store, &new_token).await
        }
        Ok(None) => false,
        Err(err) => {
            error!("token refresh failed: {}", err);
            false
        }
    }
}

pub async fn restore<A: AuthApi, S: CredentialStore>(api: &A, store: &mut S) -> SessionOutcome {
    if let Some(token) = store.access_token() {
        if verify_user(api, store, &token).await {
            return SessionOutcome::Verified;
        }
    }
    match store.refresh_token() {
        Some(refresh_token) => {
            if try_refresh(api, store, &refresh_token).await {
                SessionOutcome::Refreshed
            } else {
                store.clear();
                SessionOutcome::Cleared
            }
        }
        None => SessionOutcome::Anonymous,
    }
}

pub const LOGIN_PATH: &str = "/login";
pub const FORBIDDEN_PATH: &str = "/403";

/// What a client should do before rendering a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Go to the login page; the value is its full location, carrying the
    /// requested path in `redirect`.
    Login(String),
    Forbidden,
}

impl RouteDecision {
    /// Where to navigate instead, `None` when the page may be shown.
    pub fn redirect(&self) -> Option<&str> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::Login(location) => Some(location),
            RouteDecision::Forbidden => Some(FORBIDDEN_PATH),
        }
    }
}

/// Page-level access check. An empty `allowed_roles` admits every signed-in
/// user.
pub fn guard(user: Option<&SessionUser>, allowed_roles: &[Role], full_path: &str) -> RouteDecision {
    let Some(user) = user else {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", full_path)
            .finish();
        return RouteDecision::Login(format!("{LOGIN_PATH}?{query}"));
    };
    if !allowed_roles.is_empty() && !allowed_roles.contains(&user.role) {
        return RouteDecision::Forbidden;
    }
    RouteDecision::Allow
}

#[derive(Deserialize)]
struct VerifyResponse {
    status: String,
    user: Option<SessionUser>,
}

#[derive(Deserialize)]
struct RefreshResponse {
    token: Option<String>,
}

/// [`AuthApi`] over this service's HTTP endpoints.
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl AuthApi for HttpAuthApi {
    async fn verify(&self, token: &str) -> Result<Option<SessionUser>, SessionError> {
        let res = self
            .client
            .post(format!("{}/api/auth/verify-token", self.base_url))
            .json(&serde_json::json!({ "token": token }))
            .send()
            .await?;
        let status = res.status();
        if status.is_client_error() {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SessionError::Status(status.as_u16()));
        }
        let body: VerifyResponse = res.json().await?;
        Ok(body.user.filter(|_| body.status == "success"))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Option<String>, SessionError> {
        let res = self
            .client
            .post(format!("{}/api/auth/refresh-token", self.base_url))
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;
        let status = res.status();
        if status.is_client_error() {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SessionError::Status(status.as_u16()));
        }
        let body: RefreshResponse = res.json().await?;
        Ok(body.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct FakeApi {
        valid_token: Option<&'static str>,
        refreshed_token: Option<&'static str>,
        refresh_fails: bool,
        calls: RefCell<Vec<String>>,
    }

    impl FakeApi {
        fn new(valid_token: Option<&'static str>, refreshed_token: Option<&'static str>) -> Self {
            Self {
                valid_token,
                refreshed_token,
                refresh_fails: false,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    fn user() -> SessionUser {
        SessionUser {
            id: Uuid::nil(),
            email: "ann@corp.io".to_string(),
            full_name: "Ann Smith".to_string(),
            role: Role::Employee,
        }
    }

    impl AuthApi for FakeApi {
        async fn verify(&self, token: &str) -> Result<Option<SessionUser>, SessionError> {
            self.calls.borrow_mut().push(format!("verify:{token}"));
            Ok((self.valid_token == Some(token)).then(user))
        }

        async fn refresh(&self, refresh_token: &str) -> Result<Option<String>, SessionError> {
            self.calls.borrow_mut().push(format!("refresh:{refresh_token}"));
            if self.refresh_fails {
                return Err(SessionError::Status(500));
            }
            Ok(self.refreshed_token.map(str::to_string))
        }
    }

    #[test]
    fn anonymous_visitor_is_sent_to_login_with_return_path() {
        let decision = guard(None, &[], "/events/42?tab=participants");
        assert_eq!(
            decision,
            RouteDecision::Login("/login?redirect=%2Fevents%2F42%3Ftab%3Dparticipants".to_string())
        );
        assert_eq!(decision.redirect(), Some("/login?redirect=%2Fevents%2F42%3Ftab%3Dparticipants"));
    }

    #[test]
    fn role_outside_the_allowed_list_is_forbidden() {
        let employee = user();
        let decision = guard(Some(&employee), &[Role::Admin, Role::Manager], "/news/create");
        assert_eq!(decision, RouteDecision::Forbidden);
        assert_eq!(decision.redirect(), Some("/403"));
    }

    #[test]
    fn signed_in_user_passes_open_and_matching_pages() {
        let employee = user();
        assert_eq!(guard(Some(&employee), &[], "/events"), RouteDecision::Allow);
        assert_eq!(guard(Some(&employee), &[Role::Employee], "/events"), RouteDecision::Allow);
        assert_eq!(RouteDecision::Allow.redirect(), None);
    }

    #[actix_rt::test]
    async fn restored_session_opens_guarded_page() {
        let api = FakeApi::new(Some("access"), None);
        let mut store = MemoryCredentialStore::new(Some("access".into()), None);
        restore(&api, &mut store).await;
        assert_eq!(guard(store.user.as_ref(), &[Role::Employee], "/profile"), RouteDecision::Allow);
    }

    #[actix_rt::test]
    async fn valid_access_token_is_enough() {
        let api = FakeApi::new(Some("access"), None);
        let mut store = MemoryCredentialStore::new(Some("access".into()), Some("refresh".into()));
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Verified);
        assert_eq!(store.user, Some(user()));
        assert_eq!(*api.calls.borrow(), vec!["verify:access".to_string()]);
    }

    #[actix_rt::test]
    async fn expired_access_token_is_refreshed() {
        let api = FakeApi::new(Some("fresh"), Some("fresh"));
        let mut store = MemoryCredentialStore::new(Some("stale".into()), Some("refresh".into()));
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Refreshed);
        assert_eq!(store.access_token.as_deref(), Some("fresh"));
        assert_eq!(store.refresh_token.as_deref(), Some("refresh"));
        assert_eq!(
            *api.calls.borrow(),
            vec!["verify:stale".to_string(), "refresh:refresh".to_string(), "verify:fresh".to_string()]
        );
    }

    #[actix_rt::test]
    async fn everything_is_cleared_when_refresh_fails() {
        let mut api = FakeApi::new(None, None);
        api.refresh_fails = true;
        let mut store = MemoryCredentialStore::new(Some("stale".into()), Some("refresh".into()));
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Cleared);
        assert_eq!(store, MemoryCredentialStore::default());
    }

    #[actix_rt::test]
    async fn refreshed_token_must_verify_too() {
        let api = FakeApi::new(None, Some("also-bad"));
        let mut store = MemoryCredentialStore::new(None, Some("refresh".into()));
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Cleared);
        assert_eq!(store.access_token, None);
    }

    #[actix_rt::test]
    async fn nothing_stored_means_anonymous() {
        let api = FakeApi::new(None, None);
        let mut store = MemoryCredentialStore::default();
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Anonymous);
        assert!(api.calls.borrow().is_empty());
    }

    #[actix_rt::test]
    async fn rejected_access_token_without_refresh_token_is_kept() {
        let api = FakeApi::new(None, None);
        let mut store = MemoryCredentialStore::new(Some("stale".into()), None);
        assert_eq!(restore(&api, &mut store).await, SessionOutcome::Anonymous);
        assert_eq!(store.access_token.as_deref(), Some("stale"));
    }
}
