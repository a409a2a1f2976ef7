use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{HeaderMap, HeaderValue, request::Parts},
};
use uuid::Uuid;

use crate::{
    error::AppError, middleware::auth::AuthUser, services::customer_service, state::AppState,
};

pub const SESSION_HEADER: &str = "x-session-token";

const MAX_SESSION_TOKEN_LEN: usize = 64;

/// Who a cart belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    AuthenticatedCustomer(Uuid),
    AnonymousSession(String),
}

impl Identity {
    pub fn new_session() -> Self {
        Identity::AnonymousSession(Uuid::new_v4().simple().to_string())
    }

    pub fn customer_id(&self) -> Option<Uuid> {
        match self {
            Identity::AuthenticatedCustomer(id) => Some(*id),
            Identity::AnonymousSession(_) => None,
        }
    }

    pub fn session_key(&self) -> Option<&str> {
        match self {
            Identity::AuthenticatedCustomer(_) => None,
            Identity::AnonymousSession(token) => Some(token),
        }
    }
}

/// Accepts opaque tokens of URL-safe characters; anything else is treated as absent.
pub fn parse_session_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    let valid = !token.is_empty()
        && token.len() <= MAX_SESSION_TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| token.to_string())
}

/// Headers that hand the session token back to an anonymous caller.
pub fn session_headers(identity: &Identity) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(token) = identity.session_key() {
        if let Ok(value) = HeaderValue::from_str(token) {
            headers.insert(SESSION_HEADER, value);
        }
    }
    headers
}

/// The resolved caller of a customer-facing endpoint.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: Option<AuthUser>,
    pub identity: Option<Identity>,
}

impl Caller {
    /// Mutations always need an identity, so a caller without one gets a new session.
    pub fn identity_or_new_session(&self) -> Identity {
        self.identity.clone().unwrap_or_else(Identity::new_session)
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user =
            <AuthUser as OptionalFromRequestParts<AppState>>::from_request_parts(parts, state)
                .await?;

        if let Some(user) = &user {
            if let Some(customer) = customer_service::find_by_user(state, user.user_id).await? {
                return Ok(Caller {
                    identity: Some(Identity::AuthenticatedCustomer(customer.id)),
                    user: Some(user.clone()),
                });
            }
        }

        let identity = parts
            .headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_session_token)
            .map(Identity::AnonymousSession);

        Ok(Caller { user, identity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_tokens_are_trimmed_and_checked() {
        assert_eq!(parse_session_token("  abc-123_x "), Some("abc-123_x".into()));
        assert_eq!(parse_session_token(""), None);
        assert_eq!(parse_session_token("has space"), None);
        assert_eq!(parse_session_token(&"a".repeat(65)), None);
    }

    #[test]
    fn new_sessions_are_distinct_and_parseable() {
        let a = Identity::new_session();
        let b = Identity::new_session();
        assert_ne!(a, b);
        let token = a.session_key().unwrap();
        assert_eq!(parse_session_token(token).as_deref(), Some(token));
    }

    #[test]
    fn only_sessions_are_echoed_back() {
        let session = Identity::AnonymousSession("tok".into());
        assert_eq!(
            session_headers(&session).get(SESSION_HEADER).unwrap(),
            "tok"
        );
        let customer = Identity::AuthenticatedCustomer(Uuid::new_v4());
        assert!(session_headers(&customer).is_empty());
    }
}
