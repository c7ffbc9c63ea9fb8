//! Authentication
//!
//! Protected routes resolve the caller through an [`Authenticator`]. The
//! bundled [`TokenAuthenticator`] maps the `x-auth-token` header to a user
//! through a fixed table taken from configuration.

use hyper::HeaderMap;
use std::collections::HashMap;

use crate::config::AuthUser;
use crate::error::ApiError;
use crate::model::{MalformedId, User, UserId};

/// Header carrying the caller's token
pub const TOKEN_HEADER: &str = "x-auth-token";

/// Resolves the authenticated user of a request, or rejects it with 401
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, headers: &HeaderMap) -> Result<UserId, ApiError>;
}

/// Static token table
#[derive(Debug, Default, Clone)]
pub struct TokenAuthenticator {
    tokens: HashMap<String, UserId>,
}

impl TokenAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from configured users
    pub fn from_config(users: &[AuthUser]) -> Result<Self, MalformedId> {
        let mut auth = Self::new();
        for user in users {
            auth.insert(user.token.clone(), user.user_id.parse()?);
        }
        Ok(auth)
    }

    pub fn insert(&mut self, token: impl Into<String>, user: UserId) {
        self.tokens.insert(token.into(), user);
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for TokenAuthenticator {
    fn authenticate(&self, headers: &HeaderMap) -> Result<UserId, ApiError> {
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("No token, authorization denied".to_string()))?;

        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| ApiError::Unauthorized("Token is not valid".to_string()))
    }
}

/// The user records described by configured auth users
pub fn configured_users(users: &[AuthUser]) -> Result<Vec<User>, MalformedId> {
    users
        .iter()
        .map(|u| {
            let mut user = User::new(u.user_id.parse()?, u.name.clone(), u.email.clone());
            user.avatar.clone_from(&u.avatar);
            Ok(user)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    fn auth_user(token: &str) -> AuthUser {
        AuthUser {
            token: token.to_string(),
            user_id: UserId::new().to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn test_known_token() {
        let user = auth_user("abc");
        let auth = TokenAuthenticator::from_config(std::slice::from_ref(&user)).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("abc"));
        let id = auth.authenticate(&headers).unwrap();
        assert_eq!(id.to_string(), user.user_id);
    }

    #[test]
    fn test_missing_token() {
        let auth = TokenAuthenticator::new();
        let err = auth.authenticate(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "No token, authorization denied"));
    }

    #[test]
    fn test_unknown_token() {
        let auth = TokenAuthenticator::from_config(&[auth_user("abc")]).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("xyz"));
        let err = auth.authenticate(&headers).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(m) if m == "Token is not valid"));
    }

    #[test]
    fn test_bad_user_id_in_config() {
        let mut user = auth_user("abc");
        user.user_id = "nope".to_string();
        assert!(TokenAuthenticator::from_config(&[user.clone()]).is_err());
        assert!(configured_users(&[user]).is_err());
    }
}
