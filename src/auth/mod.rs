//! Signed-in identity and token capability
//!
//! The auth provider itself is an external collaborator. This module only
//! tracks whether a user id is known and whether a token provider is callable
//! yet, so the sync clients can skip work instead of failing.

mod provider;

use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::Error;
use crate::sync::{read_lock, write_lock};

pub use provider::*;

/// Whether bearer tokens can be issued yet
#[derive(Clone, Default)]
pub enum TokenSource {
    Ready(Arc<dyn TokenProvider>),
    #[default]
    NotReady,
}

impl TokenSource {
    pub fn ready<P: TokenProvider + 'static>(provider: P) -> Self {
        TokenSource::Ready(Arc::new(provider))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, TokenSource::Ready(_))
    }

    /// Request a token, failing with `AuthNotReady` if no provider is set
    pub async fn token(&self) -> Result<String, Error> {
        match self {
            TokenSource::Ready(provider) => provider.token().await,
            TokenSource::NotReady => Err(Error::AuthNotReady),
        }
    }
}

impl fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Ready(_) => f.write_str("Ready"),
            TokenSource::NotReady => f.write_str("NotReady"),
        }
    }
}

/// The signed-in user as far as the sync clients are concerned
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub user_id: Option<String>,
    pub tokens: TokenSource,
}

/// What an operation may do with the current identity
#[derive(Debug, Clone)]
pub enum Credentials {
    /// No user id yet
    Anonymous,
    /// User id known, token provider not callable yet
    Pending { user_id: String },
    /// Both available
    Ready {
        user_id: String,
        tokens: TokenSource,
    },
}

/// Shared, updatable handle on the current identity.
///
/// Cloned into every sync client and poller of a scope; the presentation
/// layer writes to it as the auth provider finishes loading.
#[derive(Debug, Clone, Default)]
pub struct AuthHandle {
    identity: Arc<RwLock<Identity>>,
}

impl AuthHandle {
    /// Handle with no user and no token provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that is ready from the start
    pub fn signed_in<P: TokenProvider + 'static>(user_id: &str, provider: P) -> Self {
        let handle = Self::new();
        handle.set_user_id(Some(user_id));
        handle.set_token_source(TokenSource::ready(provider));
        handle
    }

    pub fn set_user_id(&self, user_id: Option<&str>) {
        write_lock(&self.identity).user_id = user_id.map(str::to_string);
    }

    pub fn set_token_source(&self, tokens: TokenSource) {
        write_lock(&self.identity).tokens = tokens;
    }

    /// Forget the user and the token provider
    pub fn sign_out(&self) {
        *write_lock(&self.identity) = Identity::default();
    }

    pub fn identity(&self) -> Identity {
        read_lock(&self.identity).clone()
    }

    pub fn user_id(&self) -> Option<String> {
        read_lock(&self.identity).user_id.clone()
    }

    pub fn token_source(&self) -> TokenSource {
        read_lock(&self.identity).tokens.clone()
    }

    pub fn credentials(&self) -> Credentials {
        let identity = read_lock(&self.identity);
        match (&identity.user_id, &identity.tokens) {
            (None, _) => Credentials::Anonymous,
            (Some(user_id), TokenSource::NotReady) => Credentials::Pending {
                user_id: user_id.clone(),
            },
            (Some(user_id), tokens @ TokenSource::Ready(_)) => Credentials::Ready {
                user_id: user_id.clone(),
                tokens: tokens.clone(),
            },
        }
    }

    /// True once both the user id and a token provider are present
    pub fn is_ready(&self) -> bool {
        matches!(self.credentials(), Credentials::Ready { .. })
    }
}
