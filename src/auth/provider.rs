//! Bearer token providers

use async_trait::async_trait;
use std::future::Future;

use crate::error::Error;

/// Issues a bearer token for a single request.
///
/// Tokens are requested just before each call and never cached by the client.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String, Error>;
}

/// A provider that always hands out the same token
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn token(&self) -> Result<String, Error> {
        if self.0.is_empty() {
            return Err(Error::auth("Empty token"));
        }
        Ok(self.0.clone())
    }
}

/// A provider backed by an async closure, e.g. an auth SDK's `getToken`
pub struct FnToken<F> {
    f: F,
}

impl<F> FnToken<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> TokenProvider for FnToken<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, Error>> + Send + 'static,
{
    async fn token(&self) -> Result<String, Error> {
        (self.f)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn static_token_returns_value() {
        let provider = StaticToken::new("abc");
        assert_eq!(provider.token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn empty_static_token_is_an_auth_error() {
        let provider = StaticToken::new("");
        assert!(matches!(provider.token().await, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn fn_token_is_called_per_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let provider = FnToken::new(move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(format!("token-{}", n)) }
        });

        assert_eq!(provider.token().await.unwrap(), "token-0");
        assert_eq!(provider.token().await.unwrap(), "token-1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
