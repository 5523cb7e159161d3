use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

pub type GatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;

/// Failures reported by a generative-text backend
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("model backend rate limited the request: {0}")]
    RateLimited(String),
    #[error("model backend rejected the request: {0}")]
    InvalidRequest(String),
}

/// A generative-text backend: one prompt in, one raw text response out.
///
/// Calls are single-shot; retry and timeout policy belong to the
/// implementation.
pub trait ModelGateway: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> GatewayFuture<'a>;
}
