//! Tower integration.
//!
//! [`ValidationLayer`] rejects requests whose body or query fails the
//! configured schemas before they reach the inner service.

use crate::render::RenderedError;
use crate::request::RequestValidator;
use futures_util::future::{self, BoxFuture, FutureExt, TryFutureExt};
use serde_json::Value;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Error returned by [`ValidationService`].
#[derive(Debug, thiserror::Error)]
pub enum ValidationServiceError<E> {
    /// The request failed validation.
    #[error("request rejected: {0}")]
    Rejected(#[source] RenderedError),
    /// The inner service failed.
    #[error(transparent)]
    Inner(E),
}

impl<E> ValidationServiceError<E> {
    /// The rendered error, if the request was rejected.
    pub fn rejection(&self) -> Option<&RenderedError> {
        match self {
            ValidationServiceError::Rejected(error) => Some(error),
            ValidationServiceError::Inner(_) => None,
        }
    }
}

/// Layer that applies a [`RequestValidator`].
#[derive(Debug, Clone)]
pub struct ValidationLayer {
    validator: Arc<RequestValidator>,
}

impl ValidationLayer {
    pub fn new(validator: RequestValidator) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }
}

impl<S> Layer<S> for ValidationLayer {
    type Service = ValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ValidationService {
            inner,
            validator: self.validator.clone(),
        }
    }
}

/// Service produced by [`ValidationLayer`].
#[derive(Debug, Clone)]
pub struct ValidationService<S> {
    inner: S,
    validator: Arc<RequestValidator>,
}

impl<S> Service<http::Request<Value>> for ValidationService<S>
where
    S: Service<http::Request<Value>>,
    S::Future: Send + 'static,
    S::Response: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = S::Response;
    type Error = ValidationServiceError<S::Error>;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner
            .poll_ready(cx)
            .map_err(ValidationServiceError::Inner)
    }

    fn call(&mut self, req: http::Request<Value>) -> Self::Future {
        if let Err(error) = self.validator.validate(&req) {
            return future::ready(Err(ValidationServiceError::Rejected(error))).boxed();
        }
        self.inner
            .call(req)
            .map_err(ValidationServiceError::Inner)
            .boxed()
    }
}
