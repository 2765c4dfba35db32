//! Handler trait for processing requests.
//!
//! ```rust
//! use trellis_http::{Handler, Request, Response};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> trellis_core::exception::Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use trellis_core::exception::Result;

use crate::{Request, Response};

/// Core abstraction implemented by every routed endpoint.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles a request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

/// Lets `Arc<dyn Handler>` be used wherever a handler is expected.
#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Adapts an async closure into a [`Handler`].
pub struct FnHandler<F> {
	func: F,
}

impl<F> FnHandler<F> {
	pub fn new(func: F) -> Self {
		Self { func }
	}
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	async fn handle(&self, request: Request) -> Result<Response> {
		(self.func)(request).await
	}
}

/// Wraps an async function into a shareable handler.
///
/// # Examples
///
/// ```
/// use trellis_http::{Request, Response, handler_fn};
///
/// let handler = handler_fn(|_req: Request| async { Ok(Response::ok()) });
/// # let _ = handler;
/// ```
pub fn handler_fn<F, Fut>(func: F) -> Arc<dyn Handler>
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Arc::new(FnHandler::new(func))
}
