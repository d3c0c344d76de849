//! Transport primitives for XBPneus API calls.
//!
//! The module exposes [`Transport`] so downstream code can swap the HTTP stack without touching
//! the client's session logic. The trait is the crate's only coupling to an HTTP
//! implementation; everything above it speaks plain [`http`] request/response types.

// std
use std::ops::Deref;
#[cfg(feature = "reqwest")] use std::time::Duration;
// crates.io
use http::{Request, Response};
// self
use crate::{_prelude::*, error::TransportError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Request type handed to [`Transport`] implementations.
pub type HttpRequest = Request<Vec<u8>>;
/// Response type produced by [`Transport`] implementations.
pub type HttpResponse = Response<Vec<u8>>;
/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks capable of executing XBPneus API requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared (behind
/// `Arc<dyn Transport>`) by every clone of the client, and the returned futures must be `Send`
/// so request flows can hop executors. A transport only reports [`TransportError`] for failures
/// that prevented a response from existing; HTTP error statuses travel back inside the
/// [`HttpResponse`] untouched.
pub trait Transport
where
	Self: 'static + Send + Sync,
{
	/// Executes a single HTTP request and resolves with the full response body.
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The wrapper buffers response bodies eagerly; the dashboard's payloads are small resource
/// lists and form echoes, never streams.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a transport whose requests are bounded by `timeout`.
	///
	/// The refresh exchange has no watchdog of its own; a hung refresh stalls every queued
	/// request, so callers that care should bound the transport here.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.timeout(timeout)
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Transport for ReqwestTransport {
	fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(async move {
			let request = request.try_into().map_err(TransportError::from)?;
			let response = client.execute(request).await.map_err(TransportError::from)?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await.map_err(TransportError::from)?.to_vec();
			let mut response_new = HttpResponse::new(body);

			*response_new.status_mut() = status;
			*response_new.headers_mut() = headers;

			Ok(response_new)
		})
	}
}
