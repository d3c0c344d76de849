//! Client-level error types shared across the transport, store, and session layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// HTTP error statuses other than a recoverable 401 are not errors at this level; the client
/// hands the response back to the caller untouched. [`Error`] covers the failures that prevent a
/// response from being produced at all, plus the terminal end of a session.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The refresh exchange could not restore the session; the user must sign in again.
	///
	/// By the time this error surfaces the client has already cleared the stored tokens and
	/// signaled the login redirect. Callers should treat it as "session ended", not retry.
	#[error("The session has ended and the user must sign in again.")]
	SessionExpired {
		/// Shared cause, broadcast verbatim to every request queued behind the failed refresh.
		#[source]
		source: Arc<RefreshError>,
	},
}
impl From<RefreshError> for Error {
	fn from(e: RefreshError) -> Self {
		Self::SessionExpired { source: Arc::new(e) }
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] http::Error),
	/// Base URL could not be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL parses but cannot serve as an origin for request paths.
	#[error("Base URL `{base_url}` cannot serve as an origin.")]
	BaseUrlNotAnOrigin {
		/// Offending URL string.
		base_url: String,
	},
	/// Request path does not join onto the base URL.
	#[error("Request path `{path}` produces an invalid URL.")]
	InvalidRequestPath {
		/// Offending path string.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Stored access token contains bytes that cannot form a header value.
	#[error("Stored access token is not a valid header value.")]
	InvalidBearerToken {
		/// Underlying header validation failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
	/// JSON request body could not be serialized.
	#[error("Request body could not be serialized.")]
	BodySerialize(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Causes of a failed token refresh exchange.
///
/// One refresh failure ends the session for every request queued behind it, so the value is
/// shared via [`Arc`] inside [`Error::SessionExpired`] rather than cloned.
#[derive(Debug, ThisError)]
pub enum RefreshError {
	/// No refresh token exists in the store; the exchange was never attempted.
	#[error("No refresh token is available in the token store.")]
	MissingRefreshToken,
	/// Refresh endpoint answered with a non-success status.
	#[error("Token refresh endpoint rejected the exchange with HTTP {status}.")]
	Rejected {
		/// HTTP status code returned by the refresh endpoint.
		status: u16,
	},
	/// Refresh endpoint responded with malformed JSON that could not be parsed.
	#[error("Token refresh endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the malformed response.
		status: u16,
	},
	/// Refresh request never reached the endpoint.
	#[error("Token refresh request could not reach the endpoint.")]
	Transport(#[from] TransportError),
	/// Token store failed while reading or rewriting tokens during the exchange.
	#[error("Token store failed during the refresh exchange.")]
	Storage(#[from] crate::store::StoreError),
	/// Local configuration prevented the exchange from being issued.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The refresh attempt unwound before settling its outcome.
	#[error("Refresh attempt was abandoned before it settled.")]
	Interrupted,
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the XBPneus API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request exceeded the transport's deadline.
	#[error("Request timed out while calling the XBPneus API.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			return Self::Timeout;
		}

		Self::network(e)
	}
}
