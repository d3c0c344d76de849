//! Authenticated client facade over the XBPneus REST backend.

pub mod refresh;

pub use refresh::RefreshMetrics;

// crates.io
use http::{
	HeaderMap, Method, Request,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	backend::BackendDescriptor,
	client::refresh::RefreshGate,
	error::ConfigError,
	nav::{LoginNavigator, NoopNavigator},
	store::TokenStore,
	transport::{HttpRequest, HttpResponse, Transport},
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestTransport;

/// Issues bearer-authenticated requests against one XBPneus backend.
///
/// The client owns the transport, token store, backend descriptor, and navigator references so
/// request flows can focus on the recovery protocol: attach the stored access token, and on the
/// first 401 run (or join) a single shared refresh exchange before replaying. Cloning is cheap;
/// clones share the store, the refresh coordination state, and the metrics.
#[derive(Clone)]
pub struct ApiClient {
	/// Transport used for every outbound request, including the refresh exchange.
	pub transport: Arc<dyn Transport>,
	/// Token store consulted before every request and rewritten by refresh outcomes.
	pub store: Arc<dyn TokenStore>,
	/// Backend descriptor naming the origin and its well-known paths.
	pub descriptor: BackendDescriptor,
	/// Navigator notified when the session ends.
	pub navigator: Arc<dyn LoginNavigator>,
	/// Shared counters for refresh exchange outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	gate: Arc<RefreshGate>,
}
impl ApiClient {
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		descriptor: BackendDescriptor,
		store: Arc<dyn TokenStore>,
		transport: Arc<dyn Transport>,
	) -> Self {
		Self {
			transport,
			store,
			descriptor,
			navigator: Arc::new(NoopNavigator),
			refresh_metrics: Default::default(),
			gate: Default::default(),
		}
	}

	/// Sets or replaces the navigator notified on terminal auth failures.
	pub fn with_navigator(mut self, navigator: Arc<dyn LoginNavigator>) -> Self {
		self.navigator = navigator;

		self
	}

	/// Sends `method` to `path` with an optional JSON body.
	///
	/// The path is joined onto the descriptor's base URL. Unless the path is auth-exempt, the
	/// stored access token (when present) travels as `Authorization: Bearer <token>`; a first
	/// 401 answer is recovered transparently via the shared refresh exchange, and every other
	/// status is returned to the caller untouched.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		body: Option<&serde_json::Value>,
	) -> Result<HttpResponse> {
		self.request_with_headers(method, path, body, HeaderMap::new()).await
	}

	/// Like [`request`](ApiClient::request), with caller-supplied headers.
	///
	/// The headers travel on the initial dispatch and on the replay after a refresh. A caller's
	/// `Content-Type` wins over the JSON default; the bearer credential always wins over a
	/// caller-supplied `Authorization`.
	pub async fn request_with_headers(
		&self,
		method: Method,
		path: &str,
		body: Option<&serde_json::Value>,
		headers: HeaderMap,
	) -> Result<HttpResponse> {
		let url = self.descriptor.endpoint(path)?;
		let exempt = self.descriptor.is_auth_exempt(path);
		let payload = match body {
			Some(value) => serde_json::to_vec(value).map_err(ConfigError::from)?,
			None => Vec::new(),
		};

		self.send_with_auth(method, url, exempt, payload, headers).await
	}

	/// Fetches a resource list or detail view.
	pub async fn get(&self, path: &str) -> Result<HttpResponse> {
		self.request(Method::GET, path, None).await
	}

	/// Creates a resource from a JSON payload.
	pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
		self.request(Method::POST, path, Some(body)).await
	}

	/// Replaces a resource with a JSON payload.
	pub async fn put_json(&self, path: &str, body: &serde_json::Value) -> Result<HttpResponse> {
		self.request(Method::PUT, path, Some(body)).await
	}

	/// Deletes a resource.
	pub async fn delete(&self, path: &str) -> Result<HttpResponse> {
		self.request(Method::DELETE, path, None).await
	}

	pub(crate) fn build_request(
		&self,
		method: &Method,
		url: &Url,
		headers: &HeaderMap,
		body: &[u8],
		bearer: Option<&TokenSecret>,
	) -> Result<HttpRequest, ConfigError> {
		let mut request = Request::builder()
			.method(method.clone())
			.uri(url.as_str())
			.body(body.to_vec())
			.map_err(ConfigError::from)?;
		let map = request.headers_mut();

		*map = headers.clone();

		if !body.is_empty() && !map.contains_key(CONTENT_TYPE) {
			map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}
		if let Some(token) = bearer {
			let value = HeaderValue::from_str(&token.bearer())
				.map_err(|source| ConfigError::InvalidBearerToken { source })?;

			map.insert(AUTHORIZATION, value);
		}

		Ok(request)
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient {
	/// Creates a new client for the provided descriptor and token store.
	///
	/// The client provisions its own reqwest-backed transport so callers do not need to pass
	/// HTTP handles explicitly. Use [`ApiClient::with_navigator`] to attach a navigator when the
	/// embedding shell wants to react to session expiry.
	pub fn new(descriptor: BackendDescriptor, store: Arc<dyn TokenStore>) -> Self {
		Self::with_transport(descriptor, store, Arc::new(ReqwestTransport::default()))
	}
}
impl Debug for ApiClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient").field("descriptor", &self.descriptor).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client() -> ApiClient {
		struct UnreachableTransport;
		impl Transport for UnreachableTransport {
			fn execute(&self, _request: HttpRequest) -> crate::transport::TransportFuture<'_> {
				unreachable!("Request construction tests never dispatch.");
			}
		}

		let base = Url::parse("https://fleet.xbpneus.com.br").expect("Base fixture should parse.");
		let store = Arc::new(crate::store::MemoryStore::default());

		ApiClient::with_transport(
			BackendDescriptor::new(base),
			store,
			Arc::new(UnreachableTransport),
		)
	}

	#[test]
	fn bearer_and_content_type_are_attached_when_present() {
		let client = client();
		let url = client.descriptor.endpoint("/api/vehicles/").expect("Path should join.");
		let token = TokenSecret::new("A1");
		let request = client
			.build_request(&Method::POST, &url, &HeaderMap::new(), b"{}", Some(&token))
			.expect("Request should build.");

		assert_eq!(request.headers()[AUTHORIZATION], "Bearer A1");
		assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
	}

	#[test]
	fn anonymous_bodyless_requests_carry_no_extra_headers() {
		let client = client();
		let url = client.descriptor.endpoint("/api/login/").expect("Path should join.");
		let request = client
			.build_request(&Method::GET, &url, &HeaderMap::new(), b"", None)
			.expect("Request should build.");

		assert!(request.headers().get(AUTHORIZATION).is_none());
		assert!(request.headers().get(CONTENT_TYPE).is_none());
	}

	#[test]
	fn caller_headers_survive_but_never_override_the_bearer() {
		let client = client();
		let url = client.descriptor.endpoint("/api/vehicles/").expect("Path should join.");
		let token = TokenSecret::new("A1");
		let mut headers = HeaderMap::new();

		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer stale"));
		headers.insert("x-request-id", HeaderValue::from_static("req-7"));

		let request = client
			.build_request(&Method::GET, &url, &headers, b"", Some(&token))
			.expect("Request should build.");

		assert_eq!(request.headers()[AUTHORIZATION], "Bearer A1");
		assert_eq!(request.headers()["x-request-id"], "req-7");
	}
}
