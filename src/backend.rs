//! Backend descriptor naming where the XBPneus API lives and which paths bypass auth.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted for the API origin.
pub const BASE_URL_ENV: &str = "XBPNEUS_API_URL";
/// Fallback origin used when [`BASE_URL_ENV`] is unset (the local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Path of the token refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/api/token/refresh/";
/// Path of the login view users are sent to when the session ends.
pub const LOGIN_PATH: &str = "/login";

const AUTH_EXEMPT_SEGMENTS: [&str; 2] = ["/login/", "/register/"];

/// Describes the XBPneus backend a client talks to.
///
/// A request path containing any of the auth-exempt segments never carries a bearer credential,
/// mirroring how the dashboard keeps its sign-in and registration calls anonymous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendDescriptor {
	/// Origin every request path is joined against.
	pub base_url: Url,
	/// Refresh endpoint path.
	pub refresh_path: String,
	/// Login view path.
	pub login_path: String,
	auth_exempt: Vec<String>,
}
impl BackendDescriptor {
	/// Creates a descriptor for the provided origin with the well-known XBPneus paths.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			refresh_path: REFRESH_PATH.into(),
			login_path: LOGIN_PATH.into(),
			auth_exempt: AUTH_EXEMPT_SEGMENTS.iter().map(|s| (*s).to_owned()).collect(),
		}
	}

	/// Builds a descriptor from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self, ConfigError> {
		let raw = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
		let base_url =
			Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::BaseUrlNotAnOrigin { base_url: raw });
		}

		Ok(Self::new(base_url))
	}

	/// Overrides the refresh endpoint path.
	pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
		self.refresh_path = path.into();

		self
	}

	/// Overrides the login view path.
	pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Replaces the auth-exempt path segments.
	pub fn with_auth_exempt(mut self, segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.auth_exempt = segments.into_iter().map(Into::into).collect();

		self
	}

	/// Returns `true` when requests to `path` must not carry a bearer credential.
	pub fn is_auth_exempt(&self, path: &str) -> bool {
		self.auth_exempt.iter().any(|segment| path.contains(segment.as_str()))
	}

	/// Joins a request path onto the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(path)
			.map_err(|source| ConfigError::InvalidRequestPath { path: path.to_owned(), source })
	}

	/// Absolute URL of the refresh endpoint.
	pub fn refresh_endpoint(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.refresh_path)
	}

	/// Absolute URL of the login view.
	pub fn login_url(&self) -> Result<Url, ConfigError> {
		self.endpoint(&self.login_path)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn descriptor() -> BackendDescriptor {
		let base =
			Url::parse("https://fleet.xbpneus.com.br").expect("Base URL fixture should parse.");

		BackendDescriptor::new(base)
	}

	#[test]
	fn well_known_paths_resolve_against_the_base() {
		let descriptor = descriptor();

		assert_eq!(
			descriptor.refresh_endpoint().expect("Refresh endpoint should join.").as_str(),
			"https://fleet.xbpneus.com.br/api/token/refresh/",
		);
		assert_eq!(
			descriptor.login_url().expect("Login URL should join.").as_str(),
			"https://fleet.xbpneus.com.br/login",
		);
	}

	#[test]
	fn auth_exempt_matches_path_segments_anywhere() {
		let descriptor = descriptor();

		assert!(descriptor.is_auth_exempt("/api/login/"));
		assert!(descriptor.is_auth_exempt("/api/register/driver"));
		assert!(!descriptor.is_auth_exempt("/api/vehicles/"));
		assert!(!descriptor.is_auth_exempt("/api/loginaudit"));
	}

	#[test]
	fn overrides_replace_defaults() {
		let descriptor = descriptor()
			.with_refresh_path("/auth/renew/")
			.with_login_path("/signin")
			.with_auth_exempt(["/signin/"]);

		assert_eq!(descriptor.refresh_path, "/auth/renew/");
		assert_eq!(descriptor.login_path, "/signin");
		assert!(descriptor.is_auth_exempt("/api/signin/"));
		assert!(!descriptor.is_auth_exempt("/api/login/"));
	}
}
