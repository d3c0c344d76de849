//! Storage contracts and built-in store implementations for session tokens.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::{TokenPair, TokenSecret}};

/// Fixed storage key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Fixed storage key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for session tokens.
///
/// The store is an opaque key-value surface over the two fixed keys [`ACCESS_TOKEN_KEY`] and
/// [`REFRESH_TOKEN_KEY`]. The client reads the access slot before every request, rewrites it
/// when a refresh succeeds, and empties the store when the session ends; the login surface
/// (outside this crate) writes the initial pair.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Fetches the persisted access token, if present.
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Fetches the persisted refresh token, if present.
	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>>;

	/// Persists a replacement access token, leaving the refresh slot untouched.
	fn store_access_token(&self, token: TokenSecret) -> StoreFuture<'_, ()>;

	/// Persists a full token pair, replacing both slots.
	fn store_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()>;

	/// Removes the access token, leaving the refresh slot untouched.
	fn remove_access_token(&self) -> StoreFuture<'_, ()>;

	/// Removes both tokens. Idempotent: clearing an empty store succeeds.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
