//! Authenticated HTTP client for the XBPneus fleet API - bearer sessions, single-flight token
//! refresh, and fail-closed logout in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod backend;
pub mod client;
pub mod error;
pub mod nav;
pub mod obs;
pub mod store;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TokenPair,
		backend::BackendDescriptor,
		client::ApiClient,
		store::{MemoryStore, TokenStore},
	};

	/// Constructs an [`ApiClient`] backed by an in-memory store and the crate's default reqwest
	/// transport. The store handle is returned alongside the client so tests can seed and inspect
	/// token state directly.
	pub fn build_reqwest_test_client(descriptor: BackendDescriptor) -> (ApiClient, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let client = ApiClient::new(descriptor, store);

		(client, store_backend)
	}

	/// Seeds the store with an access/refresh pair, as the login view would after a successful
	/// sign-in.
	pub async fn seed_session(store: &MemoryStore, access: &str, refresh: &str) {
		store
			.store_pair(TokenPair::new(access, refresh))
			.await
			.expect("Failed to seed session tokens into the store.");
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
