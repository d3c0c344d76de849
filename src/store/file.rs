//! Simple file-backed [`TokenStore`] for desktop shells and long-lived CLI sessions.
//!
//! The snapshot on disk is a flat JSON object keyed by the fixed storage keys, the same shape
//! the web dashboard keeps in the browser's persistent key-value storage.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, StoreError, StoreFuture, TokenStore},
};

/// Persists session tokens to a JSON file after each mutation.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, TokenSecret>>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing tokens.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Returns the path backing this store.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, TokenSecret>, StoreError> {
		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let entries: HashMap<String, TokenSecret> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries)
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<String, TokenSecret>) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize token snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	fn mutate(&self, apply: impl FnOnce(&mut HashMap<String, TokenSecret>)) -> Result<(), StoreError> {
		let mut guard = self.inner.write();

		apply(&mut guard);
		self.persist_locked(&guard)
	}
}
impl TokenStore for FileStore {
	fn access_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let token = self.inner.read().get(ACCESS_TOKEN_KEY).cloned();

		Box::pin(async move { Ok(token) })
	}

	fn refresh_token(&self) -> StoreFuture<'_, Option<TokenSecret>> {
		let token = self.inner.read().get(REFRESH_TOKEN_KEY).cloned();

		Box::pin(async move { Ok(token) })
	}

	fn store_access_token(&self, token: TokenSecret) -> StoreFuture<'_, ()> {
		let result = self.mutate(|map| {
			map.insert(ACCESS_TOKEN_KEY.to_owned(), token);
		});

		Box::pin(async move { result })
	}

	fn store_pair(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		let result = self.mutate(|map| {
			map.insert(ACCESS_TOKEN_KEY.to_owned(), pair.access);
			map.insert(REFRESH_TOKEN_KEY.to_owned(), pair.refresh);
		});

		Box::pin(async move { result })
	}

	fn remove_access_token(&self) -> StoreFuture<'_, ()> {
		let result = self.mutate(|map| {
			map.remove(ACCESS_TOKEN_KEY);
		});

		Box::pin(async move { result })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let result = self.mutate(|map| {
			map.clear();
		});

		Box::pin(async move { result })
	}
}
