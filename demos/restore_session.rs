//! Seeds the session file from environment tokens and probes an authenticated endpoint.
//!
//! ```sh
//! XBPNEUS_ACCESS_TOKEN=... XBPNEUS_REFRESH_TOKEN=... cargo run --example restore_session
//! ```

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use xbpneus_client::{
	auth::TokenPair,
	backend::BackendDescriptor,
	client::ApiClient,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let access = env::var("XBPNEUS_ACCESS_TOKEN")
		.map_err(|_| eyre!("Set XBPNEUS_ACCESS_TOKEN to the session's access token."))?;
	let refresh = env::var("XBPNEUS_REFRESH_TOKEN")
		.map_err(|_| eyre!("Set XBPNEUS_REFRESH_TOKEN to the session's refresh token."))?;
	let store_backend = FileStore::open("xbpneus-session.json")?;

	store_backend.store_pair(TokenPair::new(access, refresh)).await?;

	let store: Arc<dyn TokenStore> = Arc::new(store_backend);
	let client = ApiClient::new(BackendDescriptor::from_env()?, store);
	let response = client.get("/api/usuarios/me/").await?;

	println!("HTTP {}", response.status());

	Ok(())
}
