//! Lists the fleet's vehicles using a file-backed session.
//!
//! ```sh
//! XBPNEUS_API_URL=https://fleet.example.com cargo run --example list_vehicles
//! ```
//!
//! The session file must already contain tokens; run `restore_session` first or sign in through
//! the dashboard and export its storage.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
// self
use xbpneus_client::{
	backend::BackendDescriptor,
	client::ApiClient,
	store::{FileStore, TokenStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let descriptor = BackendDescriptor::from_env()?;
	let store: Arc<dyn TokenStore> = Arc::new(FileStore::open("xbpneus-session.json")?);
	let client = ApiClient::new(descriptor, store);
	let response = client.get("/api/vehicles/").await?;

	println!("HTTP {}", response.status());
	println!("{}", String::from_utf8_lossy(response.body()));

	Ok(())
}
