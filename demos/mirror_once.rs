//! Demonstrates one full mirror pass against mock identity providers, landing every
//! reachable discovery document in an in-memory object store.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oidc_mirror::{
	config::MirrorConfig,
	http::ReqwestHttpClient,
	mirror::Mirror,
	provider::Provider,
	reqwest::Client,
	store::{MemoryObjectStore, ObjectStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _acme = server
		.mock_async(|when, then| {
			when.method(GET).path("/acme/.well-known/openid-configuration");
			then.status(200).header("content-type", "application/json").body(
				"{\"issuer\":\"https://login.acme.example/acme\",\"token_endpoint\":\"https://login.acme.example/acme/token\"}",
			);
		})
		.await;
	let _umbrella = server
		.mock_async(|when, then| {
			when.method(GET).path("/umbrella/.well-known/openid-configuration");
			then.status(404).header("content-type", "text/html").body("<h1>gone</h1>");
		})
		.await;
	let providers = vec![
		Provider::new(format!("localhost:{}/acme", server.port()))?,
		Provider::new(format!("localhost:{}/umbrella", server.port()))?,
	];
	let config = MirrorConfig::new(providers, "discovery-docs", "oidc/")?;
	let store_backend = Arc::new(MemoryObjectStore::default());
	let store: Arc<dyn ObjectStore> = store_backend.clone();
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let mirror = Mirror::with_http_client(store, config, http_client);
	let receipts = mirror.run().await?;

	for receipt in &receipts {
		println!("Stored {}/{} with etag {}.", receipt.bucket, receipt.key, receipt.etag);
	}

	println!("Mirrored {} of 2 providers; the unreachable one was skipped.", receipts.len());

	Ok(())
}
