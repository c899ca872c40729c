//! Batch orchestration: fan the fetches out, wait for every one to settle, then fan the
//! store writes out for the successes.
//!
//! The two stages fail differently on purpose. Fetch failures are recorded per provider
//! and never abort the batch, and a failure while building a write request is likewise
//! swallowed; but once the writes are dispatched, the first write that fails rejects the
//! whole invocation. The asymmetry mirrors the job this crate replaces and is part of
//! the contract.

// crates.io
use futures::future;
// self
use crate::{
	_prelude::*,
	config::MirrorConfig,
	fetch::{self, FetchOutcome},
	http::DiscoveryHttpClient,
	obs::{self, StageKind, StageOutcome, StageSpan},
	provider::Provider,
	store::{CONTENT_TYPE_JSON, ObjectStore, PutObjectRequest, StoreError, StoreFuture, WriteReceipt},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Mirror specialized for the crate's default reqwest transport.
pub type ReqwestMirror = Mirror<ReqwestHttpClient>;

/// Coordinates one fetch-then-store pass over a configured provider list.
///
/// The mirror owns the HTTP client, the object store handle, and the invocation
/// configuration; all three are shared read-only across the concurrent tasks it spawns,
/// so the batch needs no synchronization of its own.
pub struct Mirror<C>
where
	C: ?Sized + DiscoveryHttpClient,
{
	/// HTTP client used for every discovery fetch.
	pub http_client: Arc<C>,
	/// Object store receiving successfully fetched documents.
	pub store: Arc<dyn ObjectStore>,
	/// Read-only invocation inputs.
	pub config: MirrorConfig,
}
impl<C> Mirror<C>
where
	C: ?Sized + DiscoveryHttpClient,
{
	/// Creates a mirror that reuses a caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn ObjectStore>,
		config: MirrorConfig,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { http_client: http_client.into(), store, config }
	}

	/// Fetches a single provider's discovery document without touching the store.
	pub async fn fetch(&self, provider: Provider) -> FetchOutcome {
		fetch::fetch_discovery(self.http_client.as_ref(), provider).await
	}

	/// Runs one full pass: fetch every configured provider concurrently, wait for all
	/// attempts to settle, then write every fetched document concurrently.
	///
	/// Returns one [`WriteReceipt`] per stored document. Providers whose fetch failed are
	/// absent from the result; a write that fails after dispatch fails the invocation.
	pub async fn run(&self) -> Result<Vec<WriteReceipt>> {
		let fetch_span = StageSpan::new(StageKind::Fetch, "run");
		let fetches = self
			.config
			.providers
			.iter()
			.cloned()
			.map(|provider| fetch::fetch_discovery(self.http_client.as_ref(), provider));
		// Writes start only after every fetch has settled.
		let outcomes = fetch_span.instrument(future::join_all(fetches)).await;
		let store_span = StageSpan::new(StageKind::Store, "run");
		let writes: Vec<_> =
			outcomes.into_iter().filter_map(|outcome| self.dispatch_write(outcome)).collect();
		let receipts = store_span.instrument(future::try_join_all(writes)).await?;

		Ok(receipts)
	}

	/// Turns a settled fetch into a dispatched write, or into nothing.
	///
	/// Fetch failures were already recorded by the fetcher. A request that cannot be
	/// built is recorded here and skipped so sibling writes proceed.
	fn dispatch_write(&self, outcome: FetchOutcome) -> Option<StoreFuture<'_, WriteReceipt>> {
		let FetchOutcome::Success { provider, configuration } = outcome else {
			return None;
		};

		obs::record_stage_outcome(StageKind::Store, StageOutcome::Attempt);

		match put_request(&self.config, &provider, &configuration) {
			Ok(request) => {
				let write = self.store.put_object(request);

				Some(Box::pin(async move {
					match write.await {
						Ok(receipt) => {
							obs::record_stage_outcome(StageKind::Store, StageOutcome::Success);

							Ok(receipt)
						},
						Err(e) => {
							obs::record_stage_outcome(StageKind::Store, StageOutcome::Failure);

							Err(e)
						},
					}
				}))
			},
			Err(e) => {
				obs::record_stage_outcome(StageKind::Store, StageOutcome::Failure);
				obs::note_discarded(StageKind::Store, &provider, &e);

				None
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl Mirror<ReqwestHttpClient> {
	/// Creates a mirror with the crate's default reqwest transport.
	pub fn new(store: Arc<dyn ObjectStore>, config: MirrorConfig) -> Self {
		Self::with_http_client(store, config, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Mirror<C>
where
	C: ?Sized + DiscoveryHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			config: self.config.clone(),
		}
	}
}
impl<C> Debug for Mirror<C>
where
	C: ?Sized + DiscoveryHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Mirror").field("config", &self.config).finish()
	}
}

fn put_request(
	config: &MirrorConfig,
	provider: &Provider,
	configuration: &JsonValue,
) -> Result<PutObjectRequest, StoreError> {
	// The prefix supplies any trailing delimiter; nothing is inserted between the two.
	let key = format!("{}{}", config.prefix, provider);
	let body = serde_json::to_vec(configuration).map_err(|e| StoreError::Serialization {
		message: format!("Failed to serialize discovery document for {provider}: {e}"),
	})?;

	Ok(PutObjectRequest {
		bucket: config.bucket.clone(),
		key,
		body,
		content_type: CONTENT_TYPE_JSON.into(),
	})
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn config(prefix: &str) -> MirrorConfig {
		MirrorConfig::new(Vec::new(), "discovery-docs", prefix)
			.expect("Mirror test configuration should be valid.")
	}

	fn provider(value: &str) -> Provider {
		Provider::new(value).expect("Mirror test provider should be valid.")
	}

	#[test]
	fn put_request_concatenates_prefix_and_provider_directly() {
		let document = serde_json::json!({ "issuer": "https://p1" });
		let request = put_request(&config("oidc/"), &provider("p1.example"), &document)
			.expect("Request construction should succeed for a plain document.");

		assert_eq!(request.bucket, "discovery-docs");
		assert_eq!(request.key, "oidc/p1.example");
		assert_eq!(request.body, b"{\"issuer\":\"https://p1\"}");
		assert_eq!(request.content_type, CONTENT_TYPE_JSON);

		// No separator sneaks in when the prefix does not end with one.
		let request = put_request(&config("snapshots-"), &provider("p1.example"), &document)
			.expect("Request construction should succeed for a delimiterless prefix.");

		assert_eq!(request.key, "snapshots-p1.example");
	}
}
