//! One-shot OpenID Connect discovery mirror—fan out fetches across identity providers and land
//! every reachable discovery document in an object store.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod mirror;
pub mod obs;
pub mod provider;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::MirrorConfig,
		http::ReqwestHttpClient,
		mirror::Mirror,
		store::{MemoryObjectStore, ObjectStore},
	};

	/// Mirror type alias used by reqwest-backed integration tests.
	pub type ReqwestTestMirror = Mirror<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`Mirror`] backed by an in-memory object store and the reqwest transport
	/// used across integration tests.
	pub fn build_reqwest_test_mirror(
		config: MirrorConfig,
	) -> (ReqwestTestMirror, Arc<MemoryObjectStore>) {
		let store_backend = Arc::new(MemoryObjectStore::default());
		let store: Arc<dyn ObjectStore> = store_backend.clone();
		let mirror = Mirror::with_http_client(store, config, test_reqwest_http_client());

		(mirror, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
