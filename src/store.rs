//! Object-store contracts and built-in backends for mirrored discovery documents.

pub mod file;
pub mod memory;

pub use file::FileObjectStore;
pub use memory::MemoryObjectStore;

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Content type attached to every mirrored discovery document.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Write capability implemented by object-store backends.
pub trait ObjectStore
where
	Self: Send + Sync,
{
	/// Stores one object, replacing any previous object at the same bucket + key.
	fn put_object(&self, request: PutObjectRequest) -> StoreFuture<'_, WriteReceipt>;
}

/// Single object write addressed to a bucket + key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PutObjectRequest {
	/// Destination bucket.
	pub bucket: String,
	/// Full object key, prefix included.
	pub key: String,
	/// Object payload.
	pub body: Vec<u8>,
	/// Content type recorded alongside the payload.
	pub content_type: String,
}

/// Acknowledgment returned once a backend has accepted an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReceipt {
	/// Bucket the object landed in.
	pub bucket: String,
	/// Key the object landed at.
	pub key: String,
	/// Base64 (no padding) SHA-256 digest of the stored body.
	pub etag: String,
	/// Instant the backend accepted the object.
	pub stored_at: OffsetDateTime,
}
impl WriteReceipt {
	/// Builds a receipt for the provided request, stamped with the current instant.
	pub fn acknowledge(request: &PutObjectRequest) -> Self {
		Self {
			bucket: request.bucket.clone(),
			key: request.key.clone(),
			etag: compute_etag(&request.body),
			stored_at: OffsetDateTime::now_utc(),
		}
	}
}

/// Error type produced by [`ObjectStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Payload could not be serialized for the backend.
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

fn compute_etag(body: &[u8]) -> String {
	let mut hasher = Sha256::new();

	hasher.update(body);

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn request() -> PutObjectRequest {
		PutObjectRequest {
			bucket: "discovery-docs".into(),
			key: "oidc/accounts.example.com".into(),
			body: b"{\"issuer\":\"https://accounts.example.com\"}".to_vec(),
			content_type: CONTENT_TYPE_JSON.into(),
		}
	}

	#[test]
	fn receipts_digest_the_stored_body() {
		let first = WriteReceipt::acknowledge(&request());
		let second = WriteReceipt::acknowledge(&request());

		assert_eq!(first.bucket, "discovery-docs");
		assert_eq!(first.key, "oidc/accounts.example.com");
		assert_eq!(first.etag, second.etag, "Equal bodies must digest to equal etags.");

		let mut altered = request();

		altered.body = b"{}".to_vec();

		assert_ne!(WriteReceipt::acknowledge(&altered).etag, first.etag);
	}

	#[test]
	fn store_error_can_be_serialized() {
		let payload = serde_json::to_string(&StoreError::Backend { message: "quota".into() })
			.expect("StoreError should serialize to JSON.");
		let round_trip: StoreError = serde_json::from_str(&payload)
			.expect("Serialized store error should deserialize from JSON.");

		assert_eq!(round_trip, StoreError::Backend { message: "quota".into() });
	}
}
