//! Thread-safe in-memory [`ObjectStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{ObjectStore, PutObjectRequest, StoreError, StoreFuture, WriteReceipt},
};

type ObjectMap = Arc<RwLock<HashMap<ObjectKey, StoredObject>>>;

/// Bucket + key address of one stored object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectKey {
	/// Bucket component.
	pub bucket: String,
	/// Key component.
	pub key: String,
}

/// Object payload held by the in-memory backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
	/// Raw payload bytes.
	pub body: Vec<u8>,
	/// Content type recorded with the payload.
	pub content_type: String,
}

/// Thread-safe backend that keeps objects in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryObjectStore(ObjectMap);
impl MemoryObjectStore {
	/// Returns the stored object at the provided address, if present.
	pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
		self.0.read().get(&ObjectKey { bucket: bucket.into(), key: key.into() }).cloned()
	}

	/// Number of objects currently held.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns true when the backend holds no objects.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn put_now(map: ObjectMap, request: PutObjectRequest) -> Result<WriteReceipt, StoreError> {
		let receipt = WriteReceipt::acknowledge(&request);
		let PutObjectRequest { bucket, key, body, content_type } = request;

		map.write().insert(ObjectKey { bucket, key }, StoredObject { body, content_type });

		Ok(receipt)
	}
}
impl ObjectStore for MemoryObjectStore {
	fn put_object(&self, request: PutObjectRequest) -> StoreFuture<'_, WriteReceipt> {
		let map = self.0.clone();

		Box::pin(async move { Self::put_now(map, request) })
	}
}
