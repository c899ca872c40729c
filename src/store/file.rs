//! Filesystem-backed [`ObjectStore`] that lays objects out as `root/bucket/key`.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Component, Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	store::{ObjectStore, PutObjectRequest, StoreError, StoreFuture, WriteReceipt},
};

/// Persists each object as a regular file beneath a root directory.
#[derive(Clone, Debug)]
pub struct FileObjectStore {
	root: PathBuf,
}
impl FileObjectStore {
	/// Opens (or creates) a store rooted at the provided directory.
	pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let root = root.into();

		fs::create_dir_all(&root).map_err(|e| StoreError::Backend {
			message: format!("Failed to create store root {}: {e}", root.display()),
		})?;

		Ok(Self { root })
	}

	fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
		let relative = Path::new(bucket).join(key);

		// Keys are caller-supplied; refuse anything that would resolve above the root.
		if relative.components().any(|c| !matches!(c, Component::Normal(_))) {
			return Err(StoreError::Backend {
				message: format!("Object address {bucket}/{key} escapes the store root."),
			});
		}

		Ok(self.root.join(relative))
	}

	fn put_now(&self, request: &PutObjectRequest) -> Result<WriteReceipt, StoreError> {
		let path = self.object_path(&request.bucket, &request.key)?;

		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create object directory {}: {e}", parent.display()),
			})?;
		}

		let receipt = WriteReceipt::acknowledge(request);
		let mut tmp_os = path.clone().into_os_string();

		tmp_os.push(".tmp");

		let tmp_path = PathBuf::from(tmp_os);

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&request.body).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", path.display()),
		})?;

		Ok(receipt)
	}
}
impl ObjectStore for FileObjectStore {
	fn put_object(&self, request: PutObjectRequest) -> StoreFuture<'_, WriteReceipt> {
		Box::pin(async move { self.put_now(&request) })
	}
}
