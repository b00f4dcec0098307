//! JSON-file store backend.
//!
//! One file per storage key under a base directory, holding the serialized
//! subscription list. The filesystem analogue of the browser local storage
//! the collection originally lived in.

use super::{storage_key, StoreError, SubscriptionStore, DEFAULT_NAMESPACE};
use crate::model::Subscription;
use async_trait::async_trait;
use microstream_core::Address;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::warn;

/// Store that persists each identity's collection as
/// `<dir>/<namespace>_<address>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
	dir: PathBuf,
	namespace: String,
}

impl JsonFileStore {
	/// Creates a store rooted at `dir` under the default namespace. The
	/// directory is created on first save.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self::with_namespace(dir, DEFAULT_NAMESPACE)
	}

	/// Creates a store rooted at `dir` under a custom namespace.
	pub fn with_namespace(dir: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			namespace: namespace.into(),
		}
	}

	fn path_for(&self, identity: &Address) -> PathBuf {
		self.dir
			.join(format!("{}.json", storage_key(&self.namespace, identity)))
	}
}

#[async_trait]
impl SubscriptionStore for JsonFileStore {
	async fn load(&self, identity: &Address) -> Result<Option<Vec<Subscription>>, StoreError> {
		let path = self.path_for(identity);
		let bytes = match tokio::fs::read(&path).await {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
			Err(err) => return Err(err.into()),
		};

		match serde_json::from_slice(&bytes) {
			Ok(subscriptions) => Ok(Some(subscriptions)),
			Err(err) => {
				// Never hydrate a partial collection; start empty instead.
				warn!(path = %path.display(), error = %err, "malformed persisted subscriptions, ignoring");
				Ok(None)
			}
		}
	}

	async fn save(
		&self,
		identity: &Address,
		subscriptions: &[Subscription],
	) -> Result<(), StoreError> {
		tokio::fs::create_dir_all(&self.dir).await?;
		let bytes = serde_json::to_vec_pretty(subscriptions)?;
		tokio::fs::write(self.path_for(identity), bytes).await?;
		Ok(())
	}
}
