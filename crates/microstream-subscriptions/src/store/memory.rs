//! In-memory store backend.

use super::{storage_key, StoreError, SubscriptionStore, DEFAULT_NAMESPACE};
use crate::model::Subscription;
use async_trait::async_trait;
use microstream_core::Address;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Volatile store keyed in a `HashMap`, for tests and ephemeral sessions.
#[derive(Debug)]
pub struct InMemoryStore {
	namespace: String,
	collections: RwLock<HashMap<String, Vec<Subscription>>>,
}

impl Default for InMemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl InMemoryStore {
	/// Creates an empty store under the default namespace.
	pub fn new() -> Self {
		Self::with_namespace(DEFAULT_NAMESPACE)
	}

	/// Creates an empty store under a custom namespace.
	pub fn with_namespace(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			collections: RwLock::new(HashMap::new()),
		}
	}

	/// Number of identities with a persisted collection.
	pub async fn identity_count(&self) -> usize {
		self.collections.read().await.len()
	}
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
	async fn load(&self, identity: &Address) -> Result<Option<Vec<Subscription>>, StoreError> {
		let key = storage_key(&self.namespace, identity);
		Ok(self.collections.read().await.get(&key).cloned())
	}

	async fn save(
		&self,
		identity: &Address,
		subscriptions: &[Subscription],
	) -> Result<(), StoreError> {
		let key = storage_key(&self.namespace, identity);
		self.collections
			.write()
			.await
			.insert(key, subscriptions.to_vec());
		Ok(())
	}
}
