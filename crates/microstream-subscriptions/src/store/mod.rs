//! Persistence capability for subscription collections.
//!
//! The ledger owns one identity's collection in memory and writes it through
//! a [`SubscriptionStore`] after every mutation, last write wins. Collections
//! are keyed by `"{namespace}_{address}"` so switching identities switches
//! the visible collection entirely.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

use crate::model::Subscription;
use async_trait::async_trait;
use microstream_core::Address;
use thiserror::Error;

/// Storage namespace for subscription collections. The `v3` suffix tracks
/// the persisted document format.
pub const DEFAULT_NAMESPACE: &str = "microstream_subscriptions_v3";

/// Persistence errors.
#[derive(Debug, Error)]
pub enum StoreError {
	/// I/O failure
	#[error("Store I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// Serialization failure
	#[error("Store serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Key-value persistence for one identity's subscription collection.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
	/// Loads the collection persisted for `identity`, or `None` when nothing
	/// has been persisted yet. Malformed persisted data is treated as
	/// absent, never partially hydrated.
	async fn load(&self, identity: &Address) -> Result<Option<Vec<Subscription>>, StoreError>;

	/// Persists the whole collection for `identity`, replacing any previous
	/// value.
	async fn save(&self, identity: &Address, subscriptions: &[Subscription])
	-> Result<(), StoreError>;
}

/// Builds the storage key for an identity's collection.
pub fn storage_key(namespace: &str, identity: &Address) -> String {
	format!("{namespace}_{identity}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn storage_key_scopes_by_namespace_and_identity() {
		let key = storage_key(DEFAULT_NAMESPACE, &Address::from("rUser1"));
		assert_eq!(key, "microstream_subscriptions_v3_rUser1");
	}
}
