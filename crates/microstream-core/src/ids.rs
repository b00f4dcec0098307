//! Opaque ledger identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// XRPL account identifier (classic address, `r...`).
///
/// Treated as opaque: no checksum validation is performed here. The wallet
/// SDK that produced the address already guarantees well-formedness.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
	/// Creates an address from its string form.
	///
	/// # Example
	///
	/// ```
	/// use microstream_core::Address;
	///
	/// let addr = Address::new("rUserAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
	/// assert_eq!(addr.as_str(), "rUserAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
	/// ```
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the address as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for Address {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for Address {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// External settlement identifier reported by the ledger once a payment
/// has been signed and submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
	/// Creates a transaction hash from its string form.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the hash as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TxHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TxHash {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl From<String> for TxHash {
	fn from(value: String) -> Self {
		Self(value)
	}
}
