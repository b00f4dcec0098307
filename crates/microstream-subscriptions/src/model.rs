//! Subscription data model.
//!
//! Serde field names are the camelCase wire names of the persisted v3 JSON
//! collection, so documents written by the original web client hydrate
//! unchanged.

use chrono::{DateTime, Utc};
use microstream_core::{Address, TxHash};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing frequency of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
	Daily,
	Weekly,
	Monthly,
}

/// Lifecycle status. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
	Active,
	Paused,
	Cancelled,
}

/// How the subscriber settles each cycle.
///
/// `Manual` charges are approved one by one when due; `Wallet` draws from a
/// dedicated funding wallet; `Escrow` locks a prepayment on-chain for this
/// subscription alone. Due-ness semantics differ per method, see
/// [`crate::schedule::is_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
	Manual,
	Wallet,
	Escrow,
}

/// Outcome recorded on a payment receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Success,
	Failed,
}

/// What a payment receipt settles: one subscription cycle, or a funding
/// top-up of the subscription wallet/escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
	Subscription,
	Funding,
}

/// Immutable receipt appended whenever a payment or funding event is
/// confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
	/// Confirmation time
	pub date: DateTime<Utc>,
	/// Amount settled, in XRP
	pub amount: Decimal,
	/// External settlement identifier
	#[serde(rename = "txHash")]
	pub tx_hash: TxHash,
	pub status: PaymentStatus,
	#[serde(rename = "type")]
	pub kind: PaymentKind,
}

/// One recurring-payment agreement between a subscriber and a creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
	/// Opaque unique identifier, immutable after creation
	pub id: String,
	pub creator_address: Address,
	pub subscriber_address: Address,
	/// Per-cycle charge, in XRP
	pub amount: Decimal,
	pub frequency: Frequency,
	pub start_date: DateTime<Utc>,
	/// Instant after which the next charge is eligible (manual method)
	pub next_payment_date: DateTime<Utc>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_payment_date: Option<DateTime<Utc>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_payment_tx_hash: Option<TxHash>,
	pub status: SubscriptionStatus,
	pub payment_method: PaymentMethod,
	/// Dedicated funding wallet (wallet method)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub wallet_address: Option<Address>,
	/// On-chain escrow identifier (escrow method)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub escrow_id: Option<String>,
	/// End of the period covered by the last prepayment (wallet/escrow)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub prepaid_until: Option<DateTime<Utc>>,
	/// Last known funding-wallet balance, in XRP (wallet method)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub wallet_balance: Option<Decimal>,
	/// Append-only, chronological by append
	pub payment_history: Vec<PaymentRecord>,
}

impl Subscription {
	/// The date the next billing period is computed from: the most recent
	/// payment, or the start date before any payment has been recorded.
	pub fn schedule_base(&self) -> DateTime<Utc> {
		self.last_payment_date.unwrap_or(self.start_date)
	}

	pub fn is_active(&self) -> bool {
		self.status == SubscriptionStatus::Active
	}

	pub fn is_cancelled(&self) -> bool {
		self.status == SubscriptionStatus::Cancelled
	}
}

/// Method-specific details for a payment-method change.
///
/// Each method's fields are required together: switching methods replaces
/// the method-specific fields wholesale, so no stale wallet field survives a
/// switch to escrow and vice versa.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentMethodDetails {
	Manual,
	Wallet {
		wallet_address: Address,
		balance: Option<Decimal>,
		prepaid_until: Option<DateTime<Utc>>,
	},
	Escrow {
		escrow_id: String,
		prepaid_until: Option<DateTime<Utc>>,
	},
}

impl PaymentMethodDetails {
	/// The method this detail bag selects.
	pub fn method(&self) -> PaymentMethod {
		match self {
			PaymentMethodDetails::Manual => PaymentMethod::Manual,
			PaymentMethodDetails::Wallet { .. } => PaymentMethod::Wallet,
			PaymentMethodDetails::Escrow { .. } => PaymentMethod::Escrow,
		}
	}
}

/// Generates a fresh subscription id (`sub_<uuid>`).
pub(crate) fn new_subscription_id() -> String {
	format!("sub_{}", Uuid::new_v4())
}
