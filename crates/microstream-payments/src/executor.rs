//! Payment executor capability.
//!
//! An opaque external service (the Xumm payload API in production) that
//! turns a destination and an amount in drops into a signable payment
//! request, and reports whether that request has been signed or cancelled.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use microstream_core::{xrp_to_drops, Address, CurrencyError, TxHash};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Payment executor errors.
#[derive(Debug, Error)]
pub enum PaymentError {
	/// The external wallet service rejected or failed the call
	#[error("Payment provider error: {0}")]
	Provider(String),

	/// Unknown payment request id
	#[error("Payment request not found: {0}")]
	RequestNotFound(String),

	/// Memo serialization failure
	#[error("Memo serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Amount conversion failure
	#[error(transparent)]
	Currency(#[from] CurrencyError),
}

/// A created payment request, ready to present to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
	/// Opaque identifier for status polling
	pub request_id: String,
	/// QR payload the subscriber scans to sign
	pub qr_payload: String,
	/// Deep link into the wallet app
	pub deeplink: String,
}

/// Point-in-time status of a payment request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaymentRequestStatus {
	pub signed: bool,
	/// Settlement hash, present once the ledger has accepted the payment
	pub tx_hash: Option<TxHash>,
	pub cancelled: bool,
}

/// External capability that creates payment requests and reports their
/// signing status. Amounts are in drops; callers convert from XRP first.
#[async_trait]
pub trait PaymentExecutor: Send + Sync {
	/// Creates a payment request of `amount_drops` to `destination`,
	/// optionally tagged with a memo.
	async fn create_payment_request(
		&self,
		destination: &Address,
		amount_drops: u64,
		memo: Option<String>,
	) -> Result<PaymentRequest, PaymentError>;

	/// Reports the current status of a previously created request.
	async fn check_status(&self, request_id: &str) -> Result<PaymentRequestStatus, PaymentError>;
}

/// Memo attached to subscription-cycle payments so creators can attribute
/// incoming transactions.
#[derive(Debug, Serialize)]
struct SubscriptionMemo<'a> {
	#[serde(rename = "type")]
	kind: &'static str,
	id: &'a str,
	timestamp: DateTime<Utc>,
}

/// Creates a payment request for one subscription cycle: converts the XRP
/// amount to drops and tags the request with a JSON memo
/// `{"type":"subscription","id":...,"timestamp":...}`.
pub async fn subscription_payment_request(
	executor: &dyn PaymentExecutor,
	creator: &Address,
	amount_xrp: Decimal,
	subscription_id: &str,
	now: DateTime<Utc>,
) -> Result<PaymentRequest, PaymentError> {
	let memo = serde_json::to_string(&SubscriptionMemo {
		kind: "subscription",
		id: subscription_id,
		timestamp: now,
	})?;
	let drops = xrp_to_drops(amount_xrp)?;
	executor
		.create_payment_request(creator, drops, Some(memo))
		.await
}
