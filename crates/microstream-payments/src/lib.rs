//! # MicroStream Payments
//!
//! The payment-executor capability and the reconciliation watcher that
//! bridges asynchronous, externally confirmed payment approvals back into
//! the subscription ledger.
//!
//! All ledger interaction, signing, and payment-request lifecycle live in
//! the external wallet service; this crate only creates requests through the
//! [`PaymentExecutor`] capability and polls their status until a terminal
//! outcome.

pub mod executor;
pub mod watcher;

pub use executor::{
	subscription_payment_request, PaymentError, PaymentExecutor, PaymentRequest,
	PaymentRequestStatus,
};
pub use watcher::{PaymentWatcher, WatchError, WatchHandle, WatchOutcome, WatcherConfig};
