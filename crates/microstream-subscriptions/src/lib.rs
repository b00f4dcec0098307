//! # MicroStream Subscriptions
//!
//! The subscription ledger: one recurring-payment agreement per record,
//! tracked through a small lifecycle state machine (`active` → `paused` →
//! `cancelled`), with due-date computation per billing frequency and a
//! pluggable persistence store keyed by subscriber identity.
//!
//! The ledger itself never talks to the XRP Ledger; confirmed payments reach
//! it through [`SubscriptionLedger::record_payment`] once the payment
//! watcher (in `microstream-payments`) observes a signed transaction.

pub mod ledger;
pub mod model;
pub mod schedule;
pub mod store;

pub use ledger::{LedgerError, SubscriptionLedger};
pub use model::{
	Frequency, PaymentKind, PaymentMethod, PaymentMethodDetails, PaymentRecord, PaymentStatus,
	Subscription, SubscriptionStatus,
};
pub use store::{InMemoryStore, JsonFileStore, StoreError, SubscriptionStore, DEFAULT_NAMESPACE};
