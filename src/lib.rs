//! # MicroStream
//!
//! Subscription engine for recurring XRPL micropayments.
//!
//! A subscriber agrees to pay a creator a fixed XRP amount per cycle (daily,
//! weekly, or monthly). MicroStream tracks those agreements in an
//! identity-scoped [`SubscriptionLedger`](subscriptions::SubscriptionLedger):
//! a small lifecycle state machine with due-date computation per billing
//! frequency, persisted through a pluggable store. Actual payments are
//! signed out of band in the subscriber's wallet; the
//! [`PaymentWatcher`](payments::PaymentWatcher) polls the wallet service
//! until a request resolves and hands the settlement hash back to the
//! ledger.
//!
//! ## Example
//!
//! ```no_run
//! use microstream::core::{Address, SystemClock};
//! use microstream::subscriptions::{Frequency, InMemoryStore, SubscriptionLedger};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ledger = SubscriptionLedger::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
//! ledger.sign_in(Address::from("rUser1111111111111111111111111111")).await?;
//! let sub = ledger
//!     .create(
//!         Address::from("rCreator111111111111111111111111"),
//!         Decimal::new(5, 1), // 0.5 XRP
//!         Frequency::Monthly,
//!     )
//!     .await?;
//! println!("next charge: {}", sub.next_payment_date);
//! # Ok(())
//! # }
//! ```

pub use microstream_core as core;
pub use microstream_payments as payments;
pub use microstream_subscriptions as subscriptions;

pub use microstream_core::{Address, Clock, ManualClock, SystemClock, TxHash};
pub use microstream_payments::{PaymentExecutor, PaymentWatcher, WatchOutcome, WatcherConfig};
pub use microstream_subscriptions::{
	Frequency, PaymentKind, PaymentMethod, PaymentMethodDetails, Subscription, SubscriptionLedger,
	SubscriptionStatus, SubscriptionStore,
};
