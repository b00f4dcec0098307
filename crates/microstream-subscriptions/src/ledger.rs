//! The subscription ledger service.
//!
//! Owns one signed-in identity's collection in memory and mirrors it to the
//! injected [`SubscriptionStore`] after every mutation. Lifecycle mutators
//! are total over the in-memory collection: unknown ids and disallowed
//! transitions are silent no-ops, and callers that need a failure signal
//! check existence through [`SubscriptionLedger::subscription_by_id`] first.

use crate::model::{
	new_subscription_id, Frequency, PaymentKind, PaymentMethod, PaymentMethodDetails,
	PaymentRecord, PaymentStatus, Subscription, SubscriptionStatus,
};
use crate::schedule;
use crate::store::{StoreError, SubscriptionStore};
use microstream_core::{Address, Clock, TxHash};
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Ledger operation errors.
#[derive(Debug, Error)]
pub enum LedgerError {
	/// No identity is signed in
	#[error("No identity signed in")]
	NoIdentity,

	/// Per-cycle amount must be positive
	#[error("Subscription amount must be positive: {0}")]
	InvalidAmount(Decimal),

	/// Persistence failure
	#[error(transparent)]
	Store(#[from] StoreError),
}

/// In-memory subscription collection for one subscriber identity, persisted
/// through an injected store.
///
/// # Example
///
/// ```
/// use microstream_core::{Address, SystemClock};
/// use microstream_subscriptions::{Frequency, InMemoryStore, SubscriptionLedger};
/// use rust_decimal::Decimal;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut ledger = SubscriptionLedger::new(Arc::new(InMemoryStore::new()), Arc::new(SystemClock));
/// ledger.sign_in(Address::from("rUser1111111111111111111111111111")).await?;
///
/// let sub = ledger
///     .create(Address::from("rCreator111111111111111111111111"), Decimal::new(5, 1), Frequency::Monthly)
///     .await?;
/// assert!(ledger.subscription_by_id(&sub.id).is_some());
/// # Ok(())
/// # }
/// ```
pub struct SubscriptionLedger {
	store: Arc<dyn SubscriptionStore>,
	clock: Arc<dyn Clock>,
	identity: Option<Address>,
	subscriptions: Vec<Subscription>,
}

impl SubscriptionLedger {
	/// Creates a ledger with no identity signed in.
	pub fn new(store: Arc<dyn SubscriptionStore>, clock: Arc<dyn Clock>) -> Self {
		Self {
			store,
			clock,
			identity: None,
			subscriptions: Vec::new(),
		}
	}

	/// The identity whose collection is currently visible.
	pub fn identity(&self) -> Option<&Address> {
		self.identity.as_ref()
	}

	/// All subscriptions of the signed-in identity, in creation order.
	pub fn subscriptions(&self) -> &[Subscription] {
		&self.subscriptions
	}

	/// Switches to `identity`, replacing the visible collection with its
	/// persisted one (empty when nothing was persisted).
	pub async fn sign_in(&mut self, identity: Address) -> Result<(), StoreError> {
		let loaded = self.store.load(&identity).await?.unwrap_or_default();
		debug!(identity = %identity, count = loaded.len(), "loaded subscription collection");
		self.identity = Some(identity);
		self.subscriptions = loaded;
		Ok(())
	}

	/// Clears the visible collection. Nothing is deleted from the store.
	pub fn sign_out(&mut self) {
		self.identity = None;
		self.subscriptions.clear();
	}

	/// Creates an active subscription from the signed-in identity to
	/// `creator`, charged `amount` XRP per `frequency` cycle. Payment method
	/// starts as manual; the subscriber picks another method in a second
	/// step via [`SubscriptionLedger::update_payment_method`].
	pub async fn create(
		&mut self,
		creator: Address,
		amount: Decimal,
		frequency: Frequency,
	) -> Result<Subscription, LedgerError> {
		let subscriber = self.identity.clone().ok_or(LedgerError::NoIdentity)?;
		if amount <= Decimal::ZERO {
			return Err(LedgerError::InvalidAmount(amount));
		}

		let now = self.clock.now();
		let subscription = Subscription {
			id: new_subscription_id(),
			creator_address: creator,
			subscriber_address: subscriber,
			amount,
			frequency,
			start_date: now,
			next_payment_date: schedule::next_payment_date(now, frequency),
			last_payment_date: None,
			last_payment_tx_hash: None,
			status: SubscriptionStatus::Active,
			payment_method: PaymentMethod::Manual,
			wallet_address: None,
			escrow_id: None,
			prepaid_until: None,
			wallet_balance: None,
			payment_history: Vec::new(),
		};

		debug!(id = %subscription.id, creator = %subscription.creator_address, "subscription created");
		self.subscriptions.push(subscription.clone());
		self.persist().await;
		Ok(subscription)
	}

	/// Pauses an active subscription. No-op otherwise.
	pub async fn pause(&mut self, id: &str) {
		let changed = self.with_subscription(id, |sub| {
			if sub.status != SubscriptionStatus::Active {
				return false;
			}
			sub.status = SubscriptionStatus::Paused;
			true
		});
		if changed {
			debug!(id, "subscription paused");
			self.persist().await;
		}
	}

	/// Resumes a paused subscription, rebasing its schedule on the resume
	/// instant so a long pause never leaves it already due. No-op otherwise.
	pub async fn resume(&mut self, id: &str) {
		let now = self.clock.now();
		let changed = self.with_subscription(id, |sub| {
			if sub.status != SubscriptionStatus::Paused {
				return false;
			}
			sub.status = SubscriptionStatus::Active;
			sub.next_payment_date = schedule::next_payment_date(now, sub.frequency);
			true
		});
		if changed {
			debug!(id, "subscription resumed");
			self.persist().await;
		}
	}

	/// Cancels a subscription. Terminal: the record stays in the collection
	/// but no later operation changes it. No-op on unknown or already
	/// cancelled ids.
	pub async fn cancel(&mut self, id: &str) {
		let changed = self.with_subscription(id, |sub| {
			if sub.is_cancelled() {
				return false;
			}
			sub.status = SubscriptionStatus::Cancelled;
			true
		});
		if changed {
			debug!(id, "subscription cancelled");
			self.persist().await;
		}
	}

	/// Records a confirmed payment against an active subscription.
	///
	/// Appends a success receipt (the per-cycle amount for
	/// [`PaymentKind::Subscription`], zero for [`PaymentKind::Funding`] —
	/// funding amounts land in the wallet balance through
	/// [`SubscriptionLedger::update_wallet_balance`]). Subscription-cycle
	/// payments also advance the schedule: `last_payment_date = now`,
	/// `next_payment_date = now + 1 period`.
	pub async fn record_payment(&mut self, id: &str, tx_hash: TxHash, kind: PaymentKind) {
		let now = self.clock.now();
		let changed = self.with_subscription(id, |sub| {
			if sub.status != SubscriptionStatus::Active {
				return false;
			}

			let amount = match kind {
				PaymentKind::Subscription => sub.amount,
				PaymentKind::Funding => Decimal::ZERO,
			};
			sub.payment_history.push(PaymentRecord {
				date: now,
				amount,
				tx_hash: tx_hash.clone(),
				status: PaymentStatus::Success,
				kind,
			});

			if kind == PaymentKind::Subscription {
				sub.last_payment_date = Some(now);
				sub.last_payment_tx_hash = Some(tx_hash.clone());
				sub.next_payment_date = schedule::next_payment_date(now, sub.frequency);
			}
			true
		});
		if changed {
			debug!(id, tx_hash = %tx_hash, ?kind, "payment recorded");
			self.persist().await;
		}
	}

	/// Replaces a subscription's payment method and its method-specific
	/// fields wholesale. Idempotent setter; no-op on unknown or cancelled
	/// ids.
	pub async fn update_payment_method(&mut self, id: &str, details: PaymentMethodDetails) {
		let method = details.method();
		let changed = self.with_subscription(id, |sub| {
			if sub.is_cancelled() {
				return false;
			}

			sub.payment_method = method;
			match &details {
				PaymentMethodDetails::Manual => {
					sub.wallet_address = None;
					sub.wallet_balance = None;
					sub.escrow_id = None;
					sub.prepaid_until = None;
				}
				PaymentMethodDetails::Wallet {
					wallet_address,
					balance,
					prepaid_until,
				} => {
					sub.wallet_address = Some(wallet_address.clone());
					sub.wallet_balance = *balance;
					sub.prepaid_until = *prepaid_until;
					sub.escrow_id = None;
				}
				PaymentMethodDetails::Escrow {
					escrow_id,
					prepaid_until,
				} => {
					sub.escrow_id = Some(escrow_id.clone());
					sub.prepaid_until = *prepaid_until;
					sub.wallet_address = None;
					sub.wallet_balance = None;
				}
			}
			true
		});
		if changed {
			debug!(id, ?method, "payment method updated");
			self.persist().await;
		}
	}

	/// Sets the last known funding-wallet balance. Idempotent setter; no-op
	/// on unknown or cancelled ids.
	pub async fn update_wallet_balance(&mut self, id: &str, balance: Decimal) {
		let changed = self.with_subscription(id, |sub| {
			if sub.is_cancelled() {
				return false;
			}
			sub.wallet_balance = Some(balance);
			true
		});
		if changed {
			self.persist().await;
		}
	}

	/// Subscriptions requiring subscriber action right now, per
	/// [`schedule::is_due`]. Pure with respect to ledger state.
	pub fn due_subscriptions(&self) -> Vec<Subscription> {
		let now = self.clock.now();
		self.subscriptions
			.iter()
			.filter(|sub| schedule::is_due(sub, now))
			.cloned()
			.collect()
	}

	/// Looks up a subscription by id.
	pub fn subscription_by_id(&self, id: &str) -> Option<&Subscription> {
		self.subscriptions.iter().find(|sub| sub.id == id)
	}

	fn with_subscription(&mut self, id: &str, apply: impl FnOnce(&mut Subscription) -> bool) -> bool {
		match self.subscriptions.iter_mut().find(|sub| sub.id == id) {
			Some(sub) => apply(sub),
			None => false,
		}
	}

	/// Mirrors the collection to the store, last write wins. Failures are
	/// logged and never touch in-memory state.
	async fn persist(&self) {
		let Some(identity) = &self.identity else {
			return;
		};
		if let Err(err) = self.store.save(identity, &self.subscriptions).await {
			warn!(identity = %identity, error = %err, "failed to persist subscriptions");
		}
	}
}
