//! Subscription lifecycle tests against an in-memory store and manual clock.

use chrono::{Datelike, Duration, TimeZone, Utc};
use microstream_core::{Address, Clock, ManualClock, TxHash};
use microstream_subscriptions::{
	Frequency, InMemoryStore, LedgerError, PaymentKind, PaymentMethod, PaymentMethodDetails,
	PaymentStatus, SubscriptionLedger, SubscriptionStatus,
};
use rust_decimal::Decimal;
use std::sync::Arc;

fn subscriber() -> Address {
	Address::from("rUser1111111111111111111111111111")
}

fn creator() -> Address {
	Address::from("rCreator111111111111111111111111")
}

fn ledger_at(clock: &Arc<ManualClock>) -> SubscriptionLedger {
	SubscriptionLedger::new(Arc::new(InMemoryStore::new()), Arc::clone(clock) as Arc<dyn Clock>)
}

fn fixed_clock() -> Arc<ManualClock> {
	Arc::new(ManualClock::new(
		Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
	))
}

#[tokio::test]
async fn create_defaults_to_active_manual_with_one_period_schedule() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();

	let sub = ledger
		.create(creator(), Decimal::new(5, 1), Frequency::Monthly)
		.await
		.unwrap();

	assert!(sub.id.starts_with("sub_"));
	assert_eq!(sub.status, SubscriptionStatus::Active);
	assert_eq!(sub.payment_method, PaymentMethod::Manual);
	assert_eq!(sub.subscriber_address, subscriber());
	assert_eq!(sub.start_date, clock.now());
	// one calendar month after the start date
	assert_eq!(sub.next_payment_date.month(), 2);
	assert_eq!(sub.next_payment_date.day(), 15);
	assert!(sub.payment_history.is_empty());
}

#[tokio::test]
async fn create_without_identity_fails() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);

	let err = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap_err();
	assert!(matches!(err, LedgerError::NoIdentity));
}

#[tokio::test]
async fn create_rejects_non_positive_amount() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();

	let err = ledger
		.create(creator(), Decimal::ZERO, Frequency::Daily)
		.await
		.unwrap_err();
	assert!(matches!(err, LedgerError::InvalidAmount(_)));
}

#[tokio::test]
async fn daily_subscription_becomes_due_after_two_days() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();

	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();
	ledger
		.record_payment(&sub.id, TxHash::from("HASH0"), PaymentKind::Subscription)
		.await;

	assert!(ledger.due_subscriptions().is_empty());
	clock.advance(Duration::days(2));
	let due = ledger.due_subscriptions();
	assert_eq!(due.len(), 1);
	assert_eq!(due[0].id, sub.id);
}

#[tokio::test]
async fn due_query_is_idempotent_without_mutation() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();
	clock.advance(Duration::days(3));

	let first = ledger.due_subscriptions();
	let second = ledger.due_subscriptions();
	assert_eq!(first, second);
	assert_eq!(first[0].id, sub.id);
}

#[tokio::test]
async fn resume_rebases_schedule_on_resume_instant() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();

	// weekly subscription paid 4 days ago: due in 3 days
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Weekly)
		.await
		.unwrap();
	ledger
		.record_payment(&sub.id, TxHash::from("HASH0"), PaymentKind::Subscription)
		.await;
	clock.advance(Duration::days(4));

	ledger.pause(&sub.id).await;
	let paused = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(paused.status, SubscriptionStatus::Paused);
	// pausing leaves the schedule alone
	assert_eq!(
		paused.next_payment_date,
		clock.now() + Duration::days(3)
	);

	clock.advance(Duration::days(10));
	ledger.resume(&sub.id).await;

	let resumed = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(resumed.status, SubscriptionStatus::Active);
	// one full period from the resume instant, not three days in the past
	assert_eq!(resumed.next_payment_date, clock.now() + Duration::days(7));
	assert!(resumed.next_payment_date > clock.now());
}

#[tokio::test]
async fn pause_only_applies_to_active_subscriptions() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();

	ledger.resume(&sub.id).await; // active: no-op
	assert_eq!(
		ledger.subscription_by_id(&sub.id).unwrap().status,
		SubscriptionStatus::Active
	);

	ledger.pause(&sub.id).await;
	ledger.pause(&sub.id).await; // already paused: no-op
	assert_eq!(
		ledger.subscription_by_id(&sub.id).unwrap().status,
		SubscriptionStatus::Paused
	);
}

#[tokio::test]
async fn cancelled_is_terminal() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Monthly)
		.await
		.unwrap();

	ledger.cancel(&sub.id).await;
	ledger.pause(&sub.id).await;
	ledger.resume(&sub.id).await;
	ledger
		.record_payment(&sub.id, TxHash::from("HASH1"), PaymentKind::Subscription)
		.await;
	ledger
		.update_payment_method(
			&sub.id,
			PaymentMethodDetails::Wallet {
				wallet_address: Address::from("rWallet1"),
				balance: Some(Decimal::from(10)),
				prepaid_until: None,
			},
		)
		.await;

	let cancelled = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(cancelled.status, SubscriptionStatus::Cancelled);
	assert_eq!(cancelled.payment_method, PaymentMethod::Manual);
	assert!(cancelled.payment_history.is_empty());
	assert!(ledger.due_subscriptions().is_empty());
}

#[tokio::test]
async fn operations_on_unknown_ids_are_noops() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();

	ledger.pause("sub_unknown").await;
	ledger.cancel("sub_unknown").await;
	ledger
		.record_payment("sub_unknown", TxHash::from("HASH"), PaymentKind::Subscription)
		.await;

	assert!(ledger.subscription_by_id("sub_unknown").is_none());
	assert_eq!(ledger.subscriptions().len(), 1);
	assert_eq!(
		ledger.subscription_by_id(&sub.id).unwrap().status,
		SubscriptionStatus::Active
	);
}

#[tokio::test]
async fn record_payment_appends_receipt_and_advances_schedule() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let amount = Decimal::new(12, 1); // 1.2 XRP
	let sub = ledger
		.create(creator(), amount, Frequency::Monthly)
		.await
		.unwrap();

	clock.advance(Duration::days(31));
	ledger
		.record_payment(&sub.id, TxHash::from("ABCD1234"), PaymentKind::Subscription)
		.await;

	let paid = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(paid.payment_history.len(), 1);
	let receipt = &paid.payment_history[0];
	assert_eq!(receipt.amount, amount);
	assert_eq!(receipt.status, PaymentStatus::Success);
	assert_eq!(receipt.kind, PaymentKind::Subscription);
	assert_eq!(receipt.tx_hash, TxHash::from("ABCD1234"));

	assert_eq!(paid.last_payment_date, Some(clock.now()));
	assert_eq!(paid.last_payment_tx_hash, Some(TxHash::from("ABCD1234")));
	// one calendar month after the payment
	assert_eq!(paid.next_payment_date.month(), 3);
	assert_eq!(paid.next_payment_date.day(), 15);
}

#[tokio::test]
async fn funding_payment_does_not_advance_schedule() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Monthly)
		.await
		.unwrap();
	let next_before = ledger.subscription_by_id(&sub.id).unwrap().next_payment_date;

	ledger
		.record_payment(&sub.id, TxHash::from("FUND1"), PaymentKind::Funding)
		.await;

	let funded = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(funded.payment_history.len(), 1);
	assert_eq!(funded.payment_history[0].kind, PaymentKind::Funding);
	assert_eq!(funded.payment_history[0].amount, Decimal::ZERO);
	assert!(funded.last_payment_date.is_none());
	assert_eq!(funded.next_payment_date, next_before);
}

#[tokio::test]
async fn payment_history_only_grows_and_keeps_order() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();

	let mut seen = Vec::new();
	for (i, hash) in ["H1", "H2", "H3"].iter().enumerate() {
		ledger
			.record_payment(&sub.id, TxHash::from(*hash), PaymentKind::Subscription)
			.await;
		ledger.pause(&sub.id).await;
		ledger.resume(&sub.id).await;
		ledger
			.update_wallet_balance(&sub.id, Decimal::from(i as u32))
			.await;

		let history = &ledger.subscription_by_id(&sub.id).unwrap().payment_history;
		assert_eq!(history.len(), i + 1);
		seen.push(TxHash::from(*hash));
		let hashes: Vec<_> = history.iter().map(|r| r.tx_hash.clone()).collect();
		assert_eq!(hashes, seen);
	}
}

#[derive(Debug, Clone)]
enum LedgerOp {
	Record(u8),
	Pause,
	Resume,
	Cancel,
	SetBalance(u8),
}

fn ledger_op() -> impl proptest::strategy::Strategy<Value = LedgerOp> {
	use proptest::prelude::*;
	prop_oneof![
		any::<u8>().prop_map(LedgerOp::Record),
		Just(LedgerOp::Pause),
		Just(LedgerOp::Resume),
		Just(LedgerOp::Cancel),
		any::<u8>().prop_map(LedgerOp::SetBalance),
	]
}

proptest::proptest! {
	#![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]
	#[test]
	fn payment_history_append_only_under_arbitrary_ops(
		ops in proptest::collection::vec(ledger_op(), 1..40),
	) {
		use proptest::prelude::*;

		let rt = tokio::runtime::Builder::new_current_thread()
			.build()
			.unwrap();
		rt.block_on(async {
			let clock = fixed_clock();
			let mut ledger = ledger_at(&clock);
			ledger.sign_in(subscriber()).await.unwrap();
			let sub = ledger
				.create(creator(), Decimal::ONE, Frequency::Daily)
				.await
				.unwrap();

			let mut previous: Vec<TxHash> = Vec::new();
			for (i, op) in ops.into_iter().enumerate() {
				match op {
					LedgerOp::Record(seed) => {
						ledger
							.record_payment(
								&sub.id,
								TxHash::from(format!("H{i}_{seed}")),
								PaymentKind::Subscription,
							)
							.await;
					}
					LedgerOp::Pause => ledger.pause(&sub.id).await,
					LedgerOp::Resume => ledger.resume(&sub.id).await,
					LedgerOp::Cancel => ledger.cancel(&sub.id).await,
					LedgerOp::SetBalance(b) => {
						ledger.update_wallet_balance(&sub.id, Decimal::from(b)).await;
					}
				}

				let history: Vec<TxHash> = ledger
					.subscription_by_id(&sub.id)
					.unwrap()
					.payment_history
					.iter()
					.map(|r| r.tx_hash.clone())
					.collect();
				prop_assert!(history.len() >= previous.len());
				prop_assert_eq!(&history[..previous.len()], &previous[..]);
				previous = history;
			}
			Ok(())
		})?;
	}
}

#[tokio::test]
async fn wallet_subscription_with_lapsed_prepayment_is_due() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Monthly)
		.await
		.unwrap();

	// funded wallet, but prepaid only through yesterday
	ledger
		.update_payment_method(
			&sub.id,
			PaymentMethodDetails::Wallet {
				wallet_address: Address::from("rFundingWallet1111111111111111111"),
				balance: Some(Decimal::from(10)),
				prepaid_until: Some(clock.now() - Duration::days(1)),
			},
		)
		.await;

	let updated = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(updated.payment_method, PaymentMethod::Wallet);
	// the manual-method schedule field still lies in the future and is ignored
	assert!(updated.next_payment_date > clock.now());

	let due = ledger.due_subscriptions();
	assert_eq!(due.len(), 1);
	assert_eq!(due[0].id, sub.id);
}

#[tokio::test]
async fn escrow_subscription_with_lapsed_prepayment_is_due() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Monthly)
		.await
		.unwrap();

	ledger
		.update_payment_method(
			&sub.id,
			PaymentMethodDetails::Escrow {
				escrow_id: "escrow-1".to_string(),
				prepaid_until: Some(clock.now() - Duration::days(1)),
			},
		)
		.await;

	let due = ledger.due_subscriptions();
	assert_eq!(due.len(), 1);
	assert_eq!(due[0].id, sub.id);
	// the manual-method schedule field is irrelevant for escrow
	assert!(due[0].next_payment_date > clock.now());
}

#[tokio::test]
async fn switching_method_replaces_method_specific_fields() {
	let clock = fixed_clock();
	let mut ledger = ledger_at(&clock);
	ledger.sign_in(subscriber()).await.unwrap();
	let sub = ledger
		.create(creator(), Decimal::ONE, Frequency::Monthly)
		.await
		.unwrap();

	ledger
		.update_payment_method(
			&sub.id,
			PaymentMethodDetails::Wallet {
				wallet_address: Address::from("rWallet1"),
				balance: Some(Decimal::from(3)),
				prepaid_until: None,
			},
		)
		.await;
	ledger
		.update_payment_method(
			&sub.id,
			PaymentMethodDetails::Escrow {
				escrow_id: "escrow-1".to_string(),
				prepaid_until: Some(clock.now() + Duration::days(180)),
			},
		)
		.await;

	let escrowed = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(escrowed.payment_method, PaymentMethod::Escrow);
	assert!(escrowed.wallet_address.is_none());
	assert!(escrowed.wallet_balance.is_none());
	assert_eq!(escrowed.escrow_id.as_deref(), Some("escrow-1"));

	ledger
		.update_payment_method(&sub.id, PaymentMethodDetails::Manual)
		.await;
	let manual = ledger.subscription_by_id(&sub.id).unwrap();
	assert_eq!(manual.payment_method, PaymentMethod::Manual);
	assert!(manual.escrow_id.is_none());
	assert!(manual.prepaid_until.is_none());
}

#[tokio::test]
async fn switching_identity_switches_visible_collection() {
	let clock = fixed_clock();
	let store = Arc::new(InMemoryStore::new());
	let mut ledger =
		SubscriptionLedger::new(Arc::clone(&store) as _, Arc::clone(&clock) as Arc<dyn Clock>);

	ledger.sign_in(subscriber()).await.unwrap();
	ledger
		.create(creator(), Decimal::ONE, Frequency::Daily)
		.await
		.unwrap();
	assert_eq!(ledger.subscriptions().len(), 1);

	let other = Address::from("rOther111111111111111111111111111");
	ledger.sign_in(other.clone()).await.unwrap();
	assert_eq!(ledger.identity(), Some(&other));
	assert!(ledger.subscriptions().is_empty());

	// first identity's collection is intact on return
	ledger.sign_in(subscriber()).await.unwrap();
	assert_eq!(ledger.subscriptions().len(), 1);

	ledger.sign_out();
	assert!(ledger.identity().is_none());
	assert!(ledger.subscriptions().is_empty());
}
