//! Due-date and refund-need computation.
//!
//! Pure functions over a subscription and an instant, no side effects. The
//! ledger calls these on every transition; callers wanting ad-hoc queries
//! can use them directly.

use crate::model::{Frequency, PaymentMethod, Subscription};
use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;

/// Weeks per month used for the monthly-equivalent conversion (~4.33).
fn weeks_per_month() -> Decimal {
	Decimal::new(433, 2)
}

/// Adds exactly one billing period to `base`.
///
/// Monthly uses calendar month arithmetic: the day-of-month is preserved,
/// clamped to the last day of shorter target months (Jan 31 + 1 month =
/// Feb 28/29).
///
/// # Example
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use microstream_subscriptions::schedule::next_payment_date;
/// use microstream_subscriptions::Frequency;
///
/// let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
/// assert_eq!(next_payment_date(base, Frequency::Daily), base + Duration::days(1));
/// assert_eq!(next_payment_date(base, Frequency::Weekly), base + Duration::days(7));
/// ```
pub fn next_payment_date(base: DateTime<Utc>, frequency: Frequency) -> DateTime<Utc> {
	match frequency {
		Frequency::Daily => base + Duration::days(1),
		Frequency::Weekly => base + Duration::days(7),
		Frequency::Monthly => base
			.checked_add_months(Months::new(1))
			// only reachable at the far end of the chrono date range
			.unwrap_or(base + Duration::days(30)),
	}
}

/// The next payment date a subscription's schedule currently implies:
/// one period after the most recent payment, or after the start date if
/// nothing has been charged yet.
pub fn next_payment_date_for(subscription: &Subscription) -> DateTime<Utc> {
	next_payment_date(subscription.schedule_base(), subscription.frequency)
}

/// Whether a subscription requires subscriber action at `now`.
///
/// Exactly one rule applies, selected by the current payment method:
///
/// - `Manual`: the next payment date has passed.
/// - `Wallet`/`Escrow`: the prepaid period has lapsed, or the funding wallet
///   no longer covers one cycle.
///
/// Method-specific fields left behind by an earlier method change are inert;
/// only the current method's rule is consulted. Non-active subscriptions are
/// never due.
pub fn is_due(subscription: &Subscription, now: DateTime<Utc>) -> bool {
	if !subscription.is_active() {
		return false;
	}

	match subscription.payment_method {
		PaymentMethod::Manual => subscription.next_payment_date <= now,
		PaymentMethod::Wallet | PaymentMethod::Escrow => {
			let prepaid_lapsed = subscription
				.prepaid_until
				.is_some_and(|until| until <= now);
			let balance_short = subscription
				.wallet_balance
				.is_some_and(|balance| balance < subscription.amount);
			prepaid_lapsed || balance_short
		}
	}
}

/// Converts a per-cycle amount to its monthly equivalent: daily ×30,
/// weekly ×4.33, monthly ×1. Used to size prepayments, never stored.
pub fn monthly_equivalent(amount: Decimal, frequency: Frequency) -> Decimal {
	match frequency {
		Frequency::Daily => amount * Decimal::from(30),
		Frequency::Weekly => amount * weeks_per_month(),
		Frequency::Monthly => amount,
	}
}

/// Sizes the first funding payment when a payment method is selected:
/// 3 months of coverage for the subscription wallet, 6 for escrow, nothing
/// for manual approval.
pub fn prepay_amount(amount: Decimal, frequency: Frequency, method: PaymentMethod) -> Decimal {
	let months = match method {
		PaymentMethod::Manual => return Decimal::ZERO,
		PaymentMethod::Wallet => Decimal::from(3),
		PaymentMethod::Escrow => Decimal::from(6),
	};
	monthly_equivalent(amount, frequency) * months
}
