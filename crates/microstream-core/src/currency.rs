//! XRP currency handling.
//!
//! Subscription amounts are exact decimals in XRP; the payment executor
//! speaks drops, the smallest indivisible ledger unit.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// Number of drops in one XRP.
pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Currency conversion errors.
#[derive(Debug, Error)]
pub enum CurrencyError {
	/// Amount must be strictly positive
	#[error("Amount must be positive: {0}")]
	NonPositiveAmount(Decimal),

	/// Amount too large to express in drops
	#[error("Amount out of range: {0} XRP")]
	OutOfRange(Decimal),
}

/// Converts an XRP amount to drops.
///
/// Sub-drop remainders are truncated toward zero; amounts of zero or less
/// are rejected.
///
/// # Example
///
/// ```
/// use microstream_core::xrp_to_drops;
/// use rust_decimal::Decimal;
///
/// let drops = xrp_to_drops(Decimal::new(15, 1)).unwrap(); // 1.5 XRP
/// assert_eq!(drops, 1_500_000);
/// ```
pub fn xrp_to_drops(amount: Decimal) -> Result<u64, CurrencyError> {
	if amount <= Decimal::ZERO {
		return Err(CurrencyError::NonPositiveAmount(amount));
	}

	let drops = (amount * Decimal::from(DROPS_PER_XRP)).trunc();
	drops.to_u64().ok_or(CurrencyError::OutOfRange(amount))
}
