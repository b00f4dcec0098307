//! # MicroStream Core
//!
//! Shared primitives for the MicroStream subscription engine: opaque ledger
//! identifiers, XRP currency handling, and the injectable clock capability.

pub mod clock;
pub mod currency;
mod ids;

pub use clock::{Clock, ManualClock, SystemClock};
pub use currency::{CurrencyError, DROPS_PER_XRP, xrp_to_drops};
pub use ids::{Address, TxHash};
