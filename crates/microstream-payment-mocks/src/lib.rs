//! Mock implementations for testing the MicroStream payment flow.

mod xumm_executor;

pub use xumm_executor::{CreatedRequest, MockXummExecutor};
