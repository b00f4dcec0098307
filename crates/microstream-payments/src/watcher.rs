//! Payment reconciliation watcher.
//!
//! After a payment request is created the wallet confirms (or cancels) it
//! out of band; the watcher polls the executor until one of the terminal
//! outcomes arrives. The poll task is an explicit, cancellable handle with a
//! bounded overall timeout; transient poll failures retry with exponential
//! backoff instead of hammering the provider at a flat interval.
//!
//! The watcher never mutates the subscription ledger. On a
//! [`WatchOutcome::Signed`] outcome the caller records the payment through
//! `SubscriptionLedger::record_payment`.

use crate::executor::PaymentExecutor;
use microstream_core::TxHash;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Watcher timing configuration.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
	/// Interval between status polls
	pub poll_interval: Duration,
	/// Pause between observing a signed request and resolving, so a result
	/// screen can render. Cosmetic only.
	pub display_delay: Duration,
	/// Overall bound on the watch; an abandoned request stops polling here
	pub timeout: Duration,
	/// Backoff cap for transient poll failures
	pub max_backoff: Duration,
}

impl Default for WatcherConfig {
	fn default() -> Self {
		Self {
			poll_interval: Duration::from_secs(2),
			display_delay: Duration::from_secs(2),
			timeout: Duration::from_secs(600),
			max_backoff: Duration::from_secs(30),
		}
	}
}

/// Terminal outcome of a watched payment request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOutcome {
	/// Signed and settled; the hash identifies the ledger transaction
	Signed(TxHash),
	/// Cancelled in the wallet by the subscriber
	Cancelled,
	/// Dismissed locally through [`WatchHandle::cancel`]
	Dismissed,
	/// No terminal status within the configured timeout
	TimedOut,
}

/// Watch failures.
#[derive(Debug, Error)]
pub enum WatchError {
	/// The poll task was aborted before resolving
	#[error("Payment watch aborted")]
	Aborted,
}

/// Handle to a running watch. Dropping the handle aborts the poll task;
/// [`WatchHandle::cancel`] resolves it as [`WatchOutcome::Dismissed`].
pub struct WatchHandle {
	cancel_tx: watch::Sender<bool>,
	task: Option<JoinHandle<WatchOutcome>>,
}

impl WatchHandle {
	/// Dismisses the watch, the programmatic analogue of closing the
	/// payment modal. Idempotent.
	pub fn cancel(&self) {
		let _ = self.cancel_tx.send(true);
	}

	/// Waits for the terminal outcome.
	pub async fn outcome(mut self) -> Result<WatchOutcome, WatchError> {
		let Some(task) = self.task.take() else {
			return Err(WatchError::Aborted);
		};
		task.await.map_err(|_| WatchError::Aborted)
	}
}

impl Drop for WatchHandle {
	fn drop(&mut self) {
		if let Some(task) = &self.task {
			task.abort();
		}
	}
}

/// Spawns reconciliation watches over a payment executor.
#[derive(Clone)]
pub struct PaymentWatcher {
	executor: Arc<dyn PaymentExecutor>,
	config: WatcherConfig,
}

impl PaymentWatcher {
	pub fn new(executor: Arc<dyn PaymentExecutor>) -> Self {
		Self::with_config(executor, WatcherConfig::default())
	}

	pub fn with_config(executor: Arc<dyn PaymentExecutor>, config: WatcherConfig) -> Self {
		Self { executor, config }
	}

	/// Starts polling `request_id` and returns the handle controlling the
	/// watch.
	pub fn watch(&self, request_id: impl Into<String>) -> WatchHandle {
		let (cancel_tx, cancel_rx) = watch::channel(false);
		let task = tokio::spawn(poll_until_terminal(
			Arc::clone(&self.executor),
			request_id.into(),
			self.config.clone(),
			cancel_rx,
		));
		WatchHandle {
			cancel_tx,
			task: Some(task),
		}
	}
}

async fn poll_until_terminal(
	executor: Arc<dyn PaymentExecutor>,
	request_id: String,
	config: WatcherConfig,
	mut cancel_rx: watch::Receiver<bool>,
) -> WatchOutcome {
	let deadline = tokio::time::Instant::now() + config.timeout;
	let mut delay = config.poll_interval;

	loop {
		tokio::select! {
			_ = cancel_rx.changed() => {
				debug!(%request_id, "payment watch dismissed");
				return WatchOutcome::Dismissed;
			}
			_ = tokio::time::sleep_until(deadline) => {
				warn!(%request_id, timeout_secs = config.timeout.as_secs(), "payment watch timed out");
				return WatchOutcome::TimedOut;
			}
			_ = tokio::time::sleep(delay) => {}
		}

		match executor.check_status(&request_id).await {
			Ok(status) if status.cancelled => {
				debug!(%request_id, "payment request cancelled in wallet");
				return WatchOutcome::Cancelled;
			}
			Ok(status) => {
				if status.signed {
					if let Some(tx_hash) = status.tx_hash {
						debug!(%request_id, tx_hash = %tx_hash, "payment request signed");
						tokio::time::sleep(config.display_delay).await;
						return WatchOutcome::Signed(tx_hash);
					}
					// signed but not yet settled, keep polling for the hash
				}
				delay = config.poll_interval;
			}
			Err(err) => {
				// transient: keep polling, back off
				warn!(%request_id, error = %err, "payment status poll failed");
				delay = (delay * 2).min(config.max_backoff);
			}
		}
	}
}
