//! Mock wallet-service executor for testing the PaymentExecutor trait.

use async_trait::async_trait;
use microstream_core::Address;
use microstream_payments::{PaymentError, PaymentExecutor, PaymentRequest, PaymentRequestStatus};
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use uuid::Uuid;

/// What a created request looked like, for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedRequest {
	pub request_id: String,
	pub destination: Address,
	pub amount_drops: u64,
	pub memo: Option<String>,
}

/// Mock wallet-service executor.
///
/// Stores created requests in memory and serves scripted status sequences:
/// each [`MockXummExecutor::push_status`] entry is returned once, in order,
/// after which the last pushed status repeats. Unscripted requests report a
/// pending status. Can be configured to fail the next call for testing
/// error paths.
pub struct MockXummExecutor {
	requests: RwLock<HashMap<String, CreatedRequest>>,
	statuses: RwLock<HashMap<String, VecDeque<PaymentRequestStatus>>>,
	last_status: RwLock<HashMap<String, PaymentRequestStatus>>,
	fail_next: RwLock<bool>,
}

impl MockXummExecutor {
	/// Creates an empty mock executor.
	pub fn new() -> Self {
		Self {
			requests: RwLock::new(HashMap::new()),
			statuses: RwLock::new(HashMap::new()),
			last_status: RwLock::new(HashMap::new()),
			fail_next: RwLock::new(false),
		}
	}

	/// Configures whether the next operation should fail.
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail;
	}

	/// Queues a status to be served for `request_id`, after any statuses
	/// queued earlier.
	pub async fn push_status(&self, request_id: &str, status: PaymentRequestStatus) {
		self.statuses
			.write()
			.await
			.entry(request_id.to_string())
			.or_default()
			.push_back(status);
	}

	/// Returns the created request for assertions.
	pub async fn created_request(&self, request_id: &str) -> Option<CreatedRequest> {
		self.requests.read().await.get(request_id).cloned()
	}

	/// Number of requests created so far.
	pub async fn request_count(&self) -> usize {
		self.requests.read().await.len()
	}

	/// Clears all stored requests and scripted statuses.
	pub async fn clear(&self) {
		self.requests.write().await.clear();
		self.statuses.write().await.clear();
		self.last_status.write().await.clear();
	}

	async fn take_fail_next(&self) -> bool {
		let mut fail_next = self.fail_next.write().await;
		std::mem::replace(&mut *fail_next, false)
	}
}

impl Default for MockXummExecutor {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl PaymentExecutor for MockXummExecutor {
	async fn create_payment_request(
		&self,
		destination: &Address,
		amount_drops: u64,
		memo: Option<String>,
	) -> Result<PaymentRequest, PaymentError> {
		if self.take_fail_next().await {
			return Err(PaymentError::Provider("Mock configured to fail".to_string()));
		}

		let request_id = format!("req_mock_{}", Uuid::new_v4());
		let request = PaymentRequest {
			request_id: request_id.clone(),
			qr_payload: format!("https://xumm.app/sign/mock/{request_id}_q.png"),
			deeplink: format!("https://xumm.app/sign/mock/{request_id}"),
		};

		self.requests.write().await.insert(
			request_id,
			CreatedRequest {
				request_id: request.request_id.clone(),
				destination: destination.clone(),
				amount_drops,
				memo,
			},
		);
		Ok(request)
	}

	async fn check_status(&self, request_id: &str) -> Result<PaymentRequestStatus, PaymentError> {
		if self.take_fail_next().await {
			return Err(PaymentError::Provider("Mock configured to fail".to_string()));
		}

		if !self.requests.read().await.contains_key(request_id)
			&& !self.statuses.read().await.contains_key(request_id)
		{
			return Err(PaymentError::RequestNotFound(request_id.to_string()));
		}

		if let Some(queue) = self.statuses.write().await.get_mut(request_id) {
			if let Some(status) = queue.pop_front() {
				self.last_status
					.write()
					.await
					.insert(request_id.to_string(), status.clone());
				return Ok(status);
			}
		}

		// queue drained: repeat the last scripted status, else pending
		Ok(self
			.last_status
			.read()
			.await
			.get(request_id)
			.cloned()
			.unwrap_or_default())
	}
}
