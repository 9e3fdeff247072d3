use std::{fmt::Display, future::Future, time::Duration};

use tokio::time;

const MAX_BACKOFF_EXPONENT: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
	pub max_retries: u32,
	pub retry_delay_ms: u64,
}
impl RetryPolicy {
	/// `retry_delay_ms * 2^attempt`, with `attempt` zero-based.
	pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
		let exp = attempt.min(MAX_BACKOFF_EXPONENT);

		Duration::from_millis(self.retry_delay_ms.saturating_mul(1_u64 << exp))
	}

	pub fn max_attempts(&self) -> u32 {
		self.max_retries.saturating_add(1)
	}
}

/// Runs `op` until it succeeds, `is_retryable` rejects the error, or the retry
/// budget is spent. The last error is returned as-is.
pub async fn run<T, E, F, Fut, R>(
	policy: RetryPolicy,
	operation: &str,
	mut op: F,
	is_retryable: R,
) -> Result<T, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, E>>,
	R: Fn(&E) -> bool,
	E: Display,
{
	let mut attempt = 0_u32;

	loop {
		let err = match op().await {
			Ok(value) => return Ok(value),
			Err(err) => err,
		};

		if attempt + 1 >= policy.max_attempts() {
			tracing::warn!(op = operation, attempts = attempt + 1, error = %err, "Retry budget exhausted.");

			return Err(err);
		}
		if !is_retryable(&err) {
			tracing::debug!(op = operation, error = %err, "Error is not retryable.");

			return Err(err);
		}

		let delay = policy.delay_for_attempt(attempt);

		tracing::warn!(
			op = operation,
			attempt = attempt + 1,
			delay_ms = delay.as_millis() as u64,
			error = %err,
			"Remote call failed, retrying."
		);

		time::sleep(delay).await;

		attempt += 1;
	}
}
