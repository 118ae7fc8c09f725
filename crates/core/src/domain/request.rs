use super::tokens::Token;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Exact-input swap request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwapRequest {
    /// Token to sell
    pub token_in: Token,

    /// Token to buy
    pub token_out: Token,

    /// Exact amount of `token_in` to sell
    pub amount_in: U256,

    /// Smallest acceptable amount of `token_out`
    pub min_output_amount: U256,

    /// Unix timestamp (seconds) after which the swap must not happen
    pub deadline: u64,
}

impl SwapRequest {
    pub fn new(
        token_in: Token,
        token_out: Token,
        amount_in: U256,
        min_output_amount: U256,
        deadline: u64,
    ) -> Self {
        Self {
            token_in,
            token_out,
            amount_in,
            min_output_amount,
            deadline,
        }
    }

    /// Validates request parameters against the current time
    pub fn validate(&self, now: u64) -> Result<(), String> {
        if self.token_in == self.token_out {
            return Err("Input and output tokens must be different".to_string());
        }

        if self.amount_in.is_zero() {
            return Err("Input amount must be greater than zero".to_string());
        }

        if is_expired(self.deadline, now) {
            return Err(format!(
                "Deadline {} is not in the future (now {})",
                self.deadline, now
            ));
        }

        Ok(())
    }
}

/// Current unix time in seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// A deadline is expired once the clock reaches it
pub fn is_expired(deadline: u64, now: u64) -> bool {
    now >= deadline
}

/// Wall-clock time left before `deadline`, zero when already passed
pub fn time_until(deadline: u64) -> Duration {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    Duration::from_secs(deadline).saturating_sub(now)
}
