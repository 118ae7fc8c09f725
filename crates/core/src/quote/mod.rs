use crate::domain::Path;
use crate::sources::{QuoteFailure, QuoteResult, Source};
use ethers::types::U256;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Issues bounded quote requests and normalizes their outcome
#[derive(Debug, Clone, Copy)]
pub struct QuoteFetcher {
    timeout: Duration,
}

impl QuoteFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Quotes `path` on `source`, never failing outright
    ///
    /// A call that outlives the timeout is dropped and reported as
    /// `Timeout`. A zero-output quote means an empty pool.
    pub async fn fetch_quote(&self, source: &Source, path: &Path, amount_in: U256) -> QuoteResult {
        let result = match timeout(self.timeout, source.capability.quote(path, amount_in)).await {
            Ok(result) => result,
            Err(_) => Err(QuoteFailure::Timeout),
        };

        let result = match result {
            Ok(amount_out) if amount_out.is_zero() => Err(QuoteFailure::NoLiquidity),
            other => other,
        };

        debug!(
            source = %source.id,
            path = %path,
            "quote: {:?}",
            result
        );

        result
    }
}
