//! Scriptable in-memory liquidity source for tests

use super::{ExecutionFailure, LiquiditySource, QuoteFailure, QuoteResult};
use crate::domain::Path;
use async_trait::async_trait;
use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct SwapCall {
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub min_amount_out: U256,
    pub deadline: u64,
}

/// Paths without a scripted quote report `NoLiquidity`. Swaps return the
/// scripted swap output, falling back to the scripted quote.
#[derive(Debug, Default)]
pub(crate) struct MockSource {
    quotes: HashMap<Vec<Address>, QuoteResult>,
    swaps: HashMap<Vec<Address>, Result<U256, ExecutionFailure>>,
    delay: Option<Duration>,
    ignore_minimum: bool,
    panic_on_quote: bool,
    quote_calls: Arc<AtomicUsize>,
    swap_calls: Arc<Mutex<Vec<SwapCall>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quote(mut self, path: &[Address], result: QuoteResult) -> Self {
        self.quotes.insert(path.to_vec(), result);
        self
    }

    pub fn amount(self, path: &[Address], amount_out: u64) -> Self {
        self.quote(path, Ok(U256::from(amount_out)))
    }

    pub fn swap_result(mut self, path: &[Address], result: Result<U256, ExecutionFailure>) -> Self {
        self.swaps.insert(path.to_vec(), result);
        self
    }

    /// Every quote sleeps this long before answering
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Swaps report their output even when it is below the minimum
    pub fn ignoring_minimum(mut self) -> Self {
        self.ignore_minimum = true;
        self
    }

    /// Every quote panics
    pub fn panicking(mut self) -> Self {
        self.panic_on_quote = true;
        self
    }

    pub fn quote_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.quote_calls)
    }

    pub fn swap_log(&self) -> Arc<Mutex<Vec<SwapCall>>> {
        Arc::clone(&self.swap_calls)
    }
}

#[async_trait]
impl LiquiditySource for MockSource {
    async fn quote(&self, path: &Path, _amount_in: U256) -> QuoteResult {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_quote {
            panic!("quote handler crashed");
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.quotes
            .get(&path.addresses())
            .cloned()
            .unwrap_or(Err(QuoteFailure::NoLiquidity))
    }

    async fn swap(
        &self,
        path: &Path,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<U256, ExecutionFailure> {
        self.swap_calls.lock().unwrap().push(SwapCall {
            path: path.addresses(),
            amount_in,
            min_amount_out,
            deadline,
        });

        let key = path.addresses();
        let result = match self.swaps.get(&key) {
            Some(result) => result.clone(),
            None => match self.quotes.get(&key) {
                Some(Ok(amount)) => Ok(*amount),
                _ => Err(ExecutionFailure::Reverted("no pool".into())),
            },
        };

        match result {
            Ok(received) if received < min_amount_out && !self.ignore_minimum => {
                Err(ExecutionFailure::InsufficientOutput {
                    received,
                    minimum: min_amount_out,
                })
            }
            other => other,
        }
    }
}
