pub mod engine;
pub mod paths;
pub mod selection;

pub use engine::RouteSearchEngine;

use crate::domain::{Path, SwapRequest};
use crate::sources::{QuoteFailure, Source, SourceId};
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Route search configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Per-quote timeout in milliseconds
    pub quote_timeout_ms: u64,

    /// Fixed gas overhead of a swap transaction
    pub base_swap_gas: u64,

    /// Additional gas per pool hop
    pub gas_per_hop: u64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            quote_timeout_ms: 2000,
            base_swap_gas: 21_000,
            gas_per_hop: 90_000,
        }
    }
}

impl RoutingConfig {
    pub fn quote_timeout(&self) -> Duration {
        Duration::from_millis(self.quote_timeout_ms)
    }

    /// Estimated gas for swapping along `path`
    pub fn estimate_gas(&self, path: &Path) -> u64 {
        self.gas_per_hop
            .saturating_mul(path.hops() as u64)
            .saturating_add(self.base_swap_gas)
    }
}

/// One quoted (source, path) combination
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Quoting source
    pub source: Source,

    /// Position of `source` in the registry
    pub source_index: usize,

    /// Position of `path` in candidate enumeration order
    pub path_index: usize,

    pub path: Path,

    /// Quoted output amount
    pub amount_out: U256,

    /// Estimated gas cost
    pub estimated_cost: u64,
}

/// A source that could not quote a path for reasons other than missing liquidity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Degradation {
    pub source_id: SourceId,
    pub path: Path,
    pub failure: QuoteFailure,
}

/// Winning candidate committed for execution
///
/// Only the search engine creates routes, so every execution follows a
/// fresh quote.
#[derive(Debug)]
pub struct Route {
    candidate: Candidate,
    request: SwapRequest,
    degradations: Vec<Degradation>,
}

impl Route {
    pub(crate) fn new(
        candidate: Candidate,
        request: SwapRequest,
        degradations: Vec<Degradation>,
    ) -> Self {
        Self {
            candidate,
            request,
            degradations,
        }
    }

    pub fn source(&self) -> &Source {
        &self.candidate.source
    }

    pub fn path(&self) -> &Path {
        &self.candidate.path
    }

    /// Quoted output at selection time
    pub fn amount_out(&self) -> U256 {
        self.candidate.amount_out
    }

    pub fn amount_in(&self) -> U256 {
        self.request.amount_in
    }

    pub fn min_output_amount(&self) -> U256 {
        self.request.min_output_amount
    }

    pub fn deadline(&self) -> u64 {
        self.request.deadline
    }

    pub fn estimated_cost(&self) -> u64 {
        self.candidate.estimated_cost
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn request(&self) -> &SwapRequest {
        &self.request
    }

    /// Sources that failed to quote while this route was searched
    pub fn degradations(&self) -> &[Degradation] {
        &self.degradations
    }
}
