pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

pub use registry::{RegistryConfig, SourceEntry, SourceRegistry};

use crate::domain::Path;
use async_trait::async_trait;
use ethers::types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Why a source could not quote a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum QuoteFailure {
    /// Pool for some segment does not exist or has no reserves
    #[error("no liquidity")]
    NoLiquidity,

    /// Source-side computation failed
    #[error("reverted: {0}")]
    Reverted(String),

    /// Source did not answer within the quote timeout
    #[error("timed out")]
    Timeout,

    /// Source could not be reached at all
    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Outcome of a single quote request
pub type QuoteResult = std::result::Result<U256, QuoteFailure>;

/// Why a source could not complete a swap
///
/// A failed swap transfers nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ExecutionFailure {
    #[error("output {received} below minimum {minimum}")]
    InsufficientOutput { received: U256, minimum: U256 },

    #[error("reverted: {0}")]
    Reverted(String),

    #[error("unreachable: {0}")]
    Unreachable(String),
}

/// Quoting and swapping capability of one liquidity venue (a DEX router)
///
/// Multi-hop paths are quoted and swapped entirely within the venue's own
/// pools. A swap is atomic: the full path settles with at least
/// `min_amount_out`, or nothing moves.
#[async_trait]
pub trait LiquiditySource: Send + Sync {
    /// Output amount for selling `amount_in` along `path`
    async fn quote(&self, path: &Path, amount_in: U256) -> QuoteResult;

    /// Sells `amount_in` along `path`, returning the received output
    async fn swap(
        &self,
        path: &Path,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> std::result::Result<U256, ExecutionFailure>;
}

/// Stable identifier of a liquidity source
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(pub String);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SourceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Registered liquidity source
#[derive(Clone)]
pub struct Source {
    pub id: SourceId,
    pub display_name: String,
    pub capability: Arc<dyn LiquiditySource>,
}

impl Source {
    pub fn new(
        id: impl Into<SourceId>,
        display_name: impl Into<String>,
        capability: Arc<dyn LiquiditySource>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            capability,
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
