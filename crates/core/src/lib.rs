pub mod domain;
pub mod math;
pub mod quote;
pub mod router;
pub mod routing;
pub mod settlement;
pub mod sources;

pub use domain::{ChainId, Path, SwapRequest, Token};
pub use router::{Router, SwapRouter};
pub use routing::{Route, RouteSearchEngine, RoutingConfig};
pub use settlement::{ExecutionOrchestrator, ExecutionReceipt};
pub use sources::{
    ExecutionFailure, LiquiditySource, QuoteFailure, QuoteResult, RegistryConfig, Source,
    SourceEntry, SourceId, SourceRegistry,
};

use ethers::types::U256;

/// Core result type for router operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No route found: {0}")]
    NoRouteFound(String),

    #[error("Slippage exceeded: best output {best} is below minimum {minimum}")]
    SlippageExceeded { best: U256, minimum: U256 },

    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    #[error("Execution failed on {source_id}: {failure}")]
    ExecutionFailed {
        source_id: SourceId,
        failure: ExecutionFailure,
    },
}
