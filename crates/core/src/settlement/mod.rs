use crate::domain::{is_expired, unix_now};
use crate::math::shortfall_bps;
use crate::routing::Route;
use crate::sources::{ExecutionFailure, SourceId};
use crate::{Error, Result};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Record of a settled swap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutionReceipt {
    /// Source the swap settled on
    pub source_id: SourceId,

    /// Token addresses the swap travelled through
    pub path_tokens: Vec<Address>,

    /// Amount sold
    pub amount_in: U256,

    /// Amount received
    pub amount_out: U256,
}

/// Settles a selected route as a single all-or-nothing swap
#[derive(Debug, Default, Clone, Copy)]
pub struct ExecutionOrchestrator;

impl ExecutionOrchestrator {
    pub fn new() -> Self {
        Self
    }

    /// Executes `route` against its winning source
    ///
    /// The route is consumed: a failed execution needs a fresh quote. Failed
    /// swaps are reported and never retried.
    pub async fn execute(&self, route: Route) -> Result<ExecutionReceipt> {
        let now = unix_now();
        if is_expired(route.deadline(), now) {
            return Err(Error::DeadlineExceeded(format!(
                "deadline {} passed before execution (now {})",
                route.deadline(),
                now
            )));
        }

        let source = route.source();
        let minimum = route.min_output_amount();

        info!(
            "Executing swap on {}: {} in via {}, minimum out {}",
            source.display_name,
            route.amount_in(),
            route.path(),
            minimum
        );

        let outcome = source
            .capability
            .swap(route.path(), route.amount_in(), minimum, route.deadline())
            .await;

        let amount_out = match outcome {
            Ok(received) if received < minimum => {
                Err(ExecutionFailure::InsufficientOutput { received, minimum })
            }
            other => other,
        }
        .map_err(|failure| {
            warn!("Swap on {} failed: {}", source.display_name, failure);
            Error::ExecutionFailed {
                source_id: source.id.clone(),
                failure,
            }
        })?;

        if amount_out < route.amount_out() {
            info!(
                "Swap settled {} bps below quote: quoted {}, received {}",
                shortfall_bps(route.amount_out(), amount_out),
                route.amount_out(),
                amount_out
            );
        }

        Ok(ExecutionReceipt {
            source_id: source.id.clone(),
            path_tokens: route.path().addresses(),
            amount_in: route.amount_in(),
            amount_out,
        })
    }
}
