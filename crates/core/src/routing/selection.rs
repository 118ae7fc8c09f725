use super::{Candidate, Degradation, RoutingConfig};
use crate::domain::Path;
use crate::sources::{QuoteFailure, QuoteResult, Source};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Terminal result of one (source, path) quote task
#[derive(Debug, Clone)]
pub struct QuoteOutcome {
    pub source: Source,
    pub source_index: usize,
    pub path: Path,
    pub path_index: usize,
    pub result: QuoteResult,
}

/// Reduced view over all quote outcomes of a request
#[derive(Debug, Default)]
pub struct Selection {
    pub best: Option<Candidate>,
    pub degradations: Vec<Degradation>,
    /// All candidates that produced a quote
    pub viable: usize,
}

/// Orders candidates so that the preferred one compares greatest
///
/// Higher output wins; on equal output the earlier-registered source, then
/// the shorter path, then the earlier enumerated path wins.
pub fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.amount_out
        .cmp(&b.amount_out)
        .then_with(|| b.source_index.cmp(&a.source_index))
        .then_with(|| b.path.len().cmp(&a.path.len()))
        .then_with(|| b.path_index.cmp(&a.path_index))
}

/// Picks the best candidate, recording non-liquidity failures as degradations
pub fn select_best(outcomes: Vec<QuoteOutcome>, config: &RoutingConfig) -> Selection {
    let mut selection = Selection::default();

    for outcome in outcomes {
        match outcome.result {
            Ok(amount_out) => {
                let candidate = Candidate {
                    estimated_cost: config.estimate_gas(&outcome.path),
                    source: outcome.source,
                    source_index: outcome.source_index,
                    path_index: outcome.path_index,
                    path: outcome.path,
                    amount_out,
                };
                selection.viable += 1;

                let replace = match &selection.best {
                    Some(best) => compare_candidates(&candidate, best) == Ordering::Greater,
                    None => true,
                };
                if replace {
                    selection.best = Some(candidate);
                }
            }
            Err(QuoteFailure::NoLiquidity) => {
                debug!(source = %outcome.source.id, path = %outcome.path, "no liquidity");
            }
            Err(failure) => {
                warn!(
                    source = %outcome.source.id,
                    path = %outcome.path,
                    "source degraded: {}",
                    failure
                );
                selection.degradations.push(Degradation {
                    source_id: outcome.source.id,
                    path: outcome.path,
                    failure,
                });
            }
        }
    }

    selection
}
