use super::paths::candidate_paths;
use super::selection::{select_best, QuoteOutcome};
use super::{Route, RoutingConfig};
use crate::domain::{time_until, unix_now, SwapRequest};
use crate::quote::QuoteFetcher;
use crate::sources::{QuoteFailure, SourceRegistry};
use crate::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Finds the best-output route across all registered sources
pub struct RouteSearchEngine {
    registry: Arc<SourceRegistry>,
    fetcher: QuoteFetcher,
    config: RoutingConfig,
}

impl RouteSearchEngine {
    pub fn new(registry: Arc<SourceRegistry>, config: RoutingConfig) -> Self {
        Self {
            registry,
            fetcher: QuoteFetcher::new(config.quote_timeout()),
            config,
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Quotes every (source, path) pair concurrently and returns the best route
    ///
    /// Sources that fail or time out only shrink the candidate set. If the
    /// request deadline passes before every quote settles, the outstanding
    /// quotes are aborted and the request fails with `DeadlineExceeded`.
    pub async fn find_best_route(&self, request: SwapRequest) -> Result<Route> {
        request
            .validate(unix_now())
            .map_err(Error::InvalidRequest)?;

        info!(
            "Finding route: {} -> {}, amount: {}",
            request.token_in, request.token_out, request.amount_in
        );

        let paths = candidate_paths(
            &request.token_in,
            &request.token_out,
            self.registry.bridge_tokens(),
        );

        let mut tasks = JoinSet::new();
        for (source_index, source) in self.registry.sources().iter().enumerate() {
            for (path_index, path) in paths.iter().enumerate() {
                let source = source.clone();
                let path = path.clone();
                let fetcher = self.fetcher;
                let amount_in = request.amount_in;

                tasks.spawn(async move {
                    let result = fetcher.fetch_quote(&source, &path, amount_in).await;
                    QuoteOutcome {
                        source,
                        source_index,
                        path,
                        path_index,
                        result,
                    }
                });
            }
        }

        let pending = tasks.len();
        debug!("Issued {} quote requests over {} paths", pending, paths.len());

        let joined = timeout(
            time_until(request.deadline),
            collect_outcomes(&mut tasks, pending),
        )
        .await;

        let mut outcomes = match joined {
            Ok(outcomes) => outcomes,
            Err(_) => {
                tasks.abort_all();
                warn!(
                    "Deadline {} reached with {} quotes outstanding",
                    request.deadline,
                    tasks.len()
                );
                return Err(Error::DeadlineExceeded(format!(
                    "deadline {} passed while quoting",
                    request.deadline
                )));
            }
        };

        // A task that panicked left no outcome; report its pair as degraded
        if outcomes.len() < pending {
            let settled: HashSet<(usize, usize)> = outcomes
                .iter()
                .map(|o| (o.source_index, o.path_index))
                .collect();
            for (source_index, source) in self.registry.sources().iter().enumerate() {
                for (path_index, path) in paths.iter().enumerate() {
                    if !settled.contains(&(source_index, path_index)) {
                        outcomes.push(QuoteOutcome {
                            source: source.clone(),
                            source_index,
                            path: path.clone(),
                            path_index,
                            result: Err(QuoteFailure::Reverted("quote task failed".into())),
                        });
                    }
                }
            }
        }

        let selection = select_best(outcomes, &self.config);

        let Some(best) = selection.best else {
            return Err(Error::NoRouteFound(format!(
                "{} -> {}: {} candidates quoted, {} sources degraded",
                request.token_in,
                request.token_out,
                pending,
                selection.degradations.len()
            )));
        };

        if best.amount_out < request.min_output_amount {
            return Err(Error::SlippageExceeded {
                best: best.amount_out,
                minimum: request.min_output_amount,
            });
        }

        info!(
            "Best route: {} via {} ({} hops), output: {}, viable: {}, degraded: {}",
            best.source.display_name,
            best.path,
            best.path.hops(),
            best.amount_out,
            selection.viable,
            selection.degradations.len()
        );

        Ok(Route::new(best, request, selection.degradations))
    }
}

/// Waits for every quote task to reach a terminal state
async fn collect_outcomes(
    tasks: &mut JoinSet<QuoteOutcome>,
    capacity: usize,
) -> Vec<QuoteOutcome> {
    let mut outcomes = Vec::with_capacity(capacity);
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => warn!("Quote task failed: {}", e),
        }
    }
    outcomes
}
