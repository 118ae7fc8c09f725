use crate::domain::SwapRequest;
use crate::routing::{Route, RouteSearchEngine, RoutingConfig};
use crate::settlement::{ExecutionOrchestrator, ExecutionReceipt};
use crate::sources::SourceRegistry;
use async_trait::async_trait;
use std::sync::Arc;

/// Quote-then-execute entry point for exact-input swaps
#[async_trait]
pub trait SwapRouter: Send + Sync {
    /// Finds the best route for a request without moving funds
    async fn find_best_route(&self, request: SwapRequest) -> crate::Result<Route>;

    /// Settles a route returned by [`SwapRouter::find_best_route`]
    async fn execute(&self, route: Route) -> crate::Result<ExecutionReceipt>;

    /// Finds the best route and executes it immediately
    async fn swap(&self, request: SwapRequest) -> crate::Result<ExecutionReceipt> {
        let route = self.find_best_route(request).await?;
        self.execute(route).await
    }

    /// Returns router name
    fn name(&self) -> &str;
}

/// Router over a fixed registry of DEX sources
pub struct Router {
    name: String,
    engine: RouteSearchEngine,
    orchestrator: ExecutionOrchestrator,
}

impl Router {
    pub fn new(registry: Arc<SourceRegistry>, config: RoutingConfig) -> Self {
        Self {
            name: "PortifyRouter".to_string(),
            engine: RouteSearchEngine::new(registry, config),
            orchestrator: ExecutionOrchestrator::new(),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        self.engine.registry()
    }

    pub fn config(&self) -> &RoutingConfig {
        self.engine.config()
    }
}

#[async_trait]
impl SwapRouter for Router {
    async fn find_best_route(&self, request: SwapRequest) -> crate::Result<Route> {
        self.engine.find_best_route(request).await
    }

    async fn execute(&self, route: Route) -> crate::Result<ExecutionReceipt> {
        self.orchestrator.execute(route).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
