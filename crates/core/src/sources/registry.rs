use super::{LiquiditySource, Source, SourceId};
use crate::domain::Token;
use crate::{Error, Result};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Deployment-shaped registry configuration
///
/// Mirrors the router constructor `(routers, names, WETH, bridge_tokens)`:
/// `routers[i]` is registered under display name `names[i]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// DEX router addresses, in tie-break order
    pub routers: Vec<Address>,

    /// Display name per router
    pub names: Vec<String>,

    /// Wrapped native token (e.g. WBNB)
    pub weth: Address,

    /// Tokens allowed as intermediate hops
    pub bridge_tokens: Vec<Address>,
}

/// One router entry handed to the capability factory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub id: SourceId,
    pub name: String,
    pub router: Address,
}

/// Read-only table of liquidity sources and hop tokens
#[derive(Debug)]
pub struct SourceRegistry {
    sources: Vec<Source>,
    bridge_tokens: Vec<Token>,
    wrapped_native: Token,
}

impl SourceRegistry {
    /// Builds a registry, rejecting duplicate ids and an unusable bridge set
    pub fn new(
        sources: Vec<Source>,
        wrapped_native: Token,
        bridge_tokens: Vec<Token>,
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::ConfigError(
                "at least one liquidity source is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(&source.id) {
                return Err(Error::ConfigError(format!("duplicate source id: {}", source.id)));
            }
        }

        // Keep first occurrence so enumeration order follows configuration
        let mut unique = HashSet::new();
        let bridge_tokens: Vec<Token> = bridge_tokens
            .into_iter()
            .filter(|t| unique.insert(t.address))
            .collect();

        if bridge_tokens.is_empty() {
            return Err(Error::ConfigError("bridge token set is empty".into()));
        }

        if !bridge_tokens.contains(&wrapped_native) {
            return Err(Error::ConfigError(format!(
                "wrapped native token {:?} is not a bridge token",
                wrapped_native.address
            )));
        }

        info!(
            "Source registry loaded: {} sources, {} bridge tokens",
            sources.len(),
            bridge_tokens.len()
        );

        Ok(Self {
            sources,
            bridge_tokens,
            wrapped_native,
        })
    }

    /// Builds a registry from configuration, asking `factory` for each
    /// router's quoting capability
    pub fn from_config<F>(config: &RegistryConfig, mut factory: F) -> Result<Self>
    where
        F: FnMut(&SourceEntry) -> Arc<dyn LiquiditySource>,
    {
        if config.routers.len() != config.names.len() {
            return Err(Error::ConfigError(format!(
                "{} routers but {} names",
                config.routers.len(),
                config.names.len()
            )));
        }

        let sources = config
            .routers
            .iter()
            .zip(&config.names)
            .map(|(router, name)| {
                let entry = SourceEntry {
                    id: SourceId(format!("{router:?}")),
                    name: name.clone(),
                    router: *router,
                };
                let capability = factory(&entry);
                Source::new(entry.id, entry.name, capability)
            })
            .collect();

        let bridge_tokens = config.bridge_tokens.iter().copied().map(Token::new).collect();

        Self::new(sources, Token::new(config.weth), bridge_tokens)
    }

    /// Sources in registration order
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn source(&self, id: &SourceId) -> Option<&Source> {
        self.sources.iter().find(|s| &s.id == id)
    }

    pub fn bridge_tokens(&self) -> &[Token] {
        &self.bridge_tokens
    }

    pub fn wrapped_native_token(&self) -> &Token {
        &self.wrapped_native
    }
}
