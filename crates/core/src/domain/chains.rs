use serde::{Deserialize, Serialize};

/// Chains the router has deployments for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ChainId {
    BinanceSmartChain = 56,
    BinanceSmartChainTestnet = 97,
    /// Local development node (hardhat / anvil)
    Localhost = 31337,
}

impl ChainId {
    /// Returns chain name
    pub fn name(&self) -> &'static str {
        match self {
            ChainId::BinanceSmartChain => "Binance Smart Chain",
            ChainId::BinanceSmartChainTestnet => "Binance Smart Chain Testnet",
            ChainId::Localhost => "Localhost",
        }
    }

    /// Returns the symbol of the wrapped native token
    pub fn wrapped_native_symbol(&self) -> &'static str {
        match self {
            ChainId::BinanceSmartChain | ChainId::BinanceSmartChainTestnet => "WBNB",
            ChainId::Localhost => "WETH",
        }
    }

    /// Returns typical block time in seconds
    pub fn block_time(&self) -> u64 {
        match self {
            ChainId::BinanceSmartChain | ChainId::BinanceSmartChainTestnet => 3,
            ChainId::Localhost => 1,
        }
    }

    /// Returns chain ID as u64
    pub fn as_u64(&self) -> u64 {
        *self as u64
    }

    /// Creates ChainId from u64
    pub fn from_u64(id: u64) -> Option<Self> {
        match id {
            56 => Some(ChainId::BinanceSmartChain),
            97 => Some(ChainId::BinanceSmartChainTestnet),
            31337 => Some(ChainId::Localhost),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        assert_eq!(ChainId::from_u64(56), Some(ChainId::BinanceSmartChain));
        assert_eq!(ChainId::from_u64(97), Some(ChainId::BinanceSmartChainTestnet));
        assert_eq!(ChainId::from_u64(1), None);
        assert_eq!(ChainId::BinanceSmartChain.as_u64(), 56);
    }

    #[test]
    fn test_chain_properties() {
        assert_eq!(ChainId::BinanceSmartChain.wrapped_native_symbol(), "WBNB");
        assert_eq!(ChainId::Localhost.wrapped_native_symbol(), "WETH");
        assert_eq!(ChainId::BinanceSmartChain.block_time(), 3);
    }
}
