use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Represents a token by its contract address
///
/// Two tokens are the same token when their addresses match; the symbol is
/// only a display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Token contract address
    pub address: Address,

    /// Token symbol (e.g., "WBNB", "BUSD")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl Token {
    /// Creates a token without a symbol
    pub fn new(address: Address) -> Self {
        Self {
            address,
            symbol: None,
        }
    }

    /// Creates a token with a display symbol
    pub fn with_symbol(address: Address, symbol: impl Into<String>) -> Self {
        Self {
            address,
            symbol: Some(symbol.into()),
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl From<Address> for Token {
    fn from(address: Address) -> Self {
        Self::new(address)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{symbol}"),
            None => write!(f, "{:?}", self.address),
        }
    }
}

/// Ordered token sequence a swap travels through
///
/// Either `[in, out]` or `[in, bridge, out]`, never with a repeated token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path(Vec<Token>);

impl Path {
    /// Direct path between two distinct tokens
    pub fn direct(token_in: Token, token_out: Token) -> Option<Self> {
        if token_in == token_out {
            return None;
        }
        Some(Self(vec![token_in, token_out]))
    }

    /// One-hop path through `bridge`
    pub fn via(token_in: Token, bridge: Token, token_out: Token) -> Option<Self> {
        if token_in == token_out || bridge == token_in || bridge == token_out {
            return None;
        }
        Some(Self(vec![token_in, bridge, token_out]))
    }

    /// Token addresses in order, as routers expect them
    pub fn addresses(&self) -> Vec<Address> {
        self.0.iter().map(|t| t.address).collect()
    }

    pub fn token_in(&self) -> &Token {
        &self.0[0]
    }

    pub fn token_out(&self) -> &Token {
        &self.0[self.0.len() - 1]
    }

    /// Intermediate token, if this is a one-hop path
    pub fn bridge(&self) -> Option<&Token> {
        if self.0.len() == 3 {
            self.0.get(1)
        } else {
            None
        }
    }

    /// Number of swaps along the path
    pub fn hops(&self) -> usize {
        self.0.len() - 1
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_direct(&self) -> bool {
        self.0.len() == 2
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", labels.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(n: u64) -> Token {
        Token::new(Address::from_low_u64_be(n))
    }

    #[test]
    fn test_token_identity_ignores_symbol() {
        let a = Token::with_symbol(Address::from_low_u64_be(1), "WBNB");
        let b = Token::with_symbol(Address::from_low_u64_be(1), "BNB");
        let c = Token::with_symbol(Address::from_low_u64_be(2), "WBNB");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_direct_path_rejects_same_token() {
        assert!(Path::direct(token(1), token(1)).is_none());

        let path = Path::direct(token(1), token(2)).unwrap();
        assert!(path.is_direct());
        assert_eq!(path.hops(), 1);
        assert!(path.bridge().is_none());
    }

    #[test]
    fn test_via_path_rejects_repeated_tokens() {
        assert!(Path::via(token(1), token(1), token(2)).is_none());
        assert!(Path::via(token(1), token(2), token(2)).is_none());
        assert!(Path::via(token(1), token(3), token(1)).is_none());

        let path = Path::via(token(1), token(3), token(2)).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.bridge(), Some(&token(3)));
        assert_eq!(path.token_in(), &token(1));
        assert_eq!(path.token_out(), &token(2));
        assert_eq!(
            path.addresses(),
            vec![
                Address::from_low_u64_be(1),
                Address::from_low_u64_be(3),
                Address::from_low_u64_be(2)
            ]
        );
    }

    #[test]
    fn test_path_display_uses_symbols() {
        let path = Path::via(
            Token::with_symbol(Address::from_low_u64_be(1), "CAKE"),
            Token::with_symbol(Address::from_low_u64_be(2), "WBNB"),
            Token::with_symbol(Address::from_low_u64_be(3), "BUSD"),
        )
        .unwrap();
        assert_eq!(path.to_string(), "CAKE -> WBNB -> BUSD");
    }
}
