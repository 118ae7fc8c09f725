use async_trait::async_trait;
use ethers::contract::{abigen, parse_log, ContractError};
use ethers::providers::{JsonRpcError, Middleware, MiddlewareError};
use ethers::types::{Address, Log, U256, U64};
use router_core::{ExecutionFailure, LiquiditySource, Path, QuoteFailure, QuoteResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

abigen!(
    UniswapV2Router,
    r#"[
        function getAmountsOut(uint256 amountIn, address[] path) external view returns (uint256[] amounts)
        function swapExactTokensForTokens(uint256 amountIn, uint256 amountOutMin, address[] path, address to, uint256 deadline) external returns (uint256[] amounts)
    ]"#,
);

abigen!(
    Erc20,
    r#"[
        event Transfer(address indexed from, address indexed to, uint256 value)
    ]"#,
);

/// Liquidity source backed by a UniswapV2-compatible router contract
///
/// PancakeSwap, BabySwap, ApeSwap, BiSwap and MdexSwap all expose this
/// interface. Multi-hop paths are quoted and swapped by the router itself,
/// so every segment uses this router's own pairs.
pub struct UniswapV2Source<M> {
    router: UniswapV2Router<M>,
    recipient: Address,
    gas_price: Option<U256>,
}

impl<M: Middleware + 'static> UniswapV2Source<M> {
    /// `recipient` receives swap output; it is unused when only quoting
    pub fn new(router: Address, client: Arc<M>, recipient: Address) -> Self {
        Self {
            router: UniswapV2Router::new(router, client),
            recipient,
            gas_price: None,
        }
    }

    /// Sends swaps as legacy transactions at a fixed gas price
    pub fn with_gas_price(mut self, gas_price: Option<U256>) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn address(&self) -> Address {
        self.router.address()
    }
}

#[async_trait]
impl<M: Middleware + 'static> LiquiditySource for UniswapV2Source<M> {
    async fn quote(&self, path: &Path, amount_in: U256) -> QuoteResult {
        let amounts = self
            .router
            .get_amounts_out(amount_in, path.addresses())
            .call()
            .await
            .map_err(|e| classify_quote_error(&e))?;

        final_amount(&amounts).ok_or_else(|| QuoteFailure::Reverted("empty amounts".into()))
    }

    async fn swap(
        &self,
        path: &Path,
        amount_in: U256,
        min_amount_out: U256,
        deadline: u64,
    ) -> Result<U256, ExecutionFailure> {
        let mut call = self.router.swap_exact_tokens_for_tokens(
            amount_in,
            min_amount_out,
            path.addresses(),
            self.recipient,
            U256::from(deadline),
        );
        if let Some(gas_price) = self.gas_price {
            call = call.legacy().gas_price(gas_price);
        }

        // Dry run against current state before paying for a transaction
        let simulated = call.call().await.map_err(|e| classify_swap_error(&e))?;
        let expected = final_amount(&simulated)
            .ok_or_else(|| ExecutionFailure::Reverted("empty amounts".into()))?;
        if expected < min_amount_out {
            return Err(ExecutionFailure::InsufficientOutput {
                received: expected,
                minimum: min_amount_out,
            });
        }

        let pending = call.send().await.map_err(|e| classify_swap_error(&e))?;
        let tx_hash = *pending;
        debug!("Swap transaction sent: {:?}", tx_hash);

        let receipt = pending
            .await
            .map_err(|e| ExecutionFailure::Unreachable(e.to_string()))?
            .ok_or_else(|| {
                ExecutionFailure::Unreachable(format!("transaction {tx_hash:?} dropped"))
            })?;

        if receipt.status != Some(U64::from(1)) {
            warn!("Swap transaction {:?} reverted", tx_hash);
            return Err(ExecutionFailure::Reverted(format!(
                "transaction {tx_hash:?} reverted"
            )));
        }

        let received = received_amount(&receipt.logs, path.token_out().address, self.recipient)
            .unwrap_or_else(|| {
                warn!(
                    "No output transfer to {:?} in {:?}, reporting simulated amount",
                    self.recipient, tx_hash
                );
                expected
            });

        info!(
            "Swap settled in block {:?}: {:?}, received {}",
            receipt.block_number, tx_hash, received
        );

        Ok(received)
    }
}

fn final_amount(amounts: &[U256]) -> Option<U256> {
    amounts.last().copied()
}

/// Sum of `token` transfers to `recipient` found in a transaction's logs
fn received_amount(logs: &[Log], token: Address, recipient: Address) -> Option<U256> {
    logs.iter()
        .filter(|log| log.address == token)
        .filter_map(|log| parse_log::<TransferFilter>(log.clone()).ok())
        .filter(|transfer| transfer.to == recipient)
        .map(|transfer| transfer.value)
        .reduce(|total, value| total.saturating_add(value))
}

/// Revert reason carried by a node's `execution reverted` error response
///
/// Nodes report a revert without data as a JSON-RPC error rather than
/// revert bytes. Returns the (possibly empty) reason text.
fn node_revert_reason(response: &JsonRpcError) -> Option<&str> {
    let reason = response.message.strip_prefix("execution reverted")?;
    Some(reason.trim_start_matches(':').trim())
}

fn error_response<M: Middleware>(err: &ContractError<M>) -> Option<&JsonRpcError> {
    err.as_middleware_error()?.as_error_response()
}

/// Maps a router revert reason to a quote failure
pub fn classify_revert_reason(reason: &str) -> QuoteFailure {
    if reason.contains("INSUFFICIENT_LIQUIDITY") {
        QuoteFailure::NoLiquidity
    } else {
        QuoteFailure::Reverted(reason.to_string())
    }
}

fn classify_quote_error<M: Middleware>(err: &ContractError<M>) -> QuoteFailure {
    if let Some(reason) = err.decode_revert::<String>() {
        return classify_revert_reason(&reason);
    }

    match err.as_revert() {
        // Calling getReserves on a pair that was never created reverts without data
        Some(data) if data.is_empty() => QuoteFailure::NoLiquidity,
        Some(data) => QuoteFailure::Reverted(format!("{data}")),
        None => match error_response(err).and_then(node_revert_reason) {
            // Calls into a missing pair revert without a reason
            Some("") => QuoteFailure::NoLiquidity,
            Some(reason) => classify_revert_reason(reason),
            None => QuoteFailure::Unreachable(err.to_string()),
        },
    }
}

fn classify_swap_error<M: Middleware>(err: &ContractError<M>) -> ExecutionFailure {
    if let Some(reason) = err.decode_revert::<String>() {
        return ExecutionFailure::Reverted(reason);
    }

    match err.as_revert() {
        Some(data) => ExecutionFailure::Reverted(format!("{data}")),
        None => match error_response(err).and_then(node_revert_reason) {
            Some("") => ExecutionFailure::Reverted("execution reverted".into()),
            Some(reason) => ExecutionFailure::Reverted(reason.to_string()),
            None => ExecutionFailure::Unreachable(err.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::{self, Token as AbiToken};
    use ethers::contract::EthEvent;
    use ethers::providers::{Http, HttpClientError, Provider, ProviderError};
    use ethers::types::{Bytes, H256};

    type HttpContractError = ContractError<Provider<Http>>;

    fn node_error(code: i64, message: &str) -> HttpContractError {
        let response = JsonRpcError {
            code,
            message: message.to_string(),
            data: None,
        };
        ContractError::MiddlewareError {
            e: ProviderError::JsonRpcClientError(Box::new(HttpClientError::JsonRpcError(
                response,
            ))),
        }
    }

    fn transport_error() -> HttpContractError {
        ContractError::MiddlewareError {
            e: ProviderError::CustomError("connection refused".into()),
        }
    }

    fn transfer_log(token: Address, from: Address, to: Address, value: u64) -> Log {
        Log {
            address: token,
            topics: vec![TransferFilter::signature(), H256::from(from), H256::from(to)],
            data: Bytes::from(abi::encode(&[AbiToken::Uint(U256::from(value))])),
            ..Default::default()
        }
    }

    #[test]
    fn test_insufficient_liquidity_is_no_liquidity() {
        assert_eq!(
            classify_revert_reason("PancakeLibrary: INSUFFICIENT_LIQUIDITY"),
            QuoteFailure::NoLiquidity
        );
        assert_eq!(
            classify_revert_reason("UniswapV2Library: INSUFFICIENT_LIQUIDITY"),
            QuoteFailure::NoLiquidity
        );
    }

    #[test]
    fn test_other_reasons_are_reverts() {
        assert_eq!(
            classify_revert_reason("UniswapV2Library: INVALID_PATH"),
            QuoteFailure::Reverted("UniswapV2Library: INVALID_PATH".into())
        );
    }

    #[test]
    fn test_bare_node_revert_is_no_liquidity() {
        let err = node_error(-32000, "execution reverted");
        assert_eq!(classify_quote_error(&err), QuoteFailure::NoLiquidity);
    }

    #[test]
    fn test_node_revert_reason_is_classified() {
        let err = node_error(-32000, "execution reverted: PancakeLibrary: INSUFFICIENT_LIQUIDITY");
        assert_eq!(classify_quote_error(&err), QuoteFailure::NoLiquidity);

        let err = node_error(-32000, "execution reverted: UniswapV2Library: INVALID_PATH");
        assert_eq!(
            classify_quote_error(&err),
            QuoteFailure::Reverted("UniswapV2Library: INVALID_PATH".into())
        );
    }

    #[test]
    fn test_other_node_errors_are_unreachable() {
        assert!(matches!(
            classify_quote_error(&node_error(-32005, "rate limit exceeded")),
            QuoteFailure::Unreachable(_)
        ));
        assert!(matches!(
            classify_quote_error(&transport_error()),
            QuoteFailure::Unreachable(_)
        ));
    }

    #[test]
    fn test_swap_node_revert_is_reverted() {
        assert_eq!(
            classify_swap_error(&node_error(-32000, "execution reverted")),
            ExecutionFailure::Reverted("execution reverted".into())
        );
        assert_eq!(
            classify_swap_error(&node_error(
                -32000,
                "execution reverted: PancakeRouter: EXPIRED"
            )),
            ExecutionFailure::Reverted("PancakeRouter: EXPIRED".into())
        );
        assert!(matches!(
            classify_swap_error(&transport_error()),
            ExecutionFailure::Unreachable(_)
        ));
    }

    #[test]
    fn test_received_amount_from_transfer_logs() {
        let token_out = Address::from_low_u64_be(2);
        let other_token = Address::from_low_u64_be(3);
        let pair = Address::from_low_u64_be(0xa1);
        let recipient = Address::from_low_u64_be(0xbeef);

        let logs = vec![
            // input leg into the pair
            transfer_log(other_token, recipient, pair, 100),
            // output token sent elsewhere
            transfer_log(token_out, pair, Address::from_low_u64_be(0xdead), 7),
            transfer_log(token_out, pair, recipient, 96),
        ];

        assert_eq!(received_amount(&logs, token_out, recipient), Some(U256::from(96)));
        assert_eq!(received_amount(&logs[..2], token_out, recipient), None);
    }

    #[test]
    fn test_received_amount_sums_transfers() {
        let token_out = Address::from_low_u64_be(2);
        let recipient = Address::from_low_u64_be(0xbeef);
        let logs = vec![
            transfer_log(token_out, Address::from_low_u64_be(0xa1), recipient, 60),
            transfer_log(token_out, Address::from_low_u64_be(0xa2), recipient, 40),
        ];

        assert_eq!(received_amount(&logs, token_out, recipient), Some(U256::from(100)));
    }

    #[test]
    fn test_final_amount() {
        let amounts = vec![U256::from(100), U256::from(250), U256::from(98)];
        assert_eq!(final_amount(&amounts), Some(U256::from(98)));
        assert_eq!(final_amount(&[]), None);
    }

    #[test]
    fn test_source_keeps_router_address() {
        let provider = Provider::<Http>::try_from("http://127.0.0.1:8545").unwrap();
        let router = Address::from_low_u64_be(0x10ed);
        let source = UniswapV2Source::new(router, Arc::new(provider), Address::zero())
            .with_gas_price(Some(U256::from(5_000_000_000u64)));
        assert_eq!(source.address(), router);
        assert_eq!(source.gas_price, Some(U256::from(5_000_000_000u64)));
    }
}
