use ethers::types::U256;

const BPS_DENOMINATOR: u64 = 10_000;

/// Minimum acceptable output for a quote given a slippage tolerance
///
/// Rounds down. Tolerances at or above 100% yield zero.
pub fn apply_slippage_bps(amount_out: U256, slippage_bps: u32) -> U256 {
    let bps = u64::from(slippage_bps).min(BPS_DENOMINATOR);
    let keep = U256::from(BPS_DENOMINATOR - bps);

    match amount_out.checked_mul(keep) {
        Some(scaled) => scaled / U256::from(BPS_DENOMINATOR),
        // Divide first when the product would overflow
        None => amount_out / U256::from(BPS_DENOMINATOR) * keep,
    }
}

/// Output shortfall of `received` versus `quoted`, in basis points
pub fn shortfall_bps(quoted: U256, received: U256) -> u64 {
    if quoted.is_zero() || received >= quoted {
        return 0;
    }

    let missing = quoted - received;
    let bps = missing.saturating_mul(U256::from(BPS_DENOMINATOR)) / quoted;
    bps.low_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_slippage() {
        assert_eq!(apply_slippage_bps(U256::from(10_000), 50), U256::from(9_950));
        assert_eq!(apply_slippage_bps(U256::from(98), 0), U256::from(98));
        // 99.5 rounds down
        assert_eq!(apply_slippage_bps(U256::from(100), 50), U256::from(99));
    }

    #[test]
    fn test_full_tolerance_is_zero() {
        assert_eq!(apply_slippage_bps(U256::from(1_000), 10_000), U256::zero());
        assert_eq!(apply_slippage_bps(U256::from(1_000), 20_000), U256::zero());
    }

    #[test]
    fn test_apply_slippage_near_max_does_not_overflow() {
        let result = apply_slippage_bps(U256::MAX, 100);
        assert!(result < U256::MAX);
        assert!(result > U256::MAX / U256::from(2));
    }

    #[test]
    fn test_shortfall() {
        assert_eq!(shortfall_bps(U256::from(100), U256::from(98)), 200);
        assert_eq!(shortfall_bps(U256::from(100), U256::from(120)), 0);
        assert_eq!(shortfall_bps(U256::zero(), U256::from(1)), 0);
    }
}
