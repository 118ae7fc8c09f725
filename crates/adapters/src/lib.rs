pub mod uniswap_v2;

pub use uniswap_v2::UniswapV2Source;
