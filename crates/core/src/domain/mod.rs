pub mod chains;
pub mod request;
pub mod tokens;

pub use chains::ChainId;
pub use request::{is_expired, time_until, unix_now, SwapRequest};
pub use tokens::{Path, Token};
