// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ASCENT LAUNCHPAD - AMM MODULE
//
// Constant-product (x·y=k) pools for graduated assets.
// - Liquidity deposits and withdrawals with receipt units
// - Fee-bearing swaps with slippage protection
// - One pool per asset, held in an append-only registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod pool;
pub mod registry;

pub use pool::{AmmPool, LiquidityReceipt, Position, SwapOutcome, SwapQuote, LP_SYMBOL};
pub use registry::{pool_address_for, PoolHandle, PoolInfo, PoolRegistry};
