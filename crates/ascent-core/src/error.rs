// SPDX-License-Identifier: AGPL-3.0-only
//! Error taxonomy shared by the curve, pool, registry and engine layers.
//!
//! Every failure aborts the whole operation: no balance, reserve or counter
//! is modified when one of these is returned.

/// Failure of a launchpad operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// Creation fee below the required amount.
    FeeNotPaid { required: u128, paid: u128 },
    /// Name or symbol empty or too long.
    InvalidMetadata(String),
    /// Buy would push circulating supply past the curve cap.
    CurveCapExceeded { requested: u128, remaining: u128 },
    /// Mint would push total supply past the token's ceiling.
    MaxSupplyExceeded { requested: u128, remaining: u128 },
    /// Attached value does not cover the price.
    InsufficientPayment { required: u128, paid: u128 },
    /// Holder owns fewer tokens, liquidity units or base currency than requested.
    InsufficientBalance { have: u128, need: u128 },
    /// Reserves cannot satisfy the request.
    InsufficientLiquidity(String),
    /// Output below the caller's minimum.
    SlippageExceeded { out: u128, min: u128 },
    PoolAlreadyExists(String),
    PoolNotFound(String),
    /// Graduation could not complete; the triggering buy is rolled back.
    MigrationFailed(String),
    /// A widened product or narrowed result does not fit.
    ArithmeticOverflow,
    ZeroAmount,
    /// The asset has migrated; curve buys, sells and quotes are closed.
    TradingClosed(String),
    AssetNotFound(String),
    AllowanceExceeded { have: u128, need: u128 },
    /// Liquidity deposit deviates from the reserve ratio beyond tolerance.
    DisproportionateDeposit { deviation_bps: u128, tolerance_bps: u128 },
    /// Pool liquidity is locked until the asset graduates from its curve.
    CurveStillTrading(String),
    /// Constant-product check failed after a swap.
    InvariantViolation(String),
    InvalidConfig(String),
    /// Treasury and pool accounts cannot act as callers or recipients.
    ReservedAccount(String),
    /// Shared state lock was poisoned by a panicking thread.
    StateUnavailable,
}

impl std::fmt::Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LaunchError::FeeNotPaid { required, paid } => {
                write!(f, "Insufficient creation fee: required {} paid {}", required, paid)
            }
            LaunchError::InvalidMetadata(msg) => write!(f, "Invalid metadata: {}", msg),
            LaunchError::CurveCapExceeded { requested, remaining } => write!(
                f,
                "Bonding curve limit reached: requested {} remaining {}",
                requested, remaining
            ),
            LaunchError::MaxSupplyExceeded { requested, remaining } => write!(
                f,
                "Max supply reached: requested {} remaining {}",
                requested, remaining
            ),
            LaunchError::InsufficientPayment { required, paid } => {
                write!(f, "Insufficient payment: required {} paid {}", required, paid)
            }
            LaunchError::InsufficientBalance { have, need } => {
                write!(f, "Insufficient balance: have {} need {}", have, need)
            }
            LaunchError::InsufficientLiquidity(msg) => {
                write!(f, "Insufficient liquidity: {}", msg)
            }
            LaunchError::SlippageExceeded { out, min } => {
                write!(f, "Slippage exceeded: output {} < min {}", out, min)
            }
            LaunchError::PoolAlreadyExists(asset) => {
                write!(f, "Pool already exists for asset {}", asset)
            }
            LaunchError::PoolNotFound(key) => write!(f, "Pool not found: {}", key),
            LaunchError::MigrationFailed(msg) => write!(f, "Migration failed: {}", msg),
            LaunchError::ArithmeticOverflow => write!(f, "Arithmetic overflow"),
            LaunchError::ZeroAmount => write!(f, "Amount must be > 0"),
            LaunchError::TradingClosed(asset) => {
                write!(f, "Curve trading closed: asset {} has migrated", asset)
            }
            LaunchError::AssetNotFound(asset) => write!(f, "Asset not found: {}", asset),
            LaunchError::AllowanceExceeded { have, need } => {
                write!(f, "Allowance exceeded: have {} need {}", have, need)
            }
            LaunchError::DisproportionateDeposit {
                deviation_bps,
                tolerance_bps,
            } => write!(
                f,
                "Deposit ratio deviates {} bps from reserves (tolerance {} bps)",
                deviation_bps, tolerance_bps
            ),
            LaunchError::CurveStillTrading(asset) => {
                write!(f, "Asset {} is still trading on its bonding curve", asset)
            }
            LaunchError::InvariantViolation(msg) => write!(f, "Invariant violation: {}", msg),
            LaunchError::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            LaunchError::ReservedAccount(addr) => {
                write!(f, "Account {} is reserved by the launchpad", addr)
            }
            LaunchError::StateUnavailable => write!(f, "Launchpad state lock poisoned"),
        }
    }
}

impl std::error::Error for LaunchError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = LaunchError::FeeNotPaid {
            required: 100,
            paid: 10,
        };
        assert_eq!(e.to_string(), "Insufficient creation fee: required 100 paid 10");
        assert!(LaunchError::CurveCapExceeded {
            requested: 5,
            remaining: 1
        }
        .to_string()
        .starts_with("Bonding curve limit reached"));
        assert_eq!(
            LaunchError::MaxSupplyExceeded {
                requested: 2,
                remaining: 1
            }
            .to_string(),
            "Max supply reached: requested 2 remaining 1"
        );
    }

    #[test]
    fn test_boxes_as_std_error() {
        let boxed: Box<dyn std::error::Error> = Box::new(LaunchError::ArithmeticOverflow);
        assert_eq!(boxed.to_string(), "Arithmetic overflow");
    }
}
