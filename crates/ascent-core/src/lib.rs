// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ASCENT LAUNCHPAD - CORE MODULE
//
// Shared primitives for bonding-curve launches and constant-product pools.
// - Published economic constants (fees, supply split, funding goal)
// - The error taxonomy shared by every crate
// - 256-bit intermediate arithmetic for curve and pool math
// - Per-asset fungible token ledger, typed events, TOML configuration
// All amounts are u128 atomic units with 18 fractional digits (no floating-point).
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod events;
pub mod math;
pub mod token;

pub use config::LaunchConfig;
pub use error::LaunchError;
pub use events::{EventBus, LaunchEvent, TokenEvent};
pub use token::{AssetToken, TokenMetadata};

/// Fractional digits for both asset and base-currency amounts.
pub const DECIMALS: u8 = 18;
/// 1 whole token (or 1 whole base unit) in atomic units.
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// Fee charged to launch a new asset (0.0001 base).
pub const CREATION_FEE: u128 = UNIT / 10_000;
/// Hard cap on any asset's token supply (1,000,000 tokens).
pub const MAX_SUPPLY: u128 = 1_000_000 * UNIT;
/// Supply reserved at creation for the graduation pool (20% of max supply).
pub const POOL_ALLOTMENT: u128 = 200_000 * UNIT;
/// Supply sellable on the bonding curve (the remaining 80%).
pub const CURVE_CAP: u128 = MAX_SUPPLY - POOL_ALLOTMENT;
/// Cumulative base currency that triggers migration (10 base).
pub const FUNDING_GOAL: u128 = 10 * UNIT;

/// Marginal price of the first token, in atomic base units per whole token (0.00003 base).
pub const INITIAL_PRICE: u128 = 30_000_000_000_000;
/// Marginal price increase per whole token sold, in atomic base units (1e-10 base).
/// With [`INITIAL_PRICE`] the goal is reached near 240,000 tokens sold.
pub const PRICE_SLOPE: u128 = 100_000_000;

/// Default swap fee: 0.3% (30 basis points), retained by the pool.
pub const SWAP_FEE_BPS: u128 = 30;
/// Basis-point denominator.
pub const BPS_DENOMINATOR: u128 = 10_000;
/// Maximum fee any pool or curve may charge: 10% (1000 bps).
pub const MAX_FEE_BPS: u128 = 1_000;
/// Accepted deviation of a liquidity deposit from the reserve ratio (1%).
pub const LIQUIDITY_TOLERANCE_BPS: u128 = 100;

/// Address prefix for launched assets.
pub const ASSET_PREFIX: &str = "ASCT";
/// Address prefix for liquidity pools.
pub const POOL_PREFIX: &str = "ASCP";

/// Which reserve a swap pays in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Pay the asset, receive base currency.
    AssetToBase,
    /// Pay base currency, receive the asset.
    BaseToAsset,
}

/// Side of a bonding-curve trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// Deterministic address: `prefix` + first 32 hex chars of blake3 over the
/// `:`-joined parts.
pub fn derive_address(prefix: &str, parts: &[&str]) -> String {
    let input = parts.join(":");
    let hash = blake3::hash(input.as_bytes());
    format!("{}{}", prefix, &hex::encode(hash.as_bytes())[..32])
}

/// Format atomic units as a decimal string with up to 18 fractional digits.
/// Used in log lines only; every API works in atomic units.
pub fn format_units(amount: u128) -> String {
    let whole = amount / UNIT;
    let frac = amount % UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:018}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

// ─────────────────────────────────────────────────────────────
// u128 ↔ String serialization (JSON and TOML lack 128-bit integers)
// ─────────────────────────────────────────────────────────────

/// Serialize u128 as a decimal string; deserialize from a string or an integer.
pub mod u128_str {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(val: &u128, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&val.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
        struct U128Visitor;

        impl<'de> Visitor<'de> for U128Visitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a u128 as a string or integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(v as u128)
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                if v >= 0 {
                    Ok(v as u128)
                } else {
                    Err(E::custom("negative value for u128"))
                }
            }
        }

        d.deserialize_any(U128Visitor)
    }
}

/// Serialize an address → u128 map with decimal-string values.
pub mod u128_map {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        map: &BTreeMap<String, u128>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        let as_str: BTreeMap<&String, String> =
            map.iter().map(|(k, v)| (k, v.to_string())).collect();
        as_str.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<BTreeMap<String, u128>, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(d)?;
        raw.into_iter()
            .map(|(k, v)| {
                v.parse::<u128>()
                    .map(|n| (k, n))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
