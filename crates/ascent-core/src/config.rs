//! Launchpad configuration.
//!
//! Defaults come from the published constants. A deployment may override them
//! from a TOML file or from `ASCENT_*` environment variables; either way the
//! result must pass [`LaunchConfig::validate`] before an engine accepts it.

use crate::error::LaunchError;
use crate::{
    u128_str, BPS_DENOMINATOR, CREATION_FEE, FUNDING_GOAL, INITIAL_PRICE,
    LIQUIDITY_TOLERANCE_BPS, MAX_FEE_BPS, MAX_SUPPLY, POOL_ALLOTMENT, PRICE_SLOPE, SWAP_FEE_BPS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default account receiving creation and curve trading fees.
pub const DEFAULT_FEE_RECIPIENT: &str = "ASCWfeeRecipient";
/// Default account holding pool allotments and migrated liquidity.
pub const DEFAULT_TREASURY: &str = "ASCWregistryTreasury";

/// Marginal-price shape of a bonding curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveShape {
    /// `p(s) = initial_price + slope * s`
    Linear,
    /// `p(s) = initial_price + slope * s^2`
    Quadratic,
}

/// Curve parameters, in atomic base units per whole token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    pub shape: CurveShape,
    #[serde(with = "u128_str")]
    pub initial_price: u128,
    #[serde(with = "u128_str")]
    pub slope: u128,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            shape: CurveShape::Linear,
            initial_price: INITIAL_PRICE,
            slope: PRICE_SLOPE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    #[serde(with = "u128_str")]
    pub creation_fee: u128,
    #[serde(with = "u128_str")]
    pub max_supply: u128,
    /// Reserved for the graduation pool; the rest is the curve cap.
    #[serde(with = "u128_str")]
    pub pool_allotment: u128,
    #[serde(with = "u128_str")]
    pub funding_goal: u128,
    #[serde(with = "u128_str")]
    pub swap_fee_bps: u128,
    /// Fee on curve buys and sells, forwarded to `fee_recipient` (0 = none).
    #[serde(default, with = "u128_str")]
    pub curve_fee_bps: u128,
    #[serde(with = "u128_str")]
    pub liquidity_tolerance_bps: u128,
    pub fee_recipient: String,
    pub treasury: String,
    pub curve: CurveParams,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            creation_fee: CREATION_FEE,
            max_supply: MAX_SUPPLY,
            pool_allotment: POOL_ALLOTMENT,
            funding_goal: FUNDING_GOAL,
            swap_fee_bps: SWAP_FEE_BPS,
            curve_fee_bps: 0,
            liquidity_tolerance_bps: LIQUIDITY_TOLERANCE_BPS,
            fee_recipient: DEFAULT_FEE_RECIPIENT.to_string(),
            treasury: DEFAULT_TREASURY.to_string(),
            curve: CurveParams::default(),
        }
    }
}

impl LaunchConfig {
    /// Supply sellable on the curve.
    pub fn curve_cap(&self) -> u128 {
        self.max_supply.saturating_sub(self.pool_allotment)
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: LaunchConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from environment variables, falling back to defaults per field.
    pub fn load_from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let d = Self::default();

        let shape = match std::env::var("ASCENT_CURVE_SHAPE").as_deref() {
            Ok("quadratic") => CurveShape::Quadratic,
            Ok("linear") | Err(_) => CurveShape::Linear,
            Ok(other) => return Err(format!("unknown ASCENT_CURVE_SHAPE: {}", other).into()),
        };

        let config = Self {
            creation_fee: env_u128("ASCENT_CREATION_FEE", d.creation_fee)?,
            max_supply: env_u128("ASCENT_MAX_SUPPLY", d.max_supply)?,
            pool_allotment: env_u128("ASCENT_POOL_ALLOTMENT", d.pool_allotment)?,
            funding_goal: env_u128("ASCENT_FUNDING_GOAL", d.funding_goal)?,
            swap_fee_bps: env_u128("ASCENT_SWAP_FEE_BPS", d.swap_fee_bps)?,
            curve_fee_bps: env_u128("ASCENT_CURVE_FEE_BPS", d.curve_fee_bps)?,
            liquidity_tolerance_bps: env_u128(
                "ASCENT_LIQUIDITY_TOLERANCE_BPS",
                d.liquidity_tolerance_bps,
            )?,
            fee_recipient: std::env::var("ASCENT_FEE_RECIPIENT").unwrap_or(d.fee_recipient),
            treasury: std::env::var("ASCENT_TREASURY").unwrap_or(d.treasury),
            curve: CurveParams {
                shape,
                initial_price: env_u128("ASCENT_INITIAL_PRICE", d.curve.initial_price)?,
                slope: env_u128("ASCENT_PRICE_SLOPE", d.curve.slope)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.max_supply == 0 {
            return Err(LaunchError::InvalidConfig("max_supply must be > 0".to_string()));
        }
        if self.pool_allotment == 0 || self.pool_allotment >= self.max_supply {
            return Err(LaunchError::InvalidConfig(
                "pool_allotment must be > 0 and < max_supply".to_string(),
            ));
        }
        if self.funding_goal == 0 {
            return Err(LaunchError::InvalidConfig("funding_goal must be > 0".to_string()));
        }
        if self.curve.initial_price == 0 {
            return Err(LaunchError::InvalidConfig(
                "curve.initial_price must be > 0".to_string(),
            ));
        }
        if self.swap_fee_bps > MAX_FEE_BPS || self.curve_fee_bps > MAX_FEE_BPS {
            return Err(LaunchError::InvalidConfig(format!(
                "fees must be <= {} bps",
                MAX_FEE_BPS
            )));
        }
        if self.liquidity_tolerance_bps > BPS_DENOMINATOR {
            return Err(LaunchError::InvalidConfig(
                "liquidity_tolerance_bps must be <= 10000".to_string(),
            ));
        }
        if self.fee_recipient.is_empty() || self.treasury.is_empty() {
            return Err(LaunchError::InvalidConfig(
                "fee_recipient and treasury must be set".to_string(),
            ));
        }
        if self.fee_recipient == self.treasury {
            return Err(LaunchError::InvalidConfig(
                "fee_recipient and treasury must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_u128(key: &str, default: u128) -> Result<u128, Box<dyn std::error::Error>> {
    match std::env::var(key) {
        Ok(v) => Ok(v.parse::<u128>().map_err(|e| format!("{}: {}", key, e))?),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNIT;

    #[test]
    fn test_defaults_validate() {
        let c = LaunchConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.curve_cap(), 800_000 * UNIT);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launchpad.toml");
        let mut c = LaunchConfig::default();
        c.curve.shape = CurveShape::Quadratic;
        c.curve_fee_bps = 100;
        c.save_to_file(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("shape = \"quadratic\""));
        assert!(text.contains(&format!("max_supply = \"{}\"", MAX_SUPPLY)));

        let loaded = LaunchConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, c);
    }

    #[test]
    fn test_load_accepts_integer_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.toml");
        std::fs::write(
            &path,
            r#"
creation_fee = 100
max_supply = "1000000"
pool_allotment = 200000
funding_goal = 5000
swap_fee_bps = 30
liquidity_tolerance_bps = 100
fee_recipient = "fees"
treasury = "treasury"

[curve]
shape = "linear"
initial_price = 1
slope = 0
"#,
        )
        .unwrap();
        let c = LaunchConfig::load_from_file(&path).unwrap();
        assert_eq!(c.creation_fee, 100);
        assert_eq!(c.curve_fee_bps, 0);
        assert_eq!(c.curve_cap(), 800_000);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        let mut c = LaunchConfig::default();
        c.swap_fee_bps = MAX_FEE_BPS + 1;
        c.save_to_file(&path).unwrap();
        assert!(LaunchConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn test_validate_rules() {
        let mut c = LaunchConfig::default();
        c.pool_allotment = c.max_supply;
        assert!(c.validate().is_err());

        let mut c = LaunchConfig::default();
        c.treasury = c.fee_recipient.clone();
        assert!(c.validate().is_err());

        let mut c = LaunchConfig::default();
        c.funding_goal = 0;
        assert!(matches!(c.validate(), Err(LaunchError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_env() {
        std::env::set_var("ASCENT_CURVE_FEE_BPS", "50");
        std::env::set_var("ASCENT_CURVE_SHAPE", "quadratic");
        let c = LaunchConfig::load_from_env().unwrap();
        assert_eq!(c.curve_fee_bps, 50);
        assert_eq!(c.curve.shape, CurveShape::Quadratic);
        assert_eq!(c.funding_goal, FUNDING_GOAL);

        std::env::set_var("ASCENT_CURVE_FEE_BPS", "not-a-number");
        assert!(LaunchConfig::load_from_env().is_err());
        std::env::remove_var("ASCENT_CURVE_FEE_BPS");
        std::env::remove_var("ASCENT_CURVE_SHAPE");
    }
}
