//! Bonding-curve pricing.
//!
//! A curve is a marginal-price function `p(s)` of circulating supply `s`,
//! quoted in atomic base units per whole token. The price of a trade is the
//! exact area under `p` between the two supply points. Each shape computes
//! that area as one rational `numerator / denominator` in 256-bit math, and
//! rounding happens once: up when the protocol receives payment, down when it
//! pays out.

use ascent_core::config::{CurveParams, CurveShape};
use ascent_core::math::{checked_add, checked_mul, div_round, narrow, widen, Rounding, U256};
use ascent_core::{u128_str, LaunchError, UNIT};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────
// STRATEGY TRAIT
// ─────────────────────────────────────────────────────────────

/// Curve shape strategy. Implementors provide the exact area; trade pricing
/// and its rounding are shared.
pub trait PricingCurve {
    /// Area under `p` over `[from, to]` in atomic base units, as `(num, den)`.
    fn area(&self, from: u128, to: u128) -> Result<(U256, U256), LaunchError>;

    /// Marginal price at `supply`, rounded down.
    fn spot_price(&self, supply: u128) -> Result<u128, LaunchError>;

    /// Price of moving supply from `supply_before` to `supply_before + amount`.
    fn cost(
        &self,
        supply_before: u128,
        amount: u128,
        curve_cap: u128,
        rounding: Rounding,
    ) -> Result<u128, LaunchError> {
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let remaining = curve_cap.saturating_sub(supply_before);
        if amount > remaining {
            return Err(LaunchError::CurveCapExceeded {
                requested: amount,
                remaining,
            });
        }
        let (num, den) = self.area(supply_before, supply_before + amount)?;
        narrow(div_round(num, den, rounding)?)
    }

    /// Amount a buyer pays for `amount` units. Rounds up.
    fn buy_cost(&self, supply: u128, amount: u128, curve_cap: u128) -> Result<u128, LaunchError> {
        self.cost(supply, amount, curve_cap, Rounding::Up)
    }

    /// Amount returned for selling `amount` units back from `supply`. Rounds down.
    fn sell_refund(&self, supply: u128, amount: u128) -> Result<u128, LaunchError> {
        if amount > supply {
            return Err(LaunchError::InsufficientLiquidity(format!(
                "cannot sell {} of {} circulating",
                amount, supply
            )));
        }
        self.cost(supply - amount, amount, supply, Rounding::Down)
    }

    /// Largest amount whose buy cost fits in `budget`, bounded by the cap.
    fn units_for_budget(
        &self,
        supply: u128,
        budget: u128,
        curve_cap: u128,
    ) -> Result<u128, LaunchError> {
        let remaining = curve_cap.saturating_sub(supply);
        if remaining == 0 || budget == 0 {
            return Ok(0);
        }
        if self.buy_cost(supply, remaining, curve_cap)? <= budget {
            return Ok(remaining);
        }
        // cost(lo) <= budget < cost(hi)
        let (mut lo, mut hi) = (0u128, remaining);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.buy_cost(supply, mid, curve_cap)? <= budget {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo)
    }
}

// ─────────────────────────────────────────────────────────────
// LINEAR
// ─────────────────────────────────────────────────────────────

/// `p(s) = initial_price + slope * s`, with `s` in whole tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearCurve {
    #[serde(with = "u128_str")]
    pub initial_price: u128,
    #[serde(with = "u128_str")]
    pub slope: u128,
}

impl PricingCurve for LinearCurve {
    fn area(&self, from: u128, to: u128) -> Result<(U256, U256), LaunchError> {
        // ∫ p = P0·a/U + k·(to² − from²)/(2U²), with to² − from² = a·(from + to)
        let a = widen(to - from);
        let unit = widen(UNIT);
        let flat = checked_mul(checked_mul(widen(2) * unit, widen(self.initial_price))?, a)?;
        let ramp = checked_mul(
            checked_mul(widen(self.slope), a)?,
            checked_add(widen(from), widen(to))?,
        )?;
        Ok((checked_add(flat, ramp)?, widen(2) * unit * unit))
    }

    fn spot_price(&self, supply: u128) -> Result<u128, LaunchError> {
        let ramp = checked_mul(widen(self.slope), widen(supply))? / widen(UNIT);
        narrow(checked_add(widen(self.initial_price), ramp)?)
    }
}

// ─────────────────────────────────────────────────────────────
// QUADRATIC
// ─────────────────────────────────────────────────────────────

/// `p(s) = initial_price + slope * s²`, with `s` in whole tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadraticCurve {
    #[serde(with = "u128_str")]
    pub initial_price: u128,
    #[serde(with = "u128_str")]
    pub slope: u128,
}

impl PricingCurve for QuadraticCurve {
    fn area(&self, from: u128, to: u128) -> Result<(U256, U256), LaunchError> {
        // ∫ p = P0·a/U + c·(to³ − from³)/(3U³), with to³ − from³ = a·(to² + to·from + from²)
        let a = widen(to - from);
        let (f, t) = (widen(from), widen(to));
        let unit = widen(UNIT);
        let unit_sq = unit * unit;
        let flat = checked_mul(checked_mul(widen(3) * unit_sq, widen(self.initial_price))?, a)?;
        let spread = checked_add(
            checked_add(checked_mul(t, t)?, checked_mul(t, f)?)?,
            checked_mul(f, f)?,
        )?;
        let ramp = checked_mul(checked_mul(widen(self.slope), a)?, spread)?;
        Ok((checked_add(flat, ramp)?, checked_mul(widen(3) * unit_sq, unit)?))
    }

    fn spot_price(&self, supply: u128) -> Result<u128, LaunchError> {
        let s = widen(supply);
        let ramp = checked_mul(widen(self.slope), checked_mul(s, s)?)? / (widen(UNIT) * widen(UNIT));
        narrow(checked_add(widen(self.initial_price), ramp)?)
    }
}

// ─────────────────────────────────────────────────────────────
// SELECTABLE SHAPE
// ─────────────────────────────────────────────────────────────

/// Curve carried by each ledger; serializable so ledgers can be snapshotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CurveKind {
    Linear(LinearCurve),
    Quadratic(QuadraticCurve),
}

impl CurveKind {
    pub fn from_params(params: &CurveParams) -> Self {
        match params.shape {
            CurveShape::Linear => CurveKind::Linear(LinearCurve {
                initial_price: params.initial_price,
                slope: params.slope,
            }),
            CurveShape::Quadratic => CurveKind::Quadratic(QuadraticCurve {
                initial_price: params.initial_price,
                slope: params.slope,
            }),
        }
    }

    /// Check that selling the whole cap is computable and raises at least `goal`.
    pub fn validate_goal(&self, curve_cap: u128, goal: u128) -> Result<u128, LaunchError> {
        let full = self
            .buy_cost(0, curve_cap, curve_cap)
            .map_err(|e| LaunchError::InvalidConfig(format!("curve cost over cap: {}", e)))?;
        if full < goal {
            return Err(LaunchError::InvalidConfig(format!(
                "funding goal {} unreachable: full curve raises {}",
                goal, full
            )));
        }
        Ok(full)
    }
}

impl PricingCurve for CurveKind {
    fn area(&self, from: u128, to: u128) -> Result<(U256, U256), LaunchError> {
        match self {
            CurveKind::Linear(c) => c.area(from, to),
            CurveKind::Quadratic(c) => c.area(from, to),
        }
    }

    fn spot_price(&self, supply: u128) -> Result<u128, LaunchError> {
        match self {
            CurveKind::Linear(c) => c.spot_price(supply),
            CurveKind::Quadratic(c) => c.spot_price(supply),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ascent_core::{CURVE_CAP, FUNDING_GOAL, INITIAL_PRICE, PRICE_SLOPE};

    fn linear() -> CurveKind {
        CurveKind::from_params(&CurveParams::default())
    }

    #[test]
    fn test_first_token_price() {
        // 1 token at the start: P0 + k/2 (area of the first unit-width trapezoid)
        let c = linear();
        let cost = c.buy_cost(0, UNIT, CURVE_CAP).unwrap();
        assert_eq!(cost, INITIAL_PRICE + PRICE_SLOPE / 2);
    }

    #[test]
    fn test_spot_price() {
        let c = linear();
        assert_eq!(c.spot_price(0).unwrap(), INITIAL_PRICE);
        assert_eq!(
            c.spot_price(1_000 * UNIT).unwrap(),
            INITIAL_PRICE + 1_000 * PRICE_SLOPE
        );
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(linear().buy_cost(0, 0, CURVE_CAP), Err(LaunchError::ZeroAmount));
    }

    #[test]
    fn test_cap_enforced() {
        let err = linear().buy_cost(CURVE_CAP - 5, 6, CURVE_CAP).unwrap_err();
        assert_eq!(
            err,
            LaunchError::CurveCapExceeded {
                requested: 6,
                remaining: 5
            }
        );
        assert!(linear().buy_cost(CURVE_CAP - 5, 5, CURVE_CAP).is_ok());
    }

    #[test]
    fn test_costs_are_additive_up_to_rounding() {
        let c = linear();
        let whole = c.buy_cost(0, 3_000 * UNIT, CURVE_CAP).unwrap();
        let a = c.buy_cost(0, 1_000 * UNIT, CURVE_CAP).unwrap();
        let b = c.buy_cost(1_000 * UNIT, 2_000 * UNIT, CURVE_CAP).unwrap();
        assert!(a + b >= whole);
        assert!(a + b <= whole + 1);
    }

    #[test]
    fn test_buy_rounds_up_sell_rounds_down() {
        let c = linear();
        let s = 12_345 * UNIT + 7;
        let cost = c.buy_cost(s, 3, CURVE_CAP).unwrap();
        let refund = c.sell_refund(s + 3, 3).unwrap();
        assert!(cost >= refund);
        assert!(cost - refund <= 1);
    }

    #[test]
    fn test_sell_more_than_supply() {
        assert!(matches!(
            linear().sell_refund(10, 11),
            Err(LaunchError::InsufficientLiquidity(_))
        ));
    }

    #[test]
    fn test_units_for_budget_is_maximal() {
        let c = linear();
        let s = 50_000 * UNIT;
        let budget = 2 * UNIT;
        let units = c.units_for_budget(s, budget, CURVE_CAP).unwrap();
        assert!(c.buy_cost(s, units, CURVE_CAP).unwrap() <= budget);
        assert!(c.buy_cost(s, units + 1, CURVE_CAP).unwrap() > budget);
    }

    #[test]
    fn test_units_for_budget_caps_at_remaining() {
        let c = linear();
        let s = CURVE_CAP - 10 * UNIT;
        assert_eq!(c.units_for_budget(s, 1_000 * UNIT, CURVE_CAP).unwrap(), 10 * UNIT);
        assert_eq!(c.units_for_budget(CURVE_CAP, UNIT, CURVE_CAP).unwrap(), 0);
    }

    #[test]
    fn test_default_goal_reachable() {
        let full = linear().validate_goal(CURVE_CAP, FUNDING_GOAL).unwrap();
        // 0.00003·800k + 1e-10·800k²/2 = 24 + 32 = 56 base
        assert_eq!(full, 56 * UNIT);
    }

    #[test]
    fn test_unreachable_goal_rejected() {
        let err = linear().validate_goal(CURVE_CAP, 57 * UNIT).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidConfig(_)));
    }

    #[test]
    fn test_quadratic_pricing() {
        let q = CurveKind::Quadratic(QuadraticCurve {
            initial_price: INITIAL_PRICE,
            slope: 1_000,
        });
        assert_eq!(q.spot_price(0).unwrap(), INITIAL_PRICE);
        assert_eq!(q.spot_price(1_000 * UNIT).unwrap(), INITIAL_PRICE + 1_000_000_000);
        let early = q.buy_cost(0, 1_000 * UNIT, CURVE_CAP).unwrap();
        let late = q.buy_cost(500_000 * UNIT, 1_000 * UNIT, CURVE_CAP).unwrap();
        assert!(late > early);
        // whole cap stays inside 256-bit intermediates
        assert!(q.buy_cost(0, CURVE_CAP, CURVE_CAP).is_ok());
    }

    #[test]
    fn test_curve_kind_json_tagged() {
        let json = serde_json::to_string(&linear()).unwrap();
        assert!(json.contains("\"shape\":\"linear\""));
        let back: CurveKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, linear());
    }
}
