// SPDX-License-Identifier: AGPL-3.0-only
//! Per-asset bonding-curve sale state.
//!
//! The ledger owns supply and base-currency accounting only. Token minting,
//! burning and native-value payouts are applied by the caller after a method
//! here returns `Ok`; every method validates fully before it mutates, so an
//! `Err` leaves the ledger untouched.

use crate::pricing::{CurveKind, PricingCurve};
use ascent_core::{u128_str, LaunchError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStatus {
    Trading,
    /// Terminal. Set once when funding reaches the goal.
    Migrated,
}

/// Result of a successful curve buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuyFill {
    /// Units to mint to the buyer.
    pub units: u128,
    /// Base currency absorbed by the curve.
    pub price: u128,
    /// Part of the offered value not absorbed.
    pub refund: u128,
    /// The held reserve reached the goal with this buy; the caller must migrate.
    pub goal_reached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondingCurveLedger {
    pub asset: String,
    pub curve: CurveKind,
    #[serde(with = "u128_str")]
    pub circulating_supply: u128,
    /// Cumulative base currency received by buys. Never decreases.
    #[serde(with = "u128_str")]
    pub funding_raised: u128,
    /// Base currency currently held for sell refunds and the pool seed.
    #[serde(with = "u128_str")]
    pub base_reserve: u128,
    #[serde(with = "u128_str")]
    pub curve_cap: u128,
    #[serde(with = "u128_str")]
    pub funding_goal: u128,
    pub status: CurveStatus,
    pub trade_count: u64,
}

impl BondingCurveLedger {
    pub fn new(asset: String, curve: CurveKind, curve_cap: u128, funding_goal: u128) -> Self {
        Self {
            asset,
            curve,
            circulating_supply: 0,
            funding_raised: 0,
            base_reserve: 0,
            curve_cap,
            funding_goal,
            status: CurveStatus::Trading,
            trade_count: 0,
        }
    }

    pub fn is_trading(&self) -> bool {
        self.status == CurveStatus::Trading
    }

    fn ensure_trading(&self) -> Result<(), LaunchError> {
        if self.is_trading() {
            Ok(())
        } else {
            Err(LaunchError::TradingClosed(self.asset.clone()))
        }
    }

    pub fn remaining_supply(&self) -> u128 {
        self.curve_cap.saturating_sub(self.circulating_supply)
    }

    /// Graduation is gated on the base currency still held, so sell refunds
    /// taken before the crossing buy count against the goal.
    pub fn goal_reached(&self) -> bool {
        self.base_reserve >= self.funding_goal
    }

    /// Progress toward the goal in basis points, capped at 10_000.
    pub fn progress_bps(&self) -> u128 {
        if self.funding_goal == 0 {
            return 10_000;
        }
        ascent_core::math::mul_div(
            self.base_reserve.min(self.funding_goal),
            10_000,
            self.funding_goal,
            ascent_core::math::Rounding::Down,
        )
        .unwrap_or(10_000)
    }

    pub fn spot_price(&self) -> Result<u128, LaunchError> {
        self.curve.spot_price(self.circulating_supply)
    }

    // ─────────────────────────────────────────────────────────────
    // QUOTES
    // ─────────────────────────────────────────────────────────────

    /// Price of buying `amount` units now.
    pub fn quote_buy(&self, amount: u128) -> Result<u128, LaunchError> {
        self.ensure_trading()?;
        self.curve
            .buy_cost(self.circulating_supply, amount, self.curve_cap)
    }

    /// Refund for selling `amount` units now.
    pub fn quote_sell(&self, amount: u128) -> Result<u128, LaunchError> {
        self.ensure_trading()?;
        self.curve.sell_refund(self.circulating_supply, amount)
    }

    /// Units a spend of `budget` would buy now.
    pub fn quote_units_for(&self, budget: u128) -> Result<u128, LaunchError> {
        self.ensure_trading()?;
        self.curve
            .units_for_budget(self.circulating_supply, budget, self.curve_cap)
    }

    // ─────────────────────────────────────────────────────────────
    // TRADES
    // ─────────────────────────────────────────────────────────────

    /// Buy exactly `amount` units, offering `paid`. The excess is refunded.
    pub fn buy(&mut self, amount: u128, paid: u128) -> Result<BuyFill, LaunchError> {
        let price = self.quote_buy(amount)?;
        if paid < price {
            return Err(LaunchError::InsufficientPayment {
                required: price,
                paid,
            });
        }
        self.apply_buy(amount, price, paid - price)
    }

    /// Spend `budget` on as many units as it covers.
    ///
    /// The whole budget is absorbed unless the curve cap limits the fill, in
    /// which case only the cost of the remaining units is charged.
    pub fn buy_with_budget(&mut self, budget: u128) -> Result<BuyFill, LaunchError> {
        self.ensure_trading()?;
        if budget == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let remaining = self.remaining_supply();
        if remaining == 0 {
            return Err(LaunchError::CurveCapExceeded {
                requested: 1,
                remaining: 0,
            });
        }
        let units = self.quote_units_for(budget)?;
        if units == 0 {
            let required = self.quote_buy(1)?;
            return Err(LaunchError::InsufficientPayment {
                required,
                paid: budget,
            });
        }
        let price = if units == remaining {
            self.quote_buy(units)?
        } else {
            budget
        };
        self.apply_buy(units, price, budget - price)
    }

    fn apply_buy(&mut self, units: u128, price: u128, refund: u128) -> Result<BuyFill, LaunchError> {
        let funding = self
            .funding_raised
            .checked_add(price)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        let reserve = self
            .base_reserve
            .checked_add(price)
            .ok_or(LaunchError::ArithmeticOverflow)?;

        self.circulating_supply += units;
        self.funding_raised = funding;
        self.base_reserve = reserve;
        self.trade_count += 1;

        Ok(BuyFill {
            units,
            price,
            refund,
            goal_reached: self.goal_reached(),
        })
    }

    /// Sell `amount` units held by a holder with `holder_balance`. Returns the refund.
    pub fn sell(&mut self, amount: u128, holder_balance: u128) -> Result<u128, LaunchError> {
        self.ensure_trading()?;
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        if holder_balance < amount {
            return Err(LaunchError::InsufficientBalance {
                have: holder_balance,
                need: amount,
            });
        }
        let refund = self.quote_sell(amount)?;
        if refund > self.base_reserve {
            return Err(LaunchError::InsufficientLiquidity(format!(
                "refund {} exceeds curve reserve {}",
                refund, self.base_reserve
            )));
        }

        self.circulating_supply -= amount;
        self.base_reserve -= refund;
        self.trade_count += 1;
        Ok(refund)
    }

    // ─────────────────────────────────────────────────────────────
    // MIGRATION
    // ─────────────────────────────────────────────────────────────

    /// Close the curve and release its base reserve as the pool seed.
    pub fn begin_migration(&mut self) -> Result<u128, LaunchError> {
        if !self.is_trading() {
            return Err(LaunchError::MigrationFailed(format!(
                "asset {} already migrated",
                self.asset
            )));
        }
        let seed = self.base_reserve;
        self.base_reserve = 0;
        self.status = CurveStatus::Migrated;
        log::debug!(
            "curve {} closed at supply {} with reserve {}",
            self.asset,
            self.circulating_supply,
            seed
        );
        Ok(seed)
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
