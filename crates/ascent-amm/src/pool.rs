// SPDX-License-Identifier: AGPL-3.0-only
//! # Constant-Product Pool
//!
//! Reserve accounting for one asset / base-currency pair.
//!
//! ## Formulas
//! - First deposit: `minted = isqrt(asset_in × base_in)`
//! - Later deposits: `minted = min(asset_in × L / Ra, base_in × L / Rb)`
//! - Withdraw: `out = R × units / L` (rounded down)
//! - Swap: `out = Rout − ⌈Rin × Rout / (Rin + in_after_fee)⌉`
//!
//! The swap fee stays in the pool, so `Ra × Rb` never decreases across a
//! swap. All math is integer; products go through 256-bit intermediates.
//!
//! Liquidity units are an [`AssetToken`] living at the pool address, so
//! providers can transfer their share like any other token.
//!
//! The pool only accounts. Moving tokens and base currency in and out of it
//! is the caller's job, applied after the pool method returns `Ok`.

use ascent_core::math::{
    checked_mul, deduct_fee, div_round, isqrt_product, mul_div, narrow, widen, Rounding,
};
use ascent_core::{
    u128_str, AssetToken, LaunchError, SwapDirection, TokenEvent, BPS_DENOMINATOR, MAX_FEE_BPS,
};
use serde::{Deserialize, Serialize};

/// Ticker carried by every pool's liquidity token.
pub const LP_SYMBOL: &str = "ASC-LP";

// ─────────────────────────────────────────────────────────────
// RECEIPTS
// ─────────────────────────────────────────────────────────────

/// Outcome of a liquidity deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityReceipt {
    pub minted: u128,
    pub asset_used: u128,
    pub base_used: u128,
    /// Non-proportional excess returned to the provider.
    pub asset_refund: u128,
    pub base_refund: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome {
    pub amount_out: u128,
    pub fee: u128,
}

/// Read-only swap preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapQuote {
    #[serde(with = "u128_str")]
    pub amount_out: u128,
    #[serde(with = "u128_str")]
    pub fee: u128,
    /// Output shortfall versus the pre-trade spot price, in bps.
    #[serde(with = "u128_str")]
    pub price_impact_bps: u128,
}

/// A holder's share of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    #[serde(with = "u128_str")]
    pub units: u128,
    #[serde(with = "u128_str")]
    pub asset_amount: u128,
    #[serde(with = "u128_str")]
    pub base_amount: u128,
    /// Share of total liquidity, in bps.
    #[serde(with = "u128_str")]
    pub share_bps: u128,
}

// ─────────────────────────────────────────────────────────────
// POOL
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmmPool {
    pub address: String,
    pub asset: String,
    pub creator: String,
    #[serde(with = "u128_str")]
    pub reserve_asset: u128,
    #[serde(with = "u128_str")]
    pub reserve_base: u128,
    #[serde(with = "u128_str")]
    pub fee_bps: u128,
    lp_token: AssetToken,
    pub swap_count: u64,
}

impl AmmPool {
    /// Empty pool. `fee_bps` is capped at [`MAX_FEE_BPS`].
    pub fn new(
        address: String,
        asset: String,
        creator: String,
        fee_bps: u128,
    ) -> Result<Self, LaunchError> {
        if fee_bps > MAX_FEE_BPS {
            return Err(LaunchError::InvalidConfig(format!(
                "pool fee {} bps above max {}",
                fee_bps, MAX_FEE_BPS
            )));
        }
        let lp_name = format!("Liquidity-{}", asset.chars().take(32).collect::<String>());
        let lp_token = AssetToken::new(address.clone(), lp_name, LP_SYMBOL.to_string(), 0)?;
        Ok(Self {
            address,
            asset,
            creator,
            reserve_asset: 0,
            reserve_base: 0,
            fee_bps,
            lp_token,
            swap_count: 0,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity_supply() == 0
    }

    /// Outstanding liquidity units.
    pub fn liquidity_supply(&self) -> u128 {
        self.lp_token.total_supply()
    }

    pub fn liquidity_of(&self, holder: &str) -> u128 {
        self.lp_token.balance_of(holder)
    }

    pub fn provider_count(&self) -> usize {
        self.lp_token.holder_count()
    }

    /// The pool's liquidity token; its address is the pool address.
    pub fn lp_token(&self) -> &AssetToken {
        &self.lp_token
    }

    /// Move liquidity units between holders. Reserves are untouched.
    pub fn transfer_liquidity(
        &mut self,
        from: &str,
        to: &str,
        units: u128,
    ) -> Result<TokenEvent, LaunchError> {
        self.lp_token.transfer(from, to, units)
    }

    /// Base currency per whole asset token, scaled by `scale`.
    pub fn spot_price(&self, scale: u128) -> Result<u128, LaunchError> {
        if self.reserve_asset == 0 {
            return Err(LaunchError::InsufficientLiquidity("pool is empty".to_string()));
        }
        mul_div(self.reserve_base, scale, self.reserve_asset, Rounding::Down)
    }

    // ─────────────────────────────────────────────────────────────
    // LIQUIDITY
    // ─────────────────────────────────────────────────────────────

    /// Deposit both reserves. Later deposits must match the reserve ratio
    /// within `tolerance_bps`; any excess is reported back as a refund.
    pub fn add_liquidity(
        &mut self,
        provider: &str,
        asset_in: u128,
        base_in: u128,
        tolerance_bps: u128,
    ) -> Result<LiquidityReceipt, LaunchError> {
        if asset_in == 0 || base_in == 0 {
            return Err(LaunchError::ZeroAmount);
        }

        let receipt = if self.is_empty() {
            let minted = isqrt_product(asset_in, base_in)?;
            LiquidityReceipt {
                minted,
                asset_used: asset_in,
                base_used: base_in,
                asset_refund: 0,
                base_refund: 0,
            }
        } else {
            let deviation_bps = self.ratio_deviation_bps(asset_in, base_in)?;
            if deviation_bps > tolerance_bps {
                return Err(LaunchError::DisproportionateDeposit {
                    deviation_bps,
                    tolerance_bps,
                });
            }
            let l = self.liquidity_supply();
            let by_asset = mul_div(asset_in, l, self.reserve_asset, Rounding::Down)?;
            let by_base = mul_div(base_in, l, self.reserve_base, Rounding::Down)?;
            let minted = by_asset.min(by_base);
            // Rounded up so a deposit never buys a share cheaper than its reserves.
            let asset_used = mul_div(minted, self.reserve_asset, l, Rounding::Up)?;
            let base_used = mul_div(minted, self.reserve_base, l, Rounding::Up)?;
            LiquidityReceipt {
                minted,
                asset_used,
                base_used,
                asset_refund: asset_in - asset_used,
                base_refund: base_in - base_used,
            }
        };

        if receipt.minted == 0 {
            return Err(LaunchError::InsufficientLiquidity(
                "deposit too small to mint liquidity".to_string(),
            ));
        }

        let reserve_asset = self
            .reserve_asset
            .checked_add(receipt.asset_used)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        let reserve_base = self
            .reserve_base
            .checked_add(receipt.base_used)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        self.lp_token.mint(provider, receipt.minted)?;
        self.reserve_asset = reserve_asset;
        self.reserve_base = reserve_base;
        Ok(receipt)
    }

    /// Burn `units` of the provider's liquidity. Returns `(asset_out, base_out)`.
    pub fn remove_liquidity(
        &mut self,
        provider: &str,
        units: u128,
    ) -> Result<(u128, u128), LaunchError> {
        if units == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let held = self.liquidity_of(provider);
        if held < units {
            return Err(LaunchError::InsufficientBalance { have: held, need: units });
        }

        let l = self.liquidity_supply();
        let asset_out = mul_div(self.reserve_asset, units, l, Rounding::Down)?;
        let base_out = mul_div(self.reserve_base, units, l, Rounding::Down)?;

        self.lp_token.burn(provider, units)?;
        self.reserve_asset -= asset_out;
        self.reserve_base -= base_out;
        // the last holder redeems everything
        debug_assert!(
            !self.is_empty() || (self.reserve_asset == 0 && self.reserve_base == 0)
        );
        Ok((asset_out, base_out))
    }

    /// |asset_in·Rb − base_in·Ra| / max(...), in bps.
    fn ratio_deviation_bps(&self, asset_in: u128, base_in: u128) -> Result<u128, LaunchError> {
        let lhs = checked_mul(widen(asset_in), widen(self.reserve_base))?;
        let rhs = checked_mul(widen(base_in), widen(self.reserve_asset))?;
        let (hi, lo) = if lhs >= rhs { (lhs, rhs) } else { (rhs, lhs) };
        let gap = checked_mul(hi - lo, widen(BPS_DENOMINATOR))?;
        narrow(div_round(gap, hi, Rounding::Up)?)
    }

    // ─────────────────────────────────────────────────────────────
    // SWAPS
    // ─────────────────────────────────────────────────────────────

    fn reserves_for(&self, direction: SwapDirection) -> (u128, u128) {
        match direction {
            SwapDirection::AssetToBase => (self.reserve_asset, self.reserve_base),
            SwapDirection::BaseToAsset => (self.reserve_base, self.reserve_asset),
        }
    }

    fn compute_swap(
        &self,
        direction: SwapDirection,
        amount_in: u128,
    ) -> Result<SwapOutcome, LaunchError> {
        if amount_in == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        if reserve_in == 0 || reserve_out == 0 {
            return Err(LaunchError::InsufficientLiquidity("pool is empty".to_string()));
        }

        let (after_fee, fee) = deduct_fee(amount_in, self.fee_bps)?;
        let k = checked_mul(widen(reserve_in), widen(reserve_out))?;
        let denom = widen(reserve_in) + widen(after_fee);
        let new_reserve_out = narrow(div_round(k, denom, Rounding::Up)?)?;
        let amount_out = reserve_out.saturating_sub(new_reserve_out);

        if amount_out >= reserve_out {
            return Err(LaunchError::InsufficientLiquidity(
                "output would drain the pool".to_string(),
            ));
        }
        Ok(SwapOutcome { amount_out, fee })
    }

    /// Swap `amount_in` of one reserve for the other.
    pub fn swap(
        &mut self,
        direction: SwapDirection,
        amount_in: u128,
        min_amount_out: u128,
    ) -> Result<SwapOutcome, LaunchError> {
        let outcome = self.compute_swap(direction, amount_in)?;
        if outcome.amount_out < min_amount_out {
            return Err(LaunchError::SlippageExceeded {
                out: outcome.amount_out,
                min: min_amount_out,
            });
        }
        if outcome.amount_out == 0 {
            return Err(LaunchError::InsufficientLiquidity(
                "output rounds to zero".to_string(),
            ));
        }

        let (reserve_in, reserve_out) = self.reserves_for(direction);
        let new_in = reserve_in
            .checked_add(amount_in)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        let new_out = reserve_out - outcome.amount_out;

        let k_before = checked_mul(widen(reserve_in), widen(reserve_out))?;
        let k_after = checked_mul(widen(new_in), widen(new_out))?;
        if k_after < k_before {
            return Err(LaunchError::InvariantViolation(format!(
                "k decreased from {} to {}",
                k_before, k_after
            )));
        }

        match direction {
            SwapDirection::AssetToBase => {
                self.reserve_asset = new_in;
                self.reserve_base = new_out;
            }
            SwapDirection::BaseToAsset => {
                self.reserve_base = new_in;
                self.reserve_asset = new_out;
            }
        }
        self.swap_count += 1;
        Ok(outcome)
    }

    /// Preview a swap without changing reserves.
    pub fn quote_swap(
        &self,
        direction: SwapDirection,
        amount_in: u128,
    ) -> Result<SwapQuote, LaunchError> {
        let outcome = self.compute_swap(direction, amount_in)?;
        let (reserve_in, reserve_out) = self.reserves_for(direction);
        // output at the pre-trade spot price, fee included
        let ideal = mul_div(amount_in, reserve_out, reserve_in, Rounding::Down)?;
        let price_impact_bps = if ideal > outcome.amount_out && ideal > 0 {
            mul_div(ideal - outcome.amount_out, BPS_DENOMINATOR, ideal, Rounding::Down)?
        } else {
            0
        };
        Ok(SwapQuote {
            amount_out: outcome.amount_out,
            fee: outcome.fee,
            price_impact_bps,
        })
    }

    pub fn position(&self, holder: &str) -> Result<Position, LaunchError> {
        let units = self.liquidity_of(holder);
        if units == 0 || self.is_empty() {
            return Ok(Position {
                units,
                asset_amount: 0,
                base_amount: 0,
                share_bps: 0,
            });
        }
        let l = self.liquidity_supply();
        Ok(Position {
            units,
            asset_amount: mul_div(self.reserve_asset, units, l, Rounding::Down)?,
            base_amount: mul_div(self.reserve_base, units, l, Rounding::Down)?,
            share_bps: mul_div(units, BPS_DENOMINATOR, l, Rounding::Down)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
