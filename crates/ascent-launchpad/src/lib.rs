// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ASCENT LAUNCHPAD - ENGINE MODULE
//
// Thread-safe launchpad over the curve, token and pool primitives.
// - Asset factory: fee-gated launches with deterministic addresses
// - Curve trading with automatic, atomic graduation into a pool
// - Pool liquidity and swaps for graduated assets
// - Native base-currency bank, settled after state commits
// - Typed event stream for observers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod factory;
pub mod migration;
pub mod settlement;

pub use factory::{AssetEntry, AssetHandle, AssetInfo, AssetMetadata, AssetRecord, AssetRegistry};
pub use migration::{graduate, Graduation};
pub use settlement::{NativeBank, PreparedSettlement, Settlement};

use ascent_amm::{LiquidityReceipt, PoolInfo, PoolRegistry, Position, SwapQuote};
use ascent_core::math::{bps_of, deduct_fee};
use ascent_core::{
    format_units, u128_str, EventBus, LaunchConfig, LaunchError, LaunchEvent, SwapDirection,
    TokenEvent, TradeSide, POOL_PREFIX,
};
use ascent_curve::{BondingCurveLedger, BuyFill, CurveKind};
use serde::Serialize;
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};

// ─────────────────────────────────────────────────────────────
// RECEIPTS
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuyReceipt {
    #[serde(with = "u128_str")]
    pub units: u128,
    /// Base currency absorbed by the curve.
    #[serde(with = "u128_str")]
    pub price: u128,
    #[serde(with = "u128_str")]
    pub fee: u128,
    #[serde(with = "u128_str")]
    pub refund: u128,
    /// Set when this buy graduated the asset.
    pub migrated_pool: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SellReceipt {
    #[serde(with = "u128_str")]
    pub units: u128,
    /// Curve refund before the fee.
    #[serde(with = "u128_str")]
    pub refund: u128,
    #[serde(with = "u128_str")]
    pub fee: u128,
    #[serde(with = "u128_str")]
    pub payout: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapReceipt {
    pub direction: SwapDirection,
    #[serde(with = "u128_str")]
    pub amount_in: u128,
    #[serde(with = "u128_str")]
    pub amount_out: u128,
    #[serde(with = "u128_str")]
    pub fee: u128,
}

/// Read-only export of the engine state.
#[derive(Debug, Clone, Serialize)]
pub struct LaunchSnapshot {
    pub assets: Vec<AssetInfo>,
    pub pools: Vec<PoolInfo>,
    #[serde(with = "u128_str")]
    pub native_total: u128,
    #[serde(with = "u128_str")]
    pub native_deposited: u128,
}

// ─────────────────────────────────────────────────────────────
// ENGINE
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct LaunchState {
    assets: AssetRegistry,
    pools: PoolRegistry,
    bank: NativeBank,
}

/// The launchpad engine. Cheap to clone; clones share state.
///
/// Every public operation takes the state lock once, stages copies of the
/// records it touches, checks the native settlement, commits, and publishes
/// its events before releasing the lock.
#[derive(Debug, Clone)]
pub struct Launchpad {
    config: Arc<LaunchConfig>,
    state: Arc<Mutex<LaunchState>>,
    events: EventBus,
}

impl Launchpad {
    /// Build an engine. The config must validate and its curve must be able
    /// to reach the funding goal within the curve cap.
    pub fn new(config: LaunchConfig) -> Result<Self, LaunchError> {
        config.validate()?;
        let full = CurveKind::from_params(&config.curve)
            .validate_goal(config.curve_cap(), config.funding_goal)?;
        log::info!(
            "launchpad ready: curve cap {} tokens raises up to {} base, goal {} base",
            format_units(config.curve_cap()),
            format_units(full),
            format_units(config.funding_goal)
        );
        Ok(Self {
            config: Arc::new(config),
            state: Arc::new(Mutex::new(LaunchState::default())),
            events: EventBus::new(),
        })
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Receive every event committed from now on.
    pub fn subscribe(&self) -> Receiver<LaunchEvent> {
        self.events.subscribe()
    }

    fn lock(&self) -> Result<MutexGuard<'_, LaunchState>, LaunchError> {
        self.state.lock().map_err(|_| LaunchError::StateUnavailable)
    }

    /// Treasury and pool accounts only move value through migration and pool
    /// operations.
    fn ensure_account(&self, account: &str) -> Result<(), LaunchError> {
        if account.is_empty() {
            return Err(LaunchError::InvalidMetadata("empty account".to_string()));
        }
        if account == self.config.treasury || account.starts_with(POOL_PREFIX) {
            return Err(LaunchError::ReservedAccount(account.to_string()));
        }
        Ok(())
    }

    fn publish(&self, events: &[LaunchEvent]) {
        for ev in events {
            log::debug!("event {}", ev.kind());
        }
        self.events.publish(events);
    }

    // ─────────────────────────────────────────────────────────────
    // NATIVE BANK
    // ─────────────────────────────────────────────────────────────

    /// Credit external base currency to `account`. Returns the new balance.
    pub fn deposit_native(&self, account: &str, amount: u128) -> Result<u128, LaunchError> {
        self.ensure_account(account)?;
        let mut state = self.lock()?;
        let balance = state.bank.deposit(account, amount)?;
        log::debug!("deposit {} base to {}", format_units(amount), account);
        Ok(balance)
    }

    pub fn native_balance(&self, account: &str) -> Result<u128, LaunchError> {
        Ok(self.lock()?.bank.balance_of(account))
    }

    /// Bank balances plus curve and pool base reserves must equal deposits.
    pub fn audit(&self) -> Result<(), LaunchError> {
        let state = self.lock()?;
        let curves = state
            .assets
            .iter()
            .fold(0u128, |acc, e| acc.saturating_add(e.ledger.base_reserve));
        let pools = state
            .pools
            .list_pools()
            .iter()
            .fold(0u128, |acc, p| acc.saturating_add(p.reserve_base));
        state
            .bank
            .audit(curves.saturating_add(pools))
            .map_err(LaunchError::InvariantViolation)
    }

    // ─────────────────────────────────────────────────────────────
    // ASSET FACTORY
    // ─────────────────────────────────────────────────────────────

    /// Launch a new asset. `fee_paid` is debited from the creator; the
    /// creation fee goes to the fee recipient and the excess is refunded.
    pub fn create_asset(
        &self,
        creator: &str,
        metadata: AssetMetadata,
        fee_paid: u128,
    ) -> Result<String, LaunchError> {
        self.ensure_account(creator)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let entry = state
            .assets
            .prepare_asset(creator, metadata, fee_paid, &self.config)?;
        let fee = self.config.creation_fee;
        let mut settlement = Settlement::new();
        settlement
            .debit(creator, fee_paid)
            .credit(&self.config.fee_recipient, fee)
            .credit(creator, fee_paid - fee);
        let prepared = settlement.prepare(&state.bank)?;

        let address = entry.record.address.clone();
        let events = vec![
            LaunchEvent::AssetCreated {
                asset: address.clone(),
                creator: creator.to_string(),
                name: entry.record.metadata.name.clone(),
                symbol: entry.record.metadata.symbol.clone(),
                fee,
            },
            LaunchEvent::Token {
                asset: address.clone(),
                change: TokenEvent::Mint {
                    to: self.config.treasury.clone(),
                    amount: self.config.pool_allotment,
                },
            },
        ];

        let symbol = entry.record.metadata.symbol.clone();
        state.assets.insert(entry)?;
        state.bank.apply(prepared);
        log::info!("asset {} ({}) launched by {}", address, symbol, creator);
        self.publish(&events);
        Ok(address)
    }

    // ─────────────────────────────────────────────────────────────
    // CURVE TRADING
    // ─────────────────────────────────────────────────────────────

    /// Buy exactly `amount` units, offering `paid`. The curve price plus the
    /// curve fee is charged and the rest refunded. Crossing the funding goal
    /// graduates the asset in the same operation.
    pub fn buy(
        &self,
        buyer: &str,
        asset: &str,
        amount: u128,
        paid: u128,
    ) -> Result<BuyReceipt, LaunchError> {
        self.ensure_account(buyer)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let handle = state.assets.handle(asset)?;
        let mut entry = state.assets.entry(handle).clone();

        let price = entry.ledger.quote_buy(amount)?;
        let fee = bps_of(price, self.config.curve_fee_bps)?;
        let required = price.checked_add(fee).ok_or(LaunchError::ArithmeticOverflow)?;
        if paid < required {
            return Err(LaunchError::InsufficientPayment { required, paid });
        }
        let fill = entry.ledger.buy(amount, price)?;
        self.settle_buy(state, handle, entry, buyer, fill, fee, paid)
    }

    /// Spend `budget` (curve fee included) on as many units as it buys.
    /// Fails with `SlippageExceeded` when fewer than `min_units` result.
    pub fn buy_with_budget(
        &self,
        buyer: &str,
        asset: &str,
        budget: u128,
        min_units: u128,
    ) -> Result<BuyReceipt, LaunchError> {
        self.ensure_account(buyer)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let handle = state.assets.handle(asset)?;
        let mut entry = state.assets.entry(handle).clone();

        let (spend, budget_fee) = deduct_fee(budget, self.config.curve_fee_bps)?;
        let fill = entry.ledger.buy_with_budget(spend)?;
        if fill.units < min_units {
            return Err(LaunchError::SlippageExceeded {
                out: fill.units,
                min: min_units,
            });
        }
        // a cap-limited fill only pays the fee on what it bought
        let fee = if fill.refund > 0 {
            bps_of(fill.price, self.config.curve_fee_bps)?
        } else {
            budget_fee
        };
        self.settle_buy(state, handle, entry, buyer, fill, fee, budget)
    }

    #[allow(clippy::too_many_arguments)]
    fn settle_buy(
        &self,
        state: &mut LaunchState,
        handle: AssetHandle,
        mut entry: AssetEntry,
        buyer: &str,
        fill: BuyFill,
        fee: u128,
        paid: u128,
    ) -> Result<BuyReceipt, LaunchError> {
        let asset = entry.record.address.clone();
        let mint = entry.token.mint(buyer, fill.units)?;
        let mut events = vec![
            LaunchEvent::Token {
                asset: asset.clone(),
                change: mint,
            },
            LaunchEvent::CurveTrade {
                asset: asset.clone(),
                trader: buyer.to_string(),
                side: TradeSide::Buy,
                units: fill.units,
                base_amount: fill.price,
                fee,
                circulating_supply: entry.ledger.circulating_supply,
                funding_raised: entry.ledger.funding_raised,
            },
        ];

        let graduation = if fill.goal_reached {
            Some(graduate(&mut entry, &state.pools, &self.config)?)
        } else {
            None
        };

        let refund = paid
            .checked_sub(fill.price)
            .and_then(|r| r.checked_sub(fee))
            .ok_or(LaunchError::InsufficientPayment {
                required: fill.price.saturating_add(fee),
                paid,
            })?;
        let mut settlement = Settlement::new();
        settlement
            .debit(buyer, paid)
            .credit(&self.config.fee_recipient, fee)
            .credit(buyer, refund);
        let prepared = settlement.prepare(&state.bank)?;

        // commit: pool first (the only fallible step), then asset, then value
        let migrated_pool = match graduation {
            Some(g) => {
                let address = g.pool.address.clone();
                match g.pool_handle {
                    Some(h) => state.pools.commit(h, g.pool)?,
                    None => {
                        state.pools.insert(g.pool)?;
                    }
                }
                events.extend(g.events);
                Some(address)
            }
            None => None,
        };
        state.assets.commit(handle, entry);
        state.bank.apply(prepared);

        log::info!(
            "buy {} units of {} for {} base by {}",
            format_units(fill.units),
            asset,
            format_units(fill.price),
            buyer
        );
        self.publish(&events);
        Ok(BuyReceipt {
            units: fill.units,
            price: fill.price,
            fee,
            refund,
            migrated_pool,
        })
    }

    /// Sell `amount` units back to the curve.
    pub fn sell(&self, seller: &str, asset: &str, amount: u128) -> Result<SellReceipt, LaunchError> {
        self.ensure_account(seller)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let handle = state.assets.handle(asset)?;
        let mut entry = state.assets.entry(handle).clone();

        let held = entry.token.balance_of(seller);
        let refund = entry.ledger.sell(amount, held)?;
        let burn = entry.token.burn(seller, amount)?;
        let (payout, fee) = deduct_fee(refund, self.config.curve_fee_bps)?;

        let mut settlement = Settlement::new();
        settlement
            .credit(seller, payout)
            .credit(&self.config.fee_recipient, fee);
        let prepared = settlement.prepare(&state.bank)?;

        let events = vec![
            LaunchEvent::Token {
                asset: asset.to_string(),
                change: burn,
            },
            LaunchEvent::CurveTrade {
                asset: asset.to_string(),
                trader: seller.to_string(),
                side: TradeSide::Sell,
                units: amount,
                base_amount: refund,
                fee,
                circulating_supply: entry.ledger.circulating_supply,
                funding_raised: entry.ledger.funding_raised,
            },
        ];
        state.assets.commit(handle, entry);
        state.bank.apply(prepared);

        log::info!(
            "sell {} units of {} for {} base by {}",
            format_units(amount),
            asset,
            format_units(payout),
            seller
        );
        self.publish(&events);
        Ok(SellReceipt {
            units: amount,
            refund,
            fee,
            payout,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // TOKEN TRANSFERS
    // ─────────────────────────────────────────────────────────────

    pub fn transfer_asset(
        &self,
        from: &str,
        asset: &str,
        to: &str,
        amount: u128,
    ) -> Result<(), LaunchError> {
        self.ensure_account(from)?;
        self.ensure_account(to)?;
        self.with_token(asset, |token| token.transfer(from, to, amount))
    }

    /// Let `spender` move up to `amount` of `owner`'s tokens.
    pub fn approve_asset(
        &self,
        owner: &str,
        asset: &str,
        spender: &str,
        amount: u128,
    ) -> Result<(), LaunchError> {
        self.ensure_account(owner)?;
        self.ensure_account(spender)?;
        self.with_token(asset, |token| Ok(token.approve(owner, spender, amount)))
    }

    pub fn transfer_asset_from(
        &self,
        spender: &str,
        asset: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<(), LaunchError> {
        self.ensure_account(spender)?;
        self.ensure_account(from)?;
        self.ensure_account(to)?;
        self.with_token(asset, |token| token.transfer_from(spender, from, to, amount))
    }

    fn with_token<F>(&self, asset: &str, op: F) -> Result<(), LaunchError>
    where
        F: FnOnce(&mut ascent_core::AssetToken) -> Result<TokenEvent, LaunchError>,
    {
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let handle = state.assets.handle(asset)?;
        let mut entry = state.assets.entry(handle).clone();
        let change = op(&mut entry.token)?;
        state.assets.commit(handle, entry);
        self.publish(&[LaunchEvent::Token {
            asset: asset.to_string(),
            change,
        }]);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    // POOLS
    // ─────────────────────────────────────────────────────────────

    /// Create an empty pool for a launched asset. It accepts liquidity only
    /// once the asset has graduated.
    pub fn create_pool(&self, caller: &str, asset: &str) -> Result<String, LaunchError> {
        self.ensure_account(caller)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        state.assets.handle(asset)?;
        let handle = state
            .pools
            .create_pool(asset, caller, self.config.swap_fee_bps)?;
        let address = state.pools.pool(handle).address.clone();
        self.publish(&[LaunchEvent::PoolCreated {
            asset: asset.to_string(),
            pool: address.clone(),
            creator: caller.to_string(),
        }]);
        Ok(address)
    }

    /// Deposit `asset_amount` tokens and `paid` base currency. The
    /// non-proportional excess of either side stays with the provider.
    pub fn add_liquidity(
        &self,
        provider: &str,
        pool: &str,
        asset_amount: u128,
        paid: u128,
    ) -> Result<LiquidityReceipt, LaunchError> {
        self.ensure_account(provider)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let pool_handle = state.pools.handle_for_address(pool)?;
        let mut staged = state.pools.pool(pool_handle).clone();
        let asset_handle = state.assets.handle(&staged.asset)?;
        let mut entry = state.assets.entry(asset_handle).clone();
        if entry.ledger.is_trading() {
            return Err(LaunchError::CurveStillTrading(staged.asset.clone()));
        }
        let held = entry.token.balance_of(provider);
        if held < asset_amount {
            return Err(LaunchError::InsufficientBalance {
                have: held,
                need: asset_amount,
            });
        }

        let receipt = staged.add_liquidity(
            provider,
            asset_amount,
            paid,
            self.config.liquidity_tolerance_bps,
        )?;
        let transfer = entry
            .token
            .transfer(provider, &staged.address, receipt.asset_used)?;
        let mut settlement = Settlement::new();
        settlement
            .debit(provider, paid)
            .credit(provider, receipt.base_refund);
        let prepared = settlement.prepare(&state.bank)?;

        let events = [
            LaunchEvent::Token {
                asset: staged.asset.clone(),
                change: transfer,
            },
            LaunchEvent::LiquidityAdded {
                pool: staged.address.clone(),
                provider: provider.to_string(),
                asset_amount: receipt.asset_used,
                base_amount: receipt.base_used,
                liquidity_minted: receipt.minted,
            },
        ];
        state.pools.commit(pool_handle, staged)?;
        state.assets.commit(asset_handle, entry);
        state.bank.apply(prepared);

        log::info!(
            "liquidity +{} units in {} by {}",
            receipt.minted,
            pool,
            provider
        );
        self.publish(&events);
        Ok(receipt)
    }

    /// Burn `units` of the provider's liquidity. Returns `(asset_out, base_out)`.
    pub fn remove_liquidity(
        &self,
        provider: &str,
        pool: &str,
        units: u128,
    ) -> Result<(u128, u128), LaunchError> {
        self.ensure_account(provider)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let pool_handle = state.pools.handle_for_address(pool)?;
        let mut staged = state.pools.pool(pool_handle).clone();
        let asset_handle = state.assets.handle(&staged.asset)?;
        let mut entry = state.assets.entry(asset_handle).clone();

        let (asset_out, base_out) = staged.remove_liquidity(provider, units)?;
        let mut events = Vec::with_capacity(2);
        if asset_out > 0 {
            let transfer = entry.token.transfer(&staged.address, provider, asset_out)?;
            events.push(LaunchEvent::Token {
                asset: staged.asset.clone(),
                change: transfer,
            });
        }
        let mut settlement = Settlement::new();
        settlement.credit(provider, base_out);
        let prepared = settlement.prepare(&state.bank)?;

        events.push(LaunchEvent::LiquidityRemoved {
            pool: staged.address.clone(),
            provider: provider.to_string(),
            asset_amount: asset_out,
            base_amount: base_out,
            liquidity_burned: units,
        });
        state.pools.commit(pool_handle, staged)?;
        state.assets.commit(asset_handle, entry);
        state.bank.apply(prepared);

        log::info!("liquidity -{} units in {} by {}", units, pool, provider);
        self.publish(&events);
        Ok((asset_out, base_out))
    }

    /// Move liquidity units of `pool` from `from` to `to`. The treasury's
    /// migrated units stay locked because reserved accounts cannot send.
    pub fn transfer_liquidity(
        &self,
        from: &str,
        pool: &str,
        to: &str,
        units: u128,
    ) -> Result<(), LaunchError> {
        self.ensure_account(from)?;
        self.ensure_account(to)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let handle = state.pools.handle_for_address(pool)?;
        let mut staged = state.pools.pool(handle).clone();
        let change = staged.transfer_liquidity(from, to, units)?;
        state.pools.commit(handle, staged)?;

        log::debug!("{} liquidity units of {} moved {} -> {}", units, pool, from, to);
        self.publish(&[LaunchEvent::Token {
            asset: pool.to_string(),
            change,
        }]);
        Ok(())
    }

    /// Swap against a pool. Asset input comes from the trader's token
    /// balance, base input from the trader's native balance.
    pub fn swap(
        &self,
        trader: &str,
        pool: &str,
        amount_in: u128,
        direction: SwapDirection,
        min_amount_out: u128,
    ) -> Result<SwapReceipt, LaunchError> {
        self.ensure_account(trader)?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let pool_handle = state.pools.handle_for_address(pool)?;
        let mut staged = state.pools.pool(pool_handle).clone();
        let asset_handle = state.assets.handle(&staged.asset)?;
        let mut entry = state.assets.entry(asset_handle).clone();

        let outcome = staged.swap(direction, amount_in, min_amount_out)?;
        let mut settlement = Settlement::new();
        let transfer = match direction {
            SwapDirection::AssetToBase => {
                settlement.credit(trader, outcome.amount_out);
                entry.token.transfer(trader, &staged.address, amount_in)?
            }
            SwapDirection::BaseToAsset => {
                settlement.debit(trader, amount_in);
                entry
                    .token
                    .transfer(&staged.address, trader, outcome.amount_out)?
            }
        };
        let prepared = settlement.prepare(&state.bank)?;

        let events = [
            LaunchEvent::Token {
                asset: staged.asset.clone(),
                change: transfer,
            },
            LaunchEvent::Swap {
                pool: staged.address.clone(),
                trader: trader.to_string(),
                direction,
                amount_in,
                amount_out: outcome.amount_out,
                fee: outcome.fee,
            },
        ];
        state.pools.commit(pool_handle, staged)?;
        state.assets.commit(asset_handle, entry);
        state.bank.apply(prepared);

        log::debug!(
            "swap {:?} {} -> {} in {} by {}",
            direction,
            amount_in,
            outcome.amount_out,
            pool,
            trader
        );
        self.publish(&events);
        Ok(SwapReceipt {
            direction,
            amount_in,
            amount_out: outcome.amount_out,
            fee: outcome.fee,
        })
    }

    // ─────────────────────────────────────────────────────────────
    // QUERIES
    // ─────────────────────────────────────────────────────────────

    /// Total to offer for `amount` units, curve fee included.
    pub fn quote_buy(&self, asset: &str, amount: u128) -> Result<u128, LaunchError> {
        let state = self.lock()?;
        let price = state.assets.get(asset)?.ledger.quote_buy(amount)?;
        let fee = bps_of(price, self.config.curve_fee_bps)?;
        price.checked_add(fee).ok_or(LaunchError::ArithmeticOverflow)
    }

    /// Payout for selling `amount` units, after the curve fee.
    pub fn quote_sell(&self, asset: &str, amount: u128) -> Result<u128, LaunchError> {
        let state = self.lock()?;
        let refund = state.assets.get(asset)?.ledger.quote_sell(amount)?;
        Ok(deduct_fee(refund, self.config.curve_fee_bps)?.0)
    }

    /// Units a budget (curve fee included) buys now.
    pub fn quote_units_for(&self, asset: &str, budget: u128) -> Result<u128, LaunchError> {
        let state = self.lock()?;
        let (spend, _) = deduct_fee(budget, self.config.curve_fee_bps)?;
        state.assets.get(asset)?.ledger.quote_units_for(spend)
    }

    pub fn quote_swap(
        &self,
        pool: &str,
        direction: SwapDirection,
        amount_in: u128,
    ) -> Result<SwapQuote, LaunchError> {
        let state = self.lock()?;
        state.pools.pool_by_address(pool)?.quote_swap(direction, amount_in)
    }

    pub fn list_assets(&self) -> Result<Vec<AssetInfo>, LaunchError> {
        Ok(self.lock()?.assets.list())
    }

    pub fn asset(&self, asset: &str) -> Result<AssetInfo, LaunchError> {
        let state = self.lock()?;
        Ok(AssetInfo::from(state.assets.get(asset)?))
    }

    pub fn asset_record(&self, asset: &str) -> Result<AssetRecord, LaunchError> {
        Ok(self.lock()?.assets.get(asset)?.record.clone())
    }

    pub fn curve_state(&self, asset: &str) -> Result<BondingCurveLedger, LaunchError> {
        Ok(self.lock()?.assets.get(asset)?.ledger.clone())
    }

    pub fn asset_balance(&self, asset: &str, holder: &str) -> Result<u128, LaunchError> {
        Ok(self.lock()?.assets.get(asset)?.token.balance_of(holder))
    }

    pub fn asset_supply(&self, asset: &str) -> Result<u128, LaunchError> {
        Ok(self.lock()?.assets.get(asset)?.token.total_supply())
    }

    /// Pool of `asset`; `PoolNotFound` when none exists.
    pub fn get_pool_for(&self, asset: &str) -> Result<PoolInfo, LaunchError> {
        let state = self.lock()?;
        Ok(PoolInfo::from(state.pools.get_pool(asset)?))
    }

    pub fn pool(&self, pool: &str) -> Result<PoolInfo, LaunchError> {
        let state = self.lock()?;
        Ok(PoolInfo::from(state.pools.pool_by_address(pool)?))
    }

    pub fn list_pools(&self) -> Result<Vec<PoolInfo>, LaunchError> {
        Ok(self.lock()?.pools.list_pools())
    }

    pub fn liquidity_of(&self, pool: &str, holder: &str) -> Result<u128, LaunchError> {
        Ok(self.lock()?.pools.pool_by_address(pool)?.liquidity_of(holder))
    }

    pub fn position(&self, pool: &str, holder: &str) -> Result<Position, LaunchError> {
        self.lock()?.pools.pool_by_address(pool)?.position(holder)
    }

    pub fn snapshot(&self) -> Result<LaunchSnapshot, LaunchError> {
        let state = self.lock()?;
        Ok(LaunchSnapshot {
            assets: state.assets.list(),
            pools: state.pools.list_pools(),
            native_total: state.bank.total(),
            native_deposited: state.bank.total_deposited(),
        })
    }

    /// [`Launchpad::snapshot`] as JSON bytes.
    pub fn export_json(&self) -> Result<Vec<u8>, LaunchError> {
        let snapshot = self.snapshot()?;
        serde_json::to_vec(&snapshot)
            .map_err(|e| LaunchError::InvariantViolation(format!("snapshot encoding: {}", e)))
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
