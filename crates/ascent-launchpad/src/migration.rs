// SPDX-License-Identifier: AGPL-3.0-only
//! Graduation of an asset from its bonding curve into a constant-product pool.
//!
//! [`graduate`] works on a staged copy of the asset entry and returns the
//! staged pool; nothing is visible until the engine commits both. A failure
//! at any step surfaces as `MigrationFailed` and the caller drops the copies,
//! so the buy that crossed the goal is rolled back with it.

use crate::factory::AssetEntry;
use ascent_amm::{AmmPool, PoolHandle, PoolRegistry};
use ascent_core::{format_units, LaunchConfig, LaunchError, LaunchEvent};

/// Staged result of a migration.
#[derive(Debug, Clone)]
pub struct Graduation {
    pub pool: AmmPool,
    /// Handle of a pool created before graduation; `None` when the pool is
    /// new and still has to be inserted.
    pub pool_handle: Option<PoolHandle>,
    pub seed_asset: u128,
    pub seed_base: u128,
    pub liquidity_minted: u128,
    /// Events in commit order.
    pub events: Vec<LaunchEvent>,
}

/// Close the curve of `entry` and seed its pool with the curve's capital.
///
/// Base seed is the curve's base reserve; asset seed is the pool allotment
/// held by the treasury. Liquidity units are credited to the treasury.
pub fn graduate(
    entry: &mut AssetEntry,
    pools: &PoolRegistry,
    config: &LaunchConfig,
) -> Result<Graduation, LaunchError> {
    let asset = entry.record.address.clone();
    graduate_inner(entry, pools, config).map_err(|e| {
        log::warn!("migration of {} aborted: {}", asset, e);
        match e {
            LaunchError::MigrationFailed(_) => e,
            other => LaunchError::MigrationFailed(format!("{}: {}", asset, other)),
        }
    })
}

fn graduate_inner(
    entry: &mut AssetEntry,
    pools: &PoolRegistry,
    config: &LaunchConfig,
) -> Result<Graduation, LaunchError> {
    let asset = entry.record.address.clone();
    let seed_base = entry.ledger.begin_migration()?;
    let mut events = Vec::with_capacity(4);

    let (mut pool, pool_handle) = match pools.handle_for_asset(&asset) {
        Some(handle) => {
            let existing = pools.pool(handle);
            if !existing.is_empty() {
                return Err(LaunchError::MigrationFailed(format!(
                    "pool {} already holds liquidity",
                    existing.address
                )));
            }
            (existing.clone(), Some(handle))
        }
        None => {
            let pool = pools.prepare_pool(&asset, &config.treasury, config.swap_fee_bps)?;
            events.push(LaunchEvent::PoolCreated {
                asset: asset.clone(),
                pool: pool.address.clone(),
                creator: config.treasury.clone(),
            });
            (pool, None)
        }
    };

    let seed_asset = entry.token.balance_of(&config.treasury);
    if seed_asset < config.pool_allotment {
        return Err(LaunchError::MigrationFailed(format!(
            "treasury holds {} of the {} allotment",
            seed_asset, config.pool_allotment
        )));
    }
    let seed_asset = config.pool_allotment;
    let transfer = entry
        .token
        .transfer(&config.treasury, &pool.address, seed_asset)?;
    events.push(LaunchEvent::Token {
        asset: asset.clone(),
        change: transfer,
    });

    let receipt = pool.add_liquidity(
        &config.treasury,
        seed_asset,
        seed_base,
        config.liquidity_tolerance_bps,
    )?;
    events.push(LaunchEvent::LiquidityAdded {
        pool: pool.address.clone(),
        provider: config.treasury.clone(),
        asset_amount: receipt.asset_used,
        base_amount: receipt.base_used,
        liquidity_minted: receipt.minted,
    });
    events.push(LaunchEvent::Migrated {
        asset: asset.clone(),
        pool: pool.address.clone(),
        seed_asset,
        seed_base,
        liquidity_minted: receipt.minted,
    });

    entry.record.pool = Some(pool.address.clone());
    log::info!(
        "asset {} graduated to pool {}: {} tokens + {} base, {} LP units",
        asset,
        pool.address,
        format_units(seed_asset),
        format_units(seed_base),
        receipt.minted
    );

    Ok(Graduation {
        pool,
        pool_handle,
        seed_asset,
        seed_base,
        liquidity_minted: receipt.minted,
        events,
    })
}
