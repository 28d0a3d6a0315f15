// SPDX-License-Identifier: AGPL-3.0-only
//! Pool registry: at most one pool per asset.
//!
//! Pools live in an append-only arena and are addressed by [`PoolHandle`].
//! The asset → handle and address → handle maps only grow. Every mutation
//! of a pool record goes through this registry.

use crate::pool::AmmPool;
use ascent_core::{derive_address, u128_str, LaunchError, POOL_PREFIX};
use serde::Serialize;
use std::collections::BTreeMap;

/// Stable index of a pool in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolHandle(usize);

impl PoolHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Read-only pool summary for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolInfo {
    pub address: String,
    pub asset: String,
    pub creator: String,
    #[serde(with = "u128_str")]
    pub reserve_asset: u128,
    #[serde(with = "u128_str")]
    pub reserve_base: u128,
    #[serde(with = "u128_str")]
    pub liquidity_supply: u128,
    #[serde(with = "u128_str")]
    pub fee_bps: u128,
    pub provider_count: usize,
    pub swap_count: u64,
}

impl From<&AmmPool> for PoolInfo {
    fn from(p: &AmmPool) -> Self {
        Self {
            address: p.address.clone(),
            asset: p.asset.clone(),
            creator: p.creator.clone(),
            reserve_asset: p.reserve_asset,
            reserve_base: p.reserve_base,
            liquidity_supply: p.liquidity_supply(),
            fee_bps: p.fee_bps,
            provider_count: p.provider_count(),
            swap_count: p.swap_count,
        }
    }
}

/// Pool address for an asset. One pool per asset, so the asset alone fixes it.
pub fn pool_address_for(asset: &str) -> String {
    derive_address(POOL_PREFIX, &["pool", asset])
}

#[derive(Debug, Clone, Default)]
pub struct PoolRegistry {
    pools: Vec<AmmPool>,
    by_asset: BTreeMap<String, PoolHandle>,
    by_address: BTreeMap<String, PoolHandle>,
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn contains(&self, asset: &str) -> bool {
        self.by_asset.contains_key(asset)
    }

    /// Build an unregistered empty pool for `asset`. Registration happens in
    /// [`PoolRegistry::insert`], so callers can stage a pool and commit later.
    pub fn prepare_pool(
        &self,
        asset: &str,
        creator: &str,
        fee_bps: u128,
    ) -> Result<AmmPool, LaunchError> {
        if self.contains(asset) {
            return Err(LaunchError::PoolAlreadyExists(asset.to_string()));
        }
        AmmPool::new(
            pool_address_for(asset),
            asset.to_string(),
            creator.to_string(),
            fee_bps,
        )
    }

    /// Register a pool built by [`PoolRegistry::prepare_pool`].
    pub fn insert(&mut self, pool: AmmPool) -> Result<PoolHandle, LaunchError> {
        if self.contains(&pool.asset) {
            return Err(LaunchError::PoolAlreadyExists(pool.asset));
        }
        let handle = PoolHandle(self.pools.len());
        self.by_asset.insert(pool.asset.clone(), handle);
        self.by_address.insert(pool.address.clone(), handle);
        log::info!("pool {} registered for asset {}", pool.address, pool.asset);
        self.pools.push(pool);
        Ok(handle)
    }

    /// Create and register an empty pool for `asset`.
    pub fn create_pool(
        &mut self,
        asset: &str,
        creator: &str,
        fee_bps: u128,
    ) -> Result<PoolHandle, LaunchError> {
        let pool = self.prepare_pool(asset, creator, fee_bps)?;
        self.insert(pool)
    }

    /// Pool for `asset`; `PoolNotFound` when none exists.
    pub fn get_pool(&self, asset: &str) -> Result<&AmmPool, LaunchError> {
        self.find_pool(asset)
            .ok_or_else(|| LaunchError::PoolNotFound(asset.to_string()))
    }

    pub fn find_pool(&self, asset: &str) -> Option<&AmmPool> {
        self.by_asset.get(asset).map(|h| &self.pools[h.0])
    }

    pub fn handle_for_asset(&self, asset: &str) -> Option<PoolHandle> {
        self.by_asset.get(asset).copied()
    }

    pub fn handle_for_address(&self, address: &str) -> Result<PoolHandle, LaunchError> {
        self.by_address
            .get(address)
            .copied()
            .ok_or_else(|| LaunchError::PoolNotFound(address.to_string()))
    }

    pub fn pool(&self, handle: PoolHandle) -> &AmmPool {
        &self.pools[handle.0]
    }

    pub fn pool_by_address(&self, address: &str) -> Result<&AmmPool, LaunchError> {
        let handle = self.handle_for_address(address)?;
        Ok(self.pool(handle))
    }

    /// Replace a registered pool with a staged copy of itself.
    pub fn commit(&mut self, handle: PoolHandle, pool: AmmPool) -> Result<(), LaunchError> {
        let slot = self
            .pools
            .get_mut(handle.0)
            .ok_or_else(|| LaunchError::PoolNotFound(pool.address.clone()))?;
        if slot.address != pool.address || slot.asset != pool.asset {
            return Err(LaunchError::InvariantViolation(format!(
                "staged pool {} does not match slot {}",
                pool.address, slot.address
            )));
        }
        *slot = pool;
        Ok(())
    }

    /// All pools in creation order.
    pub fn list_pools(&self) -> Vec<PoolInfo> {
        self.pools.iter().map(PoolInfo::from).collect()
    }
}
