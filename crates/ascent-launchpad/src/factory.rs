// SPDX-License-Identifier: AGPL-3.0-only
//! # Asset Registry
//!
//! The factory that launches assets. Each launch produces, in one step:
//! - an [`AssetToken`] with the pool allotment minted to the treasury
//! - a [`BondingCurveLedger`] in `Trading` status
//! - an [`AssetRecord`] describing the launch
//!
//! Entries live in an append-only arena addressed by [`AssetHandle`]; the
//! address map is the only lookup path. Launches are staged with
//! [`AssetRegistry::prepare_asset`] and become visible on
//! [`AssetRegistry::insert`].

use ascent_core::token::validate_name_symbol;
use ascent_core::{derive_address, u128_str, AssetToken, LaunchConfig, LaunchError, ASSET_PREFIX};
use ascent_curve::{BondingCurveLedger, CurveKind, CurveStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1_024;
/// Longest accepted image reference, in characters.
pub const MAX_IMAGE_REF_LEN: usize = 512;

// ─────────────────────────────────────────────────────────────
// METADATA & RECORDS
// ─────────────────────────────────────────────────────────────

/// Launch metadata. Image and description are opaque to the launchpad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default)]
    pub description: String,
}

impl AssetMetadata {
    pub fn new(name: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            image_ref: String::new(),
            description: String::new(),
        }
    }

    pub fn with_image(mut self, image_ref: &str) -> Self {
        self.image_ref = image_ref.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), LaunchError> {
        validate_name_symbol(&self.name, &self.symbol)?;
        if self.image_ref.chars().count() > MAX_IMAGE_REF_LEN {
            return Err(LaunchError::InvalidMetadata(format!(
                "image reference longer than {} characters",
                MAX_IMAGE_REF_LEN
            )));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(LaunchError::InvalidMetadata(format!(
                "description longer than {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        Ok(())
    }
}

/// Stable index of an asset in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AssetHandle(usize);

impl AssetHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Launch record. Immutable after creation except for the pool link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub address: String,
    /// Addresses both the token ledger and the curve ledger in the arena.
    pub handle: AssetHandle,
    pub creator: String,
    pub metadata: AssetMetadata,
    /// Launch order, starting at 0.
    pub sequence: u64,
    /// Set once the asset graduates.
    pub pool: Option<String>,
}

/// Everything the registry keeps for one asset.
#[derive(Debug, Clone)]
pub struct AssetEntry {
    pub record: AssetRecord,
    pub ledger: BondingCurveLedger,
    pub token: AssetToken,
}

/// Listing view of an asset: record plus live curve figures.
#[derive(Debug, Clone, Serialize)]
pub struct AssetInfo {
    pub address: String,
    pub name: String,
    pub symbol: String,
    pub image_ref: String,
    pub creator: String,
    pub sequence: u64,
    pub status: CurveStatus,
    #[serde(with = "u128_str")]
    pub circulating_supply: u128,
    #[serde(with = "u128_str")]
    pub total_supply: u128,
    #[serde(with = "u128_str")]
    pub funding_raised: u128,
    #[serde(with = "u128_str")]
    pub funding_goal: u128,
    #[serde(with = "u128_str")]
    pub progress_bps: u128,
    /// Marginal curve price; 0 once migrated.
    #[serde(with = "u128_str")]
    pub spot_price: u128,
    pub holder_count: usize,
    pub pool: Option<String>,
}

impl From<&AssetEntry> for AssetInfo {
    fn from(e: &AssetEntry) -> Self {
        let spot_price = if e.ledger.is_trading() {
            e.ledger.spot_price().unwrap_or(0)
        } else {
            0
        };
        Self {
            address: e.record.address.clone(),
            name: e.record.metadata.name.clone(),
            symbol: e.record.metadata.symbol.clone(),
            image_ref: e.record.metadata.image_ref.clone(),
            creator: e.record.creator.clone(),
            sequence: e.record.sequence,
            status: e.ledger.status,
            circulating_supply: e.ledger.circulating_supply,
            total_supply: e.token.total_supply(),
            funding_raised: e.ledger.funding_raised,
            funding_goal: e.ledger.funding_goal,
            progress_bps: e.ledger.progress_bps(),
            spot_price,
            holder_count: e.token.holder_count(),
            pool: e.record.pool.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// REGISTRY
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: Vec<AssetEntry>,
    by_address: BTreeMap<String, AssetHandle>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validate a launch and build its entry without registering it.
    pub fn prepare_asset(
        &self,
        creator: &str,
        metadata: AssetMetadata,
        fee_paid: u128,
        config: &LaunchConfig,
    ) -> Result<AssetEntry, LaunchError> {
        if fee_paid < config.creation_fee {
            return Err(LaunchError::FeeNotPaid {
                required: config.creation_fee,
                paid: fee_paid,
            });
        }
        metadata.validate()?;

        let sequence = self.entries.len() as u64;
        // Deterministic address via blake3(creator || sequence || symbol)
        let address = derive_address(
            ASSET_PREFIX,
            &[creator, &sequence.to_string(), &metadata.symbol],
        );
        if self.by_address.contains_key(&address) {
            return Err(LaunchError::InvalidMetadata(format!(
                "address collision for {}",
                address
            )));
        }

        let mut token = AssetToken::new(
            address.clone(),
            metadata.name.clone(),
            metadata.symbol.clone(),
            config.max_supply,
        )?;
        token.mint(&config.treasury, config.pool_allotment)?;

        let ledger = BondingCurveLedger::new(
            address.clone(),
            CurveKind::from_params(&config.curve),
            config.curve_cap(),
            config.funding_goal,
        );

        Ok(AssetEntry {
            record: AssetRecord {
                address,
                handle: AssetHandle(self.entries.len()),
                creator: creator.to_string(),
                metadata,
                sequence,
                pool: None,
            },
            ledger,
            token,
        })
    }

    /// Register an entry built by [`AssetRegistry::prepare_asset`].
    pub fn insert(&mut self, entry: AssetEntry) -> Result<AssetHandle, LaunchError> {
        let handle = AssetHandle(self.entries.len());
        if entry.record.handle != handle {
            return Err(LaunchError::InvariantViolation(format!(
                "stale asset entry {}: registry moved on",
                entry.record.address
            )));
        }
        self.by_address.insert(entry.record.address.clone(), handle);
        self.entries.push(entry);
        Ok(handle)
    }

    pub fn handle(&self, address: &str) -> Result<AssetHandle, LaunchError> {
        self.by_address
            .get(address)
            .copied()
            .ok_or_else(|| LaunchError::AssetNotFound(address.to_string()))
    }

    pub fn entry(&self, handle: AssetHandle) -> &AssetEntry {
        &self.entries[handle.0]
    }

    pub fn get(&self, address: &str) -> Result<&AssetEntry, LaunchError> {
        let handle = self.handle(address)?;
        Ok(self.entry(handle))
    }

    /// Replace an entry with its staged copy. Handles are only minted here,
    /// so a handle obtained under the same lock is always in range.
    pub fn commit(&mut self, handle: AssetHandle, entry: AssetEntry) {
        debug_assert_eq!(self.entries[handle.0].record.address, entry.record.address);
        self.entries[handle.0] = entry;
    }

    /// All assets in launch order.
    pub fn list(&self) -> Vec<AssetInfo> {
        self.entries.iter().map(AssetInfo::from).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetEntry> {
        self.entries.iter()
    }

    pub fn records(&self) -> Vec<AssetRecord> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────
