// SPDX-License-Identifier: AGPL-3.0-only
//! Typed launchpad events and their fan-out to subscribers.
//!
//! Events are published only after an operation commits, in the order the
//! operation produced them. Observers hold an `mpsc::Receiver`; dropping it
//! unsubscribes.

use crate::{u128_str, SwapDirection, TradeSide};
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

// ─────────────────────────────────────────────────────────────
// TOKEN EVENTS
// ─────────────────────────────────────────────────────────────

/// Balance change on an asset token ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum TokenEvent {
    Transfer {
        from: String,
        to: String,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Approval {
        owner: String,
        spender: String,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Mint {
        to: String,
        #[serde(with = "u128_str")]
        amount: u128,
    },
    Burn {
        from: String,
        #[serde(with = "u128_str")]
        amount: u128,
    },
}

// ─────────────────────────────────────────────────────────────
// LAUNCHPAD EVENTS
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LaunchEvent {
    AssetCreated {
        asset: String,
        creator: String,
        name: String,
        symbol: String,
        #[serde(with = "u128_str")]
        fee: u128,
    },
    /// Buy or sell against a bonding curve.
    CurveTrade {
        asset: String,
        trader: String,
        side: TradeSide,
        #[serde(with = "u128_str")]
        units: u128,
        /// Price paid (buy) or refund before fee (sell)
        #[serde(with = "u128_str")]
        base_amount: u128,
        #[serde(with = "u128_str")]
        fee: u128,
        #[serde(with = "u128_str")]
        circulating_supply: u128,
        #[serde(with = "u128_str")]
        funding_raised: u128,
    },
    /// Curve closed and its capital moved into the pool.
    Migrated {
        asset: String,
        pool: String,
        #[serde(with = "u128_str")]
        seed_asset: u128,
        #[serde(with = "u128_str")]
        seed_base: u128,
        #[serde(with = "u128_str")]
        liquidity_minted: u128,
    },
    PoolCreated {
        asset: String,
        pool: String,
        creator: String,
    },
    LiquidityAdded {
        pool: String,
        provider: String,
        #[serde(with = "u128_str")]
        asset_amount: u128,
        #[serde(with = "u128_str")]
        base_amount: u128,
        #[serde(with = "u128_str")]
        liquidity_minted: u128,
    },
    LiquidityRemoved {
        pool: String,
        provider: String,
        #[serde(with = "u128_str")]
        asset_amount: u128,
        #[serde(with = "u128_str")]
        base_amount: u128,
        #[serde(with = "u128_str")]
        liquidity_burned: u128,
    },
    Swap {
        pool: String,
        trader: String,
        direction: SwapDirection,
        #[serde(with = "u128_str")]
        amount_in: u128,
        #[serde(with = "u128_str")]
        amount_out: u128,
        #[serde(with = "u128_str")]
        fee: u128,
    },
    /// Balance change on an asset token.
    Token { asset: String, change: TokenEvent },
}

impl LaunchEvent {
    /// Short name for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            LaunchEvent::AssetCreated { .. } => "asset_created",
            LaunchEvent::CurveTrade { .. } => "curve_trade",
            LaunchEvent::Migrated { .. } => "migrated",
            LaunchEvent::PoolCreated { .. } => "pool_created",
            LaunchEvent::LiquidityAdded { .. } => "liquidity_added",
            LaunchEvent::LiquidityRemoved { .. } => "liquidity_removed",
            LaunchEvent::Swap { .. } => "swap",
            LaunchEvent::Token { .. } => "token",
        }
    }
}

// ─────────────────────────────────────────────────────────────
// EVENT BUS
// ─────────────────────────────────────────────────────────────

/// Fan-out of committed events to every live subscriber.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Sender<LaunchEvent>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. Only events published afterwards are seen.
    pub fn subscribe(&self) -> Receiver<LaunchEvent> {
        let (tx, rx) = mpsc::channel();
        match self.subscribers.lock() {
            Ok(mut subs) => subs.push(tx),
            Err(poisoned) => poisoned.into_inner().push(tx),
        }
        rx
    }

    /// Deliver `events` in order; subscribers whose receiver was dropped are pruned.
    pub fn publish(&self, events: &[LaunchEvent]) {
        if events.is_empty() {
            return;
        }
        let mut subs = match self.subscribers.lock() {
            Ok(subs) => subs,
            Err(poisoned) => poisoned.into_inner(),
        };
        subs.retain(|tx| events.iter().all(|ev| tx.send(ev.clone()).is_ok()));
        log::debug!(
            "published {} event(s) to {} subscriber(s)",
            events.len(),
            subs.len()
        );
    }

    pub fn subscriber_count(&self) -> usize {
        match self.subscribers.lock() {
            Ok(subs) => subs.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }
}
