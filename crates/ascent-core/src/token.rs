// SPDX-License-Identifier: AGPL-3.0-only
//! # Asset token ledger
//!
//! Fungible balance ledger backing every launched asset.
//!
//! The launchpad is the only minter: curve buys mint to the buyer, curve sells
//! burn from the seller, and the pool allotment is minted once to the registry
//! treasury at creation. Holders move tokens with `transfer`, or delegate with
//! `approve` / `transfer_from`. Every balance change returns a [`TokenEvent`].
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  AssetToken                                  │
//! │  ┌──────────┐  ┌──────────┐  ┌────────────┐  │
//! │  │ Metadata │  │ Balances │  │ Allowances │  │
//! │  │ name     │  │ addr→u128│  │ (owner,    │  │
//! │  │ symbol   │  │          │  │  spender)  │  │
//! │  │ supply   │  │          │  │   →u128    │  │
//! │  └──────────┘  └──────────┘  └────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

use crate::error::LaunchError;
use crate::events::TokenEvent;
use crate::{u128_map, u128_str, DECIMALS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest accepted asset name, in characters.
pub const MAX_NAME_LEN: usize = 64;
/// Longest accepted ticker symbol, in characters.
pub const MAX_SYMBOL_LEN: usize = 8;

// ─────────────────────────────────────────────────────────────
// TOKEN METADATA
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    /// Ticker symbol, max 8 characters
    pub symbol: String,
    pub decimals: u8,
    /// Circulating plus reserved supply, in atomic units
    #[serde(with = "u128_str")]
    pub total_supply: u128,
    /// Mint ceiling (0 = uncapped)
    #[serde(with = "u128_str")]
    pub max_supply: u128,
}

impl TokenMetadata {
    /// Validate name and symbol lengths and the supply ceiling.
    pub fn validate(&self) -> Result<(), LaunchError> {
        validate_name_symbol(&self.name, &self.symbol)?;
        if self.decimals > DECIMALS {
            return Err(LaunchError::InvalidMetadata(format!(
                "decimals must be 0-{}",
                DECIMALS
            )));
        }
        if self.max_supply > 0 && self.total_supply > self.max_supply {
            return Err(LaunchError::InvalidMetadata(
                "total supply exceeds max supply".to_string(),
            ));
        }
        Ok(())
    }
}

/// Name must be 1-64 characters, symbol 1-8, neither blank.
pub fn validate_name_symbol(name: &str, symbol: &str) -> Result<(), LaunchError> {
    let name_len = name.chars().count();
    if name.trim().is_empty() || name_len > MAX_NAME_LEN {
        return Err(LaunchError::InvalidMetadata(format!(
            "Invalid token name: must be 1-{} characters",
            MAX_NAME_LEN
        )));
    }
    let symbol_len = symbol.chars().count();
    if symbol.trim().is_empty() || symbol_len > MAX_SYMBOL_LEN {
        return Err(LaunchError::InvalidMetadata(format!(
            "Invalid token symbol: must be 1-{} characters",
            MAX_SYMBOL_LEN
        )));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// LEDGER
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetToken {
    /// Asset address; also the token's address
    pub address: String,
    pub metadata: TokenMetadata,
    #[serde(with = "u128_map")]
    balances: BTreeMap<String, u128>,
    // tuple keys have no JSON form; allowances are not part of snapshots
    #[serde(skip)]
    allowances: BTreeMap<(String, String), u128>,
}

impl AssetToken {
    /// Create an empty token. Supply starts at zero and grows by minting.
    pub fn new(
        address: String,
        name: String,
        symbol: String,
        max_supply: u128,
    ) -> Result<Self, LaunchError> {
        let metadata = TokenMetadata {
            name,
            symbol,
            decimals: DECIMALS,
            total_supply: 0,
            max_supply,
        };
        metadata.validate()?;
        Ok(Self {
            address,
            metadata,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        })
    }

    pub fn balance_of(&self, holder: &str) -> u128 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &str, spender: &str) -> u128 {
        self.allowances
            .get(&(owner.to_string(), spender.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> u128 {
        self.metadata.total_supply
    }

    /// Number of addresses with a non-zero balance.
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|b| **b > 0).count()
    }

    /// Mint `amount` to `to`, respecting the supply ceiling.
    pub fn mint(&mut self, to: &str, amount: u128) -> Result<TokenEvent, LaunchError> {
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let new_supply = self
            .metadata
            .total_supply
            .checked_add(amount)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        if self.metadata.max_supply > 0 && new_supply > self.metadata.max_supply {
            return Err(LaunchError::MaxSupplyExceeded {
                requested: amount,
                remaining: self.metadata.max_supply - self.metadata.total_supply,
            });
        }
        let new_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LaunchError::ArithmeticOverflow)?;

        self.balances.insert(to.to_string(), new_balance);
        self.metadata.total_supply = new_supply;
        Ok(TokenEvent::Mint {
            to: to.to_string(),
            amount,
        })
    }

    /// Burn `amount` from `from`, reducing total supply.
    pub fn burn(&mut self, from: &str, amount: u128) -> Result<TokenEvent, LaunchError> {
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(LaunchError::InsufficientBalance { have, need: amount });
        }
        self.set_balance(from, have - amount);
        self.metadata.total_supply = self.metadata.total_supply.saturating_sub(amount);
        Ok(TokenEvent::Burn {
            from: from.to_string(),
            amount,
        })
    }

    /// Move `amount` from `from` to `to`.
    pub fn transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<TokenEvent, LaunchError> {
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LaunchError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        if from != to {
            let to_balance = self
                .balance_of(to)
                .checked_add(amount)
                .ok_or(LaunchError::ArithmeticOverflow)?;
            self.set_balance(from, from_balance - amount);
            self.balances.insert(to.to_string(), to_balance);
        }
        Ok(TokenEvent::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        })
    }

    /// Set `spender`'s allowance over `owner`'s balance (overwrites).
    pub fn approve(&mut self, owner: &str, spender: &str, amount: u128) -> TokenEvent {
        if amount == 0 {
            self.allowances
                .remove(&(owner.to_string(), spender.to_string()));
        } else {
            self.allowances
                .insert((owner.to_string(), spender.to_string()), amount);
        }
        TokenEvent::Approval {
            owner: owner.to_string(),
            spender: spender.to_string(),
            amount,
        }
    }

    /// Spend `spender`'s allowance to move `from`'s tokens to `to`.
    pub fn transfer_from(
        &mut self,
        spender: &str,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<TokenEvent, LaunchError> {
        let allowance = self.allowance(from, spender);
        if allowance < amount {
            return Err(LaunchError::AllowanceExceeded {
                have: allowance,
                need: amount,
            });
        }
        let event = self.transfer(from, to, amount)?;
        let remaining = allowance - amount;
        let key = (from.to_string(), spender.to_string());
        if remaining == 0 {
            self.allowances.remove(&key);
        } else {
            self.allowances.insert(key, remaining);
        }
        Ok(event)
    }

    fn set_balance(&mut self, holder: &str, amount: u128) {
        if amount == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(holder.to_string(), amount);
        }
    }
}

// ─────────────────────────────────────────────────────────────
// TESTS
// ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "ASCWalice000000000000000000000000000000";
    const BOB: &str = "ASCWbob00000000000000000000000000000000";
    const CHARLIE: &str = "ASCWcharlie0000000000000000000000000000";

    fn make_token(minted: u128) -> AssetToken {
        let mut t = AssetToken::new(
            "ASCTtest".to_string(),
            "TestToken".to_string(),
            "TST".to_string(),
            1_000_000,
        )
        .unwrap();
        if minted > 0 {
            t.mint(ALICE, minted).unwrap();
        }
        t
    }

    // ── Metadata Validation ──

    #[test]
    fn test_metadata_empty_name() {
        let err = AssetToken::new("a".into(), "".into(), "TST".into(), 0).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidMetadata(m) if m.contains("name")));
    }

    #[test]
    fn test_metadata_symbol_too_long() {
        let err = AssetToken::new("a".into(), "Name".into(), "TOOLONGSYM".into(), 0).unwrap_err();
        assert!(matches!(err, LaunchError::InvalidMetadata(m) if m.contains("symbol")));
    }

    #[test]
    fn test_metadata_blank_symbol() {
        assert!(validate_name_symbol("Name", "   ").is_err());
        assert!(validate_name_symbol("Name", "OK").is_ok());
    }

    // ── Mint / Burn ──

    #[test]
    fn test_mint_respects_max_supply() {
        let mut t = make_token(999_000);
        assert!(t.mint(BOB, 1_000).is_ok());
        let err = t.mint(BOB, 1).unwrap_err();
        assert_eq!(
            err,
            LaunchError::MaxSupplyExceeded {
                requested: 1,
                remaining: 0
            }
        );
        assert_eq!(t.total_supply(), 1_000_000);
    }

    #[test]
    fn test_burn() {
        let mut t = make_token(1_000);
        let ev = t.burn(ALICE, 400).unwrap();
        assert_eq!(
            ev,
            TokenEvent::Burn {
                from: ALICE.to_string(),
                amount: 400
            }
        );
        assert_eq!(t.balance_of(ALICE), 600);
        assert_eq!(t.total_supply(), 600);
    }

    #[test]
    fn test_burn_insufficient() {
        let mut t = make_token(100);
        assert_eq!(
            t.burn(ALICE, 101),
            Err(LaunchError::InsufficientBalance { have: 100, need: 101 })
        );
        assert_eq!(t.balance_of(ALICE), 100);
    }

    // ── Transfer ──

    #[test]
    fn test_transfer() {
        let mut t = make_token(1_000);
        t.transfer(ALICE, BOB, 300).unwrap();
        assert_eq!(t.balance_of(ALICE), 700);
        assert_eq!(t.balance_of(BOB), 300);
        assert_eq!(t.total_supply(), 1_000);
        assert_eq!(t.holder_count(), 2);
    }

    #[test]
    fn test_transfer_insufficient() {
        let mut t = make_token(10);
        assert!(matches!(
            t.transfer(ALICE, BOB, 11),
            Err(LaunchError::InsufficientBalance { have: 10, need: 11 })
        ));
        assert_eq!(t.balance_of(BOB), 0);
    }

    #[test]
    fn test_transfer_zero() {
        let mut t = make_token(10);
        assert_eq!(t.transfer(ALICE, BOB, 0), Err(LaunchError::ZeroAmount));
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut t = make_token(10);
        t.transfer(ALICE, ALICE, 10).unwrap();
        assert_eq!(t.balance_of(ALICE), 10);
    }

    // ── Approve / TransferFrom ──

    #[test]
    fn test_approve_and_transfer_from() {
        let mut t = make_token(1_000);
        t.approve(ALICE, BOB, 500);
        assert_eq!(t.allowance(ALICE, BOB), 500);

        t.transfer_from(BOB, ALICE, CHARLIE, 200).unwrap();
        assert_eq!(t.balance_of(CHARLIE), 200);
        assert_eq!(t.allowance(ALICE, BOB), 300);
    }

    #[test]
    fn test_transfer_from_exceeds_allowance() {
        let mut t = make_token(1_000);
        t.approve(ALICE, BOB, 100);
        assert_eq!(
            t.transfer_from(BOB, ALICE, CHARLIE, 101),
            Err(LaunchError::AllowanceExceeded { have: 100, need: 101 })
        );
        assert_eq!(t.allowance(ALICE, BOB), 100);
    }

    #[test]
    fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let mut t = make_token(50);
        t.approve(ALICE, BOB, 100);
        assert!(t.transfer_from(BOB, ALICE, CHARLIE, 80).is_err());
        assert_eq!(t.allowance(ALICE, BOB), 100);
        assert_eq!(t.balance_of(ALICE), 50);
    }

    #[test]
    fn test_balances_json_as_strings() {
        let t = make_token(123_456);
        let json = serde_json::to_string(&t).unwrap();
        assert!(json.contains("\"total_supply\":\""));
        let back: AssetToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back.balance_of(ALICE), t.balance_of(ALICE));
    }
}
