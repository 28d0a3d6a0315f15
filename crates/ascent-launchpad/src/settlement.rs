// SPDX-License-Identifier: AGPL-3.0-only
//! Native base-currency balances and the value transfers of one operation.
//!
//! A payable operation collects its debits and credits in a [`Settlement`],
//! checks them against the [`NativeBank`] with [`Settlement::prepare`], commits
//! curve and pool state, and only then calls [`NativeBank::apply`], which
//! cannot fail.

use ascent_core::LaunchError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NativeBank {
    #[serde(with = "ascent_core::u128_map")]
    balances: BTreeMap<String, u128>,
    /// Everything ever credited through [`NativeBank::deposit`].
    #[serde(with = "ascent_core::u128_str")]
    total_deposited: u128,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &str) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Bring external base currency into the bank.
    pub fn deposit(&mut self, account: &str, amount: u128) -> Result<u128, LaunchError> {
        if amount == 0 {
            return Err(LaunchError::ZeroAmount);
        }
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        let deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(LaunchError::ArithmeticOverflow)?;
        self.balances.insert(account.to_string(), balance);
        self.total_deposited = deposited;
        Ok(balance)
    }

    /// Sum of all account balances.
    pub fn total(&self) -> u128 {
        self.balances.values().fold(0u128, |acc, b| acc.saturating_add(*b))
    }

    pub fn total_deposited(&self) -> u128 {
        self.total_deposited
    }

    /// Supply audit: bank balances plus value held by curves and pools
    /// (`held_elsewhere`) must equal everything deposited.
    pub fn audit(&self, held_elsewhere: u128) -> Result<(), String> {
        let accounted = self.total().saturating_add(held_elsewhere);
        if accounted == self.total_deposited {
            Ok(())
        } else {
            Err(format!(
                "Supply audit FAILED: accounted {} != deposited {} (balances={}, held={})",
                accounted,
                self.total_deposited,
                self.total(),
                held_elsewhere
            ))
        }
    }

    /// Write the balances computed by [`Settlement::prepare`].
    pub fn apply(&mut self, prepared: PreparedSettlement) {
        for (account, balance) in prepared.balances {
            if balance == 0 {
                self.balances.remove(&account);
            } else {
                self.balances.insert(account, balance);
            }
        }
    }
}

/// Ordered value legs of one operation.
#[derive(Debug, Clone, Default)]
pub struct Settlement {
    legs: Vec<Leg>,
}

#[derive(Debug, Clone)]
enum Leg {
    Debit(String, u128),
    Credit(String, u128),
}

/// Final balances of every account a settlement touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSettlement {
    balances: BTreeMap<String, u128>,
}

impl Settlement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debit(&mut self, account: &str, amount: u128) -> &mut Self {
        if amount > 0 {
            self.legs.push(Leg::Debit(account.to_string(), amount));
        }
        self
    }

    pub fn credit(&mut self, account: &str, amount: u128) -> &mut Self {
        if amount > 0 {
            self.legs.push(Leg::Credit(account.to_string(), amount));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Run the legs in order against current balances.
    pub fn prepare(&self, bank: &NativeBank) -> Result<PreparedSettlement, LaunchError> {
        let mut balances: BTreeMap<String, u128> = BTreeMap::new();
        for leg in &self.legs {
            match leg {
                Leg::Debit(account, amount) => {
                    let have = *balances
                        .entry(account.clone())
                        .or_insert_with(|| bank.balance_of(account));
                    if have < *amount {
                        return Err(LaunchError::InsufficientBalance {
                            have,
                            need: *amount,
                        });
                    }
                    balances.insert(account.clone(), have - amount);
                }
                Leg::Credit(account, amount) => {
                    let have = *balances
                        .entry(account.clone())
                        .or_insert_with(|| bank.balance_of(account));
                    let next = have
                        .checked_add(*amount)
                        .ok_or(LaunchError::ArithmeticOverflow)?;
                    balances.insert(account.clone(), next);
                }
            }
        }
        Ok(PreparedSettlement { balances })
    }
}
