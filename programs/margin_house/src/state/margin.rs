//! Margin State
//!
//! One margin account per (engine, owner). The tokens themselves sit in the
//! engine vaults; this account records how much of them the owner may use.

use anchor_lang::prelude::*;

use crate::house::{HouseError, MarginBalance, MarginLedger};

/// Margin account
///
/// Seeds: ["margin", engine, owner]
#[account]
#[derive(InitSpace)]
pub struct Margin {
    /// Account the balances belong to
    pub owner: Pubkey,

    /// Engine whose vaults hold the tokens
    pub engine: Pubkey,

    /// Risky and stable balances
    pub balance: MarginBalance,

    /// PDA bump seed
    pub bump: u8,
}

impl Margin {
    pub const SEED: &'static [u8] = b"margin";

    /// Fill in the keys of a freshly created account
    pub fn bind(&mut self, owner: Pubkey, engine: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.engine = engine;
            self.bump = bump;
        }
    }
}

impl MarginLedger for Margin {
    fn debit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        require_keys_eq!(*owner, self.owner, HouseError::WrongMarginOwner);
        self.balance.debit(risky, stable)
    }

    fn credit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        require_keys_eq!(*owner, self.owner, HouseError::WrongMarginOwner);
        self.balance.credit(risky, stable)
    }

    fn balance(&self, owner: &Pubkey) -> MarginBalance {
        if *owner == self.owner {
            self.balance
        } else {
            MarginBalance::default()
        }
    }
}
