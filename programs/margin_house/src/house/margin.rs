//! Margin ledger
//!
//! Tokens an account has parked inside the house. An allocation funded from
//! margin moves nothing on the token program; it only debits this ledger.

use anchor_lang::prelude::*;

use crate::house::HouseError;

/// Risky and stable balances held for one account
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct MarginBalance {
    pub risky: u64,
    pub stable: u64,
}

impl MarginBalance {
    pub fn new(risky: u64, stable: u64) -> Self {
        Self { risky, stable }
    }

    /// Debit both balances or neither
    pub fn debit(&mut self, risky: u64, stable: u64) -> Result<()> {
        let next_risky = self
            .risky
            .checked_sub(risky)
            .ok_or(HouseError::InsufficientMargin)?;
        let next_stable = self
            .stable
            .checked_sub(stable)
            .ok_or(HouseError::InsufficientMargin)?;

        self.risky = next_risky;
        self.stable = next_stable;
        Ok(())
    }

    /// Credit both balances or neither
    pub fn credit(&mut self, risky: u64, stable: u64) -> Result<()> {
        let next_risky = self
            .risky
            .checked_add(risky)
            .ok_or(HouseError::MathOverflow)?;
        let next_stable = self
            .stable
            .checked_add(stable)
            .ok_or(HouseError::MathOverflow)?;

        self.risky = next_risky;
        self.stable = next_stable;
        Ok(())
    }
}

/// Per-account margin balances
pub trait MarginLedger {
    /// Fails with `InsufficientMargin` and leaves the balance untouched if
    /// either side is short
    fn debit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()>;

    fn credit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()>;

    fn balance(&self, owner: &Pubkey) -> MarginBalance;
}

/// A ledger that may not exist yet: it holds nothing and accepts nothing
impl<M: MarginLedger + ?Sized> MarginLedger for Option<&mut M> {
    fn debit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        match self {
            Some(ledger) => ledger.debit(owner, risky, stable),
            None => err!(HouseError::InsufficientMargin),
        }
    }

    fn credit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        match self {
            Some(ledger) => ledger.credit(owner, risky, stable),
            None => err!(HouseError::WrongMarginOwner),
        }
    }

    fn balance(&self, owner: &Pubkey) -> MarginBalance {
        self.as_ref()
            .map(|ledger| ledger.balance(owner))
            .unwrap_or_default()
    }
}
