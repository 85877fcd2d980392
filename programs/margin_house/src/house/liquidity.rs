//! # Proportional Liquidity
//!
//! Liquidity is added to a pool without moving its price: the caller must
//! contribute both tokens in the ratio the pool already holds them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                              │
//! │   ΔL = min( Δrisky · L / R_risky ,  Δstable · L / R_stable ) │
//! │                                                              │
//! │   Where:                                                     │
//! │   • L        = total liquidity of the pool                   │
//! │   • R_risky  = risky token reserve                           │
//! │   • R_stable = stable token reserve                          │
//! │                                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each token implies its own liquidity delta. Taking the smaller of the two
//! means a caller who over-supplies one side is credited only for what the
//! other side backs, so the reserve ratio after the allocation is never
//! better for the caller than before it.
//!
//! Both divisions round down.

use anchor_lang::prelude::*;

use crate::house::HouseError;

/// Snapshot of a pool's reserves at the instant of a call
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reserves {
    /// Risky token held by the pool
    pub reserve_risky: u64,
    /// Stable token held by the pool
    pub reserve_stable: u64,
    /// Total liquidity outstanding
    pub liquidity: u64,
}

impl Reserves {
    pub fn new(reserve_risky: u64, reserve_stable: u64, liquidity: u64) -> Self {
        Self {
            reserve_risky,
            reserve_stable,
            liquidity,
        }
    }

    fn require_positive(&self) -> Result<()> {
        require!(
            self.reserve_risky > 0 && self.reserve_stable > 0 && self.liquidity > 0,
            HouseError::InvalidReserves
        );
        Ok(())
    }

    /// Liquidity credited for depositing `del_risky` and `del_stable`
    ///
    /// # Example
    /// ```ignore
    /// // R_risky = 300, R_stable = 700, L = 100
    /// let reserves = Reserves::new(300, 700, 100);
    /// // 30 risky implies 10 liquidity, 100 stable implies 14: credit 10
    /// assert_eq!(reserves.liquidity_for_deltas(30, 100)?, 10);
    /// ```
    pub fn liquidity_for_deltas(&self, del_risky: u64, del_stable: u64) -> Result<u64> {
        self.require_positive()?;

        let liquidity = self.liquidity as u128;
        let from_risky = (del_risky as u128)
            .checked_mul(liquidity)
            .ok_or(HouseError::MathOverflow)?
            / self.reserve_risky as u128;
        let from_stable = (del_stable as u128)
            .checked_mul(liquidity)
            .ok_or(HouseError::MathOverflow)?
            / self.reserve_stable as u128;

        u64::try_from(from_risky.min(from_stable)).map_err(|_| error!(HouseError::MathOverflow))
    }

    /// Token amounts a caller should supply to receive `del_liquidity`
    ///
    /// Rounds up, so feeding the result back into
    /// [`Reserves::liquidity_for_deltas`] credits at least `del_liquidity`.
    pub fn deltas_for_liquidity(&self, del_liquidity: u64) -> Result<(u64, u64)> {
        self.require_positive()?;

        let del_risky = ceil_mul_div(del_liquidity, self.reserve_risky, self.liquidity)?;
        let del_stable = ceil_mul_div(del_liquidity, self.reserve_stable, self.liquidity)?;
        Ok((del_risky, del_stable))
    }

    /// Reserves after an allocation has been settled
    pub fn checked_add(&self, del_risky: u64, del_stable: u64, del_liquidity: u64) -> Result<Self> {
        Ok(Self {
            reserve_risky: self
                .reserve_risky
                .checked_add(del_risky)
                .ok_or(HouseError::MathOverflow)?,
            reserve_stable: self
                .reserve_stable
                .checked_add(del_stable)
                .ok_or(HouseError::MathOverflow)?,
            liquidity: self
                .liquidity
                .checked_add(del_liquidity)
                .ok_or(HouseError::MathOverflow)?,
        })
    }
}

fn ceil_mul_div(a: u64, b: u64, denominator: u64) -> Result<u64> {
    let product = (a as u128)
        .checked_mul(b as u128)
        .ok_or(HouseError::MathOverflow)?;
    let denominator = denominator as u128;
    let quotient = product
        .checked_add(denominator - 1)
        .ok_or(HouseError::MathOverflow)?
        / denominator;
    u64::try_from(quotient).map_err(|_| error!(HouseError::MathOverflow))
}
