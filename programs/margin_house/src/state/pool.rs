//! Pool State
//!
//! Each pool is one (strike, sigma, maturity) curve under an engine, with its
//! own reserves and liquidity.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

use crate::house::{HouseError, PoolId, ReserveOracle, Reserves};

/// Pool account
///
/// Seeds: ["pool", engine, pool_id]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Engine holding this pool's tokens
    pub engine: Pubkey,

    /// keccak(engine || strike || sigma || maturity)
    pub pool_id: [u8; 32],

    /// Risky token mint
    pub risky: Pubkey,

    /// Stable token mint
    pub stable: Pubkey,

    /// Strike price, in stable token base units
    pub strike: u64,

    /// Implied volatility, in basis points
    pub sigma: u32,

    /// Unix timestamp the pool expires at
    pub maturity: u32,

    /// Risky tokens held by the pool
    pub reserve_risky: u64,

    /// Stable tokens held by the pool
    pub reserve_stable: u64,

    /// Total liquidity outstanding
    pub liquidity: u64,

    /// Unix timestamp when pool was created
    pub created_at: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";

    /// Derive the identifier every caller uses to address a pool
    pub fn compute_id(engine: &Pubkey, strike: u64, sigma: u32, maturity: u32) -> PoolId {
        keccak::hashv(&[
            engine.as_ref(),
            &strike.to_le_bytes(),
            &sigma.to_le_bytes(),
            &maturity.to_le_bytes(),
        ])
        .0
    }

    /// Current reserves, as read by the allocation engine
    pub fn snapshot(&self) -> Reserves {
        Reserves::new(self.reserve_risky, self.reserve_stable, self.liquidity)
    }
}

impl ReserveOracle for Pool {
    fn reserves(&self, pool_id: &PoolId, risky: &Pubkey, stable: &Pubkey) -> Result<Reserves> {
        require!(
            self.pool_id == *pool_id && self.risky == *risky && self.stable == *stable,
            HouseError::PoolNotFound
        );
        Ok(self.snapshot())
    }

    fn apply_allocation(
        &mut self,
        pool_id: &PoolId,
        del_risky: u64,
        del_stable: u64,
        del_liquidity: u64,
    ) -> Result<()> {
        require!(self.pool_id == *pool_id, HouseError::PoolNotFound);

        let next = self.snapshot().checked_add(del_risky, del_stable, del_liquidity)?;
        self.reserve_risky = next.reserve_risky;
        self.reserve_stable = next.reserve_stable;
        self.liquidity = next.liquidity;
        Ok(())
    }
}
