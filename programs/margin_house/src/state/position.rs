//! Position State

use anchor_lang::prelude::*;

use crate::house::{HouseError, PoolId, PositionStore};

/// Liquidity an owner holds in one pool
///
/// Seeds: ["position", owner, pool]
#[account]
#[derive(InitSpace)]
pub struct Position {
    pub owner: Pubkey,

    /// Pool account address
    pub pool: Pubkey,

    pub pool_id: [u8; 32],

    pub liquidity: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Position {
    pub const SEED: &'static [u8] = b"position";

    /// Fill in the keys of a freshly created account
    pub fn bind(&mut self, owner: Pubkey, pool: Pubkey, pool_id: PoolId, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.pool = pool;
            self.pool_id = pool_id;
            self.bump = bump;
        }
    }

    fn is_for(&self, owner: &Pubkey, pool_id: &PoolId) -> bool {
        self.owner == *owner && self.pool_id == *pool_id
    }

    fn credited(&self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<u64> {
        require!(self.is_for(owner, pool_id), HouseError::WrongPosition);
        Ok(self
            .liquidity
            .checked_add(amount)
            .ok_or(HouseError::MathOverflow)?)
    }
}

impl PositionStore for Position {
    fn check_credit(&self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()> {
        self.credited(owner, pool_id, amount).map(|_| ())
    }

    fn credit_liquidity(&mut self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()> {
        self.liquidity = self.credited(owner, pool_id, amount)?;
        Ok(())
    }

    fn liquidity(&self, owner: &Pubkey, pool_id: &PoolId) -> u64 {
        if self.is_for(owner, pool_id) {
            self.liquidity
        } else {
            0
        }
    }
}
