//! Liquidity positions, keyed by (owner, pool id)

use anchor_lang::prelude::*;

use crate::house::PoolId;

pub trait PositionStore {
    /// Fails exactly when `credit_liquidity` with the same arguments would
    fn check_credit(&self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()>;

    /// Add `amount` to the owner's liquidity in `pool_id`
    fn credit_liquidity(&mut self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()>;

    fn liquidity(&self, owner: &Pubkey, pool_id: &PoolId) -> u64;
}
