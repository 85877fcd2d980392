//! # Allocation Engine
//!
//! Adds liquidity to a pool on behalf of an owner:
//!
//! ```text
//! 1. lock owner               (nested allocation for the same owner fails)
//! 2. reserves = oracle.reserves(pool_id, risky, stable)
//! 3. ΔL = min(Δrisky·L/R_risky, Δstable·L/R_stable)
//! 4. check the new reserves and the position credit fit
//! 5. settle Δrisky, Δstable   (margin debit, or callback + balance check)
//! 6. oracle.apply_allocation  (reserves and liquidity grow)
//! 7. positions.credit(ΔL)
//! 8. unlock owner, return the receipt
//! ```
//!
//! Settlement always happens before the credit, and every check that can
//! fail without moving funds runs before settlement. A failed allocation
//! leaves margin, reserves and positions as they were.

use anchor_lang::prelude::*;

use crate::house::{
    Funding, HouseError, MarginLedger, PositionStore, Reserves, SettlementGateway, SettlementLock,
};

/// Pool identifier, see [`crate::state::Pool::compute_id`]
pub type PoolId = [u8; 32];

/// Source of pool reserves
pub trait ReserveOracle {
    /// Current reserves of `pool_id`
    ///
    /// Fails with `PoolNotFound` when no pool is registered under that id
    /// for the given token pair.
    fn reserves(&self, pool_id: &PoolId, risky: &Pubkey, stable: &Pubkey) -> Result<Reserves>;

    /// Record tokens and liquidity added to `pool_id`
    fn apply_allocation(
        &mut self,
        pool_id: &PoolId,
        del_risky: u64,
        del_stable: u64,
        del_liquidity: u64,
    ) -> Result<()>;
}

/// One allocate call
pub struct AllocationRequest<'a> {
    pub pool_id: PoolId,
    pub risky: Pubkey,
    pub stable: Pubkey,
    pub del_risky: u64,
    pub del_stable: u64,
    pub funding: Funding<'a>,
}

/// What an allocation did, in event field order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocationReceipt {
    pub owner: Pubkey,
    pub engine: Pubkey,
    pub pool_id: PoolId,
    pub del_liquidity: u64,
    pub del_risky: u64,
    pub del_stable: u64,
    pub from_margin: bool,
}

pub struct AllocationEngine<'a, O: ?Sized, M: ?Sized, P: ?Sized> {
    engine: Pubkey,
    oracle: &'a mut O,
    margin: &'a mut M,
    positions: &'a mut P,
    lock: &'a mut SettlementLock,
}

impl<'a, O, M, P> AllocationEngine<'a, O, M, P>
where
    O: ReserveOracle + ?Sized,
    M: MarginLedger + ?Sized,
    P: PositionStore + ?Sized,
{
    pub fn new(
        engine: Pubkey,
        oracle: &'a mut O,
        margin: &'a mut M,
        positions: &'a mut P,
        lock: &'a mut SettlementLock,
    ) -> Self {
        Self {
            engine,
            oracle,
            margin,
            positions,
            lock,
        }
    }

    pub fn allocate(
        &mut self,
        owner: &Pubkey,
        request: AllocationRequest<'_>,
    ) -> Result<AllocationReceipt> {
        self.lock.enter(owner)?;
        let receipt = self.allocate_locked(owner, request);
        self.lock.exit(owner);
        receipt
    }

    fn allocate_locked(
        &mut self,
        owner: &Pubkey,
        request: AllocationRequest<'_>,
    ) -> Result<AllocationReceipt> {
        let AllocationRequest {
            pool_id,
            risky,
            stable,
            del_risky,
            del_stable,
            funding,
        } = request;

        let reserves = self.oracle.reserves(&pool_id, &risky, &stable)?;
        require!(del_risky > 0 || del_stable > 0, HouseError::ZeroLiquidity);

        let del_liquidity = reserves.liquidity_for_deltas(del_risky, del_stable)?;
        require!(del_liquidity > 0, HouseError::ZeroLiquidity);

        // Nothing after settlement may fail
        reserves.checked_add(del_risky, del_stable, del_liquidity)?;
        self.positions
            .check_credit(owner, &pool_id, del_liquidity)?;

        let from_margin = funding.mode().from_margin();
        SettlementGateway::new(self.engine, &mut *self.margin, &*self.lock).settle(
            owner,
            del_risky,
            del_stable,
            funding,
        )?;

        self.oracle
            .apply_allocation(&pool_id, del_risky, del_stable, del_liquidity)?;
        self.positions
            .credit_liquidity(owner, &pool_id, del_liquidity)?;

        Ok(AllocationReceipt {
            owner: *owner,
            engine: self.engine,
            pool_id,
            del_liquidity,
            del_risky,
            del_stable,
            from_margin,
        })
    }
}
