//! Reserve Engine
//!
//! One engine per risky/stable pair. It owns the two token vaults that back
//! every pool and every margin balance of the pair, and the settlement lock
//! for allocations into those pools. Allocations under different engines
//! never contend for the same account.

use anchor_lang::prelude::*;

use crate::house::SettlementLock;

/// Engine account
///
/// Seeds: ["engine", risky_mint, stable_mint]
#[account]
#[derive(InitSpace)]
pub struct Engine {
    /// Risky token mint
    pub risky: Pubkey,

    /// Stable token mint
    pub stable: Pubkey,

    /// Risky token vault (ATA owned by this PDA)
    pub risky_vault: Pubkey,

    /// Stable token vault (ATA owned by this PDA)
    pub stable_vault: Pubkey,

    /// Pools created under this engine
    pub pool_count: u64,

    /// Owners currently between settlement and position credit
    pub lock: SettlementLock,

    /// PDA bump seed
    pub bump: u8,
}

impl Engine {
    pub const SEED: &'static [u8] = b"engine";

    /// Seeds the engine signs vault withdrawals with
    pub fn signer_seeds(&self) -> [&[u8]; 4] {
        [
            Engine::SEED,
            self.risky.as_ref(),
            self.stable.as_ref(),
            std::slice::from_ref(&self.bump),
        ]
    }
}
