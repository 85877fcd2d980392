//! # Margin House: Proportional Liquidity Allocation
//!
//! A liquidity house on Solana for replicating-market-maker pools.
//!
//! ## Overview
//!
//! Each risky/stable pair has one engine holding the tokens of all its pools.
//! Owners add liquidity to a pool by supplying risky and stable tokens in the
//! ratio of the pool's current reserves, and pay for it either:
//! - from margin they deposited earlier, or
//! - straight from their wallet, through a deposit callback whose effect the
//!   engine verifies against the vault balances.
//!
//! The accounting core lives in [`house`] and does not depend on accounts;
//! [`state`] and [`instructions`] bind it to the chain.

use anchor_lang::prelude::*;

pub mod house;
pub mod instructions;
pub mod state;

pub use instructions::*;

// Replace with your deployed program ID
declare_id!("8NeEkxgPMV5AnZ8o5ksjPhqsHwkWXdvGCGyHmEt6tJTn");

/// Main Margin House program
#[program]
pub mod margin_house {
    use super::*;

    /// Create the house singleton
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        ctx.accounts.initialize(&ctx.bumps)
    }

    /// Register a risky/stable pair and its vaults
    pub fn create_engine(ctx: Context<CreateEngine>) -> Result<()> {
        ctx.accounts.create_engine(&ctx.bumps)
    }

    /// Open a pool with explicit initial reserves
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        ctx: Context<CreatePool>,
        pool_id: [u8; 32],
        strike: u64,
        sigma: u32,
        maturity: u32,
        reserve_risky: u64,
        reserve_stable: u64,
        del_liquidity: u64,
    ) -> Result<()> {
        ctx.accounts.create_pool(
            pool_id,
            strike,
            sigma,
            maturity,
            reserve_risky,
            reserve_stable,
            del_liquidity,
            &ctx.bumps,
        )
    }

    /// Deposit tokens into an owner's margin
    pub fn deposit(ctx: Context<Deposit>, del_risky: u64, del_stable: u64) -> Result<()> {
        ctx.accounts.deposit(del_risky, del_stable, &ctx.bumps)
    }

    /// Withdraw tokens from the signer's margin
    pub fn withdraw(ctx: Context<Withdraw>, del_risky: u64, del_stable: u64) -> Result<()> {
        ctx.accounts.withdraw(del_risky, del_stable)
    }

    /// Add liquidity to a pool; returns the liquidity credited
    pub fn allocate(
        ctx: Context<Allocate>,
        pool_id: [u8; 32],
        del_risky: u64,
        del_stable: u64,
        from_margin: bool,
    ) -> Result<u64> {
        ctx.accounts
            .allocate(pool_id, del_risky, del_stable, from_margin, &ctx.bumps)
    }

    /// Deposit callback surface (only valid inside an allocation)
    pub fn deposit_callback(
        ctx: Context<DirectDepositCallback>,
        del_risky: u64,
        del_stable: u64,
        data: Vec<u8>,
    ) -> Result<()> {
        ctx.accounts.deposit_callback(del_risky, del_stable, data)
    }
}
