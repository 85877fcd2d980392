//! Permissionless Pool Creation
//!
//! Anyone can open a pool under an existing engine by:
//! 1. Choosing strike, sigma and maturity (these fix the pool id)
//! 2. Supplying the initial risky and stable reserves
//! 3. Naming the initial liquidity those reserves represent
//!
//! The creator's position is credited with the initial liquidity. The
//! reserve-to-liquidity ratio set here is the ratio every later allocation
//! must follow.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::house::{HouseError, PositionStore};
use crate::instructions::TokenTransfer;
use crate::state::{Engine, Pool, Position};

/// Event emitted when a new pool is created
#[event]
pub struct PoolCreated {
    pub engine: Pubkey,
    pub pool_id: [u8; 32],
    pub creator: Pubkey,
    pub strike: u64,
    pub sigma: u32,
    pub maturity: u32,
    pub reserve_risky: u64,
    pub reserve_stable: u64,
    pub liquidity: u64,
}

/// Accounts for creating a new pool
#[derive(Accounts)]
#[instruction(pool_id: [u8; 32])]
pub struct CreatePool<'info> {
    /// Pool creator (pays for accounts, provides the initial reserves)
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Engine of the pair
    #[account(
        mut,
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump = engine.bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    /// The new pool account
    #[account(
        init,
        payer = creator,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, engine.key().as_ref(), pool_id.as_ref()],
        bump,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// Creator's position in the new pool
    #[account(
        init,
        payer = creator,
        space = 8 + Position::INIT_SPACE,
        seeds = [Position::SEED, creator.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, Position>>,

    pub risky_mint: Box<InterfaceAccount<'info, Mint>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = risky_mint,
        associated_token::authority = creator,
    )]
    pub creator_risky: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = creator,
    )]
    pub creator_stable: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = risky_mint,
        associated_token::authority = engine,
    )]
    pub risky_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = engine,
    )]
    pub stable_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePool<'info> {
    #[allow(clippy::too_many_arguments)]
    pub fn create_pool(
        &mut self,
        pool_id: [u8; 32],
        strike: u64,
        sigma: u32,
        maturity: u32,
        reserve_risky: u64,
        reserve_stable: u64,
        del_liquidity: u64,
        bumps: &CreatePoolBumps,
    ) -> Result<()> {
        let clock = Clock::get()?;

        // Validations
        require!(strike > 0 && sigma > 0, HouseError::InvalidPoolParameters);
        require!(
            maturity as i64 > clock.unix_timestamp,
            HouseError::InvalidPoolParameters
        );
        require!(
            reserve_risky > 0 && reserve_stable > 0 && del_liquidity > 0,
            HouseError::InvalidPoolParameters
        );
        require!(
            pool_id == Pool::compute_id(&self.engine.key(), strike, sigma, maturity),
            HouseError::InvalidPoolParameters
        );

        // Transfer initial reserves to the engine vaults
        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.risky_mint.to_account_info(),
            decimals: self.risky_mint.decimals,
            from: self.creator_risky.to_account_info(),
            to: self.risky_vault.to_account_info(),
            authority: self.creator.to_account_info(),
        }
        .send(reserve_risky)?;

        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.stable_mint.to_account_info(),
            decimals: self.stable_mint.decimals,
            from: self.creator_stable.to_account_info(),
            to: self.stable_vault.to_account_info(),
            authority: self.creator.to_account_info(),
        }
        .send(reserve_stable)?;

        // Initialize pool state
        self.pool.set_inner(Pool {
            engine: self.engine.key(),
            pool_id,
            risky: self.risky_mint.key(),
            stable: self.stable_mint.key(),
            strike,
            sigma,
            maturity,
            reserve_risky,
            reserve_stable,
            liquidity: del_liquidity,
            created_at: clock.unix_timestamp,
            bump: bumps.pool,
        });

        let creator = self.creator.key();
        self.position
            .bind(creator, self.pool.key(), pool_id, bumps.position);
        self.position
            .credit_liquidity(&creator, &pool_id, del_liquidity)?;

        self.engine.pool_count = self
            .engine
            .pool_count
            .checked_add(1)
            .ok_or(HouseError::MathOverflow)?;

        emit!(PoolCreated {
            engine: self.engine.key(),
            pool_id,
            creator,
            strike,
            sigma,
            maturity,
            reserve_risky,
            reserve_stable,
            liquidity: del_liquidity,
        });

        msg!(
            "Pool created: {} risky, {} stable, {} liquidity",
            reserve_risky,
            reserve_stable,
            del_liquidity
        );

        Ok(())
    }
}
