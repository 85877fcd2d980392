//! Engine Creation
//!
//! Registers a risky/stable pair and creates the two vaults that will hold
//! every pool reserve and margin balance of that pair.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::house::{HouseError, SettlementLock};
use crate::state::{Engine, House};

/// Event emitted when an engine is created
#[event]
pub struct EngineCreated {
    pub engine: Pubkey,
    pub risky: Pubkey,
    pub stable: Pubkey,
}

#[derive(Accounts)]
pub struct CreateEngine<'info> {
    /// Pays for the engine and its vaults
    #[account(mut)]
    pub creator: Signer<'info>,

    #[account(
        mut,
        seeds = [House::SEED],
        bump = house.bump,
    )]
    pub house: Box<Account<'info, House>>,

    #[account(
        init,
        payer = creator,
        space = 8 + Engine::INIT_SPACE,
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    #[account(
        constraint = risky_mint.key() != stable_mint.key() @ HouseError::InvalidPoolParameters,
    )]
    pub risky_mint: Box<InterfaceAccount<'info, Mint>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = risky_mint,
        associated_token::authority = engine,
    )]
    pub risky_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        init,
        payer = creator,
        associated_token::mint = stable_mint,
        associated_token::authority = engine,
    )]
    pub stable_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub system_program: Program<'info, System>,
}

impl<'info> CreateEngine<'info> {
    pub fn create_engine(&mut self, bumps: &CreateEngineBumps) -> Result<()> {
        self.engine.set_inner(Engine {
            risky: self.risky_mint.key(),
            stable: self.stable_mint.key(),
            risky_vault: self.risky_vault.key(),
            stable_vault: self.stable_vault.key(),
            pool_count: 0,
            lock: SettlementLock::default(),
            bump: bumps.engine,
        });

        self.house.engine_count = self
            .house
            .engine_count
            .checked_add(1)
            .ok_or(HouseError::MathOverflow)?;

        emit!(EngineCreated {
            engine: self.engine.key(),
            risky: self.risky_mint.key(),
            stable: self.stable_mint.key(),
        });

        msg!(
            "Engine {} created for {}/{}",
            self.engine.key(),
            self.risky_mint.key(),
            self.stable_mint.key()
        );

        Ok(())
    }
}
