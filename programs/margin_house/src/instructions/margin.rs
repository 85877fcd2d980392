//! Margin Deposits and Withdrawals
//!
//! Margin lets an account park tokens in the engine vaults once and fund any
//! number of later allocations without another token transfer.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::house::{HouseError, MarginLedger};
use crate::instructions::TokenTransfer;
use crate::state::{Engine, Margin};

/// Event emitted when margin is deposited
#[event]
pub struct MarginDeposited {
    pub payer: Pubkey,
    pub owner: Pubkey,
    pub engine: Pubkey,
    pub del_risky: u64,
    pub del_stable: u64,
}

/// Event emitted when margin is withdrawn
#[event]
pub struct MarginWithdrawn {
    pub owner: Pubkey,
    pub engine: Pubkey,
    pub del_risky: u64,
    pub del_stable: u64,
}

/// Accounts for depositing margin (the payer may fund someone else)
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Provides the tokens and pays for the margin account
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: only used as a seed and recorded as the margin owner
    pub owner: UncheckedAccount<'info>,

    #[account(
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump = engine.bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + Margin::INIT_SPACE,
        seeds = [Margin::SEED, engine.key().as_ref(), owner.key().as_ref()],
        bump,
    )]
    pub margin: Box<Account<'info, Margin>>,

    pub risky_mint: Box<InterfaceAccount<'info, Mint>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = risky_mint,
        associated_token::authority = payer,
    )]
    pub payer_risky: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = payer,
    )]
    pub payer_stable: Box<InterfaceAccount<'info, TokenAccount>>,

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

impl<'info> Deposit<'info> {
    pub fn deposit(&mut self, del_risky: u64, del_stable: u64, bumps: &DepositBumps) -> Result<()> {
        require!(del_risky > 0 || del_stable > 0, HouseError::ZeroAmount);

        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.risky_mint.to_account_info(),
            decimals: self.risky_mint.decimals,
            from: self.payer_risky.to_account_info(),
            to: self.risky_vault.to_account_info(),
            authority: self.payer.to_account_info(),
        }
        .send(del_risky)?;

        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.stable_mint.to_account_info(),
            decimals: self.stable_mint.decimals,
            from: self.payer_stable.to_account_info(),
            to: self.stable_vault.to_account_info(),
            authority: self.payer.to_account_info(),
        }
        .send(del_stable)?;

        let owner = self.owner.key();
        self.margin.bind(owner, self.engine.key(), bumps.margin);
        self.margin.credit(&owner, del_risky, del_stable)?;

        emit!(MarginDeposited {
            payer: self.payer.key(),
            owner,
            engine: self.engine.key(),
            del_risky,
            del_stable,
        });

        msg!(
            "Margin deposited for {}: {} risky, {} stable",
            owner,
            del_risky,
            del_stable
        );

        Ok(())
    }
}

/// Accounts for withdrawing margin back to the owner
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump = engine.bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    #[account(
        mut,
        seeds = [Margin::SEED, engine.key().as_ref(), owner.key().as_ref()],
        bump = margin.bump,
        has_one = owner @ HouseError::WrongMarginOwner,
    )]
    pub margin: Box<Account<'info, Margin>>,

    pub risky_mint: Box<InterfaceAccount<'info, Mint>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = risky_mint,
        associated_token::authority = owner,
    )]
    pub owner_risky: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = owner,
    )]
    pub owner_stable: Box<InterfaceAccount<'info, TokenAccount>>,

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
}

impl<'info> Withdraw<'info> {
    pub fn withdraw(&mut self, del_risky: u64, del_stable: u64) -> Result<()> {
        require!(del_risky > 0 || del_stable > 0, HouseError::ZeroAmount);

        let owner = self.owner.key();
        self.margin.debit(&owner, del_risky, del_stable)?;

        let seeds = self.engine.signer_seeds();
        let signer_seeds = &[&seeds[..]];

        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.risky_mint.to_account_info(),
            decimals: self.risky_mint.decimals,
            from: self.risky_vault.to_account_info(),
            to: self.owner_risky.to_account_info(),
            authority: self.engine.to_account_info(),
        }
        .send_signed(del_risky, signer_seeds)?;

        TokenTransfer {
            token_program: self.token_program.to_account_info(),
            mint: self.stable_mint.to_account_info(),
            decimals: self.stable_mint.decimals,
            from: self.stable_vault.to_account_info(),
            to: self.owner_stable.to_account_info(),
            authority: self.engine.to_account_info(),
        }
        .send_signed(del_stable, signer_seeds)?;

        emit!(MarginWithdrawn {
            owner,
            engine: self.engine.key(),
            del_risky,
            del_stable,
        });

        msg!(
            "Margin withdrawn by {}: {} risky, {} stable",
            owner,
            del_risky,
            del_stable
        );

        Ok(())
    }
}
