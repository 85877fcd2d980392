//! Liquidity Allocation
//!
//! Adds liquidity to an existing pool in proportion to its reserves. The
//! owner chooses how to pay:
//! - from margin: the margin account is debited, no tokens move
//! - from the wallet: the engine runs [`PayerDeposit`] and then checks that
//!   both vault balances grew by at least the requested amounts
//!
//! The accounting itself lives in [`AllocationEngine`]; this instruction only
//! wires the accounts into it.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::house::{
    AllocationEngine, AllocationRequest, CallbackData, Funding, FundingMode, HouseError,
    VaultBalances,
};
use crate::instructions::{PayerDeposit, TokenTransfer};
use crate::state::{Engine, Margin, Pool, Position};

/// Event emitted when liquidity is allocated
#[event]
pub struct Allocated {
    pub owner: Pubkey,
    pub engine: Pubkey,
    pub pool_id: [u8; 32],
    pub del_liquidity: u64,
    pub del_risky: u64,
    pub del_stable: u64,
    pub from_margin: bool,
}

/// Engine vaults, re-read from account data on every call
pub struct EngineVaults<'a, 'info> {
    pub risky: &'a mut InterfaceAccount<'info, TokenAccount>,
    pub stable: &'a mut InterfaceAccount<'info, TokenAccount>,
}

impl VaultBalances for EngineVaults<'_, '_> {
    fn balances(&mut self) -> Result<(u64, u64)> {
        self.risky.reload()?;
        self.stable.reload()?;
        Ok((self.risky.amount, self.stable.amount))
    }
}

/// Accounts for allocating liquidity
#[derive(Accounts)]
#[instruction(pool_id: [u8; 32])]
pub struct Allocate<'info> {
    /// Position owner (and payer when not funding from margin)
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Holds the settlement lock
    #[account(
        mut,
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump = engine.bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    #[account(
        mut,
        seeds = [Pool::SEED, engine.key().as_ref(), pool_id.as_ref()],
        bump = pool.bump,
        has_one = engine @ HouseError::PoolNotFound,
    )]
    pub pool: Box<Account<'info, Pool>>,

    /// Owner's margin, created by `deposit`; may be omitted when paying from
    /// the wallet
    #[account(
        mut,
        seeds = [Margin::SEED, engine.key().as_ref(), owner.key().as_ref()],
        bump = margin.bump,
        has_one = owner @ HouseError::WrongMarginOwner,
    )]
    pub margin: Option<Box<Account<'info, Margin>>>,

    #[account(
        init_if_needed,
        payer = owner,
        space = 8 + Position::INIT_SPACE,
        seeds = [Position::SEED, owner.key().as_ref(), pool.key().as_ref()],
        bump,
    )]
    pub position: Box<Account<'info, Position>>,

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
    pub system_program: Program<'info, System>,
}

impl<'info> Allocate<'info> {
    pub fn allocate(
        &mut self,
        pool_id: [u8; 32],
        del_risky: u64,
        del_stable: u64,
        from_margin: bool,
        bumps: &AllocateBumps,
    ) -> Result<u64> {
        let owner = self.owner.key();
        let engine = self.engine.key();
        let risky = self.risky_mint.key();
        let stable = self.stable_mint.key();

        self.position
            .bind(owner, self.pool.key(), pool_id, bumps.position);

        let data = CallbackData {
            payer: owner,
            risky,
            stable,
        }
        .encode()?;

        let mut deposit = PayerDeposit {
            engine,
            payer: owner,
            risky: TokenTransfer {
                token_program: self.token_program.to_account_info(),
                mint: self.risky_mint.to_account_info(),
                decimals: self.risky_mint.decimals,
                from: self.owner_risky.to_account_info(),
                to: self.risky_vault.to_account_info(),
                authority: self.owner.to_account_info(),
            },
            stable: TokenTransfer {
                token_program: self.token_program.to_account_info(),
                mint: self.stable_mint.to_account_info(),
                decimals: self.stable_mint.decimals,
                from: self.owner_stable.to_account_info(),
                to: self.stable_vault.to_account_info(),
                authority: self.owner.to_account_info(),
            },
        };
        let mut vaults = EngineVaults {
            risky: &mut self.risky_vault,
            stable: &mut self.stable_vault,
        };

        let funding = match FundingMode::from(from_margin) {
            FundingMode::FromMargin => Funding::FromMargin,
            FundingMode::FromExternal => Funding::FromExternal {
                vaults: &mut vaults,
                callback: &mut deposit,
                data: &data,
            },
        };

        let mut margin = self.margin.as_deref_mut().map(|margin| &mut **margin);

        let receipt = AllocationEngine::new(
            engine,
            &mut **self.pool,
            &mut margin,
            &mut **self.position,
            &mut self.engine.lock,
        )
        .allocate(
            &owner,
            AllocationRequest {
                pool_id,
                risky,
                stable,
                del_risky,
                del_stable,
                funding,
            },
        )?;

        emit!(Allocated {
            owner: receipt.owner,
            engine: receipt.engine,
            pool_id: receipt.pool_id,
            del_liquidity: receipt.del_liquidity,
            del_risky: receipt.del_risky,
            del_stable: receipt.del_stable,
            from_margin: receipt.from_margin,
        });

        msg!(
            "Allocated {} liquidity for {} risky, {} stable",
            receipt.del_liquidity,
            receipt.del_risky,
            receipt.del_stable
        );

        Ok(receipt.del_liquidity)
    }
}
