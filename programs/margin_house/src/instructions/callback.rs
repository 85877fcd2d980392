//! Deposit Callback
//!
//! [`PayerDeposit`] is the house's own [`DepositCallback`]: `allocate` hands
//! it to the settlement gateway when an allocation is paid from the owner's
//! wallet instead of margin.
//!
//! The same surface is exposed as the `deposit_callback` instruction. A
//! top-level call can never pass [`authorize_callback`]: the engine is a PDA
//! that cannot sign a transaction, and the settlement lock is empty outside
//! an allocation. Calling it directly always fails with `NotEngine`.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::house::{
    authorize_callback, CallbackData, CallbackOrigin, DepositCallback, HouseError,
};
use crate::instructions::TokenTransfer;
use crate::state::Engine;

/// Pulls the requested amounts from the payer's wallet into the engine vaults
pub struct PayerDeposit<'info> {
    pub engine: Pubkey,
    pub payer: Pubkey,
    pub risky: TokenTransfer<'info>,
    pub stable: TokenTransfer<'info>,
}

impl DepositCallback for PayerDeposit<'_> {
    fn deposit_callback(
        &mut self,
        origin: &CallbackOrigin<'_>,
        del_risky: u64,
        del_stable: u64,
        data: &[u8],
    ) -> Result<()> {
        authorize_callback(origin, &self.engine)?;

        let data = CallbackData::decode(data)?;
        require_keys_eq!(data.payer, self.payer, HouseError::InvalidCallbackData);
        require_keys_eq!(data.risky, *self.risky.mint.key, HouseError::InvalidCallbackData);
        require_keys_eq!(data.stable, *self.stable.mint.key, HouseError::InvalidCallbackData);

        self.risky.send(del_risky)?;
        self.stable.send(del_stable)
    }
}

/// Accounts for invoking the deposit callback as an instruction
#[derive(Accounts)]
pub struct DirectDepositCallback<'info> {
    pub caller: Signer<'info>,

    #[account(
        seeds = [Engine::SEED, risky_mint.key().as_ref(), stable_mint.key().as_ref()],
        bump = engine.bump,
    )]
    pub engine: Box<Account<'info, Engine>>,

    pub risky_mint: Box<InterfaceAccount<'info, Mint>>,

    pub stable_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        associated_token::mint = risky_mint,
        associated_token::authority = caller,
    )]
    pub caller_risky: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        associated_token::mint = stable_mint,
        associated_token::authority = caller,
    )]
    pub caller_stable: Box<InterfaceAccount<'info, TokenAccount>>,

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

impl<'info> DirectDepositCallback<'info> {
    pub fn deposit_callback(&mut self, del_risky: u64, del_stable: u64, data: Vec<u8>) -> Result<()> {
        let mut deposit = PayerDeposit {
            engine: self.engine.key(),
            payer: self.caller.key(),
            risky: TokenTransfer {
                token_program: self.token_program.to_account_info(),
                mint: self.risky_mint.to_account_info(),
                decimals: self.risky_mint.decimals,
                from: self.caller_risky.to_account_info(),
                to: self.risky_vault.to_account_info(),
                authority: self.caller.to_account_info(),
            },
            stable: TokenTransfer {
                token_program: self.token_program.to_account_info(),
                mint: self.stable_mint.to_account_info(),
                decimals: self.stable_mint.decimals,
                from: self.caller_stable.to_account_info(),
                to: self.stable_vault.to_account_info(),
                authority: self.caller.to_account_info(),
            },
        };

        let origin = CallbackOrigin {
            caller: self.caller.key(),
            lock: &self.engine.lock,
        };
        deposit.deposit_callback(&origin, del_risky, del_stable, &data)
    }
}
