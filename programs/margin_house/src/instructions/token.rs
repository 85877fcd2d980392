//! Token movements shared by the instruction handlers

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{transfer_checked, TransferChecked};

/// One `transfer_checked` between two token accounts of the same mint
pub struct TokenTransfer<'info> {
    pub token_program: AccountInfo<'info>,
    pub mint: AccountInfo<'info>,
    pub decimals: u8,
    pub from: AccountInfo<'info>,
    pub to: AccountInfo<'info>,
    pub authority: AccountInfo<'info>,
}

impl<'info> TokenTransfer<'info> {
    fn accounts(&self) -> TransferChecked<'info> {
        TransferChecked {
            from: self.from.clone(),
            mint: self.mint.clone(),
            to: self.to.clone(),
            authority: self.authority.clone(),
        }
    }

    /// Transfer signed by a wallet that signed the transaction
    pub fn send(&self, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        transfer_checked(
            CpiContext::new(self.token_program.clone(), self.accounts()),
            amount,
            self.decimals,
        )
    }

    /// Transfer signed by a program PDA
    pub fn send_signed(&self, amount: u64, signer_seeds: &[&[&[u8]]]) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        transfer_checked(
            CpiContext::new_with_signer(self.token_program.clone(), self.accounts(), signer_seeds),
            amount,
            self.decimals,
        )
    }
}
