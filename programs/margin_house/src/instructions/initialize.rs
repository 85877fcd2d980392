//! House Initialization
//!
//! Creates the singleton house account. This is typically called once
//! during deployment.

use anchor_lang::prelude::*;

use crate::state::House;

/// Accounts required for house initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Deployer (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global house account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + House::INIT_SPACE,
        seeds = [House::SEED],
        bump,
    )]
    pub house: Account<'info, House>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the house
    pub fn initialize(&mut self, bumps: &InitializeBumps) -> Result<()> {
        self.house.set_inner(House {
            admin: self.admin.key(),
            engine_count: 0,
            bump: bumps.house,
        });

        msg!("House initialized!");
        msg!("Admin: {}", self.admin.key());

        Ok(())
    }
}
