//! Global House Configuration
//!
//! Singleton account holding protocol-wide settings.

use anchor_lang::prelude::*;

/// Global house account (singleton PDA)
///
/// Seeds: ["house"]
#[account]
#[derive(InitSpace)]
pub struct House {
    /// Account that initialized the house
    pub admin: Pubkey,

    /// Engines created so far
    pub engine_count: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl House {
    pub const SEED: &'static [u8] = b"house";
}
