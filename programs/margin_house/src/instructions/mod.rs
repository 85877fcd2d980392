//! Instruction handlers for the margin house
//!
//! Each instruction represents an action users can take:
//! - `initialize` - Set up the house (once)
//! - `create_engine` - Register a risky/stable pair and its vaults
//! - `create_pool` - Open a pool under an engine (permissionless)
//! - `deposit` / `withdraw` - Move tokens in and out of margin
//! - `allocate` - Add liquidity to a pool, paid from margin or the wallet
//! - `deposit_callback` - Callback surface used during `allocate`

pub mod allocate;
pub mod callback;
pub mod create_engine;
pub mod create_pool;
pub mod initialize;
pub mod margin;
pub mod token;

pub use allocate::*;
pub use callback::*;
pub use create_engine::*;
pub use create_pool::*;
pub use initialize::*;
pub use margin::*;
pub use token::*;
