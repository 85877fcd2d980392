//! # House
//!
//! Chain-agnostic core of the program: proportional liquidity math, the
//! margin ledger, the settlement gateway and the allocation engine that ties
//! them together.
//!
//! Every store the engine touches sits behind a trait:
//!
//! ```text
//!                    ┌──────────────────┐
//!   allocate ──────▶ │ AllocationEngine │
//!                    └────────┬─────────┘
//!        ┌──────────────┬─────┴────────┬───────────────┐
//!        ▼              ▼              ▼               ▼
//!  ReserveOracle  SettlementGateway  PositionStore  SettlementLock
//!                  │            │
//!                  ▼            ▼
//!            MarginLedger   VaultBalances + DepositCallback
//! ```
//!
//! The program implements them with accounts (see [`crate::state`]); the
//! integration tests implement them with in-memory maps.

pub mod allocation;
pub mod error;
pub mod liquidity;
pub mod margin;
pub mod position;
pub mod settlement;

pub use allocation::*;
pub use error::*;
pub use liquidity::*;
pub use margin::*;
pub use position::*;
pub use settlement::*;
