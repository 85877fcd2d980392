//! # Settlement
//!
//! Before a position is credited the house must hold the tokens backing it.
//! There are two ways to get them:
//!
//! ```text
//!   FromMargin                      FromExternal
//!   ──────────                      ────────────
//!   margin.debit(Δrisky, Δstable)   before = vaults.balances()
//!                                   callback(Δrisky, Δstable, data)
//!                                   after  = vaults.balances()
//!                                   require after - before >= Δ
//! ```
//!
//! The external path never looks at what the callback reports. It trusts the
//! vault balances it observes on both sides of the call and nothing else, so
//! a callback that skips or shortens the transfer fails the allocation with
//! `UnderfundedCallback`.
//!
//! The callback runs while the owner is held in the [`SettlementLock`]. The
//! callback surface accepts a call only from the engine and only while that
//! lock is held, which rules out invoking it directly to fake a deposit.

use anchor_lang::prelude::*;

use crate::house::{HouseError, MarginBalance, MarginLedger};

/// Owners that may be mid-settlement at once (the CPI depth limit)
pub const MAX_IN_FLIGHT: usize = 4;

/// Accounts whose allocation is between "balances snapshotted" and
/// "position credited"
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq, InitSpace)]
pub struct SettlementLock {
    #[max_len(4)]
    pub owners: Vec<Pubkey>,
}

// Account space follows the in-flight bound
const _: () = assert!(SettlementLock::INIT_SPACE == 4 + MAX_IN_FLIGHT * 32);

impl SettlementLock {
    pub fn enter(&mut self, owner: &Pubkey) -> Result<()> {
        require!(!self.holds(owner), HouseError::Reentrancy);
        require!(self.owners.len() < MAX_IN_FLIGHT, HouseError::Reentrancy);
        self.owners.push(*owner);
        Ok(())
    }

    pub fn exit(&mut self, owner: &Pubkey) {
        self.owners.retain(|held| held != owner);
    }

    pub fn holds(&self, owner: &Pubkey) -> bool {
        self.owners.contains(owner)
    }

    pub fn is_held(&self) -> bool {
        !self.owners.is_empty()
    }
}

/// How an allocation is paid for
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FundingMode {
    FromMargin,
    FromExternal,
}

impl FundingMode {
    pub fn from_margin(self) -> bool {
        self == FundingMode::FromMargin
    }
}

impl From<bool> for FundingMode {
    fn from(from_margin: bool) -> Self {
        if from_margin {
            FundingMode::FromMargin
        } else {
            FundingMode::FromExternal
        }
    }
}

/// Token balances held by the engine, read on both sides of the callback
pub trait VaultBalances {
    /// Returns `(risky, stable)`
    fn balances(&mut self) -> Result<(u64, u64)>;
}

/// Who is invoking the deposit callback, and under which lock
pub struct CallbackOrigin<'a> {
    pub caller: Pubkey,
    pub lock: &'a SettlementLock,
}

/// Moves tokens from the paying account to the engine
pub trait DepositCallback {
    fn deposit_callback(
        &mut self,
        origin: &CallbackOrigin<'_>,
        del_risky: u64,
        del_stable: u64,
        data: &[u8],
    ) -> Result<()>;
}

/// Guard every deposit callback implementation starts with
pub fn authorize_callback(origin: &CallbackOrigin<'_>, engine: &Pubkey) -> Result<()> {
    require_keys_eq!(origin.caller, *engine, HouseError::NotEngine);
    require!(origin.lock.is_held(), HouseError::NotEngine);
    Ok(())
}

/// Opaque callback payload: who pays, and for which pair
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallbackData {
    pub payer: Pubkey,
    pub risky: Pubkey,
    pub stable: Pubkey,
}

impl CallbackData {
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(96);
        self.serialize(&mut data)
            .map_err(|_| error!(HouseError::InvalidCallbackData))?;
        Ok(data)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        CallbackData::try_from_slice(data).map_err(|_| error!(HouseError::InvalidCallbackData))
    }
}

/// Settlement strategy, chosen once at the entry point
pub enum Funding<'a> {
    FromMargin,
    FromExternal {
        vaults: &'a mut dyn VaultBalances,
        callback: &'a mut dyn DepositCallback,
        data: &'a [u8],
    },
}

impl Funding<'_> {
    pub fn mode(&self) -> FundingMode {
        match self {
            Funding::FromMargin => FundingMode::FromMargin,
            Funding::FromExternal { .. } => FundingMode::FromExternal,
        }
    }
}

/// Obtains the tokens an allocation needs
pub struct SettlementGateway<'a, M: MarginLedger + ?Sized> {
    engine: Pubkey,
    margin: &'a mut M,
    lock: &'a SettlementLock,
}

impl<'a, M: MarginLedger + ?Sized> SettlementGateway<'a, M> {
    pub fn new(engine: Pubkey, margin: &'a mut M, lock: &'a SettlementLock) -> Self {
        Self {
            engine,
            margin,
            lock,
        }
    }

    pub fn settle(
        &mut self,
        owner: &Pubkey,
        del_risky: u64,
        del_stable: u64,
        funding: Funding<'_>,
    ) -> Result<()> {
        match funding {
            Funding::FromMargin => self.margin.debit(owner, del_risky, del_stable),
            Funding::FromExternal {
                vaults,
                callback,
                data,
            } => {
                let (risky_before, stable_before) = vaults.balances()?;

                let origin = CallbackOrigin {
                    caller: self.engine,
                    lock: self.lock,
                };
                callback.deposit_callback(&origin, del_risky, del_stable, data)?;

                let (risky_after, stable_after) = vaults.balances()?;
                let received = MarginBalance::new(
                    risky_after.saturating_sub(risky_before),
                    stable_after.saturating_sub(stable_before),
                );
                require!(
                    received.risky >= del_risky && received.stable >= del_stable,
                    HouseError::UnderfundedCallback
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> Pubkey {
        Pubkey::new_from_array([n; 32])
    }

    #[test]
    fn test_lock_rejects_same_owner_twice() {
        let mut lock = SettlementLock::default();
        lock.enter(&key(1)).unwrap();
        assert!(lock.enter(&key(1)).is_err());

        lock.enter(&key(2)).unwrap();
        assert!(lock.holds(&key(1)) && lock.holds(&key(2)));

        lock.exit(&key(1));
        assert!(!lock.holds(&key(1)));
        assert!(lock.is_held());
    }

    #[test]
    fn test_lock_space_fits_bound() {
        let mut lock = SettlementLock::default();
        for n in 0..MAX_IN_FLIGHT as u8 {
            lock.enter(&key(n)).unwrap();
        }
        let mut bytes = Vec::new();
        lock.serialize(&mut bytes).unwrap();
        assert_eq!(bytes.len(), SettlementLock::INIT_SPACE);
    }

    #[test]
    fn test_lock_is_bounded() {
        let mut lock = SettlementLock::default();
        for n in 0..MAX_IN_FLIGHT as u8 {
            lock.enter(&key(n)).unwrap();
        }
        assert!(lock.enter(&key(200)).is_err());
    }

    #[test]
    fn test_callback_requires_engine_and_lock() {
        let engine = key(9);
        let mut lock = SettlementLock::default();

        let direct = CallbackOrigin {
            caller: engine,
            lock: &lock,
        };
        assert!(authorize_callback(&direct, &engine).is_err());

        lock.enter(&key(1)).unwrap();
        let stranger = CallbackOrigin {
            caller: key(1),
            lock: &lock,
        };
        assert!(authorize_callback(&stranger, &engine).is_err());

        let engine_call = CallbackOrigin {
            caller: engine,
            lock: &lock,
        };
        assert!(authorize_callback(&engine_call, &engine).is_ok());
    }

    #[test]
    fn test_callback_data_decodes_what_it_encodes() {
        let data = CallbackData {
            payer: key(1),
            risky: key(2),
            stable: key(3),
        };
        let bytes = data.encode().unwrap();
        assert_eq!(bytes.len(), 96);
        assert_eq!(CallbackData::decode(&bytes).unwrap(), data);
        assert!(CallbackData::decode(&bytes[..64]).is_err());
    }

    #[test]
    fn test_funding_mode_from_flag() {
        assert_eq!(FundingMode::from(true), FundingMode::FromMargin);
        assert_eq!(FundingMode::from(false), FundingMode::FromExternal);
        assert!(FundingMode::FromMargin.from_margin());
        assert_eq!(Funding::FromMargin.mode(), FundingMode::FromMargin);
    }
}
