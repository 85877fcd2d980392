//! In-memory stand-ins for the accounts the allocation engine works on

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use anchor_lang::prelude::*;
use margin_house::house::{
    authorize_callback, AllocationEngine, AllocationReceipt, AllocationRequest, CallbackData,
    CallbackOrigin, DepositCallback, Funding, HouseError, MarginBalance, MarginLedger, PoolId,
    PositionStore, ReserveOracle, Reserves, SettlementLock, VaultBalances,
};

pub const RESERVE_RISKY: u64 = 308_000_000;
pub const RESERVE_STABLE: u64 = 6_920_000_000;
pub const LIQUIDITY: u64 = 1_000_000_000;

/// Ten units of liquidity at nine decimals
pub const DEL_LIQUIDITY: u64 = 10_000_000_000;

/// Fails the test unless `result` is the given house error
pub fn assert_house_error<T: std::fmt::Debug>(result: Result<T>, expected: HouseError) {
    match result {
        Err(anchor_lang::error::Error::AnchorError(error)) => {
            assert_eq!(error.error_code_number, u32::from(expected), "{error:?}")
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

struct PoolEntry {
    risky: Pubkey,
    stable: Pubkey,
    reserves: Reserves,
}

#[derive(Default)]
pub struct ReserveBook {
    pools: BTreeMap<PoolId, PoolEntry>,
}

impl ReserveBook {
    pub fn insert(&mut self, pool_id: PoolId, risky: Pubkey, stable: Pubkey, reserves: Reserves) {
        self.pools.insert(
            pool_id,
            PoolEntry {
                risky,
                stable,
                reserves,
            },
        );
    }

    pub fn get(&self, pool_id: &PoolId) -> Reserves {
        self.pools
            .get(pool_id)
            .map(|entry| entry.reserves)
            .unwrap_or_default()
    }
}

impl ReserveOracle for ReserveBook {
    fn reserves(&self, pool_id: &PoolId, risky: &Pubkey, stable: &Pubkey) -> Result<Reserves> {
        match self.pools.get(pool_id) {
            Some(entry) if entry.risky == *risky && entry.stable == *stable => Ok(entry.reserves),
            _ => err!(HouseError::PoolNotFound),
        }
    }

    fn apply_allocation(
        &mut self,
        pool_id: &PoolId,
        del_risky: u64,
        del_stable: u64,
        del_liquidity: u64,
    ) -> Result<()> {
        let entry = self
            .pools
            .get_mut(pool_id)
            .ok_or(HouseError::PoolNotFound)?;
        entry.reserves = entry
            .reserves
            .checked_add(del_risky, del_stable, del_liquidity)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MarginBook {
    balances: BTreeMap<Pubkey, MarginBalance>,
}

impl MarginLedger for MarginBook {
    fn debit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        let mut balance = self.balance(owner);
        balance.debit(risky, stable)?;
        self.balances.insert(*owner, balance);
        Ok(())
    }

    fn credit(&mut self, owner: &Pubkey, risky: u64, stable: u64) -> Result<()> {
        let mut balance = self.balance(owner);
        balance.credit(risky, stable)?;
        self.balances.insert(*owner, balance);
        Ok(())
    }

    fn balance(&self, owner: &Pubkey) -> MarginBalance {
        self.balances.get(owner).copied().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct PositionBook {
    liquidity: BTreeMap<(Pubkey, PoolId), u64>,
}

impl PositionStore for PositionBook {
    fn check_credit(&self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()> {
        self.liquidity(owner, pool_id)
            .checked_add(amount)
            .ok_or(HouseError::MathOverflow)?;
        Ok(())
    }

    fn credit_liquidity(&mut self, owner: &Pubkey, pool_id: &PoolId, amount: u64) -> Result<()> {
        let held = self.liquidity.entry((*owner, *pool_id)).or_default();
        *held = held.checked_add(amount).ok_or(HouseError::MathOverflow)?;
        Ok(())
    }

    fn liquidity(&self, owner: &Pubkey, pool_id: &PoolId) -> u64 {
        self.liquidity
            .get(&(*owner, *pool_id))
            .copied()
            .unwrap_or_default()
    }
}

/// Token balances keyed by (mint, holder), shared between the vaults and the
/// callback the way both see the same token program on chain
#[derive(Clone, Default)]
pub struct TokenLedger {
    balances: Rc<RefCell<BTreeMap<(Pubkey, Pubkey), u64>>>,
}

impl TokenLedger {
    pub fn mint_to(&self, mint: &Pubkey, holder: &Pubkey, amount: u64) {
        *self
            .balances
            .borrow_mut()
            .entry((*mint, *holder))
            .or_default() += amount;
    }

    pub fn balance(&self, mint: &Pubkey, holder: &Pubkey) -> u64 {
        self.balances
            .borrow()
            .get(&(*mint, *holder))
            .copied()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<(Pubkey, Pubkey), u64> {
        self.balances.borrow().clone()
    }

    pub fn restore(&self, snapshot: BTreeMap<(Pubkey, Pubkey), u64>) {
        *self.balances.borrow_mut() = snapshot;
    }

    pub fn transfer(&self, mint: &Pubkey, from: &Pubkey, to: &Pubkey, amount: u64) -> Result<()> {
        let mut balances = self.balances.borrow_mut();
        let source = balances.entry((*mint, *from)).or_default();
        *source = source
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        *balances.entry((*mint, *to)).or_default() += amount;
        Ok(())
    }
}

/// The engine's two vaults
pub struct TokenVaults {
    pub tokens: TokenLedger,
    pub engine: Pubkey,
    pub risky: Pubkey,
    pub stable: Pubkey,
}

impl VaultBalances for TokenVaults {
    fn balances(&mut self) -> Result<(u64, u64)> {
        Ok((
            self.tokens.balance(&self.risky, &self.engine),
            self.tokens.balance(&self.stable, &self.engine),
        ))
    }
}

/// How much of the requested amounts a callback actually sends
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Full,
    /// Sends this much less stable than asked
    ShortStable(u64),
    /// Reports success without sending anything
    Nothing,
}

/// Pulls tokens from the payer named in the callback data
pub struct TransferFromCallback {
    pub tokens: TokenLedger,
    pub engine: Pubkey,
    pub risky: Pubkey,
    pub stable: Pubkey,
    pub delivery: Delivery,
    /// Whether the payer was held in the settlement lock during the call
    pub saw_lock: bool,
}

impl DepositCallback for TransferFromCallback {
    fn deposit_callback(
        &mut self,
        origin: &CallbackOrigin<'_>,
        del_risky: u64,
        del_stable: u64,
        data: &[u8],
    ) -> Result<()> {
        authorize_callback(origin, &self.engine)?;

        let data = CallbackData::decode(data)?;
        require_keys_eq!(data.risky, self.risky, HouseError::InvalidCallbackData);
        require_keys_eq!(data.stable, self.stable, HouseError::InvalidCallbackData);
        self.saw_lock = origin.lock.holds(&data.payer);

        let (risky, stable) = match self.delivery {
            Delivery::Full => (del_risky, del_stable),
            Delivery::ShortStable(short) => (del_risky, del_stable.saturating_sub(short)),
            Delivery::Nothing => return Ok(()),
        };
        self.tokens
            .transfer(&self.risky, &data.payer, &self.engine, risky)?;
        self.tokens
            .transfer(&self.stable, &data.payer, &self.engine, stable)
    }
}

/// One engine with one pool and the stores around it
pub struct Fixture {
    pub engine: Pubkey,
    pub risky: Pubkey,
    pub stable: Pubkey,
    pub pool_id: PoolId,
    pub oracle: ReserveBook,
    pub margin: MarginBook,
    pub positions: PositionBook,
    pub lock: SettlementLock,
    pub tokens: TokenLedger,
    /// Whether the last external allocation's callback saw the lock held
    pub callback_saw_lock: bool,
}

impl Fixture {
    pub fn new() -> Self {
        let engine = Pubkey::new_unique();
        let risky = Pubkey::new_unique();
        let stable = Pubkey::new_unique();
        let pool_id = [42u8; 32];

        let mut oracle = ReserveBook::default();
        oracle.insert(
            pool_id,
            risky,
            stable,
            Reserves::new(RESERVE_RISKY, RESERVE_STABLE, LIQUIDITY),
        );

        let tokens = TokenLedger::default();
        tokens.mint_to(&risky, &engine, RESERVE_RISKY);
        tokens.mint_to(&stable, &engine, RESERVE_STABLE);

        Self {
            engine,
            risky,
            stable,
            pool_id,
            oracle,
            margin: MarginBook::default(),
            positions: PositionBook::default(),
            lock: SettlementLock::default(),
            tokens,
            callback_saw_lock: false,
        }
    }

    /// Give `owner` tokens in their wallet
    pub fn fund_wallet(&self, owner: &Pubkey, risky: u64, stable: u64) {
        self.tokens.mint_to(&self.risky, owner, risky);
        self.tokens.mint_to(&self.stable, owner, stable);
    }

    /// Move wallet tokens into the vaults and credit them as margin
    pub fn deposit_margin(&mut self, owner: &Pubkey, risky: u64, stable: u64) {
        self.tokens
            .transfer(&self.risky, owner, &self.engine, risky)
            .unwrap();
        self.tokens
            .transfer(&self.stable, owner, &self.engine, stable)
            .unwrap();
        self.margin.credit(owner, risky, stable).unwrap();
    }

    /// Replace the pool's reserves
    pub fn set_reserves(&mut self, reserves: Reserves) {
        self.oracle
            .insert(self.pool_id, self.risky, self.stable, reserves);
    }

    pub fn reserves(&self) -> Reserves {
        self.oracle.get(&self.pool_id)
    }

    pub fn deltas(&self, del_liquidity: u64) -> (u64, u64) {
        self.reserves().deltas_for_liquidity(del_liquidity).unwrap()
    }

    pub fn wallet(&self, owner: &Pubkey) -> (u64, u64) {
        (
            self.tokens.balance(&self.risky, owner),
            self.tokens.balance(&self.stable, owner),
        )
    }

    pub fn vaults(&self) -> (u64, u64) {
        self.wallet(&self.engine)
    }

    pub fn position(&self, owner: &Pubkey) -> u64 {
        self.positions.liquidity(owner, &self.pool_id)
    }

    pub fn callback_data(&self, payer: &Pubkey) -> Vec<u8> {
        CallbackData {
            payer: *payer,
            risky: self.risky,
            stable: self.stable,
        }
        .encode()
        .unwrap()
    }

    pub fn request<'a>(&self, del_risky: u64, del_stable: u64, funding: Funding<'a>) -> AllocationRequest<'a> {
        AllocationRequest {
            pool_id: self.pool_id,
            risky: self.risky,
            stable: self.stable,
            del_risky,
            del_stable,
            funding,
        }
    }

    pub fn allocate_from_margin(
        &mut self,
        owner: &Pubkey,
        del_risky: u64,
        del_stable: u64,
    ) -> Result<AllocationReceipt> {
        let request = self.request(del_risky, del_stable, Funding::FromMargin);
        AllocationEngine::new(
            self.engine,
            &mut self.oracle,
            &mut self.margin,
            &mut self.positions,
            &mut self.lock,
        )
        .allocate(owner, request)
    }

    pub fn allocate_external(
        &mut self,
        owner: &Pubkey,
        del_risky: u64,
        del_stable: u64,
        delivery: Delivery,
    ) -> Result<AllocationReceipt> {
        let data = self.callback_data(owner);
        self.allocate_external_with(owner, del_risky, del_stable, delivery, &data)
    }

    pub fn allocate_external_with(
        &mut self,
        owner: &Pubkey,
        del_risky: u64,
        del_stable: u64,
        delivery: Delivery,
        data: &[u8],
    ) -> Result<AllocationReceipt> {
        let tokens_before = self.tokens.snapshot();
        let mut vaults = TokenVaults {
            tokens: self.tokens.clone(),
            engine: self.engine,
            risky: self.risky,
            stable: self.stable,
        };
        let mut callback = TransferFromCallback {
            tokens: self.tokens.clone(),
            engine: self.engine,
            risky: self.risky,
            stable: self.stable,
            delivery,
            saw_lock: false,
        };

        let request = self.request(
            del_risky,
            del_stable,
            Funding::FromExternal {
                vaults: &mut vaults,
                callback: &mut callback,
                data,
            },
        );
        let receipt = AllocationEngine::new(
            self.engine,
            &mut self.oracle,
            &mut self.margin,
            &mut self.positions,
            &mut self.lock,
        )
        .allocate(owner, request);

        self.callback_saw_lock = callback.saw_lock;
        // A failed instruction discards the token program's writes too
        if receipt.is_err() {
            self.tokens.restore(tokens_before);
        }
        receipt
    }
}
