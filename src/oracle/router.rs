use std::sync::{Arc, Mutex, MutexGuard};

use crate::decimal::{unit_scale, Amount};
use crate::errors::{LedgerError, Result};
use crate::oracle::PriceRouter;
use crate::types::AccountId;

#[derive(Debug)]
struct RouterState {
    price_per_native: Amount,
    liquid: bool,
}

/// fixed-price router for tests and demos
///
/// Quotes `native × price_per_native / 10^native_decimals`. Clones share the
/// same price, so a test can keep a handle and move the market after the
/// router has been handed to a ledger.
#[derive(Debug, Clone)]
pub struct ConstantPriceRouter {
    address: AccountId,
    wrapped_native: AccountId,
    native_decimals: u32,
    state: Arc<Mutex<RouterState>>,
}

impl ConstantPriceRouter {
    /// `price_per_native` is the stable amount one whole native unit buys
    pub fn new(price_per_native: Amount, native_decimals: u32) -> Self {
        Self {
            address: AccountId::new(),
            wrapped_native: AccountId::new(),
            native_decimals,
            state: Arc::new(Mutex::new(RouterState {
                price_per_native,
                liquid: true,
            })),
        }
    }

    pub fn with_address(mut self, address: AccountId) -> Self {
        self.address = address;
        self
    }

    pub fn set_price(&self, price_per_native: Amount) {
        self.state().price_per_native = price_per_native;
    }

    /// simulate a missing liquidity path
    pub fn set_liquidity(&self, liquid: bool) {
        self.state().liquid = liquid;
    }

    pub fn price(&self) -> Amount {
        self.state().price_per_native
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PriceRouter for ConstantPriceRouter {
    fn address(&self) -> AccountId {
        self.address
    }

    fn wrapped_native(&self) -> AccountId {
        self.wrapped_native
    }

    fn quote_native_to_stable(&self, native_amount: Amount, _stable_token: AccountId) -> Result<Amount> {
        let state = self.state();
        if !state.liquid || state.price_per_native.is_zero() {
            return Err(LedgerError::Oracle {
                message: "no liquidity path for native -> stable".to_string(),
            });
        }

        let whole_native = native_amount.as_decimal() / unit_scale(self.native_decimals);
        state
            .price_per_native
            .checked_mul(whole_native)
            .ok_or_else(|| LedgerError::Oracle {
                message: format!("quote for {} overflowed", native_amount),
            })
    }
}
