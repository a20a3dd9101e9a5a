pub mod router;

use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};
use crate::types::AccountId;

pub use router::ConstantPriceRouter;

/// external amm router used as a price source
pub trait PriceRouter: Send {
    /// identity of the router itself
    fn address(&self) -> AccountId;

    /// canonical wrapped-native asset the router prices against
    fn wrapped_native(&self) -> AccountId;

    /// how many `stable_token` units `native_amount` swaps into right now
    fn quote_native_to_stable(&self, native_amount: Amount, stable_token: AccountId) -> Result<Amount>;
}

/// spot-price adapter in front of a [`PriceRouter`]
///
/// Every call goes to the router: no caching and no staleness window. A
/// manipulation-resistant feed can be substituted by implementing
/// [`PriceRouter`].
pub struct PriceOracle {
    router: Box<dyn PriceRouter>,
    stable_token: AccountId,
}

impl PriceOracle {
    pub fn new(router: Box<dyn PriceRouter>, stable_token: AccountId) -> Self {
        Self {
            router,
            stable_token,
        }
    }

    /// quote a native amount in stable units
    pub fn quote(&self, native_amount: Amount) -> Result<Amount> {
        self.router
            .quote_native_to_stable(native_amount, self.stable_token)
            .map_err(|e| match e {
                LedgerError::Oracle { .. } => e,
                other => LedgerError::Oracle {
                    message: other.to_string(),
                },
            })
    }

    pub fn router_address(&self) -> AccountId {
        self.router.address()
    }

    pub fn wrapped_native(&self) -> AccountId {
        self.router.wrapped_native()
    }
}

impl std::fmt::Debug for PriceOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceOracle")
            .field("router", &self.router.address())
            .field("stable_token", &self.stable_token)
            .finish()
    }
}
