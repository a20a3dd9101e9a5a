//! the lending ledger: loan pools, borrowings, custody and the owner guard
//!
//! Every mutating operation runs in the same order: pause guard, identity
//! checks, validation (oracle and term/interest calculator), fund movement
//! through the transfer interfaces, then record mutation and an event. Records
//! are updated on a copy and written back only once every transfer has gone
//! through, so a failed call leaves the ledger exactly as it found it.

pub mod admin;
pub mod borrowings;
pub mod builder;
pub mod loans;

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::config::LedgerConfig;
use crate::decimal::{Amount, Rate};
use crate::errors::LedgerError;
use crate::events::{Event, EventStore};
use crate::guard::Guard;
use crate::oracle::PriceOracle;
use crate::state::{Borrowing, Loan};
use crate::transfer::{HostChain, StableToken};
use crate::types::{AccountId, LoanId};

pub use builder::LedgerBuilder;

/// collateralized peer-pool lending ledger
pub struct LendingLedger {
    address: AccountId,
    config: LedgerConfig,
    guard: Guard,
    token: Box<dyn StableToken>,
    chain: Box<dyn HostChain>,
    oracle: PriceOracle,
    loans: BTreeMap<LoanId, Loan>,
    lenders: HashMap<AccountId, LoanId>,
    borrowings: HashMap<AccountId, Borrowing>,
    next_loan_id: LoanId,
    pub events: EventStore,
}

impl LendingLedger {
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::new()
    }

    /// identity the ledger holds custody under
    pub fn address(&self) -> AccountId {
        self.address
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn owner(&self) -> Option<AccountId> {
        self.guard.owner()
    }

    pub fn paused(&self) -> bool {
        self.guard.is_paused()
    }

    /// stable token identity
    pub fn stablecoin(&self) -> AccountId {
        self.token.address()
    }

    /// price router identity
    pub fn router(&self) -> AccountId {
        self.oracle.router_address()
    }

    /// wrapped-native asset the router prices against
    pub fn wrapped_native(&self) -> AccountId {
        self.oracle.wrapped_native()
    }

    pub fn interest_per_month_borrowers(&self) -> Rate {
        self.config.borrower_rate
    }

    pub fn interest_per_month_lenders(&self) -> Rate {
        self.config.lender_rate()
    }

    /// stable token held in custody
    pub fn custody_balance(&self) -> Amount {
        self.token.balance_of(self.address)
    }

    /// native currency held in custody
    pub fn native_custody_balance(&self) -> Amount {
        self.chain.balance_of(self.address)
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }
}

impl std::fmt::Debug for LendingLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LendingLedger")
            .field("address", &self.address)
            .field("guard", &self.guard)
            .field("stablecoin", &self.token.address())
            .field("oracle", &self.oracle)
            .field("loans", &self.loans.len())
            .field("borrowings", &self.borrowings.len())
            .finish()
    }
}

/// log a rejected call and hand the error back unchanged
pub(crate) fn rejected(
    operation: &'static str,
    caller: AccountId,
) -> impl FnOnce(LedgerError) -> LedgerError {
    move |error| {
        debug!(operation, %caller, %error, "operation rejected");
        error
    }
}
