use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Amount;
use crate::types::{AccountId, LoanId};

/// all events that can be emitted by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // loan pool events
    NewLoan {
        loan_id: LoanId,
        lender: AccountId,
        amount: Amount,
        interest: Amount,
        timestamp: DateTime<Utc>,
    },

    // borrowing lifecycle events
    NewBorrow {
        borrower: AccountId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        term_months: u32,
        timestamp: DateTime<Utc>,
    },
    BorrowPaid {
        borrower: AccountId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        timestamp: DateTime<Utc>,
    },
    BorrowRepayed {
        borrower: AccountId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        extra_amount: Amount,
        timestamp: DateTime<Utc>,
    },
    ReleaseCollateral {
        borrower: AccountId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        timestamp: DateTime<Utc>,
    },
    ClaimCollateral {
        lender: AccountId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        timestamp: DateTime<Utc>,
    },

    // custody events
    PaymentReceived {
        sender: AccountId,
        amount: Amount,
    },
    EmergencyWithdrawal {
        asset: String,
        to: AccountId,
        amount: Amount,
    },

    // access events
    Paused {
        account: AccountId,
    },
    Unpaused {
        account: AccountId,
    },
    OwnershipTransferred {
        previous_owner: Option<AccountId>,
        new_owner: Option<AccountId>,
    },
}

/// append-only event store
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
