use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{LedgerError, Result};

/// identity of any party: lender, borrower, owner, token or router
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountId(Uuid);

impl AccountId {
    /// the null identity
    pub const NULL: AccountId = AccountId(Uuid::nil());

    pub fn new() -> Self {
        AccountId(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        AccountId(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AccountId {
    fn default() -> Self {
        AccountId::NULL
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// loan pool identifier; 0 means "no loan"
pub type LoanId = u64;

/// first identifier handed out to a loan pool
pub const FIRST_LOAN_ID: LoanId = 1;

/// loan pool status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LoanStatus {
    #[default]
    Inactive,
    Active,
}

/// borrowing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorrowStatus {
    /// no borrowing recorded
    #[default]
    None,
    /// principal drawn, term running
    Active,
    /// fully paid, collateral releasable after the term ends
    Paid,
    /// collateral returned to the borrower
    Released,
    /// paid late or not at all
    Defaulted,
    /// collateral taken by the lender
    Claimed,
}

impl BorrowStatus {
    /// whether `self -> next` is an edge of the lifecycle
    pub fn can_transition_to(self, next: BorrowStatus) -> bool {
        use BorrowStatus::*;
        matches!(
            (self, next),
            (None, Active)
                | (Active, Paid)
                | (Active, Defaulted)
                | (Paid, Released)
                | (Defaulted, Paid)
                | (Defaulted, Claimed)
        )
    }

    /// checked transition
    pub fn transition(self, next: BorrowStatus) -> Result<BorrowStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(LedgerError::InvalidState {
                current: format!("{:?}", self),
                expected: format!("a status that can move to {:?}", next),
            })
        }
    }

    /// released or claimed; nothing further can happen
    pub fn is_terminal(self) -> bool {
        matches!(self, BorrowStatus::Released | BorrowStatus::Claimed)
    }

    /// a borrowing that still ties up collateral
    pub fn is_open(self) -> bool {
        matches!(
            self,
            BorrowStatus::Active | BorrowStatus::Paid | BorrowStatus::Defaulted
        )
    }
}
