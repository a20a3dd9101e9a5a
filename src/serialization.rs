/// serialization support for the ledger
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
use crate::ledger::LendingLedger;
use crate::state::{Borrowing, Loan};
use crate::types::{AccountId, BorrowStatus, LoanId, LoanStatus};

/// serializable snapshot of a ledger's state
#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerView {
    pub address: AccountId,
    pub owner: Option<AccountId>,
    pub paused: bool,
    pub collaborators: CollaboratorView,
    pub rates: RateView,
    pub custody: CustodyView,
    pub index_loans: LoanId,
    pub loans: Vec<LoanView>,
    pub borrowings: Vec<BorrowingView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollaboratorView {
    pub stablecoin: AccountId,
    pub router: AccountId,
    pub wrapped_native: AccountId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RateView {
    pub interest_per_month_borrowers: Rate,
    pub interest_per_month_lenders: Rate,
}

/// balances the ledger holds against its records
#[derive(Debug, Serialize, Deserialize)]
pub struct CustodyView {
    pub stable: Amount,
    pub native: Amount,
    pub stable_lent: Amount,
    pub stable_drawn: Amount,
    pub collateral_locked: Amount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub loan_id: LoanId,
    pub lender: AccountId,
    pub status: LoanStatus,
    pub amount_stable_coin: Amount,
    pub amount_allocated: Amount,
    pub available: Amount,
    pub amount_claimed: Amount,
    pub interest: Amount,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BorrowingView {
    pub borrower: AccountId,
    pub loan_id: LoanId,
    pub status: BorrowStatus,
    pub collateral_amount: Amount,
    pub amount_stable_coin: Amount,
    pub interest: Amount,
    /// principal plus interest, whatever the status
    pub amount_due: Option<Amount>,
    pub term_months: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub last_status_change: DateTime<Utc>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            loan_id: loan.loan_id,
            lender: loan.lender,
            status: loan.status,
            amount_stable_coin: loan.amount_stable_coin,
            amount_allocated: loan.amount_allocated,
            available: loan.available(),
            amount_claimed: loan.amount_claimed,
            interest: loan.interest,
            created_at: loan.created_at,
        }
    }
}

impl BorrowingView {
    pub fn from_borrowing(borrowing: &Borrowing) -> Self {
        BorrowingView {
            borrower: borrowing.borrower,
            loan_id: borrowing.loan_id,
            status: borrowing.status,
            collateral_amount: borrowing.collateral_amount,
            amount_stable_coin: borrowing.amount_stable_coin,
            interest: borrowing.interest,
            amount_due: borrowing.amount_due().ok(),
            term_months: borrowing.term_months,
            start_date: borrowing.start_date,
            end_date: borrowing.end_date,
            last_status_change: borrowing.last_status_change,
        }
    }
}

impl LedgerView {
    pub fn from_ledger(ledger: &LendingLedger) -> Self {
        let loans: Vec<LoanView> = ledger.loans().map(LoanView::from_loan).collect();

        let mut borrowings: Vec<BorrowingView> =
            ledger.borrowings().map(BorrowingView::from_borrowing).collect();
        borrowings.sort_by(|a, b| {
            a.start_date
                .cmp(&b.start_date)
                .then_with(|| a.borrower.as_uuid().cmp(&b.borrower.as_uuid()))
        });

        let stable_lent = loans
            .iter()
            .fold(Amount::ZERO, |acc, l| acc.saturating_add(l.amount_stable_coin));
        let stable_drawn = loans
            .iter()
            .fold(Amount::ZERO, |acc, l| acc.saturating_add(l.amount_allocated));
        let collateral_locked = borrowings
            .iter()
            .filter(|b| b.status.is_open())
            .fold(Amount::ZERO, |acc, b| acc.saturating_add(b.collateral_amount));

        LedgerView {
            address: ledger.address(),
            owner: ledger.owner(),
            paused: ledger.paused(),
            collaborators: CollaboratorView {
                stablecoin: ledger.stablecoin(),
                router: ledger.router(),
                wrapped_native: ledger.wrapped_native(),
            },
            rates: RateView {
                interest_per_month_borrowers: ledger.interest_per_month_borrowers(),
                interest_per_month_lenders: ledger.interest_per_month_lenders(),
            },
            custody: CustodyView {
                stable: ledger.custody_balance(),
                native: ledger.native_custody_balance(),
                stable_lent,
                stable_drawn,
                collateral_locked,
            },
            index_loans: ledger.index_loans(),
            loans,
            borrowings,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl LendingLedger {
    /// pretty json snapshot for debugging and monitoring
    pub fn json(&self) -> String {
        LedgerView::from_ledger(self)
            .to_json_pretty()
            .unwrap_or_else(|e| format!("JSON error: {}", e))
    }
}
