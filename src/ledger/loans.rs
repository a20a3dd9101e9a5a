use hourglass_rs::SafeTimeProvider;
use tracing::info;

use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};
use crate::events::Event;
use crate::interest::interest;
use crate::ledger::{rejected, LendingLedger};
use crate::state::Loan;
use crate::types::{AccountId, LoanId};

impl LendingLedger {
    /// Open a loan pool funded with `amount` of the caller's stable tokens.
    ///
    /// Returns the new loan id. The caller must have approved the ledger for
    /// at least `amount`, and may hold only one active pool at a time.
    pub fn create_loan(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<LoanId> {
        self.open_loan(caller, amount, time)
            .map_err(rejected("create_loan", caller))
    }

    fn open_loan(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<LoanId> {
        self.guard.when_not_paused()?;

        if let Some(loan) = self.loan_of(caller) {
            return Err(LedgerError::LoanAlreadyExists {
                loan_id: loan.loan_id,
            });
        }
        if !amount.is_positive() {
            return Err(LedgerError::ZeroLoanAmount);
        }

        let interest = interest(amount, self.config.lender_rate())?;
        let loan_id = self.next_loan_id;
        let next_loan_id = loan_id
            .checked_add(1)
            .ok_or_else(|| LedgerError::overflow("loan id"))?;
        let now = time.now();

        self.token
            .transfer_from(self.address, caller, self.address, amount)?;

        self.loans
            .insert(loan_id, Loan::open(loan_id, caller, amount, interest, now));
        self.lenders.insert(caller, loan_id);
        self.next_loan_id = next_loan_id;

        self.events.emit(Event::NewLoan {
            loan_id,
            lender: caller,
            amount,
            interest,
            timestamp: now,
        });
        info!(loan_id, lender = %caller, %amount, %interest, "loan opened");

        Ok(loan_id)
    }

    /// identifier the next loan will receive
    pub fn index_loans(&self) -> LoanId {
        self.next_loan_id
    }

    pub fn loan(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&loan_id)
    }

    /// all loans in creation order
    pub fn loans(&self) -> impl Iterator<Item = &Loan> {
        self.loans.values()
    }

    /// the lender's active pool, if any
    pub fn loan_of(&self, lender: AccountId) -> Option<&Loan> {
        self.lenders
            .get(&lender)
            .and_then(|loan_id| self.loans.get(loan_id))
            .filter(|loan| loan.is_active())
    }

    pub fn is_lender(&self, who: AccountId) -> bool {
        self.loan_of(who).is_some()
    }

    /// principal still drawable from `loan_id`; zero for unknown loans
    pub fn available(&self, loan_id: LoanId) -> Amount {
        self.loans
            .get(&loan_id)
            .map(Loan::available)
            .unwrap_or(Amount::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::fixtures::{usdc, Harness};
    use crate::transfer::StableToken;
    use crate::types::LoanStatus;

    #[test]
    fn test_create_loan_records_pool_and_pulls_funds() {
        let mut h = Harness::new();
        let lender = h.funded_account(usdc(500_000_000));

        let loan_id = h.ledger.create_loan(lender, usdc(500_000_000), &h.time).unwrap();

        assert_eq!(loan_id, 1);
        assert_eq!(h.ledger.index_loans(), 2);
        let loan = h.ledger.loan(loan_id).unwrap();
        assert_eq!(loan.lender, lender);
        assert_eq!(loan.amount_stable_coin, usdc(500_000_000));
        assert_eq!(loan.amount_allocated, Amount::ZERO);
        assert_eq!(loan.interest, usdc(25_000_000));
        assert_eq!(loan.status, LoanStatus::Active);
        assert!(h.ledger.is_lender(lender));

        assert_eq!(h.token.balance_of(lender), Amount::ZERO);
        assert_eq!(h.ledger.custody_balance(), usdc(500_000_000));
        assert!(matches!(h.ledger.events.last(), Some(Event::NewLoan { loan_id: 1, .. })));
    }

    #[test]
    fn test_loan_ids_are_sequential() {
        let mut h = Harness::new();
        let (_, first) = h.lender_with_pool(usdc(100));
        let (_, second) = h.lender_with_pool(usdc(200));

        assert_eq!((first, second), (1, 2));
        assert_eq!(h.ledger.index_loans(), 3);
        let ids: Vec<_> = h.ledger.loans().map(|l| l.loan_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_one_active_loan_per_lender() {
        let mut h = Harness::new();
        let (lender, loan_id) = h.lender_with_pool(usdc(100));
        h.token.mint(lender, usdc(100));

        let err = h.ledger.create_loan(lender, usdc(100), &h.time).unwrap_err();
        assert_eq!(err, LedgerError::LoanAlreadyExists { loan_id });
        assert_eq!(h.ledger.index_loans(), 2);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut h = Harness::new();
        let lender = h.funded_account(usdc(100));

        let err = h.ledger.create_loan(lender, Amount::ZERO, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::ZeroLoanAmount);
        assert_eq!(err.to_string(), "Amount of Stablecoin must be greater than 0");
    }

    #[test]
    fn test_token_failure_leaves_no_record() {
        let mut h = Harness::new();
        let lender = AccountId::new();
        h.token.mint(lender, usdc(100));

        // no allowance
        let err = h.ledger.create_loan(lender, usdc(100), &h.time).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { .. }));
        assert_eq!(h.ledger.index_loans(), 1);
        assert!(!h.ledger.is_lender(lender));
        assert!(h.ledger.events.is_empty());

        h.token.approve(lender, h.ledger.address(), usdc(500));
        let err = h.ledger.create_loan(lender, usdc(500), &h.time).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(h.token.balance_of(lender), usdc(100));
    }

    #[test]
    fn test_available_for_unknown_loan_is_zero() {
        let h = Harness::new();
        assert_eq!(h.ledger.available(42), Amount::ZERO);
        assert!(h.ledger.loan(42).is_none());
    }
}
