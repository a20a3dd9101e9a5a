use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};
use crate::interest::{amount_due, end_date};
use crate::types::{AccountId, BorrowStatus, LoanId, LoanStatus};

/// a lender's pool of deposited principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub loan_id: LoanId,
    pub lender: AccountId,
    pub amount_stable_coin: Amount,
    /// principal drawn by borrowers, never above `amount_stable_coin`
    pub amount_allocated: Amount,
    /// value returned to the lender through repayments and claims
    pub amount_claimed: Amount,
    /// lender entitlement fixed at creation
    pub interest: Amount,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl Loan {
    pub(crate) fn open(
        loan_id: LoanId,
        lender: AccountId,
        amount: Amount,
        interest: Amount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            loan_id,
            lender,
            amount_stable_coin: amount,
            amount_allocated: Amount::ZERO,
            amount_claimed: Amount::ZERO,
            interest,
            status: LoanStatus::Active,
            created_at,
        }
    }

    /// principal still drawable
    pub fn available(&self) -> Amount {
        self.amount_stable_coin.saturating_sub(self.amount_allocated)
    }

    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }

    pub(crate) fn allocate(&mut self, amount: Amount) -> Result<()> {
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount { amount });
        }
        let available = self.available();
        if amount > available {
            return Err(LedgerError::InsufficientPoolLiquidity {
                available,
                requested: amount,
            });
        }
        self.amount_allocated = self
            .amount_allocated
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("allocated amount"))?;
        Ok(())
    }

    pub(crate) fn record_claim(&mut self, amount: Amount) -> Result<()> {
        self.amount_claimed = self
            .amount_claimed
            .checked_add(amount)
            .ok_or_else(|| LedgerError::overflow("claimed amount"))?;
        Ok(())
    }
}

/// one borrower's draw against a loan pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Borrowing {
    pub borrower: AccountId,
    pub loan_id: LoanId,
    /// native units held in ledger custody
    pub collateral_amount: Amount,
    pub amount_stable_coin: Amount,
    /// borrower interest fixed at creation
    pub interest: Amount,
    pub term_months: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: BorrowStatus,
    pub last_status_change: DateTime<Utc>,
}

impl Borrowing {
    pub(crate) fn open(
        borrower: AccountId,
        loan_id: LoanId,
        collateral_amount: Amount,
        amount_stable_coin: Amount,
        interest: Amount,
        term_months: u32,
        start_date: DateTime<Utc>,
    ) -> Result<Self> {
        let status = BorrowStatus::None.transition(BorrowStatus::Active)?;
        Ok(Self {
            borrower,
            loan_id,
            collateral_amount,
            amount_stable_coin,
            interest,
            term_months,
            start_date,
            end_date: end_date(start_date, term_months)?,
            status,
            last_status_change: start_date,
        })
    }

    /// principal plus interest
    pub fn amount_due(&self) -> Result<Amount> {
        amount_due(self.amount_stable_coin, self.interest)
    }

    /// the term boundary is inclusive for the borrower
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }

    pub fn is_payable(&self, now: DateTime<Utc>) -> bool {
        self.status == BorrowStatus::Active && !self.is_expired(now)
    }

    /// status as of `now`: an active borrowing whose term has lapsed counts
    /// as defaulted even before anything records it
    pub fn effective_status(&self, now: DateTime<Utc>) -> BorrowStatus {
        if self.status == BorrowStatus::Active && self.is_expired(now) {
            BorrowStatus::Defaulted
        } else {
            self.status
        }
    }

    pub fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        self.effective_status(now) == BorrowStatus::Defaulted && self.is_expired(now)
    }

    /// record a lapsed term as a default
    pub(crate) fn mark_default_if_lapsed(&mut self, now: DateTime<Utc>) -> Result<()> {
        if self.effective_status(now) != self.status {
            self.transition(BorrowStatus::Defaulted, now)?;
        }
        Ok(())
    }

    /// move along the lifecycle, rejecting edges that are not in the table
    pub(crate) fn transition(&mut self, next: BorrowStatus, now: DateTime<Utc>) -> Result<()> {
        self.status = self.status.transition(next)?;
        self.last_status_change = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn borrowing() -> Borrowing {
        Borrowing::open(
            AccountId::new(),
            1,
            Amount::from_major(1, 18),
            Amount::from_units(600_000_000),
            Amount::from_units(60_000_000),
            11,
            start(),
        )
        .unwrap()
    }

    #[test]
    fn test_loan_allocation_never_exceeds_deposit() {
        let mut loan = Loan::open(1, AccountId::new(), Amount::from_units(1_000), Amount::from_units(50), start());

        loan.allocate(Amount::from_units(600)).unwrap();
        assert_eq!(loan.available(), Amount::from_units(400));

        let err = loan.allocate(Amount::from_units(401)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientPoolLiquidity { .. }));
        assert_eq!(loan.amount_allocated, Amount::from_units(600));

        loan.allocate(Amount::from_units(400)).unwrap();
        assert_eq!(loan.available(), Amount::ZERO);
    }

    #[test]
    fn test_negative_allocation_leaves_loan_untouched() {
        let mut loan = Loan::open(1, AccountId::new(), Amount::from_units(1_000), Amount::from_units(50), start());

        let err = loan.allocate(Amount::from_decimal(dec!(-500))).unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount { .. }));
        assert_eq!(loan.amount_allocated, Amount::ZERO);
        assert_eq!(loan.available(), Amount::from_units(1_000));
    }

    #[test]
    fn test_open_rejects_term_past_calendar_range() {
        let err = Borrowing::open(
            AccountId::new(),
            1,
            Amount::from_major(1, 18),
            Amount::from_units(600_000_000),
            Amount::from_units(60_000_000),
            u32::MAX,
            start(),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::CalculationError { .. }));
    }

    #[test]
    fn test_term_boundary() {
        let b = borrowing();
        assert_eq!(b.end_date, start() + Duration::days(330));

        assert!(b.is_payable(b.end_date));
        assert!(!b.is_payable(b.end_date + Duration::seconds(1)));
        assert!(!b.is_expired(b.end_date));
        assert!(b.is_expired(b.end_date + Duration::seconds(1)));
    }

    #[test]
    fn test_lapsed_active_borrowing_counts_as_defaulted() {
        let mut b = borrowing();
        let after = b.end_date + Duration::days(1);
        assert!(!b.is_claimable(b.end_date));
        assert_eq!(b.effective_status(after), BorrowStatus::Defaulted);
        assert!(b.is_claimable(after));

        b.mark_default_if_lapsed(b.end_date).unwrap();
        assert_eq!(b.status, BorrowStatus::Active);
        b.mark_default_if_lapsed(after).unwrap();
        assert_eq!(b.status, BorrowStatus::Defaulted);
        assert_eq!(b.last_status_change, after);
    }

    #[test]
    fn test_paid_borrowing_is_never_claimable() {
        let mut b = borrowing();
        b.transition(BorrowStatus::Paid, start()).unwrap();
        let after = b.end_date + Duration::days(1);

        assert_eq!(b.effective_status(after), BorrowStatus::Paid);
        assert!(!b.is_claimable(after));
        b.mark_default_if_lapsed(after).unwrap();
        assert_eq!(b.status, BorrowStatus::Paid);
    }

    #[test]
    fn test_rejects_transitions_outside_the_table() {
        let mut b = borrowing();
        let now = start();

        assert!(b.transition(BorrowStatus::Released, now).is_err());
        assert_eq!(b.status, BorrowStatus::Active);

        b.transition(BorrowStatus::Paid, now).unwrap();
        b.transition(BorrowStatus::Released, now).unwrap();
        assert!(b.transition(BorrowStatus::Paid, now).is_err());
        assert_eq!(b.status, BorrowStatus::Released);
    }

    #[test]
    fn test_amount_due() {
        assert_eq!(borrowing().amount_due().unwrap(), Amount::from_units(660_000_000));
    }
}
