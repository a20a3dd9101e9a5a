use hourglass_rs::SafeTimeProvider;
use tracing::{error, info};

use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};
use crate::events::Event;
use crate::interest::{interest, term_months};
use crate::ledger::{rejected, LendingLedger};
use crate::state::{Borrowing, Loan};
use crate::types::{AccountId, BorrowStatus, LoanId};

impl LendingLedger {
    /// Draw `amount_stable_coin` from `loan_id` against `collateral_amount` of
    /// native currency.
    ///
    /// The draw may not exceed half the collateral's current quote, nor the
    /// pool's undrawn principal, nor the stable tokens the ledger holds. The
    /// term length comes from the quote through the configured term curve.
    pub fn create_borrow(
        &mut self,
        caller: AccountId,
        amount_stable_coin: Amount,
        loan_id: LoanId,
        collateral_amount: Amount,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        self.open_borrow(caller, amount_stable_coin, loan_id, collateral_amount, time)
            .map_err(rejected("create_borrow", caller))
    }

    fn open_borrow(
        &mut self,
        caller: AccountId,
        amount: Amount,
        loan_id: LoanId,
        collateral: Amount,
        time: &SafeTimeProvider,
    ) -> Result<()> {
        self.guard.when_not_paused()?;

        if self.is_borrower(caller) {
            return Err(LedgerError::BorrowAlreadyExists { borrower: caller });
        }
        if !collateral.is_positive() {
            return Err(LedgerError::ZeroCollateral);
        }
        if amount.is_negative() {
            return Err(LedgerError::NegativeAmount { amount });
        }

        let mut loan = self
            .loans
            .get(&loan_id)
            .cloned()
            .ok_or(LedgerError::LoanNotFound { loan_id })?;
        loan.allocate(amount)?;

        let value = self.oracle.quote(collateral)?;
        let ceiling = value.half();
        if amount > ceiling {
            return Err(LedgerError::LtvCeilingExceeded {
                ceiling,
                requested: amount,
            });
        }

        let custody = self.token.balance_of(self.address);
        if custody < amount {
            return Err(LedgerError::InsufficientCustody {
                available: custody,
                required: amount,
            });
        }

        let interest = interest(amount, self.config.borrower_rate)?;
        let months = term_months(value, &self.config.term_curve);
        let now = time.now();
        let borrowing = Borrowing::open(caller, loan_id, collateral, amount, interest, months, now)?;
        borrowing.amount_due()?;

        self.chain.send(caller, self.address, collateral)?;
        if let Err(e) = self.token.transfer(self.address, caller, amount) {
            if let Err(refund) = self.chain.send(self.address, caller, collateral) {
                error!(borrower = %caller, %collateral, error = %refund, "collateral refund failed");
            }
            return Err(e);
        }

        self.loans.insert(loan_id, loan);
        self.borrowings.insert(caller, borrowing);

        self.events.emit(Event::NewBorrow {
            borrower: caller,
            collateral_amount: collateral,
            amount_stable_coin: amount,
            interest,
            term_months: months,
            timestamp: now,
        });
        info!(
            borrower = %caller,
            loan_id,
            %collateral,
            %amount,
            %interest,
            term_months = months,
            "borrow opened"
        );

        Ok(())
    }

    /// Settle an active borrowing with at least principal plus interest.
    ///
    /// Paying within the term moves the borrowing to `Paid`. Paying after it
    /// still collects the funds but moves it to `Defaulted`, where only
    /// [`repay_loan`](Self::repay_loan) can recover the collateral.
    pub fn pay_borrow(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<()> {
        self.settle_borrow(caller, amount, time)
            .map_err(rejected("pay_borrow", caller))
    }

    fn settle_borrow(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<()> {
        self.guard.when_not_paused()?;

        if !amount.is_positive() {
            return Err(LedgerError::ZeroAmount);
        }
        let balance = self.token.balance_of(caller);
        if balance < amount {
            return Err(LedgerError::InsufficientStablecoin {
                balance,
                requested: amount,
            });
        }
        let due = self.get_amount_to_paid(caller);
        if amount < due {
            return Err(LedgerError::PaymentBelowAmountDue {
                due,
                provided: amount,
            });
        }

        let mut borrowing = self.borrowing_in(caller, BorrowStatus::Active)?;
        let mut loan = self.loan_for(&borrowing)?;

        let now = time.now();
        let next = if borrowing.is_expired(now) {
            BorrowStatus::Defaulted
        } else {
            BorrowStatus::Paid
        };
        borrowing.transition(next, now)?;
        loan.record_claim(amount)?;

        self.token
            .transfer_from(self.address, caller, self.address, amount)?;

        self.events.emit(Event::BorrowPaid {
            borrower: caller,
            collateral_amount: borrowing.collateral_amount,
            amount_stable_coin: borrowing.amount_stable_coin,
            interest: borrowing.interest,
            timestamp: now,
        });
        info!(borrower = %caller, %amount, status = ?next, "borrow paid");

        self.loans.insert(loan.loan_id, loan);
        self.borrowings.insert(caller, borrowing);
        Ok(())
    }

    /// Bring a defaulted borrowing back to `Paid` with a make-whole payment.
    ///
    /// An active borrowing whose term has lapsed is treated as defaulted.
    /// Anything above principal plus interest is reported as `extra_amount`
    /// on the emitted event. The collateral is then released as usual.
    pub fn repay_loan(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<()> {
        self.make_whole(caller, amount, time)
            .map_err(rejected("repay_loan", caller))
    }

    fn make_whole(&mut self, caller: AccountId, amount: Amount, time: &SafeTimeProvider) -> Result<()> {
        self.guard.when_not_paused()?;

        let now = time.now();
        let mut borrowing = self
            .borrowings
            .get(&caller)
            .cloned()
            .ok_or(LedgerError::BorrowNotDefaulted)?;
        borrowing.mark_default_if_lapsed(now)?;
        if borrowing.status != BorrowStatus::Defaulted {
            return Err(LedgerError::BorrowNotDefaulted);
        }

        if !amount.is_positive() {
            return Err(LedgerError::ZeroAmount);
        }
        let balance = self.token.balance_of(caller);
        if balance < amount {
            return Err(LedgerError::InsufficientStablecoin {
                balance,
                requested: amount,
            });
        }
        let required = borrowing.amount_due()?;
        let extra_amount = amount
            .checked_sub(required)
            .ok_or(LedgerError::RepaymentBelowMakeWhole {
                required,
                provided: amount,
            })?;

        let mut loan = self.loan_for(&borrowing)?;
        borrowing.transition(BorrowStatus::Paid, now)?;
        loan.record_claim(amount)?;

        self.token
            .transfer_from(self.address, caller, self.address, amount)?;

        self.events.emit(Event::BorrowRepayed {
            borrower: caller,
            collateral_amount: borrowing.collateral_amount,
            amount_stable_coin: borrowing.amount_stable_coin,
            interest: borrowing.interest,
            extra_amount,
            timestamp: now,
        });
        info!(borrower = %caller, %amount, %extra_amount, "defaulted borrow repaid");

        self.loans.insert(loan.loan_id, loan);
        self.borrowings.insert(caller, borrowing);
        Ok(())
    }

    /// Return a paid borrowing's collateral once its term has run out.
    pub fn release_collateral(&mut self, caller: AccountId, time: &SafeTimeProvider) -> Result<()> {
        self.release(caller, time)
            .map_err(rejected("release_collateral", caller))
    }

    fn release(&mut self, caller: AccountId, time: &SafeTimeProvider) -> Result<()> {
        self.guard.when_not_paused()?;

        let mut borrowing = self
            .borrowing_in(caller, BorrowStatus::Paid)
            .map_err(|_| LedgerError::BorrowNotPaid)?;

        let now = time.now();
        if !borrowing.is_expired(now) {
            return Err(LedgerError::BorrowNotExpiredYet);
        }
        borrowing.transition(BorrowStatus::Released, now)?;

        self.chain
            .send(self.address, caller, borrowing.collateral_amount)?;

        self.events.emit(Event::ReleaseCollateral {
            borrower: caller,
            collateral_amount: borrowing.collateral_amount,
            amount_stable_coin: borrowing.amount_stable_coin,
            interest: borrowing.interest,
            timestamp: now,
        });
        info!(borrower = %caller, collateral = %borrowing.collateral_amount, "collateral released");

        self.borrowings.insert(caller, borrowing);
        Ok(())
    }

    /// Seize a defaulted borrower's collateral, including one that was never
    /// paid and has run past its term. Only the lender of the pool the
    /// borrowing drew from may claim it.
    pub fn claim_collateral(&mut self, caller: AccountId, borrower: AccountId, time: &SafeTimeProvider) -> Result<()> {
        self.claim(caller, borrower, time)
            .map_err(rejected("claim_collateral", caller))
    }

    fn claim(&mut self, caller: AccountId, borrower: AccountId, time: &SafeTimeProvider) -> Result<()> {
        self.guard.when_not_paused()?;

        let mut borrowing = self
            .borrowings
            .get(&borrower)
            .cloned()
            .ok_or(LedgerError::NotLender { caller })?;
        let mut loan = self.loan_for(&borrowing)?;
        if loan.lender != caller {
            return Err(LedgerError::NotLender { caller });
        }

        let now = time.now();
        if !borrowing.is_claimable(now) {
            return Err(LedgerError::CollateralNotClaimable);
        }
        borrowing.mark_default_if_lapsed(now)?;
        borrowing.transition(BorrowStatus::Claimed, now)?;
        loan.record_claim(borrowing.amount_due()?)?;

        self.chain
            .send(self.address, caller, borrowing.collateral_amount)?;

        self.events.emit(Event::ClaimCollateral {
            lender: caller,
            collateral_amount: borrowing.collateral_amount,
            amount_stable_coin: borrowing.amount_stable_coin,
            interest: borrowing.interest,
            timestamp: now,
        });
        info!(
            lender = %caller,
            borrower = %borrower,
            collateral = %borrowing.collateral_amount,
            "collateral claimed"
        );

        self.loans.insert(loan.loan_id, loan);
        self.borrowings.insert(borrower, borrowing);
        Ok(())
    }

    /// whether `borrower` holds an active borrowing still inside its term
    pub fn borrow_is_payable(&self, borrower: AccountId, time: &SafeTimeProvider) -> bool {
        let now = time.now();
        self.borrowings
            .get(&borrower)
            .map(|b| b.is_payable(now))
            .unwrap_or(false)
    }

    /// principal plus interest still owed; zero unless the borrowing is
    /// active or defaulted
    pub fn get_amount_to_paid(&self, borrower: AccountId) -> Amount {
        self.borrowings
            .get(&borrower)
            .filter(|b| matches!(b.status, BorrowStatus::Active | BorrowStatus::Defaulted))
            // checked when the borrowing was opened
            .map(|b| b.amount_due().unwrap_or(Amount::MAX))
            .unwrap_or(Amount::ZERO)
    }

    /// whether the borrower's collateral can be claimed by its lender
    pub fn collateral_is_claimable(&self, borrower: AccountId, time: &SafeTimeProvider) -> bool {
        let now = time.now();
        self.borrowings
            .get(&borrower)
            .map(|b| b.is_claimable(now))
            .unwrap_or(false)
    }

    pub fn borrowing(&self, borrower: AccountId) -> Option<&Borrowing> {
        self.borrowings.get(&borrower)
    }

    pub fn borrowings(&self) -> impl Iterator<Item = &Borrowing> {
        self.borrowings.values()
    }

    /// whether `who` holds a borrowing that is not yet released or claimed
    pub fn is_borrower(&self, who: AccountId) -> bool {
        self.borrowings
            .get(&who)
            .map(|b| b.status.is_open())
            .unwrap_or(false)
    }

    /// current quote for `native_amount` in stable units
    pub fn get_stablecoin_per_native(&self, native_amount: Amount) -> Result<Amount> {
        self.oracle.quote(native_amount)
    }

    /// term in months a draw against `native_amount` would receive right now
    pub fn get_amount_month(&self, native_amount: Amount) -> Result<u32> {
        let value = self.oracle.quote(native_amount)?;
        Ok(term_months(value, &self.config.term_curve))
    }

    /// copy of the borrower's record, provided it is in `expected`
    fn borrowing_in(&self, borrower: AccountId, expected: BorrowStatus) -> Result<Borrowing> {
        let borrowing = self.borrowings.get(&borrower);
        match borrowing {
            Some(b) if b.status == expected => Ok(b.clone()),
            _ => Err(LedgerError::InvalidState {
                current: format!("{:?}", borrowing.map(|b| b.status).unwrap_or_default()),
                expected: format!("{:?}", expected),
            }),
        }
    }

    fn loan_for(&self, borrowing: &Borrowing) -> Result<Loan> {
        self.loans
            .get(&borrowing.loan_id)
            .cloned()
            .ok_or(LedgerError::LoanNotFound {
                loan_id: borrowing.loan_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use rust_decimal_macros::dec;

    use super::*;
    use crate::config::{LedgerConfig, TermCurve, MAX_TERM_MONTHS};
    use crate::ledger::fixtures::{ether, usdc, Harness};
    use crate::oracle::{ConstantPriceRouter, PriceRouter};
    use crate::transfer::{HostChain, InMemoryChain, InMemoryToken, StableToken};

    /// 500M pool at loan 1, 10B pool at loan 2, borrower drawn 600M from loan 2
    fn drawn() -> (Harness, AccountId, AccountId) {
        let mut h = Harness::new();
        h.lender_with_pool(usdc(500_000_000));
        let (lender, loan_id) = h.lender_with_pool(usdc(10_000_000_000));
        let borrower = h.borrower_with_draw(loan_id, usdc(600_000_000));
        (h, lender, borrower)
    }

    fn advance_days(h: &Harness, days: i64) {
        h.time.test_control().unwrap().advance(Duration::days(days));
    }

    #[test]
    fn test_create_borrow_moves_collateral_and_principal() {
        let (h, _, borrower) = drawn();

        let b = h.ledger.borrowing(borrower).unwrap();
        assert_eq!(b.status, BorrowStatus::Active);
        assert_eq!(b.loan_id, 2);
        assert_eq!(b.collateral_amount, ether(1));
        assert_eq!(b.amount_stable_coin, usdc(600_000_000));
        assert_eq!(b.interest, usdc(60_000_000));
        // 3 + 1200 / 150
        assert_eq!(b.term_months, 11);
        assert_eq!(b.end_date - b.start_date, Duration::days(330));

        assert_eq!(h.token.balance_of(borrower), usdc(600_000_000));
        assert_eq!(h.chain.balance_of(borrower), Amount::ZERO);
        assert_eq!(h.ledger.native_custody_balance(), ether(1));
        assert_eq!(h.ledger.loan(2).unwrap().amount_allocated, usdc(600_000_000));
        assert_eq!(h.ledger.available(2), usdc(9_400_000_000));
        assert!(h.ledger.is_borrower(borrower));
        assert_eq!(h.ledger.get_amount_to_paid(borrower), usdc(660_000_000));
    }

    #[test]
    fn test_create_borrow_rejects_draw_above_pool() {
        let mut h = Harness::new();
        let (_, small) = h.lender_with_pool(usdc(500_000_000));
        h.lender_with_pool(usdc(10_000_000_000));
        let borrower = h.native_account(ether(1));

        let err = h
            .ledger
            .create_borrow(borrower, usdc(600_000_000), small, ether(1), &h.time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientPoolLiquidity { .. }));
        assert_eq!(h.chain.balance_of(borrower), ether(1));
        assert!(h.ledger.borrowing(borrower).is_none());
    }

    #[test]
    fn test_create_borrow_enforces_half_ltv() {
        let mut h = Harness::new();
        let (_, loan_id) = h.lender_with_pool(usdc(10_000_000_000));
        let borrower = h.native_account(ether(1));

        let err = h
            .ledger
            .create_borrow(borrower, usdc(600_000_001), loan_id, ether(1), &h.time)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::LtvCeilingExceeded {
                ceiling: usdc(600_000_000),
                requested: usdc(600_000_001),
            }
        );

        h.ledger
            .create_borrow(borrower, usdc(600_000_000), loan_id, ether(1), &h.time)
            .unwrap();
    }

    #[test]
    fn test_create_borrow_validation_order() {
        let mut h = Harness::new();
        let borrower = h.native_account(ether(1));

        let err = h
            .ledger
            .create_borrow(borrower, usdc(1), 1, Amount::ZERO, &h.time)
            .unwrap_err();
        assert_eq!(err, LedgerError::ZeroCollateral);

        let err = h
            .ledger
            .create_borrow(borrower, usdc(1), 7, ether(1), &h.time)
            .unwrap_err();
        assert_eq!(err, LedgerError::LoanNotFound { loan_id: 7 });
        assert_eq!(err.to_string(), "Loan doesn't exist");
    }

    #[test]
    fn test_create_borrow_rejects_negative_draw() {
        let mut h = Harness::new();
        let (_, loan_id) = h.lender_with_pool(usdc(1_000));
        let borrower = h.native_account(ether(1));

        let err = h
            .ledger
            .create_borrow(borrower, Amount::from_decimal(dec!(-500)), loan_id, ether(1), &h.time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NegativeAmount { .. }));

        let loan = h.ledger.loan(loan_id).unwrap();
        assert_eq!(loan.amount_allocated, Amount::ZERO);
        assert_eq!(h.ledger.available(loan_id), usdc(1_000));
        assert_eq!(h.token.balance_of(borrower), Amount::ZERO);
        assert_eq!(h.ledger.custody_balance(), usdc(1_000));
        assert_eq!(h.chain.balance_of(borrower), ether(1));
        assert!(!h.ledger.is_borrower(borrower));
    }

    #[test]
    fn test_longest_allowed_term_opens_cleanly() {
        let token = InMemoryToken::new();
        let chain = InMemoryChain::new();
        let router = ConstantPriceRouter::new(usdc(1_200_000_000), 18);
        chain.deploy_contract(token.address());
        chain.deploy_contract(router.address());

        let mut config = LedgerConfig::standard();
        config.term_curve = TermCurve {
            min_months: MAX_TERM_MONTHS,
            max_months: MAX_TERM_MONTHS,
            stable_per_month: Amount::ONE,
        };
        let mut ledger = LendingLedger::builder()
            .owner(AccountId::new())
            .config(config)
            .stable_token(token.clone())
            .price_router(router)
            .host_chain(chain.clone())
            .build()
            .unwrap();
        let time = Harness::new().time;

        let lender = AccountId::new();
        token.mint(lender, usdc(1_000_000_000));
        token.approve(lender, ledger.address(), Amount::MAX);
        let loan_id = ledger.create_loan(lender, usdc(1_000_000_000), &time).unwrap();

        let borrower = AccountId::new();
        chain.fund(borrower, ether(1));
        ledger
            .create_borrow(borrower, usdc(600_000_000), loan_id, ether(1), &time)
            .unwrap();
        let b = ledger.borrowing(borrower).unwrap();
        assert_eq!(b.term_months, MAX_TERM_MONTHS);
        assert_eq!(b.end_date - b.start_date, Duration::days(36_000));
    }

    #[test]
    fn test_one_open_borrowing_per_borrower() {
        let (mut h, _, borrower) = drawn();
        h.chain.fund(borrower, ether(1));

        let err = h
            .ledger
            .create_borrow(borrower, usdc(1), 2, ether(1), &h.time)
            .unwrap_err();
        assert_eq!(err, LedgerError::BorrowAlreadyExists { borrower });
    }

    #[test]
    fn test_custody_shortfall_rejected() {
        let mut h = Harness::new();
        let (_, loan_id) = h.lender_with_pool(usdc(10_000_000_000));
        let borrower = h.native_account(ether(1));

        let ledger = h.ledger.address();
        let mut token = h.token.clone();
        token
            .transfer(ledger, AccountId::new(), usdc(9_500_000_000))
            .unwrap();

        let err = h
            .ledger
            .create_borrow(borrower, usdc(600_000_000), loan_id, ether(1), &h.time)
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientCustody {
                available: usdc(500_000_000),
                required: usdc(600_000_000),
            }
        );
        assert_eq!(h.chain.balance_of(borrower), ether(1));
    }

    /// token that accepts deposits but refuses to pay out
    struct RefusingToken(InMemoryToken);

    impl StableToken for RefusingToken {
        fn address(&self) -> AccountId {
            self.0.address()
        }

        fn balance_of(&self, who: AccountId) -> Amount {
            self.0.balance_of(who)
        }

        fn allowance(&self, owner: AccountId, spender: AccountId) -> Amount {
            self.0.allowance(owner, spender)
        }

        fn transfer_from(&mut self, spender: AccountId, from: AccountId, to: AccountId, amount: Amount) -> Result<()> {
            self.0.transfer_from(spender, from, to, amount)
        }

        fn transfer(&mut self, _from: AccountId, _to: AccountId, amount: Amount) -> Result<()> {
            Err(LedgerError::InsufficientBalance {
                balance: Amount::ZERO,
                requested: amount,
            })
        }
    }

    #[test]
    fn test_collateral_refunded_when_principal_push_fails() {
        let token = InMemoryToken::new();
        let chain = InMemoryChain::new();
        let router = ConstantPriceRouter::new(usdc(1_200_000_000), 18);
        chain.deploy_contract(token.address());
        chain.deploy_contract(router.address());
        let mut ledger = LendingLedger::builder()
            .owner(AccountId::new())
            .stable_token(RefusingToken(token.clone()))
            .price_router(router)
            .host_chain(chain.clone())
            .build()
            .unwrap();
        let time = Harness::new().time;

        let lender = AccountId::new();
        token.mint(lender, usdc(1_000_000_000));
        token.approve(lender, ledger.address(), Amount::MAX);
        let loan_id = ledger.create_loan(lender, usdc(1_000_000_000), &time).unwrap();

        let borrower = AccountId::new();
        chain.fund(borrower, ether(1));
        let err = ledger
            .create_borrow(borrower, usdc(600_000_000), loan_id, ether(1), &time)
            .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(chain.balance_of(borrower), ether(1));
        assert_eq!(ledger.native_custody_balance(), Amount::ZERO);
        assert_eq!(ledger.available(loan_id), usdc(1_000_000_000));
        assert!(ledger.borrowing(borrower).is_none());
    }

    #[test]
    fn test_create_borrow_without_native_funds_changes_nothing() {
        let mut h = Harness::new();
        let (_, loan_id) = h.lender_with_pool(usdc(10_000_000_000));
        let borrower = AccountId::new();

        let err = h
            .ledger
            .create_borrow(borrower, usdc(600_000_000), loan_id, ether(1), &h.time)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientNativeBalance { .. }));
        assert_eq!(h.ledger.available(loan_id), usdc(10_000_000_000));
        assert_eq!(h.ledger.custody_balance(), usdc(10_000_000_000));
        assert!(!h.ledger.is_borrower(borrower));
    }

    #[test]
    fn test_pay_within_term_then_release_after_it() {
        let (mut h, _, borrower) = drawn();
        h.token.mint(borrower, usdc(60_000_000));

        advance_days(&h, 300);
        assert!(h.ledger.borrow_is_payable(borrower, &h.time));
        h.ledger.pay_borrow(borrower, usdc(660_000_000), &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Paid);
        assert_eq!(h.token.balance_of(borrower), Amount::ZERO);
        assert_eq!(h.ledger.loan(2).unwrap().amount_claimed, usdc(660_000_000));

        let err = h.ledger.release_collateral(borrower, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::BorrowNotExpiredYet);

        advance_days(&h, 31);
        h.ledger.release_collateral(borrower, &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Released);
        assert_eq!(h.chain.balance_of(borrower), ether(1));
        assert!(!h.ledger.is_borrower(borrower));
    }

    #[test]
    fn test_pay_borrow_rejections() {
        let (mut h, _, borrower) = drawn();

        let err = h.ledger.pay_borrow(borrower, Amount::ZERO, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::ZeroAmount);

        let err = h.ledger.pay_borrow(borrower, usdc(700_000_000), &h.time).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStablecoin { .. }));

        let err = h.ledger.pay_borrow(borrower, usdc(600_000_000), &h.time).unwrap_err();
        assert_eq!(
            err,
            LedgerError::PaymentBelowAmountDue {
                due: usdc(660_000_000),
                provided: usdc(600_000_000),
            }
        );
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Active);

        let stranger = h.funded_account(usdc(10));
        let err = h.ledger.pay_borrow(stranger, usdc(10), &h.time).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidState { .. }));
    }

    #[test]
    fn test_late_payment_defaults_then_repay_recovers() {
        let (mut h, _, borrower) = drawn();
        h.token.mint(borrower, usdc(800_000_000));

        let err = h.ledger.repay_loan(borrower, usdc(660_000_000), &h.time).unwrap_err();
        assert_eq!(err, LedgerError::BorrowNotDefaulted);

        advance_days(&h, 331);
        assert!(!h.ledger.borrow_is_payable(borrower, &h.time));

        h.ledger.pay_borrow(borrower, usdc(660_000_000), &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Defaulted);
        assert!(h.ledger.collateral_is_claimable(borrower, &h.time));

        let err = h.ledger.repay_loan(borrower, Amount::ZERO, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::ZeroAmount);

        let err = h.ledger.repay_loan(borrower, usdc(659_999_999), &h.time).unwrap_err();
        assert!(matches!(err, LedgerError::RepaymentBelowMakeWhole { .. }));

        h.ledger.repay_loan(borrower, usdc(700_000_000), &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Paid);
        assert!(matches!(
            h.ledger.events.last(),
            Some(Event::BorrowRepayed { extra_amount, .. }) if *extra_amount == usdc(40_000_000)
        ));

        h.ledger.release_collateral(borrower, &h.time).unwrap();
        assert_eq!(h.chain.balance_of(borrower), ether(1));
    }

    #[test]
    fn test_lender_claims_defaulted_collateral() {
        let (mut h, lender, borrower) = drawn();
        h.token.mint(borrower, usdc(60_000_000));
        let other_lender = h.ledger.loan(1).unwrap().lender;

        let err = h.ledger.claim_collateral(lender, borrower, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::CollateralNotClaimable);

        advance_days(&h, 331);
        h.ledger.pay_borrow(borrower, usdc(660_000_000), &h.time).unwrap();

        let err = h.ledger.claim_collateral(other_lender, borrower, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::NotLender { caller: other_lender });

        h.ledger.claim_collateral(lender, borrower, &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Claimed);
        assert_eq!(h.chain.balance_of(lender), ether(1));
        assert_eq!(h.ledger.native_custody_balance(), Amount::ZERO);
        assert!(!h.ledger.collateral_is_claimable(borrower, &h.time));

        let err = h.ledger.claim_collateral(lender, borrower, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::CollateralNotClaimable);
    }

    #[test]
    fn test_lender_claims_after_borrower_walks_away() {
        let (mut h, lender, borrower) = drawn();

        advance_days(&h, 330);
        assert!(!h.ledger.collateral_is_claimable(borrower, &h.time));

        advance_days(&h, 1);
        assert!(h.ledger.collateral_is_claimable(borrower, &h.time));
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Active);

        h.ledger.claim_collateral(lender, borrower, &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Claimed);
        assert_eq!(h.chain.balance_of(lender), ether(1));
        assert_eq!(h.ledger.loan(2).unwrap().amount_claimed, usdc(660_000_000));
    }

    #[test]
    fn test_repay_directly_after_lapsed_term() {
        let (mut h, _, borrower) = drawn();
        h.token.mint(borrower, usdc(60_000_000));

        advance_days(&h, 331);
        h.ledger.repay_loan(borrower, usdc(660_000_000), &h.time).unwrap();
        assert_eq!(h.ledger.borrowing(borrower).unwrap().status, BorrowStatus::Paid);

        h.ledger.release_collateral(borrower, &h.time).unwrap();
        assert_eq!(h.chain.balance_of(borrower), ether(1));
    }

    #[test]
    fn test_claim_without_borrowing_is_not_lender() {
        let (mut h, lender, _) = drawn();
        let nobody = AccountId::new();
        let err = h.ledger.claim_collateral(lender, nobody, &h.time).unwrap_err();
        assert_eq!(err, LedgerError::NotLender { caller: lender });
    }

    #[test]
    fn test_new_borrow_after_release_replaces_record() {
        let (mut h, _, borrower) = drawn();
        h.token.mint(borrower, usdc(60_000_000));
        h.ledger.pay_borrow(borrower, usdc(660_000_000), &h.time).unwrap();
        advance_days(&h, 331);
        h.ledger.release_collateral(borrower, &h.time).unwrap();

        h.ledger
            .create_borrow(borrower, usdc(100_000_000), 2, ether(1), &h.time)
            .unwrap();
        let b = h.ledger.borrowing(borrower).unwrap();
        assert_eq!(b.status, BorrowStatus::Active);
        assert_eq!(b.amount_stable_coin, usdc(100_000_000));
    }

    #[test]
    fn test_quote_queries() {
        let h = Harness::new();
        assert_eq!(h.ledger.get_stablecoin_per_native(ether(1)).unwrap(), usdc(1_200_000_000));
        assert_eq!(h.ledger.get_amount_month(ether(1)).unwrap(), 11);
        assert_eq!(h.ledger.get_amount_month(ether(100)).unwrap(), 36);

        h.router.set_liquidity(false);
        assert!(matches!(
            h.ledger.get_amount_month(ether(1)),
            Err(LedgerError::Oracle { .. })
        ));
    }
}
