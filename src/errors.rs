use thiserror::Error;

use crate::decimal::Amount;
use crate::types::{AccountId, LoanId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // validation
    #[error("Amount of Stablecoin must be greater than 0")]
    ZeroLoanAmount,

    #[error("Amount of Collateral must be greater than 0")]
    ZeroCollateral,

    #[error("Amount must be greater than 0")]
    ZeroAmount,

    #[error("Amount cannot be negative: {amount}")]
    NegativeAmount {
        amount: Amount,
    },

    #[error("Loan doesn't exist")]
    LoanNotFound {
        loan_id: LoanId,
    },

    #[error("Not enough Stablecoin Available in this Index Loan")]
    InsufficientPoolLiquidity {
        available: Amount,
        requested: Amount,
    },

    /// requested principal is above half the quoted collateral value
    #[error("The amount of Stablecoin must be greater than the amount of Collateral")]
    LtvCeilingExceeded {
        ceiling: Amount,
        requested: Amount,
    },

    #[error("Smart Contract Not enough Stablecoin")]
    InsufficientCustody {
        available: Amount,
        required: Amount,
    },

    #[error("Not enough Stablecoin")]
    InsufficientStablecoin {
        balance: Amount,
        requested: Amount,
    },

    #[error("Not enough to pay Borrow")]
    PaymentBelowAmountDue {
        due: Amount,
        provided: Amount,
    },

    #[error("The Amount not Enough to unleash the Collateral")]
    RepaymentBelowMakeWhole {
        required: Amount,
        provided: Amount,
    },

    // state
    #[error("Lender has a loan that already exists")]
    LoanAlreadyExists {
        loan_id: LoanId,
    },

    #[error("Borrower has a borrow that already exists")]
    BorrowAlreadyExists {
        borrower: AccountId,
    },

    #[error("The Borrow is not expired")]
    BorrowNotDefaulted,

    #[error("Borrow is not paid")]
    BorrowNotPaid,

    #[error("The Borrow is not expired yet")]
    BorrowNotExpiredYet,

    #[error("Lender cannot claim the Collateral")]
    CollateralNotClaimable,

    #[error("Pausable: paused")]
    Paused,

    #[error("Pausable: not paused")]
    NotPaused,

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: String,
        expected: String,
    },

    // authorization
    #[error("Not the Lender of this Borrower")]
    NotLender {
        caller: AccountId,
    },

    #[error("Ownable: caller is not the owner")]
    NotOwner {
        caller: AccountId,
    },

    #[error("Ownable: new owner is the zero address")]
    NullOwner,

    // external collaborators
    #[error("ERC20: transfer amount exceeds allowance")]
    InsufficientAllowance {
        allowance: Amount,
        requested: Amount,
    },

    #[error("ERC20: transfer amount exceeds balance")]
    InsufficientBalance {
        balance: Amount,
        requested: Amount,
    },

    #[error("Address: insufficient balance")]
    InsufficientNativeBalance {
        balance: Amount,
        requested: Amount,
    },

    #[error("oracle quote failed: {message}")]
    Oracle {
        message: String,
    },

    // construction and configuration
    #[error("Stablecoin or Router address cannot be zero")]
    NullCollaborator,

    #[error("Stablecoin or Router address must be a contract")]
    CollaboratorNotContract {
        address: AccountId,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },
}

impl LedgerError {
    pub(crate) fn overflow(what: &str) -> Self {
        LedgerError::CalculationError {
            message: format!("{} overflowed", what),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
