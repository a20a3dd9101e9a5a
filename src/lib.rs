pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod guard;
pub mod interest;
pub mod ledger;
pub mod oracle;
pub mod serialization;
pub mod shared;
pub mod state;
pub mod transfer;
pub mod types;

// re-export key types
pub use config::{LedgerConfig, TermCurve, MAX_TERM_MONTHS};
pub use decimal::{Amount, Rate};
pub use errors::{LedgerError, Result};
pub use events::{Event, EventStore};
pub use guard::Guard;
pub use interest::{amount_due, end_date, interest, term_months, DAYS_PER_MONTH};
pub use ledger::{LedgerBuilder, LendingLedger};
pub use oracle::{ConstantPriceRouter, PriceOracle, PriceRouter};
pub use serialization::{BorrowingView, LedgerView, LoanView};
pub use shared::SharedLedger;
pub use state::{Borrowing, Loan};
pub use transfer::{HostChain, InMemoryChain, InMemoryToken, StableToken};
pub use types::{AccountId, BorrowStatus, LoanId, LoanStatus, FIRST_LOAN_ID};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
