pub mod term;

use crate::decimal::{Amount, Rate};
use crate::errors::{LedgerError, Result};

pub use term::{end_date, term_months, DAYS_PER_MONTH};

/// interest owed on a principal for one leg of the spread
///
/// `principal × rate`, truncated to the smallest token unit.
pub fn interest(principal: Amount, rate: Rate) -> Result<Amount> {
    principal
        .percentage(rate)
        .ok_or_else(|| LedgerError::overflow("interest"))
}

/// principal plus interest
pub fn amount_due(principal: Amount, interest: Amount) -> Result<Amount> {
    principal
        .checked_add(interest)
        .ok_or_else(|| LedgerError::overflow("amount due"))
}
