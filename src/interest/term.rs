use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;

use crate::config::TermCurve;
use crate::decimal::Amount;
use crate::errors::{LedgerError, Result};

/// a term month is always 30 days
pub const DAYS_PER_MONTH: i64 = 30;

/// term length in months for a collateral value quoted in stable units
///
/// Non-decreasing in `collateral_value`: one extra month per
/// `stable_per_month` of value on top of `min_months`, capped at `max_months`.
pub fn term_months(collateral_value: Amount, curve: &TermCurve) -> u32 {
    let steps = collateral_value
        .checked_div(curve.stable_per_month.as_decimal())
        .unwrap_or(Amount::ZERO)
        .max(Amount::ZERO);

    let extra = steps.as_decimal().to_u32().unwrap_or(u32::MAX);

    curve
        .min_months
        .saturating_add(extra)
        .min(curve.max_months)
}

/// end of a term that starts at `start`
pub fn end_date(start: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>> {
    Duration::try_days(i64::from(months) * DAYS_PER_MONTH)
        .and_then(|term| start.checked_add_signed(term))
        .ok_or_else(|| LedgerError::overflow("end date"))
}
