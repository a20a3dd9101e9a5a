use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
use crate::errors::{LedgerError, Result};

/// longest term a curve may produce, one hundred years
pub const MAX_TERM_MONTHS: u32 = 1_200;

/// ledger configuration, fixed at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// monthly interest rate charged to borrowers; lenders earn half
    pub borrower_rate: Rate,
    /// decimal places of the stable token
    pub stable_decimals: u32,
    /// decimal places of the native currency
    pub native_decimals: u32,
    pub term_curve: TermCurve,
}

/// maps a collateral value (in stable units) to a term length in months
///
/// `months = min(max_months, min_months + value / stable_per_month)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TermCurve {
    pub min_months: u32,
    pub max_months: u32,
    /// collateral value that buys one extra month of term
    pub stable_per_month: Amount,
}

impl TermCurve {
    pub fn validate(&self) -> Result<()> {
        if self.max_months > MAX_TERM_MONTHS {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "term curve maximum {} exceeds {} months",
                    self.max_months, MAX_TERM_MONTHS
                ),
            });
        }
        if self.min_months == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "term curve minimum must be at least one month".to_string(),
            });
        }
        if self.min_months > self.max_months {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "term curve minimum {} exceeds maximum {}",
                    self.min_months, self.max_months
                ),
            });
        }
        if !self.stable_per_month.is_positive() {
            return Err(LedgerError::InvalidConfiguration {
                message: "term curve step must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl LedgerConfig {
    /// 10% monthly for borrowers, 5% for lenders, 6-decimal stable token,
    /// 18-decimal native currency, 3..36 month terms with one extra month per
    /// 150 whole stable units of collateral
    pub fn standard() -> Self {
        Self {
            borrower_rate: Rate::from_percentage(10),
            stable_decimals: 6,
            native_decimals: 18,
            term_curve: TermCurve {
                min_months: 3,
                max_months: 36,
                stable_per_month: Amount::from_major(150, 6),
            },
        }
    }

    /// standard config with a different borrower rate
    pub fn with_borrower_rate(rate: Rate) -> Self {
        Self {
            borrower_rate: rate,
            ..Self::standard()
        }
    }

    /// parse and validate a json config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// lender rate is always half the borrower rate
    pub fn lender_rate(&self) -> Rate {
        self.borrower_rate.half()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.borrower_rate.is_positive() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("borrower rate must be positive, got {}", self.borrower_rate),
            });
        }
        if self.borrower_rate.as_decimal() > dec!(1) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("borrower rate {} exceeds 100% per month", self.borrower_rate),
            });
        }
        if self.stable_decimals > 18 || self.native_decimals > 18 {
            return Err(LedgerError::InvalidConfiguration {
                message: "token decimals above 18 are not supported".to_string(),
            });
        }
        self.term_curve.validate()
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::standard()
    }
}
