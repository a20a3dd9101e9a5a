use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

/// token quantity in smallest units (wei, micro-dollars, ...)
///
/// Always integral: every constructor and arithmetic helper truncates toward
/// zero, matching the smallest unit of the external token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    pub const ONE: Amount = Amount(Decimal::ONE);
    pub const MAX: Amount = Amount(Decimal::MAX);

    /// create from decimal, truncating any fraction
    pub fn from_decimal(d: Decimal) -> Self {
        Amount(d.trunc())
    }

    /// create from a raw count of smallest units
    pub fn from_units(units: u64) -> Self {
        Amount(Decimal::from(units))
    }

    /// create from whole units of a token with `decimals` places (e.g. 1 ether = from_major(1, 18))
    pub fn from_major(major: u64, decimals: u32) -> Self {
        Amount(Decimal::from(major) * unit_scale(decimals))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Amount(Decimal::from_str(s)?.trunc()))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// value expressed in whole units of a token with `decimals` places
    pub fn to_major(&self, decimals: u32) -> Decimal {
        self.0 / unit_scale(decimals)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn min(self, other: Self) -> Self {
        Amount(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Amount(self.0.max(other.0))
    }

    /// integer half, rounded down
    pub fn half(&self) -> Self {
        Amount((self.0 / Decimal::TWO).trunc())
    }

    /// apply a rate, truncating to the smallest unit
    pub fn percentage(&self, rate: Rate) -> Option<Self> {
        self.0.checked_mul(rate.as_decimal()).map(|d| Amount(d.trunc()))
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        self.checked_add(other).unwrap_or(Amount::MAX)
    }

    /// subtraction that refuses to go below zero
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if other.0 > self.0 {
            return None;
        }
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        self.checked_sub(other).unwrap_or(Amount::ZERO)
    }

    /// multiply by a decimal factor, truncating
    pub fn checked_mul(self, factor: Decimal) -> Option<Self> {
        self.0.checked_mul(factor).map(|d| Amount(d.trunc()))
    }

    /// divide by a decimal divisor, truncating
    pub fn checked_div(self, divisor: Decimal) -> Option<Self> {
        self.0.checked_div(divisor).map(|d| Amount(d.trunc()))
    }
}

/// 10^decimals as a decimal
pub(crate) fn unit_scale(decimals: u32) -> Decimal {
    let mut scale = Decimal::ONE;
    for _ in 0..decimals {
        scale *= Decimal::TEN;
    }
    scale
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_str_exact(s)
    }
}

impl From<u64> for Amount {
    fn from(units: u64) -> Self {
        Amount::from_units(units)
    }
}

impl From<u32> for Amount {
    fn from(units: u32) -> Self {
        Amount::from_units(units as u64)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 += other.0;
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount(self.0 - other.0)
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Amount) {
        self.0 -= other.0;
    }
}

/// monthly interest rate stored as a fraction (0.10 for 10%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::ONE_HUNDRED)
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10_000))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::ONE_HUNDRED
    }

    /// half of this rate, used for the lender leg of the spread
    pub fn half(&self) -> Rate {
        Rate(self.0 / Decimal::TWO)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}
