//! Fixed-point token amount.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative, fixed-point token amount.
///
/// Backed by [`rust_decimal::Decimal`] rather than a float, so that the fee
/// arithmetic in the execution engine and the consensus fee split do not
/// accumulate rounding error across many small transactions.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Constructs an `Amount`, returning `None` if `value` is negative.
    pub fn new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() {
            None
        } else {
            Some(Amount(value))
        }
    }

    /// Constructs an `Amount` from an integral number of whole tokens.
    pub fn from_whole(units: u64) -> Self {
        Amount(Decimal::from(units))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `self * ratio`, rounded to the same 8-fractional-digit
    /// precision used throughout this crate.
    pub fn scaled_by(&self, ratio: Decimal) -> Amount {
        Amount((self.0 * ratio).round_dp(8))
    }

    pub fn checked_add(&self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Amount> {
        let diff = self.0.checked_sub(other.0)?;
        Amount::new(diff)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s).map_err(|e| format!("invalid amount {s:?}: {e}"))?;
        Amount::new(value).ok_or_else(|| format!("amount {s:?} is negative"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_rejects_negative_amounts() {
        assert!(Amount::new(dec!(-1)).is_none());
    }

    #[test]
    fn scaled_by_rounds_to_eight_fractional_digits() {
        let amount = Amount::new(dec!(100)).unwrap();
        let fee = amount.scaled_by(dec!(0.001));
        assert_eq!(fee.as_decimal(), dec!(0.100));
    }

    #[test]
    fn checked_sub_rejects_going_negative() {
        let small = Amount::new(dec!(10)).unwrap();
        let large = Amount::new(dec!(20)).unwrap();
        assert!(small.checked_sub(large).is_none());
    }

    #[test]
    fn checked_add_preserves_precision() {
        let a = Amount::new(dec!(899.9)).unwrap();
        let b = Amount::new(dec!(0.1)).unwrap();
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum.as_decimal(), dec!(900.0));
    }

    #[test]
    fn from_str_roundtrips() {
        let amount: Amount = "1000.12345678".parse().unwrap();
        assert_eq!(amount.to_string(), "1000.12345678");
    }
}
