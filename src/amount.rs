//! Rupee amounts.
//!
//! Prices in the catalog are quoted to the paisa, but commission is a
//! percentage of them, so amounts keep 4 places internally. Every
//! constructor and operator rescales back to that. Rounding to 2 places for
//! people to read is [`crate::fee::format_currency`]'s job.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

/// Rupees at 4 decimal places. Serialized as a string such as `"12.5000"`.
///
/// ```
/// use campus_rentals::Amount;
///
/// let rent = Amount::rupees(250) + "49.5".parse::<Amount>().unwrap();
/// assert_eq!(rent.to_string(), "299.5000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(
    #[serde(
        serialize_with = "rust_decimal::serde::str::serialize",
        deserialize_with = "deserialize_rescaled"
    )]
    Decimal,
);

impl Amount {
    pub const SCALE: u32 = 4;
    pub const ZERO: Self = Amount(Decimal::ZERO);

    pub fn new(mut value: Decimal) -> Self {
        value.rescale(Self::SCALE);
        Amount(value)
    }

    /// Whole rupees, e.g. a catalog daily rate.
    pub fn rupees(value: i64) -> Self {
        Amount::new(Decimal::from(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly above zero. Zero itself is neither positive nor negative.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

fn deserialize_rescaled<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::str::deserialize(deserializer).map(|value| Amount::new(value).0)
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Amount::new)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

macro_rules! rescaling_op {
    ($op:ident, $method:ident, $assign:ident, $assign_method:ident, $sym:tt) => {
        impl $op for Amount {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                Amount::new(self.0 $sym rhs.0)
            }
        }

        impl $assign for Amount {
            fn $assign_method(&mut self, rhs: Self) {
                *self = Amount::new(self.0 $sym rhs.0);
            }
        }
    };
}

rescaling_op!(Add, add, AddAssign, add_assign, +);
rescaling_op!(Sub, sub, SubAssign, sub_assign, -);

/// Applies a commission rate such as `0.05`.
impl Mul<Decimal> for Amount {
    type Output = Self;

    fn mul(self, rate: Decimal) -> Self {
        Amount::new(self.0 * rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(s: &str) -> Amount {
        s.parse().unwrap()
    }

    #[test]
    fn test_paise_prices_gain_trailing_places() {
        assert_eq!(rupees(" 199.99 ").to_string(), "199.9900");
        assert_eq!(Amount::rupees(1_000_000).to_string(), "1000000.0000");
    }

    #[test]
    fn test_commission_rounds_to_four_places() {
        // 5% of ₹49.99
        assert_eq!(rupees("49.99") * Decimal::new(5, 2), rupees("2.4995"));
        // 3% of ₹0.0001 is lost below the 4th place
        assert!((rupees("0.0001") * Decimal::new(3, 2)).is_zero());
    }

    #[test]
    fn test_refund_style_running_total() {
        let mut balance = Amount::rupees(100);
        balance -= rupees("110.25");
        assert!(balance.is_negative());
        balance += rupees("10.25");
        assert_eq!(balance, Amount::ZERO);
        assert!(!balance.is_positive());
    }

    #[test]
    fn test_csv_field_keeps_four_places() {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        wtr.serialize(rupees("12.5")).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(out.trim(), "12.5000");

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(out.as_bytes());
        let back: Amount = rdr.deserialize().next().unwrap().unwrap();
        assert_eq!(back.value().scale(), Amount::SCALE);
        assert_eq!(back, rupees("12.5"));
    }
}
