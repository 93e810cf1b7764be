use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use rust_decimal::Decimal;

/// Error occurring when parsing a string to a monetary amount.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoneyParseError {
    /// The specified string is not a valid monetary amount.
    InvalidNumericValue,
}

impl Display for MoneyParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MoneyParseError::InvalidNumericValue => "Invalid numeric value",
        })
    }
}

/// An amount of money, represented as a decimal number.
///
/// Parsing tolerates thousands separators (`"1,299.50"`), since the sales
/// feed embeds them in quantity and price fields. Arithmetic saturates at
/// the representable bounds rather than overflowing; sales figures never
/// get anywhere near them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money {
    value: Decimal,
}

impl Money {
    /// Constant value of `0.0`.
    pub const ZERO: Self = Self {
        value: Decimal::ZERO,
    };

    /// Returns true if this value is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Multiplies this amount by an integer quantity.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Self {
        Self {
            value: self
                .value
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        }
    }

    /// Rounds this amount to two decimal places (midpoint-to-even, matching
    /// the report's currency precision).
    #[must_use]
    pub fn round2(&self) -> Self {
        Self {
            value: self.value.round_dp(2),
        }
    }

    /// The mean of `total` over `count` items, rounded to two decimal
    /// places. Returns [`Money::ZERO`] when `count` is zero.
    #[must_use]
    pub fn average(total: Self, count: usize) -> Self {
        if count == 0 {
            return Self::ZERO;
        }
        Self {
            value: (total.value / Decimal::from(count as u64)).round_dp(2),
        }
    }

    /// This amount as a percentage of `total`, rounded to two decimal
    /// places. Returns zero when `total` is zero. The result is normalised
    /// so trailing zeros from the division never leak into rendered
    /// output.
    #[must_use]
    pub fn percent_of(&self, total: Self) -> Decimal {
        if total.value.is_zero() {
            return Decimal::ZERO;
        }
        (self.value / total.value * Decimal::from(100))
            .round_dp(2)
            .normalize()
    }

    /// Formats this amount with thousands separators and exactly two
    /// decimal places, e.g. `1,234.50`. Used by the rendered report.
    #[must_use]
    pub fn grouped(&self) -> String {
        let rounded = self.value.round_dp(2);
        let sign = if rounded.is_sign_negative() { "-" } else { "" };
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (text.as_str(), ""),
        };

        let mut frac = String::from(frac_part);
        frac.truncate(2);
        while frac.len() < 2 {
            frac.push('0');
        }

        let mut grouped = String::new();
        let digit_count = int_part.len();
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (digit_count - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        format!("{}{}.{}", sign, grouped, frac)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            value: self.value.checked_add(rhs.value).unwrap_or(Decimal::MAX),
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(value: &str) -> Result<Self, MoneyParseError> {
        // The feed writes thousands-separated numbers like "1,299.50".
        let cleaned = value.trim().replace(',', "");
        Ok(Self {
            value: Decimal::from_str(&cleaned)
                .map_err(|_| MoneyParseError::InvalidNumericValue)?,
        })
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value.to_string())
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use crate::numeric::{Money, MoneyParseError};

    #[test]
    fn test_parse() {
        assert_eq!("12", Money::from_str("12").unwrap().to_string());
        assert_eq!("12.5", Money::from_str("12.5").unwrap().to_string());
        assert_eq!("10.00", Money::from_str("10.00").unwrap().to_string());
        assert_eq!("1299.50", Money::from_str("1,299.50").unwrap().to_string());
        assert_eq!("1250000", Money::from_str("1,250,000").unwrap().to_string());
        assert_eq!("12.5", Money::from_str(" 12.5 ").unwrap().to_string());
    }

    #[test]
    fn test_parse_fail() {
        assert_eq!(
            Err(MoneyParseError::InvalidNumericValue),
            Money::from_str("a")
        );
        assert_eq!(
            Err(MoneyParseError::InvalidNumericValue),
            Money::from_str("12.5x")
        );
        assert_eq!(
            Err(MoneyParseError::InvalidNumericValue),
            Money::from_str("")
        );
    }

    #[test]
    fn test_times_and_sum() {
        let price = Money::from_str("10.00").unwrap();
        assert_eq!(Money::from_str("50.00").unwrap(), price.times(5));

        let total: Money = vec![
            Money::from_str("1.50").unwrap(),
            Money::from_str("2.25").unwrap(),
        ]
        .into_iter()
        .sum();
        assert_eq!(Money::from_str("3.75").unwrap(), total);
    }

    #[test]
    fn test_average() {
        let total = Money::from_str("10").unwrap();
        assert_eq!(Money::from_str("3.33").unwrap(), Money::average(total, 3));
        assert_eq!(Money::ZERO, Money::average(total, 0));
    }

    #[test]
    fn test_percent_of() {
        let part = Money::from_str("25").unwrap();
        let total = Money::from_str("200").unwrap();
        assert_eq!(Decimal::from_str("12.5").unwrap(), part.percent_of(total));
        assert_eq!(Decimal::ZERO, part.percent_of(Money::ZERO));
    }

    #[test]
    fn test_grouped() {
        assert_eq!("0.00", Money::ZERO.grouped());
        assert_eq!("50.00", Money::from_str("50").unwrap().grouped());
        assert_eq!("1,234.50", Money::from_str("1234.5").unwrap().grouped());
        assert_eq!("1,250,000.00", Money::from_str("1250000").unwrap().grouped());
        assert_eq!("-1,234.57", Money::from_str("-1234.567").unwrap().grouped());
    }
}
