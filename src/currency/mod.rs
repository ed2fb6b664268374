//! Fixed-point money handling. Every amount that crosses the allocator or the
//! ledger builder is an integer count of cents; decimals only appear at the
//! report and export boundaries.

use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
    str::FromStr,
};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of minor units carried by every amount.
pub const MINOR_UNITS: u32 = 2;

/// A signed amount expressed in cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Rounds a decimal to the cent, half to even, matching how the sales
    /// reports round their own figures. Returns `None` when the value does not
    /// fit in an `i64` cent count.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let mut rounded =
            value.round_dp_with_strategy(MINOR_UNITS, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(MINOR_UNITS);
        i64::try_from(rounded.mantissa()).ok().map(Cents)
    }

    pub fn checked_add(self, rhs: Cents) -> Option<Cents> {
        self.0.checked_add(rhs.0).map(Cents)
    }

    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, MINOR_UNITS)
    }

    /// Renders the amount with exactly two decimals and the given separator.
    pub fn format_with(self, decimal_separator: char) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}{}{:02}", sign, abs / 100, decimal_separator, abs % 100)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with('.'))
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        self.0 += rhs.0;
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Cents> for Cents {
    fn sum<I: Iterator<Item = &'a Cents>>(iter: I) -> Cents {
        iter.copied().sum()
    }
}

/// Sums amounts taken straight from a report, where any cell may be large
/// enough to overflow. Returns `None` on overflow.
pub fn checked_sum<I: IntoIterator<Item = Cents>>(amounts: I) -> Option<Cents> {
    amounts
        .into_iter()
        .try_fold(Cents::ZERO, |total, amount| total.checked_add(amount))
}

/// Parses a report cell into a decimal.
///
/// Accepts a decimal comma, embedded spaces (including non-breaking ones used
/// as thousands separators) and surrounding whitespace. Anything that is not a
/// number yields `None`; callers decide how to recover.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = if cleaned.contains(',') && !cleaned.contains('.') {
        cleaned.replace(',', ".")
    } else {
        cleaned.replace(',', "")
    };
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Parses a report cell into cents, rounding half to even.
pub fn parse_amount(raw: &str) -> Option<Cents> {
    parse_decimal(raw).and_then(Cents::from_decimal)
}

/// Applies a percentage rate to an amount, rounding half to even.
pub fn apply_rate(amount: Cents, rate_percent: Decimal) -> Option<Cents> {
    let scaled = amount.to_decimal().checked_mul(rate_percent)?;
    Cents::from_decimal(scaled / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Cents(1000).to_string(), "10.00");
        assert_eq!(Cents(5).to_string(), "0.05");
        assert_eq!(Cents(-123).to_string(), "-1.23");
        assert_eq!(Cents(-5).format_with(','), "-0,05");
    }

    #[test]
    fn rounds_decimals_half_to_even() {
        assert_eq!(Cents::from_decimal(Decimal::new(10005, 3)), Some(Cents(1000)));
        assert_eq!(Cents::from_decimal(Decimal::new(10015, 3)), Some(Cents(1002)));
        assert_eq!(Cents::from_decimal(Decimal::new(3333333, 6)), Some(Cents(333)));
        assert_eq!(Cents::from_decimal(Decimal::new(7, 0)), Some(Cents(700)));
    }

    #[test]
    fn parses_report_cells() {
        assert_eq!(parse_amount(" 12.5 "), Some(Cents(1250)));
        assert_eq!(parse_amount("1 234,56"), Some(Cents(123456)));
        assert_eq!(parse_amount("1,234.56"), Some(Cents(123456)));
        assert_eq!(parse_amount("1e2"), Some(Cents(10000)));
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_decimal("12,345"), Some(Decimal::new(12345, 3)));
    }

    #[test]
    fn applies_percentage_rates() {
        let rate = Decimal::new(125, 1);
        assert_eq!(apply_rate(Cents(10000), rate), Some(Cents(1250)));
        assert_eq!(apply_rate(Cents(333), Decimal::new(9, 0)), Some(Cents(30)));
    }

    #[test]
    fn sums_cents() {
        let total: Cents = [Cents(1), Cents(2), Cents(3)].iter().sum();
        assert_eq!(total, Cents(6));
        assert_eq!(checked_sum([Cents(1), Cents(2), Cents(3)]), Some(Cents(6)));
    }

    #[test]
    fn checked_sum_reports_overflow() {
        let half = Cents(i64::MAX / 2 + 1);
        assert_eq!(checked_sum([half, half]), None);
        assert_eq!(checked_sum([Cents(i64::MIN), Cents(-1)]), None);
        assert_eq!(checked_sum(std::iter::empty()), Some(Cents::ZERO));
    }
}
