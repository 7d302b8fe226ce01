//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are plain amounts in the store currency (COP). Display
//! formatting uses the ICU decimal formatter for the `es` locale with two
//! fraction digits: `,` as decimal separator and `.` as thousands separator
//! (Spanish only groups from five integer digits).
//!
//! Arithmetic saturates at the `Decimal` bounds, since amounts come from an
//! untrusted content API.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use icu_decimal::DecimalFormatter;
use icu_decimal::input::Decimal as FormatDecimal;
use icu_decimal::options::DecimalFormatterOptions;
use icu_locale_core::locale;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse a price leniently.
    ///
    /// Leading whitespace is skipped and the longest numeric prefix is used
    /// (`"12.5 COP"` parses as `12.5`). Input without a numeric prefix
    /// yields [`Price::ZERO`].
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        numeric_prefix(input)
            .and_then(|number| {
                Decimal::from_str(&number)
                    .or_else(|_| Decimal::from_scientific(&number))
                    .ok()
            })
            .map_or(Self::ZERO, Self)
    }

    /// Price multiplied by a quantity, saturating at the representable range.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format for display in the `es` style, without currency symbol.
    ///
    /// `1234.5` renders as `1234,50` and `12345.5` as `12.345,50`.
    #[must_use]
    pub fn format_es(&self) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_zero() {
            rounded = Decimal::ZERO;
        }
        let text = fixed_two_places(rounded);

        match (text.parse::<FormatDecimal>(), es_formatter()) {
            (Ok(value), Some(formatter)) => formatter.format(&value).to_string(),
            _ => text.replace('.', ","),
        }
    }
}

/// Spanish decimal formatter backed by the compiled CLDR data.
fn es_formatter() -> Option<DecimalFormatter> {
    DecimalFormatter::try_new(locale!("es").into(), DecimalFormatterOptions::default()).ok()
}

/// Plain `-?digits.dd` text; trailing zeros are kept so ICU renders them.
fn fixed_two_places(amount: Decimal) -> String {
    let text = amount.abs().to_string();
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let sign = if amount.is_sign_negative() { "-" } else { "" };
    format!("{sign}{integer}.{fraction:0<2}")
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Extract the longest leading decimal number, normalized for `Decimal`.
fn numeric_prefix(input: &str) -> Option<String> {
    let mut chars = input.trim_start().chars().peekable();
    let mut out = String::new();

    if let Some(&sign) = chars.peek()
        && (sign == '-' || sign == '+')
    {
        if sign == '-' {
            out.push('-');
        }
        chars.next();
    }

    let mut integer = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        integer.push(c);
    }

    let mut fraction = String::new();
    if chars.next_if_eq(&'.').is_some() {
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            fraction.push(c);
        }
    }

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    out.push_str(if integer.is_empty() { "0" } else { &integer });
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(&fraction);
    }

    if let Some(e) = chars.next_if(|c| *c == 'e' || *c == 'E') {
        let mut exponent = String::from(e);
        if let Some(sign) = chars.next_if(|c| *c == '-' || *c == '+') {
            exponent.push(sign);
        }
        let mut exponent_digits = String::new();
        while let Some(c) = chars.next_if(char::is_ascii_digit) {
            exponent_digits.push(c);
        }
        if !exponent_digits.is_empty() {
            out.push_str(&exponent);
            out.push_str(&exponent_digits);
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> Price {
        Price::parse_lenient(s)
    }

    #[test]
    fn test_parse_lenient_plain_numbers() {
        assert_eq!(price("120000").amount(), Decimal::from(120_000));
        assert_eq!(price("12.5").amount(), Decimal::new(125, 1));
        assert_eq!(price("  -3").amount(), Decimal::from(-3));
        assert_eq!(price(".5").amount(), Decimal::new(5, 1));
    }

    #[test]
    fn test_parse_lenient_uses_numeric_prefix() {
        assert_eq!(price("99.90 COP").amount(), Decimal::new(9990, 2));
        assert_eq!(price("12.").amount(), Decimal::from(12));
        assert_eq!(price("1e3").amount(), Decimal::from(1000));
    }

    #[test]
    fn test_parse_lenient_garbage_is_zero() {
        assert_eq!(price(""), Price::ZERO);
        assert_eq!(price("gratis"), Price::ZERO);
        assert_eq!(price("-"), Price::ZERO);
        assert_eq!(price("."), Price::ZERO);
    }

    #[test]
    fn test_format_es_small_numbers_are_not_grouped() {
        assert_eq!(price("0").format_es(), "0,00");
        assert_eq!(price("12.5").format_es(), "12,50");
        assert_eq!(price("1234.5").format_es(), "1234,50");
    }

    #[test]
    fn test_format_es_groups_from_five_digits() {
        assert_eq!(price("12345.5").format_es(), "12.345,50");
        assert_eq!(price("120000").format_es(), "120.000,00");
        assert_eq!(price("1234567.891").format_es(), "1.234.567,89");
    }

    #[test]
    fn test_format_es_rounds_half_away_from_zero() {
        assert_eq!(price("0.125").format_es(), "0,13");
        assert_eq!(price("-0.125").format_es(), "-0,13");
        assert_eq!(price("-0.001").format_es(), "0,00");
    }

    #[test]
    fn test_display_is_normalized_amount() {
        assert_eq!(price("120000.00").to_string(), "120000");
        assert_eq!(price("12.50").to_string(), "12.5");
    }

    #[test]
    fn test_format_es_huge_amount() {
        let huge = Price::new(Decimal::MAX);
        assert_eq!(
            huge.format_es(),
            "79.228.162.514.264.337.593.543.950.335,00"
        );
    }

    #[test]
    fn test_arithmetic_saturates_instead_of_overflowing() {
        let huge = price("1e28");
        assert_eq!(huge.amount(), Decimal::from_scientific("1e28").unwrap());

        assert_eq!(huge.times(8), Price::new(Decimal::MAX));
        assert_eq!(huge + huge.times(8), Price::new(Decimal::MAX));
        assert_eq!(price("-1e28").times(9), Price::new(Decimal::MIN));

        let total: Price = std::iter::repeat_n(huge, 10).sum();
        assert_eq!(total, Price::new(Decimal::MAX));
    }

    #[test]
    fn test_times_and_sum() {
        let unit = price("10.25");
        assert_eq!(unit.times(3), price("30.75"));
        let total: Price = [price("1"), price("2.5"), price("3")].into_iter().sum();
        assert_eq!(total, price("6.5"));
    }
}
