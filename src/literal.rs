//! Exact handling of decimal number literals.
//!
//! Numbers are stored as the decimal strings they were written with, so they can be
//! re-read at any requested precision. This module validates such strings and answers
//! questions about their exact value (is it zero, is it an integer) without going through
//! a floating point approximation.

use crate::errors::ConstructionError;

/// A validated decimal literal split into its parts.
///
/// The value is `(-1)^negative * digits * 10^exponent`, where `digits` has no leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Decimal {
    negative: bool,
    digits: String,
    exponent: i64,
}

impl Decimal {
    fn parse(literal: &str) -> Option<Self> {
        let (negative, rest) = match literal.as_bytes().first()? {
            b'-' => (true, &literal[1..]),
            b'+' => (false, &literal[1..]),
            _ => (false, literal),
        };

        let (mantissa, exponent) = match rest.find(['e', 'E']) {
            Some(pos) => (&rest[..pos], parse_exponent(&rest[pos + 1..])?),
            None => (rest, 0),
        };

        let (integer, fraction) = match mantissa.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (mantissa, ""),
        };
        if integer.is_empty() && fraction.is_empty() {
            return None;
        }
        if !integer.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }

        let fraction_len = i64::try_from(fraction.len()).ok()?;
        let digits: String = integer
            .chars()
            .chain(fraction.chars())
            .skip_while(|&c| c == '0')
            .collect();

        Some(Self {
            negative,
            digits,
            exponent: exponent.checked_sub(fraction_len)?,
        })
    }

    fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    fn to_i64(&self) -> Option<i64> {
        if self.is_zero() {
            return Some(0);
        }
        let significant = self.digits.trim_end_matches('0');
        let trailing = self.digits.len() - significant.len();
        let exponent = self.exponent.checked_add(i64::try_from(trailing).ok()?)?;
        let length = i64::try_from(significant.len()).ok()?;
        if exponent < 0 || !matches!(length.checked_add(exponent), Some(n) if n <= 19) {
            return None;
        }

        let mut magnitude: i128 = significant.parse().ok()?;
        for _ in 0..exponent {
            magnitude = magnitude.checked_mul(10)?;
        }
        if self.negative {
            magnitude = -magnitude;
        }
        i64::try_from(magnitude).ok()
    }
}

fn parse_exponent(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Checks that `literal` is a plain decimal number such as `-3.25`, `.5` or `1e-7`.
pub(crate) fn validate(literal: &str) -> Result<(), ConstructionError> {
    Decimal::parse(literal)
        .map(|_| ())
        .ok_or_else(|| ConstructionError::InvalidLiteral(literal.to_string()))
}

/// Whether a validated literal is exactly zero.
pub(crate) fn is_zero(literal: &str) -> bool {
    Decimal::parse(literal).is_some_and(|d| d.is_zero())
}

/// The exact integer value of a literal, if it has one that fits an `i64`.
pub(crate) fn exact_integer(literal: &str) -> Option<i64> {
    Decimal::parse(literal)?.to_i64()
}

/// The literal of the negated value.
pub(crate) fn negate(literal: &str) -> String {
    match literal.strip_prefix('-') {
        Some(positive) => positive.to_string(),
        None => format!("-{}", literal.strip_prefix('+').unwrap_or(literal)),
    }
}

/// Renders a finite double as the shortest decimal literal that reads back to it.
pub(crate) fn from_f64(value: f64) -> Result<String, ConstructionError> {
    if !value.is_finite() {
        return Err(ConstructionError::InvalidLiteral(value.to_string()));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        for ok in ["0", "-3.4", "+5.6", ".5", "5.", "1e10", "2.5E-3", "-0.0", "007"] {
            assert!(validate(ok).is_ok(), "{ok} should be accepted");
        }
        for bad in ["", "-", ".", "e5", "1e", "1e+", "1.2.3", "inf", "NaN", "0x10", " 1"] {
            assert!(validate(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_exact_integer() {
        assert_eq!(exact_integer("2"), Some(2));
        assert_eq!(exact_integer("-2.000"), Some(-2));
        assert_eq!(exact_integer("2.5e1"), Some(25));
        assert_eq!(exact_integer("1200e-2"), Some(12));
        assert_eq!(exact_integer("0.0"), Some(0));
        assert_eq!(exact_integer("-0"), Some(0));
        assert_eq!(exact_integer("0.5"), None);
        assert_eq!(exact_integer("1.0000000000000000001"), None);
        assert_eq!(exact_integer("9223372036854775807"), Some(i64::MAX));
        assert_eq!(exact_integer("9223372036854775808"), None);
        assert_eq!(exact_integer("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(exact_integer("1e400"), None);
    }

    #[test]
    fn test_exact_integer_with_huge_exponent() {
        let literal = format!("1e{}", i64::MAX);
        assert!(validate(&literal).is_ok());
        assert_eq!(exact_integer(&literal), None);
        assert_eq!(exact_integer(&format!("12e{}", i64::MAX - 1)), None);
        assert_eq!(exact_integer(&format!("-5e{}", i64::MAX)), None);
    }

    #[test]
    fn test_zero_and_negate() {
        assert!(is_zero("0"));
        assert!(is_zero("-0.000e5"));
        assert!(!is_zero("1e-400"));
        assert_eq!(negate("3.4"), "-3.4");
        assert_eq!(negate("-3.4"), "3.4");
        assert_eq!(negate("+3.4"), "-3.4");
    }

    #[test]
    fn test_from_f64() {
        assert_eq!(from_f64(0.5).unwrap(), "0.5");
        assert_eq!(from_f64(2.0).unwrap(), "2");
        assert_eq!(exact_integer(&from_f64(1.0 / 2.0).unwrap()), None);
        assert!(from_f64(f64::NAN).is_err());
        assert!(from_f64(f64::INFINITY).is_err());
    }
}
