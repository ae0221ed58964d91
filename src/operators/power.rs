//! Integer and general powers.
//!
//! `pow` inspects its exponent: a number literal with an exactly integer value yields an
//! integer power, anything else a general power. The check works on the decimal literal,
//! so `2.0` and `20e-1` are integers while `2.0000000000000001` is not.

use log::debug;

use crate::errors::{ConstructionError, EvalError};
use crate::expr::{Node, NodeKind, Number};
use crate::numeric::Numeric;
use crate::precision::Precision;

pub(crate) fn pow(base: &Node, exponent: &Node) -> Node {
    if let Some(value) = exponent.as_number().and_then(Number::as_integer) {
        debug!("exponent {exponent} is an integer literal, building an integer power");
        return powi(base, value);
    }
    Node::from_kind(NodeKind::Power {
        base: base.clone(),
        exponent: exponent.clone(),
    })
}

pub(crate) fn powi(base: &Node, exponent: i64) -> Node {
    Node::from_kind(NodeKind::IntegerPower {
        base: base.clone(),
        exponent,
    })
}

pub(crate) fn integer_power(base: &Node, exponent: &Node) -> Result<Node, ConstructionError> {
    exponent
        .as_number()
        .and_then(Number::as_integer)
        .map(|value| powi(base, value))
        .ok_or_else(|| ConstructionError::NonIntegerExponent(exponent.to_string()))
}

/// Raises `base` to an integer power by binary exponentiation.
///
/// Negative exponents take the reciprocal of the positive power.
pub(crate) fn eval_integer_power<T: Numeric>(
    base: &T,
    exponent: i64,
    precision: Precision,
) -> Result<T, EvalError> {
    if exponent == 0 {
        return Ok(T::one(precision));
    }
    if exponent < 0 && base.is_zero() {
        return Err(EvalError::DivisionByZero);
    }

    let mut result = T::one(precision);
    let mut square = base.clone();
    let mut remaining = exponent.unsigned_abs();
    loop {
        if remaining & 1 == 1 {
            result = result.mul(&square);
        }
        remaining >>= 1;
        if remaining == 0 {
            break;
        }
        square = square.mul(&square);
    }

    if exponent < 0 {
        Ok(T::one(precision).div(&result))
    } else {
        Ok(result)
    }
}

/// Principal value of `base^exponent`.
pub(crate) fn eval_power<T: Numeric>(
    base: &T,
    exponent: &T,
    precision: Precision,
) -> Result<T, EvalError> {
    if base.is_zero() {
        if exponent.is_zero() {
            return Ok(T::one(precision));
        }
        if exponent.real_is_positive() {
            return Ok(T::zero(precision));
        }
        return Err(EvalError::Domain {
            function: "pow",
            argument: format!("{base}^{exponent}"),
        });
    }
    base.powc(exponent).finite_or_domain("pow", base)
}
