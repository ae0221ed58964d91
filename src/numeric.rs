//! The two numeric value types a function tree evaluates to.
//!
//! Evaluation is written once, generically over [`Numeric`], and instantiated for exactly
//! two types:
//!
//! - [`Dbl`]: `num_complex::Complex64`, native double precision
//! - [`Mpfr`]: `rug::Complex`, arbitrary precision backed by MPFR/MPC
//!
//! Both follow the C99 / MPC principal branch conventions for `sqrt`, `ln`, complex power
//! and the inverse trigonometric functions, so raising the precision never flips a branch.
//! Arithmetic on `Mpfr` keeps the precision of its left operand; leaves are created at the
//! working precision of the evaluation pass, so a whole pass runs at one precision.

use std::fmt;

use rug::float::Constant;
use rug::ops::Pow;
use rug::{Complex, Float};

use crate::errors::EvalError;
use crate::eval::EvalCache;
use crate::expr::{Number, Variable};
use crate::precision::Precision;
use crate::types::{Dbl, Mpfr};

mod private {
    pub trait Sealed {}

    impl Sealed for crate::types::Dbl {}
    impl Sealed for crate::types::Mpfr {}
}

/// Arithmetic and transcendental operations required by evaluation.
///
/// This trait is sealed; it is implemented for [`Dbl`] and [`Mpfr`] only.
pub trait Numeric: private::Sealed + Clone + fmt::Debug + fmt::Display + 'static {
    /// Human readable name used in error messages.
    const NAME: &'static str;

    /// Additive identity.
    fn zero(precision: Precision) -> Self;
    /// Multiplicative identity.
    fn one(precision: Precision) -> Self;
    /// Reads a number literal.
    fn from_literal(number: &Number, precision: Precision) -> Result<Self, EvalError>;
    fn pi(precision: Precision) -> Self;
    fn e(precision: Precision) -> Self;
    fn imaginary_unit(precision: Precision) -> Self;
    /// Rounds an externally assigned value to the working precision.
    fn at_precision(&self, precision: Precision) -> Self;

    fn add(&self, rhs: &Self) -> Self;
    fn sub(&self, rhs: &Self) -> Self;
    fn mul(&self, rhs: &Self) -> Self;
    fn div(&self, rhs: &Self) -> Self;
    fn neg(&self) -> Self;

    /// Exact comparison against zero.
    fn is_zero(&self) -> bool;
    fn is_finite(&self) -> bool;
    /// Whether the real part is strictly positive.
    fn real_is_positive(&self) -> bool;
    /// Whether the value is exactly `i` or `-i`.
    fn is_plus_minus_i(&self) -> bool;

    /// Principal value of `self^exponent`.
    fn powc(&self, exponent: &Self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn tan(&self) -> Self;
    fn asin(&self) -> Self;
    fn acos(&self) -> Self;
    fn atan(&self) -> Self;
    fn exp(&self) -> Self;
    fn ln(&self) -> Self;
    fn sqrt(&self) -> Self;

    /// Turns a non-finite result into a domain error where the type reports one.
    ///
    /// Double precision lets infinities and NaN propagate natively.
    fn finite_or_domain(self, function: &'static str, argument: &Self)
        -> Result<Self, EvalError>;

    #[doc(hidden)]
    fn current_value(variable: &Variable) -> Option<Self>;
    #[doc(hidden)]
    fn store_value(variable: &Variable, value: Self);
    #[doc(hidden)]
    fn cached(cache: &EvalCache, pass: u64) -> Option<Self>;
    #[doc(hidden)]
    fn store_cached(cache: &EvalCache, pass: u64, value: &Self);
}

impl Numeric for Dbl {
    const NAME: &'static str = "dbl";

    fn zero(_: Precision) -> Self {
        Dbl::new(0.0, 0.0)
    }

    fn one(_: Precision) -> Self {
        Dbl::new(1.0, 0.0)
    }

    fn from_literal(number: &Number, _: Precision) -> Result<Self, EvalError> {
        let value = number.approximation();
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::OutOfRange {
                literal: number.to_string(),
                numeric: Self::NAME,
            })
        }
    }

    fn pi(_: Precision) -> Self {
        Dbl::new(std::f64::consts::PI, 0.0)
    }

    fn e(_: Precision) -> Self {
        Dbl::new(std::f64::consts::E, 0.0)
    }

    fn imaginary_unit(_: Precision) -> Self {
        Dbl::new(0.0, 1.0)
    }

    fn at_precision(&self, _: Precision) -> Self {
        *self
    }

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn mul(&self, rhs: &Self) -> Self {
        self * rhs
    }

    fn div(&self, rhs: &Self) -> Self {
        self / rhs
    }

    fn neg(&self) -> Self {
        -self
    }

    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    fn is_finite(&self) -> bool {
        Dbl::is_finite(*self)
    }

    fn real_is_positive(&self) -> bool {
        self.re > 0.0
    }

    fn is_plus_minus_i(&self) -> bool {
        self.re == 0.0 && self.im.abs() == 1.0
    }

    fn powc(&self, exponent: &Self) -> Self {
        Dbl::powc(*self, *exponent)
    }

    fn sin(&self) -> Self {
        Dbl::sin(*self)
    }

    fn cos(&self) -> Self {
        Dbl::cos(*self)
    }

    fn tan(&self) -> Self {
        Dbl::tan(*self)
    }

    fn asin(&self) -> Self {
        Dbl::asin(*self)
    }

    fn acos(&self) -> Self {
        Dbl::acos(*self)
    }

    fn atan(&self) -> Self {
        Dbl::atan(*self)
    }

    fn exp(&self) -> Self {
        Dbl::exp(*self)
    }

    fn ln(&self) -> Self {
        Dbl::ln(*self)
    }

    fn sqrt(&self) -> Self {
        Dbl::sqrt(*self)
    }

    fn finite_or_domain(self, _: &'static str, _: &Self) -> Result<Self, EvalError> {
        Ok(self)
    }

    fn current_value(variable: &Variable) -> Option<Self> {
        variable.dbl.get()
    }

    fn store_value(variable: &Variable, value: Self) {
        variable.dbl.set(Some(value));
    }

    fn cached(cache: &EvalCache, pass: u64) -> Option<Self> {
        match cache.dbl.get() {
            Some((id, value)) if id == pass => Some(value),
            _ => None,
        }
    }

    fn store_cached(cache: &EvalCache, pass: u64, value: &Self) {
        cache.dbl.set(Some((pass, *value)));
    }
}

impl Numeric for Mpfr {
    const NAME: &'static str = "mpfr";

    fn zero(precision: Precision) -> Self {
        Complex::new(precision.bits())
    }

    fn one(precision: Precision) -> Self {
        Complex::with_val(precision.bits(), 1)
    }

    fn from_literal(number: &Number, precision: Precision) -> Result<Self, EvalError> {
        let bits = precision.bits();
        let read = |literal: &str| {
            Float::parse(literal)
                .ok()
                .map(|parsed| Float::with_val(bits, parsed))
                .filter(Float::is_finite)
                .ok_or_else(|| EvalError::OutOfRange {
                    literal: literal.to_string(),
                    numeric: Self::NAME,
                })
        };
        Ok(Complex::with_val(
            bits,
            (read(number.real())?, read(number.imag())?),
        ))
    }

    fn pi(precision: Precision) -> Self {
        let bits = precision.bits();
        Complex::with_val(bits, (Float::with_val(bits, Constant::Pi), Float::new(bits)))
    }

    fn e(precision: Precision) -> Self {
        let bits = precision.bits();
        let e = Float::with_val(bits, 1).exp();
        Complex::with_val(bits, (e, Float::new(bits)))
    }

    fn imaginary_unit(precision: Precision) -> Self {
        Complex::with_val(precision.bits(), (0, 1))
    }

    fn at_precision(&self, precision: Precision) -> Self {
        Complex::with_val(precision.bits(), self)
    }

    fn add(&self, rhs: &Self) -> Self {
        Complex::with_val(self.prec(), self + rhs)
    }

    fn sub(&self, rhs: &Self) -> Self {
        Complex::with_val(self.prec(), self - rhs)
    }

    fn mul(&self, rhs: &Self) -> Self {
        Complex::with_val(self.prec(), self * rhs)
    }

    fn div(&self, rhs: &Self) -> Self {
        Complex::with_val(self.prec(), self / rhs)
    }

    fn neg(&self) -> Self {
        Complex::with_val(self.prec(), -self)
    }

    fn is_zero(&self) -> bool {
        self.real().is_zero() && self.imag().is_zero()
    }

    fn is_finite(&self) -> bool {
        self.real().is_finite() && self.imag().is_finite()
    }

    fn real_is_positive(&self) -> bool {
        *self.real() > 0
    }

    fn is_plus_minus_i(&self) -> bool {
        self.real().is_zero() && (*self.imag() == 1 || *self.imag() == -1)
    }

    fn powc(&self, exponent: &Self) -> Self {
        self.clone().pow(exponent)
    }

    fn sin(&self) -> Self {
        self.clone().sin()
    }

    fn cos(&self) -> Self {
        self.clone().cos()
    }

    fn tan(&self) -> Self {
        self.clone().tan()
    }

    fn asin(&self) -> Self {
        self.clone().asin()
    }

    fn acos(&self) -> Self {
        self.clone().acos()
    }

    fn atan(&self) -> Self {
        self.clone().atan()
    }

    fn exp(&self) -> Self {
        self.clone().exp()
    }

    fn ln(&self) -> Self {
        self.clone().ln()
    }

    fn sqrt(&self) -> Self {
        self.clone().sqrt()
    }

    fn finite_or_domain(self, function: &'static str, argument: &Self) -> Result<Self, EvalError> {
        if Numeric::is_finite(&self) {
            Ok(self)
        } else {
            Err(EvalError::Domain {
                function,
                argument: argument.to_string(),
            })
        }
    }

    fn current_value(variable: &Variable) -> Option<Self> {
        variable.mp.borrow().clone()
    }

    fn store_value(variable: &Variable, value: Self) {
        *variable.mp.borrow_mut() = Some(value);
    }

    fn cached(cache: &EvalCache, pass: u64) -> Option<Self> {
        match &*cache.mp.borrow() {
            Some((id, value)) if *id == pass => Some(value.clone()),
            _ => None,
        }
    }

    fn store_cached(cache: &EvalCache, pass: u64, value: &Self) {
        *cache.mp.borrow_mut() = Some((pass, value.clone()));
    }
}
