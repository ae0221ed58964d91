//! Shared helpers for unit tests.

use rug::ops::Pow;
use rug::{Complex, Float};

use crate::expr::Node;
use crate::precision::Precision;
use crate::types::{Dbl, Mpfr};

/// Digits used for arbitrary-precision comparisons.
pub(crate) const MP_DIGITS: u32 = 40;

const DBL_TOLERANCE: f64 = 1e-14;
/// Decimal digits of `MP_DIGITS` allowed to be lost to rounding.
const MPFR_GUARD_DIGITS: u32 = 10;
const AGREEMENT_TOLERANCE: f64 = 1e-12;

fn mp_bits() -> u32 {
    Precision::digits(MP_DIGITS).unwrap().bits()
}

pub(crate) fn dbl(re: &str, im: &str) -> Dbl {
    Dbl::new(re.parse().unwrap(), im.parse().unwrap())
}

pub(crate) fn mpfr(re: &str, im: &str) -> Mpfr {
    let bits = mp_bits();
    let read = |s: &str| Float::with_val(bits, Float::parse(s).unwrap());
    Complex::with_val(bits, (read(re), read(im)))
}

/// Assigns the same decimal value to a variable at both numeric types.
pub(crate) fn set_both(variable: &Node, re: &str, im: &str) {
    variable.set_current_value(dbl(re, im)).unwrap();
    variable.set_current_value(mpfr(re, im)).unwrap();
}

/// Relative comparison, absolute for values of magnitude below one.
pub(crate) fn assert_close_dbl(actual: Dbl, expected: Dbl) {
    let scale = expected.norm().max(1.0);
    assert!(
        (actual - expected).norm() <= DBL_TOLERANCE * scale,
        "{actual} differs from {expected}"
    );
}

/// Relative comparison at `MP_DIGITS - MPFR_GUARD_DIGITS` digits, absolute below one.
pub(crate) fn assert_close_mpfr(actual: &Mpfr, expected: &Mpfr) {
    let bits = mp_bits();
    let difference = Complex::with_val(bits, actual - expected);
    let distance = Float::with_val(bits, difference.abs_ref());
    let scale = Float::with_val(bits, expected.abs_ref()).max(&Float::with_val(bits, 1));
    let exponent = -i32::try_from(MP_DIGITS - MPFR_GUARD_DIGITS).unwrap();
    let tolerance = Float::with_val(bits, 10).pow(exponent);
    assert!(
        distance <= scale * tolerance,
        "{actual} differs from {expected}"
    );
}

/// Evaluates `f` at `MP_DIGITS` and compares against an exact expectation.
pub(crate) fn assert_mpfr(f: &Node, expected: &Mpfr) {
    let precision = Precision::digits(MP_DIGITS).unwrap();
    let actual = f.eval_at::<Mpfr>(precision).unwrap();
    assert_eq!(actual.prec().0, precision.bits(), "{f} lost its precision");
    assert_close_mpfr(&actual, expected);
}

/// Evaluates `f` at both numeric types and checks that the results agree.
pub(crate) fn assert_agree(f: &Node) {
    let precision = Precision::digits(MP_DIGITS).unwrap();
    let d = f.eval::<Dbl>().unwrap();
    let m = f.eval_at::<Mpfr>(precision).unwrap();
    let m = Dbl::new(m.real().to_f64(), m.imag().to_f64());
    let scale = m.norm().max(1.0);
    assert!(
        (d - m).norm() <= AGREEMENT_TOLERANCE * scale,
        "{f}: dbl {d} and mpfr {m} disagree"
    );
}
