//! Working precision for arbitrary-precision evaluation.
//!
//! Every evaluation at [`Mpfr`](crate::types::Mpfr) runs at a working precision given in
//! decimal digits. Callers either name it explicitly or fall back to the per-thread default,
//! which starts out at [`DEFAULT_DIGITS`]. Invalid explicit requests fail fast.

use std::cell::Cell;

use crate::errors::PrecisionError;

/// Digits used when no working precision has been established.
pub const DEFAULT_DIGITS: u32 = 50;

/// Largest accepted precision in decimal digits.
pub const MAX_DIGITS: u32 = 1_000_000;

const LOG2_10: f64 = std::f64::consts::LOG2_10;

thread_local! {
    static WORKING_DIGITS: Cell<u32> = const { Cell::new(DEFAULT_DIGITS) };
}

/// A working precision in decimal digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Precision {
    digits: u32,
}

impl Precision {
    /// Creates a precision of `digits` decimal digits.
    ///
    /// # Errors
    /// Returns `PrecisionError::OutOfRange` unless `1 <= digits <= MAX_DIGITS`.
    pub fn digits(digits: u32) -> Result<Self, PrecisionError> {
        if digits == 0 || digits > MAX_DIGITS {
            return Err(PrecisionError::OutOfRange {
                digits,
                max: MAX_DIGITS,
            });
        }
        Ok(Self { digits })
    }

    /// The per-thread working default.
    pub fn current() -> Self {
        Self {
            digits: WORKING_DIGITS.with(Cell::get),
        }
    }

    /// Number of decimal digits.
    pub fn decimal_digits(&self) -> u32 {
        self.digits
    }

    /// Binary precision handed to MPFR, `ceil(digits * log2(10))`.
    pub fn bits(&self) -> u32 {
        (f64::from(self.digits) * LOG2_10).ceil() as u32
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::current()
    }
}

/// Sets the working default precision of the calling thread.
///
/// # Errors
/// Returns `PrecisionError::OutOfRange` for an invalid number of digits; the previous
/// default stays in effect.
pub fn set_default_precision(digits: u32) -> Result<(), PrecisionError> {
    let precision = Precision::digits(digits)?;
    WORKING_DIGITS.with(|cell| cell.set(precision.digits));
    Ok(())
}

/// Returns the working default precision of the calling thread.
pub fn default_precision() -> Precision {
    Precision::current()
}
