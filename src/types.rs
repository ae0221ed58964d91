/// Type alias for the fixed double-precision complex value type.
///
/// Evaluating at `Dbl` uses native `f64` arithmetic for both the real and the imaginary part.
pub type Dbl = num_complex::Complex64;

/// Type alias for the arbitrary-precision complex value type.
///
/// Values are computed at the working precision of the evaluation pass, see
/// [`Precision`](crate::precision::Precision).
pub type Mpfr = rug::Complex;

/// Sentinel returned by the degree queries for "not a polynomial".
pub const NOT_POLYNOMIAL: i32 = -1;
