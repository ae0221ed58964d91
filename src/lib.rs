//! Function trees: complex-valued expression graphs for numerical algebraic geometry.
//!
//! This crate represents multivariate functions (polynomials and transcendental
//! expressions) as graphs of shared, immutable nodes, evaluates them at double or
//! arbitrary precision, and analyzes their algebraic structure: total and per-variable
//! degree, polynomiality and homogeneity. Expression strings are parsed with the
//! [evalexpr](https://github.com/ISibboI/evalexpr) crate.
//!
//! # Features
//!
//! - Construction through a canonicalizing factory layer (flattened sums and products,
//!   integer exponent detection, same-base power combination)
//! - Cached evaluation at `Dbl` (`num_complex::Complex64`) and `Mpfr` (`rug::Complex`)
//! - Syntactic degree analysis for choosing solver strategies
//! - Functions and systems over shared variables
//!
//! # Example
//!
//! ```rust
//! use function_tree::prelude::*;
//!
//! let x = Node::variable("x");
//! let y = Node::variable("y");
//! let f = x.powi(2) * &y - Node::pi() * &y;
//!
//! assert_eq!(f.degree(), 3);
//! assert_eq!(f.degree_wrt(&y), 1);
//!
//! x.set_current_value(Dbl::new(1.0, 0.0)).unwrap();
//! y.set_current_value(Dbl::new(2.0, 0.0)).unwrap();
//! let value: Dbl = f.eval().unwrap();
//! assert!((value.re - (2.0 - 2.0 * std::f64::consts::PI)).abs() < 1e-14);
//! ```

pub use function::Function;
pub use system::System;

pub mod prelude {
    pub use crate::errors::{ConstructionError, EvalError, FunctionError};
    pub use crate::eval::EvalPass;
    pub use crate::expr::{Factor, Node, NodeKind, Sign, Term};
    pub use crate::function::Function;
    pub use crate::numeric::Numeric;
    pub use crate::operators::functions::UnaryFunction;
    pub use crate::precision::{set_default_precision, Precision};
    pub use crate::system::System;
    pub use crate::types::{Dbl, Mpfr, NOT_POLYNOMIAL};
}

/// Factory layer and arithmetic operators
pub mod builder;
/// Conversion from parsed expressions to function trees
pub mod convert;
/// Degree and polynomiality analysis
pub mod degree;
/// Error types for the various failure modes
pub mod errors;
/// Evaluation passes and cached evaluation
pub mod eval;
/// Node representation
pub mod expr;
/// Named root functions
pub mod function;
mod literal;
/// Numeric value types
pub mod numeric;
/// Working precision for arbitrary-precision evaluation
pub mod precision;
/// System of functions
pub mod system;
pub mod types;
/// Operator constructors and their evaluation
pub mod operators {
    pub mod functions;
    pub(crate) mod negate;
    pub(crate) mod power;
    pub(crate) mod product;
    pub(crate) mod sum;
}

#[cfg(test)]
mod test_support;
