//! Cached evaluation of function trees at either numeric type.
//!
//! Evaluation walks the graph recursively and combines child values according to the node
//! variant. Interior nodes remember the last value they computed for each numeric type
//! together with the id of the [`EvalPass`] it belongs to; a shared subtree is therefore
//! computed once per pass no matter how many parents reach it. Leaves are never cached.
//!
//! A pass is only valid while the variable values it was started with are in effect.
//! `Node::eval` and `Node::eval_at` start a fresh pass on every call. Callers that share
//! one pass across several roots via `Node::eval_in` must start a new one after changing
//! any variable.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};

use log::trace;

use crate::errors::EvalError;
use crate::expr::{Node, NodeKind, SpecialConstant};
use crate::numeric::Numeric;
use crate::operators::{power, product, sum};
use crate::precision::Precision;
use crate::types::{Dbl, Mpfr};

static NEXT_PASS_ID: AtomicU64 = AtomicU64::new(1);

/// One logical evaluation, the unit of cache validity.
///
/// Pass ids are drawn from a process-wide ticket and never reused, so a cache entry
/// written by an older pass can never be mistaken for a current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalPass {
    id: u64,
    precision: Precision,
}

impl EvalPass {
    /// Starts a pass at the working default precision of the calling thread.
    pub fn new() -> Self {
        Self::with_precision(Precision::current())
    }

    /// Starts a pass at an explicit precision.
    pub fn with_precision(precision: Precision) -> Self {
        let id = NEXT_PASS_ID.fetch_add(1, Ordering::Relaxed);
        trace!(
            "starting evaluation pass {id} at {} digits",
            precision.decimal_digits()
        );
        Self { id, precision }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}

impl Default for EvalPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-node cache slots, one per numeric type.
#[doc(hidden)]
#[derive(Debug, Default)]
pub struct EvalCache {
    pub(crate) dbl: Cell<Option<(u64, Dbl)>>,
    pub(crate) mp: RefCell<Option<(u64, Mpfr)>>,
}

impl Node {
    /// Evaluates the tree in a new pass at the working default precision.
    ///
    /// # Errors
    /// Returns an `EvalError` if a reachable variable has no value of type `T`, a divisor
    /// is exactly zero, or a function is evaluated outside its domain.
    ///
    /// # Example
    /// ```
    /// # use function_tree::prelude::*;
    /// let x = Node::variable("x");
    /// let f = &x * &x + Node::integer(1);
    /// x.set_current_value(Dbl::new(0.0, 1.0)).unwrap();
    /// assert_eq!(f.eval::<Dbl>().unwrap(), Dbl::new(0.0, 0.0));
    /// ```
    pub fn eval<T: Numeric>(&self) -> Result<T, EvalError> {
        self.eval_in(&EvalPass::new())
    }

    /// Evaluates the tree in a new pass at `precision`.
    ///
    /// The precision only affects `Mpfr` evaluation.
    pub fn eval_at<T: Numeric>(&self, precision: Precision) -> Result<T, EvalError> {
        self.eval_in(&EvalPass::with_precision(precision))
    }

    /// Evaluates the tree within an existing pass, reusing values cached during it.
    pub fn eval_in<T: Numeric>(&self, pass: &EvalPass) -> Result<T, EvalError> {
        if self.is_leaf() {
            return self.compute(pass);
        }
        if let Some(value) = T::cached(self.cache(), pass.id) {
            return Ok(value);
        }
        let value = self.compute::<T>(pass)?;
        T::store_cached(self.cache(), pass.id, &value);
        Ok(value)
    }

    fn compute<T: Numeric>(&self, pass: &EvalPass) -> Result<T, EvalError> {
        let precision = pass.precision;
        match self.kind() {
            NodeKind::Variable(variable) => T::current_value(variable)
                .map(|value| value.at_precision(precision))
                .ok_or_else(|| EvalError::UnassignedVariable {
                    name: variable.name().to_string(),
                    numeric: T::NAME,
                }),
            NodeKind::Number(number) => T::from_literal(number, precision),
            NodeKind::Special(constant) => Ok(match constant {
                SpecialConstant::Pi => T::pi(precision),
                SpecialConstant::E => T::e(precision),
                SpecialConstant::I => T::imaginary_unit(precision),
            }),
            NodeKind::Differential(differential) => {
                Err(EvalError::Differential(differential.name().to_string()))
            }
            NodeKind::Sum(terms) => sum::eval(terms, pass),
            NodeKind::Product(factors) => product::eval(factors, pass),
            NodeKind::IntegerPower { base, exponent } => {
                power::eval_integer_power(&base.eval_in::<T>(pass)?, *exponent, precision)
            }
            NodeKind::Power { base, exponent } => power::eval_power(
                &base.eval_in::<T>(pass)?,
                &exponent.eval_in::<T>(pass)?,
                precision,
            ),
            NodeKind::Negate(child) => Ok(child.eval_in::<T>(pass)?.neg()),
            NodeKind::Function(function, child) => function.apply(&child.eval_in::<T>(pass)?),
        }
    }
}
