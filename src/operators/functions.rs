//! Transcendental functions of a single argument.

use crate::errors::EvalError;
use crate::expr::{Node, NodeKind};
use crate::numeric::Numeric;

/// The unary functions a node can apply to its child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryFunction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Exp,
    Log,
    Sqrt,
}

impl UnaryFunction {
    pub const ALL: [UnaryFunction; 9] = [
        UnaryFunction::Sin,
        UnaryFunction::Cos,
        UnaryFunction::Tan,
        UnaryFunction::Asin,
        UnaryFunction::Acos,
        UnaryFunction::Atan,
        UnaryFunction::Exp,
        UnaryFunction::Log,
        UnaryFunction::Sqrt,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnaryFunction::Sin => "sin",
            UnaryFunction::Cos => "cos",
            UnaryFunction::Tan => "tan",
            UnaryFunction::Asin => "asin",
            UnaryFunction::Acos => "acos",
            UnaryFunction::Atan => "atan",
            UnaryFunction::Exp => "exp",
            UnaryFunction::Log => "log",
            UnaryFunction::Sqrt => "sqrt",
        }
    }

    /// Looks a function up by name; `ln` is accepted for `log`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ln" => Some(UnaryFunction::Log),
            _ => Self::ALL.into_iter().find(|f| f.name() == name),
        }
    }

    /// Evaluates the function on the principal branch.
    ///
    /// # Errors
    /// `log(0)` and `atan(±i)` are domain errors for both numeric types. Other non-finite
    /// results are domain errors at `Mpfr` and propagate as infinities or NaN at `Dbl`.
    pub(crate) fn apply<T: Numeric>(self, argument: &T) -> Result<T, EvalError> {
        let singular = match self {
            UnaryFunction::Log => argument.is_zero(),
            UnaryFunction::Atan => argument.is_plus_minus_i(),
            _ => false,
        };
        if singular {
            return Err(EvalError::Domain {
                function: self.name(),
                argument: argument.to_string(),
            });
        }

        let value = match self {
            UnaryFunction::Sin => argument.sin(),
            UnaryFunction::Cos => argument.cos(),
            UnaryFunction::Tan => argument.tan(),
            UnaryFunction::Asin => argument.asin(),
            UnaryFunction::Acos => argument.acos(),
            UnaryFunction::Atan => argument.atan(),
            UnaryFunction::Exp => argument.exp(),
            UnaryFunction::Log => argument.ln(),
            UnaryFunction::Sqrt => argument.sqrt(),
        };
        value.finite_or_domain(self.name(), argument)
    }
}

pub(crate) fn apply(function: UnaryFunction, argument: &Node) -> Node {
    Node::from_kind(NodeKind::Function(function, argument.clone()))
}
