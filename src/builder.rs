//! Factory layer: the public way to build nodes.
//!
//! Leaves are created from names and decimal literals, interior nodes through the
//! arithmetic operators on [`Node`] and the methods defined here. Every interior node
//! goes through the canonicalizing constructors in `operators`, which flatten sums and
//! products, fold negations, detect integer exponents and merge same-base powers on
//! multiplication.
//!
//! # Example
//! ```
//! # use function_tree::prelude::*;
//! let x = Node::variable("x");
//! let y = Node::variable("y");
//!
//! // (x + y) * x^2 - 3
//! let f = (&x + &y) * x.powi(2) - Node::integer(3);
//! assert_eq!(f.degree(), 3);
//! ```

use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::errors::ConstructionError;
use crate::expr::{Differential, Factor, Node, NodeKind, Number, SpecialConstant, Term, Variable};
use crate::literal;
use crate::operators::functions::{self, UnaryFunction};
use crate::operators::{negate, power, product, sum};

impl Node {
    /// Creates a new variable.
    ///
    /// Every call creates a distinct variable, even for a name that is already in use.
    pub fn variable(name: impl Into<String>) -> Node {
        Node::from_kind(NodeKind::Variable(Variable::new(name)))
    }

    /// Creates a complex number from decimal literals for the real and imaginary parts.
    ///
    /// # Errors
    /// Returns `ConstructionError::InvalidLiteral` if either part is not a plain decimal
    /// number.
    pub fn number(real: &str, imag: &str) -> Result<Node, ConstructionError> {
        Ok(Node::from_kind(NodeKind::Number(Number::new(real, imag)?)))
    }

    /// Creates a real number from a decimal literal.
    pub fn real(real: &str) -> Result<Node, ConstructionError> {
        Self::number(real, "0")
    }

    pub fn integer(value: i64) -> Node {
        Node::from_kind(NodeKind::Number(Number::from_integer(value)))
    }

    /// Creates a real number from the shortest decimal literal that reads back as `value`.
    ///
    /// # Errors
    /// Returns `ConstructionError::InvalidLiteral` for infinities and NaN.
    pub fn from_f64(value: f64) -> Result<Node, ConstructionError> {
        Self::real(&literal::from_f64(value)?)
    }

    pub fn pi() -> Node {
        Node::from_kind(NodeKind::Special(SpecialConstant::Pi))
    }

    pub fn e() -> Node {
        Node::from_kind(NodeKind::Special(SpecialConstant::E))
    }

    /// The imaginary unit.
    pub fn i() -> Node {
        Node::from_kind(NodeKind::Special(SpecialConstant::I))
    }

    /// Creates the differential `d<name>` of a variable.
    ///
    /// # Errors
    /// Returns `ConstructionError::NotAVariable` for any other kind of node.
    pub fn differential(variable: &Node) -> Result<Node, ConstructionError> {
        let name = variable
            .as_variable()
            .map(|v| format!("d{}", v.name()))
            .ok_or_else(|| ConstructionError::NotAVariable(variable.to_string()))?;
        Ok(Node::from_kind(NodeKind::Differential(Differential::new(
            variable.clone(),
            name,
        ))))
    }

    /// Builds a sum from signed terms. Nested sums and negations are absorbed.
    pub fn sum(terms: impl IntoIterator<Item = Term>) -> Node {
        sum::sum(terms)
    }

    /// Builds a product from factors. Nested products are absorbed; bases are not merged.
    pub fn product(factors: impl IntoIterator<Item = Factor>) -> Node {
        product::product(factors)
    }

    /// Raises this node to `exponent`.
    ///
    /// An exponent that is a number literal with an exact integer value gives an integer
    /// power, anything else a general power.
    pub fn pow(&self, exponent: &Node) -> Node {
        power::pow(self, exponent)
    }

    /// Raises this node to a real exponent given as a double.
    pub fn pow_f64(&self, exponent: f64) -> Result<Node, ConstructionError> {
        Ok(self.pow(&Node::from_f64(exponent)?))
    }

    pub fn powi(&self, exponent: i64) -> Node {
        power::powi(self, exponent)
    }

    /// Raises this node to an integer literal.
    ///
    /// # Errors
    /// Returns `ConstructionError::NonIntegerExponent` unless `exponent` is a number literal
    /// with an exact integer value.
    pub fn integer_power(&self, exponent: &Node) -> Result<Node, ConstructionError> {
        power::integer_power(self, exponent)
    }

    pub fn apply(&self, function: UnaryFunction) -> Node {
        functions::apply(function, self)
    }

    pub fn sin(&self) -> Node {
        self.apply(UnaryFunction::Sin)
    }

    pub fn cos(&self) -> Node {
        self.apply(UnaryFunction::Cos)
    }

    pub fn tan(&self) -> Node {
        self.apply(UnaryFunction::Tan)
    }

    pub fn asin(&self) -> Node {
        self.apply(UnaryFunction::Asin)
    }

    pub fn acos(&self) -> Node {
        self.apply(UnaryFunction::Acos)
    }

    pub fn atan(&self) -> Node {
        self.apply(UnaryFunction::Atan)
    }

    pub fn exp(&self) -> Node {
        self.apply(UnaryFunction::Exp)
    }

    /// Natural logarithm.
    pub fn log(&self) -> Node {
        self.apply(UnaryFunction::Log)
    }

    pub fn sqrt(&self) -> Node {
        self.apply(UnaryFunction::Sqrt)
    }
}

macro_rules! impl_binary_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $build:path) => {
        impl $op<&Node> for &Node {
            type Output = Node;

            fn $method(self, rhs: &Node) -> Node {
                $build(self, rhs)
            }
        }

        impl $op<Node> for &Node {
            type Output = Node;

            fn $method(self, rhs: Node) -> Node {
                $build(self, &rhs)
            }
        }

        impl $op<&Node> for Node {
            type Output = Node;

            fn $method(self, rhs: &Node) -> Node {
                $build(&self, rhs)
            }
        }

        impl $op<Node> for Node {
            type Output = Node;

            fn $method(self, rhs: Node) -> Node {
                $build(&self, &rhs)
            }
        }

        impl $op_assign<&Node> for Node {
            fn $method_assign(&mut self, rhs: &Node) {
                *self = $build(self, rhs);
            }
        }

        impl $op_assign<Node> for Node {
            fn $method_assign(&mut self, rhs: Node) {
                *self = $build(self, &rhs);
            }
        }
    };
}

impl_binary_op!(Add, add, AddAssign, add_assign, sum::add);
impl_binary_op!(Sub, sub, SubAssign, sub_assign, sum::sub);
impl_binary_op!(Mul, mul, MulAssign, mul_assign, product::mul);
impl_binary_op!(Div, div, DivAssign, div_assign, product::div);

impl Neg for &Node {
    type Output = Node;

    fn neg(self) -> Node {
        negate::negate(self)
    }
}

impl Neg for Node {
    type Output = Node;

    fn neg(self) -> Node {
        negate::negate(&self)
    }
}
