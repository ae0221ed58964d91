//! Error types for the function-tree crate.
//!
//! This module defines the failure modes of the different stages of working with
//! function trees. The main error types are:
//!
//! - `ConstructionError`: Invalid leaves or exponents rejected by the factory layer
//! - `EvalError`: Failures while evaluating a tree at one of the numeric types
//! - `PrecisionError`: Invalid working precision requests
//! - `ConvertError`: Errors during conversion from evalexpr AST to function trees
//! - `FunctionError`: High-level errors when working with functions and systems
//!
//! Each error type implements the standard Error trait and provides detailed error messages.

use evalexpr::{DefaultNumericTypes, EvalexprError};
use thiserror::Error;

/// Errors raised by the factory layer while building nodes.
///
/// A construction error never reaches evaluation: the offending node is simply not built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// A number literal that is not a valid decimal string
    #[error("invalid decimal literal: {0:?}")]
    InvalidLiteral(String),
    /// The integer-power constructor was handed an exponent that is not an integer literal
    #[error("exponent is not an integer literal: {0}")]
    NonIntegerExponent(String),
    /// A variable was required (differential, value assignment) but another node was given
    #[error("expected a variable, got {0}")]
    NotAVariable(String),
    /// Two variables of one function or system share a name
    #[error("variable '{0}' is listed more than once")]
    DuplicateVariable(String),
}

/// Errors that can occur while evaluating a function tree.
///
/// All variants are reported to the immediate caller and are never retried internally,
/// since evaluating the same tree with the same inputs again cannot succeed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A reachable variable has no current value of the requested numeric type
    #[error("variable '{name}' has no current value of type {numeric}")]
    UnassignedVariable { name: String, numeric: &'static str },
    /// A divisor evaluated to exactly zero
    #[error("division by zero")]
    DivisionByZero,
    /// A function was evaluated outside of its domain
    #[error("{function} is undefined at {argument}")]
    Domain {
        function: &'static str,
        argument: String,
    },
    /// A literal cannot be represented by the requested numeric type
    #[error("literal {literal} is out of range for {numeric}")]
    OutOfRange {
        literal: String,
        numeric: &'static str,
    },
    /// Differentials are consumed by differentiation and carry no value of their own
    #[error("differential '{0}' cannot be evaluated directly")]
    Differential(String),
}

/// Errors for invalid working precision requests.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecisionError {
    /// The requested number of decimal digits is zero or too large
    #[error("precision of {digits} digits is out of range (1..={max})")]
    OutOfRange { digits: u32, max: u32 },
}

/// Errors that can occur during conversion from evalexpr AST to function trees.
///
/// This enum represents various failure modes when converting the evalexpr expression tree
/// into nodes built through the factory layer.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Error when encountering an operator that is not supported by our implementation
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    /// Error when encountering a function that is not supported by our implementation
    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),
    /// Error when a node does not have the expected number of children
    #[error("Unexpected number of children: {0}")]
    Arity(String),
    /// Error when the root node does not have exactly one child
    #[error("Expected single child for root node: {0}")]
    RootNode(String),
    /// Error when a constant value is not numeric
    #[error("Expected numeric constant: {0}")]
    ConstOperator(String),
    /// Error when a variable is not found in the variable map
    #[error("Variable not found: {0}")]
    VariableNotFound(String),
    /// Error when the factory layer rejects a node
    #[error("Failed to construct node")]
    Construction(#[from] ConstructionError),
}

/// High-level errors that can occur when working with functions and systems.
///
/// This enum wraps the lower-level errors from parsing, conversion and evaluation.
#[derive(Debug, Error)]
pub enum FunctionError {
    /// Error when parsing the initial expression string with evalexpr
    #[error("Failed to build Evalexpr AST")]
    BuildEvalexprError(#[from] EvalexprError<DefaultNumericTypes>),
    /// Error when converting from evalexpr AST to a function tree
    #[error("Failed to build function tree")]
    Convert(#[from] ConvertError),
    /// Error when a node handed to a function or system is rejected
    #[error("Invalid node")]
    Construction(#[from] ConstructionError),
    /// Error when evaluating the function tree
    #[error("Failed to evaluate function tree")]
    Eval(#[from] EvalError),
    /// Error when the input length is not the same as the number of variables
    #[error("Invalid input length: expected {expected}, got {got}")]
    InvalidInputLength { expected: usize, got: usize },
    /// Error when a variable is not found in the function
    #[error("Variable not found in function: {0}")]
    VariableNotFound(String),
}
