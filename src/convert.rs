//! Conversion module for transforming evalexpr AST nodes into function trees.
//!
//! This module maps the operator tree produced by the evalexpr parser onto the factory
//! layer, so every canonicalization applies to parsed input exactly as it does to trees
//! built by hand. Variables are looked up by name in a map of already created variable
//! nodes, which lets several expressions share the same variables.
//!
//! The reserved names `pi`/`Pi`, `E` and `I` denote the special constants and are never
//! treated as variables.

use std::collections::HashMap;

use evalexpr::{Operator, Value};

use crate::errors::ConvertError;
use crate::expr::Node;
use crate::operators::functions::UnaryFunction;

/// Special constant for a reserved identifier.
pub(crate) fn reserved_constant(identifier: &str) -> Option<Node> {
    match identifier {
        "pi" | "Pi" => Some(Node::pi()),
        "E" => Some(Node::e()),
        "I" => Some(Node::i()),
        _ => None,
    }
}

/// Converts an evalexpr AST node into a function tree.
///
/// # Arguments
/// * `node` - The evalexpr AST node to convert
/// * `variables` - The variable node to use for each identifier
///
/// # Returns
/// * `Result<Node, ConvertError>` - The converted tree or an error if conversion fails
///
/// # Supported syntax
/// * Arithmetic: `+`, `-`, `*`, `/`, unary `-`
/// * Exponentiation `a^b`; integer literal exponents give integer powers
/// * Integer and float literals
/// * Functions: `sin`, `cos`, `tan`, `asin`, `acos`, `atan`, `exp`, `log`/`ln`, `sqrt`
pub fn build_node(
    node: &evalexpr::Node,
    variables: &HashMap<String, Node>,
) -> Result<Node, ConvertError> {
    match node.operator() {
        Operator::Add => {
            let (first, rest) = split_first(node)?;
            rest.iter()
                .try_fold(build_node(first, variables)?, |acc, child| {
                    Ok(acc + build_node(child, variables)?)
                })
        }
        Operator::Mul => {
            let (first, rest) = split_first(node)?;
            rest.iter()
                .try_fold(build_node(first, variables)?, |acc, child| {
                    Ok(acc * build_node(child, variables)?)
                })
        }
        Operator::Sub => {
            let [lhs, rhs] = binary(node)?;
            Ok(build_node(lhs, variables)? - build_node(rhs, variables)?)
        }
        Operator::Div => {
            let [lhs, rhs] = binary(node)?;
            Ok(build_node(lhs, variables)? / build_node(rhs, variables)?)
        }
        Operator::Exp => {
            let [base, exponent] = binary(node)?;
            Ok(build_node(base, variables)?.pow(&build_node(exponent, variables)?))
        }
        Operator::Neg => {
            let [child] = unary(node)?;
            Ok(-build_node(child, variables)?)
        }
        Operator::Const { value } => match value {
            Value::Int(i) => Ok(Node::integer(*i)),
            Value::Float(f) => Ok(Node::from_f64(*f)?),
            _ => Err(ConvertError::ConstOperator(format!("{value:?}"))),
        },
        Operator::VariableIdentifierRead { identifier } => {
            if let Some(constant) = reserved_constant(identifier) {
                return Ok(constant);
            }
            variables
                .get(identifier.as_str())
                .cloned()
                .ok_or_else(|| ConvertError::VariableNotFound(identifier.to_string()))
        }
        Operator::FunctionIdentifier { identifier } => {
            let function = UnaryFunction::from_name(identifier)
                .ok_or_else(|| ConvertError::UnsupportedFunction(identifier.to_string()))?;
            let [argument] = unary(node)?;
            Ok(build_node(argument, variables)?.apply(function))
        }
        Operator::RootNode => {
            let children = node.children();
            if children.len() == 1 {
                build_node(&children[0], variables)
            } else {
                Err(ConvertError::RootNode(format!("{children:?}")))
            }
        }
        other => Err(ConvertError::UnsupportedOperator(format!("{other:?}"))),
    }
}

fn split_first(node: &evalexpr::Node) -> Result<(&evalexpr::Node, &[evalexpr::Node]), ConvertError> {
    node.children()
        .split_first()
        .ok_or_else(|| ConvertError::Arity(format!("{:?} without operands", node.operator())))
}

fn binary(node: &evalexpr::Node) -> Result<[&evalexpr::Node; 2], ConvertError> {
    match node.children() {
        [lhs, rhs] => Ok([lhs, rhs]),
        children => Err(ConvertError::Arity(format!(
            "{:?} expects 2 operands, got {}",
            node.operator(),
            children.len()
        ))),
    }
}

fn unary(node: &evalexpr::Node) -> Result<[&evalexpr::Node; 1], ConvertError> {
    match node.children() {
        [child] => Ok([child]),
        children => Err(ConvertError::Arity(format!(
            "{:?} expects 1 operand, got {}",
            node.operator(),
            children.len()
        ))),
    }
}
