//! Named root functions over an ordered list of variables.
//!
//! This module provides the `Function` type, which pairs the root node of a function tree
//! with the variables it is a function of. The variable order fixes the meaning of value
//! slices passed to `set_values` and `eval_at`.
//!
//! # Example
//!
//! ```
//! use function_tree::prelude::*;
//!
//! let f = Function::new("2*x + y^2".to_string()).unwrap();
//! let value: Dbl = f.eval_at(&[Dbl::new(1.0, 0.0), Dbl::new(2.0, 0.0)]).unwrap();
//! assert_eq!(value, Dbl::new(6.0, 0.0));
//! assert_eq!(f.degree(), 2);
//! ```
//!
//! # Variable Handling
//!
//! Variables can be specified either:
//! - Automatically extracted and sorted alphabetically using `new()`
//! - Explicitly by name using `from_var_names()`
//! - As existing variable nodes using `from_variables()`, which lets several functions
//!   share the same variables

use std::collections::{BTreeSet, HashMap};

use colored::Colorize;
use evalexpr::{build_operator_tree, DefaultNumericTypes, Operator};
use itertools::Itertools;

use crate::convert::{build_node, reserved_constant};
use crate::errors::{ConstructionError, FunctionError};
use crate::eval::EvalPass;
use crate::expr::Node;
use crate::numeric::Numeric;
use crate::precision::Precision;

/// A function tree together with its ordered variables.
#[derive(Clone)]
pub struct Function {
    expression: String,
    root: Node,
    variables: Vec<Node>,
    var_map: HashMap<String, usize>,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{{")?;
        writeln!(f, "    {}: {}", "Function".cyan(), self.expression)?;
        writeln!(f, "    {}: {}", "Tree".cyan(), self.root)?;
        writeln!(f, "    {}: {:?}", "Variables".cyan(), self.variable_names())?;
        writeln!(f, "    {}: {}", "Degree".cyan(), self.degree())?;
        writeln!(f, "}}")
    }
}

impl std::fmt::Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({}) = {}",
            "f".cyan(),
            self.variable_names().iter().join(", "),
            self.expression
        )
    }
}

impl Function {
    /// Parses a function from a string.
    ///
    /// The variables are extracted from the expression and sorted alphabetically; value
    /// slices are expected in that order.
    pub fn new(expression: String) -> Result<Self, FunctionError> {
        let tree = build_operator_tree::<DefaultNumericTypes>(&expression)?;
        let names = extract_symbols(&tree);
        let variables: Vec<Node> = names.iter().map(Node::variable).collect();
        Self::build(expression, &tree, variables)
    }

    /// Parses a function with an explicit variable order.
    ///
    /// # Errors
    /// Returns `FunctionError::VariableNotFound` if the expression uses a name that is not
    /// listed.
    pub fn from_var_names(expression: String, names: &[&str]) -> Result<Self, FunctionError> {
        let variables: Vec<Node> = names.iter().map(|name| Node::variable(*name)).collect();
        Self::from_variables(expression, &variables)
    }

    /// Parses a function over existing variable nodes, matched by name.
    pub fn from_variables(expression: String, variables: &[Node]) -> Result<Self, FunctionError> {
        let tree = build_operator_tree::<DefaultNumericTypes>(&expression)?;
        Self::build(expression, &tree, variables.to_vec())
    }

    /// Wraps an already built tree.
    ///
    /// # Errors
    /// Returns `FunctionError::Construction` if one of `variables` is not a variable node.
    pub fn from_node(root: Node, variables: Vec<Node>) -> Result<Self, FunctionError> {
        let var_map = index_variables(&variables)?;
        Ok(Self {
            expression: root.to_string(),
            root,
            variables,
            var_map,
        })
    }

    fn build(
        expression: String,
        tree: &evalexpr::Node,
        variables: Vec<Node>,
    ) -> Result<Self, FunctionError> {
        let var_map = index_variables(&variables)?;

        let undefined: Vec<String> = extract_symbols(tree)
            .into_iter()
            .filter(|name| !var_map.contains_key(name))
            .collect();
        if !undefined.is_empty() {
            return Err(FunctionError::VariableNotFound(undefined.join(", ")));
        }

        let by_name: HashMap<String, Node> = var_map
            .iter()
            .map(|(name, &index)| (name.clone(), variables[index].clone()))
            .collect();
        let root = build_node(tree, &by_name)?;

        Ok(Self {
            expression,
            root,
            variables,
            var_map,
        })
    }

    /// Assigns the current values of all variables, in variable order.
    ///
    /// # Errors
    /// Returns `FunctionError::InvalidInputLength` if the number of values does not match
    /// the number of variables.
    pub fn set_values<T: Numeric>(&self, values: &[T]) -> Result<(), FunctionError> {
        self.validate_input_length(values.len())?;
        for (variable, value) in self.variables.iter().zip(values) {
            variable.set_current_value(value.clone())?;
        }
        Ok(())
    }

    /// Evaluates at the current variable values, in a new pass.
    pub fn eval<T: Numeric>(&self) -> Result<T, FunctionError> {
        Ok(self.root.eval::<T>()?)
    }

    /// Assigns `values` and evaluates.
    pub fn eval_at<T: Numeric>(&self, values: &[T]) -> Result<T, FunctionError> {
        self.set_values(values)?;
        self.eval()
    }

    /// Assigns `values` and evaluates at an explicit precision.
    pub fn eval_with_precision<T: Numeric>(
        &self,
        values: &[T],
        precision: Precision,
    ) -> Result<T, FunctionError> {
        self.set_values(values)?;
        Ok(self.root.eval_at::<T>(precision)?)
    }

    /// Evaluates within an existing pass.
    pub fn eval_in<T: Numeric>(&self, pass: &EvalPass) -> Result<T, FunctionError> {
        Ok(self.root.eval_in::<T>(pass)?)
    }

    pub fn degree(&self) -> i32 {
        self.root.degree()
    }

    /// Degree in the variable called `name`.
    pub fn degree_wrt(&self, name: &str) -> Result<i32, FunctionError> {
        let variable = self
            .variable(name)
            .ok_or_else(|| FunctionError::VariableNotFound(name.to_string()))?;
        Ok(self.root.degree_wrt(variable))
    }

    /// Degree in each variable, in variable order.
    pub fn multidegree(&self) -> Vec<i32> {
        self.root.multidegree(&self.variables)
    }

    pub fn is_polynomial(&self) -> bool {
        self.root.is_polynomial()
    }

    pub fn is_homogeneous(&self) -> bool {
        self.root.is_homogeneous()
    }

    /// Returns the expression the function was built from.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the variables in order.
    pub fn variables(&self) -> &[Node] {
        &self.variables
    }

    /// Looks a variable up by name.
    pub fn variable(&self, name: &str) -> Option<&Node> {
        self.var_map.get(name).map(|&index| &self.variables[index])
    }

    /// Returns the variable names in order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter_map(|v| v.as_variable().map(|v| v.name()))
            .collect()
    }

    fn validate_input_length(&self, got: usize) -> Result<(), FunctionError> {
        if got != self.variables.len() {
            return Err(FunctionError::InvalidInputLength {
                expected: self.variables.len(),
                got,
            });
        }
        Ok(())
    }
}

/// Maps variable names to their position.
///
/// Names must be unique; two variable nodes with the same name are rejected.
pub(crate) fn index_variables(
    variables: &[Node],
) -> Result<HashMap<String, usize>, ConstructionError> {
    let mut var_map = HashMap::with_capacity(variables.len());
    for (index, node) in variables.iter().enumerate() {
        let variable = node
            .as_variable()
            .ok_or_else(|| ConstructionError::NotAVariable(node.to_string()))?;
        if var_map.insert(variable.name().to_string(), index).is_some() {
            return Err(ConstructionError::DuplicateVariable(
                variable.name().to_string(),
            ));
        }
    }
    Ok(var_map)
}

/// Extracts the variable names of an expression tree, sorted and without duplicates.
///
/// Reserved constant names such as `pi` are not variables.
pub fn extract_symbols(node: &evalexpr::Node) -> Vec<String> {
    let mut symbols = BTreeSet::new();
    extract_symbols_from_node(node, &mut symbols);
    symbols.into_iter().collect()
}

/// Extracts and sorts all unique variables from a collection of expression strings.
///
/// # Errors
/// Returns `FunctionError::BuildEvalexprError` if any expression fails to parse.
///
/// # Example
/// ```
/// # use function_tree::function::extract_all_symbols;
/// let expressions = vec!["2*x + y".to_string(), "z + x^2".to_string()];
/// let variables = extract_all_symbols(&expressions).unwrap();
/// assert_eq!(variables, vec!["x".to_string(), "y".to_string(), "z".to_string()]);
/// ```
pub fn extract_all_symbols(expressions: &[String]) -> Result<Vec<String>, FunctionError> {
    let mut symbols = BTreeSet::new();
    for expression in expressions {
        let tree = build_operator_tree::<DefaultNumericTypes>(expression)?;
        extract_symbols_from_node(&tree, &mut symbols);
    }
    Ok(symbols.into_iter().collect())
}

fn extract_symbols_from_node(node: &evalexpr::Node, symbols: &mut BTreeSet<String>) {
    match node.operator() {
        Operator::VariableIdentifierRead { identifier } => {
            if reserved_constant(identifier).is_none() {
                symbols.insert(identifier.to_string());
            }
        }
        _ => {
            for child in node.children() {
                extract_symbols_from_node(child, symbols);
            }
        }
    }
}
