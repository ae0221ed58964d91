//! Systems of functions over one shared set of variables.
//!
//! All functions of a system are built over the *same* variable nodes, so assigning a
//! value once updates every function, and one evaluation pass serves the whole system.
//! Subtrees shared between functions are computed once per pass.
//!
//! # Example
//!
//! ```
//! use function_tree::prelude::*;
//!
//! let system = System::new(vec![
//!     "2*x + y".to_string(),   // first function
//!     "x^2 + z".to_string(),   // second function
//! ]).unwrap();
//!
//! // Variables are automatically sorted (x, y, z)
//! let values = [1.0, 2.0, 3.0].map(|v| Dbl::new(v, 0.0));
//! let results: Vec<Dbl> = system.eval(&values).unwrap();
//! assert_eq!(results, vec![Dbl::new(4.0, 0.0), Dbl::new(4.0, 0.0)]);
//!
//! // A total degree bound on the number of isolated solutions
//! assert_eq!(system.bezout_bound(), Some(2));
//! ```

use itertools::Itertools;
use log::debug;

use crate::errors::FunctionError;
use crate::eval::EvalPass;
use crate::expr::Node;
use crate::function::{extract_all_symbols, index_variables, Function};
use crate::numeric::Numeric;
use crate::precision::Precision;

/// Represents a system of functions that are evaluated together.
#[derive(Debug, Clone)]
pub struct System {
    functions: Vec<Function>,
    variables: Vec<Node>,
}

impl System {
    /// Creates a system from expression strings.
    ///
    /// The variables of all expressions are collected and sorted alphabetically; value
    /// slices are expected in that order.
    pub fn new(expressions: Vec<String>) -> Result<Self, FunctionError> {
        let names = extract_all_symbols(&expressions)?;
        let variables: Vec<Node> = names.iter().map(Node::variable).collect();
        Self::from_variables(expressions, variables)
    }

    /// Creates a system with an explicit variable order.
    pub fn from_var_names(expressions: Vec<String>, names: &[&str]) -> Result<Self, FunctionError> {
        let variables: Vec<Node> = names.iter().map(|name| Node::variable(*name)).collect();
        Self::from_variables(expressions, variables)
    }

    /// Creates a system over existing variable nodes.
    pub fn from_variables(
        expressions: Vec<String>,
        variables: Vec<Node>,
    ) -> Result<Self, FunctionError> {
        index_variables(&variables)?;
        let functions = expressions
            .into_iter()
            .map(|expression| Function::from_variables(expression, &variables))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            "built system of {} functions in {} variables",
            functions.len(),
            variables.len()
        );
        Ok(Self {
            functions,
            variables,
        })
    }

    /// Creates a system from already built trees over `variables`.
    pub fn from_nodes(roots: Vec<Node>, variables: Vec<Node>) -> Result<Self, FunctionError> {
        index_variables(&variables)?;
        let functions = roots
            .into_iter()
            .map(|root| Function::from_node(root, variables.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            functions,
            variables,
        })
    }

    /// Assigns the current values of all variables, in variable order.
    pub fn set_values<T: Numeric>(&self, values: &[T]) -> Result<(), FunctionError> {
        if values.len() != self.variables.len() {
            return Err(FunctionError::InvalidInputLength {
                expected: self.variables.len(),
                got: values.len(),
            });
        }
        for (variable, value) in self.variables.iter().zip(values) {
            variable.set_current_value(value.clone())?;
        }
        Ok(())
    }

    /// Assigns `values` and evaluates every function in one shared pass.
    ///
    /// # Errors
    /// Returns `FunctionError::InvalidInputLength` if the number of values does not match
    /// the number of variables, or the first evaluation error encountered.
    pub fn eval<T: Numeric>(&self, values: &[T]) -> Result<Vec<T>, FunctionError> {
        self.set_values(values)?;
        self.eval_in(&EvalPass::new())
    }

    /// Like `eval`, at an explicit precision.
    pub fn eval_with_precision<T: Numeric>(
        &self,
        values: &[T],
        precision: Precision,
    ) -> Result<Vec<T>, FunctionError> {
        self.set_values(values)?;
        self.eval_in(&EvalPass::with_precision(precision))
    }

    /// Evaluates every function at the current values within `pass`.
    pub fn eval_in<T: Numeric>(&self, pass: &EvalPass) -> Result<Vec<T>, FunctionError> {
        self.functions.iter().map(|f| f.eval_in(pass)).collect()
    }

    /// Total degree of each function.
    pub fn degrees(&self) -> Vec<i32> {
        self.functions.iter().map(Function::degree).collect()
    }

    pub fn is_polynomial(&self) -> bool {
        self.functions.iter().all(Function::is_polynomial)
    }

    pub fn is_homogeneous(&self) -> bool {
        self.functions.iter().all(Function::is_homogeneous)
    }

    /// Product of the total degrees, a bound on the number of isolated solutions.
    ///
    /// Returns `None` if any function is not polynomial. Saturates at `u64::MAX`.
    pub fn bezout_bound(&self) -> Option<u64> {
        self.functions.iter().try_fold(1u64, |bound, f| {
            let degree = u64::try_from(f.degree()).ok()?;
            Some(bound.saturating_mul(degree))
        })
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn variables(&self) -> &[Node] {
        &self.variables
    }

    /// Returns the variable names in order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter_map(|v| v.as_variable().map(|v| v.name()))
            .collect()
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }
}

impl std::fmt::Display for System {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}]",
            self.functions.iter().map(Function::expression).join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Dbl, Mpfr};

    fn reals(values: &[f64]) -> Vec<Dbl> {
        values.iter().map(|&v| Dbl::new(v, 0.0)).collect()
    }

    #[test]
    fn test_system_with_different_variables() -> Result<(), Box<dyn std::error::Error>> {
        let expressions = vec![
            "2*x + y".to_string(),   // uses x, y
            "z^2".to_string(),       // uses only z
            "x + y + z".to_string(), // uses all
        ];

        let system = System::new(expressions)?;
        assert_eq!(system.variable_names(), ["x", "y", "z"]);

        let results = system.eval(&reals(&[1.0, 2.0, 3.0]))?;
        assert_eq!(results, reals(&[4.0, 9.0, 6.0]));
        assert_eq!(system.degrees(), [1, 2, 1]);
        assert_eq!(system.bezout_bound(), Some(2));
        Ok(())
    }

    #[test]
    fn test_variables_are_shared() -> Result<(), Box<dyn std::error::Error>> {
        let system = System::new(vec!["y + x".to_string(), "x + z".to_string()])?;
        let x = &system.variables()[0];
        for f in system.functions() {
            assert!(f.variable("x").is_some_and(|v| v.ptr_eq(x)));
        }

        let results = system.eval(&reals(&[1.0, 2.0, 3.0]))?;
        assert_eq!(results, reals(&[3.0, 4.0]));
        Ok(())
    }

    #[test]
    fn test_invalid_input_length() {
        let system = System::new(vec!["x + y".to_string(), "y + z".to_string()]).unwrap();
        assert!(matches!(
            system.eval(&reals(&[1.0, 2.0])),
            Err(FunctionError::InvalidInputLength {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_complex_expressions() -> Result<(), Box<dyn std::error::Error>> {
        let expressions = vec![
            "(x + y) * (x - y)".to_string(),
            "x^3 + y^2 * z".to_string(),
            "(x + y + z) / (x + 1)".to_string(),
        ];

        let system = System::new(expressions)?;
        let results = system.eval(&reals(&[2.0, 3.0, 4.0]))?;
        assert_eq!(results, reals(&[-5.0, 44.0, 3.0]));

        assert_eq!(system.degrees(), [2, 3, -1]);
        assert!(!system.is_polynomial());
        assert_eq!(system.bezout_bound(), None);
        Ok(())
    }

    #[test]
    fn test_custom_variable_order() -> Result<(), Box<dyn std::error::Error>> {
        let expressions = vec!["2*alpha + beta".to_string(), "alpha^2 - beta".to_string()];
        let system = System::from_var_names(expressions, &["beta", "alpha"])?;
        let results = system.eval(&reals(&[2.0, 1.0]))?;
        assert_eq!(results, reals(&[4.0, -1.0]));
        Ok(())
    }

    #[test]
    fn test_error_undefined_variable() {
        let expressions = vec!["x + y".to_string(), "x + undefined_var".to_string()];
        let result = System::from_var_names(expressions, &["x", "y"]);
        assert!(matches!(result, Err(FunctionError::VariableNotFound(_))));
    }

    #[test]
    fn test_empty_system() -> Result<(), Box<dyn std::error::Error>> {
        let system = System::new(vec![])?;
        let results: Vec<Dbl> = system.eval(&[])?;
        assert!(results.is_empty());
        assert_eq!(system.bezout_bound(), Some(1));
        Ok(())
    }

    #[test]
    fn test_homogeneous_system_at_both_types() -> Result<(), Box<dyn std::error::Error>> {
        let system = System::new(vec![
            "x^2 - y^2 + x*z".to_string(),
            "x*y*z - z^3".to_string(),
        ])?;
        assert!(system.is_homogeneous());
        assert_eq!(system.bezout_bound(), Some(6));

        let values = reals(&[1.5, -0.5, 2.0]);
        let d = system.eval(&values)?;

        let precision = Precision::digits(40)?;
        let mp_values: Vec<Mpfr> = [1.5, -0.5, 2.0]
            .iter()
            .map(|&v| Mpfr::with_val(precision.bits(), v))
            .collect();
        let m = system.eval_with_precision(&mp_values, precision)?;
        for (d, m) in d.iter().zip(&m) {
            assert!((d.re - m.real().to_f64()).abs() < 1e-14);
        }
        Ok(())
    }

    #[test]
    fn test_from_nodes() -> Result<(), Box<dyn std::error::Error>> {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let shared = (&x + &y).powi(2);
        let system = System::from_nodes(
            vec![&shared - &x, &shared * &y],
            vec![x.clone(), y.clone()],
        )?;
        assert_eq!(system.degrees(), [2, 3]);
        assert_eq!(system.eval(&reals(&[1.0, 2.0]))?, reals(&[8.0, 18.0]));
        Ok(())
    }

    #[test]
    fn test_duplicate_variable_names_are_rejected() {
        use crate::errors::ConstructionError;

        let x = Node::variable("x");
        let other_x = Node::variable("x");
        let result = System::from_nodes(vec![&x * &other_x], vec![x.clone(), other_x.clone()]);
        assert!(matches!(
            result,
            Err(FunctionError::Construction(ConstructionError::DuplicateVariable(_)))
        ));
        assert!(System::from_var_names(vec!["x".to_string()], &["x", "y", "x"]).is_err());
    }
}
