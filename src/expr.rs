//! Node representation for function trees.
//!
//! A function tree is a directed acyclic graph of immutable nodes. The main types are:
//!
//! - `Node`: A cheap, clonable handle to a shared node
//! - `NodeKind`: The closed set of node variants a handle can point to
//! - `Variable`, `Number`, `SpecialConstant`, `Differential`: The leaf payloads
//! - `Term`, `Factor`: Signed summands and possibly inverted factors of n-ary nodes
//!
//! Children are shared by reference counting. Two parents may point to the same child,
//! and the factory layer in [`builder`](crate::builder) relies on that identity: bases are
//! compared with [`Node::ptr_eq`], never structurally. Nodes cannot be modified after
//! construction except for the current values of a variable and the per-node evaluation
//! cache, so cycles cannot be formed.
//!
//! # Display
//! Nodes render in ordinary infix notation. Sums, products and powers are parenthesized,
//! functions use call notation and the special constants print as `pi`, `E` and `I`.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use crate::errors::ConstructionError;
use crate::eval::EvalCache;
use crate::literal;
use crate::numeric::Numeric;
use crate::operators::functions::UnaryFunction;
use crate::types::{Dbl, Mpfr};

/// A handle to a node of a function tree.
///
/// Cloning a handle shares the node; it never copies the subtree.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

struct NodeData {
    kind: NodeKind,
    cache: EvalCache,
}

/// The variants a node can take.
#[derive(Debug)]
pub enum NodeKind {
    /// A named variable with externally assigned values
    Variable(Variable),
    /// An immutable complex literal
    Number(Number),
    /// Pi, Euler's number or the imaginary unit
    Special(SpecialConstant),
    /// Placeholder for a derivative slot
    Differential(Differential),
    /// Signed n-ary sum; empty means 0
    Sum(Vec<Term>),
    /// n-ary product with per-factor inversion; empty means 1
    Product(Vec<Factor>),
    /// Base raised to a fixed integer exponent
    IntegerPower { base: Node, exponent: i64 },
    /// Base raised to an arbitrary subtree
    Power { base: Node, exponent: Node },
    /// Negation of a single child
    Negate(Node),
    /// A transcendental function of a single child
    Function(UnaryFunction, Node),
}

/// A named variable.
///
/// The name is for display only. Two variables created with the same name are
/// different variables.
#[derive(Debug)]
pub struct Variable {
    name: String,
    pub(crate) dbl: Cell<Option<Dbl>>,
    pub(crate) mp: RefCell<Option<Mpfr>>,
}

impl Variable {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dbl: Cell::new(None),
            mp: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A complex number literal.
///
/// Both parts are kept as the exact decimal strings they were written with, so they
/// can be read again at any precision. A double approximation is computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    real: String,
    imag: String,
    approximation: Dbl,
}

impl Number {
    pub(crate) fn new(real: &str, imag: &str) -> Result<Self, ConstructionError> {
        literal::validate(real)?;
        literal::validate(imag)?;
        let parse = |text: &str| {
            text.parse::<f64>()
                .map_err(|_| ConstructionError::InvalidLiteral(text.to_string()))
        };
        let approximation = Dbl::new(parse(real)?, parse(imag)?);
        Ok(Self {
            real: real.to_string(),
            imag: imag.to_string(),
            approximation,
        })
    }

    pub(crate) fn from_integer(value: i64) -> Self {
        Self {
            real: value.to_string(),
            imag: "0".to_string(),
            approximation: Dbl::new(value as f64, 0.0),
        }
    }

    /// Decimal literal of the real part.
    pub fn real(&self) -> &str {
        &self.real
    }

    /// Decimal literal of the imaginary part.
    pub fn imag(&self) -> &str {
        &self.imag
    }

    /// Nearest double, which may be infinite for very large literals.
    pub fn approximation(&self) -> Dbl {
        self.approximation
    }

    /// The exact integer value, if the literal is a real integer fitting an `i64`.
    pub fn as_integer(&self) -> Option<i64> {
        if !literal::is_zero(&self.imag) {
            return None;
        }
        literal::exact_integer(&self.real)
    }

    pub fn is_zero(&self) -> bool {
        literal::is_zero(&self.real) && literal::is_zero(&self.imag)
    }

    pub(crate) fn negated(&self) -> Self {
        Self {
            real: literal::negate(&self.real),
            imag: literal::negate(&self.imag),
            approximation: -self.approximation,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if literal::is_zero(&self.imag) {
            write!(f, "{}", self.real)
        } else if literal::is_zero(&self.real) {
            write!(f, "{}*I", self.imag)
        } else if self.imag.starts_with('-') {
            write!(f, "({}{}*I)", self.real, self.imag)
        } else {
            write!(f, "({}+{}*I)", self.real, self.imag.trim_start_matches('+'))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialConstant {
    Pi,
    E,
    I,
}

impl SpecialConstant {
    pub fn name(self) -> &'static str {
        match self {
            SpecialConstant::Pi => "pi",
            SpecialConstant::E => "E",
            SpecialConstant::I => "I",
        }
    }
}

/// The differential of a variable.
#[derive(Debug)]
pub struct Differential {
    variable: Node,
    name: String,
}

impl Differential {
    pub(crate) fn new(variable: Node, name: String) -> Self {
        Self { variable, name }
    }

    /// The variable this is the differential of.
    pub fn variable(&self) -> &Node {
        &self.variable
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Sign of a summand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn flip(self) -> Self {
        match self {
            Sign::Plus => Sign::Minus,
            Sign::Minus => Sign::Plus,
        }
    }

    /// Sign of the product of two signed quantities.
    pub fn combine(self, other: Sign) -> Self {
        if self == other {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

/// One summand of a sum.
#[derive(Debug, Clone)]
pub struct Term {
    pub node: Node,
    pub sign: Sign,
}

/// One factor of a product; an inverted factor divides.
#[derive(Debug, Clone)]
pub struct Factor {
    pub node: Node,
    pub inverted: bool,
}

impl Node {
    pub(crate) fn from_kind(kind: NodeKind) -> Self {
        Node(Rc::new(NodeData {
            kind,
            cache: EvalCache::default(),
        }))
    }

    pub fn kind(&self) -> &NodeKind {
        &self.0.kind
    }

    pub(crate) fn cache(&self) -> &EvalCache {
        &self.0.cache
    }

    /// Identity comparison: true only if both handles point to the same node.
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self.kind() {
            NodeKind::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self.kind() {
            NodeKind::Number(number) => Some(number),
            _ => None,
        }
    }

    pub fn is_variable(&self) -> bool {
        self.as_variable().is_some()
    }

    pub fn is_integer_power(&self) -> bool {
        matches!(self.kind(), NodeKind::IntegerPower { .. })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(
            self.kind(),
            NodeKind::Variable(_)
                | NodeKind::Number(_)
                | NodeKind::Special(_)
                | NodeKind::Differential(_)
        )
    }

    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match self.kind() {
            NodeKind::Variable(_)
            | NodeKind::Number(_)
            | NodeKind::Special(_)
            | NodeKind::Differential(_) => Vec::new(),
            NodeKind::Sum(terms) => terms.iter().map(|t| &t.node).collect(),
            NodeKind::Product(factors) => factors.iter().map(|f| &f.node).collect(),
            NodeKind::IntegerPower { base, .. } => vec![base],
            NodeKind::Power { base, exponent } => vec![base, exponent],
            NodeKind::Negate(child) | NodeKind::Function(_, child) => vec![child],
        }
    }

    /// Number of nodes on the longest path from this node to a leaf, counting both ends.
    ///
    /// Shared subtrees are measured once.
    pub fn depth(&self) -> usize {
        fn measure(node: &Node, known: &mut HashMap<*const NodeData, usize>) -> usize {
            let key = Rc::as_ptr(&node.0);
            if let Some(&depth) = known.get(&key) {
                return depth;
            }
            let depth = 1 + node
                .children()
                .into_iter()
                .map(|child| measure(child, known))
                .max()
                .unwrap_or(0);
            known.insert(key, depth);
            depth
        }
        measure(self, &mut HashMap::new())
    }

    /// Distinct variables reachable from this node, in first-seen order.
    ///
    /// Differentials do not count as occurrences of their variable.
    pub fn variables(&self) -> Vec<Node> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !seen.insert(Rc::as_ptr(&node.0)) {
                continue;
            }
            if node.is_variable() {
                found.push(node.clone());
            }
            // Reverse so that the leftmost child is visited first.
            stack.extend(node.children().into_iter().rev());
        }
        found
    }

    /// Assigns the current value of a variable for the numeric type `T`.
    ///
    /// The value is used by every evaluation pass started afterwards.
    ///
    /// # Errors
    /// Returns `ConstructionError::NotAVariable` if this node is not a variable.
    pub fn set_current_value<T: Numeric>(&self, value: T) -> Result<(), ConstructionError> {
        let variable = self
            .as_variable()
            .ok_or_else(|| ConstructionError::NotAVariable(self.to_string()))?;
        T::store_value(variable, value);
        Ok(())
    }

    /// The current value of a variable for the numeric type `T`, if assigned.
    pub fn current_value<T: Numeric>(&self) -> Option<T> {
        self.as_variable().and_then(T::current_value)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(self.kind()).finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            NodeKind::Variable(variable) => write!(f, "{}", variable.name),
            NodeKind::Number(number) => write!(f, "{number}"),
            NodeKind::Special(constant) => write!(f, "{}", constant.name()),
            NodeKind::Differential(differential) => write!(f, "{}", differential.name),
            NodeKind::Sum(terms) => {
                if terms.is_empty() {
                    return write!(f, "0");
                }
                write!(f, "(")?;
                for (i, term) in terms.iter().enumerate() {
                    match (i, term.sign) {
                        (0, Sign::Plus) => {}
                        (0, Sign::Minus) => write!(f, "-")?,
                        (_, Sign::Plus) => write!(f, " + ")?,
                        (_, Sign::Minus) => write!(f, " - ")?,
                    }
                    write!(f, "{}", term.node)?;
                }
                write!(f, ")")
            }
            NodeKind::Product(factors) => {
                if factors.is_empty() {
                    return write!(f, "1");
                }
                write!(f, "(")?;
                for (i, factor) in factors.iter().enumerate() {
                    match (i, factor.inverted) {
                        (0, false) => {}
                        (0, true) => write!(f, "1/")?,
                        (_, false) => write!(f, "*")?,
                        (_, true) => write!(f, "/")?,
                    }
                    write!(f, "{}", factor.node)?;
                }
                write!(f, ")")
            }
            NodeKind::IntegerPower { base, exponent } => write!(f, "({base}^{exponent})"),
            NodeKind::Power { base, exponent } => write!(f, "({base}^{exponent})"),
            NodeKind::Negate(child) => write!(f, "-({child})"),
            NodeKind::Function(function, child) => write!(f, "{}({child})", function.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_name_variables_are_distinct() {
        let x1 = Node::variable("x");
        let x2 = Node::variable("x");
        assert!(!x1.ptr_eq(&x2));
        assert!(x1.ptr_eq(&x1.clone()));
    }

    #[test]
    fn test_number_literals() {
        let n = Node::number("3.4", "-5.6").unwrap();
        let number = n.as_number().unwrap();
        assert_eq!(number.real(), "3.4");
        assert_eq!(number.imag(), "-5.6");
        assert_eq!(number.approximation(), Dbl::new(3.4, -5.6));
        assert_eq!(number.as_integer(), None);
        assert_eq!(Node::real("-2.0").unwrap().as_number().unwrap().as_integer(), Some(-2));
        assert!(Node::number("1,5", "0").is_err());
    }

    #[test]
    fn test_set_current_value_requires_variable() {
        let x = Node::variable("x");
        x.set_current_value(Dbl::new(1.0, 2.0)).unwrap();
        assert_eq!(x.current_value::<Dbl>(), Some(Dbl::new(1.0, 2.0)));
        assert!(x.current_value::<Mpfr>().is_none());

        let two = Node::integer(2);
        assert!(matches!(
            two.set_current_value(Dbl::new(1.0, 0.0)),
            Err(ConstructionError::NotAVariable(_))
        ));
    }

    #[test]
    fn test_display() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();

        assert_eq!((&x + &y - &a).to_string(), "(x + y - (3.4+5.6*I))");
        assert_eq!((&x / &y).to_string(), "(x/y)");
        assert_eq!(x.powi(3).to_string(), "(x^3)");
        assert_eq!(x.sin().to_string(), "sin(x)");
        assert_eq!(Node::pi().to_string(), "pi");
        assert_eq!((-x.sin()).to_string(), "-(sin(x))");
    }

    #[test]
    fn test_variables_in_first_seen_order() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let z = Node::variable("z");
        let f = (&y * &x + x.sin()) * &z + &y;

        let names: Vec<String> = f
            .variables()
            .iter()
            .filter_map(|v| v.as_variable().map(|v| v.name().to_string()))
            .collect();
        assert_eq!(names, ["y", "x", "z"]);
    }

    #[test]
    fn test_depth_and_children() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        assert_eq!(x.depth(), 1);
        assert!(x.children().is_empty());

        let s = &x + &y;
        assert_eq!(s.depth(), 2);
        assert_eq!(s.children().len(), 2);
        assert!(s.children()[0].ptr_eq(&x));
    }

    #[test]
    fn test_depth_of_shared_subtrees() {
        let x = Node::variable("x");
        let mut f = x.clone();
        for _ in 0..64 {
            f = f.powi(2) + &f;
        }
        assert_eq!(f.depth(), 129);
        assert_eq!(f.variables().len(), 1);
    }
}
