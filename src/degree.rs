//! Degree and polynomiality analysis.
//!
//! Degrees are computed by a recursive traversal that follows the structure of the tree
//! literally. The result is a nonnegative degree or [`NOT_POLYNOMIAL`]. The rules are
//! syntactic, so a tree can be classified as non-polynomial even when it is
//! mathematically a polynomial:
//!
//! - a product is non-polynomial as soon as it divides by anything of nonzero degree,
//!   so `x^5 / x^2` has no degree although it equals `x^3`
//! - powers with non-integer exponents and transcendental functions have degree 0 if
//!   their arguments are constant and are non-polynomial otherwise
//! - integer powers with negative exponents are non-polynomial
//!
//! All queries come in a global form, where every variable counts, and a group form,
//! where only the given variables count and every other variable behaves like a constant.

use crate::expr::{Node, NodeKind};
use crate::types::NOT_POLYNOMIAL;

#[derive(Clone, Copy)]
enum Query<'a> {
    Global,
    Group(&'a [Node]),
}

impl Query<'_> {
    fn counts(&self, variable: &Node) -> bool {
        match self {
            Query::Global => true,
            Query::Group(group) => group.iter().any(|v| v.ptr_eq(variable)),
        }
    }
}

fn degree(node: &Node, query: Query) -> i32 {
    match node.kind() {
        NodeKind::Variable(_) => i32::from(query.counts(node)),
        NodeKind::Number(_) | NodeKind::Special(_) | NodeKind::Differential(_) => 0,
        NodeKind::Negate(child) => degree(child, query),
        NodeKind::Sum(terms) => {
            let mut max = 0;
            for term in terms {
                let d = degree(&term.node, query);
                if d == NOT_POLYNOMIAL {
                    return NOT_POLYNOMIAL;
                }
                max = max.max(d);
            }
            max
        }
        NodeKind::Product(factors) => {
            let mut total: i32 = 0;
            for factor in factors {
                let d = degree(&factor.node, query);
                if factor.inverted {
                    if d != 0 {
                        return NOT_POLYNOMIAL;
                    }
                } else if d == NOT_POLYNOMIAL {
                    return NOT_POLYNOMIAL;
                } else {
                    total = match total.checked_add(d) {
                        Some(total) => total,
                        None => return NOT_POLYNOMIAL,
                    };
                }
            }
            total
        }
        NodeKind::IntegerPower { base, exponent } => {
            if *exponent == 0 {
                return 0;
            }
            if *exponent < 0 {
                return NOT_POLYNOMIAL;
            }
            let d = degree(base, query);
            if d == NOT_POLYNOMIAL {
                return NOT_POLYNOMIAL;
            }
            i32::try_from(*exponent)
                .ok()
                .and_then(|e| d.checked_mul(e))
                .unwrap_or(NOT_POLYNOMIAL)
        }
        NodeKind::Power { base, exponent } => {
            if degree(base, query) == 0 && degree(exponent, query) == 0 {
                0
            } else {
                NOT_POLYNOMIAL
            }
        }
        NodeKind::Function(_, child) => {
            if degree(child, query) == 0 {
                0
            } else {
                NOT_POLYNOMIAL
            }
        }
    }
}

fn is_homogeneous(node: &Node, query: Query) -> bool {
    match node.kind() {
        NodeKind::Variable(_)
        | NodeKind::Number(_)
        | NodeKind::Special(_)
        | NodeKind::Differential(_) => true,
        NodeKind::Negate(child) => is_homogeneous(child, query),
        NodeKind::Sum(terms) => {
            let mut common = None;
            for term in terms {
                if !is_homogeneous(&term.node, query) {
                    return false;
                }
                let d = degree(&term.node, query);
                match common {
                    None => common = Some(d),
                    Some(c) if c != d => return false,
                    Some(_) => {}
                }
            }
            true
        }
        NodeKind::Product(factors) => factors.iter().all(|factor| {
            if factor.inverted {
                degree(&factor.node, query) == 0
            } else {
                is_homogeneous(&factor.node, query)
            }
        }),
        NodeKind::IntegerPower { base, exponent } => {
            *exponent >= 0 && is_homogeneous(base, query)
        }
        NodeKind::Power { .. } | NodeKind::Function(..) => degree(node, query) == 0,
    }
}

impl Node {
    /// Total degree counting every variable, or `NOT_POLYNOMIAL`.
    ///
    /// # Example
    /// ```
    /// # use function_tree::prelude::*;
    /// let x = Node::variable("x");
    /// let y = Node::variable("y");
    /// assert_eq!((&x * &y + &x).degree(), 2);
    /// assert_eq!((&x / &y).degree(), NOT_POLYNOMIAL);
    /// ```
    pub fn degree(&self) -> i32 {
        degree(self, Query::Global)
    }

    /// Degree in a single variable; all other variables count as constants.
    pub fn degree_wrt(&self, variable: &Node) -> i32 {
        degree(self, Query::Group(std::slice::from_ref(variable)))
    }

    /// Total degree in a group of variables.
    pub fn degree_wrt_group(&self, group: &[Node]) -> i32 {
        degree(self, Query::Group(group))
    }

    /// Degree in each of `variables`, in order.
    pub fn multidegree(&self, variables: &[Node]) -> Vec<i32> {
        variables.iter().map(|v| self.degree_wrt(v)).collect()
    }

    pub fn is_polynomial(&self) -> bool {
        self.degree() != NOT_POLYNOMIAL
    }

    /// Whether the tree is polynomial in the variables of `group`.
    pub fn is_polynomial_wrt(&self, group: &[Node]) -> bool {
        self.degree_wrt_group(group) != NOT_POLYNOMIAL
    }

    /// Whether every summand has the same total degree.
    ///
    /// Division is only allowed by constants and non-polynomial subtrees only count when
    /// they are constant.
    pub fn is_homogeneous(&self) -> bool {
        is_homogeneous(self, Query::Global)
    }

    /// Homogeneity in the variables of `group`.
    pub fn is_homogeneous_wrt(&self, group: &[Node]) -> bool {
        is_homogeneous(self, Query::Group(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_degrees() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        assert_eq!(x.degree(), 1);
        assert_eq!(x.degree_wrt(&x), 1);
        assert_eq!(x.degree_wrt(&y), 0);
        assert_eq!(Node::integer(7).degree(), 0);
        for constant in [Node::pi(), Node::e(), Node::i()] {
            assert_eq!(constant.degree(), 0);
            assert!(constant.is_polynomial());
        }
        let dx = Node::differential(&x).unwrap();
        assert_eq!(dx.degree(), 0);
    }

    #[test]
    fn test_same_name_is_not_same_variable() {
        let x = Node::variable("x");
        let other_x = Node::variable("x");
        assert_eq!(x.powi(3).degree_wrt(&other_x), 0);
    }

    #[test]
    fn test_sum_takes_maximum() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let f = x.powi(3) + &x * &y + Node::integer(1);
        assert_eq!(f.degree(), 3);
        assert_eq!(f.degree_wrt(&y), 1);
        assert_eq!((f + x.sin()).degree(), NOT_POLYNOMIAL);
    }

    #[test]
    fn test_quotients_are_syntactic() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();

        assert_eq!((&x * &y / &a).degree(), 2);
        assert_eq!((&x / Node::pi()).degree(), 1);
        assert_eq!((&x / (&a + Node::i())).degree(), 1);
        // Division by something constant in the queried variable is fine.
        assert_eq!((&x / &y).degree_wrt(&x), 1);
        assert_eq!((x.powi(5) / x.powi(2)).degree(), NOT_POLYNOMIAL);
        assert_eq!((&x / x.sin()).degree(), NOT_POLYNOMIAL);
    }

    #[test]
    fn test_groups_and_multidegree() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let z = Node::variable("z");
        let f = x.powi(2) * &y + &y * &z.powi(4) + Node::integer(3);

        let group = [x.clone(), y.clone()];
        assert_eq!(f.degree_wrt_group(&group), 3);
        assert_eq!(f.multidegree(&[x.clone(), y.clone(), z.clone()]), [2, 1, 4]);
        assert_eq!(f.degree(), 5);

        let g = &x / &z;
        assert!(!g.is_polynomial());
        assert!(g.is_polynomial_wrt(&group));
        assert!(!g.is_polynomial_wrt(std::slice::from_ref(&z)));
    }

    #[test]
    fn test_homogeneity() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();

        assert!((x.powi(2) + &x * &y - y.powi(2)).is_homogeneous());
        assert!((&a * &x + &y / &a).is_homogeneous());
        assert!(!(x.powi(2) + &y).is_homogeneous());
        assert!(!(&x + Node::integer(1)).is_homogeneous());
        assert!(!(&x / &y).is_homogeneous());
        assert!(!(&x + x.sin()).is_homogeneous());
        assert!((&x + a.sin() * &y).is_homogeneous());

        // With respect to x only, y acts as a constant.
        let f = x.powi(2) * &y + x.powi(2);
        assert!(f.is_homogeneous_wrt(std::slice::from_ref(&x)));
        assert!(!f.is_homogeneous_wrt(std::slice::from_ref(&y)));
    }
}
