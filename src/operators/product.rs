//! n-ary products with per-factor inversion.
//!
//! Products absorb nested products, compounding inversion flags. Multiplication also
//! merges integer powers of the *same* base node into one integer power. Division never
//! merges, so `x^5 / x^2` stays a quotient.

use log::debug;

use crate::errors::EvalError;
use crate::eval::EvalPass;
use crate::expr::{Factor, Node, NodeKind};
use crate::numeric::Numeric;
use crate::operators::power;

/// Accumulates the factors of a product under construction.
#[derive(Default)]
struct Factors {
    factors: Vec<Factor>,
}

impl Factors {
    /// Appends `node`, flattening it if it is a product itself.
    ///
    /// With `combine` set, non-inverted factors are merged with an existing non-inverted
    /// factor over the identical base.
    fn push(&mut self, node: &Node, inverted: bool, combine: bool) {
        match node.kind() {
            NodeKind::Product(inner) => {
                for factor in inner {
                    self.push_one(&factor.node, inverted != factor.inverted, combine);
                }
            }
            _ => self.push_one(node, inverted, combine),
        }
    }

    fn push_one(&mut self, node: &Node, inverted: bool, combine: bool) {
        if combine && !inverted && self.try_merge(node) {
            return;
        }
        self.factors.push(Factor {
            node: node.clone(),
            inverted,
        });
    }

    fn try_merge(&mut self, node: &Node) -> bool {
        let (base, exponent) = as_integer_power(node);
        for existing in self.factors.iter_mut().filter(|f| !f.inverted) {
            let (existing_base, existing_exponent) = as_integer_power(&existing.node);
            if !existing_base.ptr_eq(base) {
                continue;
            }
            let Some(merged) = existing_exponent.checked_add(exponent) else {
                return false;
            };
            debug!("combining {} and {node} into one power of {base}", existing.node);
            existing.node = power::powi(base, merged);
            return true;
        }
        false
    }

    fn finish(self) -> Node {
        single_factor(&self.factors)
            .unwrap_or_else(|| Node::from_kind(NodeKind::Product(self.factors)))
    }
}

/// The only factor of a product consisting of one non-inverted factor.
pub(crate) fn single_factor(factors: &[Factor]) -> Option<Node> {
    match factors {
        [single] if !single.inverted => Some(single.node.clone()),
        _ => None,
    }
}

/// A node seen as an integer power: its base and exponent, or itself to the first power.
fn as_integer_power(node: &Node) -> (&Node, i64) {
    match node.kind() {
        NodeKind::IntegerPower { base, exponent } => (base, *exponent),
        _ => (node, 1),
    }
}

/// Builds a product from explicit factors.
///
/// Nested products are flattened; no bases are combined.
pub(crate) fn product(factors: impl IntoIterator<Item = Factor>) -> Node {
    let mut acc = Factors::default();
    for factor in factors {
        acc.push(&factor.node, factor.inverted, false);
    }
    Node::from_kind(NodeKind::Product(acc.factors))
}

pub(crate) fn mul(lhs: &Node, rhs: &Node) -> Node {
    let mut acc = Factors::default();
    acc.push(lhs, false, false);
    acc.push(rhs, false, true);
    acc.finish()
}

pub(crate) fn div(lhs: &Node, rhs: &Node) -> Node {
    let mut acc = Factors::default();
    acc.push(lhs, false, false);
    acc.push(rhs, true, false);
    acc.finish()
}

pub(crate) fn eval<T: Numeric>(factors: &[Factor], pass: &EvalPass) -> Result<T, EvalError> {
    let mut total = T::one(pass.precision());
    for factor in factors {
        let value = factor.node.eval_in::<T>(pass)?;
        total = if factor.inverted {
            if value.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            total.div(&value)
        } else {
            total.mul(&value)
        };
    }
    Ok(total)
}

impl Factor {
    pub fn new(node: Node, inverted: bool) -> Self {
        Self { node, inverted }
    }

    pub fn times(node: &Node) -> Self {
        Self::new(node.clone(), false)
    }

    pub fn divided_by(node: &Node) -> Self {
        Self::new(node.clone(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_agree, assert_close_dbl, assert_mpfr, mpfr, set_both};
    use crate::types::Dbl;

    fn factors(node: &Node) -> &[Factor] {
        match node.kind() {
            NodeKind::Product(factors) => factors,
            other => panic!("expected a product, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_products_compound_inversion() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let z = Node::variable("z");

        let p = &x / (&y / &z);
        let flat = factors(&p);
        let inverted: Vec<bool> = flat.iter().map(|f| f.inverted).collect();
        assert_eq!(inverted, [false, true, false]);
        assert_eq!(p.depth(), 2);
    }

    #[test]
    fn test_same_base_multiplication_combines() {
        let x = Node::variable("x");
        let p = x.powi(5) * x.powi(2);
        match p.kind() {
            NodeKind::IntegerPower { base, exponent } => {
                assert!(base.ptr_eq(&x));
                assert_eq!(*exponent, 7);
            }
            other => panic!("expected an integer power, got {other:?}"),
        }
        assert_eq!(p.degree(), 7);

        let square = &x * &x;
        assert!(square.is_integer_power());
        assert_eq!(square.degree(), 2);
    }

    #[test]
    fn test_combination_needs_identical_base() {
        let x = Node::variable("x");
        let other_x = Node::variable("x");
        let p = x.powi(2) * other_x.powi(3);
        assert!(!p.is_integer_power());
        assert_eq!(factors(&p).len(), 2);

        let s1 = &x + Node::integer(1);
        let s2 = &x + Node::integer(1);
        assert!(!(s1.powi(2) * s2.powi(2)).is_integer_power());
    }

    #[test]
    fn test_combination_scans_existing_factors() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let p = (&x * &y) * x.powi(3);
        let flat = factors(&p);
        assert_eq!(flat.len(), 2);
        assert!(flat[0].node.is_integer_power());
        assert_eq!(p.degree_wrt(&x), 4);
        assert_eq!(p.degree(), 5);
    }

    #[test]
    fn test_division_never_combines() {
        let x = Node::variable("x");
        let q = x.powi(5) / x.powi(2);
        assert!(!q.is_integer_power());
        assert_eq!(factors(&q).len(), 2);
        assert_eq!(q.degree(), -1);

        let q = x.powi(3) / x.powi(-1);
        assert_eq!(q.degree(), -1);
    }

    #[test]
    fn test_division_by_zero() {
        let x = Node::variable("x");
        let q = Node::integer(1) / &x;
        set_both(&x, "0", "0");
        assert_eq!(q.eval::<Dbl>(), Err(EvalError::DivisionByZero));
        assert_eq!(
            q.eval::<crate::types::Mpfr>(),
            Err(EvalError::DivisionByZero)
        );
    }

    #[test]
    fn test_products_and_quotients() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();
        set_both(&x, "3.1", "4.1");
        set_both(&y, "8.8", "9.9");

        let xv = Dbl::new(3.1, 4.1);
        let yv = Dbl::new(8.8, 9.9);
        let av = Dbl::new(3.4, 5.6);
        let (xm, ym, am) = (mpfr("3.1", "4.1"), mpfr("8.8", "9.9"), mpfr("3.4", "5.6"));

        for f in [&x * &y, &y * &x] {
            assert_close_dbl(f.eval::<Dbl>().unwrap(), xv * yv);
            assert_mpfr(&f, &(xm.clone() * &ym));
            assert_eq!(f.degree(), 2);
            assert_agree(&f);
        }
        for f in [&x * &a, &a * &x] {
            assert_mpfr(&f, &(xm.clone() * &am));
            assert_eq!(f.degree(), 1);
            assert_eq!(f.degree_wrt(&y), 0);
            assert_agree(&f);
        }

        for f in [&x * &y * &a, &a * &y * &x, &y * &a * &x] {
            assert_mpfr(&f, &(xm.clone() * &ym * &am));
        }

        let f = &x * &y / &a;
        assert_close_dbl(f.eval::<Dbl>().unwrap(), xv * yv / av);
        assert_mpfr(&f, &(xm.clone() * &ym / &am));
        assert_eq!(f.degree(), 2);
        assert_eq!(f.degree_wrt(&x), 1);
        assert_eq!(f.degree_wrt(&y), 1);

        let f = &x / &y;
        assert_close_dbl(f.eval::<Dbl>().unwrap(), xv / yv);
        assert_mpfr(&f, &(xm.clone() / &ym));
        assert_eq!(f.degree(), -1);
        assert_eq!(f.degree_wrt(&x), 1);
        assert_eq!(f.degree_wrt(&y), -1);
        assert!(!f.is_polynomial());

        let f = &y / &x;
        assert_mpfr(&f, &(ym / &xm));
        assert_eq!(f.degree_wrt(&x), -1);
        assert_eq!(f.degree_wrt(&y), 1);

        let f = &a * &a;
        assert_eq!(f.degree(), 0);
        assert_close_dbl(f.eval::<Dbl>().unwrap(), av * av);
        assert_mpfr(&f, &(am.clone() * &am));
    }

    #[test]
    fn test_empty_product_is_one() {
        let p = Node::product([]);
        assert_eq!(p.eval::<Dbl>().unwrap(), Dbl::new(1.0, 0.0));
    }
}
