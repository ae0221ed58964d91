//! Signed n-ary sums.
//!
//! Building a sum flattens operands that are sums themselves and folds negations into
//! the sign of the term, so `a - (b - c)` is stored as the single sum `a - b + c`.

use log::debug;

use crate::errors::EvalError;
use crate::eval::EvalPass;
use crate::expr::{Node, NodeKind, Sign, Term};
use crate::numeric::Numeric;

/// Builds a sum from signed terms, absorbing nested sums and negations.
pub(crate) fn sum(terms: impl IntoIterator<Item = Term>) -> Node {
    let mut flat = Vec::new();
    for term in terms {
        push_term(&mut flat, &term.node, term.sign);
    }
    Node::from_kind(NodeKind::Sum(flat))
}

pub(crate) fn add(lhs: &Node, rhs: &Node) -> Node {
    sum([Term::new(lhs.clone(), Sign::Plus), Term::new(rhs.clone(), Sign::Plus)])
}

pub(crate) fn sub(lhs: &Node, rhs: &Node) -> Node {
    sum([Term::new(lhs.clone(), Sign::Plus), Term::new(rhs.clone(), Sign::Minus)])
}

fn push_term(terms: &mut Vec<Term>, node: &Node, sign: Sign) {
    match node.kind() {
        NodeKind::Sum(inner) => {
            debug!("flattening nested sum of {} terms", inner.len());
            terms.extend(
                inner
                    .iter()
                    .map(|term| Term::new(term.node.clone(), sign.combine(term.sign))),
            );
        }
        NodeKind::Negate(child) => {
            debug!("folding negation of {child} into term sign");
            push_term(terms, child, sign.flip());
        }
        _ => terms.push(Term::new(node.clone(), sign)),
    }
}

pub(crate) fn eval<T: Numeric>(terms: &[Term], pass: &EvalPass) -> Result<T, EvalError> {
    let mut total = T::zero(pass.precision());
    for term in terms {
        let value = term.node.eval_in::<T>(pass)?;
        total = match term.sign {
            Sign::Plus => total.add(&value),
            Sign::Minus => total.sub(&value),
        };
    }
    Ok(total)
}

impl Term {
    pub fn new(node: Node, sign: Sign) -> Self {
        Self { node, sign }
    }

    pub fn plus(node: &Node) -> Self {
        Self::new(node.clone(), Sign::Plus)
    }

    pub fn minus(node: &Node) -> Self {
        Self::new(node.clone(), Sign::Minus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_agree, assert_close_dbl, assert_mpfr, mpfr, set_both};
    use crate::types::Dbl;

    fn terms(node: &Node) -> &[Term] {
        match node.kind() {
            NodeKind::Sum(terms) => terms,
            other => panic!("expected a sum, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_sums_are_flattened() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let z = Node::variable("z");

        let left = &x + &y;
        let right = &y - &z;
        let s = &left - &right;

        let flat = terms(&s);
        assert_eq!(flat.len(), 4);
        let signs: Vec<Sign> = flat.iter().map(|t| t.sign).collect();
        assert_eq!(signs, [Sign::Plus, Sign::Plus, Sign::Minus, Sign::Plus]);
        assert!(flat[3].node.ptr_eq(&z));
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn test_negation_folds_into_sign() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let s = &x + -y.sin();

        let flat = terms(&s);
        assert_eq!(flat[1].sign, Sign::Minus);
        assert!(matches!(flat[1].node.kind(), NodeKind::Function(..)));
    }

    #[test]
    fn test_empty_sum_is_zero() {
        let s = Node::sum([]);
        assert_eq!(s.eval::<Dbl>().unwrap(), Dbl::new(0.0, 0.0));
    }

    #[test]
    fn test_sum_permutations_agree() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();
        set_both(&x, "3.1", "4.1");
        set_both(&y, "8.8", "9.9");

        let expected = Dbl::new(3.1 + 8.8 + 3.4, 4.1 + 9.9 + 5.6);
        let expected_mp = mpfr("3.1", "4.1") + &mpfr("8.8", "9.9") + &mpfr("3.4", "5.6");
        let orders = [
            &x + &y + &a,
            &a + &x + &y,
            &y + &a + &x,
            &y + &x + &a,
            &x + &a + &y,
            &a + &y + &x,
        ];
        for f in &orders {
            assert_close_dbl(f.eval::<Dbl>().unwrap(), expected);
            assert_mpfr(f, &expected_mp);
            assert_agree(f);
            assert_eq!(f.degree(), 1);
            assert_eq!(f.degree_wrt(&x), 1);
            assert_eq!(f.degree_wrt(&y), 1);
        }
    }

    #[test]
    fn test_differences() {
        let x = Node::variable("x");
        let y = Node::variable("y");
        let a = Node::number("3.4", "5.6").unwrap();
        set_both(&x, "3.1", "4.1");
        set_both(&y, "8.8", "9.9");

        let (xm, ym, am) = (mpfr("3.1", "4.1"), mpfr("8.8", "9.9"), mpfr("3.4", "5.6"));

        let f = &x - &y - &a;
        assert_close_dbl(
            f.eval::<Dbl>().unwrap(),
            Dbl::new(3.1 - 8.8 - 3.4, 4.1 - 9.9 - 5.6),
        );
        assert_mpfr(&f, &(xm.clone() - &ym - &am));
        assert_agree(&f);

        let g = &a - &x - &y;
        assert_close_dbl(
            g.eval::<Dbl>().unwrap(),
            Dbl::new(3.4 - 3.1 - 8.8, 5.6 - 4.1 - 9.9),
        );
        assert_mpfr(&g, &(am.clone() - &xm - &ym));
        assert_mpfr(&(&y - &x + &a), &(ym - &xm + &am));
        assert_eq!(g.degree(), 1);
        assert_eq!(g.degree_wrt(&y), 1);
    }
}
