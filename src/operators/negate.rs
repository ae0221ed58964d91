//! Unary negation.
//!
//! Negation is folded into its operand wherever that keeps the tree flat:
//!
//! - a number literal is replaced by the negated literal
//! - a double negation cancels
//! - a sum flips the sign of every term
//! - a product negates its leading literal coefficient, or gains a `-1` coefficient
//!
//! Only the remaining cases produce a `Negate` node.

use log::debug;

use crate::expr::{Factor, Node, NodeKind, Number, Term};
use crate::operators::product;

pub(crate) fn negate(node: &Node) -> Node {
    match node.kind() {
        NodeKind::Number(number) => Node::from_kind(NodeKind::Number(number.negated())),
        NodeKind::Negate(child) => {
            debug!("cancelling double negation of {child}");
            child.clone()
        }
        NodeKind::Sum(terms) => {
            debug!("negating sum by flipping {} term signs", terms.len());
            Node::from_kind(NodeKind::Sum(
                terms
                    .iter()
                    .map(|term| Term::new(term.node.clone(), term.sign.flip()))
                    .collect(),
            ))
        }
        NodeKind::Product(factors) => negate_product(factors),
        _ => Node::from_kind(NodeKind::Negate(node.clone())),
    }
}

fn negate_product(factors: &[Factor]) -> Node {
    let coefficient = factors
        .first()
        .filter(|factor| !factor.inverted)
        .and_then(|factor| factor.node.as_number());

    let mut negated = Vec::with_capacity(factors.len() + 1);
    let rest = match coefficient {
        Some(number) => {
            let number = number.negated();
            debug!("negating product coefficient to {number}");
            if number.as_integer() != Some(1) {
                negated.push(Factor::new(
                    Node::from_kind(NodeKind::Number(number)),
                    false,
                ));
            }
            &factors[1..]
        }
        None => {
            debug!("prepending -1 coefficient to product");
            negated.push(Factor::new(
                Node::from_kind(NodeKind::Number(Number::from_integer(-1))),
                false,
            ));
            factors
        }
    };
    negated.extend_from_slice(rest);

    product::single_factor(&negated)
        .unwrap_or_else(|| Node::from_kind(NodeKind::Product(negated)))
}
