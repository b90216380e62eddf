//! Structural simplification.

use crate::grammar::{Node, NodeTransformer};

/// Collapses single-child choices and sequences and removes parentheses.
pub(super) fn simplify(body: Node) -> Node {
    Simplifier.transform(body)
}

struct Simplifier;

impl NodeTransformer for Simplifier {
    fn transform(&mut self, node: Node) -> Node {
        match node {
            Node::Choice(alts) | Node::Seq(alts) if alts.len() == 1 => {
                let mut alts = alts;
                self.transform(alts.remove(0))
            }
            Node::Seq(terms) if terms.is_empty() => Node::Empty,
            Node::Paren(inner) => self.transform(*inner),
            node => self.multiplex_transform_node(node),
        }
    }
}
