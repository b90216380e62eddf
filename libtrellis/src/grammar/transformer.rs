use super::*;

/// A trait for transforming a grammar tree into another tree of the same grammar.
/// This transformer takes ownership of the nodes it transforms.
///
/// Implementors override [`transform`](NodeTransformer::transform) for the nodes they rewrite and
/// defer to [`multiplex_transform_node`](NodeTransformer::multiplex_transform_node) to recurse into
/// the children of everything else.
pub trait NodeTransformer {
    fn transform(&mut self, node: Node) -> Node {
        self.multiplex_transform_node(node)
    }

    /// Transforms the children of `node`, leaving `node` itself in place.
    fn multiplex_transform_node(&mut self, node: Node) -> Node {
        match node {
            Node::Choice(alts) => Node::Choice(self.transform_all(alts)),
            Node::Seq(terms) => Node::Seq(self.transform_all(terms)),
            Node::Scope { rule, terms } => Node::Scope {
                rule,
                terms: self.transform_all(terms),
            },
            Node::Label { inner, name } => Node::Label {
                inner: self.transform_boxed(inner),
                name,
            },
            Node::Leftrec { inner, rule } => Node::Leftrec {
                inner: self.transform_boxed(inner),
                rule,
            },
            Node::Memo { inner, rule } => Node::Memo {
                inner: self.transform_boxed(inner),
                rule,
            },
            Node::Not(inner) => Node::Not(self.transform_boxed(inner)),
            Node::Opt(inner) => Node::Opt(self.transform_boxed(inner)),
            Node::Star(inner) => Node::Star(self.transform_boxed(inner)),
            Node::Plus(inner) => Node::Plus(self.transform_boxed(inner)),
            Node::Paren(inner) => Node::Paren(self.transform_boxed(inner)),
            Node::Capture(inner) => Node::Capture(self.transform_boxed(inner)),
            leaf @ Node::Apply(_)
            | leaf @ Node::Lit(_)
            | leaf @ Node::Range(..)
            | leaf @ Node::Pred(_)
            | leaf @ Node::Eq(_)
            | leaf @ Node::Action(_)
            | leaf @ Node::Pos
            | leaf @ Node::Empty => leaf,
        }
    }

    fn transform_all(&mut self, nodes: Vec<Node>) -> Vec<Node> {
        nodes.into_iter().map(|n| self.transform(n)).collect()
    }

    fn transform_boxed(&mut self, node: Box<Node>) -> Box<Node> {
        Box::new(self.transform(*node))
    }
}
