//! Left-recursion detection and rewriting.

use crate::grammar::Node;

use indexmap::IndexMap;
use std::collections::HashSet;

/// Whether evaluating a node can re-enter a rule before consuming input.
#[derive(Copy, Clone, PartialEq, Debug)]
enum Recursion {
    Yes,
    No,
    /// Cannot be decided statically.
    Unknown,
}

/// Returns the names of all rules in `bodies` that are left-recursive, directly or through other
/// rules.
pub(super) fn left_recursive_rules(bodies: &IndexMap<String, Node>) -> HashSet<String> {
    bodies
        .iter()
        .filter(|&(rule, body)| {
            let mut path = HashSet::new();
            path.insert(rule.as_str());
            Detector { rule, bodies }.detect(body, &mut path) == Recursion::Yes
        })
        .map(|(rule, _)| rule.clone())
        .collect()
}

/// Wraps a rule body in a [leftrec](Node::Leftrec) node.
pub(super) fn rewrite(rule: &str, body: Node) -> Node {
    Node::Leftrec {
        inner: Box::new(body),
        rule: rule.to_owned(),
    }
}

struct Detector<'a> {
    rule: &'a str,
    bodies: &'a IndexMap<String, Node>,
}

impl<'a> Detector<'a> {
    /// `path` holds the rules entered since the rule under test, which count as non-recursive if
    /// entered again.
    fn detect(&self, node: &'a Node, path: &mut HashSet<&'a str>) -> Recursion {
        use Recursion::*;
        match node {
            Node::Apply(name) if name == self.rule => Yes,
            Node::Apply(name) => match self.bodies.get_full(name.as_str()) {
                Some((_, name, body)) if !path.contains(name.as_str()) => {
                    path.insert(name.as_str());
                    let recursion = self.detect(body, path);
                    path.remove(name.as_str());
                    recursion
                }
                _ => No,
            },
            Node::Choice(alts) => {
                if alts.iter().any(|alt| self.detect(alt, path) != No) {
                    Yes
                } else {
                    No
                }
            }
            Node::Seq(terms) | Node::Scope { terms, .. } => terms
                .iter()
                .map(|term| self.detect(term, path))
                .find(|recursion| *recursion != Unknown)
                .unwrap_or(No),
            Node::Pred(_) | Node::Eq(_) | Node::Pos => Unknown,
            Node::Lit(_) | Node::Range(..) | Node::Action(_) | Node::Empty => No,
            Node::Leftrec { .. } => Yes,
            Node::Opt(inner) | Node::Star(inner) | Node::Not(inner) => {
                match self.detect(inner, path) {
                    Yes => Yes,
                    _ => Unknown,
                }
            }
            Node::Plus(inner)
            | Node::Label { inner, .. }
            | Node::Capture(inner)
            | Node::Paren(inner)
            | Node::Memo { inner, .. } => self.detect(inner, path),
        }
    }
}
