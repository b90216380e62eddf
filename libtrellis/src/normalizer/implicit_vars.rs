//! Implicit positional-variable insertion.
//!
//! A term of a sequence can be referred to by a later sibling as `_1`, `_2`, ..., by its 1-based
//! position. Referenced terms are bound with an explicit label, and the sequence becomes a scope.

use crate::grammar::collectors::collect_var_names;
use crate::grammar::{Node, NodeTransformer};

/// Labels the terms of every sequence in `body` that later siblings refer to positionally.
pub(super) fn insert_implicit_vars(rule: &str, body: Node) -> Node {
    ImplicitVars { rule }.transform(body)
}

struct ImplicitVars<'a> {
    rule: &'a str,
}

impl<'a> ImplicitVars<'a> {
    /// Labels referenced terms; returns whether any term was labelled.
    fn label_terms(&self, terms: &mut Vec<Node>) -> bool {
        let mut labelled = false;
        for i in 0..terms.len().saturating_sub(1) {
            let name = format!("_{}", i + 1);
            let referenced = terms[i + 1..]
                .iter()
                .any(|later| collect_var_names(later).contains(name.as_str()));
            let already_bound = matches!(&terms[i], Node::Label { name: bound, .. } if *bound == name);
            if referenced && !already_bound {
                let term = std::mem::replace(&mut terms[i], Node::Empty);
                terms[i] = Node::label(term, name.as_str());
                log::debug!("bound implicit variable `{}` in rule `{}`", name, self.rule);
                labelled = true;
            }
        }
        labelled
    }
}

impl<'a> NodeTransformer for ImplicitVars<'a> {
    fn transform(&mut self, node: Node) -> Node {
        match self.multiplex_transform_node(node) {
            Node::Seq(mut terms) => {
                if self.label_terms(&mut terms) {
                    Node::Scope {
                        rule: self.rule.to_owned(),
                        terms,
                    }
                } else {
                    Node::Seq(terms)
                }
            }
            Node::Scope { rule, mut terms } => {
                self.label_terms(&mut terms);
                Node::Scope { rule, terms }
            }
            node => node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::insert_implicit_vars;
    use crate::emit::Emit;
    use crate::parse_grammar;

    macro_rules! implicit_var_tests {
        ($($name:ident: $grammar:expr => $expected:expr)*) => {
        $(
            #[test]
            fn $name() {
                let rule = parse_grammar($grammar).unwrap().into_iter().next().unwrap();
                let body = insert_implicit_vars(&rule.name, rule.body);
                assert_eq!(body.emit_s_expression(), $expected);
            }
        )*
        }
    }

    implicit_var_tests! {
        positional: "a = 'x' 'y' -> _2"
            => r#"["choice",["scope","a",["lit","x"],["label",["lit","y"],"_2"],["action",["ll_var","_2"]]]]"#
        unreferenced: "a = 'x' 'y' -> 1"
            => r#"["choice",["seq",["lit","x"],["lit","y"],["action",["ll_dec","1"]]]]"#
        referenced_before: "a = -> _2 'y'"
            => r#"["choice",["seq",["action",["ll_var","_2"]],["lit","y"]]]"#
        already_bound: "a = 'x':_1 -> _1"
            => r#"["choice",["seq",["label",["lit","x"],"_1"],["action",["ll_var","_1"]]]]"#
        nested: "a = ('x' 'y' -> _1)*"
            => r#"["choice",["seq",["star",["paren",["choice",["scope","a",["label",["lit","x"],"_1"],["lit","y"],["action",["ll_var","_1"]]]]]]]]"#
        referenced_in_predicate: "a = {}:p 'x' ?(_2)"
            => r#"["choice",["scope","a",["label",["pos"],"p"],["label",["lit","x"],"_2"],["pred",["ll_var","_2"]]]]"#
    }
}
