//! Label-scope insertion.

use crate::grammar::collectors::contains_label;
use crate::grammar::{Node, NodeTransformer};

/// Wraps every sequence of a rule body that contains a label, at any depth, in a
/// [scope](Node::Scope) owned by the rule. A labelled alternative that is not a sequence is
/// scoped as a sequence of one term.
pub(super) fn insert_scopes(rule: &str, body: Node) -> Node {
    let mut scoper = LabelScopes { rule };
    match scoper.transform(body) {
        body @ Node::Choice(_) => body,
        body => scoper.scope_alternative(body),
    }
}

struct LabelScopes<'a> {
    rule: &'a str,
}

impl<'a> LabelScopes<'a> {
    fn scope(&self, terms: Vec<Node>) -> Node {
        Node::Scope {
            rule: self.rule.to_owned(),
            terms,
        }
    }

    fn scope_alternative(&self, alt: Node) -> Node {
        match alt {
            Node::Seq(_) | Node::Scope { .. } => alt,
            alt if contains_label(&alt) => self.scope(vec![alt]),
            alt => alt,
        }
    }
}

impl<'a> NodeTransformer for LabelScopes<'a> {
    fn transform(&mut self, node: Node) -> Node {
        match self.multiplex_transform_node(node) {
            Node::Seq(terms) if terms.iter().any(contains_label) => self.scope(terms),
            Node::Choice(alts) => Node::Choice(
                alts.into_iter()
                    .map(|alt| self.scope_alternative(alt))
                    .collect(),
            ),
            node => node,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::insert_scopes;
    use crate::emit::Emit;
    use crate::parse_grammar;

    macro_rules! scope_tests {
        ($($name:ident: $grammar:expr => $expected:expr)*) => {
        $(
            #[test]
            fn $name() {
                let rule = parse_grammar($grammar).unwrap().into_iter().next().unwrap();
                let body = insert_scopes(&rule.name, rule.body);
                assert_eq!(body.emit_s_expression(), $expected);
            }
        )*
        }
    }

    scope_tests! {
        labelled_alternative: "a = 'x':y -> y | 'z'"
            => r#"["choice",["scope","a",["label",["lit","x"],"y"],["action",["ll_var","y"]]],["seq",["lit","z"]]]"#
        nested_label: "a = ('x':y)*"
            => r#"["choice",["scope","a",["star",["paren",["choice",["scope","a",["label",["lit","x"],"y"]]]]]]]"#
        nested_seq_shadows: "a = 'q':v ('x':v -> v) -> v"
            => r#"["choice",["scope","a",["label",["lit","q"],"v"],["paren",["choice",["scope","a",["label",["lit","x"],"v"],["action",["ll_var","v"]]]]],["action",["ll_var","v"]]]]"#
        labelled_later_alternative: "a = 'x' | 'y':z"
            => r#"["choice",["seq",["lit","x"]],["scope","a",["label",["lit","y"],"z"]]]"#
        unlabelled: "a = 'x' 'y'"
            => r#"["choice",["seq",["lit","x"],["lit","y"]]]"#
    }
}
