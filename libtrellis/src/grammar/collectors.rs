//! Module `collectors` provides utilities for collecting items in a trellis grammar tree.

use super::{Node, NodeVisitor};

use std::collections::HashSet;

/// Collects the names of all rules applied in a node, builtin rules included.
pub fn collect_applied_rules(node: &Node) -> HashSet<&str> {
    let mut collector = AppliedRuleCollector::default();
    collector.visit_node(node);
    collector.rules
}
#[derive(Default)]
struct AppliedRuleCollector<'a> {
    rules: HashSet<&'a str>,
}
impl<'a> NodeVisitor<'a> for AppliedRuleCollector<'a> {
    fn visit_apply(&mut self, name: &'a str) {
        self.rules.insert(name);
    }
}

/// Collects the names of all variables referenced by semantic expressions in a node.
pub fn collect_var_names(node: &Node) -> HashSet<&str> {
    let mut collector = VarNameCollector::default();
    collector.visit_node(node);
    collector.vars
}
#[derive(Default)]
struct VarNameCollector<'a> {
    vars: HashSet<&'a str>,
}
impl<'a> NodeVisitor<'a> for VarNameCollector<'a> {
    fn visit_var(&mut self, name: &'a str) {
        self.vars.insert(name);
    }
}

/// Collects the names bound by labels in a node.
pub fn collect_label_names(node: &Node) -> HashSet<&str> {
    let mut collector = LabelNameCollector::default();
    collector.visit_node(node);
    collector.labels
}
#[derive(Default)]
struct LabelNameCollector<'a> {
    labels: HashSet<&'a str>,
}
impl<'a> NodeVisitor<'a> for LabelNameCollector<'a> {
    fn visit_label(&mut self, inner: &'a Node, name: &'a str) {
        self.labels.insert(name);
        self.visit_node(inner);
    }
}

/// Returns whether a node contains a label anywhere within it.
pub fn contains_label(node: &Node) -> bool {
    let mut finder = LabelFinder::default();
    finder.visit_node(node);
    finder.found
}
#[derive(Default)]
struct LabelFinder {
    found: bool,
}
impl<'a> NodeVisitor<'a> for LabelFinder {
    fn visit_label(&mut self, _inner: &'a Node, _name: &'a str) {
        self.found = true;
    }
}

#[cfg(test)]
mod test {
    use crate::parse_grammar;

    fn first_body(grammar: &str) -> crate::grammar::Node {
        let rules = parse_grammar(grammar).expect("grammar should parse");
        rules.iter().next().expect("one rule").body.clone()
    }

    #[test]
    fn collect_applied_rules() {
        let body = first_body("a = b (c | d)* ~e anything");
        let mut rules: Vec<_> = super::collect_applied_rules(&body).into_iter().collect();
        rules.sort();

        assert_eq!(rules, vec!["anything", "b", "c", "d", "e"]);
    }

    #[test]
    fn collect_var_names() {
        let body = first_body("a = 'x' ?( x ) -> f(y, [z])[w].q + _1");
        let mut vars: Vec<_> = super::collect_var_names(&body).into_iter().collect();
        vars.sort();

        assert_eq!(vars, vec!["_1", "f", "w", "x", "y", "z"]);
    }

    #[test]
    fn collect_label_names() {
        let body = first_body("a = 'x':x ('y':y)* {'z'}:z -> x");
        let mut labels: Vec<_> = super::collect_label_names(&body).into_iter().collect();
        labels.sort();

        assert_eq!(labels, vec!["x", "y", "z"]);
    }

    #[test]
    fn contains_label() {
        assert!(super::contains_label(&first_body("a = ('x':y)* -> y")));
        assert!(!super::contains_label(&first_body("a = 'x' -> _1")));
    }
}
