//! Traits for visiting trellis grammar trees.

use super::*;

/// Describes a [grammar node](super::Node) visitor.
///
/// Every method has a default implementation that walks into the node's children, so a visitor
/// only needs to override the methods for nodes it is interested in.
pub trait NodeVisitor<'a> {
    /// Visits every rule body in a rule set.
    fn visit_rules(&mut self, rules: &'a RuleSet) {
        for rule in rules.iter() {
            self.visit_rule(rule);
        }
    }

    /// Visits a rule definition.
    fn visit_rule(&mut self, rule: &'a RuleDef) {
        self.visit_node(&rule.body);
    }

    /// Visits a node.
    fn visit_node(&mut self, node: &'a Node) {
        match node {
            Node::Choice(alts) => self.visit_choice(alts),
            Node::Seq(terms) => self.visit_seq(terms),
            Node::Scope { rule, terms } => self.visit_scope(rule, terms),
            Node::Label { inner, name } => self.visit_label(inner, name),
            Node::Leftrec { inner, rule } => self.visit_leftrec(inner, rule),
            Node::Memo { inner, rule } => self.visit_memo(inner, rule),
            Node::Apply(name) => self.visit_apply(name),
            Node::Lit(lit) => self.visit_lit(lit),
            Node::Range(lo, hi) => self.visit_range(*lo, *hi),
            Node::Not(inner)
            | Node::Opt(inner)
            | Node::Star(inner)
            | Node::Plus(inner)
            | Node::Paren(inner)
            | Node::Capture(inner) => self.visit_wrapper(node, inner),
            Node::Pred(expr) | Node::Eq(expr) | Node::Action(expr) => self.visit_sem_expr(expr),
            Node::Pos | Node::Empty => {}
        }
    }

    fn visit_choice(&mut self, alts: &'a [Node]) {
        for alt in alts {
            self.visit_node(alt);
        }
    }

    fn visit_seq(&mut self, terms: &'a [Node]) {
        for term in terms {
            self.visit_node(term);
        }
    }

    fn visit_scope(&mut self, _rule: &'a str, terms: &'a [Node]) {
        self.visit_seq(terms);
    }

    fn visit_label(&mut self, inner: &'a Node, _name: &'a str) {
        self.visit_node(inner);
    }

    fn visit_leftrec(&mut self, inner: &'a Node, _rule: &'a str) {
        self.visit_node(inner);
    }

    fn visit_memo(&mut self, inner: &'a Node, _rule: &'a str) {
        self.visit_node(inner);
    }

    fn visit_apply(&mut self, _name: &'a str) {}

    fn visit_lit(&mut self, _lit: &'a str) {}

    fn visit_range(&mut self, _lo: char, _hi: char) {}

    /// Visits a node with a single child (`not`, `opt`, `star`, `plus`, `paren`, `capture`).
    fn visit_wrapper(&mut self, _wrapper: &'a Node, inner: &'a Node) {
        self.visit_node(inner);
    }

    /// Visits a semantic expression.
    fn visit_sem_expr(&mut self, expr: &'a SemExpr) {
        match expr {
            SemExpr::Var(name) => self.visit_var(name),
            SemExpr::Dec(_) | SemExpr::Hex(_) | SemExpr::Str(_) => {}
            SemExpr::Plus(lhs, rhs) => {
                self.visit_sem_expr(lhs);
                self.visit_sem_expr(rhs);
            }
            SemExpr::Qual(base, ops) => {
                self.visit_sem_expr(base);
                for op in ops {
                    match op {
                        PostOp::GetItem(index) => self.visit_sem_expr(index),
                        PostOp::Call(args) => args.iter().for_each(|a| self.visit_sem_expr(a)),
                        PostOp::GetAttr(_) => {}
                    }
                }
            }
            SemExpr::Arr(elems) => {
                for elem in elems {
                    self.visit_sem_expr(elem);
                }
            }
        }
    }

    /// Visits a variable reference in a semantic expression.
    fn visit_var(&mut self, _name: &'a str) {}
}
