//! Emit strategies for the libtrellis grammar IR.

use crate::grammar::interchange::{node_to_value, rules_to_value, sem_expr_to_value};
use crate::grammar::*;
use crate::utils::quote_literal;

use core::fmt;

/// The format in which a trellis grammar should be emitted.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum EmitFormat {
    /// Canonical grammar text, accepted by the [parser](crate::parse_grammar).
    /// For example, `a=b|c` is output as
    ///
    /// ```text
    /// a = b
    ///   | c
    /// ```
    Pretty,
    /// The tagged-sequence [interchange form](crate::grammar::interchange), as JSON.
    /// For example, `a='b'` is output as `["rules",["rule","a",["lit","b"]]]` once normalized.
    SExpression,
    /// Trellis internal debug form.
    /// NB: this form is not stable, and no assumptions should be made about it.
    Debug,
}

/// Implements the emission of a type in an [EmitFormat][EmitFormat].
pub trait Emit
where
    Self: fmt::Display + fmt::Debug,
{
    /// Emit `self` with the given [EmitFormat][EmitFormat].
    fn emit(&self, form: EmitFormat) -> String {
        match form {
            EmitFormat::Pretty => self.emit_pretty(),
            EmitFormat::SExpression => self.emit_s_expression(),
            EmitFormat::Debug => self.emit_debug(),
        }
    }

    /// Emit `self` with the [pretty emit format][EmitFormat::Pretty]
    fn emit_pretty(&self) -> String;

    /// Emit `self` with the [s_expression emit format][EmitFormat::SExpression]
    fn emit_s_expression(&self) -> String;

    /// Emit `self` with the [debug emit format][EmitFormat::Debug]
    fn emit_debug(&self) -> String {
        format!("{:#?}", self)
    }
}

/// Implements `core::fmt::Display` for a type implementing `Emit`.
#[doc(hidden)]
macro_rules! fmt_emit_impl {
    ($($S:path)*) => {$(
        impl core::fmt::Display for $S {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.emit_pretty())
            }
        }
    )*};
}

fmt_emit_impl!(RuleSet Grammar Node SemExpr);

impl Emit for RuleSet {
    fn emit_pretty(&self) -> String {
        self.iter()
            .map(|rule| emit_rule(&rule.name, &rule.body))
            .collect()
    }

    fn emit_s_expression(&self) -> String {
        rules_to_value(self).to_string()
    }
}

impl Emit for Grammar {
    fn emit_pretty(&self) -> String {
        self.rules().map(|(name, body)| emit_rule(name, body)).collect()
    }

    fn emit_s_expression(&self) -> String {
        rules_to_value(&self.to_rule_set()).to_string()
    }
}

impl Emit for Node {
    fn emit_pretty(&self) -> String {
        pretty_node(self, Prec::Choice)
    }

    fn emit_s_expression(&self) -> String {
        node_to_value(self).to_string()
    }
}

impl Emit for SemExpr {
    fn emit_pretty(&self) -> String {
        pretty_sem_expr(self)
    }

    fn emit_s_expression(&self) -> String {
        sem_expr_to_value(self).to_string()
    }
}

/// Strips the wrappers that print transparently.
fn transparent(mut node: &Node) -> &Node {
    while let Node::Leftrec { inner, .. } | Node::Memo { inner, .. } = node {
        node = &**inner;
    }
    node
}

/// Emits a rule with its top-level alternatives on separate lines, aligned under the `=`.
fn emit_rule(name: &str, body: &Node) -> String {
    let alts = match transparent(body) {
        Node::Choice(alts) => alts.iter().map(pretty_alt).collect(),
        body => vec![pretty_alt(body)],
    };
    let indent = " ".repeat(name.len() + 1);
    let mut out = String::new();
    for (i, alt) in alts.iter().enumerate() {
        let line = if i == 0 {
            format!("{} = {}", name, alt)
        } else {
            format!("{}| {}", indent, alt)
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn pretty_alt(alt: &Node) -> String {
    match transparent(alt) {
        Node::Empty => String::new(),
        alt => pretty_node(alt, Prec::Seq),
    }
}

/// Binding strength of grammar expressions, loosest first.
#[derive(Copy, Clone, PartialEq, PartialOrd)]
enum Prec {
    Choice,
    Seq,
    Term,
    Postfix,
    Prim,
}

fn prec(node: &Node) -> Prec {
    match node {
        Node::Choice(alts) if alts.len() > 1 => Prec::Choice,
        Node::Choice(alts) => alts.first().map_or(Prec::Prim, prec),
        Node::Seq(terms) | Node::Scope { terms, .. } if terms.len() > 1 => Prec::Seq,
        Node::Seq(terms) | Node::Scope { terms, .. } => terms.first().map_or(Prec::Prim, prec),
        Node::Leftrec { inner, .. } | Node::Memo { inner, .. } => prec(inner),
        Node::Label { .. } | Node::Not(_) => Prec::Term,
        Node::Opt(_) | Node::Star(_) | Node::Plus(_) => Prec::Postfix,
        _ => Prec::Prim,
    }
}

fn is_action(node: &Node) -> bool {
    match node {
        Node::Action(_) => true,
        Node::Choice(nodes) | Node::Seq(nodes) | Node::Scope { terms: nodes, .. } => {
            nodes.len() == 1 && is_action(&nodes[0])
        }
        Node::Leftrec { inner, .. } | Node::Memo { inner, .. } => is_action(inner),
        _ => false,
    }
}

fn is_empty(node: &Node) -> bool {
    match node {
        Node::Empty => true,
        Node::Choice(nodes) | Node::Seq(nodes) => nodes.len() == 1 && is_empty(&nodes[0]),
        _ => false,
    }
}

/// Pretty-prints `node`, parenthesizing it if it binds looser than `min`.
fn pretty_node(node: &Node, min: Prec) -> String {
    if prec(node) < min {
        return format!("({})", pretty_node(node, Prec::Choice));
    }
    match node {
        Node::Choice(alts) if alts.len() == 1 => pretty_node(&alts[0], min),
        Node::Choice(alts) => alts
            .iter()
            .map(|alt| match alt {
                Node::Empty => "()".to_owned(),
                alt => pretty_node(alt, Prec::Seq),
            })
            .collect::<Vec<_>>()
            .join(" | "),
        Node::Seq(terms) | Node::Scope { terms, .. } if terms.len() == 1 => {
            pretty_node(&terms[0], min)
        }
        Node::Seq(terms) | Node::Scope { terms, .. } => pretty_terms(terms),
        Node::Leftrec { inner, .. } | Node::Memo { inner, .. } => pretty_node(inner, min),
        Node::Label { inner, name } => format!("{}:{}", pretty_node(inner, Prec::Postfix), name),
        Node::Not(inner) => format!("~{}", pretty_node(inner, Prec::Term)),
        Node::Opt(inner) => format!("{}?", pretty_postfix_inner(inner)),
        Node::Star(inner) => format!("{}*", pretty_postfix_inner(inner)),
        Node::Plus(inner) => format!("{}+", pretty_postfix_inner(inner)),
        Node::Apply(name) => name.clone(),
        Node::Lit(lit) => quote_literal(lit),
        Node::Range(lo, hi) => format!(
            "{}..{}",
            quote_literal(&lo.to_string()),
            quote_literal(&hi.to_string())
        ),
        Node::Paren(inner) if is_empty(inner) => "()".to_owned(),
        Node::Paren(inner) => format!("({})", pretty_node(inner, Prec::Choice)),
        Node::Capture(inner) if is_empty(inner) => "{()}".to_owned(),
        Node::Capture(inner) => format!("{{{}}}", pretty_node(inner, Prec::Choice)),
        Node::Pred(expr) => format!("?({})", pretty_sem_expr(expr)),
        Node::Eq(expr) => format!("={{{}}}", pretty_sem_expr(expr)),
        Node::Action(expr) => format!("-> {}", pretty_sem_expr(expr)),
        Node::Pos => "{}".to_owned(),
        Node::Empty => "()".to_owned(),
    }
}

fn pretty_postfix_inner(inner: &Node) -> String {
    if is_action(inner) {
        format!("({})", pretty_node(inner, Prec::Choice))
    } else {
        pretty_node(inner, Prec::Prim)
    }
}

/// Prints the terms of a sequence. An action followed by a term starting with `(` is
/// parenthesized, as the parser would otherwise read the term as a call.
fn pretty_terms(terms: &[Node]) -> String {
    let printed: Vec<_> = terms.iter().map(|t| pretty_node(t, Prec::Term)).collect();
    let mut out = Vec::with_capacity(printed.len());
    for (i, term) in printed.iter().enumerate() {
        let next_is_group = printed.get(i + 1).map_or(false, |t| t.starts_with('('));
        if next_is_group && is_action(&terms[i]) {
            out.push(format!("({})", term));
        } else {
            out.push(term.clone());
        }
    }
    out.join(" ")
}

fn pretty_sem_expr(expr: &SemExpr) -> String {
    match expr {
        SemExpr::Var(name) | SemExpr::Dec(name) => name.clone(),
        SemExpr::Hex(hex) => format!("0x{}", hex),
        SemExpr::Str(s) => quote_literal(s),
        SemExpr::Plus(lhs, rhs) => {
            let rhs = match rhs.as_ref() {
                SemExpr::Plus(..) => format!("({})", pretty_sem_expr(rhs)),
                rhs => pretty_sem_expr(rhs),
            };
            format!("{} + {}", pretty_sem_expr(lhs), rhs)
        }
        SemExpr::Qual(base, ops) => {
            let mut out = match base.as_ref() {
                SemExpr::Plus(..) => format!("({})", pretty_sem_expr(base)),
                base => pretty_sem_expr(base),
            };
            for op in ops {
                match op {
                    PostOp::GetItem(index) => out.push_str(&format!("[{}]", pretty_sem_expr(index))),
                    PostOp::Call(args) => out.push_str(&format!("({})", pretty_sem_exprs(args))),
                    PostOp::GetAttr(name) => out.push_str(&format!(".{}", name)),
                }
            }
            out
        }
        SemExpr::Arr(elems) => format!("[{}]", pretty_sem_exprs(elems)),
    }
}

fn pretty_sem_exprs(exprs: &[SemExpr]) -> String {
    exprs
        .iter()
        .map(pretty_sem_expr)
        .collect::<Vec<_>>()
        .join(", ")
}
