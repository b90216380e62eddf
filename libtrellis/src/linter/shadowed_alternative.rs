explain_lint! {
    ///The shadowed alternative lint detects literal alternatives of a choice that can never match.
    ///
    ///A choice commits to the first alternative that matches. If an earlier alternative is a
    ///literal that is a prefix of a later literal alternative, the later one is never tried on an
    ///input it could match, because the earlier one always matches first:
    ///
    ///```text
    ///op = '<' | '<='
    ///```
    ///
    ///Against the input `<=`, `op` matches only `<`. Place longer literals first:
    ///
    ///```text
    ///op = '<=' | '<'
    ///```
    L0001: ShadowedAlternativeLinter
}

use crate::linter::LintRule;

use crate::diagnostics::Diagnostic;
use crate::grammar::*;
use crate::utils::quote_literal;

pub struct ShadowedAlternativeLinter<'a> {
    rule: &'a RuleDef,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> ShadowedAlternativeLinter<'a> {
    fn new(rule: &'a RuleDef) -> Self {
        Self {
            rule,
            diagnostics: vec![],
        }
    }
}

/// The literal an alternative matches, if it matches exactly one literal.
fn as_literal(node: &Node) -> Option<&str> {
    match node {
        Node::Lit(lit) => Some(lit.as_str()),
        Node::Seq(nodes) | Node::Choice(nodes) if nodes.len() == 1 => as_literal(&nodes[0]),
        Node::Paren(inner) => as_literal(inner),
        _ => None,
    }
}

impl<'a> NodeVisitor<'a> for ShadowedAlternativeLinter<'a> {
    fn visit_choice(&mut self, alts: &'a [Node]) {
        let lits: Vec<Option<&str>> = alts.iter().map(as_literal).collect();
        for (i, later) in lits.iter().enumerate() {
            let later = match later {
                Some(later) => later,
                None => continue,
            };
            let shadow = lits[..i]
                .iter()
                .flatten()
                .find(|earlier| later.starts_with(**earlier));
            if let Some(earlier) = shadow {
                self.diagnostics.push(
                    Diagnostic::span_warn(
                        self.rule.span,
                        "Unreachable alternative",
                        Self::CODE,
                        format!(
                            "{} in rule `{}` can never match",
                            quote_literal(later),
                            self.rule.name
                        ),
                    )
                    .with_note(format!(
                        "{} is a prefix of {} and is tried first",
                        quote_literal(earlier),
                        quote_literal(later)
                    ))
                    .with_help("consider placing the longer literal first"),
                );
            }
        }

        for alt in alts {
            self.visit_node(alt);
        }
    }
}

impl<'a> LintRule for ShadowedAlternativeLinter<'a> {
    fn lint(rules: &RuleSet) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];
        for rule in rules.iter() {
            let mut linter = ShadowedAlternativeLinter::new(rule);
            linter.visit_rule(rule);
            diagnostics.extend(linter.diagnostics);
        }
        diagnostics
    }
}
