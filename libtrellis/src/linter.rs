//! Provides linter-like diagnostics for a trellis grammar.
//!
//! Lints run on the raw [`RuleSet`], before normalization, so that they see the grammar as it was
//! written. All lints are warnings; a grammar with lint warnings is still valid.

macro_rules! explain_lint {
    ($(#[doc = $doc:expr])+ $code:ident: $linter:ident) => {
        use crate::diagnostics::DiagnosticRecord;

        $(#[doc = $doc])+
        impl<'a> DiagnosticRecord for $linter<'a> {
            const CODE: &'static str = stringify!($code);
            const EXPLANATION: &'static str = concat!($($doc, "\n"),+);
        }
    };
}

mod shadowed_alternative;
mod unused_rule;
use shadowed_alternative::*;
use unused_rule::*;

use crate::diagnostics::{Diagnostic, DiagnosticRecord, DiagnosticRegistry};
use crate::grammar::RuleSet;

/// Describes a trellis grammar linter.
pub trait LintRule
where
    Self: DiagnosticRecord,
{
    /// Lints the rules of a grammar.
    fn lint(rules: &RuleSet) -> Vec<Diagnostic>;
}

macro_rules! define_lints {
    ($($linter:ident,)*) => {
        /// A lint rule applying to the rules of a trellis grammar.
        #[derive(Copy, Clone, Debug, PartialEq)]
        pub enum RuleSetLintRule {
            $($linter),*
        }

        impl RuleSetLintRule {
            pub fn lint(&self, rules: &RuleSet) -> Vec<Diagnostic> {
                match self {
                    $(Self::$linter => $linter::lint(rules)),*
                }
            }

            pub fn all() -> Vec<Self> {
                vec![$(Self::$linter),*]
            }

            pub fn all_explanations() -> Vec<(&'static str, &'static str)> {
                vec![$(($linter::CODE, $linter::EXPLANATION)),*]
            }
        }
    };
}

define_lints! {
    ShadowedAlternativeLinter,
    UnusedRuleLinter,
}

/// Describes the configuration to use when linting a trellis grammar.
pub struct LintConfig {
    linters: Vec<RuleSetLintRule>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            linters: RuleSetLintRule::all(),
        }
    }
}

impl DiagnosticRegistry for LintConfig {
    /// All lint codes and their explanations.
    fn codes_with_explanations() -> Vec<(&'static str, &'static str)> {
        RuleSetLintRule::all_explanations()
    }
}

/// Lints a trellis [rule set](crate::grammar::RuleSet).
pub fn lint_rules(rules: &RuleSet) -> Vec<Diagnostic> {
    let config = LintConfig::default();
    let mut diags = vec![];
    for linter in config.linters.iter() {
        diags.extend(linter.lint(rules));
    }
    diags
}
