//! Errors produced while normalizing a grammar.

use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::grammar::RuleSet;

use thiserror::Error;

/// A grammar that cannot be normalized into an executable [`Grammar`](crate::Grammar).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("grammar has no rules")]
    EmptyGrammar,
    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: String },
    #[error("rule `{rule}` references undefined rule `{reference}`")]
    UnresolvedRule { rule: String, reference: String },
    #[error("`{name}` is not a left-recursive rule")]
    UnknownLeftAssocRule { name: String },
}

define_errors! {
    GrammarErrors;

    ///A grammar must define at least one rule. The first rule defined is the starting rule.
    G0001: NoRules {
        () => {
            Diagnostic::span_err(
                (0, 0),
                "Grammar has no rules",
                NoRules::CODE,
                None,
            )
            .with_help("define a starting rule, for example `start = 'a'*`")
        }
    }

    ///Every rule name may be defined only once. Alternatives of a rule are written in a single
    ///definition separated by `|`:
    ///
    ///```text
    ///value = number
    ///value = string
    ///```
    ///
    ///should be written
    ///
    ///```text
    ///value = number
    ///      | string
    ///```
    G0002: DuplicateRuleDefinition {
        ($span:expr, $name:expr, $first_span:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Rule `{}` is defined more than once", $name),
                DuplicateRuleDefinition::CODE,
                "redefined here".to_string(),
            )
            .with_spanned_note($first_span, "first defined here")
        }
    }

    ///A rule references a name that is neither a rule defined in the grammar nor one of the
    ///builtin rules `anything`, `end`, `digit`, and `letter`.
    ///
    ///Grammars are checked as a whole before they are run, so an undefined reference is an error
    ///even if the referencing alternative would never be tried.
    G0003: UndefinedRule {
        ($span:expr, $rule:expr, $reference:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Rule `{}` references undefined rule `{}`", $rule, $reference),
                UndefinedRule::CODE,
                format!("`{}` is referenced in this rule", $reference),
            )
        }
    }

    ///Only left-recursive rules can be made left-associative.
    ///
    ///A rule that is both left- and right-recursive, like
    ///
    ///```text
    ///expr = expr '+' expr | num
    ///```
    ///
    ///associates to the right by default. Naming it as left-associative makes `1+2+3` parse as
    ///`(1+2)+3` instead. Naming a rule that does not exist, or that is not left-recursive, has no
    ///meaning and is rejected.
    G0004: InvalidLeftAssoc {
        ($name:expr) => {
            Diagnostic::span_err(
                (0, 0),
                format!("`{}` is not a left-recursive rule", $name),
                InvalidLeftAssoc::CODE,
                None,
            )
        }
    }
}

impl GrammarError {
    /// The diagnostic code of this error.
    pub fn code(&self) -> &'static str {
        match self {
            GrammarError::EmptyGrammar => NoRules::CODE,
            GrammarError::DuplicateRule { .. } => DuplicateRuleDefinition::CODE,
            GrammarError::UnresolvedRule { .. } => UndefinedRule::CODE,
            GrammarError::UnknownLeftAssocRule { .. } => InvalidLeftAssoc::CODE,
        }
    }

    /// Converts the error into a diagnostic pointing into the source of `rules`.
    pub fn to_diagnostic(&self, rules: &RuleSet) -> Diagnostic {
        let spans_of = |name: &str| {
            rules
                .iter()
                .filter(|r| r.name == name)
                .map(|r| r.span)
                .collect::<Vec<_>>()
        };
        match self {
            GrammarError::EmptyGrammar => NoRules!(),
            GrammarError::DuplicateRule { name } => {
                let spans = spans_of(name);
                let first = spans.first().copied().unwrap_or_default();
                let dup = spans.get(1).copied().unwrap_or(first);
                DuplicateRuleDefinition!(dup, name, first)
            }
            GrammarError::UnresolvedRule { rule, reference } => {
                let span = spans_of(rule).first().copied().unwrap_or_default();
                UndefinedRule!(span, rule, reference)
            }
            GrammarError::UnknownLeftAssocRule { name } => InvalidLeftAssoc!(name),
        }
    }
}
