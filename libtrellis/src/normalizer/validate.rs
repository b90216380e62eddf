//! Whole-grammar validation, run before any rewriting.

use super::GrammarError;
use crate::grammar::collectors::collect_applied_rules;
use crate::grammar::{is_builtin_rule, RuleSet};

use std::collections::HashSet;

/// Rejects empty grammars, duplicate rule definitions, and references to undefined rules.
pub(super) fn validate(rules: &RuleSet) -> Result<(), GrammarError> {
    if rules.is_empty() {
        return Err(GrammarError::EmptyGrammar);
    }

    let mut defined = HashSet::with_capacity(rules.len());
    for rule in rules.iter() {
        if !defined.insert(rule.name.as_str()) {
            return Err(GrammarError::DuplicateRule {
                name: rule.name.clone(),
            });
        }
    }

    for rule in rules.iter() {
        let mut unresolved: Vec<_> = collect_applied_rules(&rule.body)
            .into_iter()
            .filter(|name| !defined.contains(name) && !is_builtin_rule(name))
            .collect();
        unresolved.sort_unstable();
        if let Some(reference) = unresolved.first() {
            return Err(GrammarError::UnresolvedRule {
                rule: rule.name.clone(),
                reference: reference.to_string(),
            });
        }
    }

    Ok(())
}
