explain_lint! {
    ///The unused rule lint detects rules that are never applied.
    ///
    ///Interpretation starts at the first rule of a grammar. Any other rule that no other rule
    ///references can never be reached, and is likely a typo or a leftover:
    ///
    ///```text
    ///expr = num '+' num,
    ///num  = digit+,
    ///nmu  = letter+,
    ///```
    ///
    ///Here `nmu` is never applied. A rule that references only itself is also unused.
    L0002: UnusedRuleLinter
}

use crate::linter::LintRule;

use crate::diagnostics::Diagnostic;
use crate::grammar::collectors::collect_applied_rules;
use crate::grammar::*;

use std::collections::HashSet;

pub struct UnusedRuleLinter<'a> {
    used: HashSet<&'a str>,
}

impl<'a> UnusedRuleLinter<'a> {
    fn new(rules: &'a RuleSet) -> Self {
        let mut used = HashSet::new();
        for rule in rules.iter() {
            used.extend(
                collect_applied_rules(&rule.body)
                    .into_iter()
                    .filter(|&name| name != rule.name),
            );
        }
        Self { used }
    }
}

impl<'a> LintRule for UnusedRuleLinter<'a> {
    fn lint(rules: &RuleSet) -> Vec<Diagnostic> {
        let linter = UnusedRuleLinter::new(rules);
        rules
            .iter()
            .skip(1)
            .filter(|rule| !linter.used.contains(rule.name.as_str()))
            .map(|rule| {
                Diagnostic::span_warn(
                    rule.span,
                    "Unused rule",
                    Self::CODE,
                    format!("rule `{}` is never applied", rule.name),
                )
                .with_help("remove the rule, or apply it from another rule")
            })
            .collect()
    }
}
