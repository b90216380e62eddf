//! Turns a raw [`RuleSet`] into an executable [`Grammar`].
//!
//! Normalization validates the grammar as a whole, then runs a fixed sequence of rewrites over
//! every rule body:
//!
//! 1. label-scope insertion,
//! 2. left-recursion detection and rewriting,
//! 3. implicit positional-variable insertion,
//! 4. structural simplification,
//! 5. memoization wrappers, when [requested](NormalizeOptions::memoize), around the rules whose
//!    outcome does not depend on variables bound by their callers.
//!
//! All passes are pure; normalizing the same rule set twice yields equal grammars.

#[macro_use]
pub mod errors;
mod implicit_vars;
mod leftrec;
mod memo;
mod scopes;
mod simplify;
mod validate;

pub use errors::GrammarError;

use crate::grammar::{Grammar, Node, RuleSet};

use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Options for [`normalize_with`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeOptions {
    /// Wrap the rule bodies that are not left-recursive, and that read no variables bound by their
    /// callers, in a [memo](Node::Memo) node, so the interpreter caches their outcome at each
    /// offset.
    pub memoize: bool,
    /// Left-recursive rules whose growth should associate to the left when the rule is also
    /// right-recursive.
    pub left_assoc: Vec<String>,
}

/// Normalizes a rule set with the default options.
pub fn normalize(rules: &RuleSet) -> Result<Grammar, GrammarError> {
    normalize_with(rules, &NormalizeOptions::default())
}

/// Normalizes a rule set.
pub fn normalize_with(rules: &RuleSet, options: &NormalizeOptions) -> Result<Grammar, GrammarError> {
    validate::validate(rules)?;

    let bodies: IndexMap<String, Node> = rules
        .iter()
        .map(|rule| {
            let body = scopes::insert_scopes(&rule.name, rule.body.clone());
            (rule.name.clone(), body)
        })
        .collect();

    let recursive = leftrec::left_recursive_rules(&bodies);
    for name in &options.left_assoc {
        if !recursive.contains(name) {
            return Err(GrammarError::UnknownLeftAssocRule { name: name.clone() });
        }
    }

    let bodies: IndexMap<String, Node> = bodies
        .into_iter()
        .map(|(rule, body)| {
            let body = if recursive.contains(&rule) {
                debug!("rule `{}` is left-recursive", rule);
                leftrec::rewrite(&rule, body)
            } else {
                body
            };
            let body = implicit_vars::insert_implicit_vars(&rule, body);
            let body = simplify::simplify(body);
            (rule, body)
        })
        .collect();

    let bodies = if options.memoize {
        let memoizable = memo::memoizable_rules(&bodies);
        bodies
            .into_iter()
            .map(|(rule, body)| match body {
                Node::Leftrec { .. } => (rule, body),
                body if memoizable.contains(&rule) => {
                    debug!("memoizing rule `{}`", rule);
                    let body = Node::Memo {
                        inner: Box::new(body),
                        rule: rule.clone(),
                    };
                    (rule, body)
                }
                body => {
                    debug!("not memoizing rule `{}`: it reads its callers' bindings", rule);
                    (rule, body)
                }
            })
            .collect()
    } else {
        bodies
    };

    let left_assoc: HashSet<String> = options.left_assoc.iter().cloned().collect();
    Ok(Grammar::new(bodies, left_assoc))
}
