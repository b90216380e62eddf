//! Selection of the rules that may be memoized.
//!
//! Variables resolve against every enclosing scope, so a rule that reads a variable it does not
//! bind itself sees its caller's bindings. The outcome of such a rule, or of any rule applying
//! one, is not determined by its offset alone, and it is never memoized.

use crate::grammar::collectors::{collect_applied_rules, collect_label_names, collect_var_names};
use crate::grammar::Node;
use crate::interpreter::BUILTIN_FUNCTIONS;

use indexmap::IndexMap;
use std::collections::HashSet;

const CONSTANTS: &[&str] = &["true", "false", "null"];

/// Returns the rules whose outcome at an offset does not depend on their callers' bindings.
pub(super) fn memoizable_rules(bodies: &IndexMap<String, Node>) -> HashSet<String> {
    let mut open: HashSet<&str> = bodies
        .iter()
        .filter(|(_, body)| has_free_vars(body))
        .map(|(name, _)| name.as_str())
        .collect();
    loop {
        let newly_open: Vec<&str> = bodies
            .iter()
            .filter(|(name, _)| !open.contains(name.as_str()))
            .filter(|(_, body)| {
                collect_applied_rules(body)
                    .iter()
                    .any(|applied| open.contains(applied))
            })
            .map(|(name, _)| name.as_str())
            .collect();
        if newly_open.is_empty() {
            break;
        }
        open.extend(newly_open);
    }
    bodies
        .keys()
        .filter(|name| !open.contains(name.as_str()))
        .cloned()
        .collect()
}

fn has_free_vars(body: &Node) -> bool {
    let bound = collect_label_names(body);
    collect_var_names(body).into_iter().any(|var| {
        !bound.contains(var) && !CONSTANTS.contains(&var) && !BUILTIN_FUNCTIONS.contains(&var)
    })
}
