#![no_main]
use libfuzzer_sys::fuzz_target;

use libtrellis::{interpret, lint_rules, normalize_with, parse_grammar, Emit, NormalizeOptions};

// The grammar and the input are separated by the first NUL character.
fuzz_target!(|data: String| {
    let (grammar, input) = match data.find('\0') {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data.as_str(), ""),
    };

    let rules = match parse_grammar(grammar) {
        Ok(rules) => rules,
        Err(_) => return,
    };
    lint_rules(&rules);

    let mut outcomes = vec![];
    for memoize in &[false, true] {
        let options = NormalizeOptions {
            memoize: *memoize,
            ..NormalizeOptions::default()
        };
        if let Ok(normalized) = normalize_with(&rules, &options) {
            // Printed grammars must parse again.
            if parse_grammar(normalized.emit_pretty()).is_err() {
                panic!("printed grammar does not parse:\n{}", normalized.emit_pretty());
            }
            outcomes.push(interpret(&normalized, input, "fuzz"));
        }
    }
    if let [plain, memoized] = outcomes.as_slice() {
        assert_eq!(plain, memoized, "memoization changed the outcome");
    }
});
