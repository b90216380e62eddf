use difference::{Changeset, Difference};

/// Whether test files should be rewritten with the actual output of trellis.
pub fn bless() -> bool {
    std::env::var("BLESS") == Ok("1".into())
}

/// Path to use for the grammar of a system test, as it appears in diagnostics.
pub const GRAMMAR_PATH: &str = "test.grammar";

/// Ordered clauses of a .trellis test file.
pub const CLAUSES: [&str; 6] = ["grammar", "in", "args", "stdout", "stderr", "exitcode"];

/// Returns the delimiter for a test case clause in a .trellis test file.
pub fn get_clause_delim(clause: &str) -> String {
    format!("==={}", clause)
}

/// Returns whether a clause can be auto-generated with BLESS=1.
pub fn can_be_blessed(clause: &str) -> bool {
    matches!(clause, "exitcode" | "stdout" | "stderr")
}

/// Returns whether a clause may be left out of a test file.
pub fn is_optional(clause: &str) -> bool {
    clause == "args"
}

/// Renders a line diff between two texts.
pub fn diff(expected: &str, actual: &str) -> String {
    let Changeset { diffs, .. } = Changeset::new(expected, actual, "\n");

    let mut out = String::new();
    for diff in diffs {
        let (content, prefix) = match diff {
            Difference::Same(ref x) => (x, " "),
            Difference::Add(ref x) => (x, "+"),
            Difference::Rem(ref x) => (x, "-"),
        };
        for line in content.lines() {
            out.push_str(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
