use libtest_mimic::{run_tests, Arguments, Outcome, Test};
use std::error::Error;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

mod common;
mod exec;

use common::*;
use exec::*;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Arguments::from_args();
    let test_files = collect_test_files()?;
    let tests = test_files.into_iter().map(TestCase::new).collect();
    run_tests(&args, tests, TestCase::drive_test).exit();
}

/// Collects all `.trellis` system test files, starting from trellis/src/test and visiting all
/// nested directories.
fn collect_test_files() -> Result<Vec<Test<PathBuf>>, Box<dyn Error>> {
    let root_test_path = Path::new("src/test");
    let mut dirs_to_visit = vec![root_test_path.to_path_buf()];
    let mut tests = Vec::with_capacity(32);
    while let Some(dir) = dirs_to_visit.pop() {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let entry_type = entry.file_type()?;
            if entry_type.is_dir() {
                dirs_to_visit.push(path);
                continue;
            }
            if path.extension() == Some(OsStr::new("trellis")) {
                let name = path.strip_prefix(root_test_path)?.display().to_string();

                tests.push(Test {
                    name,
                    kind: "system".to_owned(),
                    is_ignored: false,
                    is_bench: false,
                    data: path,
                });
            }
        }
    }
    tests.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(tests)
}

#[derive(Clone)]
enum TestCase {
    Emit(PathBuf, TrellisEmitTest),
    /// The test file could not be read into a test case; holds the failure message.
    FailedTestConstruction(String),
}

impl TestCase {
    /// Creates a test case from a trellis system test file.
    fn new(test_file: Test<PathBuf>) -> Test<Self> {
        let data = match fs::read_to_string(&test_file.data) {
            Ok(content) => match TrellisEmitTest::new(content) {
                Ok(test) => TestCase::Emit(test_file.data.clone(), test),
                Err(msg) => TestCase::FailedTestConstruction(msg),
            },
            Err(e) => TestCase::FailedTestConstruction(format!("Failure: {}", e)),
        };
        Test {
            name: test_file.name,
            kind: test_file.kind,
            is_ignored: test_file.is_ignored,
            is_bench: test_file.is_bench,
            data,
        }
    }

    /// Executes a trellis system test.
    fn drive_test(test: &Test<Self>) -> Outcome {
        match &test.data {
            TestCase::FailedTestConstruction(msg) => Outcome::Failed {
                msg: Some(msg.clone()),
            },
            TestCase::Emit(path, tc) => tc.drive_test(path),
        }
    }
}

/// Describes a test case for the output of trellis on a grammar and an input.
#[derive(Clone)]
struct TrellisEmitTest {
    grammar: String,
    input: String,
    args: String,
    stdout: String,
    stderr: String,
    exitcode: String,
}

impl TrellisEmitTest {
    /// Creates a test case from the content of a .trellis test file.
    fn new(mut content: String) -> Result<Self, String> {
        let mut clauses = Vec::with_capacity(CLAUSES.len());
        for clause in CLAUSES.iter() {
            let delim = format!("{}\n", get_clause_delim(clause));
            let mut splits: Vec<String> = content.split(&delim).map(String::from).collect();

            if splits.len() != 3 {
                if is_optional(clause) || (bless() && can_be_blessed(clause)) {
                    clauses.push(String::new());
                    continue;
                }
                return Err(Self::missing_clause_failure(clause));
            }

            content = splits.pop().unwrap_or_default();
            let mut clause_content = splits.pop().unwrap_or_default();

            if *clause == "in" {
                // The split input always has a trailing newline that isn't part of the input.
                clause_content.pop();
            }
            clauses.push(clause_content);
        }
        let mut clauses = clauses.into_iter();
        let mut next = || clauses.next().unwrap_or_default();

        Ok(TrellisEmitTest {
            grammar: next(),
            input: next(),
            args: next(),
            stdout: next(),
            stderr: next(),
            exitcode: next(),
        })
    }

    /// Executes the test, ensuring the stdout, stderr, and exit code of trellis are as expected
    /// from the test file.
    /// If run in bless mode, the test file is updated with the actual output instead.
    fn drive_test(&self, test_path: &Path) -> Outcome {
        let (stdout, stderr, exitcode) = match exec_trellis(&self.args, &self.grammar, &self.input)
        {
            Ok(res) => res,
            Err(msg) => return Outcome::Failed { msg: Some(msg) },
        };

        if bless() {
            let blessed = self.make_bless_file(&stdout, &stderr, &exitcode);
            return match fs::write(test_path, blessed) {
                Ok(_) => Outcome::Passed,
                Err(e) => Outcome::Failed {
                    msg: Some(format!("Failure: {}", e)),
                },
            };
        }

        // Trailing whitespace of blessed clauses is not significant.
        macro_rules! t {
            ($expr:expr) => {
                $expr.trim_end()
            };
        }

        let mut msg = String::new();
        for (clause, expected, actual) in [
            ("stdout", &self.stdout, &stdout),
            ("stderr", &self.stderr, &stderr),
            ("exitcode", &self.exitcode, &exitcode),
        ]
        .iter()
        {
            if t!(expected) != t!(actual) {
                msg.push_str(&format!("Mismatch in {}:\n", clause));
                msg.push_str(&diff(t!(expected), t!(actual)));
            }
        }

        if msg.is_empty() {
            Outcome::Passed
        } else {
            msg.push_str("Hint: run the system tests with BLESS=1 to accept the actual output.");
            Outcome::Failed { msg: Some(msg) }
        }
    }

    /// Creates the content of a test file with the given outputs.
    fn make_bless_file(&self, stdout: &str, stderr: &str, exitcode: &str) -> String {
        let mut content = String::new();
        let mut push = |clause: &str, text: &str| {
            let delim = get_clause_delim(clause);
            content.push_str(&delim);
            content.push('\n');
            content.push_str(text);
            if clause == "in" || !text.ends_with('\n') {
                content.push('\n');
            }
            content.push_str(&delim);
            content.push('\n');
        };
        push("grammar", &self.grammar);
        push("in", &self.input);
        if !self.args.is_empty() {
            push("args", &self.args);
        }
        push("stdout", stdout);
        push("stderr", stderr);
        push("exitcode", exitcode);
        content
    }

    fn missing_clause_failure(clause: &str) -> String {
        let clause_delim = get_clause_delim(clause);
        let mut msg = format!(
            "Failure: {} clause missing in test case.\n\
            Hint: add a\n\n\t{}\n\t<text>\n\t{}\n\nsection to the test file.",
            clause_delim, clause_delim, clause_delim
        );
        if can_be_blessed(clause) {
            msg.push_str("\nHint: run the system tests with BLESS=1 to do this for you.");
        }
        msg
    }
}
