//! Executes a normalized [`Grammar`] against input text.
//!
//! The interpreter is a backtracking recursive-descent evaluator. Match failure is ordinary state
//! (a failure flag plus the furthest failure seen so far), never an error value; only a failure
//! that reaches the starting rule is reported to the caller.
//!
//! Left-recursive rules are evaluated by seed growing: the rule is first evaluated with a failing
//! seed standing in for its recursive self-applications, and then repeatedly re-evaluated with the
//! best result found so far as the seed, until a re-evaluation no longer consumes more input.
//!
//! An [`Interpreter`] only borrows its grammar, and all evaluation state lives for a single
//! [`interpret`](Interpreter::interpret) call, so any number of interpreters may share one grammar
//! across threads.

pub mod errors;
pub mod value;

mod builtins;
mod semantic;

pub use builtins::BUILTIN_FUNCTIONS;

use crate::common::LineCol;
use crate::grammar::{Grammar, Node, SemExpr};
use errors::EvalError;
use semantic::Scopes;
use value::Value;

use log::{debug, trace};
use std::collections::{HashMap, HashSet};

/// The outcome of interpreting a grammar against an input.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseOutcome {
    /// The value produced by the starting rule, if the parse succeeded.
    pub value: Option<Value>,
    /// A single-line error message, if the parse failed.
    pub error: Option<String>,
    /// The final offset, in characters. On failure, the offset of the furthest failure.
    pub pos: usize,
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Converts the outcome into the parsed value or the error message.
    pub fn into_result(self) -> Result<Value, String> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value.unwrap_or(Value::Null)),
        }
    }
}

/// Interprets a grammar against input texts.
#[derive(Clone, Copy)]
pub struct Interpreter<'g> {
    grammar: &'g Grammar,
}

impl<'g> Interpreter<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        Self { grammar }
    }

    /// Parses `input` starting from the grammar's first rule. `source_name` identifies the input
    /// in error messages.
    pub fn interpret(&self, input: &str, source_name: &str) -> ParseOutcome {
        let start = self.grammar.start();
        debug!("interpreting `{}` from rule `{}`", source_name, start);

        let mut evaluator = Evaluator::new(self.grammar, input);
        match self.grammar.rule(start) {
            Some(body) => evaluator.apply_rule(start, body),
            None => evaluator.fail(Some(unknown_rule(start))),
        }
        let outcome = evaluator.finish(source_name);

        debug!(
            "finished `{}` at offset {}: {}",
            source_name,
            outcome.pos,
            if outcome.is_success() { "ok" } else { "failed" }
        );
        outcome
    }
}

/// Parses `input` with `grammar`. See [`Interpreter::interpret`].
pub fn interpret(grammar: &Grammar, input: &str, source_name: &str) -> ParseOutcome {
    Interpreter::new(grammar).interpret(input, source_name)
}

fn unknown_rule(name: &str) -> String {
    format!("Unknown rule `{}`", name)
}

/// The furthest failure seen so far.
#[derive(Clone, Debug)]
struct Failure {
    pos: usize,
    msg: Option<String>,
}

/// A recorded evaluation result: a left-recursion seed or a memoized outcome.
#[derive(Clone, Debug)]
struct Seed {
    val: Value,
    failed: bool,
    pos: usize,
}

impl Seed {
    fn failing(pos: usize) -> Self {
        Self {
            val: Value::Null,
            failed: true,
            pos,
        }
    }
}

#[derive(Clone, Debug)]
struct MemoEntry {
    outcome: Seed,
    /// The furthest failure recorded while computing the outcome.
    furthest: Option<Failure>,
}

type RuleKey<'g> = (&'g str, usize);

struct Evaluator<'g> {
    grammar: &'g Grammar,
    input: Vec<char>,
    pos: usize,
    val: Value,
    failed: bool,
    furthest: Option<Failure>,
    scopes: Scopes,
    seeds: HashMap<RuleKey<'g>, Seed>,
    /// Left-associative rules currently growing a seed.
    blocked: HashSet<&'g str>,
    memo: HashMap<RuleKey<'g>, MemoEntry>,
}

impl<'g> Evaluator<'g> {
    fn new(grammar: &'g Grammar, input: &str) -> Self {
        Self {
            grammar,
            input: input.chars().collect(),
            pos: 0,
            val: Value::Null,
            failed: false,
            furthest: None,
            scopes: Scopes::default(),
            seeds: HashMap::new(),
            blocked: HashSet::new(),
            memo: HashMap::new(),
        }
    }

    fn finish(self, source_name: &str) -> ParseOutcome {
        if !self.failed {
            return ParseOutcome {
                value: Some(self.val),
                error: None,
                pos: self.pos,
            };
        }

        let input = self.input;
        let (pos, msg) = match self.furthest {
            Some(Failure { pos, msg }) => (pos, msg),
            None => (self.pos, None),
        };
        let desc = msg.unwrap_or_else(|| match input.get(pos) {
            Some(c) => format!("Unexpected {:?}", c.to_string()),
            None => "Unexpected end of input".to_owned(),
        });
        let LineCol { line, col } = LineCol::of(&input, pos);
        ParseOutcome {
            value: None,
            error: Some(format!("{}:{} {} at column {}", source_name, line, desc, col)),
            pos,
        }
    }

    fn succeed(&mut self, val: Value) {
        self.val = val;
        self.failed = false;
    }

    fn fail(&mut self, msg: Option<String>) {
        self.fail_at(self.pos, msg);
    }

    /// Fails the current node, remembering the failure if it is at least as far as the furthest
    /// one seen so far. The current offset is left unchanged.
    fn fail_at(&mut self, pos: usize, msg: Option<String>) {
        self.val = Value::Null;
        self.failed = true;
        self.merge_failure(Some(Failure { pos, msg }));
    }

    fn merge_failure(&mut self, failure: Option<Failure>) {
        if let Some(failure) = failure {
            if self.furthest.as_ref().map_or(true, |f| failure.pos >= f.pos) {
                self.furthest = Some(failure);
            }
        }
    }

    fn adopt(&mut self, seed: Seed) {
        self.val = seed.val;
        self.failed = seed.failed;
        self.pos = seed.pos;
    }

    fn snapshot(&self) -> Seed {
        Seed {
            val: self.val.clone(),
            failed: self.failed,
            pos: self.pos,
        }
    }

    fn eval(&mut self, node: &'g Node) {
        match node {
            Node::Choice(alts) => self.eval_choice(alts),
            Node::Seq(terms) => self.eval_seq(terms),
            Node::Scope { terms, .. } => {
                self.scopes.push();
                self.eval_seq(terms);
                self.scopes.pop();
            }
            Node::Label { inner, name } => {
                self.eval(inner);
                if !self.failed {
                    self.scopes.bind(name, self.val.clone());
                }
            }
            Node::Leftrec { inner, rule } => self.eval_leftrec(inner, rule),
            Node::Memo { inner, rule } => self.eval_memo(inner, rule),
            Node::Apply(name) => match self.grammar.rule(name) {
                Some(body) => self.apply_rule(name, body),
                None => self.apply_builtin(name),
            },
            Node::Lit(lit) => self.match_str(lit),
            Node::Range(lo, hi) => match self.input.get(self.pos) {
                Some(&c) if (*lo..=*hi).contains(&c) => {
                    self.pos += 1;
                    self.succeed(Value::from(c));
                }
                _ => self.fail(None),
            },
            Node::Not(inner) => {
                let start = self.pos;
                let furthest = self.furthest.take();
                self.eval(inner);
                let matched = !self.failed;
                self.furthest = furthest;
                self.pos = start;
                if matched {
                    self.fail(None);
                } else {
                    self.succeed(Value::Null);
                }
            }
            Node::Opt(inner) => {
                let start = self.pos;
                self.eval(inner);
                if self.failed {
                    self.pos = start;
                    self.succeed(Value::Null);
                }
            }
            Node::Star(inner) => self.repeat(inner, Vec::new()),
            Node::Plus(inner) => {
                let start = self.pos;
                self.eval(inner);
                if self.failed {
                    return;
                }
                let first = std::mem::replace(&mut self.val, Value::Null);
                if self.pos == start {
                    self.succeed(Value::Seq(vec![first]));
                } else {
                    self.repeat(inner, vec![first]);
                }
            }
            Node::Paren(inner) => self.eval(inner),
            Node::Capture(inner) => {
                let start = self.pos;
                self.eval(inner);
                if !self.failed {
                    let text: String = self.input[start..self.pos].iter().collect();
                    self.succeed(Value::Str(text));
                }
            }
            Node::Pred(expr) => match self.eval_sem(expr) {
                Some(Value::Bool(true)) => self.succeed(Value::Bool(true)),
                Some(Value::Bool(false)) => self.fail(None),
                Some(other) => self.fail(Some(format!(
                    "Predicate evaluated to {}, not bool",
                    other.type_name()
                ))),
                None => {}
            },
            Node::Eq(expr) => match self.eval_sem(expr) {
                Some(Value::Str(s)) => self.match_str(&s),
                Some(other) => self.fail(Some(format!(
                    "Equality assertion evaluated to {}, not str",
                    other.type_name()
                ))),
                None => {}
            },
            Node::Action(expr) => {
                if let Some(val) = self.eval_sem(expr) {
                    self.succeed(val);
                }
            }
            Node::Pos => self.succeed(Value::Int(self.pos as i64)),
            Node::Empty => self.succeed(Value::Null),
        }
    }

    /// Evaluates a semantic expression. An evaluation error fails the current node with the error
    /// text and yields `None`.
    fn eval_sem(&mut self, expr: &SemExpr) -> Option<Value> {
        match semantic::eval(expr, &self.scopes) {
            Ok(val) => Some(val),
            Err(err) => {
                self.eval_error(err);
                None
            }
        }
    }

    fn eval_error(&mut self, err: EvalError) {
        self.fail(Some(err.to_string()));
    }

    fn eval_choice(&mut self, alts: &'g [Node]) {
        let start = self.pos;
        let (last, init) = match alts.split_last() {
            Some(split) => split,
            None => return self.fail(None),
        };
        for alt in init {
            self.eval(alt);
            if !self.failed {
                return;
            }
            self.pos = start;
        }
        self.eval(last);
    }

    fn eval_seq(&mut self, terms: &'g [Node]) {
        self.succeed(Value::Null);
        for term in terms {
            self.eval(term);
            if self.failed {
                return;
            }
        }
    }

    /// Matches `inner` until it fails, appending each value to `items`. Stops after a match that
    /// consumes nothing. Never fails.
    fn repeat(&mut self, inner: &'g Node, mut items: Vec<Value>) {
        loop {
            let start = self.pos;
            self.eval(inner);
            if self.failed {
                self.pos = start;
                break;
            }
            items.push(std::mem::replace(&mut self.val, Value::Null));
            if self.pos == start {
                break;
            }
        }
        self.succeed(Value::Seq(items));
    }

    fn match_str(&mut self, s: &str) {
        let start = self.pos;
        let mut len = 0;
        for expected in s.chars() {
            if self.input.get(start + len) != Some(&expected) {
                return self.fail_at(start + len, None);
            }
            len += 1;
        }
        self.pos = start + len;
        self.succeed(Value::Str(s.to_owned()));
    }

    fn apply_rule(&mut self, name: &'g str, body: &'g Node) {
        if self.blocked.is_empty() || self.blocked.contains(name) {
            return self.eval(body);
        }
        // Only direct self-applications of a growing left-associative rule are blocked; any other
        // rule starts with a clear set, so a nested occurrence (e.g. in parentheses) grows fully.
        let blocked = std::mem::take(&mut self.blocked);
        self.eval(body);
        self.blocked = blocked;
    }

    fn apply_builtin(&mut self, name: &str) {
        let next = self.input.get(self.pos).copied();
        let matched = match name {
            "anything" => next,
            "end" => {
                return match next {
                    None => self.succeed(Value::Null),
                    Some(_) => self.fail(None),
                };
            }
            "digit" => next.filter(|c| c.is_ascii_digit()),
            "letter" => next.filter(|c| c.is_alphabetic()),
            _ => return self.fail(Some(unknown_rule(name))),
        };
        match matched {
            Some(c) => {
                self.pos += 1;
                self.succeed(Value::from(c));
            }
            None => self.fail(None),
        }
    }

    fn eval_leftrec(&mut self, inner: &'g Node, rule: &'g str) {
        let start = self.pos;
        let key = (rule, start);

        if let Some(seed) = self.seeds.get(&key) {
            let seed = seed.clone();
            return self.adopt(seed);
        }

        if self.blocked.contains(rule) {
            // A left-associative rule re-entered at a new offset while it is growing matches
            // once, without growing, so the growing application extends on the left.
            self.seeds.insert(key, Seed::failing(start));
            self.eval(inner);
            self.seeds.remove(&key);
            return;
        }

        let left_assoc = self.grammar.is_left_assoc(rule);
        if left_assoc {
            self.blocked.insert(rule);
        }
        self.seeds.insert(key, Seed::failing(start));
        loop {
            self.pos = start;
            self.eval(inner);
            let grew = match self.seeds.get(&key) {
                Some(seed) => !self.failed && (seed.failed || self.pos > seed.pos),
                None => false,
            };
            if !grew {
                break;
            }
            trace!("grew `{}` at {} to {}", rule, start, self.pos);
            let seed = self.snapshot();
            self.seeds.insert(key, seed);
        }
        let seed = self.seeds.remove(&key).unwrap_or_else(|| Seed::failing(start));
        if left_assoc {
            self.blocked.remove(rule);
        }
        self.adopt(seed);
    }

    fn eval_memo(&mut self, inner: &'g Node, rule: &'g str) {
        let key = (rule, self.pos);
        if let Some(entry) = self.memo.get(&key) {
            trace!("memo hit for `{}` at {}", rule, key.1);
            let entry = entry.clone();
            self.adopt(entry.outcome);
            return self.merge_failure(entry.furthest);
        }

        let furthest = self.furthest.take();
        self.eval(inner);
        let inner_furthest = std::mem::replace(&mut self.furthest, furthest);
        let entry = MemoEntry {
            outcome: self.snapshot(),
            furthest: inner_furthest.clone(),
        };
        self.memo.insert(key, entry);
        self.merge_failure(inner_furthest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::{normalize_with, NormalizeOptions};
    use crate::parse_grammar;

    fn grammar_with(grammar: &str, options: &NormalizeOptions) -> Grammar {
        let rules = parse_grammar(grammar).expect("grammar should parse");
        normalize_with(&rules, options).expect("grammar should normalize")
    }

    fn run_with(grammar: &str, options: &NormalizeOptions, input: &str) -> ParseOutcome {
        interpret(&grammar_with(grammar, options), input, "test")
    }

    fn run(grammar: &str, input: &str) -> ParseOutcome {
        run_with(grammar, &NormalizeOptions::default(), input)
    }

    fn left_assoc(rule: &str) -> NormalizeOptions {
        NormalizeOptions {
            left_assoc: vec![rule.to_owned()],
            ..NormalizeOptions::default()
        }
    }

    fn memoized() -> NormalizeOptions {
        NormalizeOptions {
            memoize: true,
            ..NormalizeOptions::default()
        }
    }

    // Compares the displayed value of a parse, or its error message, against an expected string.
    macro_rules! interpret_tests {
        ($($name:ident: $grammar:expr, $input:expr => $expected:expr)*) => {
        $(
            #[test]
            fn $name() {
                let outcome = run($grammar, $input);
                let result = outcome.into_result().map(|value| value.to_string());
                let expected: Result<&str, &str> = $expected;
                assert_eq!(result, expected.map(str::to_owned).map_err(str::to_owned));
            }
        )*
        }
    }

    mod primitives {
        use super::*;

        interpret_tests! {
            lit: "a = 'abc'", "abc" => Ok(r#""abc""#)
            range: "a = '0'..'9'", "7" => Ok(r#""7""#)
            range_miss: "a = '0'..'9'", "x" => Err(r#"test:1 Unexpected "x" at column 1"#)
            anything: "a = anything anything", "λx" => Ok(r#""x""#)
            anything_at_end: "a = anything", "" => Err("test:1 Unexpected end of input at column 1")
            end: "a = 'a' end", "ab" => Err(r#"test:1 Unexpected "b" at column 2"#)
            digit: "a = digit+", "12" => Ok(r#"["1", "2"]"#)
            letter: "a = letter+", "héllo" => Ok(r#"["h", "é", "l", "l", "o"]"#)
            empty: "a = ()", "" => Ok("null")
            pos: "a = 'λλ' {}", "λλ" => Ok("2")
            capture: "a = '<' {(~'>' anything)*} '>' -> _2", "<abc>" => Ok(r#""abc""#)
            empty_capture: "a = {()}", "" => Ok(r#""""#)
        }
    }

    mod combinators {
        use super::*;

        interpret_tests! {
            choice_first_match: "a = 'foo' | 'foobar'", "foobar" => Ok(r#""foo""#)
            choice_last_error: "a = 'x' | 'y'", "z" => Err(r#"test:1 Unexpected "z" at column 1"#)
            seq_last_value: "a = 'x' 'y'", "xy" => Ok(r#""y""#)
            opt_miss: "a = 'a'?", "" => Ok("null")
            opt_then: "a = 'a'? 'b'", "b" => Ok(r#""b""#)
            star_empty: "a = 'a'*", "" => Ok("[]")
            star_many: "a = 'a'*", "aab" => Ok(r#"["a", "a"]"#)
            star_zero_width: "a = ()*", "x" => Ok("[null]")
            plus_none: "a = 'a'+", "b" => Err(r#"test:1 Unexpected "b" at column 1"#)
            plus_many: "a = 'a'+", "aa" => Ok(r#"["a", "a"]"#)
            not_miss: "a = ~'a' {}", "b" => Ok("0")
            not_hit: "a = ~'a' {}", "a" => Err(r#"test:1 Unexpected "a" at column 1"#)
            double_not: "a = ~~'a' {}", "a" => Ok("0")
        }

        #[test]
        fn choice_order_leaves_input() {
            let outcome = run("a = 'foo' | 'foobar'", "foobar");
            assert_eq!(outcome.pos, 3);
        }

        #[test]
        fn not_never_advances() {
            let grammar = grammar_with("a = ~'ab'", &NormalizeOptions::default());
            for input in &["ab", "ac", ""] {
                let outcome = interpret(&grammar, input, "test");
                assert_eq!(outcome.pos, 0, "{}", input);
            }
        }

        #[test]
        fn star_never_fails() {
            let grammar = grammar_with("a = 'ab'*", &NormalizeOptions::default());
            for input in &["", "a", "abab", "aba", "x"] {
                assert!(interpret(&grammar, input, "test").is_success(), "{}", input);
            }
        }

        #[test]
        fn plus_fails_iff_no_repetitions() {
            let grammar = grammar_with("a = 'ab'+", &NormalizeOptions::default());
            for (input, succeeds) in &[("", false), ("a", false), ("ab", true), ("abab", true)] {
                let outcome = interpret(&grammar, input, "test");
                assert_eq!(outcome.is_success(), *succeeds, "{}", input);
            }
        }

        #[test]
        fn star_rewinds_partial_match() {
            let outcome = run("a = 'ab'*", "aba");
            assert_eq!(outcome.pos, 2);
        }
    }

    mod semantics {
        use super::*;

        interpret_tests! {
            labels: "a = digit:x '+' digit:y -> [y, x]", "1+2" => Ok(r#"["2", "1"]"#)
            implicit_vars: "a = digit '+' digit -> [_1, _3]", "1+2" => Ok(r#"["1", "2"]"#)
            number: "a = {digit+}:n -> number(n) + 1", "41" => Ok("42")
            float: "a = {digit+ '.' digit+}:n -> number(n)", "2.5" => Ok("2.5")
            rule_scopes: "a = b:x b:y -> x + y, b = digit:x -> x", "12" => Ok(r#""12""#)
            nested_scope_shadows: "a = 'q':v ('x':v -> v) -> v", "qx" => Ok(r#""q""#)
            nested_scope_value: "a = 'q':v ('x':w -> v + w)", "qx" => Ok(r#""qx""#)
            builtin_rules: "a = letter+:l digit+:d end -> [cat(l), number(cat(d))]",
                "ab12" => Ok(r#"["ab", 12]"#)
            escapes: r"a = '\\' ('u' {digit digit digit digit}:h -> xtou(h))", r"\u0041" => Ok(r#""A""#)

            pred_true: "a = ?(true) 'a'", "a" => Ok(r#""a""#)
            pred_false: "a = ?(false) 'a'", "a" => Err(r#"test:1 Unexpected "a" at column 1"#)
            pred_zero: "a = ?(0) 'a'", "a" => Err("test:1 Predicate evaluated to int, not bool at column 1")
            pred_start_pos: "a = {}:p ?(p) 'a'", "a" => Err("test:1 Predicate evaluated to int, not bool at column 1")
            pred_choice: "a = digit:d ?(is_unicat(d, 'Nd')) -> 'digit' | anything -> 'other'", "x" => Ok(r#""other""#)

            eq_match: "a = {digit}:d ={d}", "77" => Ok(r#""7""#)
            eq_mismatch: "a = {digit}:d ={d}", "78" => Err(r#"test:1 Unexpected "8" at column 2"#)
            eq_not_str: "a = ={1}", "1" => Err("test:1 Equality assertion evaluated to int, not str at column 1")

            builtin_error: "a = 'a' -> xtou('zz')", "a" => Err("test:1 invalid hexadecimal code point `zz` at column 2")
            builtin_error_backtracks: "a = 'a' -> xtou('zz') | 'a' -> 'ok'", "a" => Ok(r#""ok""#)
            undefined_variable: "a = 'a' -> q", "a" => Err("test:1 undefined variable `q` at column 2")
        }
    }

    mod furthest_failure {
        use super::*;

        interpret_tests! {
            first_char: r"a = 'a'+ '\n' 'b' end", "bc" => Err(r#"test:1 Unexpected "b" at column 1"#)
            second_line: r"a = 'a'+ '\n' 'b' end", "aa\nc" => Err(r#"test:2 Unexpected "c" at column 1"#)
            end_of_input: "a = 'ab'", "a" => Err("test:1 Unexpected end of input at column 2")
            across_alternatives: "a = 'abc' | 'ab' 'd'", "abx" => Err(r#"test:1 Unexpected "x" at column 3"#)
            not_discards_inner: "a = ~'abc' 'x'", "abd" => Err(r#"test:1 Unexpected "a" at column 1"#)
        }

        #[test]
        fn failure_pos_is_furthest_failure() {
            let outcome = run(r"a = 'a'+ '\n' 'b' end", "aa\nc");
            assert_eq!(outcome.pos, 3);
            assert_eq!(outcome.value, None);
        }
    }

    mod left_recursion {
        use super::*;

        pub(super) const SUM: &str = "
            expr = expr:a '+' num:b -> [a, '+', b]
                 | expr:a '-' num:b -> [a, '-', b]
                 | num,
            num = digit:d -> number(d),
        ";

        const MIXED: &str = "
            expr = expr:a '+' expr:b -> [a, '+', b]
                 | expr:a '-' expr:b -> [a, '-', b]
                 | num,
            num = digit:d -> number(d),
        ";

        const NESTED: &str = "
            expr = expr:a '+' expr:b -> [a, '+', b]
                 | term,
            term = '(' expr:e ')' -> e
                 | digit:d -> number(d),
        ";

        const INDIRECT: &str = "
            start = P:p end -> p,
            P = P:p '(n)' -> p + '(n)'
              | L,
            L = P:p '.x' -> p + '.x'
              | 'x',
        ";

        interpret_tests! {
            sum_associates_left: SUM, "3+4-5" => Ok(r#"[[3, "+", 4], "-", 5]"#)
            single: SUM, "3" => Ok("3")
            right_wins_by_default: MIXED, "3+4+5" => Ok(r#"[3, "+", [4, "+", 5]]"#)
            right_wins_mixed_ops: MIXED, "3+4-5" => Ok(r#"[3, "+", [4, "-", 5]]"#)
            indirect: INDIRECT, "x(n)(n).x(n).x" => Ok(r#""x(n)(n).x(n).x""#)
            indirect_plain: INDIRECT, "x" => Ok(r#""x""#)
            indirect_rejects: INDIRECT, "x(n)." => Err("test:1 Unexpected end of input at column 6")
            nested_parens: NESTED, "(1+2)+3" => Ok(r#"[[1, "+", 2], "+", 3]"#)
        }

        macro_rules! left_assoc_tests {
            ($($name:ident: $grammar:expr, $rule:expr, $input:expr => $expected:expr)*) => {
            $(
                #[test]
                fn $name() {
                    let outcome = run_with($grammar, &left_assoc($rule), $input);
                    let value = outcome.into_result().map(|value| value.to_string());
                    assert_eq!(value, Ok($expected.to_owned()));
                }
            )*
            }
        }

        left_assoc_tests! {
            blocked_sum: MIXED, "expr", "3+4+5" => r#"[[3, "+", 4], "+", 5]"#
            blocked_mixed_ops: MIXED, "expr", "3-4+5" => r#"[[3, "-", 4], "+", 5]"#
            blocked_long: MIXED, "expr", "1+2+3+4" => r#"[[[1, "+", 2], "+", 3], "+", 4]"#
            blocked_nested: NESTED, "expr", "1+(2+3+4)" => r#"[1, "+", [[2, "+", 3], "+", 4]]"#
        }

        #[test]
        fn consumes_whole_input() {
            let outcome = run(SUM, "1+2-3+4");
            assert_eq!(outcome.pos, 7);
        }

        #[test]
        fn seeds_do_not_leak() {
            let grammar = grammar_with(SUM, &NormalizeOptions::default());
            let mut evaluator = Evaluator::new(&grammar, "1+2");
            let body = grammar.rule("expr").expect("expr is defined");
            evaluator.apply_rule("expr", body);
            assert!(evaluator.seeds.is_empty());
            assert!(evaluator.blocked.is_empty());
            assert_eq!(evaluator.pos, 3);
        }
    }

    mod memoization {
        use super::*;

        const GRAMMAR: &str = "
            start = a:n 'x' -> n
                  | a:n 'y' -> n + 10,
            a = 'a'+ -> len(_1),
        ";

        #[test]
        fn memoized_matches_unmemoized() {
            let plain = grammar_with(GRAMMAR, &NormalizeOptions::default());
            let memo = grammar_with(GRAMMAR, &memoized());
            for input in &["ax", "aay", "aaz", "", "y"] {
                assert_eq!(
                    interpret(&plain, input, "test"),
                    interpret(&memo, input, "test"),
                    "{}",
                    input
                );
            }
        }

        #[test]
        fn callers_bindings_are_not_cached() {
            let grammar = "a = (-> 1):v b 'z' | (-> 2):v b, b = -> v";
            let plain = run_with(grammar, &NormalizeOptions::default(), "");
            let memo = run_with(grammar, &memoized(), "");
            assert_eq!(plain.into_result(), Ok(Value::Int(2)));
            assert_eq!(memo.into_result(), Ok(Value::Int(2)));
        }

        #[test]
        fn memoized_value() {
            let outcome = run_with(GRAMMAR, &memoized(), "aay");
            assert_eq!(outcome.into_result(), Ok(Value::Int(12)));
        }

        #[test]
        fn caches_rule_outcomes() {
            let grammar = grammar_with(GRAMMAR, &memoized());
            let mut evaluator = Evaluator::new(&grammar, "aay");
            let body = grammar.rule("start").expect("start is defined");
            evaluator.apply_rule("start", body);
            assert!(!evaluator.failed);
            assert!(evaluator.memo.contains_key(&("a", 0)));
        }

        #[test]
        fn left_recursive_rules_are_not_memoized() {
            let outcome = run_with(super::left_recursion::SUM, &memoized(), "3+4-5");
            assert_eq!(
                outcome.into_result().map(|value| value.to_string()),
                Ok(r#"[[3, "+", 4], "-", 5]"#.to_owned())
            );
        }
    }

    #[test]
    fn shared_between_threads() {
        use std::sync::Arc;
        use std::thread;

        let grammar = Arc::new(grammar_with(
            "expr = expr:a '+' digit:b -> a + number(b) | digit:d -> number(d)",
            &NormalizeOptions::default(),
        ));
        let handles: Vec<_> = (1..=4)
            .map(|n| {
                let grammar = Arc::clone(&grammar);
                thread::spawn(move || {
                    let input = vec!["1"; n].join("+");
                    interpret(&grammar, &input, "test").into_result()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            let result = handle.join().expect("thread should not panic");
            assert_eq!(result, Ok(Value::Int(n as i64 + 1)));
        }
    }

    #[test]
    fn interpreter_is_reusable() {
        let grammar = grammar_with("a = digit+:ds end -> len(ds)", &NormalizeOptions::default());
        let interpreter = Interpreter::new(&grammar);
        assert_eq!(interpreter.interpret("123", "x").into_result(), Ok(Value::Int(3)));
        assert_eq!(
            interpreter.interpret("12a", "x").into_result(),
            Err(r#"x:1 Unexpected "a" at column 3"#.to_owned())
        );
        assert_eq!(interpreter.interpret("1", "x").into_result(), Ok(Value::Int(1)));
    }
}
