//! The trellis app. For an overview of trellis's design, see
//! [libtrellis's documentation](libtrellis).

#![deny(missing_docs)]

mod diagnostics;
use diagnostics::GrammarSource;

use libtrellis::diagnostics::Diagnostic;
use libtrellis::{
    lint_rules, normalize_with, parse_grammar, Emit, EmitFormat, Interpreter, NormalizeOptions,
    Value,
};

use log::debug;
use std::fs;
use std::io::{self, Read};

/// Source name used in parse errors when the input comes from stdin.
pub const STDIN_SOURCE_NAME: &str = "<stdin>";

/// Options to run trellis with.
pub struct Opts {
    /// Path to the grammar file.
    pub grammar_file: String,
    /// Path to the input file. [None](Option::None) if the input should be read from stdin.
    pub input_file: Option<String>,
    /// How the result of trellis's execution should be emitted. [None](Option::None) picks the
    /// default form for what is emitted.
    pub output_form: Option<String>,
    /// When true, trellis prints the grammar instead of interpreting input.
    pub print_grammar: bool,
    /// When true, the grammar is printed as parsed, before normalization. Implies `print_grammar`.
    pub raw: bool,
    /// When true, lint warnings for the grammar will be emitted, if any.
    pub lint: bool,
    /// When true, rules that are not left-recursive and read no labels of their callers are
    /// memoized.
    pub memoize: bool,
    /// Left-recursive rules that should associate to the left.
    pub left_assoc: Vec<String>,
    /// Name of the input in parse errors.
    pub source_name: Option<String>,
    /// When is [Some](Option::Some) diagnostic code, will explain that code.
    pub explain_diagnostic: Option<String>,
    /// When true, trellis emit will be colored.
    pub color: bool,
}

/// Parses [Opts](self::Opts) from the command line or given a parser that acts on the clap
/// [App](clap::App).
pub fn get_opts<P>(parser: P, color: bool) -> Result<Opts, clap::Error>
where
    P: for<'a> FnOnce(clap::App<'a, '_>) -> Result<clap::ArgMatches<'a>, clap::Error>,
{
    let matches = clap::App::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .author(clap::crate_authors!())
        .arg(
            clap::Arg::with_name("grammar")
                .help("Grammar file")
                .required(true)
                .default_value_if("explain", None, ""),
        )
        .arg(
            clap::Arg::with_name("input")
                .help("Input file to parse. Read from stdin if omitted."),
        )
        .arg(
            clap::Arg::with_name("output-form")
                .short("-o")
                .long("--output-form")
                .next_line_help(true)
                .help(
                    "Trellis emit format. Possible values:\n\
                    \tjson:         Parse results as compact JSON. The default for parse results.\n\
                    \tpretty:       Parse results as indented JSON, grammars as grammar text.\n\
                    \t              The default for grammars.\n\
                    \ts-expression: Grammars in the tagged interchange form, like [\"lit\",\"a\"].\n\
                    \tdebug:        Opaque internal representation. Note: this format is not stable.\n\
                    ",
                )
                .hide_possible_values(true)
                .takes_value(true)
                .possible_values(&["json", "pretty", "s-expression", "debug"]),
        )
        .arg(
            clap::Arg::with_name("print-grammar")
                .long("--print-grammar")
                .help("Print the normalized grammar instead of parsing input"),
        )
        .arg(
            clap::Arg::with_name("raw")
                .long("--raw")
                .help("Print the grammar as parsed, before normalization. Implies --print-grammar."),
        )
        .arg(
            clap::Arg::with_name("lint")
                .long("--lint")
                .help("Emit lint warnings for the grammar, if any."),
        )
        .arg(
            clap::Arg::with_name("memoize")
                .long("--memoize")
                .help("Memoize rules that are not left-recursive and read no labels of their callers."),
        )
        .arg(
            clap::Arg::with_name("left-assoc")
                .long("--left-assoc")
                .value_name("rule")
                .help("Make a left-recursive rule associate to the left.")
                .takes_value(true)
                .multiple(true)
                .number_of_values(1),
        )
        .arg(
            clap::Arg::with_name("source-name")
                .long("--source-name")
                .value_name("name")
                .help("Name of the input in parse errors. Defaults to the input file.")
                .takes_value(true),
        )
        .arg(
            clap::Arg::with_name("explain")
                .long("--explain")
                .value_name("diagnostic")
                .help("Provide a detailed explanation for a diagnostic code.")
                .takes_value(true),
        );
    let matches = parser(matches)?;

    let raw = matches.is_present("raw");
    Ok(Opts {
        grammar_file: matches.value_of("grammar").unwrap_or_default().into(),
        input_file: matches.value_of("input").map(str::to_owned),
        output_form: matches.value_of("output-form").map(str::to_owned),
        print_grammar: matches.is_present("print-grammar") || raw,
        raw,
        lint: matches.is_present("lint"),
        memoize: matches.is_present("memoize"),
        left_assoc: matches
            .values_of("left-assoc")
            .map(|rules| rules.map(str::to_owned).collect())
            .unwrap_or_default(),
        source_name: matches.value_of("source-name").map(str::to_owned),
        explain_diagnostic: matches.value_of("explain").map(str::to_owned),
        color,
    })
}

/// Reads the grammar and input text named by [Opts](self::Opts).
/// The input is left empty when it is not needed, so stdin is not consumed.
pub fn read_sources(opts: &Opts) -> io::Result<(String, String)> {
    if opts.explain_diagnostic.is_some() {
        return Ok((String::new(), String::new()));
    }

    let grammar = fs::read_to_string(&opts.grammar_file)?;
    let input = if opts.print_grammar {
        String::new()
    } else {
        match &opts.input_file {
            Some(path) => fs::read_to_string(path)?,
            None => {
                let mut input = String::new();
                io::stdin().read_to_string(&mut input)?;
                input
            }
        }
    };
    Ok((grammar, input))
}

/// Output of a trellis execution.
#[derive(Default)]
pub struct TrellisResult {
    /// Exit code
    pub code: i32,
    /// Emit for stdout
    pub stdout: String,
    /// Emit for stderr
    pub stderr: String,
    /// Whether the stdout should be emit as paged
    pub page: bool,
}

/// Builds a [TrellisResult](self::TrellisResult).
struct TrellisResultBuilder<'a> {
    /// Grammar that diagnostics are rendered against.
    grammar: GrammarSource<'a>,
    color: bool,
    stdout: String,
    stderr: String,
    page: bool,
}

impl<'a> TrellisResultBuilder<'a> {
    fn new(file: Option<&'a str>, grammar: &str, color: bool) -> Self {
        Self {
            grammar: GrammarSource::new(file, grammar),
            color,
            page: false,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    fn emit(&mut self, obj: &dyn Emit, form: EmitFormat) {
        self.stdout.push_str(&obj.emit(form));
    }

    fn err(&mut self, diagnostics: &[Diagnostic]) {
        let rendered = self.grammar.render(diagnostics, self.color);
        if !rendered.is_empty() && !self.stderr.is_empty() {
            self.stderr.push('\n');
        }
        self.stderr.push_str(&rendered);
    }

    fn page(&mut self, page: bool) {
        self.page = page;
    }

    fn ok(self) -> TrellisResult {
        TrellisResult {
            code: 0,
            stdout: self.stdout,
            stderr: self.stderr,
            page: self.page,
        }
    }

    fn failed(self) -> TrellisResult {
        TrellisResult {
            code: 1,
            stdout: self.stdout,
            stderr: self.stderr,
            page: self.page,
        }
    }
}

fn grammar_emit_format(output_form: Option<&str>) -> EmitFormat {
    match output_form {
        Some("s-expression") | Some("json") => EmitFormat::SExpression,
        Some("debug") => EmitFormat::Debug,
        _ => EmitFormat::Pretty,
    }
}

fn emit_value(value: &Value, output_form: Option<&str>) -> String {
    match output_form {
        Some("pretty") => value.to_json_pretty(),
        Some("debug") => format!("{:#?}", value),
        _ => value.to_json(),
    }
}

/// Runs trellis end-to-end on a grammar and an input.
pub fn run_trellis(opts: Opts, grammar: &str, input: &str) -> TrellisResult {
    let mut result = TrellisResultBuilder::new(Some(&opts.grammar_file), grammar, opts.color);

    if let Some(diag_code) = &opts.explain_diagnostic {
        let codes = Diagnostic::all_codes_with_explanations();
        return match codes.get(diag_code.as_str()) {
            Some(explanation) => {
                result.stdout.push_str(explanation);
                result.page(true);
                result.ok()
            }
            None => {
                result
                    .stderr
                    .push_str(&format!("{} is not a diagnostic code", diag_code));
                result.failed()
            }
        };
    }

    let rules = match parse_grammar(grammar) {
        Ok(rules) => rules,
        Err(diagnostic) => {
            result.err(&[diagnostic]);
            return result.failed();
        }
    };
    debug!("parsed {} rules from {}", rules.len(), opts.grammar_file);

    if opts.lint {
        result.err(&lint_rules(&rules));
    }

    let output_form = opts.output_form.as_deref();
    if opts.raw {
        result.emit(&rules, grammar_emit_format(output_form));
        return result.ok();
    }

    let options = NormalizeOptions {
        memoize: opts.memoize,
        left_assoc: opts.left_assoc.clone(),
    };
    let normalized = match normalize_with(&rules, &options) {
        Ok(grammar) => grammar,
        Err(error) => {
            result.err(&[error.to_diagnostic(&rules)]);
            return result.failed();
        }
    };

    if opts.print_grammar {
        result.emit(&normalized, grammar_emit_format(output_form));
        return result.ok();
    }

    let source_name = opts
        .source_name
        .as_deref()
        .or_else(|| opts.input_file.as_deref())
        .unwrap_or(STDIN_SOURCE_NAME);
    match Interpreter::new(&normalized)
        .interpret(input, source_name)
        .into_result()
    {
        Ok(value) => {
            result.stdout.push_str(&emit_value(&value, output_form));
            result.ok()
        }
        Err(message) => {
            if !result.stderr.is_empty() {
                result.stderr.push('\n');
            }
            result.stderr.push_str(&message);
            result.failed()
        }
    }
}
