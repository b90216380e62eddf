use super::common::GRAMMAR_PATH;
use trellis::{get_opts, run_trellis, TrellisResult};

pub type TrellisOutput = (
    /*stdout*/ String,
    /*stderr*/ String,
    /*exit code*/ String,
);

/// Runs trellis in-process on a grammar and input with command-line style arguments.
pub fn exec_trellis(args: &str, grammar: &str, input: &str) -> Result<TrellisOutput, String> {
    let mut argv = vec!["trellis".to_owned(), GRAMMAR_PATH.to_owned()];
    argv.extend(
        args.lines()
            .flat_map(|line| line.split(' '))
            .filter(|arg| !arg.is_empty())
            .map(str::to_owned),
    );

    let opts = get_opts(|app| app.get_matches_from_safe(argv), false)
        .map_err(|e| format!("Failed to parse test arguments: {}", e))?;

    let TrellisResult {
        code,
        stdout,
        stderr,
        ..
    } = run_trellis(opts, grammar, input);

    Ok((stdout, stderr, format!("{}\n", code)))
}
