use trellis::{get_opts, read_sources, run_trellis, TrellisResult};

use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::process::{Command, Stdio};
use termcolor::{BufferedStandardStream, ColorChoice, WriteColor};

fn main_impl() -> Result<i32, Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut ch_stdout = BufferedStandardStream::stdout(ColorChoice::Auto);
    let mut ch_stderr = BufferedStandardStream::stderr(ColorChoice::Auto);
    let is_tty = atty::is(atty::Stream::Stderr);
    let use_color = is_tty && ch_stderr.supports_color();

    let opts = get_opts(|app| Ok(app.get_matches()), use_color)?;
    let (grammar, input) = match read_sources(&opts) {
        Ok(sources) => sources,
        Err(e) => {
            writeln!(&mut ch_stderr, "error: {}", e)?;
            ch_stderr.flush()?;
            return Ok(1);
        }
    };

    let TrellisResult {
        code,
        stdout,
        stderr,
        page,
    } = run_trellis(opts, &grammar, &input);

    if !stderr.is_empty() {
        writeln!(&mut ch_stderr, "{}", stderr)?;
        ch_stderr.flush()?;
    }
    if !stdout.is_empty() {
        print_stdout(&stdout, &mut ch_stdout, page)?;
    }

    Ok(code)
}

/// Basically just copied from rust/src/librustc_driver/lib.rs#show_content_with_pager
fn print_stdout(
    stdout: &str,
    mut ch_stdout: &mut BufferedStandardStream,
    page: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut fallback_to_println = false;

    if page {
        let pager_name = env::var_os("PAGER")
            .unwrap_or_else(|| OsString::from(if cfg!(windows) { "more.com" } else { "less" }));

        match Command::new(pager_name).stdin(Stdio::piped()).spawn() {
            Ok(mut pager) => {
                if let Some(pipe) = pager.stdin.as_mut() {
                    if pipe.write_all(stdout.as_bytes()).is_err() {
                        fallback_to_println = true;
                    }
                }

                if pager.wait().is_err() {
                    fallback_to_println = true;
                }
            }
            Err(_) => {
                fallback_to_println = true;
            }
        }
    }

    // If the pager fails for whatever reason, still print the content to standard output.
    if fallback_to_println || !page {
        writeln!(&mut ch_stdout, "{}", stdout)?;
        ch_stdout.flush()?;
    }

    Ok(())
}

fn main() {
    let out = std::panic::catch_unwind(main_impl);

    match out {
        Ok(Ok(code)) => std::process::exit(code),
        Ok(Err(e)) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
        Err(..) => {
            eprint!("\nnote: you found an internal trellis error!\n");
            eprint!("\nnote: we would appreciate a bug report with the grammar and input\n");
            std::process::exit(2);
        }
    }
}
