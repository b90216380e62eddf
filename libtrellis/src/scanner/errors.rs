//! Diagnostic errors produced by the scanner.

define_errors! {
    ScanErrors;

    ///Grammar source may only contain identifiers, numbers, quoted literals, comments, and the
    ///punctuation of the grammar notation:
    ///
    ///```text
    ///= | , ? * + ~ : ( ) { } [ ] . .. ->
    ///```
    ///
    ///Any other character outside of a literal or a comment is rejected. If you meant to match the
    ///character, quote it, as in `'@'`.
    S0001: InvalidCharacter {
        ($span:expr, $ch:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Invalid character `{}`", $ch),
                InvalidCharacter::CODE,
                None,
            )
            .with_help(format!("to match the character literally, write '{}'", $ch))
        }
    }

    ///A literal was opened with a quote but never closed before the end of the grammar.
    ///
    ///Literals may span multiple lines, so the closing quote is searched for until the end of the
    ///source. Check for a missing quote, or a quote that was escaped by accident:
    ///
    ///```text
    ///backslash = '\'
    ///```
    ///
    ///should be written `'\\'`.
    S0002: UnterminatedString {
        ($span:expr) => {
            Diagnostic::span_err(
                $span,
                "Unterminated literal",
                UnterminatedString::CODE,
                "literal is opened here".to_string(),
            )
        }
    }

    ///An escape sequence in a literal is not recognized. The supported escapes are
    ///
    ///```text
    ///\n \r \t \\ \' \" \xHH \uHHHH \UHHHHHHHH
    ///```
    ///
    ///where `H` is a hexadecimal digit. `\x`, `\u`, and `\U` must be followed by exactly 2, 4, and
    ///8 digits respectively, and must name a valid Unicode scalar value.
    S0003: InvalidEscape {
        ($span:expr, $escape:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Invalid escape sequence `{}`", $escape),
                InvalidEscape::CODE,
                None,
            )
        }
    }

    ///A block comment was opened with `/*` but never closed with `*/`. Block comments do not
    ///nest.
    S0004: UnterminatedComment {
        ($span:expr) => {
            Diagnostic::span_err(
                $span,
                "Unterminated block comment",
                UnterminatedComment::CODE,
                "comment is opened here".to_string(),
            )
        }
    }
}
