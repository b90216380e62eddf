//! Diagnostic errors produced by the parser.

define_errors! {
    ParseErrors;

    ///A grammar is a list of rule definitions of the form
    ///
    ///```text
    ///name = alternative | alternative ...
    ///```
    ///
    ///optionally separated by commas. This error fires when something other than a rule name is
    ///found where a new rule is expected. A common cause is a stray closing delimiter:
    ///
    ///```text
    ///a = ('x' 'y'))
    ///```
    P0001: ExpectedRule {
        ($span:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Expected a rule definition, found {}", $found),
                ExpectedRule::CODE,
                "expected a rule name".to_string(),
            )
        }
    }

    ///An expression was expected, but the parser found a token that cannot start one.
    ///
    ///Grammar expressions start with a rule name, a literal, `(`, `{`, `~`, `->`, `?(`, or `={`.
    ///Semantic expressions (after `->`, inside `?( )` and `={ }`) start with a name, a number, a
    ///literal, `[`, or `(`.
    P0002: ExpectedExpr {
        ($span:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Expected an expression, found {}", $found),
                ExpectedExpr::CODE,
                "expected an expression".to_string(),
            )
        }
    }

    ///A group opened with `(`, `{`, or `[` was not closed by the matching delimiter.
    ///
    ///```text
    ///a = ('x' | 'y'
    ///```
    P0003: UnclosedDelimiter {
        (expected $expected:expr, at $cur_span:expr, due to $opener:expr, at $open_span:expr; found $found:expr) => {
            Diagnostic::span_err(
                $cur_span,
                format!("Expected closing `{}`, found {}", $expected, $found),
                UnclosedDelimiter::CODE,
                format!("expected `{}`", $expected),
            )
            .with_spanned_note($open_span, format!("opening `{}` here", $opener))
        }
    }

    ///Both bounds of a character range must be literals of exactly one character.
    ///
    ///```text
    ///lower = 'a'..'z'
    ///```
    ///
    ///is a valid range, but `'aa'..'z'` and `''..'z'` are not.
    P0004: InvalidRangeBound {
        ($span:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Invalid range bound {}", $found),
                InvalidRangeBound::CODE,
                "expected a single-character literal".to_string(),
            )
        }
    }

    ///The parser expected a specific token here. For example, a rule name must be followed by
    ///`=`, and a `:` label must be followed by the label's name.
    P0005: ExpectedToken {
        ($span:expr, $expected:expr, $found:expr) => {
            Diagnostic::span_err(
                $span,
                format!("Expected {}, found {}", $expected, $found),
                ExpectedToken::CODE,
                format!("expected {}", $expected),
            )
        }
    }
}
