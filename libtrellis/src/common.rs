//! Common types used by libtrellis.

/// Describes the character span of a substring in a text.
///
/// For example, in "abcdef", "bcd" has the span (1, 4).
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct Span {
    /// Inclusive lower bound index of the span
    pub lo: usize,
    /// Exclusive upper bound index of the span
    pub hi: usize,
}

impl Span {
    /// Creates a span covering `self` through `other`.
    pub fn to(&self, other: Span) -> Span {
        Span {
            lo: self.lo,
            hi: other.hi,
        }
    }

    /// Returns whether `other` starts exactly where `self` ends.
    pub fn abuts(&self, other: Span) -> bool {
        self.hi == other.lo
    }
}

impl From<(usize, usize)> for Span {
    fn from(span: (usize, usize)) -> Self {
        Self {
            lo: span.0,
            hi: span.1,
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(span: std::ops::Range<usize>) -> Self {
        Self {
            lo: span.start,
            hi: span.end,
        }
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.lo, span.hi)
    }
}

/// A 1-based line and column position in a text.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    /// Computes the line and column of the character offset `pos` in `text`.
    /// Offsets past the end of `text` are clamped to the end.
    pub fn of(text: &[char], pos: usize) -> Self {
        let pos = pos.min(text.len());
        let preceding = &text[..pos];
        let line = 1 + preceding.iter().filter(|&&c| c == '\n').count();
        let line_start = preceding
            .iter()
            .rposition(|&c| c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        Self {
            line,
            col: pos - line_start + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    macro_rules! line_col_tests {
        ($($name:ident: $text:expr, $pos:expr => $line:expr, $col:expr)*) => {
        $(
            #[test]
            fn $name() {
                use super::LineCol;

                let text: Vec<char> = $text.chars().collect();
                assert_eq!(LineCol::of(&text, $pos), LineCol { line: $line, col: $col });
            }
        )*
        }
    }

    line_col_tests! {
        start:               "abc",         0 => 1, 1
        middle:              "abc",         2 => 1, 3
        end_of_input:        "abc",         3 => 1, 4
        after_newline:       "ab\ncd",      3 => 2, 1
        second_line:         "ab\ncd",      4 => 2, 2
        on_newline:          "ab\ncd",      2 => 1, 3
        blank_lines:         "\n\n\nx",     3 => 4, 1
        clamped:             "ab",         10 => 1, 3
    }
}
