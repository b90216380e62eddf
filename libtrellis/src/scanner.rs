//! Scans trellis grammar text into [tokens](types::Token).

#[macro_use]
pub(crate) mod errors;
pub mod types;

use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::utils::hex_to_char;
use errors::*;
use types::*;

/// The result of scanning a grammar.
pub struct ScanResult {
    /// Scanned tokens, always terminated by an [EOF](TokenType::EOF) token.
    pub tokens: Vec<Token>,
    /// Errors encountered while scanning.
    pub diagnostics: Vec<Diagnostic>,
}

/// Scans grammar text. Scanning never stops early; problems are reported as diagnostics alongside
/// a best-effort token stream.
pub fn scan<T: AsRef<str>>(input: T) -> ScanResult {
    let mut scanner = Scanner::new(input.as_ref());
    scanner.scan();
    ScanResult {
        tokens: scanner.output,
        diagnostics: scanner.diagnostics,
    }
}

struct Scanner {
    input: Vec<char>,
    pos: usize,
    output: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl Scanner {
    fn new(input: &str) -> Scanner {
        Scanner {
            input: input.chars().collect(),
            pos: 0,
            output: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.input.get(self.pos + n).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn collect_while<P: Fn(char) -> bool>(&mut self, pred: P) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            s.push(c);
            self.pos += 1;
        }
        s
    }

    fn push(&mut self, ty: TokenType, start: usize) {
        self.output.push(Token::new(ty, (start, self.pos)));
    }

    fn scan(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                _ if c.is_whitespace() => {
                    self.pos += 1;
                }
                '/' if self.peek_at(1) == Some('/') => {
                    self.collect_while(|c| c != '\n');
                }
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(),
                '\'' | '"' => self.scan_literal(c),
                _ if c.is_ascii_digit() => self.scan_num(),
                _ if c.is_alphabetic() || c == '_' => self.scan_ident(),
                _ => self.scan_symbol(),
            }
        }

        let end = self.input.len();
        self.output.push(Token::new(TokenType::EOF, (end, end)));
    }

    fn skip_block_comment(&mut self) {
        let start = self.pos;
        self.pos += 2;
        loop {
            match self.next() {
                Some('*') if self.peek() == Some('/') => {
                    self.pos += 1;
                    return;
                }
                Some(_) => {}
                None => {
                    self.diagnostics
                        .push(UnterminatedComment!((start, start + 2)));
                    return;
                }
            }
        }
    }

    fn scan_symbol(&mut self) {
        use TokenType::*;
        let start = self.pos;
        let ty = match self.next() {
            Some('=') => Equal,
            Some('|') => Pipe,
            Some(',') => Comma,
            Some('?') => Question,
            Some('*') => Star,
            Some('+') => Plus,
            Some('~') => Tilde,
            Some(':') => Colon,
            Some('(') => OpenParen,
            Some(')') => CloseParen,
            Some('{') => OpenBrace,
            Some('}') => CloseBrace,
            Some('[') => OpenBracket,
            Some(']') => CloseBracket,
            Some('.') if self.peek() == Some('.') => {
                self.pos += 1;
                DotDot
            }
            Some('.') => Dot,
            Some('-') if self.peek() == Some('>') => {
                self.pos += 1;
                Arrow
            }
            Some(c) => {
                self.diagnostics
                    .push(InvalidCharacter!((start, self.pos), c));
                Invalid(c.to_string())
            }
            None => return,
        };
        self.push(ty, start);
    }

    fn scan_ident(&mut self) {
        let start = self.pos;
        let name = self.collect_while(|c| c.is_alphanumeric() || c == '_');
        self.push(TokenType::Ident(name), start);
    }

    fn scan_num(&mut self) {
        let start = self.pos;
        let is_hex = self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('x') | Some('X'))
            && self.peek_at(2).map_or(false, |c| c.is_ascii_hexdigit());
        let ty = if is_hex {
            self.pos += 2;
            TokenType::Hex(self.collect_while(|c| c.is_ascii_hexdigit()))
        } else {
            TokenType::Dec(self.collect_while(|c| c.is_ascii_digit()))
        };
        self.push(ty, start);
    }

    fn scan_literal(&mut self, quote: char) {
        let start = self.pos;
        self.pos += 1;
        let mut lit = String::new();
        loop {
            match self.next() {
                Some(c) if c == quote => break,
                Some('\\') => self.scan_escape(&mut lit),
                Some(c) => lit.push(c),
                None => {
                    self.diagnostics
                        .push(UnterminatedString!((start, start + 1)));
                    break;
                }
            }
        }
        self.push(TokenType::Str(lit), start);
    }

    /// Scans an escape sequence whose backslash was just consumed, appending the escaped
    /// character to `lit`.
    fn scan_escape(&mut self, lit: &mut String) {
        let start = self.pos - 1;
        let digits = match self.next() {
            Some('n') => return lit.push('\n'),
            Some('r') => return lit.push('\r'),
            Some('t') => return lit.push('\t'),
            Some(c @ '\\') | Some(c @ '\'') | Some(c @ '"') => return lit.push(c),
            Some('x') => 2,
            Some('u') => 4,
            Some('U') => 8,
            Some(_) => {
                let escape: String = self.input[start..self.pos].iter().collect();
                self.diagnostics.push(InvalidEscape!((start, self.pos), escape));
                return;
            }
            // Reported as an unterminated literal by the caller.
            None => return,
        };

        let mut hex = String::with_capacity(digits);
        while hex.len() < digits {
            match self.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.pos += 1;
                }
                _ => break,
            }
        }
        match hex_to_char(&hex).filter(|_| hex.len() == digits) {
            Some(c) => lit.push(c),
            None => {
                let escape: String = self.input[start..self.pos].iter().collect();
                self.diagnostics.push(InvalidEscape!((start, self.pos), escape));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // Tests the Scanner's output against a humanized string representation of the expected tokens.
    // See [Token]'s impl of Display for more details.
    // [Token]: src/scanner/types.rs
    macro_rules! scanner_tests {
        ($($name:ident: $program:expr, $format_str:expr)*) => {
        $(
            #[test]
            fn $name() {
                use crate::scanner::scan;

                let mut tokens = scan($program)
                    .tokens
                    .into_iter()
                    .map(|tok| tok.to_string())
                    .collect::<Vec<_>>();
                tokens.pop();
                assert_eq!(tokens.join(" "), $format_str);
            }
        )*
        }
    }

    mod scan {
        scanner_tests! {
            ident: "expr", "expr"
            ident_underscore: "_1 a_b2", "_1 a_b2"
            dec: "42", "42"
            hex: "0x1f", "0x1f"
            zero_then_ident: "0xg", "0 xg"
            single_quoted: "'a'", "'a'"
            double_quoted: r#""it's""#, r"'it\'s'"
            symbols: "= | , ? * + ~ : ( ) { } [ ] .", "= | , ? * + ~ : ( ) { } [ ] ."
            dot_dot: "'a'..'z'", "'a' .. 'z'"
            arrow: "-> x", "-> x"

            empty_string: "", ""
            skip_whitespace: "  =  \n\t", "="
            line_comment: "a // b c\nd", "a d"
            block_comment: "a /* b\n c */ d", "a d"

            rule: "num = digit+:ds -> number(cat(ds)),",
                  "num = digit + : ds -> number ( cat ( ds ) ) ,"
            predicate: "?(x)", "? ( x )"
            equality: "={ 'a' }", "= { 'a' }"
        }
    }

    mod escapes {
        scanner_tests! {
            newline: r"'\n'", r"'\n'"
            tab: r"'\t'", r"'\t'"
            backslash: r"'\\'", r"'\\'"
            hex_byte: r"'\x41'", "'A'"
            unicode_short: r"'\u03bb'", "'λ'"
            unicode_long: r"'\U0001F600'", "'😀'"
            escaped_double: r#"'\"'"#, "'\"'"
        }
    }

    mod scan_invalid {
        scanner_tests! {
            invalid_char: "@", "Invalid(@)"
            invalid_mixed_with_valid: "=@|", "= Invalid(@) |"
            lone_minus: "- >", "Invalid(-) Invalid(>)"
        }
    }

    macro_rules! diagnostic_tests {
        ($($name:ident: $program:expr => $code:expr, $span:expr)*) => {
        $(
            #[test]
            fn $name() {
                let result = crate::scanner::scan($program);
                assert_eq!(result.diagnostics.len(), 1, "{:?}", result.diagnostics);
                let diag = &result.diagnostics[0];
                assert_eq!(diag.code, Some($code));
                assert_eq!((diag.span.lo, diag.span.hi), $span);
            }
        )*
        }
    }

    mod diagnostics {
        diagnostic_tests! {
            invalid_character: "a = @" => "S0001", (4, 5)
            unterminated_string: "a = 'abc" => "S0002", (4, 5)
            unknown_escape: r"a = '\q'" => "S0003", (5, 7)
            short_hex_escape: r"a = '\x4'" => "S0003", (5, 8)
            surrogate_escape: r"a = '\uD800'" => "S0003", (5, 11)
            unterminated_comment: "a /* b" => "S0004", (2, 4)
        }
    }
}
