//! Parses trellis grammar text into a raw [`RuleSet`].
//!
//! The parser is a recursive-descent parser over the [scanner](crate::scanner)'s tokens. It does
//! no simplification: every rule body, parenthesized group, and capture is produced as a `choice`
//! of `seq` alternatives, and the [normalizer](crate::normalizer) does all collapsing.
//!
//! ```text
//! rules    = (rule ','?)* EOF
//! rule     = IDENT '=' choice
//! choice   = alt ('|' alt)*
//! alt      = term*
//! term     = '~' term | postfix (':' IDENT)?
//! postfix  = prim ('?' | '*' | '+')?
//! prim     = IDENT | STR ('..' STR)? | '(' choice ')' | '{' choice? '}'
//!          | '->' expr | '?(' expr ')' | '?{' expr '}' | '={' expr '}'
//! expr     = qual ('+' qual)*
//! qual     = sprim ('[' expr ']' | '(' exprs ')' | '.' IDENT)*
//! sprim    = IDENT | DEC | HEX | STR | '[' exprs ']' | '(' expr ')'
//! ```

#[macro_use]
pub(crate) mod errors;

use crate::diagnostics::{Diagnostic, DiagnosticRecord};
use crate::grammar::*;
use crate::scanner::types::{Token, TokenType};
use crate::scanner::{scan, ScanResult};
use errors::*;

type ParseResult<T> = Result<T, Diagnostic>;

/// Parses grammar text into its raw rule definitions.
///
/// The first scanner or parser error is returned as a [`Diagnostic`].
pub fn parse_grammar<T: AsRef<str>>(source: T) -> Result<RuleSet, Diagnostic> {
    let ScanResult {
        tokens,
        diagnostics,
    } = scan(source);
    if let Some(diagnostic) = diagnostics.into_iter().next() {
        return Err(diagnostic);
    }
    Parser::new(tokens).parse_rules()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last(), Some(Token { ty: TokenType::EOF, .. })));
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    /// Peeks `n` tokens ahead, never past the trailing EOF.
    fn peek_at(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    fn next(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.ty != TokenType::EOF {
            self.pos += 1;
        }
        tok
    }

    fn next_is(&self, ty: &TokenType) -> bool {
        &self.peek().ty == ty
    }

    /// Consumes the next token if it has type `ty`.
    fn eat(&mut self, ty: &TokenType) -> bool {
        if self.next_is(ty) {
            self.next();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, ty: TokenType, expected: &str) -> ParseResult<Token> {
        if self.next_is(&ty) {
            Ok(self.next())
        } else {
            let found = self.peek();
            Err(ExpectedToken!(found.span, expected, found))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> ParseResult<String> {
        let found = self.peek();
        match &found.ty {
            TokenType::Ident(name) => {
                let name = name.clone();
                self.next();
                Ok(name)
            }
            _ => Err(ExpectedToken!(found.span, expected, found)),
        }
    }

    /// Consumes the delimiter closing `opener`.
    fn expect_closing(&mut self, closer: TokenType, opener: &Token) -> ParseResult<()> {
        if self.eat(&closer) {
            return Ok(());
        }
        let found = self.peek();
        Err(UnclosedDelimiter!(
            expected closer, at found.span,
            due to opener, at opener.span;
            found found
        ))
    }

    /// Returns whether the next tokens are `=` immediately followed by `{`.
    fn at_eq_opener(&self, n: usize) -> bool {
        let (eq, brace) = (self.peek_at(n), self.peek_at(n + 1));
        eq.ty == TokenType::Equal && brace.ty == TokenType::OpenBrace && eq.span.abuts(brace.span)
    }

    /// Returns whether the next tokens are `?` immediately followed by `(` or `{`.
    fn at_pred_opener(&self) -> bool {
        let (question, open) = (self.peek(), self.peek_at(1));
        question.ty == TokenType::Question
            && matches!(open.ty, TokenType::OpenParen | TokenType::OpenBrace)
            && question.span.abuts(open.span)
    }

    fn at_rule_start(&self) -> bool {
        matches!(self.peek().ty, TokenType::Ident(_))
            && self.peek_at(1).ty == TokenType::Equal
            && !self.at_eq_opener(1)
    }

    fn parse_rules(&mut self) -> ParseResult<RuleSet> {
        let mut rules = Vec::new();
        loop {
            let tok = self.next();
            let name = match tok.ty {
                TokenType::EOF => break,
                TokenType::Ident(ref name) => name.clone(),
                _ => return Err(ExpectedRule!(tok.span, tok)),
            };
            self.expect(TokenType::Equal, "`=`")?;
            let body = self.parse_choice()?;
            self.eat(&TokenType::Comma);
            rules.push(RuleDef {
                name,
                body,
                span: tok.span,
            });
        }
        Ok(RuleSet::new(rules))
    }

    fn parse_choice(&mut self) -> ParseResult<Node> {
        let mut alts = vec![self.parse_alt()?];
        while self.eat(&TokenType::Pipe) {
            alts.push(self.parse_alt()?);
        }
        Ok(Node::Choice(alts))
    }

    fn at_alt_end(&self) -> bool {
        use TokenType::*;
        match self.peek().ty {
            Pipe | Comma | CloseParen | CloseBrace | CloseBracket | EOF => true,
            _ => self.at_rule_start(),
        }
    }

    fn parse_alt(&mut self) -> ParseResult<Node> {
        let mut terms = Vec::new();
        while !self.at_alt_end() {
            terms.push(self.parse_term()?);
        }
        if terms.is_empty() {
            Ok(Node::Empty)
        } else {
            Ok(Node::Seq(terms))
        }
    }

    fn parse_term(&mut self) -> ParseResult<Node> {
        if self.eat(&TokenType::Tilde) {
            return Ok(Node::Not(Box::new(self.parse_term()?)));
        }
        let node = self.parse_postfix()?;
        if self.eat(&TokenType::Colon) {
            let name = self.expect_ident("a label name")?;
            return Ok(Node::label(node, name));
        }
        Ok(node)
    }

    fn parse_postfix(&mut self) -> ParseResult<Node> {
        let prim = self.parse_prim()?;
        let wrap: fn(Box<Node>) -> Node = match self.peek().ty {
            TokenType::Question if !self.at_pred_opener() => Node::Opt,
            TokenType::Star => Node::Star,
            TokenType::Plus => Node::Plus,
            _ => return Ok(prim),
        };
        self.next();
        Ok(wrap(Box::new(prim)))
    }

    fn parse_prim(&mut self) -> ParseResult<Node> {
        let tok = self.next();
        match tok.ty {
            TokenType::Ident(ref name) => Ok(Node::Apply(name.clone())),
            TokenType::Str(ref lo) => {
                if !self.eat(&TokenType::DotDot) {
                    return Ok(Node::Lit(lo.clone()));
                }
                let lo = range_bound(&tok, lo)?;
                let hi_tok = self.next();
                let hi = match hi_tok.ty {
                    TokenType::Str(ref hi) => range_bound(&hi_tok, hi)?,
                    _ => return Err(ExpectedToken!(hi_tok.span, "a literal", hi_tok)),
                };
                Ok(Node::Range(lo, hi))
            }
            TokenType::OpenParen => {
                let inner = self.parse_choice()?;
                self.expect_closing(TokenType::CloseParen, &tok)?;
                Ok(Node::Paren(Box::new(inner)))
            }
            TokenType::OpenBrace => {
                if self.eat(&TokenType::CloseBrace) {
                    return Ok(Node::Pos);
                }
                let inner = self.parse_choice()?;
                self.expect_closing(TokenType::CloseBrace, &tok)?;
                Ok(Node::Capture(Box::new(inner)))
            }
            TokenType::Arrow => Ok(Node::Action(self.parse_expr()?)),
            TokenType::Question => {
                let open = self.next();
                let closer = match open.ty {
                    TokenType::OpenParen => TokenType::CloseParen,
                    TokenType::OpenBrace => TokenType::CloseBrace,
                    _ => return Err(ExpectedToken!(open.span, "`(` or `{`", open)),
                };
                let expr = self.parse_expr()?;
                self.expect_closing(closer, &open)?;
                Ok(Node::Pred(expr))
            }
            TokenType::Equal if self.next_is(&TokenType::OpenBrace) => {
                let open = self.next();
                let expr = self.parse_expr()?;
                self.expect_closing(TokenType::CloseBrace, &open)?;
                Ok(Node::Eq(expr))
            }
            _ => Err(ExpectedExpr!(tok.span, tok)),
        }
    }

    fn parse_expr(&mut self) -> ParseResult<SemExpr> {
        let mut lhs = self.parse_qual()?;
        while self.eat(&TokenType::Plus) {
            let rhs = self.parse_qual()?;
            lhs = SemExpr::Plus(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_qual(&mut self) -> ParseResult<SemExpr> {
        let base = self.parse_sem_prim()?;
        let mut ops = Vec::new();
        loop {
            let op = match self.peek().ty {
                TokenType::OpenBracket => {
                    let open = self.next();
                    let index = self.parse_expr()?;
                    self.expect_closing(TokenType::CloseBracket, &open)?;
                    PostOp::GetItem(index)
                }
                TokenType::OpenParen => {
                    let open = self.next();
                    PostOp::Call(self.parse_exprs(TokenType::CloseParen, &open)?)
                }
                TokenType::Dot => {
                    self.next();
                    PostOp::GetAttr(self.expect_ident("an attribute name")?)
                }
                _ => break,
            };
            ops.push(op);
        }
        if ops.is_empty() {
            Ok(base)
        } else {
            Ok(SemExpr::Qual(Box::new(base), ops))
        }
    }

    fn parse_sem_prim(&mut self) -> ParseResult<SemExpr> {
        let tok = self.next();
        match tok.ty {
            TokenType::Ident(ref name) => Ok(SemExpr::Var(name.clone())),
            TokenType::Dec(ref dec) => Ok(SemExpr::Dec(dec.clone())),
            TokenType::Hex(ref hex) => Ok(SemExpr::Hex(hex.clone())),
            TokenType::Str(ref s) => Ok(SemExpr::Str(s.clone())),
            TokenType::OpenBracket => Ok(SemExpr::Arr(
                self.parse_exprs(TokenType::CloseBracket, &tok)?,
            )),
            TokenType::OpenParen => {
                let expr = self.parse_expr()?;
                self.expect_closing(TokenType::CloseParen, &tok)?;
                Ok(expr)
            }
            _ => Err(ExpectedExpr!(tok.span, tok)),
        }
    }

    /// Parses a comma-separated list of expressions closed by `closer`.
    fn parse_exprs(&mut self, closer: TokenType, opener: &Token) -> ParseResult<Vec<SemExpr>> {
        let mut exprs = Vec::new();
        if !self.next_is(&closer) {
            exprs.push(self.parse_expr()?);
            while self.eat(&TokenType::Comma) {
                exprs.push(self.parse_expr()?);
            }
        }
        self.expect_closing(closer, opener)?;
        Ok(exprs)
    }
}

fn range_bound(tok: &Token, lit: &str) -> ParseResult<char> {
    let mut chars = lit.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(InvalidRangeBound!(tok.span, tok)),
    }
}
