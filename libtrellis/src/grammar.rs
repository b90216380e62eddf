//! The trellis grammar IR.
//!
//! A grammar is first produced as a [`RuleSet`], the raw, ordered list of rule definitions read
//! from grammar text (or decoded from the [interchange form](interchange)). The
//! [normalizer](crate::normalizer) turns a `RuleSet` into an executable [`Grammar`].
//!
//! Grammar expressions are [`Node`]s; the semantic expressions embedded in actions, predicates,
//! and equality assertions are [`SemExpr`]s. Semantic expressions are evaluated, but never consume
//! input.

pub mod collectors;
pub mod interchange;
mod transformer;
mod visitor;

pub use transformer::NodeTransformer;
pub use visitor::NodeVisitor;

use crate::common::Span;

use indexmap::IndexMap;
use std::collections::HashSet;

/// Rule names the interpreter resolves without a rule definition.
pub const BUILTIN_RULES: &[&str] = &["anything", "end", "digit", "letter"];

/// Returns whether `name` is a [builtin rule](BUILTIN_RULES).
pub fn is_builtin_rule(name: &str) -> bool {
    BUILTIN_RULES.contains(&name)
}

/// A grammar expression.
#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    /// Ordered choice between alternatives; the first alternative to succeed wins.
    Choice(Vec<Node>),
    /// A sequence of terms, all of which must succeed in order.
    Seq(Vec<Node>),
    /// A sequence evaluated in a fresh binding scope. Inserted by normalization.
    Scope { rule: String, terms: Vec<Node> },
    /// Binds the value of `inner` to `name` in the innermost scope.
    Label { inner: Box<Node>, name: String },
    /// A left-recursive rule body. Inserted by normalization.
    Leftrec { inner: Box<Node>, rule: String },
    /// A memoized rule body. Inserted by normalization when memoization is requested.
    Memo { inner: Box<Node>, rule: String },
    /// A reference to a rule or builtin rule.
    Apply(String),
    /// A literal string.
    Lit(String),
    /// A single character between two bounds, inclusive.
    Range(char, char),
    /// Negative lookahead.
    Not(Box<Node>),
    /// Zero or one.
    Opt(Box<Node>),
    /// Zero or more.
    Star(Box<Node>),
    /// One or more.
    Plus(Box<Node>),
    /// A parenthesized expression. Removed by normalization.
    Paren(Box<Node>),
    /// Replaces the value of `inner` with the input text it spans.
    Capture(Box<Node>),
    /// Semantic predicate; succeeds iff the expression evaluates to `true`.
    Pred(SemExpr),
    /// Succeeds iff the input continues with the string the expression evaluates to.
    Eq(SemExpr),
    /// Semantic action; produces the value of the expression.
    Action(SemExpr),
    /// The current input offset.
    Pos,
    /// The empty expression, which always succeeds.
    Empty,
}

impl Node {
    /// The tag of this node in the interchange form.
    pub fn tag(&self) -> &'static str {
        match self {
            Node::Choice(_) => "choice",
            Node::Seq(_) => "seq",
            Node::Scope { .. } => "scope",
            Node::Label { .. } => "label",
            Node::Leftrec { .. } => "leftrec",
            Node::Memo { .. } => "memo",
            Node::Apply(_) => "apply",
            Node::Lit(_) => "lit",
            Node::Range(..) => "range",
            Node::Not(_) => "not",
            Node::Opt(_) => "opt",
            Node::Star(_) => "star",
            Node::Plus(_) => "plus",
            Node::Paren(_) => "paren",
            Node::Capture(_) => "capture",
            Node::Pred(_) => "pred",
            Node::Eq(_) => "eq",
            Node::Action(_) => "action",
            Node::Pos => "pos",
            Node::Empty => "empty",
        }
    }

    /// Creates a label binding `inner` to `name`.
    pub fn label(inner: Node, name: impl Into<String>) -> Node {
        Node::Label {
            inner: Box::new(inner),
            name: name.into(),
        }
    }

    /// Returns the terms of a sequence or scope, if this is one.
    pub fn terms(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(terms) | Node::Scope { terms, .. } => Some(terms.as_slice()),
            _ => None,
        }
    }
}

/// A semantic expression, evaluated by actions, predicates, and equality assertions.
#[derive(Clone, PartialEq, Debug)]
pub enum SemExpr {
    /// A variable reference.
    Var(String),
    /// A decimal integer, as written.
    Dec(String),
    /// A hexadecimal integer, as written without its `0x` prefix.
    Hex(String),
    /// A string literal.
    Str(String),
    /// Addition or concatenation.
    Plus(Box<SemExpr>, Box<SemExpr>),
    /// A base expression followed by postfix operations.
    Qual(Box<SemExpr>, Vec<PostOp>),
    /// An array of expressions.
    Arr(Vec<SemExpr>),
}

impl SemExpr {
    /// The tag of this expression in the interchange form.
    pub fn tag(&self) -> &'static str {
        match self {
            SemExpr::Var(_) => "ll_var",
            SemExpr::Dec(_) => "ll_dec",
            SemExpr::Hex(_) => "ll_hex",
            SemExpr::Str(_) => "ll_str",
            SemExpr::Plus(..) => "ll_plus",
            SemExpr::Qual(..) => "ll_qual",
            SemExpr::Arr(_) => "ll_arr",
        }
    }
}

/// A postfix operation in a [qualified](SemExpr::Qual) semantic expression.
#[derive(Clone, PartialEq, Debug)]
pub enum PostOp {
    /// `[index]`
    GetItem(SemExpr),
    /// `(args...)`
    Call(Vec<SemExpr>),
    /// `.name`
    GetAttr(String),
}

impl PostOp {
    /// The tag of this operation in the interchange form.
    pub fn tag(&self) -> &'static str {
        match self {
            PostOp::GetItem(_) => "ll_getitem",
            PostOp::Call(_) => "ll_call",
            PostOp::GetAttr(_) => "ll_getattr",
        }
    }
}

/// A rule definition in a [`RuleSet`].
#[derive(Clone, Debug)]
pub struct RuleDef {
    pub name: String,
    pub body: Node,
    /// Span of the rule name in the grammar source. Empty for rules that did not come from text.
    pub span: Span,
}

impl PartialEq for RuleDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.body == other.body
    }
}

/// The raw, ordered rule definitions of a grammar, before normalization.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct RuleSet {
    rules: Vec<RuleDef>,
}

impl RuleSet {
    pub fn new(rules: Vec<RuleDef>) -> Self {
        Self { rules }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleDef> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up the first definition of a rule.
    pub fn get(&self, name: &str) -> Option<&RuleDef> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl IntoIterator for RuleSet {
    type Item = RuleDef;
    type IntoIter = std::vec::IntoIter<RuleDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

/// A normalized, executable grammar.
///
/// A `Grammar` is immutable once built, and can be shared between any number of concurrent
/// [interpreters](crate::Interpreter).
#[derive(Clone, Debug)]
pub struct Grammar {
    /// Rule name -> normalized body, in declaration order.
    rules: IndexMap<String, Node>,
    /// Left-recursive rules whose growth associates to the left.
    left_assoc: HashSet<String>,
}

impl Grammar {
    /// Creates a grammar from normalized rules. The first rule is the starting rule; callers must
    /// guarantee there is at least one.
    pub(crate) fn new(rules: IndexMap<String, Node>, left_assoc: HashSet<String>) -> Self {
        debug_assert!(!rules.is_empty());
        Self { rules, left_assoc }
    }

    /// Name of the starting rule.
    pub fn start(&self) -> &str {
        self.rules
            .get_index(0)
            .map(|(name, _)| name.as_str())
            .unwrap_or_default()
    }

    /// Normalized body of a rule.
    pub fn rule(&self, name: &str) -> Option<&Node> {
        self.rules.get(name)
    }

    /// All rules, in declaration order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.rules.iter().map(|(name, body)| (name.as_str(), body))
    }

    /// Returns whether the growth of a left-recursive rule associates to the left.
    pub fn is_left_assoc(&self, rule: &str) -> bool {
        self.left_assoc.contains(rule)
    }

    /// Converts the grammar back to a rule set, e.g. for printing.
    pub fn to_rule_set(&self) -> RuleSet {
        RuleSet::new(
            self.rules
                .iter()
                .map(|(name, body)| RuleDef {
                    name: name.clone(),
                    body: body.clone(),
                    span: Span::default(),
                })
                .collect(),
        )
    }
}
