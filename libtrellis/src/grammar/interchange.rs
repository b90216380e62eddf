//! The tagged-sequence interchange form of trellis grammar trees.
//!
//! Every node is a JSON array whose first element is the node's tag. Nodes with an ordered list
//! of children (`rules`, `choice`, `seq`, `scope`, `ll_qual`, `ll_call`, `ll_arr`) list them
//! inline after any fixed fields:
//!
//! ```text
//! ["rules",
//!   ["rule", "digits", ["plus", ["range", ["lit", "0"], ["lit", "9"]]]],
//!   ["rule", "num", ["seq", ["label", ["apply", "digits"], "d"],
//!                           ["action", ["ll_qual", ["ll_var", "cat"], ["ll_call", ["ll_var", "d"]]]]]]]
//! ```
//!
//! Any external parser producing this form can feed the [normalizer](crate::normalizer).

use super::*;

use serde::de::{Deserialize, Deserializer, Error as _};
use serde::ser::{Serialize, Serializer};
use serde_json::{json, Value};
use thiserror::Error;

/// An error decoding the interchange form.
#[derive(Error, Debug, PartialEq)]
pub enum AstError {
    #[error("expected a tagged array, found `{0}`")]
    NotTagged(String),
    #[error("unknown tag \"{0}\"")]
    UnknownTag(String),
    #[error("\"{tag}\" expects {expected}, found {found} field(s)")]
    Arity {
        tag: String,
        expected: &'static str,
        found: usize,
    },
    #[error("\"{tag}\" expects a string field, found `{found}`")]
    ExpectedString { tag: String, found: String },
    #[error("range bound must be a single-character literal, found `{0}`")]
    RangeBound(String),
}

type AstResult<T> = Result<T, AstError>;

/// Encodes a rule set in the interchange form.
pub fn rules_to_value(rules: &RuleSet) -> Value {
    let mut seq = vec![json!("rules")];
    seq.extend(
        rules
            .iter()
            .map(|r| json!(["rule", r.name, node_to_value(&r.body)])),
    );
    Value::Array(seq)
}

/// Encodes a node in the interchange form.
pub fn node_to_value(node: &Node) -> Value {
    let tag = json!(node.tag());
    let fields = match node {
        Node::Choice(nodes) | Node::Seq(nodes) => nodes.iter().map(node_to_value).collect(),
        Node::Scope { rule, terms } => {
            let mut fields = vec![json!(rule)];
            fields.extend(terms.iter().map(node_to_value));
            fields
        }
        Node::Label { inner, name: s }
        | Node::Leftrec { inner, rule: s }
        | Node::Memo { inner, rule: s } => vec![node_to_value(inner), json!(s)],
        Node::Apply(s) | Node::Lit(s) => vec![json!(s)],
        Node::Range(lo, hi) => vec![
            json!(["lit", lo.to_string()]),
            json!(["lit", hi.to_string()]),
        ],
        Node::Not(inner)
        | Node::Opt(inner)
        | Node::Star(inner)
        | Node::Plus(inner)
        | Node::Paren(inner)
        | Node::Capture(inner) => vec![node_to_value(inner)],
        Node::Pred(expr) | Node::Eq(expr) | Node::Action(expr) => vec![sem_expr_to_value(expr)],
        Node::Pos | Node::Empty => vec![],
    };
    tagged(tag, fields)
}

/// Encodes a semantic expression in the interchange form.
pub fn sem_expr_to_value(expr: &SemExpr) -> Value {
    let tag = json!(expr.tag());
    let fields = match expr {
        SemExpr::Var(s) | SemExpr::Dec(s) | SemExpr::Hex(s) | SemExpr::Str(s) => vec![json!(s)],
        SemExpr::Plus(lhs, rhs) => vec![sem_expr_to_value(lhs), sem_expr_to_value(rhs)],
        SemExpr::Qual(base, ops) => {
            let mut fields = vec![sem_expr_to_value(base)];
            fields.extend(ops.iter().map(post_op_to_value));
            fields
        }
        SemExpr::Arr(elems) => elems.iter().map(sem_expr_to_value).collect(),
    };
    tagged(tag, fields)
}

fn post_op_to_value(op: &PostOp) -> Value {
    let tag = json!(op.tag());
    let fields = match op {
        PostOp::GetItem(index) => vec![sem_expr_to_value(index)],
        PostOp::Call(args) => args.iter().map(sem_expr_to_value).collect(),
        PostOp::GetAttr(name) => vec![json!(name)],
    };
    tagged(tag, fields)
}

fn tagged(tag: Value, fields: Vec<Value>) -> Value {
    let mut seq = Vec::with_capacity(fields.len() + 1);
    seq.push(tag);
    seq.extend(fields);
    Value::Array(seq)
}

/// Splits a tagged array into its tag and fields.
fn untag(value: &Value) -> AstResult<(&str, &[Value])> {
    match value.as_array().and_then(|seq| seq.split_first()) {
        Some((Value::String(tag), fields)) => Ok((tag.as_str(), fields)),
        _ => Err(AstError::NotTagged(value.to_string())),
    }
}

fn arity(tag: &str, fields: &[Value], n: usize, expected: &'static str) -> AstResult<()> {
    if fields.len() == n {
        Ok(())
    } else {
        Err(AstError::Arity {
            tag: tag.to_owned(),
            expected,
            found: fields.len(),
        })
    }
}

fn string(tag: &str, field: &Value) -> AstResult<String> {
    field
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| AstError::ExpectedString {
            tag: tag.to_owned(),
            found: field.to_string(),
        })
}

/// Decodes a rule set from the interchange form.
pub fn rules_from_value(value: &Value) -> AstResult<RuleSet> {
    let (tag, fields) = untag(value)?;
    if tag != "rules" {
        return Err(AstError::UnknownTag(tag.to_owned()));
    }
    let mut rules = Vec::with_capacity(fields.len());
    for field in fields {
        let (tag, rule) = untag(field)?;
        if tag != "rule" {
            return Err(AstError::UnknownTag(tag.to_owned()));
        }
        arity(tag, rule, 2, "a name and a body")?;
        rules.push(RuleDef {
            name: string(tag, &rule[0])?,
            body: node_from_value(&rule[1])?,
            span: Span::default(),
        });
    }
    Ok(RuleSet::new(rules))
}

/// Decodes a node from the interchange form.
pub fn node_from_value(value: &Value) -> AstResult<Node> {
    let (tag, fields) = untag(value)?;
    let nodes = |fields: &[Value]| fields.iter().map(node_from_value).collect::<AstResult<_>>();
    let inner = |fields: &[Value]| -> AstResult<Box<Node>> {
        arity(tag, fields, 1, "one child")?;
        Ok(Box::new(node_from_value(&fields[0])?))
    };
    let named = |fields: &[Value]| -> AstResult<(Box<Node>, String)> {
        arity(tag, fields, 2, "a child and a name")?;
        Ok((Box::new(node_from_value(&fields[0])?), string(tag, &fields[1])?))
    };
    let sem = |fields: &[Value]| -> AstResult<SemExpr> {
        arity(tag, fields, 1, "one semantic expression")?;
        sem_expr_from_value(&fields[0])
    };
    let leaf = |fields: &[Value]| -> AstResult<String> {
        arity(tag, fields, 1, "one string")?;
        string(tag, &fields[0])
    };

    Ok(match tag {
        "choice" => Node::Choice(nodes(fields)?),
        "seq" => Node::Seq(nodes(fields)?),
        "scope" => match fields.split_first() {
            Some((rule, terms)) => Node::Scope {
                rule: string(tag, rule)?,
                terms: nodes(terms)?,
            },
            None => {
                return Err(AstError::Arity {
                    tag: tag.to_owned(),
                    expected: "a rule name and terms",
                    found: 0,
                })
            }
        },
        "label" => {
            let (inner, name) = named(fields)?;
            Node::Label { inner, name }
        }
        "leftrec" => {
            let (inner, rule) = named(fields)?;
            Node::Leftrec { inner, rule }
        }
        "memo" => {
            let (inner, rule) = named(fields)?;
            Node::Memo { inner, rule }
        }
        "apply" => Node::Apply(leaf(fields)?),
        "lit" => Node::Lit(leaf(fields)?),
        "range" => {
            arity(tag, fields, 2, "two literal bounds")?;
            Node::Range(range_bound(&fields[0])?, range_bound(&fields[1])?)
        }
        "not" => Node::Not(inner(fields)?),
        "opt" => Node::Opt(inner(fields)?),
        "star" => Node::Star(inner(fields)?),
        "plus" => Node::Plus(inner(fields)?),
        "paren" => Node::Paren(inner(fields)?),
        "capture" => Node::Capture(inner(fields)?),
        "pred" => Node::Pred(sem(fields)?),
        "eq" => Node::Eq(sem(fields)?),
        "action" => Node::Action(sem(fields)?),
        "pos" => {
            arity(tag, fields, 0, "no fields")?;
            Node::Pos
        }
        "empty" => {
            arity(tag, fields, 0, "no fields")?;
            Node::Empty
        }
        _ => return Err(AstError::UnknownTag(tag.to_owned())),
    })
}

fn range_bound(value: &Value) -> AstResult<char> {
    match node_from_value(value)? {
        Node::Lit(lit) => {
            let mut chars = lit.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(AstError::RangeBound(lit)),
            }
        }
        other => Err(AstError::RangeBound(other.tag().to_owned())),
    }
}

/// Decodes a semantic expression from the interchange form.
pub fn sem_expr_from_value(value: &Value) -> AstResult<SemExpr> {
    let (tag, fields) = untag(value)?;
    let exprs = |fields: &[Value]| {
        fields
            .iter()
            .map(sem_expr_from_value)
            .collect::<AstResult<Vec<_>>>()
    };
    let leaf = |fields: &[Value]| -> AstResult<String> {
        arity(tag, fields, 1, "one string")?;
        string(tag, &fields[0])
    };

    Ok(match tag {
        "ll_var" => SemExpr::Var(leaf(fields)?),
        "ll_dec" => SemExpr::Dec(leaf(fields)?),
        "ll_hex" => SemExpr::Hex(leaf(fields)?),
        "ll_str" => SemExpr::Str(leaf(fields)?),
        "ll_plus" => {
            arity(tag, fields, 2, "two operands")?;
            SemExpr::Plus(
                Box::new(sem_expr_from_value(&fields[0])?),
                Box::new(sem_expr_from_value(&fields[1])?),
            )
        }
        "ll_qual" => match fields.split_first() {
            Some((base, ops)) => SemExpr::Qual(
                Box::new(sem_expr_from_value(base)?),
                ops.iter().map(post_op_from_value).collect::<AstResult<_>>()?,
            ),
            None => {
                return Err(AstError::Arity {
                    tag: tag.to_owned(),
                    expected: "a base and postfix operations",
                    found: 0,
                })
            }
        },
        "ll_arr" => SemExpr::Arr(exprs(fields)?),
        _ => return Err(AstError::UnknownTag(tag.to_owned())),
    })
}

fn post_op_from_value(value: &Value) -> AstResult<PostOp> {
    let (tag, fields) = untag(value)?;
    Ok(match tag {
        "ll_getitem" => {
            arity(tag, fields, 1, "one index")?;
            PostOp::GetItem(sem_expr_from_value(&fields[0])?)
        }
        "ll_call" => PostOp::Call(
            fields
                .iter()
                .map(sem_expr_from_value)
                .collect::<AstResult<_>>()?,
        ),
        "ll_getattr" => {
            arity(tag, fields, 1, "one attribute name")?;
            PostOp::GetAttr(string(tag, &fields[0])?)
        }
        _ => return Err(AstError::UnknownTag(tag.to_owned())),
    })
}

macro_rules! serde_via_value {
    ($($ty:ty: $to:ident, $from:ident)*) => {$(
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                $to(self).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                $from(&value).map_err(D::Error::custom)
            }
        }
    )*};
}

serde_via_value! {
    RuleSet: rules_to_value, rules_from_value
    Node: node_to_value, node_from_value
    SemExpr: sem_expr_to_value, sem_expr_from_value
}
