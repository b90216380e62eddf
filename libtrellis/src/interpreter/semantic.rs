//! Evaluation of semantic expressions against the interpreter's binding scopes.

use super::builtins;
use super::errors::{EvalError, EvalResult};
use super::value::Value;
use crate::grammar::{PostOp, SemExpr};

use std::collections::HashMap;

/// A stack of binding scopes. Lookups see the innermost binding of a name first.
pub(super) struct Scopes {
    frames: Vec<HashMap<String, Value>>,
}

impl Default for Scopes {
    fn default() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }
}

impl Scopes {
    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Pops the innermost scope. The base scope is never popped.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_owned(), value);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

/// Evaluates a semantic expression.
pub(super) fn eval(expr: &SemExpr, scopes: &Scopes) -> EvalResult<Value> {
    match expr {
        SemExpr::Var(name) => lookup(name, scopes),
        SemExpr::Dec(digits) => parse_int(digits, 10, "decimal integer"),
        SemExpr::Hex(digits) => parse_int(digits, 16, "hexadecimal integer"),
        SemExpr::Str(s) => Ok(Value::Str(s.clone())),
        SemExpr::Plus(lhs, rhs) => plus(eval(lhs, scopes)?, eval(rhs, scopes)?),
        SemExpr::Qual(base, ops) => eval_qual(base, ops, scopes),
        SemExpr::Arr(items) => items
            .iter()
            .map(|item| eval(item, scopes))
            .collect::<EvalResult<Vec<_>>>()
            .map(Value::Seq),
    }
}

fn lookup(name: &str, scopes: &Scopes) -> EvalResult<Value> {
    if let Some(value) = scopes.lookup(name) {
        return Ok(value.clone());
    }
    match name {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        "null" => Ok(Value::Null),
        _ => Err(EvalError::UndefinedVariable(name.to_owned())),
    }
}

fn parse_int(digits: &str, radix: u32, kind: &'static str) -> EvalResult<Value> {
    match i64::from_str_radix(digits, radix) {
        Ok(i) => Ok(Value::Int(i)),
        Err(_) if !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)) => {
            Err(EvalError::Overflow)
        }
        Err(_) => Err(EvalError::InvalidLiteral {
            kind,
            text: digits.to_owned(),
        }),
    }
}

fn plus(lhs: Value, rhs: Value) -> EvalResult<Value> {
    match (lhs, rhs) {
        (Value::Int(a), Value::Int(b)) => {
            a.checked_add(b).map(Value::Int).ok_or(EvalError::Overflow)
        }
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(a as f64 + b)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(a + b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(a + b)),
        (Value::Str(mut a), Value::Str(b)) => {
            a.push_str(&b);
            Ok(Value::Str(a))
        }
        (Value::Seq(mut a), Value::Seq(b)) => {
            a.extend(b);
            Ok(Value::Seq(a))
        }
        (lhs, rhs) => Err(EvalError::TypeMismatch {
            op: "+",
            lhs: lhs.type_name(),
            rhs: rhs.type_name(),
        }),
    }
}

fn eval_args(args: &[SemExpr], scopes: &Scopes) -> EvalResult<Vec<Value>> {
    args.iter().map(|arg| eval(arg, scopes)).collect()
}

fn call_named(name: &str, args: Vec<Value>, scopes: &Scopes) -> EvalResult<Value> {
    if builtins::is_builtin_function(name) {
        return builtins::call(name, &args);
    }
    match scopes.lookup(name) {
        Some(value) => Err(EvalError::NotCallable(value.type_name())),
        None => Err(EvalError::UnknownFunction(name.to_owned())),
    }
}

fn eval_qual(base: &SemExpr, ops: &[PostOp], scopes: &Scopes) -> EvalResult<Value> {
    let mut ops = ops.iter().peekable();

    // `f(args)` calls a function by name; the callee is never evaluated as a variable.
    let mut value = match (base, ops.peek().copied()) {
        (SemExpr::Var(name), Some(PostOp::Call(args))) => {
            ops.next();
            call_named(name, eval_args(args, scopes)?, scopes)?
        }
        _ => eval(base, scopes)?,
    };

    while let Some(op) = ops.next() {
        value = match op {
            PostOp::GetItem(index) => get_item(value, eval(index, scopes)?)?,
            PostOp::GetAttr(name) => match ops.peek().copied() {
                Some(PostOp::Call(args)) => {
                    ops.next();
                    let mut call_args = Vec::with_capacity(args.len() + 1);
                    call_args.push(value);
                    call_args.extend(eval_args(args, scopes)?);
                    if !builtins::is_builtin_function(name) {
                        return Err(EvalError::UnknownFunction(name.clone()));
                    }
                    builtins::call(name, &call_args)?
                }
                _ => return Err(EvalError::BareAttribute(name.clone())),
            },
            PostOp::Call(_) => return Err(EvalError::NotCallable(value.type_name())),
        };
    }
    Ok(value)
}

fn get_item(value: Value, index: Value) -> EvalResult<Value> {
    let index = match index {
        Value::Int(i) => i,
        other => return Err(EvalError::BadIndex(other.type_name())),
    };
    let resolve = |len: usize| {
        let resolved = if index < 0 {
            index.checked_add(len as i64)
        } else {
            Some(index)
        };
        resolved
            .filter(|&i| i >= 0 && (i as usize) < len)
            .map(|i| i as usize)
            .ok_or(EvalError::IndexOutOfRange { index, len })
    };
    match value {
        Value::Seq(mut items) => {
            let i = resolve(items.len())?;
            Ok(items.swap_remove(i))
        }
        Value::Str(s) => {
            let len = s.chars().count();
            let i = resolve(len)?;
            Ok(s.chars().nth(i).map(Value::from).unwrap_or(Value::Null))
        }
        other => Err(EvalError::NotIndexable(other.type_name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Node;
    use crate::parse_grammar;

    fn parse_expr(expr: &str) -> SemExpr {
        let rules = parse_grammar(format!("a = -> {}", expr)).expect("expression should parse");
        let rule = rules.iter().next().expect("one rule");
        let mut node = &rule.body;
        loop {
            node = match node {
                Node::Choice(alts) | Node::Seq(alts) => &alts[0],
                Node::Action(expr) => return expr.clone(),
                other => panic!("unexpected node {:?}", other),
            }
        }
    }

    fn scopes() -> Scopes {
        let mut scopes = Scopes::default();
        scopes.bind("s", Value::from("hello"));
        scopes.bind("n", Value::Int(7));
        scopes.bind("xs", Value::from(vec!["a", "b", "c"]));
        scopes
    }

    macro_rules! eval_tests {
        ($($name:ident: $expr:expr => $expected:expr)*) => {
        $(
            #[test]
            fn $name() {
                let result = eval(&parse_expr($expr), &scopes());
                let expected: EvalResult<Value> = $expected;
                assert_eq!(result, expected);
            }
        )*
        }
    }

    mod eval {
        use super::*;

        eval_tests! {
            var: "n" => Ok(Value::Int(7))
            constant_true: "true" => Ok(Value::Bool(true))
            constant_null: "null" => Ok(Value::Null)
            undefined: "m" => Err(EvalError::UndefinedVariable("m".into()))
            dec: "42" => Ok(Value::Int(42))
            hex: "0xff" => Ok(Value::Int(255))
            dec_overflow: "99999999999999999999" => Err(EvalError::Overflow)
            string: "'x'" => Ok(Value::from("x"))
            array: "[n, 's']" => Ok(Value::Seq(vec![Value::Int(7), Value::from("s")]))
            empty_array: "[]" => Ok(Value::Seq(vec![]))

            plus_ints: "n + 1 + 2" => Ok(Value::Int(10))
            plus_strings: "s + ' world'" => Ok(Value::from("hello world"))
            plus_seqs: "xs + ['d']" => Ok(Value::from(vec!["a", "b", "c", "d"]))
            plus_float: "number('1.5') + 1" => Ok(Value::Float(2.5))
            plus_mismatch: "s + n" => Err(EvalError::TypeMismatch { op: "+", lhs: "str", rhs: "int" })
            plus_overflow: "0x7fffffffffffffff + 1" => Err(EvalError::Overflow)

            index_seq: "xs[1]" => Ok(Value::from("b"))
            index_expr: "xs[0 + 2]" => Ok(Value::from("c"))
            index_str: "s[4]" => Ok(Value::from("o"))
            index_out_of_range: "xs[3]" => Err(EvalError::IndexOutOfRange { index: 3, len: 3 })
            index_bad: "xs['a']" => Err(EvalError::BadIndex("str"))
            index_int: "n[0]" => Err(EvalError::NotIndexable("int"))

            call: "cat(xs)" => Ok(Value::from("abc"))
            call_nested: "len(cat(xs) + s)" => Ok(Value::Int(8))
            method_call: "', '.join(xs)" => Ok(Value::from("a, b, c"))
            method_on_var: "xs.len()" => Ok(Value::Int(3))
            unknown_function: "frob(n)" => Err(EvalError::UnknownFunction("frob".into()))
            call_variable: "n(1)" => Err(EvalError::NotCallable("int"))
            bare_attribute: "xs.len" => Err(EvalError::BareAttribute("len".into()))
            call_result: "len(s)(1)" => Err(EvalError::NotCallable("int"))
            builtin_error: "xtou('zz')" => Err(EvalError::InvalidLiteral { kind: "hexadecimal code point", text: "zz".into() })
        }
    }

    #[test]
    fn negative_index() {
        let expr = SemExpr::Qual(
            Box::new(SemExpr::Var("xs".into())),
            vec![PostOp::GetItem(SemExpr::Qual(
                Box::new(SemExpr::Var("minus_one".into())),
                vec![],
            ))],
        );
        let mut scopes = scopes();
        scopes.bind("minus_one", Value::Int(-1));
        assert_eq!(eval(&expr, &scopes), Ok(Value::from("c")));
    }

    #[test]
    fn innermost_binding_wins() {
        let mut scopes = scopes();
        scopes.push();
        scopes.bind("n", Value::Int(1));
        assert_eq!(scopes.lookup("n"), Some(&Value::Int(1)));
        assert_eq!(scopes.lookup("s"), Some(&Value::from("hello")));
        scopes.pop();
        assert_eq!(scopes.lookup("n"), Some(&Value::Int(7)));
    }

    #[test]
    fn base_scope_is_never_popped() {
        let mut scopes = Scopes::default();
        scopes.pop();
        scopes.bind("x", Value::Null);
        assert_eq!(scopes.lookup("x"), Some(&Value::Null));
    }

    #[test]
    fn bound_constant_names_shadow_constants() {
        let mut scopes = Scopes::default();
        scopes.bind("true", Value::Int(0));
        assert_eq!(eval(&SemExpr::Var("true".into()), &scopes), Ok(Value::Int(0)));
    }
}
