//! Builtin functions callable from semantic expressions.
//!
//! Builtins are pure. Malformed arguments are reported as an [`EvalError`], which the interpreter
//! turns into a match failure at the calling node.

use super::errors::{EvalError, EvalResult};
use super::value::Value;
use crate::utils::hex_to_char;

use std::convert::TryFrom;
use unicode_general_category::{get_general_category, GeneralCategory};

type Builtin = fn(&[Value]) -> EvalResult<Value>;

macro_rules! define_builtins {
    ($($name:ident)*) => {
        /// Names of all builtin functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[$(stringify!($name)),*];

        fn lookup(name: &str) -> Option<Builtin> {
            match name {
                $(stringify!($name) => Some($name as Builtin),)*
                _ => None,
            }
        }
    };
}

define_builtins! {
    number cat join is_unicat xtou itou utoi atoi scons len
}

/// Calls the builtin function `name`.
pub fn call(name: &str, args: &[Value]) -> EvalResult<Value> {
    match lookup(name) {
        Some(builtin) => builtin(args),
        None => Err(EvalError::UnknownFunction(name.to_owned())),
    }
}

/// Returns whether `name` is a builtin function.
pub fn is_builtin_function(name: &str) -> bool {
    lookup(name).is_some()
}

fn arity<'a>(
    func: &'static str,
    args: &'a [Value],
    range: std::ops::RangeInclusive<usize>,
    expected: &'static str,
) -> EvalResult<&'a [Value]> {
    if range.contains(&args.len()) {
        Ok(args)
    } else {
        Err(EvalError::Arity {
            func,
            expected,
            found: args.len(),
        })
    }
}

fn bad_argument(func: &'static str, expected: &'static str, found: &Value) -> EvalError {
    EvalError::BadArgument {
        func,
        expected,
        found: found.type_name(),
    }
}

fn as_str<'a>(func: &'static str, value: &'a Value) -> EvalResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s),
        other => Err(bad_argument(func, "a str", other)),
    }
}

fn as_char(func: &'static str, value: &Value) -> EvalResult<char> {
    let s = as_str(func, value)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(EvalError::BadArgument {
            func,
            expected: "a single character",
            found: "str",
        }),
    }
}

fn as_seq<'a>(func: &'static str, value: &'a Value) -> EvalResult<&'a [Value]> {
    match value {
        Value::Seq(items) => Ok(items),
        other => Err(bad_argument(func, "a seq", other)),
    }
}

fn concat(func: &'static str, items: &[Value], sep: &str) -> EvalResult<String> {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        out.push_str(as_str(func, item)?);
    }
    Ok(out)
}

/// `number(s)`: parses `s` as a float if it contains a decimal point, and as an int otherwise.
fn number(args: &[Value]) -> EvalResult<Value> {
    let args = arity("number", args, 1..=1, "1")?;
    let text = match &args[0] {
        Value::Int(_) | Value::Float(_) => return Ok(args[0].clone()),
        other => as_str("number", other)?,
    };
    let invalid = || EvalError::InvalidLiteral {
        kind: "number",
        text: text.to_owned(),
    };
    let trimmed = text.trim();
    if trimmed.contains('.') {
        trimmed.parse::<f64>().map(Value::Float).map_err(|_| invalid())
    } else {
        match trimmed.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(_) if is_integer_literal(trimmed) => Err(EvalError::Overflow),
            Err(_) => Err(invalid()),
        }
    }
}

fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// `cat(seq)`: concatenates a sequence of strings.
fn cat(args: &[Value]) -> EvalResult<Value> {
    let args = arity("cat", args, 1..=1, "1")?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Str(s.clone())),
        other => Ok(Value::Str(concat("cat", as_seq("cat", other)?, "")?)),
    }
}

/// `join(sep, seq)`: joins a sequence of strings with a separator.
fn join(args: &[Value]) -> EvalResult<Value> {
    let args = arity("join", args, 2..=2, "2")?;
    let sep = as_str("join", &args[0])?;
    let items = as_seq("join", &args[1])?;
    Ok(Value::Str(concat("join", items, sep)?))
}

/// `is_unicat(ch, category)`: tests the Unicode general category of a character. The category
/// is either a two-letter abbreviation like `Lu`, or a major class like `L`.
fn is_unicat(args: &[Value]) -> EvalResult<Value> {
    let args = arity("is_unicat", args, 2..=2, "2")?;
    let c = as_char("is_unicat", &args[0])?;
    let category = as_str("is_unicat", &args[1])?;
    if !is_category_name(category) {
        return Err(EvalError::UnknownCategory(category.to_owned()));
    }
    let abbr = category_abbr(get_general_category(c));
    Ok(Value::Bool(abbr == category || abbr[..1] == *category))
}

const CATEGORIES: &[&str] = &[
    "Lu", "Ll", "Lt", "Lm", "Lo", "Mn", "Mc", "Me", "Nd", "Nl", "No", "Pc", "Pd", "Ps", "Pe", "Pi",
    "Pf", "Po", "Sm", "Sc", "Sk", "So", "Zs", "Zl", "Zp", "Cc", "Cf", "Cs", "Co", "Cn",
];

fn is_category_name(name: &str) -> bool {
    CATEGORIES.contains(&name) || CATEGORIES.iter().any(|abbr| abbr[..1] == *name)
}

#[allow(unreachable_patterns)]
fn category_abbr(category: GeneralCategory) -> &'static str {
    use GeneralCategory::*;
    match category {
        UppercaseLetter => "Lu",
        LowercaseLetter => "Ll",
        TitlecaseLetter => "Lt",
        ModifierLetter => "Lm",
        OtherLetter => "Lo",
        NonspacingMark => "Mn",
        SpacingMark => "Mc",
        EnclosingMark => "Me",
        DecimalNumber => "Nd",
        LetterNumber => "Nl",
        OtherNumber => "No",
        ConnectorPunctuation => "Pc",
        DashPunctuation => "Pd",
        OpenPunctuation => "Ps",
        ClosePunctuation => "Pe",
        InitialPunctuation => "Pi",
        FinalPunctuation => "Pf",
        OtherPunctuation => "Po",
        MathSymbol => "Sm",
        CurrencySymbol => "Sc",
        ModifierSymbol => "Sk",
        OtherSymbol => "So",
        SpaceSeparator => "Zs",
        LineSeparator => "Zl",
        ParagraphSeparator => "Zp",
        Control => "Cc",
        Format => "Cf",
        Surrogate => "Cs",
        PrivateUse => "Co",
        Unassigned => "Cn",
        _ => "Cn",
    }
}

/// `xtou(hex)`: decodes a hexadecimal code point to a character.
fn xtou(args: &[Value]) -> EvalResult<Value> {
    let args = arity("xtou", args, 1..=1, "1")?;
    let hex = as_str("xtou", &args[0])?;
    let valid = !hex.is_empty() && hex.len() <= 8 && hex.bytes().all(|b| b.is_ascii_hexdigit());
    valid
        .then(|| hex_to_char(hex))
        .flatten()
        .map(Value::from)
        .ok_or_else(|| EvalError::InvalidLiteral {
            kind: "hexadecimal code point",
            text: hex.to_owned(),
        })
}

/// `itou(int)`: converts a code point to a character.
fn itou(args: &[Value]) -> EvalResult<Value> {
    let args = arity("itou", args, 1..=1, "1")?;
    match &args[0] {
        Value::Int(i) => u32::try_from(*i)
            .ok()
            .and_then(std::char::from_u32)
            .map(Value::from)
            .ok_or(EvalError::InvalidCodePoint(*i)),
        other => Err(bad_argument("itou", "an int", other)),
    }
}

/// `utoi(ch)`: converts a character to its code point.
fn utoi(args: &[Value]) -> EvalResult<Value> {
    let args = arity("utoi", args, 1..=1, "1")?;
    Ok(Value::Int(as_char("utoi", &args[0])? as i64))
}

/// `atoi(s[, base])`: parses an integer in the given base, 10 by default.
fn atoi(args: &[Value]) -> EvalResult<Value> {
    let args = arity("atoi", args, 1..=2, "1 or 2")?;
    let text = as_str("atoi", &args[0])?;
    let base = match args.get(1) {
        None => 10,
        Some(Value::Int(base)) if (2..=36).contains(base) => *base as u32,
        Some(Value::Int(_)) => {
            return Err(EvalError::BadArgument {
                func: "atoi",
                expected: "a base between 2 and 36",
                found: "int",
            })
        }
        Some(other) => return Err(bad_argument("atoi", "an int base", other)),
    };
    let digits = text.trim_start_matches('-');
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base)) {
        return Err(EvalError::InvalidLiteral {
            kind: "integer",
            text: text.to_owned(),
        });
    }
    i64::from_str_radix(text, base)
        .map(Value::Int)
        .map_err(|_| EvalError::Overflow)
}

/// `scons(head, seq)`: prepends `head` to a sequence.
fn scons(args: &[Value]) -> EvalResult<Value> {
    let args = arity("scons", args, 2..=2, "2")?;
    let tail = as_seq("scons", &args[1])?;
    let mut items = Vec::with_capacity(tail.len() + 1);
    items.push(args[0].clone());
    items.extend_from_slice(tail);
    Ok(Value::Seq(items))
}

/// `len(x)`: the number of characters in a string or items in a sequence.
fn len(args: &[Value]) -> EvalResult<Value> {
    let args = arity("len", args, 1..=1, "1")?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Seq(items) => items.len(),
        other => return Err(bad_argument("len", "a str or a seq", other)),
    };
    Ok(Value::Int(len as i64))
}
