//! Restricted arithmetic evaluator.
//!
//! An expression is checked twice. The pre-check works on raw tokens and refuses anything that is
//! not plausibly arithmetic (keywords, private names, stray punctuation). The evaluator then walks
//! a tree that can only contain numbers, context lookups, the five operators and calls to
//! `max`/`min`; there is no path from an expression to anything outside the supplied context.

use std::collections::BTreeMap;
use std::fmt;

use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::InvalidExpression;
use crate::expression::lexer::{Token, TokenKind, lex};
use crate::expression::parser::parse_tokens;

/// Functions an expression may call.
pub const FUNCTIONS: [&str; 2] = ["max", "min"];

/// Words that only make sense as statements or non-arithmetic operators.
const KEYWORDS: &[&str] = &[
    "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del", "elif",
    "else", "except", "exec", "finally", "for", "from", "global", "if", "import", "in", "is",
    "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

/// A scalar an expression can see or produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// Names visible to an expression.
pub type Context = BTreeMap<String, Value>;

pub fn is_function(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

/// Syntax stage only: accept or reject `expression` without evaluating it.
pub fn check(expression: &str) -> Result<(), InvalidExpression> {
    parse_checked(expression).map(|_| ())
}

/// Evaluate `expression` against `context`.
pub fn evaluate(expression: &str, context: &Context) -> Result<Value, InvalidExpression> {
    let expr = parse_checked(expression)?;
    let v = eval(&expr, context)?;
    if v.as_number().is_some_and(|x| !x.is_finite()) {
        return Err(InvalidExpression::runtime("numeric result out of range"));
    }
    Ok(v)
}

fn parse_checked(expression: &str) -> Result<Expr, InvalidExpression> {
    let tokens = lex(expression)?;
    precheck(&tokens)?;
    parse_tokens(tokens)
}

fn precheck(tokens: &[Token]) -> Result<(), InvalidExpression> {
    for t in tokens {
        if let TokenKind::Ident(name) = &t.kind
            && KEYWORDS.contains(&name.as_str())
        {
            return Err(InvalidExpression::unsafe_construct(
                t.span.start,
                format!("keyword '{name}' is not allowed in an expression"),
            ));
        }
    }
    for t in tokens {
        if let TokenKind::Ident(name) = &t.kind
            && name.starts_with('_')
        {
            return Err(InvalidExpression::unsafe_construct(
                t.span.start,
                format!("access to private name '{name}' is not allowed"),
            ));
        }
    }
    for t in tokens {
        if let TokenKind::Stray(c) = &t.kind {
            return Err(InvalidExpression::syntax(
                t.span.start,
                format!("unexpected character '{c}'"),
            ));
        }
    }
    Ok(())
}

fn eval(e: &Expr, ctx: &Context) -> Result<Value, InvalidExpression> {
    match e {
        Expr::Num(v) => Ok(Value::Number(*v)),
        Expr::Name { name, offset } => match ctx.get(name) {
            Some(v) => Ok(v.clone()),
            None if is_function(name) => Err(InvalidExpression::runtime(format!(
                "'{name}' is a function and must be called"
            ))),
            None => Err(InvalidExpression::undefined(*offset, name)),
        },
        Expr::Unary { op, expr } => {
            let v = eval(expr, ctx)?;
            let x = v.as_number().ok_or_else(|| {
                InvalidExpression::runtime(format!(
                    "bad operand type for unary {}: '{}'",
                    if *op == UnaryOp::Neg { "-" } else { "+" },
                    v.type_name()
                ))
            })?;
            Ok(Value::Number(match op {
                UnaryOp::Neg => -x,
                UnaryOp::Pos => x,
            }))
        }
        Expr::Binary { op, left, right } => {
            let l = eval(left, ctx)?;
            let r = eval(right, ctx)?;
            let (Some(a), Some(b)) = (l.as_number(), r.as_number()) else {
                return Err(InvalidExpression::runtime(format!(
                    "unsupported operand type(s) for {}: '{}' and '{}'",
                    op.symbol(),
                    l.type_name(),
                    r.type_name()
                )));
            };
            apply_binary(*op, a, b).map(Value::Number)
        }
        Expr::Call { func, offset, args } => {
            if !is_function(func) {
                return Err(if ctx.contains_key(func) {
                    InvalidExpression::runtime(format!("'{func}' is not callable"))
                } else {
                    InvalidExpression::undefined(*offset, func)
                });
            }
            if args.is_empty() {
                return Err(InvalidExpression::runtime(format!(
                    "{func} expected at least 1 argument, got 0"
                )));
            }
            let mut acc: Option<f64> = None;
            for a in args {
                let v = eval(a, ctx)?;
                let x = v.as_number().ok_or_else(|| {
                    InvalidExpression::runtime(format!(
                        "{func} expects numeric arguments, got '{}'",
                        v.type_name()
                    ))
                })?;
                acc = Some(match acc {
                    None => x,
                    Some(best) if func == "max" => best.max(x),
                    Some(best) => best.min(x),
                });
            }
            // Non-empty args always seed the accumulator.
            Ok(Value::Number(acc.unwrap_or_default()))
        }
    }
}

fn apply_binary(op: BinaryOp, a: f64, b: f64) -> Result<f64, InvalidExpression> {
    let v = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(InvalidExpression::runtime("division by zero"));
            }
            a / b
        }
        BinaryOp::Pow => {
            if a == 0.0 && b < 0.0 {
                return Err(InvalidExpression::runtime(
                    "zero cannot be raised to a negative power",
                ));
            }
            let v = a.powf(b);
            if v.is_nan() && !a.is_nan() && !b.is_nan() {
                return Err(InvalidExpression::runtime(
                    "power result is not a real number",
                ));
            }
            v
        }
    };
    if !v.is_finite() {
        return Err(InvalidExpression::runtime("numeric result out of range"));
    }
    Ok(v)
}

#[cfg(test)]
#[path = "../../tests/unit/expression/sandbox.rs"]
mod tests;
