//! Eager evaluation of subtrees that reference no column.
//!
//! Everything the compiler does not bind to a column is reduced to a single
//! [`Value`] here, once, at compile time. Rendering never re-evaluates.

use core::cmp::Ordering;

use chrono::Datelike;
use joinery_types::Value;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::error::{JoineryError, Result};
use crate::expr::{BinaryOp, Expr, Method};

pub(crate) fn evaluate(expr: &Expr) -> Result<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Column(_) => Err(JoineryError::unsupported(
            expr,
            "column reference where a literal was expected",
        )),
        Expr::List(_) => Err(JoineryError::unsupported(
            expr,
            "a list is only valid as an IN or average argument",
        )),
        Expr::Not(inner) => Ok(Value::Bool(!evaluate_bool(inner)?)),
        Expr::Binary { op, left, right } => {
            if op.is_connector() {
                let l = evaluate_bool(left)?;
                // short-circuit like the host language would
                let value = match op {
                    BinaryOp::And => l && evaluate_bool(right)?,
                    _ => l || evaluate_bool(right)?,
                };
                return Ok(Value::Bool(value));
            }
            let l = evaluate(left)?;
            let r = evaluate(right)?;
            if op.is_comparison() {
                compare_values(*op, &l, &r, expr).map(Value::Bool)
            } else {
                arithmetic(*op, l, r, expr)
            }
        }
        Expr::Call {
            method,
            receiver,
            args,
        } => call(*method, receiver, args, expr),
    }
}

pub(crate) fn evaluate_bool(expr: &Expr) -> Result<bool> {
    match evaluate(expr)? {
        Value::Bool(b) => Ok(b),
        _ => Err(JoineryError::unsupported(expr, "expression is not boolean")),
    }
}

// =============================================================================
// Numeric promotion
// =============================================================================

enum Num {
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
}

impl Num {
    fn of(value: &Value) -> Option<Self> {
        Some(match *value {
            Value::Int32(v) => Num::Int32(v),
            Value::Int64(v) => Num::Int64(v),
            Value::Single(v) => Num::Single(v),
            Value::Double(v) => Num::Double(v),
            Value::Decimal(v) => Num::Decimal(v),
            _ => return None,
        })
    }

    fn rank(&self) -> u8 {
        match self {
            Num::Int32(_) => 0,
            Num::Int64(_) => 1,
            Num::Single(_) => 2,
            Num::Double(_) => 3,
            Num::Decimal(_) => 4,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match *self {
            Num::Int32(v) => Some(i64::from(v)),
            Num::Int64(v) => Some(v),
            _ => None,
        }
    }

    fn as_f64(&self) -> f64 {
        match *self {
            Num::Int32(v) => f64::from(v),
            Num::Int64(v) => v as f64,
            Num::Single(v) => f64::from(v),
            Num::Double(v) => v,
            Num::Decimal(v) => rust_decimal::prelude::ToPrimitive::to_f64(&v).unwrap_or(f64::NAN),
        }
    }

    fn as_decimal(&self) -> Option<Decimal> {
        match *self {
            Num::Int32(v) => Some(Decimal::from(v)),
            Num::Int64(v) => Some(Decimal::from(v)),
            Num::Single(v) => Decimal::from_f32(v),
            Num::Double(v) => Decimal::from_f64(v),
            Num::Decimal(v) => Some(v),
        }
    }
}

fn arithmetic(op: BinaryOp, l: Value, r: Value, expr: &Expr) -> Result<Value> {
    if l.is_null() || r.is_null() {
        return Ok(Value::Null);
    }
    if let (BinaryOp::Add, Value::String(a), Value::String(b)) = (op, &l, &r) {
        return Ok(Value::String(format!("{a}{b}")));
    }
    let (Some(a), Some(b)) = (Num::of(&l), Num::of(&r)) else {
        return Err(JoineryError::unsupported(expr, "arithmetic on non-numeric literals"));
    };
    let overflow = || JoineryError::unsupported(expr, "arithmetic overflow or division by zero");

    match a.rank().max(b.rank()) {
        0 | 1 => {
            let (x, y) = (a.as_i64().ok_or_else(overflow)?, b.as_i64().ok_or_else(overflow)?);
            let v = match op {
                BinaryOp::Add => x.checked_add(y),
                BinaryOp::Sub => x.checked_sub(y),
                BinaryOp::Mul => x.checked_mul(y),
                _ => x.checked_div(y),
            }
            .ok_or_else(overflow)?;
            if a.rank() == 0 && b.rank() == 0 {
                i32::try_from(v).map(Value::Int32).map_err(|_| overflow())
            } else {
                Ok(Value::Int64(v))
            }
        }
        4 => {
            let (x, y) = (
                a.as_decimal().ok_or_else(overflow)?,
                b.as_decimal().ok_or_else(overflow)?,
            );
            match op {
                BinaryOp::Add => x.checked_add(y),
                BinaryOp::Sub => x.checked_sub(y),
                BinaryOp::Mul => x.checked_mul(y),
                _ => x.checked_div(y),
            }
            .map(Value::Decimal)
            .ok_or_else(overflow)
        }
        rank => {
            let (x, y) = (a.as_f64(), b.as_f64());
            if op == BinaryOp::Div && y == 0.0 {
                return Err(overflow());
            }
            let v = match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                _ => x / y,
            };
            Ok(if rank == 2 { Value::Single(v as f32) } else { Value::Double(v) })
        }
    }
}

// =============================================================================
// Comparison
// =============================================================================

fn ordering(l: &Value, r: &Value) -> Option<Ordering> {
    if let (Some(a), Some(b)) = (Num::of(l), Num::of(r)) {
        return match a.rank().max(b.rank()) {
            0 | 1 => Some(a.as_i64()?.cmp(&b.as_i64()?)),
            4 => Some(a.as_decimal()?.cmp(&b.as_decimal()?)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        };
    }
    match (l, r) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Guid(a), Value::Guid(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

pub(crate) fn compare_values(op: BinaryOp, l: &Value, r: &Value, expr: &Expr) -> Result<bool> {
    if l.is_null() || r.is_null() {
        let both = l.is_null() && r.is_null();
        return match op {
            BinaryOp::Eq => Ok(both),
            BinaryOp::Ne => Ok(!both),
            _ => Err(JoineryError::unsupported(expr, "ordering comparison with null")),
        };
    }
    let same_kind = l.field_type() == r.field_type() || (Num::of(l).is_some() && Num::of(r).is_some());
    if !same_kind {
        return Err(JoineryError::unsupported(expr, "comparison of incompatible literals"));
    }
    // NaN compares unequal to everything
    let Some(ord) = ordering(l, r) else {
        return Ok(op == BinaryOp::Ne);
    };
    Ok(match op {
        BinaryOp::Eq => ord == Ordering::Equal,
        BinaryOp::Ne => ord != Ordering::Equal,
        BinaryOp::Gt => ord == Ordering::Greater,
        BinaryOp::Ge => ord != Ordering::Less,
        BinaryOp::Lt => ord == Ordering::Less,
        _ => ord != Ordering::Greater,
    })
}

// =============================================================================
// Method calls
// =============================================================================

fn text<'v>(value: &'v Value, expr: &Expr) -> Result<&'v str> {
    value
        .as_str()
        .ok_or_else(|| JoineryError::unsupported(expr, "text method on a non-text literal"))
}

fn arg<'e>(args: &'e [Expr], index: usize, expr: &Expr) -> Result<&'e Expr> {
    args.get(index)
        .ok_or_else(|| JoineryError::unsupported(expr, "missing method argument"))
}

fn call(method: Method, receiver: &Expr, args: &[Expr], expr: &Expr) -> Result<Value> {
    let value = match method {
        Method::Average => return average(receiver, expr),
        _ => evaluate(receiver)?,
    };
    if value.is_null() && !method.is_predicate() {
        return Ok(Value::Null);
    }

    match method {
        Method::Contains | Method::StartsWith | Method::EndsWith => {
            let pattern = evaluate(arg(args, 0, expr)?)?;
            let (s, p) = (text(&value, expr)?, text(&pattern, expr)?);
            Ok(Value::Bool(match method {
                Method::Contains => s.contains(p),
                Method::StartsWith => s.starts_with(p),
                _ => s.ends_with(p),
            }))
        }
        Method::Matches => {
            let pattern = evaluate(arg(args, 0, expr)?)?;
            let re = regex::Regex::new(text(&pattern, expr)?)
                .map_err(|_| JoineryError::unsupported(expr, "invalid regular expression"))?;
            Ok(Value::Bool(re.is_match(text(&value, expr)?)))
        }
        Method::Between => {
            let low = evaluate(arg(args, 0, expr)?)?;
            let high = evaluate(arg(args, 1, expr)?)?;
            Ok(Value::Bool(
                compare_values(BinaryOp::Ge, &value, &low, expr)?
                    && compare_values(BinaryOp::Le, &value, &high, expr)?,
            ))
        }
        Method::After | Method::Before => {
            let moment = evaluate(arg(args, 0, expr)?)?;
            let op = if method == Method::After { BinaryOp::Gt } else { BinaryOp::Lt };
            compare_values(op, &value, &moment, expr).map(Value::Bool)
        }
        Method::ToUpper => Ok(Value::String(text(&value, expr)?.to_uppercase())),
        Method::ToLower => Ok(Value::String(text(&value, expr)?.to_lowercase())),
        Method::Trim => Ok(Value::String(text(&value, expr)?.trim().to_string())),
        Method::Length => {
            let len = text(&value, expr)?.chars().count();
            i32::try_from(len)
                .map(Value::Int32)
                .map_err(|_| JoineryError::unsupported(expr, "string too long"))
        }
        Method::Round => {
            let digits = match evaluate(arg(args, 0, expr)?)? {
                Value::Int32(d) => d,
                _ => return Err(JoineryError::unsupported(expr, "round digits must be an int32")),
            };
            round(value, digits, expr)
        }
        Method::In => {
            let Expr::List(items) = arg(args, 0, expr)? else {
                return Err(JoineryError::unsupported(expr, "IN expects a list"));
            };
            for item in items {
                if compare_values(BinaryOp::Eq, &value, &evaluate(item)?, expr)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Method::Abs => {
            let abs = match value {
                Value::Int32(v) => v.checked_abs().map(Value::Int32),
                Value::Int64(v) => v.checked_abs().map(Value::Int64),
                Value::Single(v) => Some(Value::Single(v.abs())),
                Value::Double(v) => Some(Value::Double(v.abs())),
                Value::Decimal(v) => Some(Value::Decimal(v.abs())),
                _ => None,
            };
            abs.ok_or_else(|| JoineryError::unsupported(expr, "abs of a non-numeric literal"))
        }
        Method::Year | Method::Month | Method::Day => {
            let Value::DateTime(dt) = value else {
                return Err(JoineryError::unsupported(expr, "date part of a non-date literal"));
            };
            let part = match method {
                Method::Year => dt.year(),
                Method::Month => dt.month() as i32,
                _ => dt.day() as i32,
            };
            Ok(Value::Int32(part))
        }
        Method::Average => average(receiver, expr),
    }
}

fn round(value: Value, digits: i32, expr: &Expr) -> Result<Value> {
    let negative = || JoineryError::unsupported(expr, "negative rounding digits");
    match value {
        Value::Int32(_) | Value::Int64(_) if digits >= 0 => Ok(value),
        // midpoint rounds to even, like the database functions most hosts mirror
        Value::Double(v) => {
            let p = 10f64.powi(digits);
            Ok(Value::Double((v * p).round_ties_even() / p))
        }
        Value::Single(v) => {
            let p = 10f64.powi(digits);
            Ok(Value::Single(((f64::from(v) * p).round_ties_even() / p) as f32))
        }
        Value::Decimal(d) => u32::try_from(digits)
            .map(|dp| Value::Decimal(d.round_dp(dp)))
            .map_err(|_| negative()),
        Value::Int32(_) | Value::Int64(_) => Err(negative()),
        _ => Err(JoineryError::unsupported(expr, "round of a non-numeric literal")),
    }
}

fn average(receiver: &Expr, expr: &Expr) -> Result<Value> {
    let Expr::List(items) = receiver else {
        return Err(JoineryError::unsupported(expr, "average expects a list of literals"));
    };
    if receiver.is_entity_bound() {
        return Err(JoineryError::unsupported(expr, "average over entity columns"));
    }
    let mut sum = 0f64;
    let mut count = 0usize;
    for item in items {
        let value = evaluate(item)?;
        if value.is_null() {
            continue;
        }
        let n = Num::of(&value)
            .ok_or_else(|| JoineryError::unsupported(expr, "average of non-numeric literals"))?;
        sum += n.as_f64();
        count += 1;
    }
    Ok(if count == 0 { Value::Null } else { Value::Double(sum / count as f64) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(v: impl Into<Value>) -> Expr {
        Expr::literal(v)
    }

    #[test]
    fn integer_arithmetic_keeps_width() {
        let e = Expr::binary(BinaryOp::Add, lit(40), lit(2));
        assert_eq!(evaluate(&e).unwrap(), Value::Int32(42));
        let e = Expr::binary(BinaryOp::Mul, lit(3i64), lit(2));
        assert_eq!(evaluate(&e).unwrap(), Value::Int64(6));
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        let e = Expr::binary(BinaryOp::Div, lit(1), lit(4.0));
        assert_eq!(evaluate(&e).unwrap(), Value::Double(0.25));
        let e = Expr::binary(BinaryOp::Add, lit(Decimal::new(150, 2)), lit(1));
        assert_eq!(evaluate(&e).unwrap(), Value::Decimal(Decimal::new(250, 2)));
    }

    #[test]
    fn division_by_zero_is_rejected() {
        let e = Expr::binary(BinaryOp::Div, lit(1), lit(0));
        assert!(matches!(
            evaluate(&e),
            Err(JoineryError::UnsupportedExpression { .. })
        ));
    }

    #[test]
    fn string_methods() {
        let e = Expr::call(Method::ToUpper, lit(" ada "), vec![]);
        let e = Expr::call(Method::Trim, e, vec![]);
        assert_eq!(evaluate(&e).unwrap(), Value::String("ADA".into()));
        let e = Expr::call(Method::Contains, lit("lovelace"), vec![lit("lace")]);
        assert_eq!(evaluate(&e).unwrap(), Value::Bool(true));
        let e = Expr::call(Method::Matches, lit("abc123"), vec![lit(r"^[a-z]+\d+$")]);
        assert_eq!(evaluate(&e).unwrap(), Value::Bool(true));
    }

    #[test]
    fn rounding_is_half_to_even() {
        let e = Expr::call(Method::Round, lit(2.5), vec![lit(0)]);
        assert_eq!(evaluate(&e).unwrap(), Value::Double(2.0));
        let e = Expr::call(Method::Round, lit(Decimal::new(12345, 3)), vec![lit(2)]);
        assert_eq!(evaluate(&e).unwrap(), Value::Decimal(Decimal::new(1234, 2)));
    }

    #[test]
    fn average_skips_nulls() {
        let list = Expr::List(vec![lit(1), lit(Value::Null), lit(4.0)]);
        let e = Expr::call(Method::Average, list, vec![]);
        assert_eq!(evaluate(&e).unwrap(), Value::Double(2.5));
        let e = Expr::call(Method::Average, Expr::List(vec![]), vec![]);
        assert_eq!(evaluate(&e).unwrap(), Value::Null);
    }

    #[test]
    fn null_comparisons() {
        let e = Expr::binary(BinaryOp::Eq, lit(Value::Null), lit(Value::Null));
        assert_eq!(evaluate(&e).unwrap(), Value::Bool(true));
        let e = Expr::binary(BinaryOp::Gt, lit(1), lit(Value::Null));
        assert!(evaluate(&e).is_err());
    }

    #[test]
    fn incompatible_literals_are_rejected() {
        let e = Expr::binary(BinaryOp::Eq, lit(1), lit("1"));
        assert!(evaluate(&e).is_err());
    }
}
