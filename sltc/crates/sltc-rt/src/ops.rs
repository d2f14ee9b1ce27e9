//! The binary/unary operators behind `support.ADD`, `support.EQ`, and
//! friends — the reference semantics a translated comparison or
//! arithmetic expression actually runs against.
//!
//! `VAL`-ing a host object down to a primitive needs the object table, so
//! it lives on [`crate::support::Support`]; everything here operates on
//! already-`VAL`-ed values.

use crate::error::{Result, RuntimeError};
use crate::value::{
    as_f64, is_numeric, numeric_rank, value_at_rank, NumericRank, Value, NUMERIC_LADDER,
};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StringCompareMode {
    Binary,
    Text,
}

fn null_propagates(a: &Value, b: &Value) -> Option<Value> {
    if matches!(a, Value::Null) || matches!(b, Value::Null) {
        Some(Value::Null)
    } else {
        None
    }
}

/// `CONCAT`: `Null & Null` is `Null`; otherwise each side stringifies,
/// treating `Null`/`Empty` as `""`.
pub fn concat(a: &Value, b: &Value) -> Value {
    if matches!(a, Value::Null) && matches!(b, Value::Null) {
        return Value::Null;
    }
    let mut s = stringify_for_concat(a);
    s.push_str(&stringify_for_concat(b));
    Value::String(s)
}

fn stringify_for_concat(v: &Value) -> String {
    match v {
        Value::Null | Value::Empty => String::new(),
        Value::String(s) => s.clone(),
        _ => crate::value::cstr(v)
            .map(|s| match s {
                Value::String(s) => s,
                _ => unreachable!(),
            })
            .unwrap_or_default(),
    }
}

/// `ADD`: widens both operands to a common numeric rank and escalates up
/// the ladder (`Int16 -> Int32 -> Single -> Double -> Currency`) whenever
/// the arithmetic overflows at the current rank; `Currency` overflowing is
/// the one case with nowhere left to widen to, so it's the only genuine
/// `Overflow`.
pub fn add(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    if matches!(a, Value::Empty) && matches!(b, Value::Empty) {
        return Ok(Value::Int16(0));
    }
    if matches!(a, Value::Empty) {
        return Ok(b.clone());
    }
    if matches!(b, Value::Empty) {
        return Ok(a.clone());
    }
    if let (Value::String(x), Value::String(y)) = (a, b) {
        return Ok(Value::String(format!("{x}{y}")));
    }
    if let (Value::Date(days), other) | (other, Value::Date(days)) = (a, b) {
        if is_numeric(other) {
            return Ok(Value::Date(days + as_f64(other)));
        }
    }
    widen_arith(a, b, |x, y| x.checked_add(y), |x, y| x.checked_add(y), |x, y| x + y, |x, y| x.checked_add(y))
}

pub fn subt(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    widen_arith(
        a,
        b,
        |x, y| x.checked_sub(y),
        |x, y| x.checked_sub(y),
        |x, y| x - y,
        |x, y| x.checked_sub(y),
    )
}

pub fn mult(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    widen_arith(
        a,
        b,
        |x, y| x.checked_mul(y),
        |x, y| x.checked_mul(y),
        |x, y| x * y,
        |x, y| x.checked_mul(y),
    )
}

/// Escalates through [`NUMERIC_LADDER`] starting at `max(rank(a), rank(b))`
/// until one of the per-rank closures succeeds; `Currency` is the top of
/// the ladder, so its closure failing is a genuine, final `Overflow`.
fn widen_arith(
    a: &Value,
    b: &Value,
    int16_op: impl Fn(i16, i16) -> Option<i16>,
    int32_op: impl Fn(i32, i32) -> Option<i32>,
    float_op: impl Fn(f64, f64) -> f64,
    currency_op: impl Fn(i64, i64) -> Option<i64>,
) -> Result<Value> {
    let start = numeric_rank(a)
        .into_iter()
        .chain(numeric_rank(b))
        .max()
        .unwrap_or(NumericRank::Int16);
    let start_idx = NUMERIC_LADDER.iter().position(|r| *r == start).unwrap();
    for &rank in &NUMERIC_LADDER[start_idx..] {
        match rank {
            NumericRank::Int16 => {
                if let (Value::Int16(x), Value::Int16(y)) =
                    (value_at_rank(a, rank), value_at_rank(b, rank))
                {
                    if let Some(r) = int16_op(x, y) {
                        return Ok(Value::Int16(r));
                    }
                }
            }
            NumericRank::Int32 => {
                if let (Value::Int32(x), Value::Int32(y)) =
                    (value_at_rank(a, rank), value_at_rank(b, rank))
                {
                    if let Some(r) = int32_op(x, y) {
                        return Ok(Value::Int32(r));
                    }
                }
            }
            NumericRank::Single => {
                let x = as_f64(a) as f32;
                let y = as_f64(b) as f32;
                let result = float_op(x as f64, y as f64);
                let narrowed = result as f32;
                if narrowed.is_finite() && narrowed as f64 == result {
                    return Ok(Value::Single(narrowed));
                }
                return Ok(Value::Double(float_op(as_f64(a), as_f64(b))));
            }
            NumericRank::Double => {
                return Ok(Value::Double(float_op(as_f64(a), as_f64(b))));
            }
            NumericRank::Currency => {
                if let (Value::Currency(x), Value::Currency(y)) =
                    (value_at_rank(a, rank), value_at_rank(b, rank))
                {
                    return currency_op(x, y)
                        .map(Value::Currency)
                        .ok_or(RuntimeError::Overflow);
                }
            }
        }
    }
    unreachable!("Currency is the top of the ladder and always returns")
}

/// `DIV`: always floating point.
pub fn div(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    let y = as_f64(b);
    if y == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Double(as_f64(a) / y))
}

/// `INTDIV` (`\`): truncates toward zero.
pub fn int_div(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    let y = as_f64(b) as i64;
    if y == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    let x = as_f64(a) as i64;
    Ok(Value::Int32((x / y) as i32))
}

/// `MOD`: truncated remainder.
pub fn modulo(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    let y = as_f64(b) as i64;
    if y == 0 {
        return Err(RuntimeError::DivisionByZero);
    }
    let x = as_f64(a) as i64;
    Ok(Value::Int32((x % y) as i32))
}

/// `POW`: always floating point.
pub fn pow(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    Ok(Value::Double(as_f64(a).powf(as_f64(b))))
}

fn empty_default(v: &Value) -> bool {
    matches!(
        v,
        Value::Int16(0) | Value::Int32(0) | Value::Currency(0) | Value::Bool(false)
    ) || matches!(v, Value::Single(f) if *f == 0.0)
        || matches!(v, Value::Double(f) if *f == 0.0)
        || matches!(v, Value::String(s) if s.is_empty())
}

/// `EQ`: the full tri-state comparison described in the runtime contract —
/// `Null` infects, `Empty` compares against each type's default, a
/// boolean compares against a numeric's `-1`/`0` reading, same-type
/// primitives compare directly, and a numeric crossed with a string or a
/// date with no matching rule is `false` rather than an error.
pub fn eq(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    if matches!(a, Value::Empty) && matches!(b, Value::Empty) {
        return Ok(Value::Bool(true));
    }
    if matches!(a, Value::Empty) ^ matches!(b, Value::Empty) {
        let other = if matches!(a, Value::Empty) { b } else { a };
        return Ok(Value::Bool(empty_default(other)));
    }
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(x == y)),
        (Value::Bool(x), other) | (other, Value::Bool(x)) if is_numeric(other) => {
            let target = if *x { -1.0 } else { 0.0 };
            Ok(Value::Bool(as_f64(other) == target))
        }
        (a, b) if is_numeric(a) && is_numeric(b) => Ok(Value::Bool(as_f64(a) == as_f64(b))),
        (Value::String(x), Value::String(y)) => Ok(Value::Bool(x == y)),
        (Value::Date(x), Value::Date(y)) => Ok(Value::Bool(x == y)),
        (Value::Object(x), Value::Object(y)) => Ok(Value::Bool(x == y)),
        (Value::Nothing, Value::Nothing) => Ok(Value::Bool(true)),
        (a, b)
            if (is_numeric(a) && matches!(b, Value::String(_) | Value::Date(_)))
                || (is_numeric(b) && matches!(a, Value::String(_) | Value::Date(_))) =>
        {
            Ok(Value::Bool(false))
        }
        _ => Err(RuntimeError::UnsupportedComparison),
    }
}

/// `NOTEQ`: `EQ`'s logical complement, with `Null` preserved.
pub fn not_eq(a: &Value, b: &Value) -> Result<Value> {
    match eq(a, b)? {
        Value::Null => Ok(Value::Null),
        Value::Bool(x) => Ok(Value::Bool(!x)),
        _ => unreachable!("eq only ever returns Null or Bool"),
    }
}

fn strcomp(a: &str, b: &str, mode: StringCompareMode) -> Ordering {
    match mode {
        StringCompareMode::Binary => a.cmp(b),
        StringCompareMode::Text => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

fn numeric_like(v: &Value) -> f64 {
    match v {
        Value::String(s) if s.is_empty() => 0.0,
        _ => as_f64(v),
    }
}

fn order(a: &Value, b: &Value, mode: StringCompareMode) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => strcomp(x, y, mode),
        (Value::String(s), _) if !s.is_empty() => Ordering::Greater,
        (_, Value::String(s)) if !s.is_empty() => Ordering::Less,
        _ => numeric_like(a)
            .partial_cmp(&numeric_like(b))
            .unwrap_or(Ordering::Equal),
    }
}

fn relational(
    a: &Value,
    b: &Value,
    mode: StringCompareMode,
    want: impl Fn(Ordering) -> bool,
    eq_result: bool,
) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    if let Value::Bool(x) = eq(a, b)? {
        if x {
            return Ok(Value::Bool(eq_result));
        }
    }
    Ok(Value::Bool(want(order(a, b, mode))))
}

pub fn lt(a: &Value, b: &Value, mode: StringCompareMode) -> Result<Value> {
    relational(a, b, mode, |o| o == Ordering::Less, false)
}

pub fn lte(a: &Value, b: &Value, mode: StringCompareMode) -> Result<Value> {
    relational(a, b, mode, |o| o != Ordering::Greater, true)
}

pub fn gt(a: &Value, b: &Value, mode: StringCompareMode) -> Result<Value> {
    relational(a, b, mode, |o| o == Ordering::Greater, false)
}

pub fn gte(a: &Value, b: &Value, mode: StringCompareMode) -> Result<Value> {
    relational(a, b, mode, |o| o != Ordering::Less, true)
}

fn to_i16_bits(v: &Value) -> Result<i16> {
    match v {
        Value::Bool(b) => Ok(if *b { -1 } else { 0 }),
        Value::Null => Err(RuntimeError::InvalidUseOfNull),
        other if is_numeric(other) => Ok(as_f64(other).round() as i16),
        _ => Err(RuntimeError::TypeMismatch),
    }
}

fn is_false(v: &Value) -> bool {
    matches!(v, Value::Bool(false))
}

fn is_true(v: &Value) -> bool {
    matches!(v, Value::Bool(true))
}

fn bitwise(a: &Value, b: &Value, f: impl Fn(i16, i16) -> i16) -> Result<Value> {
    let x = to_i16_bits(a)?;
    let y = to_i16_bits(b)?;
    let r = f(x, y);
    if matches!(a, Value::Bool(_)) && matches!(b, Value::Bool(_)) {
        Ok(Value::Bool(r != 0))
    } else {
        Ok(Value::Int16(r))
    }
}

/// `AND`: short-circuits to `false` if either side is literally `False`,
/// even when the other side is `Null`; otherwise `Null` infects.
pub fn and(a: &Value, b: &Value) -> Result<Value> {
    if is_false(a) || is_false(b) {
        return Ok(Value::Bool(false));
    }
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    bitwise(a, b, |x, y| x & y)
}

/// `OR`: short-circuits to `true` if either side is literally `True`, even
/// when the other side is `Null`; otherwise `Null` infects.
pub fn or(a: &Value, b: &Value) -> Result<Value> {
    if is_true(a) || is_true(b) {
        return Ok(Value::Bool(true));
    }
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    bitwise(a, b, |x, y| x | y)
}

pub fn xor(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    bitwise(a, b, |x, y| x ^ y)
}

pub fn eqv(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    bitwise(a, b, |x, y| !(x ^ y))
}

pub fn imp(a: &Value, b: &Value) -> Result<Value> {
    if let Some(n) = null_propagates(a, b) {
        return Ok(n);
    }
    bitwise(a, b, |x, y| !x | y)
}

pub fn not(a: &Value) -> Result<Value> {
    if matches!(a, Value::Null) {
        return Ok(Value::Null);
    }
    let x = to_i16_bits(a)?;
    if matches!(a, Value::Bool(_)) {
        Ok(Value::Bool(x == 0))
    } else {
        Ok(Value::Int16(!x))
    }
}

/// `IS`: object reference equality; `TypeMismatch` unless both sides are
/// object references (including `Nothing`).
pub fn is(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Object(x), Value::Object(y)) => Ok(Value::Bool(x == y)),
        (Value::Nothing, Value::Nothing) => Ok(Value::Bool(true)),
        (Value::Nothing, Value::Object(_)) | (Value::Object(_), Value::Nothing) => {
            Ok(Value::Bool(false))
        }
        _ => Err(RuntimeError::ObjectRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_empty_matches_each_types_default() {
        assert_eq!(eq(&Value::Empty, &Value::String(String::new())).unwrap(), Value::Bool(true));
        assert_eq!(eq(&Value::Empty, &Value::Bool(false)).unwrap(), Value::Bool(true));
        assert_eq!(eq(&Value::Empty, &Value::Int16(0)).unwrap(), Value::Bool(true));
        assert_eq!(eq(&Value::Empty, &Value::Int16(1)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn eq_boolean_against_numeric_reads_true_as_negative_one() {
        assert_eq!(eq(&Value::Bool(true), &Value::Int16(-1)).unwrap(), Value::Bool(true));
        assert_eq!(eq(&Value::Bool(true), &Value::Int16(1)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn eq_null_always_propagates() {
        assert_eq!(eq(&Value::Null, &Value::Int16(1)).unwrap(), Value::Null);
    }

    #[test]
    fn eq_numeric_against_string_without_a_rule_is_false_not_an_error() {
        assert_eq!(
            eq(&Value::Int16(5), &Value::String("hello".into())).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn eq_is_symmetric_across_a_representative_matrix() {
        let values = [
            Value::Empty,
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Int16(0),
            Value::Int16(5),
            Value::Double(5.0),
            Value::String("5".into()),
            Value::String(String::new()),
        ];
        for a in &values {
            for b in &values {
                assert_eq!(eq(a, b), eq(b, a), "EQ must be symmetric for {a:?} and {b:?}");
            }
        }
    }

    #[test]
    fn not_eq_is_eqs_complement_preserving_null() {
        assert_eq!(not_eq(&Value::Null, &Value::Int16(1)).unwrap(), Value::Null);
        assert_eq!(not_eq(&Value::Int16(1), &Value::Int16(1)).unwrap(), Value::Bool(false));
        assert_eq!(not_eq(&Value::Int16(1), &Value::Int16(2)).unwrap(), Value::Bool(true));
    }

    #[test]
    fn add_widens_int16_overflow_into_int32() {
        assert_eq!(
            add(&Value::Int16(30000), &Value::Int16(30000)).unwrap(),
            Value::Int32(60000)
        );
    }

    #[test]
    fn add_two_singles_stays_single() {
        assert_eq!(
            add(&Value::Single(1.0), &Value::Single(2.0)).unwrap(),
            Value::Single(3.0)
        );
    }

    #[test]
    fn mult_single_by_int_stays_single() {
        assert_eq!(
            mult(&Value::Single(1.5), &Value::Int16(2)).unwrap(),
            Value::Single(3.0)
        );
    }

    #[test]
    fn add_currency_overflow_has_nowhere_left_to_widen() {
        let max = Value::Currency(i64::MAX);
        assert_eq!(add(&max, &Value::Currency(10_000)), Err(RuntimeError::Overflow));
    }

    #[test]
    fn add_null_propagates_and_empty_plus_empty_is_zero() {
        assert_eq!(add(&Value::Null, &Value::Int16(1)).unwrap(), Value::Null);
        assert_eq!(add(&Value::Empty, &Value::Empty).unwrap(), Value::Int16(0));
        assert_eq!(add(&Value::Empty, &Value::Int16(4)).unwrap(), Value::Int16(4));
    }

    #[test]
    fn add_concatenates_two_strings() {
        assert_eq!(
            add(&Value::String("foo".into()), &Value::String("bar".into())).unwrap(),
            Value::String("foobar".into())
        );
    }

    #[test]
    fn concat_treats_null_and_empty_as_empty_string_unless_both_null() {
        assert_eq!(concat(&Value::Null, &Value::Null), Value::Null);
        assert_eq!(
            concat(&Value::Null, &Value::String("x".into())),
            Value::String("x".into())
        );
    }

    #[test]
    fn int_div_truncates_toward_zero() {
        assert_eq!(int_div(&Value::Int16(7), &Value::Int16(2)).unwrap(), Value::Int32(3));
        assert_eq!(int_div(&Value::Int16(-7), &Value::Int16(2)).unwrap(), Value::Int32(-3));
    }

    #[test]
    fn div_by_zero_is_an_error_and_div_always_returns_double() {
        assert_eq!(div(&Value::Int16(4), &Value::Int16(0)), Err(RuntimeError::DivisionByZero));
        assert_eq!(div(&Value::Int16(5), &Value::Int16(2)).unwrap(), Value::Double(2.5));
    }

    #[test]
    fn and_short_circuits_false_even_against_null() {
        assert_eq!(and(&Value::Null, &Value::Bool(false)).unwrap(), Value::Bool(false));
        assert_eq!(and(&Value::Null, &Value::Bool(true)).unwrap(), Value::Null);
    }

    #[test]
    fn or_short_circuits_true_even_against_null() {
        assert_eq!(or(&Value::Null, &Value::Bool(true)).unwrap(), Value::Bool(true));
        assert_eq!(or(&Value::Null, &Value::Bool(false)).unwrap(), Value::Null);
    }

    #[test]
    fn lt_lte_gt_gte_are_jointly_exhaustive_for_non_null_operands() {
        let pairs = [(Value::Int16(1), Value::Int16(2)), (Value::Int16(2), Value::Int16(2)), (Value::Int16(3), Value::Int16(2))];
        for (a, b) in pairs {
            let lt = lt(&a, &b, StringCompareMode::Binary).unwrap() == Value::Bool(true);
            let eq = eq(&a, &b).unwrap() == Value::Bool(true);
            let gt = gt(&a, &b, StringCompareMode::Binary).unwrap() == Value::Bool(true);
            assert_eq!([lt, eq, gt].iter().filter(|x| **x).count(), 1);
        }
    }

    #[test]
    fn is_requires_object_references() {
        assert_eq!(is(&Value::Nothing, &Value::Nothing).unwrap(), Value::Bool(true));
        assert_eq!(is(&Value::Int16(1), &Value::Int16(1)), Err(RuntimeError::ObjectRequired));
    }
}
