use core::cmp::Ordering;

use crate::key::ItemId;

/// The column name that resolves to a row's stamped insertion position.
///
/// Every row gets an `originalOrder` when it first enters a [`crate::Model`]; sorting by it (or
/// by no column at all) reproduces insertion order.
pub const ORIGINAL_ORDER: &str = "originalOrder";

/// A row the table can sort, filter and key.
///
/// Records are supplied by the caller and never constructed by this crate. Only the id, the
/// active sort column and the active filter column are ever read. Rows are shared behind `Arc`s.
pub trait Record: 'static {
    type Id: ItemId + Clone;

    fn id(&self) -> Self::Id;

    /// Returns the value of a named column, or `None` when the record has no such column.
    fn field(&self, column: &str) -> Option<Value<'_>>;
}

/// A borrowed column value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
}

impl<'a> Value<'a> {
    /// Native ordering between two values.
    ///
    /// Numbers compare numerically (integers and floats mix), strings lexicographically,
    /// booleans with `false < true`, and `Null` equals `Null`. Anything else (mixed kinds, NaN)
    /// is un-orderable and yields `None`.
    pub fn compare(&self, other: &Value<'_>) -> Option<Ordering> {
        match (*self, *other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(&b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(&b)),
            (Value::Int(a), Value::Float(b)) => cmp_int_float(a, b),
            (Value::Float(a), Value::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(&b),
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Exact `i64` against `f64` ordering; `None` only for NaN.
fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    // 2^63, the first float above `i64::MAX`.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return None;
    }
    if f >= LIMIT {
        return Some(Ordering::Less);
    }
    if f < -LIMIT {
        return Some(Ordering::Greater);
    }
    // In range, so the cast only drops the fractional part, and `t as f64` is exact whenever a
    // fractional part exists.
    let t = f as i64;
    Some(i.cmp(&t).then_with(|| {
        (t as f64).partial_cmp(&f).unwrap_or(Ordering::Equal)
    }))
}

impl From<i64> for Value<'_> {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(v)
    }
}
