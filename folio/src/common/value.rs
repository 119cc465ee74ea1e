use crate::collection::{Document, DocumentId};
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};

/// Returns the integer a float represents exactly, if any.
#[inline]
fn exact_i64(f: f64) -> Option<i64> {
    // 2^63 is not representable as i64, so the upper bound is exclusive
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < 9_223_372_036_854_775_808.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// Compare two floats with proper NaN and total ordering.
#[inline]
fn num_cmp_float(a: f64, b: f64) -> Ordering {
    // Handle NaN: treat NaN as greater than all other values
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

#[inline]
fn num_cmp_mixed(a: i64, b: f64) -> Ordering {
    // `a as f64` rounds near 2^63, so compare against the integral part of `b`
    if b.is_nan() || b >= 9_223_372_036_854_775_808.0 {
        return Ordering::Less;
    }
    if b < i64::MIN as f64 {
        return Ordering::Greater;
    }
    let floor = b.floor();
    match a.cmp(&(floor as i64)) {
        Ordering::Equal if b > floor => Ordering::Less,
        ordering => ordering,
    }
}

/// Represents a [Document] value.
///
/// Documents are schema-less, so every field carries an explicit type tag
/// which is checked whenever two values are compared or accumulated.
///
/// # Characteristics
/// - **Cross-numeric**: `I64(10)` and `F64(10.0)` are equal and hash alike,
///   so they land on the same index key
/// - **Total order**: implements `Ord` for sorting, ranking types as
///   null < numbers < strings < documents < arrays < ids < booleans
/// - **Default**: defaults to `Null`
///
/// # Usage
/// ```text
/// let v1: Value = 42.into();
/// let v2 = Value::from("hello");
/// let doc = doc! { price: 12.5, title: "1984" };
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// Represents a null value.
    #[default]
    Null,
    /// Represents a boolean value.
    Bool(bool),
    /// Represents a signed 64-bit integer value.
    I64(i64),
    /// Represents a 64-bit floating point value.
    F64(f64),
    /// Represents a string value.
    String(String),
    /// Represents a nested document.
    Document(Document),
    /// Represents an ordered sequence of values.
    Array(Vec<Value>),
    /// Represents a document identifier.
    Id(DocumentId),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::I64(_) | Value::F64(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_document(&self) -> bool {
        matches!(self, Value::Document(_))
    }

    pub fn is_id(&self) -> bool {
        matches!(self, Value::Id(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(i) => Some(*i),
            Value::F64(f) => exact_i64(*f),
            _ => None,
        }
    }

    /// Returns the numeric value widened to `f64`, for any numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::I64(i) => Some(*i as f64),
            Value::F64(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&String> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_document_mut(&mut self) -> Option<&mut Document> {
        match self {
            Value::Document(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<DocumentId> {
        match self {
            Value::Id(id) => Some(*id),
            _ => None,
        }
    }

    /// Human readable name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::I64(_) => "int",
            Value::F64(_) => "double",
            Value::String(_) => "string",
            Value::Document(_) => "document",
            Value::Array(_) => "array",
            Value::Id(_) => "id",
        }
    }

    fn type_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::I64(_) | Value::F64(_) => 1,
            Value::String(_) => 2,
            Value::Document(_) => 3,
            Value::Array(_) => 4,
            Value::Id(_) => 5,
            Value::Bool(_) => 6,
        }
    }

    /// Compares two values only when their types are compatible.
    ///
    /// Numbers compare with numbers, strings with strings, booleans with
    /// booleans and ids with ids. Everything else returns `None`, which
    /// range predicates treat as "no match".
    pub fn compare_compatible(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::I64(a), Value::I64(b)) => Some(a.cmp(b)),
            (Value::F64(a), Value::F64(b)) => Some(num_cmp_float(*a, *b)),
            (Value::I64(a), Value::F64(b)) => Some(num_cmp_mixed(*a, *b)),
            (Value::F64(a), Value::I64(b)) => Some(num_cmp_mixed(*b, *a).reverse()),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            (Value::Id(a), Value::Id(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Value::I64(a), Value::F64(b)) | (Value::F64(b), Value::I64(a)) => {
                exact_i64(*b) == Some(*a)
            }
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Document(a), Value::Document(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Id(a), Value::Id(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        if let Some(ordering) = self.compare_compatible(other) {
            return ordering;
        }

        match (self, other) {
            (Value::Null, Value::Null) => Ordering::Equal,
            (Value::Document(a), Value::Document(b)) => a.cmp(b),
            (Value::Array(a), Value::Array(b)) => a.cmp(b),
            _ => self.type_rank().cmp(&other.type_rank()),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // integral floats hash as integers to stay consistent with `eq`
        match self {
            Value::Null => 0u8.hash(state),
            Value::Bool(v) => {
                1u8.hash(state);
                v.hash(state);
            }
            Value::I64(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            Value::F64(v) => match exact_i64(*v) {
                Some(i) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                None if v.is_nan() => 3u8.hash(state),
                None => {
                    4u8.hash(state);
                    v.to_bits().hash(state);
                }
            },
            Value::String(v) => {
                5u8.hash(state);
                v.hash(state);
            }
            Value::Document(v) => {
                6u8.hash(state);
                v.hash(state);
            }
            Value::Array(v) => {
                7u8.hash(state);
                v.hash(state);
            }
            Value::Id(v) => {
                8u8.hash(state);
                v.hash(state);
            }
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::I64(i) => write!(f, "{}", i),
            Value::F64(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Document(d) => write!(f, "{}", d),
            Value::Array(a) => write!(f, "[{}]", a.iter().join(", ")),
            Value::Id(id) => write!(f, "{}", id),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::I64(value as i64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::I64(value as i64)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F64(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<Document> for Value {
    fn from(value: Document) -> Self {
        Value::Document(value)
    }
}

impl From<DocumentId> for Value {
    fn from(value: DocumentId) -> Self {
        Value::Id(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_cross_numeric_equality_and_hash() {
        let a = Value::I64(10);
        let b = Value::F64(10.0);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(Value::I64(10), Value::F64(10.5));
    }

    #[test]
    fn test_negative_zero_matches_zero() {
        assert_eq!(Value::F64(-0.0), Value::I64(0));
        assert_eq!(hash_of(&Value::F64(-0.0)), hash_of(&Value::I64(0)));
    }

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_eq!(hash_of(&Value::F64(f64::NAN)), hash_of(&Value::F64(f64::NAN)));
    }

    #[test]
    fn test_compare_compatible() {
        assert_eq!(Value::I64(1).compare_compatible(&Value::F64(1.5)), Some(Ordering::Less));
        assert_eq!(Value::F64(2.5).compare_compatible(&Value::I64(2)), Some(Ordering::Greater));
        assert_eq!(
            Value::from("a").compare_compatible(&Value::from("b")),
            Some(Ordering::Less)
        );
        assert_eq!(Value::from("2001").compare_compatible(&Value::I64(2000)), None);
        assert_eq!(Value::Null.compare_compatible(&Value::Null), None);
    }

    #[test]
    fn test_mixed_order_near_i64_bounds() {
        let two_pow_63 = Value::F64(9_223_372_036_854_775_808.0);
        assert_eq!(Value::I64(i64::MAX).cmp(&two_pow_63), Ordering::Less);
        assert_eq!(Value::I64(i64::MAX - 1).cmp(&two_pow_63), Ordering::Less);
        assert_eq!(two_pow_63.cmp(&Value::I64(i64::MAX)), Ordering::Greater);
        assert_ne!(two_pow_63, Value::I64(i64::MAX));

        let min = Value::F64(i64::MIN as f64);
        assert_eq!(Value::I64(i64::MIN).cmp(&min), Ordering::Equal);
        assert_eq!(Value::I64(i64::MIN + 1).cmp(&min), Ordering::Greater);
        assert_eq!(Value::I64(-3).cmp(&Value::F64(-2.5)), Ordering::Less);
        assert_eq!(Value::I64(-2).cmp(&Value::F64(-2.5)), Ordering::Greater);
        assert_eq!(Value::I64(5).cmp(&Value::F64(f64::NAN)), Ordering::Less);
    }

    #[test]
    fn test_total_order_type_rank() {
        let mut values = vec![
            Value::Bool(false),
            Value::from("x"),
            Value::I64(3),
            Value::Null,
            Value::Array(vec![]),
            Value::Document(doc! {}),
            Value::F64(1.5),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::F64(1.5),
                Value::I64(3),
                Value::from("x"),
                Value::Document(doc! {}),
                Value::Array(vec![]),
                Value::Bool(false),
            ]
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::F64(7.0).as_i64(), Some(7));
        assert_eq!(Value::F64(7.5).as_i64(), None);
        assert_eq!(Value::I64(7).as_f64(), Some(7.0));
        assert_eq!(Value::from("s").as_string().map(|s| s.as_str()), Some("s"));
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(vec![1, 2]).as_array().map(|a| a.len()), Some(2));
        assert_eq!(Value::from(true).type_name(), "bool");
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::F64(12.0).to_string(), "12.0");
        assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
    }
}
