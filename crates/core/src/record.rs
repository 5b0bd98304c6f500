//! Untyped row model shared by every resource.
//!
//! A [`Record`] is an ordered map from column name to [`FieldValue`]. Column
//! kinds come from the resource descriptors (see [`crate::resource`]) and are
//! applied through [`FieldKind::coerce`] whenever a value crosses a boundary:
//! query strings, JSON request bodies, and rows decoded from the store.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::resource::FieldSpec;
use crate::types::Timestamp;

/// Wire format for date-only columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A single scalar column value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
    Timestamp(Timestamp),
}

impl FieldValue {
    /// Convert a JSON value without any column kind information.
    ///
    /// Arrays and objects are not scalars; they are kept as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Decimal(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            FieldValue::Decimal(f) if f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Decimal(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Total order used for in-memory sorting.
    ///
    /// Nulls compare greater than every other value, matching PostgreSQL's
    /// default `NULLS LAST` for ascending and `NULLS FIRST` for descending
    /// order. Integers and decimals compare numerically.
    pub fn compare(&self, other: &Self) -> Ordering {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Greater,
            (_, Null) => Ordering::Less,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (Timestamp(a), Timestamp(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Bool(_) => 0,
            FieldValue::Integer(_) | FieldValue::Decimal(_) => 1,
            FieldValue::Date(_) => 2,
            FieldValue::Timestamp(_) => 3,
            FieldValue::Text(_) => 4,
            FieldValue::Null => 5,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Decimal(d) => write!(f, "{d}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            FieldValue::Timestamp(t) => f.write_str(&t.to_rfc3339()),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Integer(i) => serializer.serialize_i64(*i),
            FieldValue::Decimal(d) => serializer.serialize_f64(*d),
            FieldValue::Text(s) => serializer.serialize_str(s),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(FieldValue::from_json(&value))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(value: Timestamp) -> Self {
        FieldValue::Timestamp(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// Declared storage kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Decimal,
    Text,
    Boolean,
    Date,
    Timestamp,
}

impl FieldKind {
    /// Convert `value` into this kind, or describe why it cannot be.
    ///
    /// Null passes through unchanged. Text is parsed leniently so that
    /// query-string values (`?branch_id=2`) and loosely typed JSON bodies
    /// resolve to the column's kind.
    pub fn coerce(self, value: FieldValue) -> Result<FieldValue, String> {
        use FieldValue as V;

        if value.is_null() {
            return Ok(V::Null);
        }

        let coerced = match (self, &value) {
            (FieldKind::Integer, V::Integer(_)) => Some(value.clone()),
            (FieldKind::Integer, V::Decimal(_)) => value.as_i64().map(V::Integer),
            (FieldKind::Integer, V::Text(s)) => s.trim().parse().ok().map(V::Integer),

            (FieldKind::Decimal, V::Integer(i)) => Some(V::Decimal(*i as f64)),
            (FieldKind::Decimal, V::Decimal(_)) => Some(value.clone()),
            (FieldKind::Decimal, V::Text(s)) => s.trim().parse().ok().map(V::Decimal),

            (FieldKind::Text, V::Text(_)) => Some(value.clone()),
            (FieldKind::Text, other) => Some(V::Text(other.to_string())),

            (FieldKind::Boolean, V::Bool(_)) => Some(value.clone()),
            (FieldKind::Boolean, V::Integer(0)) => Some(V::Bool(false)),
            (FieldKind::Boolean, V::Integer(1)) => Some(V::Bool(true)),
            (FieldKind::Boolean, V::Text(s)) => parse_bool(s).map(V::Bool),

            (FieldKind::Date, V::Date(_)) => Some(value.clone()),
            (FieldKind::Date, V::Timestamp(t)) => Some(V::Date(t.date_naive())),
            (FieldKind::Date, V::Text(s)) => parse_date(s).map(V::Date),

            (FieldKind::Timestamp, V::Timestamp(_)) => Some(value.clone()),
            (FieldKind::Timestamp, V::Date(d)) => Some(V::Timestamp(midnight(*d))),
            (FieldKind::Timestamp, V::Text(s)) => parse_timestamp(s).map(V::Timestamp),

            _ => None,
        };

        coerced.ok_or_else(|| format!("cannot interpret '{value}' as {self}"))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Text => "text",
            FieldKind::Boolean => "boolean",
            FieldKind::Date => "date",
            FieldKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" => Some(true),
        "false" | "f" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Parse a `YYYY-MM-DD` date, also accepting a full RFC 3339 timestamp.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| parse_timestamp(s).map(|t| t.date_naive()))
}

fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .ok()
        .or_else(|| NaiveDate::parse_from_str(s, DATE_FORMAT).ok().map(midnight))
}

fn midnight(date: NaiveDate) -> Timestamp {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One row of a backing collection, plus any derived display fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for fixtures.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.0.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Value of `field`, treating an absent column as null.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.0.get(field).unwrap_or(&FieldValue::Null)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Non-null text value of `field`.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_i64)
    }

    pub fn decimal(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy every column of `other` into `self`, overwriting on conflict.
    pub fn merge(&mut self, other: &Record) {
        for (k, v) in other.iter() {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Decode a JSON object row, coercing known columns to their declared kind.
    ///
    /// Columns missing from `fields` keep their JSON-derived value. A value
    /// that fails coercion is kept as-is rather than dropped.
    pub fn from_json_row(row: &serde_json::Value, fields: &[FieldSpec]) -> Self {
        let Some(object) = row.as_object() else {
            return Self::default();
        };

        object
            .iter()
            .map(|(name, raw)| {
                let value = FieldValue::from_json(raw);
                let value = match fields.iter().find(|f| f.name == name) {
                    Some(spec) => spec.kind.coerce(value.clone()).unwrap_or(value),
                    None => value,
                };
                (name.clone(), value)
            })
            .collect()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Record(iter.into_iter().collect())
    }
}

impl IntoIterator for Record {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
