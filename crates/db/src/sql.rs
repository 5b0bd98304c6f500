//! SQL generation for planned store operations.
//!
//! Every statement reads from the base table under the alias `t` and returns
//! whole rows as `to_jsonb(t) AS record`, so a single decoder handles every
//! table. Relations are fetched as correlated `jsonb_build_object` subqueries
//! named `rel_<relation>`. Values are always passed as numbered `$n`
//! parameters with an explicit cast to the column's kind; identifiers come
//! from static descriptors and are quoted.

use chrono::NaiveDate;
use wvdi_core::query::{Condition, RecordQuery};
use wvdi_core::record::{FieldKind, FieldValue, Record};
use wvdi_core::resource::{FieldSpec, Relation};
use wvdi_core::types::Timestamp;

/// Alias of the base table in every generated statement.
pub const BASE_ALIAS: &str = "t";

/// Column holding the whole base row as JSONB.
pub const RECORD_COLUMN: &str = "record";

const UPDATED_AT: &str = "updated_at";

// ---------------------------------------------------------------------------
// Bind values
// ---------------------------------------------------------------------------

/// Typed bind value for dynamically-built statements.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    BigInt(Option<i64>),
    Numeric(Option<f64>),
    Text(Option<String>),
    Bool(Option<bool>),
    Date(Option<NaiveDate>),
    Timestamp(Option<Timestamp>),
    BigIntArray(Vec<i64>),
    NumericArray(Vec<f64>),
    TextArray(Vec<String>),
    BoolArray(Vec<bool>),
    DateArray(Vec<NaiveDate>),
    TimestampArray(Vec<Timestamp>),
}

impl BindValue {
    /// Bind `value` as `kind`, falling back to the value's own kind when it
    /// cannot be converted.
    pub fn scalar(kind: FieldKind, value: &FieldValue) -> Self {
        match kind.coerce(value.clone()) {
            Ok(coerced) => Self::typed(kind, &coerced),
            Err(_) => Self::typed(infer_kind(value), value),
        }
    }

    /// Bind the non-null `values` as a single array of `kind`.
    pub fn array(kind: FieldKind, values: &[FieldValue]) -> Self {
        let coerced: Vec<FieldValue> = values
            .iter()
            .filter_map(|v| kind.coerce(v.clone()).ok())
            .filter(|v| !v.is_null())
            .collect();

        match kind {
            FieldKind::Integer => {
                BindValue::BigIntArray(coerced.iter().filter_map(FieldValue::as_i64).collect())
            }
            FieldKind::Decimal => {
                BindValue::NumericArray(coerced.iter().filter_map(FieldValue::as_f64).collect())
            }
            FieldKind::Text => {
                BindValue::TextArray(coerced.iter().map(ToString::to_string).collect())
            }
            FieldKind::Boolean => {
                BindValue::BoolArray(coerced.iter().filter_map(FieldValue::as_bool).collect())
            }
            FieldKind::Date => BindValue::DateArray(
                coerced
                    .iter()
                    .filter_map(|v| match v {
                        FieldValue::Date(d) => Some(*d),
                        _ => None,
                    })
                    .collect(),
            ),
            FieldKind::Timestamp => BindValue::TimestampArray(
                coerced
                    .iter()
                    .filter_map(|v| match v {
                        FieldValue::Timestamp(t) => Some(*t),
                        _ => None,
                    })
                    .collect(),
            ),
        }
    }

    fn typed(kind: FieldKind, value: &FieldValue) -> Self {
        match kind {
            FieldKind::Integer => BindValue::BigInt(value.as_i64()),
            FieldKind::Decimal => BindValue::Numeric(value.as_f64()),
            FieldKind::Text => BindValue::Text((!value.is_null()).then(|| value.to_string())),
            FieldKind::Boolean => BindValue::Bool(value.as_bool()),
            FieldKind::Date => BindValue::Date(match value {
                FieldValue::Date(d) => Some(*d),
                _ => None,
            }),
            FieldKind::Timestamp => BindValue::Timestamp(match value {
                FieldValue::Timestamp(t) => Some(*t),
                _ => None,
            }),
        }
    }

    /// PostgreSQL type the placeholder is cast to.
    pub fn sql_type(&self) -> &'static str {
        match self {
            BindValue::BigInt(_) => "bigint",
            BindValue::Numeric(_) => "numeric",
            BindValue::Text(_) => "text",
            BindValue::Bool(_) => "boolean",
            BindValue::Date(_) => "date",
            BindValue::Timestamp(_) => "timestamptz",
            BindValue::BigIntArray(_) => "bigint[]",
            BindValue::NumericArray(_) => "numeric[]",
            BindValue::TextArray(_) => "text[]",
            BindValue::BoolArray(_) => "boolean[]",
            BindValue::DateArray(_) => "date[]",
            BindValue::TimestampArray(_) => "timestamptz[]",
        }
    }
}

fn infer_kind(value: &FieldValue) -> FieldKind {
    match value {
        FieldValue::Bool(_) => FieldKind::Boolean,
        FieldValue::Integer(_) => FieldKind::Integer,
        FieldValue::Decimal(_) => FieldKind::Decimal,
        FieldValue::Date(_) => FieldKind::Date,
        FieldValue::Timestamp(_) => FieldKind::Timestamp,
        FieldValue::Null | FieldValue::Text(_) => FieldKind::Text,
    }
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

/// Generated SQL text plus its bind values in `$n` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

/// Accumulates bind values and hands out their placeholders.
struct Binder<'a> {
    fields: &'a [FieldSpec],
    binds: Vec<BindValue>,
}

impl<'a> Binder<'a> {
    fn new(fields: &'a [FieldSpec]) -> Self {
        Self {
            fields,
            binds: Vec::new(),
        }
    }

    fn kind_of(&self, column: &str, value: &FieldValue) -> FieldKind {
        self.fields
            .iter()
            .find(|f| f.name == column)
            .map_or_else(|| infer_kind(value), |f| f.kind)
    }

    /// Push a bind value and return its cast placeholder (`$3::bigint`).
    fn push(&mut self, value: BindValue) -> String {
        let placeholder = format!("${}::{}", self.binds.len() + 1, value.sql_type());
        self.binds.push(value);
        placeholder
    }

    fn push_value(&mut self, column: &str, value: &FieldValue) -> String {
        let kind = self.kind_of(column, value);
        self.push(BindValue::scalar(kind, value))
    }

    fn condition(&mut self, condition: &Condition) -> String {
        match condition {
            Condition::Eq { column, value } => {
                let p = self.push_value(column, value);
                format!("{} = {p}", column_ref(column))
            }
            Condition::NotEq { column, value } => {
                let p = self.push_value(column, value);
                format!("{} <> {p}", column_ref(column))
            }
            Condition::In { column, values } => {
                let kind = values
                    .first()
                    .map_or(FieldKind::Text, |v| self.kind_of(column, v));
                let p = self.push(BindValue::array(kind, values));
                format!("{} = ANY({p})", column_ref(column))
            }
            Condition::Contains { columns, term } => {
                if columns.is_empty() {
                    return "FALSE".to_string();
                }
                let p = self.push(BindValue::Text(Some(like_pattern(term))));
                let any = columns
                    .iter()
                    .map(|column| format!("{}::text ILIKE {p} ESCAPE '\\'", column_ref(column)))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                format!("({any})")
            }
            Condition::Gte { column, value } => {
                let p = self.push_value(column, value);
                format!("{} >= {p}", column_ref(column))
            }
            Condition::Lte { column, value } => {
                let p = self.push_value(column, value);
                format!("{} <= {p}", column_ref(column))
            }
        }
    }

    /// `WHERE a AND b`, or an empty string without conditions.
    fn where_clause(&mut self, conditions: &[Condition]) -> String {
        if conditions.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = conditions.iter().map(|c| self.condition(c)).collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    fn finish(self, sql: String) -> Statement {
        Statement {
            sql,
            binds: self.binds,
        }
    }
}

/// Paged, ordered read with relation subqueries.
pub fn select(query: &RecordQuery) -> Statement {
    let mut binder = Binder::new(query.fields);

    let mut projection = vec![format!("to_jsonb({BASE_ALIAS}) AS {RECORD_COLUMN}")];
    projection.extend(query.relations.iter().map(relation_subquery));

    let where_clause = binder.where_clause(&query.conditions);

    let order_clause = if query.order.is_empty() {
        String::new()
    } else {
        let keys: Vec<String> = query
            .order
            .iter()
            .map(|o| format!("{} {}", column_ref(o.column), o.direction.as_sql()))
            .collect();
        format!(" ORDER BY {}", keys.join(", "))
    };

    let window_clause = match query.window {
        Some(window) => {
            let limit = binder.push(BindValue::BigInt(Some(window.limit)));
            let offset = binder.push(BindValue::BigInt(Some(window.offset)));
            format!(" LIMIT {limit} OFFSET {offset}")
        }
        None => String::new(),
    };

    let sql = format!(
        "SELECT {} FROM {} AS {BASE_ALIAS}{where_clause}{order_clause}{window_clause}",
        projection.join(", "),
        quote_ident(query.table),
    );
    binder.finish(sql)
}

/// Count of rows matching the conditions of `query`.
pub fn count(query: &RecordQuery) -> Statement {
    let mut binder = Binder::new(query.fields);
    let where_clause = binder.where_clause(&query.conditions);
    let sql = format!(
        "SELECT COUNT(*)::BIGINT FROM {} AS {BASE_ALIAS}{where_clause}",
        quote_ident(query.table)
    );
    binder.finish(sql)
}

/// Single-row insert returning the stored row.
pub fn insert(table: &str, fields: &[FieldSpec], values: &Record) -> Statement {
    let mut binder = Binder::new(fields);

    let sql = if values.is_empty() {
        format!(
            "INSERT INTO {} AS {BASE_ALIAS} DEFAULT VALUES RETURNING to_jsonb({BASE_ALIAS}) AS {RECORD_COLUMN}",
            quote_ident(table)
        )
    } else {
        let mut columns = Vec::with_capacity(values.len());
        let mut placeholders = Vec::with_capacity(values.len());
        for (column, value) in values.iter() {
            columns.push(quote_ident(column));
            placeholders.push(binder.push_value(column, value));
        }
        format!(
            "INSERT INTO {} AS {BASE_ALIAS} ({}) VALUES ({}) RETURNING to_jsonb({BASE_ALIAS}) AS {RECORD_COLUMN}",
            quote_ident(table),
            columns.join(", "),
            placeholders.join(", "),
        )
    };
    binder.finish(sql)
}

/// Update of every matching row, bumping `updated_at` when the table has it.
pub fn update(
    table: &str,
    fields: &[FieldSpec],
    conditions: &[Condition],
    values: &Record,
) -> Statement {
    let mut binder = Binder::new(fields);

    let mut sets: Vec<String> = values
        .iter()
        .map(|(column, value)| {
            let p = binder.push_value(column, value);
            format!("{} = {p}", quote_ident(column))
        })
        .collect();
    if fields.iter().any(|f| f.name == UPDATED_AT) && !values.contains(UPDATED_AT) {
        sets.push(format!("{} = NOW()", quote_ident(UPDATED_AT)));
    }

    let where_clause = binder.where_clause(conditions);
    let sql = format!(
        "UPDATE {} AS {BASE_ALIAS} SET {}{where_clause} RETURNING to_jsonb({BASE_ALIAS}) AS {RECORD_COLUMN}",
        quote_ident(table),
        sets.join(", "),
    );
    binder.finish(sql)
}

/// Delete of every matching row.
pub fn delete(table: &str, conditions: &[Condition]) -> Statement {
    let mut binder = Binder::new(&[]);
    let where_clause = binder.where_clause(conditions);
    let sql = format!("DELETE FROM {} AS {BASE_ALIAS}{where_clause}", quote_ident(table));
    binder.finish(sql)
}

/// Output column carrying a relation's JSON object.
pub fn relation_column(relation: &Relation) -> String {
    format!("rel_{}", relation.name)
}

fn relation_subquery(relation: &Relation) -> String {
    let pairs: Vec<String> = relation
        .columns
        .iter()
        .map(|column| format!("'{column}', r.{}", quote_ident(column)))
        .collect();
    format!(
        "(SELECT jsonb_build_object({}) FROM {} AS r WHERE r.\"id\" = {}) AS {}",
        pairs.join(", "),
        quote_ident(relation.table),
        column_ref(relation.foreign_key),
        quote_ident(&relation_column(relation)),
    )
}

/// Double-quote an identifier.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn column_ref(column: &str) -> String {
    format!("{BASE_ALIAS}.{}", quote_ident(column))
}

/// `%term%` with LIKE wildcards in `term` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
