//! Conversions between Rust field types and SQLite values.
//!
//! Dynamic statements are assembled as text plus an ordered list of
//! [`SqlValue`] binds; nothing caller-supplied is ever interpolated.

use accredigo_domain::{CompanySize, PaymentMethod, PaymentStatus, SubscriptionStatus};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
    query::Query,
    sqlite::{SqliteArguments, SqliteRow},
    Row, Sqlite,
};

use crate::{Error, Result};

/// A bindable SQLite value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

/// Conversion into a bindable value.
pub trait ToSqlValue {
    fn to_sql_value(&self) -> SqlValue;
}

/// Decoding of one named column.
pub trait FromSqlColumn: Sized {
    fn from_column(row: &SqliteRow, column: &str) -> Result<Self>;
}

impl ToSqlValue for SqlValue {
    fn to_sql_value(&self) -> SqlValue {
        self.clone()
    }
}

impl ToSqlValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }
}

impl ToSqlValue for str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.to_string())
    }
}

impl ToSqlValue for &str {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text((*self).to_string())
    }
}

impl ToSqlValue for i32 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Integer(i64::from(*self))
    }
}

impl ToSqlValue for i64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }
}

impl ToSqlValue for f64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Real(*self)
    }
}

impl ToSqlValue for bool {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }
}

impl ToSqlValue for DateTime<Utc> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }
}

impl<T: ToSqlValue> ToSqlValue for Option<T> {
    fn to_sql_value(&self) -> SqlValue {
        match self {
            Some(value) => value.to_sql_value(),
            None => SqlValue::Null,
        }
    }
}

macro_rules! decode_column {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromSqlColumn for $ty {
                fn from_column(row: &SqliteRow, column: &str) -> Result<Self> {
                    row.try_get(column).map_err(Error::from)
                }
            }
        )+
    };
}

decode_column!(
    String,
    Option<String>,
    i32,
    i64,
    f64,
    bool,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

// Domain enumerations are stored as their snake_case text.
macro_rules! text_column {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToSqlValue for $ty {
                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::Text(self.as_str().to_string())
                }
            }

            impl FromSqlColumn for $ty {
                fn from_column(row: &SqliteRow, column: &str) -> Result<Self> {
                    let raw: String = row.try_get(column)?;
                    raw.parse::<$ty>().map_err(|e| {
                        Error::Database(sqlx::Error::ColumnDecode {
                            index: column.to_string(),
                            source: Box::new(e),
                        })
                    })
                }
            }
        )+
    };
}

text_column!(CompanySize, SubscriptionStatus, PaymentMethod, PaymentStatus);

/// Fixed-width RFC 3339 text, so stored timestamps order lexically.
pub(crate) fn timestamp_text(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Bind one value onto a query.
pub(crate) fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<String>::None),
        SqlValue::Bool(v) => query.bind(v),
        SqlValue::Integer(v) => query.bind(v),
        SqlValue::Real(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
        SqlValue::Timestamp(v) => query.bind(timestamp_text(&v)),
    }
}

/// Bind values in order.
pub(crate) fn bind_all(query: SqliteQuery<'_>, values: Vec<SqlValue>) -> SqliteQuery<'_> {
    values.into_iter().fold(query, bind_value)
}
