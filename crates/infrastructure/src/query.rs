//! Predicate and ordering construction for repository queries.
//!
//! Column names are checked against the entity's [`TableMapping`] before
//! they reach SQL text; values always travel as bound parameters.

use accredigo_common::{SortDirection, SortParams};
use tracing::warn;

use crate::mapping::{TableMapping, CREATED_AT_COLUMN, DELETED_COLUMN};
use crate::values::{SqlValue, ToSqlValue};
use crate::{Error, Result};

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOp {
    fn as_sql(self) -> &'static str {
        match self {
            FilterOp::Eq => "=",
            FilterOp::Ne => "<>",
            FilterOp::Gt => ">",
            FilterOp::Gte => ">=",
            FilterOp::Lt => "<",
            FilterOp::Lte => "<=",
        }
    }
}

/// A predicate tree over an entity's columns.
///
/// ```rust,ignore
/// let filter = Filter::eq("system_role_id", 2)
///     .and_also(Filter::or(vec![
///         Filter::contains("name", "sara"),
///         Filter::contains("email", "sara"),
///     ]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Compare {
        column: String,
        op: FilterOp,
        value: SqlValue,
    },
    /// Case-insensitive substring match.
    Contains { column: String, needle: String },
    IsNull(String),
    IsNotNull(String),
    In {
        column: String,
        values: Vec<SqlValue>,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    fn compare(column: impl Into<String>, op: FilterOp, value: impl ToSqlValue) -> Self {
        Filter::Compare {
            column: column.into(),
            op,
            value: value.to_sql_value(),
        }
    }

    pub fn eq(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Eq, value)
    }

    pub fn ne(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Ne, value)
    }

    pub fn gt(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Gt, value)
    }

    pub fn gte(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Gte, value)
    }

    pub fn lt(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Lt, value)
    }

    pub fn lte(column: impl Into<String>, value: impl ToSqlValue) -> Self {
        Self::compare(column, FilterOp::Lte, value)
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    pub fn is_null(column: impl Into<String>) -> Self {
        Filter::IsNull(column.into())
    }

    pub fn is_not_null(column: impl Into<String>) -> Self {
        Filter::IsNotNull(column.into())
    }

    pub fn in_list<V: ToSqlValue>(column: impl Into<String>, values: &[V]) -> Self {
        Filter::In {
            column: column.into(),
            values: values.iter().map(ToSqlValue::to_sql_value).collect(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Conjoin with another predicate, flattening nested `And`s.
    pub fn and_also(self, other: Filter) -> Self {
        match self {
            Filter::And(mut filters) => {
                filters.push(other);
                Filter::And(filters)
            }
            first => Filter::And(vec![first, other]),
        }
    }

    /// Render as SQL text, pushing bound values in placeholder order.
    pub(crate) fn render<T: TableMapping>(&self, binds: &mut Vec<SqlValue>) -> Result<String> {
        Ok(match self {
            Filter::Compare { column, op, value } => {
                let column = checked_column::<T>(column)?;
                binds.push(value.clone());
                format!("{column} {} ?", op.as_sql())
            }
            Filter::Contains { column, needle } => {
                let column = checked_column::<T>(column)?;
                binds.push(SqlValue::Text(format!("%{}%", escape_like(needle))));
                format!("LOWER({column}) LIKE LOWER(?) ESCAPE '\\'")
            }
            Filter::IsNull(column) => format!("{} IS NULL", checked_column::<T>(column)?),
            Filter::IsNotNull(column) => format!("{} IS NOT NULL", checked_column::<T>(column)?),
            Filter::In { column, values } => {
                let column = checked_column::<T>(column)?;
                if values.is_empty() {
                    "1 = 0".to_string()
                } else {
                    binds.extend(values.iter().cloned());
                    let placeholders = vec!["?"; values.len()].join(", ");
                    format!("{column} IN ({placeholders})")
                }
            }
            Filter::And(filters) => render_group::<T>(filters, " AND ", "1 = 1", binds)?,
            Filter::Or(filters) => render_group::<T>(filters, " OR ", "1 = 0", binds)?,
            Filter::Not(inner) => format!("NOT ({})", inner.render::<T>(binds)?),
        })
    }
}

fn render_group<T: TableMapping>(
    filters: &[Filter],
    separator: &str,
    when_empty: &str,
    binds: &mut Vec<SqlValue>,
) -> Result<String> {
    if filters.is_empty() {
        return Ok(when_empty.to_string());
    }
    let parts = filters
        .iter()
        .map(|f| f.render::<T>(binds).map(|sql| format!("({sql})")))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(separator))
}

fn checked_column<T: TableMapping>(column: &str) -> Result<&str> {
    if T::has_column(column) {
        Ok(column)
    } else {
        Err(Error::InvalidArgument(format!(
            "Unknown column '{column}' for {}",
            T::NAME
        )))
    }
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Listing options shared by `get_all`, `count` and `get_paged`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: Option<Filter>,
    pub sort: Option<SortParams>,
    pub include_deleted: bool,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: SortParams) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Also return soft-deleted rows.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// ` WHERE ...` clause, or an empty string when nothing restricts rows.
    pub(crate) fn where_clause<T: TableMapping>(&self, binds: &mut Vec<SqlValue>) -> Result<String> {
        let mut parts = Vec::new();
        if !self.include_deleted {
            parts.push(format!("{DELETED_COLUMN} = 0"));
        }
        if let Some(filter) = &self.filter {
            parts.push(format!("({})", filter.render::<T>(binds)?));
        }
        if parts.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", parts.join(" AND ")))
        }
    }

    /// ` ORDER BY ...` clause. The key column always breaks ties.
    pub(crate) fn order_clause<T: TableMapping>(&self) -> String {
        let (column, direction) = match &self.sort {
            Some(sort) => match resolve_sort_column::<T>(&sort.field) {
                Some(column) => (column, sort.direction),
                None => {
                    warn!(
                        entity = T::NAME,
                        field = %sort.field,
                        "Unknown sort field, falling back to default order"
                    );
                    (CREATED_AT_COLUMN, SortDirection::Desc)
                }
            },
            None => (CREATED_AT_COLUMN, SortDirection::Desc),
        };

        if column == T::KEY_COLUMN {
            format!(" ORDER BY {column} {direction}")
        } else {
            format!(" ORDER BY {column} {direction}, {} ASC", T::KEY_COLUMN)
        }
    }
}

/// Match `createdAt`, `created_at` and `CreatedAt` alike.
fn resolve_sort_column<T: TableMapping>(field: &str) -> Option<&'static str> {
    let wanted = normalize_field(field);
    T::all_columns()
        .into_iter()
        .find(|column| normalize_field(column) == wanted)
}

fn normalize_field(field: &str) -> String {
    field
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}
