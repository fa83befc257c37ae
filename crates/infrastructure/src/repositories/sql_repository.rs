//! SQLite implementation of [`Repository`].

use accredigo_common::pagination::{PaginatedResult, PaginationParams};
use accredigo_domain::EntityKey;
use async_trait::async_trait;
use sqlx::{Connection, Row, SqliteConnection};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::Repository;
use crate::mapping::{audit_values, Related, TableMapping, AUDIT_COLUMNS, DELETED_COLUMN};
use crate::query::{Filter, ListQuery};
use crate::session::Session;
use crate::values::{bind_all, SqlValue};
use crate::{Error, Result};

/// Repository for one entity type, bound to a unit of work's session.
pub struct SqlRepository<T> {
    session: Arc<Session>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: TableMapping> SqlRepository<T> {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            _marker: PhantomData,
        }
    }

    /// Active `R` rows whose foreign key points at `parent`.
    #[instrument(skip(self, parent), fields(entity = T::NAME, related = R::NAME))]
    pub async fn load_related<R>(&self, parent: &T) -> Result<Vec<R>>
    where
        R: TableMapping,
        T: Related<R>,
    {
        let query = ListQuery::new().filter(Filter::eq(
            <T as Related<R>>::FOREIGN_KEY,
            T::key_value(parent.key()),
        ));
        self.list::<R>(&query).await
    }

    async fn list<M: TableMapping>(&self, query: &ListQuery) -> Result<Vec<M>> {
        let mut binds = Vec::new();
        let sql = format!(
            "{}{}{}",
            select_prefix::<M>(),
            query.where_clause::<M>(&mut binds)?,
            query.order_clause::<M>()
        );

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let rows = fetch_all::<M>(conn, &sql, binds).await?;
        debug!(entity = M::NAME, count = rows.len(), "Listed entities");
        Ok(rows)
    }

    async fn lookup(&self, key: &T::Key, include_deleted: bool) -> Result<Option<T>> {
        let mut sql = format!("{} WHERE {} = ?", select_prefix::<T>(), T::KEY_COLUMN);
        if !include_deleted {
            sql.push_str(&format!(" AND {DELETED_COLUMN} = 0"));
        }
        sql.push_str(" LIMIT 1");

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let row = bind_all(sqlx::query(&sql), vec![T::key_value(key)])
            .fetch_optional(&mut *conn)
            .await?;
        row.as_ref().map(T::from_row).transpose()
    }

    fn check_for_write(entity: &T) -> Result<()> {
        if !entity.has_key() {
            return Err(Error::key_not_set(T::NAME, T::KEY_FIELD));
        }
        entity.validate()?;
        Ok(())
    }

    /// Run one statement per entity inside a savepoint.
    ///
    /// Any failure rolls the savepoint back, so earlier rows of the batch
    /// are not left staged. Updates that match no live row fail with
    /// `NotFound`.
    async fn stage_batch(
        &self,
        sql: &str,
        batch: Vec<(String, Vec<SqlValue>)>,
        expect_row: bool,
    ) -> Result<u64> {
        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let mut savepoint = conn.begin().await?;

        let mut rows = 0;
        for (key, binds) in batch {
            let outcome = match execute(&mut savepoint, sql, binds).await {
                Ok(0) if expect_row => Err(Error::not_found(T::NAME, key)),
                other => other,
            };
            match outcome {
                Ok(affected) => rows += affected,
                Err(e) => {
                    savepoint.rollback().await?;
                    return Err(e);
                }
            }
        }

        savepoint.commit().await?;
        state.record_rows(rows);
        Ok(rows)
    }

    async fn stage_update(&self, entity: &T) -> Result<()> {
        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let affected = execute(conn, &update_sql::<T>(), update_values(entity)).await?;
        if affected == 0 {
            return Err(Error::not_found(T::NAME, entity.key()));
        }
        state.record_rows(affected);
        Ok(())
    }
}

impl<T> std::fmt::Debug for SqlRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlRepository")
            .field("entity", &std::any::type_name::<T>())
            .finish()
    }
}

#[async_trait]
impl<T: TableMapping> Repository<T> for SqlRepository<T> {
    #[instrument(skip(self), fields(entity = T::NAME))]
    async fn get_by_id(&self, key: &T::Key) -> Result<Option<T>> {
        self.lookup(key, false).await
    }

    #[instrument(skip(self), fields(entity = T::NAME))]
    async fn get_by_id_including_deleted(&self, key: &T::Key) -> Result<Option<T>> {
        self.lookup(key, true).await
    }

    #[instrument(skip(self, query), fields(entity = T::NAME))]
    async fn get_all(&self, query: ListQuery) -> Result<Vec<T>> {
        self.list::<T>(&query).await
    }

    #[instrument(skip(self, filter), fields(entity = T::NAME))]
    async fn find(&self, filter: Filter) -> Result<Vec<T>> {
        self.list::<T>(&ListQuery::new().filter(filter)).await
    }

    #[instrument(skip(self, query), fields(entity = T::NAME))]
    async fn count(&self, query: ListQuery) -> Result<u64> {
        let mut binds = Vec::new();
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            T::TABLE,
            query.where_clause::<T>(&mut binds)?
        );

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        count_rows(conn, &sql, binds).await
    }

    #[instrument(skip(self, entity), fields(entity = T::NAME, key = %entity.key()))]
    async fn add(&self, entity: &T) -> Result<()> {
        Self::check_for_write(entity)?;

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let affected = execute(conn, &insert_sql::<T>(), insert_values(entity)).await?;
        state.record_rows(affected);
        debug!("Entity staged for insert");
        Ok(())
    }

    #[instrument(skip(self, entities), fields(entity = T::NAME, count = entities.len()))]
    async fn add_range(&self, entities: &[T]) -> Result<()> {
        if entities.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "No {} entities supplied to add",
                T::NAME
            )));
        }
        for entity in entities {
            Self::check_for_write(entity)?;
        }

        let batch = entities
            .iter()
            .map(|e| (e.key().to_string(), insert_values(e)))
            .collect();
        let rows = self.stage_batch(&insert_sql::<T>(), batch, false).await?;
        debug!(rows, "Entities staged for insert");
        Ok(())
    }

    #[instrument(skip(self, entity), fields(entity = T::NAME, key = %entity.key()))]
    async fn update(&self, entity: &mut T) -> Result<()> {
        Self::check_for_write(entity)?;
        entity.audit_mut().touch(self.session.actor());
        self.stage_update(entity).await?;
        debug!("Entity staged for update");
        Ok(())
    }

    #[instrument(skip(self, entities), fields(entity = T::NAME, count = entities.len()))]
    async fn update_range(&self, entities: &mut [T]) -> Result<()> {
        for entity in entities.iter() {
            Self::check_for_write(entity)?;
        }
        if entities.is_empty() {
            return Ok(());
        }

        let actor = self.session.actor();
        let batch = entities
            .iter_mut()
            .map(|e| {
                e.audit_mut().touch(actor);
                (e.key().to_string(), update_values(e))
            })
            .collect();
        let rows = self.stage_batch(&update_sql::<T>(), batch, true).await?;
        debug!(rows, "Entities staged for update");
        Ok(())
    }

    #[instrument(skip(self, entity), fields(entity = T::NAME, key = %entity.key()))]
    async fn remove(&self, entity: &mut T) -> Result<()> {
        Self::check_for_write(entity)?;
        entity.audit_mut().mark_deleted(self.session.actor());
        self.stage_update(entity).await?;
        debug!("Entity staged for soft delete");
        Ok(())
    }

    #[instrument(skip(self, entities), fields(entity = T::NAME, count = entities.len()))]
    async fn remove_range(&self, entities: &mut [T]) -> Result<()> {
        for entity in entities.iter() {
            Self::check_for_write(entity)?;
        }
        if entities.is_empty() {
            return Ok(());
        }

        let actor = self.session.actor();
        let batch = entities
            .iter_mut()
            .map(|e| {
                e.audit_mut().mark_deleted(actor);
                (e.key().to_string(), update_values(e))
            })
            .collect();
        let rows = self.stage_batch(&update_sql::<T>(), batch, true).await?;
        debug!(rows, "Entities staged for soft delete");
        Ok(())
    }

    // Re-deleting an already deleted row is accepted; only a missing key fails.
    #[instrument(skip(self), fields(entity = T::NAME))]
    async fn soft_delete(&self, key: &T::Key) -> Result<()> {
        if key.is_unset() {
            return Err(Error::key_not_set(T::NAME, T::KEY_FIELD));
        }

        let sql = format!(
            "UPDATE {} SET {DELETED_COLUMN} = 1, updated_at = ?, updated_by = COALESCE(?, updated_by) WHERE {} = ?",
            T::TABLE,
            T::KEY_COLUMN
        );
        let binds = vec![
            SqlValue::Timestamp(chrono::Utc::now()),
            self.session
                .actor()
                .map_or(SqlValue::Null, |a| SqlValue::Text(a.to_string())),
            T::key_value(key),
        ];

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let affected = execute(conn, &sql, binds).await?;
        if affected == 0 {
            return Err(Error::not_found(T::NAME, key));
        }
        state.record_rows(affected);
        debug!("Entity staged for soft delete");
        Ok(())
    }

    #[instrument(skip(self), fields(entity = T::NAME))]
    async fn exists(&self, key: &T::Key) -> Result<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = ? AND {DELETED_COLUMN} = 0",
            T::TABLE,
            T::KEY_COLUMN
        );

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        Ok(count_rows(conn, &sql, vec![T::key_value(key)]).await? > 0)
    }

    #[instrument(skip(self, params, query), fields(entity = T::NAME, page = params.page, per_page = params.per_page))]
    async fn get_paged(
        &self,
        params: PaginationParams,
        query: ListQuery,
    ) -> Result<PaginatedResult<T>> {
        let params = params.normalized();

        let mut count_binds = Vec::new();
        let where_clause = query.where_clause::<T>(&mut count_binds)?;
        let count_sql = format!("SELECT COUNT(*) FROM {}{}", T::TABLE, where_clause);

        let mut page_binds = count_binds.clone();
        page_binds.push(SqlValue::Integer(i64::from(params.limit())));
        page_binds.push(SqlValue::Integer(params.offset() as i64));
        let page_sql = format!(
            "{}{}{} LIMIT ? OFFSET ?",
            select_prefix::<T>(),
            where_clause,
            query.order_clause::<T>()
        );

        let mut state = self.session.lock().await?;
        let conn = state.connection(self.session.pool()).await?;
        let total = count_rows(&mut *conn, &count_sql, count_binds).await?;
        let items = if params.offset() >= total {
            Vec::new()
        } else {
            fetch_all::<T>(conn, &page_sql, page_binds).await?
        };

        debug!(total, returned = items.len(), "Page fetched");
        Ok(PaginatedResult::from_params(items, &params, total))
    }
}

fn select_prefix<M: TableMapping>() -> String {
    format!("SELECT {} FROM {}", M::all_columns().join(", "), M::TABLE)
}

fn insert_sql<M: TableMapping>() -> String {
    let columns = M::all_columns();
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        M::TABLE,
        columns.join(", "),
        placeholders
    )
}

fn update_sql<M: TableMapping>() -> String {
    let assignments = M::COLUMNS
        .iter()
        .chain(AUDIT_COLUMNS.iter())
        .map(|column| format!("{column} = ?"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "UPDATE {} SET {} WHERE {} = ? AND {DELETED_COLUMN} = 0",
        M::TABLE,
        assignments,
        M::KEY_COLUMN
    )
}

fn insert_values<M: TableMapping>(entity: &M) -> Vec<SqlValue> {
    let mut values = vec![M::key_value(entity.key())];
    values.extend(entity.column_values());
    values.extend(audit_values(entity.audit()));
    values
}

fn update_values<M: TableMapping>(entity: &M) -> Vec<SqlValue> {
    let mut values = entity.column_values();
    values.extend(audit_values(entity.audit()));
    values.push(M::key_value(entity.key()));
    values
}

async fn execute(conn: &mut SqliteConnection, sql: &str, binds: Vec<SqlValue>) -> Result<u64> {
    let result = bind_all(sqlx::query(sql), binds).execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

async fn count_rows(conn: &mut SqliteConnection, sql: &str, binds: Vec<SqlValue>) -> Result<u64> {
    let row = bind_all(sqlx::query(sql), binds).fetch_one(&mut *conn).await?;
    let count: i64 = row.try_get(0)?;
    Ok(u64::try_from(count).unwrap_or(0))
}

async fn fetch_all<M: TableMapping>(
    conn: &mut SqliteConnection,
    sql: &str,
    binds: Vec<SqlValue>,
) -> Result<Vec<M>> {
    let rows = bind_all(sqlx::query(sql), binds).fetch_all(&mut *conn).await?;
    rows.iter().map(M::from_row).collect()
}
