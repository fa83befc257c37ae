//! Generic repository over the mapped entity tables.
//!
//! One repository instance serves exactly one entity type and shares the
//! session of the unit of work that created it. Mutations are staged in the
//! session transaction; only the unit of work commits.

mod sql_repository;

pub use sql_repository::SqlRepository;

use accredigo_common::pagination::{PaginatedResult, PaginationParams};
use async_trait::async_trait;

use crate::mapping::TableMapping;
use crate::query::{Filter, ListQuery};

/// Data access for a single entity type.
#[async_trait]
pub trait Repository<T: TableMapping>: Send + Sync {
    /// Find an active entity by key.
    async fn get_by_id(&self, key: &T::Key) -> crate::Result<Option<T>>;

    /// Find an entity by key, soft-deleted or not.
    async fn get_by_id_including_deleted(&self, key: &T::Key) -> crate::Result<Option<T>>;

    /// List entities. No implicit limit.
    async fn get_all(&self, query: ListQuery) -> crate::Result<Vec<T>>;

    /// Active entities matching a predicate.
    async fn find(&self, filter: Filter) -> crate::Result<Vec<T>>;

    /// Count entities matching the query.
    async fn count(&self, query: ListQuery) -> crate::Result<u64>;

    /// Stage an insert. The key must already be assigned.
    async fn add(&self, entity: &T) -> crate::Result<()>;

    /// Stage inserts for every entity, or none of them.
    async fn add_range(&self, entities: &[T]) -> crate::Result<()>;

    /// Stamp the update fields and stage a full-row update.
    async fn update(&self, entity: &mut T) -> crate::Result<()>;

    /// Stage updates for every entity, or none of them.
    async fn update_range(&self, entities: &mut [T]) -> crate::Result<()>;

    /// Soft-delete through the entity.
    async fn remove(&self, entity: &mut T) -> crate::Result<()>;

    /// Soft-delete every entity, or none of them.
    async fn remove_range(&self, entities: &mut [T]) -> crate::Result<()>;

    /// Soft-delete by key.
    async fn soft_delete(&self, key: &T::Key) -> crate::Result<()>;

    /// Whether an active entity has this key.
    async fn exists(&self, key: &T::Key) -> crate::Result<bool>;

    /// One page of entities plus the total match count.
    async fn get_paged(
        &self,
        params: PaginationParams,
        query: ListQuery,
    ) -> crate::Result<PaginatedResult<T>>;
}
