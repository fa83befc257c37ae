//! Application Services
//!
//! One service per feature area. Every public call runs in its own unit of
//! work: open it for the caller, stage the changes, save, dispose.

mod accreditation;
mod billing;
mod explore_user;
mod facility;
mod facility_user;
mod user;

pub use accreditation::*;
pub use billing::*;
pub use explore_user::*;
pub use facility::*;
pub use facility_user::*;
pub use user::*;

use crate::context::RequestContext;
use crate::{ApplicationError, ApplicationResult};
use accredigo_common::{AppConfig, PaginationParams, SortDirection, SortParams};
use accredigo_domain::User;
use accredigo_infrastructure::{
    DatabasePool, Filter, ListQuery, Repository, SqlRepository, TableMapping, UnitOfWork,
};
use tracing::warn;

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum page size for list operations
    pub max_page_size: u32,
    /// Default page size for list operations
    pub default_page_size: u32,
    /// Minimum accepted password length
    pub min_password_length: usize,
    /// Trial length granted to explore users
    pub explore_trial_days: i64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_page_size: 10,
            min_password_length: 8,
            explore_trial_days: 14,
        }
    }
}

impl From<&AppConfig> for ServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_page_size: config.pagination.max_page_size,
            default_page_size: config.pagination.default_page_size,
            min_password_length: config.auth.min_password_length,
            explore_trial_days: config.auth.explore_trial_days,
        }
    }
}

impl ServiceConfig {
    /// Page parameters with this service's defaults and ceiling applied.
    pub fn paging(&self, page: u32, page_size: u32) -> PaginationParams {
        let page_size = match page_size {
            0 => self.default_page_size,
            n => n.min(self.max_page_size),
        };
        PaginationParams::new(page.max(1), page_size)
    }
}

/// Open a unit of work acting for the caller.
pub(crate) fn begin(pool: &DatabasePool, ctx: &RequestContext) -> UnitOfWork {
    let uow = UnitOfWork::new(pool);
    match ctx.actor() {
        Some(actor) => uow.with_actor(actor),
        None => uow,
    }
}

/// Dispose the unit of work and hand back the operation's outcome.
///
/// The operation's own error wins over a failure to dispose.
pub(crate) async fn finish<T>(uow: UnitOfWork, result: ApplicationResult<T>) -> ApplicationResult<T> {
    let disposed = uow.dispose().await;
    let value = result?;
    disposed?;
    Ok(value)
}

/// Hash a password off the async executor.
pub(crate) async fn hash_password(password: String) -> ApplicationResult<String> {
    tokio::task::spawn_blocking(move || accredigo_common::hash_password(&password))
        .await
        .map_err(|e| ApplicationError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| ApplicationError::Internal(format!("{e:#}")))
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Fail with `Conflict` when another account, deleted or not, holds the e-mail.
pub(crate) async fn ensure_email_available(
    uow: &UnitOfWork,
    email: &str,
    except_user: Option<&str>,
) -> ApplicationResult<()> {
    let mut filter = Filter::eq("email", email);
    if let Some(id) = except_user {
        filter = filter.and_also(Filter::ne("id", id));
    }
    let taken = uow
        .users()?
        .count(ListQuery::new().filter(filter).include_deleted())
        .await?;
    if taken > 0 {
        return Err(ApplicationError::Conflict(format!(
            "Email '{email}' is already registered"
        )));
    }
    Ok(())
}

/// Load an entity or fail with `NotFound`.
pub(crate) async fn require<T: TableMapping>(
    repository: &SqlRepository<T>,
    key: &T::Key,
) -> ApplicationResult<T> {
    repository
        .get_by_id(key)
        .await?
        .ok_or_else(|| ApplicationError::NotFound(format!("{} with ID '{}' was not found", T::NAME, key)))
}

/// Fail with `NotFound` unless a live row exists for the key.
pub(crate) async fn require_exists<T: TableMapping>(
    repository: &SqlRepository<T>,
    key: &T::Key,
) -> ApplicationResult<()> {
    if repository.exists(key).await? {
        Ok(())
    } else {
        Err(ApplicationError::NotFound(format!(
            "{} with ID '{}' was not found",
            T::NAME,
            key
        )))
    }
}

/// Map a caller-supplied sort request onto a whitelisted column.
///
/// Field names match ignoring case and underscores. A blank field sorts by
/// `default`; an unknown one is logged and sorts by `default` too.
pub(crate) fn resolve_sort(
    allowed: &[&str],
    sort_by: Option<&str>,
    direction: Option<&str>,
    default: SortParams,
) -> SortParams {
    let Some(requested) = sort_by.map(str::trim).filter(|s| !s.is_empty()) else {
        return default;
    };
    let wanted = requested.replace('_', "").to_lowercase();
    match allowed
        .iter()
        .find(|column| column.replace('_', "") == wanted)
    {
        Some(column) => {
            let direction = match direction.map(str::trim) {
                Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
                _ => SortDirection::Asc,
            };
            SortParams::new(*column, direction)
        }
        None => {
            warn!(sort_by = requested, "Invalid sort field, using default order");
            default
        }
    }
}

/// Case-insensitive search across several text columns.
pub(crate) fn search_filter(columns: &[&str], free_text: Option<&str>) -> Option<Filter> {
    let needle = free_text.map(str::trim).filter(|s| !s.is_empty())?;
    Some(Filter::or(
        columns
            .iter()
            .map(|column| Filter::contains(*column, needle))
            .collect(),
    ))
}

/// Build a new account row from request fields.
pub(crate) fn new_account(
    name: &str,
    arabic_name: Option<&str>,
    email: &str,
    phone: Option<&str>,
    password_hash: String,
    system_role_id: i32,
) -> User {
    let mut user = User::new(
        accredigo_domain::new_id(),
        name.trim(),
        normalize_email(email),
        password_hash,
        system_role_id,
    );
    user.arabic_name = arabic_name.map(|s| s.trim().to_string());
    user.phone_number = phone.map(|s| s.trim().to_string());
    user
}
