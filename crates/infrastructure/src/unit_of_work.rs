//! Unit of work: one logical operation, one transaction, one commit.
//!
//! A unit of work hands out one repository per entity type, all sharing the
//! same session. Staged changes become durable only through
//! [`UnitOfWork::save_changes`]. [`UnitOfWork::dispose`] rolls back whatever
//! is still uncommitted and returns the connection to the pool.
//!
//! A unit of work serves one request and should not be driven from several
//! tasks at once. The session lock serialises such misuse but gives no
//! ordering guarantee.

use accredigo_domain::{Accreditation, SubscriptionPlan, User};
use parking_lot::Mutex;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::database::DatabasePool;
use crate::mapping::TableMapping;
use crate::repositories::SqlRepository;
use crate::session::Session;
use crate::{Error, Result};

type RepositoryRegistry = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Per-request repository registry plus the single commit authority.
pub struct UnitOfWork {
    session: Arc<Session>,
    repositories: Mutex<RepositoryRegistry>,
}

impl UnitOfWork {
    /// Start a unit of work on a pooled connection.
    ///
    /// No connection is taken until the first repository operation.
    pub fn new(pool: &DatabasePool) -> Self {
        Self {
            session: Arc::new(Session::new(pool.pool().clone(), None)),
            repositories: Mutex::new(HashMap::new()),
        }
    }

    /// Record the actor stamped into `updated_by` on every mutation.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        let pool = self.session.pool().clone();
        self.session.release();
        self.session = Arc::new(Session::new(pool, Some(actor.into())));
        self.repositories.get_mut().clear();
        self
    }

    /// Actor recorded for this unit of work.
    pub fn actor(&self) -> Option<&str> {
        self.session.actor()
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.session.is_disposed()
    }

    /// Repository for `T`, created on first use and cached afterwards.
    pub fn repository<T: TableMapping>(&self) -> Result<Arc<SqlRepository<T>>> {
        self.session.ensure_open()?;

        let entry = self
            .repositories
            .lock()
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                debug!(entity = T::NAME, "Creating repository");
                Arc::new(SqlRepository::<T>::new(Arc::clone(&self.session)))
            })
            .clone();

        entry.downcast::<SqlRepository<T>>().map_err(|_| {
            Error::Configuration(format!("Repository registry holds a mismatched entry for {}", T::NAME))
        })
    }

    /// Users repository.
    pub fn users(&self) -> Result<Arc<SqlRepository<User>>> {
        self.repository::<User>()
    }

    /// Accreditations repository.
    pub fn accreditations(&self) -> Result<Arc<SqlRepository<Accreditation>>> {
        self.repository::<Accreditation>()
    }

    /// Subscription plans repository.
    pub fn subscription_plans(&self) -> Result<Arc<SqlRepository<SubscriptionPlan>>> {
        self.repository::<SubscriptionPlan>()
    }

    /// Commit everything staged so far.
    ///
    /// Returns the number of rows the staged statements affected; 0 when
    /// nothing was staged. The unit of work stays usable afterwards.
    #[instrument(skip(self))]
    pub async fn save_changes(&self) -> Result<u64> {
        let rows = self.session.commit().await?;
        info!(rows, "Changes saved");
        Ok(rows)
    }

    /// Roll back uncommitted work and release the connection. Idempotent.
    #[instrument(skip(self))]
    pub async fn dispose(&self) -> Result<()> {
        if self.session.close().await? {
            self.repositories.lock().clear();
            debug!("Unit of work disposed");
        }
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        self.session.release();
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("actor", &self.session.actor())
            .field("disposed", &self.session.is_disposed())
            .field("repositories", &self.repositories.lock().len())
            .finish()
    }
}
