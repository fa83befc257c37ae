//! Throw-away SQLite databases for integration tests.
//!
//! Each [`TestDatabase`] lives in its own temporary directory with the
//! embedded migrations applied, so tests never share state.

use accredigo_domain::{
    identifiers::system_roles, Accreditation, CompanySize, Facility, User,
};
use accredigo_infrastructure::{DatabaseConfig, DatabasePool, Repository, UnitOfWork};
use anyhow::Context;
use tempfile::TempDir;

use crate::builders::{AccreditationBuilder, UserBuilder};

/// Seeded facility type used by the fixtures.
pub const HOSPITAL_FACILITY_TYPE: i32 = 1;

/// Test database wrapper with automatic cleanup
pub struct TestDatabase {
    pool: DatabasePool,
    // dropped last so the file outlives the pool
    _dir: TempDir,
}

impl TestDatabase {
    /// Create a new test database with migrations applied
    pub async fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let url = format!("sqlite://{}", dir.path().join("accredigo-test.db").display());

        let pool = DatabasePool::new(&DatabaseConfig::test_config(url))
            .await
            .context("Failed to open test database")?;
        pool.migrate().await.context("Failed to apply migrations")?;

        Ok(Self { pool, _dir: dir })
    }

    /// Get a reference to the database pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Fresh unit of work attributed to a test actor.
    pub fn unit_of_work(&self) -> UnitOfWork {
        UnitOfWork::new(&self.pool).with_actor("test-runner")
    }

    /// Rows in `table`, deleted or not, as seen outside any unit of work.
    pub async fn row_count(&self, table: &str) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(self.pool.pool())
            .await?;
        Ok(count)
    }

    /// Commit an accreditation and return it.
    pub async fn seed_accreditation(&self) -> anyhow::Result<Accreditation> {
        let accreditation = AccreditationBuilder::new().build();
        let uow = self.unit_of_work();
        uow.accreditations()?.add(&accreditation).await?;
        uow.save_changes().await?;
        uow.dispose().await?;
        Ok(accreditation)
    }

    /// Commit a facility owner account plus its facility row.
    pub async fn seed_facility(&self) -> anyhow::Result<Facility> {
        let accreditation = self.seed_accreditation().await?;
        let owner = UserBuilder::new()
            .with_role(system_roles::FACILITY)
            .build();
        let facility = Facility::new(
            owner.id.clone(),
            "Test Facility",
            accreditation.id.clone(),
            HOSPITAL_FACILITY_TYPE,
            CompanySize::Medium,
        );

        let uow = self.unit_of_work();
        uow.repository::<User>()?.add(&owner).await?;
        uow.repository::<Facility>()?.add(&facility).await?;
        uow.save_changes().await?;
        uow.dispose().await?;
        Ok(facility)
    }
}
