//! Explore User Service
//!
//! Explore users get a time-limited trial of the platform.

use super::{begin, ensure_email_available, finish, hash_password, new_account, require, ServiceConfig};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::ExploreUserDto;
use crate::mapping::MapFrom;
use crate::validation::{CreateExploreUserRequest, Validatable, ValidationRules};
use crate::ApplicationResult;
use accredigo_domain::identifiers::system_roles;
use accredigo_domain::ExploreUserAccess;
use accredigo_infrastructure::{DatabasePool, Repository, UnitOfWork};
use tracing::{info, instrument};

pub struct ExploreUserService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl ExploreUserService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    /// Create the account and its trial window, starting now
    #[instrument(skip(self, ctx, request), fields(email = %request.email))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateExploreUserRequest,
    ) -> ApplicationResult<ExploreUserDto> {
        let mut validation = request.validate_all();
        validation.merge(ValidationRules::validate_password(
            &request.password,
            self.config.min_password_length,
        ));
        validation.ensure_valid()?;

        self.audit.populate(ctx, &mut request);
        let password_hash = hash_password(request.password.clone()).await?;
        let trial_days = request.trial_days.unwrap_or(self.config.explore_trial_days);

        let uow = begin(&self.pool, ctx);
        let result = Self::create_in(&uow, &request, password_hash, trial_days).await;
        finish(uow, result).await
    }

    async fn create_in(
        uow: &UnitOfWork,
        request: &CreateExploreUserRequest,
        password_hash: String,
        trial_days: i64,
    ) -> ApplicationResult<ExploreUserDto> {
        let mut user = new_account(
            &request.name,
            request.arabic_name.as_deref(),
            &request.email,
            request.phone.as_deref(),
            password_hash,
            system_roles::EXPLORE,
        );
        request.audit.apply_to(&mut user.audit);
        ensure_email_available(uow, &user.email, None).await?;

        let mut access = ExploreUserAccess::starting_now(user.id.clone(), trial_days);
        request.audit.apply_to(&mut access.audit);

        uow.users()?.add(&user).await?;
        uow.repository::<ExploreUserAccess>()?.add(&access).await?;
        uow.save_changes().await?;

        info!(user_id = %user.id, trial_end = %access.trial_end, "Explore user created");
        Ok(ExploreUserDto::map_from(&(user, access)))
    }

    /// Get an explore user with their trial window
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &RequestContext, user_id: &str) -> ApplicationResult<ExploreUserDto> {
        let key = user_id.to_string();
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<ExploreUserDto> = async {
            let user = require(&*uow.users()?, &key).await?;
            let access = require(&*uow.repository::<ExploreUserAccess>()?, &key).await?;
            Ok(ExploreUserDto::map_from(&(user, access)))
        }
        .await;
        finish(uow, result).await
    }
}
