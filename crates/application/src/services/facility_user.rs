//! Facility User Service
//!
//! Staff accounts attached to an existing facility.

use super::{
    begin, ensure_email_available, finish, hash_password, new_account, require, require_exists,
    ServiceConfig,
};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::FacilityUserDto;
use crate::mapping::MapFrom;
use crate::validation::{CreateFacilityUserRequest, Validatable, ValidationRules};
use crate::ApplicationResult;
use accredigo_domain::identifiers::system_roles;
use accredigo_domain::{Facility, FacilityRole, FacilityUser};
use accredigo_infrastructure::{DatabasePool, Repository, UnitOfWork};
use tracing::{info, instrument};

pub struct FacilityUserService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl FacilityUserService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    /// Create a staff account and its membership in one commit
    #[instrument(skip(self, ctx, request), fields(facility_id = %request.facility_id))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateFacilityUserRequest,
    ) -> ApplicationResult<FacilityUserDto> {
        let mut validation = request.validate_all();
        validation.merge(ValidationRules::validate_password(
            &request.password,
            self.config.min_password_length,
        ));
        validation.ensure_valid()?;

        self.audit.populate(ctx, &mut request);
        let password_hash = hash_password(request.password.clone()).await?;

        let uow = begin(&self.pool, ctx);
        let result = Self::create_in(&uow, &request, password_hash).await;
        finish(uow, result).await
    }

    async fn create_in(
        uow: &UnitOfWork,
        request: &CreateFacilityUserRequest,
        password_hash: String,
    ) -> ApplicationResult<FacilityUserDto> {
        require_exists(&*uow.repository::<Facility>()?, &request.facility_id).await?;
        require_exists(&*uow.repository::<FacilityRole>()?, &request.facility_role_id).await?;

        let mut user = new_account(
            &request.name,
            request.arabic_name.as_deref(),
            &request.email,
            request.phone.as_deref(),
            password_hash,
            system_roles::STAFF,
        );
        request.audit.apply_to(&mut user.audit);
        ensure_email_available(uow, &user.email, None).await?;

        let mut member = FacilityUser::new(user.id.clone(), request.facility_id.clone(), request.facility_role_id);
        request.audit.apply_to(&mut member.audit);

        uow.users()?.add(&user).await?;
        uow.repository::<FacilityUser>()?.add(&member).await?;
        uow.save_changes().await?;

        info!(user_id = %user.id, facility_id = %member.facility_id, "Facility user created");
        Ok(FacilityUserDto::map_from(&(user, member)))
    }

    /// Get a facility member by their account id
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &RequestContext, user_id: &str) -> ApplicationResult<FacilityUserDto> {
        let key = user_id.to_string();
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<FacilityUserDto> = async {
            let user = require(&*uow.users()?, &key).await?;
            let member = require(&*uow.repository::<FacilityUser>()?, &key).await?;
            Ok(FacilityUserDto::map_from(&(user, member)))
        }
        .await;
        finish(uow, result).await
    }
}
