//! Facility Service
//!
//! A facility is registered together with its owner account; the facility
//! row is keyed by that account's id.

use super::{
    begin, ensure_email_available, finish, hash_password, new_account, require, require_exists,
    ServiceConfig,
};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::FacilityDto;
use crate::mapping::MapFrom;
use crate::validation::{CreateFacilityRequest, Validatable, ValidationRules};
use crate::ApplicationResult;
use accredigo_domain::identifiers::system_roles;
use accredigo_domain::{Facility, FacilityType};
use accredigo_infrastructure::{DatabasePool, Repository, UnitOfWork};
use tracing::{info, instrument};

pub struct FacilityService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl FacilityService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    /// Create the owner account and the facility in one commit
    #[instrument(skip(self, ctx, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateFacilityRequest,
    ) -> ApplicationResult<FacilityDto> {
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
        request: &CreateFacilityRequest,
        password_hash: String,
    ) -> ApplicationResult<FacilityDto> {
        require_exists(&*uow.accreditations()?, &request.accreditation_id).await?;
        require_exists(&*uow.repository::<FacilityType>()?, &request.facility_type_id).await?;

        let mut owner = new_account(
            &request.name,
            request.arabic_name.as_deref(),
            &request.email,
            request.phone.as_deref(),
            password_hash,
            system_roles::FACILITY,
        );
        request.audit.apply_to(&mut owner.audit);
        ensure_email_available(uow, &owner.email, None).await?;

        let mut facility = Facility::new(
            owner.id.clone(),
            request.name.trim(),
            request.accreditation_id.clone(),
            request.facility_type_id,
            request.company_size,
        );
        facility.arabic_name = request.arabic_name.clone();
        facility.location = request.location.clone();
        facility.arabic_location = request.arabic_location.clone();
        facility.email = Some(owner.email.clone());
        facility.phone = request.phone.clone();
        facility.tel = request.tel.clone();
        request.audit.apply_to(&mut facility.audit);

        uow.users()?.add(&owner).await?;
        uow.repository::<Facility>()?.add(&facility).await?;
        uow.save_changes().await?;

        info!(facility_id = %facility.user_id, "Facility created");
        Ok(FacilityDto::map_from(&facility))
    }

    /// Get a facility by its owner's id
    #[instrument(skip(self, ctx))]
    pub async fn get(&self, ctx: &RequestContext, user_id: &str) -> ApplicationResult<FacilityDto> {
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<FacilityDto> = async {
            let facility = require(&*uow.repository::<Facility>()?, &user_id.to_string()).await?;
            Ok(FacilityDto::map_from(&facility))
        }
        .await;
        finish(uow, result).await
    }
}
