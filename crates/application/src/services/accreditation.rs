//! Accreditation Service

use super::{begin, finish, search_filter, ServiceConfig};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::AccreditationDto;
use crate::mapping::MapFrom;
use crate::validation::{CreateAccreditationRequest, ListAccreditationsRequest, Validatable};
use crate::ApplicationResult;
use accredigo_common::{PaginatedResult, SortParams};
use accredigo_domain::{new_id, Accreditation};
use accredigo_infrastructure::{DatabasePool, ListQuery, Repository};
use tracing::{info, instrument};

const SEARCHABLE_COLUMNS: &[&str] = &["name", "arabic_name", "description"];

pub struct AccreditationService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl AccreditationService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    #[instrument(skip(self, ctx, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateAccreditationRequest,
    ) -> ApplicationResult<AccreditationDto> {
        request.validate_all().ensure_valid()?;
        self.audit.populate(ctx, &mut request);

        let mut accreditation = Accreditation::new(new_id(), request.name.trim());
        accreditation.arabic_name = request.arabic_name.clone();
        accreditation.description = request.description.clone();
        accreditation.arabic_description = request.arabic_description.clone();
        request.audit.apply_to(&mut accreditation.audit);

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<AccreditationDto> = async {
            uow.accreditations()?.add(&accreditation).await?;
            uow.save_changes().await?;
            info!(accreditation_id = %accreditation.id, "Accreditation created");
            Ok(AccreditationDto::map_from(&accreditation))
        }
        .await;
        finish(uow, result).await
    }

    /// Page of accreditations ordered by name
    #[instrument(skip(self, ctx, request))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        request: ListAccreditationsRequest,
    ) -> ApplicationResult<PaginatedResult<AccreditationDto>> {
        request.validate_all().ensure_valid()?;

        let mut query = ListQuery::new().sort(SortParams::asc("name"));
        if let Some(search) = search_filter(SEARCHABLE_COLUMNS, request.free_text.as_deref()) {
            query = query.filter(search);
        }
        let params = self.config.paging(request.page_number, request.page_size);

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<PaginatedResult<AccreditationDto>> = async {
            let page = uow.accreditations()?.get_paged(params, query).await?;
            Ok(page.map(|accreditation| AccreditationDto::map_from(&accreditation)))
        }
        .await;
        finish(uow, result).await
    }
}
