//! Subscription Plan Service

use super::{begin, finish, require, ServiceConfig};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::SubscriptionPlanDto;
use crate::mapping::MapFrom;
use crate::validation::{CreateSubscriptionPlanRequest, UpdateSubscriptionPlanRequest, Validatable};
use crate::ApplicationResult;
use accredigo_common::{PaginatedResult, SortParams};
use accredigo_domain::{new_id, SubscriptionPlan};
use accredigo_infrastructure::{DatabasePool, ListQuery, Repository};
use tracing::{info, instrument};

pub struct SubscriptionPlanService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl SubscriptionPlanService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    #[instrument(skip(self, ctx, request), fields(plan_type = %request.plan_type))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateSubscriptionPlanRequest,
    ) -> ApplicationResult<SubscriptionPlanDto> {
        request.validate_all().ensure_valid()?;
        self.audit.populate(ctx, &mut request);

        let mut plan = SubscriptionPlan::new(new_id(), request.plan_type.trim(), request.pricing);
        request.audit.apply_to(&mut plan.audit);

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<SubscriptionPlanDto> = async {
            uow.subscription_plans()?.add(&plan).await?;
            uow.save_changes().await?;
            info!(plan_id = %plan.id, "Subscription plan created");
            Ok(SubscriptionPlanDto::map_from(&plan))
        }
        .await;
        finish(uow, result).await
    }

    /// Page of plans, cheapest first
    #[instrument(skip(self, ctx))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page_number: u32,
        page_size: u32,
    ) -> ApplicationResult<PaginatedResult<SubscriptionPlanDto>> {
        let params = self.config.paging(page_number, page_size);

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<PaginatedResult<SubscriptionPlanDto>> = async {
            let page = uow
                .subscription_plans()?
                .get_paged(params, ListQuery::new().sort(SortParams::asc("pricing")))
                .await?;
            Ok(page.map(|plan| SubscriptionPlanDto::map_from(&plan)))
        }
        .await;
        finish(uow, result).await
    }

    #[instrument(skip(self, ctx, request), fields(plan_id = %request.id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateSubscriptionPlanRequest,
    ) -> ApplicationResult<SubscriptionPlanDto> {
        request.validate_all().ensure_valid()?;

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<SubscriptionPlanDto> = async {
            let plans = uow.subscription_plans()?;
            let mut plan = require(&plans, &request.id).await?;
            plan.plan_type = request.plan_type.trim().to_string();
            plan.pricing = request.pricing;

            plans.update(&mut plan).await?;
            uow.save_changes().await?;
            info!(plan_id = %plan.id, "Subscription plan updated");
            Ok(SubscriptionPlanDto::map_from(&plan))
        }
        .await;
        finish(uow, result).await
    }
}
