//! User Service
//!
//! Account management: create, look up, list, update and soft-delete users,
//! and check sign-in credentials.

use super::{
    begin, ensure_email_available, finish, hash_password, new_account, normalize_email, require,
    resolve_sort, search_filter, ServiceConfig,
};
use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::dto::UserDto;
use crate::mapping::MapFrom;
use crate::validation::{
    CreateUserRequest, ListUsersRequest, UpdateUserRequest, Validatable, ValidationRules,
};
use crate::{ApplicationError, ApplicationResult};
use accredigo_common::{PaginatedResult, SortParams};
use accredigo_domain::User;
use accredigo_infrastructure::{DatabasePool, Filter, ListQuery, Repository, UnitOfWork};
use tracing::{debug, info, instrument, warn};

/// Columns a user listing may be sorted by.
const SORTABLE_COLUMNS: &[&str] = &[
    "id",
    "name",
    "email",
    "system_role_id",
    "phone_number",
    "arabic_name",
    "created_at",
    "updated_at",
];

/// Columns searched by free text.
const SEARCHABLE_COLUMNS: &[&str] = &["name", "email", "phone_number", "arabic_name"];

/// User service implementation
pub struct UserService {
    pool: DatabasePool,
    config: ServiceConfig,
    audit: AuditService,
}

impl UserService {
    pub fn new(pool: DatabasePool, config: ServiceConfig) -> Self {
        Self {
            pool,
            config,
            audit: AuditService::new(),
        }
    }

    /// Register a new user with a hashed password and a fresh GUID key
    #[instrument(skip(self, ctx, request), fields(email = %request.email))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut request: CreateUserRequest,
    ) -> ApplicationResult<UserDto> {
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
        request: &CreateUserRequest,
        password_hash: String,
    ) -> ApplicationResult<UserDto> {
        let mut user = new_account(
            &request.name,
            request.arabic_name.as_deref(),
            &request.email,
            request.phone_number.as_deref(),
            password_hash,
            request.system_role_id,
        );
        request.audit.apply_to(&mut user.audit);

        ensure_email_available(uow, &user.email, None).await?;
        uow.users()?.add(&user).await?;
        uow.save_changes().await?;

        info!(user_id = %user.id, created_by = %request.audit.created_by, "User created");
        Ok(UserDto::map_from(&user))
    }

    /// Get a live user by id
    #[instrument(skip(self, ctx))]
    pub async fn get_by_id(&self, ctx: &RequestContext, id: &str) -> ApplicationResult<UserDto> {
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<UserDto> = async {
            let user = require(&*uow.users()?, &id.to_string()).await?;
            Ok(UserDto::map_from(&user))
        }
        .await;
        finish(uow, result).await
    }

    /// Filtered, sorted page of users; defaults to newest first
    #[instrument(skip(self, ctx, request))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        request: ListUsersRequest,
    ) -> ApplicationResult<PaginatedResult<UserDto>> {
        request.validate_all().ensure_valid()?;

        let mut filter = Filter::and(Vec::new());
        if let Some(role_id) = request.role_id {
            filter = filter.and_also(Filter::eq("system_role_id", role_id));
        }
        if let Some(search) = search_filter(SEARCHABLE_COLUMNS, request.free_text.as_deref()) {
            filter = filter.and_also(search);
        }
        let sort = resolve_sort(
            SORTABLE_COLUMNS,
            request.sort_by.as_deref(),
            request.sort_direction.as_deref(),
            SortParams::desc("created_at"),
        );
        let params = self.config.paging(request.page_number, request.page_size);
        debug!(page = params.page, per_page = params.per_page, sort = %sort.field, "Listing users");

        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<PaginatedResult<UserDto>> = async {
            let page = uow
                .users()?
                .get_paged(params, ListQuery::new().filter(filter).sort(sort))
                .await?;
            Ok(page.map(|user| UserDto::map_from(&user)))
        }
        .await;
        finish(uow, result).await
    }

    /// Load, modify and save a user. A blank password keeps the stored hash.
    #[instrument(skip(self, ctx, request), fields(user_id = %request.id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        request: UpdateUserRequest,
    ) -> ApplicationResult<UserDto> {
        let mut validation = request.validate_all();
        let new_password = request.password.as_deref().filter(|p| !p.trim().is_empty());
        if let Some(password) = new_password {
            validation.merge(ValidationRules::validate_password(
                password,
                self.config.min_password_length,
            ));
        }
        validation.ensure_valid()?;

        let password_hash = match new_password {
            Some(password) => Some(hash_password(password.to_string()).await?),
            None => None,
        };

        let uow = begin(&self.pool, ctx);
        let result = Self::update_in(&uow, &request, password_hash).await;
        finish(uow, result).await
    }

    async fn update_in(
        uow: &UnitOfWork,
        request: &UpdateUserRequest,
        password_hash: Option<String>,
    ) -> ApplicationResult<UserDto> {
        let users = uow.users()?;
        let mut user = require(&users, &request.id).await?;

        let email = normalize_email(&request.email);
        if email != user.email {
            ensure_email_available(uow, &email, Some(&user.id)).await?;
        }

        user.name = request.name.trim().to_string();
        user.arabic_name = request.arabic_name.clone();
        user.email = email;
        user.system_role_id = request.system_role_id;
        user.phone_number = request.phone_number.clone();
        if let Some(hash) = password_hash {
            user.password = hash;
        }

        users.update(&mut user).await?;
        uow.save_changes().await?;

        info!(user_id = %user.id, "User updated");
        Ok(UserDto::map_from(&user))
    }

    /// Check an e-mail and password pair against the live accounts.
    ///
    /// Unknown, deleted and wrong-password accounts all fail with the same
    /// `Unauthorized` message.
    #[instrument(skip(self, ctx, password))]
    pub async fn authenticate(
        &self,
        ctx: &RequestContext,
        email: &str,
        password: &str,
    ) -> ApplicationResult<UserDto> {
        let email = normalize_email(email);
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<Option<User>> = async {
            let mut matches = uow.users()?.find(Filter::eq("email", email.as_str())).await?;
            Ok(matches.pop())
        }
        .await;
        let user = finish(uow, result).await?.ok_or_else(invalid_credentials)?;

        let stored_hash = user.password.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || {
            accredigo_common::verify_password(&password, &stored_hash)
        })
        .await
        .map_err(|e| ApplicationError::Internal(format!("Password check task failed: {e}")))?;

        match verified {
            Ok(true) => {
                info!(user_id = %user.id, "User authenticated");
                Ok(UserDto::map_from(&user))
            }
            Ok(false) => Err(invalid_credentials()),
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                Err(invalid_credentials())
            }
        }
    }

    /// Soft-delete a user
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, ctx: &RequestContext, id: &str) -> ApplicationResult<()> {
        let uow = begin(&self.pool, ctx);
        let result: ApplicationResult<()> = async {
            uow.users()?.soft_delete(&id.to_string()).await?;
            uow.save_changes().await?;
            info!(user_id = id, "User deleted");
            Ok(())
        }
        .await;
        finish(uow, result).await
    }
}

fn invalid_credentials() -> ApplicationError {
    ApplicationError::Unauthorized("Invalid email or password".to_string())
}
