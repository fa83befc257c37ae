//! Data Transfer Objects (DTOs) and response envelopes
//!
//! DTOs provide a stable contract separate from the entities. Every DTO is
//! built through [`crate::mapping::MapFrom`], never by hand in a service.

mod accreditation;
mod billing;
mod facility;
mod user;

pub use accreditation::*;
pub use billing::*;
pub use facility::*;
pub use user::*;

use accredigo_common::PaginatedResult;
use serde::{Deserialize, Serialize};

use crate::ApplicationError;

/// Outcome category carried by every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseState {
    Success,
    Error,
    NotFound,
    Unauthorized,
    Forbidden,
    BadRequest,
    ValidationError,
}

impl From<&ApplicationError> for ResponseState {
    fn from(err: &ApplicationError) -> Self {
        match err {
            ApplicationError::NotFound(_) => ResponseState::NotFound,
            ApplicationError::Unauthorized(_) => ResponseState::Unauthorized,
            ApplicationError::Forbidden(_) => ResponseState::Forbidden,
            ApplicationError::InvalidInput(_) => ResponseState::BadRequest,
            ApplicationError::ValidationFailed(_) => ResponseState::ValidationError,
            _ => ResponseState::Error,
        }
    }
}

/// Standard response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Payload, absent on failure
    pub data: Option<T>,
    pub state: ResponseState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error detail only exposed by debug builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            state: ResponseState::Success,
            message: None,
            developer_message: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    pub fn failure(state: ResponseState, message: impl Into<String>) -> Self {
        Self {
            data: None,
            state,
            message: Some(message.into()),
            developer_message: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure(ResponseState::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::failure(ResponseState::BadRequest, message)
    }

    /// Envelope for a failed service call.
    pub fn from_error(err: &ApplicationError) -> Self {
        let mut response = Self::failure(ResponseState::from(err), public_message(err));
        if cfg!(debug_assertions) {
            response.developer_message = Some(err.to_string());
        }
        response
    }

    /// Wrap a service result.
    pub fn from_result(result: Result<T, ApplicationError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == ResponseState::Success
    }
}

/// List envelope with paging metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Option<Vec<T>>,
    pub state: ResponseState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub total_count: u64,
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn success(page: PaginatedResult<T>) -> Self {
        Self {
            total_count: page.total,
            page_number: page.page,
            page_size: page.per_page,
            total_pages: page.total_pages,
            has_previous_page: page.has_prev,
            has_next_page: page.has_next,
            data: Some(page.items),
            state: ResponseState::Success,
            message: None,
        }
    }

    pub fn from_error(err: &ApplicationError) -> Self {
        Self {
            data: None,
            state: ResponseState::from(err),
            message: Some(public_message(err)),
            total_count: 0,
            page_number: 0,
            page_size: 0,
            total_pages: 0,
            has_previous_page: false,
            has_next_page: false,
        }
    }

    pub fn from_result(result: Result<PaginatedResult<T>, ApplicationError>) -> Self {
        match result {
            Ok(page) => Self::success(page),
            Err(err) => Self::from_error(&err),
        }
    }
}

fn public_message(err: &ApplicationError) -> String {
    match err {
        ApplicationError::Internal(_) => "An unexpected error occurred".to_string(),
        other => other.to_string(),
    }
}
