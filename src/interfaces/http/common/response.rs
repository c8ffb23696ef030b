//! Response envelopes

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::query::{PageLink, Pagination};

/// Standard API envelope.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "error": "message"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Empty payload for operations without return data
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EmptyData {}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct PageLinkDto {
    pub page: u64,
    pub limit: u64,
}

impl From<PageLink> for PageLinkDto {
    fn from(link: PageLink) -> Self {
        Self {
            page: link.page,
            limit: link.limit,
        }
    }
}

/// `next` / `prev` links; either may be missing
#[derive(Debug, Clone, Copy, Default, Serialize, ToSchema)]
pub struct PaginationDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLinkDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLinkDto>,
}

impl From<Pagination> for PaginationDto {
    fn from(p: Pagination) -> Self {
        Self {
            next: p.next.map(Into::into),
            prev: p.prev.map(Into::into),
        }
    }
}

/// List envelope: `count` is the number of records in `data`
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub success: bool,
    pub count: usize,
    pub pagination: PaginationDto,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination) -> Self {
        Self {
            success: true,
            count: data.len(),
            pagination: pagination.into(),
            data,
        }
    }
}

/// Unpaginated collection envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct CollectionResponse<T> {
    pub success: bool,
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}
