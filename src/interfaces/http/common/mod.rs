//! Shared HTTP building blocks: envelopes, errors, extractors

pub mod error;
pub mod list_query;
pub mod response;
pub mod validated_json;

pub use error::ApiError;
pub use list_query::{parse_list_query, ListParams};
pub use response::{ApiResponse, CollectionResponse, EmptyData, ListResponse, PageLinkDto, PaginationDto};
pub use validated_json::ValidatedJson;
