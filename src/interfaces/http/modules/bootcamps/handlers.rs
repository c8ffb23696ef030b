//! Bootcamp REST API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::dto::{BootcampDto, CreateBootcampRequest, RadiusParams, UpdateBootcampRequest};
use crate::application::BootcampService;
use crate::domain::bootcamp::parse_bootcamp_id;
use crate::domain::query::Projection;
use crate::domain::{DistanceUnit, DomainError};
use crate::interfaces::http::common::{
    parse_list_query, ApiError, ApiResponse, CollectionResponse, EmptyData, ListResponse,
    ValidatedJson,
};

/// State shared by the bootcamp routes
#[derive(Clone)]
pub struct BootcampState {
    pub service: Arc<BootcampService>,
    /// Page size when the request has no usable `limit`
    pub default_limit: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps",
    tag = "Bootcamps",
    params(
        ("select" = Option<String>, Query, description = "Comma-separated fields to return"),
        ("sort" = Option<String>, Query, description = "Comma-separated sort keys, `-` for descending"),
        ("page" = Option<u64>, Query, description = "1-based page number"),
        ("limit" = Option<u64>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Page of bootcamps", body = ListResponse<BootcampDto>),
        (status = 400, description = "Malformed filter or sort")
    )
)]
pub async fn list_bootcamps(
    State(state): State<BootcampState>,
    RawQuery(raw): RawQuery,
) -> Result<Json<ListResponse<Value>>, ApiError> {
    let params = parse_list_query(raw.as_deref(), state.default_limit)?;
    let projection = Projection::new(params.options.select.as_deref());

    let page = state.service.list(&params.filter, params.options).await?;

    let data = page
        .items
        .into_iter()
        .map(|b| {
            serde_json::to_value(BootcampDto::from(b))
                .map(|v| projection.apply(v))
                .map_err(|e| DomainError::Storage(format!("serialize bootcamp: {}", e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ListResponse::new(data, page.pagination)))
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/{id}",
    tag = "Bootcamps",
    params(("id" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 200, description = "Bootcamp details", body = ApiResponse<BootcampDto>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_bootcamp(
    State(state): State<BootcampState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<BootcampDto>>, ApiError> {
    let id = parse_bootcamp_id(&id)?;
    let bootcamp = state.service.get(id).await?;
    Ok(Json(ApiResponse::success(bootcamp.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bootcamps",
    tag = "Bootcamps",
    request_body = CreateBootcampRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<BootcampDto>),
        (status = 400, description = "Invalid data, duplicate name or unknown address"),
        (status = 502, description = "Geocoder unavailable")
    )
)]
pub async fn create_bootcamp(
    State(state): State<BootcampState>,
    ValidatedJson(req): ValidatedJson<CreateBootcampRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BootcampDto>>), ApiError> {
    let bootcamp = state.service.create(req.into_domain()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(bootcamp.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/bootcamps/{id}",
    tag = "Bootcamps",
    params(("id" = String, Path, description = "Bootcamp ID")),
    request_body = UpdateBootcampRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<BootcampDto>),
        (status = 400, description = "Invalid data"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_bootcamp(
    State(state): State<BootcampState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBootcampRequest>,
) -> Result<Json<ApiResponse<BootcampDto>>, ApiError> {
    let id = parse_bootcamp_id(&id)?;
    let bootcamp = state.service.update(id, req.into()).await?;
    Ok(Json(ApiResponse::success(bootcamp.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/bootcamps/{id}",
    tag = "Bootcamps",
    params(("id" = String, Path, description = "Bootcamp ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_bootcamp(
    State(state): State<BootcampState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<ApiResponse<EmptyData>>), ApiError> {
    let id = parse_bootcamp_id(&id)?;
    state.service.delete(id).await?;
    Ok((StatusCode::NO_CONTENT, Json(ApiResponse::success(EmptyData {}))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bootcamps/radius/{zipcode}/{distance}",
    tag = "Bootcamps",
    params(
        ("zipcode" = String, Path, description = "Postal code of the search center"),
        ("distance" = f64, Path, description = "Search radius"),
        RadiusParams
    ),
    responses(
        (status = 200, description = "Bootcamps in range", body = CollectionResponse<BootcampDto>),
        (status = 400, description = "Bad distance or unknown postal code")
    )
)]
pub async fn bootcamps_in_radius(
    State(state): State<BootcampState>,
    Path((zipcode, distance)): Path<(String, String)>,
    Query(params): Query<RadiusParams>,
) -> Result<Json<CollectionResponse<BootcampDto>>, ApiError> {
    let distance: f64 = distance
        .trim()
        .parse()
        .map_err(|_| DomainError::cast("distance", distance.as_str()))?;
    let unit = match params.unit.as_deref() {
        Some(raw) => raw.parse::<DistanceUnit>()?,
        None => DistanceUnit::default(),
    };

    let bootcamps = state.service.within_radius(&zipcode, distance, unit).await?;
    let data = bootcamps.into_iter().map(BootcampDto::from).collect();
    Ok(Json(CollectionResponse::new(data)))
}
