//! Bootcamp request and response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::bootcamp::{Bootcamp, BootcampChanges, Career, Location, NewBootcamp};

/// GeoJSON point plus the geocoder's address breakdown
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    /// Always `Point`
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`
    #[schema(value_type = Vec<f64>)]
    pub coordinates: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl LocationDto {
    fn from_location(location: Location) -> Option<Self> {
        let point = location.point?;
        Some(Self {
            kind: "Point".to_string(),
            coordinates: point.coordinates(),
            formatted_address: location.formatted_address,
            street: location.street,
            city: location.city,
            state: location.state,
            zipcode: location.zipcode,
            country: location.country,
        })
    }
}

/// Bootcamp as returned by the API
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BootcampDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationDto>,
    /// Career labels, e.g. `Web Development`, `UI/UX`
    #[schema(value_type = Vec<String>)]
    pub careers: Vec<Career>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Bootcamp> for BootcampDto {
    fn from(b: Bootcamp) -> Self {
        Self {
            id: b.id,
            name: b.name,
            slug: b.slug,
            description: b.description,
            website: b.website,
            phone: b.phone,
            email: b.email,
            location: LocationDto::from_location(b.location),
            careers: b.careers,
            average_rating: b.average_rating,
            average_cost: b.average_cost,
            photo: b.photo,
            housing: b.housing,
            job_assistance: b.job_assistance,
            job_guarantee: b.job_guarantee,
            accept_gi: b.accept_gi,
            created_at: b.created_at,
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(value).map_err(|_| ValidationError::new("url"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ValidationError::new("url")),
    }
}

/// Create a bootcamp. `address` is geocoded into `location`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBootcampRequest {
    #[validate(
        required(message = "Please add a name"),
        custom(function = "validate_not_blank", message = "Please add a name"),
        length(max = 50, message = "Name can not be more than 50 characters")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "Please add a description"),
        custom(function = "validate_not_blank", message = "Please add a description"),
        length(max = 500, message = "Description can not be more than 500 characters")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Please add an address"),
        custom(function = "validate_not_blank", message = "Please add an address")
    )]
    pub address: Option<String>,

    #[validate(custom(
        function = "validate_http_url",
        message = "Please use a valid URL with HTTP or HTTPS"
    ))]
    pub website: Option<String>,

    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,

    #[validate(
        required(message = "Please add at least one career"),
        length(min = 1, message = "Please add at least one career")
    )]
    #[schema(value_type = Vec<String>)]
    pub careers: Option<Vec<Career>>,

    #[validate(range(min = 1.0, max = 10.0, message = "Rating must be between 1 and 10"))]
    pub average_rating: Option<f64>,

    #[validate(range(min = 0.0, message = "Cost can not be negative"))]
    pub average_cost: Option<f64>,

    pub photo: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl CreateBootcampRequest {
    /// Call after validation; required fields are present by then
    pub fn into_domain(self) -> NewBootcamp {
        NewBootcamp {
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            website: self.website,
            phone: self.phone,
            email: self.email,
            careers: self.careers.unwrap_or_default(),
            average_rating: self.average_rating,
            average_cost: self.average_cost,
            photo: self.photo,
            housing: self.housing.unwrap_or(false),
            job_assistance: self.job_assistance.unwrap_or(false),
            job_guarantee: self.job_guarantee.unwrap_or(false),
            accept_gi: self.accept_gi.unwrap_or(false),
        }
    }
}

/// Partial update; only the given fields change
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBootcampRequest {
    #[validate(
        custom(function = "validate_not_blank", message = "Please add a name"),
        length(max = 50, message = "Name can not be more than 50 characters")
    )]
    pub name: Option<String>,

    #[validate(
        custom(function = "validate_not_blank", message = "Please add a description"),
        length(max = 500, message = "Description can not be more than 500 characters")
    )]
    pub description: Option<String>,

    /// Re-geocoded into `location` when present
    #[validate(custom(function = "validate_not_blank", message = "Please add an address"))]
    pub address: Option<String>,

    #[validate(custom(
        function = "validate_http_url",
        message = "Please use a valid URL with HTTP or HTTPS"
    ))]
    pub website: Option<String>,

    #[validate(length(max = 20, message = "Phone number can not be longer than 20 characters"))]
    pub phone: Option<String>,

    #[validate(email(message = "Please add a valid email"))]
    pub email: Option<String>,

    #[validate(length(min = 1, message = "Please add at least one career"))]
    #[schema(value_type = Option<Vec<String>>)]
    pub careers: Option<Vec<Career>>,

    #[validate(range(min = 1.0, max = 10.0, message = "Rating must be between 1 and 10"))]
    pub average_rating: Option<f64>,

    #[validate(range(min = 0.0, message = "Cost can not be negative"))]
    pub average_cost: Option<f64>,

    pub photo: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl From<UpdateBootcampRequest> for BootcampChanges {
    fn from(r: UpdateBootcampRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            address: r.address,
            website: r.website,
            phone: r.phone,
            email: r.email,
            careers: r.careers,
            average_rating: r.average_rating,
            average_cost: r.average_cost,
            photo: r.photo,
            housing: r.housing,
            job_assistance: r.job_assistance,
            job_guarantee: r.job_guarantee,
            accept_gi: r.accept_gi,
        }
    }
}

/// Optional query for the radius endpoint
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RadiusParams {
    /// `mi` (default) or `km`
    pub unit: Option<String>,
}
