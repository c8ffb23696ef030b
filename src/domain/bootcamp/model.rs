//! Bootcamp domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::geo::GeoPoint;

/// Photo assigned to bootcamps created without one
pub const DEFAULT_PHOTO: &str = "no-photo.jpg";

/// Career track offered by a bootcamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Career {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile Development")]
    MobileDevelopment,
    #[serde(rename = "UI/UX")]
    UiUx,
    #[serde(rename = "Data Science")]
    DataScience,
    Business,
    Other,
}

impl Career {
    pub const ALL: [Career; 6] = [
        Career::WebDevelopment,
        Career::MobileDevelopment,
        Career::UiUx,
        Career::DataScience,
        Career::Business,
        Career::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebDevelopment => "Web Development",
            Self::MobileDevelopment => "Mobile Development",
            Self::UiUx => "UI/UX",
            Self::DataScience => "Data Science",
            Self::Business => "Business",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Career {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Career {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Career::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::cast("careers", s))
    }
}

/// Resolved geographic location of a bootcamp
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Location {
    pub point: Option<GeoPoint>,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl Location {
    pub fn at(point: GeoPoint) -> Self {
        Self {
            point: Some(point),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bootcamp {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub location: Location,
    pub careers: Vec<Career>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: String,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a bootcamp. `address` is geocoded into a [`Location`]
/// and not stored.
#[derive(Debug, Clone, Default)]
pub struct NewBootcamp {
    pub name: String,
    pub description: String,
    pub address: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub careers: Vec<Career>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: Option<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct BootcampChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub careers: Option<Vec<Career>>,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub photo: Option<String>,
    pub housing: Option<bool>,
    pub job_assistance: Option<bool>,
    pub job_guarantee: Option<bool>,
    pub accept_gi: Option<bool>,
}

impl Bootcamp {
    /// Materialize a new record from validated input and its geocoded location
    pub fn create(input: NewBootcamp, location: Location) -> Self {
        let name = input.name.trim().to_string();
        Self {
            id: Uuid::new_v4(),
            slug: slugify(&name),
            name,
            description: input.description,
            website: input.website,
            phone: input.phone,
            email: input.email,
            location,
            careers: input.careers,
            average_rating: input.average_rating,
            average_cost: input.average_cost,
            photo: input.photo.unwrap_or_else(|| DEFAULT_PHOTO.to_string()),
            housing: input.housing,
            job_assistance: input.job_assistance,
            job_guarantee: input.job_guarantee,
            accept_gi: input.accept_gi,
            created_at: Utc::now(),
        }
    }

    /// Apply a partial update in place. A rename recomputes the slug; a new
    /// location (from a re-geocoded address) replaces the old one.
    pub fn apply(&mut self, changes: BootcampChanges, location: Option<Location>) {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
            self.slug = slugify(&self.name);
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if changes.website.is_some() {
            self.website = changes.website;
        }
        if changes.phone.is_some() {
            self.phone = changes.phone;
        }
        if changes.email.is_some() {
            self.email = changes.email;
        }
        if let Some(careers) = changes.careers {
            self.careers = careers;
        }
        if changes.average_rating.is_some() {
            self.average_rating = changes.average_rating;
        }
        if changes.average_cost.is_some() {
            self.average_cost = changes.average_cost;
        }
        if let Some(photo) = changes.photo {
            self.photo = photo;
        }
        if let Some(v) = changes.housing {
            self.housing = v;
        }
        if let Some(v) = changes.job_assistance {
            self.job_assistance = v;
        }
        if let Some(v) = changes.job_guarantee {
            self.job_guarantee = v;
        }
        if let Some(v) = changes.accept_gi {
            self.accept_gi = v;
        }
    }
}

/// URL-friendly form of a name: lowercase ASCII alphanumerics joined by `-`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Parse a path identifier; malformed ids are a cast failure, not a miss
pub fn parse_bootcamp_id(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::cast("bootcamp id", raw))
}

// ── Tests ──────────────────────────────────────────────────────
