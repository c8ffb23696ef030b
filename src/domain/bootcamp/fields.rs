//! Queryable bootcamp fields
//!
//! Filter paths and sort keys arrive as the JSON names clients see
//! (`averageCost`, `location.city`). They are resolved here to a closed set
//! of fields, and raw query-string values are cast to the field's type.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::model::{Bootcamp, Career};
use crate::domain::error::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootcampField {
    Id,
    Name,
    Slug,
    Description,
    Website,
    Phone,
    Email,
    Careers,
    AverageRating,
    AverageCost,
    Photo,
    Housing,
    JobAssistance,
    JobGuarantee,
    AcceptGi,
    CreatedAt,
    City,
    State,
    Zipcode,
    Country,
}

/// Storage type of a field, used for casting filter values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Id,
    Text,
    Number,
    Bool,
    Timestamp,
    Careers,
}

/// A typed value taken from a record or cast from a query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Id(Uuid),
    Text(String),
    Number(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    /// Ordering between values of the same kind; `None` across kinds
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Id(a), Self::Id(b)) => Some(a.cmp(b)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b),
            (Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
            (Self::Timestamp(a), Self::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl BootcampField {
    /// Resolve a client-facing field path
    pub fn from_path(path: &str) -> Option<Self> {
        let field = match path {
            "id" | "_id" => Self::Id,
            "name" => Self::Name,
            "slug" => Self::Slug,
            "description" => Self::Description,
            "website" => Self::Website,
            "phone" => Self::Phone,
            "email" => Self::Email,
            "careers" => Self::Careers,
            "averageRating" => Self::AverageRating,
            "averageCost" => Self::AverageCost,
            "photo" => Self::Photo,
            "housing" => Self::Housing,
            "jobAssistance" => Self::JobAssistance,
            "jobGuarantee" => Self::JobGuarantee,
            "acceptGi" => Self::AcceptGi,
            "createdAt" => Self::CreatedAt,
            "location.city" => Self::City,
            "location.state" => Self::State,
            "location.zipcode" => Self::Zipcode,
            "location.country" => Self::Country,
            _ => return None,
        };
        Some(field)
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Slug => "slug",
            Self::Description => "description",
            Self::Website => "website",
            Self::Phone => "phone",
            Self::Email => "email",
            Self::Careers => "careers",
            Self::AverageRating => "averageRating",
            Self::AverageCost => "averageCost",
            Self::Photo => "photo",
            Self::Housing => "housing",
            Self::JobAssistance => "jobAssistance",
            Self::JobGuarantee => "jobGuarantee",
            Self::AcceptGi => "acceptGi",
            Self::CreatedAt => "createdAt",
            Self::City => "location.city",
            Self::State => "location.state",
            Self::Zipcode => "location.zipcode",
            Self::Country => "location.country",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Id => FieldKind::Id,
            Self::Careers => FieldKind::Careers,
            Self::AverageRating | Self::AverageCost => FieldKind::Number,
            Self::Housing | Self::JobAssistance | Self::JobGuarantee | Self::AcceptGi => {
                FieldKind::Bool
            }
            Self::CreatedAt => FieldKind::Timestamp,
            _ => FieldKind::Text,
        }
    }

    /// Multi-valued fields have no meaningful order
    pub fn is_sortable(&self) -> bool {
        self.kind() != FieldKind::Careers
    }

    /// Cast a raw query-string value to this field's type
    pub fn cast(&self, raw: &str) -> DomainResult<FieldValue> {
        let fail = || DomainError::cast(self.path(), raw);
        match self.kind() {
            FieldKind::Id => Uuid::parse_str(raw.trim())
                .map(FieldValue::Id)
                .map_err(|_| fail()),
            FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldKind::Careers => raw
                .parse::<Career>()
                .map(|c| FieldValue::Text(c.as_str().to_string()))
                .map_err(|_| fail()),
            FieldKind::Number => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(FieldValue::Number)
                .ok_or_else(fail),
            FieldKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(fail()),
            },
            FieldKind::Timestamp => parse_timestamp(raw)
                .map(FieldValue::Timestamp)
                .ok_or_else(fail),
        }
    }
}

/// RFC 3339 timestamps, or bare `YYYY-MM-DD` dates at midnight UTC
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

impl Bootcamp {
    /// All values a record holds for `field`. Empty when unset; several for
    /// `careers`.
    pub fn values(&self, field: BootcampField) -> Vec<FieldValue> {
        let text = |v: &Option<String>| -> Vec<FieldValue> {
            v.iter().map(|s| FieldValue::Text(s.clone())).collect()
        };
        match field {
            BootcampField::Id => vec![FieldValue::Id(self.id)],
            BootcampField::Name => vec![FieldValue::Text(self.name.clone())],
            BootcampField::Slug => vec![FieldValue::Text(self.slug.clone())],
            BootcampField::Description => vec![FieldValue::Text(self.description.clone())],
            BootcampField::Website => text(&self.website),
            BootcampField::Phone => text(&self.phone),
            BootcampField::Email => text(&self.email),
            BootcampField::Careers => self
                .careers
                .iter()
                .map(|c| FieldValue::Text(c.as_str().to_string()))
                .collect(),
            BootcampField::AverageRating => self.average_rating.map(FieldValue::Number).into_iter().collect(),
            BootcampField::AverageCost => self.average_cost.map(FieldValue::Number).into_iter().collect(),
            BootcampField::Photo => vec![FieldValue::Text(self.photo.clone())],
            BootcampField::Housing => vec![FieldValue::Bool(self.housing)],
            BootcampField::JobAssistance => vec![FieldValue::Bool(self.job_assistance)],
            BootcampField::JobGuarantee => vec![FieldValue::Bool(self.job_guarantee)],
            BootcampField::AcceptGi => vec![FieldValue::Bool(self.accept_gi)],
            BootcampField::CreatedAt => vec![FieldValue::Timestamp(self.created_at)],
            BootcampField::City => text(&self.location.city),
            BootcampField::State => text(&self.location.state),
            BootcampField::Zipcode => text(&self.location.zipcode),
            BootcampField::Country => text(&self.location.country),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_json_paths() {
        assert_eq!(BootcampField::from_path("averageCost"), Some(BootcampField::AverageCost));
        assert_eq!(BootcampField::from_path("location.city"), Some(BootcampField::City));
        assert_eq!(BootcampField::from_path("average_cost"), None);
        for f in [BootcampField::Zipcode, BootcampField::AcceptGi, BootcampField::Id] {
            assert_eq!(BootcampField::from_path(f.path()), Some(f));
        }
    }

    #[test]
    fn casts_by_kind() {
        assert_eq!(
            BootcampField::AverageCost.cast("10000").unwrap(),
            FieldValue::Number(10_000.0)
        );
        assert_eq!(BootcampField::Housing.cast("TRUE").unwrap(), FieldValue::Bool(true));
        assert_eq!(
            BootcampField::Careers.cast("business").unwrap(),
            FieldValue::Text("Business".into())
        );
        assert!(matches!(
            BootcampField::CreatedAt.cast("2024-03-01").unwrap(),
            FieldValue::Timestamp(_)
        ));
    }

    #[test]
    fn uncastable_values_fail() {
        assert!(BootcampField::AverageCost.cast("cheap").is_err());
        assert!(BootcampField::AverageCost.cast("NaN").is_err());
        assert!(BootcampField::Housing.cast("maybe").is_err());
        assert!(BootcampField::Careers.cast("Juggling").is_err());
        assert!(BootcampField::Id.cast("42").is_err());
    }

    #[test]
    fn numbers_compare_numerically() {
        let a = FieldValue::Number(9.0);
        let b = FieldValue::Number(10.0);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(a.compare(&FieldValue::Text("9".into())), None);
    }
}
