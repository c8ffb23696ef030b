//! Bootcamp entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bootcamp row. The location is flattened into columns; `careers` is a
/// JSON array of career labels.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bootcamps")]
pub struct Model {
    /// UUID in hyphenated lowercase form
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub name: String,

    pub slug: String,

    pub description: String,

    pub website: Option<String>,

    pub phone: Option<String>,

    pub email: Option<String>,

    pub longitude: Option<f64>,

    pub latitude: Option<f64>,

    pub formatted_address: Option<String>,

    pub street: Option<String>,

    pub city: Option<String>,

    pub state: Option<String>,

    pub zipcode: Option<String>,

    pub country: Option<String>,

    /// e.g. `["Web Development","UI/UX"]`
    pub careers: String,

    pub average_rating: Option<f64>,

    pub average_cost: Option<f64>,

    pub photo: String,

    pub housing: bool,

    pub job_assistance: bool,

    pub job_guarantee: bool,

    pub accept_gi: bool,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
