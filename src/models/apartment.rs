use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::apartments;

/// Full apartment row from the database.
///
/// Serialized as-is into the `rows` array of `GET /apartments`; the browse
/// page filters these fields client-side and never fetches them again until
/// the next page load.
#[derive(Debug, Queryable, Selectable, Serialize)]
#[diesel(table_name = apartments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Apartment {
    pub id: i32,
    pub name: String,
    pub price: Option<f64>,
    pub square_footage: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub distance1: Option<f64>,
    pub distance2: Option<f64>,
    pub url: Option<String>,
}

/// Insertable struct for creating a new listing. The id is assigned by the
/// database.
#[derive(Debug, Insertable)]
#[diesel(table_name = apartments)]
pub struct NewApartment<'a> {
    pub name: &'a str,
    pub price: Option<f64>,
    pub square_footage: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub distance1: Option<f64>,
    pub distance2: Option<f64>,
    pub url: Option<&'a str>,
}
