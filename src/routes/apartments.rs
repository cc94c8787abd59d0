//! Listings endpoints: the session-gated CRUD surface over the apartments
//! table.
//!
//! Reads are open to everyone; the caller's dev flag only shapes the payload
//! so the browse page knows whether to show the secondary distance column.
//! Writes require a dev session and are gated by the [`DevUser`] extractor
//! before any work happens.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::auth::middleware::{CurrentUser, DevUser};
use crate::db::schema::apartments;
use crate::error::{ApiError, FieldError};
use crate::models::apartment::{Apartment, NewApartment};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/apartments", get(list_apartments).post(create_apartment))
        .route("/apartments/{id}", delete(delete_apartment))
}

// ---------------------------------------------------------------------------
// GET /apartments
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ApartmentsResponse {
    pub rows: Vec<Apartment>,
    #[serde(rename = "isDev")]
    pub is_dev: bool,
}

/// The full row snapshot the browse page filters client-side. Ordered by
/// ascending price (ties broken by id) so renders are stable across
/// fetches.
async fn list_apartments(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ApartmentsResponse>, ApiError> {
    let mut conn = state.db.get().await?;

    let rows: Vec<Apartment> = apartments::table
        .order((apartments::price.asc(), apartments::id.asc()))
        .select(Apartment::as_select())
        .load(&mut conn)
        .await?;

    Ok(Json(ApartmentsResponse {
        rows,
        is_dev: principal.is_some_and(|p| p.is_dev),
    }))
}

// ---------------------------------------------------------------------------
// POST /apartments
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateApartmentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub square_footage: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<f64>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub distance1: Option<f64>,
    #[serde(default)]
    pub distance2: Option<f64>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateApartmentResponse {
    pub success: bool,
    pub apartment: Apartment,
}

fn require_number(
    value: Option<f64>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> f64 {
    match value {
        Some(v) => v,
        None => {
            errors.push(FieldError {
                field: field.to_string(),
                message: format!("{field} is required"),
            });
            0.0
        }
    }
}

async fn create_apartment(
    DevUser(principal): DevUser,
    State(state): State<AppState>,
    Json(body): Json<CreateApartmentRequest>,
) -> Result<(StatusCode, Json<CreateApartmentResponse>), ApiError> {
    let mut errors: Vec<FieldError> = Vec::new();

    let name = body.name.as_deref().map(str::trim).unwrap_or("");
    if name.is_empty() {
        errors.push(FieldError {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        });
    }

    let price = require_number(body.price, "price", &mut errors);
    let square_footage = require_number(body.square_footage, "square_footage", &mut errors);
    let bedrooms = require_number(body.bedrooms, "bedrooms", &mut errors);
    let bathrooms = require_number(body.bathrooms, "bathrooms", &mut errors);
    let distance1 = require_number(body.distance1, "distance1", &mut errors);
    let distance2 = require_number(body.distance2, "distance2", &mut errors);

    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let url = body.url.as_deref().map(str::trim).filter(|u| !u.is_empty());

    let mut conn = state.db.get().await?;

    let apartment: Apartment = diesel::insert_into(apartments::table)
        .values(NewApartment {
            name,
            price: Some(price),
            square_footage,
            bedrooms,
            bathrooms,
            distance1: Some(distance1),
            distance2: Some(distance2),
            url,
        })
        .returning(Apartment::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(apartment_id = apartment.id, user_id = principal.user_id, "listing added");

    Ok((
        StatusCode::CREATED,
        Json(CreateApartmentResponse {
            success: true,
            apartment,
        }),
    ))
}

// ---------------------------------------------------------------------------
// DELETE /apartments/{id}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct DeleteApartmentResponse {
    pub success: bool,
}

/// Idempotent from the caller's perspective: deleting an id that no longer
/// exists still reports success.
async fn delete_apartment(
    DevUser(principal): DevUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteApartmentResponse>, ApiError> {
    let mut conn = state.db.get().await?;

    let deleted = diesel::delete(apartments::table.find(id))
        .execute(&mut conn)
        .await?;

    tracing::info!(apartment_id = id, user_id = principal.user_id, deleted, "listing delete");

    Ok(Json(DeleteApartmentResponse { success: true }))
}
