//! HTTP handlers for the bootcamp collection.
//! Bodies are JSON in both directions; validation and persistence are
//! delegated to `BootcampService`.

use crate::{
    errors::AppError,
    models::bootcamp::BootcampInput,
    services::bootcamp_service::BootcampService,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

/// `GET {base}` — list all bootcamps.
pub async fn list_bootcamps(
    State(service): State<BootcampService>,
) -> Result<impl IntoResponse, AppError> {
    let bootcamps = service.list().await?;
    Ok(Json(json!({
        "success": true,
        "count": bootcamps.len(),
        "data": bootcamps
    })))
}

/// `GET {base}/{id}` — fetch one bootcamp.
pub async fn get_bootcamp(
    State(service): State<BootcampService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bootcamp = service.get(parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "data": bootcamp })))
}

/// `POST {base}` — validate, derive slug and create.
pub async fn create_bootcamp(
    State(service): State<BootcampService>,
    payload: Result<Json<BootcampInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(input) = payload.map_err(rejection_to_error)?;
    let bootcamp = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": bootcamp })),
    ))
}

/// `PUT {base}/{id}` — merge the body over the stored bootcamp.
pub async fn update_bootcamp(
    State(service): State<BootcampService>,
    Path(id): Path<String>,
    payload: Result<Json<BootcampInput>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id)?;
    let Json(patch) = payload.map_err(rejection_to_error)?;
    let bootcamp = service.update(id, patch).await?;
    Ok(Json(json!({ "success": true, "data": bootcamp })))
}

/// `DELETE {base}/{id}`
pub async fn delete_bootcamp(
    State(service): State<BootcampService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    service.delete(parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "data": {} })))
}

/// An id that is not a UUID cannot name a stored bootcamp.
fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw)
        .map_err(|_| AppError::not_found(format!("Bootcamp not found with id of {}", raw)))
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    AppError::new(rejection.status(), rejection.body_text())
}
