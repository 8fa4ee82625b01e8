//! Defines routes for the bootcamp directory.
//!
//! ## Structure
//! - **Health endpoints** (mounted at root)
//!   - `GET    /healthz`
//!   - `GET    /readyz`
//!
//! - **Bootcamp endpoints** (mounted at the configured base path)
//!   - `GET    {base}` — list bootcamps
//!   - `POST   {base}` — create bootcamp
//!   - `GET    {base}/{id}` — fetch bootcamp
//!   - `PUT    {base}/{id}` — update bootcamp
//!   - `DELETE {base}/{id}` — delete bootcamp

use crate::{
    handlers::{
        bootcamp_handlers::{
            create_bootcamp, delete_bootcamp, get_bootcamp, list_bootcamps, update_bootcamp,
        },
        health_handlers::{healthz, readyz},
    },
    services::bootcamp_service::BootcampService,
};
use axum::{Router, routing::get};

/// Build the router with bootcamp routes under `base_path`.
///
/// `base_path` is expected normalized: leading `/`, no trailing `/`, or empty
/// to mount at the root.
pub fn routes(base_path: &str) -> Router<BootcampService> {
    let collection = if base_path.is_empty() { "/" } else { base_path };
    let member = format!("{}/{{id}}", base_path);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route(collection, get(list_bootcamps).post(create_bootcamp))
        .route(
            &member,
            get(get_bootcamp)
                .put(update_bootcamp)
                .delete(delete_bootcamp),
        )
}
