//! src/services/bootcamp_service.rs
//!
//! BootcampService — CRUD over the `bootcamps` table in SQLite. Every write
//! goes through `validate_and_normalize` first, so the slug stored next to a
//! name is always the one derived from it. Name uniqueness is left to the
//! table's UNIQUE constraint.

use crate::{
    models::bootcamp::{Bootcamp, BootcampInput, Career, Location},
    validation::{ValidationErrors, bootcamp::validate_and_normalize, violations},
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool, types::Json};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BootcampError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("bootcamp name `{0}` already exists")]
    DuplicateName(String),
    #[error("bootcamp `{0}` not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type BootcampResult<T> = Result<T, BootcampError>;

const SELECT_BOOTCAMP: &str = "SELECT id, name, slug, description, website, phone, email, address, \
     location, careers, average_rating, average_cost, photo, housing, job_assistance, \
     job_guarantee, accept_gi, created_at FROM bootcamps";

/// Row shape of the `bootcamps` table; structured columns are JSON text.
#[derive(FromRow)]
struct BootcampRow {
    id: Uuid,
    name: String,
    slug: String,
    description: String,
    website: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    address: String,
    location: Option<Json<Location>>,
    careers: Json<Vec<Career>>,
    average_rating: Option<f64>,
    average_cost: Option<f64>,
    photo: String,
    housing: bool,
    job_assistance: bool,
    job_guarantee: bool,
    accept_gi: bool,
    created_at: DateTime<Utc>,
}

impl From<BootcampRow> for Bootcamp {
    fn from(row: BootcampRow) -> Self {
        Bootcamp {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            website: row.website,
            phone: row.phone,
            email: row.email,
            address: row.address,
            location: row.location.map(|Json(location)| location),
            careers: row.careers.0,
            average_rating: row.average_rating,
            average_cost: row.average_cost,
            photo: row.photo,
            housing: row.housing,
            job_assistance: row.job_assistance,
            job_guarantee: row.job_guarantee,
            accept_gi: row.accept_gi,
            created_at: row.created_at,
        }
    }
}

/// BootcampService provides the directory's persistence operations:
/// - Create a bootcamp (validate, derive slug, insert)
/// - List and fetch bootcamps
/// - Update a bootcamp (merge, re-validate, re-derive slug)
/// - Delete a bootcamp
#[derive(Clone)]
pub struct BootcampService {
    /// Shared SQLite connection pool.
    pub db: Arc<SqlitePool>,
}

impl BootcampService {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    /// Validate `input`, derive its slug and persist it as a new bootcamp.
    ///
    /// Returns DuplicateName if another bootcamp already uses the name.
    pub async fn create(&self, input: BootcampInput) -> BootcampResult<Bootcamp> {
        let draft = validate_and_normalize(input).inspect_err(log_rejection)?;
        let bootcamp = draft.into_bootcamp(Uuid::new_v4(), Utc::now());
        let (longitude, latitude) = coordinates(bootcamp.location.as_ref());

        sqlx::query(
            r#"
            INSERT INTO bootcamps (
                id, name, slug, description, website, phone, email, address,
                location, longitude, latitude, careers, average_rating, average_cost,
                photo, housing, job_assistance, job_guarantee, accept_gi, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(bootcamp.id)
        .bind(&bootcamp.name)
        .bind(&bootcamp.slug)
        .bind(&bootcamp.description)
        .bind(&bootcamp.website)
        .bind(&bootcamp.phone)
        .bind(&bootcamp.email)
        .bind(&bootcamp.address)
        .bind(bootcamp.location.as_ref().map(Json))
        .bind(longitude)
        .bind(latitude)
        .bind(Json(&bootcamp.careers))
        .bind(bootcamp.average_rating)
        .bind(bootcamp.average_cost)
        .bind(&bootcamp.photo)
        .bind(bootcamp.housing)
        .bind(bootcamp.job_assistance)
        .bind(bootcamp.job_guarantee)
        .bind(bootcamp.accept_gi)
        .bind(bootcamp.created_at)
        .execute(&*self.db)
        .await
        .map_err(|err| map_write_error(err, &bootcamp.name))?;

        info!(id = %bootcamp.id, slug = %bootcamp.slug, "created bootcamp");
        Ok(bootcamp)
    }

    /// All bootcamps, oldest first.
    pub async fn list(&self) -> BootcampResult<Vec<Bootcamp>> {
        let rows = sqlx::query_as::<_, BootcampRow>(&format!(
            "{SELECT_BOOTCAMP} ORDER BY created_at ASC, rowid ASC"
        ))
        .fetch_all(&*self.db)
        .await?;

        debug!("listed {} bootcamps", rows.len());
        Ok(rows.into_iter().map(Bootcamp::from).collect())
    }

    /// Fetch one bootcamp by id.
    pub async fn get(&self, id: Uuid) -> BootcampResult<Bootcamp> {
        sqlx::query_as::<_, BootcampRow>(&format!("{SELECT_BOOTCAMP} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&*self.db)
            .await?
            .map(Bootcamp::from)
            .ok_or(BootcampError::NotFound(id))
    }

    /// Apply `patch` over the stored bootcamp.
    ///
    /// The merged record is validated as a whole and the slug re-derived from
    /// the resulting name; nothing is written when validation fails. Only the
    /// columns named in `patch` are written, so concurrent updates to
    /// different fields do not overwrite each other.
    pub async fn update(&self, id: Uuid, patch: BootcampInput) -> BootcampResult<Bootcamp> {
        let existing = self.get(id).await?;
        if patch == BootcampInput::default() {
            return Ok(existing);
        }

        let merged = patch.clone().merged_over(BootcampInput::from(&existing));
        let draft = validate_and_normalize(merged).inspect_err(log_rejection)?;

        let mut query = QueryBuilder::<Sqlite>::new("UPDATE bootcamps SET ");
        let mut set = query.separated(", ");
        if patch.name.is_some() {
            set.push("name = ").push_bind_unseparated(draft.name.clone());
            set.push("slug = ").push_bind_unseparated(draft.slug.clone());
        }
        if patch.description.is_some() {
            set.push("description = ").push_bind_unseparated(draft.description);
        }
        if patch.website.is_some() {
            set.push("website = ").push_bind_unseparated(draft.website);
        }
        if patch.phone.is_some() {
            set.push("phone = ").push_bind_unseparated(draft.phone);
        }
        if patch.email.is_some() {
            set.push("email = ").push_bind_unseparated(draft.email);
        }
        if patch.address.is_some() {
            set.push("address = ").push_bind_unseparated(draft.address);
        }
        if patch.location.is_some() {
            let (longitude, latitude) = coordinates(draft.location.as_ref());
            set.push("location = ").push_bind_unseparated(draft.location.map(Json));
            set.push("longitude = ").push_bind_unseparated(longitude);
            set.push("latitude = ").push_bind_unseparated(latitude);
        }
        if patch.careers.is_some() {
            set.push("careers = ").push_bind_unseparated(Json(draft.careers));
        }
        if patch.average_rating.is_some() {
            set.push("average_rating = ").push_bind_unseparated(draft.average_rating);
        }
        if patch.average_cost.is_some() {
            set.push("average_cost = ").push_bind_unseparated(draft.average_cost);
        }
        if patch.photo.is_some() {
            set.push("photo = ").push_bind_unseparated(draft.photo);
        }
        if patch.housing.is_some() {
            set.push("housing = ").push_bind_unseparated(draft.housing);
        }
        if patch.job_assistance.is_some() {
            set.push("job_assistance = ").push_bind_unseparated(draft.job_assistance);
        }
        if patch.job_guarantee.is_some() {
            set.push("job_guarantee = ").push_bind_unseparated(draft.job_guarantee);
        }
        if patch.accept_gi.is_some() {
            set.push("accept_gi = ").push_bind_unseparated(draft.accept_gi);
        }
        query.push(" WHERE id = ").push_bind(id);

        let result = query
            .build()
            .execute(&*self.db)
            .await
            .map_err(|err| map_write_error(err, &draft.name))?;

        if result.rows_affected() == 0 {
            return Err(BootcampError::NotFound(id));
        }

        info!(id = %id, slug = %draft.slug, "updated bootcamp");
        self.get(id).await
    }

    /// Delete a bootcamp. Returns NotFound if no row matched.
    pub async fn delete(&self, id: Uuid) -> BootcampResult<()> {
        let result = sqlx::query("DELETE FROM bootcamps WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(BootcampError::NotFound(id));
        }

        info!(id = %id, "deleted bootcamp");
        Ok(())
    }
}

fn log_rejection(errors: &ValidationErrors) {
    let fields: Vec<String> = violations(errors).into_iter().map(|v| v.field).collect();
    debug!(?fields, "bootcamp failed validation");
}

/// Longitude and latitude columns backing the coordinate index.
fn coordinates(location: Option<&Location>) -> (Option<f64>, Option<f64>) {
    match location.and_then(Location::point) {
        Some((lng, lat)) => (Some(lng), Some(lat)),
        None => (None, None),
    }
}

fn map_write_error(err: sqlx::Error, name: &str) -> BootcampError {
    if is_unique_violation(&err) {
        BootcampError::DuplicateName(name.to_string())
    } else {
        BootcampError::Sqlx(err)
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::bootcamp::DEFAULT_PHOTO;
    use sqlx::sqlite::SqlitePoolOptions;

    pub(crate) async fn setup_test_service() -> BootcampService {
        // In-memory databases are per connection, so keep the pool at one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("create sqlite pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("run migrations");

        BootcampService::new(Arc::new(pool))
    }

    pub(crate) fn sample_input(name: &str) -> BootcampInput {
        BootcampInput {
            name: Some(name.to_string()),
            description: Some("Immersive full stack web development".into()),
            address: Some("233 Bay State Rd Boston MA 02215".into()),
            careers: Some(vec!["Web Development".into(), "Business".into()]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_derives_slug_and_defaults() {
        let service = setup_test_service().await;

        let bootcamp = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create bootcamp");

        assert_eq!(bootcamp.slug, "code-academy");
        assert_eq!(bootcamp.photo, DEFAULT_PHOTO);
        assert!(!bootcamp.housing);
        assert_eq!(bootcamp.careers, vec![Career::WebDevelopment, Career::Business]);
    }

    #[tokio::test]
    async fn test_get_round_trips_structured_fields() {
        let service = setup_test_service().await;
        let input = BootcampInput {
            location: Some(Location {
                kind: Some("Point".into()),
                coordinates: vec![-71.104028, 42.350846],
                city: Some("Boston".into()),
                ..Default::default()
            }),
            average_rating: Some(8.0),
            job_guarantee: Some(true),
            ..sample_input("Devworks Bootcamp")
        };
        let created = service.create(input).await.expect("create bootcamp");

        let fetched = service.get(created.id).await.expect("get bootcamp");
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.slug, "devworks-bootcamp");
        assert_eq!(fetched.location, created.location);
        assert_eq!(fetched.careers, created.careers);
        assert_eq!(fetched.average_rating, Some(8.0));
        assert!(fetched.job_guarantee);

        let (lng, lat): (Option<f64>, Option<f64>) =
            sqlx::query_as("SELECT longitude, latitude FROM bootcamps WHERE id = ?")
                .bind(created.id)
                .fetch_one(&*service.db)
                .await
                .expect("read coordinates");
        assert_eq!(lng, Some(-71.104028));
        assert_eq!(lat, Some(42.350846));
    }

    #[tokio::test]
    async fn test_create_duplicate_name_fails() {
        let service = setup_test_service().await;
        service
            .create(sample_input("Code Academy"))
            .await
            .expect("create first bootcamp");

        let result = service.create(sample_input("Code Academy")).await;
        assert!(matches!(result, Err(BootcampError::DuplicateName(name)) if name == "Code Academy"));
    }

    #[tokio::test]
    async fn test_invalid_create_writes_nothing() {
        let service = setup_test_service().await;

        let result = service
            .create(BootcampInput {
                average_rating: Some(11.0),
                ..sample_input("Code Academy")
            })
            .await;

        match result {
            Err(BootcampError::Validation(err)) => {
                assert!(ValidationErrors::has_error(&Err(err), "averageRating"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_list_returns_in_creation_order() {
        let service = setup_test_service().await;
        for name in ["Alpha Camp", "Beta Camp", "Gamma Camp"] {
            service.create(sample_input(name)).await.expect("create");
        }

        let slugs: Vec<String> = service
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(slugs, ["alpha-camp", "beta-camp", "gamma-camp"]);
    }

    #[tokio::test]
    async fn test_update_recomputes_slug() {
        let service = setup_test_service().await;
        let created = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create");

        let updated = service
            .update(
                created.id,
                BootcampInput {
                    name: Some("  Code Academy Online ".into()),
                    housing: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.name, "Code Academy Online");
        assert_eq!(updated.slug, "code-academy-online");
        assert!(updated.housing);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);

        let fetched = service.get(created.id).await.expect("get");
        assert_eq!(fetched.slug, "code-academy-online");
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_record_unchanged() {
        let service = setup_test_service().await;
        let created = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create");

        let result = service
            .update(
                created.id,
                BootcampInput {
                    name: Some("Renamed".into()),
                    careers: Some(vec!["Astrology".into()]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(BootcampError::Validation(_))));

        let fetched = service.get(created.id).await.expect("get");
        assert_eq!(fetched.name, "Code Academy");
        assert_eq!(fetched.slug, "code-academy");
    }

    #[tokio::test]
    async fn test_concurrent_updates_to_different_fields_both_persist() {
        let service = setup_test_service().await;
        let created = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create");

        let (housing, renamed) = tokio::join!(
            service.update(
                created.id,
                BootcampInput {
                    housing: Some(true),
                    ..Default::default()
                },
            ),
            service.update(
                created.id,
                BootcampInput {
                    name: Some("Code Academy Online".into()),
                    ..Default::default()
                },
            ),
        );
        housing.expect("housing update");
        renamed.expect("rename update");

        let fetched = service.get(created.id).await.expect("get");
        assert!(fetched.housing);
        assert_eq!(fetched.name, "Code Academy Online");
        assert_eq!(fetched.slug, "code-academy-online");
    }

    #[tokio::test]
    async fn test_update_location_moves_coordinate_columns() {
        let service = setup_test_service().await;
        let created = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create");

        let updated = service
            .update(
                created.id,
                BootcampInput {
                    location: Some(Location {
                        kind: Some("Point".into()),
                        coordinates: vec![2.3522, 48.8566],
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.location.and_then(|l| l.point()), Some((2.3522, 48.8566)));
        assert_eq!(updated.name, "Code Academy");

        let (lng, lat): (Option<f64>, Option<f64>) =
            sqlx::query_as("SELECT longitude, latitude FROM bootcamps WHERE id = ?")
                .bind(created.id)
                .fetch_one(&*service.db)
                .await
                .expect("read coordinates");
        assert_eq!((lng, lat), (Some(2.3522), Some(48.8566)));
    }

    #[tokio::test]
    async fn test_create_accepts_non_latin_name() {
        let service = setup_test_service().await;

        let bootcamp = service
            .create(sample_input("Код Академия"))
            .await
            .expect("create bootcamp");

        assert_eq!(bootcamp.name, "Код Академия");
        assert!(bootcamp.slug.starts_with("kod-akademi"));
    }

    #[tokio::test]
    async fn test_update_to_taken_name_fails() {
        let service = setup_test_service().await;
        service.create(sample_input("Alpha Camp")).await.expect("create");
        let beta = service.create(sample_input("Beta Camp")).await.expect("create");

        let result = service
            .update(
                beta.id,
                BootcampInput {
                    name: Some("Alpha Camp".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(BootcampError::DuplicateName(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let service = setup_test_service().await;
        let created = service
            .create(sample_input("Code Academy"))
            .await
            .expect("create");

        service.delete(created.id).await.expect("delete");

        assert!(matches!(service.get(created.id).await, Err(BootcampError::NotFound(_))));
        assert!(matches!(service.delete(created.id).await, Err(BootcampError::NotFound(_))));
        assert!(matches!(
            service.update(created.id, BootcampInput::default()).await,
            Err(BootcampError::NotFound(_))
        ));
    }
}
