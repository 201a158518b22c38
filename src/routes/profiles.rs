//! Profile routes
//!
//! CRUD over the profile entity. Profiles have no relation to accounts;
//! they are simply resources behind the authentication gate (except for
//! the by-id read, which is public).

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, DatabaseError};
use crate::middleware::AuthenticatedUser;
use crate::validators::is_valid_display_name;

/// Profile wire representation. The id is caller-supplied.
#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub city: String,
    #[serde(rename = "isMale")]
    pub is_male: bool,
}

/// GET /getallusers (protected)
pub async fn list_profiles(
    user: web::ReqData<AuthenticatedUser>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    tracing::debug!(username = %user.username(), "Listing profiles");

    let rows = sqlx::query_as::<_, (i64, String, String, bool)>(
        "SELECT id, name, city, is_male FROM profiles ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    let profiles: Vec<Profile> = rows
        .into_iter()
        .map(|(id, name, city, is_male)| Profile {
            id,
            name,
            city,
            is_male,
        })
        .collect();

    Ok(HttpResponse::Ok().json(profiles))
}

/// POST /adduser (protected)
///
/// # Errors
/// - 400: Validation errors (empty name/city)
/// - 409: A profile with this id already exists
pub async fn create_profile(
    body: web::Json<Profile>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let name = is_valid_display_name("name", &body.name)?;
    let city = is_valid_display_name("city", &body.city)?;

    sqlx::query("INSERT INTO profiles (id, name, city, is_male) VALUES ($1, $2, $3, $4)")
        .bind(body.id)
        .bind(&name)
        .bind(&city)
        .bind(body.is_male)
        .execute(pool.get_ref())
        .await?;

    tracing::info!(profile_id = body.id, "Profile created");

    Ok(HttpResponse::Created().json(Profile {
        id: body.id,
        name,
        city,
        is_male: body.is_male,
    }))
}

/// PUT /updateuser/{profile_id} (protected)
///
/// # Errors
/// - 400: Validation errors
/// - 404: No profile with this id
pub async fn update_profile(
    path: web::Path<i64>,
    body: web::Json<Profile>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let profile_id = path.into_inner();
    let name = is_valid_display_name("name", &body.name)?;
    let city = is_valid_display_name("city", &body.city)?;

    let result = sqlx::query("UPDATE profiles SET name = $1, city = $2, is_male = $3 WHERE id = $4")
        .bind(&name)
        .bind(&city)
        .bind(body.is_male)
        .bind(profile_id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Database(DatabaseError::NotFound(format!(
            "profile {}",
            profile_id
        ))));
    }

    tracing::info!(profile_id, "Profile updated");

    Ok(HttpResponse::Accepted().json(Profile {
        id: profile_id,
        name,
        city,
        is_male: body.is_male,
    }))
}

/// DELETE /deleteuser/{profile_id} (protected)
///
/// Returns the deleted profile.
///
/// # Errors
/// - 404: No profile with this id
pub async fn delete_profile(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let profile_id = path.into_inner();

    let deleted = sqlx::query_as::<_, (i64, String, String, bool)>(
        "DELETE FROM profiles WHERE id = $1 RETURNING id, name, city, is_male",
    )
    .bind(profile_id)
    .fetch_optional(pool.get_ref())
    .await?;

    let (id, name, city, is_male) = deleted.ok_or_else(|| {
        AppError::Database(DatabaseError::NotFound(format!("profile {}", profile_id)))
    })?;

    tracing::info!(profile_id, "Profile deleted");

    Ok(HttpResponse::Ok().json(Profile {
        id,
        name,
        city,
        is_male,
    }))
}

/// GET /getbyid/{profile_id}
///
/// Public read, kept unauthenticated.
///
/// # Errors
/// - 404: No profile with this id
pub async fn get_profile(
    path: web::Path<i64>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let profile_id = path.into_inner();

    let row = sqlx::query_as::<_, (i64, String, String, bool)>(
        "SELECT id, name, city, is_male FROM profiles WHERE id = $1",
    )
    .bind(profile_id)
    .fetch_optional(pool.get_ref())
    .await?;

    let (id, name, city, is_male) = row.ok_or_else(|| {
        AppError::Database(DatabaseError::NotFound(format!("profile {}", profile_id)))
    })?;

    Ok(HttpResponse::Ok().json(Profile {
        id,
        name,
        city,
        is_male,
    }))
}
