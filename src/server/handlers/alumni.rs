use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use crate::auth::actions;
use crate::database::entities::{alumni, courses};
use crate::export::to_csv_alumni;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::alumni_service::{
    AlumniFilters, AlumniListing, AlumnusProfileInput, OwnProfile, RegisterAlumnusRequest,
    RegisteredAlumnus, UnitWithCourses,
};
use crate::services::import_service::{self, ImportResult};

pub fn csv_response(file_name: &str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}

pub async fn get_own_profile(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<OwnProfile>> {
    session.require(actions::PROFILE_SELF)?;
    Ok(Json(state.alumni.get_own_profile(session.profile.id).await?))
}

pub async fn update_own_profile(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<AlumnusProfileInput>,
) -> ApiResult<Json<alumni::Model>> {
    session.require(actions::PROFILE_SELF)?;
    Ok(Json(
        state
            .alumni
            .update_own_profile(session.profile.id, payload)
            .await?,
    ))
}

pub async fn list_alumni(
    State(state): State<AppState>,
    Session(session): Session,
    Query(filters): Query<AlumniFilters>,
) -> ApiResult<Json<AlumniListing>> {
    session.require(actions::ALUMNI_READ)?;
    Ok(Json(state.alumni.list_alumni(&filters).await?))
}

pub async fn register_alumnus(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<RegisterAlumnusRequest>,
) -> ApiResult<(StatusCode, Json<RegisteredAlumnus>)> {
    session.require(actions::ALUMNI_WRITE)?;
    let registered = state.alumni.register_alumnus(payload).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}

pub async fn export_alumni(
    State(state): State<AppState>,
    Session(session): Session,
    Query(filters): Query<AlumniFilters>,
) -> ApiResult<impl IntoResponse> {
    session.require(actions::ALUMNI_READ)?;
    let listing = state.alumni.list_alumni(&filters).await?;
    let csv = to_csv_alumni::render(&listing.alumni)?;
    Ok(csv_response("egressos.csv", csv))
}

/// Batch intake; the request body is the CSV file itself
pub async fn import_alumni(
    State(state): State<AppState>,
    Session(session): Session,
    body: String,
) -> ApiResult<Json<ImportResult>> {
    session.require(actions::ALUMNI_WRITE)?;
    Ok(Json(state.import.import_csv(&body).await?))
}

pub async fn import_template(Session(session): Session) -> ApiResult<impl IntoResponse> {
    session.require(actions::ALUMNI_WRITE)?;
    let csv = import_service::csv_template()?;
    Ok(csv_response("modelo_importacao_egressos.csv", csv))
}

pub async fn list_units(
    State(state): State<AppState>,
    Session(_session): Session,
) -> ApiResult<Json<Vec<UnitWithCourses>>> {
    Ok(Json(state.alumni.list_units().await?))
}

pub async fn list_courses(
    State(state): State<AppState>,
    Session(_session): Session,
    Path(code): Path<String>,
) -> ApiResult<Json<Vec<courses::Model>>> {
    Ok(Json(state.alumni.list_courses(&code).await?))
}
