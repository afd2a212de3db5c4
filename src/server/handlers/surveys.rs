use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::actions;
use crate::database::entities::{survey_templates, surveys};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::survey_service::{
    MoveDirection, PublishRequest, QuestionInput, QuestionUpdate, StaffSurveySummary,
    SubmitRequest, SubmitResult, SurveyDetail, SurveySummary, TemplateDetail, TemplateInput,
    TemplateUpdate,
};

#[derive(Deserialize)]
pub struct MoveRequest {
    pub direction: MoveDirection,
}

#[derive(Deserialize, Default)]
pub struct AddOptionRequest {
    pub label: Option<String>,
}

#[derive(Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

pub async fn list_templates(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<survey_templates::Model>>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.list_templates().await?))
}

pub async fn create_template(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<TemplateInput>,
) -> ApiResult<(StatusCode, Json<TemplateDetail>)> {
    session.require(actions::SURVEYS_AUTHOR)?;
    let template = state
        .surveys
        .create_template(Some(session.profile.id), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn get_template(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.get_template(id).await?))
}

pub async fn update_template(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<TemplateUpdate>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.update_template(id, payload).await?))
}

pub async fn add_question(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<QuestionInput>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.add_question(id, payload).await?))
}

pub async fn update_question(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<QuestionUpdate>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.update_question(id, payload).await?))
}

pub async fn remove_question(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.remove_question(id).await?))
}

pub async fn move_question(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<MoveRequest>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.move_question(id, payload.direction).await?))
}

pub async fn add_option(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<AddOptionRequest>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.add_option(id, payload.label).await?))
}

pub async fn remove_option(
    State(state): State<AppState>,
    Session(session): Session,
    Path((id, index)): Path<(i32, usize)>,
) -> ApiResult<Json<TemplateDetail>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.remove_option(id, index).await?))
}

pub async fn publish(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<PublishRequest>,
) -> ApiResult<(StatusCode, Json<surveys::Model>)> {
    session.require(actions::SURVEYS_AUTHOR)?;
    let starts_at = payload.starts_at.unwrap_or_else(Utc::now);
    let survey = state.surveys.publish(id, starts_at, payload.ends_at).await?;
    Ok((StatusCode::CREATED, Json(survey)))
}

pub async fn set_active(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<ActiveRequest>,
) -> ApiResult<Json<surveys::Model>> {
    session.require(actions::SURVEYS_AUTHOR)?;
    Ok(Json(state.surveys.set_survey_active(id, payload.active).await?))
}

/// Active surveys, flagged with whether the caller already answered
pub async fn list_surveys(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<SurveySummary>>> {
    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);
    Ok(Json(state.surveys.list_for_alumnus(alumnus_id).await?))
}

pub async fn list_surveys_for_staff(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<StaffSurveySummary>>> {
    session.require(actions::SURVEYS_READ_STAFF)?;
    Ok(Json(state.surveys.list_for_staff().await?))
}

pub async fn get_survey(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
) -> ApiResult<Json<SurveyDetail>> {
    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);
    Ok(Json(state.surveys.get_survey(id, alumnus_id).await?))
}

pub async fn submit(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<SubmitRequest>,
) -> ApiResult<(StatusCode, Json<SubmitResult>)> {
    session.require(actions::SURVEYS_RESPOND)?;
    let alumnus = state.authorization.require_alumnus(session.profile.id).await?;
    let result = state.surveys.submit(id, alumnus.id, payload.answers).await?;
    Ok((StatusCode::CREATED, Json(result)))
}
