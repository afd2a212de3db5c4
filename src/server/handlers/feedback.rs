use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::auth::actions;
use crate::database::entities::{corrective_actions, pedagogical_feedback};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::feedback_service::{ActionStatusUpdate, CorrectiveActionInput};

pub async fn list_feedback(
    State(state): State<AppState>,
    Session(session): Session,
    Path(course_id): Path<i32>,
) -> ApiResult<Json<Vec<pedagogical_feedback::Model>>> {
    session.require(actions::FEEDBACK_MANAGE)?;
    Ok(Json(state.feedback.list_feedback(course_id).await?))
}

pub async fn recompute(
    State(state): State<AppState>,
    Session(session): Session,
    Path(survey_id): Path<i32>,
) -> ApiResult<Json<Vec<pedagogical_feedback::Model>>> {
    session.require(actions::FEEDBACK_MANAGE)?;
    Ok(Json(state.feedback.recompute_for_survey(survey_id).await?))
}

pub async fn list_actions(
    State(state): State<AppState>,
    Session(session): Session,
    Path(course_id): Path<i32>,
) -> ApiResult<Json<Vec<corrective_actions::Model>>> {
    session.require(actions::FEEDBACK_MANAGE)?;
    Ok(Json(state.feedback.list_actions(course_id).await?))
}

pub async fn create_action(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<CorrectiveActionInput>,
) -> ApiResult<(StatusCode, Json<corrective_actions::Model>)> {
    session.require(actions::FEEDBACK_MANAGE)?;
    let action = state.feedback.create_action(payload).await?;
    Ok((StatusCode::CREATED, Json(action)))
}

pub async fn update_action_status(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<ActionStatusUpdate>,
) -> ApiResult<Json<corrective_actions::Model>> {
    session.require(actions::FEEDBACK_MANAGE)?;
    Ok(Json(state.feedback.update_action_status(id, payload).await?))
}
