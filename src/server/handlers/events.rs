use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::auth::actions;
use crate::database::entities::{event_categories, event_participants, event_ratings, events};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::event_service::{
    CategoryInput, EventFilters, EventInput, EventListing, EventUpdate, EventView, RatingInput,
};

pub async fn list_events(
    State(state): State<AppState>,
    Session(session): Session,
    Query(filters): Query<EventFilters>,
) -> ApiResult<Json<EventListing>> {
    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);
    Ok(Json(state.events.list_events(alumnus_id, &filters).await?))
}

pub async fn list_all_events(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<EventView>>> {
    session.require(actions::EVENTS_MANAGE)?;
    Ok(Json(state.events.list_all().await?))
}

pub async fn get_event(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
) -> ApiResult<Json<EventView>> {
    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);
    Ok(Json(state.events.get_event(id, alumnus_id).await?))
}

pub async fn create_event(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<EventInput>,
) -> ApiResult<(StatusCode, Json<events::Model>)> {
    session.require(actions::EVENTS_MANAGE)?;
    let event = state
        .events
        .create_event(Some(session.profile.id), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<EventUpdate>,
) -> ApiResult<Json<events::Model>> {
    session.require(actions::EVENTS_MANAGE)?;
    Ok(Json(state.events.update_event(id, payload).await?))
}

pub async fn register(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
) -> ApiResult<(StatusCode, Json<event_participants::Model>)> {
    session.require(actions::EVENTS_REGISTER)?;
    let alumnus = state.authorization.require_alumnus(session.profile.id).await?;
    let participant = state.events.register(id, alumnus.id).await?;
    Ok((StatusCode::CREATED, Json(participant)))
}

pub async fn rate(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<RatingInput>,
) -> ApiResult<(StatusCode, Json<event_ratings::Model>)> {
    session.require(actions::EVENTS_RATE)?;
    let alumnus = state.authorization.require_alumnus(session.profile.id).await?;
    let rating = state.events.rate(id, alumnus.id, payload).await?;
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Session(_session): Session,
) -> ApiResult<Json<Vec<event_categories::Model>>> {
    Ok(Json(state.events.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<CategoryInput>,
) -> ApiResult<(StatusCode, Json<event_categories::Model>)> {
    session.require(actions::EVENTS_MANAGE)?;
    let category = state.events.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Session(session): Session,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryInput>,
) -> ApiResult<Json<event_categories::Model>> {
    session.require(actions::EVENTS_MANAGE)?;
    Ok(Json(state.events.update_category(id, payload).await?))
}
