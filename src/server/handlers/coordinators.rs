use axum::{extract::State, http::StatusCode, response::Json};

use crate::auth::actions;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::coordinator_service::{RegisterCoordinatorRequest, RegisteredCoordinator};

pub async fn register_coordinator(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<RegisterCoordinatorRequest>,
) -> ApiResult<(StatusCode, Json<RegisteredCoordinator>)> {
    session.require(actions::COORDINATORS_WRITE)?;
    let registered = state.coordinators.register_coordinator(payload).await?;
    Ok((StatusCode::CREATED, Json(registered)))
}
