use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::dashboard_service::{AlumnusDashboard, StaffDashboard};

#[derive(Serialize)]
#[serde(untagged)]
pub enum DashboardView {
    Alumnus(AlumnusDashboard),
    Staff(StaffDashboard),
}

/// Alumni get their own summary; every staff role gets the institutional one
pub async fn dashboard(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<DashboardView>> {
    if session.role.is_staff() {
        return Ok(Json(DashboardView::Staff(state.dashboards.for_staff().await?)));
    }

    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);
    let dashboard = state
        .dashboards
        .for_alumnus(session.profile.id, alumnus_id)
        .await?;
    Ok(Json(DashboardView::Alumnus(dashboard)))
}
