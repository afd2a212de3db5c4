use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

use crate::auth::actions;
use crate::export::to_csv_report;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::report_service::{Report, ReportFilters, ReportKind, ReportSummary};

use super::alumni::csv_response;

pub async fn hub(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<Vec<ReportSummary>>> {
    session.require(actions::REPORTS_READ)?;
    Ok(Json(state.reports.hub().await?))
}

pub async fn report(
    State(state): State<AppState>,
    Session(session): Session,
    Path(kind): Path<String>,
    Query(filters): Query<ReportFilters>,
) -> ApiResult<Json<Report>> {
    session.require(actions::REPORTS_READ)?;
    let kind: ReportKind = kind.parse()?;
    Ok(Json(state.reports.report(kind, &filters).await?))
}

pub async fn export_report(
    State(state): State<AppState>,
    Session(session): Session,
    Path(kind): Path<String>,
    Query(filters): Query<ReportFilters>,
) -> ApiResult<impl IntoResponse> {
    session.require(actions::REPORTS_READ)?;
    let kind: ReportKind = kind.parse()?;
    let report = state.reports.report(kind, &filters).await?;
    let csv = to_csv_report::render(&report)?;
    Ok(csv_response(&kind.file_name(), csv))
}
