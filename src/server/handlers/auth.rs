use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Serialize;

use crate::auth::Role;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::{bearer_token, Session};
use crate::services::auth_service::{
    ProfileView, SignInRequest, SignInResult, SignUpRequest, UpdateProfileRequest,
};

#[derive(Serialize)]
pub struct SessionResponse {
    pub profile: ProfileView,
    pub role: Role,
    pub role_label: &'static str,
    pub alumnus_id: Option<i32>,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<ProfileView>)> {
    let profile = state.auth.sign_up(payload).await?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> ApiResult<Json<SignInResult>> {
    Ok(Json(state.auth.sign_in(payload).await?))
}

/// Works with stale tokens too, so clients can always clear their state
pub async fn sign_out(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<StatusCode> {
    if let Some(token) = bearer_token(&headers) {
        state.auth.sign_out(token).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn current_session(
    State(state): State<AppState>,
    Session(session): Session,
) -> ApiResult<Json<SessionResponse>> {
    let alumnus_id = state
        .authorization
        .find_alumnus(session.profile.id)
        .await?
        .map(|a| a.id);

    Ok(Json(SessionResponse {
        role: session.role,
        role_label: session.role.label(),
        profile: session.profile.into(),
        alumnus_id,
    }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Session(session): Session,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileView>> {
    let profile = state.auth.update_profile(session.profile.id, payload).await?;
    Ok(Json(profile.into()))
}
