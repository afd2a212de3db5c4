use axum::{extract::State, response::Json};

use crate::navigation::{self, Shell};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::extract::Session;
use crate::services::auth_service::ProfileView;

pub async fn shell(State(state): State<AppState>, Session(session): Session) -> ApiResult<Json<Shell>> {
    let profile: ProfileView = session.profile.into();
    Ok(Json(navigation::shell(&profile, session.role, &state.institution)))
}
