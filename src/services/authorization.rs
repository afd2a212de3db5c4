use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::auth::{Actor, Authorizer, Role, RoleAuthorizer};
use crate::database::entities::{alumni, profiles, sessions};
use crate::errors::{CoreError, CoreResult};

use super::auth_service::DEFAULT_SESSION_HOURS;

/// Identity resolved from a bearer token
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub token: String,
    pub profile: profiles::Model,
    pub role: Role,
    pub actor: Actor,
}

impl SessionContext {
    /// Check the role matrix for this caller
    pub fn require(&self, action: &str) -> CoreResult<()> {
        RoleAuthorizer.authorize(&self.actor, action)
    }
}

/// Resolves bearer sessions into profiles and actors
#[derive(Clone, Debug)]
pub struct AuthorizationService {
    db: DatabaseConnection,
    session_hours: i64,
}

impl AuthorizationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            session_hours: DEFAULT_SESSION_HOURS,
        }
    }

    pub fn with_session_hours(mut self, hours: i64) -> Self {
        self.session_hours = hours.max(1);
        self
    }

    /// Get profile from a session token, sliding the expiry forward on use
    pub async fn get_session(&self, token: &str) -> CoreResult<SessionContext> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .filter(sessions::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::unauthorized("Invalid or expired session"))?;

        let now = Utc::now();
        if session.expires_at <= now {
            return Err(CoreError::unauthorized("Session expired"));
        }

        let profile = profiles::Entity::find_by_id(session.profile_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::unauthorized("Invalid or expired session"))?;

        if !profile.is_active {
            return Err(CoreError::forbidden("Account is deactivated"));
        }

        let role: Role = profile.role.parse().map_err(|_| {
            warn!("Profile {} has unknown role {}", profile.id, profile.role);
            CoreError::forbidden("Unknown role")
        })?;

        let mut active: sessions::ActiveModel = session.into();
        active.last_activity = Set(now);
        active.expires_at = Set(now + Duration::hours(self.session_hours));
        active.update(&self.db).await?;

        Ok(SessionContext {
            token: token.to_string(),
            actor: Actor::user(profile.id, role),
            role,
            profile,
        })
    }

    /// Alumnus row for the given profile, if one was created
    pub async fn find_alumnus(&self, profile_id: i32) -> CoreResult<Option<alumni::Model>> {
        Ok(alumni::Entity::find()
            .filter(alumni::Column::ProfileId.eq(profile_id))
            .one(&self.db)
            .await?)
    }

    /// Alumnus row, failing when the caller has not completed a profile yet
    pub async fn require_alumnus(&self, profile_id: i32) -> CoreResult<alumni::Model> {
        self.find_alumnus(profile_id).await?.ok_or_else(|| {
            CoreError::validation("Complete your alumnus profile before continuing")
        })
    }
}
