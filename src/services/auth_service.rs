use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::Role;
use crate::database::entities::{profiles, sessions};
use crate::errors::{AuthError, AuthResult};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const DEFAULT_SESSION_HOURS: i64 = 24;

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Public view of a profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileView {
    pub id: i32,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<profiles::Model> for ProfileView {
    fn from(model: profiles::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            full_name: model.full_name,
            role: model.role,
            is_active: model.is_active,
            last_login_at: model.last_login_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInResult {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub profile: ProfileView,
}

/// Service for handling authentication operations
#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    session_hours: i64,
    demo_mode: bool,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            session_hours: DEFAULT_SESSION_HOURS,
            demo_mode: false,
        }
    }

    pub fn with_session_hours(mut self, hours: i64) -> Self {
        self.session_hours = hours.max(1);
        self
    }

    pub fn with_demo_mode(mut self, demo_mode: bool) -> Self {
        self.demo_mode = demo_mode;
        self
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn session_hours(&self) -> i64 {
        self.session_hours
    }

    /// Hash a password using bcrypt
    pub fn hash_password(password: &str) -> AuthResult<String> {
        Self::validate_password(password)?;
        hash(password, DEFAULT_COST).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Verify a password against a hash
    pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
        verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Generate an opaque session token
    pub fn generate_session_token() -> String {
        Uuid::new_v4().to_string()
    }

    /// Initial password handed out when staff create an account
    pub fn generate_initial_password() -> String {
        Uuid::new_v4().simple().to_string()[..10].to_string()
    }

    pub fn calculate_session_expiry(hours: i64) -> DateTime<Utc> {
        Utc::now() + Duration::hours(hours)
    }

    pub fn is_session_expired(expires_at: DateTime<Utc>) -> bool {
        Utc::now() > expires_at
    }

    /// Validate email format
    pub fn validate_email(email: &str) -> AuthResult<()> {
        let invalid = |reason: &str| Err(AuthError::InvalidEmail(reason.to_string()));

        if email.is_empty() {
            return invalid("email cannot be empty");
        }

        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() != 2 {
            return invalid("must contain exactly one @");
        }

        let (local_part, domain_part) = (parts[0], parts[1]);
        if local_part.is_empty() {
            return invalid("local part cannot be empty");
        }
        if domain_part.is_empty() || !domain_part.contains('.') {
            return invalid("domain must contain a dot");
        }
        if domain_part.starts_with('.') || domain_part.ends_with('.') {
            return invalid("domain cannot start or end with a dot");
        }
        if email.len() > 254 {
            return invalid("email is too long");
        }

        Ok(())
    }

    pub fn validate_password(password: &str) -> AuthResult<()> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword(format!(
                "password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            )));
        }
        Ok(())
    }

    pub fn validate_full_name(full_name: &str) -> AuthResult<()> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return Err(AuthError::InvalidName("name cannot be empty".to_string()));
        }
        if trimmed.len() > 150 {
            return Err(AuthError::InvalidName(
                "name is too long (max 150 characters)".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    async fn find_by_email<C>(conn: &C, email: &str) -> AuthResult<Option<profiles::Model>>
    where
        C: ConnectionTrait,
    {
        Ok(profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email))
            .one(conn)
            .await?)
    }

    /// Self-service registration, refused in demo mode. Always creates an alumnus;
    /// staff accounts only come from registrar intake or seeding.
    pub async fn sign_up(&self, request: SignUpRequest) -> AuthResult<profiles::Model> {
        if self.demo_mode {
            return Err(AuthError::SignUpDisabled);
        }

        Self::create_account(
            &self.db,
            &request.email,
            &request.full_name,
            Role::Alumnus,
            &request.password,
        )
        .await
    }

    /// Create a profile with the given role and password using the provided
    /// connection or transaction
    pub async fn create_account<C>(
        conn: &C,
        email: &str,
        full_name: &str,
        role: Role,
        password: &str,
    ) -> AuthResult<profiles::Model>
    where
        C: ConnectionTrait,
    {
        let email = Self::normalize_email(email);
        Self::validate_email(&email)?;
        Self::validate_full_name(full_name)?;
        let password_hash = Self::hash_password(password)?;

        if Self::find_by_email(conn, &email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let mut profile = profiles::ActiveModel::new();
        profile.email = Set(email.clone());
        profile.full_name = Set(full_name.trim().to_string());
        profile.role = Set(role.as_str().to_string());
        profile.password_hash = Set(password_hash);

        let profile = profile.insert(conn).await?;
        info!("Created {} account {}", role, email);
        Ok(profile)
    }

    pub async fn sign_in(&self, request: SignInRequest) -> AuthResult<SignInResult> {
        let email = Self::normalize_email(&request.email);
        let profile = Self::find_by_email(&self.db, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !Self::verify_password(&request.password, &profile.password_hash)? {
            debug!("Rejected password for {}", email);
            return Err(AuthError::InvalidCredentials);
        }

        if !profile.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        let token = Self::generate_session_token();
        let expires_at = Self::calculate_session_expiry(self.session_hours);
        sessions::ActiveModel::new(profile.id, token.clone(), expires_at)
            .insert(&self.db)
            .await?;

        let active: profiles::ActiveModel = profile.into();
        let profile = active.set_last_login().update(&self.db).await?;

        info!("Signed in {}", profile.email);
        Ok(SignInResult {
            token,
            expires_at,
            profile: profile.into(),
        })
    }

    /// Deactivate the session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> AuthResult<()> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.db)
            .await?;

        if let Some(session) = session {
            if session.is_active {
                let active: sessions::ActiveModel = session.into();
                active.deactivate().update(&self.db).await?;
                debug!("Session closed");
            }
        }

        Ok(())
    }

    /// Update name and email. The role is never changed here.
    pub async fn update_profile(
        &self,
        profile_id: i32,
        request: UpdateProfileRequest,
    ) -> AuthResult<profiles::Model> {
        let profile = profiles::Entity::find_by_id(profile_id)
            .one(&self.db)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let mut active: profiles::ActiveModel = profile.clone().into();

        if let Some(full_name) = request.full_name {
            Self::validate_full_name(&full_name)?;
            active.full_name = Set(full_name.trim().to_string());
        }

        if let Some(email) = request.email {
            let email = Self::normalize_email(&email);
            Self::validate_email(&email)?;
            if email != profile.email {
                if Self::find_by_email(&self.db, &email).await?.is_some() {
                    return Err(AuthError::UserAlreadyExists);
                }
                active.email = Set(email);
            }
        }

        Ok(active.set_updated_at().update(&self.db).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "demo123";
        let hash = AuthService::hash_password(password).unwrap();

        assert!(AuthService::verify_password(password, &hash).unwrap());
        assert!(!AuthService::verify_password("wrong1", &hash).unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            AuthService::hash_password("12345"),
            Err(AuthError::WeakPassword(_))
        ));
    }

    #[test]
    fn test_email_validation() {
        assert!(AuthService::validate_email("egresso@demo.com").is_ok());
        assert!(AuthService::validate_email("").is_err());
        assert!(AuthService::validate_email("invalid").is_err());
        assert!(AuthService::validate_email("@example.com").is_err());
        assert!(AuthService::validate_email("test@").is_err());
        assert!(AuthService::validate_email("test@example").is_err());
        assert!(AuthService::validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_full_name_validation() {
        assert!(AuthService::validate_full_name("Ana Costa").is_ok());
        assert!(AuthService::validate_full_name("   ").is_err());
    }

    #[test]
    fn test_session_expiry() {
        let future = AuthService::calculate_session_expiry(24);
        assert!(!AuthService::is_session_expired(future));
        assert!(AuthService::is_session_expired(Utc::now() - Duration::hours(1)));
    }

    #[test]
    fn test_initial_password_is_long_enough() {
        let password = AuthService::generate_initial_password();
        assert_eq!(password.len(), 10);
        assert!(AuthService::validate_password(&password).is_ok());
    }
}
