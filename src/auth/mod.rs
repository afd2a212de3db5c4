//! Roles, the calling actor and the role permission matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, CoreError};

/// Account role. Stored in `profiles.role` using the Portuguese identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "egresso")]
    Alumnus,
    #[serde(rename = "coordenacao")]
    Coordination,
    #[serde(rename = "secretaria")]
    Registrar,
    #[serde(rename = "professor")]
    Professor,
    #[serde(rename = "administracao")]
    Administration,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Alumnus,
        Role::Coordination,
        Role::Registrar,
        Role::Professor,
        Role::Administration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Alumnus => "egresso",
            Role::Coordination => "coordenacao",
            Role::Registrar => "secretaria",
            Role::Professor => "professor",
            Role::Administration => "administracao",
        }
    }

    /// Human-readable label shown in the header
    pub fn label(&self) -> &'static str {
        match self {
            Role::Alumnus => "Egresso",
            Role::Coordination => "Coordenação",
            Role::Registrar => "Secretaria",
            Role::Professor => "Professor",
            Role::Administration => "Administração",
        }
    }

    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Alumnus)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| AuthError::InvalidRole(s.to_string()))
    }
}

/// Protected actions checked by the [`Authorizer`].
pub mod actions {
    pub const PROFILE_SELF: &str = "profile:self";
    pub const ALUMNI_READ: &str = "alumni:read";
    pub const ALUMNI_WRITE: &str = "alumni:write";
    pub const COORDINATORS_WRITE: &str = "coordinators:write";
    pub const SURVEYS_AUTHOR: &str = "surveys:author";
    pub const SURVEYS_RESPOND: &str = "surveys:respond";
    pub const SURVEYS_READ_STAFF: &str = "surveys:read-staff";
    pub const EVENTS_REGISTER: &str = "events:register";
    pub const EVENTS_RATE: &str = "events:rate";
    pub const EVENTS_MANAGE: &str = "events:manage";
    pub const REPORTS_READ: &str = "reports:read";
    pub const FEEDBACK_MANAGE: &str = "feedback:manage";
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Actor {
    pub profile_id: Option<i32>,
    role: Option<Role>,
    is_system: bool,
}

impl Actor {
    pub fn user(profile_id: i32, role: Role) -> Self {
        Self {
            profile_id: Some(profile_id),
            role: Some(role),
            is_system: false,
        }
    }

    /// Actor used by CLI commands and seeding; passes every check
    pub fn system() -> Self {
        Self {
            profile_id: None,
            role: None,
            is_system: true,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }
}

pub trait Authorizer {
    fn authorize(&self, actor: &Actor, action: &str) -> Result<(), CoreError>;
}

/// Static role → action matrix
#[derive(Clone, Copy, Debug, Default)]
pub struct RoleAuthorizer;

impl RoleAuthorizer {
    pub fn allowed_roles(action: &str) -> &'static [Role] {
        use actions::*;
        use Role::*;

        match action {
            PROFILE_SELF | SURVEYS_RESPOND | EVENTS_REGISTER | EVENTS_RATE => &[Alumnus],
            ALUMNI_READ | SURVEYS_READ_STAFF => {
                &[Coordination, Registrar, Professor, Administration]
            }
            ALUMNI_WRITE => &[Registrar, Administration],
            COORDINATORS_WRITE => &[Registrar],
            SURVEYS_AUTHOR | EVENTS_MANAGE | REPORTS_READ => {
                &[Coordination, Registrar, Administration]
            }
            FEEDBACK_MANAGE => &[Coordination, Administration],
            _ => &[],
        }
    }
}

impl Authorizer for RoleAuthorizer {
    fn authorize(&self, actor: &Actor, action: &str) -> Result<(), CoreError> {
        if actor.is_system() {
            return Ok(());
        }

        let permitted = actor
            .role()
            .map(|role| Self::allowed_roles(action).contains(&role))
            .unwrap_or(false);

        if permitted {
            Ok(())
        } else {
            Err(AuthError::PermissionDenied(action.to_string()).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn test_role_round_trips_through_storage_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("aluno".parse::<Role>().is_err());
    }

    #[test]
    fn test_registrar_can_import_but_professor_cannot() {
        let authorizer = RoleAuthorizer;
        let registrar = Actor::user(1, Role::Registrar);
        let professor = Actor::user(2, Role::Professor);

        assert!(authorizer.authorize(&registrar, actions::ALUMNI_WRITE).is_ok());
        let err = authorizer
            .authorize(&professor, actions::ALUMNI_WRITE)
            .unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Forbidden);
    }

    #[test]
    fn test_only_alumni_respond_to_surveys() {
        let authorizer = RoleAuthorizer;
        assert!(authorizer
            .authorize(&Actor::user(1, Role::Alumnus), actions::SURVEYS_RESPOND)
            .is_ok());
        assert!(authorizer
            .authorize(&Actor::user(2, Role::Coordination), actions::SURVEYS_RESPOND)
            .is_err());
    }

    #[test]
    fn test_system_actor_passes_every_check() {
        assert!(RoleAuthorizer
            .authorize(&Actor::system(), actions::COORDINATORS_WRITE)
            .is_ok());
    }

    #[test]
    fn test_unknown_action_is_denied() {
        assert!(RoleAuthorizer
            .authorize(&Actor::user(1, Role::Administration), "nuke:all")
            .is_err());
    }
}
