//! Role-based navigation and the layout shell payload.

use serde::{Deserialize, Serialize};

use crate::auth::Role;
use crate::services::auth_service::ProfileView;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub name: String,
    pub href: String,
}

impl NavItem {
    fn new(name: &str, href: &str) -> Self {
        Self {
            name: name.to_string(),
            href: href.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub role_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    pub institution: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub header: Header,
    pub navigation: Vec<NavItem>,
    pub footer: Footer,
}

/// Menu entries for a role, Dashboard first
pub fn navigation(role: Role) -> Vec<NavItem> {
    let mut items = vec![NavItem::new("Dashboard", "/dashboard")];

    let extra: &[(&str, &str)] = match role {
        Role::Alumnus => &[
            ("Meu Perfil", "/perfil"),
            ("Pesquisas", "/pesquisas"),
            ("Eventos", "/eventos"),
        ],
        Role::Coordination => &[
            ("Egressos", "/egressos"),
            ("Relatórios", "/relatorios"),
            ("Pesquisas", "/pesquisas"),
            ("Eventos", "/eventos"),
        ],
        Role::Registrar => &[
            ("Cadastrar Egressos", "/cadastro-egressos"),
            ("Cadastrar Coordenadores", "/cadastro-coordenadores"),
            ("Egressos", "/egressos"),
            ("Relatórios", "/relatorios"),
            ("Pesquisas", "/pesquisas"),
            ("Eventos", "/eventos"),
        ],
        Role::Professor => &[("Egressos", "/egressos"), ("Pesquisas", "/pesquisas")],
        Role::Administration => &[
            ("Cadastrar Egressos", "/cadastro-egressos"),
            ("Egressos", "/egressos"),
            ("Relatórios", "/relatorios"),
            ("Pesquisas", "/pesquisas"),
            ("Eventos", "/eventos"),
            ("Configurações", "/configuracoes"),
        ],
    };

    items.extend(extra.iter().map(|(name, href)| NavItem::new(name, href)));
    items
}

pub fn shell(profile: &ProfileView, role: Role, institution: &str) -> Shell {
    Shell {
        header: Header {
            name: profile.full_name.clone(),
            email: profile.email.clone(),
            role,
            role_label: role.label().to_string(),
        },
        navigation: navigation(role),
        footer: Footer {
            institution: institution.to_string(),
            version: VERSION.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(role: Role) -> Vec<String> {
        navigation(role).into_iter().map(|i| i.name).collect()
    }

    #[test]
    fn test_every_role_starts_with_dashboard() {
        for role in Role::ALL {
            assert_eq!(navigation(role)[0].href, "/dashboard");
        }
    }

    #[test]
    fn test_alumnus_menu() {
        assert_eq!(names(Role::Alumnus), vec!["Dashboard", "Meu Perfil", "Pesquisas", "Eventos"]);
    }

    #[test]
    fn test_only_registrar_registers_coordinators() {
        for role in Role::ALL {
            let has = navigation(role)
                .iter()
                .any(|i| i.href == "/cadastro-coordenadores");
            assert_eq!(has, role == Role::Registrar);
        }
    }

    #[test]
    fn test_professor_menu_is_short() {
        assert_eq!(names(Role::Professor), vec!["Dashboard", "Egressos", "Pesquisas"]);
        assert!(names(Role::Administration).contains(&"Configurações".to_string()));
    }
}
