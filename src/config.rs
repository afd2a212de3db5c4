use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::connection::DEFAULT_DATABASE;

pub const DEMO_MODE_ENV: &str = "ALUMNI_DEMO_MODE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: 3000,
            database: DEFAULT_DATABASE.to_string(),
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSection {
    pub session_hours: i64,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self { session_hours: 24 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InstitutionSection {
    pub name: String,
}

impl Default for InstitutionSection {
    fn default() -> Self {
        Self {
            name: "Universidade do Estado de Minas Gerais".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub auth: AuthSection,
    pub demo_mode: bool,
    pub institution: InstitutionSection,
}

/// Values given on the command line; each one wins over the file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub database: Option<String>,
    pub cors_origin: Option<String>,
    pub demo: bool,
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(content)?;
        if config.auth.session_hours <= 0 {
            anyhow::bail!("auth.session_hours must be positive");
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// File (if any), then the demo-mode environment variable, then CLI flags
    pub fn resolve(path: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if env_flag(std::env::var(DEMO_MODE_ENV).ok().as_deref()) {
            config.demo_mode = true;
        }
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(database) = overrides.database {
            self.server.database = database;
        }
        if overrides.cors_origin.is_some() {
            self.server.cors_origin = overrides.cors_origin;
        }
        if overrides.demo {
            self.demo_mode = true;
        }
    }
}

fn env_flag(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization() {
        let yaml = r#"
server:
  port: 8080
  database: "egressos.db"
auth:
  session_hours: 12
demo_mode: true
institution:
  name: "UEMG"
"#;

        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.database, "egressos.db");
        assert_eq!(config.server.cors_origin, None);
        assert_eq!(config.auth.session_hours, 12);
        assert!(config.demo_mode);
        assert_eq!(config.institution.name, "UEMG");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AppConfig::from_yaml("demo_mode: false\n").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.auth.session_hours, 24);
    }

    #[test]
    fn test_rejects_non_positive_session_hours() {
        assert!(AppConfig::from_yaml("auth:\n  session_hours: 0\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = AppConfig::from_yaml("server:\n  port: 8080\n").unwrap();
        config.apply(CliOverrides {
            port: Some(9000),
            cors_origin: Some("http://localhost:5173".to_string()),
            ..Default::default()
        });
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.database, DEFAULT_DATABASE);
        assert_eq!(config.server.cors_origin.as_deref(), Some("http://localhost:5173"));
        assert!(!config.demo_mode);
    }

    #[test]
    fn test_env_flag_values() {
        assert!(env_flag(Some("true")));
        assert!(env_flag(Some(" 1 ")));
        assert!(!env_flag(Some("0")));
        assert!(!env_flag(None));
    }

    #[test]
    fn test_serialization() {
        let yaml = serde_yaml::to_string(&AppConfig::default()).unwrap();
        assert!(yaml.contains("session_hours: 24"));
    }
}
