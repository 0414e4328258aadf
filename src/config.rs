use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{error::ConfigError, validate::validate_date};

pub const MIN_EXPIRATION_SECONDS: u64 = 60;
pub const MAX_EXPIRATION_SECONDS: u64 = 3600;

const DEFAULT_ENVIRONMENT_URL: &str = "https://PATH.PORTAL.com.br/#/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Environment {
    #[default]
    Sit,
    Hlg,
    Prd,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Sit, Environment::Hlg, Environment::Prd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sit => "SIT",
            Environment::Hlg => "HLG",
            Environment::Prd => "PRD",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown environment {0:?}, expected SIT, HLG or PRD")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|env| env.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEnvironment(s.to_string()))
    }
}

/// Base URL of the portal in each environment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Environments {
    pub sit: String,
    pub hlg: String,
    pub prd: String,
}

impl Environments {
    pub fn url(&self, environment: Environment) -> &str {
        match environment {
            Environment::Sit => &self.sit,
            Environment::Hlg => &self.hlg,
            Environment::Prd => &self.prd,
        }
    }
}

impl Default for Environments {
    fn default() -> Self {
        Self {
            sit: DEFAULT_ENVIRONMENT_URL.into(),
            hlg: DEFAULT_ENVIRONMENT_URL.into(),
            prd: DEFAULT_ENVIRONMENT_URL.into(),
        }
    }
}

/// The persisted settings behind login URL generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginConfig {
    /// The secret used to sign login tokens. May be stored empty, but no URL
    /// can be generated until it is set.
    pub secret: String,
    /// Birthdate offered when no birthdate has been used yet.
    pub birthdate: String,
    pub environments: Environments,
    /// Token lifetime in seconds, between 60 and 3600.
    pub jwt_expiration: u64,
    #[serde(rename = "lastCPF")]
    pub last_cpf: String,
    pub last_birthdate: String,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            birthdate: "10/10/2020".into(),
            environments: Environments::default(),
            jwt_expiration: 300,
            last_cpf: String::new(),
            last_birthdate: String::new(),
        }
    }
}

impl LoginConfig {
    /// Check the fields an operator edits before the configuration is saved.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_date(&self.birthdate)
            .map_err(|source| ConfigError::DefaultBirthdate { source })?;

        if !(MIN_EXPIRATION_SECONDS..=MAX_EXPIRATION_SECONDS).contains(&self.jwt_expiration) {
            return Err(ConfigError::ExpirationOutOfRange {
                seconds: self.jwt_expiration,
            });
        }

        for environment in Environment::ALL {
            Url::parse(self.environments.url(environment))
                .map_err(|source| ConfigError::EnvironmentUrl {
                    environment,
                    source,
                })?;
        }

        Ok(())
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.trim().is_empty()
    }

    /// The birthdate to prefill: the last one used, else the configured default.
    pub fn initial_birthdate(&self) -> &str {
        if self.last_birthdate.is_empty() {
            &self.birthdate
        } else {
            &self.last_birthdate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = LoginConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.has_secret());
        assert_eq!(config.initial_birthdate(), "10/10/2020");
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let value = serde_json::to_value(LoginConfig::default()).unwrap();

        assert_eq!(value["jwtExpiration"], 300);
        assert_eq!(value["lastCPF"], "");
        assert_eq!(value["lastBirthdate"], "");
        assert_eq!(value["environments"]["SIT"], DEFAULT_ENVIRONMENT_URL);
    }

    #[test]
    fn fills_missing_fields_with_defaults() {
        let config: LoginConfig =
            serde_json::from_str(r#"{"secret":"s3cr3t","jwtExpiration":120}"#).unwrap();

        assert_eq!(config.secret, "s3cr3t");
        assert_eq!(config.jwt_expiration, 120);
        assert_eq!(config.birthdate, "10/10/2020");
        assert_eq!(config.environments, Environments::default());
    }

    #[test]
    fn rejects_expiration_outside_bounds() {
        for seconds in [0, 59, 3601] {
            let config = LoginConfig {
                jwt_expiration: seconds,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::ExpirationOutOfRange { seconds: s }) if s == seconds
            ));
        }

        for seconds in [60, 3600] {
            let config = LoginConfig {
                jwt_expiration: seconds,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn rejects_bad_environment_url() {
        let mut config = LoginConfig::default();
        config.environments.prd = "not a url".into();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::EnvironmentUrl {
                environment: Environment::Prd,
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_default_birthdate() {
        let config = LoginConfig {
            birthdate: "31/04/2020".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DefaultBirthdate { .. })
        ));
    }

    #[test]
    fn whitespace_secret_is_not_a_secret() {
        let config = LoginConfig {
            secret: "   ".into(),
            ..Default::default()
        };
        assert!(!config.has_secret());
    }

    #[test]
    fn prefers_last_birthdate() {
        let config = LoginConfig {
            last_birthdate: "01/01/1990".into(),
            ..Default::default()
        };
        assert_eq!(config.initial_birthdate(), "01/01/1990");
    }

    #[test]
    fn parses_environment_names() {
        assert_eq!("hlg".parse::<Environment>(), Ok(Environment::Hlg));
        assert_eq!("PRD".parse::<Environment>(), Ok(Environment::Prd));
        assert!("QA".parse::<Environment>().is_err());
    }
}
