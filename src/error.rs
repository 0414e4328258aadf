use crate::config::Environment;

/// A rejected identity number or birthdate. Each message names the field at fault.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("CPF must contain exactly 11 digits, found {found}")]
    Length { found: usize },
    #[error("CPF is invalid: all digits are identical")]
    TrivialSequence,
    #[error("CPF is invalid: check digits do not match")]
    Checksum,
    #[error("birthdate must use the DD/MM/YYYY format")]
    DateFormat,
    #[error("birthdate is not a real calendar date")]
    Calendar,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("token expiration must be between 60 and 3600 seconds, got {seconds}")]
    ExpirationOutOfRange { seconds: u64 },
    #[error("default birthdate is invalid")]
    DefaultBirthdate {
        #[source]
        source: ValidationError,
    },
    #[error("URL for environment {environment} is invalid")]
    EnvironmentUrl {
        environment: Environment,
        #[source]
        source: url::ParseError,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("secret key is not configured")]
    EmptySecret,
    /// HMAC takes keys of any length, so this only mirrors the `Result`
    /// returned by `Mac::new_from_slice`.
    #[error("secret key cannot be used for HMAC-SHA256")]
    InvalidKey,
    #[error("token expiration of {seconds} seconds from {now} overflows the timestamp")]
    ExpirationOverflow { now: u64, seconds: u64 },
    #[error("base URL {url:?} is not a valid absolute URL")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("error serializing login data")]
    Encoding {
        #[from]
        source: serde_json::Error,
    },
    #[error("no URL configured for environment {environment}")]
    MissingEnvironmentUrl { environment: Environment },
    #[error("invalid configuration")]
    Config {
        #[from]
        source: ConfigError,
    },
    #[error("error during configuration store operation")]
    Store {
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_pass_through_unchanged() {
        let error = LoginError::from(ValidationError::Length { found: 9 });
        assert_eq!(
            error.to_string(),
            "CPF must contain exactly 11 digits, found 9"
        );
    }

    #[test]
    fn missing_environment_names_the_environment() {
        let error = LoginError::MissingEnvironmentUrl {
            environment: Environment::Hlg,
        };
        assert!(error.to_string().contains("HLG"));
    }
}
