use std::{error::Error, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::{
    compose::{check_base_url, compose_url},
    config::{Environment, LoginConfig},
    error::LoginError,
    payload::encode_payload,
    token::{sign_token, unix_now},
    types::ClaimsInput,
    validate::{validate_date, validate_identity},
};

/// Validate the identity and birthdate, then build the signed login URL.
///
/// Reads the system clock once for the token's issue time.
pub fn issue_login_url(
    base_url: &str,
    raw_id: &str,
    raw_birthdate: &str,
    secret: &[u8],
    expiration_seconds: u64,
) -> Result<String, LoginError> {
    issue_login_url_at(
        base_url,
        raw_id,
        raw_birthdate,
        secret,
        expiration_seconds,
        unix_now(),
    )
}

/// Same as [`issue_login_url`], with the issue time supplied by the caller.
#[instrument(level = "debug", skip(raw_id, raw_birthdate, secret))]
pub fn issue_login_url_at(
    base_url: &str,
    raw_id: &str,
    raw_birthdate: &str,
    secret: &[u8],
    expiration_seconds: u64,
    now: u64,
) -> Result<String, LoginError> {
    let cpf = validate_identity(raw_id)?;
    let birthdate = validate_date(raw_birthdate)?;

    if secret.is_empty() {
        return Err(LoginError::EmptySecret);
    }
    check_base_url(base_url)?;

    let payload = encode_payload(&cpf, &birthdate)?;
    let token = sign_token(&ClaimsInput::login(expiration_seconds), secret, now)?;

    debug!(cpf = %cpf.masked(), iat = now, expiration_seconds, "issued login token");

    compose_url(base_url, &payload, &token)
}

#[async_trait]
pub trait ConfigStore: Send + Sync + 'static {
    /// Retrieve the stored configuration, or `None` if nothing has been saved yet.
    async fn load_config(&self) -> Result<Option<LoginConfig>, Box<dyn Error + Send + Sync>>;

    /// Replace the stored configuration.
    async fn save_config(
        &mut self,
        config: &LoginConfig,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConfigStore {
    config: Option<LoginConfig>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoginConfig) -> Self {
        Self {
            config: Some(config),
        }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn load_config(&self) -> Result<Option<LoginConfig>, Box<dyn Error + Send + Sync>> {
        Ok(self.config.clone())
    }

    async fn save_config(
        &mut self,
        config: &LoginConfig,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.config = Some(config.clone());
        Ok(())
    }
}

/// One request to generate a login URL: which environment, and for whom.
#[derive(Debug, Clone, Default)]
pub struct LoginContext {
    pub environment: Environment,
    pub cpf: String,
    pub birthdate: String,
}

/// Issues login URLs using settings kept in a [`ConfigStore`], and remembers
/// the last identity a URL was issued for.
#[derive(Clone)]
pub struct LoginUrlIssuer {
    store: Arc<Mutex<dyn ConfigStore>>,
}

impl LoginUrlIssuer {
    pub fn new(store: Arc<Mutex<dyn ConfigStore>>) -> Self {
        Self { store }
    }

    /// The stored configuration. The defaults are saved and returned when the
    /// store is empty.
    pub async fn config(&self) -> Result<LoginConfig, LoginError> {
        let mut store = self.store.lock().await;

        load_or_seed(&mut *store).await
    }

    pub async fn save_config(&self, config: &LoginConfig) -> Result<(), LoginError> {
        config.validate()?;

        self.store.lock().await.save_config(config).await?;

        info!("configuration saved");
        Ok(())
    }

    pub async fn reset_config(&self) -> Result<(), LoginError> {
        self.store
            .lock()
            .await
            .save_config(&LoginConfig::default())
            .await?;

        info!("configuration reset to defaults");
        Ok(())
    }

    #[instrument(skip(self, context), fields(environment = %context.environment))]
    pub async fn generate(&self, context: &LoginContext) -> Result<String, LoginError> {
        // held until the last identity is saved
        let mut store = self.store.lock().await;
        let mut config = load_or_seed(&mut *store).await?;

        let cpf = validate_identity(context.cpf.trim())?;
        let birthdate = validate_date(context.birthdate.trim())?;

        if !config.has_secret() {
            warn!("refusing to issue a login URL without a secret");
            return Err(LoginError::EmptySecret);
        }

        let base_url = config.environments.url(context.environment);
        if base_url.is_empty() {
            return Err(LoginError::MissingEnvironmentUrl {
                environment: context.environment,
            });
        }

        let url = issue_login_url(
            base_url,
            cpf.as_str(),
            birthdate.as_str(),
            config.secret.as_bytes(),
            config.jwt_expiration,
        )?;

        config.last_cpf = cpf.to_string();
        config.last_birthdate = birthdate.to_string();
        store.save_config(&config).await?;

        info!(cpf = %cpf.masked(), "login URL generated");
        Ok(url)
    }
}

async fn load_or_seed<S: ConfigStore + ?Sized>(
    store: &mut S,
) -> Result<LoginConfig, LoginError> {
    if let Some(config) = store.load_config().await? {
        return Ok(config);
    }

    let config = LoginConfig::default();
    store.save_config(&config).await?;

    Ok(config)
}
