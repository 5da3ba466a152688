use std::str::FromStr;

use chrono::Duration;
use config::Config;
use jsonwebtoken::Algorithm;
use serde::Deserialize;

use crate::core::error::ConfigError;

const ENV_PREFIX: &str = "WARDEN";

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Args {
    pub(crate) token_secret: String,
    pub(crate) jwt_algorithm: String,
    pub(crate) token_expire_hours: i64,
    pub(crate) guest_token_expire_hours: i64,
    pub(crate) auth_accounts: String,
    pub(crate) log_level: String,
    pub(crate) port: u16,
}

impl Args {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("jwt_algorithm", "HS256")?
            .set_default("token_expire_hours", 48)?
            .set_default("guest_token_expire_hours", 24)?
            .set_default("auth_accounts", "")?
            .set_default("log_level", "info")?
            .set_default("port", 9621)?
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(config.try_deserialize::<Args>()?)
    }
}

/// Signing settings for a [`crate::token::TokenAuthority`], fixed for the
/// lifetime of the process.
#[derive(Clone)]
pub struct AuthorityConfig {
    pub(crate) secret: String,
    pub(crate) algorithm: Algorithm,
    pub(crate) expire: Duration,
    pub(crate) guest_expire: Duration,
}

impl std::fmt::Debug for AuthorityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityConfig")
            .field("algorithm", &self.algorithm)
            .field("expire", &self.expire)
            .field("guest_expire", &self.guest_expire)
            .finish()
    }
}

impl AuthorityConfig {
    pub fn new(
        secret: impl Into<String>,
        algorithm: &str,
        expire_hours: i64,
        guest_expire_hours: i64,
    ) -> Result<Self, ConfigError> {
        let algorithm = Algorithm::from_str(algorithm.trim())
            .map_err(|_| ConfigError::Algorithm(algorithm.to_owned()))?;

        Ok(Self {
            secret: secret.into(),
            algorithm,
            expire: lifetime(expire_hours)?,
            guest_expire: lifetime(guest_expire_hours)?,
        })
    }
}

impl TryFrom<&Args> for AuthorityConfig {
    type Error = ConfigError;

    fn try_from(args: &Args) -> Result<Self, Self::Error> {
        AuthorityConfig::new(
            args.token_secret.clone(),
            &args.jwt_algorithm,
            args.token_expire_hours,
            args.guest_token_expire_hours,
        )
    }
}

fn lifetime(hours: i64) -> Result<Duration, ConfigError> {
    if hours <= 0 {
        return Err(ConfigError::Lifetime(hours));
    }

    Duration::try_hours(hours).ok_or(ConfigError::Lifetime(hours))
}
