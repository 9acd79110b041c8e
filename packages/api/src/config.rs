//! Environment-supplied service configuration. There are no config
//! files; every external collaborator is wired through env vars.

use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// JWKS document of the hosted identity provider, fetched once at
    /// startup.
    pub jwks_url: String,
    pub frontend_url: String,
    pub mail: Option<MailConfig>,
    pub gateway: Option<GatewayConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Clone, Debug)]
pub struct MailConfig {
    pub from_email: String,
    pub from_name: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
}

/// Hosted-checkout payment gateway credentials.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: String,
}

#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub bucket: String,
    /// Public base URL the bucket is served from (CDN or direct).
    pub public_base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}")]
    InvalidValue(&'static str),
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var).map_err(|_| ConfigError::MissingVar(var))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let mail = match env::var("SMTP_HOST") {
            Ok(smtp_host) => Some(MailConfig {
                from_email: required("MAIL_FROM_EMAIL")?,
                from_name: env::var("MAIL_FROM_NAME").unwrap_or_else(|_| "Filigree".to_string()),
                smtp_host,
                smtp_port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "587".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("SMTP_PORT"))?,
                smtp_username: required("SMTP_USERNAME")?,
                smtp_password: required("SMTP_PASSWORD")?,
            }),
            Err(_) => None,
        };

        let gateway = match env::var("GATEWAY_KEY_ID") {
            Ok(key_id) => Some(GatewayConfig {
                key_id,
                key_secret: required("GATEWAY_KEY_SECRET")?,
                api_base: env::var("GATEWAY_API_BASE")
                    .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string()),
            }),
            Err(_) => None,
        };

        let storage = match env::var("MEDIA_BUCKET") {
            Ok(bucket) => Some(StorageConfig {
                public_base_url: env::var("MEDIA_PUBLIC_URL")
                    .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com")),
                bucket,
            }),
            Err(_) => None,
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            jwks_url: required("AUTH_JWKS_URL")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "https://filigree.example".to_string()),
            mail,
            gateway,
            storage,
        })
    }
}
