use anyhow::{Result, anyhow, bail};
use jsonwebtoken::{
    DecodingKey, Validation, decode,
    jwk::{AlgorithmParameters, JwkSet},
};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc, time::Duration};

use crate::config::Config;
use crate::entity::user_profile;
use crate::mail::{DynMailClient, create_mail_client};
use crate::payment::razorpay::RazorpayClient;

pub type AppState = Arc<State>;

pub struct State {
    pub config: Config,
    pub db: DatabaseConnection,
    pub jwks: JwkSet,
    pub mail_client: Option<DynMailClient>,
    pub gateway_client: Option<RazorpayClient>,
    /// S3-backed media bucket, kept concrete for URL signing.
    pub media_store: Option<Arc<AmazonS3>>,
    /// Profile lookups keyed by subject, short TTL so admin grants land quickly.
    pub profile_cache: moka::sync::Cache<String, Arc<user_profile::Model>>,
    pub response_cache: moka::sync::Cache<String, Value>,
}

impl State {
    pub async fn new(config: Config) -> Result<Self> {
        let jwks = reqwest::get(&config.jwks_url)
            .await?
            .json::<JwkSet>()
            .await
            .map_err(|err| anyhow!("Failed to fetch JWKS from {}: {}", config.jwks_url, err))?;

        let mut opt = ConnectOptions::new(config.database_url.clone());
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(false);
        let db = Database::connect(opt).await?;

        let mail_client = if let Some(mail_config) = &config.mail {
            match create_mail_client(mail_config).await {
                Ok(client) => Some(client),
                Err(e) => {
                    tracing::warn!("Failed to initialize mail client: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let gateway_client = config
            .gateway
            .as_ref()
            .map(|gateway| RazorpayClient::new(gateway.clone()));

        let media_store: Option<Arc<AmazonS3>> = match &config.storage {
            Some(storage) => {
                let store = AmazonS3Builder::from_env()
                    .with_bucket_name(&storage.bucket)
                    .build()?;
                Some(Arc::new(store))
            }
            None => None,
        };

        Ok(Self {
            config,
            db,
            jwks,
            mail_client,
            gateway_client,
            media_store,
            profile_cache: moka::sync::Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(120))
                .build(),
            response_cache: moka::sync::Cache::builder()
                .max_capacity(64 * 1024 * 1024)
                .time_to_live(Duration::from_secs(60))
                .build(),
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<HashMap<String, Value>> {
        let header = jsonwebtoken::decode_header(token)?;
        let Some(kid) = header.kid else {
            return Err(anyhow!("Missing kid in token header"));
        };
        let Some(jwk) = self.jwks.find(&kid) else {
            return Err(anyhow!("JWK not found for kid: {}", kid));
        };
        let alg = decoding_key_for_algorithm(&jwk.algorithm)?;
        let mut validation = Validation::new(header.alg);
        validation.validate_aud = false;
        let decoded = decode::<HashMap<String, Value>>(token, &alg, &validation)?;
        Ok(decoded.claims)
    }

    pub fn get_profile(&self, sub: &str) -> Option<Arc<user_profile::Model>> {
        self.profile_cache.get(sub)
    }

    pub fn put_profile(&self, sub: &str, profile: Arc<user_profile::Model>) {
        self.profile_cache.insert(sub.to_string(), profile);
    }

    pub fn invalidate_profile(&self, sub: &str) {
        self.profile_cache.invalidate(sub);
    }

    pub fn get_cache<T>(&self, key: &str) -> Option<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.response_cache
            .get(key)
            .and_then(|json_value| serde_json::from_value(json_value).ok())
    }

    pub fn set_cache<T>(&self, key: String, value: T)
    where
        T: serde::Serialize,
    {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.response_cache.insert(key, json_value);
        }
    }
}

fn decoding_key_for_algorithm(alg: &AlgorithmParameters) -> Result<DecodingKey> {
    let key = match alg {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e),
        AlgorithmParameters::EllipticCurve(ec) => DecodingKey::from_ec_components(&ec.x, &ec.y),
        AlgorithmParameters::OctetKeyPair(octet) => DecodingKey::from_ed_components(&octet.x),
        _ => bail!("Unsupported algorithm"),
    }?;
    Ok(key)
}
