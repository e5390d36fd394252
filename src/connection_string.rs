use std::collections::HashMap;

use aws_config::{defaults, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use thiserror::Error;

const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionStringError {
    #[error("connection string is empty")]
    Empty,
    #[error("malformed segment `{0}`, expected Key=Value")]
    Malformed(String),
    #[error("connection string is missing `{0}`")]
    MissingKey(&'static str),
}

/// Client settings parsed from a `Key=Value;Key=Value` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, ConnectionStringError> {
        let mut pairs: HashMap<String, String> = HashMap::new();
        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // values may themselves contain '=' (base64 secrets), split once
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| ConnectionStringError::Malformed(segment.to_string()))?;
            pairs.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }
        if pairs.is_empty() {
            return Err(ConnectionStringError::Empty);
        }

        let mut take = |key: &'static str| pairs.remove(&key.to_ascii_lowercase());

        let endpoint = take("Endpoint").filter(|v| !v.is_empty());
        let access_key_id =
            take("AccessKeyId").ok_or(ConnectionStringError::MissingKey("AccessKeyId"))?;
        let secret_access_key =
            take("SecretAccessKey").ok_or(ConnectionStringError::MissingKey("SecretAccessKey"))?;
        let region = take("Region")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.into());

        Ok(Self {
            endpoint,
            access_key_id,
            secret_access_key,
            region,
        })
    }

    /// Shared AWS SDK config with static credentials and the optional endpoint override.
    pub async fn sdk_config(&self) -> SdkConfig {
        let mut loader = defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .credentials_provider(Credentials::new(
                &self.access_key_id,
                &self.secret_access_key,
                None,
                None,
                "static",
            ));
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        loader.load().await
    }
}
