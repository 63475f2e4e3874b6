//! Access-token acquisition and claim decoding
//!
//! The identity provider owns the token protocol; the console consumes a
//! single capability — "give me a currently valid bearer token" — and
//! refreshes ahead of expiry. Decoded claims only gate which write
//! affordances are shown; the server enforces authorization on its own.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::config::AuthConfig;
use crate::error::{AppError, AppResult};

/// Refresh this long before the token actually expires
const EXPIRY_LEEWAY_SECONDS: i64 = 60;

/// Token client against the identity provider's token endpoint
pub struct TokenClient {
    http: reqwest::Client,
    config: AuthConfig,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Token endpoint response (client-credentials grant)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: String,
    expires_in: i64,
}

#[derive(serde::Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    client_secret: &'a str,
    audience: &'a str,
}

impl TokenClient {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            cached: Mutex::new(None),
        }
    }

    /// A currently valid bearer token, fetched or silently refreshed as
    /// needed
    pub async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(EXPIRY_LEEWAY_SECONDS) > Utc::now() {
                return Ok(token.token.clone());
            }
        }

        tracing::debug!("requesting fresh access token");
        let response = self
            .http
            .post(&self.config.token_url)
            .json(&TokenRequest {
                grant_type: "client_credentials",
                client_id: &self.config.client_id,
                client_secret: &self.config.client_secret,
                audience: &self.config.audience,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("malformed token response: {e}")))?;
        let fresh = CachedToken {
            token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        };
        *cached = Some(fresh.clone());
        Ok(fresh.token)
    }
}

/// Claims the console reads out of the bearer token.
///
/// Roles and permissions live under a provider-specific namespace; both
/// arrays default to empty when the claim is absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(flatten)]
    extra: serde_json::Map<String, Value>,
}

impl Claims {
    /// Decode claims without verifying the signature. The console never
    /// enforces authorization; the server rejects unauthorized writes
    /// regardless of what the token claims.
    pub fn from_token(token: &str) -> AppResult<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| AppError::Auth(format!("could not decode token claims: {e}")))?;
        Ok(data.claims)
    }

    fn namespaced_array(&self, namespace: &str, claim: &str) -> Vec<String> {
        self.extra
            .get(&format!("{namespace}{claim}"))
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn roles(&self, namespace: &str) -> Vec<String> {
        self.namespaced_array(namespace, "roles")
    }

    pub fn permissions(&self, namespace: &str) -> Vec<String> {
        self.namespaced_array(namespace, "permissions")
    }

    /// Whether write affordances (create/edit/delete buttons) should be
    /// visible at all
    pub fn can_write(&self, namespace: &str) -> bool {
        let permissions = self.permissions(namespace);
        permissions.iter().any(|p| p.starts_with("write:"))
            || self.roles(namespace).iter().any(|r| r == "admin")
    }
}
