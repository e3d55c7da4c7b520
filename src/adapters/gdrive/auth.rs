//! Google OAuth for the Drive client
//!
//! A service account signs an RS256 assertion which is exchanged at the
//! token endpoint for a bearer token. The token is cached and refreshed a
//! minute before it expires.

use super::models::TokenResponse;
use crate::config::{GoogleCredentials, SecretString};
use crate::domain::{DriveError, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Serialize;
use tokio::sync::Mutex;

/// OAuth scope for full Drive access
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Service account credentials plus the token cache
pub struct ServiceAccount {
    client_email: String,
    private_key: SecretString,
    private_key_id: Option<String>,
    token_uri: String,
    cache: Mutex<Option<CachedToken>>,
}

impl ServiceAccount {
    fn assertion(&self, now: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            iss: &self.client_email,
            scope: DRIVE_SCOPE,
            aud: &self.token_uri,
            iat: now.timestamp(),
            exp: now.timestamp() + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        // Keys pasted from JSON key files often carry literal "\n"
        let pem = self.private_key.expose_secret().as_str().replace("\\n", "\n");
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| DriveError::Authentication(format!("Invalid private key: {e}")))?;

        encode(&header, &claims, &key)
            .map_err(|e| DriveError::Authentication(format!("Failed to sign assertion: {e}")).into())
    }

    async fn exchange(&self, http: &Client) -> Result<CachedToken> {
        let now = Utc::now();
        let assertion = self.assertion(now)?;

        let response = http
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| DriveError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Authentication(format!(
                "Token exchange failed with status {status}: {body}"
            ))
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::InvalidResponse(format!("Token response: {e}")))?;

        let lifetime = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        tracing::debug!(expires_in = lifetime, "Obtained Google access token");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: now + Duration::seconds(lifetime),
        })
    }
}

/// Where bearer tokens come from
pub enum TokenSource {
    /// Pre-issued token used as-is
    Static(SecretString),
    /// Service account JWT exchange
    ServiceAccount(ServiceAccount),
}

impl TokenSource {
    /// Pick the token source described by the credentials
    ///
    /// A configured `access_token` wins over the service account.
    ///
    /// # Errors
    ///
    /// Returns an error if neither a token nor a complete service account is present
    pub fn from_credentials(credentials: &GoogleCredentials) -> Result<Self> {
        if let Some(token) = &credentials.access_token {
            return Ok(TokenSource::Static(token.clone()));
        }

        let private_key = credentials.private_key.clone().ok_or_else(|| {
            DriveError::Authentication("Service account private key is missing".to_string())
        })?;

        if credentials.client_email.is_empty() {
            return Err(
                DriveError::Authentication("Service account email is missing".to_string()).into(),
            );
        }

        Ok(TokenSource::ServiceAccount(ServiceAccount {
            client_email: credentials.client_email.clone(),
            private_key,
            private_key_id: credentials.private_key_id.clone(),
            token_uri: credentials.token_uri.clone(),
            cache: Mutex::new(None),
        }))
    }

    /// Current bearer token, refreshing a service account token when needed
    ///
    /// # Errors
    ///
    /// Returns an error if signing or the token exchange fails
    pub async fn bearer(&self, http: &Client) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.expose_secret().as_str().to_owned()),
            TokenSource::ServiceAccount(account) => {
                let mut cache = account.cache.lock().await;
                if let Some(cached) = cache.as_ref() {
                    if cached.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > Utc::now() {
                        return Ok(cached.token.clone());
                    }
                }

                let fresh = account.exchange(http).await?;
                let token = fresh.token.clone();
                *cache = Some(fresh);
                Ok(token)
            }
        }
    }
}
