/// Client-credentials token handling for the Spotify Web API
///
/// The cache holds a single credential shared by every request. Refresh is lazy: the
/// first caller that observes an expired (or missing) credential fetches a new one.
/// Concurrent callers may race past the expiry check and refresh more than once; the
/// last write wins and the extra refresh is harmless.
use chrono::{DateTime, Duration, Utc};
use reqwest::Client as HttpClient;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::SpotifyTokenResponse,
};

/// Provider access credential
#[derive(Debug, Clone, PartialEq)]
pub struct AccessCredential {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessCredential {
    /// Builds a credential from a token response received at `issued_at`
    pub fn from_response(
        response: SpotifyTokenResponse,
        issued_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        if response.access_token.is_empty() || response.token_type.is_empty() {
            return Err(AppError::ProviderAuth(
                "Token response missing access token or token type".to_string(),
            ));
        }

        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::ProviderAuth(format!("Invalid token lifetime: {}", response.expires_in))
            })?;

        Ok(Self {
            token: response.access_token,
            token_type: response.token_type,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Source of fresh credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    async fn request_token(&self) -> AppResult<SpotifyTokenResponse>;
}

/// Client-credentials grant against the accounts token endpoint
pub struct ClientCredentialsSource {
    http_client: HttpClient,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl ClientCredentialsSource {
    pub fn new(
        http_client: HttpClient,
        token_url: String,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http_client,
            token_url,
            client_id,
            client_secret,
        }
    }
}

#[async_trait::async_trait]
impl TokenSource for ClientCredentialsSource {
    async fn request_token(&self) -> AppResult<SpotifyTokenResponse> {
        let response = self
            .http_client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token request to Spotify failed");
                AppError::ProviderAuth(format!("Token request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, "Spotify token endpoint rejected request");
            return Err(AppError::ProviderAuth(format!(
                "Token endpoint returned status {}: {}",
                status, body
            )));
        }

        response.json::<SpotifyTokenResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse Spotify token response");
            AppError::ProviderAuth(format!("Failed to parse token response: {}", e))
        })
    }
}

/// Lazily refreshed holder of the provider credential
pub struct TokenCache {
    source: Box<dyn TokenSource>,
    credential: RwLock<Option<AccessCredential>>,
}

impl TokenCache {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            credential: RwLock::new(None),
        }
    }

    /// Creates a cache that starts out holding `credential`
    pub fn with_credential(
        source: impl TokenSource + 'static,
        credential: AccessCredential,
    ) -> Self {
        Self {
            source: Box::new(source),
            credential: RwLock::new(Some(credential)),
        }
    }

    /// Returns `(token, token_type)`, refreshing first if the held credential is
    /// missing or expired
    pub async fn credential(&self) -> AppResult<(String, String)> {
        {
            let guard = self.credential.read().await;
            if let Some(credential) = guard.as_ref() {
                if !credential.is_expired_at(Utc::now()) {
                    return Ok((credential.token.clone(), credential.token_type.clone()));
                }
            }
        }

        let refreshed = self.refresh().await?;
        let pair = (refreshed.token.clone(), refreshed.token_type.clone());
        *self.credential.write().await = Some(refreshed);

        Ok(pair)
    }

    async fn refresh(&self) -> AppResult<AccessCredential> {
        tracing::debug!("Refreshing Spotify access token");

        let issued_at = Utc::now();
        let response = self.source.request_token().await?;
        let credential = AccessCredential::from_response(response, issued_at)?;

        tracing::info!(expires_at = %credential.expires_at, "Spotify access token refreshed");

        Ok(credential)
    }
}
