//! Auth Config

use clap::Args;
use folio_app::auth::TokenConfig;

/// Token signing settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC secret used to sign access and refresh tokens
    #[arg(long, env = "TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Access-token lifetime in seconds
    #[arg(long, env = "ACCESS_TOKEN_TTL_SECS", default_value = "900")]
    pub access_token_ttl_secs: i64,

    /// Refresh-token lifetime in seconds
    #[arg(long, env = "REFRESH_TOKEN_TTL_SECS", default_value = "604800")]
    pub refresh_token_ttl_secs: i64,
}

impl AuthConfig {
    /// Token configuration for the signing layer.
    #[must_use]
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.token_secret.clone(),
            access_ttl_secs: self.access_token_ttl_secs,
            refresh_ttl_secs: self.refresh_token_ttl_secs,
        }
    }
}
