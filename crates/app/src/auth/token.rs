//! Access and refresh JWT minting and verification.

use jiff::Timestamp;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::models::{SessionUuid, TokenPair, UserRole, UserUuid};

/// `kind` claim value for access tokens.
pub const ACCESS_TOKEN_KIND: &str = "access";

/// `kind` claim value for refresh tokens.
pub const REFRESH_TOKEN_KIND: &str = "refresh";

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC secret for HS256 signing.
    pub secret: String,

    /// Access-token lifetime in seconds.
    pub access_ttl_secs: i64,

    /// Refresh-token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid,

    #[error("token encoding failed")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid,
        }
    }
}

/// Claims carried by a short-lived access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub role: String,
    pub kind: String,
    pub iat: i64,
    pub exp: i64,
}

/// Claims carried by a long-lived refresh token. `jti` keys the session row
/// that makes the token revocable independently of other sessions.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: Uuid,
    pub jti: Uuid,
    pub kind: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies the two token kinds with a shared HS256 secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl TokenSigner {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    /// Sign an access token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn sign_access(&self, user: UserUuid, role: UserRole) -> Result<String, TokenError> {
        let now = Timestamp::now().as_second();

        let claims = AccessClaims {
            sub: user.into_uuid(),
            role: role.as_str().to_string(),
            kind: ACCESS_TOKEN_KIND.to_string(),
            iat: now,
            exp: now + self.access_ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Sign a refresh token bound to the given session.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn sign_refresh(&self, user: UserUuid, session: SessionUuid) -> Result<String, TokenError> {
        let now = Timestamp::now().as_second();

        let claims = RefreshClaims {
            sub: user.into_uuid(),
            jti: session.into_uuid(),
            kind: REFRESH_TOKEN_KIND.to_string(),
            iat: now,
            exp: now + self.refresh_ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Verify an access token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is expired, malformed, or is not an
    /// access token.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let data: TokenData<AccessClaims> = decode(token, &self.decoding_key, &self.validation)?;

        if data.claims.kind != ACCESS_TOKEN_KIND {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }

    /// Verify a refresh token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is expired, malformed, or is not a
    /// refresh token.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let data: TokenData<RefreshClaims> = decode(token, &self.decoding_key, &self.validation)?;

        if data.claims.kind != REFRESH_TOKEN_KIND {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims)
    }

    /// Sign a fresh access + refresh pair for one session.
    ///
    /// # Errors
    ///
    /// Returns an error if either token fails to encode.
    pub fn issue_pair(
        &self,
        user: UserUuid,
        role: UserRole,
        session: SessionUuid,
    ) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign_access(user, role)?,
            refresh_token: self.sign_refresh(user, session)?,
            access_expires_in: self.access_ttl_secs,
            refresh_expires_in: self.refresh_ttl_secs,
        })
    }

    /// Refresh-token lifetime, for computing session expiry rows.
    #[must_use]
    pub const fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }
}
