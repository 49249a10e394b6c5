//! Auth service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{password::PasswordError, token::TokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("email is already registered")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Validation(String),

    #[error("password processing failed")]
    Password(#[from] PasswordError),

    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<TokenError> for AuthServiceError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired | TokenError::Invalid => Self::InvalidToken,
            TokenError::Encoding(source) => Self::Signing(source),
        }
    }
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(_) | None => Self::Sql(error),
        }
    }
}
