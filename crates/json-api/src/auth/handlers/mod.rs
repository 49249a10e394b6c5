//! Account handlers and the response shapes they share.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use folio_app::auth::{Address, TokenPair, User};

pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod me;
pub(crate) mod password;
pub(crate) mod profile;
pub(crate) mod refresh;
pub(crate) mod register;

/// Postal address payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressPayload {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl From<Address> for AddressPayload {
    fn from(address: Address) -> Self {
        Self {
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
        }
    }
}

impl From<AddressPayload> for Address {
    fn from(payload: AddressPayload) -> Self {
        Self {
            street: payload.street,
            city: payload.city,
            state: payload.state,
            zip_code: payload.zip_code,
            country: payload.country,
        }
    }
}

/// User profile projection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserResponse {
    /// The unique identifier of the user
    pub uuid: Uuid,

    pub name: String,

    pub email: String,

    /// `user` or `admin`
    pub role: String,

    pub address: Option<AddressPayload>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            uuid: user.uuid.into(),
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            address: user.address.map(Into::into),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.to_string(),
        }
    }
}

/// Access/refresh token pair issued to a session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TokensResponse {
    pub access_token: String,

    pub refresh_token: String,

    /// Access-token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh-token lifetime in seconds
    pub refresh_expires_in: i64,
}

impl From<TokenPair> for TokensResponse {
    fn from(tokens: TokenPair) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            access_expires_in: tokens.access_expires_in,
            refresh_expires_in: tokens.refresh_expires_in,
        }
    }
}
