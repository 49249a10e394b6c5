//! Users and refresh-session repository

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::auth::models::{
    Address, NewUser, ProfileUpdate, RefreshSession, SessionUuid, User, UserRole, UserUuid,
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const GET_USER_AUTH_BY_EMAIL_SQL: &str = include_str!("sql/get_user_auth_by_email.sql");
const GET_PASSWORD_HASH_SQL: &str = include_str!("sql/get_password_hash.sql");
const UPDATE_PROFILE_SQL: &str = include_str!("sql/update_profile.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("sql/update_password.sql");
const SET_ROLE_SQL: &str = include_str!("sql/set_role.sql");
const LIST_USERS_SQL: &str = include_str!("sql/list_users.sql");
const COUNT_USERS_SQL: &str = include_str!("sql/count_users.sql");
const CREATE_SESSION_SQL: &str = include_str!("sql/create_session.sql");
const GET_SESSION_SQL: &str = include_str!("sql/get_session.sql");
const DELETE_SESSION_SQL: &str = include_str!("sql/delete_session.sql");
const DELETE_EXPIRED_SESSIONS_SQL: &str = include_str!("sql/delete_expired_sessions.sql");

/// A user row joined with its password hash, for credential checks.
#[derive(Debug, Clone)]
pub(crate) struct UserAuthRow {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_user(
        &self,
        uuid: UserUuid,
        new_user: &NewUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        query_as::<Postgres, User>(CREATE_USER_SQL)
            .bind(uuid.into_uuid())
            .bind(&new_user.name)
            .bind(&new_user.email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_user(&self, user: UserUuid) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn get_user_auth_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAuthRow>, sqlx::Error> {
        query_as::<Postgres, UserAuthRow>(GET_USER_AUTH_BY_EMAIL_SQL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn get_password_hash(
        &self,
        user: UserUuid,
    ) -> Result<Option<String>, sqlx::Error> {
        query_scalar(GET_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        user: UserUuid,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        let address = update.address.as_ref();

        query_as::<Postgres, User>(UPDATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(update.name.as_deref())
            .bind(address.is_some())
            .bind(address.map(|a| a.street.as_str()))
            .bind(address.map(|a| a.city.as_str()))
            .bind(address.map(|a| a.state.as_str()))
            .bind(address.map(|a| a.zip_code.as_str()))
            .bind(address.map(|a| a.country.as_str()))
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn update_password(
        &self,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn set_role(
        &self,
        user: UserUuid,
        role: UserRole,
    ) -> Result<Option<User>, sqlx::Error> {
        query_as::<Postgres, User>(SET_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.as_str())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn list_users(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        query_as::<Postgres, User>(LIST_USERS_SQL)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn count_users(&self) -> Result<i64, sqlx::Error> {
        query_scalar(COUNT_USERS_SQL).fetch_one(&self.pool).await
    }

    pub(crate) async fn create_session(
        &self,
        session: SessionUuid,
        user: UserUuid,
        expires_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_SESSION_SQL)
            .bind(session.into_uuid())
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_session(
        &self,
        session: SessionUuid,
    ) -> Result<Option<RefreshSession>, sqlx::Error> {
        query_as::<Postgres, RefreshSession>(GET_SESSION_SQL)
            .bind(session.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn delete_session(&self, session: SessionUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SESSION_SQL)
            .bind(session.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_expired_sessions(&self, user: UserUuid) -> Result<(), sqlx::Error> {
        query(DELETE_EXPIRED_SESSIONS_SQL)
            .bind(user.into_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn address_from_row(row: &PgRow) -> sqlx::Result<Option<Address>> {
    let street: Option<String> = row.try_get("street")?;
    let city: Option<String> = row.try_get("city")?;
    let state: Option<String> = row.try_get("state")?;
    let zip_code: Option<String> = row.try_get("zip_code")?;
    let country: Option<String> = row.try_get("country")?;

    Ok(
        match (street, city, state, zip_code, country) {
            (Some(street), Some(city), Some(state), Some(zip_code), Some(country)) => {
                Some(Address {
                    street,
                    city,
                    state,
                    zip_code,
                    country,
                })
            }
            _ => None,
        },
    )
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role_str: String = row.try_get("role")?;

        let role = UserRole::from_str(&role_str).map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
            address: address_from_row(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for UserAuthRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user: User::from_row(row)?,
            password_hash: row.try_get("password_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RefreshSession {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: SessionUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
