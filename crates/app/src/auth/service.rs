//! Auth service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use sqlx::PgPool;

use crate::{
    auth::{
        errors::AuthServiceError,
        models::{
            AuthenticatedUser, Credentials, NewUser, ProfileUpdate, SessionUuid, TokenPair, User,
            UserRole, UserUuid,
        },
        password::{hash_password, verify_password},
        repository::PgUsersRepository,
        token::{TokenConfig, TokenSigner},
    },
    domain::pagination::{Page, Paginated},
};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgUsersRepository,
    signer: TokenSigner,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, tokens: &TokenConfig) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
            signer: TokenSigner::new(tokens),
        }
    }

    /// Create a user with the given role directly, bypassing registration.
    /// Used by the operational CLI to bootstrap admin accounts.
    ///
    /// # Errors
    ///
    /// Returns an error when validation, hashing, or insertion fails.
    pub async fn create_user_with_role(
        &self,
        new_user: NewUser,
        role: UserRole,
    ) -> Result<User, AuthServiceError> {
        validate_new_user(&new_user)?;

        let password_hash = hash_password(&new_user.password)?;

        let user = self
            .repository
            .create_user(UserUuid::new(), &new_user, &password_hash)
            .await?;

        if matches!(role, UserRole::Admin) {
            return self
                .repository
                .set_role(user.uuid, UserRole::Admin)
                .await?
                .ok_or(AuthServiceError::NotFound);
        }

        Ok(user)
    }

    async fn open_session(
        &self,
        user: UserUuid,
        role: UserRole,
    ) -> Result<TokenPair, AuthServiceError> {
        let session = SessionUuid::new();
        let expires_at =
            Timestamp::now() + SignedDuration::from_secs(self.signer.refresh_ttl_secs());

        self.repository
            .create_session(session, user, expires_at)
            .await?;

        Ok(self.signer.issue_pair(user, role, session)?)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn register(&self, new_user: NewUser) -> Result<(User, TokenPair), AuthServiceError> {
        validate_new_user(&new_user)?;

        let password_hash = hash_password(&new_user.password)?;

        let user = self
            .repository
            .create_user(UserUuid::new(), &new_user, &password_hash)
            .await?;

        let tokens = self.open_session(user.uuid, user.role).await?;

        Ok((user, tokens))
    }

    async fn login(&self, credentials: Credentials) -> Result<(User, TokenPair), AuthServiceError> {
        let row = self
            .repository
            .get_user_auth_by_email(&credentials.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &row.password_hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        // Opportunistic pruning keeps the session table bounded per user.
        self.repository
            .delete_expired_sessions(row.user.uuid)
            .await?;

        let tokens = self.open_session(row.user.uuid, row.user.role).await?;

        Ok((row.user, tokens))
    }

    async fn refresh(&self, refresh_token: String) -> Result<TokenPair, AuthServiceError> {
        let claims = self.signer.verify_refresh(&refresh_token)?;
        let session = SessionUuid::from_uuid(claims.jti);

        let record = self
            .repository
            .get_session(session)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        if record.user_uuid.into_uuid() != claims.sub || record.expires_at < Timestamp::now() {
            return Err(AuthServiceError::InvalidToken);
        }

        let user = self
            .repository
            .get_user(record.user_uuid)
            .await?
            .ok_or(AuthServiceError::InvalidToken)?;

        // Rotate: the presented session is spent, a new one replaces it.
        self.repository.delete_session(session).await?;

        self.open_session(user.uuid, user.role).await
    }

    async fn logout(&self, refresh_token: String) -> Result<(), AuthServiceError> {
        let claims = self.signer.verify_refresh(&refresh_token)?;

        // Removing one session leaves the user's other sessions valid.
        self.repository
            .delete_session(SessionUuid::from_uuid(claims.jti))
            .await?;

        Ok(())
    }

    async fn authenticate_access(
        &self,
        access_token: String,
    ) -> Result<AuthenticatedUser, AuthServiceError> {
        let claims = self.signer.verify_access(&access_token)?;

        let role = claims
            .role
            .parse()
            .map_err(|_| AuthServiceError::InvalidToken)?;

        Ok(AuthenticatedUser {
            uuid: UserUuid::from_uuid(claims.sub),
            role,
        })
    }

    async fn get_user(&self, user: UserUuid) -> Result<User, AuthServiceError> {
        self.repository
            .get_user(user)
            .await?
            .ok_or(AuthServiceError::NotFound)
    }

    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<User, AuthServiceError> {
        if let Some(name) = &update.name
            && name.trim().is_empty()
        {
            return Err(AuthServiceError::Validation(
                "name must not be empty".to_string(),
            ));
        }

        self.repository
            .update_profile(user, &update)
            .await?
            .ok_or(AuthServiceError::NotFound)
    }

    async fn change_password(
        &self,
        user: UserUuid,
        current: String,
        new: String,
    ) -> Result<(), AuthServiceError> {
        validate_password(&new)?;

        let hash = self
            .repository
            .get_password_hash(user)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !verify_password(&current, &hash)? {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let new_hash = hash_password(&new)?;

        if self.repository.update_password(user, &new_hash).await? == 0 {
            return Err(AuthServiceError::NotFound);
        }

        Ok(())
    }

    async fn list_users(&self, page: Page) -> Result<Paginated<User>, AuthServiceError> {
        let users = self
            .repository
            .list_users(page.limit(), page.offset())
            .await?;

        let total = self.repository.count_users().await?;

        Ok(Paginated::new(users, page, total.max(0) as u64))
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and open a first session.
    async fn register(&self, new_user: NewUser) -> Result<(User, TokenPair), AuthServiceError>;

    /// Verify credentials and open a session.
    async fn login(&self, credentials: Credentials) -> Result<(User, TokenPair), AuthServiceError>;

    /// Exchange a live refresh token for a rotated token pair.
    async fn refresh(&self, refresh_token: String) -> Result<TokenPair, AuthServiceError>;

    /// Revoke the session behind one refresh token.
    async fn logout(&self, refresh_token: String) -> Result<(), AuthServiceError>;

    /// Verify an access token and return the request identity.
    async fn authenticate_access(
        &self,
        access_token: String,
    ) -> Result<AuthenticatedUser, AuthServiceError>;

    /// Retrieve a user's profile.
    async fn get_user(&self, user: UserUuid) -> Result<User, AuthServiceError>;

    /// Update name and/or address.
    async fn update_profile(
        &self,
        user: UserUuid,
        update: ProfileUpdate,
    ) -> Result<User, AuthServiceError>;

    /// Change the password after verifying the current one.
    async fn change_password(
        &self,
        user: UserUuid,
        current: String,
        new: String,
    ) -> Result<(), AuthServiceError>;

    /// List accounts, newest first.
    async fn list_users(&self, page: Page) -> Result<Paginated<User>, AuthServiceError>;
}

fn validate_new_user(new_user: &NewUser) -> Result<(), AuthServiceError> {
    if new_user.name.trim().is_empty() {
        return Err(AuthServiceError::Validation(
            "name must not be empty".to_string(),
        ));
    }

    if !new_user.email.contains('@') {
        return Err(AuthServiceError::Validation(
            "email must be a valid address".to_string(),
        ));
    }

    validate_password(&new_user.password)
}

fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthServiceError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{auth::models::Address, test::TestContext};

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Avid Reader".to_string(),
            email: email.to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[tokio::test]
    async fn register_returns_user_and_tokens() -> TestResult {
        let ctx = TestContext::new().await;

        let (user, tokens) = ctx.auth.register(new_user("reader@example.com")).await?;

        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.role, UserRole::User);
        assert!(!tokens.access_token.is_empty());
        assert!(!tokens.refresh_token.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn register_duplicate_email_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.register(new_user("dupe@example.com")).await?;

        let result = ctx.auth.register(new_user("dupe@example.com")).await;

        assert!(
            matches!(result, Err(AuthServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn register_short_password_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .register(NewUser {
                name: "X".to_string(),
                email: "short@example.com".to_string(),
                password: "short".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );
    }

    #[tokio::test]
    async fn login_with_correct_password_succeeds() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.register(new_user("login@example.com")).await?;

        let (user, tokens) = ctx
            .auth
            .login(Credentials {
                email: "login@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        assert_eq!(user.email, "login@example.com");
        assert!(!tokens.access_token.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_fails() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.auth.register(new_user("wrongpw@example.com")).await?;

        let result = ctx
            .auth
            .login(Credentials {
                email: "wrongpw@example.com".to_string(),
                password: "not the password".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn login_with_unknown_email_fails() {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .login(Credentials {
                email: "ghost@example.com".to_string(),
                password: "whatever12".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn refresh_rotates_the_session() -> TestResult {
        let ctx = TestContext::new().await;

        let (_, tokens) = ctx.auth.register(new_user("rotate@example.com")).await?;

        let rotated = ctx.auth.refresh(tokens.refresh_token.clone()).await?;

        assert!(!rotated.refresh_token.is_empty());

        // The spent token no longer refreshes.
        let replay = ctx.auth.refresh(tokens.refresh_token).await;

        assert!(
            matches!(replay, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken on replay, got {replay:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn logout_revokes_only_that_session() -> TestResult {
        let ctx = TestContext::new().await;

        let (_, first) = ctx.auth.register(new_user("sessions@example.com")).await?;

        let (_, second) = ctx
            .auth
            .login(Credentials {
                email: "sessions@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .await?;

        ctx.auth.logout(first.refresh_token.clone()).await?;

        let revoked = ctx.auth.refresh(first.refresh_token).await;

        assert!(
            matches!(revoked, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken after logout, got {revoked:?}"
        );

        // The other session survives.
        ctx.auth.refresh(second.refresh_token).await?;

        Ok(())
    }

    #[tokio::test]
    async fn access_token_authenticates() -> TestResult {
        let ctx = TestContext::new().await;

        let (user, tokens) = ctx.auth.register(new_user("access@example.com")).await?;

        let identity = ctx.auth.authenticate_access(tokens.access_token).await?;

        assert_eq!(identity.uuid, user.uuid);
        assert_eq!(identity.role, UserRole::User);

        Ok(())
    }

    #[tokio::test]
    async fn garbage_access_token_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .auth
            .authenticate_access("not.a.token".to_string())
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidToken)),
            "expected InvalidToken, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_profile_sets_address() -> TestResult {
        let ctx = TestContext::new().await;

        let (user, _) = ctx.auth.register(new_user("address@example.com")).await?;

        let updated = ctx
            .auth
            .update_profile(
                user.uuid,
                ProfileUpdate {
                    name: None,
                    address: Some(Address {
                        street: "12 Shelf Lane".to_string(),
                        city: "Pune".to_string(),
                        state: "MH".to_string(),
                        zip_code: "411001".to_string(),
                        country: "IN".to_string(),
                    }),
                },
            )
            .await?;

        assert_eq!(updated.name, "Avid Reader", "name should be unchanged");
        assert_eq!(
            updated.address.as_ref().map(|a| a.city.as_str()),
            Some("Pune")
        );

        Ok(())
    }

    #[tokio::test]
    async fn change_password_requires_current() -> TestResult {
        let ctx = TestContext::new().await;

        let (user, _) = ctx.auth.register(new_user("repass@example.com")).await?;

        let wrong = ctx
            .auth
            .change_password(user.uuid, "bad guess".to_string(), "new password".to_string())
            .await;

        assert!(
            matches!(wrong, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {wrong:?}"
        );

        ctx.auth
            .change_password(
                user.uuid,
                "correct horse".to_string(),
                "new password".to_string(),
            )
            .await?;

        ctx.auth
            .login(Credentials {
                email: "repass@example.com".to_string(),
                password: "new password".to_string(),
            })
            .await?;

        Ok(())
    }
}
