//! User accounts and token lifecycle

use crate::storage::{queries, Database, StorageResultExt};
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;
use std::sync::Arc;
use stores_core::ports::RevocationStore;
use stores_core::{Caller, Result, ServiceError, TokenCodec, TokenType};
use stores_types::{AccessToken, AuthTokens, Credentials, User};
use tracing::{info, warn};

pub struct UserService {
    db: Arc<Database>,
    codec: Arc<TokenCodec>,
}

impl UserService {
    pub fn new(db: Arc<Database>, codec: Arc<TokenCodec>) -> Self {
        Self { db, codec }
    }

    pub async fn register(&self, credentials: Credentials) -> Result<User> {
        // Hash password
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(credentials.password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?
            .to_string();

        let mut tx = self.db.begin_write().await.or_storage()?;
        let id = queries::insert_user(&mut *tx, &credentials.username, &password_hash)
            .await
            .or_duplicate("user")?;
        tx.commit().await.or_storage()?;

        info!("Registered user {} ({})", id, credentials.username);
        Ok(User {
            id,
            username: credentials.username,
        })
    }

    /// Verify credentials and hand out a fresh access token plus a refresh token
    pub async fn login(&self, credentials: Credentials) -> Result<AuthTokens> {
        let user = {
            let mut conn = self.db.acquire().await.or_storage()?;
            queries::find_user_by_username(&mut *conn, &credentials.username)
                .await
                .or_storage()?
        };

        if let Some(user) = user {
            let parsed_hash = PasswordHash::new(&user.password_hash)
                .map_err(|e| ServiceError::Internal(format!("Invalid password hash: {}", e)))?;

            if Argon2::default()
                .verify_password(credentials.password.as_bytes(), &parsed_hash)
                .is_ok()
            {
                let identity = user.id.to_string();
                info!("Login successful for user {}", identity);
                return Ok(AuthTokens {
                    access_token: self.codec.issue(&identity, TokenType::Access, true)?,
                    refresh_token: self.codec.issue(&identity, TokenType::Refresh, false)?,
                });
            }
        }

        warn!("Login failed for: {}", credentials.username);
        Err(ServiceError::InvalidCredentials)
    }

    /// New non-fresh access token for the holder of a refresh token
    pub async fn refresh(&self, caller: &Caller) -> Result<AccessToken> {
        Ok(AccessToken {
            access_token: self
                .codec
                .issue(&caller.identity, TokenType::Access, false)?,
        })
    }

    /// Revoke the caller's token
    pub async fn logout(&self, caller: &Caller) -> Result<()> {
        self.db.revoke(&caller.jti).await?;
        info!("User {} logged out", caller.identity);
        Ok(())
    }

    pub async fn get_user(&self, id: i64) -> Result<User> {
        let mut conn = self.db.acquire().await.or_storage()?;
        queries::find_user(&mut *conn, id)
            .await
            .or_storage()?
            .map(|row| User {
                id: row.id,
                username: row.username,
            })
            .ok_or(ServiceError::not_found("User", id))
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        let mut tx = self.db.begin_write().await.or_storage()?;
        if queries::find_user(&mut *tx, id).await.or_storage()?.is_none() {
            return Err(ServiceError::not_found("User", id));
        }
        queries::delete_user(&mut *tx, id).await.or_storage()?;
        tx.commit().await.or_storage()?;

        info!("Deleted user {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing;
    use stores_core::TokenPolicy;

    async fn service() -> (Arc<Database>, UserService, Arc<TokenCodec>) {
        let db = testing::database().await;
        let codec = Arc::new(TokenCodec::new("user-test", TokenPolicy::default()));
        (db.clone(), UserService::new(db, codec.clone()), codec)
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let (_db, service, codec) = service().await;

        let user = service.register(creds("admin", "pw-1")).await.unwrap();
        assert_eq!(user.id, 1);

        let tokens = service.login(creds("admin", "pw-1")).await.unwrap();
        let access = codec.decode(&tokens.access_token).unwrap();
        assert_eq!(access.sub, "1");
        assert!(access.fresh);
        assert!(access.is_admin);

        let refresh = codec.decode(&tokens.refresh_token).unwrap();
        assert_eq!(refresh.token_type, TokenType::Refresh);
    }

    #[tokio::test]
    async fn test_second_user_is_not_admin() {
        let (_db, service, codec) = service().await;
        service.register(creds("admin", "pw")).await.unwrap();
        service.register(creds("bob", "pw")).await.unwrap();

        let tokens = service.login(creds("bob", "pw")).await.unwrap();
        assert!(!codec.decode(&tokens.access_token).unwrap().is_admin);
    }

    #[tokio::test]
    async fn test_duplicate_username() {
        let (_db, service, _codec) = service().await;
        service.register(creds("bob", "pw")).await.unwrap();

        assert!(matches!(
            service.register(creds("bob", "other")).await,
            Err(ServiceError::DuplicateName { entity: "user" })
        ));
    }

    #[tokio::test]
    async fn test_bad_credentials() {
        let (_db, service, _codec) = service().await;
        service.register(creds("bob", "right")).await.unwrap();

        assert!(matches!(
            service.login(creds("bob", "wrong")).await,
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(creds("nobody", "right")).await,
            Err(ServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_logout_revokes_jti() {
        let (db, service, codec) = service().await;
        let claims = codec.claims_for("3", TokenType::Access, true);
        let caller = Caller::from(claims.clone());

        service.logout(&caller).await.unwrap();
        assert!(db.is_revoked(&claims.jti).await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_issues_non_fresh_access() {
        let (_db, service, codec) = service().await;
        let caller = Caller::from(codec.claims_for("4", TokenType::Refresh, false));

        let token = service.refresh(&caller).await.unwrap();
        let claims = codec.decode(&token.access_token).unwrap();
        assert_eq!(claims.sub, "4");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.fresh);
    }

    #[tokio::test]
    async fn test_get_and_delete_user() {
        let (_db, service, _codec) = service().await;
        let user = service.register(creds("bob", "pw")).await.unwrap();

        assert_eq!(service.get_user(user.id).await.unwrap(), user);
        service.delete_user(user.id).await.unwrap();
        assert!(matches!(
            service.get_user(user.id).await,
            Err(ServiceError::NotFound { entity: "User", .. })
        ));
        assert!(matches!(
            service.delete_user(user.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }
}
