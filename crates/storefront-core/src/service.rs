//! Authentication flow - registration, login, token refresh.
//!
//! Pure orchestration over the ports; all I/O lives behind the
//! [`UserRepository`], [`PasswordService`] and [`TokenService`] traits.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::User;
use crate::error::{DomainError, RepoError};
use crate::ports::{AuthError, PasswordService, TokenService, UserRepository};

/// Input for registration, already syntactically validated at the boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// An access/refresh token pair issued together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// The credential-and-session service.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new customer account and issue its first token pair.
    pub async fn register(&self, new_user: NewUser) -> Result<(User, TokenPair), DomainError> {
        if self.users.find_by_email(&new_user.email).await?.is_some() {
            return Err(DomainError::EmailExists);
        }

        let password_hash = self.passwords.hash(&new_user.password)?;
        let user = User::register(
            new_user.email,
            password_hash,
            new_user.first_name,
            new_user.last_name,
        );

        let saved = match self.users.save(user).await {
            // Unique-index race: someone registered the email between the
            // lookup and the insert.
            Err(RepoError::Constraint(_)) => return Err(DomainError::EmailExists),
            other => other?,
        };

        let tokens = self.issue_tokens(&saved)?;
        Ok((saved, tokens))
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        if !self.passwords.verify(password, &user.password_hash)? {
            return Err(DomainError::InvalidCredentials);
        }

        let tokens = self.issue_tokens(&user)?;
        Ok((user, tokens))
    }

    /// Validate a refresh token and rotate the pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, TokenPair), DomainError> {
        let claims = self
            .tokens
            .validate_refresh_token(refresh_token)
            .map_err(|_| DomainError::InvalidToken)?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or(DomainError::UserNotFound { id: claims.user_id })?;

        let tokens = self.issue_tokens(&user)?;
        Ok((user, tokens))
    }

    /// Look up the authenticated caller.
    pub async fn current_user(&self, user_id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound { id: user_id })
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_token = self
            .tokens
            .generate_access_token(user.id, &user.email, &user.role)?;
        let refresh_token = self
            .tokens
            .generate_refresh_token(user.id, &user.email, &user.role)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        DomainError::Internal(err.to_string())
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => DomainError::InvalidCredentials,
            AuthError::TokenExpired | AuthError::InvalidToken(_) => DomainError::InvalidToken,
            other => DomainError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::TokenClaims;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeRepo {
        users: Mutex<HashMap<Uuid, User>>,
    }

    #[async_trait]
    impl UserRepository for FakeRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.users.lock().unwrap().get(&id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn save(&self, user: User) -> Result<User, RepoError> {
            self.users.lock().unwrap().insert(user.id, user.clone());
            Ok(user)
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            self.users
                .lock()
                .unwrap()
                .remove(&id)
                .map(|_| ())
                .ok_or(RepoError::NotFound)
        }
    }

    /// Reversible "hash" so tests can assert verification without argon2.
    struct FakeHasher;

    impl PasswordService for FakeHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    struct FakeTokens;

    impl TokenService for FakeTokens {
        fn generate_access_token(
            &self,
            user_id: Uuid,
            _email: &str,
            _role: &str,
        ) -> Result<String, AuthError> {
            Ok(format!("access:{user_id}"))
        }

        fn generate_refresh_token(
            &self,
            user_id: Uuid,
            email: &str,
            role: &str,
        ) -> Result<String, AuthError> {
            Ok(format!("refresh:{user_id}:{email}:{role}"))
        }

        fn validate_access_token(&self, _token: &str) -> Result<TokenClaims, AuthError> {
            Err(AuthError::InvalidToken("access token on refresh path".into()))
        }

        fn validate_refresh_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
            let mut parts = token.splitn(4, ':');
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some("refresh"), Some(id), Some(email), Some(role)) => Ok(TokenClaims {
                    user_id: Uuid::parse_str(id)
                        .map_err(|e| AuthError::InvalidToken(e.to_string()))?,
                    email: email.to_string(),
                    role: role.to_string(),
                    exp: 0,
                }),
                _ => Err(AuthError::InvalidToken("malformed".into())),
            }
        }
    }

    fn service() -> AuthService {
        AuthService::new(
            Arc::new(FakeRepo::default()),
            Arc::new(FakeHasher),
            Arc::new(FakeTokens),
        )
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let svc = service();

        let (user, tokens) = svc.register(new_user("ada@example.com")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password_hash, "hashed:hunter2hunter2");
        assert!(tokens.access_token.starts_with("access:"));

        let (logged_in, _) = svc.login("ada@example.com", "hunter2hunter2").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();

        let err = svc.register(new_user("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailExists));
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let svc = service();
        svc.register(new_user("ada@example.com")).await.unwrap();

        let unknown = svc.login("nobody@example.com", "whatever").await.unwrap_err();
        let wrong = svc.login("ada@example.com", "wrong-password").await.unwrap_err();

        assert!(matches!(unknown, DomainError::InvalidCredentials));
        assert!(matches!(wrong, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_rotates_the_pair() {
        let svc = service();
        let (user, tokens) = svc.register(new_user("ada@example.com")).await.unwrap();

        let (refreshed, rotated) = svc.refresh(&tokens.refresh_token).await.unwrap();
        assert_eq!(refreshed.id, user.id);
        assert!(rotated.access_token.starts_with("access:"));
        assert!(rotated.refresh_token.starts_with("refresh:"));
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let svc = service();
        let (_, tokens) = svc.register(new_user("ada@example.com")).await.unwrap();

        let err = svc.refresh(&tokens.access_token).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken));
    }

    #[tokio::test]
    async fn refresh_for_deleted_user_is_not_found() {
        let users = Arc::new(FakeRepo::default());
        let svc = AuthService::new(users.clone(), Arc::new(FakeHasher), Arc::new(FakeTokens));

        let (user, tokens) = svc.register(new_user("ada@example.com")).await.unwrap();
        users.delete(user.id).await.unwrap();

        let err = svc.refresh(&tokens.refresh_token).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn current_user_looks_up_by_id() {
        let svc = service();
        let (user, _) = svc.register(new_user("ada@example.com")).await.unwrap();

        let found = svc.current_user(user.id).await.unwrap();
        assert_eq!(found.email, "ada@example.com");

        let missing = svc.current_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing, DomainError::UserNotFound { .. }));
    }
}
