use std::sync::Arc;

use tracing::{error, info, warn};

use super::{char_len, ServiceError};
use crate::auth::{hash_password, verify_password, JwtKeys};
use crate::config::IdentityConfig;
use crate::database::models::{LoginInput, RegisterInput, Role};
use crate::database::{RepositoryError, UserRepository};
use crate::validation::{ValidationErrors, Validator};

pub const INVALID_LOGIN_LENGTH: &str = "invalid login length";
pub const INVALID_PASSWORD_LENGTH: &str = "invalid password length";
pub const INVALID_ROLE: &str = "invalid role";

/// Registration and login; both hand back a signed token.
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    keys: Arc<JwtKeys>,
    identity: IdentityConfig,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: Arc<JwtKeys>, identity: IdentityConfig) -> Self {
        Self { repo, keys, identity }
    }

    pub async fn register(&self, input: &RegisterInput) -> Result<String, ServiceError> {
        let role = self.validate(input).map_err(|e| {
            warn!("userService.register: {}", e);
            e
        })?;

        let password = input.password.clone();
        let password_hash = off_runtime(move || hash_password(&password)).await?.map_err(|e| {
            error!("userService.register: failed to hash password: {}", e);
            ServiceError::PasswordHash(e)
        })?;

        let user = self
            .repo
            .add_user(&input.login, &password_hash, role)
            .await
            .map_err(|e| {
                error!("userService.register: {}", e);
                e
            })?;

        info!("Registered user {} with role {}", user.login, user.role);
        Ok(self.keys.issue(&user)?)
    }

    pub async fn login(&self, input: &LoginInput) -> Result<String, ServiceError> {
        let user = match self.repo.user_by_login(&input.login).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound(_)) => {
                // Same Argon2 work as a real check, so the reply time does
                // not reveal whether the login exists.
                let password = input.password.clone();
                let _ = off_runtime(move || hash_password(&password)).await?;
                warn!("userService.login: unknown login {}", input.login);
                return Err(ServiceError::InvalidCredentials);
            }
            Err(e) => {
                error!("userService.login: {}", e);
                return Err(e.into());
            }
        };

        let password = input.password.clone();
        let hash = user.password_hash.clone();
        if !off_runtime(move || verify_password(&password, &hash)).await? {
            warn!("userService.login: wrong password for {}", input.login);
            return Err(ServiceError::InvalidCredentials);
        }

        Ok(self.keys.issue(&user)?)
    }

    fn validate(&self, input: &RegisterInput) -> Result<Role, ValidationErrors> {
        let role = input.role.parse::<Role>().ok();
        let cfg = &self.identity;

        Validator::new(input)
            .between(
                |u| char_len(&u.login),
                cfg.min_login_len,
                cfg.max_login_len,
                INVALID_LOGIN_LENGTH,
            )
            .between(
                |u| char_len(&u.password),
                cfg.min_password_len,
                cfg.max_password_len,
                INVALID_PASSWORD_LENGTH,
            )
            .must(|_| role.is_some(), INVALID_ROLE)
            .validate()?;

        role.ok_or_else(|| ValidationErrors::single(INVALID_ROLE))
    }
}

/// Argon2 is CPU-bound; keep it off the async worker threads.
async fn off_runtime<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    fn service(store: Arc<MemoryStore>) -> UserService {
        UserService::new(
            store,
            Arc::new(JwtKeys::new("test-secret", 1).unwrap()),
            IdentityConfig::default(),
        )
    }

    fn register_input(login: &str, password: &str, role: &str) -> RegisterInput {
        RegisterInput {
            login: login.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store.clone());

        let token = svc.register(&register_input("alice", "password1", "admin")).await.unwrap();
        let claims = JwtKeys::new("test-secret", 1).unwrap().verify(&token).unwrap();
        assert_eq!(claims.login, "alice");
        assert_eq!(claims.role, Role::Admin);

        let stored = store.user("alice").unwrap();
        assert_ne!(stored.password_hash, "password1");

        let token = svc
            .login(&LoginInput { login: "alice".into(), password: "password1".into() })
            .await
            .unwrap();
        assert!(!token.is_empty());
    }

    #[tokio::test]
    async fn register_reports_every_violation() {
        let store = Arc::new(MemoryStore::default());
        let err = service(store.clone())
            .register(&register_input("al", "123", "root"))
            .await
            .unwrap_err();

        match err {
            ServiceError::Validation(e) => assert_eq!(
                e.messages(),
                [INVALID_LOGIN_LENGTH, INVALID_PASSWORD_LENGTH, INVALID_ROLE]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_login_is_rejected() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store);
        svc.register(&register_input("alice", "password1", "viewer")).await.unwrap();
        let err = svc
            .register(&register_input("alice", "password2", "viewer"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Repository(RepositoryError::AlreadyExists("user"))));
    }

    #[tokio::test]
    async fn unknown_login_and_wrong_password_look_the_same() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store);
        svc.register(&register_input("alice", "password1", "viewer")).await.unwrap();

        let wrong_password = svc
            .login(&LoginInput { login: "alice".into(), password: "nope-nope".into() })
            .await
            .unwrap_err();
        let unknown = svc
            .login(&LoginInput { login: "bob".into(), password: "password1".into() })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown.to_string());
        assert!(matches!(unknown, ServiceError::InvalidCredentials));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn password_work_runs_off_the_runtime() {
        let store = Arc::new(MemoryStore::default());
        let svc = service(store);
        svc.register(&register_input("carol", "password1", "viewer")).await.unwrap();

        let hashed = off_runtime(|| std::thread::current().id()).await.unwrap();
        assert_ne!(hashed, std::thread::current().id());

        let token = svc
            .login(&LoginInput { login: "carol".into(), password: "password1".into() })
            .await
            .unwrap();
        assert!(!token.is_empty());
        let err = svc
            .login(&LoginInput { login: "dave".into(), password: "password1".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidCredentials));
    }
}
