//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::SecurityConfig;
use crate::db::{ProfileRow, Store};
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use crate::services::credential::PasswordVerifier;
use crate::services::token::{Claims, TokenIssuer};

pub struct SeaOrmAuthService {
    store: Store,
    verifier: PasswordVerifier,
    tokens: TokenIssuer,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: &SecurityConfig) -> Self {
        Self {
            verifier: PasswordVerifier::new(store.clone(), security.clone()),
            tokens: TokenIssuer::from_config(security),
            store,
        }
    }
}

fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn login(&self, correo: &str, clave: &str) -> Result<LoginResult, AuthError> {
        let correo = correo.trim();
        if correo.is_empty() || clave.is_empty() {
            return Err(AuthError::Validation(
                "Correo y contraseña requeridos".to_string(),
            ));
        }

        let Some(account) = self.store.find_account_by_email(correo).await? else {
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verifier.verify_and_upgrade(&account, clave).await? {
            debug!(usuario_id = account.id, "Login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        if !account.estado {
            warn!(usuario_id = account.id, "Inactive account logged in");
        }

        let (token, claims) = self.tokens.issue(&account)?;
        info!(usuario_id = account.id, rol = %account.rol, "User logged in");

        Ok(LoginResult { token, claims })
    }

    async fn authenticate(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        Ok(self.tokens.verify(token)?)
    }

    async fn profile(&self, claims: &Claims) -> Result<Option<ProfileRow>, AuthError> {
        Ok(self.store.get_profile(claims.id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrator::ADMIN_EMAIL;
    use crate::db::test_support::temp_store;

    fn security() -> SecurityConfig {
        SecurityConfig {
            jwt_secret: "unit-test".to_string(),
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let store = temp_store().await;
        let service = SeaOrmAuthService::new(store, &security());

        let result = service.login(ADMIN_EMAIL, "admin").await.unwrap();
        assert_eq!(result.claims.correo, ADMIN_EMAIL);

        let header = format!("Bearer {}", result.token);
        let claims = service.authenticate(Some(&header)).await.unwrap();
        assert_eq!(claims, result.claims);

        let profile = service.profile(&claims).await.unwrap().unwrap();
        assert_eq!(profile.nombre_rol, "Administrador");
    }

    #[tokio::test]
    async fn test_login_failures() {
        let store = temp_store().await;
        let service = SeaOrmAuthService::new(store, &security());

        assert!(matches!(
            service.login("", "admin").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.login(ADMIN_EMAIL, "").await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service.login("nadie@x.com", "admin").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(ADMIN_EMAIL, "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejections() {
        let store = temp_store().await;
        let service = SeaOrmAuthService::new(store, &security());

        assert!(matches!(
            service.authenticate(None).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            service.authenticate(Some("Bearer garbage")).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
