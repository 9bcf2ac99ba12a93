pub mod auth_service;
pub mod auth_service_impl;
pub mod credential;
pub mod token;

pub use auth_service::{AuthError, AuthService, LoginResult};
pub use auth_service_impl::SeaOrmAuthService;
pub use credential::PasswordVerifier;
pub use token::{Claims, TokenError, TokenIssuer};
