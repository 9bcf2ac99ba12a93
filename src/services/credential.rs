//! Password hashing and the legacy plaintext upgrade.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::models::account::{Account, StoredCredential};

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

    let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Checks `password` against a PHC string. The parameters embedded in the
/// string win over the configured ones.
pub fn verify_hash(password: &str, phc: &str) -> Result<bool> {
    let parsed_hash =
        PasswordHash::new(phc).map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Argon2 is CPU-bound; keep it off the async workers.
pub async fn hash_in_background(password: &str, config: &SecurityConfig) -> Result<String> {
    let password = password.to_string();
    let config = config.clone();
    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .context("Password hashing task panicked")?
}

/// Checks `password` against a bcrypt hash left by the previous system.
pub fn verify_bcrypt(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash).context("Invalid bcrypt hash")
}

async fn verify_in_background(
    password: &str,
    hash: &str,
    verify: fn(&str, &str) -> Result<bool>,
) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    task::spawn_blocking(move || verify(&password, &hash))
        .await
        .context("Password verification task panicked")?
}

/// Decides whether a submitted password matches an account, migrating legacy
/// plaintext credentials to Argon2id on the first successful match. Hashed
/// credentials, bcrypt included, are only ever verified.
#[derive(Clone)]
pub struct PasswordVerifier {
    store: Store,
    security: SecurityConfig,
}

impl PasswordVerifier {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub async fn verify_and_upgrade(&self, account: &Account, submitted: &str) -> Result<bool> {
        match &account.credential {
            StoredCredential::Hashed(phc) => {
                verify_in_background(submitted, phc, verify_hash).await
            }
            StoredCredential::Bcrypt(hash) => {
                verify_in_background(submitted, hash, verify_bcrypt).await
            }
            StoredCredential::Plaintext(stored) => {
                if !constant_time_eq(stored.as_bytes(), submitted.as_bytes()) {
                    return Ok(false);
                }

                let new_hash = hash_in_background(submitted, &self.security).await?;
                let upgraded = self
                    .store
                    .upgrade_plaintext_password(account.id, stored, &new_hash)
                    .await?;

                if upgraded {
                    info!(usuario_id = account.id, "Migrated legacy plaintext password to Argon2id");
                } else {
                    warn!(
                        usuario_id = account.id,
                        "Stored password changed before it could be migrated; left as is"
                    );
                }

                Ok(true)
            }
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
