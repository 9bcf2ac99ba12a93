use std::fmt;

/// PHC prefix shared by every Argon2 variant we may have written.
pub const HASH_PREFIX: &str = "$argon2";

/// Prefixes of the bcrypt hashes written by the previous system.
pub const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

/// Password column as read from the credential store.
///
/// Older rows hold the password in clear text. They are migrated to
/// [`StoredCredential::Hashed`] the first time the owner logs in successfully.
/// Rows the previous system already hashed with bcrypt are verified as such and
/// never rewritten by a login.
#[derive(Clone, PartialEq, Eq)]
pub enum StoredCredential {
    Plaintext(String),
    Hashed(String),
    Bcrypt(String),
}

impl StoredCredential {
    #[must_use]
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with(HASH_PREFIX) {
            Self::Hashed(raw)
        } else if BCRYPT_PREFIXES.iter().any(|p| raw.starts_with(p)) {
            Self::Bcrypt(raw)
        } else {
            Self::Plaintext(raw)
        }
    }

    #[must_use]
    pub const fn is_hashed(&self) -> bool {
        matches!(self, Self::Hashed(_) | Self::Bcrypt(_))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plaintext(value) | Self::Hashed(value) | Self::Bcrypt(value) => value,
        }
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Plaintext(***)"),
            Self::Hashed(_) => f.write_str("Hashed(***)"),
            Self::Bcrypt(_) => f.write_str("Bcrypt(***)"),
        }
    }
}

/// A login principal joined with its role name.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub nombre_completo: String,
    pub correo: String,
    pub rol: String,
    pub estado: bool,
    pub credential: StoredCredential,
}
