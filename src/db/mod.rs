use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::GeneralConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::enrollment::EnrollmentRow;
pub use repositories::payment::PaymentRow;
pub use repositories::subject::SubjectRow;
pub use crate::models::account::{Account, StoredCredential};
pub use repositories::user::{ProfileRow, UserRow};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        let general = GeneralConfig {
            database_url: db_url.to_string(),
            ..GeneralConfig::default()
        };
        Self::connect(&general).await
    }

    /// Opens the pool and applies pending migrations.
    pub async fn connect(config: &GeneralConfig) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let db_url = config.database_url.as_str();
        prepare_sqlite_file(db_url).await?;

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(config.max_db_connections)
            .min_connections(config.min_db_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .with_context(|| format!("Failed to connect to {}", redact_url(db_url)))?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            config.min_db_connections, config.max_db_connections
        );

        Ok(Self { conn })
    }

    #[must_use]
    pub fn users(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn roles(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn plans(&self) -> repositories::plan::PlanRepository {
        repositories::plan::PlanRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn subjects(&self) -> repositories::subject::SubjectRepository {
        repositories::subject::SubjectRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn students(&self) -> repositories::student::StudentRepository {
        repositories::student::StudentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn teachers(&self) -> repositories::teacher::TeacherRepository {
        repositories::teacher::TeacherRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn periods(&self) -> repositories::period::PeriodRepository {
        repositories::period::PeriodRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn enrollments(&self) -> repositories::enrollment::EnrollmentRepository {
        repositories::enrollment::EnrollmentRepository::new(self.conn.clone())
    }

    #[must_use]
    pub fn payments(&self) -> repositories::payment::PaymentRepository {
        repositories::payment::PaymentRepository::new(self.conn.clone())
    }

    // Credential store operations used by the auth service

    pub async fn find_account_by_email(&self, correo: &str) -> Result<Option<Account>> {
        self.users().find_account_by_email(correo).await
    }

    pub async fn upgrade_plaintext_password(
        &self,
        usuario_id: i32,
        expected_plaintext: &str,
        new_hash: &str,
    ) -> Result<bool> {
        self.users()
            .upgrade_plaintext_password(usuario_id, expected_plaintext, new_hash)
            .await
    }

    pub async fn get_profile(&self, usuario_id: i32) -> Result<Option<ProfileRow>> {
        self.users().get_profile(usuario_id).await
    }
}

/// `SQLite` refuses to open a missing file without `mode=rwc`; create it up front.
async fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    let Some(rest) = db_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    if rest.contains(":memory:") || rest.contains("mode=memory") {
        return Ok(());
    }

    let path_str = rest.trim_start_matches("//");
    let path_str = path_str.split('?').next().unwrap_or(path_str);
    let path = Path::new(path_str);

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create database file {}", path.display()))?;
    }

    Ok(())
}

fn redact_url(db_url: &str) -> String {
    match (db_url.find("://"), db_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &db_url[..scheme_end], &db_url[at..])
        }
        _ => db_url.to_string(),
    }
}
