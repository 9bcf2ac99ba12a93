use chrono::Datelike;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sea_orm_migration::prelude::*;

use crate::config::SecurityConfig;
use crate::entities::{periodos, prelude::*, roles, usuarios};
use crate::services::credential::hash_password;

#[derive(DeriveMigrationName)]
pub struct Migration;

pub const ADMIN_ROLE: &str = "Administrador";

/// Bootstrap account. The password should be changed right after the first login.
pub const ADMIN_EMAIL: &str = "admin@academia.local";
const ADMIN_PASSWORD: &str = "admin";

const ROLES: [&str; 3] = [ADMIN_ROLE, "Docente", "Secretaria"];
const PERIODS: [&str; 3] = ["Primer Semestre", "Segundo Semestre", "Verano"];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for name in ROLES {
            roles::ActiveModel {
                nombre_rol: Set(name.to_string()),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        let admin_role = Roles::find()
            .filter(roles::Column::NombreRol.eq(ADMIN_ROLE))
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("role {ADMIN_ROLE}")))?;

        let password_hash = hash_password(ADMIN_PASSWORD, &SecurityConfig::default())
            .map_err(|e| DbErr::Custom(e.to_string()))?;

        usuarios::ActiveModel {
            nombre_completo: Set("Administrador".to_string()),
            correo: Set(ADMIN_EMAIL.to_string()),
            contrasena: Set(password_hash),
            rol_id: Set(admin_role.rol_id),
            estado: Set(true),
            fecha_creacion: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        let year = chrono::Utc::now().year();
        for name in PERIODS {
            periodos::ActiveModel {
                nombre: Set(name.to_string()),
                anio: Set(year),
                estado: Set(true),
                ..Default::default()
            }
            .insert(db)
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        Usuarios::delete_many()
            .filter(usuarios::Column::Correo.eq(ADMIN_EMAIL))
            .exec(db)
            .await?;
        Periodos::delete_many()
            .filter(periodos::Column::Nombre.is_in(PERIODS))
            .exec(db)
            .await?;
        Roles::delete_many()
            .filter(roles::Column::NombreRol.is_in(ROLES))
            .exec(db)
            .await?;

        Ok(())
    }
}
