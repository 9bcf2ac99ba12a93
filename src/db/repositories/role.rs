use anyhow::{Context, Result};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{prelude::*, roles};

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<roles::Model>> {
        Roles::find()
            .order_by_asc(roles::Column::NombreRol)
            .all(&self.conn)
            .await
            .context("Failed to list roles")
    }

    pub async fn get(&self, rol_id: i32) -> Result<Option<roles::Model>> {
        Roles::find_by_id(rol_id)
            .one(&self.conn)
            .await
            .context("Failed to query role by ID")
    }

    pub async fn find_by_name(&self, nombre: &str) -> Result<Option<roles::Model>> {
        Roles::find()
            .filter(roles::Column::NombreRol.eq(nombre))
            .one(&self.conn)
            .await
            .context("Failed to query role by name")
    }
}
