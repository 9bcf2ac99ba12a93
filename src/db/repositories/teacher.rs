use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{prelude::*, profesores};

#[derive(Debug, Clone)]
pub struct TeacherInput {
    pub nombre: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
}

pub struct TeacherRepository {
    conn: DatabaseConnection,
}

impl TeacherRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_active(&self) -> Result<Vec<profesores::Model>> {
        Profesores::find()
            .filter(profesores::Column::Estado.eq(true))
            .order_by_asc(profesores::Column::Nombre)
            .all(&self.conn)
            .await
            .context("Failed to list teachers")
    }

    pub async fn get(&self, profesor_id: i32) -> Result<Option<profesores::Model>> {
        Profesores::find_by_id(profesor_id)
            .one(&self.conn)
            .await
            .context("Failed to query teacher")
    }

    pub async fn create(&self, input: TeacherInput) -> Result<profesores::Model> {
        profesores::ActiveModel {
            nombre: Set(input.nombre),
            correo: Set(input.correo),
            telefono: Set(input.telefono),
            estado: Set(true),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create teacher")
    }

    pub async fn update(&self, profesor_id: i32, input: TeacherInput) -> Result<bool> {
        let Some(teacher) = self.get(profesor_id).await? else {
            return Ok(false);
        };

        let mut active: profesores::ActiveModel = teacher.into();
        active.nombre = Set(input.nombre);
        active.correo = Set(input.correo);
        active.telefono = Set(input.telefono);
        active
            .update(&self.conn)
            .await
            .context("Failed to update teacher")?;

        Ok(true)
    }

    pub async fn deactivate(&self, profesor_id: i32) -> Result<bool> {
        let result = Profesores::update_many()
            .col_expr(
                profesores::Column::Estado,
                sea_orm::sea_query::Expr::value(false),
            )
            .filter(profesores::Column::ProfesorId.eq(profesor_id))
            .exec(&self.conn)
            .await
            .context("Failed to deactivate teacher")?;

        Ok(result.rows_affected > 0)
    }
}
