use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::{estudiantes, prelude::*};

#[derive(Debug, Clone)]
pub struct StudentInput {
    pub cedula: String,
    pub nombre: String,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
}

pub struct StudentRepository {
    conn: DatabaseConnection,
}

impl StudentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Lists students by state, ordered by name.
    pub async fn list(&self, estado: bool) -> Result<Vec<estudiantes::Model>> {
        Estudiantes::find()
            .filter(estudiantes::Column::Estado.eq(estado))
            .order_by_asc(estudiantes::Column::Nombre)
            .all(&self.conn)
            .await
            .context("Failed to list students")
    }

    pub async fn get(&self, estudiante_id: i32) -> Result<Option<estudiantes::Model>> {
        Estudiantes::find_by_id(estudiante_id)
            .one(&self.conn)
            .await
            .context("Failed to query student")
    }

    /// True when another student already holds `cedula`, active or not.
    pub async fn cedula_exists(&self, cedula: &str, excluding: Option<i32>) -> Result<bool> {
        let mut query = Estudiantes::find().filter(estudiantes::Column::Cedula.eq(cedula));
        if let Some(id) = excluding {
            query = query.filter(estudiantes::Column::EstudianteId.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check cedula")?;
        Ok(count > 0)
    }

    pub async fn create(&self, input: StudentInput) -> Result<estudiantes::Model> {
        estudiantes::ActiveModel {
            cedula: Set(input.cedula),
            nombre: Set(input.nombre),
            fecha_nacimiento: Set(input.fecha_nacimiento),
            correo: Set(input.correo),
            telefono: Set(input.telefono),
            estado: Set(true),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create student")
    }

    pub async fn update(&self, estudiante_id: i32, input: StudentInput) -> Result<bool> {
        let Some(student) = self.get(estudiante_id).await? else {
            return Ok(false);
        };

        let mut active: estudiantes::ActiveModel = student.into();
        active.cedula = Set(input.cedula);
        active.nombre = Set(input.nombre);
        active.fecha_nacimiento = Set(input.fecha_nacimiento);
        active.correo = Set(input.correo);
        active.telefono = Set(input.telefono);
        active
            .update(&self.conn)
            .await
            .context("Failed to update student")?;

        Ok(true)
    }

    /// `false` deactivates, `true` reactivates.
    pub async fn set_active(&self, estudiante_id: i32, activo: bool) -> Result<bool> {
        let result = Estudiantes::update_many()
            .col_expr(
                estudiantes::Column::Estado,
                sea_orm::sea_query::Expr::value(activo),
            )
            .filter(estudiantes::Column::EstudianteId.eq(estudiante_id))
            .exec(&self.conn)
            .await
            .context("Failed to change student state")?;

        Ok(result.rows_affected > 0)
    }
}
