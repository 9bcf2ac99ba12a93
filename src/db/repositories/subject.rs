use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{materias, planes_estudio, prelude::*};

/// Subject joined with the name of its study plan, if any.
#[derive(Debug, Clone, FromQueryResult)]
pub struct SubjectRow {
    pub codigo: String,
    pub nombre: String,
    pub creditos: i32,
    pub plan_id: Option<i32>,
    pub estado: bool,
    pub nombre_plan: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SubjectChanges {
    pub nombre: String,
    pub creditos: i32,
    pub plan_id: Option<i32>,
}

pub struct SubjectRepository {
    conn: DatabaseConnection,
}

impl SubjectRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<SubjectRow>> {
        Materias::find()
            .column_as(planes_estudio::Column::NombrePlan, "nombre_plan")
            .join(JoinType::LeftJoin, materias::Relation::PlanesEstudio.def())
            .order_by_asc(materias::Column::Nombre)
            .into_model::<SubjectRow>()
            .all(&self.conn)
            .await
            .context("Failed to list subjects")
    }

    pub async fn get(&self, codigo: &str) -> Result<Option<materias::Model>> {
        Materias::find_by_id(codigo.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query subject")
    }

    pub async fn exists(&self, codigo: &str) -> Result<bool> {
        let count = Materias::find()
            .filter(materias::Column::Codigo.eq(codigo))
            .count(&self.conn)
            .await
            .context("Failed to check subject code")?;
        Ok(count > 0)
    }

    pub async fn create(
        &self,
        codigo: String,
        changes: SubjectChanges,
    ) -> Result<materias::Model> {
        materias::ActiveModel {
            codigo: Set(codigo),
            nombre: Set(changes.nombre),
            creditos: Set(changes.creditos),
            plan_id: Set(changes.plan_id),
            estado: Set(true),
        }
        .insert(&self.conn)
        .await
        .context("Failed to create subject")
    }

    pub async fn update(&self, codigo: &str, changes: SubjectChanges) -> Result<bool> {
        let Some(subject) = self.get(codigo).await? else {
            return Ok(false);
        };

        let mut active: materias::ActiveModel = subject.into();
        active.nombre = Set(changes.nombre);
        active.creditos = Set(changes.creditos);
        active.plan_id = Set(changes.plan_id);
        active
            .update(&self.conn)
            .await
            .context("Failed to update subject")?;

        Ok(true)
    }

    /// Soft delete is `set_active(codigo, false)`.
    pub async fn set_active(&self, codigo: &str, activo: bool) -> Result<bool> {
        let result = Materias::update_many()
            .col_expr(
                materias::Column::Estado,
                sea_orm::sea_query::Expr::value(activo),
            )
            .filter(materias::Column::Codigo.eq(codigo))
            .exec(&self.conn)
            .await
            .context("Failed to change subject state")?;

        Ok(result.rows_affected > 0)
    }
}
