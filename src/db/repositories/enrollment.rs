use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::matriculas::{self, EstadoMatricula};
use crate::entities::{estudiantes, periodos, prelude::*};

/// Confirmed enrollment joined with student and period.
#[derive(Debug, Clone, FromQueryResult)]
pub struct EnrollmentRow {
    pub matricula_id: i32,
    pub estudiante_nombre: String,
    pub estudiante_cedula: String,
    pub periodo: String,
    pub anio: i32,
}

impl EnrollmentRow {
    /// `"nombre - cedula"`
    #[must_use]
    pub fn student_label(&self) -> String {
        format!("{} - {}", self.estudiante_nombre, self.estudiante_cedula)
    }
}

pub struct EnrollmentRepository {
    conn: DatabaseConnection,
}

impl EnrollmentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_confirmed(&self) -> Result<Vec<EnrollmentRow>> {
        Matriculas::find()
            .select_only()
            .column(matriculas::Column::MatriculaId)
            .column_as(estudiantes::Column::Nombre, "estudiante_nombre")
            .column_as(estudiantes::Column::Cedula, "estudiante_cedula")
            .column_as(periodos::Column::Nombre, "periodo")
            .column(periodos::Column::Anio)
            .join(JoinType::InnerJoin, matriculas::Relation::Estudiantes.def())
            .join(JoinType::InnerJoin, matriculas::Relation::Periodos.def())
            .filter(matriculas::Column::Estado.eq(EstadoMatricula::Confirmada))
            .order_by_desc(matriculas::Column::MatriculaId)
            .into_model::<EnrollmentRow>()
            .all(&self.conn)
            .await
            .context("Failed to list enrollments")
    }

    pub async fn get(&self, matricula_id: i32) -> Result<Option<matriculas::Model>> {
        Matriculas::find_by_id(matricula_id)
            .one(&self.conn)
            .await
            .context("Failed to query enrollment")
    }

    pub async fn has_confirmed(&self, estudiante_id: i32, periodo_id: i32) -> Result<bool> {
        let count = Matriculas::find()
            .filter(matriculas::Column::EstudianteId.eq(estudiante_id))
            .filter(matriculas::Column::PeriodoId.eq(periodo_id))
            .filter(matriculas::Column::Estado.eq(EstadoMatricula::Confirmada))
            .count(&self.conn)
            .await
            .context("Failed to check existing enrollment")?;
        Ok(count > 0)
    }

    pub async fn create(&self, estudiante_id: i32, periodo_id: i32) -> Result<matriculas::Model> {
        matriculas::ActiveModel {
            estudiante_id: Set(estudiante_id),
            periodo_id: Set(periodo_id),
            fecha: Set(chrono::Utc::now().to_rfc3339()),
            estado: Set(EstadoMatricula::Confirmada),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create enrollment")
    }

    pub async fn cancel(&self, matricula_id: i32) -> Result<bool> {
        let result = Matriculas::update_many()
            .col_expr(
                matriculas::Column::Estado,
                sea_orm::sea_query::Expr::value(EstadoMatricula::Anulada),
            )
            .filter(matriculas::Column::MatriculaId.eq(matricula_id))
            .exec(&self.conn)
            .await
            .context("Failed to cancel enrollment")?;

        Ok(result.rows_affected > 0)
    }
}
