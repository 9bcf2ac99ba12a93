use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::pagos::{self, EstadoPago};
use crate::entities::{estudiantes, matriculas, prelude::*};

/// Payment joined through its enrollment with the paying student.
#[derive(Debug, Clone, FromQueryResult)]
pub struct PaymentRow {
    pub pago_id: i32,
    pub matricula_id: i32,
    pub monto: f64,
    pub fecha_pago: String,
    pub metodo: Option<String>,
    pub referencia: Option<String>,
    pub estado: EstadoPago,
    pub estudiante: String,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub matricula_id: i32,
    pub monto: f64,
    pub metodo: Option<String>,
    pub referencia: Option<String>,
}

pub struct PaymentRepository {
    conn: DatabaseConnection,
}

impl PaymentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn joined() -> sea_orm::Select<Pagos> {
        Pagos::find()
            .column_as(estudiantes::Column::Nombre, "estudiante")
            .join(JoinType::InnerJoin, pagos::Relation::Matriculas.def())
            .join(JoinType::InnerJoin, matriculas::Relation::Estudiantes.def())
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<PaymentRow>> {
        Self::joined()
            .order_by_desc(pagos::Column::PagoId)
            .into_model::<PaymentRow>()
            .all(&self.conn)
            .await
            .context("Failed to list payments")
    }

    pub async fn get(&self, pago_id: i32) -> Result<Option<PaymentRow>> {
        Self::joined()
            .filter(pagos::Column::PagoId.eq(pago_id))
            .into_model::<PaymentRow>()
            .one(&self.conn)
            .await
            .context("Failed to query payment")
    }

    pub async fn create(&self, payment: NewPayment) -> Result<pagos::Model> {
        pagos::ActiveModel {
            matricula_id: Set(payment.matricula_id),
            monto: Set(payment.monto),
            fecha_pago: Set(chrono::Utc::now().to_rfc3339()),
            metodo: Set(payment.metodo),
            referencia: Set(payment.referencia),
            estado: Set(EstadoPago::Registrado),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to record payment")
    }

    pub async fn void(&self, pago_id: i32) -> Result<bool> {
        let result = Pagos::update_many()
            .col_expr(
                pagos::Column::Estado,
                sea_orm::sea_query::Expr::value(EstadoPago::Anulado),
            )
            .filter(pagos::Column::PagoId.eq(pago_id))
            .exec(&self.conn)
            .await
            .context("Failed to void payment")?;

        Ok(result.rows_affected > 0)
    }
}
