use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{planes_estudio, prelude::*};

#[derive(Debug, Clone)]
pub struct PlanInput {
    pub nombre_plan: String,
    pub anio_inicio: i32,
    /// Defaults to active on create; `None` keeps the current state on update.
    pub estado: Option<bool>,
}

pub struct PlanRepository {
    conn: DatabaseConnection,
}

impl PlanRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<planes_estudio::Model>> {
        PlanesEstudio::find()
            .order_by_asc(planes_estudio::Column::NombrePlan)
            .all(&self.conn)
            .await
            .context("Failed to list study plans")
    }

    pub async fn get(&self, plan_id: i32) -> Result<Option<planes_estudio::Model>> {
        PlanesEstudio::find_by_id(plan_id)
            .one(&self.conn)
            .await
            .context("Failed to query study plan")
    }

    pub async fn create(&self, input: PlanInput) -> Result<planes_estudio::Model> {
        planes_estudio::ActiveModel {
            nombre_plan: Set(input.nombre_plan),
            anio_inicio: Set(input.anio_inicio),
            estado: Set(input.estado.unwrap_or(true)),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create study plan")
    }

    pub async fn update(&self, plan_id: i32, input: PlanInput) -> Result<bool> {
        let Some(plan) = self.get(plan_id).await? else {
            return Ok(false);
        };

        let mut active: planes_estudio::ActiveModel = plan.into();
        active.nombre_plan = Set(input.nombre_plan);
        active.anio_inicio = Set(input.anio_inicio);
        if let Some(estado) = input.estado {
            active.estado = Set(estado);
        }
        active
            .update(&self.conn)
            .await
            .context("Failed to update study plan")?;

        Ok(true)
    }

    pub async fn deactivate(&self, plan_id: i32) -> Result<bool> {
        let result = PlanesEstudio::update_many()
            .col_expr(
                planes_estudio::Column::Estado,
                sea_orm::sea_query::Expr::value(false),
            )
            .filter(planes_estudio::Column::PlanId.eq(plan_id))
            .exec(&self.conn)
            .await
            .context("Failed to deactivate study plan")?;

        Ok(result.rows_affected > 0)
    }
}
