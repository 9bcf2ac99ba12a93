use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use crate::entities::{periodos, prelude::*};

/// Position of a period name within its academic year. Unknown names sort last.
#[must_use]
pub fn semester_rank(nombre: &str) -> u8 {
    match nombre {
        "Primer Semestre" => 1,
        "Segundo Semestre" => 2,
        "Verano" => 3,
        _ => 4,
    }
}

pub struct PeriodRepository {
    conn: DatabaseConnection,
}

impl PeriodRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Newest year first, then by position within the year.
    pub async fn list(&self) -> Result<Vec<periodos::Model>> {
        let mut periods = Periodos::find()
            .all(&self.conn)
            .await
            .context("Failed to list periods")?;

        periods.sort_by(|a, b| {
            b.anio
                .cmp(&a.anio)
                .then_with(|| semester_rank(&a.nombre).cmp(&semester_rank(&b.nombre)))
                .then_with(|| a.periodo_id.cmp(&b.periodo_id))
        });

        Ok(periods)
    }

    pub async fn exists(&self, periodo_id: i32) -> Result<bool> {
        let count = Periodos::find_by_id(periodo_id)
            .count(&self.conn)
            .await
            .context("Failed to query period")?;
        Ok(count > 0)
    }

    pub async fn create(&self, nombre: String, anio: i32) -> Result<periodos::Model> {
        periodos::ActiveModel {
            nombre: Set(nombre),
            anio: Set(anio),
            estado: Set(true),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create period")
    }
}
