use crate::entities::{estudiantes, matriculas, prelude::*};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listing screens filter on these on every load
        manager
            .create_index(
                Index::create()
                    .name("idx_estudiantes_estado")
                    .table(Estudiantes)
                    .col(estudiantes::Column::Estado)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_matriculas_estado")
                    .table(Matriculas)
                    .col(matriculas::Column::Estado)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_matriculas_estado")
                    .table(Matriculas)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_estudiantes_estado")
                    .table(Estudiantes)
                    .to_owned(),
            )
            .await
    }
}
