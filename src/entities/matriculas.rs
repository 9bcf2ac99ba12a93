use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EstadoMatricula {
    #[sea_orm(string_value = "Confirmada")]
    Confirmada,
    #[sea_orm(string_value = "Anulada")]
    Anulada,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "matriculas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub matricula_id: i32,
    pub estudiante_id: i32,
    pub periodo_id: i32,
    pub fecha: String,
    pub estado: EstadoMatricula,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::estudiantes::Entity",
        from = "Column::EstudianteId",
        to = "super::estudiantes::Column::EstudianteId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Estudiantes,
    #[sea_orm(
        belongs_to = "super::periodos::Entity",
        from = "Column::PeriodoId",
        to = "super::periodos::Column::PeriodoId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Periodos,
    #[sea_orm(has_many = "super::pagos::Entity")]
    Pagos,
}

impl Related<super::estudiantes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Estudiantes.def()
    }
}

impl Related<super::periodos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periodos.def()
    }
}

impl Related<super::pagos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pagos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
