use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum EstadoPago {
    #[sea_orm(string_value = "Registrado")]
    Registrado,
    #[sea_orm(string_value = "Anulado")]
    Anulado,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pagos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub pago_id: i32,
    pub matricula_id: i32,
    pub monto: f64,
    pub fecha_pago: String,
    /// Cash, transfer, card... free text from the front desk.
    pub metodo: Option<String>,
    pub referencia: Option<String>,
    pub estado: EstadoPago,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::matriculas::Entity",
        from = "Column::MatriculaId",
        to = "super::matriculas::Column::MatriculaId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Matriculas,
}

impl Related<super::matriculas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matriculas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
