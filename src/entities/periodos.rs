use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "periodos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub periodo_id: i32,

    /// `Primer Semestre`, `Segundo Semestre`, `Verano`, or a free-form name.
    pub nombre: String,

    pub anio: i32,

    pub estado: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::matriculas::Entity")]
    Matriculas,
}

impl Related<super::matriculas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Matriculas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
