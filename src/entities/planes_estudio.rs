use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "planes_estudio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub plan_id: i32,
    pub nombre_plan: String,
    pub anio_inicio: i32,
    pub estado: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::materias::Entity")]
    Materias,
}

impl Related<super::materias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Materias.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
