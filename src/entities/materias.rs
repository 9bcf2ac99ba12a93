use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "materias")]
pub struct Model {
    /// Subject code, e.g. `MAT-101`. Natural key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub codigo: String,
    pub nombre: String,
    pub creditos: i32,
    pub plan_id: Option<i32>,
    pub estado: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::planes_estudio::Entity",
        from = "Column::PlanId",
        to = "super::planes_estudio::Column::PlanId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    PlanesEstudio,
}

impl Related<super::planes_estudio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanesEstudio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
