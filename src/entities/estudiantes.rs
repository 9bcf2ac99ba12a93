use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "estudiantes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub estudiante_id: i32,

    /// National identity number.
    #[sea_orm(unique)]
    pub cedula: String,

    pub nombre: String,

    pub fecha_nacimiento: Option<Date>,

    pub correo: Option<String>,

    pub telefono: Option<String>,

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
