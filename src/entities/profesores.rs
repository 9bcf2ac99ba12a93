use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profesores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub profesor_id: i32,
    pub nombre: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub estado: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
