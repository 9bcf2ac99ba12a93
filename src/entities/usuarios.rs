use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "usuarios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub usuario_id: i32,

    pub nombre_completo: String,

    #[sea_orm(unique)]
    pub correo: String,

    /// Argon2id PHC string, or a legacy plaintext value awaiting migration.
    pub contrasena: String,

    pub rol_id: i32,

    pub estado: bool,

    pub fecha_creacion: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RolId",
        to = "super::roles::Column::RolId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Roles,
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
