use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};

use crate::entities::{prelude::*, roles, usuarios};
use crate::models::account::{Account, StoredCredential};

/// Account listing row, joined with the role name. Never carries the credential.
#[derive(Debug, Clone, FromQueryResult)]
pub struct UserRow {
    pub usuario_id: i32,
    pub nombre_completo: String,
    pub correo: String,
    pub estado: bool,
    pub nombre_rol: String,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct ProfileRow {
    pub usuario_id: i32,
    pub nombre_completo: String,
    pub correo: String,
    pub nombre_rol: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub nombre_completo: String,
    pub correo: String,
    pub password_hash: String,
    pub rol_id: i32,
    pub estado: bool,
}

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub nombre_completo: String,
    pub correo: String,
    pub rol_id: i32,
    /// `None` keeps the current state.
    pub estado: Option<bool>,
    /// Already hashed. `None` keeps the stored credential.
    pub password_hash: Option<String>,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<UserRow>> {
        Usuarios::find()
            .select_only()
            .column(usuarios::Column::UsuarioId)
            .column(usuarios::Column::NombreCompleto)
            .column(usuarios::Column::Correo)
            .column(usuarios::Column::Estado)
            .column(roles::Column::NombreRol)
            .join(JoinType::InnerJoin, usuarios::Relation::Roles.def())
            .order_by_asc(usuarios::Column::NombreCompleto)
            .into_model::<UserRow>()
            .all(&self.conn)
            .await
            .context("Failed to list users")
    }

    /// Looks up a login principal, credential included.
    pub async fn find_account_by_email(&self, correo: &str) -> Result<Option<Account>> {
        let row = Usuarios::find()
            .filter(usuarios::Column::Correo.eq(correo))
            .find_also_related(Roles)
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(row.and_then(|(user, role)| {
            let role = role?;
            Some(Account {
                id: user.usuario_id,
                nombre_completo: user.nombre_completo,
                correo: user.correo,
                rol: role.nombre_rol,
                estado: user.estado,
                credential: StoredCredential::parse(user.contrasena),
            })
        }))
    }

    pub async fn get_profile(&self, usuario_id: i32) -> Result<Option<ProfileRow>> {
        Usuarios::find_by_id(usuario_id)
            .select_only()
            .column(usuarios::Column::UsuarioId)
            .column(usuarios::Column::NombreCompleto)
            .column(usuarios::Column::Correo)
            .column(roles::Column::NombreRol)
            .join(JoinType::InnerJoin, usuarios::Relation::Roles.def())
            .into_model::<ProfileRow>()
            .one(&self.conn)
            .await
            .context("Failed to query user profile")
    }

    pub async fn exists(&self, usuario_id: i32) -> Result<bool> {
        let count = Usuarios::find_by_id(usuario_id)
            .count(&self.conn)
            .await
            .context("Failed to query user by ID")?;
        Ok(count > 0)
    }

    /// True when another account already uses `correo`.
    pub async fn email_exists(&self, correo: &str, excluding: Option<i32>) -> Result<bool> {
        let mut query = Usuarios::find().filter(usuarios::Column::Correo.eq(correo));
        if let Some(id) = excluding {
            query = query.filter(usuarios::Column::UsuarioId.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check email uniqueness")?;
        Ok(count > 0)
    }

    pub async fn create(&self, user: NewUser) -> Result<i32> {
        let model = usuarios::ActiveModel {
            nombre_completo: Set(user.nombre_completo),
            correo: Set(user.correo),
            contrasena: Set(user.password_hash),
            rol_id: Set(user.rol_id),
            estado: Set(user.estado),
            fecha_creacion: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to create user")?;

        Ok(model.usuario_id)
    }

    /// Returns `false` when the account does not exist.
    pub async fn update(&self, usuario_id: i32, changes: UserChanges) -> Result<bool> {
        let Some(user) = Usuarios::find_by_id(usuario_id)
            .one(&self.conn)
            .await
            .context("Failed to query user for update")?
        else {
            return Ok(false);
        };

        let mut active: usuarios::ActiveModel = user.into();
        active.nombre_completo = Set(changes.nombre_completo);
        active.correo = Set(changes.correo);
        active.rol_id = Set(changes.rol_id);
        if let Some(estado) = changes.estado {
            active.estado = Set(estado);
        }
        if let Some(hash) = changes.password_hash {
            active.contrasena = Set(hash);
        }
        active
            .update(&self.conn)
            .await
            .context("Failed to update user")?;

        Ok(true)
    }

    /// Physically removes the account.
    pub async fn delete(&self, usuario_id: i32) -> Result<bool> {
        let result = Usuarios::delete_by_id(usuario_id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected > 0)
    }

    /// Swaps a legacy plaintext credential for `new_hash`, only if the row still
    /// holds `expected_plaintext`. Returns whether a row was rewritten.
    pub async fn upgrade_plaintext_password(
        &self,
        usuario_id: i32,
        expected_plaintext: &str,
        new_hash: &str,
    ) -> Result<bool> {
        let result = Usuarios::update_many()
            .col_expr(
                usuarios::Column::Contrasena,
                sea_orm::sea_query::Expr::value(new_hash),
            )
            .filter(usuarios::Column::UsuarioId.eq(usuario_id))
            .filter(usuarios::Column::Contrasena.eq(expected_plaintext))
            .exec(&self.conn)
            .await
            .context("Failed to upgrade stored password")?;

        Ok(result.rows_affected == 1)
    }

    /// Test and bootstrap helper: writes a raw credential value as-is.
    pub async fn insert_raw(
        &self,
        nombre_completo: &str,
        correo: &str,
        contrasena: &str,
        rol_id: i32,
    ) -> Result<i32> {
        self.create(NewUser {
            nombre_completo: nombre_completo.to_string(),
            correo: correo.to_string(),
            password_hash: contrasena.to_string(),
            rol_id,
            estado: true,
        })
        .await
    }
}
