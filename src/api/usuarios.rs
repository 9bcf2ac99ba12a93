use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{lenient_i32, required, required_number, validate_email};
use super::{ApiError, ApiResponse, AppState, Created, UsuarioDto};
use crate::db::repositories::user::{NewUser, UserChanges};
use crate::services::credential::hash_in_background;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UsuarioRequest {
    #[serde(default)]
    pub nombre_completo: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub contrasena: Option<String>,
    #[serde(default, rename = "RolID", deserialize_with = "lenient_i32")]
    pub rol_id: Option<i32>,
    #[serde(default)]
    pub estado: Option<bool>,
}

#[derive(Serialize)]
pub struct UsuariosResponse {
    pub usuarios: Vec<UsuarioDto>,
}

async fn ensure_role_exists(state: &AppState, rol_id: i32) -> Result<(), ApiError> {
    if state.store.roles().get(rol_id).await?.is_none() {
        return Err(ApiError::validation("Rol no válido"));
    }
    Ok(())
}

/// GET /usuarios
pub async fn list_usuarios(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<UsuariosResponse>>, ApiError> {
    let usuarios = state.store.users().list().await?;

    Ok(Json(ApiResponse::success(UsuariosResponse {
        usuarios: usuarios.into_iter().map(UsuarioDto::from).collect(),
    })))
}

/// POST /usuarios
pub async fn create_usuario(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<UsuarioRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let missing = "Faltan campos";
    let nombre_completo = required(body.nombre_completo, missing)?;
    let correo = required(body.correo, missing)?;
    let contrasena = body
        .contrasena
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::validation(missing))?;
    let rol_id = required_number(body.rol_id, missing)?;

    validate_email(&correo)?;
    if state.store.users().email_exists(&correo, None).await? {
        return Err(ApiError::conflict("Correo ya registrado"));
    }
    ensure_role_exists(&state, rol_id).await?;

    let password_hash = hash_in_background(&contrasena, &state.config.security).await?;
    let id = state
        .store
        .users()
        .create(NewUser {
            nombre_completo,
            correo,
            password_hash,
            rol_id,
            estado: body.estado.unwrap_or(true),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Usuario creado", Created { id })),
    ))
}

/// PUT /usuarios/{id}
///
/// A non-empty `Contrasena` replaces the credential; otherwise it is kept.
pub async fn update_usuario(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<UsuarioRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let missing = "Faltan campos";
    let nombre_completo = required(body.nombre_completo, missing)?;
    let correo = required(body.correo, missing)?;
    let rol_id = required_number(body.rol_id, missing)?;

    if !state.store.users().exists(id).await? {
        return Err(ApiError::not_found("Usuario"));
    }

    validate_email(&correo)?;
    if state.store.users().email_exists(&correo, Some(id)).await? {
        return Err(ApiError::conflict("Correo ya registrado"));
    }
    ensure_role_exists(&state, rol_id).await?;

    let password_hash = match body.contrasena.filter(|c| !c.is_empty()) {
        Some(clave) => Some(hash_in_background(&clave, &state.config.security).await?),
        None => None,
    };

    let updated = state
        .store
        .users()
        .update(
            id,
            UserChanges {
                nombre_completo,
                correo,
                rol_id,
                estado: body.estado,
                password_hash,
            },
        )
        .await?;

    if !updated {
        return Err(ApiError::not_found("Usuario"));
    }

    Ok(Json(ApiResponse::message("Usuario actualizado")))
}

/// DELETE /usuarios/{id}
pub async fn delete_usuario(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.users().delete(id).await? {
        return Err(ApiError::not_found("Usuario"));
    }

    Ok(Json(ApiResponse::message("Usuario eliminado")))
}
