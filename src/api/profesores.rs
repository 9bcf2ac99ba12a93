use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{optional_text, required, validate_email};
use super::{ApiError, ApiResponse, AppState, Created, ProfesorDto};
use crate::db::repositories::teacher::TeacherInput;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfesorRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
}

impl ProfesorRequest {
    fn into_input(self) -> Result<TeacherInput, ApiError> {
        let correo = optional_text(self.correo);
        if let Some(correo) = &correo {
            validate_email(correo)?;
        }

        Ok(TeacherInput {
            nombre: required(self.nombre, "Nombre requerido")?,
            correo,
            telefono: optional_text(self.telefono),
        })
    }
}

#[derive(Serialize)]
pub struct ProfesoresResponse {
    pub profesores: Vec<ProfesorDto>,
}

#[derive(Serialize)]
pub struct ProfesorResponse {
    pub profesor: ProfesorDto,
}

/// GET /profesores
pub async fn list_profesores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ProfesoresResponse>>, ApiError> {
    let profesores = state.store.teachers().list_active().await?;

    Ok(Json(ApiResponse::success(ProfesoresResponse {
        profesores: profesores.into_iter().map(ProfesorDto::from).collect(),
    })))
}

/// POST /profesores
pub async fn create_profesor(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ProfesorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let profesor = state.store.teachers().create(body.into_input()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Profesor creado",
            Created {
                id: profesor.profesor_id,
            },
        )),
    ))
}

/// GET /profesores/{id}
pub async fn get_profesor(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<ProfesorResponse>>, ApiError> {
    let profesor = state
        .store
        .teachers()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Profesor"))?;

    Ok(Json(ApiResponse::success(ProfesorResponse {
        profesor: profesor.into(),
    })))
}

/// PUT /profesores/{id}
pub async fn update_profesor(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<ProfesorRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.teachers().update(id, body.into_input()?).await? {
        return Err(ApiError::not_found("Profesor"));
    }

    Ok(Json(ApiResponse::message("Profesor actualizado")))
}

/// DELETE /profesores/{id}
pub async fn delete_profesor(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.teachers().deactivate(id).await? {
        return Err(ApiError::not_found("Profesor"));
    }

    Ok(Json(ApiResponse::message("Profesor inactivado")))
}
