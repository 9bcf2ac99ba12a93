use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{optional_text, parse_optional_date, required, validate_email};
use super::{ApiError, ApiResponse, AppState, Created, EstudianteDto};
use crate::db::repositories::student::StudentInput;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EstudianteRequest {
    #[serde(default)]
    pub cedula: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub fecha_nacimiento: Option<String>,
    #[serde(default)]
    pub correo: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
}

impl EstudianteRequest {
    fn into_input(self) -> Result<StudentInput, ApiError> {
        let missing = "Cédula y Nombre requeridos";
        let correo = optional_text(self.correo);
        if let Some(correo) = &correo {
            validate_email(correo)?;
        }

        Ok(StudentInput {
            cedula: required(self.cedula, missing)?,
            nombre: required(self.nombre, missing)?,
            fecha_nacimiento: parse_optional_date(self.fecha_nacimiento)?,
            correo,
            telefono: optional_text(self.telefono),
        })
    }
}

#[derive(Deserialize)]
pub struct CedulaQuery {
    pub cedula: Option<String>,
}

#[derive(Serialize)]
pub struct EstudiantesResponse {
    pub estudiantes: Vec<EstudianteDto>,
}

#[derive(Serialize)]
pub struct EstudianteResponse {
    pub estudiante: EstudianteDto,
}

#[derive(Serialize)]
pub struct CedulaResponse {
    pub existe: bool,
}

fn not_found() -> ApiError {
    ApiError::not_found("Estudiante")
}

async fn list_by_state(
    state: &AppState,
    activos: bool,
) -> Result<Json<ApiResponse<EstudiantesResponse>>, ApiError> {
    let estudiantes = state.store.students().list(activos).await?;

    Ok(Json(ApiResponse::success(EstudiantesResponse {
        estudiantes: estudiantes.into_iter().map(EstudianteDto::from).collect(),
    })))
}

/// GET /estudiantes
pub async fn list_estudiantes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<EstudiantesResponse>>, ApiError> {
    list_by_state(&state, true).await
}

/// GET /estudiantes/inactivos
pub async fn list_inactivos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<EstudiantesResponse>>, ApiError> {
    list_by_state(&state, false).await
}

/// GET /estudiantes/verificar-cedula?cedula=
pub async fn verificar_cedula(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CedulaQuery>,
) -> Result<Json<ApiResponse<CedulaResponse>>, ApiError> {
    let cedula = required(query.cedula, "Cédula requerida")?;
    let existe = state.store.students().cedula_exists(&cedula, None).await?;

    Ok(Json(ApiResponse::success(CedulaResponse { existe })))
}

/// POST /estudiantes
pub async fn create_estudiante(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<EstudianteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let input = body.into_input()?;

    if state.store.students().cedula_exists(&input.cedula, None).await? {
        return Err(ApiError::conflict("Cédula ya registrada"));
    }

    let estudiante = state.store.students().create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Estudiante creado",
            Created {
                id: estudiante.estudiante_id,
            },
        )),
    ))
}

/// GET /estudiantes/{id}
pub async fn get_estudiante(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<EstudianteResponse>>, ApiError> {
    let estudiante = state.store.students().get(id).await?.ok_or_else(not_found)?;

    Ok(Json(ApiResponse::success(EstudianteResponse {
        estudiante: estudiante.into(),
    })))
}

/// PUT /estudiantes/{id}
pub async fn update_estudiante(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<EstudianteRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let input = body.into_input()?;

    if state.store.students().get(id).await?.is_none() {
        return Err(not_found());
    }
    if state
        .store
        .students()
        .cedula_exists(&input.cedula, Some(id))
        .await?
    {
        return Err(ApiError::conflict("Cédula ya registrada"));
    }

    if !state.store.students().update(id, input).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::message("Estudiante actualizado")))
}

/// DELETE /estudiantes/{id}
pub async fn delete_estudiante(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.students().set_active(id, false).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::message("Estudiante inactivado")))
}

/// PUT /estudiantes/{id}/reactivar
pub async fn reactivate_estudiante(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.students().set_active(id, true).await? {
        return Err(not_found());
    }

    Ok(Json(ApiResponse::message("Estudiante reactivado")))
}
