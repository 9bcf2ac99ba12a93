use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{lenient_i32, required_number};
use super::{ApiError, ApiResponse, AppState, Created, MatriculaDto};

#[derive(Deserialize)]
pub struct MatriculaRequest {
    #[serde(default, rename = "EstudianteID", deserialize_with = "lenient_i32")]
    pub estudiante_id: Option<i32>,
    #[serde(default, rename = "PeriodoID", deserialize_with = "lenient_i32")]
    pub periodo_id: Option<i32>,
}

#[derive(Serialize)]
pub struct MatriculasResponse {
    pub matriculas: Vec<MatriculaDto>,
}

/// GET /matriculas
pub async fn list_matriculas(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MatriculasResponse>>, ApiError> {
    let matriculas = state.store.enrollments().list_confirmed().await?;

    Ok(Json(ApiResponse::success(MatriculasResponse {
        matriculas: matriculas.into_iter().map(MatriculaDto::from).collect(),
    })))
}

/// POST /matriculas
pub async fn create_matricula(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<MatriculaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let missing = "EstudianteID y PeriodoID requeridos";
    let estudiante_id = required_number(body.estudiante_id, missing)?;
    let periodo_id = required_number(body.periodo_id, missing)?;

    if state.store.students().get(estudiante_id).await?.is_none() {
        return Err(ApiError::not_found("Estudiante"));
    }
    if !state.store.periods().exists(periodo_id).await? {
        return Err(ApiError::not_found("Periodo"));
    }
    if state
        .store
        .enrollments()
        .has_confirmed(estudiante_id, periodo_id)
        .await?
    {
        return Err(ApiError::conflict(
            "El estudiante ya tiene una matrícula en este periodo",
        ));
    }

    let matricula = state
        .store
        .enrollments()
        .create(estudiante_id, periodo_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Matrícula registrada",
            Created {
                id: matricula.matricula_id,
            },
        )),
    ))
}

/// DELETE /matriculas/{id}
pub async fn cancel_matricula(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.enrollments().cancel(id).await? {
        return Err(ApiError::NotFound("Matrícula no encontrada".to_string()));
    }

    Ok(Json(ApiResponse::message("Matrícula anulada")))
}
