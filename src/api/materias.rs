use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{lenient_i32, required, required_number};
use super::{ApiError, ApiResponse, AppState, Created, MateriaDto};
use crate::db::repositories::subject::SubjectChanges;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MateriaRequest {
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub creditos: Option<i32>,
    #[serde(default, rename = "PlanID", deserialize_with = "lenient_i32")]
    pub plan_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct EstadoRequest {
    #[serde(default)]
    pub activo: Option<serde_json::Value>,
}

#[derive(Serialize)]
pub struct MateriasResponse {
    pub materias: Vec<MateriaDto>,
}

#[derive(Serialize)]
pub struct MateriaResponse {
    pub materia: MateriaDto,
}

/// Builds the mutable part of a subject. `PlanID` of 0 means "no plan".
async fn subject_changes(
    state: &AppState,
    nombre: Option<String>,
    creditos: Option<i32>,
    plan_id: Option<i32>,
    missing: &str,
) -> Result<SubjectChanges, ApiError> {
    let nombre = required(nombre, missing)?;
    let creditos = required_number(creditos, missing)?;
    if creditos < 0 {
        return Err(ApiError::validation("Creditos debe ser positivo"));
    }

    let plan_id = plan_id.filter(|id| *id != 0);
    if let Some(id) = plan_id
        && state.store.plans().get(id).await?.is_none()
    {
        return Err(ApiError::validation("Plan no válido"));
    }

    Ok(SubjectChanges {
        nombre,
        creditos,
        plan_id,
    })
}

/// GET /materias
pub async fn list_materias(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MateriasResponse>>, ApiError> {
    let materias = state.store.subjects().list().await?;

    Ok(Json(ApiResponse::success(MateriasResponse {
        materias: materias.into_iter().map(MateriaDto::from).collect(),
    })))
}

/// POST /materias
pub async fn create_materia(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<MateriaRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<String>>>), ApiError> {
    let missing = "Código, Nombre y Créditos requeridos";
    let codigo = required(body.codigo, missing)?;
    let changes = subject_changes(&state, body.nombre, body.creditos, body.plan_id, missing).await?;

    if state.store.subjects().exists(&codigo).await? {
        return Err(ApiError::conflict("Código de materia ya registrado"));
    }

    let materia = state.store.subjects().create(codigo, changes).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Materia creada",
            Created { id: materia.codigo },
        )),
    ))
}

/// GET /materias/{codigo}
pub async fn get_materia(
    State(state): State<Arc<AppState>>,
    ApiPath(codigo): ApiPath<String>,
) -> Result<Json<ApiResponse<MateriaResponse>>, ApiError> {
    let materia = state
        .store
        .subjects()
        .get(&codigo)
        .await?
        .ok_or_else(|| ApiError::NotFound("Materia no encontrada".to_string()))?;

    Ok(Json(ApiResponse::success(MateriaResponse {
        materia: materia.into(),
    })))
}

/// PUT /materias/{codigo}
pub async fn update_materia(
    State(state): State<Arc<AppState>>,
    ApiPath(codigo): ApiPath<String>,
    ApiJson(body): ApiJson<MateriaRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let changes = subject_changes(
        &state,
        body.nombre,
        body.creditos,
        body.plan_id,
        "Nombre y Créditos requeridos",
    )
    .await?;

    if !state.store.subjects().update(&codigo, changes).await? {
        return Err(ApiError::NotFound("Materia no encontrada".to_string()));
    }

    Ok(Json(ApiResponse::message("Materia actualizada")))
}

/// DELETE /materias/{codigo}
pub async fn delete_materia(
    State(state): State<Arc<AppState>>,
    ApiPath(codigo): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.subjects().set_active(&codigo, false).await? {
        return Err(ApiError::NotFound("Materia no encontrada".to_string()));
    }

    Ok(Json(ApiResponse::message("Materia inactivada")))
}

/// PUT /materias/{codigo}/estado
pub async fn set_materia_estado(
    State(state): State<Arc<AppState>>,
    ApiPath(codigo): ApiPath<String>,
    ApiJson(body): ApiJson<EstadoRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Some(activo) = body.activo.as_ref().and_then(serde_json::Value::as_bool) else {
        return Err(ApiError::validation("activo debe ser true/false"));
    };

    if !state.store.subjects().set_active(&codigo, activo).await? {
        return Err(ApiError::NotFound("Materia no encontrada".to_string()));
    }

    let message = if activo {
        "Materia activada"
    } else {
        "Materia desactivada"
    };
    Ok(Json(ApiResponse::message(message)))
}
