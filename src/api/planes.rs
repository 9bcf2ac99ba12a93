use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{lenient_i32, required, required_number};
use super::{ApiError, ApiResponse, AppState, Created, PlanDto};
use crate::db::repositories::plan::PlanInput;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlanRequest {
    #[serde(default)]
    pub nombre_plan: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub anio_inicio: Option<i32>,
    #[serde(default)]
    pub estado: Option<bool>,
}

impl PlanRequest {
    fn into_input(self) -> Result<PlanInput, ApiError> {
        let missing = "NombrePlan y AnioInicio requeridos";
        Ok(PlanInput {
            nombre_plan: required(self.nombre_plan, missing)?,
            anio_inicio: required_number(self.anio_inicio, missing)?,
            estado: self.estado,
        })
    }
}

#[derive(Serialize)]
pub struct PlanesResponse {
    pub planes: Vec<PlanDto>,
}

/// GET /planes
pub async fn list_planes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PlanesResponse>>, ApiError> {
    let planes = state.store.plans().list().await?;

    Ok(Json(ApiResponse::success(PlanesResponse {
        planes: planes.into_iter().map(PlanDto::from).collect(),
    })))
}

/// POST /planes
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PlanRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let plan = state.store.plans().create(body.into_input()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Plan creado",
            Created { id: plan.plan_id },
        )),
    ))
}

/// PUT /planes/{id}
pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<PlanRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.plans().update(id, body.into_input()?).await? {
        return Err(ApiError::not_found("Plan"));
    }

    Ok(Json(ApiResponse::message("Plan actualizado")))
}

/// PUT /planes/{id}/inactivar
pub async fn deactivate_plan(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.plans().deactivate(id).await? {
        return Err(ApiError::not_found("Plan"));
    }

    Ok(Json(ApiResponse::message("Plan inactivado")))
}
