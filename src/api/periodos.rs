use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::ApiJson;
use super::validation::{lenient_i32, required, required_number};
use super::{ApiError, ApiResponse, AppState, Created, PeriodoDto};

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PeriodoRequest {
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub anio: Option<i32>,
}

#[derive(Serialize)]
pub struct PeriodosResponse {
    pub periodos: Vec<PeriodoDto>,
}

/// GET /periodos
pub async fn list_periodos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PeriodosResponse>>, ApiError> {
    let periodos = state.store.periods().list().await?;

    Ok(Json(ApiResponse::success(PeriodosResponse {
        periodos: periodos.into_iter().map(PeriodoDto::from).collect(),
    })))
}

/// POST /periodos
pub async fn create_periodo(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PeriodoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let missing = "Nombre y Anio requeridos";
    let nombre = required(body.nombre, missing)?;
    let anio = required_number(body.anio, missing)?;

    let periodo = state.store.periods().create(nombre, anio).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Periodo creado",
            Created {
                id: periodo.periodo_id,
            },
        )),
    ))
}
