use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::{ApiJson, ApiPath};
use super::validation::{lenient_f64, lenient_i32, optional_text, required_number};
use super::{ApiError, ApiResponse, AppState, Created, PagoDto};
use crate::db::repositories::payment::NewPayment;
use crate::entities::matriculas::EstadoMatricula;

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PagoRequest {
    #[serde(default, rename = "MatriculaID", deserialize_with = "lenient_i32")]
    pub matricula_id: Option<i32>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub monto: Option<f64>,
    #[serde(default)]
    pub metodo: Option<String>,
    #[serde(default)]
    pub referencia: Option<String>,
}

#[derive(Serialize)]
pub struct PagosResponse {
    pub pagos: Vec<PagoDto>,
}

#[derive(Serialize)]
pub struct PagoResponse {
    pub pago: PagoDto,
}

/// GET /pagos
pub async fn list_pagos(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<PagosResponse>>, ApiError> {
    let pagos = state.store.payments().list().await?;

    Ok(Json(ApiResponse::success(PagosResponse {
        pagos: pagos.into_iter().map(PagoDto::from).collect(),
    })))
}

/// POST /pagos
pub async fn create_pago(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<PagoRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Created<i32>>>), ApiError> {
    let missing = "MatriculaID y Monto requeridos";
    let matricula_id = required_number(body.matricula_id, missing)?;
    let monto = body.monto.ok_or_else(|| ApiError::validation(missing))?;
    if !monto.is_finite() || monto <= 0.0 {
        return Err(ApiError::validation("Monto debe ser mayor a cero"));
    }

    let matricula = state
        .store
        .enrollments()
        .get(matricula_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Matrícula no encontrada".to_string()))?;
    if matricula.estado == EstadoMatricula::Anulada {
        return Err(ApiError::validation("La matrícula está anulada"));
    }

    let pago = state
        .store
        .payments()
        .create(NewPayment {
            matricula_id,
            monto,
            metodo: optional_text(body.metodo),
            referencia: optional_text(body.referencia),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Pago registrado",
            Created { id: pago.pago_id },
        )),
    ))
}

/// GET /pagos/{id}
pub async fn get_pago(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<PagoResponse>>, ApiError> {
    let pago = state
        .store
        .payments()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pago"))?;

    Ok(Json(ApiResponse::success(PagoResponse { pago: pago.into() })))
}

/// DELETE /pagos/{id}
pub async fn void_pago(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store.payments().void(id).await? {
        return Err(ApiError::not_found("Pago"));
    }

    Ok(Json(ApiResponse::message("Pago anulado")))
}
