use axum::{
    Extension, Json,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::extract::ApiJson;
use super::{ApiError, ApiResponse, AppState, PerfilDto};
use crate::services::Claims;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email")]
    pub correo: Option<String>,
    #[serde(default, alias = "password", alias = "contrasena")]
    pub clave: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Serialize)]
pub struct PerfilResponse {
    pub usuario: Option<PerfilDto>,
}

// ============================================================================
// Middleware
// ============================================================================

/// Requires `Authorization: Bearer <token>`. On success the decoded [`Claims`]
/// are available to handlers as a request extension.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let claims = state.auth.authenticate(header.as_deref()).await?;

    tracing::Span::current().record("user_id", claims.id);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /login
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let correo = payload.correo.unwrap_or_default();
    let clave = payload.clave.unwrap_or_default();

    let result = state.auth.login(&correo, &clave).await?;
    tracing::Span::current().record("user_id", result.claims.id);

    Ok(Json(ApiResponse::success(LoginResponse {
        token: result.token,
    })))
}

/// GET /perfil
pub async fn perfil(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<PerfilResponse>>, ApiError> {
    let usuario = state.auth.profile(&claims).await?.map(PerfilDto::from);

    Ok(Json(ApiResponse::success(PerfilResponse { usuario })))
}
