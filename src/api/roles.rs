use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, RolDto};

#[derive(Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RolDto>,
}

/// GET /roles
pub async fn list_roles(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<RolesResponse>>, ApiError> {
    let roles = state.store.roles().list().await?;

    Ok(Json(ApiResponse::success(RolesResponse {
        roles: roles.into_iter().map(RolDto::from).collect(),
    })))
}
