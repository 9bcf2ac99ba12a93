use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, SeaOrmAuthService};

pub mod auth;
mod error;
mod estudiantes;
pub mod extract;
mod materias;
mod matriculas;
mod observability;
mod pagos;
mod periodos;
mod planes;
mod profesores;
mod roles;
mod types;
mod usuarios;
pub mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Opens the database (applying migrations) and wires the services.
pub async fn create_app_state(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::connect(&config.general).await?;
    Ok(create_app_state_with_store(config, store, prometheus_handle))
}

#[must_use]
pub fn create_app_state_with_store(
    config: Config,
    store: Store,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    let auth: Arc<dyn AuthService> =
        Arc::new(SeaOrmAuthService::new(store.clone(), &config.security));

    Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config.server;

    let api_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/login", post(auth::login))
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_router)
        .fallback_service(ServeDir::new(&server.public_dir))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.cors_allowed_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = if origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    layer
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(86_400))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Ruta no encontrada".to_string())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/perfil", get(auth::perfil))
        .route(
            "/usuarios",
            get(usuarios::list_usuarios).post(usuarios::create_usuario),
        )
        .route(
            "/usuarios/{id}",
            put(usuarios::update_usuario).delete(usuarios::delete_usuario),
        )
        .route("/roles", get(roles::list_roles))
        .route("/planes", get(planes::list_planes).post(planes::create_plan))
        .route("/planes/{id}", put(planes::update_plan))
        .route("/planes/{id}/inactivar", put(planes::deactivate_plan))
        .route(
            "/materias",
            get(materias::list_materias).post(materias::create_materia),
        )
        .route(
            "/materias/{codigo}",
            get(materias::get_materia)
                .put(materias::update_materia)
                .delete(materias::delete_materia),
        )
        .route(
            "/materias/{codigo}/estado",
            put(materias::set_materia_estado),
        )
        .route(
            "/estudiantes",
            get(estudiantes::list_estudiantes).post(estudiantes::create_estudiante),
        )
        .route("/estudiantes/inactivos", get(estudiantes::list_inactivos))
        .route(
            "/estudiantes/verificar-cedula",
            get(estudiantes::verificar_cedula),
        )
        .route(
            "/estudiantes/{id}",
            get(estudiantes::get_estudiante)
                .put(estudiantes::update_estudiante)
                .delete(estudiantes::delete_estudiante),
        )
        .route(
            "/estudiantes/{id}/reactivar",
            put(estudiantes::reactivate_estudiante),
        )
        .route(
            "/profesores",
            get(profesores::list_profesores).post(profesores::create_profesor),
        )
        .route(
            "/profesores/{id}",
            get(profesores::get_profesor)
                .put(profesores::update_profesor)
                .delete(profesores::delete_profesor),
        )
        .route(
            "/periodos",
            get(periodos::list_periodos).post(periodos::create_periodo),
        )
        .route(
            "/matriculas",
            get(matriculas::list_matriculas).post(matriculas::create_matricula),
        )
        .route(
            "/matriculas/{id}",
            delete(matriculas::cancel_matricula),
        )
        .route("/pagos", get(pagos::list_pagos).post(pagos::create_pago))
        .route(
            "/pagos/{id}",
            get(pagos::get_pago).delete(pagos::void_pago),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
