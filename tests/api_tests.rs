use academia::api::AppState;
use academia::config::Config;
use academia::db::migrator::ADMIN_EMAIL;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    state: Arc<AppState>,
    router: Router,
    token: String,
}

async fn spawn_app() -> TestApp {
    let db_path =
        std::env::temp_dir().join(format!("academia-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.security.jwt_secret = "api-test-secret".to_string();
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let state = academia::api::create_app_state(config, None)
        .await
        .expect("failed to create app state");
    let router = academia::api::router(state.clone());

    let login = state
        .auth
        .login(ADMIN_EMAIL, "admin")
        .await
        .expect("bootstrap admin login failed");

    TestApp {
        state,
        router,
        token: login.token,
    }
}

impl TestApp {
    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token));

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PUT", uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    async fn admin_role_id(&self) -> i64 {
        let (_, body) = self.get("/api/roles").await;
        body["roles"]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["NombreRol"] == "Administrador")
            .and_then(|r| r["RolID"].as_i64())
            .expect("admin role missing")
    }
}

#[tokio::test]
async fn test_unknown_api_route_returns_json_404() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/no-existe").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Ruta no encontrada");

    let (status, body) = app.send("PATCH", "/api/usuarios", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_roles_are_seeded() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/roles").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let names: Vec<&str> = body["roles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["NombreRol"].as_str())
        .collect();
    assert!(names.contains(&"Administrador"));
    assert_eq!(names.len(), 3);
}

#[tokio::test]
async fn test_usuario_lifecycle() {
    let app = spawn_app().await;
    let rol_id = app.admin_role_id().await;

    let (status, body) = app
        .post(
            "/api/usuarios",
            json!({
                "NombreCompleto": "Ana Pérez",
                "Correo": "ana@academia.local",
                "Contrasena": "secreta",
                "RolID": rol_id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["id"].as_i64().unwrap();

    // Stored hashed, never in the clear
    let account = app
        .state
        .store
        .find_account_by_email("ana@academia.local")
        .await
        .unwrap()
        .unwrap();
    assert!(account.credential.is_hashed());

    let (status, body) = app
        .post(
            "/api/usuarios",
            json!({
                "NombreCompleto": "Otra Ana",
                "Correo": "ana@academia.local",
                "Contrasena": "x",
                "RolID": rol_id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Correo ya registrado");

    let (status, _) = app
        .post(
            "/api/usuarios",
            json!({"NombreCompleto": "Sin Rol", "Correo": "sinrol@x.com", "Contrasena": "x"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/usuarios",
            json!({
                "NombreCompleto": "Mal Correo",
                "Correo": "no-es-correo",
                "Contrasena": "x",
                "RolID": rol_id
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/usuarios/{id}"),
            json!({
                "NombreCompleto": "Ana María Pérez",
                "Correo": "ana@academia.local",
                "RolID": rol_id,
                "Estado": false
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/usuarios").await;
    let ana = body["usuarios"]
        .as_array()
        .unwrap()
        .iter()
        .find(|u| u["UsuarioID"].as_i64() == Some(id))
        .unwrap()
        .clone();
    assert_eq!(ana["NombreCompleto"], "Ana María Pérez");
    assert_eq!(ana["Estado"], false);
    assert!(ana.get("Contrasena").is_none());

    let (status, _) = app.delete(&format!("/api/usuarios/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.delete(&format!("/api/usuarios/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuario no encontrado");

    assert!(
        app.state
            .store
            .find_account_by_email("ana@academia.local")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_planes_crud() {
    let app = spawn_app().await;

    let (status, body) = app
        .post("/api/planes", json!({"NombrePlan": "Ingeniería 2024", "AnioInicio": "2024"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = app.post("/api/planes", json!({"NombrePlan": "Sin año"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "NombrePlan y AnioInicio requeridos");

    let (status, _) = app
        .put(
            &format!("/api/planes/{id}"),
            json!({"NombrePlan": "Ingeniería 2025", "AnioInicio": 2025, "Estado": true}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.put(&format!("/api/planes/{id}/inactivar"), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/planes").await;
    let plan = body["planes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["PlanID"].as_i64() == Some(id))
        .unwrap()
        .clone();
    assert_eq!(plan["NombrePlan"], "Ingeniería 2025");
    assert_eq!(plan["AnioInicio"], 2025);
    assert_eq!(plan["Estado"], false);

    let (status, _) = app.put("/api/planes/9999/inactivar", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_materias_crud_and_estado() {
    let app = spawn_app().await;

    let (_, body) = app
        .post("/api/planes", json!({"NombrePlan": "Plan A", "AnioInicio": 2024}))
        .await;
    let plan_id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/materias",
            json!({"Codigo": "MAT101", "Nombre": "Cálculo I", "Creditos": 4, "PlanID": plan_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "MAT101");

    let (status, _) = app
        .post(
            "/api/materias",
            json!({"Codigo": "MAT101", "Nombre": "Duplicada", "Creditos": 3}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/materias",
            json!({"Codigo": "FIS101", "Nombre": "Física", "Creditos": 3, "PlanID": 9999}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/materias/MAT101").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["materia"]["Nombre"], "Cálculo I");
    assert_eq!(body["materia"]["PlanID"], plan_id);
    assert_eq!(body["materia"]["Estado"], true);

    let (_, body) = app.get("/api/materias").await;
    assert_eq!(body["materias"][0]["NombrePlan"], "Plan A");

    let (status, _) = app
        .put(
            "/api/materias/MAT101",
            json!({"Nombre": "Cálculo Diferencial", "Creditos": 5, "PlanID": 0}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/materias/MAT101").await;
    assert_eq!(body["materia"]["Creditos"], 5);
    assert!(body["materia"]["PlanID"].is_null());

    let (status, body) = app
        .put("/api/materias/MAT101/estado", json!({"activo": "si"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = app
        .put("/api/materias/MAT101/estado", json!({"activo": false}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/materias/MAT101").await;
    assert_eq!(body["materia"]["Estado"], false);

    let (status, _) = app
        .put("/api/materias/MAT101/estado", json!({"activo": true}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.delete("/api/materias/MAT101").await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/materias/MAT101").await;
    assert_eq!(body["materia"]["Estado"], false);

    let (status, body) = app.get("/api/materias/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Materia no encontrada");
}

#[tokio::test]
async fn test_estudiantes_soft_delete_and_reactivation() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/estudiantes",
            json!({
                "Cedula": "0102030405",
                "Nombre": "Luis Torres",
                "FechaNacimiento": "2001-05-17T00:00:00.000Z",
                "Correo": "luis@x.com",
                "Telefono": ""
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (_, body) = app.get("/api/estudiantes/verificar-cedula?cedula=0102030405").await;
    assert_eq!(body["existe"], true);
    let (_, body) = app.get("/api/estudiantes/verificar-cedula?cedula=999").await;
    assert_eq!(body["existe"], false);

    let (status, _) = app
        .post(
            "/api/estudiantes",
            json!({"Cedula": "0102030405", "Nombre": "Otro"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get(&format!("/api/estudiantes/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estudiante"]["FechaNacimiento"], "2001-05-17");
    assert!(body["estudiante"]["Telefono"].is_null());

    let (status, _) = app.delete(&format!("/api/estudiantes/{id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/estudiantes").await;
    assert!(body["estudiantes"].as_array().unwrap().is_empty());
    let (_, body) = app.get("/api/estudiantes/inactivos").await;
    assert_eq!(body["estudiantes"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(&format!("/api/estudiantes/{id}/reactivar"), json!({}))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/estudiantes").await;
    assert_eq!(body["estudiantes"].as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/estudiantes/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.get("/api/estudiantes/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profesores_crud() {
    let app = spawn_app().await;

    let (status, body) = app
        .post(
            "/api/profesores",
            json!({"Nombre": "María Gómez", "Correo": "maria@x.com", "Telefono": "0999"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, _) = app.post("/api/profesores", json!({"Correo": "x@x.com"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put(
            &format!("/api/profesores/{id}"),
            json!({"Nombre": "María G. Gómez"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get(&format!("/api/profesores/{id}")).await;
    assert_eq!(body["profesor"]["Nombre"], "María G. Gómez");

    let (status, _) = app.delete(&format!("/api/profesores/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get("/api/profesores").await;
    assert!(body["profesores"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_periodos_are_ordered_by_year_then_semester() {
    let app = spawn_app().await;

    for (nombre, anio) in [
        ("Segundo Semestre", 2090),
        ("Verano", 2091),
        ("Primer Semestre", 2091),
        ("Primer Semestre", 2090),
    ] {
        let (status, _) = app
            .post("/api/periodos", json!({"Nombre": nombre, "Anio": anio}))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Seeded periods for the current year sort after these
    let (_, body) = app.get("/api/periodos").await;
    let ordered: Vec<(String, i64)> = body["periodos"]
        .as_array()
        .unwrap()
        .iter()
        .take(4)
        .map(|p| {
            (
                p["Nombre"].as_str().unwrap().to_string(),
                p["Anio"].as_i64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        ordered,
        vec![
            ("Primer Semestre".to_string(), 2091),
            ("Verano".to_string(), 2091),
            ("Primer Semestre".to_string(), 2090),
            ("Segundo Semestre".to_string(), 2090),
        ]
    );

    let (status, _) = app.post("/api/periodos", json!({"Nombre": "Sin año"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn enrolled_student(app: &TestApp) -> (i64, i64) {
    let (_, body) = app
        .post(
            "/api/estudiantes",
            json!({"Cedula": "1100110011", "Nombre": "Carla Ruiz"}),
        )
        .await;
    let estudiante_id = body["id"].as_i64().unwrap();

    let (_, body) = app
        .post("/api/periodos", json!({"Nombre": "Primer Semestre", "Anio": 2025}))
        .await;
    let periodo_id = body["id"].as_i64().unwrap();

    (estudiante_id, periodo_id)
}

#[tokio::test]
async fn test_matriculas_flow() {
    let app = spawn_app().await;
    let (estudiante_id, periodo_id) = enrolled_student(&app).await;

    let (status, _) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": 9999, "PeriodoID": periodo_id}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": estudiante_id, "PeriodoID": 9999}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": estudiante_id, "PeriodoID": periodo_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let matricula_id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": estudiante_id, "PeriodoID": periodo_id}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get("/api/matriculas").await;
    let matriculas = body["matriculas"].as_array().unwrap();
    assert_eq!(matriculas.len(), 1);
    assert_eq!(matriculas[0]["Estudiante"], "Carla Ruiz - 1100110011");
    assert_eq!(matriculas[0]["Periodo"], "Primer Semestre");
    assert_eq!(matriculas[0]["Anio"], 2025);

    let (status, _) = app.delete(&format!("/api/matriculas/{matricula_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/matriculas").await;
    assert!(body["matriculas"].as_array().unwrap().is_empty());

    // Cancelled enrollment frees the slot
    let (status, _) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": estudiante_id, "PeriodoID": periodo_id}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_pagos_flow() {
    let app = spawn_app().await;
    let (estudiante_id, periodo_id) = enrolled_student(&app).await;
    let (_, body) = app
        .post(
            "/api/matriculas",
            json!({"EstudianteID": estudiante_id, "PeriodoID": periodo_id}),
        )
        .await;
    let matricula_id = body["id"].as_i64().unwrap();

    for monto in [json!(0), json!(-10), json!("abc")] {
        let (status, _) = app
            .post(
                "/api/pagos",
                json!({"MatriculaID": matricula_id, "Monto": monto}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app
        .post("/api/pagos", json!({"MatriculaID": 9999, "Monto": 10}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/api/pagos",
            json!({
                "MatriculaID": matricula_id,
                "Monto": "150.50",
                "Metodo": "Transferencia",
                "Referencia": "TX-1"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let pago_id = body["id"].as_i64().unwrap();

    let (status, body) = app.get(&format!("/api/pagos/{pago_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pago"]["Monto"], 150.5);
    assert_eq!(body["pago"]["Estado"], "Registrado");
    assert_eq!(body["pago"]["Estudiante"], "Carla Ruiz");

    let (status, _) = app.delete(&format!("/api/pagos/{pago_id}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get("/api/pagos").await;
    let pagos = body["pagos"].as_array().unwrap();
    assert_eq!(pagos.len(), 1);
    assert_eq!(pagos[0]["Estado"], "Anulado");

    let (_, _) = app.delete(&format!("/api/matriculas/{matricula_id}")).await;
    let (status, body) = app
        .post("/api/pagos", json!({"MatriculaID": matricula_id, "Monto": 10}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "La matrícula está anulada");
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/planes")
                .header(header::AUTHORIZATION, format!("Bearer {}", app.token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"NombrePlan\": "))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_metrics_disabled_without_recorder() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
