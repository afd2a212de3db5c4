//! API integration tests
//!
//! Tests for the REST endpoints: sessions, intake, surveys, events, reports

use anyhow::Result;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use alumni_portal::config::AppConfig;
use alumni_portal::database::connection::setup_database;
use alumni_portal::database::entities::surveys;
use alumni_portal::database::seed_data::{self, DEMO_PASSWORD};
use alumni_portal::server::app::create_app;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tempfile::NamedTempFile;

struct TestApp {
    server: TestServer,
    db: DatabaseConnection,
    _temp_file: NamedTempFile,
}

/// Create a test server backed by a temporary SQLite file
async fn setup_test_server(demo_mode: bool) -> Result<TestApp> {
    let temp_file = NamedTempFile::new()?;
    let db_url = format!("sqlite://{}?mode=rwc", temp_file.path().display());

    let db = Database::connect(&db_url).await?;
    setup_database(&db).await?;
    seed_data::seed_reference_data(&db).await?;
    if demo_mode {
        seed_data::seed_demo(&db).await?;
    }

    let config = AppConfig {
        demo_mode,
        ..Default::default()
    };
    let app = create_app(db.clone(), &config).await?;
    let server = TestServer::new(app)?;

    Ok(TestApp {
        server,
        db,
        _temp_file: temp_file,
    })
}

fn bearer(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        HeaderName::from_static("authorization"),
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    )
}

async fn sign_in(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/auth/sign-in")
        .json(&json!({ "email": email, "password": password }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let app = setup_test_server(false).await?;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["service"], "alumni-portal");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_protected_routes_require_session() -> Result<()> {
    let app = setup_test_server(false).await?;

    let response = app.server.get("/api/v1/dashboard").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "UNAUTHORIZED");

    let response = bearer(app.server.get("/api/v1/dashboard"), "not-a-token").await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_sign_up_sign_in_and_sign_out() -> Result<()> {
    let app = setup_test_server(false).await?;
    let server = &app.server;

    let payload = json!({
        "email": "Ana@Example.com",
        "password": "segredo1",
        "full_name": "Ana Souza"
    });
    let response = server.post("/api/v1/auth/sign-up").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let profile: Value = response.json();
    assert_eq!(profile["email"], "ana@example.com");
    assert_eq!(profile["role"], "egresso");
    assert!(profile.get("password_hash").is_none());

    // Duplicate email
    let response = server.post("/api/v1/auth/sign-up").json(&payload).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Short password
    let response = server
        .post("/api/v1/auth/sign-up")
        .json(&json!({ "email": "b@example.com", "password": "123", "full_name": "B" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["fields"]["password"].is_string());

    // Wrong password
    let response = server
        .post("/api/v1/auth/sign-in")
        .json(&json!({ "email": "ana@example.com", "password": "errada" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    let token = sign_in(server, "ana@example.com", "segredo1").await;

    let response = bearer(server.get("/api/v1/auth/session"), &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let session: Value = response.json();
    assert_eq!(session["role"], "egresso");
    assert_eq!(session["role_label"], "Egresso");
    assert!(session["alumnus_id"].is_null());

    let response = bearer(server.put("/api/v1/auth/profile"), &token)
        .json(&json!({ "full_name": "Ana Souza Lima" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: Value = response.json();
    assert_eq!(profile["full_name"], "Ana Souza Lima");
    assert_eq!(profile["role"], "egresso");

    let response = bearer(server.post("/api/v1/auth/sign-out"), &token).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    // Signing out twice is fine
    let response = bearer(server.post("/api/v1/auth/sign-out"), &token).await;
    assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

    let response = bearer(server.get("/api/v1/auth/session"), &token).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_sign_up_ignores_requested_staff_role() -> Result<()> {
    let app = setup_test_server(false).await?;
    let server = &app.server;

    let response = server
        .post("/api/v1/auth/sign-up")
        .json(&json!({
            "email": "intruso@example.com",
            "password": "segredo1",
            "full_name": "Intruso",
            "role": "secretaria"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let profile: Value = response.json();
    assert_eq!(profile["role"], "egresso");

    let token = sign_in(server, "intruso@example.com", "segredo1").await;
    let response = bearer(server.get("/api/v1/auth/session"), &token).await;
    let session: Value = response.json();
    assert_eq!(session["role"], "egresso");

    let response = bearer(server.post("/api/v1/coordinators"), &token)
        .json(&json!({
            "full_name": "Carlos Lima",
            "email": "carlos@example.com",
            "unit": "BH",
            "course": "Ciência da Computação"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = bearer(server.get("/api/v1/alumni/export"), &token).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_demo_mode_disables_sign_up() -> Result<()> {
    let app = setup_test_server(true).await?;

    let response = app
        .server
        .post("/api/v1/auth/sign-up")
        .json(&json!({
            "email": "novo@example.com",
            "password": "segredo1",
            "full_name": "Novo Egresso"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["message"], "Sign-up is not available in demo mode");

    let token = sign_in(&app.server, "egresso@demo.com", DEMO_PASSWORD).await;
    assert!(!token.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_navigation_and_permissions_per_role() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;

    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.get("/api/v1/navigation"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let shell: Value = response.json();
    let names: Vec<&str> = shell["navigation"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dashboard", "Meu Perfil", "Pesquisas", "Eventos"]);
    assert_eq!(shell["header"]["name"], "João Silva");
    assert_eq!(shell["header"]["role_label"], "Egresso");
    assert!(shell["footer"]["version"].is_string());

    // Alumni cannot browse the alumni list or reports
    let response = bearer(server.get("/api/v1/alumni"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let response = bearer(server.get("/api/v1/reports"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Coordination cannot register coordinators
    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.post("/api/v1/coordinators"), &coordination)
        .json(&json!({
            "full_name": "Carlos Lima",
            "email": "carlos@example.com",
            "unit": "BH",
            "course": "Ciência da Computação"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_registrar_intake_import_and_export() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;
    let registrar = sign_in(server, "sec@demo.com", DEMO_PASSWORD).await;

    let response = bearer(server.post("/api/v1/alumni"), &registrar)
        .json(&json!({
            "full_name": "Paula Reis",
            "email": "paula@example.com",
            "course": "Direito",
            "unit": "CARANGOLA",
            "graduation_year": 2018,
            "employment_status": "Autônomo"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let registered: Value = response.json();
    let initial_password = registered["initial_password"].as_str().unwrap().to_string();
    assert_eq!(registered["profile"]["role"], "egresso");

    // The new alumnus can sign in with the generated password
    sign_in(server, "paula@example.com", &initial_password).await;

    let csv = "full_name,email,curso,unidade,ano_conclusao\n\
               Rui Costa,rui@example.com,Direito,LEOPOLDINA,2015\n\
               Sem Email,,Direito,LEOPOLDINA,2015\n\
               Lia Melo,lia@example.com,Medicina,LEOPOLDINA,2016\n";
    let response = bearer(server.post("/api/v1/alumni/import"), &registrar)
        .text(csv)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let result: Value = response.json();
    assert_eq!(result["success"], 1);
    assert_eq!(
        result["errors"],
        json!([
            "Linha 3: Campos obrigatórios ausentes",
            "Linha 4: Curso inválido para a unidade selecionada"
        ])
    );

    let response = bearer(
        server.get("/api/v1/alumni").add_query_param("course", "Direito"),
        &registrar,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let listing: Value = response.json();
    assert_eq!(listing["alumni"].as_array().unwrap().len(), 2);
    assert_eq!(listing["stats"]["total"], 3);
    assert_eq!(listing["stats"]["self_employed"], 1);

    let response = bearer(
        server
            .get("/api/v1/alumni/export")
            .add_query_param("search", "paula"),
        &registrar,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Nome,Email,Curso,Ano Conclusão,Status,Empresa,Cargo,Telefone");
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("Paula Reis,paula@example.com,Direito,2018"));

    let response = bearer(server.get("/api/v1/alumni/import/template"), &registrar).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text().lines().count(), 3);

    let response = bearer(server.post("/api/v1/coordinators"), &registrar)
        .json(&json!({
            "full_name": "Carlos Lima",
            "email": "carlos@example.com",
            "unit": "BH",
            "course": "Ciência da Computação",
            "started_on": "2021-02-01"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let coordinator: Value = response.json();
    assert_eq!(coordinator["profile"]["role"], "coordenacao");

    Ok(())
}

#[tokio::test]
async fn test_survey_response_flow() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;
    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;

    let response = bearer(server.get("/api/v1/surveys"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let surveys: Vec<Value> = response.json();
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0]["answered"], false);
    assert_eq!(surveys[0]["expired"], false);
    assert_eq!(surveys[0]["days_remaining"], 30);
    let survey_id = surveys[0]["id"].as_i64().unwrap();

    let response = bearer(server.get(&format!("/api/v1/surveys/{}", survey_id)), &alumnus).await;
    let detail: Value = response.json();
    let questions = detail["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 7);
    let id = |position: usize| questions[position - 1]["id"].as_i64().unwrap();

    // Only the first required question answered
    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/responses", survey_id)),
        &alumnus,
    )
    .json(&json!({ "answers": [{ "question_id": id(1), "value": "Satisfeito" }] }))
    .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(
        body["fields"]["missing_questions"],
        format!("{},{}", id(2), id(5))
    );

    // Numeric scale out of range
    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/responses", survey_id)),
        &alumnus,
    )
    .json(&json!({ "answers": [
        { "question_id": id(1), "value": "Satisfeito" },
        { "question_id": id(2), "value": 4 },
        { "question_id": id(5), "value": "Sim" },
        { "question_id": id(6), "value": 11 }
    ] }))
    .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let answers = json!({ "answers": [
        { "question_id": id(1), "value": "Satisfeito" },
        { "question_id": id(2), "value": 4 },
        { "question_id": id(4), "value": "Não" },
        { "question_id": id(5), "value": "Sim" },
        { "question_id": id(6), "value": 9 },
        { "question_id": id(7), "value": "  Ótimo curso  " }
    ] });
    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/responses", survey_id)),
        &alumnus,
    )
    .json(&answers)
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let result: Value = response.json();
    assert_eq!(result["saved"], 6);

    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/responses", survey_id)),
        &alumnus,
    )
    .json(&answers)
    .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = bearer(server.get("/api/v1/surveys"), &alumnus).await;
    let surveys: Vec<Value> = response.json();
    assert_eq!(surveys[0]["answered"], true);
    assert_eq!(surveys[0]["total_responses"], 1);

    // Staff view and pedagogical feedback
    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.get("/api/v1/surveys/manage"), &coordination).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let staff: Vec<Value> = response.json();
    assert_eq!(staff[0]["respondents"], 1);
    assert_eq!(staff[0]["question_count"], 7);

    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/feedback", survey_id)),
        &coordination,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let feedback: Vec<Value> = response.json();
    let teaching = feedback
        .iter()
        .find(|f| f["category"] == "satisfacao_ensino")
        .unwrap();
    assert_eq!(teaching["mean_value"], 4.0);
    assert_eq!(teaching["total_responses"], 1);

    let course_id = teaching["course_id"].as_i64().unwrap();
    let response = bearer(server.post("/api/v1/corrective-actions"), &coordination)
        .json(&json!({
            "course_id": course_id,
            "feedback_id": teaching["id"],
            "title": "Revisar laboratórios",
            "description": "Atualizar equipamentos do laboratório",
            "category": "infraestrutura",
            "priority": "alta"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let action: Value = response.json();
    assert_eq!(action["status"], "planejada");

    let response = bearer(
        server.put(&format!("/api/v1/corrective-actions/{}/status", action["id"])),
        &coordination,
    )
    .json(&json!({ "status": "concluida", "results": "Equipamentos trocados" }))
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let action: Value = response.json();
    assert!(action["completed_on"].is_string());

    let response = bearer(
        server.get(&format!("/api/v1/courses/{}/actions", course_id)),
        &coordination,
    )
    .await;
    let actions: Vec<Value> = response.json();
    assert_eq!(actions.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_survey_window_is_enforced() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;
    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;
    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;

    let response = bearer(server.get("/api/v1/surveys"), &alumnus).await;
    let surveys: Vec<Value> = response.json();
    let survey_id = surveys[0]["id"].as_i64().unwrap();
    let submit_path = format!("/api/v1/surveys/{}/responses", survey_id);
    let answers = json!({ "answers": [] });

    // Inactive
    let active_path = format!("/api/v1/surveys/{}/active", survey_id);
    let response = bearer(server.put(&active_path), &coordination)
        .json(&json!({ "active": false }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = bearer(server.post(&submit_path), &alumnus).json(&answers).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["message"], "Survey is not active");

    let response = bearer(server.put(&active_path), &coordination)
        .json(&json!({ "active": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // Expired
    let survey = surveys::Entity::find_by_id(survey_id as i32)
        .one(&app.db)
        .await?
        .expect("demo survey");
    let mut expired: surveys::ActiveModel = survey.into();
    expired.ends_at = Set(Some(Utc::now() - Duration::days(1)));
    expired.update(&app.db).await?;

    let response = bearer(server.post(&submit_path), &alumnus).json(&answers).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["message"], "Survey has expired");

    // Not started yet
    let response = bearer(server.get("/api/v1/survey-templates"), &coordination).await;
    let templates: Vec<Value> = response.json();
    let template_id = templates[0]["id"].as_i64().unwrap();
    let response = bearer(
        server.post(&format!("/api/v1/survey-templates/{}/publish", template_id)),
        &coordination,
    )
    .json(&json!({
        "starts_at": "2099-01-01T00:00:00Z",
        "ends_at": "2099-02-01T00:00:00Z"
    }))
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let future: Value = response.json();

    let response = bearer(
        server.post(&format!("/api/v1/surveys/{}/responses", future["id"])),
        &alumnus,
    )
    .json(&answers)
    .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let body: Value = response.json();
    assert_eq!(body["message"], "Survey has not started yet");

    Ok(())
}

#[tokio::test]
async fn test_survey_authoring() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;
    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;

    let response = bearer(server.post("/api/v1/survey-templates"), &coordination)
        .json(&json!({
            "title": "Pesquisa de Empregabilidade",
            "questions": [
                { "prompt": "Área de atuação", "kind": "multiple_choice", "options": ["TI", " "] }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = bearer(server.post("/api/v1/survey-templates"), &coordination)
        .json(&json!({
            "title": "Pesquisa de Empregabilidade",
            "questions": [
                { "prompt": "Área de atuação", "kind": "multiple_choice", "options": ["TI", "Saúde"], "required": true },
                { "prompt": "Comentários", "kind": "text" }
            ]
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let template: Value = response.json();
    let template_id = template["id"].as_i64().unwrap();
    let choice_id = template["questions"][0]["id"].as_i64().unwrap();
    assert_eq!(template["questions"][1]["position"], 2);

    // Two options left: removal refused
    let response = bearer(
        server.delete(&format!("/api/v1/template-questions/{}/options/0", choice_id)),
        &coordination,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = bearer(
        server.post(&format!("/api/v1/template-questions/{}/options", choice_id)),
        &coordination,
    )
    .json(&json!({}))
    .await;
    let template: Value = response.json();
    assert_eq!(template["questions"][0]["options"], json!(["TI", "Saúde", "Opção 3"]));

    let response = bearer(
        server.post(&format!("/api/v1/template-questions/{}/move", choice_id)),
        &coordination,
    )
    .json(&json!({ "direction": "down" }))
    .await;
    let template: Value = response.json();
    assert_eq!(template["questions"][1]["id"], choice_id);

    let response = bearer(
        server.post(&format!("/api/v1/survey-templates/{}/publish", template_id)),
        &coordination,
    )
    .json(&json!({ "ends_at": "2000-01-01T00:00:00Z" }))
    .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = bearer(
        server.post(&format!("/api/v1/survey-templates/{}/publish", template_id)),
        &coordination,
    )
    .json(&json!({}))
    .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    // Removing a question closes the gap in positions
    let response = bearer(
        server.post(&format!("/api/v1/survey-templates/{}/questions", template_id)),
        &coordination,
    )
    .json(&json!({ "prompt": "Cargo atual", "kind": "text" }))
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let template: Value = response.json();
    assert_eq!(template["questions"][2]["position"], 3);
    let first_id = template["questions"][0]["id"].as_i64().unwrap();

    let response = bearer(
        server.delete(&format!("/api/v1/template-questions/{}", first_id)),
        &coordination,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let template: Value = response.json();
    let remaining: Vec<(i64, &str)> = template["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| (q["position"].as_i64().unwrap(), q["prompt"].as_str().unwrap()))
        .collect();
    assert_eq!(remaining, vec![(1, "Área de atuação"), (2, "Cargo atual")]);

    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.get("/api/v1/surveys"), &alumnus).await;
    let surveys: Vec<Value> = response.json();
    assert_eq!(surveys.len(), 2);
    assert!(surveys[0]["days_remaining"].is_null());

    // Alumni cannot author
    let response = bearer(server.get("/api/v1/survey-templates"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn test_event_registration_and_rating() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;
    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;

    let response = bearer(server.get("/api/v1/events"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let listing: Value = response.json();
    let events = listing["events"].as_array().unwrap();
    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e["can_register"] == true));
    let event_id = events[0]["id"].as_i64().unwrap();

    let response = bearer(
        server.get("/api/v1/events").add_query_param("modality", "online"),
        &alumnus,
    )
    .await;
    let online: Value = response.json();
    assert_eq!(online["events"].as_array().unwrap().len(), 1);

    // Rating before registering
    let rating = json!({ "overall": 5, "would_recommend": true });
    let response = bearer(server.post(&format!("/api/v1/events/{}/rating", event_id)), &alumnus)
        .json(&rating)
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = bearer(server.post(&format!("/api/v1/events/{}/register", event_id)), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let response = bearer(server.post(&format!("/api/v1/events/{}/register", event_id)), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = bearer(server.get("/api/v1/events"), &alumnus).await;
    let listing: Value = response.json();
    assert_eq!(listing["summary"]["registered_by_me"], 1);
    assert_eq!(listing["summary"]["occupied_seats"], 1);

    let response = bearer(server.post(&format!("/api/v1/events/{}/rating", event_id)), &alumnus)
        .json(&json!({ "overall": 0, "would_recommend": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = bearer(server.post(&format!("/api/v1/events/{}/rating", event_id)), &alumnus)
        .json(&json!({ "overall": 4, "content": 0, "speakers": 5, "would_recommend": true }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let saved: Value = response.json();
    assert!(saved["content"].is_null());
    assert_eq!(saved["speakers"], 5);

    let response = bearer(server.post(&format!("/api/v1/events/{}/rating", event_id)), &alumnus)
        .json(&rating)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Staff create a small event that fills up
    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.post("/api/v1/events"), &coordination)
        .json(&json!({
            "title": "Mentoria",
            "starts_at": "2099-05-01T18:00:00Z",
            "modality": "online",
            "capacity": 1,
            "status": "publicado"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let created: Value = response.json();
    let small_id = created["id"].as_i64().unwrap();

    let response = bearer(server.post(&format!("/api/v1/events/{}/register", small_id)), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = bearer(server.get(&format!("/api/v1/events/{}", small_id)), &alumnus).await;
    let detail: Value = response.json();
    assert_eq!(detail["occupied"], 1);
    assert_eq!(detail["can_register"], false);

    // A second alumnus finds the event full
    let registrar = sign_in(server, "sec@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.post("/api/v1/alumni"), &registrar)
        .json(&json!({
            "full_name": "Paula Reis",
            "email": "paula@example.com",
            "course": "Direito",
            "graduation_year": 2018
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let registered: Value = response.json();
    let password = registered["initial_password"].as_str().unwrap().to_string();
    let second = sign_in(server, "paula@example.com", &password).await;

    let response = bearer(server.post(&format!("/api/v1/events/{}/register", small_id)), &second).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["message"], "Event is full");

    Ok(())
}

#[tokio::test]
async fn test_dashboards_and_reports() -> Result<()> {
    let app = setup_test_server(true).await?;
    let server = &app.server;

    let alumnus = sign_in(server, "egresso@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.get("/api/v1/dashboard"), &alumnus).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let dashboard: Value = response.json();
    assert_eq!(dashboard["profile_complete"], true);
    assert_eq!(dashboard["surveys"].as_array().unwrap().len(), 1);
    assert_eq!(dashboard["events"].as_array().unwrap().len(), 3);
    assert_eq!(dashboard["upcoming_events"], 4);

    let coordination = sign_in(server, "coord@demo.com", DEMO_PASSWORD).await;
    let response = bearer(server.get("/api/v1/dashboard"), &coordination).await;
    let dashboard: Value = response.json();
    assert_eq!(dashboard["total_alumni"], 1);
    assert_eq!(dashboard["employed"], 1);
    assert_eq!(
        dashboard["employment"],
        json!([{ "name": "Empregado", "value": 1 }, { "name": "Desempregado", "value": 0 }])
    );

    let response = bearer(server.get("/api/v1/reports"), &coordination).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let hub: Vec<Value> = response.json();
    assert_eq!(hub.len(), 5);
    assert_eq!(hub[0]["kind"], "alumni-profile");
    assert_eq!(hub[0]["headline"]["value"], 1);

    let response = bearer(server.get("/api/v1/reports/job-market"), &coordination).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let report: Value = response.json();
    assert_eq!(report["headline"]["value"]["percent"], 100.0);

    let response = bearer(
        server
            .get("/api/v1/reports/alumni-profile/export")
            .add_query_param("unit", "BH"),
        &coordination,
    )
    .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let text = response.text();
    assert!(text.starts_with("RELATÓRIO DE PERFIL DOS EGRESSOS"));
    assert!(text.contains("Empregado,1,100.0%"));

    let response = bearer(server.get("/api/v1/reports/unknown"), &coordination).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}
