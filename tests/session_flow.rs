// Rotas autenticadas contra um Postgres real. O `auth_guard` recarrega o
// usuário do banco a cada requisição, então cada teste cria a sua conta.
// Rodar com:
//   DATABASE_URL=postgres://... cargo test -- --ignored

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::util::ServiceExt; // for `oneshot`
use uuid::Uuid;

use gestion_stock::{
    build_router,
    models::auth::{User, UserRole},
    AppState, Settings,
};

fn state(pool: PgPool) -> AppState {
    let settings = Settings {
        database_url: String::new(),
        jwt_secret: "segredo-de-teste".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        allowed_origins: Vec::new(),
        cookie_secure: false,
        token_ttl_hours: 1,
        database_max_connections: 1,
        admin_email: None,
        admin_password: None,
    };
    AppState::from_pool(pool, settings)
}

async fn session(state: &AppState, email: &str, role: UserRole) -> (User, String) {
    let user = state
        .user_service
        .create("Moussa", "Ndiaye", email, "segredo123", role)
        .await
        .expect("user");
    let token = state.auth_service.create_token(&user).expect("token");
    (user, token)
}

fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

fn request(method: Method, uri: &str, token: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, format!("auth_token={token}"));
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[sqlx::test]
#[ignore]
async fn blank_agency_is_rejected_with_field_details(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "agente@agence.local", UserRole::User).await;

    let response = app(&state)
        .oneshot(request(
            Method::POST,
            "/api/Agencies",
            &token,
            Some(json!({ "agencyNumber": "   ", "name": "Dakar Plateau" })),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["details"]["agencyNumber"].is_array());
}

#[sqlx::test]
#[ignore]
async fn negative_unit_price_is_rejected(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "agente@agence.local", UserRole::User).await;

    let response = app(&state)
        .oneshot(request(
            Method::POST,
            "/api/Supplies",
            &token,
            Some(json!({
                "name": "Ramette A4",
                "categoryId": Uuid::new_v4(),
                "quantity": 10,
                "unitPrice": -4.5
            })),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["details"]["unitPrice"].is_array());
}

#[sqlx::test]
#[ignore]
async fn zero_quantity_assignment_is_rejected(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "agente@agence.local", UserRole::User).await;

    let response = app(&state)
        .oneshot(request(
            Method::POST,
            "/api/AgencySupplies",
            &token,
            Some(json!({ "agencyId": Uuid::new_v4(), "supplyId": Uuid::new_v4(), "quantity": 0 })),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test]
#[ignore]
async fn malformed_id_answers_with_the_error_envelope(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "agente@agence.local", UserRole::User).await;

    let response = app(&state)
        .oneshot(request(Method::GET, "/api/Assets/nao-e-uuid", &token, None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some_and(|m| m.starts_with("Parâmetro de rota inválido")));
}

#[sqlx::test]
#[ignore]
async fn admin_routes_reject_regular_users(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "agente@agence.local", UserRole::User).await;

    for (method, uri) in [
        (Method::GET, "/api/Users"),
        (Method::DELETE, "/api/Users/00000000-0000-0000-0000-000000000001"),
        (Method::POST, "/api/Import/supplies"),
    ] {
        let response = app(&state)
            .oneshot(request(method, uri, &token, None))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }
}

#[sqlx::test]
#[ignore]
async fn demoted_admin_loses_admin_routes_immediately(pool: PgPool) {
    let state = state(pool);
    let (admin, token) = session(&state, "chef@agence.local", UserRole::Admin).await;

    let response = app(&state)
        .oneshot(request(Method::GET, "/api/Users", &token, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    state
        .user_service
        .update(admin.id, "Moussa", "Ndiaye", "chef@agence.local", UserRole::User, None)
        .await
        .expect("demote");

    // Mesmo token, papel lido do banco
    let response = app(&state)
        .oneshot(request(Method::GET, "/api/Users", &token, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test]
#[ignore]
async fn deleted_user_session_is_rejected(pool: PgPool) {
    let state = state(pool);
    let (user, token) = session(&state, "agente@agence.local", UserRole::User).await;

    state.user_service.delete(user.id).await.expect("delete");

    let response = app(&state)
        .oneshot(request(Method::GET, "/api/Agencies", &token, None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Sessão inválida ou expirada.");
}

#[sqlx::test]
#[ignore]
async fn me_returns_the_stored_user(pool: PgPool) {
    let state = state(pool);
    let (user, token) = session(&state, "agente@agence.local", UserRole::User).await;

    let response = app(&state)
        .oneshot(request(Method::GET, "/api/Auth/me", &token, None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["role"], "USER");
    assert!(body.get("passwordHash").is_none());
}

fn multipart_upload(uri: &str, token: &str, filename: &str) -> Request<Body> {
    let boundary = "----limite-teste";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         Nom;Categorie\r\nStylo;Bureau\r\n\
         --{boundary}--\r\n"
    );
    Request::post(uri)
        .header(header::COOKIE, format!("auth_token={token}"))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .expect("request")
}

#[sqlx::test]
#[ignore]
async fn import_rejects_bad_uploads(pool: PgPool) {
    let state = state(pool);
    let (_, token) = session(&state, "chef@agence.local", UserRole::Admin).await;

    let response = app(&state)
        .oneshot(multipart_upload("/api/Import/supplies", &token, "fournitures.csv"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Apenas arquivos .xlsx são aceitos.");

    let response = app(&state)
        .oneshot(multipart_upload("/api/Import/vehicules", &token, "vehicules.xlsx"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Extensão certa, conteúdo que não é uma planilha
    let response = app(&state)
        .oneshot(multipart_upload("/api/Import/supplies", &token, "fournitures.xlsx"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
