// Testes do roteador sem banco de dados: o pool é preguiçoso e nenhuma das
// requisições abaixo chega a abrir conexão. As rotas autenticadas recarregam
// o usuário do banco e ficam em `session_flow.rs`.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use rstest::{fixture, rstest};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use tower::util::ServiceExt; // for `oneshot`

use gestion_stock::{build_router, AppState, Settings};

const ALLOWED_ORIGIN: &str = "http://localhost:5173";

fn test_settings() -> Settings {
    Settings {
        database_url: "postgres://localhost/gestion_stock_test".to_string(),
        jwt_secret: "segredo-de-teste".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        cookie_secure: false,
        token_ttl_hours: 1,
        database_max_connections: 1,
        admin_email: None,
        admin_password: None,
    }
}

#[fixture]
fn state() -> AppState {
    let settings = test_settings();
    let pool = PgPoolOptions::new()
        .connect_lazy(&settings.database_url)
        .expect("lazy pool");
    AppState::from_pool(pool, settings)
}

fn app(state: &AppState) -> Router {
    build_router(state.clone())
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("auth_token={token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

#[rstest]
#[tokio::test]
async fn health_needs_no_session(state: AppState) {
    let response = app(&state)
        .oneshot(Request::get("/api/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/Agencies")]
#[case("/api/Supplies/cmup")]
#[case("/api/Depreciations/summary")]
#[case("/api/Auth/me")]
#[tokio::test]
async fn protected_routes_require_a_session(state: AppState, #[case] uri: &str) {
    let response = app(&state)
        .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Sessão inválida ou expirada.");
}

#[rstest]
#[tokio::test]
async fn forged_token_is_rejected(state: AppState) {
    let response = app(&state)
        .oneshot(
            Request::get("/api/Agencies")
                .header(header::AUTHORIZATION, "Bearer nao.e.um.jwt")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn cors_preflight_allows_listed_origin_with_credentials(state: AppState) {
    let response = app(&state)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/Agencies")
                .header(header::ORIGIN, ALLOWED_ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let headers = response.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[rstest]
#[tokio::test]
async fn cors_ignores_unknown_origin(state: AppState) {
    let response = app(&state)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/Agencies")
                .header(header::ORIGIN, "http://intrus.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}


#[rstest]
#[tokio::test]
async fn logout_expires_the_session_cookie(state: AppState) {
    let response = app(&state)
        .oneshot(
            Request::post("/api/Auth/logout")
                .header(header::COOKIE, "auth_token=abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with("auth_token=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[rstest]
#[tokio::test]
async fn login_validates_payload_before_touching_the_database(state: AppState) {
    let response = app(&state)
        .oneshot(json_request(
            Method::POST,
            "/api/Auth/login",
            None,
            json!({ "email": "nao-e-email", "password": "123456" }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn malformed_json_body_uses_the_error_envelope(state: AppState) {
    let response = app(&state)
        .oneshot(
            Request::post("/api/Auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\": "))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some_and(|m| m.starts_with("Corpo da requisição inválido")));
}

#[rstest]
#[tokio::test]
async fn openapi_document_lists_stock_routes(state: AppState) {
    let response = app(&state)
        .oneshot(Request::get("/api-docs/openapi.json").body(Body::empty()).expect("request"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/api/Supplies/cmup"].is_object());
    assert!(doc["paths"]["/api/Depreciations/generate/{asset_id}"].is_object());
}
