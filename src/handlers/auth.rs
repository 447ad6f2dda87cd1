// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use validator::Validate;

use crate::{
    common::{error::AppError, extract::AppJson},
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User, UserRole},
    services::auth::AUTH_COOKIE,
};

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// Handler de registro (sempre cria um usuário comum)
#[utoipa::path(
    post,
    path = "/api/Auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .auth_service
        .register_user(
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            &payload.password,
            UserRole::User,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// Handler de login: devolve o token no corpo e no cookie HttpOnly
#[utoipa::path(
    post,
    path = "/api/Auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let (user, token) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    let jar = jar.add(session_cookie(token.clone(), app_state.settings.cookie_secure));
    Ok((jar, Json(AuthResponse { token, user })))
}

#[utoipa::path(
    post,
    path = "/api/Auth/logout",
    tag = "Auth",
    responses((status = 204, description = "Sessão encerrada"))
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (StatusCode::NO_CONTENT, jar)
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/Auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuário autenticado", body = User),
        (status = 401, description = "Sessão ausente ou expirada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Result<Json<User>, AppError> {
    Ok(Json(user))
}
