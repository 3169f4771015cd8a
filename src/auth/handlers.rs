use crate::{
    auth::auth::{AuthUser, bearer_token},
    error::AppError,
    models::{LoginReqDto, LoginResponse},
    service::AuthService,
};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use tracing::{info, instrument};

/// Log in with a username and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "message": "invalid credentials",
            "status": 401,
            "details": []
        }))
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login_handler",
    skip(auth, body),
    fields(username = %body.username)
)]
pub async fn login(
    body: web::Json<LoginReqDto>,
    auth: web::Data<AuthService>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");
    let session = auth.login(&body.username, &body.password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse { data: session }))
}

/// Drop the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses((status = 204, description = "Logged out (also when no session existed)")),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn logout(req: HttpRequest, auth: web::Data<AuthService>) -> HttpResponse {
    if let Some(token) = bearer_token(req.headers()) {
        auth.logout(token).await;
    }
    HttpResponse::NoContent().finish()
}

/// Current session's user
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Logged-in user", body = Object, example = json!({
            "data": {"id": 1, "username": "admin", "nombre_completo": "Administrador", "role": "admin"}
        })),
        (status = 401, description = "No active session")
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
pub async fn me(auth: AuthUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "data": auth.user }))
}
