use crate::{
    auth::auth::bearer_token,
    config::Config,
    error::AppError,
    models::{QrBody, ScanQuery},
    service::{TokenService, token},
};
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use serde_json::json;
use tracing::{debug, info};

/// Fresh QR token
#[utoipa::path(
    get,
    path = "/fichaje/token",
    responses((status = 200, description = "Token", body = Object, example = json!({
        "data": {"token": "1704096000000-k3j9x0a1b2"}
    }))),
    tag = "QR"
)]
pub async fn qr_token(req: HttpRequest, tokens: web::Data<TokenService>) -> HttpResponse {
    let token = tokens.qr_token(bearer_token(req.headers())).await;
    HttpResponse::Ok().json(json!({ "data": { "token": token } }))
}

/// Fresh QR token with the link to encode and its rotation interval
#[utoipa::path(
    get,
    path = "/fichaje/qr",
    responses((status = 200, description = "QR payload", body = Object)),
    tag = "QR"
)]
pub async fn qr_code(req: HttpRequest, tokens: web::Data<TokenService>) -> HttpResponse {
    let token = tokens.qr_token(bearer_token(req.headers())).await;
    let body = QrBody {
        url: tokens.qr_link(&token),
        token,
        refresh_secs: tokens.rotation_secs(),
    };
    HttpResponse::Ok().json(json!({ "data": body }))
}

/// Entry point of a scanned QR code. A valid token skips to the login step;
/// the token is not carried over.
#[utoipa::path(
    get,
    path = "/scan",
    params(("token", Query, description = "Token from the QR code")),
    responses(
        (status = 303, description = "Redirect to the login step"),
        (status = 400, description = "Missing or malformed token")
    ),
    tag = "QR"
)]
pub async fn scan(
    query: web::Query<ScanQuery>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    match query.token.as_deref() {
        Some(t) if token::validate(t) => {
            info!("QR token accepted");
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, config.login_url.as_str()))
                .finish())
        }
        _ => {
            debug!("QR token rejected");
            Err(AppError::InvalidToken)
        }
    }
}
