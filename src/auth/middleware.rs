use crate::auth::auth::{AuthUser, bearer_token};
use crate::error::AppError;
use crate::service::AuthService;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::debug;

/// Resolves the bearer token to a session and stores the [`AuthUser`] in
/// the request extensions. Requests without a live session get a 401.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let auth = req
        .app_data::<Data<AuthService>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("auth service not configured".into()))?;

    let token = match bearer_token(req.headers()) {
        Some(t) => t.to_string(),
        None => {
            let resp = AppError::Unauthorized("Missing Authorization header".into()).error_response();
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let session = match auth.current_user(&token).await {
        Some(s) => s,
        None => {
            debug!("Unknown or expired session token");
            let resp = AppError::Unauthorized("Invalid or expired session".into()).error_response();
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    req.extensions_mut().insert(AuthUser { user: session.user });

    next.call(req).await
}
