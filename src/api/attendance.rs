use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::{attendance::AttendanceKind, report::DateRange},
    models::{RangeQuery, RecordReq, ReportQuery},
    service::{
        AttendanceService, ReportService,
        report::{ReportPeriod, ReportType},
    },
};
use actix_web::{HttpResponse, Responder, web};
use chrono::Local;
use serde_json::json;
use tracing::instrument;

/// Record a check-in or check-out
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = RecordReq,
    responses(
        (status = 200, description = "Recorded", body = Object, example = json!({
            "data": {
                "id": 42,
                "timestamp": "2024-01-01T08:00:00Z",
                "tipo": "entrada",
                "usuario": "Administrador",
                "fecha": "2024-01-01",
                "hora": "08:00",
                "username": "admin"
            }
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip_all, fields(username = %auth.user.username))]
pub async fn record(
    auth: AuthUser,
    body: web::Json<RecordReq>,
    attendance: web::Data<AttendanceService>,
) -> impl Responder {
    let kind = body.tipo.unwrap_or(AttendanceKind::Entrada);
    let record = attendance.record(kind, &auth.user).await;
    HttpResponse::Ok().json(json!({ "data": record }))
}

/// List attendance records visible to the caller
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("start", Query, description = "First date, YYYY-MM-DD (needs end)"),
        ("end", Query, description = "Last date, YYYY-MM-DD (needs start)")
    ),
    responses(
        (status = 200, description = "Records, newest first", body = Object),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list(
    auth: AuthUser,
    query: web::Query<RangeQuery>,
    attendance: web::Data<AttendanceService>,
) -> impl Responder {
    let query = query.into_inner();
    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => Some(DateRange::new(start, end)),
        _ => None,
    };

    let records = attendance.list(&auth.user, range.as_ref()).await;
    HttpResponse::Ok().json(json!({ "data": records }))
}

/// Summary of the caller's visible records for a week or month
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(
        ("type", Query, description = "weekly (default) or monthly"),
        ("week", Query, description = "YYYY-MM-DD - YYYY-MM-DD, defaults to the current week"),
        ("month", Query, description = "YYYY-MM, defaults to the current month")
    ),
    responses(
        (status = 200, description = "One row per date and user", body = Object),
        (status = 400, description = "Malformed week or month"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn summary(
    auth: AuthUser,
    query: web::Query<ReportQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    let period = ReportPeriod::resolve(
        query.report_type.unwrap_or(ReportType::Weekly),
        query.week.as_deref(),
        query.month.as_deref(),
        Local::now().date_naive(),
    )?;

    let entries = reports.own_summary(&auth.user, &period).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": entries })))
}
