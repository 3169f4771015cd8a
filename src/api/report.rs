use crate::{
    auth::auth::AuthUser,
    error::AppError,
    models::{ReportBody, ReportQuery, ReportResponse, SaveReportReq},
    service::{
        ReportService,
        report::{ReportPeriod, ReportType, csv_filename, to_csv, week_label},
    },
};
use actix_web::{
    HttpResponse,
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web,
};
use chrono::{Local, Utc};
use serde_json::json;
use tracing::{info, instrument, warn};

fn resolve_period(query: &ReportQuery) -> Result<ReportPeriod, AppError> {
    ReportPeriod::resolve(
        query.report_type.unwrap_or(ReportType::Weekly),
        query.week.as_deref(),
        query.month.as_deref(),
        Local::now().date_naive(),
    )
}

/// Weekly or monthly attendance report across all users
#[utoipa::path(
    get,
    path = "/api/reports",
    params(
        ("type", Query, description = "weekly (default) or monthly"),
        ("week", Query, description = "YYYY-MM-DD - YYYY-MM-DD, defaults to the current week"),
        ("month", Query, description = "YYYY-MM, defaults to the current month")
    ),
    responses(
        (status = 200, description = "Summarized report; a monthly report with rows also replaces that month's saved snapshot", body = ReportResponse),
        (status = 400, description = "Malformed week or month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only admins and supervisors", body = Object, example = json!({
            "message": "you do not have permission to view reports",
            "status": 403,
            "details": []
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip_all, fields(username = %auth.user.username))]
pub async fn get_report(
    auth: AuthUser,
    query: web::Query<ReportQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    auth.require_report_access()?;
    let period = resolve_period(&query)?;
    let entries = reports.build(&auth.user, &period).await?;

    let (week, month) = match &period {
        ReportPeriod::Weekly { range } => (Some(week_label(range)), None),
        ReportPeriod::Monthly { month, .. } => (None, Some(month.clone())),
    };

    // viewing a month with data refreshes its saved snapshot
    if let Some(month) = month.as_ref().filter(|_| !entries.is_empty()) {
        if let Err(e) = reports.save_monthly(month, entries.clone()).await {
            warn!(error = %e, %month, "Could not auto-save monthly report");
        }
    }

    Ok(HttpResponse::Ok().json(ReportResponse {
        data: ReportBody {
            report_type: period.report_type(),
            range: period.range().clone(),
            week,
            month,
            entries,
        },
    }))
}

/// Same report as CSV
#[utoipa::path(
    get,
    path = "/api/reports/export",
    params(
        ("type", Query, description = "weekly (default) or monthly"),
        ("week", Query, description = "YYYY-MM-DD - YYYY-MM-DD"),
        ("month", Query, description = "YYYY-MM")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 403, description = "Only admins and supervisors")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip_all, fields(username = %auth.user.username))]
pub async fn export_csv(
    auth: AuthUser,
    query: web::Query<ReportQuery>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    auth.require_report_access()?;
    let period = resolve_period(&query)?;
    let entries = reports.build(&auth.user, &period).await?;

    let filename = csv_filename(
        period.report_type(),
        &auth.user.username,
        Utc::now().timestamp_millis(),
    );
    info!(%filename, rows = entries.len(), "Exporting report");

    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .body(to_csv(&entries)))
}

/// Save the monthly report snapshot
#[utoipa::path(
    post,
    path = "/api/reports/saved",
    request_body = SaveReportReq,
    responses(
        (status = 200, description = "Snapshot saved (replaces an earlier one for the month)", body = Object),
        (status = 400, description = "No data for the month", body = Object, example = json!({
            "message": "no monthly data to save",
            "status": 400,
            "details": []
        })),
        (status = 403, description = "Only admins and supervisors")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn save_monthly(
    auth: AuthUser,
    body: web::Json<SaveReportReq>,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    auth.require_report_access()?;
    let saved = reports.snapshot_month(&auth.user, &body.month).await?;
    Ok(HttpResponse::Ok().json(json!({ "data": saved })))
}

/// Saved monthly snapshots
#[utoipa::path(
    get,
    path = "/api/reports/saved",
    responses(
        (status = 200, description = "All saved snapshots", body = Object),
        (status = 403, description = "Only admins and supervisors")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn list_saved(
    auth: AuthUser,
    reports: web::Data<ReportService>,
) -> Result<HttpResponse, AppError> {
    auth.require_report_access()?;
    let saved = reports.saved_reports().await?;
    Ok(HttpResponse::Ok().json(json!({ "data": saved })))
}
