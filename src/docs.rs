use crate::model::{
    attendance::{AttendanceKind, AttendanceRecord},
    report::{DateRange, ReportEntry, SavedReport, UserAttendance},
    role::Role,
    user::{Session, User},
};
use crate::models::{LoginReqDto, LoginResponse, QrBody, RecordReq, ReportBody, ReportResponse, SaveReportReq};
use crate::service::report::ReportType;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Fichaje API",
        version = "0.1.0",
        description = r#"
## Employee time clock

Employees scan a rotating QR code, log in and record **entrada** (check-in)
and **salida** (check-out) events. Admins and supervisors get weekly and
monthly reports with CSV export.

### 🔐 Security
Endpoints under `/api` need `Authorization: Bearer <token>` with the token
returned by `/auth/login`. Passwords are compared in plaintext against a
static user directory; this is a demo-grade service.

### 📦 Response Format
- Successful bodies are wrapped in `{"data": ...}`
- Errors are `{"message", "status", "details"}`
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::logout,
        crate::auth::handlers::me,

        crate::api::token::qr_token,
        crate::api::token::qr_code,
        crate::api::token::scan,

        crate::api::attendance::record,
        crate::api::attendance::list,
        crate::api::attendance::summary,

        crate::api::report::get_report,
        crate::api::report::export_csv,
        crate::api::report::save_monthly,
        crate::api::report::list_saved
    ),
    components(
        schemas(
            Role,
            User,
            Session,
            AttendanceKind,
            AttendanceRecord,
            DateRange,
            ReportEntry,
            SavedReport,
            UserAttendance,
            ReportType,
            LoginReqDto,
            LoginResponse,
            RecordReq,
            ReportBody,
            ReportResponse,
            SaveReportReq,
            QrBody
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login, logout and current user"),
        (name = "QR", description = "Rotating QR tokens"),
        (name = "Attendance", description = "Check-in / check-out"),
        (name = "Reports", description = "Aggregated reports and CSV export"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}
