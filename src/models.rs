use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{attendance::AttendanceKind, report::DateRange, report::ReportEntry, user::Session};
use crate::service::report::ReportType;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub data: Session,
}

#[derive(Deserialize, ToSchema)]
pub struct RecordReq {
    /// Defaults to `entrada`
    pub tipo: Option<AttendanceKind>,
}

/// Both bounds must be present for the range to apply.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(rename = "type")]
    pub report_type: Option<ReportType>,
    /// `YYYY-MM-DD - YYYY-MM-DD`
    pub week: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
}

#[derive(Deserialize)]
pub struct ScanQuery {
    pub token: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct SaveReportReq {
    #[schema(example = "2024-01")]
    pub month: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReportBody {
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub range: DateRange,
    /// `YYYY-MM-DD - YYYY-MM-DD`, only for weekly reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,
    /// Only for monthly reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    pub entries: Vec<ReportEntry>,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    pub data: ReportBody,
}

#[derive(Serialize, ToSchema)]
pub struct QrBody {
    #[schema(example = "1704096000000-k3j9x0a1b2")]
    pub token: String,
    #[schema(example = "https://fichaje-web.com/login?token=1704096000000-k3j9x0a1b2")]
    pub url: String,
    /// Seconds until clients should ask for a fresh token
    #[schema(example = 30)]
    pub refresh_secs: u64,
}
