use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceKind {
    Entrada,
    Salida,
}

/// A single check-in or check-out ("fichaje").
///
/// Field names on the wire match the persisted `fichajes` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 42,
        "timestamp": "2024-01-01T08:00:00Z",
        "tipo": "entrada",
        "usuario": "Administrador",
        "fecha": "2024-01-01",
        "hora": "08:00",
        "username": "admin"
    })
)]
pub struct AttendanceRecord {
    pub id: u64,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "tipo")]
    pub kind: AttendanceKind,
    #[serde(rename = "usuario")]
    pub display_name: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    pub username: String,
}
