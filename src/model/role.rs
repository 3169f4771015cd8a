use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Employee,
}

impl Role {
    /// Admins and supervisors see every user's records and the aggregated reports.
    pub fn can_view_reports(&self) -> bool {
        matches!(self, Role::Admin | Role::Supervisor)
    }
}
