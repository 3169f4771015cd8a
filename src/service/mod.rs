pub mod attendance;
pub mod auth;
pub mod report;
pub mod token;

pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use report::ReportService;
pub use token::TokenService;
