pub mod attendance;
pub mod users;

pub use attendance::AttendanceRepository;
pub use users::UserDirectory;
