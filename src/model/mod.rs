pub mod attendance;
pub mod fixture;
pub mod report;
pub mod role;
pub mod user;
