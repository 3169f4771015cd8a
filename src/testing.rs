//! Shared fixtures for unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::{
    attendance::{AttendanceKind, AttendanceRecord},
    role::Role,
    user::User,
};

pub fn user(username: &str, role: Role) -> User {
    User {
        id: 1,
        username: username.into(),
        display_name: format!("{username} name"),
        role,
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// A record whose timestamp grows with its id.
pub fn punch(id: u64, username: &str, kind: AttendanceKind, date: &str, time: &str) -> AttendanceRecord {
    AttendanceRecord {
        id,
        timestamp: Utc.timestamp_opt(1_700_000_000 + id as i64, 0).unwrap(),
        kind,
        display_name: username.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        username: username.to_string(),
    }
}
