use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use super::{attendance::AttendanceRecord, user::UserCredential};

const BUILTIN_FIXTURE: &str = include_str!("../../data/fichajes.json");

/// Seed data: the user directory plus any pre-existing attendance records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<UserCredential>,
    #[serde(default)]
    pub fichajes: Vec<AttendanceRecord>,
}

impl Fixture {
    pub fn builtin() -> Result<Self> {
        serde_json::from_str(BUILTIN_FIXTURE).context("built-in fixture is not valid JSON")
    }

    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture file {path}"))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse fixture file {path}"))
    }

    pub fn from_config(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Self::builtin(),
        }
    }
}
