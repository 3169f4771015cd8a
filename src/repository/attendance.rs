use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::attendance::AttendanceRecord;

/// In-memory attendance log, seeded from the fixture and appended to on
/// every check-in/out. Never updated or pruned.
#[derive(Default)]
pub struct AttendanceRepository {
    records: RwLock<Vec<AttendanceRecord>>,
}

impl AttendanceRepository {
    pub fn new(seed: Vec<AttendanceRecord>) -> Self {
        Self {
            records: RwLock::new(seed),
        }
    }

    // a panic while holding the lock cannot leave a half-pushed Vec behind
    fn read(&self) -> RwLockReadGuard<'_, Vec<AttendanceRecord>> {
        self.records.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<AttendanceRecord>> {
        self.records.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn append(&self, record: AttendanceRecord) {
        self.write().push(record);
    }

    pub fn snapshot(&self) -> Vec<AttendanceRecord> {
        self.read().clone()
    }
}
