use chrono::{DateTime, Local, Utc};
use futures::lock::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    model::{
        attendance::{AttendanceKind, AttendanceRecord},
        report::DateRange,
        user::User,
    },
    repository::AttendanceRepository,
    storage::{FICHAJES_KEY, KeyValueStore, load_json, store_json},
};

/// Keeps the first occurrence of every id.
pub fn dedup_by_id(records: Vec<AttendanceRecord>) -> Vec<AttendanceRecord> {
    let mut seen = HashSet::new();
    records.into_iter().filter(|r| seen.insert(r.id)).collect()
}

/// Newest first. Stable for equal timestamps.
pub fn sort_newest_first(records: &mut [AttendanceRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

pub fn filter_range(
    records: Vec<AttendanceRecord>,
    range: Option<&DateRange>,
) -> Vec<AttendanceRecord> {
    match range {
        Some(range) => records
            .into_iter()
            .filter(|r| range.contains(&r.date))
            .collect(),
        None => records,
    }
}

const ID_DRAWS: usize = 8;

fn random_jitter() -> u64 {
    (Uuid::new_v4().as_u128() % 1000) as u64
}

pub struct AttendanceService {
    repo: Arc<AttendanceRepository>,
    store: Arc<dyn KeyValueStore>,
    // serializes the read-modify-write of the stored log
    append_lock: Mutex<()>,
    jitter: fn() -> u64,
}

impl AttendanceService {
    pub fn new(repo: Arc<AttendanceRepository>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repo,
            store,
            append_lock: Mutex::new(()),
            jitter: random_jitter,
        }
    }

    #[cfg(test)]
    pub fn with_jitter(mut self, jitter: fn() -> u64) -> Self {
        self.jitter = jitter;
        self
    }

    pub async fn record(&self, kind: AttendanceKind, actor: &User) -> AttendanceRecord {
        self.record_at(kind, actor, Local::now()).await
    }

    /// Appends to the in-memory log, then to storage. A storage failure is
    /// logged and the record is kept in memory only.
    pub async fn record_at(
        &self,
        kind: AttendanceKind,
        actor: &User,
        now: DateTime<Local>,
    ) -> AttendanceRecord {
        let _guard = self.append_lock.lock().await;

        let stored = match load_json::<Vec<AttendanceRecord>>(self.store.as_ref(), FICHAJES_KEY).await
        {
            Ok(saved) => Some(saved.unwrap_or_default()),
            Err(e) => {
                warn!(error = %e, "Could not read attendance records from storage");
                None
            }
        };

        let mut taken: HashSet<u64> = self.repo.snapshot().iter().map(|r| r.id).collect();
        if let Some(saved) = &stored {
            taken.extend(saved.iter().map(|r| r.id));
        }

        let record = AttendanceRecord {
            id: self.next_id(&taken),
            timestamp: now.with_timezone(&Utc),
            kind,
            display_name: actor.label().to_string(),
            date: now.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            username: actor.username.clone(),
        };

        self.repo.append(record.clone());

        if let Some(mut saved) = stored {
            saved.push(record.clone());
            if let Err(e) = store_json(self.store.as_ref(), FICHAJES_KEY, &saved).await {
                warn!(error = %e, record_id = record.id, "Could not save attendance record to storage");
            }
        }

        info!(
            record_id = record.id,
            username = %record.username,
            kind = %record.kind,
            "Attendance recorded"
        );
        record
    }

    /// `len + 1 + jitter`, redrawn while the id is taken; past the last
    /// draw, one above the highest id in use.
    fn next_id(&self, taken: &HashSet<u64>) -> u64 {
        let base = self.repo.len() as u64 + 1;
        for _ in 0..ID_DRAWS {
            let candidate = base + (self.jitter)();
            if !taken.contains(&candidate) {
                return candidate;
            }
        }
        taken.iter().max().map_or(base, |max| (max + 1).max(base))
    }

    /// In-memory log followed by the stored log. May contain duplicates.
    pub async fn all_records(&self) -> Vec<AttendanceRecord> {
        let mut all = self.repo.snapshot();
        match load_json::<Vec<AttendanceRecord>>(self.store.as_ref(), FICHAJES_KEY).await {
            Ok(Some(saved)) => all.extend(saved),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Could not read attendance records from storage"),
        }
        all
    }

    /// The actor's own records, or everyone's for admins and supervisors;
    /// newest first, one per id.
    pub async fn list(&self, actor: &User, range: Option<&DateRange>) -> Vec<AttendanceRecord> {
        let mut records = self.all_records().await;

        if !actor.role.can_view_reports() {
            records.retain(|r| r.username == actor.username);
        }

        let mut records = filter_range(records, range);
        sort_newest_first(&mut records);
        dedup_by_id(records)
    }
}
