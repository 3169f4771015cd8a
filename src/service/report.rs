use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;
use strum_macros::{Display, EnumString};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    model::{
        attendance::{AttendanceKind, AttendanceRecord},
        report::{DateRange, ReportEntry, SavedReport, UserAttendance},
        user::User,
    },
    repository::UserDirectory,
    service::attendance::{AttendanceService, dedup_by_id, filter_range, sort_newest_first},
    storage::{KeyValueStore, SAVED_REPORTS_KEY, load_json, store_json},
};

pub const CSV_HEADER: &str = "Fecha,Usuario,Entrada,Salida";
const DEFAULT_USER: &str = "Usuario";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportType {
    Weekly,
    Monthly,
}

/// Monday to Sunday of the week containing `date`.
pub fn weekly_range(date: NaiveDate) -> DateRange {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    let end = start + Duration::days(6);
    DateRange::new(
        start.format(DATE_FORMAT).to_string(),
        end.format(DATE_FORMAT).to_string(),
    )
}

/// `"<start> - <end>"`, the form a week is entered and displayed in.
pub fn week_label(range: &DateRange) -> String {
    format!("{} - {}", range.start, range.end)
}

pub fn parse_week(week: &str) -> Result<DateRange, AppError> {
    let invalid = || AppError::BadRequest(format!("week must look like YYYY-MM-DD - YYYY-MM-DD, got '{week}'"));

    let (start, end) = week.split_once(" - ").ok_or_else(invalid)?;
    let (start, end) = (start.trim(), end.trim());
    for day in [start, end] {
        NaiveDate::parse_from_str(day, DATE_FORMAT).map_err(|_| invalid())?;
    }
    Ok(DateRange::new(start, end))
}

pub fn current_month(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// First of the month to the literal day 31, whatever the month's length.
pub fn monthly_range(month: &str) -> Result<DateRange, AppError> {
    let month = month.trim();
    NaiveDate::parse_from_str(&format!("{month}-01"), DATE_FORMAT)
        .map_err(|_| AppError::BadRequest(format!("month must look like YYYY-MM, got '{month}'")))?;
    Ok(DateRange::new(format!("{month}-01"), format!("{month}-31")))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportPeriod {
    Weekly { range: DateRange },
    Monthly { month: String, range: DateRange },
}

impl ReportPeriod {
    /// Missing week or month defaults to the one containing `today`.
    pub fn resolve(
        report_type: ReportType,
        week: Option<&str>,
        month: Option<&str>,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        match report_type {
            ReportType::Weekly => {
                let range = match week.filter(|w| !w.trim().is_empty()) {
                    Some(w) => parse_week(w)?,
                    None => weekly_range(today),
                };
                Ok(ReportPeriod::Weekly { range })
            }
            ReportType::Monthly => {
                let month = match month.filter(|m| !m.trim().is_empty()) {
                    Some(m) => m.trim().to_string(),
                    None => current_month(today),
                };
                let range = monthly_range(&month)?;
                Ok(ReportPeriod::Monthly { month, range })
            }
        }
    }

    pub fn report_type(&self) -> ReportType {
        match self {
            ReportPeriod::Weekly { .. } => ReportType::Weekly,
            ReportPeriod::Monthly { .. } => ReportType::Monthly,
        }
    }

    pub fn range(&self) -> &DateRange {
        match self {
            ReportPeriod::Weekly { range } | ReportPeriod::Monthly { range, .. } => range,
        }
    }
}

/// Records as handed to the aggregator: grouped per user for admins and
/// supervisors, a plain list otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportSource {
    Grouped(Vec<UserAttendance>),
    Flat(Vec<AttendanceRecord>),
}

/// Flattens grouped records, stamping each with its owner's names.
pub fn flatten(source: ReportSource) -> Vec<AttendanceRecord> {
    match source {
        ReportSource::Flat(records) => records,
        ReportSource::Grouped(groups) => groups
            .into_iter()
            .flat_map(|group| {
                let UserAttendance {
                    username,
                    display_name,
                    fichajes,
                } = group;
                fichajes.into_iter().map(move |mut r| {
                    r.display_name = display_name.clone();
                    r.username = username.clone();
                    r
                })
            })
            .collect(),
    }
}

/// One row per (date, user). Each slot keeps the latest record of its kind;
/// rows come newest date first, users in the order first seen for that date.
pub fn summarize(records: &[AttendanceRecord]) -> Vec<ReportEntry> {
    struct Row {
        entry: ReportEntry,
        entrada_at: Option<DateTime<Utc>>,
        salida_at: Option<DateTime<Utc>>,
    }

    let mut by_date: BTreeMap<&str, Vec<Row>> = BTreeMap::new();

    for r in records {
        let user = if r.display_name.is_empty() {
            DEFAULT_USER
        } else {
            r.display_name.as_str()
        };

        let rows = by_date.entry(r.date.as_str()).or_default();
        let idx = match rows.iter().position(|row| row.entry.user == user) {
            Some(idx) => idx,
            None => {
                rows.push(Row {
                    entry: ReportEntry {
                        date: r.date.clone(),
                        user: user.to_string(),
                        entrada: None,
                        salida: None,
                    },
                    entrada_at: None,
                    salida_at: None,
                });
                rows.len() - 1
            }
        };

        let row = &mut rows[idx];
        let (slot, seen_at) = match r.kind {
            AttendanceKind::Entrada => (&mut row.entry.entrada, &mut row.entrada_at),
            AttendanceKind::Salida => (&mut row.entry.salida, &mut row.salida_at),
        };
        let newer = match *seen_at {
            Some(at) => r.timestamp >= at,
            None => true,
        };
        if newer {
            *slot = Some(r.time.clone());
            *seen_at = Some(r.timestamp);
        }
    }

    by_date
        .into_values()
        .rev()
        .flatten()
        .map(|row| row.entry)
        .collect()
}

/// Quotes fields containing a separator, quote or line break.
fn csv_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn to_csv(entries: &[ReportEntry]) -> String {
    let mut csv = format!("{CSV_HEADER}\n");
    for entry in entries {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&entry.date),
            csv_field(&entry.user),
            csv_field(entry.entrada_or_absent()),
            csv_field(entry.salida_or_absent())
        ));
    }
    csv
}

pub fn csv_filename(report_type: ReportType, user: &str, epoch_millis: i64) -> String {
    format!("fichajes_{report_type}_{user}_{epoch_millis}.csv")
}

pub struct ReportService {
    attendance: Arc<AttendanceService>,
    directory: Arc<UserDirectory>,
    store: Arc<dyn KeyValueStore>,
}

impl ReportService {
    pub fn new(
        attendance: Arc<AttendanceService>,
        directory: Arc<UserDirectory>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            attendance,
            directory,
            store,
        }
    }

    /// Every user's records, grouped by username and ordered by it ignoring
    /// case. Admins and supervisors only.
    pub async fn get_reports(
        &self,
        actor: &User,
        range: Option<&DateRange>,
    ) -> Result<Vec<UserAttendance>, AppError> {
        if !actor.role.can_view_reports() {
            warn!(username = %actor.username, role = %actor.role, "Report access denied");
            return Err(AppError::PermissionDenied);
        }

        let records = filter_range(self.attendance.all_records().await, range);
        let records = dedup_by_id(records);

        let mut groups: BTreeMap<String, UserAttendance> = BTreeMap::new();
        for record in records {
            groups
                .entry(record.username.clone())
                .or_insert_with(|| UserAttendance {
                    username: record.username.clone(),
                    display_name: self
                        .directory
                        .find(&record.username)
                        .map(|u| u.display_name.clone())
                        .unwrap_or_else(|| record.display_name.clone()),
                    fichajes: Vec::new(),
                })
                .fichajes
                .push(record);
        }

        let mut groups: Vec<UserAttendance> = groups.into_values().collect();
        // case-insensitive, byte order breaks ties
        groups.sort_by(|a, b| {
            a.username
                .to_lowercase()
                .cmp(&b.username.to_lowercase())
                .then_with(|| a.username.cmp(&b.username))
        });
        for group in &mut groups {
            sort_newest_first(&mut group.fichajes);
        }
        Ok(groups)
    }

    /// Grouped records for admins and supervisors, the actor's own otherwise.
    pub async fn load(
        &self,
        actor: &User,
        range: Option<&DateRange>,
    ) -> Result<ReportSource, AppError> {
        if actor.role.can_view_reports() {
            Ok(ReportSource::Grouped(self.get_reports(actor, range).await?))
        } else {
            Ok(ReportSource::Flat(self.attendance.list(actor, range).await))
        }
    }

    /// Summarized report across all users for the period.
    pub async fn build(
        &self,
        actor: &User,
        period: &ReportPeriod,
    ) -> Result<Vec<ReportEntry>, AppError> {
        let groups = self.get_reports(actor, Some(period.range())).await?;
        Ok(summarize(&flatten(ReportSource::Grouped(groups))))
    }

    /// Summary of whatever the actor may see for the period.
    pub async fn own_summary(
        &self,
        actor: &User,
        period: &ReportPeriod,
    ) -> Result<Vec<ReportEntry>, AppError> {
        let source = self.load(actor, Some(period.range())).await?;
        Ok(summarize(&flatten(source)))
    }

    /// Upserts the snapshot for `month`. Empty reports are rejected.
    pub async fn save_monthly(
        &self,
        month: &str,
        entries: Vec<ReportEntry>,
    ) -> Result<SavedReport, AppError> {
        monthly_range(month)?;
        if entries.is_empty() {
            return Err(AppError::BadRequest("no monthly data to save".into()));
        }

        let report = SavedReport {
            month: month.trim().to_string(),
            generate_date: Utc::now(),
            entries,
        };

        let mut saved: Vec<SavedReport> = load_json(self.store.as_ref(), SAVED_REPORTS_KEY)
            .await?
            .unwrap_or_default();
        match saved.iter().position(|r| r.month == report.month) {
            Some(idx) => saved[idx] = report.clone(),
            None => saved.push(report.clone()),
        }
        store_json(self.store.as_ref(), SAVED_REPORTS_KEY, &saved).await?;

        info!(month = %report.month, rows = report.entries.len(), "Monthly report saved");
        Ok(report)
    }

    /// Builds the monthly report for `month` and saves it.
    pub async fn snapshot_month(&self, actor: &User, month: &str) -> Result<SavedReport, AppError> {
        let period = ReportPeriod::Monthly {
            month: month.trim().to_string(),
            range: monthly_range(month)?,
        };
        let entries = self.build(actor, &period).await?;
        self.save_monthly(month, entries).await
    }

    pub async fn saved_reports(&self) -> Result<Vec<SavedReport>, AppError> {
        Ok(load_json(self.store.as_ref(), SAVED_REPORTS_KEY)
            .await?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{fixture::Fixture, role::Role},
        repository::AttendanceRepository,
        storage::{FailingStore, MemoryStore},
        testing::{at, punch, user},
    };
    use crate::model::attendance::AttendanceKind::{Entrada, Salida};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn services(store: Arc<dyn KeyValueStore>) -> (Arc<AttendanceService>, ReportService) {
        let attendance = Arc::new(
            AttendanceService::new(Arc::new(AttendanceRepository::default()), store.clone())
                .with_jitter(|| 0),
        );
        let directory = Arc::new(UserDirectory::new(Fixture::builtin().unwrap().users));
        let reports = ReportService::new(attendance.clone(), directory, store);
        (attendance, reports)
    }

    #[test]
    fn weekly_range_for_a_wednesday() {
        let range = weekly_range(date("2024-01-10"));
        assert_eq!(range, DateRange::new("2024-01-08", "2024-01-14"));
        assert_eq!(week_label(&range), "2024-01-08 - 2024-01-14");
    }

    #[test]
    fn weekly_range_edges() {
        // Monday stays, Sunday rolls back six days
        assert_eq!(weekly_range(date("2024-01-08")).start, "2024-01-08");
        assert_eq!(weekly_range(date("2024-01-14")).start, "2024-01-08");
        // crosses a year boundary
        assert_eq!(
            weekly_range(date("2025-01-01")),
            DateRange::new("2024-12-30", "2025-01-05")
        );
    }

    #[test]
    fn parse_week_accepts_label_and_rejects_junk() {
        assert_eq!(
            parse_week("2024-01-08 - 2024-01-14").unwrap(),
            DateRange::new("2024-01-08", "2024-01-14")
        );
        assert!(parse_week("2024-01-08").is_err());
        assert!(parse_week("monday - sunday").is_err());
    }

    #[test]
    fn monthly_range_ends_on_literal_31() {
        assert_eq!(
            monthly_range("2024-02").unwrap(),
            DateRange::new("2024-02-01", "2024-02-31")
        );
        assert!(monthly_range("2024-13").is_err());
        assert!(monthly_range("feb").is_err());
    }

    #[test]
    fn period_defaults_to_today() {
        let today = date("2024-01-10");
        let weekly = ReportPeriod::resolve(ReportType::Weekly, None, None, today).unwrap();
        assert_eq!(weekly.range(), &DateRange::new("2024-01-08", "2024-01-14"));
        assert_eq!(weekly.report_type(), ReportType::Weekly);

        let monthly = ReportPeriod::resolve(ReportType::Monthly, None, Some(""), today).unwrap();
        assert_eq!(
            monthly,
            ReportPeriod::Monthly {
                month: "2024-01".into(),
                range: DateRange::new("2024-01-01", "2024-01-31"),
            }
        );
    }

    #[test]
    fn entrada_and_salida_share_a_row() {
        let rows = summarize(&[
            punch(1, "admin", Entrada, "2024-01-01", "08:00"),
            punch(2, "admin", Salida, "2024-01-01", "17:00"),
        ]);
        assert_eq!(
            rows,
            vec![ReportEntry {
                date: "2024-01-01".into(),
                user: "admin".into(),
                entrada: Some("08:00".into()),
                salida: Some("17:00".into()),
            }]
        );
    }

    #[test]
    fn later_entrada_wins_regardless_of_input_order() {
        let early = punch(1, "admin", Entrada, "2024-01-01", "08:00");
        let late = punch(2, "admin", Entrada, "2024-01-01", "09:30");

        for input in [vec![early.clone(), late.clone()], vec![late.clone(), early.clone()]] {
            let rows = summarize(&input);
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].entrada.as_deref(), Some("09:30"));
            assert_eq!(rows[0].salida, None);
        }
    }

    #[test]
    fn rows_sorted_by_date_desc_users_in_encounter_order() {
        let rows = summarize(&[
            punch(1, "zoe", Entrada, "2024-01-01", "08:00"),
            punch(2, "ana", Entrada, "2024-01-01", "08:05"),
            punch(3, "ana", Entrada, "2024-01-03", "08:10"),
            punch(4, "zoe", Salida, "2024-01-02", "17:00"),
        ]);
        let keys: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.date.as_str(), r.user.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("2024-01-03", "ana"),
                ("2024-01-02", "zoe"),
                ("2024-01-01", "zoe"),
                ("2024-01-01", "ana"),
            ]
        );
    }

    #[test]
    fn blank_display_name_groups_under_default_user() {
        let mut r = punch(1, "x", Salida, "2024-01-01", "17:00");
        r.display_name.clear();
        assert_eq!(summarize(&[r])[0].user, DEFAULT_USER);
    }

    #[test]
    fn summarize_is_idempotent() {
        let rows = summarize(&[
            punch(1, "admin", Entrada, "2024-01-01", "08:00"),
            punch(2, "admin", Entrada, "2024-01-01", "08:30"),
            punch(3, "admin", Salida, "2024-01-01", "17:00"),
            punch(4, "ana", Salida, "2024-01-02", "16:00"),
        ]);

        // feed the resolved rows back in as records
        let mut id = 100;
        let mut replay = Vec::new();
        for row in &rows {
            for (kind, time) in [(Entrada, &row.entrada), (Salida, &row.salida)] {
                if let Some(time) = time {
                    id += 1;
                    let mut r = punch(id, &row.user, kind, &row.date, time);
                    r.display_name = row.user.clone();
                    replay.push(r);
                }
            }
        }

        assert_eq!(summarize(&replay), rows);
    }

    #[test]
    fn csv_export_matches_literal_format() {
        let entries = vec![ReportEntry {
            date: "2024-01-01".into(),
            user: "admin".into(),
            entrada: Some("08:00".into()),
            salida: Some("17:00".into()),
        }];
        assert_eq!(
            to_csv(&entries),
            "Fecha,Usuario,Entrada,Salida\n2024-01-01,admin,08:00,17:00\n"
        );
    }

    #[test]
    fn csv_renders_absent_slots_and_empty_reports() {
        let entries = vec![ReportEntry {
            date: "2024-01-02".into(),
            user: "ana".into(),
            entrada: None,
            salida: Some("16:00".into()),
        }];
        assert_eq!(
            to_csv(&entries),
            "Fecha,Usuario,Entrada,Salida\n2024-01-02,ana,-,16:00\n"
        );
        assert_eq!(to_csv(&[]), "Fecha,Usuario,Entrada,Salida\n");
    }

    #[test]
    fn csv_quotes_fields_with_separators() {
        let entries = vec![ReportEntry {
            date: "2024-01-03".into(),
            user: "Pérez, Ana \"Anita\"".into(),
            entrada: Some("08:00".into()),
            salida: None,
        }];
        assert_eq!(
            to_csv(&entries),
            "Fecha,Usuario,Entrada,Salida\n2024-01-03,\"Pérez, Ana \"\"Anita\"\"\",08:00,-\n"
        );
    }

    #[test]
    fn csv_filename_format() {
        assert_eq!(
            csv_filename(ReportType::Monthly, "admin", 1704096000000),
            "fichajes_monthly_admin_1704096000000.csv"
        );
    }

    #[test]
    fn flatten_stamps_owner_names_and_passes_flat_through() {
        let mut rec = punch(1, "empleado1", Entrada, "2024-01-01", "08:00");
        rec.display_name = "stale".into();

        let grouped = ReportSource::Grouped(vec![UserAttendance {
            username: "empleado1".into(),
            display_name: "Empleado Demo".into(),
            fichajes: vec![rec.clone()],
        }]);
        let flat = flatten(grouped);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].display_name, "Empleado Demo");

        assert_eq!(flatten(ReportSource::Flat(vec![rec.clone()])), vec![rec]);
    }

    #[actix_web::test]
    async fn employees_cannot_get_reports() {
        let (_, reports) = services(Arc::new(MemoryStore::default()));
        let err = reports
            .get_reports(&user("empleado1", Role::Employee), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PermissionDenied));

        let period = ReportPeriod::resolve(ReportType::Weekly, None, None, date("2024-01-10")).unwrap();
        assert!(matches!(
            reports.build(&user("empleado1", Role::Employee), &period).await,
            Err(AppError::PermissionDenied)
        ));
    }

    #[actix_web::test]
    async fn groups_are_ordered_ignoring_case() {
        let (attendance, reports) = services(Arc::new(MemoryStore::default()));
        for name in ["Zoe", "ana", "Bob"] {
            attendance
                .record_at(Entrada, &user(name, Role::Employee), at(2024, 1, 2, 8, 0))
                .await;
        }

        let groups = reports
            .get_reports(&user("admin", Role::Admin), None)
            .await
            .unwrap();
        let order: Vec<&str> = groups.iter().map(|g| g.username.as_str()).collect();
        assert_eq!(order, vec!["ana", "Bob", "Zoe"]);
    }

    #[actix_web::test]
    async fn reports_group_by_username_with_directory_names() {
        let (attendance, reports) = services(Arc::new(MemoryStore::default()));
        let emp = user("empleado1", Role::Employee);
        let admin = user("admin", Role::Admin);

        attendance.record_at(Entrada, &emp, at(2024, 1, 1, 8, 0)).await;
        attendance.record_at(Salida, &emp, at(2024, 1, 1, 17, 0)).await;
        attendance.record_at(Entrada, &admin, at(2024, 1, 1, 9, 0)).await;

        let groups = reports.get_reports(&admin, None).await.unwrap();
        let names: Vec<(&str, &str, usize)> = groups
            .iter()
            .map(|g| (g.username.as_str(), g.display_name.as_str(), g.fichajes.len()))
            .collect();
        assert_eq!(
            names,
            vec![("admin", "Administrador", 1), ("empleado1", "Empleado Demo", 2)]
        );
        // newest first inside a group
        assert_eq!(groups[1].fichajes[0].time, "17:00");
    }

    #[actix_web::test]
    async fn admin_day_scenario() {
        let (attendance, reports) = services(Arc::new(MemoryStore::default()));
        let admin = user("admin", Role::Admin);

        attendance.record_at(Entrada, &admin, at(2024, 1, 3, 8, 0)).await;
        attendance.record_at(Salida, &admin, at(2024, 1, 3, 17, 0)).await;
        attendance.record_at(Entrada, &admin, at(2024, 1, 4, 8, 0)).await;
        attendance.record_at(Entrada, &admin, at(2024, 1, 4, 8, 45)).await;

        let period = ReportPeriod::resolve(ReportType::Weekly, None, None, date("2024-01-03")).unwrap();
        let rows = reports.build(&admin, &period).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-04");
        assert_eq!(rows[0].user, "Administrador");
        assert_eq!(rows[0].entrada.as_deref(), Some("08:45"));
        assert_eq!(rows[0].salida, None);
        assert_eq!(rows[1].entrada.as_deref(), Some("08:00"));
        assert_eq!(rows[1].salida.as_deref(), Some("17:00"));
    }

    #[actix_web::test]
    async fn load_picks_shape_by_role() {
        let (attendance, reports) = services(Arc::new(MemoryStore::default()));
        let emp = user("empleado1", Role::Employee);
        attendance.record_at(Entrada, &emp, at(2024, 1, 1, 8, 0)).await;
        attendance
            .record_at(Entrada, &user("admin", Role::Admin), at(2024, 1, 1, 8, 0))
            .await;

        match reports.load(&emp, None).await.unwrap() {
            ReportSource::Flat(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].username, "empleado1");
            }
            other => panic!("expected flat records, got {other:?}"),
        }
        assert!(matches!(
            reports.load(&user("supervisor", Role::Supervisor), None).await.unwrap(),
            ReportSource::Grouped(groups) if groups.len() == 2
        ));

        let period = ReportPeriod::resolve(ReportType::Monthly, None, Some("2024-01"), date("2024-01-10")).unwrap();
        let own = reports.own_summary(&emp, &period).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].user, "empleado1 name");
    }

    #[actix_web::test]
    async fn monthly_snapshots_upsert_by_month() {
        let (attendance, reports) = services(Arc::new(MemoryStore::default()));
        let admin = user("admin", Role::Admin);

        let err = reports.snapshot_month(&admin, "2024-02").await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        attendance.record_at(Entrada, &admin, at(2024, 2, 29, 8, 0)).await;
        let first = reports.snapshot_month(&admin, "2024-02").await.unwrap();
        assert_eq!(first.entries.len(), 1);

        attendance.record_at(Salida, &admin, at(2024, 2, 29, 17, 0)).await;
        reports.snapshot_month(&admin, "2024-02").await.unwrap();

        let saved = reports.saved_reports().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].month, "2024-02");
        assert_eq!(saved[0].entries[0].salida.as_deref(), Some("17:00"));
    }

    #[actix_web::test]
    async fn snapshot_storage_failure_is_surfaced() {
        let (_, reports) = services(Arc::new(FailingStore));
        let entries = vec![ReportEntry {
            date: "2024-01-01".into(),
            user: "admin".into(),
            entrada: Some("08:00".into()),
            salida: None,
        }];
        assert!(matches!(
            reports.save_monthly("2024-01", entries).await,
            Err(AppError::Storage(_))
        ));
    }
}
