use actix_web::web::{self, Data};
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    error::AppError,
    model::fixture::Fixture,
    remote::{RemoteApi, RemoteBackend},
    repository::{AttendanceRepository, UserDirectory},
    service::{AttendanceService, AuthService, ReportService, TokenService},
    storage::KeyValueStore,
    utils::session_cache::SessionCache,
};

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub auth: Data<AuthService>,
    pub attendance: Data<AttendanceService>,
    pub reports: Data<ReportService>,
    pub tokens: Data<TokenService>,
}

impl AppServices {
    pub fn new(config: &Config, fixture: Fixture, store: Arc<dyn KeyValueStore>) -> Self {
        let remote: Option<Arc<dyn RemoteBackend>> = config
            .remote_api_url
            .as_deref()
            .map(|url| Arc::new(RemoteApi::new(url)) as Arc<dyn RemoteBackend>);
        Self::assemble(config, fixture, store, remote, |svc| svc)
    }

    /// No remote backend and sequential record ids.
    #[cfg(test)]
    pub fn for_tests(config: &Config, fixture: Fixture, store: Arc<dyn KeyValueStore>) -> Self {
        Self::assemble(config, fixture, store, None, |svc| svc.with_jitter(|| 0))
    }

    fn assemble(
        config: &Config,
        fixture: Fixture,
        store: Arc<dyn KeyValueStore>,
        remote: Option<Arc<dyn RemoteBackend>>,
        tune: fn(AttendanceService) -> AttendanceService,
    ) -> Self {
        let directory = Arc::new(UserDirectory::new(fixture.users));
        let repo = Arc::new(AttendanceRepository::new(fixture.fichajes));
        let sessions = SessionCache::new(
            config.session_cache_capacity,
            Duration::from_secs(config.session_cache_ttl),
        );

        let attendance = Arc::new(tune(AttendanceService::new(repo, store.clone())));
        let reports = ReportService::new(attendance.clone(), directory.clone(), store.clone());
        let auth = AuthService::new(
            directory,
            store,
            sessions,
            remote.clone(),
            config.session_cache_ttl,
        );
        let tokens = TokenService::new(remote, config.qr_base_url.clone(), config.qr_rotation_secs);

        Self {
            auth: Data::new(auth),
            attendance: Data::from(attendance),
            reports: Data::new(reports),
            tokens: Data::new(tokens),
        }
    }

    /// Services plus extractor configs whose rejections use the error envelope.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::QueryConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(self.auth.clone())
        .app_data(self.attendance.clone())
        .app_data(self.reports.clone())
        .app_data(self.tokens.clone());
    }
}
