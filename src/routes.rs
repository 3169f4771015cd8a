use crate::{
    api::{attendance, report, token},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .map(|cfg| Governor::new(&cfg))
}

/// Routes without rate limiting, shared by the server and tests.
pub fn configure_unlimited(cfg: &mut web::ServiceConfig, config: &Config) {
    configure_public(cfg, None);
    configure_protected(cfg, config, None);
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let login_limiter = build_limiter(config.rate_login_per_min).map(Arc::new);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    configure_public(cfg, login_limiter);
    configure_protected(cfg, config, protected_limiter);
}

fn configure_public(
    cfg: &mut web::ServiceConfig,
    login_limiter: Option<Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>>,
) {
    let login = web::resource("/login").route(web::post().to(handlers::login));
    let logout = web::resource("/logout").route(web::post().to(handlers::logout));

    cfg.service(match login_limiter {
        Some(limiter) => web::scope("/auth")
            .service(login.wrap(limiter.clone()))
            .service(logout.wrap(limiter)),
        None => web::scope("/auth").service(login).service(logout),
    })
    .service(
        web::scope("/fichaje")
            .service(web::resource("/token").route(web::get().to(token::qr_token)))
            .service(web::resource("/qr").route(web::get().to(token::qr_code))),
    )
    .service(web::resource("/scan").route(web::get().to(token::scan)));
}

fn configure_protected(
    cfg: &mut web::ServiceConfig,
    config: &Config,
    limiter: Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>>,
) {
    let scope = web::scope(&config.api_prefix)
        .wrap(from_fn(auth_middleware))
        .service(web::resource("/me").route(web::get().to(handlers::me)))
        .service(
            web::scope("/attendance")
                // /attendance
                .service(
                    web::resource("")
                        .route(web::post().to(attendance::record))
                        .route(web::get().to(attendance::list)),
                )
                // /attendance/summary
                .service(web::resource("/summary").route(web::get().to(attendance::summary))),
        )
        .service(
            web::scope("/reports")
                // /reports
                .service(web::resource("").route(web::get().to(report::get_report)))
                // /reports/export
                .service(web::resource("/export").route(web::get().to(report::export_csv)))
                // /reports/saved
                .service(
                    web::resource("/saved")
                        .route(web::get().to(report::list_saved))
                        .route(web::post().to(report::save_monthly)),
                ),
        );

    match limiter {
        Some(limiter) => cfg.service(scope.wrap(limiter)),
        None => cfg.service(scope),
    };
}

// QR SCAN
//  └─ GET /scan?token=... (shape check) ─> 303 login

// LOGIN
//  └─ POST /auth/login ─> session token

// API REQUEST
//  └─ Authorization: Bearer <session token>
