use crate::{
    api::{attendance, dashboard, data},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::Context;
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    login: Limiter,
    register: Limiter,
    protected: Limiter,
}

fn build_limiter(requests_per_min: u32) -> anyhow::Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond((60_000 / requests_per_min as u64).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .context("invalid rate limit configuration")?;
    Ok(Arc::new(Governor::new(&cfg)))
}

impl Limiters {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            register: build_limiter(config.rate_register_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(limiters.login.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(limiters.register.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/register/manager")
                    .wrap(limiters.register.clone())
                    .route(web::post().to(handlers::register_manager)),
            )
            .service(
                web::resource("/me")
                    .wrap(from_fn(auth_middleware))
                    .wrap(limiters.protected.clone())
                    .route(web::get().to(handlers::me)),
            ),
    );

    // Registration forms need the department list before anyone logs in.
    cfg.service(
        web::scope(&format!("{}/data", config.api_prefix))
            .wrap(limiters.protected.clone())
            .route("/departments", web::get().to(data::departments)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(limiters.protected.clone()) // rate limiting
            .service(
                web::scope("/attendance")
                    .route("/checkin", web::post().to(attendance::check_in))
                    .route("/checkout", web::post().to(attendance::check_out))
                    .route("/my-history", web::get().to(attendance::my_history))
                    .route("/my-summary", web::get().to(attendance::my_summary))
                    .route("/today", web::get().to(attendance::today))
                    // manager only
                    .route("/all", web::get().to(attendance::all_records))
                    .route("/employee/{id}", web::get().to(attendance::employee_records))
                    .route("/summary", web::get().to(attendance::team_summary))
                    .route("/export", web::get().to(attendance::export))
                    .route("/today-status", web::get().to(attendance::team_day_status)),
            )
            .service(
                web::scope("/dashboard")
                    .route("/employee", web::get().to(dashboard::employee_stats))
                    .route("/manager", web::get().to(dashboard::manager_stats)),
            ),
    );
}
