use actix_cors::Cors;
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, cookie::time::Duration, middleware, web};

use pms::auth::rate_limit::{self, RateLimiter};
use pms::config::Config;
use pms::db;
use pms::handlers;
use pms::mail::Mailer;
use pms::meeting_api::MeetingApiClient;
use pms::storage::ObjectStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    // Ensure the data directory exists for the default embedded database
    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to create DB pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Session signing key — load from SESSION_KEY env var so the token
    // cookie survives restarts
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let limiter = RateLimiter::new();
    let store = ObjectStore::from_config(&config);
    let mailer = Mailer::from_config(&config).expect("Failed to configure mailer");
    let meeting_api = MeetingApiClient::from_config(&config);

    let bind_addr = config.bind_addr.clone();
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_name("token".to_string())
        .cookie_secure(config.cookie_secure)
        .cookie_http_only(true)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::days(config.cookie_expire_days)),
        )
        .build();

        let cors = Cors::default()
            .allowed_origin(&config.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::from_fn(rate_limit::throttle))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(mailer.clone()))
            .app_data(web::Data::new(meeting_api.clone()))
            .service(web::scope("/api/v1").configure(handlers::configure))
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                actix_web::HttpResponse::NotFound().json(serde_json::json!({
                    "success": false,
                    "message": "Route not found",
                }))
            }))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
