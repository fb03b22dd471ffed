pub mod admin_auth_handlers;
pub mod auth_handlers;
pub mod dashboard;
pub mod meeting_handlers;
pub mod proposal_handlers;

use actix_web::{middleware::from_fn, web};

use crate::auth::middleware::require_auth;

/// Configure all routes under /api/v1. Route order matters where literal
/// segments shadow `{id}` — /proposal/all is registered before
/// /proposal/{id}.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/user/sign-up", web::post().to(auth_handlers::sign_up))
            .route("/user/sign-in", web::post().to(auth_handlers::sign_in))
            .route("/admin/sign-up", web::post().to(admin_auth_handlers::sign_up))
            .route("/admin/sign-in", web::post().to(admin_auth_handlers::sign_in))
            .service(
                web::scope("")
                    .wrap(from_fn(require_auth))
                    .route("/verify", web::get().to(auth_handlers::verify))
                    .route("/logout", web::get().to(auth_handlers::logout)),
            ),
    );

    cfg.service(
        web::scope("/proposal")
            .wrap(from_fn(require_auth))
            .route("", web::post().to(proposal_handlers::crud::create))
            .route("", web::get().to(proposal_handlers::crud::list))
            .route("/all", web::get().to(proposal_handlers::crud::list_all))
            .route("/{id}", web::get().to(proposal_handlers::crud::detail))
            .route("/{id}", web::put().to(proposal_handlers::crud::update))
            .route("/{id}", web::delete().to(proposal_handlers::crud::delete))
            .route("/{id}", web::patch().to(proposal_handlers::workflow::change_status)),
    );

    cfg.service(
        web::scope("")
            .wrap(from_fn(require_auth))
            .route("/admin/dashboard", web::get().to(dashboard::admin_dashboard))
            .route("/user/dashboard", web::get().to(dashboard::user_dashboard))
            .route("/users", web::get().to(dashboard::list_users))
            .route("/meeting", web::post().to(meeting_handlers::create)),
    );
}
