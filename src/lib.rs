// src/lib.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

// Monta o router completo. Tudo fora de /api/health e /api/auth/login fica
// atrás do guard de autenticação.
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação: /me é protegida, /login entra depois do layer
    // e por isso fica pública.
    let auth_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let proposal_routes = Router::new()
        .route(
            "/",
            get(handlers::proposals::list_proposals).post(handlers::proposals::create_proposal),
        )
        .route(
            "/{id}",
            get(handlers::proposals::get_proposal)
                .put(handlers::proposals::update_proposal)
                .delete(handlers::proposals::delete_proposal),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lead_routes = Router::new()
        .route(
            "/",
            get(handlers::leads::list_leads).post(handlers::leads::create_lead),
        )
        .route("/{id}", delete(handlers::leads::delete_lead))
        .route("/{id}/convert", post(handlers::leads::convert_lead))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let meeting_routes = Router::new()
        .route(
            "/",
            get(handlers::meetings::list_meetings).post(handlers::meetings::create_meeting),
        )
        .route("/upcoming", get(handlers::meetings::upcoming_meetings))
        .route(
            "/{id}",
            put(handlers::meetings::update_meeting).delete(handlers::meetings::delete_meeting),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/proposals", proposal_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/meetings", meeting_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
