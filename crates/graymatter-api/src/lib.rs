//! graymatter-api
//!
//! Axum HTTP server for the clinic backend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

/// Build the full router with audit logging and CORS applied.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes that require a bearer token.
    let authenticated = Router::new()
        .route("/client/me", get(routes::clients::me))
        .route("/client/surveys", get(routes::surveys::list_my_surveys))
        .route(
            "/client/survey/{id}/answers",
            post(routes::surveys::submit_answers),
        )
        .route_layer(axum_mw::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .route("/", get(routes::health::home))
        .route("/clients", get(routes::clients::list_clients))
        .route("/client/login", post(routes::clients::login))
        .route("/client/register", post(routes::clients::register))
        .route("/client/passcode", post(routes::clients::request_temp_passcode))
        .route("/client/survey/{id}", get(routes::surveys::get_client_survey))
        .route("/test", get(routes::clinics::list_protocols))
        .route("/clinic/protocols", get(routes::clinics::list_protocols))
        .route("/clinic/surveys", get(routes::clinics::list_surveys))
        .route("/clinic/surveys", post(routes::surveys::create_survey))
        .route("/clinic/clients/{gov_id}", get(routes::clinics::client_data))
        .route("/clinic/treatments", post(routes::treatments::start_treatment))
        .route(
            "/surveys/{id}/assemble",
            get(routes::surveys::assemble_preview),
        )
        .merge(authenticated)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
