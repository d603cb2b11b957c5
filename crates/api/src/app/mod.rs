//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: tenancy store + scope resolver wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use skillgate_infra::TenancyStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(jwt_secret: String, store: Arc<dyn TenancyStore>) -> Router {
    let jwt = Arc::new(skillgate_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = Arc::new(AppServices::new(store));

    // Protected routes: require a valid bearer token.
    let protected = routes::router()
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_span)))
}
