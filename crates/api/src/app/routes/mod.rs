use axum::{Router, routing::get};

pub mod centres;
pub mod common;
pub mod cpd;
pub mod employers;
pub mod learners;
pub mod organisations;
pub mod scope;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/scope", scope::router())
        .nest("/organisations", organisations::router())
        .nest("/centres", centres::router())
        .nest("/learners", learners::router())
        .nest("/users", users::router())
        .nest("/employers", employers::router())
        .nest("/cpd", cpd::router())
}
