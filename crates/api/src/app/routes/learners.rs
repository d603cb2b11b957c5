use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};

use skillgate_auth::Principal;
use skillgate_infra::Filter;

use crate::app::routes::common::list_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_learners))
}

pub async fn list_learners(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let mut filter = Filter::new();
    if let Err(e) = services
        .scope
        .apply_default_learner_scope(&mut filter, &principal)
        .await
    {
        return errors::scope_error_to_response(e);
    }

    list_response(services.store().list_learners(&filter).await, dto::learner_to_json)
}
