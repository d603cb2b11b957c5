use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};

use skillgate_auth::Principal;
use skillgate_infra::Filter;
use skillgate_infra::tenancy::Centre;
use skillgate_scope::ScopeOptions;

use crate::app::routes::common::list_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_centres))
}

/// Organisation scope on `centre.organisation_id`; a CentreAdmin is held to
/// `centre.id`.
pub async fn list_centres(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let mut filter = Filter::new();
    if let Err(e) = services
        .scope
        .apply_scope::<Centre, _>(&mut filter, &principal, &ScopeOptions::new())
        .await
    {
        return errors::store_error_to_response(e);
    }

    list_response(services.store().list_centres(&filter).await, dto::centre_to_json)
}
