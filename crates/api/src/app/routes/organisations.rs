use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use skillgate_auth::Principal;
use skillgate_core::OrganisationId;
use skillgate_infra::Filter;
use skillgate_infra::tenancy::Organisation;
use skillgate_scope::ScopeOptions;

use crate::app::routes::common::{list_response, parse_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_organisations))
        .route("/:id", get(get_organisation))
}

pub async fn list_organisations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let mut filter = Filter::new();
    if let Err(e) = services
        .scope
        .apply_scope::<Organisation, _>(&mut filter, &principal, &ScopeOptions::new())
        .await
    {
        return errors::store_error_to_response(e);
    }

    list_response(
        services.store().list_organisations(&filter).await,
        dto::organisation_to_json,
    )
}

pub async fn get_organisation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrganisationId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.scope.can_access_organisation(&principal, id).await {
        Ok(true) => {}
        Ok(false) => return errors::forbidden(),
        Err(e) => return errors::store_error_to_response(e),
    }

    match services.store().organisation(id).await {
        Ok(Some(org)) => (StatusCode::OK, Json(dto::organisation_to_json(&org))).into_response(),
        Ok(None) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "organisation not found")
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
