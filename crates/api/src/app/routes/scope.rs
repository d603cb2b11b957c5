use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use skillgate_auth::Principal;
use skillgate_core::{CentreId, OrganisationId};

use crate::app::routes::common::parse_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(get_scope))
        .route("/organisations/:id", get(check_organisation))
        .route("/centres/:id", get(check_centre))
}

pub async fn get_scope(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let resolver = &services.scope;
    let summary = async {
        Ok::<_, skillgate_infra::StoreError>(dto::ScopeSummary {
            role: principal.resolved_role().map(|r| r.as_str().to_string()),
            organisations: resolver.organisation_ids(&principal).await?,
            centres: resolver.centre_ids(&principal).await?,
            users: resolver.user_ids(&principal).await?,
        })
    }
    .await;

    match summary {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn check_organisation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let organisation_id: OrganisationId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.scope.can_access_organisation(&principal, organisation_id).await {
        Ok(allowed) => (
            StatusCode::OK,
            Json(dto::OrganisationAccess {
                organisation_id,
                allowed,
            }),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn check_centre(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let centre_id: CentreId = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.scope.can_access_centre(&principal, centre_id).await {
        Ok(allowed) => {
            (StatusCode::OK, Json(dto::CentreAccess { centre_id, allowed })).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
