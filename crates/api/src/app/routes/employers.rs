use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};

use skillgate_auth::Principal;
use skillgate_infra::Filter;
use skillgate_infra::tenancy::Employer;
use skillgate_scope::{ScopeOptions, required_organisation_id};

use crate::app::routes::common::list_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_employers))
}

/// Employers have no centre dimension. A MasterAdmin must pick the
/// organisation it is listing for.
pub async fn list_employers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    if let Err(e) = required_organisation_id(&principal) {
        return errors::scope_error_to_response(e);
    }

    let mut filter = Filter::new();
    let options = ScopeOptions::new().organisation_only();
    if let Err(e) = services
        .scope
        .apply_scope::<Employer, _>(&mut filter, &principal, &options)
        .await
    {
        return errors::store_error_to_response(e);
    }

    list_response(services.store().list_employers(&filter).await, dto::employer_to_json)
}
