use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};

use skillgate_auth::Principal;
use skillgate_infra::tenancy::CpdEntry;
use skillgate_infra::{Column, Filter, ScopeTarget};

use crate::app::routes::common::list_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_cpd_entries))
}

/// CPD entries are visible when their owner is.
pub async fn list_cpd_entries(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let column = CpdEntry::user_column().unwrap_or(Column::new(CpdEntry::ALIAS, "user_id"));

    let mut filter = Filter::new();
    if let Err(e) = services
        .scope
        .apply_user_scoped_filter(&mut filter, &principal, column)
        .await
    {
        return errors::store_error_to_response(e);
    }

    list_response(services.store().list_cpd_entries(&filter).await, dto::cpd_entry_to_json)
}
