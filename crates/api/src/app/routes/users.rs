use std::sync::Arc;

use axum::{Router, extract::Extension, routing::get};

use skillgate_auth::Principal;
use skillgate_infra::tenancy::User;
use skillgate_infra::{Column, Filter, ScopeTarget};

use crate::app::routes::common::list_response;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", get(list_users))
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<Principal>,
) -> axum::response::Response {
    let column = User::user_column().unwrap_or(Column::new(User::ALIAS, "user_id"));

    let mut filter = Filter::new();
    if let Err(e) = services
        .scope
        .apply_user_list_scope(&mut filter, &principal, column)
        .await
    {
        return errors::store_error_to_response(e);
    }

    list_response(services.store().list_users(&filter).await, dto::user_to_json)
}
