use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use skillgate_auth::Principal;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(principal): Extension<Principal>) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": principal.user_id,
        "role": principal.resolved_role().map(|r| r.as_str()),
        "roles": principal.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        "organisation_context": principal.master_organisation_context(),
    }))
}
