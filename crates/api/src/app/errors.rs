use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use skillgate_core::DomainError;
use skillgate_infra::StoreError;
use skillgate_scope::ScopeError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!(error = %err, "tenancy store failure");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "store_error",
        "the tenancy store could not be read",
    )
}

pub fn scope_error_to_response(err: ScopeError) -> axum::response::Response {
    match err {
        ScopeError::Store(e) => store_error_to_response(e),
        ScopeError::InvalidColumn(e) => {
            tracing::error!(error = %e, "invalid scope column");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_scope_column",
                "the listing could not be scoped",
            )
        }
        ScopeError::OrganisationContextRequired => json_error(
            StatusCode::BAD_REQUEST,
            "organisation_context_required",
            err.to_string(),
        ),
        ScopeError::CentreOutsideOrganisation { .. }
        | ScopeError::EmployerOutsideOrganisation { .. }
        | ScopeError::AlreadyInOtherOrganisation { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_placement", err.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
    }
}

pub fn forbidden() -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", "outside your access scope")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
