use core::str::FromStr;

use axum::{Json, http::StatusCode, response::IntoResponse};

use skillgate_core::DomainError;
use skillgate_infra::StoreError;

use crate::app::{dto, errors};

/// Parse a path id, mapping failures to a 400 response.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(errors::domain_error_to_response)
}

/// Render a scoped listing as `{ "items": [...] }`.
pub fn list_response<T>(
    rows: Result<Vec<T>, StoreError>,
    to_json: fn(&T) -> serde_json::Value,
) -> axum::response::Response {
    match rows {
        Ok(rows) => (
            StatusCode::OK,
            Json(dto::items(rows.iter().map(to_json).collect())),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
