use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde::Deserialize;
use uuid::Uuid;

use skillgate_core::OrganisationId;

/// Header a MasterAdmin uses to pick the organisation a request acts on.
pub const ORGANISATION_HEADER: &str = "x-organisation-id";

/// Per-request correlation id (UUIDv7, so ids sort by arrival).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OrganisationQuery {
    organisation_id: Option<String>,
}

/// Organisation selected for this request.
///
/// The `organisation_id` query parameter wins over the header. Missing,
/// blank or unparsable values select nothing; no organisation is ever
/// chosen by default.
pub fn organisation_context(uri: &Uri, headers: &HeaderMap) -> Option<OrganisationId> {
    let from_query = Query::<OrganisationQuery>::try_from_uri(uri)
        .ok()
        .and_then(|Query(q)| q.organisation_id);
    let from_header = headers
        .get(ORGANISATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let raw = from_query.or(from_header)?;
    if raw.trim().is_empty() {
        return None;
    }
    raw.parse().ok()
}
