use serde::Serialize;

use skillgate_core::{CentreId, OrganisationId, UserId};
use skillgate_infra::tenancy::{Centre, CpdEntry, Employer, Learner, Organisation, User};
use skillgate_scope::Scope;

// -------------------------
// Response DTOs
// -------------------------

/// The caller's resolved scope, in wire shape: `null` means every id,
/// `[]` means none.
#[derive(Debug, Serialize)]
pub struct ScopeSummary {
    pub role: Option<String>,
    pub organisations: Scope<OrganisationId>,
    pub centres: Scope<CentreId>,
    pub users: Scope<UserId>,
}

#[derive(Debug, Serialize)]
pub struct OrganisationAccess {
    pub organisation_id: OrganisationId,
    pub allowed: bool,
}

#[derive(Debug, Serialize)]
pub struct CentreAccess {
    pub centre_id: CentreId,
    pub allowed: bool,
}

// -------------------------
// Row mapping
// -------------------------

pub fn organisation_to_json(o: &Organisation) -> serde_json::Value {
    serde_json::json!({
        "id": o.id,
        "name": o.name,
        "status": o.status.as_str(),
    })
}

pub fn centre_to_json(c: &Centre) -> serde_json::Value {
    serde_json::json!({
        "id": c.id,
        "name": c.name,
        "organisation_id": c.organisation_id,
        "status": c.status.as_str(),
    })
}

pub fn user_to_json(u: &User) -> serde_json::Value {
    serde_json::json!({
        "user_id": u.user_id,
        "roles": u.roles.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        "status": u.status,
    })
}

pub fn learner_to_json(l: &Learner) -> serde_json::Value {
    serde_json::json!({
        "learner_id": l.learner_id,
        "user_id": l.user_id,
        "organisation_id": l.organisation_id,
        "centre_id": l.centre_id,
        "employer_id": l.employer_id,
    })
}

pub fn employer_to_json(e: &Employer) -> serde_json::Value {
    serde_json::json!({
        "employer_id": e.employer_id,
        "organisation_id": e.organisation_id,
        "name": e.name,
    })
}

pub fn cpd_entry_to_json(e: &CpdEntry) -> serde_json::Value {
    serde_json::json!({
        "id": e.id,
        "user_id": e.user_id,
        "activity": e.activity,
    })
}

pub fn items(values: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({ "items": values })
}
