use serde::{Deserialize, Serialize};

use skillgate_core::{OrganisationId, UserId};

use crate::Role;

/// The authenticated actor making a request.
///
/// A principal may arrive with a single `role` or an ordered `roles` list
/// (older tokens carry only the list). Scoping never reads either field
/// directly; it goes through [`resolve_role`] so there is exactly one
/// normalisation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(default)]
    pub roles: Vec<Role>,

    /// Organisation explicitly selected for this request. Only honoured for
    /// a MasterAdmin; ignored for every other role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_context: Option<OrganisationId>,
}

impl Principal {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            role: None,
            roles: Vec::new(),
            organisation_context: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn with_organisation_context(mut self, organisation_id: Option<OrganisationId>) -> Self {
        self.organisation_context = organisation_id;
        self
    }

    /// Shorthand for [`resolve_role`].
    pub fn resolved_role(&self) -> Option<&Role> {
        resolve_role(self)
    }

    /// Organisation selected by a MasterAdmin, if any.
    pub fn master_organisation_context(&self) -> Option<OrganisationId> {
        match self.resolved_role() {
            Some(Role::MasterAdmin) => self.organisation_context,
            _ => None,
        }
    }
}

/// Normalise a principal's role.
///
/// `role` wins when present and non-blank; otherwise the first entry of
/// `roles`; otherwise no role at all. Callers must treat `None` as the most
/// restrictive case, never as MasterAdmin.
pub fn resolve_role(principal: &Principal) -> Option<&Role> {
    principal
        .role
        .as_ref()
        .filter(|role| !role.as_str().trim().is_empty())
        .or_else(|| principal.roles.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_role_wins_over_list() {
        let p = Principal::new(UserId::new(1))
            .with_role(Role::CentreAdmin)
            .with_roles([Role::MasterAdmin]);
        assert_eq!(resolve_role(&p), Some(&Role::CentreAdmin));
    }

    #[test]
    fn first_list_entry_is_used_when_role_is_absent() {
        let p =
            Principal::new(UserId::new(1)).with_roles([Role::AccountManager, Role::MasterAdmin]);
        assert_eq!(resolve_role(&p), Some(&Role::AccountManager));
    }

    #[test]
    fn no_role_resolves_to_none() {
        let p = Principal::new(UserId::new(1));
        assert_eq!(resolve_role(&p), None);
    }

    #[test]
    fn organisation_context_only_applies_to_master_admin() {
        let ctx = Some(OrganisationId::new(4));
        let master = Principal::new(UserId::new(1))
            .with_role(Role::MasterAdmin)
            .with_organisation_context(ctx);
        let org_admin = Principal::new(UserId::new(2))
            .with_role(Role::OrganisationAdmin)
            .with_organisation_context(ctx);

        assert_eq!(master.master_organisation_context(), ctx);
        assert_eq!(org_admin.master_organisation_context(), None);
    }

    #[test]
    fn blank_role_falls_through_to_list() {
        let p: Principal =
            serde_json::from_str(r#"{"user_id": 1, "role": "", "roles": ["MasterAdmin"]}"#)
                .unwrap();
        assert_eq!(p.resolved_role(), Some(&Role::MasterAdmin));

        let p = Principal::new(UserId::new(2))
            .with_role(Role::Other("  ".to_string()))
            .with_roles([Role::CentreAdmin]);
        assert_eq!(resolve_role(&p), Some(&Role::CentreAdmin));

        let p: Principal = serde_json::from_str(r#"{"user_id": 3, "role": ""}"#).unwrap();
        assert_eq!(p.resolved_role(), None);
    }

    #[test]
    fn deserialises_list_only_payloads() {
        let p: Principal = serde_json::from_str(r#"{"user_id": 9, "roles": ["Trainer"]}"#).unwrap();
        assert_eq!(p.role, None);
        assert_eq!(p.resolved_role(), Some(&Role::Trainer));
    }
}
