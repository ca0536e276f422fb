//! Organization membership roles.
//!
//! These must match the `organization_member.role` check constraint in
//! `20260301000004_create_organization_member.sql`.

use crate::status::define_text_enum;

define_text_enum! {
    /// A user's role inside an organization.
    MemberRole {
        Owner => "owner",
        Manager => "manager",
        Member => "member",
        Supplier => "supplier",
    }
}

impl MemberRole {
    /// Owners and managers may mutate projects, materials and members.
    pub fn can_manage(self) -> bool {
        matches!(self, MemberRole::Owner | MemberRole::Manager)
    }

    /// Site staff may append daily logs; suppliers may not.
    pub fn can_contribute(self) -> bool {
        !matches!(self, MemberRole::Supplier)
    }

    /// Whether a holder of `self` may assign `target` to another member.
    ///
    /// Only owners hand out the owner role.
    pub fn can_grant(self, target: MemberRole) -> bool {
        match target {
            MemberRole::Owner => self == MemberRole::Owner,
            _ => self.can_manage(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managers_manage_members_do_not() {
        assert!(MemberRole::Owner.can_manage());
        assert!(MemberRole::Manager.can_manage());
        assert!(!MemberRole::Member.can_manage());
        assert!(!MemberRole::Supplier.can_manage());
    }

    #[test]
    fn suppliers_do_not_contribute_logs() {
        assert!(MemberRole::Member.can_contribute());
        assert!(!MemberRole::Supplier.can_contribute());
    }

    #[test]
    fn only_owner_grants_owner() {
        assert!(MemberRole::Owner.can_grant(MemberRole::Owner));
        assert!(!MemberRole::Manager.can_grant(MemberRole::Owner));
        assert!(MemberRole::Manager.can_grant(MemberRole::Supplier));
        assert!(!MemberRole::Member.can_grant(MemberRole::Member));
    }
}
