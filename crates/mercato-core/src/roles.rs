//! # Roles and Capabilities
//!
//! Authorization model for Mercato users.
//!
//! ## Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Roles → Capabilities                                │
//! │                                                                         │
//! │  User row flags          RoleSet              Capability check          │
//! │  ─────────────           ────────             ─────────────────        │
//! │  is_user        ──┐                                                     │
//! │  is_vendor      ──┤      RoleSet::from_flags  roles.grants(cap)         │
//! │  is_analyst     ──┼──►   (bitset)        ──►  single OR-combination     │
//! │  is_admin       ──┤                           per capability            │
//! │  is_super_admin ──┘                                                     │
//! │                                                                         │
//! │  Roles are NOT mutually exclusive; Admin and SuperAdmin are elevated    │
//! │  and satisfy every gate except ManageUsers (SuperAdmin only).           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The OR-logic lives in exactly one place ([`RoleSet::grants`]) so route
//! gates stay declarative and the policy is testable in isolation.

use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// A single role flag on a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Baseline authenticated account. Grants nothing by itself.
    User,
    /// May record sales data (customers, line items).
    Vendor,
    /// May read the dataset and aggregates.
    Analyst,
    /// May manage the catalog and run exports.
    Admin,
    /// May additionally manage user accounts.
    SuperAdmin,
}

impl Role {
    const fn bit(self) -> u8 {
        match self {
            Role::User => 1 << 0,
            Role::Vendor => 1 << 1,
            Role::Analyst => 1 << 2,
            Role::Admin => 1 << 3,
            Role::SuperAdmin => 1 << 4,
        }
    }
}

// =============================================================================
// Capability
// =============================================================================

/// A named authorization gate.
///
/// Route handlers ask for a capability; which roles satisfy it is decided
/// centrally in [`RoleSet::grants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Catalog management, updates, deletes, CSV export (admin-or-super).
    Administer,
    /// User account management (super only).
    ManageUsers,
    /// Recording new sales data (vendor-or-admin-or-super).
    RecordSales,
    /// Reading the dataset and aggregates (analyst-or-admin-or-super).
    ViewAnalytics,
}

// =============================================================================
// RoleSet
// =============================================================================

/// The set of roles held by one user, folded from the five boolean columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    /// Builds a role set from the user row's flag columns.
    pub fn from_flags(
        is_user: bool,
        is_vendor: bool,
        is_analyst: bool,
        is_admin: bool,
        is_super_admin: bool,
    ) -> Self {
        let mut bits = 0;
        if is_user {
            bits |= Role::User.bit();
        }
        if is_vendor {
            bits |= Role::Vendor.bit();
        }
        if is_analyst {
            bits |= Role::Analyst.bit();
        }
        if is_admin {
            bits |= Role::Admin.bit();
        }
        if is_super_admin {
            bits |= Role::SuperAdmin.bit();
        }
        RoleSet(bits)
    }

    /// Checks membership of a single role.
    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    /// Decides whether this role set satisfies a capability.
    ///
    /// The elevated flags (Admin, SuperAdmin) satisfy every capability
    /// except `ManageUsers`, which is reserved to SuperAdmin.
    pub const fn grants(&self, capability: Capability) -> bool {
        let admin = self.contains(Role::Admin) || self.contains(Role::SuperAdmin);
        match capability {
            Capability::Administer => admin,
            Capability::ManageUsers => self.contains(Role::SuperAdmin),
            Capability::RecordSales => self.contains(Role::Vendor) || admin,
            Capability::ViewAnalytics => self.contains(Role::Analyst) || admin,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(vendor: bool, analyst: bool, admin: bool, super_admin: bool) -> RoleSet {
        RoleSet::from_flags(true, vendor, analyst, admin, super_admin)
    }

    #[test]
    fn test_plain_user_grants_nothing() {
        let plain = roles(false, false, false, false);
        assert!(!plain.grants(Capability::Administer));
        assert!(!plain.grants(Capability::ManageUsers));
        assert!(!plain.grants(Capability::RecordSales));
        assert!(!plain.grants(Capability::ViewAnalytics));
    }

    #[test]
    fn test_vendor_records_sales_only() {
        let vendor = roles(true, false, false, false);
        assert!(vendor.grants(Capability::RecordSales));
        assert!(!vendor.grants(Capability::ViewAnalytics));
        assert!(!vendor.grants(Capability::Administer));
    }

    #[test]
    fn test_analyst_views_analytics_only() {
        let analyst = roles(false, true, false, false);
        assert!(analyst.grants(Capability::ViewAnalytics));
        assert!(!analyst.grants(Capability::RecordSales));
        assert!(!analyst.grants(Capability::Administer));
    }

    #[test]
    fn test_admin_grants_all_but_user_management() {
        let admin = roles(false, false, true, false);
        assert!(admin.grants(Capability::Administer));
        assert!(admin.grants(Capability::RecordSales));
        assert!(admin.grants(Capability::ViewAnalytics));
        assert!(!admin.grants(Capability::ManageUsers));
    }

    #[test]
    fn test_super_admin_grants_everything() {
        let sa = roles(false, false, false, true);
        assert!(sa.grants(Capability::Administer));
        assert!(sa.grants(Capability::ManageUsers));
        assert!(sa.grants(Capability::RecordSales));
        assert!(sa.grants(Capability::ViewAnalytics));
    }

    #[test]
    fn test_roles_combine() {
        let both = roles(true, true, false, false);
        assert!(both.grants(Capability::RecordSales));
        assert!(both.grants(Capability::ViewAnalytics));
        assert!(both.contains(Role::Vendor));
        assert!(both.contains(Role::Analyst));
        assert!(!both.contains(Role::Admin));
    }
}
