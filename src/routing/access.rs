//! Route access checks.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{RouteParameters, RouteProvider};

/// Decides whether the current user may follow a named route.
///
/// Never fails: an unknown route is simply denied.
pub trait AccessCheck: Send + Sync {
    /// Check access to `route_name` with the given parameters.
    fn check_named_route(&self, route_name: &str, parameters: &RouteParameters) -> bool;
}

/// The user on whose behalf access is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Account id; `0` is anonymous.
    pub uid: u64,
    /// Granted permission names.
    pub permissions: BTreeSet<String>,
}

impl Account {
    /// An account holding the given permissions.
    pub fn with_permissions<I, S>(uid: u64, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uid,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the account holds `permission`.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// Access manager evaluating route requirements against an [`Account`].
///
/// Rules, in order:
/// 1. unknown route ⇒ denied
/// 2. `_access: "TRUE"` ⇒ allowed, `_access: "FALSE"` ⇒ denied
/// 3. `_permission: "a,b"` ⇒ allowed when the account holds any listed permission
/// 4. no recognised requirement ⇒ denied
pub struct PermissionAccessManager {
    routes: Arc<dyn RouteProvider>,
    account: Account,
}

impl PermissionAccessManager {
    /// Create an access manager for `account`.
    pub fn new(routes: Arc<dyn RouteProvider>, account: Account) -> Self {
        Self {
            routes,
            account,
        }
    }

    /// The account access is checked for.
    pub fn account(&self) -> &Account {
        &self.account
    }
}

impl AccessCheck for PermissionAccessManager {
    fn check_named_route(&self, route_name: &str, _parameters: &RouteParameters) -> bool {
        let Ok(route) = self.routes.get_route_by_name(route_name) else {
            tracing::trace!("Access denied to unknown route '{route_name}'");
            return false;
        };

        if let Some(access) = route.requirements.get("_access") {
            return access.eq_ignore_ascii_case("true");
        }

        if let Some(permissions) = route.requirements.get("_permission") {
            let allowed = permissions
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .any(|p| self.account.has_permission(p));
            if !allowed {
                tracing::trace!("Access denied to '{route_name}' for uid {}", self.account.uid);
            }
            return allowed;
        }

        false
    }
}
