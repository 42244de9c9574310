//! Access Guard: decides whether an identity may enter a route subtree.
//!
//! [`Role::Admin`] is a member of every allowed set. Declarations never
//! need to list it.

use crate::identity::{Identity, Role};

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Navigation may proceed.
    Allow,
    /// No identity is held; send the visitor to the login page.
    RedirectToLogin,
    /// Identity is held but its role is not permitted here.
    RedirectToUnauthorized,
}

/// Returns `true` if `role` may enter a subtree declared for `allowed`.
pub fn permits(role: Role, allowed: &[Role]) -> bool {
    role == Role::Admin || allowed.contains(&role)
}

/// Evaluate the guard for `identity` against a subtree's declared roles.
pub fn evaluate(identity: Option<&Identity>, allowed: &[Role]) -> Decision {
    match identity {
        None => Decision::RedirectToLogin,
        Some(identity) if permits(identity.role(), allowed) => Decision::Allow,
        Some(_) => Decision::RedirectToUnauthorized,
    }
}
