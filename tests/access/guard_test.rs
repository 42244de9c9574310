//! Access Guard decision tests.

use smarthealth::access::{evaluate, permits, Decision};
use smarthealth::identity::{Identity, Role};
use smarthealth::routes::RouteTable;

fn identity(role: Role) -> Identity {
    Identity::new(format!("id-{role}"), "Test User", "test@example.org", role)
}

/// Every allowed-role set the route tree can express, plus a few edge cases.
fn role_sets() -> Vec<Vec<Role>> {
    let mut sets: Vec<Vec<Role>> = RouteTable::standard()
        .descriptors()
        .iter()
        .map(|d| d.allowed_roles.to_vec())
        .collect();
    sets.push(vec![]);
    sets.push(vec![Role::Admin]);
    sets.push(Role::ALL.to_vec());
    for role in Role::ALL {
        sets.push(vec![role]);
    }
    sets
}

#[test]
fn role_gating_is_total() {
    for allowed in role_sets() {
        for role in Role::ALL {
            let decision = evaluate(Some(&identity(role)), &allowed);
            let expected = if role == Role::Admin || allowed.contains(&role) {
                Decision::Allow
            } else {
                Decision::RedirectToUnauthorized
            };
            assert_eq!(decision, expected, "role {role} against {allowed:?}");
        }
    }
}

#[test]
fn unauthenticated_always_redirects_to_login() {
    for allowed in role_sets() {
        assert_eq!(evaluate(None, &allowed), Decision::RedirectToLogin);
    }
}

#[test]
fn admin_passes_every_declared_descriptor() {
    let admin = identity(Role::Admin);
    for descriptor in RouteTable::standard().descriptors() {
        assert_eq!(
            evaluate(Some(&admin), descriptor.allowed_roles),
            Decision::Allow,
            "admin refused at {}",
            descriptor.pattern
        );
    }
}

#[test]
fn scenario_officer_refused_from_admin_only_subtree() {
    let officer = identity(Role::HealthOfficer);
    assert_eq!(
        evaluate(Some(&officer), &[Role::Admin]),
        Decision::RedirectToUnauthorized
    );
}

#[test]
fn scenario_admin_allowed_into_admin_only_subtree() {
    let admin = identity(Role::Admin);
    assert_eq!(evaluate(Some(&admin), &[Role::Admin]), Decision::Allow);
}

#[test]
fn scenario_no_identity_redirects_to_login() {
    assert_eq!(evaluate(None, &[Role::Admin]), Decision::RedirectToLogin);
    assert_eq!(evaluate(None, &Role::ALL), Decision::RedirectToLogin);
}

#[test]
fn permits_matches_evaluate() {
    for allowed in role_sets() {
        for role in Role::ALL {
            let allowed_by_evaluate = evaluate(Some(&identity(role)), &allowed) == Decision::Allow;
            assert_eq!(permits(role, &allowed), allowed_by_evaluate);
        }
    }
}
