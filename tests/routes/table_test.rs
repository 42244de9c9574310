//! Route table resolution tests.

use smarthealth::access::Decision;
use smarthealth::identity::{Identity, Role};
use smarthealth::navigation::{landing_route_for, menu_for};
use smarthealth::routes::{
    PathError, PathPattern, Resolution, RouteGuardDescriptor, RouteTable, Screen,
};

fn identity(role: Role) -> Identity {
    Identity::new("u-1", "Test User", "test@example.org", role)
}

fn render(path: &str, screen: Screen) -> Resolution {
    Resolution::Render {
        path: path.to_owned(),
        screen,
    }
}

#[test]
fn standard_table_is_valid() {
    assert_eq!(RouteTable::standard().validate(), Ok(()));
}

#[test]
fn duplicate_patterns_are_rejected() {
    let descriptor = RouteGuardDescriptor {
        pattern: PathPattern::Subtree("/reports"),
        allowed_roles: &[],
        pages: &[],
        fallback: None,
    };
    let table = RouteTable::new(vec![descriptor, descriptor]);
    assert_eq!(
        table.validate(),
        Err(PathError::Duplicate("/reports/*".to_owned()))
    );
}

#[test]
fn unguarded_pages_render_for_everyone() {
    let table = RouteTable::standard();
    let officer = identity(Role::HealthOfficer);
    for who in [None, Some(&officer)] {
        assert_eq!(table.resolve("/login", who), render("/login", Screen::Login));
        assert_eq!(
            table.resolve("/register", who),
            render("/register", Screen::Register)
        );
        assert_eq!(
            table.resolve("/unauthorized", who),
            render("/unauthorized", Screen::Unauthorized)
        );
    }
}

#[test]
fn root_redirects_by_session_state() {
    let table = RouteTable::standard();
    assert_eq!(
        table.resolve("/", None),
        Resolution::RedirectToLogin { from: None }
    );
    for role in Role::ALL {
        let who = identity(role);
        for root in ["/", "/dashboard"] {
            assert_eq!(
                table.resolve(root, Some(&who)),
                Resolution::RedirectToLanding {
                    to: landing_route_for(role)
                }
            );
        }
    }
}

#[test]
fn undeclared_paths_fall_back_to_root() {
    let table = RouteTable::standard();
    let worker = identity(Role::AshaWorker);
    assert_eq!(
        table.resolve("/nowhere/at/all", Some(&worker)),
        Resolution::RedirectToLanding { to: "/worker" }
    );
    assert_eq!(
        table.resolve("/nowhere", None),
        Resolution::RedirectToLogin { from: None }
    );
}

#[test]
fn guarded_path_without_identity_records_origin() {
    let table = RouteTable::standard();
    assert_eq!(
        table.resolve("/officer/maps/?zoom=4", None),
        Resolution::RedirectToLogin {
            from: Some("/officer/maps".to_owned())
        }
    );
}

#[test]
fn officer_refused_from_admin_subtree() {
    let table = RouteTable::standard();
    let officer = identity(Role::HealthOfficer);
    let resolution = table.resolve("/admin/users", Some(&officer));
    assert_eq!(resolution, Resolution::RedirectToUnauthorized);
    assert_eq!(resolution.target(), "/unauthorized");
}

#[test]
fn admin_enters_every_subtree() {
    let table = RouteTable::standard();
    let admin = identity(Role::Admin);
    assert_eq!(
        table.resolve("/officer/predictions", Some(&admin)),
        render("/officer/predictions", Screen::Predictions)
    );
    assert_eq!(
        table.resolve("/worker/report-case", Some(&admin)),
        render("/worker/report-case", Screen::CaseReportForm)
    );
    assert_eq!(
        table.resolve("/clinic", Some(&admin)),
        render("/clinic", Screen::ClinicDashboard)
    );
    assert_eq!(
        table.resolve("/public/awareness", Some(&admin)),
        render("/public/awareness", Screen::AwarenessPortal)
    );
}

#[test]
fn public_subtree_open_to_every_role() {
    let table = RouteTable::standard();
    for role in Role::ALL {
        assert_eq!(
            table.resolve("/public", Some(&identity(role))),
            render("/public", Screen::PublicDashboard)
        );
    }
}

#[test]
fn clinic_subtree_renders_dashboard_for_any_child() {
    let table = RouteTable::standard();
    let staff = identity(Role::ClinicStaff);
    assert_eq!(
        table.resolve("/clinic/upload", Some(&staff)),
        render("/clinic/upload", Screen::ClinicDashboard)
    );
    assert_eq!(
        table.resolve("/clinic/reports/2024", Some(&staff)),
        render("/clinic/reports/2024", Screen::ClinicDashboard)
    );
}

#[test]
fn permitted_path_without_page_is_not_found() {
    let table = RouteTable::standard();
    let admin = identity(Role::Admin);
    assert_eq!(
        table.resolve("/admin/logs", Some(&admin)),
        render("/admin/logs", Screen::NotFound)
    );
}

#[test]
fn placeholder_screens_are_flagged() {
    let table = RouteTable::standard();
    let worker = identity(Role::AshaWorker);
    let Resolution::Render { screen, .. } = table.resolve("/worker/history", Some(&worker)) else {
        panic!("history should render for a worker");
    };
    assert_eq!(screen, Screen::SubmissionHistory);
    assert!(screen.is_placeholder());
    assert!(!Screen::WorkerDashboard.is_placeholder());
}

#[test]
fn prefix_match_respects_segments() {
    let table = RouteTable::standard();
    assert!(table.descriptor_for("/administrator").is_none());
    assert_eq!(
        table.descriptor_for("/admin/users").map(|d| d.pattern),
        Some(PathPattern::Subtree("/admin"))
    );
}

#[test]
fn longest_prefix_wins() {
    let table = RouteTable::new(vec![
        RouteGuardDescriptor {
            pattern: PathPattern::Subtree("/officer"),
            allowed_roles: &[Role::HealthOfficer],
            pages: &[("", Screen::OfficerDashboard)],
            fallback: None,
        },
        RouteGuardDescriptor {
            pattern: PathPattern::Subtree("/officer/reports"),
            allowed_roles: &[Role::HealthOfficer, Role::ClinicStaff],
            pages: &[("", Screen::Reports)],
            fallback: None,
        },
    ]);
    let staff = identity(Role::ClinicStaff);
    assert_eq!(
        table.resolve("/officer/reports", Some(&staff)),
        render("/officer/reports", Screen::Reports)
    );
    assert_eq!(
        table.resolve("/officer", Some(&staff)),
        Resolution::RedirectToUnauthorized
    );
}

#[test]
fn dot_segments_cannot_escape_a_guard() {
    let table = RouteTable::standard();
    let public = identity(Role::Public);
    assert_eq!(
        table.resolve("/public/../admin", Some(&public)),
        Resolution::RedirectToUnauthorized
    );
}

#[test]
fn every_menu_entry_is_reachable_by_its_role() {
    let table = RouteTable::standard();
    for role in Role::ALL {
        let who = identity(role);
        for entry in menu_for(role) {
            assert_eq!(
                table.decide(entry.path, Some(&who)),
                Decision::Allow,
                "{role} cannot open its own menu entry {}",
                entry.path
            );
            assert!(table.descriptor_for(entry.path).is_some());
        }
    }
}

#[test]
fn every_landing_route_renders_for_its_role() {
    let table = RouteTable::standard();
    for role in Role::ALL {
        let landing = landing_route_for(role);
        let resolution = table.resolve(landing, Some(&identity(role)));
        assert!(
            matches!(resolution, Resolution::Render { ref screen, .. } if *screen != Screen::NotFound),
            "{role} landing {landing} resolved to {resolution:?}"
        );
    }
}

#[test]
fn unguarded_paths_always_decide_allow() {
    let table = RouteTable::standard();
    for path in ["/", "/login", "/register", "/unauthorized", "/dashboard"] {
        assert_eq!(table.decide(path, None), Decision::Allow);
    }
}

#[test]
fn matching_ignores_path_case() {
    let table = RouteTable::standard();
    let officer = identity(Role::HealthOfficer);

    assert_eq!(
        table.resolve("/Officer/Maps", Some(&officer)),
        render("/Officer/Maps", Screen::Heatmap)
    );
    assert_eq!(
        table.resolve("/Admin/Users", None),
        Resolution::RedirectToLogin {
            from: Some("/Admin/Users".to_owned())
        }
    );
    assert_eq!(
        table.resolve("/ADMIN/users", Some(&officer)),
        Resolution::RedirectToUnauthorized
    );
    assert_eq!(table.resolve("/LOGIN", None), render("/LOGIN", Screen::Login));
    assert_eq!(table.decide("/Admin", Some(&officer)), Decision::RedirectToUnauthorized);
}
