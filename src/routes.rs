//! Route Table: guarded subtrees and navigation resolution.
//!
//! Each protected subtree carries one [`RouteGuardDescriptor`]. A
//! navigation finds the descriptor with the longest matching prefix and
//! runs the Access Guard against it. `/`, `/login`, `/register`,
//! `/unauthorized` and `/dashboard` are never guarded.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::access::{evaluate, Decision};
use crate::identity::{Identity, Role};
use crate::navigation::landing_route_for;

/// Login page.
pub const LOGIN_PATH: &str = "/login";
/// Registration page.
pub const REGISTER_PATH: &str = "/register";
/// Shown when a role is refused entry.
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
/// Role-based redirect to the landing route.
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Errors from malformed route declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Pattern does not start with `/`.
    #[error("route pattern must be absolute: {0}")]
    NotAbsolute(String),

    /// `*` appears anywhere except as a trailing `/*`.
    #[error("wildcard only allowed as trailing /*: {0}")]
    MisplacedWildcard(String),

    /// Pattern is not in normalized form (duplicate or trailing slashes, dot segments).
    #[error("route pattern is not normalized: {0}")]
    NotNormalized(String),

    /// Two descriptors declare the same pattern.
    #[error("duplicate route pattern: {0}")]
    Duplicate(String),
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Canonical form of a navigation path.
///
/// Drops query string and fragment, collapses empty segments, resolves `.`
/// and `..` lexically, and always starts with `/`.
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let mut segments: Vec<&str> = Vec::new();
    for segment in raw[..end].split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Remainder of `path` below `prefix`, or `None` if `prefix` does not cover it.
///
/// Matching is segment-wise: `/admin` covers `/admin/users` but not `/administrator`.
fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path.trim_start_matches('/'));
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix('/')
    }
}

/// A declared path: one exact path, or a prefix owning all nested paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathPattern {
    /// Matches only this path.
    Exact(&'static str),
    /// Matches this path and everything beneath it (declared as `prefix/*`).
    Subtree(&'static str),
}

impl PathPattern {
    /// Parse a declaration such as `/admin/*` or `/login`.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] when the declaration is relative, not
    /// normalized, or uses `*` anywhere but the end.
    pub fn parse(declared: &'static str) -> Result<Self, PathError> {
        if !declared.starts_with('/') {
            return Err(PathError::NotAbsolute(declared.to_owned()));
        }
        let (prefix, subtree) = match declared.strip_suffix("/*") {
            Some(prefix) if prefix.is_empty() => ("/", true),
            Some(prefix) => (prefix, true),
            None => (declared, false),
        };
        if prefix.contains('*') {
            return Err(PathError::MisplacedWildcard(declared.to_owned()));
        }
        let pattern = if subtree {
            PathPattern::Subtree(prefix)
        } else {
            PathPattern::Exact(prefix)
        };
        pattern.check_normalized()?;
        Ok(pattern)
    }

    /// The literal path part, without any wildcard.
    pub fn prefix(&self) -> &'static str {
        match self {
            PathPattern::Exact(p) | PathPattern::Subtree(p) => p,
        }
    }

    /// Returns the remainder below the prefix if `path` (normalized) matches.
    pub fn match_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        match self {
            PathPattern::Exact(p) => (path == *p).then_some(""),
            PathPattern::Subtree(p) => strip_segment_prefix(path, p),
        }
    }

    fn check_normalized(&self) -> Result<(), PathError> {
        let prefix = self.prefix();
        if prefix.contains('*') {
            return Err(PathError::MisplacedWildcard(self.to_string()));
        }
        if !prefix.starts_with('/') {
            return Err(PathError::NotAbsolute(self.to_string()));
        }
        if normalize_path(prefix) != prefix {
            return Err(PathError::NotNormalized(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(p) => f.write_str(p),
            PathPattern::Subtree("/") => f.write_str("/*"),
            PathPattern::Subtree(p) => write!(f, "{p}/*"),
        }
    }
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

/// Page rendered for a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Credential entry.
    Login,
    /// Account creation.
    Register,
    /// 403 page.
    Unauthorized,
    /// Public awareness dashboard.
    PublicDashboard,
    /// Health awareness portal.
    AwarenessPortal,
    /// Administrator overview.
    AdminDashboard,
    /// User administration.
    UserManagement,
    /// System settings (not built yet).
    SystemSettings,
    /// Health officer overview.
    OfficerDashboard,
    /// Case heatmap.
    Heatmap,
    /// Outbreak predictions.
    Predictions,
    /// Epidemic alerts panel.
    Alerts,
    /// Generated reports.
    Reports,
    /// Field worker overview.
    WorkerDashboard,
    /// New case report form.
    CaseReportForm,
    /// Water quality sample form.
    WaterQualityForm,
    /// Field worker submission history (not built yet).
    SubmissionHistory,
    /// Clinic overview, used for the whole clinic subtree.
    ClinicDashboard,
    /// Permitted path with no page.
    NotFound,
}

impl Screen {
    /// Page heading.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Login => "Sign In",
            Screen::Register => "Create Account",
            Screen::Unauthorized => "403 - Unauthorized",
            Screen::PublicDashboard => "Public Health Dashboard",
            Screen::AwarenessPortal => "Awareness Portal",
            Screen::AdminDashboard => "Admin Dashboard",
            Screen::UserManagement => "User Management",
            Screen::SystemSettings => "System Settings",
            Screen::OfficerDashboard => "Health Officer Dashboard",
            Screen::Heatmap => "Heatmap",
            Screen::Predictions => "AI Predictions",
            Screen::Alerts => "Epidemic Alerts",
            Screen::Reports => "Reports",
            Screen::WorkerDashboard => "Field Worker Dashboard",
            Screen::CaseReportForm => "Report Case",
            Screen::WaterQualityForm => "Water Quality",
            Screen::SubmissionHistory => "Submission History",
            Screen::ClinicDashboard => "Clinic Dashboard",
            Screen::NotFound => "Not Found",
        }
    }

    /// Screens that are declared but still render a "coming soon" notice.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Screen::SystemSettings | Screen::SubmissionHistory)
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// Which roles may enter a subtree, and the pages it contains.
///
/// `allowed_roles` never needs [`Role::Admin`]; the guard admits it everywhere.
#[derive(Debug, Clone, Copy)]
pub struct RouteGuardDescriptor {
    /// Path declaration.
    pub pattern: PathPattern,
    /// Roles permitted besides admin.
    pub allowed_roles: &'static [Role],
    /// Child path (relative, `""` for the index) to page.
    pub pages: &'static [(&'static str, Screen)],
    /// Page for children missing from `pages`. `None` yields [`Screen::NotFound`].
    pub fallback: Option<Screen>,
}

impl RouteGuardDescriptor {
    fn screen_for(&self, rest: &str) -> Screen {
        self.pages
            .iter()
            .find(|(child, _)| *child == rest)
            .map(|(_, screen)| *screen)
            .or(self.fallback)
            .unwrap_or(Screen::NotFound)
    }
}

/// Result of resolving a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Show this page at the requested path.
    Render {
        /// Normalized path being shown.
        path: String,
        /// Page to render.
        screen: Screen,
    },
    /// Not signed in. `from` holds the guarded path that was attempted.
    RedirectToLogin {
        /// Attempted path, when it was a guarded one.
        from: Option<String>,
    },
    /// Signed in without a permitted role.
    RedirectToUnauthorized,
    /// Signed in at a bare root; go to the role's landing route.
    RedirectToLanding {
        /// Landing route of the current role.
        to: &'static str,
    },
}

impl Resolution {
    /// Path the client should end up on.
    pub fn target(&self) -> &str {
        match self {
            Resolution::Render { path, .. } => path,
            Resolution::RedirectToLogin { .. } => LOGIN_PATH,
            Resolution::RedirectToUnauthorized => UNAUTHORIZED_PATH,
            Resolution::RedirectToLanding { to } => to,
        }
    }
}

const ALL_NON_ADMIN: &[Role] = &[
    Role::Public,
    Role::HealthOfficer,
    Role::AshaWorker,
    Role::ClinicStaff,
];

const PUBLIC_PAGES: &[(&str, Screen)] = &[
    ("", Screen::PublicDashboard),
    ("awareness", Screen::AwarenessPortal),
];

const ADMIN_PAGES: &[(&str, Screen)] = &[
    ("", Screen::AdminDashboard),
    ("users", Screen::UserManagement),
    ("settings", Screen::SystemSettings),
];

const OFFICER_PAGES: &[(&str, Screen)] = &[
    ("", Screen::OfficerDashboard),
    ("maps", Screen::Heatmap),
    ("predictions", Screen::Predictions),
    ("alerts", Screen::Alerts),
    ("reports", Screen::Reports),
];

const WORKER_PAGES: &[(&str, Screen)] = &[
    ("", Screen::WorkerDashboard),
    ("report-case", Screen::CaseReportForm),
    ("water-quality", Screen::WaterQualityForm),
    ("history", Screen::SubmissionHistory),
];

/// The declared route tree.
#[derive(Debug, Clone)]
pub struct RouteTable {
    descriptors: Vec<RouteGuardDescriptor>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl RouteTable {
    /// Build a table from explicit descriptors.
    pub fn new(descriptors: Vec<RouteGuardDescriptor>) -> Self {
        Self { descriptors }
    }

    /// The client's route tree. Role home subtrees are rooted at each
    /// role's landing route.
    pub fn standard() -> Self {
        let home = |role| PathPattern::Subtree(landing_route_for(role));
        Self::new(vec![
            RouteGuardDescriptor {
                pattern: home(Role::Public),
                allowed_roles: ALL_NON_ADMIN,
                pages: PUBLIC_PAGES,
                fallback: None,
            },
            RouteGuardDescriptor {
                pattern: home(Role::Admin),
                allowed_roles: &[],
                pages: ADMIN_PAGES,
                fallback: None,
            },
            RouteGuardDescriptor {
                pattern: home(Role::HealthOfficer),
                allowed_roles: &[Role::HealthOfficer],
                pages: OFFICER_PAGES,
                fallback: None,
            },
            RouteGuardDescriptor {
                pattern: home(Role::AshaWorker),
                allowed_roles: &[Role::AshaWorker],
                pages: WORKER_PAGES,
                fallback: None,
            },
            RouteGuardDescriptor {
                pattern: home(Role::ClinicStaff),
                allowed_roles: &[Role::ClinicStaff],
                pages: &[],
                fallback: Some(Screen::ClinicDashboard),
            },
        ])
    }

    /// Declared descriptors in declaration order.
    pub fn descriptors(&self) -> &[RouteGuardDescriptor] {
        &self.descriptors
    }

    /// Check every declaration is well formed and unique.
    ///
    /// # Errors
    ///
    /// Returns the first [`PathError`] found.
    pub fn validate(&self) -> Result<(), PathError> {
        let mut seen = HashSet::new();
        for descriptor in &self.descriptors {
            descriptor.pattern.check_normalized()?;
            if !seen.insert(descriptor.pattern) {
                return Err(PathError::Duplicate(descriptor.pattern.to_string()));
            }
        }
        Ok(())
    }

    /// Descriptor guarding `path`, chosen by longest matching prefix.
    ///
    /// Matching ignores ASCII case.
    pub fn descriptor_for(&self, path: &str) -> Option<&RouteGuardDescriptor> {
        let key = normalize_path(path).to_ascii_lowercase();
        self.descriptor_for_key(&key)
    }

    fn descriptor_for_key(&self, key: &str) -> Option<&RouteGuardDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| d.pattern.match_path(key).is_some())
            .max_by_key(|d| d.pattern.prefix().len())
    }

    /// Resolve a navigation attempt for the current identity.
    ///
    /// Paths match declarations case-insensitively; the rendered path and
    /// the remembered login origin keep the caller's casing.
    pub fn resolve(&self, raw_path: &str, identity: Option<&Identity>) -> Resolution {
        let path = normalize_path(raw_path);
        let key = path.to_ascii_lowercase();

        match key.as_str() {
            LOGIN_PATH => return render(path, Screen::Login),
            REGISTER_PATH => return render(path, Screen::Register),
            UNAUTHORIZED_PATH => return render(path, Screen::Unauthorized),
            "/" | DASHBOARD_PATH => return root_redirect(identity),
            _ => {}
        }

        let Some(descriptor) = self.descriptor_for_key(&key) else {
            // Undeclared paths fall through to the catch-all root.
            debug!(path = %path, "no route declared, using root");
            return root_redirect(identity);
        };

        match evaluate(identity, descriptor.allowed_roles) {
            Decision::Allow => {
                let rest = descriptor.pattern.match_path(&key).unwrap_or_default();
                let screen = descriptor.screen_for(rest);
                render(path, screen)
            }
            Decision::RedirectToLogin => {
                debug!(path = %path, "unauthenticated, redirecting to login");
                Resolution::RedirectToLogin { from: Some(path) }
            }
            Decision::RedirectToUnauthorized => {
                debug!(
                    path = %path,
                    role = ?identity.map(Identity::role),
                    "role not permitted, redirecting to unauthorized"
                );
                Resolution::RedirectToUnauthorized
            }
        }
    }

    /// Guard decision alone for `path`. Unguarded paths always allow.
    pub fn decide(&self, raw_path: &str, identity: Option<&Identity>) -> Decision {
        match self.descriptor_for(raw_path) {
            Some(descriptor) => evaluate(identity, descriptor.allowed_roles),
            None => Decision::Allow,
        }
    }
}

fn render(path: String, screen: Screen) -> Resolution {
    Resolution::Render { path, screen }
}

fn root_redirect(identity: Option<&Identity>) -> Resolution {
    match identity {
        Some(identity) => Resolution::RedirectToLanding {
            to: landing_route_for(identity.role()),
        },
        None => Resolution::RedirectToLogin { from: None },
    }
}
