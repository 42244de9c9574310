//! Role Navigation Resolver: per-role menus and landing routes.
//!
//! [`profile`] is the single table keyed by [`Role`]. The route table reads
//! landing paths from it too, so menus and guarded subtrees cannot drift.

use std::fmt;

use crate::identity::Role;
use crate::routes::normalize_path;

/// Icon shown next to a menu entry. Rendering maps the tag to a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
    /// Dashboard grid.
    LayoutDashboard,
    /// People.
    Users,
    /// Document.
    FileText,
    /// Warning shield.
    ShieldAlert,
    /// Gear.
    Settings,
    /// Bell.
    Bell,
    /// Pulse line.
    Activity,
    /// Folded map.
    Map,
    /// Clipboard with plus.
    ClipboardPlus,
    /// Water drop.
    Droplet,
    /// Open book.
    BookOpen,
}

impl Icon {
    /// Kebab-case tag consumed by the icon set.
    pub fn tag(self) -> &'static str {
        match self {
            Icon::LayoutDashboard => "layout-dashboard",
            Icon::Users => "users",
            Icon::FileText => "file-text",
            Icon::ShieldAlert => "shield-alert",
            Icon::Settings => "settings",
            Icon::Bell => "bell",
            Icon::Activity => "activity",
            Icon::Map => "map",
            Icon::ClipboardPlus => "clipboard-plus",
            Icon::Droplet => "droplet",
            Icon::BookOpen => "book-open",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    /// Visible label.
    pub label: &'static str,
    /// Target path.
    pub path: &'static str,
    /// Icon tag.
    pub icon: Icon,
}

impl MenuEntry {
    const fn new(label: &'static str, path: &'static str, icon: Icon) -> Self {
        Self { label, path, icon }
    }

    /// Whether this entry should be highlighted for `current_path`.
    pub fn is_active(&self, current_path: &str) -> bool {
        normalize_path(current_path) == self.path
    }
}

/// Everything navigation needs to know about one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleProfile {
    /// Default route after login or on `/dashboard`.
    pub landing: &'static str,
    /// Sidebar entries in render order.
    pub menu: &'static [MenuEntry],
}

/// Landing route used for unknown roles.
pub const PUBLIC_LANDING: &str = "/public";

const ADMIN_MENU: &[MenuEntry] = &[
    MenuEntry::new("Dashboard", "/admin", Icon::LayoutDashboard),
    MenuEntry::new("User Management", "/admin/users", Icon::Users),
    MenuEntry::new("System Logs", "/admin/logs", Icon::FileText),
    MenuEntry::new("Alert Config", "/admin/alerts", Icon::ShieldAlert),
    MenuEntry::new("Settings", "/admin/settings", Icon::Settings),
];

const OFFICER_MENU: &[MenuEntry] = &[
    MenuEntry::new("Dashboard", "/officer", Icon::LayoutDashboard),
    MenuEntry::new("Epidemic Alerts", "/officer/alerts", Icon::Bell),
    MenuEntry::new("AI Predictions", "/officer/predictions", Icon::Activity),
    MenuEntry::new("Heatmaps", "/officer/maps", Icon::Map),
    MenuEntry::new("Reports", "/officer/reports", Icon::FileText),
];

const WORKER_MENU: &[MenuEntry] = &[
    MenuEntry::new("Dashboard", "/worker", Icon::LayoutDashboard),
    MenuEntry::new("Report Case", "/worker/report-case", Icon::ClipboardPlus),
    MenuEntry::new("Water Quality", "/worker/water-quality", Icon::Droplet),
    MenuEntry::new("My Submissions", "/worker/history", Icon::FileText),
];

const CLINIC_MENU: &[MenuEntry] = &[
    MenuEntry::new("Dashboard", "/clinic", Icon::LayoutDashboard),
    MenuEntry::new("Upload Data", "/clinic/upload", Icon::ClipboardPlus),
    MenuEntry::new("Lab Reports", "/clinic/reports", Icon::FileText),
];

const PUBLIC_MENU: &[MenuEntry] = &[
    MenuEntry::new("Awareness", PUBLIC_LANDING, Icon::BookOpen),
    MenuEntry::new("Hygiene Tips", "/public/tips", Icon::Activity),
    MenuEntry::new("Nearby Centers", "/public/centers", Icon::Map),
];

/// The navigation profile for `role`.
pub fn profile(role: Role) -> RoleProfile {
    match role {
        Role::Admin => RoleProfile {
            landing: "/admin",
            menu: ADMIN_MENU,
        },
        Role::HealthOfficer => RoleProfile {
            landing: "/officer",
            menu: OFFICER_MENU,
        },
        Role::AshaWorker => RoleProfile {
            landing: "/worker",
            menu: WORKER_MENU,
        },
        Role::ClinicStaff => RoleProfile {
            landing: "/clinic",
            menu: CLINIC_MENU,
        },
        Role::Public => RoleProfile {
            landing: PUBLIC_LANDING,
            menu: PUBLIC_MENU,
        },
    }
}

/// Ordered sidebar entries for `role`.
pub fn menu_for(role: Role) -> &'static [MenuEntry] {
    profile(role).menu
}

/// Default route for `role`.
pub fn landing_route_for(role: Role) -> &'static str {
    profile(role).landing
}

/// Menu for a raw role tag; unknown tags get the public menu.
pub fn menu_for_tag(tag: &str) -> &'static [MenuEntry] {
    menu_for(Role::from_tag_lossy(tag))
}

/// Landing route for a raw role tag; unknown tags land on [`PUBLIC_LANDING`].
pub fn landing_route_for_tag(tag: &str) -> &'static str {
    landing_route_for(Role::from_tag_lossy(tag))
}
