// Opsdeck
// Copyright (C) 2025 Opsdeck

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Permission-gated route table and path resolver
//!
//! The table is a static ordered list built once at startup and never
//! mutated. Matching is segment-wise: a `:name` pattern segment matches
//! any single non-empty path segment, every other segment must match
//! literally, and segment counts must be equal. There is no
//! wildcard-depth matching; a pattern without parameters matches only
//! its exact path.

use crate::permissions::PermissionStore;

/// Marker prefix for a parameter segment in a path pattern
pub const PARAM_MARKER: char = ':';

/// Fallback label when no route matches the current path
pub const FALLBACK_TITLE: &str = "Opsdeck";

/// Static mapping from a path pattern to a view and its required
/// permissions.
///
/// The required list is OR semantics: the route is accessible when the
/// principal holds any one of the tokens. An empty list means the route
/// only requires authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Path pattern, e.g. `/admin/roles/:id`
    pub pattern: &'static str,

    /// Opaque view identifier the shell renders for this route
    pub view: &'static str,

    /// Acceptable permission tokens (any one grants access)
    pub required: &'static [&'static str],

    /// Human-readable name for chrome (top bar, sidebar)
    pub label: &'static str,

    /// Icon identifier for the sidebar, if any
    pub icon: Option<&'static str>,

    /// Whether the route is listed in the sidebar
    pub sidebar: bool,
}

impl RouteDescriptor {
    /// Check whether a concrete path matches this descriptor's pattern
    pub fn matches(&self, path: &str) -> bool {
        pattern_matches(self.pattern, path)
    }
}

/// Segment-wise pattern match.
///
/// A parameter segment matches any single non-empty segment; literal
/// segments must be equal; segment counts must be equal.
fn pattern_matches(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').collect();
    let path_segments: Vec<&str> = path.split('/').collect();

    if pattern_segments.len() != path_segments.len() {
        return false;
    }

    pattern_segments
        .iter()
        .zip(path_segments.iter())
        .all(|(pat, seg)| if pat.starts_with(PARAM_MARKER) { !seg.is_empty() } else { pat == seg })
}

/// The console's route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,

    /// Where unauthenticated principals are sent
    pub login_path: &'static str,

    /// Where authenticated-but-unauthorized principals are sent
    pub forbidden_path: &'static str,

    /// Catch-all target when no route matches
    pub home_path: &'static str,
}

impl RouteTable {
    /// Build a table over an ordered route list with the default
    /// special paths
    pub fn new(routes: Vec<RouteDescriptor>) -> Self {
        Self {
            routes,
            login_path: "/login",
            forbidden_path: "/forbidden",
            home_path: "/",
        }
    }

    /// Resolve a path to the first matching descriptor.
    ///
    /// `None` means the caller falls back to a redirect to the home
    /// route.
    pub fn resolve(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|route| route.matches(path))
    }

    /// Display-only resolver for chrome. Same matching rule as
    /// [`resolve`](Self::resolve) but tolerates a miss by returning a
    /// generic fallback label.
    pub fn title_for(&self, path: &str) -> &str {
        self.resolve(path).map(|route| route.label).unwrap_or(FALLBACK_TITLE)
    }

    /// Sidebar entries visible to the current principal: routes flagged
    /// for the sidebar whose required list is empty or intersects the
    /// held permission set. Nothing is listed while permissions are
    /// still loading.
    pub fn sidebar_entries(&self, permissions: &PermissionStore) -> Vec<&RouteDescriptor> {
        self.routes
            .iter()
            .filter(|route| route.sidebar)
            .filter(|route| route.required.is_empty() || permissions.has_any(route.required).is_granted())
            .collect()
    }

    /// Iterate the full table in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.iter()
    }
}

/// The console's screens, in match order
pub fn default_table() -> RouteTable {
    RouteTable::new(vec![
        RouteDescriptor {
            pattern: "/",
            view: "dashboard",
            required: &[],
            label: "Dashboard",
            icon: Some("home"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/admin/users",
            view: "users",
            required: &["users:read", "users:manage"],
            label: "Users",
            icon: Some("people"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/admin/users/:id",
            view: "user_detail",
            required: &["users:read", "users:manage"],
            label: "User",
            icon: None,
            sidebar: false,
        },
        RouteDescriptor {
            pattern: "/admin/announcements",
            view: "announcements",
            required: &["announcements:read", "announcements:manage"],
            label: "Announcements",
            icon: Some("megaphone"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/admin/incidents",
            view: "incidents",
            required: &["incidents:read", "incidents:manage"],
            label: "Special Incidents",
            icon: Some("alert"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/admin/incidents/:id",
            view: "incident_detail",
            required: &["incidents:read", "incidents:manage"],
            label: "Incident",
            icon: None,
            sidebar: false,
        },
        RouteDescriptor {
            pattern: "/admin/roles",
            view: "roles",
            required: &["rbac:manage_roles"],
            label: "Roles & Permissions",
            icon: Some("shield"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/admin/roles/:id",
            view: "role_detail",
            required: &["rbac:manage_roles"],
            label: "Role",
            icon: None,
            sidebar: false,
        },
        RouteDescriptor {
            pattern: "/inventory/documents",
            view: "inventory_documents",
            required: &["inventory:read", "inventory:manage"],
            label: "Inventory Documents",
            icon: Some("archive"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/inventory/documents/:id",
            view: "inventory_document_detail",
            required: &["inventory:read", "inventory:manage"],
            label: "Inventory Document",
            icon: None,
            sidebar: false,
        },
        RouteDescriptor {
            pattern: "/inventory/uom",
            view: "units_of_measure",
            required: &["inventory:manage"],
            label: "Units of Measure",
            icon: Some("ruler"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/inventory/categories",
            view: "categories",
            required: &["inventory:manage"],
            label: "Categories",
            icon: Some("tag"),
            sidebar: true,
        },
        RouteDescriptor {
            pattern: "/tickets/:id/reservations",
            view: "part_reservations",
            required: &["tickets:read", "tickets:manage"],
            label: "Part Reservations",
            icon: None,
            sidebar: false,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_literal_pattern_exact_match_only() {
        let table = default_table();

        assert_eq!(table.resolve("/admin/users").unwrap().view, "users");
        assert!(table.resolve("/admin/users/").is_none());
        assert!(table.resolve("/admin").is_none());
        assert!(table.resolve("/admin/users/extra/deep").is_none());
    }

    #[test]
    fn test_parameter_segment_matches_any_non_empty() {
        let table = default_table();

        assert_eq!(table.resolve("/admin/roles/42").unwrap().view, "role_detail");
        assert_eq!(table.resolve("/admin/roles/3e2b9a90-5b0c-4f51-9f6c-2f8f6f0a1d77").unwrap().view, "role_detail");
    }

    #[test]
    fn test_empty_parameter_segment_does_not_match() {
        let table = default_table();

        // Trailing slash yields an empty final segment
        assert!(table.resolve("/admin/roles/").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let table = RouteTable::new(vec![
            RouteDescriptor {
                pattern: "/items/:id",
                view: "first",
                required: &[],
                label: "First",
                icon: None,
                sidebar: false,
            },
            RouteDescriptor {
                pattern: "/items/special",
                view: "second",
                required: &[],
                label: "Second",
                icon: None,
                sidebar: false,
            },
        ]);

        assert_eq!(table.resolve("/items/special").unwrap().view, "first");
    }

    #[test]
    fn test_mid_pattern_parameter() {
        let table = default_table();

        assert_eq!(table.resolve("/tickets/881/reservations").unwrap().view, "part_reservations");
        assert!(table.resolve("/tickets//reservations").is_none());
        assert!(table.resolve("/tickets/881/parts").is_none());
    }

    #[test]
    fn test_title_for_falls_back() {
        let table = default_table();

        assert_eq!(table.title_for("/admin/users"), "Users");
        assert_eq!(table.title_for("/nowhere"), FALLBACK_TITLE);
    }

    proptest! {
        /// A parameterized pattern matches regardless of the parameter
        /// segment's content, as long as it is non-empty and slash-free.
        #[test]
        fn prop_parameter_accepts_any_segment(id in "[a-zA-Z0-9_-]{1,24}") {
            let role_path = format!("/admin/roles/{id}");
            let ticket_path = format!("/tickets/{id}/reservations");
            prop_assert!(pattern_matches("/admin/roles/:id", &role_path));
            prop_assert!(pattern_matches("/tickets/:id/reservations", &ticket_path));
        }

        /// A literal pattern matches iff the path is exactly equal.
        #[test]
        fn prop_literal_requires_exact_equality(seg in "[a-z]{1,12}") {
            let pattern = "/inventory/uom";
            let path = format!("/inventory/{seg}");
            prop_assert_eq!(pattern_matches(pattern, &path), path == pattern);
        }

        /// Differing segment counts never match.
        #[test]
        fn prop_segment_count_must_be_equal(extra in "[a-z0-9]{1,8}") {
            let long_path = format!("/admin/roles/7/{extra}");
            prop_assert!(!pattern_matches("/admin/roles/:id", &long_path));
            prop_assert!(!pattern_matches("/admin/roles/:id", "/admin/roles"));
        }
    }
}
