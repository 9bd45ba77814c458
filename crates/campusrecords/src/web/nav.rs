//! Navigation bar state.

use crate::model::RecordKey;

/// Links shown in the navigation bar, in display order.
const LINKS: [(&str, &str); 5] = [
    ("/about", "About"),
    ("/htmlDemo", "HTML Demo"),
    ("/students", "Students"),
    ("/students/add", "Add Student"),
    ("/courses", "Courses"),
];

/// A navigation link and whether it matches the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Target path.
    pub url: &'static str,
    /// Link text.
    pub label: &'static str,
    /// Whether this link is the active route.
    pub active: bool,
}

/// Compute the active route for a request path.
///
/// When the second path segment is numeric the route is cut back to the
/// first segment, so `/student/3` highlights `/student`. Any other path is
/// its own route with one trailing slash dropped, so `/students/add/`
/// still highlights `/students/add`.
#[must_use]
pub fn active_route(path: &str) -> String {
    let route = path.strip_prefix('/').unwrap_or(path);
    let mut segments = route.splitn(3, '/');
    let first = segments.next().unwrap_or_default();

    match segments.next() {
        Some(second) if RecordKey::from(second).as_number().is_some() => format!("/{first}"),
        _ => format!("/{}", route.strip_suffix('/').unwrap_or(route)),
    }
}

/// Build the navigation bar for a request path.
#[must_use]
pub fn nav_links(path: &str) -> Vec<NavLink> {
    let active = active_route(path);
    LINKS
        .iter()
        .map(|&(url, label)| NavLink {
            url,
            label,
            active: url == active,
        })
        .collect()
}
