//! Last resolved route and issued redirects

use shared::models::RouteResolution;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterState {
    pub current: Option<RouteResolution>,
    /// Redirect targets handed to the route sink, oldest first
    pub redirects: Vec<String>,
}

impl RouterState {
    pub fn navigated(&mut self, route: RouteResolution) {
        self.current = Some(route);
    }

    pub fn redirected(&mut self, path: &str) {
        self.redirects.push(path.to_string());
    }
}
