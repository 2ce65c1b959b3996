//! Route option sets.

use super::{Route, TransportMode};

/// Maximum number of routes offered for selection.
pub const MAX_ROUTE_OPTIONS: usize = 3;

/// Up to three candidate routes, at most one per transport mode.
///
/// Both caps are enforced on insertion, so any `RouteOptionSet` upholds them
/// by construction. The order is insertion order and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteOptionSet {
    routes: Vec<Route>,
}

impl RouteOptionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from candidates, keeping the first route of each mode.
    pub fn from_routes(routes: impl IntoIterator<Item = Route>) -> Self {
        let mut set = Self::new();
        for route in routes {
            set.push(route);
        }
        set
    }

    /// Adds a route. Returns false if its mode is already present or the
    /// set is full.
    pub fn push(&mut self, route: Route) -> bool {
        if self.routes.len() >= MAX_ROUTE_OPTIONS || self.contains_mode(route.mode()) {
            return false;
        }
        self.routes.push(route);
        true
    }

    /// Returns true if a route for `mode` is present.
    pub fn contains_mode(&self, mode: TransportMode) -> bool {
        self.routes.iter().any(|r| r.mode() == mode)
    }

    /// The route for `mode`, if present.
    pub fn get(&self, mode: TransportMode) -> Option<&Route> {
        self.routes.iter().find(|r| r.mode() == mode)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteOptionSet {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
