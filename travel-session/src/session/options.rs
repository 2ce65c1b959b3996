//! Route options across transport modes.
//!
//! Opening the options panel fans out one request per mode against the same
//! pair of picks and joins all of them before building the option set. Each
//! mode settles on its own: a failing mode contributes nothing and never
//! blocks or fails the others.

use futures::future::join_all;
use tracing::debug;

use crate::directions::{DirectionsError, DirectionsProvider, best_route};
use crate::domain::{Coordinate, MAX_ROUTE_OPTIONS, Route, RouteOptionSet, TransportMode};

use super::error::SessionError;
use super::fetch::{OptionsRequest, RequestTag};

/// Fetch the best route of every mode concurrently.
///
/// Waits for all three requests to settle. The set holds one route per
/// mode that succeeded, in no particular order.
pub async fn fetch_options<P: DirectionsProvider>(
    provider: &P,
    start: Coordinate,
    end: Coordinate,
) -> RouteOptionSet {
    let requests = TransportMode::ALL.map(|mode| async move {
        let result = best_route(provider, start, end, mode).await;
        (mode, result)
    });

    let results = join_all(requests).await;

    let mut options = RouteOptionSet::new();
    for (mode, result) in results {
        match result {
            Ok(route) => {
                options.push(route);
            }
            Err(e) => {
                debug!(mode = %mode, error = %e, "Mode contributes no route option");
            }
        }
    }

    debug!(options = options.len(), "Route options fetched");
    options
}

/// Routes in `options` computed for `mode`, capped to three.
///
/// With at most one route per mode in a set this is zero or one route.
pub fn filter_by_mode(options: &RouteOptionSet, mode: TransportMode) -> Vec<&Route> {
    options
        .iter()
        .filter(|route| route.mode() == mode)
        .take(MAX_ROUTE_OPTIONS)
        .collect()
}

/// Ranked alternatives for a single mode, best first, at most `limit`.
///
/// Candidates for other modes are discarded. An answer with no candidates
/// for `mode` is `NoRouteFound`.
pub async fn fetch_mode_alternatives<P: DirectionsProvider>(
    provider: &P,
    start: Coordinate,
    end: Coordinate,
    mode: TransportMode,
    limit: usize,
) -> Result<Vec<Route>, DirectionsError> {
    let mut routes = provider.request_route(start, end, mode).await?;
    routes.retain(|route| route.mode() == mode);

    if routes.is_empty() {
        return Err(DirectionsError::NoRouteFound { mode });
    }

    routes.truncate(limit);
    Ok(routes)
}

/// Start and end a set of options was computed for.
type PickPair = (Coordinate, Coordinate);

/// State of an open options panel.
///
/// Exists only while the panel is shown. Results of a fetch issued for an
/// earlier panel, or superseded by a newer fetch, are dropped. The applied
/// set remembers the picks it was computed for, so a set left over from
/// earlier picks can be recognised while its refresh is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsPanel {
    pending: Option<RequestTag>,
    options: RouteOptionSet,
    computed_for: Option<PickPair>,
    error: Option<SessionError>,
}

impl OptionsPanel {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The latest option set. Kept while a refresh is in flight.
    pub fn options(&self) -> &RouteOptionSet {
        &self.options
    }

    /// Set when every mode of the latest fetch failed.
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// The (start, end) pair of the applied option set.
    pub fn computed_for(&self) -> Option<PickPair> {
        self.computed_for
    }

    /// Returns true if the applied set was computed for picks other than
    /// `pair`. A panel with nothing applied yet is never stale.
    pub fn is_stale_for(&self, pair: Option<PickPair>) -> bool {
        self.computed_for.is_some() && self.computed_for != pair
    }

    /// Returns true while an options fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Options the panel lists for `mode`.
    pub fn routes_for(&self, mode: TransportMode) -> Vec<&Route> {
        filter_by_mode(&self.options, mode)
    }

    pub(crate) fn begin(&mut self, tag: RequestTag) {
        self.pending = Some(tag);
    }

    /// Apply a completed fetch if `request` is the pending one.
    pub(crate) fn complete(&mut self, request: &OptionsRequest, options: RouteOptionSet) -> bool {
        if self.pending != Some(request.tag) {
            return false;
        }

        self.pending = None;
        self.error = options.is_empty().then_some(SessionError::AllModesFailed);
        self.options = options;
        self.computed_for = Some((request.start, request.end));
        true
    }
}
