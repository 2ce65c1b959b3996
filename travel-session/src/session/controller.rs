//! Route session controller.
//!
//! Owns the session state and reacts to pick, mode and options events. Each
//! transition is synchronous and returns the fetches it wants run; the
//! caller runs them and feeds every `Completion` back through
//! [`RouteSession::apply`]. A completion is applied only if its tag is still
//! the current one for its kind, so out-of-order results can never overwrite
//! state produced by newer inputs.

use tracing::{debug, info, trace, warn};

use crate::directions::DirectionsError;
use crate::domain::{Coordinate, Route, TransportMode};
use crate::view::{MapView, project};

use super::config::SessionConfig;
use super::error::SessionError;
use super::fetch::{
    AddressRequest, AlternativesRequest, Completion, Fetch, LocationRequest, OptionsRequest,
    RequestTag, RouteRequest, TagCounter,
};
use super::options::OptionsPanel;
use super::picks::{PickSlot, PickTarget};
use super::state::SessionState;

/// A single route-acquisition session.
#[derive(Debug)]
pub struct RouteSession {
    state: SessionState,
    config: SessionConfig,
    device_location: Option<Coordinate>,
    options: Option<OptionsPanel>,
    tags: TagCounter,
    /// Tag of the single-route fetch whose result may still be displayed.
    current_route: Option<RequestTag>,
    current_location: Option<RequestTag>,
    /// Ranked routes of the current mode for the current picks.
    alternatives: Vec<Route>,
    current_alternatives: Option<RequestTag>,
}

impl RouteSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            state: SessionState::new(),
            config,
            device_location: None,
            options: None,
            tags: TagCounter::default(),
            current_route: None,
            current_location: None,
            alternatives: Vec::new(),
            current_alternatives: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Latest device location, from a lookup or the change stream.
    pub fn device_location(&self) -> Option<Coordinate> {
        self.device_location
    }

    /// The options panel, if open.
    pub fn options_panel(&self) -> Option<&OptionsPanel> {
        self.options.as_ref()
    }

    /// Options the open panel lists for the current mode.
    ///
    /// Empty while the panel only holds a set computed for earlier picks.
    pub fn visible_options(&self) -> Vec<&Route> {
        match &self.options {
            Some(panel) if !panel.is_stale_for(self.state.picks.pair()) => {
                panel.routes_for(self.state.mode)
            }
            _ => Vec::new(),
        }
    }

    /// Ranked routes of the current mode, best first.
    pub fn alternatives(&self) -> &[Route] {
        &self.alternatives
    }

    /// Returns true while a single-route fetch is in flight.
    pub fn is_fetching_route(&self) -> bool {
        self.current_route.is_some()
    }

    /// Project the current state for the map display.
    pub fn view(&self) -> MapView {
        project(&self.state, self.device_location, &self.config)
    }

    pub fn set_pick_target(&mut self, target: PickTarget) {
        trace!(?target, "Pick target set");
        self.state.picks.set_target(target);
    }

    /// Store `coordinate` as the pick in `slot`.
    ///
    /// A new coordinate issues an address lookup and, when both picks are
    /// present, a route fetch. Re-resolving the coordinate a slot already
    /// holds changes nothing.
    pub fn resolve_pick(&mut self, slot: PickSlot, coordinate: Coordinate) -> Vec<Fetch> {
        if slot == PickSlot::Start && self.current_location.take().is_some() {
            debug!("Manual start pick supersedes device location lookup");
        }

        if !self.state.picks.resolve(slot, coordinate) {
            trace!(?slot, %coordinate, "Pick unchanged");
            return Vec::new();
        }

        debug!(?slot, %coordinate, "Pick resolved");

        let mut fetches = vec![Fetch::Address(AddressRequest { slot, coordinate })];
        fetches.extend(self.picks_changed());
        fetches
    }

    /// Resolve a map tap into the active pick target.
    pub fn resolve_tap(&mut self, coordinate: Coordinate) -> Vec<Fetch> {
        match self.state.picks.target().slot() {
            Some(slot) => self.resolve_pick(slot, coordinate),
            None => {
                trace!(%coordinate, "Tap ignored, no pick target");
                Vec::new()
            }
        }
    }

    /// Ask for the device location, to be used as the start pick.
    pub fn use_device_location(&mut self) -> Fetch {
        let tag = self.tags.next();
        self.current_location = Some(tag);
        debug!(%tag, "Requesting device location");
        Fetch::Location(LocationRequest { tag })
    }

    /// Record a location reported by the device's change stream.
    pub fn device_location_changed(&mut self, coordinate: Coordinate) {
        trace!(%coordinate, "Device location changed");
        self.device_location = Some(coordinate);
    }

    /// Switch transport mode.
    ///
    /// Always refetches when both picks are present, and refreshes the options
    /// panel if it is open.
    pub fn set_mode(&mut self, mode: TransportMode) -> Vec<Fetch> {
        debug!(%mode, "Transport mode set");
        self.state.mode = mode;
        self.picks_changed()
    }

    /// Open the options panel and fetch one route per mode.
    ///
    /// Reopening starts a fresh panel; results of the earlier one are dropped.
    pub fn open_options(&mut self) -> Result<Fetch, SessionError> {
        let (start, end) = self
            .state
            .picks
            .pair()
            .ok_or(SessionError::PicksIncomplete)?;

        let tag = self.tags.next();
        let mut panel = OptionsPanel::new();
        panel.begin(tag);
        self.options = Some(panel);

        info!(%tag, %start, %end, "Options panel opened");
        Ok(Fetch::Options(OptionsRequest { tag, start, end }))
    }

    /// Refetch options for the open panel. `None` when the panel is closed.
    pub fn refresh_options(&mut self) -> Option<Fetch> {
        let (start, end) = self.state.picks.pair()?;
        let panel = self.options.as_mut()?;

        let tag = self.tags.next();
        panel.begin(tag);

        debug!(%tag, "Refreshing route options");
        Some(Fetch::Options(OptionsRequest { tag, start, end }))
    }

    /// Fetch up to `max_alternatives` ranked routes of the current mode.
    ///
    /// The list is cleared whenever a pick or the mode changes.
    pub fn show_alternatives(&mut self) -> Result<Fetch, SessionError> {
        let (start, end) = self
            .state
            .picks
            .pair()
            .ok_or(SessionError::PicksIncomplete)?;

        let tag = self.tags.next();
        let mode = self.state.mode;
        self.current_alternatives = Some(tag);

        debug!(%tag, %mode, "Fetching route alternatives");
        Ok(Fetch::Alternatives(AlternativesRequest {
            tag,
            start,
            end,
            mode,
            limit: self.config.max_alternatives,
        }))
    }

    /// Dismiss the options panel. Its in-flight fetch is dropped on arrival.
    pub fn close_options(&mut self) {
        if self.options.take().is_some() {
            debug!("Options panel closed");
        }
    }

    /// Leave the options panel, committing `route` if one was chosen.
    ///
    /// A committed route becomes the displayed route and its mode the
    /// session mode. Any single-route fetch still in flight was issued for
    /// older inputs and is superseded.
    ///
    /// While the panel's set belongs to earlier picks a selection is
    /// refused and the panel stays open for its refresh.
    pub fn select_route(&mut self, route: Option<Route>) {
        let stale = self
            .options
            .as_ref()
            .is_some_and(|panel| panel.is_stale_for(self.state.picks.pair()));

        if route.is_some() && stale {
            debug!("Ignoring selection from options computed for earlier picks");
            return;
        }

        if let Some(route) = route {
            info!(
                mode = %route.mode(),
                distance_m = route.distance_m(),
                duration_s = route.duration_s(),
                "Route option selected"
            );
            self.state.mode = route.mode();
            self.state.displayed_route = Some(route);
            self.state.last_error = None;
            self.current_route = None;
        } else {
            debug!("Options dismissed without selection");
        }

        self.close_options();
    }

    /// Apply a settled fetch, returning any follow-up fetches.
    pub fn apply(&mut self, completion: Completion) -> Vec<Fetch> {
        match completion {
            Completion::Route(request, result) => {
                self.apply_route(request, result);
                Vec::new()
            }
            Completion::Options(request, options) => {
                let Some(panel) = self.options.as_mut() else {
                    debug!(tag = %request.tag, "Dropping route options for closed panel");
                    return Vec::new();
                };
                if !panel.complete(&request, options) {
                    debug!(tag = %request.tag, "Dropping superseded route options");
                    return Vec::new();
                }

                debug!(
                    tag = %request.tag,
                    options = panel.options().len(),
                    "Route options applied"
                );
                if let Some(e) = panel.error() {
                    warn!(error = %e, "No route options");
                }
                Vec::new()
            }
            Completion::Alternatives(request, result) => {
                if self.current_alternatives != Some(request.tag) {
                    debug!(tag = %request.tag, "Dropping stale route alternatives");
                    return Vec::new();
                }
                self.current_alternatives = None;

                match result {
                    Ok(routes) => {
                        debug!(
                            tag = %request.tag,
                            alternatives = routes.len(),
                            "Route alternatives applied"
                        );
                        self.alternatives = routes;
                    }
                    Err(e) => {
                        warn!(
                            tag = %request.tag,
                            mode = %request.mode,
                            error = %e,
                            "No route alternatives"
                        );
                        self.alternatives.clear();
                    }
                }
                Vec::new()
            }
            Completion::Address(request, address) => {
                if self
                    .state
                    .picks
                    .set_address(request.slot, request.coordinate, address)
                {
                    trace!(slot = ?request.slot, "Pick address updated");
                } else {
                    trace!(slot = ?request.slot, "Dropping address for replaced pick");
                }
                Vec::new()
            }
            Completion::Location(request, result) => {
                if self.current_location != Some(request.tag) {
                    debug!(tag = %request.tag, "Dropping superseded device location");
                    return Vec::new();
                }
                self.current_location = None;

                match result {
                    Ok(coordinate) => {
                        self.device_location = Some(coordinate);
                        self.resolve_pick(PickSlot::Start, coordinate)
                    }
                    Err(e) => {
                        debug!(error = %e, "Device location unavailable");
                        Vec::new()
                    }
                }
            }
        }
    }

    fn apply_route(
        &mut self,
        request: RouteRequest,
        result: Result<Route, DirectionsError>,
    ) {
        if self.current_route != Some(request.tag) {
            debug!(tag = %request.tag, mode = %request.mode, "Dropping stale route");
            return;
        }
        self.current_route = None;

        match result {
            Ok(route) => {
                info!(
                    tag = %request.tag,
                    mode = %route.mode(),
                    distance_m = route.distance_m(),
                    duration_s = route.duration_s(),
                    "Route displayed"
                );
                self.state.displayed_route = Some(route);
                self.state.last_error = None;
            }
            Err(e) => {
                warn!(tag = %request.tag, mode = %request.mode, error = %e, "Route fetch failed");
                self.state.last_error = Some(e.into());
            }
        }
    }

    /// Fetches owed after start, end or mode changed.
    fn picks_changed(&mut self) -> Vec<Fetch> {
        self.alternatives.clear();
        self.current_alternatives = None;

        self.route_if_ready()
            .into_iter()
            .chain(self.refresh_options())
            .collect()
    }

    fn route_if_ready(&mut self) -> Option<Fetch> {
        let Some((start, end)) = self.state.picks.pair() else {
            trace!("Picks incomplete, not fetching");
            return None;
        };

        let tag = self.tags.next();
        let mode = self.state.mode;
        self.current_route = Some(tag);

        debug!(%tag, %start, %end, %mode, "Fetching route");
        Some(Fetch::Route(RouteRequest {
            tag,
            start,
            end,
            mode,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedDirections};
    use crate::directions::{
        DirectionsProvider, Geocoder, LocationError, LocationProvider, MockDirections,
        StaticGeocoder, StaticLocation,
    };
    use crate::domain::RouteOptionSet;
    use crate::session::Services;

    const BERLIN: Coordinate = Coordinate::new(52.5200, 13.4050);
    const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);
    const MUNICH: Coordinate = Coordinate::new(48.1351, 11.5820);

    type TestServices = Services<MockDirections, StaticGeocoder, StaticLocation>;

    fn route_to(end: Coordinate, mode: TransportMode, distance_m: f64) -> Route {
        Route::new([BERLIN, end], distance_m, 3_600.0, mode).unwrap()
    }

    fn session() -> RouteSession {
        RouteSession::new(SessionConfig::default())
    }

    fn route_request(fetches: &[Fetch]) -> RouteRequest {
        fetches
            .iter()
            .find_map(|f| match f {
                Fetch::Route(r) => Some(*r),
                _ => None,
            })
            .expect("no route fetch issued")
    }

    fn has_route_fetch(fetches: &[Fetch]) -> bool {
        fetches.iter().any(|f| matches!(f, Fetch::Route(_)))
    }

    fn ready_session() -> (RouteSession, RouteRequest) {
        let mut session = session();
        session.resolve_pick(PickSlot::Start, BERLIN);
        let fetches = session.resolve_pick(PickSlot::End, PARIS);
        let request = route_request(&fetches);
        (session, request)
    }

    fn all_modes() -> MockDirections {
        MockDirections::new()
            .with_routes(
                TransportMode::Drive,
                vec![route_to(PARIS, TransportMode::Drive, 1_054_000.0)],
            )
            .with_routes(
                TransportMode::Walk,
                vec![route_to(PARIS, TransportMode::Walk, 1_030_000.0)],
            )
            .with_routes(
                TransportMode::Transit,
                vec![route_to(PARIS, TransportMode::Transit, 1_100_000.0)],
            )
    }

    fn services(directions: MockDirections) -> TestServices {
        Services::new(directions, StaticGeocoder::new(), StaticLocation::unavailable())
    }

    /// Run fetches to completion, feeding follow-ups back in.
    async fn settle<D, G, L>(session: &mut RouteSession, services: &Services<D, G, L>, fetches: Vec<Fetch>)
    where
        D: DirectionsProvider,
        G: Geocoder,
        L: LocationProvider,
    {
        let mut queue = fetches;
        while let Some(fetch) = queue.pop() {
            let completion = fetch.run(services).await;
            queue.extend(session.apply(completion));
        }
    }

    #[test]
    fn incomplete_picks_do_not_fetch() {
        let mut session = session();

        let fetches = session.resolve_pick(PickSlot::Start, BERLIN);
        assert_eq!(
            fetches,
            vec![Fetch::Address(AddressRequest {
                slot: PickSlot::Start,
                coordinate: BERLIN
            })]
        );
        assert!(session.set_mode(TransportMode::Walk).is_empty());
        assert_eq!(session.state().mode, TransportMode::Walk);
        assert!(!session.is_fetching_route());
    }

    #[test]
    fn completing_picks_issues_fetch_for_current_mode() {
        let mut session = session();
        session.set_mode(TransportMode::Transit);
        session.resolve_pick(PickSlot::Start, BERLIN);

        let request = route_request(&session.resolve_pick(PickSlot::End, PARIS));
        assert_eq!(request.start, BERLIN);
        assert_eq!(request.end, PARIS);
        assert_eq!(request.mode, TransportMode::Transit);
        assert!(session.is_fetching_route());
    }

    #[test]
    fn same_pick_is_not_a_change() {
        let (mut session, _) = ready_session();
        assert!(session.resolve_pick(PickSlot::End, PARIS).is_empty());
    }

    #[test]
    fn every_change_issues_a_fetch() {
        let (mut session, first) = ready_session();

        let second = route_request(&session.set_mode(TransportMode::Walk));
        let third = route_request(&session.set_mode(TransportMode::Walk));
        let fourth = route_request(&session.resolve_pick(PickSlot::End, MUNICH));

        assert!(first.tag < second.tag);
        assert!(second.tag < third.tag);
        assert!(third.tag < fourth.tag);
        assert_eq!(fourth.mode, TransportMode::Walk);
        assert_eq!(fourth.end, MUNICH);
    }

    #[test]
    fn superseded_route_is_never_displayed() {
        for stale_first in [true, false] {
            let (mut session, to_paris) = ready_session();
            let to_munich = route_request(&session.resolve_pick(PickSlot::End, MUNICH));

            let stale = Completion::Route(
                to_paris,
                Ok(route_to(PARIS, TransportMode::Drive, 1_054_000.0)),
            );
            let fresh = Completion::Route(
                to_munich,
                Ok(route_to(MUNICH, TransportMode::Drive, 585_000.0)),
            );

            if stale_first {
                session.apply(stale);
                session.apply(fresh);
            } else {
                session.apply(fresh);
                session.apply(stale);
            }

            let displayed = session.state().displayed_route.as_ref().unwrap();
            assert_eq!(displayed.distance_m(), 585_000.0);
            assert!(!session.is_fetching_route());
        }
    }

    #[test]
    fn stale_failure_is_dropped() {
        let (mut session, first) = ready_session();
        let second = route_request(&session.set_mode(TransportMode::Walk));

        session.apply(Completion::Route(
            second,
            Ok(route_to(PARIS, TransportMode::Walk, 1_030_000.0)),
        ));
        session.apply(Completion::Route(
            first,
            Err(DirectionsError::Provider("timeout".into())),
        ));

        assert_eq!(session.state().last_error, None);
        assert_eq!(
            session.state().displayed_route.as_ref().unwrap().mode(),
            TransportMode::Walk
        );
    }

    #[test]
    fn failure_keeps_displayed_route() {
        let (mut session, first) = ready_session();
        let drive = route_to(PARIS, TransportMode::Drive, 1_054_000.0);
        session.apply(Completion::Route(first, Ok(drive.clone())));

        let second = route_request(&session.set_mode(TransportMode::Transit));
        session.apply(Completion::Route(
            second,
            Err(DirectionsError::NoRouteFound {
                mode: TransportMode::Transit,
            }),
        ));

        assert_eq!(session.state().displayed_route, Some(drive));
        assert_eq!(
            session.state().last_error,
            Some(SessionError::Directions(DirectionsError::NoRouteFound {
                mode: TransportMode::Transit
            }))
        );

        let third = route_request(&session.set_mode(TransportMode::Drive));
        session.apply(Completion::Route(
            third,
            Ok(route_to(PARIS, TransportMode::Drive, 1_000_000.0)),
        ));
        assert_eq!(session.state().last_error, None);
    }

    #[test]
    fn tap_fills_active_target() {
        let mut session = session();
        assert!(session.resolve_tap(BERLIN).is_empty());
        assert_eq!(session.state().picks.start(), None);

        session.set_pick_target(PickTarget::End);
        let fetches = session.resolve_tap(PARIS);

        assert_eq!(fetches.len(), 1);
        assert_eq!(session.state().picks.end(), Some(PARIS));
        assert_eq!(session.state().picks.target(), PickTarget::None);

        session.set_pick_target(PickTarget::Start);
        assert!(has_route_fetch(&session.resolve_tap(BERLIN)));
    }

    #[test]
    fn address_for_replaced_pick_is_dropped() {
        let mut session = session();
        session.resolve_pick(PickSlot::Start, BERLIN);
        session.resolve_pick(PickSlot::Start, MUNICH);

        session.apply(Completion::Address(
            AddressRequest {
                slot: PickSlot::Start,
                coordinate: BERLIN,
            },
            "Pariser Platz".into(),
        ));
        assert_eq!(session.state().picks.pick(PickSlot::Start).address, "");

        session.apply(Completion::Address(
            AddressRequest {
                slot: PickSlot::Start,
                coordinate: MUNICH,
            },
            "Marienplatz".into(),
        ));
        assert_eq!(
            session.state().picks.pick(PickSlot::Start).address,
            "Marienplatz"
        );
    }

    #[tokio::test]
    async fn geocode_failure_still_fetches_route() {
        let services = Services::new(
            all_modes(),
            StaticGeocoder::unavailable(),
            StaticLocation::unavailable(),
        );
        let mut session = session();
        session.resolve_pick(PickSlot::Start, BERLIN);

        let fetches = session.resolve_pick(PickSlot::End, PARIS);
        assert!(has_route_fetch(&fetches));
        settle(&mut session, &services, fetches).await;

        let end = session.state().picks.pick(PickSlot::End);
        assert_eq!(end.coordinate, Some(PARIS));
        assert_eq!(end.address, "");
        assert!(session.state().displayed_route.is_some());
    }

    #[tokio::test]
    async fn berlin_to_paris_drive() {
        let services = services(all_modes());
        let mut session = session();

        let mut fetches = session.resolve_pick(PickSlot::Start, BERLIN);
        fetches.extend(session.resolve_pick(PickSlot::End, PARIS));
        fetches.extend(session.set_mode(TransportMode::Drive));
        settle(&mut session, &services, fetches).await;

        let route = session.state().displayed_route.clone().unwrap();
        assert_eq!(route.mode(), TransportMode::Drive);
        assert!(route.distance_m() > 0.0);
        assert!(route.duration_s() > 0.0);

        let view = session.view();
        assert_eq!(Some(view.camera), route.bounding_extent());
        assert_eq!(view.overlay.as_ref(), Some(route.path()));
    }

    #[tokio::test]
    async fn device_location_becomes_start() {
        let services = Services::new(all_modes(), StaticGeocoder::new(), StaticLocation::at(BERLIN));
        let mut session = session();
        session.resolve_pick(PickSlot::End, PARIS);

        let fetch = session.use_device_location();
        settle(&mut session, &services, vec![fetch]).await;

        assert_eq!(session.state().picks.start(), Some(BERLIN));
        assert_eq!(session.device_location(), Some(BERLIN));
        assert!(session.state().displayed_route.is_some());
    }

    #[test]
    fn device_location_failure_is_silent() {
        let mut session = session();
        let Fetch::Location(request) = session.use_device_location() else {
            panic!("expected location fetch");
        };

        let fetches = session.apply(Completion::Location(
            request,
            Err(LocationError::Unavailable),
        ));

        assert!(fetches.is_empty());
        assert_eq!(session.state(), &SessionState::new());
        assert_eq!(session.state().last_error, None);
    }

    #[test]
    fn manual_start_supersedes_device_location() {
        let mut session = session();
        let Fetch::Location(request) = session.use_device_location() else {
            panic!("expected location fetch");
        };
        session.resolve_pick(PickSlot::Start, MUNICH);

        session.apply(Completion::Location(request, Ok(BERLIN)));
        assert_eq!(session.state().picks.start(), Some(MUNICH));
    }

    #[test]
    fn device_location_stream_moves_camera() {
        let mut session = session();
        assert_eq!(session.view().camera, session.config().default_region());

        session.device_location_changed(MUNICH);
        assert_eq!(
            session.view().camera,
            session.config().region_around(MUNICH)
        );
    }

    #[test]
    fn options_require_both_picks() {
        let mut session = session();
        session.resolve_pick(PickSlot::Start, BERLIN);

        assert_eq!(session.open_options(), Err(SessionError::PicksIncomplete));
        assert!(session.options_panel().is_none());
    }

    #[tokio::test]
    async fn options_with_one_failing_mode() {
        let services = services(all_modes().with_failure(
            TransportMode::Walk,
            DirectionsError::Provider("walking unavailable".into()),
        ));
        let (mut session, _) = ready_session();

        let fetch = session.open_options().unwrap();
        assert!(session.options_panel().unwrap().is_loading());
        settle(&mut session, &services, vec![fetch]).await;

        let panel = session.options_panel().unwrap();
        assert!(!panel.is_loading());
        assert_eq!(panel.options().len(), 2);
        assert!(panel.routes_for(TransportMode::Walk).is_empty());
        assert_eq!(panel.error(), None);
    }

    #[tokio::test]
    async fn options_for_all_modes() {
        let services = services(all_modes());
        let (mut session, _) = ready_session();

        let fetch = session.open_options().unwrap();
        settle(&mut session, &services, vec![fetch]).await;

        assert_eq!(session.options_panel().unwrap().options().len(), 3);

        session.set_mode(TransportMode::Transit);
        let visible = session.visible_options();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].mode(), TransportMode::Transit);
        assert_eq!(visible[0].distance_m(), 1_100_000.0);
    }

    #[tokio::test]
    async fn all_modes_failing_sets_panel_error() {
        let services = services(MockDirections::new());
        let (mut session, _) = ready_session();

        let fetch = session.open_options().unwrap();
        settle(&mut session, &services, vec![fetch]).await;

        let panel = session.options_panel().unwrap();
        assert!(panel.options().is_empty());
        assert_eq!(panel.error(), Some(&SessionError::AllModesFailed));
        assert_eq!(session.state().last_error, None);
    }

    #[test]
    fn mode_change_refreshes_open_panel() {
        let (mut session, _) = ready_session();
        let Ok(Fetch::Options(first)) = session.open_options() else {
            panic!("expected options fetch");
        };

        let fetches = session.set_mode(TransportMode::Walk);
        let second = fetches
            .iter()
            .find_map(|f| match f {
                Fetch::Options(o) => Some(*o),
                _ => None,
            })
            .unwrap();
        assert!(has_route_fetch(&fetches));
        assert!(second.tag > first.tag);

        let stale = RouteOptionSet::from_routes([route_to(PARIS, TransportMode::Drive, 1.0)]);
        session.apply(Completion::Options(first, stale));
        assert!(session.options_panel().unwrap().options().is_empty());
        assert!(session.options_panel().unwrap().is_loading());

        let fresh = RouteOptionSet::from_routes([route_to(PARIS, TransportMode::Walk, 2.0)]);
        session.apply(Completion::Options(second, fresh));
        assert_eq!(session.visible_options().len(), 1);
    }

    #[test]
    fn dismissed_panel_drops_results() {
        let (mut session, _) = ready_session();
        let Ok(Fetch::Options(request)) = session.open_options() else {
            panic!("expected options fetch");
        };

        session.close_options();
        session.apply(Completion::Options(
            request,
            RouteOptionSet::from_routes([route_to(PARIS, TransportMode::Drive, 1.0)]),
        ));

        assert!(session.options_panel().is_none());
        assert!(session.visible_options().is_empty());
    }

    #[test]
    fn reopened_panel_drops_earlier_results() {
        let (mut session, _) = ready_session();
        let Ok(Fetch::Options(first)) = session.open_options() else {
            panic!("expected options fetch");
        };
        session.close_options();
        session.open_options().unwrap();

        session.apply(Completion::Options(
            first,
            RouteOptionSet::from_routes([route_to(PARIS, TransportMode::Drive, 1.0)]),
        ));

        let panel = session.options_panel().unwrap();
        assert!(panel.is_loading());
        assert!(panel.options().is_empty());
    }

    #[test]
    fn select_none_keeps_route() {
        let (mut session, request) = ready_session();
        let drive = route_to(PARIS, TransportMode::Drive, 1_054_000.0);
        session.apply(Completion::Route(request, Ok(drive.clone())));
        session.open_options().unwrap();

        session.select_route(None);

        assert_eq!(session.state().displayed_route, Some(drive));
        assert!(session.options_panel().is_none());
    }

    #[test]
    fn select_commits_route_and_mode() {
        let (mut session, pending) = ready_session();
        session.open_options().unwrap();

        let transit = route_to(PARIS, TransportMode::Transit, 1_100_000.0);
        session.select_route(Some(transit.clone()));

        assert_eq!(session.state().displayed_route, Some(transit.clone()));
        assert_eq!(session.state().mode, TransportMode::Transit);
        assert!(session.options_panel().is_none());
        assert_eq!(Some(session.view().camera), transit.bounding_extent());

        // The drive fetch issued before selection must not replace it.
        session.apply(Completion::Route(
            pending,
            Ok(route_to(PARIS, TransportMode::Drive, 1_054_000.0)),
        ));
        assert_eq!(session.state().displayed_route, Some(transit));
    }

    #[tokio::test]
    async fn options_for_earlier_picks_cannot_be_selected() {
        let services = services(all_modes());
        let (mut session, first) = ready_session();
        let to_paris = route_to(PARIS, TransportMode::Drive, 1_054_000.0);
        session.apply(Completion::Route(first, Ok(to_paris.clone())));

        let fetch = session.open_options().unwrap();
        settle(&mut session, &services, vec![fetch]).await;
        assert_eq!(session.visible_options().len(), 1);

        let fetches = session.resolve_pick(PickSlot::End, MUNICH);
        let to_munich = route_request(&fetches);
        assert!(session.options_panel().unwrap().is_loading());
        assert!(session.visible_options().is_empty());

        let leftover = session.options_panel().unwrap().routes_for(TransportMode::Drive)[0].clone();
        session.select_route(Some(leftover));

        assert_eq!(session.state().displayed_route, Some(to_paris));
        assert!(session.options_panel().is_some());
        assert!(session.is_fetching_route());

        let munich = route_to(MUNICH, TransportMode::Drive, 585_000.0);
        session.apply(Completion::Route(to_munich, Ok(munich.clone())));
        assert_eq!(session.state().displayed_route, Some(munich));
    }

    #[tokio::test]
    async fn refreshed_options_become_selectable() {
        let services = services(all_modes());
        let (mut session, _) = ready_session();
        let fetch = session.open_options().unwrap();
        settle(&mut session, &services, vec![fetch]).await;

        let fetches = session.resolve_pick(PickSlot::End, MUNICH);
        settle(&mut session, &services, fetches).await;

        let panel = session.options_panel().unwrap();
        assert_eq!(panel.computed_for(), Some((BERLIN, MUNICH)));
        assert_eq!(session.visible_options().len(), 1);

        let chosen = session.visible_options()[0].clone();
        session.select_route(Some(chosen.clone()));
        assert_eq!(session.state().displayed_route, Some(chosen));
        assert!(session.options_panel().is_none());
    }

    #[test]
    fn alternatives_require_both_picks() {
        let mut session = session();
        session.resolve_pick(PickSlot::End, PARIS);

        assert_eq!(
            session.show_alternatives(),
            Err(SessionError::PicksIncomplete)
        );
    }

    #[tokio::test]
    async fn alternatives_for_current_mode() {
        let walk = |distance_m| route_to(PARIS, TransportMode::Walk, distance_m);
        let services = services(all_modes().with_routes(
            TransportMode::Walk,
            vec![walk(1_030_000.0), walk(1_040_000.0), walk(1_050_000.0), walk(1_060_000.0)],
        ));
        let (mut session, _) = ready_session();
        session.set_mode(TransportMode::Walk);

        let Ok(Fetch::Alternatives(request)) = session.show_alternatives() else {
            panic!("expected alternatives fetch");
        };
        assert_eq!(request.mode, TransportMode::Walk);
        assert_eq!(request.limit, 3);
        settle(&mut session, &services, vec![Fetch::Alternatives(request)]).await;

        assert_eq!(session.alternatives().len(), 3);
        assert_eq!(session.alternatives()[0].distance_m(), 1_030_000.0);

        let second = session.alternatives()[1].clone();
        session.select_route(Some(second.clone()));
        assert_eq!(session.state().displayed_route, Some(second));
        assert_eq!(session.state().mode, TransportMode::Walk);
    }

    #[tokio::test]
    async fn alternatives_are_cleared_by_changes() {
        let services = services(all_modes());
        let (mut session, _) = ready_session();

        let fetch = session.show_alternatives().unwrap();
        settle(&mut session, &services, vec![fetch]).await;
        assert_eq!(session.alternatives().len(), 1);

        session.set_mode(TransportMode::Transit);
        assert!(session.alternatives().is_empty());

        let fetch = session.show_alternatives().unwrap();
        session.resolve_pick(PickSlot::End, MUNICH);
        settle(&mut session, &services, vec![fetch]).await;
        assert!(session.alternatives().is_empty());
    }

    #[tokio::test]
    async fn alternatives_share_the_cache() {
        let mock = all_modes();
        let services = Services::new(
            CachedDirections::new(mock.clone(), &CacheConfig::default()),
            StaticGeocoder::new(),
            StaticLocation::unavailable(),
        );
        let mut session = session();
        session.resolve_pick(PickSlot::Start, BERLIN);
        let fetches = session.resolve_pick(PickSlot::End, PARIS);
        settle(&mut session, &services, fetches).await;
        assert_eq!(mock.call_count(), 1);

        let fetch = session.show_alternatives().unwrap();
        settle(&mut session, &services, vec![fetch]).await;

        assert_eq!(session.alternatives().len(), 1);
        assert_eq!(mock.call_count(), 1);
    }
}
