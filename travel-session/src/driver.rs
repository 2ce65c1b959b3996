//! Session event loop.
//!
//! Runs a `RouteSession` on a single task: user events arrive over an mpsc
//! channel, fetches run concurrently on the same task, and each settled
//! fetch is applied back to the session. The projected map view is
//! published on a watch channel whenever it changes.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::directions::{DirectionsProvider, Geocoder, LocationProvider};
use crate::domain::{Coordinate, Route, TransportMode};
use crate::session::{Fetch, PickSlot, PickTarget, RouteSession, Services, SessionConfig};
use crate::view::MapView;

/// A user or device event for the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SetPickTarget(PickTarget),
    /// Map tap, filling the active pick target.
    Tap(Coordinate),
    /// A location chosen outside the map, e.g. from search.
    ResolvePick(PickSlot, Coordinate),
    UseDeviceLocation,
    DeviceLocationChanged(Coordinate),
    SetMode(TransportMode),
    OpenOptions,
    RefreshOptions,
    SelectRoute(Option<Route>),
    CloseOptions,
    /// Ranked routes of the current mode for the route details list.
    ShowAlternatives,
}

/// Drives a `RouteSession` against a set of collaborators.
pub struct SessionDriver<D, G, L> {
    session: RouteSession,
    services: Services<D, G, L>,
    view_tx: watch::Sender<MapView>,
}

impl<D, G, L> SessionDriver<D, G, L>
where
    D: DirectionsProvider,
    G: Geocoder,
    L: LocationProvider,
{
    /// Create a driver and the receiver the map display watches.
    pub fn new(config: SessionConfig, services: Services<D, G, L>) -> (Self, watch::Receiver<MapView>) {
        let session = RouteSession::new(config);
        let (view_tx, view_rx) = watch::channel(session.view());

        let driver = Self {
            session,
            services,
            view_tx,
        };
        (driver, view_rx)
    }

    pub fn session(&self) -> &RouteSession {
        &self.session
    }

    /// Process events until the channel closes and all in-flight fetches
    /// have settled, then hand back the session.
    pub async fn run(self, mut events: mpsc::Receiver<SessionEvent>) -> RouteSession {
        let Self {
            mut session,
            services,
            view_tx,
        } = self;

        let mut in_flight = FuturesUnordered::new();
        let mut events_open = true;

        loop {
            tokio::select! {
                event = events.recv(), if events_open => match event {
                    Some(event) => {
                        for fetch in handle_event(&mut session, event) {
                            in_flight.push(fetch.run(&services));
                        }
                    }
                    None => {
                        debug!(in_flight = in_flight.len(), "Event channel closed, draining");
                        events_open = false;
                    }
                },
                Some(completion) = in_flight.next(), if !in_flight.is_empty() => {
                    for fetch in session.apply(completion) {
                        in_flight.push(fetch.run(&services));
                    }
                }
                else => break,
            }

            publish(&view_tx, &session);
        }

        debug!("Session driver finished");
        session
    }
}

fn handle_event(session: &mut RouteSession, event: SessionEvent) -> Vec<Fetch> {
    match event {
        SessionEvent::SetPickTarget(target) => {
            session.set_pick_target(target);
            Vec::new()
        }
        SessionEvent::Tap(coordinate) => session.resolve_tap(coordinate),
        SessionEvent::ResolvePick(slot, coordinate) => session.resolve_pick(slot, coordinate),
        SessionEvent::UseDeviceLocation => vec![session.use_device_location()],
        SessionEvent::DeviceLocationChanged(coordinate) => {
            session.device_location_changed(coordinate);
            Vec::new()
        }
        SessionEvent::SetMode(mode) => session.set_mode(mode),
        SessionEvent::OpenOptions => match session.open_options() {
            Ok(fetch) => vec![fetch],
            Err(e) => {
                warn!(error = %e, "Cannot open route options");
                Vec::new()
            }
        },
        SessionEvent::RefreshOptions => session.refresh_options().into_iter().collect(),
        SessionEvent::SelectRoute(route) => {
            session.select_route(route);
            Vec::new()
        }
        SessionEvent::CloseOptions => {
            session.close_options();
            Vec::new()
        }
        SessionEvent::ShowAlternatives => match session.show_alternatives() {
            Ok(fetch) => vec![fetch],
            Err(e) => {
                warn!(error = %e, "Cannot show route alternatives");
                Vec::new()
            }
        },
    }
}

/// Send the session's view if it differs from the last one sent.
fn publish(view_tx: &watch::Sender<MapView>, session: &RouteSession) {
    let next = session.view();
    view_tx.send_if_modified(|view| {
        if *view == next {
            return false;
        }
        *view = next;
        true
    });
}
