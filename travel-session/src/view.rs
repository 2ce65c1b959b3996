//! Map view projection.
//!
//! The map display never reads session internals. It receives a `MapView`
//! derived from the session state and the latest device location, recomputed
//! after every change.

use geo::LineString;

use crate::domain::{CameraRegion, Coordinate};
use crate::session::{SessionConfig, SessionState};

/// What a pin on the map marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKind {
    Start,
    End,
    DeviceLocation,
}

impl PinKind {
    /// Title shown on the pin.
    pub fn title(self) -> &'static str {
        match self {
            PinKind::Start => "Start",
            PinKind::End => "End",
            PinKind::DeviceLocation => "Your Location",
        }
    }
}

/// A titled marker at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    pub kind: PinKind,
    pub coordinate: Coordinate,
}

impl Pin {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

/// The pins to draw, one per present coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pins {
    pub start: Option<Pin>,
    pub end: Option<Pin>,
    pub device: Option<Pin>,
}

impl Pins {
    /// All present pins, start first.
    pub fn iter(&self) -> impl Iterator<Item = &Pin> {
        [&self.start, &self.end, &self.device]
            .into_iter()
            .filter_map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the map display renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub camera: CameraRegion,
    /// Path of the displayed route.
    pub overlay: Option<LineString<f64>>,
    pub pins: Pins,
}

impl MapView {
    /// View before anything is known: the default region, no overlay or pins.
    pub fn initial(config: &SessionConfig) -> Self {
        Self {
            camera: config.default_region(),
            overlay: None,
            pins: Pins::default(),
        }
    }
}

/// Derive the map view for a session state.
///
/// The camera follows the displayed route's extent, else the device
/// location, else the configured default region. A route with an empty path
/// has no extent and falls through to the next choice.
pub fn project(
    state: &SessionState,
    device_location: Option<Coordinate>,
    config: &SessionConfig,
) -> MapView {
    let route = state.displayed_route.as_ref();

    let camera = route
        .and_then(|r| r.bounding_extent())
        .or_else(|| device_location.map(|c| config.region_around(c)))
        .unwrap_or_else(|| config.default_region());

    let pin = |kind: PinKind, coordinate: Option<Coordinate>| {
        coordinate.map(|coordinate| Pin { kind, coordinate })
    };

    MapView {
        camera,
        overlay: route.map(|r| r.path().clone()),
        pins: Pins {
            start: pin(PinKind::Start, state.picks.start()),
            end: pin(PinKind::End, state.picks.end()),
            device: pin(PinKind::DeviceLocation, device_location),
        },
    }
}
