use std::env;
use std::error::Error;

use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use travel_session::cache::{CacheConfig, CachedDirections};
use travel_session::directions::{MockDirections, StaticGeocoder, StaticLocation};
use travel_session::domain::{Coordinate, TransportMode};
use travel_session::driver::{SessionDriver, SessionEvent};
use travel_session::session::{PickSlot, Services, SessionConfig};

/// Fixture directory used when `TRAVEL_FIXTURES` is unset.
const DEFAULT_FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fixtures");

const BERLIN: Coordinate = Coordinate::new(52.5200, 13.4050);
const PARIS: Coordinate = Coordinate::new(48.8566, 2.3522);

/// Read a "lat,lon" coordinate from the environment.
fn env_coordinate(name: &str, default: Coordinate) -> Result<Coordinate, Box<dyn Error>> {
    match env::var(name) {
        Ok(value) => Ok(Coordinate::parse(&value)?),
        Err(_) => Ok(default),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let fixtures = env::var("TRAVEL_FIXTURES").unwrap_or_else(|_| DEFAULT_FIXTURES.to_string());
    let start = env_coordinate("TRAVEL_START", BERLIN)?;
    let end = env_coordinate("TRAVEL_END", PARIS)?;
    let mode = match env::var("TRAVEL_MODE") {
        Ok(value) => value.parse::<TransportMode>()?,
        Err(_) => TransportMode::default(),
    };

    let mock = MockDirections::from_dir(&fixtures)?;
    println!(
        "Loaded fixtures for {} modes from {fixtures}",
        mock.configured_modes().len()
    );

    let directions = CachedDirections::new(mock, &CacheConfig::default());
    let services = Services::new(directions, StaticGeocoder::new(), StaticLocation::at(start));

    let (driver, view_rx) = SessionDriver::new(SessionConfig::default(), services);

    let events = [
        SessionEvent::UseDeviceLocation,
        SessionEvent::ResolvePick(PickSlot::End, end),
        SessionEvent::SetMode(mode),
        SessionEvent::OpenOptions,
        SessionEvent::ShowAlternatives,
    ];
    let (tx, rx) = mpsc::channel(events.len());
    for event in events {
        tx.send(event).await?;
    }
    drop(tx);

    let mut session = driver.run(rx).await;

    if let Some(e) = &session.state().last_error {
        println!("Route fetch failed: {e}");
    }

    if let Some(panel) = session.options_panel() {
        if let Some(e) = panel.error() {
            println!("Options: {e}");
        }
        println!("Options:");
        for route in panel.options() {
            println!("  {:<8} {}", route.mode().label(), route.summary());
        }
    }

    let chosen = session.visible_options().first().map(|&route| route.clone());
    session.select_route(chosen);

    match &session.state().displayed_route {
        Some(route) => println!("{} route: {}", route.mode().label(), route.summary()),
        None => println!("No route displayed"),
    }

    let view = session.view();
    let (lat_span, lon_span) = view.camera.span();
    println!(
        "Camera centered on {} spanning {lat_span:.3}° x {lon_span:.3}°",
        view.camera.center()
    );
    for pin in view.pins.iter() {
        println!("  {} pin at {}", pin.title(), pin.coordinate);
    }
    println!(
        "Published view overlay has {} points",
        view_rx
            .borrow()
            .overlay
            .as_ref()
            .map_or(0, |path| path.0.len())
    );

    let alternatives = session.alternatives();
    if alternatives.is_empty() {
        println!("No {} alternatives", mode.label());
    } else {
        println!("{} alternatives:", mode.label());
        for (i, route) in alternatives.iter().enumerate() {
            println!("  {}. {}", i + 1, route.summary());
        }
    }

    Ok(())
}
