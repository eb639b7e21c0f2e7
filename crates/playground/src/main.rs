use std::time::Duration;

use model::{coordinate::Coordinate, fix::VehicleFix, stop::Stop};
use osrm::OsrmClient;
use tomtom::MockTrafficClient;
use tracking::monitor::TripMonitor;
use utility::{geo, id::Id};

fn stop(
    id: &str,
    name: &str,
    sequence: i32,
    latitude: f64,
    longitude: f64,
) -> Stop {
    Stop {
        id: Id::new(id.to_owned()),
        name: Some(name.to_owned()),
        sequence,
        location: Coordinate::new(latitude, longitude),
        arrival_time: None,
        eta_seconds: None,
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let router = OsrmClient::from_env();
    let monitor = TripMonitor::new(OsrmClient::from_env(), MockTrafficClient);

    let stops = vec![
        stop("kiel-depot", "Kiel Depot", 0, 54.3233, 10.1228),
        stop("schwentinental", "Schwentinental", 1, 54.2770, 10.2103),
        stop("ploen", "Plön", 2, 54.1622, 10.4214),
        stop("luebeck-hub", "Lübeck Hub", 3, 53.8655, 10.6866),
    ];
    let signature = monitor.set_stops(stops).await;
    println!("tracking route {:?}", signature);

    let polyline = monitor.route_polyline().await;
    if polyline.is_empty() {
        eprintln!("no route geometry, is the OSRM endpoint reachable?");
        return;
    }
    println!("route polyline has {} points", polyline.len());

    for segment in monitor.traffic().await {
        println!(
            "traffic {:?} ({} km/h of {} km/h) near ({:.4}, {:.4})",
            segment.traffic_level,
            segment.current_speed_kph.round(),
            segment.freeflow_speed_kph.round(),
            segment.start.latitude,
            segment.start.longitude,
        );
    }

    // walk the vehicle along the route with a bit of gps noise, snapping
    // each raw sample to the road first like the position ingest does
    let steps = 20;
    let mut previous: Option<Coordinate> = None;
    for step in 0..=steps {
        let index = (polyline.len() - 1) * step / steps;
        let point = polyline[index];
        let raw =
            Coordinate::new(point.latitude + 0.0004, point.longitude - 0.0003);
        let snapped = router.snap_to_road(raw).await;
        let heading = previous.map(|from| {
            geo::bearing_deg(
                from.latitude,
                from.longitude,
                snapped.latitude,
                snapped.longitude,
            )
        });
        previous = Some(snapped);

        let fix = VehicleFix::new(snapped.latitude, snapped.longitude);
        if let Some(progress) = monitor.update_position(fix).await {
            println!(
                "step {:>2}: segment {:>4}, {:6.1} km done, {:6.1} km to go ({}%), heading {}",
                step,
                progress.segment_index,
                progress.distance_along_km,
                progress.remaining_km,
                progress.remaining_percent.unwrap_or(0),
                heading
                    .map(|heading| format!("{:.0}°", heading))
                    .unwrap_or_else(|| "-".to_owned()),
            );
        }

        tokio::time::sleep(Duration::from_millis(250)).await;
    }
}
