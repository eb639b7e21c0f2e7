use std::sync::Arc;

use osrm::OsrmClient;
use tomtom::TomTomClient;
use tracking::monitor::TripMonitor;
use web::{start_web_server, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let monitor =
        TripMonitor::new(OsrmClient::from_env(), TomTomClient::from_env());

    let web_future = start_web_server(WebState {
        monitor: Arc::new(monitor),
    });

    let _ = web_future.await;
}
