use std::{env, sync::Arc};

use axum::Router;
use osrm::OsrmClient;
use tokio::net::TcpListener;
use tomtom::TomTomClient;
use tower_http::cors::CorsLayer;
use tracking::monitor::TripMonitor;

pub mod api;
pub mod common;

/// Monitor wiring used by the served API: OSRM geometry, TomTom traffic.
pub type LiveMonitor = TripMonitor<OsrmClient, TomTomClient>;

#[derive(Clone)]
pub struct WebState {
    pub monitor: Arc<LiveMonitor>,
}

pub async fn start_web_server(state: WebState) -> std::io::Result<()> {
    let routes = Router::new()
        .nest_service("/api", api::routes(state))
        // the live view is a browser map served from elsewhere
        .layer(CorsLayer::permissive());

    let address =
        env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = TcpListener::bind(&address).await?;
    log::info!("listening on {address}");
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}
