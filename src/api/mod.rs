//! Read-only REST API over one price series.
//!
//! Provides four GET endpoints:
//! - `/series`: the raw hourly prices
//! - `/report`: the aggregate price report
//! - `/price`: one hourly price
//! - `/window`: cheapest window for an ad-hoc duration

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::report::PriceReport;
use crate::series::PriceSeries;
use crate::stats::Granularity;

pub use types::{ErrorResponse, PriceQuery, PriceResponse, WindowQuery};

/// Immutable application state shared across all request handlers.
///
/// Built once from a loaded series and wrapped in `Arc`; handlers only
/// read it, so no locks are needed.
pub struct AppState {
    /// The series being served.
    pub series: PriceSeries,
    /// Report precomputed for the configured durations.
    pub report: PriceReport,
    /// Start-point grid for ad-hoc window searches.
    pub granularity: Granularity,
}

impl AppState {
    /// Builds state for `series`, computing its report up front.
    pub fn new(series: PriceSeries, durations_hours: &[f64], granularity: Granularity) -> Self {
        let report = PriceReport::from_series(&series, durations_hours, granularity);
        Self {
            series,
            report,
            granularity,
        }
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/series", get(handlers::get_series))
        .route("/report", get(handlers::get_report))
        .route("/price", get(handlers::get_price))
        .route("/window", get(handlers::get_window))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an I/O error if the listener cannot bind to `addr` or the
/// server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
