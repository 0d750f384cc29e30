//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;

use super::AppState;
use super::types::{ErrorResponse, PriceQuery, PriceResponse, WindowQuery};
use crate::error::PriceError;
use crate::report::PriceReport;
use crate::series::{HOURS_PER_DAY, PriceSeries};
use crate::stats::{CheapestWindow, cheapest_window, price_at};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

fn status_for(err: &PriceError) -> StatusCode {
    match err {
        PriceError::HourNotFound { .. }
        | PriceError::NoDataInWindow(_)
        | PriceError::EmptySeries => StatusCode::NOT_FOUND,
        PriceError::InvalidDuration(_) | PriceError::InsufficientWindowCoverage { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        PriceError::MalformedSeries(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Returns the hourly prices being served.
///
/// `GET /series` → 200 + `PriceSeries` JSON
pub async fn get_series(State(state): State<Arc<AppState>>) -> Json<PriceSeries> {
    Json(state.series.clone())
}

/// Returns the precomputed price report.
///
/// `GET /report` → 200 + `PriceReport` JSON
pub async fn get_report(State(state): State<Arc<AppState>>) -> Json<PriceReport> {
    Json(state.report.clone())
}

/// Returns the price of one hour.
///
/// `GET /price?hour=H&day=today|tomorrow` → 200 + `PriceResponse` JSON
/// `GET /price?hour=24` → 400 + `ErrorResponse`
/// `GET /price?hour=3&day=tomorrow` before publication → 404
pub async fn get_price(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceResponse>, ApiError> {
    let Query(query) = query.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    if usize::from(query.hour) >= HOURS_PER_DAY {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("`hour` must be in 0..=23, got {}", query.hour),
        ));
    }

    let price =
        price_at(&state.series, query.hour, query.day).map_err(|e| api_error(status_for(&e), e))?;

    Ok(Json(PriceResponse {
        day: query.day,
        hour: query.hour,
        price,
    }))
}

/// Finds the cheapest window of an ad-hoc duration.
///
/// `GET /window?duration=D&period=day|night` → 200 + `CheapestWindow` JSON
/// `GET /window?duration=0` → 422 + `ErrorResponse`
pub async fn get_window(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WindowQuery>, QueryRejection>,
) -> Result<Json<CheapestWindow>, ApiError> {
    let Query(query) = query.map_err(|e| api_error(StatusCode::BAD_REQUEST, e.body_text()))?;

    cheapest_window(&state.series, query.period, query.duration, state.granularity)
        .map(Json)
        .map_err(|e| api_error(status_for(&e), e))
}
