use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use flightinfo_core::{FlightRecord, NewFlight};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchQuery {
    pub from: Option<String>,
    pub destination: Option<String>,
    pub depart_time: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/flight-info", get(find_flights).post(add_flights))
}

/// GET /flight-info?from=&destination=&departTime=
pub async fn find_flights(
    State(state): State<AppState>,
    Query(query): Query<FlightSearchQuery>,
) -> Result<Json<Vec<FlightRecord>>, AppError> {
    let from = required("from", query.from.as_deref())?;
    let destination = required("destination", query.destination.as_deref())?;

    let flights = state
        .flight_info
        .find_by_location(from, destination, query.depart_time.as_deref())
        .await?;

    Ok(Json(flights))
}

/// POST /flight-info
pub async fn add_flights(
    State(state): State<AppState>,
    Json(flights): Json<Vec<NewFlight>>,
) -> Result<(StatusCode, Json<Vec<FlightRecord>>), AppError> {
    let saved = state.flight_info.add_flight_info(flights).await?;
    Ok((StatusCode::CREATED, Json(saved)))
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str, AppError> {
    let value = value.ok_or_else(|| AppError::ValidationError(format!("{} is required", name)))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} must not be empty", name)));
    }
    Ok(trimmed)
}
