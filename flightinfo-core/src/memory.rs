use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::flight::{FlightRecord, UnsavedFlight};
use crate::repository::FlightStore;
use crate::search::FlightFilter;

/// Keeps flights in insertion order. Used when no database is configured.
#[derive(Default)]
pub struct InMemoryFlightStore {
    flights: RwLock<Vec<FlightRecord>>,
}

impl InMemoryFlightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.flights.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.flights.read().await.is_empty()
    }
}

fn check_required(flight: &UnsavedFlight) -> Result<(), String> {
    let required = [
        ("flight_number", &flight.flight_number),
        ("origin", &flight.origin),
        ("destination", &flight.destination),
    ];
    match required.iter().find(|(_, value)| value.is_empty()) {
        Some((column, _)) => Err(format!("null value in column \"{}\" violates not-null constraint", column)),
        None => Ok(()),
    }
}

#[async_trait]
impl FlightStore for InMemoryFlightStore {
    async fn find(
        &self,
        filter: &FlightFilter,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let flights = self.flights.read().await;
        Ok(flights.iter().filter(|f| filter.matches(f)).cloned().collect())
    }

    async fn save(
        &self,
        flights: Vec<UnsavedFlight>,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>> {
        // Validate the whole batch first so a bad row leaves nothing behind.
        for flight in &flights {
            check_required(flight)?;
        }

        let mut stored = self.flights.write().await;
        if let Some(dup) = flights.iter().find(|f| stored.iter().any(|s| s.id == f.id)) {
            return Err(format!("duplicate key value violates unique constraint \"flights_pkey\": {}", dup.id).into());
        }

        let created_at = Utc::now();
        let saved: Vec<FlightRecord> = flights
            .into_iter()
            .map(|f| f.into_record(created_at))
            .collect();
        stored.extend(saved.iter().cloned());
        Ok(saved)
    }
}
