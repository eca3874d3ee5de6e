use async_trait::async_trait;

use crate::flight::{FlightRecord, NewFlight, UnsavedFlight};
use crate::search::FlightFilter;

/// Repository trait for flight data access
#[async_trait]
pub trait FlightStore: Send + Sync {
    async fn find(
        &self,
        filter: &FlightFilter,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>>;

    /// Map payloads into store-bound instances without persisting them.
    async fn create(
        &self,
        flights: Vec<NewFlight>,
    ) -> Result<Vec<UnsavedFlight>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(flights.into_iter().map(UnsavedFlight::from).collect())
    }

    async fn save(
        &self,
        flights: Vec<UnsavedFlight>,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>>;
}
