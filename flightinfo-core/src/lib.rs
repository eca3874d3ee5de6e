pub mod flight;
pub mod memory;
pub mod repository;
pub mod search;
pub mod service;

pub use flight::{FlightRecord, NewFlight, UnsavedFlight};
pub use memory::InMemoryFlightStore;
pub use repository::FlightStore;
pub use search::{Condition, DayWindow, FlightFilter, TextField, TimeField};
pub use service::FlightInfoService;

/// Caller-facing failures. The text never carries internal error detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlightInfoError {
    #[error("Failed to fetch flight information. Please try again later.")]
    SearchUnavailable,
    #[error("Failed to add flight information. Please try again later.")]
    AddUnavailable,
}

pub type FlightInfoResult<T> = Result<T, FlightInfoError>;
