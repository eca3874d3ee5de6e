use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted flight as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    pub id: Uuid,
    pub flight_number: String,
    pub airline: String,
    #[serde(rename = "from")]
    pub origin: String,
    pub destination: String,
    pub depart_time: DateTime<Utc>,
    pub arrive_time: Option<DateTime<Utc>>,
    pub seats_available: i32,
    pub created_at: DateTime<Utc>,
}

/// Inbound payload for adding a flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFlight {
    pub flight_number: String,
    pub airline: String,
    #[serde(rename = "from")]
    pub origin: String,
    pub destination: String,
    pub depart_time: DateTime<Utc>,
    #[serde(default)]
    pub arrive_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub seats_available: Option<i32>,
}

/// A flight mapped for persistence but not yet saved.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsavedFlight {
    pub id: Uuid,
    pub flight_number: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub depart_time: DateTime<Utc>,
    pub arrive_time: Option<DateTime<Utc>>,
    pub seats_available: i32,
}

impl From<NewFlight> for UnsavedFlight {
    fn from(flight: NewFlight) -> Self {
        Self {
            id: Uuid::new_v4(),
            flight_number: flight.flight_number,
            airline: flight.airline,
            origin: flight.origin,
            destination: flight.destination,
            depart_time: flight.depart_time,
            arrive_time: flight.arrive_time,
            seats_available: flight.seats_available.unwrap_or_default(),
        }
    }
}

impl UnsavedFlight {
    /// Attach the store-assigned creation time.
    pub fn into_record(self, created_at: DateTime<Utc>) -> FlightRecord {
        FlightRecord {
            id: self.id,
            flight_number: self.flight_number,
            airline: self.airline,
            origin: self.origin,
            destination: self.destination,
            depart_time: self.depart_time,
            arrive_time: self.arrive_time,
            seats_available: self.seats_available,
            created_at,
        }
    }
}
