#![allow(dead_code)]

use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::{Layer, Registry};

use flightinfo_core::{FlightFilter, FlightRecord, FlightStore, NewFlight, UnsavedFlight};

pub const SECRET_DETAIL: &str = "password authentication failed for user \"flights_rw\"";

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
    pub fields: String,
}

/// Collects every event emitted on the current thread while installed.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = Registry::default().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }

    pub fn at(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

struct EventVisitor<'a> {
    message: &'a mut String,
    fields: &'a mut String,
}

impl Visit for EventVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.fields.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        let mut fields = String::new();
        event.record(&mut EventVisitor {
            message: &mut message,
            fields: &mut fields,
        });
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

/// Store whose every call fails with a backend error.
pub struct FailingStore;

#[async_trait]
impl FlightStore for FailingStore {
    async fn find(
        &self,
        _filter: &FlightFilter,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Err(SECRET_DETAIL.into())
    }

    async fn save(
        &self,
        _flights: Vec<UnsavedFlight>,
    ) -> Result<Vec<FlightRecord>, Box<dyn std::error::Error + Send + Sync>> {
        Err(SECRET_DETAIL.into())
    }
}

pub fn flight(number: &str, origin: &str, destination: &str, depart: &str) -> NewFlight {
    NewFlight {
        flight_number: number.to_string(),
        airline: number[..2].to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        depart_time: depart.parse().expect("valid timestamp"),
        arrive_time: None,
        seats_available: Some(100),
    }
}
