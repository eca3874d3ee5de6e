use chrono::{FixedOffset, Offset, Utc};
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, warn, Instrument, Span};

use crate::flight::{FlightRecord, NewFlight};
use crate::repository::FlightStore;
use crate::search::{DayWindow, FlightFilter};
use crate::{FlightInfoError, FlightInfoResult};

type StoreError = Box<dyn Error + Send + Sync>;

/// Searches and bulk-inserts flights on top of a [`FlightStore`].
pub struct FlightInfoService {
    store: Arc<dyn FlightStore>,
    local_offset: FixedOffset,
    span: Span,
}

impl FlightInfoService {
    pub fn new(store: Arc<dyn FlightStore>) -> Self {
        Self {
            store,
            local_offset: Utc.fix(),
            span: tracing::info_span!("flight_info_service"),
        }
    }

    /// Offset used for departure dates that carry no offset of their own.
    pub fn with_local_offset(mut self, offset: FixedOffset) -> Self {
        self.local_offset = offset;
        self
    }

    /// Span every operation of this service is recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn local_offset(&self) -> FixedOffset {
        self.local_offset
    }

    pub async fn find_by_location(
        &self,
        from: &str,
        destination: &str,
        depart_time: Option<&str>,
    ) -> FlightInfoResult<Vec<FlightRecord>> {
        async move {
            debug!(
                "Request received to search flights | from={}, destination={}, departTime={:?}",
                from, destination, depart_time
            );

            // A blank date means "any day".
            let depart_time = depart_time.filter(|raw| !raw.trim().is_empty());

            match self.lookup(from, destination, depart_time).await {
                Ok((flights, window)) => {
                    log_search_outcome(from, destination, window.as_ref(), flights.len());
                    Ok(flights)
                }
                Err(e) => {
                    error!(
                        error.details = ?e,
                        "Failed to fetch flights | from={}, destination={}, error={}",
                        from,
                        destination,
                        error_chain(&*e)
                    );
                    Err(FlightInfoError::SearchUnavailable)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn lookup(
        &self,
        from: &str,
        destination: &str,
        depart_time: Option<&str>,
    ) -> Result<(Vec<FlightRecord>, Option<DayWindow>), StoreError> {
        let mut filter = FlightFilter::by_location(from, destination);

        let window = match depart_time {
            Some(raw) => {
                let window = DayWindow::containing(raw, self.local_offset)?;
                debug!("Searching date is {}", window);
                filter = filter.departing_within(&window);
                Some(window)
            }
            None => None,
        };

        let flights = self.store.find(&filter).await?;
        Ok((flights, window))
    }

    pub async fn add_flight_info(&self, flights: Vec<NewFlight>) -> FlightInfoResult<Vec<FlightRecord>> {
        async move {
            info!("Received request to add {} flight(s) to the database", flights.len());
            debug!("Flight payload: {:?}", flights);

            match self.persist(flights).await {
                Ok(saved) => {
                    info!("Successfully added {} flight(s) to the database", saved.len());
                    Ok(saved)
                }
                Err(e) => {
                    error!(
                        error.details = ?e,
                        "Failed to add flight(s) to the database | error={}",
                        error_chain(&*e)
                    );
                    Err(FlightInfoError::AddUnavailable)
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn persist(&self, flights: Vec<NewFlight>) -> Result<Vec<FlightRecord>, StoreError> {
        let drafts = self.store.create(flights).await?;
        debug!("Mapped {} payload(s) to store records", drafts.len());
        self.store.save(drafts).await
    }
}

fn log_search_outcome(from: &str, destination: &str, window: Option<&DayWindow>, count: usize) {
    match (count, window) {
        (0, Some(window)) => warn!(
            "No flights found from={} to={} on {}",
            from,
            destination,
            window.day_label()
        ),
        (0, None) => warn!("No flights found from={} to={}", from, destination),
        (n, Some(window)) => info!(
            "Successfully found {} flight(s) from={} to={} on {}",
            n,
            from,
            destination,
            window.day_label()
        ),
        (n, None) => info!(
            "Successfully found {} flight(s) from={} to={}",
            n, from, destination
        ),
    }
}

/// Message of `e` followed by each of its sources.
fn error_chain(e: &(dyn Error + 'static)) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
