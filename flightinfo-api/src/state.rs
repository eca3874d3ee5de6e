use std::sync::Arc;
use flightinfo_core::FlightInfoService;

#[derive(Clone)]
pub struct AppState {
    pub flight_info: Arc<FlightInfoService>,
}

impl AppState {
    pub fn new(flight_info: FlightInfoService) -> Self {
        Self {
            flight_info: Arc::new(flight_info),
        }
    }
}
