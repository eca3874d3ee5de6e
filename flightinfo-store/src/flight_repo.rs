use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::error::Error;
use uuid::Uuid;

use flightinfo_core::search::{Condition, FlightFilter};
use flightinfo_core::{FlightRecord, FlightStore, UnsavedFlight};

const SELECT_FLIGHTS: &str = "SELECT id, flight_number, airline, origin, destination, \
     depart_time, arrive_time, seats_available, created_at FROM flights";

const INSERT_FLIGHT: &str = r#"
    INSERT INTO flights (id, flight_number, airline, origin, destination, depart_time, arrive_time, seats_available)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
    RETURNING id, flight_number, airline, origin, destination, depart_time, arrive_time, seats_available, created_at
"#;

pub struct PgFlightStore {
    pool: PgPool,
}

impl PgFlightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct FlightRow {
    id: Uuid,
    flight_number: String,
    airline: String,
    origin: String,
    destination: String,
    depart_time: DateTime<Utc>,
    arrive_time: Option<DateTime<Utc>>,
    seats_available: i32,
    created_at: DateTime<Utc>,
}

impl From<FlightRow> for FlightRecord {
    fn from(row: FlightRow) -> Self {
        Self {
            id: row.id,
            flight_number: row.flight_number,
            airline: row.airline,
            origin: row.origin,
            destination: row.destination,
            depart_time: row.depart_time,
            arrive_time: row.arrive_time,
            seats_available: row.seats_available,
            created_at: row.created_at,
        }
    }
}

/// Render `filter` as a parameterized SELECT.
fn select_query(filter: &FlightFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(SELECT_FLIGHTS);

    for (i, condition) in filter.conditions().iter().enumerate() {
        query.push(if i == 0 { " WHERE " } else { " AND " });
        match condition {
            Condition::Equals(field, value) => {
                query.push(field.column()).push(" = ").push_bind(value.clone());
            }
            Condition::Between(field, start, end) => {
                query
                    .push(field.column())
                    .push(" BETWEEN ")
                    .push_bind(*start)
                    .push(" AND ")
                    .push_bind(*end);
            }
        }
    }

    query
}

#[async_trait]
impl FlightStore for PgFlightStore {
    async fn find(
        &self,
        filter: &FlightFilter,
    ) -> Result<Vec<FlightRecord>, Box<dyn Error + Send + Sync>> {
        let rows = select_query(filter)
            .build_query_as::<FlightRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(FlightRecord::from).collect())
    }

    async fn save(
        &self,
        flights: Vec<UnsavedFlight>,
    ) -> Result<Vec<FlightRecord>, Box<dyn Error + Send + Sync>> {
        if flights.is_empty() {
            return Ok(Vec::new());
        }

        // One transaction per batch: any failing row rolls back the rest.
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(flights.len());

        for flight in flights {
            let row = sqlx::query_as::<_, FlightRow>(INSERT_FLIGHT)
                .bind(flight.id)
                .bind(flight.flight_number)
                .bind(flight.airline)
                .bind(flight.origin)
                .bind(flight.destination)
                .bind(flight.depart_time)
                .bind(flight.arrive_time)
                .bind(flight.seats_available)
                .fetch_one(&mut *tx)
                .await?;
            saved.push(FlightRecord::from(row));
        }

        tx.commit().await?;
        tracing::debug!("Committed {} flight row(s)", saved.len());
        Ok(saved)
    }
}
