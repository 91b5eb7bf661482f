#![allow(dead_code, unreachable_pub)]

use async_trait::async_trait;
use ogmap_kernel::domain::facility::{Candidate, Coordinates, PlaceDetails};
use ogmap_places::{ApiKey, PlaceDetail, PlaceSearch, PlacesError, StaticCredential};
use ogmap_survey::{Aggregator, Pacer, SweepPlan};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

pub fn api_error(status: &str) -> PlacesError {
    PlacesError::Api { status: status.to_owned(), message: "scripted".into(), context: None }
}

pub fn details(name: &str) -> PlaceDetails {
    PlaceDetails {
        name: Some(name.to_owned()),
        address: Some(format!("{name} address")),
        coordinates: Coordinates::new(4.8, 7.0),
        types: Some(vec!["establishment".to_owned()]),
        website: None,
        phone: None,
    }
}

/// Places fake answering from per-query and per-id scripts. Unknown queries return no
/// candidates, unknown ids return `details(id)`.
#[derive(Default)]
pub struct ScriptedPlaces {
    searches: HashMap<String, Result<Vec<&'static str>, &'static str>>,
    details: HashMap<String, Result<Option<PlaceDetails>, &'static str>>,
    pub queries: Mutex<Vec<String>>,
    pub lookups: Mutex<Vec<String>>,
    pub keys: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    panic_on: Option<String>,
    on_search: Option<(String, watch::Sender<bool>)>,
}

impl ScriptedPlaces {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hits(mut self, query: &str, ids: &[&'static str]) -> Self {
        self.searches.insert(query.to_owned(), Ok(ids.to_vec()));
        self
    }

    pub fn failing_search(mut self, query: &str, status: &'static str) -> Self {
        self.searches.insert(query.to_owned(), Err(status));
        self
    }

    pub fn missing(mut self, id: &str) -> Self {
        self.details.insert(id.to_owned(), Ok(None));
        self
    }

    pub fn failing_detail(mut self, id: &str, status: &'static str) -> Self {
        self.details.insert(id.to_owned(), Err(status));
        self
    }

    pub fn panicking_on(mut self, query: &str) -> Self {
        self.panic_on = Some(query.to_owned());
        self
    }

    /// Requests shutdown while `query` is being searched.
    pub fn shutdown_during(mut self, query: &str, sender: watch::Sender<bool>) -> Self {
        self.on_search = Some((query.to_owned(), sender));
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("lock").clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lock").clone()
    }
}

#[async_trait]
impl PlaceSearch for ScriptedPlaces {
    async fn search(&self, key: &ApiKey, query: &str) -> Result<Vec<Candidate>, PlacesError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.queries.lock().expect("lock").push(query.to_owned());
        self.keys.lock().expect("lock").push(key.expose().to_owned());

        tokio::task::yield_now().await;

        if self.panic_on.as_deref() == Some(query) {
            panic!("scripted panic for {query}");
        }
        if let Some((trigger, sender)) = &self.on_search {
            if trigger == query {
                sender.send_replace(true);
            }
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.searches.get(query) {
            Some(Ok(ids)) => Ok(ids
                .iter()
                .map(|id| Candidate {
                    id: (*id).to_owned(),
                    name: Some(format!("{id} summary")),
                    address: None,
                })
                .collect()),
            Some(Err(status)) => Err(api_error(status)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl PlaceDetail for ScriptedPlaces {
    async fn details(&self, _key: &ApiKey, id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        self.lookups.lock().expect("lock").push(id.to_owned());
        match self.details.get(id) {
            Some(Ok(found)) => Ok(found.clone()),
            Some(Err(status)) => Err(api_error(status)),
            None => Ok(Some(details(id))),
        }
    }
}

/// Pacer that returns immediately and remembers every requested delay.
#[derive(Debug, Default)]
pub struct RecordingPacer {
    pub delays: Mutex<Vec<Duration>>,
}

impl RecordingPacer {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pause(&self, delay: Duration) {
        self.delays.lock().expect("lock").push(delay);
    }
}

/// Pacer that never finishes; only shutdown can end the wait.
#[derive(Debug, Default)]
pub struct StalledPacer;

#[async_trait]
impl Pacer for StalledPacer {
    async fn pause(&self, _delay: Duration) {
        std::future::pending::<()>().await;
    }
}

pub const CATEGORIES: &[&str] = &["gas processing plant", "flow station", "pipeline"];
pub const LOCATIONS: &[&str] = &["Lagos, Nigeria", "Warri, Nigeria", "Bonny, Nigeria"];

pub fn plan() -> SweepPlan {
    SweepPlan::new(CATEGORIES.iter().copied(), LOCATIONS.iter().copied()).expect("valid plan")
}

pub fn aggregator(
    places: &Arc<ScriptedPlaces>,
    pacer: Arc<dyn Pacer>,
    key: Option<&str>,
) -> Aggregator {
    Aggregator::builder()
        .places(places.clone())
        .credentials(Arc::new(StaticCredential::new(key)))
        .pacer(pacer)
        .plan(plan())
        .pause(Duration::from_secs(1))
        .build()
        .expect("aggregator")
}
