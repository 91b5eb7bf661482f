use crate::{CallFailure, Pacer, Sweep, SweepError, SweepErrorExt, SweepPlan, TokioPacer};
use fxhash::FxHashSet;
use ogmap_kernel::domain::config::ApiConfig;
use ogmap_kernel::domain::constants::DEFAULT_PAUSE_MS;
use ogmap_kernel::domain::facility::Facility;
use ogmap_kernel::safe_nanoid;
use ogmap_places::{CredentialProvider, GooglePlaces, PlaceDetail, PlaceSearch, StaticCredential};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

/// Sweeps the category x location grid against the places collaborators.
///
/// Cloning is cheap and clones share the sweep gate, so at most one sweep per
/// aggregator runs at a time.
#[derive(Clone)]
pub struct Aggregator {
    search: Arc<dyn PlaceSearch>,
    detail: Arc<dyn PlaceDetail>,
    credentials: Arc<dyn CredentialProvider>,
    pacer: Arc<dyn Pacer>,
    plan: Arc<SweepPlan>,
    pause: Duration,
    gate: Arc<Mutex<()>>,
}

impl Aggregator {
    #[must_use]
    pub fn builder() -> AggregatorBuilder {
        AggregatorBuilder::default()
    }

    /// Wires the Google Places client, the configured credential and the `[sweep]` plan.
    ///
    /// # Errors
    /// Returns [`SweepError::Places`] if the client cannot be built and
    /// [`SweepError::InvalidPlan`] for an empty vocabulary.
    pub fn from_config(config: &ApiConfig) -> Result<Self, SweepError> {
        let places = GooglePlaces::from_config(&config.places).context("Creating places client")?;

        Self::builder()
            .places(Arc::new(places))
            .credentials(Arc::new(StaticCredential::from_config(&config.places)))
            .plan(SweepPlan::from_config(&config.sweep)?)
            .pause(Duration::from_millis(config.sweep.pause_ms))
            .build()
    }

    #[must_use]
    pub fn plan(&self) -> &SweepPlan {
        &self.plan
    }

    #[must_use]
    pub const fn pause_between(&self) -> Duration {
        self.pause
    }

    /// Current credential, if any. Read on every call so a provider can rotate keys.
    #[must_use]
    pub fn credentials(&self) -> &dyn CredentialProvider {
        self.credentials.as_ref()
    }

    /// Runs one full sweep.
    ///
    /// # Errors
    /// [`SweepError::Configuration`] when no credential is available, before any call.
    pub async fn aggregate(&self) -> Result<Sweep, SweepError> {
        self.run(None).await
    }

    /// Runs one sweep that stops early once `shutdown` turns `true`.
    ///
    /// # Errors
    /// As [`Aggregator::aggregate`], plus [`SweepError::Cancelled`].
    pub async fn aggregate_until(
        &self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Sweep, SweepError> {
        self.run(Some(shutdown)).await
    }

    /// Runs the sweep on its own task. A panic inside the sweep surfaces as
    /// [`SweepError::Aggregation`] instead of unwinding into the caller.
    ///
    /// # Errors
    /// As [`Aggregator::aggregate_until`], plus [`SweepError::Aggregation`].
    pub async fn aggregate_detached(
        &self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Sweep, SweepError> {
        let aggregator = self.clone();
        tokio::spawn(async move { aggregator.aggregate_until(shutdown).await }).await.unwrap_or_else(
            |err| {
                error!(error = %err, "Sweep task aborted");
                Err(SweepError::Aggregation {
                    message: err.to_string().into(),
                    context: Some("Sweep task".into()),
                })
            },
        )
    }

    async fn run(&self, mut shutdown: Option<watch::Receiver<bool>>) -> Result<Sweep, SweepError> {
        let Some(key) = self.credentials.api_key() else {
            error!("Places API key is not configured; sweep refused");
            return Err(SweepError::missing_credential());
        };

        let _running = self.gate.lock().await;

        let run_id = safe_nanoid!();
        let total = self.plan.len();
        let started = Instant::now();
        info!(%run_id, combinations = total, pause = ?self.pause, "Sweep started");

        let mut resolved = Vec::new();
        let mut failures = Vec::new();
        let mut candidates = 0;

        for (index, combination) in self.plan.combinations().enumerate() {
            if index > 0 && self.wait_between(&mut shutdown).await {
                warn!(%run_id, completed = index, "Sweep cancelled during pause");
                return Err(SweepError::cancelled(index, total));
            }
            if shutdown.as_ref().is_some_and(|rx| *rx.borrow()) {
                warn!(%run_id, completed = index, "Sweep cancelled");
                return Err(SweepError::cancelled(index, total));
            }

            let query = combination.query();
            debug!(%run_id, %combination, "Searching");

            let found = match self.search.search(&key, &query).await {
                Ok(found) => found,
                Err(err) => {
                    warn!(%run_id, %combination, error = %err, "Search failed; combination skipped");
                    failures.push(CallFailure::search(&combination, &err));
                    Vec::new()
                }
            };

            let hits = found.len();
            let before = resolved.len();
            candidates += hits;

            for candidate in found {
                match self.detail.details(&key, &candidate.id).await {
                    Ok(Some(details)) => {
                        resolved.push(Facility::resolve(candidate, details, &combination));
                    }
                    Ok(None) => {
                        debug!(%run_id, place_id = %candidate.id, "No details; candidate dropped");
                    }
                    Err(err) => {
                        warn!(
                            %run_id,
                            %combination,
                            place_id = %candidate.id,
                            error = %err,
                            "Detail lookup failed; candidate dropped"
                        );
                        failures.push(CallFailure::detail(&combination, &candidate.id, &err));
                    }
                }
            }

            info!(
                %run_id,
                %combination,
                candidates = hits,
                facilities = resolved.len() - before,
                "Combination done"
            );
        }

        let collected = resolved.len();
        let facilities = dedup_first(resolved);
        let duplicates = collected - facilities.len();

        info!(
            %run_id,
            count = facilities.len(),
            duplicates,
            failures = failures.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Sweep finished"
        );

        Ok(Sweep { run_id, facilities, combinations: total, candidates, duplicates, failures })
    }

    /// Waits out the inter-combination pause. Returns `true` if shutdown won the race.
    async fn wait_between(&self, shutdown: &mut Option<watch::Receiver<bool>>) -> bool {
        let Some(rx) = shutdown.as_mut() else {
            self.pacer.pause(self.pause).await;
            return false;
        };

        let sender_gone = tokio::select! {
            () = self.pacer.pause(self.pause) => return false,
            changed = rx.wait_for(|stop| *stop) => changed.is_err(),
        };

        if sender_gone {
            // Nobody can request shutdown anymore; finish the pause and stop watching.
            *shutdown = None;
            self.pacer.pause(self.pause).await;
            return false;
        }
        true
    }
}

impl fmt::Debug for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Aggregator")
            .field("plan", &self.plan)
            .field("pause", &self.pause)
            .field("credentials", &self.credentials)
            .field("pacer", &self.pacer)
            .finish_non_exhaustive()
    }
}

/// Keeps the first facility per id, preserving order.
fn dedup_first(mut facilities: Vec<Facility>) -> Vec<Facility> {
    let mut seen = FxHashSet::default();
    facilities.retain(|facility| seen.insert(facility.id.clone()));
    facilities
}

pub struct AggregatorBuilder {
    search: Option<Arc<dyn PlaceSearch>>,
    detail: Option<Arc<dyn PlaceDetail>>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    pacer: Arc<dyn Pacer>,
    plan: Option<SweepPlan>,
    pause: Duration,
}

impl Default for AggregatorBuilder {
    fn default() -> Self {
        Self {
            search: None,
            detail: None,
            credentials: None,
            pacer: Arc::new(TokioPacer),
            plan: None,
            pause: Duration::from_millis(DEFAULT_PAUSE_MS),
        }
    }
}

impl fmt::Debug for AggregatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorBuilder")
            .field("search", &self.search.is_some())
            .field("detail", &self.detail.is_some())
            .field("plan", &self.plan)
            .field("pause", &self.pause)
            .finish_non_exhaustive()
    }
}

impl AggregatorBuilder {
    /// Uses one collaborator for both searches and detail lookups.
    #[must_use]
    pub fn places<P>(self, places: Arc<P>) -> Self
    where
        P: PlaceSearch + PlaceDetail + 'static,
    {
        self.search(places.clone()).detail(places)
    }

    #[must_use]
    pub fn search(mut self, search: Arc<dyn PlaceSearch>) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn detail(mut self, detail: Arc<dyn PlaceDetail>) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    #[must_use]
    pub fn pacer(mut self, pacer: Arc<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn plan(mut self, plan: SweepPlan) -> Self {
        self.plan = Some(plan);
        self
    }

    #[must_use]
    pub const fn pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Missing credentials default to "not configured"; a missing plan defaults to the
    /// built-in category and location lists.
    ///
    /// # Errors
    /// Returns [`SweepError::Configuration`] if a collaborator was not provided.
    pub fn build(self) -> Result<Aggregator, SweepError> {
        let (Some(search), Some(detail)) = (self.search, self.detail) else {
            return Err(SweepError::Configuration {
                message: "place search and detail collaborators are required".into(),
                context: Some("Building aggregator".into()),
            });
        };

        let plan = match self.plan {
            Some(plan) => plan,
            None => SweepPlan::from_config(&ogmap_kernel::domain::config::SweepConfig::default())?,
        };

        if self.pause < Duration::from_millis(DEFAULT_PAUSE_MS) {
            warn!(pause = ?self.pause, "Pause between combinations is below one second");
        }

        Ok(Aggregator {
            search,
            detail,
            credentials: self.credentials.unwrap_or_else(|| Arc::new(StaticCredential::default())),
            pacer: self.pacer,
            plan: Arc::new(plan),
            pause: self.pause,
            gate: Arc::new(Mutex::new(())),
        })
    }
}
