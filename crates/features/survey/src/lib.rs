//! Infrastructure survey slice.
//!
//! One operation: sweep every (category, location) combination against the place search,
//! resolve each hit through the place detail lookup, and return the facilities unique by id
//! in first-seen sweep order. Individual call failures are recorded in the [`Sweep`] and
//! never abort the run; a missing credential aborts before the first call.
mod error;
#[cfg(feature = "server")]
mod handlers;
mod pacer;
mod pipeline;
mod plan;
mod report;

pub use error::{SweepError, SweepErrorExt};
#[cfg(feature = "server")]
pub use handlers::{ConfigResponse, ErrorResponse, InfrastructureResponse, survey_router};
pub use pacer::{Pacer, TokioPacer};
pub use pipeline::{Aggregator, AggregatorBuilder};
pub use plan::SweepPlan;
pub use report::{CallFailure, Stage, Sweep};

use ogmap_kernel::domain::config::ApiConfig;
use ogmap_kernel::domain::registry::InitializedSlice;

/// Survey feature state.
#[ogmap_derive::ogmap_slice]
pub struct Survey {
    pub aggregator: Aggregator,
}

/// Initialize the survey feature from configuration.
///
/// A missing API key is not an init error: the server still starts and every sweep
/// reports the configuration problem.
///
/// # Errors
/// Returns an error if the places client cannot be built or the sweep plan is empty.
pub fn init(config: &ApiConfig) -> Result<InitializedSlice, SweepError> {
    let aggregator = Aggregator::from_config(config)?;

    if aggregator.credentials().api_key().is_none() {
        tracing::warn!("Places API key not configured; sweeps will be refused");
    }
    tracing::info!(combinations = aggregator.plan().len(), "Survey slice initialized");

    Ok(InitializedSlice::new(Survey::new(SurveyInner { aggregator })))
}
