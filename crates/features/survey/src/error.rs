use ogmap_places::PlacesError;
use std::borrow::Cow;

/// Fatal outcomes of a sweep. Per-call failures are data, see [`crate::CallFailure`].
#[ogmap_derive::ogmap_error]
pub enum SweepError {
    /// The places credential is missing or blank; no call was made.
    #[error("Configuration error{}: {message}", format_context(.context))]
    Configuration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Unexpected failure inside the sweep loop.
    #[error("Aggregation failed{}: {message}", format_context(.context))]
    Aggregation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Shutdown was requested while the sweep was running.
    #[error("Sweep cancelled{}: {message}", format_context(.context))]
    Cancelled { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The sweep plan has no combinations.
    #[error("Invalid sweep plan{}: {message}", format_context(.context))]
    InvalidPlan { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The places client could not be set up.
    #[error("Places setup error{}: {source}", format_context(.context))]
    Places { source: PlacesError, context: Option<Cow<'static, str>> },
}

impl SweepError {
    pub(crate) fn missing_credential() -> Self {
        Self::Configuration { message: "places API key is not configured".into(), context: None }
    }

    pub(crate) fn cancelled(completed: usize, total: usize) -> Self {
        Self::Cancelled {
            message: format!("stopped after {completed} of {total} combinations").into(),
            context: None,
        }
    }
}
