//! # Places
//!
//! The two external collaborators of a survey sweep:
//!
//! * [`PlaceSearch`]: free-text query to candidate place identifiers.
//! * [`PlaceDetail`]: identifier to facility attributes.
//!
//! Both are object-safe async traits so the pipeline can hold them as `Arc<dyn _>` and
//! tests can swap in scripted fakes. [`GooglePlaces`] implements both against the Google
//! Places web service; [`CredentialProvider`] supplies the [`ApiKey`] for each sweep.
//!
//! Every call is independent: a failure is reported as a [`PlacesError`] for that call
//! only, and "nothing found" is an empty list or `None` rather than an error.

mod client;
mod credential;
mod error;

use async_trait::async_trait;
use ogmap_domain::facility::{Candidate, PlaceDetails};

pub use client::{GooglePlaces, GooglePlacesBuilder};
pub use credential::{ApiKey, CredentialProvider, StaticCredential};
pub use error::{PlacesError, PlacesErrorExt};

/// Text search for candidate places.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Runs one query. Results keep the order the service returned them in.
    async fn search(&self, key: &ApiKey, query: &str) -> Result<Vec<Candidate>, PlacesError>;
}

/// Detail lookup for one place identifier.
#[async_trait]
pub trait PlaceDetail: Send + Sync {
    /// `Ok(None)` when the place is unknown to the service.
    async fn details(&self, key: &ApiKey, id: &str) -> Result<Option<PlaceDetails>, PlacesError>;
}
