//! Common imports for feature slices.

pub use crate::config::{ConfigError, ConfigErrorExt, load_config};
pub use crate::domain::config::ApiConfig;
pub use crate::domain::facility::{
    Candidate, Category, Combination, Coordinates, Facility, Location, PlaceDetails,
};
pub use crate::domain::registry::{FeatureSlice, InitializedSlice};
#[cfg(feature = "server")]
pub use crate::server::{ApiState, ApiStateBuilder, ApiStateError};
pub use crate::safe_nanoid;
