//! Facade crate for `OGMap` features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `ogmap` with the `server` feature for the HTTP surface.
//! - Call [`init`] to build every feature slice from configuration.

pub use ogmap_domain as domain;
use ogmap_domain::config::ApiConfig;
use ogmap_domain::registry::InitializedSlice;
pub use ogmap_kernel as kernel;
pub use ogmap_places as places;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use ogmap_kernel::server::router::system_router;
        pub use ogmap_survey::survey_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use ogmap_survey as survey;

    /// Build-time enabled features (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        "survey",
        #[cfg(feature = "server")]
        "server",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all feature slices.
///
/// # Errors
/// Returns an error if any feature initialization fails.
pub fn init(config: &ApiConfig) -> Result<Vec<InitializedSlice>, Box<dyn std::error::Error>> {
    let slices = vec![features::survey::init(config)?];

    Ok(slices)
}
