//! Fixed vocabularies and tags shared across crates.

/// Infrastructure categories swept by default, in sweep order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "gas processing plant",
    "crude oil refinery",
    "flow station",
    "pipeline",
    "liquefaction plant",
    "CNG mother station",
];

/// Search regions swept by default, in sweep order.
pub const DEFAULT_LOCATIONS: &[&str] = &[
    "Lagos, Nigeria",
    "Port Harcourt, Nigeria",
    "Warri, Nigeria",
    "Kaduna, Nigeria",
    "Calabar, Nigeria",
    "Bonny, Nigeria",
    "Escravos, Nigeria",
    "Forcados, Nigeria",
    "Brass, Nigeria",
    "Qua Iboe, Nigeria",
];

/// Pause between two combinations of a sweep, in milliseconds.
pub const DEFAULT_PAUSE_MS: u64 = 1_000;

/// Timeout applied to every single Places API call, in seconds.
pub const DEFAULT_PLACES_TIMEOUT_SECS: u64 = 15;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Place type filter sent with every text search.
pub const DEFAULT_PLACE_TYPE: &str = "establishment";

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const INFRASTRUCTURE_TAG: &str = "Infrastructure";
