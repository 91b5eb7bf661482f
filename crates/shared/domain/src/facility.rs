//! Survey entities: the sweep vocabulary, search candidates, and resolved facilities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! search_term {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            #[must_use]
            pub fn new(term: impl AsRef<str>) -> Self {
                Self(Arc::from(term.as_ref().trim()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(term: &str) -> Self {
                Self::new(term)
            }
        }

        impl From<String> for $name {
            fn from(term: String) -> Self {
                Self::new(term)
            }
        }
    };
}

search_term!(
    /// An infrastructure classification used as a search term (e.g. "flow station").
    Category
);

search_term!(
    /// A named search region (e.g. "Bonny, Nigeria").
    Location
);

/// One (category, location) pair of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combination {
    pub category: Category,
    pub location: Location,
}

impl Combination {
    #[must_use]
    pub const fn new(category: Category, location: Location) -> Self {
        Self { category, location }
    }

    /// Free-text query sent to the place search: `"<category> <location>"`.
    #[must_use]
    pub fn query(&self) -> String {
        format!("{} {}", self.category, self.location)
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.category, self.location)
    }
}

/// A search hit before detail resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
}

impl Candidate {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, address: None }
    }
}

/// Latitude/longitude pair; either half may be missing upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Coordinates {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat: Some(lat), lng: Some(lng) }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.lat.is_some() && self.lng.is_some()
    }
}

/// Attributes returned by a place detail lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub address: Option<String>,
    pub coordinates: Coordinates,
    pub types: Option<Vec<String>>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

/// A resolved infrastructure facility as served to the presentation layer.
///
/// `category` serializes as `type` and `location` is the search region that produced the
/// facility, which is not necessarily where it actually sits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: String,
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub category: Category,
    pub location: Location,
    pub coordinates: Coordinates,
    pub types: Option<Vec<String>>,
    pub website: Option<String>,
    pub phone: Option<String>,
}

impl Facility {
    /// Builds a facility from a candidate and its details, stamped with the combination
    /// that found it. Candidate summary fields fill gaps left by the details.
    #[must_use]
    pub fn resolve(candidate: Candidate, details: PlaceDetails, combination: &Combination) -> Self {
        Self {
            id: candidate.id,
            name: details.name.or(candidate.name),
            address: details.address.or(candidate.address),
            category: combination.category.clone(),
            location: combination.location.clone(),
            coordinates: details.coordinates,
            types: details.types,
            website: details.website,
            phone: details.phone,
        }
    }
}
