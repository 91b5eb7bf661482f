use crate::SweepError;
use ogmap_kernel::domain::config::SweepConfig;
use ogmap_kernel::domain::facility::{Category, Combination, Location};

/// The category and location vocabularies of a sweep, in sweep order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    categories: Vec<Category>,
    locations: Vec<Location>,
}

impl SweepPlan {
    /// Blank terms are dropped; order is kept.
    ///
    /// # Errors
    /// Returns [`SweepError::InvalidPlan`] if either vocabulary ends up empty.
    pub fn new<C, L>(categories: C, locations: L) -> Result<Self, SweepError>
    where
        C: IntoIterator,
        C::Item: Into<Category>,
        L: IntoIterator,
        L::Item: Into<Location>,
    {
        let categories: Vec<Category> = categories
            .into_iter()
            .map(Into::into)
            .filter(|c: &Category| !c.as_str().is_empty())
            .collect();
        let locations: Vec<Location> = locations
            .into_iter()
            .map(Into::into)
            .filter(|l: &Location| !l.as_str().is_empty())
            .collect();

        if categories.is_empty() || locations.is_empty() {
            return Err(SweepError::InvalidPlan {
                message: format!(
                    "need at least one category and one location (got {} and {})",
                    categories.len(),
                    locations.len()
                )
                .into(),
                context: None,
            });
        }

        Ok(Self { categories, locations })
    }

    /// # Errors
    /// See [`SweepPlan::new`].
    pub fn from_config(config: &SweepConfig) -> Result<Self, SweepError> {
        Self::new(
            config.categories.iter().map(String::as_str),
            config.locations.iter().map(String::as_str),
        )
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Number of combinations, i.e. search calls per sweep.
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len() * self.locations.len()
    }

    /// Category-major, location-minor.
    pub fn combinations(&self) -> impl Iterator<Item = Combination> + '_ {
        self.categories.iter().flat_map(move |category| {
            self.locations
                .iter()
                .map(move |location| Combination::new(category.clone(), location.clone()))
        })
    }
}
