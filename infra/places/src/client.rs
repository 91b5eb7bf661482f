use crate::{ApiKey, PlaceDetail, PlaceSearch, PlacesError, PlacesErrorExt};
use async_trait::async_trait;
use ogmap_domain::config::PlacesConfig;
use ogmap_domain::constants::{
    DEFAULT_PLACE_TYPE, DEFAULT_PLACES_BASE_URL, DEFAULT_PLACES_TIMEOUT_SECS,
};
use ogmap_domain::facility::{Candidate, Coordinates, PlaceDetails};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

/// Fields requested from the detail endpoint.
const DETAIL_FIELDS: &str = "name,formatted_address,geometry,types,website,formatted_phone_number";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
const STATUS_NOT_FOUND: &str = "NOT_FOUND";

/// Google Places (legacy web service) client implementing both collaborators.
#[derive(Debug, Clone)]
pub struct GooglePlaces {
    http: reqwest::Client,
    base_url: String,
    place_type: String,
}

impl GooglePlaces {
    #[must_use]
    pub fn builder() -> GooglePlacesBuilder {
        GooglePlacesBuilder::default()
    }

    /// Builds a client from the `[places]` configuration section.
    ///
    /// # Errors
    /// Returns [`PlacesError`] if the base URL is blank or the HTTP client cannot be created.
    pub fn from_config(config: &PlacesConfig) -> Result<Self, PlacesError> {
        Self::builder()
            .base_url(&config.base_url)
            .timeout(Duration::from_secs(config.timeout_secs))
            .place_type(&config.place_type)
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn fetch<T>(&self, url: String, params: &[(&str, &str)]) -> Result<T, PlacesError>
    where
        T: DeserializeOwned,
    {
        // Errors carry the request URL, which includes the key.
        let response = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(reqwest::Error::without_url)?;

        Ok(response.json::<T>().await.map_err(reqwest::Error::without_url)?)
    }
}

#[async_trait]
impl PlaceSearch for GooglePlaces {
    async fn search(&self, key: &ApiKey, query: &str) -> Result<Vec<Candidate>, PlacesError> {
        trace!(query, "Text search");
        let body: TextSearchResponse = self
            .fetch(
                self.endpoint("textsearch/json"),
                &[("query", query), ("key", key.expose()), ("type", self.place_type.as_str())],
            )
            .await
            .context("Text search")?;

        match body.status.as_str() {
            STATUS_OK => {
                Ok(body.results.into_iter().filter_map(TextSearchResult::into_candidate).collect())
            }
            STATUS_ZERO_RESULTS => Ok(Vec::new()),
            _ => Err(body.into_api_error()),
        }
    }
}

#[async_trait]
impl PlaceDetail for GooglePlaces {
    async fn details(&self, key: &ApiKey, id: &str) -> Result<Option<PlaceDetails>, PlacesError> {
        trace!(place_id = id, "Place details");
        let body: DetailsResponse = self
            .fetch(
                self.endpoint("details/json"),
                &[("place_id", id), ("key", key.expose()), ("fields", DETAIL_FIELDS)],
            )
            .await
            .context("Place details")?;

        match body.status.as_str() {
            STATUS_OK => Ok(body.result.map(DetailsResult::into_details)),
            STATUS_ZERO_RESULTS | STATUS_NOT_FOUND => Ok(None),
            _ => Err(PlacesError::Api {
                status: body.status,
                message: body.error_message.unwrap_or_default().into(),
                context: Some("Place details".into()),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GooglePlacesBuilder {
    base_url: String,
    timeout: Duration,
    place_type: String,
    user_agent: String,
}

impl Default for GooglePlacesBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLACES_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_PLACES_TIMEOUT_SECS),
            place_type: DEFAULT_PLACE_TYPE.to_owned(),
            user_agent: concat!("ogmap/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl GooglePlacesBuilder {
    #[must_use]
    pub fn base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.base_url = base_url.as_ref().trim().trim_end_matches('/').to_owned();
        self
    }

    /// Upper bound for a single call, connect included.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn place_type(mut self, place_type: impl Into<String>) -> Self {
        self.place_type = place_type.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// # Errors
    /// Returns [`PlacesError::InvalidConfig`] for a blank base URL or a zero timeout, and
    /// [`PlacesError::Http`] if the underlying client cannot be created.
    pub fn build(self) -> Result<GooglePlaces, PlacesError> {
        if self.base_url.is_empty() {
            return Err(PlacesError::InvalidConfig {
                message: "base URL must not be blank".into(),
                context: None,
            });
        }
        if self.timeout.is_zero() {
            return Err(PlacesError::InvalidConfig {
                message: "timeout must be greater than zero".into(),
                context: None,
            });
        }

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .context("Building HTTP client")?;

        debug!(base_url = %self.base_url, timeout = ?self.timeout, "Places client ready");

        Ok(GooglePlaces { http, base_url: self.base_url, place_type: self.place_type })
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<TextSearchResult>,
    error_message: Option<String>,
}

impl TextSearchResponse {
    fn into_api_error(self) -> PlacesError {
        PlacesError::Api {
            status: self.status,
            message: self.error_message.unwrap_or_default().into(),
            context: Some("Text search".into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TextSearchResult {
    place_id: Option<String>,
    name: Option<String>,
    formatted_address: Option<String>,
}

impl TextSearchResult {
    fn into_candidate(self) -> Option<Candidate> {
        let Some(id) = self.place_id.filter(|id| !id.is_empty()) else {
            debug!(name = ?self.name, "Skipping search result without place_id");
            return None;
        };
        Some(Candidate { id, name: self.name, address: self.formatted_address })
    }
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    name: Option<String>,
    formatted_address: Option<String>,
    geometry: Option<Geometry>,
    types: Option<Vec<String>>,
    website: Option<String>,
    formatted_phone_number: Option<String>,
}

impl DetailsResult {
    fn into_details(self) -> PlaceDetails {
        let coordinates = self
            .geometry
            .and_then(|g| g.location)
            .map(|l| Coordinates { lat: l.lat, lng: l.lng })
            .unwrap_or_default();

        PlaceDetails {
            name: self.name,
            address: self.formatted_address,
            coordinates,
            types: self.types,
            website: self.website,
            phone: self.formatted_phone_number,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: Option<f64>,
    lng: Option<f64>,
}
