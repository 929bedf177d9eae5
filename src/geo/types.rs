//! Place search data: raw hits from the geocoder and the values derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coordinate as the geocoder sends it. Nominatim uses strings, other
/// services use numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    /// The coordinate as a finite float, if it is one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

/// Address components of a geocoding hit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Address {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state_district: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// One raw hit from the place search service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawPlace {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub place_type: Option<String>,
    #[serde(rename = "class")]
    pub place_class: Option<String>,
    pub importance: Option<f64>,
    pub lat: Option<Coordinate>,
    pub lon: Option<Coordinate>,
    pub display_name: Option<String>,
    pub address: Option<Address>,
}

impl RawPlace {
    /// Latitude and longitude when both are finite numbers.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_ref()?.value()?;
        let lon = self.lon.as_ref()?.value()?;
        Some((lat, lon))
    }

    pub fn importance_or_zero(&self) -> f64 {
        self.importance.filter(|i| i.is_finite()).unwrap_or(0.0)
    }

    /// Short name for display: the hit's name, else the first display-name segment.
    pub fn short_name(&self) -> String {
        first_non_empty([
            self.name.as_deref(),
            self.display_name
                .as_deref()
                .and_then(|d| d.split(',').next()),
        ])
        .unwrap_or_default()
    }
}

/// Anything the ranker can score: raw hits and already-ranked candidates.
pub trait PlaceHit {
    fn place_type(&self) -> &str;
    fn place_class(&self) -> &str;
    fn importance(&self) -> f64;
    fn coordinates(&self) -> Option<(f64, f64)>;
    fn to_candidate(&self, priority: f64) -> Option<GeoCandidate>;
}

impl PlaceHit for RawPlace {
    fn place_type(&self) -> &str {
        self.place_type.as_deref().unwrap_or("")
    }

    fn place_class(&self) -> &str {
        self.place_class.as_deref().unwrap_or("")
    }

    fn importance(&self) -> f64 {
        self.importance_or_zero()
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        RawPlace::coordinates(self)
    }

    fn to_candidate(&self, priority: f64) -> Option<GeoCandidate> {
        let (latitude, longitude) = RawPlace::coordinates(self)?;
        let address = self.address.clone().unwrap_or_default();
        Some(GeoCandidate {
            name: self.short_name(),
            country: address.country.clone().unwrap_or_default(),
            region: first_non_empty([
                address.state.as_deref(),
                address.region.as_deref(),
                address.county.as_deref(),
            ])
            .unwrap_or_default(),
            latitude,
            longitude,
            priority,
            place_type: self.place_type().to_lowercase(),
            place_class: self.place_class().to_lowercase(),
            importance: self.importance_or_zero(),
            display_name: self.display_name.clone().unwrap_or_default(),
        })
    }
}

/// A ranked place suggestion handed to the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoCandidate {
    pub name: String,
    pub country: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub priority: f64,
    pub place_type: String,
    pub place_class: String,
    pub importance: f64,
    pub display_name: String,
}

impl GeoCandidate {
    /// "Region, Country", or "Location" when neither is known.
    pub fn subtitle(&self) -> String {
        let parts: Vec<&str> = [self.region.as_str(), self.country.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "Location".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl PlaceHit for GeoCandidate {
    fn place_type(&self) -> &str {
        &self.place_type
    }

    fn place_class(&self) -> &str {
        &self.place_class
    }

    fn importance(&self) -> f64 {
        self.importance
    }

    fn coordinates(&self) -> Option<(f64, f64)> {
        (self.latitude.is_finite() && self.longitude.is_finite())
            .then_some((self.latitude, self.longitude))
    }

    fn to_candidate(&self, priority: f64) -> Option<GeoCandidate> {
        PlaceHit::coordinates(self)?;
        Some(GeoCandidate {
            priority,
            ..self.clone()
        })
    }
}

/// A query resolved to a canonical place. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    pub resolved_at: DateTime<Utc>,
}

/// First candidate that is present and not blank, trimmed.
pub(crate) fn first_non_empty<'a>(
    candidates: impl IntoIterator<Item = Option<&'a str>>,
) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
