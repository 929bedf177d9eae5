//! Place resolution: free text to coordinates.
//!
//! ## Module Structure
//!
//! - [`types`]: raw geocoder hits, ranked candidates and resolved locations
//! - [`ranker`]: scoring and filtering of hits into at most eight suggestions
//! - [`search`]: the place search contract and its Nominatim client
//! - [`resolver`]: full-search resolution with a 24h cache, plus interactive suggestions

pub mod ranker;
pub mod resolver;
pub mod search;
pub mod types;

pub use ranker::rank;
pub use resolver::{LocationResolver, normalize_query};
pub use search::{NominatimClient, PlaceSearch};
pub use types::{GeoCandidate, RawPlace, ResolvedLocation};
