use crate::geocoding::model::Coordinates;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

// Nominatim's usage policy wants an identifiable agent and at most one request per second
const USER_AGENT: &str = "FledgeAudubonEventScraper/1.0 (fledge@example.org)";
const REQUEST_DELAY: Duration = Duration::from_millis(1200);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

lazy_static! {
    static ref CITY_STATE: Regex =
        Regex::new(r"([A-Za-z\s\.-]+),\s*([A-Z]{2})$").expect("Failed to create city/state regex");

    /// Known locations the geocoder consistently fails on.
    static ref MANUAL_LOCATIONS: HashMap<&'static str, Coordinates> = HashMap::from([
        (
            "Audubon Maryland-DC, Philadelphia, PA",
            Coordinates::new("39.952583", "-75.165222"),
        ),
        (
            "Seward Park Audubon Center, Seattle, WA",
            Coordinates::new("47.5599", "-122.2222"),
        ),
        (
            "Dogwood Canyon Audubon Center at Cedar Hill, Cedar Hill, TX",
            Coordinates::new("32.5518", "-96.9602"),
        ),
        (
            "Montezuma Audubon Center, Savannah, NY",
            Coordinates::new("43.0456", "-76.7107"),
        ),
        (
            "Audubon Pennsylvania, Baltimore, MD",
            Coordinates::new("39.290385", "-76.612189"),
        ),
        (
            "Audubon Maryland-DC, Baltimore, MD",
            Coordinates::new("39.290385", "-76.612189"),
        ),
        (
            "Greenwich Audubon Center, Greenwich, CT",
            Coordinates::new("41.0180", "-73.6190"),
        ),
        (
            "Audubon Connecticut, Sharon, CT",
            Coordinates::new("41.8797", "-73.5350"),
        ),
        (
            "Audubon Maryland-DC, Audubon, PA",
            Coordinates::new("40.1215624", "-75.4371849"),
        ),
    ]);
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

pub struct GeocodingAPI {
    client: Client,
}

impl Default for GeocodingAPI {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl GeocodingAPI {
    /**
    Resolves a free-text location through a chain of fallbacks:
    manual table, the raw string, a "City, ST" suffix, and the string
    with organizational prefixes stripped. Returns None when every
    strategy comes up empty.
    */
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, location: &str) -> Option<Coordinates> {
        if location.is_empty() {
            return None;
        }

        if let Some(coordinates) = MANUAL_LOCATIONS.get(location) {
            info!("Using manual lookup for '{}'", location);
            return Some(coordinates.clone());
        }

        if let Some(coordinates) = self.geocode(location, "original").await {
            return Some(coordinates);
        }

        let simplified = simplify_to_city_state(location);
        if let Some(simplified) = &simplified {
            if simplified != location {
                if let Some(coordinates) = self.geocode(simplified, "city, state").await {
                    return Some(coordinates);
                }
            }
        }

        let cleaned = strip_known_prefixes(location);
        if cleaned != location && Some(&cleaned) != simplified.as_ref() {
            if let Some(coordinates) = self.geocode(&cleaned, "cleaned").await {
                return Some(coordinates);
            }
        }

        warn!("Ultimately failed to geocode '{}'", location);
        None
    }

    /// Single Nominatim attempt. Timeouts and service errors are soft
    /// failures so the caller can fall through to the next strategy.
    async fn geocode(&self, query: &str, attempt: &str) -> Option<Coordinates> {
        info!("Attempting geocoding '{}' for '{}'", attempt, query);

        tokio::time::sleep(REQUEST_DELAY).await;

        let url = format!(
            "{}?q={}&format=json&limit=1",
            NOMINATIM_SEARCH_URL,
            urlencoding::encode(query)
        );

        let response = match self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(err) => {
                warn!("Nominatim service error for '{}': {}", query, err);
                return None;
            }
        };

        let places = match response.json::<Vec<NominatimPlace>>().await {
            Ok(places) => places,
            Err(err) => {
                warn!("Invalid Nominatim response for '{}': {}", query, err);
                return None;
            }
        };

        match places.into_iter().next() {
            Some(place) => {
                info!("Geocoded '{}' to {}, {}", query, place.lat, place.lon);
                Some(Coordinates::new(place.lat, place.lon))
            }
            None => {
                info!("No Nominatim results for '{}'", query);
                None
            }
        }
    }
}

/// Extracts a trailing "City, ST" pair, e.g.
/// "Audubon Maryland-DC, Philadelphia, PA" becomes "Philadelphia, PA".
fn simplify_to_city_state(location: &str) -> Option<String> {
    CITY_STATE.captures(location).map(|captures| {
        format!(
            "{}, {}",
            captures[1].trim(),
            captures[2].trim()
        )
    })
}

/// Strips organizational name prefixes that confuse the geocoder.
fn strip_known_prefixes(location: &str) -> String {
    location
        .replace("Audubon Center at ", "")
        .replace("Audubon Center, ", "")
        .trim()
        .replace("Audubon ", "")
        .trim()
        .to_string()
}
