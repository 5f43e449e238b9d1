use crate::geocoding::model::Coordinates;
use serde::Serialize;

/// One scraped activity, flattened to the output schema.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    pub title: String,
    pub date: String,
    pub ages: String,
    pub location: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub url: String,
}

impl EventRecord {
    pub fn new(
        title: String,
        date: String,
        ages: String,
        location: String,
        coordinates: Option<Coordinates>,
        url: String,
    ) -> Self {
        let (latitude, longitude) = match coordinates {
            Some(coordinates) => (Some(coordinates.latitude), Some(coordinates.longitude)),
            None => (None, None),
        };

        Self {
            title,
            date,
            ages,
            location,
            latitude,
            longitude,
            url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_serialize_missing_coordinates_as_null() {
        let record = EventRecord::new(
            "Morning Bird Walk".to_string(),
            "Aug 15 - 8:00 am".to_string(),
            "All ages".to_string(),
            "Somewhere remote".to_string(),
            None,
            "https://www.audubon.org/events/bird-walk".to_string(),
        );

        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["latitude"], serde_json::Value::Null);
        assert_eq!(json["longitude"], serde_json::Value::Null);
    }

    #[test_log::test]
    fn should_split_coordinates_into_both_fields() {
        let record = EventRecord::new(
            "Owl Prowl".to_string(),
            "Fri, Aug 15".to_string(),
            "Ages 3-6".to_string(),
            "Boston Nature Center".to_string(),
            Some(Coordinates::new("42.3601", "-71.0589")),
            "https://www.massaudubon.org/program/owl-prowl".to_string(),
        );

        assert_eq!(record.latitude.as_deref(), Some("42.3601"));
        assert_eq!(record.longitude.as_deref(), Some("-71.0589"));
    }
}
