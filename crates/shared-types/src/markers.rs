//! Renderable pins derived from events.
//!
//! The map view owns these independently of the events they were built from:
//! a marker carries everything the tap dialog needs (title and message), and
//! its position in the integer microdegree form map widgets consume.

use serde::{Deserialize, Serialize};

use crate::{Event, E6};

/// Pin position in microdegrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude_e6: i32,
    pub longitude_e6: i32,
}

impl GeoPoint {
    /// Fractional microdegrees are truncated toward zero.
    pub fn from_degrees(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude_e6: (latitude * E6) as i32,
            longitude_e6: (longitude * E6) as i32,
        }
    }

    pub fn latitude(&self) -> f64 {
        f64::from(self.latitude_e6) / E6
    }

    pub fn longitude(&self) -> f64 {
        f64::from(self.longitude_e6) / E6
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub point: GeoPoint,
    /// Dialog title
    pub title: String,
    /// Dialog message, see [`Event::detail`]
    pub snippet: String,
}

/// Ordered set of markers for one fetch result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerLayer {
    markers: Vec<Marker>,
}

impl MarkerLayer {
    pub fn from_events(events: &[Event]) -> Self {
        Self {
            markers: events.iter().map(Event::to_marker).collect(),
        }
    }

    /// The layer to attach to the map, or `None` when there is nothing to show.
    pub fn into_overlay(self) -> Option<Self> {
        if self.markers.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Marker> {
        self.markers.iter()
    }
}

impl<'a> IntoIterator for &'a MarkerLayer {
    type Item = &'a Marker;
    type IntoIter = std::slice::Iter<'a, Marker>;

    fn into_iter(self) -> Self::IntoIter {
        self.markers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(title: &str, latitude: f64, longitude: f64) -> Event {
        Event {
            title: title.to_string(),
            description: "desc".to_string(),
            date: "today".to_string(),
            address: "somewhere".to_string(),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_geopoint_from_degrees() {
        let point = GeoPoint::from_degrees(59.5, -30.25);
        assert_eq!(point.latitude_e6, 59_500_000);
        assert_eq!(point.longitude_e6, -30_250_000);
    }

    #[test]
    fn test_geopoint_truncates_toward_zero() {
        let point = GeoPoint::from_degrees(0.0000019, -0.0000019);
        assert_eq!(point.latitude_e6, 1);
        assert_eq!(point.longitude_e6, -1);
    }

    #[test]
    fn test_layer_preserves_order() {
        let events = vec![event("a", 1.0, 2.0), event("b", 3.0, 4.0)];
        let layer = MarkerLayer::from_events(&events);

        let titles: Vec<&str> = layer.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b"]);
        assert_eq!(layer.get(1).unwrap().point, GeoPoint::from_degrees(3.0, 4.0));
    }

    #[test]
    fn test_empty_layer_is_not_an_overlay() {
        let empty = MarkerLayer::from_events(&[]);
        assert!(empty.is_empty());
        assert!(empty.into_overlay().is_none());

        let overlay = MarkerLayer::from_events(&[event("a", 1.0, 2.0)]).into_overlay();
        assert!(overlay.as_ref().is_some_and(|l| !l.is_empty()));
        assert_eq!(overlay.map(|l| l.len()), Some(1));
    }
}
