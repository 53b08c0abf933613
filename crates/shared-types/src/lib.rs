use serde::{Deserialize, Serialize};

mod markers;

pub use markers::{GeoPoint, Marker, MarkerLayer};

/// Microdegrees per degree, the unit map widgets report positions and spans in.
pub const E6: f64 = 1_000_000.0;

/// The area currently visible on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center_latitude: f64,
    pub center_longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl Viewport {
    pub fn new(
        center_latitude: f64,
        center_longitude: f64,
        latitude_span: f64,
        longitude_span: f64,
    ) -> Self {
        Self {
            center_latitude,
            center_longitude,
            latitude_span,
            longitude_span,
        }
    }

    /// Build a viewport from the microdegree values a map widget exposes.
    pub fn from_e6(
        center_latitude_e6: i32,
        center_longitude_e6: i32,
        latitude_span_e6: i32,
        longitude_span_e6: i32,
    ) -> Self {
        Self {
            center_latitude: f64::from(center_latitude_e6) / E6,
            center_longitude: f64::from(center_longitude_e6) / E6,
            latitude_span: f64::from(latitude_span_e6) / E6,
            longitude_span: f64::from(longitude_span_e6) / E6,
        }
    }
}

/// A geotagged event as published by the events host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub description: String,
    /// Free-form text, shown as-is
    pub date: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Event {
    /// Message body shown when the event's pin is tapped.
    pub fn detail(&self) -> String {
        let mut message = String::with_capacity(
            32 + self.date.len() + self.address.len() + self.description.len(),
        );
        message.push_str("DATE:\n");
        message.push_str(&self.date);
        message.push_str("\nADDRESS:\n");
        message.push_str(&self.address);
        message.push_str("\nDESCRIPTION:\n");
        message.push_str(&self.description);
        message
    }

    pub fn to_marker(&self) -> Marker {
        Marker {
            point: GeoPoint::from_degrees(self.latitude, self.longitude),
            title: self.title.clone(),
            snippet: self.detail(),
        }
    }
}
