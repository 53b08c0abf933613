//! Viewport to bounding-query translation.

use shared_types::Viewport;
use url::Url;

use crate::error::QueryError;

const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";
const LATITUDE_SPAN: &str = "latitude_span";
const LONGITUDE_SPAN: &str = "longitude_span";

/// Parameters of the bounded-area request sent to the events host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_span: f64,
    pub longitude_span: f64,
}

impl EventQuery {
    /// Offset the viewport center by half the visible spans, north in
    /// latitude and west in longitude. Spans pass through unchanged.
    ///
    /// The reference point is not a true bounding-box corner, and the map
    /// widget this was built against hands over its two spans under each
    /// other's names. The arithmetic is kept exactly as the events host has
    /// always received it; fixing the axes is a product decision, not a
    /// migration detail.
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            latitude: viewport.center_latitude + viewport.latitude_span / 2.0,
            longitude: viewport.center_longitude - viewport.longitude_span / 2.0,
            latitude_span: viewport.latitude_span,
            longitude_span: viewport.longitude_span,
        }
    }

    /// Append the query parameters to `base`, keeping any it already has.
    ///
    /// Numbers use the shortest text that parses back to the same `f64`:
    /// `11` and `0.0001`. Older clients of the events host sent `11.0` and
    /// `1.0E-4` for the same values, so the host must accept both forms.
    pub fn to_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair(LATITUDE, &self.latitude.to_string())
            .append_pair(LONGITUDE, &self.longitude.to_string())
            .append_pair(LATITUDE_SPAN, &self.latitude_span.to_string())
            .append_pair(LONGITUDE_SPAN, &self.longitude_span.to_string());
        url
    }

    /// Decode the parameters written by [`EventQuery::to_url`].
    pub fn from_url(url: &Url) -> Result<Self, QueryError> {
        let param = |name: &'static str| -> Result<f64, QueryError> {
            // Last occurrence wins, so a base URL carrying stale values is overridden
            let value = url
                .query_pairs()
                .filter(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .last()
                .ok_or(QueryError::MissingParameter(name))?;
            value.trim().parse().map_err(|_| QueryError::InvalidNumber {
                name,
                value: value.clone(),
            })
        };

        Ok(Self {
            latitude: param(LATITUDE)?,
            longitude: param(LONGITUDE)?,
            latitude_span: param(LATITUDE_SPAN)?,
            longitude_span: param(LONGITUDE_SPAN)?,
        })
    }
}
