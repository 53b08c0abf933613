//! Decoding of the events host payload.
//!
//! Expected shape:
//!
//! ```json
//! [ { "event": { "latitude": "59.93", "longitude": "30.31",
//!                "title": "...", "description": "...",
//!                "date": "...", "address": "..." } } ]
//! ```
//!
//! Decoding is all-or-nothing: the first bad element rejects the batch.

use serde_json::{Map, Value};
use shared_types::Event;

use crate::error::ParseError;

/// Parse a response body into events, in payload order.
pub fn parse_events(body: &str) -> Result<Vec<Event>, ParseError> {
    let payload: Value = serde_json::from_str(body)?;
    let elements = payload.as_array().ok_or(ParseError::NotAnArray)?;

    elements
        .iter()
        .enumerate()
        .map(|(index, element)| parse_element(index, element))
        .collect()
}

fn parse_element(index: usize, element: &Value) -> Result<Event, ParseError> {
    let event = element
        .get("event")
        .and_then(Value::as_object)
        .ok_or(ParseError::MissingEvent { index })?;

    Ok(Event {
        latitude: coordinate(index, event, "latitude", 90.0)?,
        longitude: coordinate(index, event, "longitude", 180.0)?,
        title: text(index, event, "title")?,
        description: text(index, event, "description")?,
        date: text(index, event, "date")?,
        address: text(index, event, "address")?,
    })
}

/// Read a field as text. Numbers and booleans are taken in their JSON text
/// form, the way the host's older clients read them.
fn text(index: usize, event: &Map<String, Value>, field: &'static str) -> Result<String, ParseError> {
    match event.get(field) {
        None => Err(ParseError::MissingField { index, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(_) => Err(ParseError::NotText { index, field }),
    }
}

fn coordinate(
    index: usize,
    event: &Map<String, Value>,
    field: &'static str,
    limit: f64,
) -> Result<f64, ParseError> {
    let raw = text(index, event, field)?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidCoordinate {
            index,
            field,
            value: raw.clone(),
        })?;

    if !value.is_finite() || value.abs() > limit {
        return Err(ParseError::CoordinateOutOfRange {
            index,
            field,
            value,
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEETUP: &str = r#"[{"event":{"latitude":"59.93","longitude":"30.31","title":"Meetup","description":"Talk","date":"2024-05-01","address":"Nevsky 1"}}]"#;

    fn element(title: &str, latitude: &str, longitude: &str) -> String {
        format!(
            r#"{{"event":{{"latitude":"{latitude}","longitude":"{longitude}","title":"{title}","description":"d","date":"soon","address":"a"}}}}"#
        )
    }

    #[test]
    fn test_parse_single_event() {
        let events = parse_events(MEETUP).unwrap();

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.latitude, 59.93);
        assert_eq!(event.longitude, 30.31);
        assert_eq!(event.title, "Meetup");
        assert_eq!(event.description, "Talk");
        assert_eq!(event.date, "2024-05-01");
        assert_eq!(event.address, "Nevsky 1");
        assert_eq!(
            event.detail(),
            "DATE:\n2024-05-01\nADDRESS:\nNevsky 1\nDESCRIPTION:\nTalk"
        );
    }

    #[test]
    fn test_parse_preserves_order() {
        let body = format!(
            "[{},{},{}]",
            element("first", "1.5", "2.5"),
            element("second", "-3", "4"),
            element("third", "0", "-179.9")
        );
        let events = parse_events(&body).unwrap();

        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(events[1].latitude, -3.0);
        assert_eq!(events[2].longitude, -179.9);
    }

    #[test]
    fn test_empty_array_is_not_an_error() {
        assert!(parse_events("[]").unwrap().is_empty());
        assert!(parse_events("  [ ]\n").unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_rejects_whole_batch() {
        let broken = r#"{"event":{"latitude":"1","longitude":"2","title":"t","description":"d","date":"x"}}"#;
        let body = format!("[{},{}]", element("ok", "1", "2"), broken);

        match parse_events(&body) {
            Err(ParseError::MissingField { index, field }) => {
                assert_eq!(index, 1);
                assert_eq!(field, "address");
            }
            other => panic!("expected missing field error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_nested_event_object() {
        let body = format!("[{},{{\"title\":\"flat\"}}]", element("ok", "1", "2"));
        assert!(matches!(
            parse_events(&body),
            Err(ParseError::MissingEvent { index: 1 })
        ));

        assert!(matches!(
            parse_events(r#"[{"event":"not an object"}]"#),
            Err(ParseError::MissingEvent { index: 0 })
        ));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let body = format!("[{}]", element("bad", "north", "2"));
        match parse_events(&body) {
            Err(ParseError::InvalidCoordinate {
                index,
                field,
                value,
            }) => {
                assert_eq!(index, 0);
                assert_eq!(field, "latitude");
                assert_eq!(value, "north");
            }
            other => panic!("expected invalid coordinate, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_coordinates() {
        for (latitude, longitude) in [("90.5", "0"), ("0", "-180.01"), ("NaN", "0"), ("0", "inf")] {
            let body = format!("[{}]", element("far", latitude, longitude));
            assert!(
                matches!(
                    parse_events(&body),
                    Err(ParseError::CoordinateOutOfRange { .. })
                ),
                "({latitude}, {longitude}) should be rejected"
            );
        }
    }

    #[test]
    fn test_boundary_coordinates_accepted() {
        let body = format!("[{}]", element("pole", "-90", "180"));
        let events = parse_events(&body).unwrap();
        assert_eq!(events[0].latitude, -90.0);
        assert_eq!(events[0].longitude, 180.0);
    }

    #[test]
    fn test_coordinate_whitespace_is_trimmed() {
        let body = format!("[{}]", element("padded", " 59.93 ", "30.31\\n"));
        let events = parse_events(&body).unwrap();
        assert_eq!(events[0].latitude, 59.93);
        assert_eq!(events[0].longitude, 30.31);
    }

    #[test]
    fn test_scalar_fields_read_as_text() {
        let body = r#"[{"event":{"latitude":59.93,"longitude":30,"title":2024,"description":true,"date":"d","address":"a"}}]"#;
        let events = parse_events(body).unwrap();

        assert_eq!(events[0].latitude, 59.93);
        assert_eq!(events[0].longitude, 30.0);
        assert_eq!(events[0].title, "2024");
        assert_eq!(events[0].description, "true");
    }

    #[test]
    fn test_null_and_nested_values_are_not_text() {
        let body = r#"[{"event":{"latitude":"1","longitude":"2","title":null,"description":"d","date":"d","address":"a"}}]"#;
        assert!(matches!(
            parse_events(body),
            Err(ParseError::NotText {
                index: 0,
                field: "title"
            })
        ));

        let body = r#"[{"event":{"latitude":"1","longitude":"2","title":"t","description":"d","date":["x"],"address":"a"}}]"#;
        assert!(matches!(
            parse_events(body),
            Err(ParseError::NotText { field: "date", .. })
        ));
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let body = r#"[{"id":7,"event":{"id":7,"latitude":"1","longitude":"2","title":"t","description":"d","date":"d","address":"a","created_at":"now"}}]"#;
        assert_eq!(parse_events(body).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_json_and_wrong_shape() {
        assert!(matches!(parse_events("<html>"), Err(ParseError::Json(_))));
        assert!(matches!(parse_events(""), Err(ParseError::Json(_))));
        assert!(matches!(
            parse_events(r#"{"event":{}}"#),
            Err(ParseError::NotAnArray)
        ));
    }
}
