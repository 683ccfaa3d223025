//! Client-submitted orders

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// An order as submitted by a client.
///
/// The body must be a JSON object; its fields are not checked against any
/// schema and the order is never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Order(Map<String, Value>);

impl Order {
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body).map(Order)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}

/// Acknowledgment written for every accepted order
#[derive(Debug, Serialize)]
pub struct OrderAck {
    pub status: &'static str,
    pub message: &'static str,
}

impl OrderAck {
    pub fn received() -> Self {
        Self {
            status: "200",
            message: "Order received successfully",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_any_object() {
        assert!(Order::parse(b"{}").unwrap().fields().is_empty());

        let order = Order::parse(br#"{"items": [{"id": 1, "qty": 2}], "note": null}"#).unwrap();
        assert_eq!(order.fields().len(), 2);
        assert_eq!(order.fields()["items"][0]["qty"], 2);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        let bodies: [&[u8]; 6] = [b"not json", b"", b"[1, 2]", b"42", br#""order""#, b"{\"a\":"];
        for body in bodies {
            assert!(Order::parse(body).is_err(), "accepted {:?}", body);
        }
    }

    #[test]
    fn test_display_is_compact_json() {
        let order = Order::parse(br#"{ "item" : "Chair" }"#).unwrap();
        assert_eq!(order.to_string(), r#"{"item":"Chair"}"#);
    }
}
