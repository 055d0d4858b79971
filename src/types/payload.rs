use serde::Serialize;
use serde_json::Value;

use crate::types::Result;

/// An outbound payload: raw text is sent verbatim, structured values are
/// encoded as JSON text at send time.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Text(String),
    Json(Value),
}

impl OutboundMessage {
    /// Build a structured message from any serializable value.
    pub fn json<T: Serialize>(value: T) -> Result<Self> {
        Ok(Self::Json(serde_json::to_value(value)?))
    }

    /// Render the wire text for this message.
    pub fn encode(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::Json(value) => Ok(serde_json::to_string(value)?),
        }
    }
}

impl From<String> for OutboundMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for OutboundMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for OutboundMessage {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// An inbound payload as delivered to the consumer.
///
/// Inbound text that parses as JSON arrives as [`Payload::Json`]; anything
/// else is passed through unchanged as [`Payload::Text`]. A parse failure is
/// never fatal and never closes the channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(err) => {
                tracing::debug!("Inbound payload is not JSON ({}), passing through raw", err);
                Self::Text(text)
            }
        }
    }

    /// The structured value, if this payload parsed as JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outbound_text_passes_through_verbatim() {
        let msg = OutboundMessage::from("ping");
        assert_eq!(msg.encode().unwrap(), "ping");
    }

    #[test]
    fn test_outbound_json_encodes_to_text() {
        let msg = OutboundMessage::from(json!({"a": 1}));
        assert_eq!(msg.encode().unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn test_outbound_json_from_serialize() {
        #[derive(Serialize)]
        struct Subscribe {
            topic: String,
        }

        let msg = OutboundMessage::json(Subscribe {
            topic: "metrics".to_string(),
        })
        .unwrap();
        assert_eq!(msg.encode().unwrap(), r#"{"topic":"metrics"}"#);
    }

    #[test]
    fn test_inbound_json_is_parsed() {
        let payload = Payload::parse(r#"{"event":"drift"}"#.to_string());
        assert_eq!(payload.as_json().unwrap()["event"], "drift");
    }

    #[test]
    fn test_inbound_malformed_text_passes_through_raw() {
        let payload = Payload::parse("not-json{".to_string());
        assert_eq!(payload, Payload::Text("not-json{".to_string()));
    }
}
