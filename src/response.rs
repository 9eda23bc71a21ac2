use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProtocolError;

/// Response sent from server to client.
///
/// Serializes to a flat JSON object: `ok`, then either `message` for a
/// failure or `type` plus result fields for a success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request succeeded.
    pub ok: bool,
    /// Remaining response fields.
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Response {
    /// Creates a successful response tagged with `kind`.
    pub fn success(kind: &str) -> Self {
        let mut body = Map::new();
        body.insert("type".to_owned(), Value::from(kind));
        Self { ok: true, body }
    }

    /// Creates a failed response carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("message".to_owned(), Value::String(message.into()));
        Self { ok: false, body }
    }

    /// Adds a field to the response body.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_owned(), value.into());
        self
    }

    /// Looks up a body field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::failure(err.to_string())
    }
}
