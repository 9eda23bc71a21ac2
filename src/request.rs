//! Request parsing and field validation.
//!
//! [`parse`] turns a raw frame into a [`Request`]: the request `type` plus the
//! remaining [`Fields`]. Handlers build their own typed request values from
//! `Fields` with the `require_*` accessors, so every presence and type check
//! happens before a handler body runs.

use serde_json::{Map, Value};

use crate::ProtocolError;

/// A parsed request: the handler key and its fields.
#[derive(Debug, Clone)]
pub struct Request {
    kind: String,
    fields: Fields,
}

impl Request {
    /// The `type` tag selecting a handler.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// All fields of the request object, `type` included.
    pub fn fields(&self) -> &Fields {
        &self.fields
    }
}

/// Parses a raw message into a [`Request`].
///
/// Text that is neither a JSON object nor a JSON array is `NotJson`. An array,
/// or an object without `type`, is `MissingType`. A `type` that is not a
/// string is reported as unsupported using its JSON text.
pub fn parse(raw: &str) -> Result<Request, ProtocolError> {
    let value: Value = serde_json::from_str(raw).map_err(|_| ProtocolError::NotJson)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Array(_) => return Err(ProtocolError::MissingType),
        _ => return Err(ProtocolError::NotJson),
    };

    let kind = match map.get("type") {
        None => return Err(ProtocolError::MissingType),
        Some(Value::String(kind)) => kind.clone(),
        Some(other) => return Err(ProtocolError::UnsupportedType(other.to_string())),
    };

    Ok(Request {
        kind,
        fields: Fields(map),
    })
}

/// The fields of a request object with checked accessors.
#[derive(Debug, Clone, Default)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Returns the raw value of a required field.
    pub fn require(&self, key: &str) -> Result<&Value, ProtocolError> {
        self.0
            .get(key)
            .ok_or_else(|| ProtocolError::MissingField(key.to_owned()))
    }

    /// Returns a required string field.
    pub fn require_str(&self, key: &str) -> Result<&str, ProtocolError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| wrong_type(key, "String"))
    }

    /// Returns a required integer field.
    pub fn require_i64(&self, key: &str) -> Result<i64, ProtocolError> {
        self.require(key)?
            .as_i64()
            .ok_or_else(|| wrong_type(key, "int"))
    }

    /// Returns a required non-negative integer field.
    pub fn require_u64(&self, key: &str) -> Result<u64, ProtocolError> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| wrong_type(key, "non-negative int"))
    }

    /// Returns a required array whose elements must all be integers.
    pub fn require_i64_array(&self, key: &str) -> Result<Vec<i64>, ProtocolError> {
        self.require(key)?
            .as_array()
            .ok_or_else(|| wrong_type(key, "array"))?
            .iter()
            .map(|v| v.as_i64().ok_or(ProtocolError::NonIntegerElement))
            .collect()
    }

    /// Returns an optional boolean field.
    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, ProtocolError> {
        self.0
            .get(key)
            .map(|v| v.as_bool().ok_or_else(|| wrong_type(key, "boolean")))
            .transpose()
    }

    /// Returns an optional non-negative integer field.
    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ProtocolError> {
        self.0
            .get(key)
            .map(|v| v.as_u64().ok_or_else(|| wrong_type(key, "non-negative int")))
            .transpose()
    }
}

/// A typed handler request built from raw [`Fields`].
pub trait FromFields: Sized {
    /// Validates `fields` and extracts the typed request.
    fn from_fields(fields: &Fields) -> Result<Self, ProtocolError>;
}

/// For handlers that take no fields besides `type`.
impl FromFields for () {
    fn from_fields(_fields: &Fields) -> Result<Self, ProtocolError> {
        Ok(())
    }
}

fn wrong_type(key: &str, kind: &'static str) -> ProtocolError {
    ProtocolError::WrongType {
        field: key.to_owned(),
        kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(raw: &str) -> Fields {
        parse(raw).unwrap().fields
    }

    #[test]
    fn plain_text_is_not_json() {
        assert_eq!(parse("Invalid JSON").unwrap_err(), ProtocolError::NotJson);
        assert_eq!(parse("42").unwrap_err(), ProtocolError::NotJson);
        assert_eq!(parse("").unwrap_err(), ProtocolError::NotJson);
    }

    #[test]
    fn array_and_untyped_object_have_no_type() {
        assert_eq!(parse("[1, 2]").unwrap_err(), ProtocolError::MissingType);
        assert_eq!(
            parse(r#"{"data": "x"}"#).unwrap_err(),
            ProtocolError::MissingType
        );
    }

    #[test]
    fn non_string_type_is_unsupported() {
        assert_eq!(
            parse(r#"{"type": 7}"#).unwrap_err().to_string(),
            "Type 7 is not supported."
        );
    }

    #[test]
    fn parse_keeps_kind_and_fields() {
        let request = parse(r#"{"type": "echo", "data": "hi"}"#).unwrap();
        assert_eq!(request.kind(), "echo");
        assert_eq!(request.fields().require_str("data").unwrap(), "hi");
    }

    #[test]
    fn missing_field_message() {
        let err = fields(r#"{"type": "add"}"#).require_i64("num1").unwrap_err();
        assert_eq!(err.to_string(), "Field num1 does not exist in request");
    }

    #[test]
    fn wrong_type_messages() {
        let f = fields(r#"{"type": "x", "data": 3, "n": 1.5, "q": -1, "b": "yes"}"#);
        assert_eq!(
            f.require_str("data").unwrap_err().to_string(),
            "Field data needs to be of type: String"
        );
        assert_eq!(
            f.require_i64("n").unwrap_err().to_string(),
            "Field n needs to be of type: int"
        );
        assert!(f.require_u64("q").is_err());
        assert!(f.optional_bool("b").is_err());
        assert_eq!(f.optional_bool("absent").unwrap(), None);
    }

    #[test]
    fn integer_arrays() {
        let f = fields(r#"{"type": "x", "good": [1, -2, 3], "bad": [1, "2"], "empty": []}"#);
        assert_eq!(f.require_i64_array("good").unwrap(), vec![1, -2, 3]);
        assert_eq!(
            f.require_i64_array("bad").unwrap_err(),
            ProtocolError::NonIntegerElement
        );
        assert!(f.require_i64_array("empty").unwrap().is_empty());
    }
}
