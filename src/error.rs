use std::io;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Error type for transport and server operations.
#[derive(Error, Debug)]
pub enum SockError {
    /// IO error on a socket or listener.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error.
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A peer announced a frame larger than the configured limit.
    #[error("Frame of {len} bytes exceeds the limit of {max} bytes")]
    FrameTooLarge {
        /// Announced payload length.
        len: usize,
        /// Configured maximum payload length.
        max: usize,
    },

    /// A frame payload was not valid UTF-8.
    #[error("Frame payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// A movie catalog was built without any movies.
    #[error("Movie catalog must contain at least one movie")]
    EmptyCatalog,

    /// The thread pool can no longer accept jobs.
    #[error("Thread pool has no active workers")]
    PoolClosed,

    /// Error with a string message.
    #[error("{0}")]
    StringError(String),
}

/// Result type alias for server operations.
pub type Result<T> = std::result::Result<T, SockError>;

/// A request-level failure.
///
/// These never close a connection: the `Display` text becomes the `message`
/// of an `ok:false` response, so the wording is part of the wire protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The frame did not contain JSON.
    #[error("req not JSON")]
    NotJson,

    /// The request had no `type` field.
    #[error("No request type was given.")]
    MissingType,

    /// No handler is registered for the request type.
    #[error("Type {0} is not supported.")]
    UnsupportedType(String),

    /// A required field is absent.
    #[error("Field {0} does not exist in request")]
    MissingField(String),

    /// A field is present but holds the wrong kind of value.
    #[error("Field {field} needs to be of type: {kind}")]
    WrongType {
        /// Name of the offending field.
        field: String,
        /// Human readable name of the expected kind.
        kind: &'static str,
    },

    /// An `addmany` element was not an integer.
    #[error("Values in array need to be ints")]
    NonIntegerElement,

    /// An arithmetic result left the 64-bit integer range.
    #[error("Result does not fit in a 64-bit integer")]
    Overflow,

    /// `findchar` was set but `find` is not a single character.
    #[error("Field find needs to be a single character string")]
    FindNotSingleChar,

    /// Unknown inventory `task`.
    #[error("Invalid inventory task")]
    InvalidTask,

    /// A `buy` named a product that was never added.
    #[error("Product {0} not in inventory")]
    UnknownProduct(String),

    /// A `buy` asked for more than the current stock.
    #[error("Product {product} not available in quantity {quantity}")]
    InsufficientStock {
        /// Product name.
        product: String,
        /// Requested quantity.
        quantity: u64,
    },

    /// A game request arrived before `set_name`.
    #[error("No active session. Send set_name first.")]
    NoSession,

    /// A game request is not valid in the session's current phase.
    #[error("{0}")]
    InvalidState(&'static str),

    /// A handler panicked.
    #[error("Internal error while handling {0} request")]
    Internal(String),
}
