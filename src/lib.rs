#![deny(missing_docs)]

//! A JSON request server over length-prefixed TCP frames.
//!
//! Each request is a JSON object whose `type` selects a handler: echo and
//! arithmetic utilities, a shared inventory, and a movie-guessing game with
//! per-player sessions. Every request gets exactly one JSON response, and
//! malformed input is answered with an error response instead of closing the
//! connection.

mod client;
mod error;
pub mod frame;
pub mod game;
mod handlers;
pub mod registry;
pub mod request;
mod response;
mod server;
/// Shared inventory, sessions and leaderboard.
pub mod store;
/// Thread pool implementations for concurrent connection handling.
pub mod thread_pool;

pub use client::SockClient;
pub use error::{ProtocolError, Result, SockError};
pub use registry::{ConnectionState, Registry};
pub use response::Response;
pub use server::{ServerConfig, SockServer};
pub use store::Store;
pub use thread_pool::{NaiveThreadPool, SharedQueueThreadPool, ThreadPool};
