//! Dispatch from a request `type` to its handler.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};

use crate::request::{self, Fields, FromFields, Request};
use crate::store::{ConnectionId, Store};
use crate::{ProtocolError, Response};

type HandlerFn =
    Box<dyn Fn(&Fields, &mut ConnectionState) -> Result<Response, ProtocolError> + Send + Sync>;

/// State owned by one client connection.
pub struct ConnectionState {
    id: ConnectionId,
    store: Store,
    player: Option<String>,
}

impl ConnectionState {
    /// Creates the state for a new connection sharing `store`.
    pub fn new(store: Store) -> Self {
        Self {
            id: store.next_connection_id(),
            store,
            player: None,
        }
    }

    /// Id that marks the sessions this connection owns.
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The shared store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Name of the player this connection registered, if any.
    pub fn player(&self) -> Option<&str> {
        self.player.as_deref()
    }

    /// Binds `name` to this connection, returning the previous name.
    pub fn bind_player(&mut self, name: String) -> Option<String> {
        self.player.replace(name)
    }

    /// Unbinds and returns the player name.
    pub fn take_player(&mut self) -> Option<String> {
        self.player.take()
    }
}

/// Maps request types to handlers.
///
/// Lookup is an exact, case-sensitive match on the `type` string.
#[derive(Default)]
pub struct Registry {
    handlers: HashMap<&'static str, HandlerFn>,
}

impl Registry {
    /// Creates a registry with no handlers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with every built-in handler.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_all(&mut registry);
        registry
    }

    /// Registers `handler` for requests of type `kind`.
    ///
    /// The request fields are converted to `R` before the handler runs, so a
    /// missing or mistyped field never reaches the handler body. A later
    /// registration for the same `kind` replaces the earlier one.
    pub fn register<R, F>(&mut self, kind: &'static str, handler: F) -> &mut Self
    where
        R: FromFields + 'static,
        F: Fn(R, &mut ConnectionState) -> Result<Response, ProtocolError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            kind,
            Box::new(move |fields: &Fields, conn: &mut ConnectionState| {
                handler(R::from_fields(fields)?, conn)
            }),
        );
        self
    }

    /// Registered request types, sorted.
    pub fn kinds(&self) -> Vec<&'static str> {
        let mut kinds: Vec<_> = self.handlers.keys().copied().collect();
        kinds.sort_unstable();
        kinds
    }

    /// Handles one raw message and always produces a response.
    pub fn dispatch(&self, raw: &str, conn: &mut ConnectionState) -> Response {
        match request::parse(raw).and_then(|request| self.handle(&request, conn)) {
            Ok(response) => response,
            Err(err) => {
                debug!("Rejected request: {}", err);
                err.into()
            }
        }
    }

    /// Runs the handler for an already parsed request.
    pub fn handle(
        &self,
        request: &Request,
        conn: &mut ConnectionState,
    ) -> Result<Response, ProtocolError> {
        let kind = request.kind();
        let handler = self
            .handlers
            .get(kind)
            .ok_or_else(|| ProtocolError::UnsupportedType(kind.to_owned()))?;

        panic::catch_unwind(AssertUnwindSafe(|| handler(request.fields(), conn))).unwrap_or_else(
            |_| {
                error!("Handler for {} panicked", kind);
                Err(ProtocolError::Internal(kind.to_owned()))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Shout {
        text: String,
    }

    impl FromFields for Shout {
        fn from_fields(fields: &Fields) -> Result<Self, ProtocolError> {
            Ok(Self {
                text: fields.require_str("text")?.to_owned(),
            })
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register("shout", |req: Shout, _conn: &mut ConnectionState| {
                Ok(Response::success("shout").with("text", req.text.to_uppercase()))
            })
            .register("boom", |_: (), _conn: &mut ConnectionState| {
                panic!("handler bug")
            });
        registry
    }

    fn dispatch(registry: &Registry, raw: &str) -> serde_json::Value {
        let mut conn = ConnectionState::new(Store::new());
        serde_json::to_value(registry.dispatch(raw, &mut conn)).unwrap()
    }

    #[test]
    fn dispatches_by_exact_type() {
        let registry = registry();
        assert_eq!(
            dispatch(&registry, r#"{"type":"shout","text":"hi"}"#),
            json!({"ok": true, "type": "shout", "text": "HI"})
        );
        assert_eq!(
            dispatch(&registry, r#"{"type":"SHOUT","text":"hi"}"#),
            json!({"ok": false, "message": "Type SHOUT is not supported."})
        );
    }

    #[test]
    fn validation_runs_before_handler() {
        assert_eq!(
            dispatch(&registry(), r#"{"type":"shout"}"#),
            json!({"ok": false, "message": "Field text does not exist in request"})
        );
    }

    #[test]
    fn malformed_input_is_reported() {
        let registry = registry();
        assert_eq!(
            dispatch(&registry, "Invalid JSON"),
            json!({"ok": false, "message": "req not JSON"})
        );
        assert_eq!(
            dispatch(&registry, r#"{"text":"hi"}"#),
            json!({"ok": false, "message": "No request type was given."})
        );
    }

    #[test]
    fn panicking_handler_becomes_error_response() {
        panic_control::disable_hook_in_current_thread();
        assert_eq!(
            dispatch(&registry(), r#"{"type":"boom"}"#),
            json!({"ok": false, "message": "Internal error while handling boom request"})
        );
    }

    #[test]
    fn kinds_are_sorted() {
        assert_eq!(registry().kinds(), vec!["boom", "shout"]);
    }
}
