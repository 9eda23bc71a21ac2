//! Built-in request handlers.

mod game;
mod inventory;
mod utility;

use crate::registry::Registry;

/// Registers every built-in handler on `registry`.
pub fn register_all(registry: &mut Registry) {
    registry
        .register("echo", utility::echo)
        .register("add", utility::add)
        .register("addmany", utility::add_many)
        .register("charcount", utility::char_count)
        .register("inventory", inventory::inventory)
        .register("hello", game::hello)
        .register("set_name", game::set_name)
        .register("set_age", game::set_age)
        .register("leaderboard", game::leaderboard)
        .register("play", game::play)
        .register("guess", game::guess)
        .register("skip", game::skip)
        .register("next_hint", game::next_hint)
        .register("quit", game::quit);
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::Value;

    use crate::game::{Movie, MovieCatalog};
    use crate::registry::{ConnectionState, Registry};
    use crate::store::Store;

    /// A registry plus one connection, for driving handlers with raw JSON.
    pub struct Harness {
        pub registry: Registry,
        pub conn: ConnectionState,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_store(Store::new())
        }

        /// Uses a one-movie catalog so every round picks "Avatar".
        pub fn with_fixed_movie() -> Self {
            let catalog = MovieCatalog::new(vec![Movie::new(
                "Avatar",
                ["Blue aliens", "Pandora", "James Cameron", "2009"],
            )])
            .unwrap();
            Self::with_store(Store::with_catalog(catalog))
        }

        pub fn with_store(store: Store) -> Self {
            Self {
                registry: Registry::standard(),
                conn: ConnectionState::new(store),
            }
        }

        pub fn send(&mut self, raw: &str) -> Value {
            serde_json::to_value(self.registry.dispatch(raw, &mut self.conn)).unwrap()
        }
    }
}
