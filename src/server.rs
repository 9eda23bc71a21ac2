use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::frame::{FrameReader, FrameWriter, DEFAULT_MAX_FRAME_LEN};
use crate::registry::{ConnectionState, Registry};
use crate::store::Store;
use crate::thread_pool::ThreadPool;
use crate::{Result, SockError};

/// Tunables for a [`SockServer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    /// Largest request frame accepted before the connection is dropped.
    pub max_frame_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// The request server.
///
/// Generic over the thread pool `P` that runs one job per connection.
pub struct SockServer<P: ThreadPool> {
    registry: Arc<Registry>,
    store: Store,
    pool: P,
    config: ServerConfig,
}

impl<P: ThreadPool> SockServer<P> {
    /// Creates a server with the built-in handlers and a fresh store.
    pub fn new(pool: P) -> Self {
        Self::with_parts(Registry::standard(), Store::new(), pool)
    }

    /// Creates a server from an explicit registry and store.
    pub fn with_parts(registry: Registry, store: Store, pool: P) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
            pool,
            config: ServerConfig::default(),
        }
    }

    /// Replaces the server configuration.
    pub fn with_config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// A handle to the shared store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Binds `addr` and serves connections until accepting fails.
    pub fn serve(&self, addr: impl ToSocketAddrs) -> Result<()> {
        self.run(TcpListener::bind(addr)?)
    }

    /// Serves connections from an already bound listener.
    ///
    /// Each connection is dispatched to the thread pool for handling. A
    /// connection the pool cannot take is closed and the loop keeps going.
    pub fn run(&self, listener: TcpListener) -> Result<()> {
        info!("Listening on {}", listener.local_addr()?);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let registry = Arc::clone(&self.registry);
                    let store = self.store.clone();
                    let config = self.config;
                    let scheduled = self.pool.spawn(move || {
                        if let Err(e) = handle_connection(&registry, store, config, stream) {
                            error!("Error handling connection: {}", e);
                        }
                    });
                    if let Err(e) = scheduled {
                        error!("Failed to schedule connection: {}", e);
                    }
                }
                Err(e) => error!("Connection failed: {}", e),
            }
        }

        Ok(())
    }
}

/// Serves one client until it disconnects.
///
/// Requests are answered strictly in order, one response per request. Any
/// transport error ends the connection; the player's session stays in the
/// store until that player quits.
fn handle_connection(
    registry: &Registry,
    store: Store,
    config: ServerConfig,
    stream: TcpStream,
) -> Result<()> {
    let peer_addr = stream.peer_addr()?;
    debug!("Accepted connection from {}", peer_addr);

    let mut reader = FrameReader::new(&stream).with_max_len(config.max_frame_len);
    let mut writer = FrameWriter::new(&stream);
    let mut conn = ConnectionState::new(store);

    loop {
        let message = match reader.read_message() {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(e @ (SockError::FrameTooLarge { .. } | SockError::InvalidUtf8(_))) => {
                warn!("Dropping {}: {}", peer_addr, e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        debug!("Received request from {}: {}", peer_addr, message);

        let response = registry.dispatch(&message, &mut conn);
        writer.write_message(&serde_json::to_string(&response)?)?;
    }

    debug!("Connection from {} closed", peer_addr);
    Ok(())
}
