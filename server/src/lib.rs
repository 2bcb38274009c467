//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! # Telnet Server
//!
//! Binds a listener, runs one [`telnetkit_session::run_session`] per
//! accepted connection, and tracks the live connection count against the
//! configured cap.
//!
//! # Example
//!
//! ```no_run
//! use telnetkit_server::TelnetServer;
//! use telnetkit_session::{SessionHandler, SessionOptions, ServerConfig};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl SessionHandler for Echo {}
//!
//! # async fn run() -> std::io::Result<()> {
//! let config = ServerConfig::new("127.0.0.1:2323".parse().unwrap());
//! let server = TelnetServer::bind(config).await?;
//! TelnetServer::serve(server.clone(), Arc::new(Echo), |_addr| {
//!     Box::new(|mut reader: telnetkit_session::TelnetReader, writer: telnetkit_session::TelnetWriter| async move {
//!         loop {
//!             let line = reader.read_line().await.map_err(|e| e.to_string())?;
//!             if line.is_empty() {
//!                 return Ok(());
//!             }
//!             writer.write(&line).await.map_err(|e| e.to_string())?;
//!         }
//!     })
//! })
//! .await;
//! server.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms, future_incompatible)]
#![allow(clippy::module_name_repetitions)]

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use telnetkit_session::{run_session, Role, ServerConfig, SessionHandler, Shell};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

/// A unique id assigned to each accepted connection for logging and lookup.
pub type ConnectionId = u64;

/// Builds the per-connection [`Shell`] a newly accepted session runs.
/// Receives the peer's address so a factory can vary behavior (or simply
/// log) per connection.
pub trait ShellFactory: Fn(SocketAddr) -> Box<dyn Shell> + Send + Sync + 'static {}
impl<F> ShellFactory for F where F: Fn(SocketAddr) -> Box<dyn Shell> + Send + Sync + 'static {}

/// A bound Telnet listener that runs one session per accepted connection.
pub struct TelnetServer {
    config: ServerConfig,
    listener: Mutex<TcpListener>,
    running: AtomicBool,
    shutdown: Notify,
    connections: DashMap<ConnectionId, SocketAddr>,
    next_id: AtomicU64,
    accept_task: Mutex<Option<JoinHandle<()>>>,
}

impl TelnetServer {
    /// Binds a listener at the address in `config`.
    pub async fn bind(config: ServerConfig) -> std::io::Result<Arc<Self>> {
        let listener = TcpListener::bind(config.bind_address()).await?;
        info!(address = %config.bind_address(), "telnet server bound");
        Ok(Arc::new(TelnetServer {
            config,
            listener: Mutex::new(listener),
            running: AtomicBool::new(false),
            shutdown: Notify::new(),
            connections: DashMap::new(),
            next_id: AtomicU64::new(1),
            accept_task: Mutex::new(None),
        }))
    }

    /// The address the listener is bound to.
    pub fn bind_address(&self) -> SocketAddr {
        self.config.bind_address()
    }

    /// The number of currently live sessions.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether the accept loop is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts accepting connections on `server`, spawning
    /// `shell_factory(peer_addr)` as the shell for each one. Returns once
    /// the accept loop has started; call [`Self::shutdown`] to stop it.
    ///
    /// Takes `server` by `Arc` (rather than `&self`) since the accept loop
    /// outlives this call, running on its own task.
    pub async fn serve<H, F>(server: Arc<Self>, handler: Arc<H>, shell_factory: F)
    where
        H: SessionHandler,
        F: ShellFactory,
    {
        server.running.store(true, Ordering::SeqCst);
        let accept_server = server.clone();
        let shell_factory = Arc::new(shell_factory);
        let handle = tokio::spawn(async move {
            accept_server.accept_loop(handler, shell_factory).await;
        });
        *server.accept_task.lock().await = Some(handle);
    }

    #[instrument(skip(self, handler, shell_factory))]
    async fn accept_loop<H, F>(self: Arc<Self>, handler: Arc<H>, shell_factory: Arc<F>)
    where
        H: SessionHandler,
        F: ShellFactory,
    {
        loop {
            let accepted = {
                let listener = self.listener.lock().await;
                tokio::select! {
                    biased;
                    () = self.shutdown.notified() => None,
                    result = listener.accept() => Some(result),
                }
            };
            let (stream, peer_addr) = match accepted {
                None => break,
                Some(Ok(pair)) => pair,
                Some(Err(err)) => {
                    warn!("accept failed: {err}");
                    continue;
                }
            };
            if self.connections.len() >= self.config.max_connections() {
                warn!(%peer_addr, "rejecting connection: at capacity");
                drop(stream);
                continue;
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            self.connections.insert(id, peer_addr);
            info!(%peer_addr, connection = id, "accepted connection");

            let server = self.clone();
            let handler = handler.clone();
            let shell = shell_factory(peer_addr);
            let options = self.config.options().clone();
            tokio::spawn(async move {
                run_one(stream, peer_addr, id, options, handler, shell).await;
                server.connections.remove(&id);
            });
        }
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stops accepting new connections and waits (up to 5 seconds) for the
    /// accept loop to notice. Already-running sessions are left to finish on
    /// their own.
    pub async fn shutdown(&self) {
        self.shutdown.notify_waiters();
        if let Some(handle) = self.accept_task.lock().await.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
    }
}

#[instrument(skip(stream, options, handler, shell), fields(%peer_addr, connection = id))]
async fn run_one<H: SessionHandler>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    id: ConnectionId,
    options: telnetkit_session::SessionOptions,
    handler: Arc<H>,
    shell: Box<dyn Shell>,
) {
    if let Err(err) = run_session(stream, options, Role::Server, handler, shell).await {
        warn!(%peer_addr, connection = id, "session ended: {err}");
    } else {
        info!(%peer_addr, connection = id, "session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoopHandler;

    #[async_trait]
    impl SessionHandler for NoopHandler {}

    #[tokio::test]
    async fn bind_picks_an_ephemeral_port() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
        let server = TelnetServer::bind(config).await.unwrap();
        assert_ne!(server.bind_address().port(), 0);
        assert!(!server.is_running());
    }

    #[tokio::test]
    async fn serve_then_shutdown_stops_accept_loop() {
        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap());
        let server = TelnetServer::bind(config).await.unwrap();
        TelnetServer::serve(server.clone(), Arc::new(NoopHandler), |_addr| {
            Box::new(|_reader: telnetkit_session::TelnetReader, _writer: telnetkit_session::TelnetWriter| async {
                Ok(())
            }) as Box<dyn Shell>
        })
        .await;
        assert!(server.is_running());
        server.shutdown().await;
        assert_eq!(server.connection_count(), 0);
    }
}
