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

//! # Telnet Client
//!
//! Opens an outgoing connection, runs a [`telnetkit_session::Shell`] over it,
//! and retries on failure according to a [`ReconnectPolicy`].
//!
//! # Example
//!
//! ```no_run
//! use telnetkit_client::{connect, ClientSettings, ReconnectPolicy};
//! use telnetkit_session::{SessionHandler, TelnetReader, TelnetWriter};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl SessionHandler for Echo {}
//!
//! # async fn run() -> telnetkit_client::Result<()> {
//! let settings = ClientSettings::new("localhost", 2323).with_reconnect(
//!     ReconnectPolicy::retrying(Some(5), Duration::from_millis(250), Duration::from_secs(5)),
//! );
//! connect(settings, Arc::new(Echo), Box::new(|mut reader: TelnetReader, writer: TelnetWriter| async move {
//!     loop {
//!         let line = reader.read_line().await.map_err(|e| e.to_string())?;
//!         if line.is_empty() {
//!             return Ok(());
//!         }
//!         writer.write(&line).await.map_err(|e| e.to_string())?;
//!     }
//! }))
//! .await
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms, future_incompatible)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;

pub use config::{ClientSettings, ReconnectPolicy};
pub use error::{ClientError, Result};

use std::sync::Arc;
use std::time::Instant;
use telnetkit_session::{Role, SessionHandler, Shell, run_session};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{info, instrument, warn};

/// Connects to the configured host and runs `shell` over the session,
/// retrying according to `settings`' [`ReconnectPolicy`] if the attempt
/// fails before the shell ever runs.
///
/// A connection that is established and later ends (cleanly or with a
/// session error) is NOT retried; `shell` alone decides whether a session
/// was successful. Only connect-time failures (refused, timed out) are
/// subject to the reconnect policy, matching how a user expects "retry the
/// connection" versus "retry my whole conversation" to behave.
#[instrument(skip(settings, handler, shell), fields(host = settings.client_config().host(), port = settings.client_config().port()))]
pub async fn connect<H>(settings: ClientSettings, handler: Arc<H>, shell: Box<dyn Shell>) -> Result<()>
where
    H: SessionHandler,
{
    let started = Instant::now();
    let policy = settings.reconnect_policy().clone();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        match try_connect_once(&settings).await {
            Ok(stream) => {
                info!(attempt, "connected");
                return run_session(stream, settings.client_config().options().clone(), Role::Client, handler, shell)
                    .await
                    .map_err(ClientError::from);
            }
            Err(err) if policy.is_enabled() => {
                if let Some(max) = policy.max_attempts() {
                    if attempt >= max {
                        return Err(ClientError::ReconnectExhausted {
                            attempts: attempt,
                            elapsed: started.elapsed(),
                        });
                    }
                }
                let wait = policy.backoff(attempt);
                warn!(attempt, ?wait, "connect failed, retrying: {err}");
                tokio::time::sleep(wait).await;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn try_connect_once(settings: &ClientSettings) -> Result<TcpStream> {
    let config = settings.client_config();
    let addr = (config.host(), config.port());
    match timeout(config.connect_timeout(), TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(err)) => Err(ClientError::Connect(err)),
        Err(_) => Err(ClientError::ConnectTimeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use telnetkit_session::{TelnetReader, TelnetWriter};
    use tokio::net::TcpListener;

    struct NoopHandler;

    #[async_trait]
    impl SessionHandler for NoopHandler {}

    #[tokio::test]
    async fn connect_succeeds_against_a_listening_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = listener.accept().await;
        });

        let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
        let shell: Box<dyn Shell> =
            Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
        let result = connect(settings, Arc::new(NoopHandler), shell).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn connect_without_reconnect_fails_fast_on_refused() {
        // Port 0 never accepts; binding and immediately dropping frees the
        // port back up so the following connect is refused.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = ClientSettings::new(addr.ip().to_string(), addr.port());
        let shell: Box<dyn Shell> =
            Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
        let result = connect(settings, Arc::new(NoopHandler), shell).await;
        assert!(matches!(result, Err(ClientError::Connect(_))));
    }

    #[tokio::test]
    async fn reconnect_policy_gives_up_after_max_attempts() {
        use std::time::Duration;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = ClientSettings::new(addr.ip().to_string(), addr.port()).with_reconnect(
            ReconnectPolicy::retrying(Some(2), Duration::from_millis(1), Duration::from_millis(2)),
        );
        let shell: Box<dyn Shell> =
            Box::new(|_reader: TelnetReader, _writer: TelnetWriter| async { Ok(()) });
        let result = connect(settings, Arc::new(NoopHandler), shell).await;
        match result {
            Err(ClientError::ReconnectExhausted { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected ReconnectExhausted, got {other:?}"),
        }
    }
}
