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

//! Session configuration: the knobs a shell can set on a session, and the
//! server-side and client-side wrappers around them.
//!
//! # Examples
//!
//! ```
//! use telnetkit_session::SessionOptions;
//! use std::time::Duration;
//!
//! let options = SessionOptions::default()
//!     .with_timeout(Duration::from_secs(300))
//!     .with_term("xterm-256color")
//!     .with_window_size(132, 43);
//! ```

use std::net::SocketAddr;
use std::time::Duration;

/// Default soft limit, in bytes, on how much unconsumed data a [`crate::TelnetReader`]
/// will buffer before applying backpressure to the decode loop.
pub const DEFAULT_READ_LIMIT: usize = 65536;

/// Default idle timeout applied to a session even if the shell never calls
/// a `set_timeout`-style override.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Default window used to stagger simultaneous reconnect/retry attempts.
const DEFAULT_CONNECT_MINWAIT: Duration = Duration::from_millis(250);
const DEFAULT_CONNECT_MAXWAIT: Duration = Duration::from_secs(5);

/// Options shared by every session, regardless of whether it was accepted by
/// a server or opened by a client.
///
/// Fields here mirror what a shell can ask the session to negotiate or
/// enforce: the reader's byte limit, the idle timeout, and the values this
/// side volunteers for TTYPE/NAWS/TSPEED/XDISPLOC/CHARSET when the peer asks.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOptions {
    pub(crate) limit: usize,
    pub(crate) timeout: Duration,
    pub(crate) connect_minwait: Duration,
    pub(crate) connect_maxwait: Duration,
    pub(crate) term: Option<String>,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) xdisploc: Option<String>,
    pub(crate) tspeed: Option<(u32, u32)>,
    pub(crate) lang: Option<String>,
}

impl SessionOptions {
    /// Soft limit on buffered, unconsumed reader bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Idle timeout applied to this session.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Minimum backoff wait before a connect retry.
    pub fn connect_minwait(&self) -> Duration {
        self.connect_minwait
    }

    /// Maximum backoff wait before a connect retry.
    pub fn connect_maxwait(&self) -> Duration {
        self.connect_maxwait
    }

    /// Terminal type this side will report in answer to a TTYPE SEND.
    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    /// Window size this side starts with, before any NAWS update arrives.
    pub fn window_size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// X display location this side will report in answer to an XDISPLOC SEND.
    pub fn xdisploc(&self) -> Option<&str> {
        self.xdisploc.as_deref()
    }

    /// Transmit/receive baud rate this side will report in answer to a TSPEED SEND.
    pub fn tspeed(&self) -> Option<(u32, u32)> {
        self.tspeed
    }

    /// Language this side prefers, offered first in a CHARSET REQUEST.
    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    /// Sets the soft read-buffer limit.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the idle timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the connect retry backoff window.
    pub fn with_connect_backoff(mut self, minwait: Duration, maxwait: Duration) -> Self {
        self.connect_minwait = minwait;
        self.connect_maxwait = maxwait;
        self
    }

    /// Sets the terminal type volunteered for TTYPE.
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    /// Sets the window size volunteered for NAWS.
    pub fn with_window_size(mut self, cols: u16, rows: u16) -> Self {
        self.cols = cols;
        self.rows = rows;
        self
    }

    /// Sets the X display location volunteered for XDISPLOC.
    pub fn with_xdisploc(mut self, location: impl Into<String>) -> Self {
        self.xdisploc = Some(location.into());
        self
    }

    /// Sets the transmit/receive baud rate volunteered for TSPEED.
    pub fn with_tspeed(mut self, transmit: u32, receive: u32) -> Self {
        self.tspeed = Some((transmit, receive));
        self
    }

    /// Sets the preferred language/charset offered in CHARSET negotiation.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            limit: DEFAULT_READ_LIMIT,
            timeout: DEFAULT_IDLE_TIMEOUT,
            connect_minwait: DEFAULT_CONNECT_MINWAIT,
            connect_maxwait: DEFAULT_CONNECT_MAXWAIT,
            term: None,
            cols: 80,
            rows: 24,
            xdisploc: None,
            tspeed: None,
            lang: None,
        }
    }
}

/// Configuration for a listening server: the bind policy plus the
/// [`SessionOptions`] applied to every accepted connection.
#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    options: SessionOptions,
    bind_address: SocketAddr,
    max_connections: usize,
}

impl ServerConfig {
    /// Creates a server configuration bound to `bind_address` with default
    /// session options and no connection limit.
    pub fn new(bind_address: SocketAddr) -> Self {
        ServerConfig {
            options: SessionOptions::default(),
            bind_address,
            max_connections: usize::MAX,
        }
    }

    /// The address the listener binds to.
    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// The maximum number of concurrent sessions this server will accept.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// The session options applied to every accepted connection.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Replaces the session options applied to every accepted connection.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Caps the number of concurrently accepted sessions.
    pub fn with_max_connections(mut self, max: usize) -> Self {
        self.max_connections = max;
        self
    }
}

/// Configuration for an outgoing connection: the remote address plus the
/// [`SessionOptions`] applied once connected.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    options: SessionOptions,
    host: String,
    port: u16,
    connect_timeout: Duration,
}

impl ClientConfig {
    /// Creates a client configuration for `host:port` with default session
    /// options and a 10 second connect timeout.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ClientConfig {
            options: SessionOptions::default(),
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Remote host name or address.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Remote port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// How long `connect` waits for the TCP handshake before giving up.
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// The session options applied once connected.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Replaces the session options applied once connected.
    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_builder_overrides_defaults() {
        let options = SessionOptions::default()
            .with_limit(1024)
            .with_timeout(Duration::from_secs(30))
            .with_term("xterm")
            .with_window_size(132, 43)
            .with_xdisploc("host:0.0")
            .with_tspeed(38400, 38400)
            .with_lang("en-US");

        assert_eq!(options.limit(), 1024);
        assert_eq!(options.timeout(), Duration::from_secs(30));
        assert_eq!(options.term(), Some("xterm"));
        assert_eq!(options.window_size(), (132, 43));
        assert_eq!(options.xdisploc(), Some("host:0.0"));
        assert_eq!(options.tspeed(), Some((38400, 38400)));
        assert_eq!(options.lang(), Some("en-US"));
    }

    #[test]
    fn default_options_match_documented_fallbacks() {
        let options = SessionOptions::default();
        assert_eq!(options.limit(), DEFAULT_READ_LIMIT);
        assert_eq!(options.timeout(), DEFAULT_IDLE_TIMEOUT);
        assert_eq!(options.window_size(), (80, 24));
    }

    #[test]
    fn server_config_defaults_to_unbounded_connections() {
        let addr: SocketAddr = "127.0.0.1:2323".parse().unwrap();
        let config = ServerConfig::new(addr);
        assert_eq!(config.bind_address(), addr);
        assert_eq!(config.max_connections(), usize::MAX);
    }

    #[test]
    fn client_config_builder_sets_connect_timeout() {
        let config = ClientConfig::new("example.com", 2323).with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.host(), "example.com");
        assert_eq!(config.port(), 2323);
        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    }
}
