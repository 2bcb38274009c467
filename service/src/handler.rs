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

//! The [`SessionHandler`] trait: notification hooks a shell implements to
//! learn about negotiated option values, and to answer the peer's CHARSET
//! and NEW-ENVIRON requests.
//!
//! Every method has a default no-op (or conservative) implementation, so a
//! handler only overrides what it cares about.
//!
//! # Example
//!
//! ```no_run
//! use telnetkit_session::SessionHandler;
//! use async_trait::async_trait;
//!
//! struct Logger;
//!
//! #[async_trait]
//! impl SessionHandler for Logger {
//!     async fn on_naws(&self, cols: u16, rows: u16) {
//!         println!("window resized to {cols}x{rows}");
//!     }
//! }
//! ```

use crate::writer::TelnetWriter;
use async_trait::async_trait;
use std::collections::HashMap;

/// Notification and negotiation-answer hooks for a session's shell.
#[async_trait]
pub trait SessionHandler: Send + Sync + 'static {
    /// The peer reported (or updated) its window size.
    async fn on_naws(&self, _cols: u16, _rows: u16) {}

    /// The peer reported its terminal type.
    async fn on_ttype(&self, _name: &str) {}

    /// The peer reported its X display location.
    async fn on_xdisploc(&self, _location: &str) {}

    /// The peer reported its transmit/receive baud rate.
    async fn on_tspeed(&self, _transmit: u32, _receive: u32) {}

    /// The peer reported environment variables, either unsolicited (INFO)
    /// or in answer to a SEND this side issued.
    async fn on_environ(&self, _vars: &HashMap<Vec<u8>, Vec<u8>>) {}

    /// The peer accepted a charset from a CHARSET REQUEST this side sent.
    async fn on_charset(&self, _name: &[u8]) {}

    /// The session's idle timeout elapsed. The default implementation
    /// writes a farewell line; the run loop closes the connection
    /// immediately afterward regardless of what this does.
    async fn on_timeout(&self, writer: &TelnetWriter) {
        let _ = writer.write(b"\r\nTimeout.\r\n").await;
    }

    /// The peer sent a CHARSET REQUEST; return the charset to accept from
    /// the offered list, or `None` to reject all of them. The default
    /// accepts the peer's first preference.
    async fn on_request_charset(&self, offered: &[Vec<u8>]) -> Option<Vec<u8>> {
        offered.first().cloned()
    }

    /// The peer sent a NEW-ENVIRON SEND for the named variables (empty means
    /// "report everything you have"); return the name/value pairs to answer
    /// with. The default reports nothing.
    async fn on_request_environ(&self, _names: &[Vec<u8>]) -> HashMap<Vec<u8>, Vec<u8>> {
        HashMap::new()
    }
}

/// A [`SessionHandler`] built from an `on_*` closure, for callers who only
/// care about one notification and don't want to name a type.
pub struct CallbackHandler<F> {
    on_naws: F,
}

impl<F> CallbackHandler<F>
where
    F: Fn(u16, u16) + Send + Sync + 'static,
{
    /// Builds a handler that only reacts to NAWS updates via `on_naws`.
    pub fn on_window_resize(on_naws: F) -> Self {
        CallbackHandler { on_naws }
    }
}

#[async_trait]
impl<F> SessionHandler for CallbackHandler<F>
where
    F: Fn(u16, u16) + Send + Sync + 'static,
{
    async fn on_naws(&self, cols: u16, rows: u16) {
        (self.on_naws)(cols, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Default_;

    #[async_trait]
    impl SessionHandler for Default_ {}

    #[tokio::test]
    async fn default_handler_accepts_first_offered_charset() {
        let handler = Default_;
        let offered = vec![b"UTF-8".to_vec(), b"ASCII".to_vec()];
        assert_eq!(handler.on_request_charset(&offered).await, Some(b"UTF-8".to_vec()));
    }

    #[tokio::test]
    async fn default_handler_reports_no_environment_variables() {
        let handler = Default_;
        assert!(handler.on_request_environ(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn callback_handler_invokes_closure_on_naws() {
        use std::sync::atomic::{AtomicU16, Ordering};
        use std::sync::Arc;

        let seen = Arc::new(AtomicU16::new(0));
        let seen_clone = seen.clone();
        let handler = CallbackHandler::on_window_resize(move |cols, _rows| {
            seen_clone.store(cols, Ordering::SeqCst);
        });
        handler.on_naws(132, 43).await;
        assert_eq!(seen.load(Ordering::SeqCst), 132);
    }
}
