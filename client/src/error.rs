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

//! Errors raised while connecting to or running a client session.

use std::time::Duration;
use thiserror::Error;

/// Failures that can end a client's attempt to reach or stay connected to a
/// server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The TCP handshake itself failed.
    #[error("connect failed: {0}")]
    Connect(#[source] std::io::Error),

    /// The TCP handshake did not complete within the configured timeout.
    #[error("connect timed out")]
    ConnectTimeout,

    /// A session ran to completion but ended in an error.
    #[error("session error: {0}")]
    Session(#[from] telnetkit_session::SessionError),

    /// Every configured reconnect attempt was exhausted.
    #[error("gave up after {attempts} reconnect attempts over {elapsed:?}")]
    ReconnectExhausted {
        /// Number of connect attempts made, including the first.
        attempts: u32,
        /// Total wall-clock time spent across all attempts.
        elapsed: Duration,
    },
}

/// Convenience alias for client results.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconnect_exhausted_formats_attempts_and_elapsed() {
        let err = ClientError::ReconnectExhausted {
            attempts: 4,
            elapsed: Duration::from_secs(12),
        };
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn connect_io_error_wraps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ClientError::Connect(io_err);
        assert!(err.to_string().contains("connect failed"));
    }
}
