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

//! Session-layer error type.
//!
//! Unlike [`telnetkit_codec::CodecError`], which the codec discards on its
//! own (malformed negotiation and subnegotiation framing are logged and
//! dropped, never surfaced), every [`SessionError`] variant here is fatal to
//! the session: once one occurs the run loop tears the connection down.

use thiserror::Error;

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Fatal errors that can end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The underlying socket failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A `read_exact`/`read_line`/`read_until` call hit end-of-stream before
    /// its condition was satisfied.
    #[error("incomplete read: needed {expected} bytes, stream ended with {actual} buffered", actual = partial.len())]
    IncompleteRead {
        /// Bytes collected before end-of-stream.
        partial: Vec<u8>,
        /// Bytes the call was waiting for.
        expected: usize,
    },

    /// A bounded read accumulated more than the reader's configured limit
    /// without finding its terminator.
    #[error("read exceeded the {limit} byte buffering limit")]
    LimitOverrun {
        /// The limit that was exceeded.
        limit: usize,
    },

    /// The session's idle timeout elapsed with no activity.
    #[error("session idle timeout after {0:?}")]
    Timeout(std::time::Duration),

    /// The shell task returned an error, or panicked.
    #[error("shell error: {0}")]
    Shell(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_read_reports_bytes_collected() {
        let err = SessionError::IncompleteRead {
            partial: vec![1, 2, 3],
            expected: 10,
        };
        assert_eq!(err.to_string(), "incomplete read: needed 10 bytes, stream ended with 3 buffered");
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: SessionError = io_err.into();
        assert!(matches!(err, SessionError::Io(_)));
    }
}
