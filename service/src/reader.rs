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

//! [`TelnetReader`]: a shell's handle onto the decoded data-byte stream of a
//! session, backed by a buffer the decode loop fills and a shell drains.
//!
//! The decode loop and the shell run as separate tasks; this is the
//! producer/consumer boundary between them. [`Notify`] wakes a blocked
//! reader when bytes (or end-of-stream) arrive, and wakes a blocked
//! producer once the consumer has freed buffer space.

use crate::error::{Result, SessionError};
use crate::info::SessionInfo;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

const CR: u8 = 0x0D;
const LF: u8 = 0x0A;
const NUL: u8 = 0x00;

struct ReaderState {
    buf: Vec<u8>,
    eof: bool,
    /// Set while a `read(-1)` call is waiting for end-of-stream. `push`
    /// ignores `limit` in this state, since the only consumer left is one
    /// that has already promised to drain the whole buffer regardless of
    /// size — otherwise a producer stalled at `limit` and a `read(-1)` that
    /// only drains at EOF would deadlock each other.
    unbounded_pending: bool,
}

/// Shared buffer a session's decode loop writes into and a shell reads from.
pub(crate) struct ReaderChannel {
    state: Mutex<ReaderState>,
    has_data: Notify,
    has_space: Notify,
    limit: usize,
}

impl ReaderChannel {
    pub(crate) fn new(limit: usize) -> Arc<Self> {
        Arc::new(ReaderChannel {
            state: Mutex::new(ReaderState { buf: Vec::new(), eof: false, unbounded_pending: false }),
            has_data: Notify::new(),
            has_space: Notify::new(),
            limit,
        })
    }

    /// Appends decoded data bytes, blocking (yielding to other tasks) while
    /// the buffer sits at or above the limit. The decode loop calls this one
    /// `TelnetEvent::Data` byte at a time.
    pub(crate) async fn push(&self, byte: u8) {
        loop {
            {
                let mut state = self.state.lock().await;
                if self.limit == 0 || state.buf.len() < self.limit || state.unbounded_pending {
                    state.buf.push(byte);
                    drop(state);
                    self.has_data.notify_waiters();
                    return;
                }
            }
            self.has_space.notified().await;
        }
    }

    /// Marks the stream ended; every pending and future read unblocks.
    pub(crate) async fn close(&self) {
        self.state.lock().await.eof = true;
        self.has_data.notify_waiters();
        self.has_space.notify_waiters();
    }
}

/// A shell's handle onto a session's decoded byte stream.
///
/// `TelnetReader` never touches the wire directly — it drains a buffer the
/// session's decode loop fills, so IAC escaping, option negotiation, and
/// subnegotiation framing are already stripped out of everything it yields.
pub struct TelnetReader {
    channel: Arc<ReaderChannel>,
    info: SessionInfo,
}

impl TelnetReader {
    pub(crate) fn new(channel: Arc<ReaderChannel>, info: SessionInfo) -> Self {
        TelnetReader { channel, info }
    }

    /// This session's negotiated metadata: peer address, terminal
    /// capabilities, and the values last reported for TTYPE/NAWS/TSPEED/
    /// XDISPLOC/CHARSET.
    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    /// Reads up to `n` bytes, returning fewer only at end-of-stream.
    /// `n < 0` reads until end-of-stream, ignoring the configured limit.
    pub async fn read(&mut self, n: isize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        if n < 0 {
            {
                let mut state = self.channel.state.lock().await;
                state.unbounded_pending = true;
            }
            self.channel.has_space.notify_waiters();
            loop {
                let mut state = self.channel.state.lock().await;
                if state.eof {
                    state.unbounded_pending = false;
                    let out = std::mem::take(&mut state.buf);
                    drop(state);
                    self.channel.has_space.notify_waiters();
                    return Ok(out);
                }
                drop(state);
                self.channel.has_data.notified().await;
            }
        }
        let want = n as usize;
        loop {
            let mut state = self.channel.state.lock().await;
            if !state.buf.is_empty() || state.eof {
                let take = want.min(state.buf.len());
                let out = state.buf.drain(..take).collect();
                let drained_any = take > 0;
                drop(state);
                if drained_any {
                    self.channel.has_space.notify_waiters();
                }
                return Ok(out);
            }
            drop(state);
            self.channel.has_data.notified().await;
        }
    }

    /// Reads exactly `n` bytes, or fails with [`SessionError::IncompleteRead`]
    /// if end-of-stream arrives first.
    pub async fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        loop {
            let mut state = self.channel.state.lock().await;
            if state.buf.len() >= n {
                let out = state.buf.drain(..n).collect();
                drop(state);
                self.channel.has_space.notify_waiters();
                return Ok(out);
            }
            if state.eof {
                let partial = std::mem::take(&mut state.buf);
                return Err(SessionError::IncompleteRead { partial, expected: n });
            }
            drop(state);
            self.channel.has_data.notified().await;
        }
    }

    /// Reads one line, applying RFC 854's CR handling: `CRLF` and a bare
    /// `LF` both terminate and are kept in the returned bytes; `CR NUL`
    /// terminates with the `NUL` dropped and the `CR` kept; a bare `CR` not
    /// followed by `LF` or `NUL` terminates on its own.
    pub async fn read_line(&mut self) -> Result<Vec<u8>> {
        loop {
            let mut state = self.channel.state.lock().await;
            if let Some(end) = scan_line_end(&state.buf, state.eof) {
                match end {
                    LineEnd::Through(len) => {
                        let out = state.buf.drain(..len).collect();
                        drop(state);
                        self.channel.has_space.notify_waiters();
                        return Ok(out);
                    }
                    LineEnd::DropNul(len) => {
                        let mut out: Vec<u8> = state.buf.drain(..len + 1).collect();
                        out.truncate(len);
                        drop(state);
                        self.channel.has_space.notify_waiters();
                        return Ok(out);
                    }
                }
            }
            if state.eof {
                let out = std::mem::take(&mut state.buf);
                return Ok(out);
            }
            drop(state);
            self.channel.has_data.notified().await;
        }
    }

    /// Reads up through and including the first occurrence of `sep`.
    pub async fn read_until(&mut self, sep: u8) -> Result<Vec<u8>> {
        loop {
            let mut state = self.channel.state.lock().await;
            if let Some(pos) = state.buf.iter().position(|&b| b == sep) {
                let out = state.buf.drain(..=pos).collect();
                drop(state);
                self.channel.has_space.notify_waiters();
                return Ok(out);
            }
            if state.eof {
                let partial = std::mem::take(&mut state.buf);
                return Err(SessionError::IncompleteRead {
                    expected: partial.len() + 1,
                    partial,
                });
            }
            if self.channel.limit != 0 && state.buf.len() >= self.channel.limit {
                let limit = self.channel.limit;
                drop(state);
                return Err(SessionError::LimitOverrun { limit });
            }
            drop(state);
            self.channel.has_data.notified().await;
        }
    }
}

enum LineEnd {
    /// Drain and return `buf[..len]` verbatim; `len` includes the terminator.
    Through(usize),
    /// Drain `len + 1` bytes (the CR plus the NUL) but return only `buf[..len]`.
    DropNul(usize),
}

fn scan_line_end(buf: &[u8], eof: bool) -> Option<LineEnd> {
    let mut i = 0;
    while i < buf.len() {
        match buf[i] {
            LF => return Some(LineEnd::Through(i + 1)),
            CR => match buf.get(i + 1) {
                Some(&LF) => return Some(LineEnd::Through(i + 2)),
                Some(&NUL) => return Some(LineEnd::DropNul(i + 1)),
                Some(_) => return Some(LineEnd::Through(i + 1)),
                None if eof => return Some(LineEnd::Through(i + 1)),
                None => return None,
            },
            _ => i += 1,
        }
    }
    None
}
