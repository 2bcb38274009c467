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

//! [`TelnetWriterUnicode`]: a text-oriented [`TelnetWriter`] wrapper whose
//! encoding callback can be swapped mid-stream, mirroring
//! [`crate::TelnetReaderUnicode`] on the outbound side.

use crate::error::Result;
use crate::info::SessionInfo;
use crate::writer::TelnetWriter;

/// Encodes `text` to the bytes that go out on the wire.
pub type Encoder = Box<dyn FnMut(&str) -> Vec<u8> + Send>;

/// A UTF-8 encoder: `text.as_bytes()` verbatim.
pub fn utf8_encoder() -> Encoder {
    Box::new(|text: &str| text.as_bytes().to_vec())
}

/// A shell's handle onto a session's outbound text stream.
///
/// Wraps a [`TelnetWriter`], running every string the shell hands it through
/// an [`Encoder`] first. CHARSET negotiation accepting a new encoding calls
/// [`Self::set_encoder`] rather than rebuilding the writer.
pub struct TelnetWriterUnicode {
    writer: TelnetWriter,
    encode: Encoder,
}

impl TelnetWriterUnicode {
    /// Wraps `writer`, encoding with [`utf8_encoder`].
    pub fn new(writer: TelnetWriter) -> Self {
        Self::with_encoder(writer, utf8_encoder())
    }

    /// Wraps `writer`, encoding with a caller-supplied callback.
    pub fn with_encoder(writer: TelnetWriter, encode: Encoder) -> Self {
        TelnetWriterUnicode { writer, encode }
    }

    /// This session's negotiated metadata.
    pub fn info(&self) -> &SessionInfo {
        self.writer.info()
    }

    /// Installs a new encoding callback, e.g. after a CHARSET negotiation
    /// accepts a new encoding. Takes effect starting with the next write.
    pub fn set_encoder(&mut self, encode: Encoder) {
        self.encode = encode;
    }

    /// Encodes and enqueues `text`.
    pub async fn write(&mut self, text: &str) -> Result<()> {
        let bytes = (self.encode)(text);
        self.writer.write(&bytes).await
    }

    /// Encodes and enqueues `line`, applying the same CRLF/CR-NUL handling
    /// as [`TelnetWriter::write_line`].
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        let bytes = (self.encode)(line);
        self.writer.write_line(&bytes).await
    }

    /// Writes each item in `lines` as its own terminated line.
    pub async fn write_lines<I, L>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<str>,
    {
        for line in lines {
            self.write_line(line.as_ref()).await?;
        }
        Ok(())
    }

    /// Waits until every message enqueued before this call has been handed
    /// to the socket.
    pub async fn drain(&self) -> Result<()> {
        self.writer.drain().await
    }

    /// Requests the session close the connection once queued writes flush.
    pub async fn close(&self) -> Result<()> {
        self.writer.close().await
    }
}
