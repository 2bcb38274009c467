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

//! [`TelnetReaderUnicode`]: a text-oriented [`TelnetReader`] wrapper whose
//! decoding callback can be swapped mid-stream, for sessions that renegotiate
//! CHARSET after the reader is already in use.

use crate::error::Result;
use crate::info::SessionInfo;
use crate::reader::TelnetReader;

/// Decodes as much of `bytes` into text as it can, returning the decoded
/// text and how many leading bytes it consumed. Bytes left unconsumed (a
/// truncated multi-byte sequence at the end of `bytes`) are held back and
/// prepended to the next call.
pub type Decoder = Box<dyn FnMut(&[u8]) -> (String, usize) + Send>;

/// A UTF-8 decoder: consumes every byte of a well-formed prefix, holds back
/// a truncated trailing sequence for the next call, and substitutes
/// [`char::REPLACEMENT_CHARACTER`] for bytes that are invalid outright.
pub fn utf8_decoder() -> Decoder {
    Box::new(|bytes: &[u8]| match std::str::from_utf8(bytes) {
        Ok(text) => (text.to_string(), bytes.len()),
        Err(err) => {
            let valid_up_to = err.valid_up_to();
            let mut text = String::from_utf8(bytes[..valid_up_to].to_vec()).expect("validated by from_utf8");
            match err.error_len() {
                Some(invalid_len) => {
                    text.push(char::REPLACEMENT_CHARACTER);
                    (text, valid_up_to + invalid_len)
                }
                None => (text, valid_up_to),
            }
        }
    })
}

/// A shell's handle onto a session's decoded text stream.
///
/// Wraps a [`TelnetReader`], running every batch of bytes it yields through
/// a [`Decoder`] before handing text to the shell. CHARSET renegotiation
/// (`on_charset`) doesn't reconstruct this reader, it calls [`Self::set_decoder`]
/// so the next read picks up the new encoding without losing bytes already
/// buffered from the old one.
pub struct TelnetReaderUnicode {
    reader: TelnetReader,
    decode: Decoder,
    pending: Vec<u8>,
}

impl TelnetReaderUnicode {
    /// Wraps `reader`, decoding with [`utf8_decoder`].
    pub fn new(reader: TelnetReader) -> Self {
        Self::with_decoder(reader, utf8_decoder())
    }

    /// Wraps `reader`, decoding with a caller-supplied callback.
    pub fn with_decoder(reader: TelnetReader, decode: Decoder) -> Self {
        TelnetReaderUnicode { reader, decode, pending: Vec::new() }
    }

    /// This session's negotiated metadata.
    pub fn info(&self) -> &SessionInfo {
        self.reader.info()
    }

    /// Installs a new decoding callback, e.g. after a CHARSET negotiation
    /// accepts a new encoding. Bytes already held back from an earlier,
    /// incomplete multi-byte sequence are decoded by whichever callback is
    /// installed at the next read, not retroactively.
    pub fn set_decoder(&mut self, decode: Decoder) {
        self.decode = decode;
    }

    fn decode_buffered(&mut self, bytes: Vec<u8>, flush: bool) -> String {
        self.pending.extend(bytes);
        let (mut text, consumed) = (self.decode)(&self.pending);
        self.pending.drain(..consumed);
        if flush && !self.pending.is_empty() {
            let leftover = std::mem::take(&mut self.pending);
            text.push_str(&String::from_utf8_lossy(&leftover));
        }
        text
    }

    /// Reads up to `n` characters' worth of bytes, returning fewer only at
    /// end-of-stream. `n < 0` reads until end-of-stream, ignoring the
    /// configured limit, and always flushes any held-back partial sequence.
    pub async fn read(&mut self, n: isize) -> Result<String> {
        let bytes = self.reader.read(n).await?;
        let flush = n < 0;
        Ok(self.decode_buffered(bytes, flush))
    }

    /// Reads exactly `n` bytes' worth and decodes them, holding back a
    /// truncated trailing sequence for the next call.
    pub async fn read_exact(&mut self, n: usize) -> Result<String> {
        let bytes = self.reader.read_exact(n).await?;
        Ok(self.decode_buffered(bytes, false))
    }

    /// Reads one line (see [`TelnetReader::read_line`]) and decodes it,
    /// flushing any held-back partial sequence since a line is a complete
    /// logical unit.
    pub async fn read_line(&mut self) -> Result<String> {
        let bytes = self.reader.read_line().await?;
        Ok(self.decode_buffered(bytes, true))
    }

    /// Reads up through `sep` and decodes it, flushing any held-back partial
    /// sequence since a delimited unit is complete once read.
    pub async fn read_until(&mut self, sep: u8) -> Result<String> {
        let bytes = self.reader.read_until(sep).await?;
        Ok(self.decode_buffered(bytes, true))
    }
}
