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

//! Negotiate About Window Size (RFC 1073).

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::{BigEndian, WriteBytesExt};
use bytes::{Buf, BufMut};

/// Terminal window dimensions carried by a NAWS subnegotiation.
///
/// Encoded as four bytes, big-endian: columns then rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of columns (characters) in the terminal window.
    pub cols: u16,
    /// Number of rows (lines) in the terminal window.
    pub rows: u16,
}

impl WindowSize {
    /// Builds a window size from a column and row count.
    pub fn new(cols: u16, rows: u16) -> Self {
        WindowSize { cols, rows }
    }

    /// Encoded length in bytes — always 4.
    pub fn len(&self) -> usize {
        4
    }

    /// Returns true if this size is empty — never true, kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes columns then rows, big-endian, to `writer`.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        writer.write_u16::<BigEndian>(self.cols)?;
        writer.write_u16::<BigEndian>(self.rows)?;
        Ok(4)
    }

    /// Decodes columns then rows, big-endian, from `src`.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<WindowSize> {
        if src.remaining() >= 4 {
            Ok(WindowSize {
                cols: src.get_u16(),
                rows: src.get_u16(),
            })
        } else {
            Err(CodecError::SubnegotiationError {
                option: Some(consts::option::NAWS),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 4,
                    available: src.remaining(),
                },
            })
        }
    }
}

impl Default for WindowSize {
    /// A traditional 80x24 terminal — used before NAWS has reported anything.
    fn default() -> Self {
        WindowSize { cols: 80, rows: 24 }
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn round_trips_through_wire_format() {
        let size = WindowSize::new(132, 43);
        let mut buf = BytesMut::new();
        size.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), 4);
        let decoded = WindowSize::decode(&mut buf).unwrap();
        assert_eq!(decoded, size);
    }

    #[test]
    fn decode_rejects_short_buffer() {
        let mut buf = BytesMut::from(&[0x00, 0x50][..]);
        assert!(WindowSize::decode(&mut buf).is_err());
    }

    #[test]
    fn default_is_80x24() {
        assert_eq!(WindowSize::default(), WindowSize::new(80, 24));
    }
}
