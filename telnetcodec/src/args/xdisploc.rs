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

//! X Display Location option (RFC 1096).

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// An XDISPLOC subnegotiation: either a SEND request, or an IS report of
/// the X11 display string (e.g. `"host:0.0"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XDisplayLocation {
    /// Ask the peer to report its X display location.
    Send,
    /// Report the X display location.
    Is(String),
}

impl XDisplayLocation {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            XDisplayLocation::Send => 1,
            XDisplayLocation::Is(value) => 1 + value.len(),
        }
    }

    /// True only for a bare SEND request.
    pub fn is_empty(&self) -> bool {
        matches!(self, XDisplayLocation::Send)
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte, and for `Is`, the display string.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            XDisplayLocation::Send => {
                writer.write_u8(consts::option::command::SEND)?;
                Ok(1)
            }
            XDisplayLocation::Is(value) => {
                writer.write_u8(consts::option::command::IS)?;
                writer.write_all(value.as_bytes())?;
                Ok(1 + value.len())
            }
        }
    }

    /// Decodes an XDISPLOC subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<XDisplayLocation> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::XDISPLOC),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::option::command::SEND => Ok(XDisplayLocation::Send),
            consts::option::command::IS => {
                let mut value = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut value);
                Ok(XDisplayLocation::Is(String::from_utf8_lossy(&value).into_owned()))
            }
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::XDISPLOC),
                reason: SubnegotiationErrorKind::InvalidCommand {
                    command: other,
                    expected: Some(vec![
                        consts::option::command::IS,
                        consts::option::command::SEND,
                    ]),
                },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn round_trips_is_report() {
        let arg = XDisplayLocation::Is("workstation:0.0".into());
        let mut buf = BytesMut::new();
        arg.encode(&mut buf).unwrap();
        assert_eq!(XDisplayLocation::decode(&mut buf).unwrap(), arg);
    }
}
