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

//! Terminal Type option (RFC 1091).

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// A TTYPE subnegotiation: either a SEND request, or an IS report naming
/// the terminal type (e.g. `"XTERM"`, `"ANSI"`, `"VT100"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalType {
    /// Ask the peer to report its terminal type.
    Send,
    /// Report the terminal type.
    Is(String),
}

impl TerminalType {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            TerminalType::Send => 1,
            TerminalType::Is(name) => 1 + name.len(),
        }
    }

    /// True for a bare SEND — never true for an IS report, even an empty one.
    pub fn is_empty(&self) -> bool {
        matches!(self, TerminalType::Send)
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte, and for `Is`, the uppercase-by-convention name.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TerminalType::Send => {
                writer.write_u8(consts::option::command::SEND)?;
                Ok(1)
            }
            TerminalType::Is(name) => {
                writer.write_u8(consts::option::command::IS)?;
                writer.write_all(name.as_bytes())?;
                Ok(1 + name.len())
            }
        }
    }

    /// Decodes a TTYPE subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<TerminalType> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::TTYPE),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::option::command::SEND => Ok(TerminalType::Send),
            consts::option::command::IS => {
                let mut name = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut name);
                let name = String::from_utf8_lossy(&name).into_owned();
                Ok(TerminalType::Is(name))
            }
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::TTYPE),
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
        let arg = TerminalType::Is("XTERM-256COLOR".into());
        let mut buf = BytesMut::new();
        arg.encode(&mut buf).unwrap();
        let decoded = TerminalType::decode(&mut buf).unwrap();
        assert_eq!(decoded, arg);
    }

    #[test]
    fn round_trips_send_request() {
        let mut buf = BytesMut::new();
        TerminalType::Send.encode(&mut buf).unwrap();
        assert_eq!(TerminalType::decode(&mut buf).unwrap(), TerminalType::Send);
    }

    #[test]
    fn decode_rejects_unknown_command() {
        let mut buf = BytesMut::from(&[0x02][..]);
        assert!(TerminalType::decode(&mut buf).is_err());
    }
}
