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

//! Terminal Speed option (RFC 1079).

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// A TSPEED subnegotiation: either a SEND request, or an IS report of
/// transmit/receive baud rate as a `"<TX>,<RX>"` ASCII pair (e.g. `"38400,38400"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TerminalSpeed {
    /// Ask the peer to report its line speed.
    Send,
    /// Report transmit and receive baud rate.
    Is {
        /// Transmit baud rate.
        transmit: u32,
        /// Receive baud rate.
        receive: u32,
    },
}

impl TerminalSpeed {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            TerminalSpeed::Send => 1,
            TerminalSpeed::Is { transmit, receive } => {
                1 + format!("{transmit},{receive}").len()
            }
        }
    }

    /// True only for a bare SEND request.
    pub fn is_empty(&self) -> bool {
        matches!(self, TerminalSpeed::Send)
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte, and for `Is`, the `"<TX>,<RX>"` ASCII pair.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TerminalSpeed::Send => {
                writer.write_u8(consts::option::command::SEND)?;
                Ok(1)
            }
            TerminalSpeed::Is { transmit, receive } => {
                writer.write_u8(consts::option::command::IS)?;
                let body = format!("{transmit},{receive}");
                writer.write_all(body.as_bytes())?;
                Ok(1 + body.len())
            }
        }
    }

    /// Decodes a TSPEED subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<TerminalSpeed> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::TSPEED),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::option::command::SEND => Ok(TerminalSpeed::Send),
            consts::option::command::IS => {
                let mut body = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut body);
                let body = String::from_utf8_lossy(&body);
                let (tx, rx) = body.split_once(',').ok_or_else(|| {
                    CodecError::SubnegotiationError {
                        option: Some(consts::option::TSPEED),
                        reason: SubnegotiationErrorKind::Other {
                            description: format!("malformed speed pair: {body}"),
                        },
                    }
                })?;
                let parse = |s: &str| {
                    s.trim().parse::<u32>().map_err(|_| CodecError::SubnegotiationError {
                        option: Some(consts::option::TSPEED),
                        reason: SubnegotiationErrorKind::Other {
                            description: format!("non-numeric speed field: {s}"),
                        },
                    })
                };
                Ok(TerminalSpeed::Is {
                    transmit: parse(tx)?,
                    receive: parse(rx)?,
                })
            }
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::TSPEED),
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
        let arg = TerminalSpeed::Is { transmit: 38400, receive: 38400 };
        let mut buf = BytesMut::new();
        arg.encode(&mut buf).unwrap();
        assert_eq!(TerminalSpeed::decode(&mut buf).unwrap(), arg);
    }

    #[test]
    fn decode_rejects_malformed_pair() {
        let mut buf = BytesMut::new();
        buf.put_u8(consts::option::command::IS);
        buf.put_slice(b"not-a-speed");
        assert!(TerminalSpeed::decode(&mut buf).is_err());
    }
}
