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

//! Charset option (RFC 2066). TTABLE-IS/TTABLE-REJECTED translation tables
//! are not implemented by this crate; a TTABLE-IS offer is answered with
//! TTABLE-REJECTED.

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// A CHARSET subnegotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Charset {
    /// Propose a list of charsets, separated on the wire by `sep`.
    Request {
        /// Separator byte placed between charset names (conventionally `;`).
        sep: u8,
        /// Candidate charset names, in preference order.
        charsets: Vec<Vec<u8>>,
    },
    /// The peer picked `charset` from our REQUEST.
    Accepted(Vec<u8>),
    /// The peer accepted none of the proposed charsets.
    Rejected,
    /// The peer sent TTABLE-IS; we don't implement translation tables.
    TtableRejected,
}

impl Charset {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            Charset::Request { charsets, .. } => {
                1 + charsets.iter().map(|c| c.len() + 1).sum::<usize>()
            }
            Charset::Accepted(name) => 1 + name.len(),
            Charset::Rejected | Charset::TtableRejected => 1,
        }
    }

    /// True only for a REQUEST naming no charsets.
    pub fn is_empty(&self) -> bool {
        matches!(self, Charset::Request { charsets, .. } if charsets.is_empty())
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte and any payload.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            Charset::Request { sep, charsets } => {
                writer.write_u8(consts::option::charset::REQUEST)?;
                writer.write_u8(*sep)?;
                let mut written = 2;
                for (idx, charset) in charsets.iter().enumerate() {
                    if idx > 0 {
                        writer.write_u8(*sep)?;
                        written += 1;
                    }
                    writer.write_all(charset)?;
                    written += charset.len();
                }
                Ok(written)
            }
            Charset::Accepted(name) => {
                writer.write_u8(consts::option::charset::ACCEPTED)?;
                writer.write_all(name)?;
                Ok(1 + name.len())
            }
            Charset::Rejected => {
                writer.write_u8(consts::option::charset::REJECTED)?;
                Ok(1)
            }
            Charset::TtableRejected => {
                writer.write_u8(consts::option::charset::TTABLE_REJECTED)?;
                Ok(1)
            }
        }
    }

    /// Decodes a CHARSET subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<Charset> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::CHARSET),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::option::charset::REQUEST => {
                if src.remaining() < 1 {
                    return Err(CodecError::SubnegotiationError {
                        option: Some(consts::option::CHARSET),
                        reason: SubnegotiationErrorKind::IncompleteData {
                            description: "REQUEST missing separator byte".into(),
                        },
                    });
                }
                let sep = src.get_u8();
                let mut rest = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut rest);
                let charsets = rest
                    .split(|&b| b == sep)
                    .filter(|c| !c.is_empty())
                    .map(<[u8]>::to_vec)
                    .collect();
                Ok(Charset::Request { sep, charsets })
            }
            consts::option::charset::ACCEPTED => {
                let mut name = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut name);
                Ok(Charset::Accepted(name))
            }
            consts::option::charset::REJECTED => Ok(Charset::Rejected),
            consts::option::charset::TTABLE_REJECTED => Ok(Charset::TtableRejected),
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::CHARSET),
                reason: SubnegotiationErrorKind::InvalidCommand { command: other, expected: None },
            }),
        }
    }
}
