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

//! Telnet Status option (RFC 859): a peer dumps its view of every
//! negotiated option's DO/DONT and WILL/WONT state.

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, TelnetOption, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};
use std::collections::HashMap;

/// STATUS subnegotiation command byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCommand {
    /// SEND — ask the peer to report status.
    Send,
    /// IS — reporting status.
    Is,
}

impl StatusCommand {
    /// Maps a wire byte to a command.
    pub fn from_byte(byte: u8) -> CodecResult<Self> {
        match byte {
            consts::option::status::IS => Ok(StatusCommand::Is),
            consts::option::status::SEND => Ok(StatusCommand::Send),
            _ => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::STATUS),
                reason: SubnegotiationErrorKind::InvalidCommand {
                    command: byte,
                    expected: Some(vec![
                        consts::option::status::IS,
                        consts::option::status::SEND,
                    ]),
                },
            }),
        }
    }

    /// Maps a command to its wire byte.
    pub fn to_byte(&self) -> u8 {
        match self {
            StatusCommand::Send => consts::option::status::SEND,
            StatusCommand::Is => consts::option::status::IS,
        }
    }
}

/// A STATUS subnegotiation: either a bare SEND request, or an IS report
/// carrying (DO/DONT, WILL/WONT) pairs for every option the peer tracks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TelnetOptionStatus {
    /// SEND or IS.
    pub command: StatusCommand,
    /// `option -> (do_state, will_state)`; `true` means DO/WILL, `false` means DONT/WONT.
    pub options: HashMap<TelnetOption, (bool, bool)>,
}

impl TelnetOptionStatus {
    /// Encoded length: 1 command byte plus 4 bytes per reported option.
    pub fn len(&self) -> usize {
        1 + self.options.len() * 4
    }

    /// True for a bare SEND with no option pairs.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && matches!(self.command, StatusCommand::Send)
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte followed by each option's DO/DONT and WILL/WONT pair.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        let mut len = 1;
        writer.write_u8(self.command.to_byte())?;
        for (option, (do_state, will_state)) in &self.options {
            writer.write_u8(if *do_state { consts::DO } else { consts::DONT })?;
            writer.write_u8(option.to_u8())?;
            writer.write_u8(if *will_state { consts::WILL } else { consts::WONT })?;
            writer.write_u8(option.to_u8())?;
            len += 4;
        }
        Ok(len)
    }

    /// Decodes a STATUS subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<TelnetOptionStatus> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::STATUS),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: src.remaining(),
                },
            });
        }

        let command = StatusCommand::from_byte(src.get_u8())?;

        if matches!(command, StatusCommand::Send) && src.remaining() > 0 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::STATUS),
                reason: SubnegotiationErrorKind::UnexpectedData {
                    reason: "SEND must not carry option data".into(),
                },
            });
        }

        let mut options = HashMap::new();
        while src.remaining() >= 2 {
            let verb = src.get_u8();
            let option = TelnetOption::from_u8(src.get_u8());
            let entry = options.entry(option).or_insert((false, false));
            match verb {
                consts::DO => entry.0 = true,
                consts::DONT => entry.0 = false,
                consts::WILL => entry.1 = true,
                consts::WONT => entry.1 = false,
                _ => {
                    return Err(CodecError::SubnegotiationError {
                        option: Some(consts::option::STATUS),
                        reason: SubnegotiationErrorKind::InvalidCommand {
                            command: verb,
                            expected: Some(vec![
                                consts::DO,
                                consts::DONT,
                                consts::WILL,
                                consts::WONT,
                            ]),
                        },
                    });
                }
            }
        }

        if src.remaining() > 0 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::STATUS),
                reason: SubnegotiationErrorKind::IncompleteData {
                    description: "trailing byte after last option pair".into(),
                },
            });
        }

        Ok(Self { command, options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelnetOption;
    use bytes::BytesMut;

    #[test]
    fn encode_decode_round_trip() {
        let mut options = HashMap::new();
        options.insert(TelnetOption::Echo, (true, false));
        options.insert(TelnetOption::SuppressGoAhead, (false, true));
        options.insert(TelnetOption::Status, (true, true));

        let original = TelnetOptionStatus {
            command: StatusCommand::Is,
            options,
        };

        let mut buf = BytesMut::new();
        original.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), original.len());

        let decoded = TelnetOptionStatus::decode(&mut buf).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn send_with_trailing_data_is_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(consts::option::status::SEND);
        buf.put_u8(consts::DO);
        buf.put_u8(TelnetOption::Echo.to_u8());
        assert!(TelnetOptionStatus::decode(&mut buf).is_err());
    }

    #[test]
    fn invalid_verb_is_rejected() {
        let mut buf = BytesMut::new();
        buf.put_u8(consts::option::status::IS);
        buf.put_u8(99);
        buf.put_u8(TelnetOption::Echo.to_u8());
        assert!(TelnetOptionStatus::decode(&mut buf).is_err());
    }

    #[test]
    fn empty_buffer_is_rejected() {
        let mut buf = BytesMut::new();
        assert!(TelnetOptionStatus::decode(&mut buf).is_err());
    }
}
