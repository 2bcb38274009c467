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

//! Linemode option (RFC 1184): MODE, FORWARDMASK, and SLC subnegotiations.

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// Line editing mode flags carried by a MODE subnegotiation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeFlags {
    /// Client performs line editing locally before forwarding a line.
    pub edit: bool,
    /// Client traps signal characters locally instead of forwarding them raw.
    pub trapsig: bool,
    /// This MODE subnegotiation acknowledges a previously sent one.
    pub ack: bool,
    /// Client expands tabs locally.
    pub soft_tab: bool,
    /// Client echoes literal control characters instead of their caret form.
    pub lit_echo: bool,
}

impl ModeFlags {
    fn from_byte(byte: u8) -> Self {
        ModeFlags {
            edit: byte & consts::option::linemode::MODE_EDIT != 0,
            trapsig: byte & consts::option::linemode::MODE_TRAPSIG != 0,
            ack: byte & consts::option::linemode::MODE_ACK != 0,
            soft_tab: byte & consts::option::linemode::MODE_SOFT_TAB != 0,
            lit_echo: byte & consts::option::linemode::MODE_LIT_ECHO != 0,
        }
    }

    fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.edit {
            byte |= consts::option::linemode::MODE_EDIT;
        }
        if self.trapsig {
            byte |= consts::option::linemode::MODE_TRAPSIG;
        }
        if self.ack {
            byte |= consts::option::linemode::MODE_ACK;
        }
        if self.soft_tab {
            byte |= consts::option::linemode::MODE_SOFT_TAB;
        }
        if self.lit_echo {
            byte |= consts::option::linemode::MODE_LIT_ECHO;
        }
        byte
    }
}

/// One function slot of the SLC (Set Local Characters) table: the flags
/// describing how the function is handled and the character value assigned
/// to it, per RFC 1184 §4. `value` of 0 means no character is assigned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlcSlot {
    /// SLC level (NOSUPPORT/CANTCHANGE/VARIABLE/DEFAULT) and modifier bits.
    pub flags: u8,
    /// The character assigned to this function.
    pub value: u8,
}

/// The full SLC function table, indexed by function number minus one.
pub type SlcTable = [SlcSlot; consts::option::linemode::SLC_FUNCTION_COUNT];

/// A LINEMODE subnegotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Linemode {
    /// Set or acknowledge the editing mode flags.
    Mode(ModeFlags),
    /// The boundary characters the client should forward immediately
    /// instead of buffering for local editing, as a raw bitmask.
    ForwardMask(Vec<u8>),
    /// The special-character table: which key triggers which editing
    /// function and how.
    Slc(SlcTable),
}

impl Linemode {
    /// Encoded length in bytes, including the leading command byte.
    pub fn len(&self) -> usize {
        match self {
            Linemode::Mode(_) => 2,
            Linemode::ForwardMask(mask) => 1 + mask.len(),
            Linemode::Slc(table) => 1 + table.len() * 3,
        }
    }

    /// Never empty: every variant carries at least the command byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte followed by the variant's payload.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            Linemode::Mode(flags) => {
                writer.write_u8(consts::option::linemode::MODE)?;
                writer.write_u8(flags.to_byte())?;
                Ok(2)
            }
            Linemode::ForwardMask(mask) => {
                writer.write_u8(consts::option::linemode::FORWARDMASK)?;
                writer.write_all(mask)?;
                Ok(1 + mask.len())
            }
            Linemode::Slc(table) => {
                writer.write_u8(consts::option::linemode::SLC)?;
                for (index, slot) in table.iter().enumerate() {
                    writer.write_u8((index + 1) as u8)?;
                    writer.write_u8(slot.flags)?;
                    writer.write_u8(slot.value)?;
                }
                Ok(1 + table.len() * 3)
            }
        }
    }

    /// Decodes a LINEMODE subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<Linemode> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::LINEMODE),
                reason: SubnegotiationErrorKind::InsufficientData { required: 1, available: 0 },
            });
        }
        let command = src.get_u8();
        match command {
            consts::option::linemode::MODE => {
                if src.remaining() < 1 {
                    return Err(CodecError::SubnegotiationError {
                        option: Some(consts::option::LINEMODE),
                        reason: SubnegotiationErrorKind::InsufficientData { required: 1, available: 0 },
                    });
                }
                Ok(Linemode::Mode(ModeFlags::from_byte(src.get_u8())))
            }
            consts::option::linemode::FORWARDMASK => {
                let mut mask = vec![0u8; src.remaining()];
                src.copy_to_slice(&mut mask);
                Ok(Linemode::ForwardMask(mask))
            }
            consts::option::linemode::SLC => {
                let mut table: SlcTable = [SlcSlot::default(); consts::option::linemode::SLC_FUNCTION_COUNT];
                while src.remaining() >= 3 {
                    let function = src.get_u8();
                    let flags = src.get_u8();
                    let value = src.get_u8();
                    if function >= 1 && (function as usize) <= table.len() {
                        table[(function - 1) as usize] = SlcSlot { flags, value };
                    }
                }
                Ok(Linemode::Slc(table))
            }
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::LINEMODE),
                reason: SubnegotiationErrorKind::InvalidCommand {
                    command: other,
                    expected: Some(vec![
                        consts::option::linemode::MODE,
                        consts::option::linemode::FORWARDMASK,
                        consts::option::linemode::SLC,
                    ]),
                },
            }),
        }
    }
}
