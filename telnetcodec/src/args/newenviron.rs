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

//! New Environment option (RFC 1572).

use crate::{CodecError, CodecResult, SubnegotiationErrorKind, consts};
use byteorder::WriteBytesExt;
use bytes::{Buf, BufMut};

/// A single well-known or user-defined environment variable and its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvironVar {
    /// Variable name.
    pub name: Vec<u8>,
    /// `None` means the variable was named but no value followed (an
    /// incomplete request, not an empty string).
    pub value: Option<Vec<u8>>,
    /// `true` for USERVAR, `false` for a well-known VAR.
    pub is_uservar: bool,
}

/// A NEW-ENVIRON subnegotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewEnviron {
    /// Ask the peer to report the named variables (empty = report everything).
    Send(Vec<EnvironVar>),
    /// Report variable values in answer to a SEND.
    Is(Vec<EnvironVar>),
    /// Unsolicited report of variable values.
    Info(Vec<EnvironVar>),
}

fn encode_vars<W: std::io::Write>(vars: &[EnvironVar], writer: &mut W) -> std::io::Result<usize> {
    let mut written = 0;
    for var in vars {
        writer.write_u8(if var.is_uservar {
            consts::option::environ::USERVAR
        } else {
            consts::option::environ::VAR
        })?;
        written += 1;
        written += write_escaped(&var.name, writer)?;
        if let Some(value) = &var.value {
            writer.write_u8(consts::option::environ::VALUE)?;
            written += 1;
            written += write_escaped(value, writer)?;
        }
    }
    Ok(written)
}

fn write_escaped<W: std::io::Write>(data: &[u8], writer: &mut W) -> std::io::Result<usize> {
    let mut written = 0;
    for &byte in data {
        if matches!(
            byte,
            consts::option::environ::VAR
                | consts::option::environ::VALUE
                | consts::option::environ::USERVAR
                | consts::option::environ::ESC
        ) {
            writer.write_u8(consts::option::environ::ESC)?;
            written += 1;
        }
        writer.write_u8(byte)?;
        written += 1;
    }
    Ok(written)
}

fn encoded_len(vars: &[EnvironVar]) -> usize {
    vars.iter()
        .map(|var| {
            let mut len = 1 + escaped_len(&var.name);
            if let Some(value) = &var.value {
                len += 1 + escaped_len(value);
            }
            len
        })
        .sum()
}

fn escaped_len(data: &[u8]) -> usize {
    data.iter()
        .map(|&byte| {
            if matches!(
                byte,
                consts::option::environ::VAR
                    | consts::option::environ::VALUE
                    | consts::option::environ::USERVAR
                    | consts::option::environ::ESC
            ) {
                2
            } else {
                1
            }
        })
        .sum()
}

fn decode_vars<T: Buf>(src: &mut T) -> CodecResult<Vec<EnvironVar>> {
    let mut vars = Vec::new();
    let mut pending: Option<(bool, Vec<u8>)> = None;
    let mut in_value = false;

    while src.has_remaining() {
        let byte = src.get_u8();
        let literal = if byte == consts::option::environ::ESC {
            if !src.has_remaining() {
                return Err(CodecError::SubnegotiationError {
                    option: Some(consts::option::NEW_ENVIRON),
                    reason: SubnegotiationErrorKind::IncompleteData {
                        description: "dangling ESC byte".into(),
                    },
                });
            }
            Some(src.get_u8())
        } else {
            None
        };

        match literal {
            Some(escaped) => {
                if let Some((_, buf)) = pending.as_mut() {
                    buf.push(escaped);
                }
            }
            None => match byte {
                consts::option::environ::VAR | consts::option::environ::USERVAR => {
                    if let Some((is_uservar, name)) = pending.take() {
                        vars.push(EnvironVar { name, value: None, is_uservar });
                    }
                    pending = Some((byte == consts::option::environ::USERVAR, Vec::new()));
                    in_value = false;
                }
                consts::option::environ::VALUE => {
                    in_value = true;
                    if let Some((is_uservar, name)) = pending.take() {
                        vars.push(EnvironVar { name, value: Some(Vec::new()), is_uservar });
                    }
                }
                _ if in_value => {
                    if let Some(var) = vars.last_mut() {
                        if let Some(value) = var.value.as_mut() {
                            value.push(byte);
                        }
                    }
                }
                _ => {
                    if let Some((_, name)) = pending.as_mut() {
                        name.push(byte);
                    } else {
                        return Err(CodecError::SubnegotiationError {
                            option: Some(consts::option::NEW_ENVIRON),
                            reason: SubnegotiationErrorKind::UnexpectedData {
                                reason: "data before first VAR/USERVAR".into(),
                            },
                        });
                    }
                }
            },
        }
    }

    if let Some((is_uservar, name)) = pending {
        vars.push(EnvironVar { name, value: None, is_uservar });
    }

    Ok(vars)
}

impl NewEnviron {
    /// Encoded length in bytes.
    pub fn len(&self) -> usize {
        match self {
            NewEnviron::Send(vars) | NewEnviron::Is(vars) | NewEnviron::Info(vars) => {
                1 + encoded_len(vars)
            }
        }
    }

    /// True when there are no variables named/reported.
    pub fn is_empty(&self) -> bool {
        match self {
            NewEnviron::Send(vars) | NewEnviron::Is(vars) | NewEnviron::Info(vars) => vars.is_empty(),
        }
    }

    /// Encodes into a `BufMut`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes the command byte followed by the escaped VAR/VALUE/USERVAR stream.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        let (command, vars) = match self {
            NewEnviron::Send(vars) => (consts::option::command::SEND, vars),
            NewEnviron::Is(vars) => (consts::option::command::IS, vars),
            NewEnviron::Info(vars) => (consts::option::environ::INFO, vars),
        };
        writer.write_u8(command)?;
        Ok(1 + encode_vars(vars, writer)?)
    }

    /// Decodes a NEW-ENVIRON subnegotiation body.
    pub fn decode<T: Buf>(src: &mut T) -> CodecResult<NewEnviron> {
        if src.remaining() < 1 {
            return Err(CodecError::SubnegotiationError {
                option: Some(consts::option::NEW_ENVIRON),
                reason: SubnegotiationErrorKind::InsufficientData {
                    required: 1,
                    available: 0,
                },
            });
        }
        match src.get_u8() {
            consts::option::command::SEND => Ok(NewEnviron::Send(decode_vars(src)?)),
            consts::option::command::IS => Ok(NewEnviron::Is(decode_vars(src)?)),
            consts::option::environ::INFO => Ok(NewEnviron::Info(decode_vars(src)?)),
            other => Err(CodecError::SubnegotiationError {
                option: Some(consts::option::NEW_ENVIRON),
                reason: SubnegotiationErrorKind::InvalidCommand {
                    command: other,
                    expected: Some(vec![
                        consts::option::command::IS,
                        consts::option::command::SEND,
                        consts::option::environ::INFO,
                    ]),
                },
            }),
        }
    }
}
