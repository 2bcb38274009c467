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

use crate::TelnetOption;
use crate::args::charset::Charset;
use crate::args::linemode::Linemode;
use crate::args::naws::WindowSize;
use crate::args::newenviron::NewEnviron;
use crate::args::status::TelnetOptionStatus;
use crate::args::tspeed::TerminalSpeed;
use crate::args::ttype::TerminalType;
use crate::args::xdisploc::XDisplayLocation;
use crate::result::CodecResult;
use bytes::{BufMut, BytesMut};
use std::fmt::Formatter;

/// Charset option (RFC 2066) subnegotiation payloads.
pub mod charset;
/// Linemode option (RFC 1184) subnegotiation payloads.
pub mod linemode;
/// Negotiate About Window Size (RFC 1073) subnegotiation payload.
pub mod naws;
/// New Environment option (RFC 1572) subnegotiation payloads.
pub mod newenviron;
/// Status option (RFC 859) subnegotiation payload.
pub mod status;
/// Terminal Speed option (RFC 1079) subnegotiation payloads.
pub mod tspeed;
/// Terminal Type option (RFC 1091) subnegotiation payloads.
pub mod ttype;
/// X Display Location option (RFC 1096) subnegotiation payloads.
pub mod xdisploc;

/// The decoded body of an `IAC SB .. IAC SE` subnegotiation, one variant per
/// option this crate understands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TelnetArgument {
    /// NAWS window size report.
    Naws(WindowSize),
    /// TTYPE terminal type SEND/IS.
    Ttype(TerminalType),
    /// TSPEED terminal speed SEND/IS.
    Tspeed(TerminalSpeed),
    /// XDISPLOC X display location SEND/IS.
    Xdisploc(XDisplayLocation),
    /// NEW-ENVIRON environment variable SEND/IS/INFO.
    NewEnviron(NewEnviron),
    /// CHARSET negotiation payload.
    Charset(Charset),
    /// LINEMODE mode flags.
    Linemode(Linemode),
    /// STATUS option-table dump.
    Status(TelnetOptionStatus),
    /// A subnegotiation for an option this crate does not decode further.
    Unknown(TelnetOption, BytesMut),
}

impl TelnetArgument {
    /// Returns the encoded byte length of this argument's payload (excluding
    /// the `IAC SB <option>` prefix and `IAC SE` suffix).
    pub fn len(&self) -> usize {
        match self {
            TelnetArgument::Naws(inner) => inner.len(),
            TelnetArgument::Ttype(inner) => inner.len(),
            TelnetArgument::Tspeed(inner) => inner.len(),
            TelnetArgument::Xdisploc(inner) => inner.len(),
            TelnetArgument::NewEnviron(inner) => inner.len(),
            TelnetArgument::Charset(inner) => inner.len(),
            TelnetArgument::Linemode(inner) => inner.len(),
            TelnetArgument::Status(inner) => inner.len(),
            TelnetArgument::Unknown(_option, payload) => payload.len(),
        }
    }

    /// True if this argument encodes to zero payload bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes this argument's payload to `dst`.
    pub fn encode<T: BufMut>(&self, dst: &mut T) -> CodecResult<usize> {
        Ok(self.write(&mut dst.writer())?)
    }

    /// Writes this argument's payload, IAC-escaping raw `Unknown` bytes.
    pub fn write<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<usize> {
        match self {
            TelnetArgument::Naws(inner) => inner.write(writer),
            TelnetArgument::Ttype(inner) => inner.write(writer),
            TelnetArgument::Tspeed(inner) => inner.write(writer),
            TelnetArgument::Xdisploc(inner) => inner.write(writer),
            TelnetArgument::NewEnviron(inner) => inner.write(writer),
            TelnetArgument::Charset(inner) => inner.write(writer),
            TelnetArgument::Linemode(inner) => inner.write(writer),
            TelnetArgument::Status(inner) => inner.write(writer),
            TelnetArgument::Unknown(_option, payload) => {
                let mut written = 0;
                for &byte in payload.iter() {
                    if byte == crate::consts::IAC {
                        writer.write_all(&[crate::consts::IAC, crate::consts::IAC])?;
                        written += 2;
                    } else {
                        writer.write_all(&[byte])?;
                        written += 1;
                    }
                }
                Ok(written)
            }
        }
    }

    /// The option this subnegotiation belongs to.
    pub fn option(&self) -> TelnetOption {
        match self {
            TelnetArgument::Naws(_) => TelnetOption::Naws,
            TelnetArgument::Ttype(_) => TelnetOption::Ttype,
            TelnetArgument::Tspeed(_) => TelnetOption::Tspeed,
            TelnetArgument::Xdisploc(_) => TelnetOption::Xdisploc,
            TelnetArgument::NewEnviron(_) => TelnetOption::NewEnviron,
            TelnetArgument::Charset(_) => TelnetOption::Charset,
            TelnetArgument::Linemode(_) => TelnetOption::Linemode,
            TelnetArgument::Status(_) => TelnetOption::Status,
            TelnetArgument::Unknown(option, _) => *option,
        }
    }

    /// Decodes the subnegotiation body for `option` from `payload`, dispatching
    /// to the option-specific decoder. Unrecognized options fall back to
    /// `Unknown`, matching the crate's non-fatal handling of malformed/unsupported
    /// subnegotiations.
    pub fn decode(option: TelnetOption, mut payload: BytesMut) -> CodecResult<TelnetArgument> {
        use bytes::Buf;
        Ok(match option {
            TelnetOption::Naws => TelnetArgument::Naws(WindowSize::decode(&mut payload)?),
            TelnetOption::Ttype => TelnetArgument::Ttype(TerminalType::decode(&mut payload)?),
            TelnetOption::Tspeed => TelnetArgument::Tspeed(TerminalSpeed::decode(&mut payload)?),
            TelnetOption::Xdisploc => {
                TelnetArgument::Xdisploc(XDisplayLocation::decode(&mut payload)?)
            }
            TelnetOption::NewEnviron => {
                TelnetArgument::NewEnviron(NewEnviron::decode(&mut payload)?)
            }
            TelnetOption::Charset => TelnetArgument::Charset(Charset::decode(&mut payload)?),
            TelnetOption::Linemode => TelnetArgument::Linemode(Linemode::decode(&mut payload)?),
            TelnetOption::Status => TelnetArgument::Status(TelnetOptionStatus::decode(&mut payload)?),
            other => {
                let _ = payload.remaining();
                TelnetArgument::Unknown(other, payload)
            }
        })
    }
}

impl std::fmt::Display for TelnetArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetArgument::Naws(v) => write!(f, "{v}"),
            TelnetArgument::Ttype(v) => write!(f, "{v:?}"),
            TelnetArgument::Tspeed(v) => write!(f, "{v:?}"),
            TelnetArgument::Xdisploc(v) => write!(f, "{v:?}"),
            TelnetArgument::NewEnviron(v) => write!(f, "{v:?}"),
            TelnetArgument::Charset(v) => write!(f, "{v:?}"),
            TelnetArgument::Linemode(v) => write!(f, "{v:?}"),
            TelnetArgument::Status(v) => write!(f, "{v:?}"),
            TelnetArgument::Unknown(o, v) => write!(f, "{o}-{v:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_dispatches_by_option() {
        let mut payload = BytesMut::new();
        WindowSize::new(80, 24).encode(&mut payload).unwrap();
        let arg = TelnetArgument::decode(TelnetOption::Naws, payload).unwrap();
        assert_eq!(arg.option(), TelnetOption::Naws);
        assert!(matches!(arg, TelnetArgument::Naws(_)));
    }

    #[test]
    fn unknown_option_falls_back_to_raw_payload() {
        let payload = BytesMut::from(&b"anything"[..]);
        let arg = TelnetArgument::decode(TelnetOption::Unknown(200), payload.clone()).unwrap();
        assert_eq!(arg, TelnetArgument::Unknown(TelnetOption::Unknown(200), payload));
    }

    #[test]
    fn unknown_payload_escapes_iac_on_write() {
        let payload = BytesMut::from(&[0xFFu8, b'a'][..]);
        let arg = TelnetArgument::Unknown(TelnetOption::Unknown(99), payload);
        let mut out = BytesMut::new();
        arg.encode(&mut out).unwrap();
        assert_eq!(&out[..], &[0xFF, 0xFF, b'a']);
    }
}
