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

use super::{CodecError, TelnetEvent, TelnetFrame, TelnetOption, consts};
use crate::args::TelnetArgument;
use crate::options::{TelnetOptions, TelnetSide};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// A [`tokio_util::codec`] `Decoder`/`Encoder` pair implementing the Telnet
/// wire protocol: IAC escaping, command parsing, RFC 1143 option negotiation,
/// and subnegotiation framing.
///
/// Negotiation state lives here, not in the caller — `decode` drives the
/// [`TelnetOptions`] Q-method machine directly and surfaces completed
/// negotiations as [`TelnetEvent::OptionStatus`].
pub struct TelnetCodec {
    decoder_buffer: BytesMut,
    decoder_state: DecoderState,
    options: TelnetOptions,
    outgoing: std::collections::VecDeque<TelnetFrame>,
}

impl TelnetCodec {
    /// Creates a codec with default option support and no negotiation in progress.
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// Whether this crate is willing to enable `option` locally.
    pub fn is_supported_local(&self, option: TelnetOption) -> bool {
        self.options.is_supported_local(option)
    }

    /// Whether this crate is willing to ask the peer to enable `option`.
    pub fn is_supported_remote(&self, option: TelnetOption) -> bool {
        self.options.is_supported_remote(option)
    }

    /// Whether `option` is currently enabled on our side.
    pub fn is_enabled_local(&self, option: TelnetOption) -> bool {
        self.options.local_enabled(option)
    }

    /// Whether `option` is currently enabled on the peer's side.
    pub fn is_enabled_remote(&self, option: TelnetOption) -> bool {
        self.options.remote_enabled(option)
    }

    /// Starts negotiating to enable `option` locally; returns the WILL frame
    /// to send, if the Q-method requires one.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_local(option)
    }

    /// Starts negotiating to disable `option` locally; returns the WONT frame
    /// to send, if the Q-method requires one.
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_local(option)
    }

    /// Starts negotiating to enable `option` on the peer; returns the DO frame
    /// to send, if the Q-method requires one.
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.enable_remote(option)
    }

    /// Starts negotiating to disable `option` on the peer; returns the DONT
    /// frame to send, if the Q-method requires one.
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.options.disable_remote(option)
    }

    /// Snapshot of every tracked option's (local, remote) enabled state, for
    /// answering a STATUS SEND request.
    pub fn option_status_snapshot(&self) -> Vec<(TelnetOption, bool, bool)> {
        self.options.enabled_snapshot()
    }

    /// Drains frames the Q-method generated in reply to a peer negotiation
    /// (e.g. the `DONT` that answers an unsolicited `WILL` for an unsupported
    /// option). `decode` cannot write to the wire directly, so callers must
    /// flush this after every `decode` call that returns an event.
    pub fn take_outgoing(&mut self) -> Vec<TelnetFrame> {
        self.outgoing.drain(..).collect()
    }
}

impl Default for TelnetCodec {
    fn default() -> Self {
        TelnetCodec {
            decoder_buffer: BytesMut::new(),
            decoder_state: DecoderState::NormalData,
            options: TelnetOptions::default(),
            outgoing: std::collections::VecDeque::new(),
        }
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    /// Feeds bytes through the IAC/negotiation/subnegotiation DFA, returning
    /// at most one [`TelnetEvent`] per call (tokio_util calls `decode` in a
    /// loop, so partial frames simply return `Ok(None)` until more bytes arrive).
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        while src.remaining() > 0 {
            let byte = src.get_u8();
            match (self.decoder_state, byte) {
                (DecoderState::NormalData, consts::IAC) => {
                    self.decoder_state = DecoderState::InterpretAsCommand;
                }
                (DecoderState::NormalData, _) => {
                    return Ok(Some(TelnetEvent::Data(byte)));
                }
                (DecoderState::InterpretAsCommand, consts::NOP) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::NoOperation));
                }
                (DecoderState::InterpretAsCommand, consts::DM) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::DataMark));
                }
                (DecoderState::InterpretAsCommand, consts::BRK) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Break));
                }
                (DecoderState::InterpretAsCommand, consts::IP) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::InterruptProcess));
                }
                (DecoderState::InterpretAsCommand, consts::AO) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::AbortOutput));
                }
                (DecoderState::InterpretAsCommand, consts::AYT) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::AreYouThere));
                }
                (DecoderState::InterpretAsCommand, consts::EC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EraseCharacter));
                }
                (DecoderState::InterpretAsCommand, consts::EL) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EraseLine));
                }
                (DecoderState::InterpretAsCommand, consts::GA) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::GoAhead));
                }
                (DecoderState::InterpretAsCommand, consts::EOR) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::EndOfRecord));
                }
                (DecoderState::InterpretAsCommand, consts::IAC) => {
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::Data(consts::IAC)));
                }
                (DecoderState::InterpretAsCommand, consts::DO) => {
                    self.decoder_state = DecoderState::NegotiateDo;
                }
                (DecoderState::InterpretAsCommand, consts::DONT) => {
                    self.decoder_state = DecoderState::NegotiateDont;
                }
                (DecoderState::InterpretAsCommand, consts::WILL) => {
                    self.decoder_state = DecoderState::NegotiateWill;
                }
                (DecoderState::InterpretAsCommand, consts::WONT) => {
                    self.decoder_state = DecoderState::NegotiateWont;
                }
                (DecoderState::InterpretAsCommand, consts::SB) => {
                    self.decoder_state = DecoderState::Subnegotiate;
                }
                (DecoderState::InterpretAsCommand, _) => {
                    warn!("received unknown command 0x{byte:02X} after IAC");
                    self.decoder_state = DecoderState::NormalData;
                    return Ok(Some(TelnetEvent::NoOperation));
                }
                (DecoderState::NegotiateDo, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Do(byte.into()), TelnetSide::Local)? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateDont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Dont(byte.into()), TelnetSide::Local)? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWill, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Will(byte.into()), TelnetSide::Remote)? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::NegotiateWont, _) => {
                    self.decoder_state = DecoderState::NormalData;
                    if let Some(event) = self.negotiate(TelnetFrame::Wont(byte.into()), TelnetSide::Remote)? {
                        return Ok(Some(event));
                    }
                }
                (DecoderState::Subnegotiate, _) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(byte);
                }
                (DecoderState::SubnegotiateArgument(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgumentIAC(option);
                }
                (DecoderState::SubnegotiateArgument(_option), _) => {
                    self.decoder_buffer.put_u8(byte);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::IAC) => {
                    self.decoder_state = DecoderState::SubnegotiateArgument(option);
                    self.decoder_buffer.put_u8(consts::IAC);
                }
                (DecoderState::SubnegotiateArgumentIAC(option), consts::SE) => {
                    self.decoder_state = DecoderState::NormalData;
                    let option = TelnetOption::from_u8(option);
                    let payload = BytesMut::from(self.decoder_buffer.as_ref());
                    self.decoder_buffer.clear();
                    let argument = match TelnetArgument::decode(option, payload.clone()) {
                        Ok(argument) => argument,
                        Err(err) => {
                            warn!("discarding malformed {option} subnegotiation: {err}");
                            TelnetArgument::Unknown(option, payload)
                        }
                    };
                    return Ok(Some(TelnetEvent::Subnegotiate(argument)));
                }
                (DecoderState::SubnegotiateArgumentIAC(_), _) => {
                    self.decoder_state = DecoderState::NormalData;
                    self.decoder_buffer.clear();
                    warn!("received invalid command 0x{byte:02X} during subnegotiation, discarding");
                    return Ok(Some(TelnetEvent::NoOperation));
                }
            }
        }
        Ok(None)
    }
}

impl TelnetCodec {
    /// Drives a received negotiation frame through the Q-method and, if the
    /// option's enabled state actually changed, emits an `OptionStatus` event.
    fn negotiate(&mut self, frame: TelnetFrame, side: TelnetSide) -> Result<Option<TelnetEvent>, CodecError> {
        let option = match &frame {
            TelnetFrame::Do(o) | TelnetFrame::Dont(o) | TelnetFrame::Will(o) | TelnetFrame::Wont(o) => *o,
            _ => unreachable!("negotiate is only called with negotiation frames"),
        };
        let was_enabled = match side {
            TelnetSide::Local => self.options.local_enabled(option),
            TelnetSide::Remote => self.options.remote_enabled(option),
        };
        if let Some(reply) = self.options.handle_received(frame)? {
            self.outgoing.push_back(reply);
        }
        let is_enabled = match side {
            TelnetSide::Local => self.options.local_enabled(option),
            TelnetSide::Remote => self.options.remote_enabled(option),
        };
        Ok((is_enabled != was_enabled).then_some(TelnetEvent::OptionStatus(option, side, is_enabled)))
    }
}

impl Encoder<u8> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a raw data byte, escaping IAC.
    fn encode(&mut self, item: u8, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(2);
        if item == consts::IAC {
            dst.put_u8(consts::IAC);
        }
        dst.put_u8(item);
        Ok(())
    }
}

impl Encoder<&str> for TelnetCodec {
    type Error = CodecError;

    /// Encodes `item` as data bytes followed by a CRLF line terminator.
    fn encode(&mut self, item: &str, dst: &mut BytesMut) -> Result<(), Self::Error> {
        for byte in item.as_bytes() {
            Encoder::<TelnetFrame>::encode(self, TelnetFrame::Data(*byte), dst)?;
        }
        Encoder::<TelnetFrame>::encode(self, TelnetFrame::Data(consts::CR), dst)?;
        Encoder::<TelnetFrame>::encode(self, TelnetFrame::Data(consts::LF), dst)
    }
}

impl Encoder<TelnetFrame> for TelnetCodec {
    type Error = CodecError;

    /// Encodes one [`TelnetFrame`] into its wire representation.
    fn encode(&mut self, item: TelnetFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetFrame::Data(ch) => {
                dst.reserve(2);
                if ch == consts::IAC {
                    dst.put_u8(consts::IAC);
                }
                dst.put_u8(ch);
            }
            TelnetFrame::NoOperation => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::NOP);
            }
            TelnetFrame::DataMark => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::DM);
            }
            TelnetFrame::Break => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::BRK);
            }
            TelnetFrame::InterruptProcess => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::IP);
            }
            TelnetFrame::AbortOutput => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::AO);
            }
            TelnetFrame::AreYouThere => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::AYT);
            }
            TelnetFrame::EraseCharacter => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::EC);
            }
            TelnetFrame::EraseLine => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::EL);
            }
            TelnetFrame::GoAhead => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::GA);
            }
            TelnetFrame::EndOfRecord => {
                dst.reserve(2);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::EOR);
            }
            TelnetFrame::Do(option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::DO);
                dst.put_u8(option.into());
            }
            TelnetFrame::Dont(option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::DONT);
                dst.put_u8(option.into());
            }
            TelnetFrame::Will(option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::WILL);
                dst.put_u8(option.into());
            }
            TelnetFrame::Wont(option) => {
                dst.reserve(3);
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::WONT);
                dst.put_u8(option.into());
            }
            TelnetFrame::Subnegotiate(argument) => {
                dst.reserve(5 + argument.len());
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SB);
                dst.put_u8(argument.option().to_u8());
                argument.encode(dst)?;
                dst.put_u8(consts::IAC);
                dst.put_u8(consts::SE);
            }
        }
        Ok(())
    }
}

impl Encoder<TelnetEvent> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a [`TelnetEvent`] by translating it to its corresponding frame.
    ///
    /// `OptionStatus` cannot be encoded — it is informational only, produced by
    /// the decoder after a negotiation settles, never sent over the wire directly.
    fn encode(&mut self, item: TelnetEvent, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            TelnetEvent::Data(byte) => self.encode(TelnetFrame::Data(byte), dst),
            TelnetEvent::NoOperation => self.encode(TelnetFrame::NoOperation, dst),
            TelnetEvent::DataMark => self.encode(TelnetFrame::DataMark, dst),
            TelnetEvent::Break => self.encode(TelnetFrame::Break, dst),
            TelnetEvent::InterruptProcess => self.encode(TelnetFrame::InterruptProcess, dst),
            TelnetEvent::AbortOutput => self.encode(TelnetFrame::AbortOutput, dst),
            TelnetEvent::AreYouThere => self.encode(TelnetFrame::AreYouThere, dst),
            TelnetEvent::EraseCharacter => self.encode(TelnetFrame::EraseCharacter, dst),
            TelnetEvent::EraseLine => self.encode(TelnetFrame::EraseLine, dst),
            TelnetEvent::GoAhead => self.encode(TelnetFrame::GoAhead, dst),
            TelnetEvent::EndOfRecord => self.encode(TelnetFrame::EndOfRecord, dst),
            TelnetEvent::Subnegotiate(arg) => self.encode(TelnetFrame::Subnegotiate(arg), dst),
            TelnetEvent::OptionStatus(..) => {
                warn!("attempted to encode an OptionStatus event; it is informational only");
                Ok(())
            }
        }
    }
}

/// Decoder state: tracks progress through the `IAC [verb] [option]` and
/// `IAC SB [option] .. IAC SE` grammars one byte at a time.
#[derive(Clone, Copy, Debug)]
enum DecoderState {
    /// Consuming plain data bytes.
    NormalData,
    /// Saw IAC; next byte names a command.
    InterpretAsCommand,
    /// Saw IAC DO; next byte names the option.
    NegotiateDo,
    /// Saw IAC DONT; next byte names the option.
    NegotiateDont,
    /// Saw IAC WILL; next byte names the option.
    NegotiateWill,
    /// Saw IAC WONT; next byte names the option.
    NegotiateWont,
    /// Saw IAC SB; next byte names the option being subnegotiated.
    Subnegotiate,
    /// Accumulating subnegotiation payload bytes for the named option.
    SubnegotiateArgument(u8),
    /// Saw IAC inside a subnegotiation payload; next byte disambiguates an
    /// escaped 0xFF data byte from the IAC SE terminator.
    SubnegotiateArgumentIAC(u8),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::naws::WindowSize;
    use crate::options::TelnetSide;

    #[test]
    fn decodes_plain_data_byte_by_byte() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&b"hi"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(TelnetEvent::Data(b'h')));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(TelnetEvent::Data(b'i')));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn escaped_iac_decodes_as_single_data_byte() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&[consts::IAC, consts::IAC][..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(TelnetEvent::Data(consts::IAC)));
    }

    #[test]
    fn encode_escapes_iac_in_data() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::new();
        codec.encode(TelnetFrame::Data(consts::IAC), &mut buf).unwrap();
        assert_eq!(&buf[..], &[consts::IAC, consts::IAC]);
    }

    #[test]
    fn receiving_do_for_supported_option_emits_option_status() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&[consts::IAC, consts::DO, consts::option::BINARY][..]);
        let event = codec.decode(&mut buf).unwrap();
        assert_eq!(
            event,
            Some(TelnetEvent::OptionStatus(TelnetOption::TransmitBinary, TelnetSide::Local, true))
        );
        assert!(codec.is_enabled_local(TelnetOption::TransmitBinary));
    }

    #[test]
    fn receiving_do_for_unsupported_option_does_not_enable_it() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&[consts::IAC, consts::DO, consts::option::TTYPE][..]);
        let event = codec.decode(&mut buf).unwrap();
        assert_eq!(event, None);
        assert!(!codec.is_enabled_local(TelnetOption::Ttype));
    }

    #[test]
    fn subnegotiation_round_trips_naws() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::new();
        codec
            .encode(
                TelnetFrame::Subnegotiate(TelnetArgument::Naws(WindowSize::new(132, 43))),
                &mut buf,
            )
            .unwrap();

        let mut decoded = Vec::new();
        while let Some(event) = codec.decode(&mut buf).unwrap() {
            decoded.push(event);
        }
        assert_eq!(
            decoded,
            vec![TelnetEvent::Subnegotiate(TelnetArgument::Naws(WindowSize::new(132, 43)))]
        );
    }

    #[test]
    fn malformed_subnegotiation_is_discarded_as_unknown() {
        let mut codec = TelnetCodec::new();
        // NAWS subnegotiation with only 1 byte of payload (needs 4).
        let mut buf = BytesMut::from(
            &[consts::IAC, consts::SB, consts::option::NAWS, 0x00, consts::IAC, consts::SE][..],
        );
        let event = codec.decode(&mut buf).unwrap().unwrap();
        assert!(matches!(event, TelnetEvent::Subnegotiate(TelnetArgument::Unknown(TelnetOption::Naws, _))));
    }

    #[test]
    fn receiving_do_queues_the_will_reply_for_the_caller_to_flush() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&[consts::IAC, consts::DO, consts::option::BINARY][..]);
        codec.decode(&mut buf).unwrap();
        assert_eq!(codec.take_outgoing(), vec![TelnetFrame::Will(TelnetOption::TransmitBinary)]);
        // Draining is destructive; a second call sees nothing left to send.
        assert!(codec.take_outgoing().is_empty());
    }

    #[test]
    fn unknown_command_after_iac_resumes_as_noop() {
        let mut codec = TelnetCodec::new();
        let mut buf = BytesMut::from(&[consts::IAC, 0x99, b'x'][..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(TelnetEvent::NoOperation));
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(TelnetEvent::Data(b'x')));
    }
}
