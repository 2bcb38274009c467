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

//! Option table and RFC 1143 Q-method state machine.

use crate::{CodecError, CodecResult, TelnetFrame, consts};

/// A negotiable Telnet option, limited to the set this crate implements.
///
/// [IANA Telnet Option assignments](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml)
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetOption {
    /// [RFC856](https://tools.ietf.org/html/rfc856) Binary Transmission.
    TransmitBinary,
    /// [RFC857](https://tools.ietf.org/html/rfc857) Echo.
    Echo,
    /// [RFC858](https://tools.ietf.org/html/rfc858) Suppress Go Ahead.
    SuppressGoAhead,
    /// [RFC859](https://tools.ietf.org/html/rfc859) Status.
    Status,
    /// [RFC1091](https://tools.ietf.org/html/rfc1091) Terminal Type.
    Ttype,
    /// [RFC885](https://tools.ietf.org/html/rfc885) End of Record.
    EndOfRecord,
    /// [RFC1073](https://tools.ietf.org/html/rfc1073) Negotiate About Window Size.
    Naws,
    /// [RFC1079](https://tools.ietf.org/html/rfc1079) Terminal Speed.
    Tspeed,
    /// [RFC1372](https://tools.ietf.org/html/rfc1372) Remote Flow Control.
    Lflow,
    /// [RFC1184](https://tools.ietf.org/html/rfc1184) Linemode.
    Linemode,
    /// [RFC1096](https://tools.ietf.org/html/rfc1096) X Display Location.
    Xdisploc,
    /// [RFC1572](https://tools.ietf.org/html/rfc1572) New Environment.
    NewEnviron,
    /// [RFC2066](https://tools.ietf.org/html/rfc2066) Charset.
    Charset,
    /// An option code this crate does not implement.
    Unknown(u8),
}

impl TelnetOption {
    /// The wire byte for this option.
    pub fn to_u8(&self) -> u8 {
        match self {
            TelnetOption::TransmitBinary => consts::option::BINARY,
            TelnetOption::Echo => consts::option::ECHO,
            TelnetOption::SuppressGoAhead => consts::option::SGA,
            TelnetOption::Status => consts::option::STATUS,
            TelnetOption::Ttype => consts::option::TTYPE,
            TelnetOption::EndOfRecord => consts::option::EOR,
            TelnetOption::Naws => consts::option::NAWS,
            TelnetOption::Tspeed => consts::option::TSPEED,
            TelnetOption::Lflow => consts::option::LFLOW,
            TelnetOption::Linemode => consts::option::LINEMODE,
            TelnetOption::Xdisploc => consts::option::XDISPLOC,
            TelnetOption::NewEnviron => consts::option::NEW_ENVIRON,
            TelnetOption::Charset => consts::option::CHARSET,
            TelnetOption::Unknown(byte) => *byte,
        }
    }

    /// Maps a wire byte to the option it names, or `Unknown(byte)`.
    pub fn from_u8(byte: u8) -> Self {
        match byte {
            consts::option::BINARY => TelnetOption::TransmitBinary,
            consts::option::ECHO => TelnetOption::Echo,
            consts::option::SGA => TelnetOption::SuppressGoAhead,
            consts::option::STATUS => TelnetOption::Status,
            consts::option::TTYPE => TelnetOption::Ttype,
            consts::option::EOR => TelnetOption::EndOfRecord,
            consts::option::NAWS => TelnetOption::Naws,
            consts::option::TSPEED => TelnetOption::Tspeed,
            consts::option::LFLOW => TelnetOption::Lflow,
            consts::option::LINEMODE => TelnetOption::Linemode,
            consts::option::XDISPLOC => TelnetOption::Xdisploc,
            consts::option::NEW_ENVIRON => TelnetOption::NewEnviron,
            consts::option::CHARSET => TelnetOption::Charset,
            byte => TelnetOption::Unknown(byte),
        }
    }

    /// Whether this crate is willing to enable the option on the local side.
    pub fn supported_local(&self) -> bool {
        consts::option::SUPPORT[self.to_u8() as usize].0
    }

    /// Whether this crate is willing to ask the remote side to enable the option.
    pub fn supported_remote(&self) -> bool {
        consts::option::SUPPORT[self.to_u8() as usize].1
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetOption::TransmitBinary => write!(f, "TransmitBinary"),
            TelnetOption::Echo => write!(f, "Echo"),
            TelnetOption::SuppressGoAhead => write!(f, "SuppressGoAhead"),
            TelnetOption::Status => write!(f, "Status"),
            TelnetOption::Ttype => write!(f, "Ttype"),
            TelnetOption::EndOfRecord => write!(f, "EndOfRecord"),
            TelnetOption::Naws => write!(f, "Naws"),
            TelnetOption::Tspeed => write!(f, "Tspeed"),
            TelnetOption::Lflow => write!(f, "Lflow"),
            TelnetOption::Linemode => write!(f, "Linemode"),
            TelnetOption::Xdisploc => write!(f, "Xdisploc"),
            TelnetOption::NewEnviron => write!(f, "NewEnviron"),
            TelnetOption::Charset => write!(f, "Charset"),
            TelnetOption::Unknown(option) => write!(f, "Unknown({option})"),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        Self::from_u8(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.to_u8()
    }
}

/// Which side of a negotiation an option's state describes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetSide {
    /// What *we* do (WILL/WONT sent by us, DO/DONT received in response).
    Local,
    /// What the *peer* does (DO/DONT sent by us, WILL/WONT received in response).
    Remote,
}

impl std::fmt::Display for TelnetSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelnetSide::Local => write!(f, "Local"),
            TelnetSide::Remote => write!(f, "Remote"),
        }
    }
}

/// RFC 1143 Q-method negotiation state for one option, one direction.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) enum QState {
    #[default]
    No,
    WantNo,
    WantNoOpposite,
    Yes,
    WantYes,
    WantYesOpposite,
}

impl std::fmt::Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QState::No => write!(f, "No"),
            QState::WantNo => write!(f, "WantNo"),
            QState::WantNoOpposite => write!(f, "WantNoOpposite"),
            QState::Yes => write!(f, "Yes"),
            QState::WantYes => write!(f, "WantYes"),
            QState::WantYesOpposite => write!(f, "WantYesOpposite"),
        }
    }
}

#[derive(Clone, Debug, Default)]
struct OptionState {
    local: QState,
    remote: QState,
}

#[derive(Clone, Debug, Default)]
struct SupportState {
    local: bool,
    remote: bool,
}

/// Per-option, per-direction negotiation state for an entire session.
///
/// Owns no I/O; `enable_*`/`disable_*`/`handle_received` return the frame (if
/// any) the caller must write to the wire to carry out the Q-method.
#[derive(Clone, Debug)]
pub struct TelnetOptions {
    config: [SupportState; 256],
    state: [OptionState; 256],
}

impl TelnetOptions {
    /// Whether we are willing to enable `option` locally.
    pub fn is_supported_local(&self, option: TelnetOption) -> bool {
        self.config[option.to_u8() as usize].local
    }

    /// Whether we are willing to ask the remote side to enable `option`.
    pub fn is_supported_remote(&self, option: TelnetOption) -> bool {
        self.config[option.to_u8() as usize].remote
    }

    /// True once the local side has fully enabled `option` (or is mid-disable
    /// but hasn't heard back yet — matches the spec's "still effectively
    /// enabled until confirmed off").
    pub fn local_enabled(&self, option: TelnetOption) -> bool {
        matches!(
            self.state[option.to_u8() as usize].local,
            QState::Yes | QState::WantNo | QState::WantNoOpposite
        )
    }

    /// True once the remote side has fully enabled `option`.
    pub fn remote_enabled(&self, option: TelnetOption) -> bool {
        matches!(
            self.state[option.to_u8() as usize].remote,
            QState::Yes | QState::WantNo | QState::WantNoOpposite
        )
    }

    /// Request that we enable `option`; returns the WILL frame to send, if any.
    pub fn enable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.request_will(option)
    }

    /// Request that we disable `option`; returns the WONT frame to send, if any.
    pub fn disable_local(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.request_wont(option)
    }

    /// Ask the remote side to enable `option`; returns the DO frame, if any.
    pub fn enable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.request_do(option)
    }

    /// Ask the remote side to disable `option`; returns the DONT frame, if any.
    pub fn disable_remote(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        self.request_dont(option)
    }

    /// Feed a received negotiation frame through the Q-method; returns the
    /// response frame (if any) the caller must write back.
    pub fn handle_received(&mut self, frame: TelnetFrame) -> CodecResult<Option<TelnetFrame>> {
        match frame {
            TelnetFrame::Do(option) => Ok(self.recv_do(option)),
            TelnetFrame::Dont(option) => Ok(self.recv_dont(option)),
            TelnetFrame::Will(option) => Ok(self.recv_will(option)),
            TelnetFrame::Wont(option) => Ok(self.recv_wont(option)),
            other => Err(CodecError::NegotiationError {
                reason: "not a negotiation frame".into(),
                frame_type: Some(format!("{other:?}")),
            }),
        }
    }

    /// Snapshot of (local, remote) enabled status for every option this crate
    /// has an opinion on — used by the STATUS (RFC 859) handler.
    pub fn enabled_snapshot(&self) -> Vec<(TelnetOption, bool, bool)> {
        [
            TelnetOption::TransmitBinary,
            TelnetOption::Echo,
            TelnetOption::SuppressGoAhead,
            TelnetOption::Status,
            TelnetOption::Ttype,
            TelnetOption::EndOfRecord,
            TelnetOption::Naws,
            TelnetOption::Tspeed,
            TelnetOption::Lflow,
            TelnetOption::Linemode,
            TelnetOption::Xdisploc,
            TelnetOption::NewEnviron,
            TelnetOption::Charset,
        ]
        .into_iter()
        .map(|opt| (opt, self.local_enabled(opt), self.remote_enabled(opt)))
        .collect()
    }

    fn request_will(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        if !self.config[idx].local {
            return None;
        }
        match self.state[idx].local {
            QState::Yes | QState::WantYes | QState::WantYesOpposite => None,
            QState::No => {
                self.state[idx].local = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
            QState::WantNo => {
                self.state[idx].local = QState::WantYesOpposite;
                Some(TelnetFrame::Will(option))
            }
            QState::WantNoOpposite => {
                self.state[idx].local = QState::WantYes;
                Some(TelnetFrame::Will(option))
            }
        }
    }

    fn request_wont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        match self.state[idx].local {
            QState::No | QState::WantNo | QState::WantNoOpposite => None,
            QState::Yes => {
                self.state[idx].local = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantYes => {
                self.state[idx].local = QState::WantNoOpposite;
                Some(TelnetFrame::Wont(option))
            }
            QState::WantYesOpposite => {
                self.state[idx].local = QState::WantNo;
                Some(TelnetFrame::Wont(option))
            }
        }
    }

    fn request_do(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        if !self.config[idx].remote {
            return None;
        }
        match self.state[idx].remote {
            QState::Yes | QState::WantYes | QState::WantYesOpposite => None,
            QState::No => {
                self.state[idx].remote = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
            QState::WantNo => {
                self.state[idx].remote = QState::WantYesOpposite;
                Some(TelnetFrame::Do(option))
            }
            QState::WantNoOpposite => {
                self.state[idx].remote = QState::WantYes;
                Some(TelnetFrame::Do(option))
            }
        }
    }

    fn request_dont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        match self.state[idx].remote {
            QState::No | QState::WantNo | QState::WantNoOpposite => None,
            QState::Yes => {
                self.state[idx].remote = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantYes => {
                self.state[idx].remote = QState::WantNoOpposite;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantYesOpposite => {
                self.state[idx].remote = QState::WantNo;
                Some(TelnetFrame::Dont(option))
            }
        }
    }

    fn recv_will(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        if !self.config[idx].remote {
            return Some(TelnetFrame::Dont(option));
        }
        match self.state[idx].remote {
            QState::No => {
                self.state[idx].remote = QState::Yes;
                Some(TelnetFrame::Do(option))
            }
            QState::Yes => None,
            QState::WantNo => {
                self.state[idx].remote = QState::WantNoOpposite;
                Some(TelnetFrame::Dont(option))
            }
            QState::WantNoOpposite => {
                self.state[idx].remote = QState::Yes;
                None
            }
            QState::WantYes => {
                self.state[idx].remote = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                self.state[idx].remote = QState::Yes;
                None
            }
        }
    }

    fn recv_wont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        match self.state[idx].remote {
            QState::No => None,
            QState::Yes
            | QState::WantNo
            | QState::WantNoOpposite
            | QState::WantYes
            | QState::WantYesOpposite => {
                self.state[idx].remote = QState::No;
                None
            }
        }
    }

    fn recv_do(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        if !self.config[idx].local {
            return Some(TelnetFrame::Wont(option));
        }
        match self.state[idx].local {
            QState::No => {
                self.state[idx].local = QState::Yes;
                Some(TelnetFrame::Will(option))
            }
            QState::Yes => None,
            QState::WantNo => {
                self.state[idx].local = QState::WantNoOpposite;
                Some(TelnetFrame::Will(option))
            }
            QState::WantNoOpposite => {
                self.state[idx].local = QState::Yes;
                None
            }
            QState::WantYes => {
                self.state[idx].local = QState::Yes;
                None
            }
            QState::WantYesOpposite => {
                self.state[idx].local = QState::Yes;
                None
            }
        }
    }

    fn recv_dont(&mut self, option: TelnetOption) -> Option<TelnetFrame> {
        let idx = option.to_u8() as usize;
        match self.state[idx].local {
            QState::No => None,
            QState::Yes
            | QState::WantNo
            | QState::WantNoOpposite
            | QState::WantYes
            | QState::WantYesOpposite => {
                self.state[idx].local = QState::No;
                None
            }
        }
    }
}

impl Default for TelnetOptions {
    fn default() -> Self {
        TelnetOptions {
            config: core::array::from_fn(|idx| {
                let option = TelnetOption::from_u8(idx as u8);
                SupportState {
                    local: option.supported_local(),
                    remote: option.supported_remote(),
                }
            }),
            state: core::array::from_fn(|_| OptionState::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_state_defaults_to_no() {
        let state = OptionState::default();
        assert_eq!(state.local, QState::No);
        assert_eq!(state.remote, QState::No);
    }

    #[test]
    fn local_enable_from_no_sends_will_and_waits() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::TransmitBinary;

        assert!(!opts.local_enabled(opt));
        let frame = opts.enable_local(opt);
        assert_eq!(frame, Some(TelnetFrame::Will(opt)));
        assert!(!opts.local_enabled(opt));

        // peer agrees with DO
        let reply = opts.handle_received(TelnetFrame::Do(opt)).unwrap();
        assert_eq!(reply, None);
        assert!(opts.local_enabled(opt));
    }

    #[test]
    fn local_enable_idempotent_once_yes() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::SuppressGoAhead;
        opts.enable_local(opt);
        opts.handle_received(TelnetFrame::Do(opt)).unwrap();
        assert!(opts.local_enabled(opt));
        // enabling again produces no further frame
        assert_eq!(opts.enable_local(opt), None);
    }

    #[test]
    fn simultaneous_negotiation_resolves_via_opposite_state() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::SuppressGoAhead;

        // We decide to disable while a WILL is already in flight (WantYes).
        opts.enable_local(opt);
        let frame = opts.disable_local(opt);
        assert_eq!(frame, Some(TelnetFrame::Wont(opt)));

        // Peer, unaware, answers DO to our original WILL.
        let reply = opts.handle_received(TelnetFrame::Do(opt)).unwrap();
        // RFC 1143: WantNoOpposite + DO -> Yes, no reply (matches local_qstate WantYes path below)
        assert_eq!(reply, None);
    }

    #[test]
    fn remote_refuses_with_dont_for_unsupported_option() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::Unknown(200);
        let reply = opts.handle_received(TelnetFrame::Will(opt)).unwrap();
        assert_eq!(reply, Some(TelnetFrame::Dont(opt)));
        assert!(!opts.remote_enabled(opt));
    }

    #[test]
    fn recv_do_for_unsupported_option_refuses_with_wont() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::Ttype; // not locally offered by default (client-only set elsewhere)
        let reply = opts.handle_received(TelnetFrame::Do(opt)).unwrap();
        assert_eq!(reply, Some(TelnetFrame::Wont(opt)));
    }

    #[test]
    fn recv_wont_always_settles_at_no() {
        let mut opts = TelnetOptions::default();
        let opt = TelnetOption::TransmitBinary;
        opts.enable_remote(opt);
        opts.handle_received(TelnetFrame::Will(opt)).unwrap();
        assert!(opts.remote_enabled(opt));
        let reply = opts.handle_received(TelnetFrame::Wont(opt)).unwrap();
        assert_eq!(reply, None);
        assert!(!opts.remote_enabled(opt));
    }

    #[test]
    fn handle_received_rejects_non_negotiation_frames() {
        let mut opts = TelnetOptions::default();
        let err = opts.handle_received(TelnetFrame::Data(b'x')).unwrap_err();
        assert!(matches!(err, CodecError::NegotiationError { .. }));
    }

    #[test]
    fn enabled_snapshot_reports_all_tracked_options() {
        let opts = TelnetOptions::default();
        let snapshot = opts.enabled_snapshot();
        assert_eq!(snapshot.len(), 13);
        assert!(snapshot.iter().all(|(_, local, remote)| !local && !remote));
    }
}
