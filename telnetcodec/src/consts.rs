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

//! Wire-level constants: command bytes and option codes from RFC 854 and
//! its companion option RFCs. Data, not behavior.

/// Interpret-As-Command escape byte.
pub const IAC: u8 = 255;
/// WILL command: sender wants to enable an option locally.
pub const WILL: u8 = 251;
/// WONT command: sender refuses/disables an option locally.
pub const WONT: u8 = 252;
/// DO command: sender asks peer to enable an option.
pub const DO: u8 = 253;
/// DONT command: sender asks peer to disable an option.
pub const DONT: u8 = 254;
/// Begin subnegotiation.
pub const SB: u8 = 250;
/// End subnegotiation.
pub const SE: u8 = 240;
/// Go Ahead.
pub const GA: u8 = 249;
/// Erase Line.
pub const EL: u8 = 248;
/// Erase Character.
pub const EC: u8 = 247;
/// Are You There.
pub const AYT: u8 = 246;
/// Abort Output.
pub const AO: u8 = 245;
/// Interrupt Process.
pub const IP: u8 = 244;
/// Break.
pub const BRK: u8 = 243;
/// Data Mark.
pub const DM: u8 = 242;
/// No Operation.
pub const NOP: u8 = 241;
/// End of Record (RFC 885).
pub const EOR: u8 = 239;

/// Carriage Return.
pub const CR: u8 = 0x0D;
/// Line Feed.
pub const LF: u8 = 0x0A;
/// NUL byte, sent after a bare CR per RFC 854 §2.4.
pub const NUL: u8 = 0x00;

/// True if `cmd` is one of the negotiation verbs (WILL/WONT/DO/DONT).
pub fn is_negotiation(cmd: u8) -> bool {
    matches!(cmd, WILL | WONT | DO | DONT)
}

/// Telnet option codes (IANA Telnet Option assignments actually used by this crate).
pub mod option {
    /// RFC 856 Binary Transmission.
    pub const BINARY: u8 = 0;
    /// RFC 857 Echo.
    pub const ECHO: u8 = 1;
    /// RFC 858 Suppress Go Ahead.
    pub const SGA: u8 = 3;
    /// RFC 859 Status.
    pub const STATUS: u8 = 5;
    /// RFC 1091 Terminal Type.
    pub const TTYPE: u8 = 24;
    /// RFC 885 End of Record.
    pub const EOR: u8 = 25;
    /// RFC 1073 Negotiate About Window Size.
    pub const NAWS: u8 = 31;
    /// RFC 1079 Terminal Speed.
    pub const TSPEED: u8 = 32;
    /// RFC 1372 Remote Flow Control.
    pub const LFLOW: u8 = 33;
    /// RFC 1184 Linemode.
    pub const LINEMODE: u8 = 34;
    /// RFC 1096 X Display Location.
    pub const XDISPLOC: u8 = 35;
    /// RFC 1572 New Environment.
    pub const NEW_ENVIRON: u8 = 39;
    /// RFC 2066 Charset.
    pub const CHARSET: u8 = 42;

    /// Highest option code this table accounts for.
    const TABLE_LEN: usize = 256;

    /// Per-option (supported-local, supported-remote) policy, indexed by option code.
    ///
    /// "Supported" here means this crate is willing to agree to enabling the
    /// option in that direction; it does not mean the option is enabled by default.
    pub const SUPPORT: [(bool, bool); TABLE_LEN] = {
        let mut table = [(false, false); TABLE_LEN];
        table[BINARY as usize] = (true, true);
        table[ECHO as usize] = (true, false);
        table[SGA as usize] = (true, true);
        table[STATUS as usize] = (true, true);
        table[TTYPE as usize] = (false, true);
        table[NAWS as usize] = (false, true);
        table[TSPEED as usize] = (false, true);
        table[LINEMODE as usize] = (true, true);
        table[XDISPLOC as usize] = (false, true);
        table[NEW_ENVIRON as usize] = (false, true);
        table[CHARSET as usize] = (true, true);
        table
    };

    /// Subnegotiation command bytes shared by TTYPE/TSPEED/XDISPLOC/NEW-ENVIRON/STATUS.
    pub mod command {
        /// IS: a value is being reported.
        pub const IS: u8 = 0;
        /// SEND: request the peer report its value.
        pub const SEND: u8 = 1;
    }

    /// STATUS (RFC 859) subnegotiation command bytes.
    pub mod status {
        pub use super::command::{IS, SEND};
    }

    /// NEW-ENVIRON (RFC 1572) subnegotiation bytes.
    pub mod environ {
        pub use super::command::{IS, SEND};
        /// INFO: unsolicited report of environment variables.
        pub const INFO: u8 = 2;
        /// VAR: well-known variable name follows.
        pub const VAR: u8 = 0;
        /// VALUE: value for the preceding name follows.
        pub const VALUE: u8 = 1;
        /// USERVAR: user-defined variable name follows.
        pub const USERVAR: u8 = 3;
        /// ESC: literal escape of a following VAR/VALUE/USERVAR/ESC byte in a name/value.
        pub const ESC: u8 = 2;
    }

    /// LINEMODE (RFC 1184) subnegotiation bytes.
    pub mod linemode {
        /// MODE subnegotiation.
        pub const MODE: u8 = 1;
        /// FORWARDMASK subnegotiation.
        pub const FORWARDMASK: u8 = 2;
        /// SLC (Set Local Characters) subnegotiation.
        pub const SLC: u8 = 3;

        /// EDIT mode bit: client performs line editing locally.
        pub const MODE_EDIT: u8 = 0x01;
        /// TRAPSIG mode bit: client traps signals locally.
        pub const MODE_TRAPSIG: u8 = 0x02;
        /// MODE_ACK bit: this MODE subnegotiation acknowledges a previous one.
        pub const MODE_ACK: u8 = 0x04;
        /// SOFT_TAB mode bit.
        pub const MODE_SOFT_TAB: u8 = 0x08;
        /// LIT_ECHO mode bit.
        pub const MODE_LIT_ECHO: u8 = 0x10;

        /// Number of SLC function slots defined by RFC 1184.
        pub const SLC_FUNCTION_COUNT: usize = 30;
    }

    /// CHARSET (RFC 2066) subnegotiation bytes.
    pub mod charset {
        /// REQUEST: propose a list of charsets.
        pub const REQUEST: u8 = 1;
        /// ACCEPTED: responder picked one.
        pub const ACCEPTED: u8 = 2;
        /// REJECTED: responder accepted none.
        pub const REJECTED: u8 = 3;
        /// TTABLE-IS / TTABLE-REJECTED are not implemented by this crate.
        pub const TTABLE_REJECTED: u8 = 5;
    }
}
