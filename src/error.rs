//! Error types for the wire-facing seams of the crate.
//!
//! Only the places where raw bytes or raw identifier values enter the
//! system can fail in a way worth typing: the command-word and register
//! message codecs, and the identifier conversions the agent performs on
//! received values. The high-level camera API deliberately keeps its
//! boolean success/failure surface; bus-level trouble on the agent side
//! is folded into the response value, not reported separately.

use core::fmt;

/// Errors from decoding or encoding link traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// Command word carries an opcode outside the dispatch table.
    UnknownOpcode(u8),
    /// Device identifier with no matching camera device.
    UnknownDevice(u8),
    /// Sequencer command byte that is neither preview nor capture.
    UnknownMode(u8),
    /// Register command did not fit the byte-payload frame.
    PayloadTooLarge,
    /// Byte payload did not decode as a register command.
    Malformed,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpcode(op) => write!(f, "unknown opcode {op:#04x}"),
            Self::UnknownDevice(id) => write!(f, "unknown device {id}"),
            Self::UnknownMode(mode) => write!(f, "unknown capture mode {mode}"),
            Self::PayloadTooLarge => write!(f, "payload exceeds frame capacity"),
            Self::Malformed => write!(f, "malformed register command payload"),
        }
    }
}

/// Crate-wide `Result` alias for wire-facing operations.
pub type Result<T> = core::result::Result<T, WireError>;
