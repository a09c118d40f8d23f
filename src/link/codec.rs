//! Link wire format.
//!
//! Two kinds of traffic cross a channel:
//!
//! ```text
//! command word            ┌─────────┬──────────────┬───────────┐
//! (simple commands,       │ opcode  │   reserved   │ parameter │
//!  all responses)         │ 31..24  │    23..8     │   7..0    │
//!                         └─────────┴──────────────┴───────────┘
//!
//! register command        ┌────┬────────┬─────────┬─────────┐
//! (byte-payload path)     │ op │ device │ reg LE  │ value LE│
//!                         │ 1B │   1B   │   2B    │   2B    │
//!                         └────┴────────┴─────────┴─────────┘
//! ```
//!
//! The register command travels postcard-encoded with fixed-width
//! little-endian integers, so the layout above is stable.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::WireError;

/// Capacity of the byte-payload path — one register command with headroom.
pub const DATA_CAPACITY: usize = 16;

/// One message as it crosses the shared queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkFrame {
    /// Bare 32-bit word: simple commands and every response.
    Value(u32),
    /// Tagged byte payload: register read/write commands.
    Data(Vec<u8, DATA_CAPACITY>),
}

/// Camera command opcodes, carried in the top byte of a command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CameraOp {
    Init = 0,
    Deinit = 1,
    Select = 2,
    SendSeqCmd = 3,
}

impl TryFrom<u8> for CameraOp {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, WireError> {
        match value {
            0 => Ok(Self::Init),
            1 => Ok(Self::Deinit),
            2 => Ok(Self::Select),
            3 => Ok(Self::SendSeqCmd),
            other => Err(WireError::UnknownOpcode(other)),
        }
    }
}

/// Pack an opcode and its 8-bit parameter into one command word.
pub const fn pack_command(op: CameraOp, param: u8) -> u32 {
    ((op as u32) << 24) | param as u32
}

/// Split a command word back into opcode and parameter.
pub fn unpack_command(word: u32) -> Result<(CameraOp, u8), WireError> {
    let op = CameraOp::try_from((word >> 24) as u8)?;
    Ok((op, (word & 0xFF) as u8))
}

/// Register space targeted by a [`RegCommand`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegOp {
    ReadI2c,
    WriteI2c,
    ReadMcu,
    WriteMcu,
}

/// Register read/write command sent over the byte-payload path.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegCommand {
    pub op: RegOp,
    pub device: u8,
    #[serde(with = "postcard::fixint::le")]
    pub reg: u16,
    #[serde(with = "postcard::fixint::le")]
    pub value: u16,
}

/// Encode a register command for the byte-payload path.
pub fn encode_reg_command(cmd: &RegCommand) -> Result<Vec<u8, DATA_CAPACITY>, WireError> {
    let mut buf = [0u8; DATA_CAPACITY];
    let used = postcard::to_slice(cmd, &mut buf).map_err(|_| WireError::PayloadTooLarge)?;
    Vec::from_slice(used).map_err(|()| WireError::PayloadTooLarge)
}

/// Decode a received byte payload back into a register command.
pub fn decode_reg_command(bytes: &[u8]) -> Result<RegCommand, WireError> {
    postcard::from_bytes(bytes).map_err(|_| WireError::Malformed)
}
