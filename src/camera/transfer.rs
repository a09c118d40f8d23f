//! Capture modes and the DMA transfer descriptor they derive.
//!
//! A capture transfer is not general-purpose DMA: the source is frozen
//! at the camera data port, the destination advances through the
//! caller's buffer, and one block moves per peripheral trigger so the
//! copy runs exactly as fast as the sensor produces data. Everything
//! about the transfer's shape follows from the capture mode alone.

use crate::error::WireError;

/// Frame geometry: preview streams 256×192, capture is one 640×480 frame.
const PREVIEW_PIXELS: usize = 256 * 192;
const CAPTURE_PIXELS: usize = 640 * 480;

/// Words per block: preview blocks are 512 words, capture blocks 320.
const PREVIEW_BLOCK_WORDS: u32 = 512;
const CAPTURE_BLOCK_WORDS: u32 = 320;

/// Fixed inter-block delay programmed into every capture transfer.
pub const BLOCK_DELAY: u16 = 2;

/// Sensor streaming mode requested around a transfer.
///
/// Discriminants are the sensor sequencer command values carried on the
/// wire, so a mode converts losslessly to its command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CaptureMode {
    /// Continuous low-resolution streaming.
    Preview = 1,
    /// Single full-resolution frame.
    Capture = 2,
}

impl CaptureMode {
    /// Sequencer command byte for this mode.
    pub const fn seq_cmd(self) -> u8 {
        self as u8
    }

    /// Half-words (one per pixel) a full transfer moves.
    pub const fn half_words(self) -> usize {
        match self {
            Self::Preview => PREVIEW_PIXELS,
            Self::Capture => CAPTURE_PIXELS,
        }
    }

    /// 32-bit words a full transfer moves.
    pub const fn words(self) -> u32 {
        (self.half_words() / 2) as u32
    }

    /// Words moved per peripheral trigger.
    pub const fn block_words(self) -> u32 {
        match self {
            Self::Preview => PREVIEW_BLOCK_WORDS,
            Self::Capture => CAPTURE_BLOCK_WORDS,
        }
    }
}

impl TryFrom<u8> for CaptureMode {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, WireError> {
        match value {
            1 => Ok(Self::Preview),
            2 => Ok(Self::Capture),
            other => Err(WireError::UnknownMode(other)),
        }
    }
}

/// Shape of one capture transfer, derived solely from the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferShape {
    /// Total 32-bit words to move.
    pub words: u32,
    /// Words per triggered block.
    pub block_words: u32,
    /// Delay between blocks.
    pub block_delay: u16,
}

impl TransferShape {
    pub const fn for_mode(mode: CaptureMode) -> Self {
        Self {
            words: mode.words(),
            block_words: mode.block_words(),
            block_delay: BLOCK_DELAY,
        }
    }
}

/// Port to the DMA engine that services capture transfers.
pub trait DmaEngine {
    /// Program `channel` to copy `shape.words` words from the frozen
    /// camera data port into `dest`, destination advancing, one block
    /// per peripheral trigger.
    ///
    /// The buffer behind `dest` must stay valid and unmoved until the
    /// transfer completes or [`DmaEngine::stop`] is called.
    fn program(&mut self, channel: u8, dest: *mut u16, shape: TransferShape);

    /// Disable `channel`, abandoning any in-flight transfer.
    fn stop(&mut self, channel: u8);
}
