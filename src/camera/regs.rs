//! Controller-local camera interface registers, as named operations.
//!
//! The physical register layout stays behind this trait: the session
//! state machine only ever asks for the *effect* (gate a clock, flush
//! the buffer, arm the transfer path). A target port implements these
//! against the real memory-mapped registers; tests implement them
//! against an in-memory recorder.

/// Pixel format of the transfer path, selected per capture mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Yuv,
}

/// Named operations on the controller-side camera interface.
pub trait CameraRegs {
    /// Gate the camera interface clock.
    fn interface_clock(&mut self, on: bool);

    /// Gate the external sensor clock.
    fn external_clock(&mut self, on: bool);

    /// True while either camera clock is running.
    fn clocks_active(&self) -> bool;

    /// Clear the master control register entirely.
    fn master_clear(&mut self);

    /// Raise the resynchronisation and power bits in master control.
    fn master_power_up(&mut self);

    /// True if any master-control bit is set.
    fn master_active(&self) -> bool;

    /// True if the master power bit is set.
    fn master_powered(&self) -> bool;

    /// Arm or disarm the frame data transfer path.
    fn transfer_enable(&mut self, on: bool);

    /// True while the transfer path is armed.
    fn transfer_active(&self) -> bool;

    /// Discard any buffered, partially transferred frame data.
    fn transfer_flush(&mut self);

    /// Select the fixed transfer timing used by every capture.
    fn configure_transfer_timing(&mut self);

    /// Enable the transfer-completion interrupt.
    fn completion_irq_enable(&mut self);

    /// Program pixel format and scanlines-per-block for a capture mode.
    fn set_capture_format(&mut self, format: PixelFormat, scanlines: u8);

    /// Clear format and scanline bits ahead of reprogramming.
    fn clear_capture_format(&mut self);

    /// Drop every transfer path bit during teardown.
    fn disable_transfer_path(&mut self);
}
