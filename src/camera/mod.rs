//! Controller-side camera protocol.
//!
//! The controller cannot reach the camera buses; every sensor-touching
//! operation is an exchange over the [`link`](crate::link) camera
//! channel, answered by the agent. What the controller *does* own is
//! the local interface: clocks, the master control register, the
//! transfer path, and the DMA engine — driven here in the exact
//! bring-up/teardown order the sensor requires, settling delays
//! included.
//!
//! ```text
//! Uninitialized ──init──▶ Initialized ──select──▶ DeviceSelected
//!       ▲                      │                        │
//!       └───────deinit─────────┴──────┐          start_transfer
//!                                     │                 ▼
//!                                     └──────────── Transferring
//! ```

pub mod regs;
pub mod transfer;

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::agent::apt;
use crate::error::WireError;
use crate::link::codec::{CameraOp, RegCommand, RegOp, pack_command};
use crate::link::{ChannelId, Link};

use self::regs::{CameraRegs, PixelFormat};
use self::transfer::{CaptureMode, DmaEngine, TransferShape};

/// Settling time after toggling either camera clock.
const CLOCK_SETTLE_US: u32 = 30;
/// Settling time after raising the master power bits.
const POWER_SETTLE_US: u32 = 8200;
/// Settling time after restarting the external clock.
const RESTART_SETTLE_US: u32 = 20;

/// Physical camera devices on the sensor bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Device {
    Inner = 1,
    Outer = 2,
}

impl Device {
    /// Wire identifier for this device.
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Device {
    type Error = WireError;

    fn try_from(value: u8) -> Result<Self, WireError> {
        match value {
            1 => Ok(Self::Inner),
            2 => Ok(Self::Outer),
            other => Err(WireError::UnknownDevice(other)),
        }
    }
}

/// Observable state of the camera session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initialized,
    DeviceSelected,
    Transferring,
}

/// The transfer currently programmed, if any.
#[derive(Debug, Clone, Copy)]
struct ActiveTransfer {
    mode: CaptureMode,
    channel: u8,
}

/// One camera session: owns the interface registers, the DMA engine,
/// the delay source, and all controller-side protocol state.
///
/// Constructed once per process and passed by reference; no state
/// lives outside it.
pub struct CameraSession<'l, R, M, D> {
    link: &'l Link,
    regs: R,
    dma: M,
    delay: D,
    state: SessionState,
    active_device: Option<Device>,
    transfer: Option<ActiveTransfer>,
}

impl<'l, R, M, D> CameraSession<'l, R, M, D>
where
    R: CameraRegs,
    M: DmaEngine,
    D: DelayNs,
{
    pub fn new(link: &'l Link, regs: R, dma: M, delay: D) -> Self {
        Self {
            link,
            regs,
            dma,
            delay,
            state: SessionState::Uninitialized,
            active_device: None,
            transfer: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Currently selected device, if a SELECT exchange has succeeded.
    pub fn active_device(&self) -> Option<Device> {
        self.active_device
    }

    /// Current capture mode, while a transfer is programmed.
    pub fn transfer_mode(&self) -> Option<CaptureMode> {
        self.transfer.map(|t| t.mode)
    }

    /// Bring up the camera interface and verify the sensor identity.
    ///
    /// Re-runs teardown first if a previous session left hardware
    /// enabled. Returns `false` if the sensor does not answer with the
    /// expected identity; hardware is powered back down in that case.
    pub async fn init(&mut self) -> bool {
        if self.regs.master_active() || self.regs.clocks_active() {
            self.deinit().await;
        }

        self.regs.interface_clock(true);
        self.regs.master_clear();
        self.delay.delay_us(CLOCK_SETTLE_US);
        self.regs.external_clock(true);
        self.delay.delay_us(CLOCK_SETTLE_US);
        self.regs.master_power_up();
        self.delay.delay_us(POWER_SETTLE_US);
        self.regs.external_clock(false);
        self.regs.transfer_enable(false);
        self.regs.transfer_flush();
        self.regs.configure_transfer_timing();
        self.regs.completion_irq_enable();
        self.regs.external_clock(true);
        self.delay.delay_us(RESTART_SETTLE_US);

        let ep = self.link.controller(ChannelId::Camera);
        let response = ep
            .exchange_value_polled(pack_command(CameraOp::Init, 0))
            .await;

        // One more external clock cycle after the init exchange; the
        // sensor misbehaves without it.
        self.regs.external_clock(false);
        self.regs.external_clock(true);
        self.delay.delay_us(RESTART_SETTLE_US);

        if response == u32::from(apt::CHIP_VERSION_MT9V113) {
            self.state = SessionState::Initialized;
            info!("camera: sensor identified, interface up");
            true
        } else {
            warn!("camera: unexpected sensor identity {response:#06x}");
            self.deinit().await;
            false
        }
    }

    /// Tear the session down.
    ///
    /// Returns `false` when there was nothing to tear down, making a
    /// second call in a row a reported no-op.
    pub async fn deinit(&mut self) -> bool {
        if self.regs.master_powered() {
            let ep = self.link.controller(ChannelId::Camera);
            ep.exchange_value(pack_command(CameraOp::Deinit, 0)).await;
        }

        if !self.regs.master_active() && !self.regs.clocks_active() {
            return false;
        }

        self.regs.disable_transfer_path();
        self.regs.transfer_flush();
        self.regs.external_clock(false);
        self.delay.delay_us(CLOCK_SETTLE_US);
        self.regs.master_clear();
        self.regs.interface_clock(false);
        self.delay.delay_us(CLOCK_SETTLE_US);

        self.active_device = None;
        self.transfer = None;
        self.state = SessionState::Uninitialized;
        info!("camera: interface down");
        true
    }

    /// Select the device subsequent captures come from.
    ///
    /// The recorded active device changes only on success.
    pub async fn select(&mut self, device: Device) -> bool {
        let ep = self.link.controller(ChannelId::Camera);
        let ok = ep
            .exchange_value(pack_command(CameraOp::Select, device.id()))
            .await
            != 0;
        if ok {
            self.active_device = Some(device);
            self.state = SessionState::DeviceSelected;
        }
        ok
    }

    /// Put the sensor into `mode` and program a transfer of one frame
    /// stream into `buffer` on DMA `channel`.
    ///
    /// A transfer already in flight is stopped first, so at most one
    /// descriptor is ever active. Fails without touching hardware if
    /// the buffer cannot hold a full frame for the mode.
    pub async fn start_transfer(
        &mut self,
        buffer: &mut [u16],
        mode: CaptureMode,
        channel: u8,
    ) -> bool {
        if buffer.len() < mode.half_words() {
            warn!(
                "camera: buffer holds {} half-words, mode needs {}",
                buffer.len(),
                mode.half_words()
            );
            return false;
        }

        if self.regs.transfer_active() {
            self.stop_transfer();
        }

        let ep = self.link.controller(ChannelId::Camera);
        ep.exchange_value(pack_command(CameraOp::SendSeqCmd, mode.seq_cmd()))
            .await;

        self.regs.clear_capture_format();
        match mode {
            CaptureMode::Preview => self.regs.set_capture_format(PixelFormat::Rgb, 4),
            CaptureMode::Capture => self.regs.set_capture_format(PixelFormat::Yuv, 1),
        }
        self.regs.transfer_flush();
        self.regs.transfer_enable(true);

        self.dma
            .program(channel, buffer.as_mut_ptr(), TransferShape::for_mode(mode));

        self.transfer = Some(ActiveTransfer { mode, channel });
        self.state = SessionState::Transferring;
        true
    }

    /// Disarm the transfer path and stop the owning DMA channel.
    pub fn stop_transfer(&mut self) {
        self.regs.transfer_enable(false);
        if let Some(t) = self.transfer.take() {
            self.dma.stop(t.channel);
        }
        if self.state == SessionState::Transferring {
            self.state = if self.active_device.is_some() {
                SessionState::DeviceSelected
            } else {
                SessionState::Initialized
            };
        }
    }

    /// Read a sensor register in the I2C space.
    pub async fn i2c_read(&mut self, device: Device, reg: u16) -> u16 {
        self.ll_call(RegOp::ReadI2c, device, reg, 0).await
    }

    /// Write a sensor register in the I2C space; returns the bus status.
    pub async fn i2c_write(&mut self, device: Device, reg: u16, value: u16) -> u16 {
        self.ll_call(RegOp::WriteI2c, device, reg, value).await
    }

    /// Read a sensor variable in the MCU space.
    pub async fn mcu_read(&mut self, device: Device, reg: u16) -> u16 {
        self.ll_call(RegOp::ReadMcu, device, reg, 0).await
    }

    /// Write a sensor variable in the MCU space; returns the bus status.
    pub async fn mcu_write(&mut self, device: Device, reg: u16, value: u16) -> u16 {
        self.ll_call(RegOp::WriteMcu, device, reg, value).await
    }

    async fn ll_call(&mut self, op: RegOp, device: Device, reg: u16, value: u16) -> u16 {
        let cmd = RegCommand {
            op,
            device: device.id(),
            reg,
            value,
        };
        let ep = self.link.controller(ChannelId::Camera);
        match ep.exchange_data(&cmd).await {
            Ok(response) => response as u16,
            Err(e) => {
                warn!("camera: register command not sent: {e}");
                0
            }
        }
    }
}
