//! Agent-side command dispatcher.
//!
//! The agent owns the sensor buses and does nothing on its own: it
//! sits on the camera channel, executes each command it receives, and
//! posts exactly one response word back — including for frames it
//! cannot decode, so a controller exchange never hangs on a bad frame.
//!
//! ```text
//!        ┌──────────────── wait_frame ◀────────────────┐
//!        ▼                                             │
//!   decode ──▶ sensor bus operation ──▶ send response ─┘
//! ```
//!
//! There is no concurrent command stream to worry about: the
//! controller-side exchange mutex guarantees the agent sees one
//! command at a time.

pub mod apt;
pub mod bus;

use log::warn;

use crate::camera::Device;
use crate::camera::transfer::CaptureMode;
use crate::link::codec::{
    CameraOp, LinkFrame, RegCommand, RegOp, decode_reg_command, unpack_command,
};
use crate::link::{ChannelId, Link};

use self::bus::SensorBus;

/// The camera agent: sensor bus plus the device it currently drives.
pub struct CameraAgent<B> {
    bus: B,
    active: Option<Device>,
}

impl<B: SensorBus> CameraAgent<B> {
    pub fn new(bus: B) -> Self {
        Self { bus, active: None }
    }

    /// Serve the camera channel forever.
    pub async fn run(&mut self, link: &Link) {
        let ep = link.agent(ChannelId::Camera);
        loop {
            let frame = ep.wait_frame().await;
            let response = self.execute(&frame).await;
            ep.send_value(response).await;
        }
    }

    async fn execute(&mut self, frame: &LinkFrame) -> u32 {
        match frame {
            LinkFrame::Value(word) => match unpack_command(*word) {
                Ok((op, param)) => self.command(op, param).await,
                Err(e) => {
                    warn!("agent: {e}");
                    0
                }
            },
            LinkFrame::Data(bytes) => match decode_reg_command(bytes) {
                Ok(cmd) => self.register_op(&cmd),
                Err(e) => {
                    warn!("agent: {e}");
                    0
                }
            },
        }
    }

    async fn command(&mut self, op: CameraOp, param: u8) -> u32 {
        match op {
            CameraOp::Init => {
                apt::init(&mut self.bus, Device::Inner).await;
                apt::init(&mut self.bus, Device::Outer).await;
                self.active = None;
                // The controller checks this value against the known
                // sensor identity.
                u32::from(self.bus.i2c_read(Device::Inner.id(), apt::REG_CHIP_VERSION))
            }
            CameraOp::Deinit => {
                if let Some(device) = self.active.take() {
                    apt::deactivate(&mut self.bus, device).await;
                }
                apt::deinit(&mut self.bus, Device::Inner).await;
                apt::deinit(&mut self.bus, Device::Outer).await;
                1
            }
            CameraOp::Select => match Device::try_from(param) {
                Ok(device) => {
                    if let Some(previous) = self.active {
                        if previous != device {
                            apt::deactivate(&mut self.bus, previous).await;
                        }
                    }
                    apt::activate(&mut self.bus, device).await;
                    self.active = Some(device);
                    1
                }
                Err(e) => {
                    warn!("agent: {e}");
                    0
                }
            },
            CameraOp::SendSeqCmd => match (self.active, CaptureMode::try_from(param)) {
                (Some(device), Ok(mode)) => {
                    apt::set_mode(&mut self.bus, device, mode).await;
                    1
                }
                (None, _) => {
                    warn!("agent: sequencer command with no device selected");
                    0
                }
                (_, Err(e)) => {
                    warn!("agent: {e}");
                    0
                }
            },
        }
    }

    fn register_op(&mut self, cmd: &RegCommand) -> u32 {
        match cmd.op {
            RegOp::ReadI2c => u32::from(self.bus.i2c_read(cmd.device, cmd.reg)),
            RegOp::WriteI2c => u32::from(self.bus.i2c_write(cmd.device, cmd.reg, cmd.value)),
            RegOp::ReadMcu => u32::from(self.bus.mcu_read(cmd.device, cmd.reg)),
            RegOp::WriteMcu => u32::from(self.bus.mcu_write(cmd.device, cmd.reg, cmd.value)),
        }
    }
}
