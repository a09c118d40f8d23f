//! Mock hardware adapters for integration tests.
//!
//! Every adapter records the operations performed on it behind a
//! shared handle (`Rc<RefCell<_>>`), so a clone can go into the
//! session/agent under test while the test keeps one to assert on the
//! full call history afterwards. The sensor mock additionally models
//! the handful of self-settling registers the bring-up sequences poll,
//! so the agent's wait loops terminate.

#![allow(dead_code)] // Not every test crate touches every recorder.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use camlink::agent::apt;
use camlink::agent::bus::{MCU_ADDRESS, MCU_DATA, SensorBus};
use camlink::camera::regs::{CameraRegs, PixelFormat};
use camlink::camera::transfer::{DmaEngine, TransferShape};
use embedded_hal::delay::DelayNs;

// ── Camera interface registers ───────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegCall {
    InterfaceClock(bool),
    ExternalClock(bool),
    MasterClear,
    MasterPowerUp,
    TransferEnable(bool),
    TransferFlush,
    ConfigureTiming,
    IrqEnable,
    SetFormat(PixelFormat, u8),
    ClearFormat,
    DisableTransferPath,
}

#[derive(Default)]
pub struct RegsState {
    pub interface_clock: bool,
    pub external_clock: bool,
    pub master_any: bool,
    pub master_powered: bool,
    pub transfer_enabled: bool,
    pub calls: Vec<RegCall>,
}

impl RegsState {
    pub fn powered_down(&self) -> bool {
        !self.interface_clock
            && !self.external_clock
            && !self.master_any
            && !self.master_powered
            && !self.transfer_enabled
    }
}

#[derive(Clone, Default)]
pub struct MockCameraRegs {
    pub state: Rc<RefCell<RegsState>>,
}

impl MockCameraRegs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CameraRegs for MockCameraRegs {
    fn interface_clock(&mut self, on: bool) {
        let mut s = self.state.borrow_mut();
        s.interface_clock = on;
        s.calls.push(RegCall::InterfaceClock(on));
    }

    fn external_clock(&mut self, on: bool) {
        let mut s = self.state.borrow_mut();
        s.external_clock = on;
        s.calls.push(RegCall::ExternalClock(on));
    }

    fn clocks_active(&self) -> bool {
        let s = self.state.borrow();
        s.interface_clock || s.external_clock
    }

    fn master_clear(&mut self) {
        let mut s = self.state.borrow_mut();
        s.master_any = false;
        s.master_powered = false;
        s.calls.push(RegCall::MasterClear);
    }

    fn master_power_up(&mut self) {
        let mut s = self.state.borrow_mut();
        s.master_any = true;
        s.master_powered = true;
        s.calls.push(RegCall::MasterPowerUp);
    }

    fn master_active(&self) -> bool {
        self.state.borrow().master_any
    }

    fn master_powered(&self) -> bool {
        self.state.borrow().master_powered
    }

    fn transfer_enable(&mut self, on: bool) {
        let mut s = self.state.borrow_mut();
        s.transfer_enabled = on;
        s.calls.push(RegCall::TransferEnable(on));
    }

    fn transfer_active(&self) -> bool {
        self.state.borrow().transfer_enabled
    }

    fn transfer_flush(&mut self) {
        self.state.borrow_mut().calls.push(RegCall::TransferFlush);
    }

    fn configure_transfer_timing(&mut self) {
        self.state.borrow_mut().calls.push(RegCall::ConfigureTiming);
    }

    fn completion_irq_enable(&mut self) {
        self.state.borrow_mut().calls.push(RegCall::IrqEnable);
    }

    fn set_capture_format(&mut self, format: PixelFormat, scanlines: u8) {
        self.state
            .borrow_mut()
            .calls
            .push(RegCall::SetFormat(format, scanlines));
    }

    fn clear_capture_format(&mut self) {
        self.state.borrow_mut().calls.push(RegCall::ClearFormat);
    }

    fn disable_transfer_path(&mut self) {
        let mut s = self.state.borrow_mut();
        s.transfer_enabled = false;
        s.calls.push(RegCall::DisableTransferPath);
    }
}

// ── DMA engine ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DmaCall {
    Program { channel: u8, shape: TransferShape },
    Stop { channel: u8 },
}

#[derive(Default)]
pub struct DmaState {
    pub calls: Vec<DmaCall>,
    pub active: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct MockDma {
    pub state: Rc<RefCell<DmaState>>,
}

impl MockDma {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DmaEngine for MockDma {
    fn program(&mut self, channel: u8, _dest: *mut u16, shape: TransferShape) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DmaCall::Program { channel, shape });
        if !s.active.contains(&channel) {
            s.active.push(channel);
        }
    }

    fn stop(&mut self, channel: u8) {
        let mut s = self.state.borrow_mut();
        s.calls.push(DmaCall::Stop { channel });
        s.active.retain(|&c| c != channel);
    }
}

// ── Delay source ─────────────────────────────────────────────

/// Records every delay in microseconds instead of sleeping.
#[derive(Clone, Default)]
pub struct MockDelay {
    pub log_us: Rc<RefCell<Vec<u32>>>,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log_us.borrow_mut().push(ns / 1000);
    }
}

// ── Sensor bus ───────────────────────────────────────────────

pub struct SensorState {
    /// Identity every device answers with on the chip-version register.
    pub chip_version: u16,
    /// Plain I2C-space register file, keyed by (device, register).
    pub regs: HashMap<(u8, u16), u16>,
    /// MCU-space variable file, keyed by (device, variable).
    pub vars: HashMap<(u8, u16), u16>,
    /// Sequencer commands consumed, as (device, command).
    pub seq_cmds: Vec<(u8, u16)>,
    /// Count of every i2c write observed.
    pub writes: usize,
}

impl Default for SensorState {
    fn default() -> Self {
        Self {
            chip_version: apt::CHIP_VERSION_MT9V113,
            regs: HashMap::new(),
            vars: HashMap::new(),
            seq_cmds: Vec::new(),
            writes: 0,
        }
    }
}

impl SensorState {
    pub fn standby(&self, device: u8) -> bool {
        self.regs
            .get(&(device, apt::REG_STANDBY_CONTROL))
            .is_some_and(|v| v & apt::STANDBY_REQUEST != 0)
    }
}

/// In-memory MT9V113: registers settle the way the wait loops expect.
#[derive(Clone, Default)]
pub struct MockSensor {
    pub state: Rc<RefCell<SensorState>>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the sensor answer the identity check with `version`.
    pub fn set_chip_version(&self, version: u16) {
        self.state.borrow_mut().chip_version = version;
    }
}

impl SensorBus for MockSensor {
    fn i2c_read(&mut self, device: u8, reg: u16) -> u16 {
        let s = self.state.borrow();
        if reg == apt::REG_CHIP_VERSION {
            return s.chip_version;
        }
        if reg == MCU_DATA {
            let var = s.regs.get(&(device, MCU_ADDRESS)).copied().unwrap_or(0);
            return s.vars.get(&(device, var)).copied().unwrap_or(0);
        }
        s.regs.get(&(device, reg)).copied().unwrap_or(0)
    }

    fn i2c_write(&mut self, device: u8, reg: u16, value: u16) -> u8 {
        let mut s = self.state.borrow_mut();
        s.writes += 1;
        let stored = match reg {
            // PLL reports lock as soon as it is programmed.
            apt::REG_PLL_CONTROL => value | apt::PLL_LOCKED,
            // Standby status follows the request bit immediately.
            apt::REG_STANDBY_CONTROL => {
                if value & apt::STANDBY_REQUEST != 0 {
                    value | apt::STANDBY_DONE
                } else {
                    value & !apt::STANDBY_DONE
                }
            }
            MCU_DATA => {
                let var = s.regs.get(&(device, MCU_ADDRESS)).copied().unwrap_or(0);
                if var == apt::VAR_SEQ_CMD {
                    // The sequencer consumes its command at once.
                    s.seq_cmds.push((device, value));
                    s.vars.insert((device, var), 0);
                } else {
                    s.vars.insert((device, var), value);
                }
                return 1;
            }
            _ => value,
        };
        s.regs.insert((device, reg), stored);
        1
    }
}
