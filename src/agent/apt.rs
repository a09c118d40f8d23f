//! Aptina MT9V113 sensor sequences.
//!
//! Bring-up, standby handling, and sequencer mode changes, executed
//! over a [`SensorBus`]. The register-table-then-wait shape follows
//! the vendor bring-up flow: soft reset, PLL configuration, wait for
//! lock, leave hardware standby, point the sequencer at a mode.

use crate::camera::Device;
use crate::camera::transfer::CaptureMode;

use super::bus::SensorBus;

/// I2C space: chip version, read-only identity.
pub const REG_CHIP_VERSION: u16 = 0x0000;
/// Identity the MT9V113 answers with.
pub const CHIP_VERSION_MT9V113: u16 = 0x2280;

/// I2C space: reset and miscellaneous control.
pub const REG_RESET_MISC_CONTROL: u16 = 0x001A;
/// Soft reset bit in [`REG_RESET_MISC_CONTROL`].
pub const RESET_SOC: u16 = 1 << 0;

/// I2C space: standby control.
pub const REG_STANDBY_CONTROL: u16 = 0x0018;
/// Request bit: set to enter standby, clear to leave it.
pub const STANDBY_REQUEST: u16 = 1 << 0;
/// Status bit: mirrors the sensor's actual standby state.
pub const STANDBY_DONE: u16 = 1 << 14;

/// I2C space: PLL dividers and control.
pub const REG_PLL_DIVIDERS: u16 = 0x0010;
pub const REG_PLL_P_DIVIDERS: u16 = 0x0012;
pub const REG_PLL_CONTROL: u16 = 0x0014;
/// Lock status bit in [`REG_PLL_CONTROL`].
pub const PLL_LOCKED: u16 = 1 << 15;

/// MCU space: sequencer command variable. The sequencer clears it
/// once the command is consumed.
pub const VAR_SEQ_CMD: u16 = 0xA103;

/// Post-reset PLL programming: dividers first, then enable, then
/// switch the sensor clock onto the PLL output.
const PLL_TABLE: &[(u16, u16)] = &[
    (REG_PLL_CONTROL, 0x2545),
    (REG_PLL_DIVIDERS, 0x0110),
    (REG_PLL_P_DIVIDERS, 0x00F0),
    (REG_PLL_CONTROL, 0x2547),
    (REG_PLL_CONTROL, 0x2541),
];

/// Full bring-up of one sensor: reset, PLL, one sequencer pass, then
/// parked in standby until selected.
pub async fn init(bus: &mut impl SensorBus, device: Device) {
    let id = device.id();

    bus.i2c_set_bits(id, REG_RESET_MISC_CONTROL, RESET_SOC);
    bus.i2c_clear_bits(id, REG_RESET_MISC_CONTROL, RESET_SOC);

    for &(reg, value) in PLL_TABLE {
        bus.i2c_write(id, reg, value);
    }
    bus.i2c_wait_set_bits(id, REG_PLL_CONTROL, PLL_LOCKED).await;

    activate(bus, device).await;
    set_mode(bus, device, CaptureMode::Preview).await;
    deactivate(bus, device).await;
}

/// Park one sensor in standby.
pub async fn deinit(bus: &mut impl SensorBus, device: Device) {
    deactivate(bus, device).await;
}

/// Wake the sensor out of hardware standby.
pub async fn activate(bus: &mut impl SensorBus, device: Device) {
    let id = device.id();
    bus.i2c_clear_bits(id, REG_STANDBY_CONTROL, STANDBY_REQUEST);
    bus.i2c_wait_clear_bits(id, REG_STANDBY_CONTROL, STANDBY_DONE)
        .await;
}

/// Put the sensor into hardware standby.
pub async fn deactivate(bus: &mut impl SensorBus, device: Device) {
    let id = device.id();
    bus.i2c_set_bits(id, REG_STANDBY_CONTROL, STANDBY_REQUEST);
    bus.i2c_wait_set_bits(id, REG_STANDBY_CONTROL, STANDBY_DONE)
        .await;
}

/// Point the sequencer at a capture mode and wait until it consumes
/// the command.
pub async fn set_mode(bus: &mut impl SensorBus, device: Device, mode: CaptureMode) {
    let id = device.id();
    bus.mcu_write(id, VAR_SEQ_CMD, u16::from(mode.seq_cmd()));
    bus.mcu_wait_clear_bits(id, VAR_SEQ_CMD, 0xFFFF).await;
}
