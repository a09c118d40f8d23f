//! Sensor bus capability owned by the agent.
//!
//! Only the raw I2C register accessors are required; everything else
//! is derived. The MCU register space is reached through the sensor's
//! address/data indirection pair, and the bit helpers — including the
//! wait-until-settled loops the bring-up sequences depend on — build
//! on the accessors.
//!
//! The wait helpers poll with a cooperative yield and **no timeout**:
//! a register bit that never settles hangs the call, and transitively
//! the controller-side exchange awaiting the response.

use futures_lite::future::yield_now;

/// MCU-space indirection: variable address register in the I2C space.
pub const MCU_ADDRESS: u16 = 0x098C;
/// MCU-space indirection: variable data register in the I2C space.
pub const MCU_DATA: u16 = 0x0990;

/// Raw register access to the camera sensor buses.
#[allow(async_fn_in_trait)]
pub trait SensorBus {
    /// Read a register in the I2C space.
    fn i2c_read(&mut self, device: u8, reg: u16) -> u16;

    /// Write a register in the I2C space; returns the bus status byte.
    fn i2c_write(&mut self, device: u8, reg: u16, value: u16) -> u8;

    fn i2c_set_bits(&mut self, device: u8, reg: u16, mask: u16) {
        let value = self.i2c_read(device, reg);
        self.i2c_write(device, reg, value | mask);
    }

    fn i2c_clear_bits(&mut self, device: u8, reg: u16, mask: u16) {
        let value = self.i2c_read(device, reg);
        self.i2c_write(device, reg, value & !mask);
    }

    /// Poll until every bit in `mask` reads set.
    async fn i2c_wait_set_bits(&mut self, device: u8, reg: u16, mask: u16) {
        while self.i2c_read(device, reg) & mask != mask {
            yield_now().await;
        }
    }

    /// Poll until every bit in `mask` reads clear.
    async fn i2c_wait_clear_bits(&mut self, device: u8, reg: u16, mask: u16) {
        while self.i2c_read(device, reg) & mask != 0 {
            yield_now().await;
        }
    }

    /// Read a variable in the MCU space.
    fn mcu_read(&mut self, device: u8, var: u16) -> u16 {
        self.i2c_write(device, MCU_ADDRESS, var);
        self.i2c_read(device, MCU_DATA)
    }

    /// Write a variable in the MCU space; returns the bus status byte.
    fn mcu_write(&mut self, device: u8, var: u16, value: u16) -> u8 {
        self.i2c_write(device, MCU_ADDRESS, var);
        self.i2c_write(device, MCU_DATA, value)
    }

    fn mcu_set_bits(&mut self, device: u8, var: u16, mask: u16) {
        let value = self.mcu_read(device, var);
        self.mcu_write(device, var, value | mask);
    }

    fn mcu_clear_bits(&mut self, device: u8, var: u16, mask: u16) {
        let value = self.mcu_read(device, var);
        self.mcu_write(device, var, value & !mask);
    }

    /// Poll until every bit in `mask` reads set in an MCU variable.
    async fn mcu_wait_set_bits(&mut self, device: u8, var: u16, mask: u16) {
        while self.mcu_read(device, var) & mask != mask {
            yield_now().await;
        }
    }

    /// Poll until every bit in `mask` reads clear in an MCU variable.
    async fn mcu_wait_clear_bits(&mut self, device: u8, var: u16, mask: u16) {
        while self.mcu_read(device, var) & mask != 0 {
            yield_now().await;
        }
    }
}
