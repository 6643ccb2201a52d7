//! LPS25H piezoresistive pressure / temperature sensor.
//!
//! Unlike the HTS221 the output needs no per-device calibration: pressure is
//! reported in 1/4096 hPa and temperature as an offset from 42.5 °C in steps
//! of 1/480 °C.

use std::thread;
use std::time::Duration;

use log::trace;

use crate::bus::Bus;
use crate::error::{Chip, Error, Result};
use crate::utils::*;

pub const DEFAULT_ADDRESS: u8 = 0x5C;

pub const CTRL_REG1: u8 = 0x20;
pub const PRESS_OUT_XL: u8 = 0x28;
pub const TEMP_OUT_L: u8 = 0x2B;

/// PD (power on), ODR = 1 Hz.
pub const CTRL_REG1_ACTIVE: u8 = 0x90;

pub const SETTLE_TIME: Duration = Duration::from_millis(20);

pub fn temperature_from_raw(raw: i16) -> f64 {
    42.5 + raw as f64 / 480.0
}

pub fn pressure_from_raw(values: [u8; 3]) -> f64 {
    signed_24(values) as f64 / 4096.0
}

pub struct Lps25h {
    address: u8,
}

impl Lps25h {
    pub fn init<B: Bus>(bus: &mut B, address: u8) -> Result<Lps25h> {
        bus.write_register(address, CTRL_REG1, CTRL_REG1_ACTIVE)
            .map_err(|e| Error::transaction(Chip::Lps25h, CTRL_REG1, "powering on", e))?;
        thread::sleep(SETTLE_TIME);
        Ok(Lps25h { address })
    }

    pub fn raw_pressure<B: Bus>(&self, bus: &mut B) -> Result<[u8; 3]> {
        let values: [u8; 3] = read_block(bus, self.address, PRESS_OUT_XL)
            .map_err(|e| Error::transaction(Chip::Lps25h, PRESS_OUT_XL, "reading pressure", e))?;
        trace!("LPS25H PRESS_OUT = {:02x?}", values);
        Ok(values)
    }

    pub fn raw_temperature<B: Bus>(&self, bus: &mut B) -> Result<i16> {
        let raw = read_signed_short(bus, self.address, TEMP_OUT_L)
            .map_err(|e| Error::transaction(Chip::Lps25h, TEMP_OUT_L, "reading temperature", e))?;
        trace!("LPS25H TEMP_OUT = {}", raw);
        Ok(raw)
    }

    /// Pressure in hPa.
    pub fn pressure<B: Bus>(&self, bus: &mut B) -> Result<f64> {
        Ok(pressure_from_raw(self.raw_pressure(bus)?))
    }

    /// Temperature in °C.
    pub fn temperature<B: Bus>(&self, bus: &mut B) -> Result<f64> {
        Ok(temperature_from_raw(self.raw_temperature(bus)?))
    }
}
