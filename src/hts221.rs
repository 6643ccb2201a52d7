//! HTS221 capacitive humidity / temperature sensor.

use std::thread;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::bus::Bus;
use crate::calibration::{Anchor, TwoPoint};
use crate::error::{Chip, Error, Result};
use crate::utils::*;

pub const DEFAULT_ADDRESS: u8 = 0x5F;

pub const CTRL_REG1: u8 = 0x20;
pub const HUMIDITY_OUT: u8 = 0x28;
pub const TEMP_OUT: u8 = 0x2A;
pub const H0_RH_X2: u8 = 0x30;
pub const H1_RH_X2: u8 = 0x31;
pub const T0_DEGC_X8: u8 = 0x32;
pub const T1_DEGC_X8: u8 = 0x33;
pub const T1_T0_MSB: u8 = 0x35;
pub const H0_T0_OUT: u8 = 0x36;
pub const H1_T0_OUT: u8 = 0x3A;
pub const T0_OUT: u8 = 0x3C;
pub const T1_OUT: u8 = 0x3E;

/// PD (power on), BDU (block data update), ODR = 12.5 Hz.
pub const CTRL_REG1_ACTIVE: u8 = 0x87;

/// Time between power on and the first calibration read.
pub const SETTLE_TIME: Duration = Duration::from_millis(50);

/// How the temperature reference points are stored in the calibration block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationLayout {
    /// 10-bit `T0_degC_x8` / `T1_degC_x8`: low bytes in 0x32/0x33, the two
    /// high bits of each in 0x35. This is what every HTS221 ships with.
    TenBit,
    /// Only the low bytes 0x32/0x33, 0x35 is never read. Matches older Sense
    /// HAT software; references above 31.875 °C come out wrapped.
    EightBit,
}

impl Default for CalibrationLayout {
    fn default() -> CalibrationLayout {
        CalibrationLayout::TenBit
    }
}

impl std::str::FromStr for CalibrationLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<CalibrationLayout, String> {
        match s.to_ascii_lowercase().as_str() {
            "10" | "ten-bit" | "tenbit" => Ok(CalibrationLayout::TenBit),
            "8" | "eight-bit" | "eightbit" => Ok(CalibrationLayout::EightBit),
            other => Err(format!("unknown calibration layout: {}", other)),
        }
    }
}

impl CalibrationLayout {
    /// Decode the two temperature references (°C) from the raw registers.
    pub fn temperatures(&self, t0_x8: u8, t1_x8: u8, msb: u8) -> (f64, f64) {
        match *self {
            CalibrationLayout::TenBit => {
                let t0 = ((msb as u16 & 0x03) << 8) | t0_x8 as u16;
                let t1 = (((msb as u16 >> 2) & 0x03) << 8) | t1_x8 as u16;
                (t0 as f64 / 8.0, t1 as f64 / 8.0)
            }
            CalibrationLayout::EightBit => (t0_x8 as f64 / 8.0, t1_x8 as f64 / 8.0),
        }
    }
}

/// Factory calibration captured from the HTS221 at start-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HumidityCalibration {
    pub layout: CalibrationLayout,
    pub humidity: TwoPoint,
    pub temperature: TwoPoint,
}

impl HumidityCalibration {
    pub fn load<B: Bus>(bus: &mut B, address: u8, layout: CalibrationLayout) -> Result<HumidityCalibration> {
        const OP: &str = "reading calibration";

        let byte = |bus: &mut B, register: u8| {
            bus.read_register(address, register)
                .map_err(|e| Error::transaction(Chip::Hts221, register, OP, e))
        };
        let short = |bus: &mut B, register: u8| {
            read_signed_short(bus, address, register)
                .map_err(|e| Error::transaction(Chip::Hts221, register, OP, e))
        };

        let h0_rh = byte(bus, H0_RH_X2)? as f64 / 2.0;
        let h1_rh = byte(bus, H1_RH_X2)? as f64 / 2.0;
        let t0_x8 = byte(bus, T0_DEGC_X8)?;
        let t1_x8 = byte(bus, T1_DEGC_X8)?;
        let msb = match layout {
            CalibrationLayout::TenBit => byte(bus, T1_T0_MSB)?,
            CalibrationLayout::EightBit => 0,
        };
        let (t0_degc, t1_degc) = layout.temperatures(t0_x8, t1_x8, msb);

        let h0_t0_out = short(bus, H0_T0_OUT)?;
        let h1_t0_out = short(bus, H1_T0_OUT)?;
        let t0_out = short(bus, T0_OUT)?;
        let t1_out = short(bus, T1_OUT)?;

        let calibration = HumidityCalibration {
            layout,
            humidity: TwoPoint::new(Anchor::new(h0_t0_out, h0_rh), Anchor::new(h1_t0_out, h1_rh)),
            temperature: TwoPoint::new(Anchor::new(t0_out, t0_degc), Anchor::new(t1_out, t1_degc)),
        };
        debug!("HTS221 calibration ({:?}): {:?}", layout, calibration);
        if calibration.humidity.is_degenerate() {
            warn!("HTS221 humidity anchors share raw count {}, readings fall back to {}%",
                  h0_t0_out, calibration.humidity.convert(h0_t0_out));
        }
        if calibration.temperature.is_degenerate() {
            warn!("HTS221 temperature anchors share raw count {}, readings fall back to {}°C",
                  t0_out, calibration.temperature.convert(t0_out));
        }
        Ok(calibration)
    }
}

pub struct Hts221 {
    address: u8,
    calibration: HumidityCalibration,
}

impl Hts221 {
    /// Power the chip on and capture its calibration block.
    pub fn init<B: Bus>(bus: &mut B, address: u8, layout: CalibrationLayout) -> Result<Hts221> {
        bus.write_register(address, CTRL_REG1, CTRL_REG1_ACTIVE)
            .map_err(|e| Error::transaction(Chip::Hts221, CTRL_REG1, "powering on", e))?;
        // Calibration reads straight after power on return stale data.
        thread::sleep(SETTLE_TIME);

        let calibration = HumidityCalibration::load(bus, address, layout)?;
        Ok(Hts221 { address, calibration })
    }

    pub fn calibration(&self) -> &HumidityCalibration {
        &self.calibration
    }

    pub fn raw_humidity<B: Bus>(&self, bus: &mut B) -> Result<i16> {
        let raw = read_signed_short(bus, self.address, HUMIDITY_OUT)
            .map_err(|e| Error::transaction(Chip::Hts221, HUMIDITY_OUT, "reading humidity", e))?;
        trace!("HTS221 H_OUT = {}", raw);
        Ok(raw)
    }

    pub fn raw_temperature<B: Bus>(&self, bus: &mut B) -> Result<i16> {
        let raw = read_signed_short(bus, self.address, TEMP_OUT)
            .map_err(|e| Error::transaction(Chip::Hts221, TEMP_OUT, "reading temperature", e))?;
        trace!("HTS221 T_OUT = {}", raw);
        Ok(raw)
    }

    /// Relative humidity in %.
    pub fn humidity<B: Bus>(&self, bus: &mut B) -> Result<f64> {
        let raw = self.raw_humidity(bus)?;
        Ok(self.calibration.humidity.convert(raw))
    }

    /// Temperature in °C.
    pub fn temperature<B: Bus>(&self, bus: &mut B) -> Result<f64> {
        let raw = self.raw_temperature(bus)?;
        Ok(self.calibration.temperature.convert(raw))
    }
}
