#[cfg(target_os = "linux")]
use std::path::Path;

use log::{debug, info};

use crate::bus::Bus;
#[cfg(target_os = "linux")]
use crate::bus::LinuxBus;
use crate::error::Result;
use crate::hts221::{self, CalibrationLayout, HumidityCalibration, Hts221};
use crate::lps25h::{self, Lps25h};

/// Bus the Sense HAT sits on for every Raspberry Pi with a 40-pin header.
pub const DEFAULT_BUS: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub layout: CalibrationLayout,
    pub humidity_address: u8,
    pub pressure_address: u8,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            layout: CalibrationLayout::TenBit,
            humidity_address: hts221::DEFAULT_ADDRESS,
            pressure_address: lps25h::DEFAULT_ADDRESS,
        }
    }
}

/// One round of readings, serialized the same way as the MQTT status payload.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Readings {
    pub temperature_from_humidity: f64,
    pub temperature_from_pressure: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Readings {
    /// Round every field to `decimals` places, halves to even.
    pub fn rounded(&self, decimals: i32) -> Readings {
        let scale = 10f64.powi(decimals);
        let round = |v: f64| (v * scale).round_ties_even() / scale;
        Readings {
            temperature_from_humidity: round(self.temperature_from_humidity),
            temperature_from_pressure: round(self.temperature_from_pressure),
            humidity: round(self.humidity),
            pressure: round(self.pressure),
        }
    }
}

/// HTS221 + LPS25H behind one exclusively owned bus handle.
///
/// Every operation borrows the driver mutably, so transactions on the bus
/// never interleave. Wrap it in a `Mutex` to share it between threads.
pub struct SenseHat<B: Bus> {
    bus: B,
    hts221: Hts221,
    lps25h: Lps25h,
}

#[cfg(target_os = "linux")]
impl SenseHat<LinuxBus> {
    /// Open `/dev/i2c-<bus_id>` and initialize both chips.
    pub fn open(bus_id: u8) -> Result<SenseHat<LinuxBus>> {
        SenseHat::with_config(LinuxBus::open_bus(bus_id)?, Config::default())
    }

    pub fn open_path<P: AsRef<Path>>(path: P, config: Config) -> Result<SenseHat<LinuxBus>> {
        SenseHat::with_config(LinuxBus::open(path)?, config)
    }
}

impl<B: Bus> SenseHat<B> {
    pub fn new(bus: B) -> Result<SenseHat<B>> {
        SenseHat::with_config(bus, Config::default())
    }

    /// Power on the HTS221, capture its calibration, then power on the LPS25H.
    /// Any failing transaction aborts construction and drops the bus.
    pub fn with_config(mut bus: B, config: Config) -> Result<SenseHat<B>> {
        debug!("initializing Sense HAT with {:?}", config);
        let hts221 = Hts221::init(&mut bus, config.humidity_address, config.layout)?;
        let lps25h = Lps25h::init(&mut bus, config.pressure_address)?;
        info!(
            "Sense HAT ready (HTS221 at {:#04x}, LPS25H at {:#04x})",
            config.humidity_address, config.pressure_address
        );
        Ok(SenseHat { bus, hts221, lps25h })
    }

    pub fn calibration(&self) -> &HumidityCalibration {
        self.hts221.calibration()
    }

    /// Temperature in °C measured by the HTS221.
    pub fn temperature_from_humidity(&mut self) -> Result<f64> {
        self.hts221.temperature(&mut self.bus)
    }

    /// Temperature in °C measured by the LPS25H.
    pub fn temperature_from_pressure(&mut self) -> Result<f64> {
        self.lps25h.temperature(&mut self.bus)
    }

    /// Relative humidity in %.
    pub fn humidity(&mut self) -> Result<f64> {
        self.hts221.humidity(&mut self.bus)
    }

    /// Pressure in hPa.
    pub fn pressure(&mut self) -> Result<f64> {
        self.lps25h.pressure(&mut self.bus)
    }

    pub fn read_all(&mut self) -> Result<Readings> {
        Ok(Readings {
            temperature_from_humidity: self.temperature_from_humidity()?,
            temperature_from_pressure: self.temperature_from_pressure()?,
            humidity: self.humidity()?,
            pressure: self.pressure()?,
        })
    }

    /// Hand the bus back without closing it.
    pub fn release(self) -> B {
        self.bus
    }

    pub fn close(self) {
        drop(self.release());
        debug!("Sense HAT bus released");
    }
}
