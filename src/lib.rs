//! # sensehat-env
//!
//! This crate reads the environmental sensors of the Raspberry Pi Sense HAT
//! (HTS221 humidity/temperature, LPS25H pressure/temperature) via the Linux
//! I2C interface.
//!
//! # Examples
//! ```no_run
//! use sensehat_env::SenseHat;
//!
//! let mut sense = SenseHat::open(1).unwrap();
//! println!("{:.2}", sense.temperature_from_humidity().unwrap());
//! println!("{:.2}", sense.humidity().unwrap());
//! println!("{:.2}", sense.pressure().unwrap());
//! sense.close();
//! ```
//!
//! Without hardware the driver runs against [`mock::MockBus`]:
//!
//! ```
//! use sensehat_env::mock::MockBus;
//! use sensehat_env::SenseHat;
//!
//! let mut bus = MockBus::new().attach(0x5C);
//! bus.set_registers(0x5F, 0x30, &[80, 180]);
//! bus.set_registers(0x5F, 0x36, &[100, 0]);
//! bus.set_registers(0x5F, 0x3A, &[0x4C, 0x04]);
//! bus.set_registers(0x5F, 0x28, &[0x58, 0x02]);
//!
//! let mut sense = SenseHat::new(bus).unwrap();
//! assert_eq!(sense.humidity().unwrap(), 65.0);
//! ```

extern crate i2cdev;
extern crate log;
extern crate nix;
#[macro_use]
extern crate serde_derive;

pub mod bus;
pub mod calibration;
mod error;
pub mod hts221;
pub mod lps25h;
pub mod mock;
mod sensehat;
mod utils;

pub use bus::Bus;
#[cfg(target_os = "linux")]
pub use bus::LinuxBus;
pub use error::*;
pub use hts221::{CalibrationLayout, HumidityCalibration};
pub use sensehat::*;
