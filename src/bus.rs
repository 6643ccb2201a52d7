//! Register-level access to devices on an I2C bus.

use std::error::Error as StdError;

/// The "write register pointer, read N bytes" primitives both sensor chips
/// are driven with. Every call addresses a 7-bit device address and an
/// 8-bit register offset.
pub trait Bus {
    type Error: StdError + Send + Sync + 'static;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error>;

    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Self::Error>;

    /// Fill `buf` with consecutive bytes starting at `register`.
    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error>;
}

impl<'a, B: Bus + ?Sized> Bus for &'a mut B {
    type Error = B::Error;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), Self::Error> {
        (**self).write_register(address, register, value)
    }

    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, Self::Error> {
        (**self).read_register(address, register)
    }

    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read_registers(address, register, buf)
    }
}

#[cfg(target_os = "linux")]
pub use self::linux::LinuxBus;

#[cfg(target_os = "linux")]
mod linux {
    use std::io;
    use std::path::Path;

    use i2cdev::core::I2CDevice;
    use i2cdev::linux::*;
    use log::{debug, trace};
    use nix::errno::Errno;
    use nix::sys::stat::{stat, SFlag};

    use super::Bus;
    use crate::error::{Error, Result};

    /// Longest transfer an SMBus block read can carry.
    pub const SMBUS_BLOCK_MAX: usize = 32;

    pub(crate) fn block_len(len: usize) -> std::result::Result<u8, LinuxI2CError> {
        if len > SMBUS_BLOCK_MAX {
            let err = io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("block read of {} bytes exceeds the SMBus limit of {}", len, SMBUS_BLOCK_MAX),
            );
            return Err(err.into());
        }
        Ok(len as u8)
    }

    /// `/dev/i2c-N` opened through the kernel i2c-dev interface.
    ///
    /// One file descriptor serves every chip on the bus; the slave address is
    /// switched only when the target device changes.
    pub struct LinuxBus {
        device: LinuxI2CDevice,
        path: String,
        slave: Option<u8>,
    }

    impl LinuxBus {
        pub fn open_bus(bus_id: u8) -> Result<LinuxBus> {
            LinuxBus::open(format!("/dev/i2c-{}", bus_id))
        }

        pub fn open<P: AsRef<Path>>(path: P) -> Result<LinuxBus> {
            let path = path.as_ref();
            let display = path.display().to_string();
            let unavailable = |reason: String| Error::BusUnavailable {
                path: display.clone(),
                reason,
            };

            match stat(path) {
                Ok(st) => {
                    let kind = SFlag::from_bits_truncate(st.st_mode) & SFlag::S_IFMT;
                    if kind != SFlag::S_IFCHR {
                        return Err(unavailable("not a character device".to_string()));
                    }
                }
                Err(Errno::ENOENT) => return Err(unavailable("no such device node".to_string())),
                Err(errno) => return Err(unavailable(errno.desc().to_string())),
            }

            // Any address works until the first transaction selects a chip.
            let device = LinuxI2CDevice::new(path, 0).map_err(|e| unavailable(e.to_string()))?;
            debug!("opened I2C bus {}", display);
            Ok(LinuxBus {
                device,
                path: display,
                slave: None,
            })
        }

        fn select(&mut self, address: u8) -> std::result::Result<(), LinuxI2CError> {
            if self.slave != Some(address) {
                self.device.set_slave_address(address as u16)?;
                self.slave = Some(address);
                trace!("{}: selected slave {:#04x}", self.path, address);
            }
            Ok(())
        }
    }

    impl Bus for LinuxBus {
        type Error = LinuxI2CError;

        fn write_register(&mut self, address: u8, register: u8, value: u8) -> std::result::Result<(), LinuxI2CError> {
            self.select(address)?;
            self.device.smbus_write_byte_data(register, value)
        }

        fn read_register(&mut self, address: u8, register: u8) -> std::result::Result<u8, LinuxI2CError> {
            self.select(address)?;
            self.device.smbus_read_byte_data(register)
        }

        fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> std::result::Result<(), LinuxI2CError> {
            let len = block_len(buf.len())?;
            self.select(address)?;
            let values = self.device.smbus_read_i2c_block_data(register, len)?;
            if values.len() < buf.len() {
                let short = io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("short block read: {} of {} bytes", values.len(), buf.len()),
                );
                return Err(short.into());
            }
            buf.copy_from_slice(&values[..buf.len()]);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn block_len_stays_within_smbus_limit() {
            assert_eq!(block_len(3).unwrap(), 3);
            assert_eq!(block_len(SMBUS_BLOCK_MAX).unwrap(), 32);
            assert!(block_len(SMBUS_BLOCK_MAX + 1).is_err());
            // 256 would wrap to 0 if narrowed blindly.
            assert!(block_len(256).is_err());
        }
    }
}
