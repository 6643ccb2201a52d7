//! In-memory bus for exercising the driver without hardware.
//!
//! Each attached device is a 128-byte register file. Like the real chips,
//! a multi-byte read only walks forward through the registers when bit 7 of
//! the sub-address is set; otherwise every byte comes from the same register.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::bus::Bus;
use crate::utils::AUTO_INCREMENT;

const REGISTERS: usize = 0x80;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MockBusError {
    #[error("no device acknowledged address {0:#04x}")]
    Nack(u8),
    #[error("injected failure at {address:#04x}/{register:#04x}")]
    Injected { address: u8, register: u8 },
}

#[derive(Debug, Default)]
pub struct MockBus {
    devices: BTreeMap<u8, [u8; REGISTERS]>,
    // None fails forever, Some(n) fails the next n transactions.
    failing: BTreeMap<(u8, u8), Option<usize>>,
    writes: Vec<(u8, u8, u8)>,
}

impl MockBus {
    pub fn new() -> MockBus {
        MockBus::default()
    }

    /// Attach a device with every register zeroed.
    pub fn attach(mut self, address: u8) -> MockBus {
        self.devices.insert(address, [0; REGISTERS]);
        self
    }

    /// Preload registers starting at `register`. Attaches the device if needed.
    pub fn set_registers(&mut self, address: u8, register: u8, values: &[u8]) {
        let regs = self.devices.entry(address).or_insert([0; REGISTERS]);
        let start = (register & !AUTO_INCREMENT) as usize;
        for (i, v) in values.iter().enumerate() {
            regs[(start + i) % REGISTERS] = *v;
        }
    }

    pub fn set_register(&mut self, address: u8, register: u8, value: u8) {
        self.set_registers(address, register, &[value]);
    }

    pub fn register(&self, address: u8, register: u8) -> Option<u8> {
        self.devices.get(&address).map(|regs| regs[(register & !AUTO_INCREMENT) as usize])
    }

    /// Make every transaction touching `register` fail until `recover` is called.
    pub fn fail(&mut self, address: u8, register: u8) {
        self.failing.insert((address, register & !AUTO_INCREMENT), None);
    }

    /// Fail only the next transaction touching `register`.
    pub fn fail_once(&mut self, address: u8, register: u8) {
        self.failing.insert((address, register & !AUTO_INCREMENT), Some(1));
    }

    pub fn recover(&mut self, address: u8, register: u8) {
        self.failing.remove(&(address, register & !AUTO_INCREMENT));
    }

    /// Every successful register write as (address, register, value).
    pub fn writes(&self) -> &[(u8, u8, u8)] {
        &self.writes
    }

    fn device(&mut self, address: u8, register: u8) -> Result<&mut [u8; REGISTERS], MockBusError> {
        let register = register & !AUTO_INCREMENT;
        if let Some(remaining) = self.failing.get_mut(&(address, register)) {
            match remaining {
                Some(0) => {}
                Some(n) => {
                    *n -= 1;
                    return Err(MockBusError::Injected { address, register });
                }
                None => return Err(MockBusError::Injected { address, register }),
            }
        }
        self.devices.get_mut(&address).ok_or(MockBusError::Nack(address))
    }
}

impl Bus for MockBus {
    type Error = MockBusError;

    fn write_register(&mut self, address: u8, register: u8, value: u8) -> Result<(), MockBusError> {
        let regs = self.device(address, register)?;
        regs[(register & !AUTO_INCREMENT) as usize] = value;
        self.writes.push((address, register, value));
        Ok(())
    }

    fn read_register(&mut self, address: u8, register: u8) -> Result<u8, MockBusError> {
        let regs = self.device(address, register)?;
        Ok(regs[(register & !AUTO_INCREMENT) as usize])
    }

    fn read_registers(&mut self, address: u8, register: u8, buf: &mut [u8]) -> Result<(), MockBusError> {
        let regs = self.device(address, register)?;
        let start = (register & !AUTO_INCREMENT) as usize;
        let step = if register & AUTO_INCREMENT != 0 { 1 } else { 0 };
        for (i, b) in buf.iter_mut().enumerate() {
            *b = regs[(start + i * step) % REGISTERS];
        }
        Ok(())
    }
}
