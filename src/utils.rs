use crate::bus::Bus;

/// Sub-address bit both chips need before they advance the register pointer
/// during a multi-byte read.
pub const AUTO_INCREMENT: u8 = 0x80;

pub fn read_block<B: Bus, const N: usize>(bus: &mut B, address: u8, register: u8) -> Result<[u8; N], B::Error> {
    let mut values = [0u8; N];
    bus.read_registers(address, register | AUTO_INCREMENT, &mut values)?;
    Ok(values)
}

pub fn read_signed_short<B: Bus>(bus: &mut B, address: u8, register: u8) -> Result<i16, B::Error> {
    Ok(i16::from_le_bytes(read_block(bus, address, register)?))
}

/// Little-endian 24-bit two's complement (XL, L, H).
pub fn signed_24(values: [u8; 3]) -> i32 {
    let raw = values[0] as i32 | (values[1] as i32) << 8 | (values[2] as i32) << 16;
    if raw & 0x80_0000 != 0 {
        raw - 0x100_0000
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_24_extends_bit_23() {
        assert_eq!(signed_24([0x00, 0x00, 0x00]), 0);
        assert_eq!(signed_24([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(signed_24([0x00, 0x00, 0x80]), -0x80_0000);
        assert_eq!(signed_24([0xFF, 0xFF, 0x7F]), 0x7F_FFFF);
        assert_eq!(signed_24([0x00, 0xF0, 0x3F]), 0x3F_F000);
    }
}
