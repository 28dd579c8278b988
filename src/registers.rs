/// DS3231 7-bit bus address
pub const DEVICE_ADDRESS: u8 = 0x68;

/// Register definitions
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Register {
    SECONDS = 0x00,
    MINUTES = 0x01,
    HOURS = 0x02,
    DAY = 0x03,
    DATE = 0x04,
    MONTH = 0x05,
    YEAR = 0x06,
    // MSB, the LSB follows at 0x12
    TEMPERATURE = 0x11,
}

impl Register {
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Temperature register pair as read from the chip.
pub(crate) struct Temperature(u8, u8);

impl Temperature {
    /// Integer part with sign and fraction bits discarded.
    pub fn truncated(&self) -> u16 {
        ((((self.0 as u16) << 8) | self.1 as u16) >> 6) >> 2
    }

    /// Signed value in degrees Celsius, 0.25 resolution.
    pub fn celsius(&self) -> f32 {
        self.0 as i8 as f32 + (self.1 >> 6) as f32 * 0.25
    }
}

impl From<[u8; 2]> for Temperature {
    fn from(b: [u8; 2]) -> Temperature {
        Temperature(b[0], b[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_addresses() {
        assert_eq!(DEVICE_ADDRESS, 0x68);
        assert_eq!(Register::SECONDS.addr(), 0x00);
        assert_eq!(Register::MINUTES.addr(), 0x01);
        assert_eq!(Register::HOURS.addr(), 0x02);
        assert_eq!(Register::DAY.addr(), 0x03);
        assert_eq!(Register::DATE.addr(), 0x04);
        assert_eq!(Register::MONTH.addr(), 0x05);
        assert_eq!(Register::YEAR.addr(), 0x06);
        assert_eq!(Register::TEMPERATURE.addr(), 0x11);
    }

    #[test]
    fn temperature_truncated_keeps_msb() {
        assert_eq!(Temperature::from([0x19, 0x40]).truncated(), 25);
        assert_eq!(Temperature::from([0x00, 0xC0]).truncated(), 0);
        assert_eq!(Temperature::from([0xE7, 0x00]).truncated(), 0xE7);
    }

    #[test]
    fn temperature_celsius() {
        assert_eq!(Temperature::from([0x19, 0x40]).celsius(), 25.25);
        assert_eq!(Temperature::from([0x19, 0xC0]).celsius(), 25.75);
        assert_eq!(Temperature::from([0xE7, 0x00]).celsius(), -25.0);
        assert_eq!(Temperature::from([0x00, 0x00]).celsius(), 0.0);
    }
}
