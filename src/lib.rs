//! DS3231 real time clock platform agnostic driver
//!
//! # About
//!
//!The DS3231 is a low-cost, extremely accurate I2C real-time clock (RTC) with an integrated temperature-compensated
//!crystal oscillator (TCXO) and crystal. The RTC maintains seconds, minutes, hours, day, date, month, and year
//!information. A temperature sensor used by the oscillator compensation is readable over the bus. The chip driver
//!talks to the device through the small [`TwoWire`] transaction interface, and [`I2cBus`] provides it on top of
//![`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal
//!
//!Datasheet: [DS3231](https://datasheets.maximintegrated.com/en/ds/DS3231.pdf)
//!
//! ## Driver features:
//! - Reading/setting time, date and day of the week
//! - Reading the temperature register
//! - Reading/setting the whole clock and calendar in one transaction
//!
//! ## Usage
//!
//! ```ignore
//! let mut bus = I2cBus::new(i2c);
//! let mut rtc = DS3231::new(&mut bus);
//! rtc.begin()?;
//! rtc.set_time(23, 59, 58)?;
//! let clock = rtc.get_time()?;
//! ```
//!
//! Optional `defmt` feature enables logging and `defmt::Format` for the public types.

#![no_std]

#[macro_use]
mod fmt;

mod bus;
mod registers;

pub use bus::{I2cBus, I2cBusError, TwoWire, BUFFER_SIZE};
pub use registers::{Register, DEVICE_ADDRESS};
use registers::Temperature;

/// DS3231 error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq)]
pub enum Ds3231Error {
    /// `begin` called while the driver already began
    AlreadyBegun,
    /// `end` called while the driver is not began
    NotBegun,
    /// The device did not answer the connection check
    NotConnected,
    /// A write transaction did not complete
    Bus,
    /// Fewer bytes were received than requested
    ShortRead,
}

///Clock information
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}
///Calendar information
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calendar {
    pub date: u8,
    pub month: u8,
    pub year: u8,
}

///DS3231 RTC driver
///
/// The driver borrows the bus for its whole life and never takes ownership of it,
/// the bus is handed back to the caller once the driver is dropped.
pub struct DS3231<'a, B>
where
    B: TwoWire,
{
    bus: &'a mut B,
    began: bool,
}

impl<'a, B> DS3231<'a, B>
where
    B: TwoWire,
{
    ///Creates new instance DS3231 RTC, no bus transfer is made
    pub fn new(bus: &'a mut B) -> Self {
        DS3231 { bus, began: false }
    }

    ///Initialize the bus and check the device answers.
    ///Returns `Ds3231Error::AlreadyBegun` without any bus transfer if already began.
    pub fn begin(&mut self) -> Result<(), Ds3231Error> {
        if self.began {
            return Err(Ds3231Error::AlreadyBegun);
        }
        self.began = true;
        self.bus.begin();
        debug!("ds3231: begin");
        if self.is_connected() {
            Ok(())
        } else {
            warn!("ds3231: device not connected");
            Err(Ds3231Error::NotConnected)
        }
    }

    ///Mark the driver inactive.
    ///Returns `Ds3231Error::NotBegun` if it was not began.
    pub fn end(&mut self) -> Result<(), Ds3231Error> {
        if !self.began {
            return Err(Ds3231Error::NotBegun);
        }
        self.began = false;
        debug!("ds3231: end");
        Ok(())
    }

    ///Return whether `begin` was called without a matching `end`
    pub fn is_began(&self) -> bool {
        self.began
    }

    ///Check the device acknowledges an empty transaction
    pub fn is_connected(&mut self) -> bool {
        self.bus.begin_transmission(DEVICE_ADDRESS);
        self.bus.end_transmission().is_ok()
    }

    fn write_regs(&mut self, reg: Register, bytes: &[u8]) -> Result<(), Ds3231Error> {
        trace!("ds3231: write {} bytes at {=u8:#x}", bytes.len(), reg.addr());
        self.bus.begin_transmission(DEVICE_ADDRESS);
        self.bus.write(reg.addr());
        for byte in bytes {
            self.bus.write(*byte);
        }
        self.bus.end_transmission().map_err(|_| {
            warn!("ds3231: write at {=u8:#x} failed", reg.addr());
            Ds3231Error::Bus
        })
    }

    fn read_regs(&mut self, reg: Register, buf: &mut [u8]) -> Result<(), Ds3231Error> {
        trace!("ds3231: read {} bytes at {=u8:#x}", buf.len(), reg.addr());
        // Set the register pointer, the chip auto-increments it on every byte read
        self.bus.begin_transmission(DEVICE_ADDRESS);
        self.bus.write(reg.addr());
        self.bus.end_transmission().ok();
        let count = buf.len() as u8;
        let received = self.bus.request_from(DEVICE_ADDRESS, count, true);
        if received != count {
            warn!("ds3231: short read, {} of {} bytes", received, count);
            return Err(Ds3231Error::ShortRead);
        }
        for byte in buf.iter_mut() {
            *byte = self.bus.read();
        }
        Ok(())
    }

    ///Set hours, minutes and seconds
    pub fn set_time(&mut self, hours: u8, minutes: u8, seconds: u8) -> Result<(), Ds3231Error> {
        let bytes = [
            decimal_to_bcd(seconds),
            decimal_to_bcd(minutes),
            decimal_to_bcd(hours),
        ];
        self.write_regs(Register::SECONDS, &bytes)
    }
    ///Return current information about hours, minutes and seconds
    pub fn get_time(&mut self) -> Result<Clock, Ds3231Error> {
        let mut bytes = [0_u8; 3];
        self.read_regs(Register::SECONDS, &mut bytes)?;
        Ok(Clock {
            seconds: bcd_to_decimal(bytes[0]),
            minutes: bcd_to_decimal(bytes[1]),
            hours: bcd_to_decimal(bytes[2]),
        })
    }
    ///Set day of the week
    pub fn set_day_of_week(&mut self, dow: u8) -> Result<(), Ds3231Error> {
        self.write_regs(Register::DAY, &[decimal_to_bcd(dow)])
    }
    ///Return current information about day of the week
    pub fn get_day_of_week(&mut self) -> Result<u8, Ds3231Error> {
        let mut bytes = [0_u8; 1];
        self.read_regs(Register::DAY, &mut bytes)?;
        Ok(bcd_to_decimal(bytes[0]))
    }
    ///Set date, month and year
    pub fn set_date(&mut self, date: u8, month: u8, year: u8) -> Result<(), Ds3231Error> {
        let bytes = [
            decimal_to_bcd(date),
            decimal_to_bcd(month),
            decimal_to_bcd(year),
        ];
        self.write_regs(Register::DATE, &bytes)
    }
    ///Return current information about date, month and year
    pub fn get_date(&mut self) -> Result<Calendar, Ds3231Error> {
        let mut bytes = [0_u8; 3];
        self.read_regs(Register::DATE, &mut bytes)?;
        Ok(Calendar {
            date: bcd_to_decimal(bytes[0]),
            month: bcd_to_decimal(bytes[1]),
            year: bcd_to_decimal(bytes[2]),
        })
    }

    /// Return the integer part of the temperature register.
    /// Only the MSB survives: sign and quarter degree bits are discarded,
    /// so negative temperatures come back as their raw two's complement byte.
    pub fn get_temperature(&mut self) -> Result<u16, Ds3231Error> {
        let mut bytes = [0_u8; 2];
        self.read_regs(Register::TEMPERATURE, &mut bytes)?;
        Ok(Temperature::from(bytes).truncated())
    }

    /// Return the temperature in degrees Celsius with 0.25 resolution.
    pub fn get_temperature_celsius(&mut self) -> Result<f32, Ds3231Error> {
        let mut bytes = [0_u8; 2];
        self.read_regs(Register::TEMPERATURE, &mut bytes)?;
        Ok(Temperature::from(bytes).celsius())
    }

    ///Return time, day of the week and date read in a single transaction
    pub fn get_clock_calendar(&mut self) -> Result<(Clock, u8, Calendar), Ds3231Error> {
        let mut bytes = [0_u8; 7];
        self.read_regs(Register::SECONDS, &mut bytes)?;

        let clock = Clock {
            seconds: bcd_to_decimal(bytes[0]),
            minutes: bcd_to_decimal(bytes[1]),
            hours: bcd_to_decimal(bytes[2]),
        };

        let calendar = Calendar {
            date: bcd_to_decimal(bytes[4]),
            month: bcd_to_decimal(bytes[5]),
            year: bcd_to_decimal(bytes[6]),
        };

        Ok((clock, bcd_to_decimal(bytes[3]), calendar))
    }
    ///Set time, day of the week and date in a single transaction
    pub fn set_clock_calendar(
        &mut self,
        clock: &Clock,
        dow: u8,
        calendar: &Calendar,
    ) -> Result<(), Ds3231Error> {
        let bytes = [
            decimal_to_bcd(clock.seconds),
            decimal_to_bcd(clock.minutes),
            decimal_to_bcd(clock.hours),
            decimal_to_bcd(dow),
            decimal_to_bcd(calendar.date),
            decimal_to_bcd(calendar.month),
            decimal_to_bcd(calendar.year),
        ];
        self.write_regs(Register::SECONDS, &bytes)
    }
}

/// Swap format from bcd to decimal.
/// Nibbles above 9 are not rejected.
pub fn bcd_to_decimal(bcd: u8) -> u8 {
    ((bcd & 0xF0) >> 4) * 10 + (bcd & 0x0F)
}

/// Swap format from decimal to bcd.
/// Values above 99 are truncated.
pub fn decimal_to_bcd(decimal: u8) -> u8 {
    ((decimal / 10) << 4) | (decimal % 10)
}
