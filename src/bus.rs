//! Two-wire bus interface consumed by the driver.
//!
//! The driver talks to the chip through [`TwoWire`], a transaction oriented
//! interface: bytes written between [`TwoWire::begin_transmission`] and
//! [`TwoWire::end_transmission`] go out as one bus write, and bytes fetched by
//! [`TwoWire::request_from`] are consumed one at a time with [`TwoWire::read`].
//!
//! [`I2cBus`] implements it for any [`embedded-hal`] blocking I2C peripheral.
//!
//! [`embedded-hal`]: https://github.com/rust-embedded/embedded-hal

use embedded_hal as hal;
use hal::blocking::i2c;

/// Largest transaction, in either direction, buffered by [`I2cBus`]
pub const BUFFER_SIZE: usize = 8;

/// Transaction level access to a two-wire bus
pub trait TwoWire {
    /// An error that might happen when a write transaction is closed
    type Error;

    /// Initialize the bus
    fn begin(&mut self);

    /// Open a write transaction to the device at `address`
    fn begin_transmission(&mut self, address: u8);

    /// Queue one byte in the open transaction
    fn write(&mut self, byte: u8);

    /// Close the open transaction and send the queued bytes.
    /// Returns `Ok(())` once the device acknowledged all of them.
    fn end_transmission(&mut self) -> Result<(), Self::Error>;

    /// Read `count` bytes from the device at `address`.
    /// Returns the number of bytes actually received.
    fn request_from(&mut self, address: u8, count: u8, stop: bool) -> u8;

    /// Return the next received byte
    fn read(&mut self) -> u8;
}

/// [`I2cBus`] error
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq)]
pub enum I2cBusError<E> {
    /// More than [`BUFFER_SIZE`] bytes were queued in one transaction
    Overflow,
    /// The underlying peripheral failed
    I2c(E),
}

///[`TwoWire`] adapter for `embedded-hal` blocking I2C peripherals
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
    tx: [u8; BUFFER_SIZE],
    tx_len: usize,
    overflow: bool,
    rx: [u8; BUFFER_SIZE],
    rx_len: usize,
    rx_pos: usize,
}

impl<I2C> I2cBus<I2C> {
    ///Creates new adapter around an I2C peripheral
    pub fn new(i2c: I2C) -> Self {
        I2cBus {
            i2c,
            address: 0,
            tx: [0; BUFFER_SIZE],
            tx_len: 0,
            overflow: false,
            rx: [0; BUFFER_SIZE],
            rx_len: 0,
            rx_pos: 0,
        }
    }
    ///Delete the adapter and return the I2C peripheral
    pub fn destroy(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> TwoWire for I2cBus<I2C>
where
    I2C: i2c::Write<Error = E> + i2c::Read<Error = E>,
{
    type Error = I2cBusError<E>;

    fn begin(&mut self) {
        // The HAL hands the peripheral over already configured
        self.tx_len = 0;
        self.overflow = false;
        self.rx_len = 0;
        self.rx_pos = 0;
    }

    fn begin_transmission(&mut self, address: u8) {
        self.address = address;
        self.tx_len = 0;
        self.overflow = false;
    }

    fn write(&mut self, byte: u8) {
        if self.tx_len < BUFFER_SIZE {
            self.tx[self.tx_len] = byte;
            self.tx_len += 1;
        } else {
            self.overflow = true;
        }
    }

    fn end_transmission(&mut self) -> Result<(), Self::Error> {
        let len = self.tx_len;
        self.tx_len = 0;
        if self.overflow {
            self.overflow = false;
            return Err(I2cBusError::Overflow);
        }
        self.i2c
            .write(self.address, &self.tx[..len])
            .map_err(I2cBusError::I2c)
    }

    fn request_from(&mut self, address: u8, count: u8, _stop: bool) -> u8 {
        // Every embedded-hal read ends with a stop condition
        let len = (count as usize).min(BUFFER_SIZE);
        self.rx_pos = 0;
        self.rx_len = match self.i2c.read(address, &mut self.rx[..len]) {
            Ok(()) => len,
            Err(_) => 0,
        };
        self.rx_len as u8
    }

    fn read(&mut self) -> u8 {
        if self.rx_pos < self.rx_len {
            let byte = self.rx[self.rx_pos];
            self.rx_pos += 1;
            byte
        } else {
            0xFF
        }
    }
}
