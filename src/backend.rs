// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abstraction over the bus transport (I2C or SPI).
//!
//! Main exports:
//! - [`Interface`]
//! - [`I2cInterface`]
//! - [`SpiInterface`]

use crate::error::{Error, InvalidAddressError};
use core::fmt::Debug;
use embedded_hal::{i2c, spi};

/// The UART channels of a part. Single-UART parts only have [`Channel::A`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel A, also used for device-wide registers.
    #[default]
    A,
    /// Channel B, dual-UART parts only.
    B,
}

impl Channel {
    /// Returns the channel index.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }

    /// Returns the raw channel select bits.
    #[must_use]
    pub const fn to_raw_bits(self) -> u8 {
        match self {
            Self::A => 0b00,
            Self::B => 0b01,
        }
    }
}

/// Direction of a register access.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Register read.
    Read,
    /// Register write.
    Write,
}

/// The bus a device is attached to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusKind {
    /// Attached through I2C.
    I2c,
    /// Attached through SPI.
    Spi,
}

/// Builds the register address byte sent ahead of every access:
/// `RW | A[3:0] | CH1 CH0 | 0`.
///
/// The read flag is only meaningful on SPI. On I2C the direction travels with
/// the device address, [`I2cInterface`] thus always passes [`Direction::Write`].
#[must_use]
pub const fn register_address(channel: Channel, register: u8, direction: Direction) -> u8 {
    let rw = match direction {
        Direction::Read => 1 << 7,
        Direction::Write => 0,
    };
    rw | ((register << 3) & 0x78) | ((channel.to_raw_bits() << 1) & 0x06)
}

/// Abstraction over the bus transport of a SC16IS7xx.
///
/// This acts as Hardware Abstraction Layer (HAL). Implementations move one or
/// multiple bytes from/to one register address. Multi-byte accesses target
/// the same register repeatedly, which is what the FIFO registers expect.
pub trait Interface {
    /// Error of the underlying bus.
    type Error: Debug;

    /// Returns which bus this interface drives.
    fn bus_kind(&self) -> BusKind;

    /// Checks whether a device answers. Interfaces without presence detection
    /// return `Ok`.
    ///
    /// # Errors
    ///
    /// The device did not answer.
    fn probe(&mut self) -> Result<(), Error<Self::Error>>;

    /// Reads `buf.len()` bytes from `register` of `channel`. An empty buffer
    /// does not touch the bus.
    ///
    /// # Errors
    ///
    /// Bus errors, classified where the bus allows it.
    fn read(
        &mut self,
        channel: Channel,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<Self::Error>>;

    /// Writes all of `data` to `register` of `channel`. Empty data does not
    /// touch the bus.
    ///
    /// # Errors
    ///
    /// Bus errors, classified where the bus allows it.
    fn write(&mut self, channel: Channel, register: u8, data: &[u8])
    -> Result<(), Error<Self::Error>>;
}

/// Level of one of the A1/A0 address strapping pins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AddressPin {
    /// Tied to VDD.
    Vdd,
    /// Tied to VSS.
    Vss,
    /// Tied to SCL.
    Scl,
    /// Tied to SDA.
    Sda,
}

impl AddressPin {
    const fn index(self) -> u8 {
        match self {
            Self::Vdd => 0,
            Self::Vss => 1,
            Self::Scl => 2,
            Self::Sda => 3,
        }
    }
}

/// A validated 7-bit I2C device address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Lowest address (A1 = VDD, A0 = VDD).
    pub const MIN: u8 = 0x48;
    /// Highest address (A1 = SDA, A0 = SDA).
    pub const MAX: u8 = 0x57;

    /// Creates an address from its 7-bit value.
    ///
    /// # Errors
    ///
    /// The value is outside `0x48..=0x57`.
    pub const fn new(address: u8) -> Result<Self, InvalidAddressError> {
        if address < Self::MIN || address > Self::MAX {
            return Err(InvalidAddressError(address));
        }
        Ok(Self(address))
    }

    /// Returns the address selected by the strapping of the A1 and A0 pins.
    #[must_use]
    pub const fn from_pins(a1: AddressPin, a0: AddressPin) -> Self {
        Self(Self::MIN + a1.index() * 4 + a0.index())
    }

    /// Returns the 7-bit address.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// I2C transport.
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: I2cAddress,
}

impl<I2C: i2c::I2c> I2cInterface<I2C> {
    /// Creates the transport for the device at `address`.
    pub const fn new(i2c: I2C, address: I2cAddress) -> Self {
        Self { i2c, address }
    }

    /// Returns the device address.
    pub const fn address(&self) -> I2cAddress {
        self.address
    }

    /// Returns the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Maps NACKs to the driver's error kinds. An address NACK means the
    /// device is busy or absent, a data NACK means it rejected the register.
    fn classify(err: I2C::Error) -> Error<I2C::Error> {
        use i2c::{Error as _, ErrorKind, NoAcknowledgeSource};
        match err.kind() {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => Error::I2cInvalidAddress,
            ErrorKind::NoAcknowledge(_) => Error::NotReady,
            _ => Error::Bus(err),
        }
    }
}

impl<I2C: i2c::I2c> Interface for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn bus_kind(&self) -> BusKind {
        BusKind::I2c
    }

    fn probe(&mut self) -> Result<(), Error<Self::Error>> {
        self.i2c.write(self.address.0, &[]).map_err(Self::classify)
    }

    fn read(
        &mut self,
        channel: Channel,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<Self::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        let sub = [register_address(channel, register, Direction::Write)];
        self.i2c
            .transaction(
                self.address.0,
                &mut [i2c::Operation::Write(&sub), i2c::Operation::Read(buf)],
            )
            .map_err(Self::classify)
    }

    fn write(
        &mut self,
        channel: Channel,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        if data.is_empty() {
            return Ok(());
        }
        let sub = [register_address(channel, register, Direction::Write)];
        // Adjacent writes are sent without a repeated start.
        self.i2c
            .transaction(
                self.address.0,
                &mut [i2c::Operation::Write(&sub), i2c::Operation::Write(data)],
            )
            .map_err(Self::classify)
    }
}

/// SPI transport. Chip select handling is left to the [`spi::SpiDevice`].
#[derive(Debug)]
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI: spi::SpiDevice> SpiInterface<SPI> {
    /// Creates the transport.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Returns the underlying device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: spi::SpiDevice> Interface for SpiInterface<SPI> {
    type Error = SPI::Error;

    fn bus_kind(&self) -> BusKind {
        BusKind::Spi
    }

    fn probe(&mut self) -> Result<(), Error<Self::Error>> {
        Ok(())
    }

    fn read(
        &mut self,
        channel: Channel,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<Self::Error>> {
        if buf.is_empty() {
            return Ok(());
        }
        let address = [register_address(channel, register, Direction::Read)];
        self.spi
            .transaction(&mut [spi::Operation::Write(&address), spi::Operation::Read(buf)])
            .map_err(Error::Bus)
    }

    fn write(
        &mut self,
        channel: Channel,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        if data.is_empty() {
            return Ok(());
        }
        let address = [register_address(channel, register, Direction::Write)];
        self.spi
            .transaction(&mut [spi::Operation::Write(&address), spi::Operation::Write(data)])
            .map_err(Error::Bus)
    }
}
