// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors that can happen when working with [`Sc16is7xx`] and [`Uart`].

use crate::spec::registers::LSR;
use core::error::Error as CoreError;
use core::fmt::{Debug, Display};

#[cfg(doc)]
use crate::{Sc16is7xx, Uart};

/// The specified 7-bit I2C address is outside the range that the A1/A0
/// strapping pins can select (`0x48..=0x57`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAddressError(pub(crate) u8);

impl Display for InvalidAddressError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid SC16IS7xx I2C address: {:#04x}", self.0)
    }
}

impl CoreError for InvalidAddressError {}

/// Errors of the driver. `E` is the error type of the underlying bus.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A parameter is out of range, for example empty ring buffer storage.
    Parameter,
    /// The channel does not exist on this part.
    UnknownElement,
    /// The channel is already claimed by another [`Uart`].
    ChannelInUse,
    /// The reference clock is out of range for its [`ClockSource`].
    ///
    /// [`ClockSource`]: crate::ClockSource
    Frequency,
    /// The baud rate is out of range for the current line type.
    BaudRate,
    /// The configuration is inconsistent.
    Configuration,
    /// The part does not support the requested feature.
    NotSupported,
    /// The channel is in sleep mode.
    SleepMode,
    /// The device did not answer, or answered with garbage.
    NoDeviceDetected,
    /// The loopback communication test failed.
    PeripheralNotValid,
    /// A register did not read back the value written to it.
    BadData,
    /// A character was received with an error.
    Receive {
        /// Number of valid characters stored before the faulty one.
        received: usize,
        /// The line status of the faulty character.
        status: LSR,
    },
    /// The device is not ready (I2C address NACK).
    NotReady,
    /// The device rejected a register sub-address (I2C data NACK).
    I2cInvalidAddress,
    /// The I2C bus clock exceeds the part limit.
    I2cConfig,
    /// The SPI bus clock exceeds the part limit.
    SpiConfig,
    /// The device or the channel is borrowed elsewhere, retry later.
    Busy,
    /// Any other bus error.
    Bus(E),
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Parameter => write!(f, "parameter out of range"),
            Self::UnknownElement => write!(f, "unknown channel"),
            Self::ChannelInUse => write!(f, "channel already in use"),
            Self::Frequency => write!(f, "reference clock out of range"),
            Self::BaudRate => write!(f, "baud rate out of range"),
            Self::Configuration => write!(f, "inconsistent configuration"),
            Self::NotSupported => write!(f, "not supported by this part"),
            Self::SleepMode => write!(f, "channel is in sleep mode"),
            Self::NoDeviceDetected => write!(f, "no device detected"),
            Self::PeripheralNotValid => write!(f, "loopback communication test failed"),
            Self::BadData => write!(f, "register read back a different value"),
            Self::Receive { received, status } => write!(
                f,
                "receive error after {received} characters (LSR: {:#04x})",
                status.bits()
            ),
            Self::NotReady => write!(f, "device not ready"),
            Self::I2cInvalidAddress => write!(f, "register address not acknowledged"),
            Self::I2cConfig => write!(f, "I2C clock exceeds the part limit"),
            Self::SpiConfig => write!(f, "SPI clock exceeds the part limit"),
            Self::Busy => write!(f, "device busy"),
            Self::Bus(e) => write!(f, "bus error: {e:?}"),
        }
    }
}

impl<E: Debug> CoreError for Error<E> {}

impl<E: Debug> embedded_io::Error for Error<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        use embedded_io::ErrorKind;
        match self {
            Self::Receive { .. } | Self::BadData => ErrorKind::InvalidData,
            Self::Busy => ErrorKind::Interrupted,
            Self::NotReady | Self::NoDeviceDetected => ErrorKind::NotConnected,
            Self::Parameter | Self::BaudRate | Self::Configuration => ErrorKind::InvalidInput,
            Self::NotSupported => ErrorKind::Unsupported,
            _ => ErrorKind::Other,
        }
    }
}
