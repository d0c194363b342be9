// SPDX-License-Identifier: MIT OR Apache-2.0

//! # sc16is7xx
//!
//! Highly configurable low-level driver for the NXP [SC16IS7xx][datasheet]
//! family of I2C/SPI to UART bridges: SC16IS740, SC16IS741(A), SC16IS750,
//! SC16IS752, SC16IS760 and SC16IS762. Easy integration into any
//! [`embedded-hal`] 1.0 platform while providing fine-grained control where
//! needed.
//!
//! The parts expose one or two UART channels behind a register file that is
//! addressed through a framed byte protocol on I2C or SPI. Some registers are
//! only reachable after switching register banks through the LCR, and the
//! flow control registers are write protected until the enhanced functions
//! are unlocked. This crate takes care of these details and always returns
//! to the general register bank, even when a bus transfer fails midway.
//!
//! See [`Sc16is7xx`] and [`Uart`] to get started.
//!
//! ## Features
//!
//! - ✅ I2C and SPI transports on top of the `embedded-hal` 1.0 blocking traits
//! - ✅ `no_std`-compatible and allocation-free by design
//! - ✅ RS-232, RS-485 (auto direction control, multidrop, auto address
//!   detection), IrDA SIR and modem line types
//! - ✅ Hardware (RTS/CTS) and software (Xon/Xoff) flow control
//! - ✅ Baud-rate divisor and prescaler search with reported error
//! - ✅ Byte-verified and ring-buffered burst transfers, per direction
//! - ✅ GPIO access on parts that have GPIOs
//! - ✅ [`embedded_io::Read`] and [`embedded_io::Write`] for each channel
//! - ✅ Optional logging through [`defmt`] (feature `defmt`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use core::cell::RefCell;
//! use sc16is7xx::*;
//!
//! let interface = SpiInterface::new(spi_device);
//! let mut device = Sc16is7xx::new(interface, DeviceConfig {
//!     part: PartNumber::Sc16is752,
//!     clock: ClockSource::Crystal(14_745_600),
//!     bus_clock_hz: 4_000_000,
//!     gpio: None,
//! });
//! device.init()?;
//!
//! let device = RefCell::new(device);
//! let mut tx = [0; 128];
//! let mut rx = [0; 128];
//! let mut uart = Uart::new(
//!     &device,
//!     Channel::A,
//!     DriverConfig::empty(),
//!     Some(&mut tx),
//!     Some(&mut rx),
//! )?;
//! uart.init(&UartConfig::default())?;
//! uart.transmit(b"hello world!")?;
//! ```
//!
//! [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//! [`defmt`]: https://docs.rs/defmt

#![no_std]
#![deny(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::must_use_candidate,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(rustdoc::all)]

#[cfg(test)]
extern crate std;

// Must go first so that the logging macros are visible in all modules.
mod fmt;

pub mod spec;

mod backend;
mod config;
mod error;
#[cfg(test)]
mod mock;
mod ring_buffer;
mod uart;

pub use crate::backend::{
    AddressPin, BusKind, Channel, Direction, I2cAddress, I2cInterface, Interface, SpiInterface,
    register_address,
};
pub use crate::config::*;
pub use crate::error::*;
pub use crate::uart::Uart;

use crate::spec::registers::{IER, IOCONTROL, RegisterBank, offsets};
use crate::spec::{FREQUENCY_MIN_HZ, PartLimits, PartNumber};

/// The prior [`LCR`] value returned when entering a register bank. Restoring
/// consumes it.
///
/// [`LCR`]: crate::spec::registers::LCR
#[derive(Debug)]
#[must_use]
pub(crate) struct BankToken(u8);

/// Driver for one SC16IS7xx chip.
///
/// Owns the bus [`Interface`] and provides register access, register bank
/// switching, device bring-up and the GPIO block. UART channels are driven
/// through [`Uart`], which borrows the device from a [`RefCell`] so that
/// both channels of a dual-UART part can share it.
///
/// All reads and writes operate on the underlying hardware.
///
/// # Example
///
/// ```rust,ignore
/// let interface = I2cInterface::new(i2c, I2cAddress::from_pins(AddressPin::Vdd, AddressPin::Vdd));
/// let mut device = Sc16is7xx::new(interface, DeviceConfig::default());
/// device.init()?;
/// device.set_gpio_pins_direction(0x0F, 0xFF)?;
/// device.set_gpio_pins_output_level(0x30, 0xF0)?;
/// ```
///
/// [`RefCell`]: core::cell::RefCell
#[derive(Debug)]
pub struct Sc16is7xx<I: Interface> {
    interface: I,
    config: DeviceConfig,
    // IOState write cache: the register reads back pin levels, not the
    // output latch.
    gpio_output: u8,
    // Bit per channel, see `Channel::index`.
    claimed: u8,
}

impl<I: Interface> Sc16is7xx<I> {
    /// Creates the driver. No bus access happens before [`Self::init`].
    pub const fn new(interface: I, config: DeviceConfig) -> Self {
        Self {
            interface,
            config,
            gpio_output: 0,
            claimed: 0,
        }
    }

    /// Returns the interface, giving up the driver.
    pub fn release(self) -> I {
        self.interface
    }

    /// Returns the interface.
    pub const fn interface(&self) -> &I {
        &self.interface
    }

    /// Returns the interface mutably. Register state changed behind the
    /// driver's back is not tracked.
    pub const fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Returns the active config.
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Returns the part number.
    pub const fn part_number(&self) -> PartNumber {
        self.config.part
    }

    /// Returns the static limits of the part.
    pub const fn limits(&self) -> &'static PartLimits {
        self.config.part.limits()
    }

    /* ----- Init, Setup, Tests --------------------------------------------- */

    /// Initializes the device:
    ///
    /// 1. checks the reference clock and the bus clock against the part
    ///    limits,
    /// 2. on I2C, checks that the device acknowledges its address,
    /// 3. performs a software reset,
    /// 4. runs the scratch pad test (see [`Self::hardware_comm_test`]),
    /// 5. configures the GPIOs if the part has them and a [`GpioConfig`] is
    ///    given.
    ///
    /// # Errors
    ///
    /// - [`Error::Frequency`] if the reference clock is out of range
    /// - [`Error::Configuration`] if the reference clock is zero
    /// - [`Error::I2cConfig`]/[`Error::SpiConfig`] if the bus is too fast
    /// - [`Error::NoDeviceDetected`] if the device does not answer properly
    /// - bus errors
    pub fn init(&mut self) -> Result<(), Error<I::Error>> {
        let limits = self.limits();
        let clock = self.config.clock;
        let frequency = clock.frequency();
        info!(
            "init {} with {=u32} Hz reference clock",
            self.config.part,
            frequency
        );

        if frequency > clock.max_frequency() {
            warn!("reference clock above {=u32} Hz", clock.max_frequency());
            return Err(Error::Frequency);
        }
        if frequency == 0 {
            return Err(Error::Configuration);
        }
        if frequency < FREQUENCY_MIN_HZ {
            warn!("reference clock below {=u32} Hz", FREQUENCY_MIN_HZ);
            return Err(Error::Frequency);
        }

        let bus_kind = self.interface.bus_kind();
        match bus_kind {
            BusKind::I2c if self.config.bus_clock_hz > limits.i2c_clock_max_hz => {
                return Err(Error::I2cConfig);
            }
            BusKind::Spi if self.config.bus_clock_hz > limits.spi_clock_max_hz => {
                return Err(Error::SpiConfig);
            }
            _ => {}
        }

        if bus_kind == BusKind::I2c {
            self.interface
                .probe()
                .map_err(|_| Error::NoDeviceDetected)?;
        }

        self.soft_reset()?;
        self.hardware_comm_test().map_err(|e| match e {
            Error::BadData => Error::NoDeviceDetected,
            e => e,
        })?;
        debug!("scratch pad test passed");

        if limits.has_gpio {
            if let Some(gpio) = self.config.gpio {
                self.configure_gpios(gpio)?;
            }
        }

        Ok(())
    }

    /// Resets all registers of the device to their defaults.
    ///
    /// On I2C the device may reset before acknowledging the data byte, such
    /// NACK is treated as success.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn soft_reset(&mut self) -> Result<(), Error<I::Error>> {
        let result = self.write_register(
            Channel::A,
            offsets::IOCONTROL,
            IOCONTROL::SOFT_RESET.bits(),
        );
        match result {
            Err(Error::I2cInvalidAddress) if self.interface.bus_kind() == BusKind::I2c => {}
            other => other?,
        }
        self.gpio_output = 0;
        debug!("soft reset done");
        Ok(())
    }

    /// Tests the bus communication by writing `0x55` and then `0xAA` to the
    /// scratch pad register and reading each back.
    ///
    /// # Errors
    ///
    /// - [`Error::BadData`] if a value does not read back
    /// - bus errors
    pub fn hardware_comm_test(&mut self) -> Result<(), Error<I::Error>> {
        for pattern in [0x55, 0xAA] {
            self.write_register(Channel::A, offsets::SPR, pattern)?;
            let read = self.read_register(Channel::A, offsets::SPR)?;
            if read != pattern {
                warn!("scratch pad read {=u8:#x}, expected {=u8:#x}", read, pattern);
                return Err(Error::BadData);
            }
        }
        Ok(())
    }

    /// Returns whether sleep mode is enabled for the channel.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn is_device_in_sleep_mode(&mut self, channel: Channel) -> Result<bool, Error<I::Error>> {
        let ier = IER::from_bits_retain(self.read_register(channel, offsets::IER)?);
        Ok(ier.contains(IER::SLEEP_MODE))
    }

    /* ----- Register Access ------------------------------------------------ */

    /// Reads one register.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn read_register(&mut self, channel: Channel, register: u8) -> Result<u8, Error<I::Error>> {
        let mut buf = [0];
        self.interface.read(channel, register, &mut buf)?;
        Ok(buf[0])
    }

    /// Writes one register.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn write_register(
        &mut self,
        channel: Channel,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I::Error>> {
        self.interface.write(channel, register, &[value])
    }

    /// Reads `buf.len()` times from the same register, e.g. RHR.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn read_registers(
        &mut self,
        channel: Channel,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        self.interface.read(channel, register, buf)
    }

    /// Writes all of `data` to the same register, e.g. THR.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn write_registers(
        &mut self,
        channel: Channel,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<I::Error>> {
        self.interface.write(channel, register, data)
    }

    /// Read-modify-write of one register: only bits set in `mask` change to
    /// their value in `value`.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn modify_register(
        &mut self,
        channel: Channel,
        register: u8,
        value: u8,
        mask: u8,
    ) -> Result<(), Error<I::Error>> {
        let current = self.read_register(channel, register)?;
        self.write_register(channel, register, (current & !mask) | (value & mask))
    }

    /// Selects `bank` and returns the prior LCR value.
    pub(crate) fn enter_bank(
        &mut self,
        channel: Channel,
        bank: RegisterBank,
    ) -> Result<BankToken, Error<I::Error>> {
        let lcr = self.read_register(channel, offsets::LCR)?;
        trace!("channel {} enters {} bank", channel, bank);
        self.write_register(channel, offsets::LCR, bank.lcr_value(lcr))?;
        Ok(BankToken(lcr))
    }

    /// Returns to the general bank, keeping the line format of `token`.
    pub(crate) fn restore_bank(
        &mut self,
        channel: Channel,
        token: BankToken,
    ) -> Result<(), Error<I::Error>> {
        let lcr = RegisterBank::General.lcr_value(token.0);
        self.write_register(channel, offsets::LCR, lcr)
    }

    /// Runs `f` with `bank` selected. The general bank is restored even if
    /// `f` fails, in which case the error of `f` is returned.
    pub(crate) fn with_bank<T>(
        &mut self,
        channel: Channel,
        bank: RegisterBank,
        f: impl FnOnce(&mut Self) -> Result<T, Error<I::Error>>,
    ) -> Result<T, Error<I::Error>> {
        let token = self.enter_bank(channel, bank)?;
        let result = f(self);
        let restored = self.restore_bank(channel, token);
        let value = result?;
        restored?;
        Ok(value)
    }

    /// Unlocks the enhanced bits of IER, FCR, IIR and MCR and the flow
    /// control registers by setting [`EFR::ENHANCED_FUNCTIONS`].
    ///
    /// # Errors
    ///
    /// Bus errors.
    ///
    /// [`EFR::ENHANCED_FUNCTIONS`]: crate::spec::registers::EFR::ENHANCED_FUNCTIONS
    pub fn enable_enhanced_functions(&mut self, channel: Channel) -> Result<(), Error<I::Error>> {
        use crate::spec::registers::EFR;
        self.with_bank(channel, RegisterBank::Enhanced, |device| {
            device.modify_register(
                channel,
                offsets::EFR,
                EFR::ENHANCED_FUNCTIONS.bits(),
                EFR::ENHANCED_FUNCTIONS.bits(),
            )
        })
    }

    /* ----- Channels ------------------------------------------------------- */

    /// Checks that `channel` exists on the part.
    pub(crate) const fn check_channel(&self, channel: Channel) -> Result<(), Error<I::Error>> {
        if matches!(channel, Channel::B) && !self.limits().has_two_uarts {
            return Err(Error::UnknownElement);
        }
        Ok(())
    }

    /// Marks `channel` as driven by a [`Uart`].
    pub(crate) fn claim(&mut self, channel: Channel) -> Result<(), Error<I::Error>> {
        self.check_channel(channel)?;
        let bit = 1 << channel.index();
        if self.claimed & bit != 0 {
            return Err(Error::ChannelInUse);
        }
        self.claimed |= bit;
        Ok(())
    }

    pub(crate) const fn unclaim(&mut self, channel: Channel) {
        self.claimed &= !(1 << channel.index());
    }

    /* ----- GPIO ----------------------------------------------------------- */

    const fn check_gpio(&self) -> Result<(), Error<I::Error>> {
        if !self.limits().has_gpio {
            return Err(Error::NotSupported);
        }
        Ok(())
    }

    /// Programs direction, output levels and interrupt enables of all pins.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] if the part has no GPIOs
    /// - bus errors
    pub fn configure_gpios(&mut self, config: GpioConfig) -> Result<(), Error<I::Error>> {
        self.check_gpio()?;
        self.write_register(Channel::A, offsets::IODIR, !config.inputs)?;
        self.gpio_output = config.output_levels;
        self.write_register(Channel::A, offsets::IOSTATE, self.gpio_output)?;
        self.write_register(Channel::A, offsets::IOINTENA, config.interrupt_enable)
    }

    /// Sets the direction of the pins in `mask`: a set bit in `inputs` makes
    /// the pin an input, a cleared bit an output.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] if the part has no GPIOs
    /// - bus errors
    pub fn set_gpio_pins_direction(&mut self, inputs: u8, mask: u8) -> Result<(), Error<I::Error>> {
        self.check_gpio()?;
        self.modify_register(Channel::A, offsets::IODIR, !inputs, mask)
    }

    /// Returns the levels of all pins.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] if the part has no GPIOs
    /// - bus errors
    pub fn gpio_pins_input_level(&mut self) -> Result<u8, Error<I::Error>> {
        self.check_gpio()?;
        self.read_register(Channel::A, offsets::IOSTATE)
    }

    /// Sets the output level of the pins in `mask`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] if the part has no GPIOs
    /// - bus errors
    pub fn set_gpio_pins_output_level(
        &mut self,
        level: u8,
        mask: u8,
    ) -> Result<(), Error<I::Error>> {
        self.check_gpio()?;
        self.gpio_output = (self.gpio_output & !mask) | (level & mask);
        self.write_register(Channel::A, offsets::IOSTATE, self.gpio_output)
    }

    /// Enables (set bit) or disables the change interrupt of the pins in
    /// `mask`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotSupported`] if the part has no GPIOs
    /// - bus errors
    pub fn set_gpio_pins_interrupt_enable(
        &mut self,
        enable: u8,
        mask: u8,
    ) -> Result<(), Error<I::Error>> {
        self.check_gpio()?;
        self.modify_register(Channel::A, offsets::IOINTENA, enable, mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBank, MockChip};
    use crate::spec::registers::LCR;

    fn new_device(part: PartNumber, bus: BusKind) -> Sc16is7xx<MockChip> {
        Sc16is7xx::new(
            MockChip::new(bus),
            DeviceConfig {
                part,
                clock: ClockSource::Crystal(1_843_200),
                bus_clock_hz: 400_000,
                gpio: None,
            },
        )
    }

    #[test]
    fn test_init_spi() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.interface_mut().channel_mut(Channel::A).lcr = 0x03;
        device.init().unwrap();

        let chip = device.interface();
        // Soft reset ran and the scratch pad saw both patterns.
        assert_eq!(chip.resets, 1);
        assert_eq!(chip.writes_to(Channel::A, MockBank::General, offsets::SPR), [0x55, 0xAA]);
        assert_eq!(chip.channel(Channel::A).lcr, 0x1D);
    }

    #[test]
    fn test_init_i2c_nack_on_reset() {
        let mut device = new_device(PartNumber::Sc16is750, BusKind::I2c);
        device.interface_mut().nack_on_reset = true;
        device.init().unwrap();
        assert_eq!(device.interface().resets, 1);
    }

    #[test]
    fn test_init_spi_nack_on_reset_is_error() {
        let mut device = new_device(PartNumber::Sc16is750, BusKind::Spi);
        device.interface_mut().nack_on_reset = true;
        assert_eq!(device.init(), Err(Error::I2cInvalidAddress));
    }

    #[test]
    fn test_init_no_device() {
        let mut device = new_device(PartNumber::Sc16is750, BusKind::I2c);
        device.interface_mut().probe_fails = true;
        assert_eq!(device.init(), Err(Error::NoDeviceDetected));

        let mut device = new_device(PartNumber::Sc16is750, BusKind::Spi);
        device.interface_mut().scratch_broken = true;
        assert_eq!(device.init(), Err(Error::NoDeviceDetected));
    }

    #[test]
    fn test_init_checks_clocks() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.config.clock = ClockSource::Crystal(25_000_000);
        assert_eq!(device.init(), Err(Error::Frequency));
        device.config.clock = ClockSource::Oscillator(25_000_000);
        assert_eq!(device.init(), Ok(()));
        device.config.clock = ClockSource::Oscillator(0);
        assert_eq!(device.init(), Err(Error::Configuration));

        device.config.clock = ClockSource::Crystal(1_843_200);
        device.config.bus_clock_hz = 4_000_001;
        assert_eq!(device.init(), Err(Error::SpiConfig));
        device.config.part = PartNumber::Sc16is762;
        assert_eq!(device.init(), Ok(()));

        let mut device = new_device(PartNumber::Sc16is762, BusKind::I2c);
        device.config.bus_clock_hz = 1_000_000;
        assert_eq!(device.init(), Err(Error::I2cConfig));
        // Nothing reached the bus.
        assert!(device.interface().log.is_empty());
    }

    #[test]
    fn test_init_configures_gpios() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.config.gpio = Some(GpioConfig {
            inputs: 0x0F,
            output_levels: 0xA0,
            interrupt_enable: 0x01,
        });
        device.init().unwrap();
        let chip = device.interface();
        assert_eq!(chip.iodir, 0xF0);
        assert_eq!(chip.iostate, 0xA0);
        assert_eq!(chip.iointena, 0x01);
    }

    #[test]
    fn test_gpio() {
        let mut device = new_device(PartNumber::Sc16is750, BusKind::Spi);
        device.set_gpio_pins_direction(0x00, 0x03).unwrap();
        assert_eq!(device.interface().iodir, 0x03);
        device.set_gpio_pins_direction(0x01, 0x01).unwrap();
        assert_eq!(device.interface().iodir, 0x02);

        device.set_gpio_pins_output_level(0x02, 0x02).unwrap();
        device.set_gpio_pins_output_level(0xFF, 0x01).unwrap();
        assert_eq!(device.interface().iostate, 0x03);
        device.set_gpio_pins_output_level(0x00, 0x01).unwrap();
        assert_eq!(device.interface().iostate, 0x02);

        device.interface_mut().gpio_inputs = 0x80;
        // Pin 1 is an output driven high, pin 7 an input reading high.
        assert_eq!(device.gpio_pins_input_level().unwrap(), 0x82);

        device.set_gpio_pins_interrupt_enable(0x80, 0x80).unwrap();
        assert_eq!(device.interface().iointena, 0x80);
    }

    #[test]
    fn test_gpio_not_supported() {
        let mut device = new_device(PartNumber::Sc16is740, BusKind::Spi);
        assert_eq!(device.set_gpio_pins_direction(0, 0xFF), Err(Error::NotSupported));
        assert_eq!(device.gpio_pins_input_level(), Err(Error::NotSupported));
        assert_eq!(device.set_gpio_pins_output_level(0, 0xFF), Err(Error::NotSupported));
        assert_eq!(
            device.set_gpio_pins_interrupt_enable(0, 0xFF),
            Err(Error::NotSupported)
        );
        assert!(device.interface().log.is_empty());
    }

    #[test]
    fn test_modify_register() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.write_register(Channel::B, offsets::SPR, 0b1010_1010).unwrap();
        device
            .modify_register(Channel::B, offsets::SPR, 0b0000_1111, 0b0011_1100)
            .unwrap();
        assert_eq!(device.read_register(Channel::B, offsets::SPR), Ok(0b1000_1110));
        assert_eq!(device.read_register(Channel::A, offsets::SPR), Ok(0));
    }

    #[test]
    fn test_bank_restored_after_error() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.write_register(Channel::A, offsets::LCR, 0x1B).unwrap();
        device.interface_mut().fail_write = Some((MockBank::Enhanced, offsets::EFR));

        assert!(matches!(
            device.enable_enhanced_functions(Channel::A),
            Err(Error::Bus(_))
        ));
        assert_eq!(device.interface().channel(Channel::A).lcr, 0x1B);

        device.interface_mut().fail_write = None;
        device.enable_enhanced_functions(Channel::A).unwrap();
        assert_eq!(device.interface().channel(Channel::A).efr, 0x10);
        assert_eq!(
            LCR::from_bits_retain(device.interface().channel(Channel::A).lcr),
            LCR::from_bits_retain(0x1B)
        );
    }

    #[test]
    fn test_sleep_mode() {
        let mut device = new_device(PartNumber::Sc16is752, BusKind::Spi);
        device.enable_enhanced_functions(Channel::B).unwrap();
        assert_eq!(device.is_device_in_sleep_mode(Channel::B), Ok(false));
        device
            .write_register(Channel::B, offsets::IER, IER::SLEEP_MODE.bits())
            .unwrap();
        assert_eq!(device.is_device_in_sleep_mode(Channel::B), Ok(true));
        assert_eq!(device.is_device_in_sleep_mode(Channel::A), Ok(false));
    }

    #[test]
    fn test_claims() {
        let mut device = new_device(PartNumber::Sc16is750, BusKind::Spi);
        assert_eq!(device.claim(Channel::B), Err(Error::UnknownElement));
        device.claim(Channel::A).unwrap();
        assert_eq!(device.claim(Channel::A), Err(Error::ChannelInUse));
        device.unclaim(Channel::A);
        device.claim(Channel::A).unwrap();
    }
}
