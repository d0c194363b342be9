// SPDX-License-Identifier: MIT OR Apache-2.0

//! One UART channel of a [`Sc16is7xx`].

use crate::Sc16is7xx;
use crate::backend::{Channel, Interface};
use crate::config::{
    ControlFlow, DriverConfig, FifoConfig, IrDaPulseRatio, Rs485Mode, Rs485RtsControl, UartConfig,
    UartType,
};
use crate::error::Error;
use crate::ring_buffer::RingBuffer;
use crate::spec::registers::{
    EFCR, EFR, FCR, IER, IIR, IOCONTROL, InterruptSource, LCR, LSR, MCR, MSR, RegisterBank, TCR,
    TLR, offsets,
};
use crate::spec::{
    BAUD_RATE_MAX, BAUD_RATE_MIN, BaudRateSolution, FREQUENCY_MIN_HZ, IRDA_BAUD_RATE_MAX,
    IRDA_QUARTER_RATIO_BAUD_RATE_MAX, Prescaler, calc_baud_rate_solution,
};
use core::cell::{RefCell, RefMut};

/// Polls of the Rx FIFO per character in the loopback test.
const LOOPBACK_POLLS: usize = 64;

/// One UART channel of a [`Sc16is7xx`].
///
/// The device lives in a [`RefCell`] so that the channels of a dual-UART part
/// can be driven independently. Each operation borrows the device only for
/// its own duration; a device that is borrowed elsewhere yields
/// [`Error::Busy`] instead of a panic.
///
/// Creating a [`Uart`] claims the channel, dropping it releases the claim.
///
/// # Transfer disciplines
///
/// Per direction, [`DriverConfig`] selects between:
///
/// - **safe**: byte by byte against the FIFO level registers. On receive,
///   the line status is checked for every character.
/// - **burst** (default): one bulk bus transfer bounded by the FIFO level.
///   With a ring buffer attached, data is staged there first, which
///   decouples the caller from the FIFO level.
///
/// # Sending and Receiving Data
///
/// - [`Uart::transmit`]: send as much as possible right now, returns `n`
/// - [`Uart::receive`]: receive what is available right now, returns `n`
/// - [`Uart::transmit_char`]/[`Uart::receive_char`]: blocking single
///   characters
/// - [`Uart::wait_end_tx`]: block until the line is idle
/// - [`embedded_io::Read`]/[`embedded_io::Write`] on top of these
pub struct Uart<'d, 'b, I: Interface> {
    device: &'d RefCell<Sc16is7xx<I>>,
    channel: Channel,
    driver: DriverConfig,
    tx: Option<RingBuffer<'b>>,
    rx: Option<RingBuffer<'b>>,
}

impl<I: Interface> core::fmt::Debug for Uart<'_, '_, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Uart")
            .field("channel", &self.channel)
            .field("driver", &self.driver)
            .field("tx", &self.tx)
            .field("rx", &self.rx)
            .finish_non_exhaustive()
    }
}

impl<'d, 'b, I: Interface> Uart<'d, 'b, I> {
    /// Claims `channel` of `device`.
    ///
    /// `tx_buffer` and `rx_buffer` are optional ring buffer storage for the
    /// burst disciplines.
    ///
    /// No bus access happens before [`Self::init`].
    ///
    /// # Errors
    ///
    /// - [`Error::Parameter`] if a buffer storage is empty
    /// - [`Error::UnknownElement`] if the part has no such channel
    /// - [`Error::ChannelInUse`] if another [`Uart`] drives the channel
    /// - [`Error::Busy`] if the device is borrowed elsewhere
    pub fn new(
        device: &'d RefCell<Sc16is7xx<I>>,
        channel: Channel,
        driver: DriverConfig,
        tx_buffer: Option<&'b mut [u8]>,
        rx_buffer: Option<&'b mut [u8]>,
    ) -> Result<Self, Error<I::Error>> {
        let tx_empty = tx_buffer.as_deref().is_some_and(<[u8]>::is_empty);
        let rx_empty = rx_buffer.as_deref().is_some_and(<[u8]>::is_empty);
        if tx_empty || rx_empty {
            return Err(Error::Parameter);
        }

        device
            .try_borrow_mut()
            .map_err(|_| Error::Busy)?
            .claim(channel)?;

        Ok(Self {
            device,
            channel,
            driver,
            tx: tx_buffer.map(RingBuffer::new),
            rx: rx_buffer.map(RingBuffer::new),
        })
    }

    /// Returns the channel.
    pub const fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the transfer disciplines.
    pub const fn driver_config(&self) -> DriverConfig {
        self.driver
    }

    fn device(&self) -> Result<RefMut<'d, Sc16is7xx<I>>, Error<I::Error>> {
        self.device.try_borrow_mut().map_err(|_| Error::Busy)
    }

    /* ----- Init, Setup, Tests --------------------------------------------- */

    /// Brings the channel from any state into the configured operational
    /// state without glitching the line:
    ///
    /// 1. unlock the enhanced functions and TCR/TLR access,
    /// 2. disable interrupts, transmitter and receiver, clear the FIFOs,
    /// 3. disable flow control,
    /// 4. program the line type and frame format,
    /// 5. program the baud rate,
    /// 6. program the FIFOs,
    /// 7. enable transmitter and receiver as configured,
    /// 8. run the loopback test if [`DriverConfig::TEST_LOOPBACK_AT_INIT`] is
    ///    set and both directions are enabled,
    /// 9. program the flow control of the line type,
    /// 10. lock TCR/TLR access and enable the configured interrupts.
    ///
    /// Returns the baud rate actually programmed. A failure aborts the
    /// sequence, the channel then needs another [`Self::init`].
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] for inconsistent settings
    /// - [`Error::NotSupported`] if the part lacks a requested feature
    /// - errors of [`Self::set_baud_rate`] and [`Self::comm_test`]
    /// - bus errors
    pub fn init(&mut self, config: &UartConfig) -> Result<BaudRateSolution, Error<I::Error>> {
        let channel = self.channel;
        info!("init channel {}", channel);

        self.device()?.check_channel(channel)?;
        let flow = config.control_flow();
        validate_control_flow(&flow)?;

        if let Some(tx) = self.tx.as_mut() {
            tx.reset();
        }
        if let Some(rx) = self.rx.as_mut() {
            rx.reset();
        }

        let saved_ier = {
            let mut device = self.device()?;
            device.enable_enhanced_functions(channel)?;
            device.modify_register(
                channel,
                offsets::MCR,
                MCR::TCR_TLR_ENABLE.bits(),
                MCR::TCR_TLR_ENABLE.bits(),
            )?;
            let ier = device.read_register(channel, offsets::IER)?;
            device.write_register(channel, offsets::IER, 0)?;
            ier
        };
        debug!("channel {} enhanced functions enabled", channel);

        self.tx_rx_disable(true, true)?;
        self.reset_fifo(true, true)?;
        self.set_control_flow(&ControlFlow::default())?;
        debug!("channel {} quiesced", channel);

        self.configure_uart_type(config)?;
        let solution = self.set_baud_rate(config)?;
        self.configure_fifo(&config.fifo)?;

        self.device()?
            .write_register(channel, offsets::IER, saved_ier)?;
        self.tx_rx_disable(!config.tx_enable, !config.rx_enable)?;

        if self.driver.contains(DriverConfig::TEST_LOOPBACK_AT_INIT)
            && config.tx_enable
            && config.rx_enable
        {
            self.comm_test()?;
        }

        if flow.is_active() {
            self.set_control_flow(&flow)?;
        }

        self.device()?
            .modify_register(channel, offsets::MCR, 0, MCR::TCR_TLR_ENABLE.bits())?;
        self.configure_interrupts(config.interrupts)?;

        info!(
            "channel {} operational at {=u32} baud",
            channel,
            solution.actual_baud_rate
        );
        Ok(solution)
    }

    /// Programs the line type, then the frame format.
    fn configure_uart_type(&mut self, config: &UartConfig) -> Result<(), Error<I::Error>> {
        let channel = self.channel;
        let mut device = self.device()?;
        let limits = device.limits();

        let mut mcr = MCR::empty();
        let mut efcr = EFCR::empty();
        let mut iocontrol = IOCONTROL::empty();
        let modem_pins = match channel {
            Channel::A => IOCONTROL::GPIO7_4_AS_MODEM,
            Channel::B => IOCONTROL::GPIO3_0_AS_MODEM,
        };

        match config.uart_type {
            UartType::Rs232(_) => {}
            UartType::Rs485(rs485) => {
                let hardware_flow = rs485.hardware_flow.is_some();
                match rs485.rts {
                    Rs485RtsControl::AutoRts if hardware_flow => {
                        warn!("RS-485 auto RTS excludes hardware flow control");
                        return Err(Error::Configuration);
                    }
                    Rs485RtsControl::AutoRts => efcr |= EFCR::TX_CONTROLS_RTS,
                    Rs485RtsControl::HardwareFlow if !hardware_flow => {
                        warn!("RS-485 RTS by hardware flow control without flow control");
                        return Err(Error::Configuration);
                    }
                    Rs485RtsControl::ManualExternal if hardware_flow => {
                        warn!("RS-485 manual RTS excludes hardware flow control");
                        return Err(Error::Configuration);
                    }
                    Rs485RtsControl::HardwareFlow | Rs485RtsControl::ManualExternal => {}
                }
                if rs485.invert_rts {
                    efcr |= EFCR::INVERT_RTS;
                }
                match rs485.mode {
                    Rs485Mode::Normal => {}
                    Rs485Mode::Multidrop => efcr |= EFCR::NINE_BIT_MODE,
                    Rs485Mode::AutoAddressDetect { address } => {
                        efcr |= EFCR::NINE_BIT_MODE;
                        device.with_bank(channel, RegisterBank::Enhanced, |device| {
                            device.modify_register(
                                channel,
                                offsets::EFR,
                                EFR::SPECIAL_CHAR_DETECT.bits(),
                                EFR::SPECIAL_CHAR_DETECT.bits(),
                            )?;
                            device.write_register(channel, offsets::XOFF2, address)
                        })?;
                    }
                }
            }
            UartType::IrDa(irda) => {
                mcr |= MCR::IRDA_MODE;
                if irda.pulse_ratio == IrDaPulseRatio::Quarter {
                    if !limits.irda_quarter_ratio {
                        warn!("IrDA 1/4 pulse ratio not supported by {}", device.part_number());
                        return Err(Error::NotSupported);
                    }
                    efcr |= EFCR::IRDA_QUARTER_RATIO;
                }
            }
            UartType::Modem(_) => iocontrol |= modem_pins,
        }

        device.modify_register(channel, offsets::MCR, mcr.bits(), MCR::IRDA_MODE.bits())?;
        device.modify_register(channel, offsets::EFCR, efcr.bits(), EFCR::LINE_MODE.bits())?;
        device.modify_register(
            Channel::A,
            offsets::IOCONTROL,
            iocontrol.bits(),
            modem_pins.bits(),
        )?;

        let lcr = LCR::empty()
            .set_word_length(config.word_length)
            .set_stop_bits(config.stop_bits)
            .set_parity(config.parity);
        device.write_register(channel, offsets::LCR, lcr.bits())
    }

    /// Programs the FIFO enable and the trigger levels. TLR must be accessible.
    fn configure_fifo(&mut self, fifo: &FifoConfig) -> Result<(), Error<I::Error>> {
        let mut device = self.device()?;
        let fcr = if fifo.enabled {
            FCR::FIFO_ENABLE
        } else {
            FCR::empty()
        };
        device.write_register(self.channel, offsets::FCR, fcr.bits())?;
        let tlr = TLR::new(fifo.tx_trigger, fifo.rx_trigger);
        device.write_register(self.channel, offsets::TLR, tlr.bits())
    }

    /// Programs the baud rate of `config` and returns the solution found.
    ///
    /// The baud rate must be within [`BAUD_RATE_MIN`]..=[`BAUD_RATE_MAX`], or
    /// the IrDA ceiling of the configured pulse ratio. The divisor search
    /// itself is [`calc_baud_rate_solution`].
    ///
    /// # Errors
    ///
    /// - [`Error::SleepMode`] if the channel sleeps
    /// - [`Error::Frequency`] if the reference clock is out of range
    /// - [`Error::BaudRate`] if the baud rate is out of range
    /// - [`Error::NotSupported`] for the IrDA 1/4 pulse ratio on parts
    ///   without it
    /// - bus errors
    pub fn set_baud_rate(
        &mut self,
        config: &UartConfig,
    ) -> Result<BaudRateSolution, Error<I::Error>> {
        let channel = self.channel;
        let mut device = self.device()?;

        if device.is_device_in_sleep_mode(channel)? {
            return Err(Error::SleepMode);
        }

        let clock = device.config().clock;
        let frequency = clock.frequency();
        if !(FREQUENCY_MIN_HZ..=clock.max_frequency()).contains(&frequency) {
            return Err(Error::Frequency);
        }

        let max = match config.irda_pulse_ratio() {
            None => BAUD_RATE_MAX,
            Some(IrDaPulseRatio::ThreeSixteenths) => IRDA_BAUD_RATE_MAX,
            Some(IrDaPulseRatio::Quarter) if device.limits().irda_quarter_ratio => {
                IRDA_QUARTER_RATIO_BAUD_RATE_MAX
            }
            Some(IrDaPulseRatio::Quarter) => return Err(Error::NotSupported),
        };
        let baud_rate = config.baud_rate.to_integer();
        if !(BAUD_RATE_MIN..=max).contains(&baud_rate) {
            warn!("baud rate {=u32} outside {=u32}..={=u32}", baud_rate, BAUD_RATE_MIN, max);
            return Err(Error::BaudRate);
        }

        let solution = calc_baud_rate_solution(frequency, baud_rate);
        debug!(
            "baud rate {=u32}: prescaler {}, divisor {=u16}, error {=i32}",
            baud_rate,
            solution.prescaler,
            solution.divisor,
            solution.error
        );

        let mcr = match solution.prescaler {
            Prescaler::DivideBy1 => MCR::empty(),
            Prescaler::DivideBy4 => MCR::CLOCK_DIVIDE_BY_4,
        };
        device.modify_register(
            channel,
            offsets::MCR,
            mcr.bits(),
            MCR::CLOCK_DIVIDE_BY_4.bits(),
        )?;

        let [low, high] = solution.divisor.to_le_bytes();
        device.with_bank(channel, RegisterBank::Special, |device| {
            device.write_register(channel, offsets::DLL, low)?;
            device.write_register(channel, offsets::DLH, high)
        })?;

        Ok(solution)
    }

    /// Programs flow control. [`ControlFlow::default`] disables it.
    ///
    /// The settings are validated before the first register write. The
    /// enhanced bank is entered and left in any case, as the flow control
    /// bits only take writes while the enhanced functions are enabled.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if hardware and software flow control are
    ///   both requested, if the halt level is not above the resume level, or
    ///   if the special character collides with another use of Xoff2
    /// - bus errors
    pub fn set_control_flow(&mut self, flow: &ControlFlow) -> Result<(), Error<I::Error>> {
        validate_control_flow(flow)?;
        let channel = self.channel;
        let mut device = self.device()?;

        let levels = flow
            .hardware
            .map(|hw| TCR::new(hw.halt, hw.resume))
            .or_else(|| flow.software.map(|sw| TCR::new(sw.halt, sw.resume)));
        if let Some(tcr) = levels {
            let mcr = MCR::from_bits_retain(device.read_register(channel, offsets::MCR)?);
            let locked = !mcr.contains(MCR::TCR_TLR_ENABLE);
            if locked {
                device.write_register(channel, offsets::MCR, (mcr | MCR::TCR_TLR_ENABLE).bits())?;
            }
            device.write_register(channel, offsets::TCR, tcr.bits())?;
            if locked {
                device.write_register(channel, offsets::MCR, mcr.bits())?;
            }
        }

        device.with_bank(channel, RegisterBank::Enhanced, |device| {
            let mut efr = EFR::ENHANCED_FUNCTIONS;
            if let Some(hw) = flow.hardware {
                efr.set(EFR::AUTO_RTS, hw.auto_rts);
                efr.set(EFR::AUTO_CTS, hw.auto_cts);
            }
            if flow.use_address_character {
                efr |= EFR::SPECIAL_CHAR_DETECT;
            }
            if let Some(sw) = flow.software {
                device.write_register(channel, offsets::XON1, sw.xon1)?;
                device.write_register(channel, offsets::XON2, sw.xon2)?;
                device.write_register(channel, offsets::XOFF1, sw.xoff1)?;
                if flow.special_character.is_none() {
                    device.write_register(channel, offsets::XOFF2, sw.xoff2)?;
                }
                efr = efr.set_software_flow(sw.mode);
            }
            if let Some(special) = flow.special_character {
                device.write_register(channel, offsets::XOFF2, special)?;
                efr |= EFR::SPECIAL_CHAR_DETECT;
            }
            device.write_register(channel, offsets::EFR, efr.bits())
        })?;

        let xon_any = flow.software.is_some_and(|sw| sw.xon_any);
        let mcr = if xon_any { MCR::XON_ANY } else { MCR::empty() };
        device.modify_register(channel, offsets::MCR, mcr.bits(), MCR::XON_ANY.bits())
    }

    /// Tests the channel in internal loopback mode: `0x55` and `0xAA`,
    /// truncated to 5 bits to fit any word length, must come back unaltered
    /// and without line status errors. Both FIFOs are cleared, and so are
    /// the ring buffers.
    ///
    /// # Errors
    ///
    /// - [`Error::PeripheralNotValid`] if a character does not come back
    /// - bus errors
    pub fn comm_test(&mut self) -> Result<(), Error<I::Error>> {
        let channel = self.channel;
        self.device()?
            .modify_register(channel, offsets::MCR, MCR::LOOPBACK.bits(), MCR::LOOPBACK.bits())?;

        let result = self.loopback_round_trips();
        let restored = self.device().and_then(|mut device| {
            device.modify_register(channel, offsets::MCR, 0, MCR::LOOPBACK.bits())
        });
        result?;
        restored
    }

    fn loopback_round_trips(&mut self) -> Result<(), Error<I::Error>> {
        if let Some(tx) = self.tx.as_mut() {
            tx.reset();
        }
        if let Some(rx) = self.rx.as_mut() {
            rx.reset();
        }
        self.reset_fifo(true, true)?;

        for pattern in [0x55 & 0x1F, 0xAA & 0x1F] {
            self.transmit_char(pattern)?;

            let mut status = LSR::empty();
            for _ in 0..LOOPBACK_POLLS {
                status = self.status()?;
                if status.contains(LSR::DATA_READY) {
                    break;
                }
            }
            let clean = status.contains(LSR::DATA_READY) && status.receive_errors().is_empty();
            let received = if clean {
                match self.receive_char() {
                    Ok(byte) => Some(byte),
                    Err(Error::Receive { .. }) => None,
                    Err(e) => return Err(e),
                }
            } else {
                None
            };

            if received != Some(pattern) {
                warn!("channel {} loopback test failed, status {}", self.channel, status);
                return Err(Error::PeripheralNotValid);
            }
        }
        Ok(())
    }

    /* ----- Status and Control --------------------------------------------- */

    /// Enables exactly the given interrupts. [`IER::SLEEP_MODE`] is masked
    /// out.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn configure_interrupts(&mut self, interrupts: IER) -> Result<(), Error<I::Error>> {
        self.device()?
            .write_register(self.channel, offsets::IER, interrupts.interrupts().bits())
    }

    /// Returns the pending interrupt with the highest priority, if any.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn interrupt_event(&mut self) -> Result<Option<InterruptSource>, Error<I::Error>> {
        let iir = self.device()?.read_register(self.channel, offsets::IIR)?;
        Ok(IIR::from_bits_retain(iir).interrupt_source())
    }

    /// Returns the line status.
    ///
    /// Reading clears the error bits of the character on top of the Rx FIFO.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn status(&mut self) -> Result<LSR, Error<I::Error>> {
        let lsr = self.device()?.read_register(self.channel, offsets::LSR)?;
        Ok(LSR::from_bits_retain(lsr))
    }

    /// Returns the free space in the Tx FIFO.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn available_space_tx_fifo(&mut self) -> Result<u8, Error<I::Error>> {
        self.device()?.read_register(self.channel, offsets::TXLVL)
    }

    /// Returns the number of characters in the Rx FIFO.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn data_count_rx_fifo(&mut self) -> Result<u8, Error<I::Error>> {
        self.device()?.read_register(self.channel, offsets::RXLVL)
    }

    /// Clears the selected FIFOs. Whether the FIFOs are enabled is preserved.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn reset_fifo(&mut self, tx: bool, rx: bool) -> Result<(), Error<I::Error>> {
        let mut device = self.device()?;
        let iir = IIR::from_bits_retain(device.read_register(self.channel, offsets::IIR)?);
        let mut fcr = FCR::empty();
        fcr.set(FCR::FIFO_ENABLE, iir.fifos_enabled());
        fcr.set(FCR::TX_FIFO_RESET, tx);
        fcr.set(FCR::RX_FIFO_RESET, rx);
        device.write_register(self.channel, offsets::FCR, fcr.bits())
    }

    /// Disables (`true`) or enables (`false`) transmitter and receiver.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn tx_rx_disable(&mut self, tx: bool, rx: bool) -> Result<(), Error<I::Error>> {
        let mut efcr = EFCR::empty();
        efcr.set(EFCR::TX_DISABLE, tx);
        efcr.set(EFCR::RX_DISABLE, rx);
        self.device()?.modify_register(
            self.channel,
            offsets::EFCR,
            efcr.bits(),
            EFCR::TX_RX_DISABLE.bits(),
        )
    }

    /// Returns the modem status.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn control_pin_status(&mut self) -> Result<MSR, Error<I::Error>> {
        let msr = self.device()?.read_register(self.channel, offsets::MSR)?;
        Ok(MSR::from_bits_retain(msr))
    }

    /// Returns whether the remote is clear to send to. Errors read as `false`.
    #[must_use]
    pub fn is_clear_to_send(&mut self) -> bool {
        self.control_pin_status()
            .is_ok_and(|msr| msr.contains(MSR::CTS))
    }

    /* ----- User I/O ------------------------------------------------------- */

    /// Transmits as much of `data` as possible right now and returns how many
    /// bytes were taken.
    ///
    /// With a Tx ring buffer (burst mode), `data` is copied into the buffer
    /// up to its wrap point, then as much of the buffer as the Tx FIFO has
    /// space for is moved in one bus transfer. The return value counts the
    /// bytes taken into the buffer: zero means the buffer is full, which is
    /// not an error. Call [`Self::flush_tx_buffer_to_fifo`] to keep the FIFO
    /// fed.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn transmit(&mut self, data: &[u8]) -> Result<usize, Error<I::Error>> {
        let channel = self.channel;
        let mut device = self.device()?;

        if self.driver.contains(DriverConfig::SAFE_TX) {
            let space = usize::from(device.read_register(channel, offsets::TXLVL)?);
            let n = data.len().min(space);
            for &byte in &data[..n] {
                device.write_register(channel, offsets::DATA, byte)?;
            }
            return Ok(n);
        }

        let Some(ring) = self.tx.as_mut() else {
            let space = usize::from(device.read_register(channel, offsets::TXLVL)?);
            let n = data.len().min(space);
            device.write_registers(channel, offsets::DATA, &data[..n])?;
            return Ok(n);
        };

        let taken = ring.push(data);
        if ring.is_empty() {
            return Ok(taken);
        }
        let moved = device
            .read_register(channel, offsets::TXLVL)
            .and_then(|space| {
                let window = ring.used_window();
                let n = window.len().min(usize::from(space));
                device.write_registers(channel, offsets::DATA, &window[..n])?;
                Ok(n)
            })
            .map(|n| ring.commit_out(n));
        match moved {
            Ok(()) => Ok(taken),
            // The bytes are queued, the next flush reports the error.
            Err(_) if taken > 0 => {
                warn!("channel {} Tx FIFO refill failed, {=usize} bytes queued", channel, taken);
                Ok(taken)
            }
            Err(e) => Err(e),
        }
    }

    /// Receives what is available right now into `buf` and returns how many
    /// bytes were stored.
    ///
    /// In safe mode, the line status is checked before each character. On a
    /// receive error the faulty character is dropped and
    /// [`Error::Receive`] reports how many good characters were stored before
    /// it.
    ///
    /// With an Rx ring buffer (burst mode), buffered data is handed out
    /// first, then the Rx FIFO is drained into the buffer in one bus
    /// transfer, then the buffer is handed out again. Line errors are not
    /// checked in burst mode, see [`Self::status`].
    ///
    /// # Errors
    ///
    /// - [`Error::Receive`] in safe mode
    /// - bus errors
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<usize, Error<I::Error>> {
        let channel = self.channel;
        let mut device = self.device()?;

        if self.driver.contains(DriverConfig::SAFE_RX) {
            let level = usize::from(device.read_register(channel, offsets::RXLVL)?);
            let n = buf.len().min(level);
            for (received, slot) in buf[..n].iter_mut().enumerate() {
                let status = LSR::from_bits_retain(device.read_register(channel, offsets::LSR)?);
                *slot = device.read_register(channel, offsets::DATA)?;
                if !status.receive_errors().is_empty() {
                    warn!(
                        "channel {} receive error {=u8:#x} after {=usize} characters",
                        channel,
                        status.bits(),
                        received
                    );
                    return Err(Error::Receive { received, status });
                }
            }
            return Ok(n);
        }

        let Some(ring) = self.rx.as_mut() else {
            let level = usize::from(device.read_register(channel, offsets::RXLVL)?);
            let n = buf.len().min(level);
            device.read_registers(channel, offsets::DATA, &mut buf[..n])?;
            return Ok(n);
        };

        let mut received = ring.pop(buf);
        if !ring.is_full() {
            let filled = device
                .read_register(channel, offsets::RXLVL)
                .and_then(|level| {
                    let window = ring.free_window();
                    let n = window.len().min(usize::from(level));
                    device.read_registers(channel, offsets::DATA, &mut window[..n])?;
                    Ok(n)
                })
                .map(|n| ring.commit_in(n));
            match filled {
                Ok(()) => {}
                // Bytes handed out already must be reported.
                Err(_) if received > 0 => {
                    warn!(
                        "channel {} Rx FIFO drain failed after {=usize} bytes",
                        channel,
                        received
                    );
                    return Ok(received);
                }
                Err(e) => return Err(e),
            }
        }
        received += ring.pop(&mut buf[received..]);
        Ok(received)
    }

    /// Transmits one character, retrying until it is taken.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn transmit_char(&mut self, byte: u8) -> Result<(), Error<I::Error>> {
        while self.transmit(&[byte])? != 1 {}
        Ok(())
    }

    /// Receives one character, retrying until one is available.
    ///
    /// # Errors
    ///
    /// - [`Error::Receive`] in safe mode
    /// - bus errors
    pub fn receive_char(&mut self) -> Result<u8, Error<I::Error>> {
        let mut buf = [0];
        while self.receive(&mut buf)? != 1 {}
        Ok(buf[0])
    }

    /// Moves as much of the Tx ring buffer as fits into the Tx FIFO.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn flush_tx_buffer_to_fifo(&mut self) -> Result<(), Error<I::Error>> {
        self.transmit(&[]).map(|_| ())
    }

    /// Moves as much of the Rx FIFO as fits into the Rx ring buffer.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn retrieve_rx_fifo_to_buffer(&mut self) -> Result<(), Error<I::Error>> {
        self.receive(&mut []).map(|_| ())
    }

    /// Blocks until the Tx ring buffer is drained and the transmitter is
    /// idle.
    ///
    /// # Errors
    ///
    /// Bus errors.
    pub fn wait_end_tx(&mut self) -> Result<(), Error<I::Error>> {
        while self.tx.as_ref().is_some_and(|ring| !ring.is_empty()) {
            self.flush_tx_buffer_to_fifo()?;
        }
        let idle = LSR::THR_EMPTY | LSR::TRANSMITTER_EMPTY;
        while !self.status()?.contains(idle) {}
        Ok(())
    }
}

/// Checks the flow control settings without touching the device.
fn validate_control_flow<E>(flow: &ControlFlow) -> Result<(), Error<E>> {
    if flow.hardware.is_some() && flow.software.is_some() {
        warn!("hardware and software flow control are exclusive");
        return Err(Error::Configuration);
    }
    if flow.special_character.is_some() {
        if flow.use_address_character {
            warn!("special character collides with the RS-485 address");
            return Err(Error::Configuration);
        }
        if flow.software.is_some_and(|sw| sw.mode.uses_xoff2()) {
            warn!("special character collides with Xoff2 flow control");
            return Err(Error::Configuration);
        }
    }
    let levels = flow
        .hardware
        .map(|hw| (hw.halt, hw.resume))
        .or_else(|| flow.software.map(|sw| (sw.halt, sw.resume)));
    if let Some((halt, resume)) = levels {
        if halt <= resume {
            warn!("flow control halt level must be above the resume level");
            return Err(Error::Configuration);
        }
    }
    Ok(())
}

impl<I: Interface> Drop for Uart<'_, '_, I> {
    fn drop(&mut self) {
        if let Ok(mut device) = self.device.try_borrow_mut() {
            device.unclaim(self.channel);
        } else {
            warn!("channel {} dropped while the device is borrowed", self.channel);
        }
    }
}

impl<I: Interface> embedded_io::ErrorType for Uart<'_, '_, I> {
    type Error = Error<I::Error>;
}

impl<I: Interface> embedded_io::Read for Uart<'_, '_, I> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.receive(buf)?;
            if n > 0 {
                return Ok(n);
            }
        }
    }
}

impl<I: Interface> embedded_io::Write for Uart<'_, '_, I> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.transmit(buf)?;
            if n > 0 {
                return Ok(n);
            }
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.wait_end_tx()
    }
}
