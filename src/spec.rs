// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Constants, Part Limits, Baud-Rate Resolution, Register Offsets, and Register Bits.
//!
//! Models the raw low-level details as of the [datasheet], and avoids too
//! opinionated abstractions.
//!
//! [datasheet]: https://www.nxp.com/docs/en/data-sheet/SC16IS752_SC16IS762.pdf

/// The size of each internal FIFO.
///
/// Each channel (tx: transmission, rx: reception) has its own queue.
pub const FIFO_SIZE: usize = 64;

/// Lowest supported reference clock. Anything below can not produce
/// [`BAUD_RATE_MIN`].
pub const FREQUENCY_MIN_HZ: u32 = 1_600;

/// Highest supported crystal frequency.
pub const CRYSTAL_FREQUENCY_MAX_HZ: u32 = 24_000_000;

/// Highest supported external oscillator frequency.
pub const OSCILLATOR_FREQUENCY_MAX_HZ: u32 = 80_000_000;

/// Lowest supported baud rate.
pub const BAUD_RATE_MIN: u32 = 100;

/// Highest supported baud rate in every mode.
pub const BAUD_RATE_MAX: u32 = 5_000_000;

/// Highest baud rate in IrDA SIR mode with the 3/16 pulse ratio.
pub const IRDA_BAUD_RATE_MAX: u32 = 115_200;

/// Highest baud rate in IrDA SIR mode with the 1/4 pulse ratio (SC16IS76x).
pub const IRDA_QUARTER_RATIO_BAUD_RATE_MAX: u32 = 1_152_000;

/// Highest I2C bus clock of every part.
pub const I2C_CLOCK_MAX_HZ: u32 = 400_000;

/// Highest SPI bus clock of the SC16IS74x and SC16IS75x parts.
pub const SPI_CLOCK_MAX_HZ: u32 = 4_000_000;

/// Highest SPI bus clock of the SC16IS76x parts.
pub const SC16IS76X_SPI_CLOCK_MAX_HZ: u32 = 15_000_000;

/// Scale of [`BaudRateSolution::error`]: an error of `1_000` is 1 %.
pub const BAUD_RATE_ERROR_SCALE: i64 = 100_000;

/// Part numbers of the SC16IS7xx family.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PartNumber {
    /// Single UART, no GPIOs.
    Sc16is740,
    /// Single UART, no GPIOs.
    Sc16is741,
    /// Single UART, no GPIOs. Same limits as [`Self::Sc16is741`].
    Sc16is741a,
    /// Single UART with 8 GPIOs.
    Sc16is750,
    /// Dual UART with 8 GPIOs.
    #[default]
    Sc16is752,
    /// Single UART with 8 GPIOs, fast SPI and 1/4 IrDA pulse ratio.
    Sc16is760,
    /// Dual UART with 8 GPIOs, fast SPI and 1/4 IrDA pulse ratio.
    Sc16is762,
}

/// Static capabilities and limits of one [`PartNumber`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartLimits {
    /// Highest I2C bus clock in Hz.
    pub i2c_clock_max_hz: u32,
    /// Highest SPI bus clock in Hz.
    pub spi_clock_max_hz: u32,
    /// Whether the IrDA SIR 1/4 pulse ratio is available.
    pub irda_quarter_ratio: bool,
    /// Whether the part has the GPIO block (IODir, IOState, IOIntEna).
    pub has_gpio: bool,
    /// Whether the part has channel B.
    pub has_two_uarts: bool,
}

impl PartLimits {
    const fn new(
        spi_clock_max_hz: u32,
        irda_quarter_ratio: bool,
        has_gpio: bool,
        has_two_uarts: bool,
    ) -> Self {
        Self {
            i2c_clock_max_hz: I2C_CLOCK_MAX_HZ,
            spi_clock_max_hz,
            irda_quarter_ratio,
            has_gpio,
            has_two_uarts,
        }
    }
}

static SC16IS740_LIMITS: PartLimits = PartLimits::new(SPI_CLOCK_MAX_HZ, false, false, false);
static SC16IS741_LIMITS: PartLimits = PartLimits::new(SPI_CLOCK_MAX_HZ, false, false, false);
static SC16IS750_LIMITS: PartLimits = PartLimits::new(SPI_CLOCK_MAX_HZ, false, true, false);
static SC16IS752_LIMITS: PartLimits = PartLimits::new(SPI_CLOCK_MAX_HZ, false, true, true);
static SC16IS760_LIMITS: PartLimits =
    PartLimits::new(SC16IS76X_SPI_CLOCK_MAX_HZ, true, true, false);
static SC16IS762_LIMITS: PartLimits = PartLimits::new(SC16IS76X_SPI_CLOCK_MAX_HZ, true, true, true);

impl PartNumber {
    /// Returns the static limits record of this part.
    #[must_use]
    pub const fn limits(self) -> &'static PartLimits {
        match self {
            Self::Sc16is740 => &SC16IS740_LIMITS,
            Self::Sc16is741 | Self::Sc16is741a => &SC16IS741_LIMITS,
            Self::Sc16is750 => &SC16IS750_LIMITS,
            Self::Sc16is752 => &SC16IS752_LIMITS,
            Self::Sc16is760 => &SC16IS760_LIMITS,
            Self::Sc16is762 => &SC16IS762_LIMITS,
        }
    }
}

/// The clock prescaler selected through [`registers::MCR::CLOCK_DIVIDE_BY_4`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    /// The reference clock feeds the baud generator directly.
    #[default]
    DivideBy1,
    /// The reference clock is divided by 4 first.
    DivideBy4,
}

impl Prescaler {
    /// Returns the division factor.
    #[must_use]
    pub const fn factor(self) -> u32 {
        match self {
            Self::DivideBy1 => 1,
            Self::DivideBy4 => 4,
        }
    }
}

/// Outcome of [`calc_baud_rate_solution`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaudRateSolution {
    /// The selected prescaler.
    pub prescaler: Prescaler,
    /// The 16 bit divisor for [`registers::offsets::DLL`] and
    /// [`registers::offsets::DLH`]. Always within `1..=65535`.
    pub divisor: u16,
    /// The baud rate actually produced, rounded to the nearest integer.
    pub actual_baud_rate: u32,
    /// Signed deviation from the requested baud rate, in units of
    /// 1/[`BAUD_RATE_ERROR_SCALE`]. Divide by `1_000` for percent.
    pub error: i32,
}

/// Calculates the 16 bit divisor for the given prescaler. The divisor is
/// rounded and clamped to `1..=65535`.
#[must_use]
pub fn calc_divisor(frequency: u32, baud_rate: u32, prescaler: Prescaler) -> u16 {
    let denominator = u64::from(baud_rate.max(1)) * 16 * u64::from(prescaler.factor());
    let divisor = (u64::from(frequency) + denominator / 2) / denominator;
    // Clamped, so the conversion can not fail.
    u16::try_from(divisor.clamp(1, u64::from(u16::MAX))).unwrap_or(u16::MAX)
}

/// Calculates the baud rate produced by `divisor` and `prescaler`, rounded
/// to the nearest integer.
#[must_use]
pub fn calc_baud_rate(frequency: u32, divisor: u16, prescaler: Prescaler) -> u32 {
    let denominator = u64::from(divisor.max(1)) * 16 * u64::from(prescaler.factor());
    let baud_rate = (u64::from(frequency) + denominator / 2) / denominator;
    u32::try_from(baud_rate).unwrap_or(u32::MAX)
}

/// Signed error of `divisor`/`prescaler` against `baud_rate`, in units of
/// 1/[`BAUD_RATE_ERROR_SCALE`]. Truncated towards zero.
fn calc_error(frequency: u32, baud_rate: u32, divisor: u16, prescaler: Prescaler) -> i32 {
    let baud_rate = i64::from(baud_rate.max(1));
    let denominator = i64::from(divisor) * 16 * i64::from(prescaler.factor());
    let produced = baud_rate * denominator;
    let error = (i64::from(frequency) - produced) * BAUD_RATE_ERROR_SCALE / produced;
    i32::try_from(error).unwrap_or(if error < 0 { i32::MIN } else { i32::MAX })
}

/// Finds the divisor/prescaler pair producing the baud rate closest to
/// `baud_rate` from the reference clock `frequency`.
///
/// Both prescalers are evaluated. The one with the smaller absolute error
/// wins, ties favor [`Prescaler::DivideBy1`]. The divisor is clamped to the
/// register range, the baud rate itself is never adjusted: a baud rate that
/// can not be reached shows up as a large [`BaudRateSolution::error`].
///
/// Range checks of the inputs are left to the caller.
#[must_use]
pub fn calc_baud_rate_solution(frequency: u32, baud_rate: u32) -> BaudRateSolution {
    let solve = |prescaler: Prescaler| {
        let divisor = calc_divisor(frequency, baud_rate, prescaler);
        BaudRateSolution {
            prescaler,
            divisor,
            actual_baud_rate: calc_baud_rate(frequency, divisor, prescaler),
            error: calc_error(frequency, baud_rate, divisor, prescaler),
        }
    };

    let by1 = solve(Prescaler::DivideBy1);
    let by4 = solve(Prescaler::DivideBy4);
    if by4.error.unsigned_abs() < by1.error.unsigned_abs() {
        by4
    } else {
        by1
    }
}

/// Exposes low-level information about the on-chip register layout and provides
/// types that model individual registers.
///
/// The getters and setters in this module operate exclusively on raw bit
/// representations within the local computing context. They are limited to
/// extracting or updating the corresponding fields and do not perform direct
/// hardware access.
pub mod registers {
    use bitflags::bitflags;

    /// Provides the register addresses (sub-addresses) of one channel.
    ///
    /// Which register is selected at a given address depends on the bank
    /// currently selected through the [`LCR`] (see [`RegisterBank`]).
    pub mod offsets {
        /* General bank: LCR[7] = 0 */

        /// Receive Holding Register (RHR) on reads, Transmit Holding
        /// Register (THR) on writes.
        pub const DATA: u8 = 0x00;
        /// Interrupt Enable Register (IER).
        pub const IER: u8 = 0x01;
        /// Interrupt Identification Register (IIR), read-only.
        pub const IIR: u8 = 0x02;
        /// FIFO Control Register (FCR), write-only.
        pub const FCR: u8 = 0x02;
        /// Line Control Register (LCR).
        pub const LCR: u8 = 0x03;
        /// Modem Control Register (MCR).
        pub const MCR: u8 = 0x04;
        /// Line Status Register (LSR), read-only.
        pub const LSR: u8 = 0x05;
        /// Modem Status Register (MSR), read-only.
        pub const MSR: u8 = 0x06;
        /// Transmission Control Register (TCR).
        ///
        /// Shares the address of [`MSR`]. Accessible only while
        /// `EFR[4] = 1` and `MCR[2] = 1`.
        pub const TCR: u8 = 0x06;
        /// Scratch Pad Register (SPR).
        pub const SPR: u8 = 0x07;
        /// Trigger Level Register (TLR).
        ///
        /// Shares the address of [`SPR`]. Accessible only while
        /// `EFR[4] = 1` and `MCR[2] = 1`.
        pub const TLR: u8 = 0x07;
        /// Transmit FIFO free space, read-only.
        pub const TXLVL: u8 = 0x08;
        /// Receive FIFO fill level, read-only.
        pub const RXLVL: u8 = 0x09;
        /// GPIO direction (1 = output). GPIO-capable parts only.
        pub const IODIR: u8 = 0x0A;
        /// GPIO pin levels. GPIO-capable parts only.
        pub const IOSTATE: u8 = 0x0B;
        /// GPIO interrupt enable. GPIO-capable parts only.
        pub const IOINTENA: u8 = 0x0C;
        /// I/O pins control.
        pub const IOCONTROL: u8 = 0x0E;
        /// Extra Features Control Register (EFCR).
        pub const EFCR: u8 = 0x0F;

        /* Special bank: LCR = 0x80 */

        /// Divisor Latch, low byte.
        pub const DLL: u8 = 0x00;
        /// Divisor Latch, high byte.
        pub const DLH: u8 = 0x01;

        /* Enhanced bank: LCR = 0xBF */

        /// Enhanced Feature Register (EFR).
        pub const EFR: u8 = 0x02;
        /// Xon1 character.
        pub const XON1: u8 = 0x04;
        /// Xon2 character.
        pub const XON2: u8 = 0x05;
        /// Xoff1 character.
        pub const XOFF1: u8 = 0x06;
        /// Xoff2 character, special character or RS-485 address.
        pub const XOFF2: u8 = 0x07;

        /// The highest register address, i.e., the amount of addresses
        /// decremented by one.
        pub const MAX: u8 = 0x0F;
    }

    /// The register banks selected through the [`LCR`].
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum RegisterBank {
        /// The regular register file (`LCR[7] = 0`).
        General,
        /// Divisor latches (`LCR = 0x80`).
        Special,
        /// EFR and the Xon/Xoff characters (`LCR = 0xBF`).
        Enhanced,
    }

    impl RegisterBank {
        /// [`LCR`] value that selects the special bank.
        pub const SPECIAL_LCR: u8 = 0x80;
        /// [`LCR`] value that selects the enhanced bank.
        pub const ENHANCED_LCR: u8 = 0xBF;

        /// Returns the [`LCR`] value selecting this bank, given the current
        /// [`LCR`] value.
        ///
        /// The general bank keeps the line format and only clears
        /// [`LCR::DIVISOR_LATCH_ENABLE`].
        #[must_use]
        pub const fn lcr_value(self, current: u8) -> u8 {
            match self {
                Self::General => current & !LCR::DIVISOR_LATCH_ENABLE.bits(),
                Self::Special => Self::SPECIAL_LCR,
                Self::Enhanced => Self::ENHANCED_LCR,
            }
        }
    }

    /// Implements [`defmt::Format`] for bitflags registers by printing the raw
    /// value.
    macro_rules! impl_format_bits {
        ($($name:ident),* $(,)?) => {
            $(
                #[cfg(feature = "defmt")]
                impl defmt::Format for $name {
                    fn format(&self, f: defmt::Formatter<'_>) {
                        defmt::write!(f, "{=str}({=u8:#x})", stringify!($name), self.bits());
                    }
                }
            )*
        };
    }

    impl_format_bits!(IER, IIR, FCR, LCR, MCR, LSR, MSR, TCR, TLR, IOCONTROL, EFCR, EFR);

    bitflags! {
        /// Typing of the Interrupt Enable Register (IER).
        ///
        /// Bits 4 to 7 are enhanced bits and only writable while
        /// [`EFR::ENHANCED_FUNCTIONS`] is set.
        ///
        /// This is a **read/write** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct IER: u8 {
            /// Receive Holding Register interrupt (data ready / Rx timeout).
            const RHR = 1 << 0;
            /// Transmit Holding Register empty interrupt.
            const THR = 1 << 1;
            /// Receive Line Status interrupt.
            const RECEIVE_LINE_STATUS = 1 << 2;
            /// Modem Status interrupt.
            const MODEM_STATUS = 1 << 3;
            /// Sleep mode enable. Not an interrupt.
            const SLEEP_MODE = 1 << 4;
            /// Xoff interrupt.
            const XOFF = 1 << 5;
            /// nRTS interrupt.
            const RTS = 1 << 6;
            /// nCTS interrupt.
            const CTS = 1 << 7;
        }
    }

    impl IER {
        /// Returns only the interrupt sources, i.e., without
        /// [`Self::SLEEP_MODE`].
        #[must_use]
        pub const fn interrupts(self) -> Self {
            self.difference(Self::SLEEP_MODE)
        }
    }

    bitflags! {
        /// Typing of the Interrupt Identification Register (IIR).
        ///
        /// This is a **read-only** register at offset [`offsets::IIR`].
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct IIR: u8 {
            /// Set when **no** interrupt is pending.
            const NO_INTERRUPT_PENDING = 1 << 0;
            /// Interrupt source code, bit 0.
            const SOURCE0 = 1 << 1;
            /// Interrupt source code, bit 1.
            const SOURCE1 = 1 << 2;
            /// Interrupt source code, bit 2.
            const SOURCE2 = 1 << 3;
            /// Interrupt source code, bit 3.
            const SOURCE3 = 1 << 4;
            /// Interrupt source code, bit 4.
            const SOURCE4 = 1 << 5;
            /// Mirror of [`FCR::FIFO_ENABLE`].
            const FIFOS_ENABLED0 = 1 << 6;
            /// Mirror of [`FCR::FIFO_ENABLE`].
            const FIFOS_ENABLED1 = 1 << 7;
        }
    }

    impl IIR {
        /// Returns whether the FIFOs are enabled.
        #[must_use]
        pub const fn fifos_enabled(self) -> bool {
            self.intersects(Self::FIFOS_ENABLED0.union(Self::FIFOS_ENABLED1))
        }

        /// Returns the pending [`InterruptSource`], if any.
        #[must_use]
        pub const fn interrupt_source(self) -> Option<InterruptSource> {
            if self.contains(Self::NO_INTERRUPT_PENDING) {
                return None;
            }
            InterruptSource::from_raw_bits((self.bits() >> 1) & 0x1F)
        }
    }

    /// The interrupt sources reported by the [`IIR`], in priority order.
    ///
    /// This type is a convenient and non-ABI compatible abstraction. ABI
    /// compatibility is given via [`InterruptSource::from_raw_bits`] and
    /// [`InterruptSource::to_raw_bits`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum InterruptSource {
        /// Receiver line status error (priority 1).
        ReceiveLineStatus,
        /// Receiver timeout (priority 2).
        ReceiveTimeout,
        /// RHR interrupt (priority 2).
        ReceiveHoldingRegister,
        /// THR interrupt (priority 3).
        TransmitHoldingRegister,
        /// Modem interrupt (priority 4).
        ModemStatus,
        /// Input pin change of state (priority 5).
        InputPinChange,
        /// Received Xoff signal or special character (priority 6).
        Xoff,
        /// CTS or RTS changed from active to inactive (priority 7).
        CtsRtsChange,
    }

    impl InterruptSource {
        /// Returns the priority level, 1 is highest.
        #[must_use]
        pub const fn priority(self) -> u8 {
            match self {
                Self::ReceiveLineStatus => 1,
                Self::ReceiveTimeout | Self::ReceiveHoldingRegister => 2,
                Self::TransmitHoldingRegister => 3,
                Self::ModemStatus => 4,
                Self::InputPinChange => 5,
                Self::Xoff => 6,
                Self::CtsRtsChange => 7,
            }
        }

        /// Translates the 5 bit source code (`IIR[5:1]`, already shifted)
        /// into the corresponding value. Unknown codes yield `None`.
        #[must_use]
        pub const fn from_raw_bits(bits: u8) -> Option<Self> {
            let source = match bits & 0x1F {
                0b00011 => Self::ReceiveLineStatus,
                0b00110 => Self::ReceiveTimeout,
                0b00010 => Self::ReceiveHoldingRegister,
                0b00001 => Self::TransmitHoldingRegister,
                0b00000 => Self::ModemStatus,
                0b11000 => Self::InputPinChange,
                0b01000 => Self::Xoff,
                0b10000 => Self::CtsRtsChange,
                _ => return None,
            };
            Some(source)
        }

        /// Translates the value into the 5 bit source code (not shifted).
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            match self {
                Self::ReceiveLineStatus => 0b00011,
                Self::ReceiveTimeout => 0b00110,
                Self::ReceiveHoldingRegister => 0b00010,
                Self::TransmitHoldingRegister => 0b00001,
                Self::ModemStatus => 0b00000,
                Self::InputPinChange => 0b11000,
                Self::Xoff => 0b01000,
                Self::CtsRtsChange => 0b10000,
            }
        }
    }

    bitflags! {
        /// Typing of the FIFO Control Register (FCR).
        ///
        /// **Write-only** register at offset [`offsets::FCR`]. The trigger
        /// level bits are left at zero, trigger levels are programmed through
        /// the [`TLR`] instead.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct FCR: u8 {
            /// Enables both FIFOs.
            const FIFO_ENABLE = 1 << 0;
            /// Clears the receive FIFO. Self-clearing.
            const RX_FIFO_RESET = 1 << 1;
            /// Clears the transmit FIFO. Self-clearing.
            const TX_FIFO_RESET = 1 << 2;
            /// Reserved.
            const _RESERVED0 = 1 << 3;
            /// Tx trigger level, bit 0.
            const TX_TRIGGER0 = 1 << 4;
            /// Tx trigger level, bit 1.
            const TX_TRIGGER1 = 1 << 5;
            /// Rx trigger level, bit 0.
            const RX_TRIGGER0 = 1 << 6;
            /// Rx trigger level, bit 1.
            const RX_TRIGGER1 = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the Line Control Register (LCR).
        ///
        /// Configures the serial frame format. The top bit additionally
        /// selects the register bank, see [`RegisterBank`].
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct LCR: u8 {
            /// First bit of [`WordLength`].
            const WORD_LENGTH0 = 1 << 0;
            /// Second bit of [`WordLength`].
            const WORD_LENGTH1 = 1 << 1;
            /// If cleared, one stop bit is used. If set, 1.5 stop bits with
            /// 5 bit words, otherwise 2 stop bits.
            const EXTENDED_STOP_BITS = 1 << 2;
            /// First bit of [`Parity`].
            const PARITY0 = 1 << 3;
            /// Second bit of [`Parity`].
            const PARITY1 = 1 << 4;
            /// Third bit of [`Parity`].
            const PARITY2 = 1 << 5;
            /// Forces a break condition on TX.
            const SET_BREAK = 1 << 6;
            /// Divisor latch enable. Selects the special bank.
            const DIVISOR_LATCH_ENABLE = 1 << 7;
        }
    }

    impl LCR {
        /// Returns the [`WordLength`].
        #[must_use]
        pub const fn word_length(self) -> WordLength {
            WordLength::from_raw_bits(self.bits() & 0b11)
        }

        /// Sets the [`WordLength`].
        #[must_use]
        pub const fn set_word_length(self, value: WordLength) -> Self {
            Self::from_bits_retain((self.bits() & !0b11) | value.to_raw_bits())
        }

        /// Returns the [`Parity`].
        #[must_use]
        pub const fn parity(self) -> Parity {
            Parity::from_raw_bits((self.bits() >> 3) & 0b111)
        }

        /// Sets the [`Parity`].
        #[must_use]
        pub const fn set_parity(self, value: Parity) -> Self {
            Self::from_bits_retain((self.bits() & !(0b111 << 3)) | (value.to_raw_bits() << 3))
        }

        /// Sets the [`StopBits`].
        #[must_use]
        pub const fn set_stop_bits(self, value: StopBits) -> Self {
            match value {
                StopBits::One => self.difference(Self::EXTENDED_STOP_BITS),
                StopBits::OneAndHalf | StopBits::Two => self.union(Self::EXTENDED_STOP_BITS),
            }
        }
    }

    /// The length of words for the transmission and reception in [`LCR`].
    ///
    /// This type is a convenient and non-ABI compatible abstraction. ABI
    /// compatibility is given via [`WordLength::from_raw_bits`] and
    /// [`WordLength::to_raw_bits`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum WordLength {
        /// 5 data bits.
        FiveBits,
        /// 6 data bits.
        SixBits,
        /// 7 data bits.
        SevenBits,
        /// 8 data bits.
        #[default]
        EightBits,
    }

    impl WordLength {
        /// Translates the raw encoding into the corresponding value.
        #[must_use]
        pub const fn from_raw_bits(bits: u8) -> Self {
            match bits & 0b11 {
                0b00 => Self::FiveBits,
                0b01 => Self::SixBits,
                0b10 => Self::SevenBits,
                _ => Self::EightBits,
            }
        }

        /// Translates the value into the corresponding raw encoding.
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            match self {
                Self::FiveBits => 0b00,
                Self::SixBits => 0b01,
                Self::SevenBits => 0b10,
                Self::EightBits => 0b11,
            }
        }
    }

    /// The amount of stop bits in [`LCR`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum StopBits {
        /// One stop bit.
        #[default]
        One,
        /// 1.5 stop bits. Only meaningful with [`WordLength::FiveBits`].
        OneAndHalf,
        /// 2 stop bits.
        Two,
    }

    /// Parity of the frame in [`LCR`].
    ///
    /// This type is a convenient and non-ABI compatible abstraction. ABI
    /// compatibility is given via [`Parity::from_raw_bits`] and
    /// [`Parity::to_raw_bits`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum Parity {
        /// No parity bit is transmitted nor expected.
        #[default]
        Disabled,
        /// The number of bits including the parity bit must be odd.
        Odd,
        /// The number of bits including the parity bit must be even.
        Even,
        /// The parity bit is sent as/checked to be `1`.
        Forced1,
        /// The parity bit is sent as/checked to be `0`.
        Forced0,
    }

    impl Parity {
        /// Translates the raw encoding into the corresponding value.
        ///
        /// This function operates on the value as-is and does not perform any
        /// shifting bits.
        #[must_use]
        pub const fn from_raw_bits(bits: u8) -> Self {
            let bits = bits & 0b111;
            if (bits & 1) == 0 {
                return Self::Disabled;
            }
            match bits >> 1 {
                0b00 => Self::Odd,
                0b01 => Self::Even,
                0b10 => Self::Forced1,
                _ => Self::Forced0,
            }
        }

        /// Translates the value into the corresponding raw encoding.
        ///
        /// This function operates on the value as-is and does not perform any
        /// shifting bits.
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            match self {
                Self::Disabled => 0b000,
                Self::Odd => 0b001,
                Self::Even => 0b011,
                Self::Forced1 => 0b101,
                Self::Forced0 => 0b111,
            }
        }
    }

    bitflags! {
        /// Typing of the Modem Control Register (MCR).
        ///
        /// Bits 2, 5, 6 and 7 are enhanced bits and only writable while
        /// [`EFR::ENHANCED_FUNCTIONS`] is set.
        ///
        /// This is a **read/write** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct MCR: u8 {
            /// Forces nDTR active (low). Channel A on GPIO5, channel B on
            /// GPIO1, when in modem mode.
            const DTR = 1 << 0;
            /// Forces nRTS active (low).
            const RTS = 1 << 1;
            /// Enables access to [`TCR`] and [`TLR`].
            const TCR_TLR_ENABLE = 1 << 2;
            /// Reserved.
            const _RESERVED0 = 1 << 3;
            /// Internal loopback mode.
            const LOOPBACK = 1 << 4;
            /// Any received character acts as Xon.
            const XON_ANY = 1 << 5;
            /// IrDA mode instead of normal UART mode.
            const IRDA_MODE = 1 << 6;
            /// Divides the reference clock by 4, see [`super::Prescaler`].
            const CLOCK_DIVIDE_BY_4 = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the Line Status Register (LSR).
        ///
        /// Error bits 1 to 4 relate to the character on top of the Rx FIFO.
        ///
        /// This is a **read-only** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct LSR: u8 {
            /// At least one character is in the Rx FIFO.
            const DATA_READY = 1 << 0;
            /// Overrun error.
            const OVERRUN_ERROR = 1 << 1;
            /// Parity error of the top character.
            const PARITY_ERROR = 1 << 2;
            /// Framing error of the top character.
            const FRAMING_ERROR = 1 << 3;
            /// Break condition on the top character.
            const BREAK_INTERRUPT = 1 << 4;
            /// THR (Tx FIFO) is empty.
            const THR_EMPTY = 1 << 5;
            /// THR and TSR are both empty, the line is idle.
            const TRANSMITTER_EMPTY = 1 << 6;
            /// At least one character in the Rx FIFO has an error.
            const FIFO_DATA_ERROR = 1 << 7;
        }
    }

    impl LSR {
        /// Receive error bits of the character on top of the Rx FIFO.
        pub const RECEIVE_ERRORS: Self = Self::OVERRUN_ERROR
            .union(Self::PARITY_ERROR)
            .union(Self::FRAMING_ERROR)
            .union(Self::BREAK_INTERRUPT);

        /// Returns only the receive error bits.
        #[must_use]
        pub const fn receive_errors(self) -> Self {
            self.intersection(Self::RECEIVE_ERRORS)
        }
    }

    bitflags! {
        /// Typing of the Modem Status Register (MSR).
        ///
        /// Reflects the current state and change status of modem inputs.
        ///
        /// This is a **read-only** register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct MSR: u8 {
            /// nCTS changed since the last read.
            const DELTA_CTS = 1 << 0;
            /// nDSR changed since the last read.
            const DELTA_DSR = 1 << 1;
            /// nRI changed from low to high since the last read.
            const DELTA_RI = 1 << 2;
            /// nCD changed since the last read.
            const DELTA_CD = 1 << 3;
            /// Complement of the nCTS input.
            const CTS = 1 << 4;
            /// Complement of the nDSR input.
            const DSR = 1 << 5;
            /// Complement of the nRI input.
            const RI = 1 << 6;
            /// Complement of the nCD input.
            const CD = 1 << 7;
        }
    }

    bitflags! {
        /// Typing of the Transmission Control Register (TCR).
        ///
        /// Holds the Rx FIFO levels at which the peer is told to halt and to
        /// resume. The halt level must be above the resume level; there is no
        /// hardware check for this.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct TCR: u8 {
            /// Halt level, bit 0.
            const HALT0 = 1 << 0;
            /// Halt level, bit 1.
            const HALT1 = 1 << 1;
            /// Halt level, bit 2.
            const HALT2 = 1 << 2;
            /// Halt level, bit 3.
            const HALT3 = 1 << 3;
            /// Resume level, bit 0.
            const RESUME0 = 1 << 4;
            /// Resume level, bit 1.
            const RESUME1 = 1 << 5;
            /// Resume level, bit 2.
            const RESUME2 = 1 << 6;
            /// Resume level, bit 3.
            const RESUME3 = 1 << 7;
        }
    }

    impl TCR {
        /// Builds the register from both levels.
        #[must_use]
        pub const fn new(halt: TriggerCtrlLevel, resume: TriggerCtrlLevel) -> Self {
            Self::from_bits_retain(halt.to_raw_bits() | (resume.to_raw_bits() << 4))
        }

        /// Returns the halt level.
        #[must_use]
        pub const fn halt(self) -> TriggerCtrlLevel {
            TriggerCtrlLevel::from_raw_bits(self.bits())
        }

        /// Returns the resume level.
        #[must_use]
        pub const fn resume(self) -> TriggerCtrlLevel {
            TriggerCtrlLevel::from_raw_bits(self.bits() >> 4)
        }
    }

    /// Rx FIFO level in the [`TCR`], from 0 to 60 characters with a
    /// granularity of four.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[allow(missing_docs)]
    pub enum TriggerCtrlLevel {
        #[default]
        Chars0,
        Chars4,
        Chars8,
        Chars12,
        Chars16,
        Chars20,
        Chars24,
        Chars28,
        Chars32,
        Chars36,
        Chars40,
        Chars44,
        Chars48,
        Chars52,
        Chars56,
        Chars60,
    }

    impl TriggerCtrlLevel {
        /// Returns the level in characters.
        #[must_use]
        pub const fn chars(self) -> u8 {
            self.to_raw_bits() * 4
        }

        /// Translates the 4 bit encoding into the corresponding value.
        #[must_use]
        pub const fn from_raw_bits(bits: u8) -> Self {
            match bits & 0xF {
                0 => Self::Chars0,
                1 => Self::Chars4,
                2 => Self::Chars8,
                3 => Self::Chars12,
                4 => Self::Chars16,
                5 => Self::Chars20,
                6 => Self::Chars24,
                7 => Self::Chars28,
                8 => Self::Chars32,
                9 => Self::Chars36,
                10 => Self::Chars40,
                11 => Self::Chars44,
                12 => Self::Chars48,
                13 => Self::Chars52,
                14 => Self::Chars56,
                _ => Self::Chars60,
            }
        }

        /// Translates the value into the 4 bit encoding.
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            self as u8
        }
    }

    bitflags! {
        /// Typing of the Trigger Level Register (TLR).
        ///
        /// Overrides the FCR trigger levels when nonzero.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct TLR: u8 {
            /// Tx level, bit 0.
            const TX0 = 1 << 0;
            /// Tx level, bit 1.
            const TX1 = 1 << 1;
            /// Tx level, bit 2.
            const TX2 = 1 << 2;
            /// Tx level, bit 3.
            const TX3 = 1 << 3;
            /// Rx level, bit 0.
            const RX0 = 1 << 4;
            /// Rx level, bit 1.
            const RX1 = 1 << 5;
            /// Rx level, bit 2.
            const RX2 = 1 << 6;
            /// Rx level, bit 3.
            const RX3 = 1 << 7;
        }
    }

    impl TLR {
        /// Builds the register from both levels.
        #[must_use]
        pub const fn new(tx: FifoTriggerLevel, rx: FifoTriggerLevel) -> Self {
            Self::from_bits_retain(tx.to_raw_bits() | (rx.to_raw_bits() << 4))
        }
    }

    /// Interrupt trigger level of a FIFO in the [`TLR`], from 4 to 60
    /// characters with a granularity of four.
    ///
    /// For Tx it counts free spaces, for Rx available characters.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    #[allow(missing_docs)]
    pub enum FifoTriggerLevel {
        Chars4 = 1,
        Chars8,
        Chars12,
        Chars16,
        Chars20,
        Chars24,
        Chars28,
        #[default]
        Chars32,
        Chars36,
        Chars40,
        Chars44,
        Chars48,
        Chars52,
        Chars56,
        Chars60,
    }

    impl FifoTriggerLevel {
        /// Returns the level in characters.
        #[must_use]
        pub const fn chars(self) -> u8 {
            self.to_raw_bits() * 4
        }

        /// Translates the value into the 4 bit encoding.
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            self as u8
        }
    }

    bitflags! {
        /// Typing of the I/O Control register.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct IOCONTROL: u8 {
            /// Latches the IOState inputs while interrupts are pending.
            const IO_LATCH = 1 << 0;
            /// GPIO[7:4] act as modem pins of channel A.
            const GPIO7_4_AS_MODEM = 1 << 1;
            /// GPIO[3:0] act as modem pins of channel B.
            const GPIO3_0_AS_MODEM = 1 << 2;
            /// Software reset. Self-clearing.
            const SOFT_RESET = 1 << 3;
        }
    }

    bitflags! {
        /// Typing of the Extra Features Control Register (EFCR).
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct EFCR: u8 {
            /// 9-bit (multidrop) mode for RS-485.
            const NINE_BIT_MODE = 1 << 0;
            /// Disables the receiver.
            const RX_DISABLE = 1 << 1;
            /// Disables the transmitter.
            const TX_DISABLE = 1 << 2;
            /// Reserved.
            const _RESERVED0 = 1 << 3;
            /// The transmitter drives RTS (auto RS-485 direction control).
            const TX_CONTROLS_RTS = 1 << 4;
            /// Inverts RTS in auto RS-485 mode.
            const INVERT_RTS = 1 << 5;
            /// Reserved.
            const _RESERVED1 = 1 << 6;
            /// IrDA SIR 1/4 pulse ratio instead of 3/16 (SC16IS76x only).
            const IRDA_QUARTER_RATIO = 1 << 7;
        }
    }

    impl EFCR {
        /// The bits describing the line mode.
        pub const LINE_MODE: Self = Self::NINE_BIT_MODE
            .union(Self::TX_CONTROLS_RTS)
            .union(Self::INVERT_RTS)
            .union(Self::IRDA_QUARTER_RATIO);

        /// The transmitter/receiver disable bits.
        pub const TX_RX_DISABLE: Self = Self::TX_DISABLE.union(Self::RX_DISABLE);
    }

    bitflags! {
        /// Typing of the Enhanced Feature Register (EFR).
        ///
        /// Only accessible in the enhanced bank.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct EFR: u8 {
            /// Software flow control, bit 0.
            const SOFT_FLOW0 = 1 << 0;
            /// Software flow control, bit 1.
            const SOFT_FLOW1 = 1 << 1;
            /// Software flow control, bit 2.
            const SOFT_FLOW2 = 1 << 2;
            /// Software flow control, bit 3.
            const SOFT_FLOW3 = 1 << 3;
            /// Unlocks the enhanced bits of IER, FCR, ISR and MCR.
            const ENHANCED_FUNCTIONS = 1 << 4;
            /// Compares received characters with Xoff2.
            const SPECIAL_CHAR_DETECT = 1 << 5;
            /// Automatic RTS flow control.
            const AUTO_RTS = 1 << 6;
            /// Automatic CTS flow control.
            const AUTO_CTS = 1 << 7;
        }
    }

    impl EFR {
        /// Sets the [`SoftwareFlowMode`].
        #[must_use]
        pub const fn set_software_flow(self, mode: SoftwareFlowMode) -> Self {
            Self::from_bits_retain((self.bits() & !0x0F) | mode.to_raw_bits())
        }
    }

    /// Characters the transmitter sends for software flow control.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum SoftwareFlowTx {
        /// No transmit flow control.
        #[default]
        Disabled,
        /// Transmit Xon1/Xoff1.
        Xon1Xoff1,
        /// Transmit Xon2/Xoff2.
        Xon2Xoff2,
        /// Transmit Xon1 and Xon2 / Xoff1 and Xoff2.
        Both,
    }

    /// Characters the receiver compares against for software flow control.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum SoftwareFlowRx {
        /// No receive flow control.
        #[default]
        Disabled,
        /// Compare Xon1/Xoff1.
        Xon1Xoff1,
        /// Compare Xon2/Xoff2.
        Xon2Xoff2,
        /// Compare Xon1 and Xon2 / Xoff1 and Xoff2 when transmit flow
        /// control is disabled, otherwise Xon1 or Xon2 / Xoff1 or Xoff2.
        Both,
    }

    /// The software flow control nibble of the [`EFR`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct SoftwareFlowMode {
        /// What the transmitter sends.
        pub tx: SoftwareFlowTx,
        /// What the receiver compares against.
        pub rx: SoftwareFlowRx,
    }

    impl SoftwareFlowMode {
        /// Returns whether the mode involves Xoff2, which then can not hold a
        /// special character.
        #[must_use]
        pub const fn uses_xoff2(self) -> bool {
            (self.to_raw_bits() & 0b1010) != 0
        }

        /// Translates the value into the 4 bit EFR encoding.
        #[must_use]
        pub const fn to_raw_bits(self) -> u8 {
            let tx = match self.tx {
                SoftwareFlowTx::Disabled => 0b00,
                SoftwareFlowTx::Xon1Xoff1 => 0b01,
                SoftwareFlowTx::Xon2Xoff2 => 0b10,
                SoftwareFlowTx::Both => 0b11,
            };
            let rx = match self.rx {
                SoftwareFlowRx::Disabled => 0b00,
                SoftwareFlowRx::Xon1Xoff1 => 0b01,
                SoftwareFlowRx::Xon2Xoff2 => 0b10,
                SoftwareFlowRx::Both => 0b11,
            };
            (tx << 2) | rx
        }
    }
}
