// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for [`Sc16is7xx`] and [`Uart`].
//!
//! [`Sc16is7xx`]: crate::Sc16is7xx
//! [`Uart`]: crate::Uart

use crate::spec::registers::{
    FifoTriggerLevel, IER, Parity, SoftwareFlowMode, StopBits, TriggerCtrlLevel, WordLength,
};
use crate::spec::{CRYSTAL_FREQUENCY_MAX_HZ, OSCILLATOR_FREQUENCY_MAX_HZ, PartNumber};
use bitflags::bitflags;
use core::cmp::Ordering;

/// The reference clock of the device. Exactly one source drives the part.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// A crystal between XTAL1 and XTAL2, frequency in Hz.
    Crystal(u32),
    /// An external oscillator on XTAL1, frequency in Hz.
    Oscillator(u32),
}

impl ClockSource {
    /// Returns the frequency in Hz.
    #[must_use]
    pub const fn frequency(self) -> u32 {
        match self {
            Self::Crystal(hz) | Self::Oscillator(hz) => hz,
        }
    }

    /// Returns the highest frequency this kind of source supports.
    #[must_use]
    pub const fn max_frequency(self) -> u32 {
        match self {
            Self::Crystal(_) => CRYSTAL_FREQUENCY_MAX_HZ,
            Self::Oscillator(_) => OSCILLATOR_FREQUENCY_MAX_HZ,
        }
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self::Crystal(14_745_600)
    }
}

/// Initial state of the GPIO block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioConfig {
    /// Pins to configure as inputs (bit set = input).
    pub inputs: u8,
    /// Initial output levels of the output pins.
    pub output_levels: u8,
    /// Pins raising an interrupt on change.
    pub interrupt_enable: u8,
}

impl Default for GpioConfig {
    fn default() -> Self {
        // Reset state of the part: every pin is an input.
        Self {
            inputs: 0xFF,
            output_levels: 0,
            interrupt_enable: 0,
        }
    }
}

/// Configuration for [`Sc16is7xx`].
///
/// [`Sc16is7xx`]: crate::Sc16is7xx
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// The exact part, selects the [`PartLimits`].
    ///
    /// [`PartLimits`]: crate::spec::PartLimits
    pub part: PartNumber,
    /// The reference clock.
    pub clock: ClockSource,
    /// The clock of the bus as configured in the HAL, in Hz. Checked against
    /// the part limits during init.
    pub bus_clock_hz: u32,
    /// GPIO bring-up during init. Ignored on parts without GPIOs.
    pub gpio: Option<GpioConfig>,
}

bitflags! {
    /// Per-channel transfer disciplines.
    ///
    /// The empty set selects burst transfers in both directions and no
    /// self-test.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
    pub struct DriverConfig: u8 {
        /// Transmit byte by byte, bypassing the Tx ring buffer.
        const SAFE_TX = 1 << 0;
        /// Receive byte by byte with a line status check per byte, bypassing
        /// the Rx ring buffer.
        const SAFE_RX = 1 << 1;
        /// Run the loopback communication test during init.
        const TEST_LOOPBACK_AT_INIT = 1 << 2;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DriverConfig {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "DriverConfig({=u8:#x})", self.bits());
    }
}

/// The speed of data transmission, measured in symbols per second (or bits, in
/// the case of simple UARTs).
///
/// This type is a convenient and non-ABI compatible abstraction. Use
/// [`calc_baud_rate_solution`] to get the divisor for [`DLL`] and [`DLH`].
///
/// [`calc_baud_rate_solution`]: crate::spec::calc_baud_rate_solution
/// [`DLL`]: crate::spec::registers::offsets::DLL
/// [`DLH`]: crate::spec::registers::offsets::DLH
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    // List of typical baud rates.
    Baud921600,
    Baud460800,
    Baud230400,
    #[default]
    Baud115200,
    Baud57600,
    Baud38400,
    Baud19200,
    Baud9600,
    Baud4800,
    Baud2400,
    Baud1200,
    Custom(u32),
}

impl BaudRate {
    /// Returns the value as corresponding integer.
    #[must_use]
    pub const fn to_integer(self) -> u32 {
        match self {
            Self::Baud921600 => 921_600,
            Self::Baud460800 => 460_800,
            Self::Baud230400 => 230_400,
            Self::Baud115200 => 115_200,
            Self::Baud57600 => 57600,
            Self::Baud38400 => 38400,
            Self::Baud19200 => 19200,
            Self::Baud9600 => 9600,
            Self::Baud4800 => 4800,
            Self::Baud2400 => 2400,
            Self::Baud1200 => 1200,
            Self::Custom(val) => val,
        }
    }

    /// Creates the type from an integer representation of the baud rate.
    #[must_use]
    pub const fn from_integer(value: u32) -> Self {
        match value {
            921_600 => Self::Baud921600,
            460_800 => Self::Baud460800,
            230_400 => Self::Baud230400,
            115_200 => Self::Baud115200,
            57600 => Self::Baud57600,
            38400 => Self::Baud38400,
            19200 => Self::Baud19200,
            9600 => Self::Baud9600,
            4800 => Self::Baud4800,
            2400 => Self::Baud2400,
            1200 => Self::Baud1200,
            baud_rate => Self::Custom(baud_rate),
        }
    }
}

impl PartialOrd for BaudRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaudRate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_integer().cmp(&other.to_integer())
    }
}

/// Hardware (RTS/CTS) flow control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareFlowControl {
    /// Rx FIFO level at which RTS is deasserted.
    pub halt: TriggerCtrlLevel,
    /// Rx FIFO level at which RTS is asserted again. Must be below
    /// [`Self::halt`].
    pub resume: TriggerCtrlLevel,
    /// The chip drives RTS itself.
    pub auto_rts: bool,
    /// The chip pauses transmission while CTS is inactive.
    pub auto_cts: bool,
}

/// Software (Xon/Xoff) flow control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SoftwareFlowControl {
    /// Which characters are sent and compared.
    pub mode: SoftwareFlowMode,
    /// Rx FIFO level at which Xoff is sent.
    pub halt: TriggerCtrlLevel,
    /// Rx FIFO level at which Xon is sent again. Must be below
    /// [`Self::halt`].
    pub resume: TriggerCtrlLevel,
    /// Xon1 character.
    pub xon1: u8,
    /// Xon2 character.
    pub xon2: u8,
    /// Xoff1 character.
    pub xoff1: u8,
    /// Xoff2 character.
    pub xoff2: u8,
    /// Any received character resumes transmission.
    pub xon_any: bool,
}

/// Flow control of an RS-232 line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    /// No flow control.
    #[default]
    None,
    /// RTS/CTS flow control.
    Hardware(HardwareFlowControl),
    /// Xon/Xoff flow control.
    Software(SoftwareFlowControl),
}

/// RS-232 line settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rs232Config {
    /// Flow control of the line.
    pub flow: FlowControl,
}

/// Who drives the RTS pin of an RS-485 line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rs485RtsControl {
    /// The transmitter switches the transceiver direction through RTS.
    /// Excludes hardware flow control.
    #[default]
    AutoRts,
    /// RTS is driven by hardware flow control, which is then required.
    HardwareFlow,
    /// The direction is controlled outside the chip. Excludes hardware flow
    /// control.
    ManualExternal,
}

/// RS-485 addressing mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rs485Mode {
    /// Plain half-duplex line.
    #[default]
    Normal,
    /// 9-bit multidrop, the host filters addresses.
    Multidrop,
    /// 9-bit multidrop, the chip only receives after `address` matched.
    AutoAddressDetect {
        /// The own address, stored in Xoff2.
        address: u8,
    },
}

/// RS-485 line settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rs485Config {
    /// RTS control.
    pub rts: Rs485RtsControl,
    /// Inverts the RTS polarity in [`Rs485RtsControl::AutoRts`].
    pub invert_rts: bool,
    /// Addressing mode.
    pub mode: Rs485Mode,
    /// Hardware flow control, only with [`Rs485RtsControl::HardwareFlow`].
    pub hardware_flow: Option<HardwareFlowControl>,
}

/// IrDA SIR pulse width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrDaPulseRatio {
    /// 3/16 of a bit time, up to 115.2 kbit/s.
    #[default]
    ThreeSixteenths,
    /// 1/4 of a bit time, up to 1.152 Mbit/s. SC16IS76x only.
    Quarter,
}

/// IrDA line settings.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrDaConfig {
    /// Pulse width.
    pub pulse_ratio: IrDaPulseRatio,
    /// Optional Xon/Xoff flow control.
    pub software_flow: Option<SoftwareFlowControl>,
}

/// Modem line settings. Routes the GPIOs of the channel to DTR, DSR, CD and
/// RI.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig {
    /// Optional RTS/CTS flow control.
    pub hardware_flow: Option<HardwareFlowControl>,
}

/// The kind of line a channel drives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartType {
    /// RS-232.
    Rs232(Rs232Config),
    /// RS-485.
    Rs485(Rs485Config),
    /// IrDA SIR.
    IrDa(IrDaConfig),
    /// RS-232 with modem control lines.
    Modem(ModemConfig),
}

impl Default for UartType {
    fn default() -> Self {
        Self::Rs232(Rs232Config::default())
    }
}

/// FIFO settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoConfig {
    /// Enables both FIFOs.
    pub enabled: bool,
    /// Free space in the Tx FIFO that raises the THR interrupt.
    pub tx_trigger: FifoTriggerLevel,
    /// Characters in the Rx FIFO that raise the RHR interrupt.
    pub rx_trigger: FifoTriggerLevel,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tx_trigger: FifoTriggerLevel::default(),
            rx_trigger: FifoTriggerLevel::default(),
        }
    }
}

/// Flow control programmed by [`Uart::set_control_flow`].
///
/// The all-`None` default disables flow control.
///
/// [`Uart::set_control_flow`]: crate::Uart::set_control_flow
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlFlow {
    /// RTS/CTS flow control. Excludes [`Self::software`].
    pub hardware: Option<HardwareFlowControl>,
    /// Xon/Xoff flow control. Excludes [`Self::hardware`].
    pub software: Option<SoftwareFlowControl>,
    /// Special character detection through Xoff2.
    pub special_character: Option<u8>,
    /// Xoff2 holds the RS-485 address (auto address detection).
    pub use_address_character: bool,
}

impl ControlFlow {
    /// Returns whether anything is to be programmed at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.hardware.is_some()
            || self.software.is_some()
            || self.special_character.is_some()
            || self.use_address_character
    }
}

/// Configuration for [`Uart::init`].
///
/// Please note that sender and receiver **must agree** on the transmission
/// settings, otherwise you receive garbage.
///
/// [`Uart::init`]: crate::Uart::init
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    // Line
    /// Line type and its flow control.
    pub uart_type: UartType,
    /// The baud rate to use.
    pub baud_rate: BaudRate,
    /// The length of each transmitted word.
    pub word_length: WordLength,
    /// Whether parity bits should be used.
    pub parity: Parity,
    /// The amount of stop bits.
    pub stop_bits: StopBits,
    /// Special character detection. Excludes RS-485 auto address detection
    /// and software flow modes using Xoff2.
    pub special_character: Option<u8>,

    // Channel
    /// FIFO settings.
    pub fifo: FifoConfig,
    /// Which interrupts to enable. [`IER::SLEEP_MODE`] is ignored.
    pub interrupts: IER,
    /// Enables the transmitter.
    pub tx_enable: bool,
    /// Enables the receiver.
    pub rx_enable: bool,
}

impl UartConfig {
    /// Returns whether the line is IrDA.
    #[must_use]
    pub const fn is_irda(&self) -> bool {
        matches!(self.uart_type, UartType::IrDa(_))
    }

    /// Returns the IrDA pulse ratio, if the line is IrDA.
    #[must_use]
    pub const fn irda_pulse_ratio(&self) -> Option<IrDaPulseRatio> {
        match self.uart_type {
            UartType::IrDa(irda) => Some(irda.pulse_ratio),
            _ => None,
        }
    }

    /// Returns the flow control matching the line type.
    #[must_use]
    pub const fn control_flow(&self) -> ControlFlow {
        let mut flow = ControlFlow {
            hardware: None,
            software: None,
            special_character: self.special_character,
            use_address_character: false,
        };
        match self.uart_type {
            UartType::Rs232(rs232) => match rs232.flow {
                FlowControl::None => {}
                FlowControl::Hardware(hw) => flow.hardware = Some(hw),
                FlowControl::Software(sw) => flow.software = Some(sw),
            },
            UartType::Rs485(rs485) => {
                flow.hardware = rs485.hardware_flow;
                flow.use_address_character =
                    matches!(rs485.mode, Rs485Mode::AutoAddressDetect { .. });
            }
            UartType::IrDa(irda) => flow.software = irda.software_flow,
            UartType::Modem(modem) => flow.hardware = modem.hardware_flow,
        }
        flow
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        // Default is 8-N-1 at 115200 baud on an RS-232 line.
        Self {
            uart_type: UartType::default(),
            baud_rate: BaudRate::Baud115200,
            word_length: WordLength::EightBits,
            parity: Parity::Disabled,
            stop_bits: StopBits::One,
            special_character: None,

            fifo: FifoConfig::default(),
            interrupts: IER::empty(),
            tx_enable: true,
            rx_enable: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::registers::{SoftwareFlowRx, SoftwareFlowTx};

    #[test]
    fn test_baud_rate_integer() {
        assert_eq!(BaudRate::from_integer(115_200), BaudRate::Baud115200);
        assert_eq!(BaudRate::from_integer(1_000_000), BaudRate::Custom(1_000_000));
        assert_eq!(BaudRate::Baud921600.to_integer(), 921_600);
        assert!(BaudRate::Baud9600 < BaudRate::Custom(10_000));
    }

    #[test]
    fn test_clock_source() {
        assert_eq!(ClockSource::Crystal(1_843_200).frequency(), 1_843_200);
        assert_eq!(ClockSource::Crystal(0).max_frequency(), 24_000_000);
        assert_eq!(ClockSource::Oscillator(0).max_frequency(), 80_000_000);
    }

    #[test]
    fn test_control_flow_per_type() {
        let config = UartConfig::default();
        assert!(!config.control_flow().is_active());

        let software = SoftwareFlowControl {
            mode: SoftwareFlowMode {
                tx: SoftwareFlowTx::Xon1Xoff1,
                rx: SoftwareFlowRx::Xon1Xoff1,
            },
            ..Default::default()
        };
        let config = UartConfig {
            uart_type: UartType::IrDa(IrDaConfig {
                software_flow: Some(software),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(config.control_flow().software, Some(software));
        assert!(config.is_irda());

        let config = UartConfig {
            uart_type: UartType::Rs485(Rs485Config {
                mode: Rs485Mode::AutoAddressDetect { address: 0x42 },
                ..Default::default()
            }),
            ..Default::default()
        };
        let flow = config.control_flow();
        assert!(flow.use_address_character);
        assert!(flow.hardware.is_none());
        assert!(flow.is_active());
    }
}
