// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulated SC16IS7xx for unit tests.
//!
//! Models the register banks selected through the LCR, the gating of the
//! enhanced bits and of TCR/TLR, both FIFOs with their level registers,
//! internal loopback, line status errors, soft reset and the GPIO block.
//! Every bus access is logged together with the bank it hit.

use crate::backend::{BusKind, Channel, Interface};
use crate::error::Error;
use crate::spec::FIFO_SIZE;
use crate::spec::registers::offsets;
use std::collections::VecDeque;
use std::vec::Vec;

/// Bank an access was made in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MockBank {
    General,
    Special,
    Enhanced,
}

/// One logged bus access. `write` is `None` for reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockAccess {
    pub channel: Channel,
    pub bank: MockBank,
    pub register: u8,
    pub write: Option<Vec<u8>>,
}

/// Injected bus failure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MockError;

#[derive(Clone, Debug, Default)]
pub struct MockChannel {
    pub lcr: u8,
    pub ier: u8,
    pub mcr: u8,
    pub spr: u8,
    pub efcr: u8,
    pub msr: u8,
    pub tcr: u8,
    pub tlr: u8,
    pub dll: u8,
    pub dlh: u8,
    pub efr: u8,
    pub xon1: u8,
    pub xon2: u8,
    pub xoff1: u8,
    pub xoff2: u8,
    pub fifo_enabled: bool,
    pub tx_fifo: VecDeque<u8>,
    /// Received characters with their LSR error bits.
    pub rx_fifo: VecDeque<(u8, u8)>,
    /// Characters that left the Tx FIFO.
    pub wire: Vec<u8>,
    /// Raw 5 bit interrupt source reported in the IIR.
    pub pending_interrupt: Option<u8>,
}

impl MockChannel {
    fn after_reset() -> Self {
        Self {
            lcr: 0x1D,
            ..Default::default()
        }
    }

    fn bank(&self) -> MockBank {
        if self.lcr == 0xBF {
            MockBank::Enhanced
        } else if self.lcr & 0x80 != 0 {
            MockBank::Special
        } else {
            MockBank::General
        }
    }

    const fn enhanced(&self) -> bool {
        self.efr & 0x10 != 0
    }

    const fn tcr_tlr_access(&self) -> bool {
        self.mcr & 0x04 != 0 && self.enhanced()
    }

    const fn loopback(&self) -> bool {
        self.mcr & 0x10 != 0
    }

    pub const fn divisor(&self) -> u16 {
        u16::from_le_bytes([self.dll, self.dlh])
    }
}

#[derive(Debug)]
pub struct MockChip {
    pub bus: BusKind,
    pub channels: [MockChannel; 2],
    pub iodir: u8,
    pub iostate: u8,
    pub iointena: u8,
    pub iocontrol: u8,
    /// Levels applied to the input pins from outside.
    pub gpio_inputs: u8,
    pub log: Vec<MockAccess>,
    pub resets: usize,
    /// Answer the soft reset with a data NACK, like a real part on I2C.
    pub nack_on_reset: bool,
    pub probe_fails: bool,
    /// The scratch pad reads back inverted.
    pub scratch_broken: bool,
    /// Loopback swallows characters.
    pub break_loopback: bool,
    pub fail_write: Option<(MockBank, u8)>,
    pub fail_read: Option<(MockBank, u8)>,
    /// Caps TXLVL below the real free space.
    pub tx_space_limit: Option<usize>,
}

impl MockChip {
    pub fn new(bus: BusKind) -> Self {
        Self {
            bus,
            channels: [MockChannel::after_reset(), MockChannel::after_reset()],
            iodir: 0,
            iostate: 0,
            iointena: 0,
            iocontrol: 0,
            gpio_inputs: 0,
            log: Vec::new(),
            resets: 0,
            nack_on_reset: false,
            probe_fails: false,
            scratch_broken: false,
            break_loopback: false,
            fail_write: None,
            fail_read: None,
            tx_space_limit: None,
        }
    }

    pub const fn channel(&self, channel: Channel) -> &MockChannel {
        &self.channels[channel.index()]
    }

    pub const fn channel_mut(&mut self, channel: Channel) -> &mut MockChannel {
        &mut self.channels[channel.index()]
    }

    /// Queues characters as if they arrived on the line.
    pub fn feed_rx(&mut self, channel: Channel, data: &[u8]) {
        let fifo = &mut self.channel_mut(channel).rx_fifo;
        fifo.extend(data.iter().map(|&byte| (byte, 0)));
    }

    /// Queues one character that arrived with line status errors.
    pub fn feed_rx_error(&mut self, channel: Channel, byte: u8, lsr_errors: u8) {
        self.channel_mut(channel).rx_fifo.push_back((byte, lsr_errors));
    }

    /// All bytes written to `register` in `bank`, in order.
    pub fn writes_to(&self, channel: Channel, bank: MockBank, register: u8) -> Vec<u8> {
        self.log
            .iter()
            .filter(|a| a.channel == channel && a.bank == bank && a.register == register)
            .filter_map(|a| a.write.clone())
            .flatten()
            .collect()
    }

    /// Number of write accesses so far.
    pub fn write_count(&self) -> usize {
        self.log.iter().filter(|a| a.write.is_some()).count()
    }

    fn soft_reset(&mut self) {
        self.channels = [MockChannel::after_reset(), MockChannel::after_reset()];
        self.iodir = 0;
        self.iostate = 0;
        self.iointena = 0;
        self.iocontrol = 0;
        self.resets += 1;
    }

    fn read_one(&mut self, channel: Channel, register: u8) -> u8 {
        let scratch_broken = self.scratch_broken;
        let tx_space_limit = self.tx_space_limit;
        let gpio = (self.iodir, self.iostate, self.gpio_inputs);
        let (iointena, iocontrol) = (self.iointena, self.iocontrol);
        let ch = self.channel_mut(channel);

        match (ch.bank(), register) {
            (MockBank::Special | MockBank::Enhanced, offsets::DLL) => return ch.dll,
            (MockBank::Special | MockBank::Enhanced, offsets::DLH) => return ch.dlh,
            (MockBank::Enhanced, offsets::EFR) => return ch.efr,
            (MockBank::Enhanced, offsets::XON1) => return ch.xon1,
            (MockBank::Enhanced, offsets::XON2) => return ch.xon2,
            (MockBank::Enhanced, offsets::XOFF1) => return ch.xoff1,
            (MockBank::Enhanced, offsets::XOFF2) => return ch.xoff2,
            _ => {}
        }

        match register {
            offsets::DATA => ch.rx_fifo.pop_front().map_or(0, |(byte, _)| byte),
            offsets::IER => ch.ier,
            offsets::IIR => {
                let fifos = if ch.fifo_enabled { 0xC0 } else { 0 };
                fifos | ch.pending_interrupt.map_or(0x01, |source| source << 1)
            }
            offsets::LCR => ch.lcr,
            offsets::MCR => ch.mcr,
            offsets::LSR => {
                // The transmitter is infinitely fast.
                let sent: Vec<u8> = ch.tx_fifo.drain(..).collect();
                ch.wire.extend(sent);
                let mut lsr = 0x60;
                if let Some(&(_, errors)) = ch.rx_fifo.front() {
                    lsr |= 0x01 | errors;
                }
                lsr
            }
            offsets::MSR if ch.tcr_tlr_access() => ch.tcr,
            offsets::MSR => ch.msr,
            offsets::SPR if ch.tcr_tlr_access() => ch.tlr,
            offsets::SPR if scratch_broken => !ch.spr,
            offsets::SPR => ch.spr,
            offsets::TXLVL => {
                let free = FIFO_SIZE - ch.tx_fifo.len();
                let free = tx_space_limit.map_or(free, |limit| limit.min(free));
                u8::try_from(free).unwrap()
            }
            offsets::RXLVL => u8::try_from(ch.rx_fifo.len().min(FIFO_SIZE)).unwrap(),
            offsets::IODIR => gpio.0,
            offsets::IOSTATE => (gpio.2 & !gpio.0) | (gpio.1 & gpio.0),
            offsets::IOINTENA => iointena,
            offsets::IOCONTROL => iocontrol,
            offsets::EFCR => ch.efcr,
            _ => 0,
        }
    }

    /// Returns whether the write triggered a soft reset.
    fn write_one(&mut self, channel: Channel, register: u8, value: u8) -> bool {
        let break_loopback = self.break_loopback;
        let ch = self.channel_mut(channel);

        match (ch.bank(), register) {
            (MockBank::Special | MockBank::Enhanced, offsets::DLL) => ch.dll = value,
            (MockBank::Special | MockBank::Enhanced, offsets::DLH) => ch.dlh = value,
            (MockBank::Enhanced, offsets::EFR) => ch.efr = value,
            (MockBank::Enhanced, offsets::XON1) => ch.xon1 = value,
            (MockBank::Enhanced, offsets::XON2) => ch.xon2 = value,
            (MockBank::Enhanced, offsets::XOFF1) => ch.xoff1 = value,
            (MockBank::Enhanced, offsets::XOFF2) => ch.xoff2 = value,
            (_, offsets::DATA) => {
                if ch.loopback() {
                    if !break_loopback {
                        ch.rx_fifo.push_back((value, 0));
                    }
                } else if ch.tx_fifo.len() < FIFO_SIZE {
                    ch.tx_fifo.push_back(value);
                }
            }
            (_, offsets::IER) => {
                let mask = if ch.enhanced() { 0xFF } else { 0x0F };
                ch.ier = (ch.ier & !mask) | (value & mask);
            }
            (_, offsets::FCR) => {
                ch.fifo_enabled = value & 0x01 != 0;
                if value & 0x02 != 0 {
                    ch.rx_fifo.clear();
                }
                if value & 0x04 != 0 {
                    ch.tx_fifo.clear();
                }
            }
            (_, offsets::LCR) => ch.lcr = value,
            (_, offsets::MCR) => {
                let mask = if ch.enhanced() { 0xFF } else { 0x1B };
                ch.mcr = (ch.mcr & !mask) | (value & mask);
            }
            (_, offsets::TCR) => {
                if ch.tcr_tlr_access() {
                    ch.tcr = value;
                }
            }
            (_, offsets::TLR) => {
                if ch.tcr_tlr_access() {
                    ch.tlr = value;
                } else {
                    ch.spr = value;
                }
            }
            (_, offsets::EFCR) => ch.efcr = value,
            (_, offsets::IODIR) => self.iodir = value,
            (_, offsets::IOSTATE) => self.iostate = value,
            (_, offsets::IOINTENA) => self.iointena = value,
            (_, offsets::IOCONTROL) => {
                if value & 0x08 != 0 {
                    self.soft_reset();
                    return true;
                }
                self.iocontrol = value;
            }
            _ => {}
        }
        false
    }
}

impl Interface for MockChip {
    type Error = MockError;

    fn bus_kind(&self) -> BusKind {
        self.bus
    }

    fn probe(&mut self) -> Result<(), Error<MockError>> {
        if self.probe_fails {
            return Err(Error::NotReady);
        }
        Ok(())
    }

    fn read(
        &mut self,
        channel: Channel,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<MockError>> {
        if buf.is_empty() {
            return Ok(());
        }
        let bank = self.channel(channel).bank();
        self.log.push(MockAccess {
            channel,
            bank,
            register,
            write: None,
        });
        if self.fail_read == Some((bank, register)) {
            return Err(Error::Bus(MockError));
        }
        for slot in buf {
            *slot = self.read_one(channel, register);
        }
        Ok(())
    }

    fn write(
        &mut self,
        channel: Channel,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<MockError>> {
        if data.is_empty() {
            return Ok(());
        }
        let bank = self.channel(channel).bank();
        self.log.push(MockAccess {
            channel,
            bank,
            register,
            write: Some(data.to_vec()),
        });
        if self.fail_write == Some((bank, register)) {
            return Err(Error::Bus(MockError));
        }
        let mut reset = false;
        for &value in data {
            reset |= self.write_one(channel, register, value);
        }
        if reset && self.nack_on_reset {
            return Err(Error::I2cInvalidAddress);
        }
        Ok(())
    }
}
