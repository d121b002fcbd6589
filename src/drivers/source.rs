use std::io::{Read, Write};
use std::time::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::drivers::calibrate::{ADC_FULL_SCALE, VOLTAGE_OFFSET, VOLTAGE_SPAN};
use crate::drivers::link::SYNC_BYTE;
use crate::drivers::ScopeError;
/// Byte-level access to the acquisition peripheral.
///
/// `transfer` is full duplex: every outbound byte clocks one inbound byte,
/// so `tx` and `rx` always have the same length.
pub trait SpiTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ScopeError>;
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), ScopeError>;
}
impl<T: SpiTransport + ?Sized> SpiTransport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ScopeError> {
        (**self).write(bytes)
    }
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), ScopeError> {
        (**self).transfer(tx, rx)
    }
}
/// USB-serial SPI bridge: bytes written are shifted out, the same number
/// of bytes comes back.
pub struct SerialBridge {
    port: Box<dyn serialport::SerialPort>,
    port_name: String,
}
impl SerialBridge {
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self, ScopeError> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()?;
        Ok(Self {
            port,
            port_name: port_name.to_string(),
        })
    }
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}
impl SpiTransport for SerialBridge {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ScopeError> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        // the bridge echoes one byte per byte clocked out; discard it
        let mut echo = vec![0u8; bytes.len()];
        self.port.read_exact(&mut echo)?;
        Ok(())
    }
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), ScopeError> {
        if tx.len() != rx.len() {
            return Err(ScopeError::Transfer {
                expected: tx.len(),
                actual: rx.len(),
            });
        }
        self.port.write_all(tx)?;
        self.port.flush()?;
        let mut filled = 0;
        while filled < rx.len() {
            match self.port.read(&mut rx[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        if filled != rx.len() {
            return Err(ScopeError::Transfer {
                expected: rx.len(),
                actual: filled,
            });
        }
        Ok(())
    }
}
/// Stand-in peripheral producing a noisy sine, used when no bridge is
/// configured and by tests.
pub struct SimulatedPeripheral {
    rng: StdRng,
    frame_words: usize,
    timebase_word: u16,
    signal_hz: f32,
    amplitude_volts: f32,
    noise_codes: i32,
    pending: Vec<u8>,
    cursor: usize,
}
impl SimulatedPeripheral {
    pub fn new(frame_words: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            frame_words,
            timebase_word: 255,
            signal_hz: 10_000.0,
            amplitude_volts: 2.5,
            noise_codes: 8,
            pending: Vec::new(),
            cursor: 0,
        }
    }
    pub fn with_timebase(mut self, timebase_word: u16) -> Self {
        self.timebase_word = timebase_word & 0x0FFF;
        self
    }
    pub fn with_tone(mut self, signal_hz: f32, amplitude_volts: f32) -> Self {
        self.signal_hz = signal_hz;
        self.amplitude_volts = amplitude_volts;
        self
    }
    pub fn with_noise(mut self, noise_codes: i32) -> Self {
        self.noise_codes = noise_codes.max(0);
        self
    }
    fn sample_rate_hz(&self) -> f32 {
        128_000_000.0 / ((self.timebase_word as f32 + 1.0) * 2.0)
    }
    fn prepare_frame(&mut self) {
        let fs = self.sample_rate_hz();
        let phase: f32 = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let mut words = Vec::with_capacity(self.frame_words);
        words.push(self.timebase_word);
        for i in 1..self.frame_words {
            let t = (i - 1) as f32 / fs;
            let volts = self.amplitude_volts
                * (std::f32::consts::TAU * self.signal_hz * t + phase).sin();
            let code = (volts + VOLTAGE_OFFSET) / VOLTAGE_SPAN * ADC_FULL_SCALE;
            let noise = if self.noise_codes > 0 {
                self.rng.gen_range(-self.noise_codes..=self.noise_codes)
            } else {
                0
            };
            let code = (code.round() as i32 + noise).clamp(0, ADC_FULL_SCALE as i32);
            words.push(code as u16);
        }
        self.pending = words.iter().flat_map(|w| w.to_be_bytes()).collect();
        self.cursor = 0;
    }
}
impl SpiTransport for SimulatedPeripheral {
    fn write(&mut self, bytes: &[u8]) -> Result<(), ScopeError> {
        if bytes.contains(&SYNC_BYTE) {
            self.prepare_frame();
        }
        Ok(())
    }
    fn transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<(), ScopeError> {
        if tx.len() != rx.len() {
            return Err(ScopeError::Transfer {
                expected: tx.len(),
                actual: rx.len(),
            });
        }
        for byte in rx.iter_mut() {
            *byte = self.pending.get(self.cursor).copied().unwrap_or(0);
            self.cursor += 1;
        }
        Ok(())
    }
}
