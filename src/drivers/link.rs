use std::thread;
use std::time::Duration;
use crate::drivers::source::SpiTransport;
use crate::drivers::ScopeError;
/// Byte that tells the peripheral to latch a fresh acquisition.
pub const SYNC_BYTE: u8 = 0xAA;
/// Largest number of words exchanged in one underlying transaction.
pub const MAX_CHUNK_WORDS: usize = 2048;
/// Words per acquisition: one timebase word plus 8192 ADC codes.
pub const FRAME_WORDS: usize = 8193;
const WORD_MASK: u16 = 0x0FFF;
/// Owns the transport for the lifetime of a run; dropping it releases the
/// peripheral.
pub struct Link<T: SpiTransport> {
    transport: Option<T>,
    chunk_words: usize,
    settle: Duration,
}
impl<T: SpiTransport> Link<T> {
    pub fn with_timing(transport: T, chunk_words: usize, settle: Duration) -> Self {
        log::info!("link opened (chunk {chunk_words} words, settle {settle:?})");
        Self {
            transport: Some(transport),
            chunk_words: chunk_words.max(1),
            settle,
        }
    }
    fn transport(&mut self) -> Result<&mut T, ScopeError> {
        self.transport.as_mut().ok_or(ScopeError::Transfer {
            expected: 1,
            actual: 0,
        })
    }
    /// Sends the sync byte and waits for the peripheral to settle.
    pub fn sync(&mut self) -> Result<(), ScopeError> {
        self.transport()?.write(&[SYNC_BYTE])?;
        thread::sleep(self.settle);
        Ok(())
    }
    /// Exchanges `n` words in chunks and decodes each big-endian pair to a
    /// 12-bit code.
    pub fn read(&mut self, n: usize) -> Result<Vec<u16>, ScopeError> {
        let chunk_words = self.chunk_words;
        let transport = self.transport()?;
        let mut words = Vec::with_capacity(n);
        let mut remaining = n;
        let tx = vec![0u8; chunk_words * 2];
        let mut rx = vec![0u8; chunk_words * 2];
        while remaining > 0 {
            let take = remaining.min(chunk_words);
            let len = take * 2;
            transport.transfer(&tx[..len], &mut rx[..len])?;
            words.extend(decode_words(&rx[..len]));
            remaining -= take;
        }
        Ok(words)
    }
    /// Releases the transport early; later calls fail as transfer errors.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            log::info!("link closed");
        }
    }
}
impl<T: SpiTransport> Drop for Link<T> {
    fn drop(&mut self) {
        self.close();
    }
}
pub fn decode_words(bytes: &[u8]) -> impl Iterator<Item = u16> + '_ {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]) & WORD_MASK)
}
