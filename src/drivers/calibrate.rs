//! Raw code to volts, timebase word to sample rate.
use crate::drivers::ScopeError;
/// Largest 12-bit ADC code.
pub const ADC_FULL_SCALE: f32 = 4095.0;
/// Peak-to-peak input span of the front end (volts).
pub const VOLTAGE_SPAN: f32 = 10.0;
/// Code 0 sits at -5 V.
pub const VOLTAGE_OFFSET: f32 = 5.0;
/// Peripheral master clock the timebase word divides down.
pub const SAMPLE_CLOCK_HZ: f32 = 128_000_000.0;
/// One acquisition after calibration: the sample rate recovered from the
/// timebase word and the remaining codes as volts.
#[derive(Clone, Debug)]
pub struct CalibratedFrame {
    pub timebase_word: u16,
    pub sample_rate_hz: f32,
    pub volts: Vec<f32>,
}
#[cfg(test)]
impl CalibratedFrame {
    pub fn len(&self) -> usize {
        self.volts.len()
    }
}
pub fn code_to_voltage(code: f32) -> f32 {
    (code / ADC_FULL_SCALE) * VOLTAGE_SPAN - VOLTAGE_OFFSET
}
/// `fs = 128 MHz / ((word + 1) * 2)`.
pub fn sample_rate_hz(timebase_word: u16) -> Result<f32, ScopeError> {
    let divisor = (u32::from(timebase_word) + 1) * 2;
    // unreachable for a u16 word (no -1 encoding); kept for the invariant
    if divisor == 0 {
        return Err(ScopeError::ZeroTimebase);
    }
    Ok(SAMPLE_CLOCK_HZ / divisor as f32)
}
/// Splits off the timebase word and converts the rest. A buffer whose
/// length is not `expected_words`, or that carries no codes at all, is
/// rejected.
pub fn calibrate(samples: &[u16], expected_words: usize) -> Result<CalibratedFrame, ScopeError> {
    if samples.len() != expected_words || samples.len() < 2 {
        return Err(ScopeError::MalformedFrame {
            expected: expected_words,
            actual: samples.len(),
        });
    }
    let timebase_word = samples[0];
    let sample_rate_hz = sample_rate_hz(timebase_word)?;
    let volts = samples[1..]
        .iter()
        .map(|&code| code_to_voltage(code as f32))
        .collect();
    Ok(CalibratedFrame {
        timebase_word,
        sample_rate_hz,
        volts,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::link::FRAME_WORDS;
    #[test]
    fn voltage_endpoints_and_midpoint() {
        assert!((code_to_voltage(0.0) + 5.0).abs() < 1e-6);
        assert!((code_to_voltage(4095.0) - 5.0).abs() < 1e-5);
        assert!(code_to_voltage(2047.5).abs() < 1e-5);
    }
    #[test]
    fn voltage_is_monotonic_over_all_codes() {
        let mut last = f32::NEG_INFINITY;
        for code in 0..=4095u16 {
            let v = code_to_voltage(code as f32);
            assert!(v >= last, "code {code} went backwards");
            assert!((-5.0..=5.0 + 1e-5).contains(&v));
            last = v;
        }
    }
    #[test]
    fn sample_rate_from_timebase_word() {
        assert_eq!(sample_rate_hz(0).unwrap(), 64_000_000.0);
        assert!((sample_rate_hz(255).unwrap() - 250_000.0).abs() < 1e-3);
        assert!((sample_rate_hz(4095).unwrap() - 15_625.0).abs() < 1e-3);
        assert!(sample_rate_hz(u16::MAX).unwrap() > 0.0);
    }
    #[test]
    fn calibrate_full_frame() {
        let mut samples = vec![2048u16; FRAME_WORDS];
        samples[0] = 0;
        samples[1] = 0;
        samples[2] = 4095;
        let frame = calibrate(&samples, FRAME_WORDS).unwrap();
        assert_eq!(frame.len(), FRAME_WORDS - 1);
        assert_eq!(frame.sample_rate_hz, 64_000_000.0);
        assert!((frame.volts[0] + 5.0).abs() < 1e-6);
        assert!((frame.volts[1] - 5.0).abs() < 1e-5);
    }
    #[test]
    fn short_buffer_is_malformed() {
        let err = calibrate(&[0u16; 100], FRAME_WORDS).unwrap_err();
        assert!(matches!(
            err,
            ScopeError::MalformedFrame { expected: FRAME_WORDS, actual: 100 }
        ));
        assert!(calibrate(&[], 0).is_err());
        assert!(calibrate(&[255], 1).is_err());
    }
}
