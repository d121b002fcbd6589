use rustfft::{num_complex::Complex32, FftPlanner};
/// Magnitude spectrum of one frame, lower half only.
#[derive(Clone, Debug)]
pub struct FrequencySpectrum {
    pub sample_rate_hz: f32,
    pub frequencies_hz: Vec<f32>,
    pub magnitudes: Vec<f32>,
}
impl FrequencySpectrum {
    /// Strongest bin in `1..n/2`; the DC bin never wins.
    pub fn dominant(&self) -> Option<(f32, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, &mag) in self.magnitudes.iter().enumerate().skip(1) {
            match best {
                Some((_, top)) if mag <= top => {}
                _ => best = Some((idx, mag)),
            }
        }
        best.map(|(idx, mag)| (self.frequencies_hz[idx], mag))
    }
}
/// Planner is kept across frames so the 8192-point plan is built once.
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f32>,
}
impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }
    pub fn compute(&mut self, signal: &[f32], sample_rate_hz: f32) -> FrequencySpectrum {
        let n = signal.len();
        if n == 0 {
            return FrequencySpectrum {
                sample_rate_hz,
                frequencies_hz: Vec::new(),
                magnitudes: Vec::new(),
            };
        }
        let fft = self.planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex32> = signal.iter().map(|&v| Complex32::new(v, 0.0)).collect();
        fft.process(&mut buffer);
        let half = n / 2;
        let frequencies_hz = (0..half)
            .map(|k| k as f32 * sample_rate_hz / n as f32)
            .collect();
        let magnitudes = buffer
            .iter()
            .take(half)
            .map(|c| c.norm() / n as f32)
            .collect();
        FrequencySpectrum {
            sample_rate_hz,
            frequencies_hz,
            magnitudes,
        }
    }
    /// Always taken over the full frame, whatever the display shows.
    pub fn dominant_frequency(&mut self, signal: &[f32], sample_rate_hz: f32) -> Option<f32> {
        self.compute(signal, sample_rate_hz)
            .dominant()
            .map(|(freq, _)| freq)
    }
}
