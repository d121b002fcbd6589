use serde::Serialize;
/// Peak values of whatever segment is on screen.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Measurement {
    pub vpp: f32,
    pub vmax: f32,
    pub vmin: f32,
}
impl Measurement {
    pub fn of(signal: &[f32]) -> Option<Self> {
        if signal.is_empty() {
            return None;
        }
        let (vmin, vmax) = signal
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Some(Self {
            vpp: vmax - vmin,
            vmax,
            vmin,
        })
    }
    pub fn vpp_text(&self) -> String {
        format!("Vpp = {:.2} V", self.vpp)
    }
    pub fn vmax_text(&self) -> String {
        format!("Vmax = {:.2} V", self.vmax)
    }
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    pub enabled: bool,
    pub position: usize,
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CursorReadout {
    pub index: usize,
    pub time_us: f32,
    pub volts: f32,
}
impl CursorReadout {
    pub fn label(&self) -> String {
        format!("{:.2} V @ {}", self.volts, format_us(self.time_us))
    }
}
/// Wraps an unbounded counter onto `0..window_len`, negatives included.
pub fn cursor_index(cursor_steps: i64, window_len: usize) -> Option<usize> {
    if window_len == 0 {
        return None;
    }
    Some(cursor_steps.rem_euclid(window_len as i64) as usize)
}
pub fn read_cursor(
    cursor: &mut CursorState,
    cursor_steps: i64,
    segment: &[f32],
    relative_us: &[f32],
) -> Option<CursorReadout> {
    if !cursor.enabled {
        return None;
    }
    let len = segment.len().min(relative_us.len());
    let index = cursor_index(cursor_steps, len)?;
    cursor.position = index;
    Some(CursorReadout {
        index,
        time_us: relative_us[index],
        volts: segment[index],
    })
}
pub fn format_us(value_us: f32) -> String {
    if value_us >= 1000.0 {
        format!("{:.2} ms", value_us / 1000.0)
    } else {
        format!("{:.2} us", value_us)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn peak_to_peak_and_max() {
        let m = Measurement::of(&[-1.0, 0.5, 2.0, -3.0]).unwrap();
        assert_eq!(m.vpp, 5.0);
        assert_eq!(m.vmax, 2.0);
        assert_eq!(m.vmin, -3.0);
        assert_eq!(m.vpp_text(), "Vpp = 5.00 V");
        assert_eq!(m.vmax_text(), "Vmax = 2.00 V");
        assert!(Measurement::of(&[]).is_none());
    }
    #[test]
    fn cursor_wraps_modulo_window() {
        assert_eq!(cursor_index(0, 1024), Some(0));
        assert_eq!(cursor_index(1024, 1024), Some(0));
        assert_eq!(cursor_index(1025, 1024), Some(1));
        assert_eq!(cursor_index(-1, 1024), Some(1023));
        assert_eq!(cursor_index(-1025, 1024), Some(1023));
        assert_eq!(cursor_index(5, 0), None);
    }
    #[test]
    fn cursor_reads_segment_and_time() {
        let segment = [0.0, 1.0, 2.0, 3.0];
        let times = [-2.0, -1.0, 0.0, 1.0];
        let mut cursor = CursorState {
            enabled: true,
            position: 0,
        };
        let readout = read_cursor(&mut cursor, 6, &segment, &times).unwrap();
        assert_eq!(readout.index, 2);
        assert_eq!(readout.volts, 2.0);
        assert_eq!(readout.time_us, 0.0);
        assert_eq!(cursor.position, 2);
    }
    #[test]
    fn disabled_cursor_reads_nothing() {
        let mut cursor = CursorState::default();
        assert!(read_cursor(&mut cursor, 3, &[1.0, 2.0], &[0.0, 1.0]).is_none());
    }
    #[test]
    fn time_formatting_switches_to_ms() {
        assert_eq!(format_us(12.5), "12.50 us");
        assert_eq!(format_us(1500.0), "1.50 ms");
        assert_eq!(format_us(-40.0), "-40.00 us");
    }
}
